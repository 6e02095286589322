//! Property-based invariant tests for scrolling and line diffing.
//!
//! Verifies:
//! 1. Content that fits never scrolls
//! 2. The head always stays within `0..=max(0, lines - height)`
//! 3. Re-clamping with a zero delta is idempotent
//! 4. Unchanged output converges to cursor-only paints
//! 5. A changed line is highlighted once and reprinted plain exactly once
//! 6. A change in visible line count always redraws fully

use proptest::prelude::*;
use topless::frame::paint::DEFAULT_DECAY;
use topless::{compute_head, DiffStyle, Renderer, Viewport};

fn renderer(height: usize) -> Renderer<Vec<u8>, Viewport> {
    Renderer::new(Vec::new(), Viewport::new(height, 80), DiffStyle::default())
}

fn arb_lines(max: usize) -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z ]{0,12}", 1..max)
}

proptest! {
    #[test]
    fn fitting_content_never_scrolls(
        height in 2usize..100,
        head in 0usize..200,
        delta in -200isize..200,
        seed in 0usize..100,
    ) {
        let count = seed % (height - 1) + 1;
        prop_assert!(count < height);
        prop_assert_eq!(compute_head(count, head, delta, height), 0);
    }

    #[test]
    fn head_stays_in_bounds(
        count in 0usize..500,
        height in 1usize..100,
        head in 0usize..500,
        delta in -1000isize..1000,
    ) {
        let result = compute_head(count, head, delta, height);
        prop_assert!(result <= count.saturating_sub(height));
    }

    #[test]
    fn zero_delta_is_idempotent(
        count in 0usize..500,
        height in 1usize..100,
        head in 0usize..500,
    ) {
        let once = compute_head(count, head, 0, height);
        prop_assert_eq!(compute_head(count, once, 0, height), once);
    }

    #[test]
    fn unchanged_output_converges(lines in arb_lines(30), edits in arb_lines(30)) {
        let mut r = renderer(20);
        r.apply_frame(&lines.join("\n")).unwrap();
        // Same shape, arbitrary content: exercises the diff path.
        let mut edited = lines.clone();
        for (line, edit) in edited.iter_mut().zip(&edits) {
            line.clone_from(edit);
        }
        let output = edited.join("\n");
        r.apply_frame(&output).unwrap();

        for _ in 0..DEFAULT_DECAY {
            r.apply_frame(&output).unwrap();
        }
        let stats = r.apply_frame(&output).unwrap();
        prop_assert!(!stats.full_redraw);
        prop_assert_eq!(stats.text_writes(), 0);
        prop_assert_eq!(stats.skipped, lines.len().min(20));
    }

    #[test]
    fn changed_line_reprinted_once(lines in arb_lines(15), pick in 0usize..15) {
        let index = pick % lines.len();
        let mut r = renderer(20);
        r.apply_frame(&lines.join("\n")).unwrap();

        let mut changed = lines.clone();
        changed[index].push('!');
        let output = changed.join("\n");

        let first = r.apply_frame(&output).unwrap();
        prop_assert_eq!(first.highlighted, 1);
        prop_assert_eq!(first.reprinted, 0);

        let mut plain_reprints = 0;
        for _ in 0..(usize::from(DEFAULT_DECAY) * 3) {
            let stats = r.apply_frame(&output).unwrap();
            prop_assert_eq!(stats.highlighted, 0);
            plain_reprints += stats.reprinted;
        }
        prop_assert_eq!(plain_reprints, 1);
    }

    #[test]
    fn visible_count_change_redraws(before in 1usize..40, after in 1usize..40) {
        let height = 20;
        prop_assume!(before.min(height) != after.min(height));
        let text = |n: usize| (0..n).map(|i| i.to_string()).collect::<Vec<_>>().join("\n");

        let mut r = renderer(height);
        r.apply_frame(&text(before)).unwrap();
        let stats = r.apply_frame(&text(after)).unwrap();
        prop_assert!(stats.full_redraw);
        prop_assert_eq!(stats.skipped, 0);
    }
}
