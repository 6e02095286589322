//! Screen-level tests: replay painted bytes through a VT100 emulator and
//! check what the user would actually see.

use crossbeam_channel::{unbounded, Receiver, Sender};
use std::io::{self, Read, Write};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;
use topless::{DiffStyle, Engine, EngineConfig, Execution, Renderer, Viewport};

const WIDTH: u16 = 40;

/// Emulated terminal one row taller than the drawable viewport.
fn screen_for(bytes: &[u8], height: usize) -> vt100::Parser {
    let rows = u16::try_from(height + 1).unwrap();
    let mut parser = vt100::Parser::new(rows, WIDTH, 0);
    parser.process(bytes);
    parser
}

fn visible_rows(parser: &vt100::Parser, count: usize) -> Vec<String> {
    parser
        .screen()
        .rows(0, WIDTH)
        .take(count)
        .map(|row| row.trim_end().to_string())
        .collect()
}

fn numbered(count: usize) -> String {
    (0..count).map(|i| format!("line {i}")).collect::<Vec<_>>().join("\n")
}

fn renderer(height: usize) -> Renderer<Vec<u8>, Viewport> {
    Renderer::new(Vec::new(), Viewport::new(height, usize::from(WIDTH)), DiffStyle::default())
}

#[test]
fn test_identical_output_leaves_screen_intact() {
    let mut r = renderer(10);
    r.apply_frame("alpha\nbeta\ngamma").unwrap();
    let first = r.writer().len();
    let stats = r.apply_frame("alpha\nbeta\ngamma").unwrap();

    assert_eq!(stats.skipped, 3);
    assert_eq!(stats.text_writes(), 0);
    // The second paint only moves the cursor.
    let second = String::from_utf8_lossy(&r.writer()[first..]).into_owned();
    assert!(["alpha", "beta", "gamma"].iter().all(|word| !second.contains(word)));

    let parser = screen_for(r.writer(), 10);
    assert_eq!(visible_rows(&parser, 3), vec!["alpha", "beta", "gamma"]);
}

#[test]
fn test_changed_line_highlighted_then_cleared() {
    let mut r = renderer(10);
    r.apply_frame("A\nB\nC").unwrap();
    r.apply_frame("A\nX\nC").unwrap();

    let parser = screen_for(r.writer(), 10);
    assert_eq!(visible_rows(&parser, 3), vec!["A", "X", "C"]);
    assert_eq!(parser.screen().cell(1, 0).unwrap().fgcolor(), vt100::Color::Idx(1));
    assert_eq!(parser.screen().cell(0, 0).unwrap().fgcolor(), vt100::Color::Default);

    // Two skips, then the plain reprint.
    r.apply_frame("A\nX\nC").unwrap();
    r.apply_frame("A\nX\nC").unwrap();
    let parser = screen_for(r.writer(), 10);
    assert_eq!(parser.screen().cell(1, 0).unwrap().fgcolor(), vt100::Color::Idx(1));

    let stats = r.apply_frame("A\nX\nC").unwrap();
    assert_eq!(stats.reprinted, 1);
    let parser = screen_for(r.writer(), 10);
    assert_eq!(parser.screen().cell(1, 0).unwrap().fgcolor(), vt100::Color::Default);
    assert_eq!(visible_rows(&parser, 3), vec!["A", "X", "C"]);
}

#[test]
fn test_growing_output_redraws_clipped() {
    let mut r = renderer(20);
    r.apply_frame(&numbered(5)).unwrap();
    let stats = r.apply_frame(&numbered(50)).unwrap();

    assert!(stats.full_redraw);
    assert_eq!(r.head(), 0);
    let parser = screen_for(r.writer(), 20);
    let rows = visible_rows(&parser, 21);
    assert_eq!(rows[0], "line 0");
    assert_eq!(rows[19], "line 19");
    assert_eq!(rows[20], "");
}

#[test]
fn test_shrinking_output_erases_leftovers() {
    let mut r = renderer(10);
    r.apply_frame(&numbered(6)).unwrap();
    r.apply_frame("only").unwrap();

    let parser = screen_for(r.writer(), 10);
    assert_eq!(visible_rows(&parser, 6), vec!["only", "", "", "", "", ""]);
}

#[test]
fn test_scroll_shows_clamped_window() {
    let mut r = renderer(10);
    r.apply_frame(&numbered(15)).unwrap();
    r.scroll(10).unwrap();
    assert_eq!(r.head(), 5);

    let parser = screen_for(r.writer(), 10);
    let rows = visible_rows(&parser, 10);
    assert_eq!(rows.first().map(String::as_str), Some("line 5"));
    assert_eq!(rows.last().map(String::as_str), Some("line 14"));

    r.scroll(-1).unwrap();
    let parser = screen_for(r.writer(), 10);
    assert_eq!(visible_rows(&parser, 1), vec!["line 4"]);
}

#[test]
fn test_long_lines_truncated_not_wrapped() {
    let mut r = renderer(5);
    let long = "x".repeat(100);
    r.apply_frame(&format!("{long}\nnext")).unwrap();

    let parser = screen_for(r.writer(), 5);
    let rows = visible_rows(&parser, 2);
    assert_eq!(rows[0].len(), usize::from(WIDTH));
    assert_eq!(rows[1], "next");
}

/// Blocking reader fed from a channel, standing in for a terminal's stdin.
struct KeyFeed(Receiver<Vec<u8>>, Vec<u8>);

impl Read for KeyFeed {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.1.is_empty() {
            match self.0.recv() {
                Ok(bytes) => self.1 = bytes,
                Err(_) => return Ok(0),
            }
        }
        let n = self.1.len().min(buf.len());
        buf[..n].copy_from_slice(&self.1[..n]);
        self.1.drain(..n);
        Ok(n)
    }
}

/// Writer whose bytes stay reachable after the engine drops it.
#[derive(Clone, Default)]
struct SharedScreen(Arc<Mutex<Vec<u8>>>);

impl Write for SharedScreen {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn press_later(keys: &Sender<Vec<u8>>, after: Duration, bytes: &[u8]) -> thread::JoinHandle<()> {
    let keys = keys.clone();
    let bytes = bytes.to_vec();
    thread::spawn(move || {
        thread::sleep(after);
        let _ = keys.send(bytes);
    })
}

fn fast_config() -> EngineConfig {
    EngineConfig {
        interval: Duration::from_millis(2),
        ..EngineConfig::default()
    }
}

#[test]
fn test_engine_quits_on_q() {
    let (keys_tx, keys_rx) = unbounded();
    let screen = SharedScreen::default();
    let presser = press_later(&keys_tx, Duration::from_millis(50), b"q");

    let result = Engine::drive(
        &fast_config(),
        || Execution::ok("A\nB\nC"),
        Some(KeyFeed(keys_rx, Vec::new())),
        screen.clone(),
        Viewport::new(10, usize::from(WIDTH)),
    );
    presser.join().unwrap();
    drop(keys_tx);

    assert!(result.is_ok());
    let bytes = screen.0.lock().unwrap().clone();
    let parser = screen_for(&bytes, 10);
    assert_eq!(visible_rows(&parser, 3), vec!["A", "B", "C"]);
}

#[test]
fn test_engine_scrolls_on_ctrl_d() {
    let (keys_tx, keys_rx) = unbounded();
    let screen = SharedScreen::default();
    let scroller = press_later(&keys_tx, Duration::from_millis(30), b"\x04");
    let quitter = press_later(&keys_tx, Duration::from_millis(120), b"q");

    let output = numbered(15);
    let result = Engine::drive(
        &fast_config(),
        move || Execution::ok(output.clone()),
        Some(KeyFeed(keys_rx, Vec::new())),
        screen.clone(),
        Viewport::new(10, usize::from(WIDTH)),
    );
    scroller.join().unwrap();
    quitter.join().unwrap();
    drop(keys_tx);

    assert!(result.is_ok());
    let bytes = screen.0.lock().unwrap().clone();
    let parser = screen_for(&bytes, 10);
    let rows = visible_rows(&parser, 10);
    assert_eq!(rows[0], "line 5");
    assert_eq!(rows[9], "line 14");
}

#[test]
fn test_engine_failure_without_force() {
    let screen = SharedScreen::default();
    let source = || {
        Execution::failed(
            "partial",
            topless::ExecError::Wait {
                program: "cmd".to_string(),
                source: io::Error::other("boom"),
            },
        )
    };
    let result = Engine::drive(
        &fast_config(),
        source,
        None::<KeyFeed>,
        screen.clone(),
        Viewport::new(10, usize::from(WIDTH)),
    );

    match result {
        Err(topless::Error::Execution { output, .. }) => assert_eq!(output, "partial"),
        other => panic!("unexpected result: {other:?}"),
    }
    // Nothing was painted; the caller prints the partial output once.
    assert!(screen.0.lock().unwrap().is_empty());
}

#[test]
fn test_engine_force_mode_keeps_painting() {
    let (keys_tx, keys_rx) = unbounded();
    let screen = SharedScreen::default();
    let quitter = press_later(&keys_tx, Duration::from_millis(50), b"q");
    let source = || {
        Execution::failed(
            "still here",
            topless::ExecError::Wait {
                program: "cmd".to_string(),
                source: io::Error::other("boom"),
            },
        )
    };
    let config = EngineConfig {
        force: true,
        ..fast_config()
    };
    let result = Engine::drive(
        &config,
        source,
        Some(KeyFeed(keys_rx, Vec::new())),
        screen.clone(),
        Viewport::new(10, usize::from(WIDTH)),
    );
    quitter.join().unwrap();
    drop(keys_tx);

    assert!(result.is_ok());
    let bytes = screen.0.lock().unwrap().clone();
    let parser = screen_for(&bytes, 10);
    assert_eq!(visible_rows(&parser, 1), vec!["still here"]);
}
