//! Line preparation: hard truncation to the terminal width.

use std::borrow::Cow;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Tab stops every eight columns.
const TAB_WIDTH: usize = 8;

/// Fit a line into `width` columns.
///
/// A trailing carriage return is dropped and tabs are expanded to spaces so
/// the measured width matches what the terminal shows. Lines are never
/// wrapped: anything past `width` is cut, and a wide grapheme that would
/// straddle the edge is dropped entirely.
pub fn fit_to_width(line: &str, width: usize) -> Cow<'_, str> {
    let line = line.strip_suffix('\r').unwrap_or(line);

    if line.is_ascii() && !line.contains('\t') {
        return if line.len() > width {
            Cow::Borrowed(&line[..width])
        } else {
            Cow::Borrowed(line)
        };
    }

    let mut out = String::with_capacity(line.len().min(width * 4));
    let mut col = 0;
    for grapheme in line.graphemes(true) {
        if grapheme == "\t" {
            let advance = TAB_WIDTH - col % TAB_WIDTH;
            let advance = advance.min(width - col);
            out.push_str(&" ".repeat(advance));
            col += advance;
        } else {
            let w = grapheme.width();
            if col + w > width {
                break;
            }
            out.push_str(grapheme);
            col += w;
        }
        if col >= width {
            break;
        }
    }
    Cow::Owned(out)
}
