//! Row-aware run-length encoding of pixels into colored text
//!
//! Consecutive pixels of the same color on the same row share a single
//! foreground color escape:
//!
//! ```text
//!   pixels (width 3)          output
//!   R R B                     ESC[38;2;R..m ▄▄ ESC[38;2;B..m ▄ \n
//!   B B B            ──►      ESC[38;2;B..m ▄▄▄ ESC[0m
//! ```
//!
//! A run never wraps past the end of a row, even when the next row starts
//! with the same color.

use std::fmt::{self, Write};
use std::iter::Peekable;

use image::Rgb;

use super::ansi;

/// Character drawn for every pixel cell
pub const GLYPH: char = '\u{2584}';

/// A maximal sequence of identical pixels within one row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Run {
    pub color: Rgb<u8>,
    pub len: usize,
    /// The run is the last one of its row
    pub ends_row: bool,
}

/// Iterator splitting a row-major pixel stream into [`Run`]s
pub struct Runs<I: Iterator<Item = Rgb<u8>>> {
    pixels: Peekable<I>,
    width: usize,
    index: usize,
}

impl<I: Iterator<Item = Rgb<u8>>> Runs<I> {
    pub fn new(pixels: impl IntoIterator<IntoIter = I>, width: usize) -> Self {
        Self {
            pixels: pixels.into_iter().peekable(),
            width,
            index: 0,
        }
    }
}

impl<I: Iterator<Item = Rgb<u8>>> Iterator for Runs<I> {
    type Item = Run;

    fn next(&mut self) -> Option<Run> {
        if self.width == 0 {
            return None;
        }

        let color = self.pixels.next()?;
        let mut len = 1;
        self.index += 1;

        loop {
            if self.index % self.width == 0 {
                return Some(Run { color, len, ends_row: true });
            }
            match self.pixels.peek() {
                Some(next) if *next == color => {
                    self.pixels.next();
                    self.index += 1;
                    len += 1;
                }
                Some(_) => return Some(Run { color, len, ends_row: false }),
                // Trailing partial row
                None => return Some(Run { color, len, ends_row: true }),
            }
        }
    }
}

/// Encode row-major `pixels` of an image `width` pixels wide into `out`
///
/// Rows are separated by `\n` and the output always ends with exactly one
/// color reset sequence, so terminal color state does not leak past the image.
pub fn encode<W, P>(pixels: P, width: usize, out: &mut W) -> fmt::Result
where
    W: Write,
    P: IntoIterator<Item = Rgb<u8>>,
{
    let mut row_open = false;
    for run in Runs::new(pixels, width) {
        if row_open {
            out.write_char('\n')?;
        }
        write_run(&run, out)?;
        row_open = run.ends_row;
    }
    out.write_str(ansi::RESET)
}

fn write_run<W: Write>(run: &Run, out: &mut W) -> fmt::Result {
    let Rgb([r, g, b]) = run.color;
    ansi::write_fg_rgb(out, r, g, b)?;
    for _ in 0..run.len {
        out.write_char(GLYPH)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const RED: Rgb<u8> = Rgb([255, 0, 0]);
    const BLUE: Rgb<u8> = Rgb([0, 0, 255]);
    const RESET: &str = "\x1b[0m";

    fn encoded(pixels: &[Rgb<u8>], width: usize) -> String {
        let mut out = String::new();
        encode(pixels.iter().copied(), width, &mut out).unwrap();
        out
    }

    fn color_escapes(text: &str) -> usize {
        text.matches("\x1b[38;2;").count()
    }

    #[test]
    fn test_two_by_two_red_then_blue() {
        let out = encoded(&[RED, RED, BLUE, BLUE], 2);
        assert_eq!(
            out,
            "\x1b[38;2;255;0;0m\u{2584}\u{2584}\n\x1b[38;2;0;0;255m\u{2584}\u{2584}\x1b[0m"
        );
    }

    #[test]
    fn test_single_pixel() {
        let out = encoded(&[Rgb([1, 2, 3])], 1);
        assert_eq!(out, "\x1b[38;2;1;2;3m\u{2584}\x1b[0m");
    }

    #[test]
    fn test_run_does_not_wrap_rows() {
        let runs: Vec<Run> = Runs::new([RED, RED, RED, RED, RED, RED], 3).collect();
        assert_eq!(
            runs,
            vec![
                Run { color: RED, len: 3, ends_row: true },
                Run { color: RED, len: 3, ends_row: true },
            ]
        );
    }

    #[test]
    fn test_color_change_mid_row() {
        let runs: Vec<Run> = Runs::new([RED, BLUE, BLUE, RED], 4).collect();
        assert_eq!(runs.len(), 3);
        assert_eq!(runs[1], Run { color: BLUE, len: 2, ends_row: false });
        assert!(runs[2].ends_row);
    }

    #[rstest]
    #[case(1, 1)]
    #[case(5, 1)]
    #[case(1, 6)]
    #[case(7, 3)]
    fn test_uniform_image_has_one_run_per_row(#[case] width: usize, #[case] height: usize) {
        let out = encoded(&vec![BLUE; width * height], width);
        assert_eq!(color_escapes(&out), height);
        assert_eq!(out.matches('\n').count(), height - 1);
    }

    #[rstest]
    #[case(3, 2)]
    #[case(4, 4)]
    #[case(1, 5)]
    fn test_checkerboard_line_breaks_and_reset(#[case] width: usize, #[case] height: usize) {
        let pixels: Vec<Rgb<u8>> = (0..width * height)
            .map(|i| if (i % width + i / width) % 2 == 0 { RED } else { BLUE })
            .collect();
        let out = encoded(&pixels, width);

        assert_eq!(out.matches('\n').count(), height - 1);
        assert!(out.ends_with(RESET));
        assert_eq!(out.matches(RESET).count(), 1);
        assert_eq!(out.chars().filter(|c| *c == GLYPH).count(), width * height);
        for line in out.split('\n') {
            assert_eq!(line.chars().filter(|c| *c == GLYPH).count(), width);
        }
    }

    #[test]
    fn test_empty_input_only_resets() {
        assert_eq!(encoded(&[], 4), RESET);
        assert_eq!(encoded(&[RED], 0), RESET);
    }
}
