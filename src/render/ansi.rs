//! ANSI escape sequences used by the encoder
//!
//! Only 24-bit "true color" foreground codes are emitted; no background is
//! ever set.

use std::fmt::{self, Write};

/// CSI (Control Sequence Introducer)
pub const CSI: &str = "\x1B[";

/// Reset all attributes, including foreground color
pub const RESET: &str = "\x1B[0m";

/// Write a 24-bit foreground color escape (`ESC[38;2;R;G;Bm`)
#[inline]
pub fn write_fg_rgb<W: Write>(out: &mut W, r: u8, g: u8, b: u8) -> fmt::Result {
    write!(out, "{CSI}38;2;{r};{g};{b}m")
}

/// 24-bit foreground color escape as an owned string
pub fn fg_rgb(r: u8, g: u8, b: u8) -> String {
    format!("{CSI}38;2;{r};{g};{b}m")
}
