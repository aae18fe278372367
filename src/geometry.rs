//! Render resolution requests
//!
//! A [`Size`] is an immutable `(width, height)` pair. Negative or zero
//! dimensions are accepted; the receiving interface decides what they mean
//! (the frame renderer treats them as "derive from the aspect ratio").

use std::fmt;
use std::str::FromStr;

use crate::errors::{PixcatError, Result};

/// Default render resolution when none is requested
pub const DEFAULT_SIZE: Size = Size::new(24, 24);

/// The dimensions of a rectangular region
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Size {
    width: i32,
    height: i32,
}

impl Size {
    #[inline]
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// The horizontal dimension
    #[inline]
    pub const fn width(&self) -> i32 {
        self.width
    }

    /// The vertical dimension
    #[inline]
    pub const fn height(&self) -> i32 {
        self.height
    }
}

impl Default for Size {
    fn default() -> Self {
        DEFAULT_SIZE
    }
}

impl From<(i32, i32)> for Size {
    fn from((width, height): (i32, i32)) -> Self {
        Self::new(width, height)
    }
}

impl From<Size> for (i32, i32) {
    fn from(size: Size) -> Self {
        (size.width, size.height)
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Parses `WxH` (also `W,H`), e.g. `"80x40"`
impl FromStr for Size {
    type Err = PixcatError;

    fn from_str(s: &str) -> Result<Self> {
        let (width, height) = s
            .split_once(['x', 'X', ','])
            .ok_or_else(|| PixcatError::InvalidInput(format!("size {s:?} is not of the form WxH")))?;

        Ok(Self::new(
            parse_dimension("width", width)?,
            parse_dimension("height", height)?,
        ))
    }
}

fn parse_dimension(field: &'static str, raw: &str) -> Result<i32> {
    let raw = raw.trim();
    if let Ok(value) = raw.parse::<i32>() {
        return Ok(value);
    }

    let found = if raw.is_empty() {
        "nothing"
    } else if raw.parse::<i64>().is_ok() {
        return Err(PixcatError::InvalidInput(format!(
            "'{field}' value {raw} is out of range"
        )));
    } else if raw.parse::<f64>().is_ok() {
        "float"
    } else {
        "string"
    };
    Err(PixcatError::TypeMismatch { field, found })
}

/// Accepts `[w, h]` or `{ width = w, height = h }`
impl TryFrom<&toml::Value> for Size {
    type Error = PixcatError;

    fn try_from(value: &toml::Value) -> Result<Self> {
        match value {
            toml::Value::Array(items) if items.len() == 2 => Ok(Self::new(
                integer_field("width", &items[0])?,
                integer_field("height", &items[1])?,
            )),
            toml::Value::Array(items) => Err(PixcatError::InvalidInput(format!(
                "size expects exactly 2 dimensions, got {}",
                items.len()
            ))),
            toml::Value::Table(table) => {
                let field = |name: &'static str| {
                    table
                        .get(name)
                        .ok_or_else(|| PixcatError::InvalidInput(format!("size is missing '{name}'")))
                        .and_then(|v| integer_field(name, v))
                };
                Ok(Self::new(field("width")?, field("height")?))
            }
            other => Err(PixcatError::TypeMismatch {
                field: "size",
                found: other.type_str(),
            }),
        }
    }
}

fn integer_field(field: &'static str, value: &toml::Value) -> Result<i32> {
    match value {
        toml::Value::Integer(i) => i32::try_from(*i).map_err(|_| {
            PixcatError::InvalidInput(format!("'{field}' value {i} is out of range"))
        }),
        other => Err(PixcatError::TypeMismatch {
            field,
            found: other.type_str(),
        }),
    }
}
