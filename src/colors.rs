//! Rainbow color sequencing.
//!
//! The blink site accepts a handful of named colors. We cycle through the seven
//! closest to a rainbow in a fixed order, one per flash request.

use serde::Serialize;
use strum_macros::EnumIter;

/// A color the blink site knows how to flash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Red,
    Orange,
    Yellow,
    Green,
    Blue,
    Purple,
    Pink,
}

impl Color {
    /// Label sent to the site in the `color` field.
    pub fn as_str(&self) -> &'static str {
        match self {
            Color::Red => "red",
            Color::Orange => "orange",
            Color::Yellow => "yellow",
            Color::Green => "green",
            Color::Blue => "blue",
            Color::Purple => "purple",
            Color::Pink => "pink",
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The colors in the order they are sent.
pub const RAINBOW: [Color; 7] = [
    Color::Red,
    Color::Orange,
    Color::Yellow,
    Color::Green,
    Color::Blue,
    Color::Purple,
    Color::Pink,
];

/// Index into `RAINBOW`. Always in `0..RAINBOW.len()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ColorCursor(usize);

impl ColorCursor {
    /// Creates a cursor, wrapping `index` into range.
    pub fn new(index: usize) -> Self {
        ColorCursor(index % RAINBOW.len())
    }

    pub fn index(self) -> usize {
        self.0
    }

    pub fn color(self) -> Color {
        RAINBOW[self.0]
    }

    /// The cursor one step further, wrapping after the last color.
    pub fn advance(self) -> Self {
        ColorCursor::new(self.0 + 1)
    }
}

/// Deterministic round-robin over `RAINBOW`.
///
/// An endless iterator: `next()` always returns `Some`.
#[derive(Debug, Default)]
pub struct ColorSequencer {
    cursor: ColorCursor,
}

impl ColorSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(cursor: ColorCursor) -> Self {
        ColorSequencer { cursor }
    }

    /// Cursor of the color the next call will return.
    pub fn cursor(&self) -> ColorCursor {
        self.cursor
    }

    /// Returns the color under the cursor and advances it.
    pub fn next_color(&mut self) -> Color {
        let color = self.cursor.color();
        self.cursor = self.cursor.advance();
        color
    }
}

impl Iterator for ColorSequencer {
    type Item = Color;

    fn next(&mut self) -> Option<Color> {
        Some(self.next_color())
    }
}
