// Copyright 2026 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Text layout inside irregular regions.
//!
//! - [`fit_text`] shrinks, splits and finally truncates text until it fits a
//!   target box.
//! - [`find_optimal_text_rect`] searches a polygon's boundary samples for the
//!   widest horizontal band that can hold a line of text, and
//!   [`search_scale_ladder`] repeats that search at decreasing font sizes.
//! - [`generate_text_path`] derives a smooth curve inside a polygon for text
//!   that follows its shape.

mod fit;
mod path;
mod rect;

pub use fit::{fit_text, split_text, FitConfig, FittedLine, FittedText};
pub use path::{generate_text_path, TextPath, TextPathConfig};
pub use rect::{find_optimal_text_rect, scale_ladder, search_scale_ladder, LadderFit, TextRect};

/// Horizontal alignment of text relative to its anchor point.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Anchor {
    /// The anchor is at the start of the text.
    #[default]
    Start,
    /// The anchor is at the horizontal center of the text.
    Middle,
    /// The anchor is at the end of the text.
    End,
}

impl Anchor {
    /// Distance from the left edge of text of width `width` to the anchor.
    pub fn offset(self, width: f64) -> f64 {
        match self {
            Self::Start => 0.0,
            Self::Middle => width * 0.5,
            Self::End => width,
        }
    }

    /// The SVG `text-anchor` value.
    pub fn as_svg(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Middle => "middle",
            Self::End => "end",
        }
    }
}
