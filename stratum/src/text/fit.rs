// Copyright 2026 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use peniko::kurbo::{Point, Rect};

use super::Anchor;
use crate::font::TextMeasure;

const ELLIPSIS: char = '\u{2026}';

/// Parameters for [`fit_text`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FitConfig {
    /// Smallest font size as a fraction of the requested size.
    pub min_scale: f64,
    /// Number of shrink steps between the requested and the smallest size.
    pub scale_steps: usize,
    /// Largest number of lines text may be split into.
    pub max_split_parts: usize,
    /// Absolute minimum font size.
    pub min_legible_size: f64,
    /// Clearance kept between the text and the edge of the target box.
    pub margin: f64,
    /// Distance between baselines of split lines, relative to the font size.
    pub line_spacing: f64,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            min_scale: 0.5,
            scale_steps: 10,
            max_split_parts: 3,
            min_legible_size: 1.5,
            margin: 0.5,
            line_spacing: 1.2,
        }
    }
}

/// One line of fitted text.
#[derive(Clone, Debug, PartialEq)]
pub struct FittedLine {
    /// The text of the line.
    pub text: String,
    /// The anchor point of the line, vertically centered on the line.
    pub origin: Point,
}

/// The outcome of [`fit_text`].
#[derive(Clone, Debug, PartialEq)]
pub struct FittedText {
    /// The lines to draw, top to bottom.
    pub lines: Vec<FittedLine>,
    /// The final font size.
    pub font_size: f64,
    /// Describes how the text was degraded to fit, if it was.
    pub warning: Option<String>,
    /// The font size is smaller than requested.
    pub was_scaled: bool,
    /// The text was split into several lines.
    pub was_split: bool,
    /// The text was shortened and ends in an ellipsis.
    pub was_truncated: bool,
}

/// Fits `text` into `target`.
///
/// `position` is the anchor point of the text block, vertically centered.
/// The text is tried at `size` first, then shrunk step by step, then split
/// into lines at word boundaries, and finally truncated. Returns `None` if
/// not even a truncated form fits.
pub fn fit_text(
    text: &str,
    position: Point,
    anchor: Anchor,
    size: f64,
    target: Rect,
    config: &FitConfig,
    measure: &mut dyn TextMeasure,
) -> Option<FittedText> {
    let text = text.trim();
    if text.is_empty() || size <= 0.0 {
        return None;
    }
    let mut cx = Fitter {
        position,
        anchor,
        target: target.abs(),
        config,
        measure,
    };
    let sizes = cx.sizes(size);

    let single = [text.to_string()];
    if cx.fits(&single, size) {
        return Some(cx.finish(&single, size, size, None));
    }
    for &s in &sizes[1..] {
        if cx.fits(&single, s) {
            let warning = format!(
                "Text scaled to {}% of original size to fit",
                percent(s, size)
            );
            return Some(cx.finish(&single, s, size, Some(warning)));
        }
    }

    for parts in 2..=config.max_split_parts {
        let lines = split_text(text, parts);
        if lines.len() < 2 {
            break;
        }
        for &s in &sizes {
            if cx.fits(&lines, s) {
                let mut warning = format!(
                    "Text split into {} parts to fit available space",
                    lines.len()
                );
                if s < size {
                    warning.push_str(&format!(
                        " and scaled to {}% of original size",
                        percent(s, size)
                    ));
                }
                return Some(cx.finish(&lines, s, size, Some(warning)));
            }
        }
    }

    let smallest = sizes[sizes.len() - 1];
    let chars: Vec<char> = text.chars().collect();
    for keep in (1..chars.len()).rev() {
        let mut truncated: String = chars[..keep].iter().collect::<String>().trim_end().into();
        truncated.push(ELLIPSIS);
        let line = [truncated];
        if cx.fits(&line, smallest) {
            let mut fitted = cx.finish(
                &line,
                smallest,
                size,
                Some("Text truncated to fit available space".into()),
            );
            fitted.was_truncated = true;
            return Some(fitted);
        }
    }
    None
}

/// Splits `text` into at most `parts` lines.
///
/// Words are kept whole and grouped so that the longest line is as short as
/// possible; among equally good groupings the earliest break wins. A single
/// word is split between characters instead. The result depends only on the
/// input.
pub fn split_text(text: &str, parts: usize) -> Vec<String> {
    let text = text.trim();
    if parts <= 1 || text.is_empty() {
        return vec![text.to_string()];
    }
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() >= 2 {
        return partition_words(&words, parts.min(words.len()));
    }
    let chars: Vec<char> = text.chars().collect();
    if chars.len() < parts {
        return vec![text.to_string()];
    }
    let chunk = chars.len().div_ceil(parts);
    chars.chunks(chunk).map(|c| c.iter().collect()).collect()
}

/// Linear partition of `words` into exactly `parts` non-empty lines.
fn partition_words(words: &[&str], parts: usize) -> Vec<String> {
    let n = words.len();
    let mut prefix = vec![0_usize; n + 1];
    for (i, word) in words.iter().enumerate() {
        prefix[i + 1] = prefix[i] + word.chars().count();
    }
    // Length of words[i..j] joined by single spaces.
    let line_len = |i: usize, j: usize| prefix[j] - prefix[i] + (j - i - 1);

    // best[k][j]: smallest longest line when words[..j] form k + 1 lines.
    let mut best = vec![vec![usize::MAX; n + 1]; parts];
    let mut split = vec![vec![0_usize; n + 1]; parts];
    for j in 1..=n {
        best[0][j] = line_len(0, j);
    }
    for k in 1..parts {
        for j in (k + 1)..=n {
            for i in k..j {
                let cost = best[k - 1][i].max(line_len(i, j));
                if cost < best[k][j] {
                    best[k][j] = cost;
                    split[k][j] = i;
                }
            }
        }
    }

    let mut bounds = Vec::with_capacity(parts + 1);
    let mut j = n;
    bounds.push(j);
    for k in (1..parts).rev() {
        j = split[k][j];
        bounds.push(j);
    }
    bounds.push(0);
    bounds.reverse();
    bounds
        .windows(2)
        .map(|w| words[w[0]..w[1]].join(" "))
        .collect()
}

fn percent(size: f64, nominal: f64) -> i64 {
    #[expect(
        clippy::cast_possible_truncation,
        reason = "percentages are small"
    )]
    let p = (size / nominal * 100.0).round() as i64;
    p
}

struct Fitter<'a, 'm> {
    position: Point,
    anchor: Anchor,
    target: Rect,
    config: &'a FitConfig,
    measure: &'m mut dyn TextMeasure,
}

impl Fitter<'_, '_> {
    /// Requested size followed by the shrink steps, never below the legible
    /// minimum unless the requested size already is.
    fn sizes(&self, size: f64) -> Vec<f64> {
        let floor = (size * self.config.min_scale).max(self.config.min_legible_size.min(size));
        let steps = self.config.scale_steps.max(1);
        let mut sizes = vec![size];
        for step in 1..=steps {
            let s = size - (size - floor) * step as f64 / steps as f64;
            if s < sizes[sizes.len() - 1] {
                sizes.push(s);
            }
        }
        sizes
    }

    fn line_pitch(&self, size: f64) -> f64 {
        size * self.config.line_spacing
    }

    fn fits(&mut self, lines: &[String], size: f64) -> bool {
        let mut width: f64 = 0.0;
        for line in lines {
            match self.measure.measure_text_width(line, size) {
                Some(w) => width = width.max(w),
                None => return false,
            }
        }
        let line_height = self.measure.line_height(size);
        let height = line_height + self.line_pitch(size) * (lines.len() - 1) as f64;
        let left = self.position.x - self.anchor.offset(width);
        let m = self.config.margin;
        let bbox = Rect::new(
            left - m,
            self.position.y - height * 0.5 - m,
            left + width + m,
            self.position.y + height * 0.5 + m,
        );
        bbox.x0 >= self.target.x0
            && bbox.y0 >= self.target.y0
            && bbox.x1 <= self.target.x1
            && bbox.y1 <= self.target.y1
    }

    fn finish(
        &self,
        lines: &[String],
        size: f64,
        nominal: f64,
        warning: Option<String>,
    ) -> FittedText {
        let pitch = self.line_pitch(size);
        let mid = (lines.len() - 1) as f64 * 0.5;
        let lines = lines
            .iter()
            .enumerate()
            .map(|(i, text)| FittedLine {
                text: text.clone(),
                origin: Point::new(self.position.x, self.position.y + (i as f64 - mid) * pitch),
            })
            .collect::<Vec<_>>();
        if let Some(warning) = &warning {
            log::debug!("{warning}");
        }
        FittedText {
            was_split: lines.len() > 1,
            lines,
            font_size: size,
            warning,
            was_scaled: size < nominal,
            was_truncated: false,
        }
    }
}
