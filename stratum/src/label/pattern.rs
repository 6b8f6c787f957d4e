// Copyright 2026 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `%{name}` template substitution for label text and file names.
//!
//! A pattern is `%{` followed by one or more ASCII letters and `}`. Patterns
//! without a value are left in the output unchanged. `%%{` produces a literal
//! `%{`.

use core::fmt::Write;

use peniko::kurbo::Rect;

/// Unit system used when formatting label values.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum LabelUnits {
    /// Meters and decimal degrees.
    #[default]
    Metric,
    /// Feet and degrees, minutes and seconds.
    Imperial,
}

/// Values available to label templates.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PatternValues {
    /// Layer number, 0 for the base sheet.
    pub layer_number: usize,
    /// Elevation in meters.
    pub elevation: f64,
    /// Geographic bounds in degrees.
    pub bounds: Rect,
    /// Map scale denominator, e.g. 25000 for 1:25000.
    pub scale_ratio: f64,
    /// Elevation difference between layers in meters.
    pub contour_height: f64,
    /// Units for distances and coordinates.
    pub units: LabelUnits,
}

impl PatternValues {
    fn lookup(&self, name: &str) -> Option<String> {
        let b = self.bounds;
        let center = b.center();
        Some(match name {
            "s" => format!("{:.0}", self.scale_ratio),
            "c" => self.distance(self.contour_height),
            "n" => self.layer_number.to_string(),
            "l" => format!("{:02}", self.layer_number),
            "e" => format!("{:.0}", self.elevation.round()),
            "x" => format!("{:.4}", center.x),
            "y" => format!("{:.4}", center.y),
            "C" => self.coordinate(center.y, center.x),
            "UL" => self.coordinate(b.y1, b.x0),
            "UR" => self.coordinate(b.y1, b.x1),
            "LL" => self.coordinate(b.y0, b.x0),
            "LR" => self.coordinate(b.y0, b.x1),
            _ => return None,
        })
    }

    fn distance(&self, meters: f64) -> String {
        match self.units {
            LabelUnits::Metric => format!("{meters:.1}m"),
            LabelUnits::Imperial => format!("{:.1}ft", meters * 3.28084),
        }
    }

    fn coordinate(&self, lat: f64, lon: f64) -> String {
        match self.units {
            LabelUnits::Metric => format!("{lat:.4}\u{b0}, {lon:.4}\u{b0}"),
            LabelUnits::Imperial => {
                let ns = if lat >= 0.0 { 'N' } else { 'S' };
                let ew = if lon >= 0.0 { 'E' } else { 'W' };
                format!("{}{ns}, {}{ew}", dms(lat), dms(lon))
            }
        }
    }
}

fn dms(value: f64) -> String {
    let value = value.abs();
    let degrees = value.trunc();
    let minutes = ((value - degrees) * 60.0).trunc();
    let seconds = ((value - degrees) * 60.0 - minutes) * 60.0;
    format!("{degrees:.0}\u{b0}{minutes:.0}'{seconds:.1}\"")
}

/// Replaces label patterns in `template`.
///
/// | Pattern | Value |
/// |---|---|
/// | `%{s}` | scale denominator |
/// | `%{c}` | contour height with unit |
/// | `%{n}` | layer number |
/// | `%{l}` | layer number, two digits |
/// | `%{e}` | elevation in whole meters |
/// | `%{x}`, `%{y}` | center longitude and latitude |
/// | `%{C}` | center coordinate |
/// | `%{UL}`, `%{UR}`, `%{LL}`, `%{LR}` | corner coordinates |
pub fn substitute_label(template: &str, values: &PatternValues) -> String {
    substitute(template, |name| values.lookup(name))
}

/// Builds a file stem from `pattern`.
///
/// `%{b}` is the base name, `%{l}` and `%{n}` the two-digit layer number and
/// `%{e}` the elevation in whole meters.
pub fn substitute_filename(pattern: &str, base: &str, layer_number: usize, elevation: f64) -> String {
    substitute(pattern, |name| match name {
        "b" => Some(base.to_string()),
        "l" | "n" => Some(format!("{layer_number:02}")),
        "e" => Some(format!("{:.0}", elevation.round())),
        _ => None,
    })
}

fn substitute(template: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(pos) = rest.find('%') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];
        if let Some(after) = rest.strip_prefix("%%{") {
            out.push_str("%{");
            rest = after;
            continue;
        }
        if let Some((name, after)) = parse_pattern(rest) {
            match lookup(name) {
                Some(value) => out.push_str(&value),
                None => {
                    let _ = write!(out, "%{{{name}}}");
                }
            }
            rest = after;
            continue;
        }
        out.push('%');
        rest = &rest[1..];
    }
    out.push_str(rest);
    out
}

/// Splits `%{name}rest` into `name` and `rest`.
fn parse_pattern(s: &str) -> Option<(&str, &str)> {
    let body = s.strip_prefix("%{")?;
    let end = body.find('}')?;
    let name = &body[..end];
    (!name.is_empty() && name.bytes().all(|b| b.is_ascii_alphabetic()))
        .then(|| (name, &body[end + 1..]))
}
