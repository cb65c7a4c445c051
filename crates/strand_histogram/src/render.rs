//! Plain-text histogram rendering for terminals.

#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

use crate::histogram::Histogram;
use crate::overlay::NormalOverlay;
use std::fmt::Write;

/// Default bar width in characters.
pub const DEFAULT_WIDTH: usize = 60;

/// Renders one row per bin: the bin range, a `#` bar scaled to the tallest
/// bin and the bin population. When an overlay is given, the expected
/// population at the bin center is marked with `*`.
pub fn render_text(histogram: &Histogram, overlay: Option<&NormalOverlay>, width: usize) -> String {
    let width = width.max(1);
    let expected_peak = overlay.map_or(0.0, |o| {
        histogram
            .iter()
            .map(|bin| o.expected_at((bin.start + bin.end) / 2.0))
            .fold(0.0, f64::max)
    });
    let peak = (histogram.peak() as f64).max(expected_peak).max(1.0);
    let cells = |value: f64| ((value / peak) * width as f64).round() as usize;

    let mut out = String::new();
    for bin in histogram.iter() {
        let mut bar = vec![' '; width];
        for cell in bar.iter_mut().take(cells(bin.strands as f64)) {
            *cell = '#';
        }
        if let Some(o) = overlay {
            let mark = cells(o.expected_at((bin.start + bin.end) / 2.0)).min(width - 1);
            bar[mark] = '*';
        }
        let bar: String = bar.into_iter().collect();
        let _ = writeln!(
            out,
            "{:>10.1} - {:>10.1} | {} {}",
            bin.start, bin.end, bar, bin.strands
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bars_scale_to_tallest_bin() {
        let hist = Histogram::from_counts(&[1, 1, 2, 3, 3, 3], 2).unwrap();
        let text = render_text(&hist, None, 8);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "       1.0 -        2.0 | ####     2");
        assert_eq!(lines[1], "       2.0 -        3.0 | ######## 4");
    }

    #[test]
    fn overlay_marks_each_row() {
        let counts = [2, 4, 4, 4, 5, 5, 7, 9];
        let hist = Histogram::from_counts(&counts, 4).unwrap();
        let overlay = NormalOverlay::fit(&counts, &hist, 10).unwrap();
        let text = render_text(&hist, Some(&overlay), 20);
        assert_eq!(text.lines().count(), 4);
        assert!(text.lines().all(|line| line.contains('*')));
    }
}
