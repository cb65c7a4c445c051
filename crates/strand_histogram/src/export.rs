//! CSV export of histograms and overlay curves.

use crate::error::Result;
use crate::histogram::Histogram;
use crate::overlay::NormalOverlay;
use serde::Serialize;
use std::fs::File;
use std::io;
use std::path::Path;

#[derive(Serialize)]
struct HistogramRow {
    bin_start: f64,
    bin_end: f64,
    strands: u64,
}

/// Writes `bin_start,bin_end,strands` rows.
///
/// # Errors
///
/// Returns an error if serialization or the underlying writer fails.
pub fn write_histogram_csv<W: io::Write>(histogram: &Histogram, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for bin in histogram.iter() {
        wtr.serialize(HistogramRow {
            bin_start: bin.start,
            bin_end: bin.end,
            strands: bin.strands,
        })?;
    }
    wtr.flush()?;
    Ok(())
}

/// Writes `x,expected_strands` rows.
///
/// # Errors
///
/// Returns an error if serialization or the underlying writer fails.
pub fn write_overlay_csv<W: io::Write>(overlay: &NormalOverlay, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for point in &overlay.points {
        wtr.serialize(point)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Writes the histogram CSV to a file.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn save_histogram_csv(histogram: &Histogram, path: impl AsRef<Path>) -> Result<()> {
    let file = File::create(path.as_ref())?;
    write_histogram_csv(histogram, file)
}

/// Writes the overlay CSV to a file.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn save_overlay_csv(overlay: &NormalOverlay, path: impl AsRef<Path>) -> Result<()> {
    let file = File::create(path.as_ref())?;
    write_overlay_csv(overlay, file)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn histogram_csv_has_header_and_rows() {
        let hist = Histogram::from_counts(&[1, 1, 2, 3, 3, 3], 2).unwrap();
        let mut buf = Vec::new();
        write_histogram_csv(&hist, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "bin_start,bin_end,strands\n1.0,2.0,2\n2.0,3.0,4\n");
    }

    #[test]
    fn overlay_csv_has_one_row_per_point() {
        let counts = [2, 4, 4, 4, 5, 5, 7, 9];
        let hist = Histogram::from_counts(&counts, 4).unwrap();
        let overlay = NormalOverlay::fit(&counts, &hist, 5).unwrap();
        let mut buf = Vec::new();
        write_overlay_csv(&overlay, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        insta::assert_snapshot!(lines.next().unwrap(), @"x,expected_strands");
        assert_eq!(lines.count(), 5);
    }
}
