//! On-image length measurement helpers

use serde::{Deserialize, Serialize};

/// Unit a measured pixel length can be reported in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeasureUnit {
    Pixels,
    Inches,
    Centimeters,
}

/// Converts a length measured in full-resolution image pixels to the
/// requested unit, given the scan DPI of the source image.
pub fn measure(length_in_pixels: f64, unit: MeasureUnit, dpi: f64) -> f64 {
    match unit {
        MeasureUnit::Pixels => length_in_pixels,
        MeasureUnit::Inches => length_in_pixels / dpi,
        MeasureUnit::Centimeters => length_in_pixels / dpi * 2.54,
    }
}
