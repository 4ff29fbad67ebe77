//! OOXML unit conversions.
//!
//! All geometry in a presentation archive is expressed in English Metric
//! Units (914,400 per inch). At the 96 DPI reference used for on-screen
//! rendering this works out to exactly 9,525 EMU per pixel. Font sizes are
//! carried in points (72 per inch).
//!
//! These functions perform no rounding; callers that need whole pixels
//! round at the rendering edge, where sub-pixel values are still useful
//! for proportional scaling.

/// English Metric Units per inch.
pub const EMU_PER_INCH: f64 = 914_400.0;

/// English Metric Units per pixel at the 96 DPI reference.
pub const EMU_PER_PIXEL: f64 = 9_525.0;

/// Convert an EMU length to CSS pixels at the 96 DPI reference.
pub fn emu_to_px(emu: u64) -> f64 {
    emu as f64 / EMU_PER_PIXEL
}

/// Convert a point-based font size to CSS pixels (96 px per 72 pt).
pub fn pt_to_px(pt: f64) -> f64 {
    pt * 96.0 / 72.0
}
