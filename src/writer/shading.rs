//! Banded gradient painting.
//!
//! The header card's vertical gradient is painted as a stack of thin
//! horizontal bands inside a rounded clip rather than a PDF shading
//! dictionary. Bands keep every rasterizer on the exact same color
//! ramp, including the in-process one, and the blend math matches
//! [`Color::blend`] so the theme's derived hex colors line up with
//! what lands on the page.

use crate::color::Color;
use crate::writer::content::ContentBuilder;

/// Color of band `i` of `steps`, interpolating bottom to top.
pub fn band_color(bottom: Color, top: Color, i: u32, steps: u32) -> Color {
    let denom = steps.saturating_sub(1).max(1);
    bottom.blend(top, f64::from(i) / f64::from(denom))
}

/// Paint a vertical gradient inside a rounded rectangle.
///
/// Bands are laid bottom to top. Each band is drawn slightly taller
/// than its slot so adjacent bands overlap and no hairline seams show
/// at fractional device pixels; the rounded clip trims the overshoot
/// at the top edge.
#[allow(clippy::too_many_arguments)]
pub fn paint_vertical_gradient(
    builder: &mut ContentBuilder,
    x: f32,
    y: f32,
    w: f32,
    h: f32,
    radius: f32,
    bottom: Color,
    top: Color,
    steps: u32,
) {
    if w <= 0.0 || h <= 0.0 || steps == 0 {
        return;
    }

    builder.save_state();
    builder.rounded_rect(x, y, w, h, radius).clip();

    let step_h = h / steps as f32;
    for i in 0..steps {
        let band_y = y + i as f32 * step_h;
        builder.fill_color(band_color(bottom, top, i, steps));
        builder.rect(x, band_y, w, step_h + 0.8).fill();
    }

    builder.restore_state();
}
