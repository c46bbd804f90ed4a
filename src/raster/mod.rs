//! Rasterization of the schedule PDF into a shareable PNG.
//!
//! Backends are tried in a fixed order until one produces pixels: the
//! in-process tiny-skia renderer when the `rendering` feature is on,
//! then Ghostscript, then pdftoppm. The page renders supersampled,
//! gets its blank margins trimmed, and is resampled down to the
//! requested density before PNG encoding.

pub mod reader;

mod external;
mod post;
#[cfg(feature = "rendering")]
mod skia;

use crate::error::{Error, Result};
use crate::style::{PAGE_H, PAGE_W};

/// Lowest density worth printing a schedule at.
pub const MIN_DPI: u32 = 200;
/// Highest density a caller can request.
pub const MAX_DPI: u32 = 900;
/// Density used when the caller passes 0.
pub const DEFAULT_DPI: u32 = 450;

/// Render above the target, then filter down.
const SUPERSAMPLE: f64 = 1.25;
const RENDER_DPI_CEILING: u32 = 1200;
/// Upper bound on rendered pixels, keeping memory in check.
const PIXEL_CAP: u64 = 26_000_000;

/// Raw RGB8 pixels, row major.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Packed RGB bytes, `3 * width * height` long.
    pub pixels: Vec<u8>,
}

/// One way of turning the PDF bytes into pixels.
pub(crate) trait RasterBackend {
    fn name(&self) -> &'static str;
    /// Whether this backend can run on the current host.
    fn available(&self) -> bool;
    fn render(&self, pdf: &[u8], dpi: u32) -> Result<RasterImage>;
}

/// Render the first page of a schedule document to PNG bytes.
///
/// `dpi` is clamped to [`MIN_DPI`]..=[`MAX_DPI`]; 0 selects
/// [`DEFAULT_DPI`]. The PNG carries the effective density in a pHYs
/// chunk. Fails with [`Error::RasterExhausted`] only after every
/// backend has been tried.
pub fn rasterize_pdf(pdf: &[u8], dpi: u32) -> Result<Vec<u8>> {
    let dpi = effective_dpi(dpi);
    let render_dpi = render_dpi_for(dpi);
    log::debug!("rasterizing at {} dpi (render pass at {})", dpi, render_dpi);

    let image = try_chain(&backend_chain(), pdf, render_dpi)?;
    let image = post::trim_vertical(image, render_dpi);
    let image = post::downsample(image, dpi, render_dpi)?;
    post::encode_png(&image, dpi.min(render_dpi))
}

fn effective_dpi(dpi: u32) -> u32 {
    if dpi == 0 {
        DEFAULT_DPI
    } else {
        dpi.clamp(MIN_DPI, MAX_DPI)
    }
}

/// Pick the density for the render pass.
///
/// Supersampling sharpens hairlines and small glyphs once the result
/// is filtered back down. The pixel budget caps the pass for large
/// requests; the page area is fixed, so the cap works out to one
/// density for every request above it.
fn render_dpi_for(dpi: u32) -> u32 {
    let supersampled = (f64::from(dpi) * SUPERSAMPLE) as u32;
    let mut render_dpi = supersampled.clamp(MIN_DPI, RENDER_DPI_CEILING);

    let area = f64::from(PAGE_W) * f64::from(PAGE_H);
    let cap_dpi = (72.0 * (PIXEL_CAP as f64 / area).sqrt()) as u32;
    if render_dpi > cap_dpi {
        log::debug!(
            "render pass {} dpi capped to {} by the pixel budget",
            render_dpi,
            cap_dpi
        );
        render_dpi = cap_dpi.max(MIN_DPI);
    }
    render_dpi
}

fn backend_chain() -> Vec<Box<dyn RasterBackend>> {
    let mut chain: Vec<Box<dyn RasterBackend>> = Vec::new();
    #[cfg(feature = "rendering")]
    chain.push(Box::new(skia::SkiaBackend));
    chain.push(Box::new(external::Ghostscript));
    chain.push(Box::new(external::Pdftoppm));
    chain
}

/// Try each backend once, keeping the last failure for the report.
fn try_chain(backends: &[Box<dyn RasterBackend>], pdf: &[u8], dpi: u32) -> Result<RasterImage> {
    let mut last = (
        "none".to_string(),
        "no raster backend is compiled in or installed".to_string(),
    );
    for backend in backends {
        if !backend.available() {
            log::debug!("raster backend {} unavailable, skipping", backend.name());
            last = (
                backend.name().to_string(),
                "not available on this host".to_string(),
            );
            continue;
        }
        match backend.render(pdf, dpi) {
            Ok(image) => {
                log::debug!(
                    "raster backend {} produced {}x{}",
                    backend.name(),
                    image.width,
                    image.height
                );
                return Ok(image);
            }
            Err(err) => {
                log::warn!("raster backend {} failed: {}", backend.name(), err);
                let message = match err {
                    Error::Raster { message, .. } => message,
                    other => other.to_string(),
                };
                last = (backend.name().to_string(), message);
            }
        }
    }
    Err(Error::RasterExhausted {
        backend: last.0,
        message: last.1,
    })
}
