//! Post-processing between the raster backend and the final PNG.
//!
//! The page renders with generous top and bottom margins; the trim
//! pass cuts those down to a fixed padding so the PNG frames the
//! schedule. Supersampled output is then resampled to the requested
//! density and encoded with a pHYs chunk carrying it.

use image::imageops::{self, FilterType};
use image::{ImageBuffer, RgbImage};

use crate::error::{Error, Result};
use crate::raster::RasterImage;

/// Luma distance from white above which a pixel counts as content.
const CONTENT_THRESHOLD: u32 = 10;

// ===== TRIM =====

/// Cut blank leading and trailing rows down to a padding band.
///
/// Padding scales with density (16 rows at 150 dpi, floor of 8) so the
/// framed margin is the same physical size at any dpi. Columns are
/// never trimmed; the page width is part of the layout.
pub(crate) fn trim_vertical(image: RasterImage, render_dpi: u32) -> RasterImage {
    let height = image.height as usize;
    let Some(top) = (0..height).find(|&row| row_has_content(&image, row)) else {
        return image;
    };
    let bottom = (0..height)
        .rev()
        .find(|&row| row_has_content(&image, row))
        .unwrap_or(top);

    let pad = (16 * render_dpi / 150).max(8) as usize;
    let start = top.saturating_sub(pad);
    let end = (bottom + 1 + pad).min(height);
    if start == 0 && end == height {
        return image;
    }

    let row_bytes = image.width as usize * 3;
    RasterImage {
        width: image.width,
        height: (end - start) as u32,
        pixels: image.pixels[start * row_bytes..end * row_bytes].to_vec(),
    }
}

fn row_has_content(image: &RasterImage, row: usize) -> bool {
    let row_bytes = image.width as usize * 3;
    image.pixels[row * row_bytes..(row + 1) * row_bytes]
        .chunks_exact(3)
        .any(|px| luma_distance(px[0], px[1], px[2]) > CONTENT_THRESHOLD)
}

/// Integer ITU-R 601 luma of the distance from white.
fn luma_distance(r: u8, g: u8, b: u8) -> u32 {
    let r = 255 - u32::from(r);
    let g = 255 - u32::from(g);
    let b = 255 - u32::from(b);
    (299 * r + 587 * g + 114 * b) / 1000
}

// ===== DOWNSAMPLE =====

/// Resample a supersampled render down to the requested density.
pub(crate) fn downsample(
    image: RasterImage,
    target_dpi: u32,
    render_dpi: u32,
) -> Result<RasterImage> {
    if render_dpi <= target_dpi {
        return Ok(image);
    }
    let scale = |d: u32| {
        ((u64::from(d) * u64::from(target_dpi)) / u64::from(render_dpi)).max(1) as u32
    };
    let (new_w, new_h) = (scale(image.width), scale(image.height));

    let buffer: RgbImage = ImageBuffer::from_raw(image.width, image.height, image.pixels)
        .ok_or_else(|| Error::Image("raster buffer does not match its dimensions".to_string()))?;
    let resized = imageops::resize(&buffer, new_w, new_h, FilterType::Lanczos3);
    Ok(RasterImage {
        width: new_w,
        height: new_h,
        pixels: resized.into_raw(),
    })
}

// ===== PNG ENCODING =====

/// Encode RGB8 pixels as a PNG carrying its physical density.
pub(crate) fn encode_png(image: &RasterImage, dpi: u32) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut out, image.width, image.height);
        encoder.set_color(png::ColorType::Rgb);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder
            .write_header()
            .map_err(|e| Error::Image(format!("PNG header: {}", e)))?;
        writer
            .write_image_data(&image.pixels)
            .map_err(|e| Error::Image(format!("PNG data: {}", e)))?;
        writer
            .finish()
            .map_err(|e| Error::Image(format!("PNG finish: {}", e)))?;
    }
    insert_phys(out, dpi)
}

/// Splice a pHYs chunk directly after IHDR.
///
/// Viewers and chat clients read it to open the image at its printed
/// size instead of one screen pixel per raster pixel.
fn insert_phys(mut png: Vec<u8>, dpi: u32) -> Result<Vec<u8>> {
    // 8 signature bytes, then the 25-byte IHDR chunk.
    const INSERT_AT: usize = 33;
    if png.len() < INSERT_AT || &png[12..16] != b"IHDR" {
        return Err(Error::Image(
            "PNG encoder produced an unexpected layout".to_string(),
        ));
    }

    let ppm = (f64::from(dpi) / 0.0254).round() as u32;
    let mut chunk = Vec::with_capacity(21);
    chunk.extend_from_slice(&9u32.to_be_bytes());
    chunk.extend_from_slice(b"pHYs");
    chunk.extend_from_slice(&ppm.to_be_bytes());
    chunk.extend_from_slice(&ppm.to_be_bytes());
    chunk.push(1); // dots per metre
    let crc = crc32fast::hash(&chunk[4..]);
    chunk.extend_from_slice(&crc.to_be_bytes());

    png.splice(INSERT_AT..INSERT_AT, chunk);
    Ok(png)
}
