//! In-process raster backend built on tiny-skia.
//!
//! Replays the parsed content stream of a schedule page against a
//! pixmap: rectangle and Bezier paths, the rounded-corner clip, the
//! shadow alpha state, and glyph outlines pulled from the embedded
//! font program (or a system face standing in for a Base-14 font).

use std::collections::HashMap;

use tiny_skia::{
    Color, FillRule, Mask, Paint, Path, PathBuilder, Pixmap, Rect, Stroke, Transform,
};
use ttf_parser::{Face, GlyphId};

use crate::error::{Error, Result};
use crate::raster::reader::{self, PageFont, PageOp, ParsedPage};
use crate::raster::{RasterBackend, RasterImage};
use crate::writer::fonts::{decode_win_ansi, system_face_bytes};

pub(crate) struct SkiaBackend;

impl RasterBackend for SkiaBackend {
    fn name(&self) -> &'static str {
        "tiny-skia"
    }

    fn available(&self) -> bool {
        true
    }

    fn render(&self, pdf: &[u8], dpi: u32) -> Result<RasterImage> {
        let page = reader::read_page(pdf)?;
        let ops = reader::parse_content(&page.content)?;

        let scale = dpi as f32 / 72.0;
        let width = (page.width * scale).ceil().max(1.0) as u32;
        let height = (page.height * scale).ceil().max(1.0) as u32;
        let mut pixmap = Pixmap::new(width, height).ok_or_else(|| Error::Raster {
            backend: self.name().to_string(),
            message: format!("cannot allocate a {}x{} pixmap", width, height),
        })?;
        pixmap.fill(Color::WHITE);

        // Flip the PDF's bottom-left origin to raster coordinates.
        let device = Transform::from_row(scale, 0.0, 0.0, -scale, 0.0, page.height * scale);

        let fonts = load_fonts(&page);
        replay(&ops, &page, &fonts, &mut pixmap, device);

        Ok(RasterImage {
            width: pixmap.width(),
            height: pixmap.height(),
            pixels: to_rgb(&pixmap),
        })
    }
}

// ===== FONT LOADING =====

enum LoadedFont {
    /// Raw font program from the document itself.
    Embedded(Vec<u8>),
    /// System face bytes and collection index for a Base-14 name.
    System(Vec<u8>, u32),
    Missing,
}

/// Resolve every page font to face bytes up front.
///
/// Base-14 fonts carry no program, so their text falls back to a host
/// face with matching weight. Helvetica first, then its two metric
/// stand-ins, then any sans at all.
fn load_fonts(page: &ParsedPage) -> HashMap<String, LoadedFont> {
    page.fonts
        .iter()
        .map(|(resource, font)| {
            let loaded = match font {
                PageFont::Embedded { font_file } => LoadedFont::Embedded(font_file.clone()),
                PageFont::Simple { base_font } => {
                    let weight = if base_font.contains("Bold") {
                        fontdb::Weight::BOLD
                    } else {
                        fontdb::Weight::NORMAL
                    };
                    let families = [
                        fontdb::Family::Name("Helvetica"),
                        fontdb::Family::Name("Liberation Sans"),
                        fontdb::Family::Name("DejaVu Sans"),
                        fontdb::Family::SansSerif,
                    ];
                    match system_face_bytes(&families, weight) {
                        Some((bytes, index)) => LoadedFont::System(bytes, index),
                        None => {
                            log::warn!(
                                "no system face stands in for {}; text in /{} will not draw",
                                base_font,
                                resource
                            );
                            LoadedFont::Missing
                        }
                    }
                }
            };
            (resource.clone(), loaded)
        })
        .collect()
}

fn face_bytes_for<'a>(
    fonts: &'a HashMap<String, LoadedFont>,
    name: Option<&str>,
) -> Option<(&'a [u8], u32)> {
    match fonts.get(name?)? {
        LoadedFont::Embedded(data) => Some((data, 0)),
        LoadedFont::System(data, index) => Some((data, *index)),
        LoadedFont::Missing => None,
    }
}

// ===== REPLAY =====

/// Graphics state mirrored from the content stream.
#[derive(Clone)]
struct RasterState {
    fill_color: (f32, f32, f32),
    stroke_color: (f32, f32, f32),
    line_width: f32,
    fill_alpha: f32,
    stroke_alpha: f32,
    font: Option<String>,
    font_size: f32,
    /// Text matrix `(a, b, c, d, e, f)`.
    tm: (f32, f32, f32, f32, f32, f32),
    clip: Option<Mask>,
}

impl Default for RasterState {
    fn default() -> RasterState {
        RasterState {
            fill_color: (0.0, 0.0, 0.0),
            stroke_color: (0.0, 0.0, 0.0),
            line_width: 1.0,
            fill_alpha: 1.0,
            stroke_alpha: 1.0,
            font: None,
            font_size: 0.0,
            tm: (1.0, 0.0, 0.0, 1.0, 0.0, 0.0),
            clip: None,
        }
    }
}

fn replay(
    ops: &[PageOp],
    page: &ParsedPage,
    fonts: &HashMap<String, LoadedFont>,
    pixmap: &mut Pixmap,
    device: Transform,
) {
    let mut state = RasterState::default();
    let mut stack: Vec<RasterState> = Vec::new();
    let mut path = PathBuilder::new();
    let mut pending_clip = false;

    for op in ops {
        match op {
            PageOp::Save => stack.push(state.clone()),
            PageOp::Restore => {
                if let Some(saved) = stack.pop() {
                    state = saved;
                }
            }
            PageOp::LineWidth(w) => state.line_width = *w,
            PageOp::FillColor(r, g, b) => state.fill_color = (*r, *g, *b),
            PageOp::StrokeColor(r, g, b) => state.stroke_color = (*r, *g, *b),
            PageOp::Rect(x, y, w, h) => {
                if let Some(rect) = Rect::from_xywh(*x, *y, *w, *h) {
                    path.push_rect(rect);
                }
            }
            PageOp::MoveTo(x, y) => path.move_to(*x, *y),
            PageOp::LineTo(x, y) => path.line_to(*x, *y),
            PageOp::CurveTo(x1, y1, x2, y2, x3, y3) => {
                path.cubic_to(*x1, *y1, *x2, *y2, *x3, *y3)
            }
            PageOp::ClosePath => path.close(),
            PageOp::Fill => {
                if let Some(p) = take_path(&mut path) {
                    let paint = rgb_paint(state.fill_color, state.fill_alpha);
                    pixmap.fill_path(&p, &paint, FillRule::Winding, device, state.clip.as_ref());
                    finish_clip(&mut pending_clip, &mut state, &p, pixmap, device);
                }
            }
            PageOp::Stroke => {
                if let Some(p) = take_path(&mut path) {
                    stroke(pixmap, &state, &p, device);
                    finish_clip(&mut pending_clip, &mut state, &p, pixmap, device);
                }
            }
            PageOp::FillStroke => {
                if let Some(p) = take_path(&mut path) {
                    let paint = rgb_paint(state.fill_color, state.fill_alpha);
                    pixmap.fill_path(&p, &paint, FillRule::Winding, device, state.clip.as_ref());
                    stroke(pixmap, &state, &p, device);
                    finish_clip(&mut pending_clip, &mut state, &p, pixmap, device);
                }
            }
            PageOp::Clip => pending_clip = true,
            PageOp::EndPath => {
                if let Some(p) = take_path(&mut path) {
                    finish_clip(&mut pending_clip, &mut state, &p, pixmap, device);
                }
                pending_clip = false;
            }
            PageOp::ExtGState(name) => {
                if let Some(alpha) = page.fill_alpha.get(name) {
                    state.fill_alpha = *alpha;
                }
            }
            PageOp::BeginText => state.tm = (1.0, 0.0, 0.0, 1.0, 0.0, 0.0),
            PageOp::EndText => {}
            PageOp::SetFont(name, size) => {
                state.font = Some(name.clone());
                state.font_size = *size;
            }
            PageOp::TextMatrix(a, b, c, d, e, f) => state.tm = (*a, *b, *c, *d, *e, *f),
            PageOp::ShowText(bytes) => {
                if let Some((data, index)) = face_bytes_for(fonts, state.font.as_deref()) {
                    match Face::parse(data, index) {
                        Ok(face) => {
                            let text = decode_win_ansi(bytes);
                            let glyphs: Vec<Option<GlyphId>> =
                                text.chars().map(|ch| face.glyph_index(ch)).collect();
                            draw_glyphs(pixmap, device, &state, &face, &glyphs);
                        }
                        Err(e) => log::warn!("stand-in face failed to parse: {}", e),
                    }
                }
            }
            PageOp::ShowHex(bytes) => {
                if let Some((data, index)) = face_bytes_for(fonts, state.font.as_deref()) {
                    match Face::parse(data, index) {
                        Ok(face) => {
                            let glyphs: Vec<Option<GlyphId>> = bytes
                                .chunks_exact(2)
                                .map(|pair| Some(GlyphId(u16::from_be_bytes([pair[0], pair[1]]))))
                                .collect();
                            draw_glyphs(pixmap, device, &state, &face, &glyphs);
                        }
                        Err(e) => log::warn!("embedded font failed to parse: {}", e),
                    }
                }
            }
        }
    }
}

fn take_path(builder: &mut PathBuilder) -> Option<Path> {
    std::mem::replace(builder, PathBuilder::new()).finish()
}

fn stroke(pixmap: &mut Pixmap, state: &RasterState, path: &Path, device: Transform) {
    let paint = rgb_paint(state.stroke_color, state.stroke_alpha);
    let stroke = Stroke {
        width: state.line_width,
        ..Stroke::default()
    };
    pixmap.stroke_path(path, &paint, &stroke, device, state.clip.as_ref());
}

/// Fold the just-painted path into the clip mask when `W` is pending.
fn finish_clip(
    pending: &mut bool,
    state: &mut RasterState,
    path: &Path,
    pixmap: &Pixmap,
    device: Transform,
) {
    if !*pending {
        return;
    }
    *pending = false;
    if let Some(mask) = state.clip.as_mut() {
        mask.intersect_path(path, FillRule::Winding, true, device);
    } else if let Some(mut mask) = Mask::new(pixmap.width(), pixmap.height()) {
        mask.fill_path(path, FillRule::Winding, true, device);
        state.clip = Some(mask);
    }
}

fn rgb_paint(rgb: (f32, f32, f32), alpha: f32) -> Paint<'static> {
    let mut paint = Paint::default();
    let color = Color::from_rgba(
        rgb.0.clamp(0.0, 1.0),
        rgb.1.clamp(0.0, 1.0),
        rgb.2.clamp(0.0, 1.0),
        alpha.clamp(0.0, 1.0),
    )
    .unwrap_or(Color::BLACK);
    paint.set_color(color);
    paint.anti_alias = true;
    paint
}

/// Draw one glyph run at the current text matrix, advancing a pen
/// along x by each glyph's horizontal advance.
fn draw_glyphs(
    pixmap: &mut Pixmap,
    device: Transform,
    state: &RasterState,
    face: &Face,
    glyphs: &[Option<GlyphId>],
) {
    let upem = f32::from(face.units_per_em().max(1));
    let scale = state.font_size / upem;
    let paint = rgb_paint(state.fill_color, state.fill_alpha);
    let (a, b, c, d, e, f) = state.tm;
    let mut pen_x = e;

    for glyph in glyphs {
        let Some(gid) = *glyph else {
            pen_x += state.font_size * 0.5;
            continue;
        };
        let mut outline = OutlinePath {
            builder: PathBuilder::new(),
            scale,
        };
        if face.outline_glyph(gid, &mut outline).is_some() {
            if let Some(glyph_path) = outline.builder.finish() {
                let local = Transform::from_row(a, b, c, d, pen_x, f);
                pixmap.fill_path(
                    &glyph_path,
                    &paint,
                    FillRule::Winding,
                    device.pre_concat(local),
                    state.clip.as_ref(),
                );
            }
        }
        pen_x += face
            .glyph_hor_advance(gid)
            .map_or(state.font_size * 0.5, |adv| f32::from(adv) * scale);
    }
}

/// Builds a glyph outline scaled from font units to text space.
struct OutlinePath {
    builder: PathBuilder,
    scale: f32,
}

impl ttf_parser::OutlineBuilder for OutlinePath {
    fn move_to(&mut self, x: f32, y: f32) {
        self.builder.move_to(x * self.scale, y * self.scale);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.builder.line_to(x * self.scale, y * self.scale);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        self.builder.quad_to(
            x1 * self.scale,
            y1 * self.scale,
            x * self.scale,
            y * self.scale,
        );
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        self.builder.cubic_to(
            x1 * self.scale,
            y1 * self.scale,
            x2 * self.scale,
            y2 * self.scale,
            x * self.scale,
            y * self.scale,
        );
    }

    fn close(&mut self) {
        self.builder.close();
    }
}

fn to_rgb(pixmap: &Pixmap) -> Vec<u8> {
    let mut out = Vec::with_capacity(pixmap.pixels().len() * 3);
    for px in pixmap.pixels() {
        let c = px.demultiply();
        out.extend_from_slice(&[c.red(), c.green(), c.blue()]);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::compose;
    use crate::model::{seed_slots, Day, ScheduleWeek, StaffMap, Theme};
    use crate::style::StyleVariant;
    use crate::writer::fonts::FontPair;
    use crate::writer::page::write_document;
    use chrono::NaiveDate;

    fn sample_pdf() -> Vec<u8> {
        let slots = seed_slots();
        let mut week = ScheduleWeek::new(NaiveDate::from_ymd_opt(2026, 8, 24).unwrap());
        week.ensure_defaults(&slots);
        let ten_am = seed_slots().into_iter().find(|s| s.key == "10am").unwrap();
        week.assign_staff(&ten_am, Day::Mon, 1).unwrap();
        week.notes = "Bring keys.".to_string();
        let staff: StaffMap = [(1, "Alice".to_string())].into_iter().collect();
        let mut fonts = FontPair::builtin();
        let model = compose(
            &week,
            &slots,
            &staff,
            &Theme::default(),
            StyleVariant::Classic,
            &fonts.body,
            &fonts.bold,
        );
        write_document(&model, &mut fonts).unwrap()
    }

    #[test]
    fn test_render_page_dimensions_follow_dpi() {
        let pdf = sample_pdf();
        let image = SkiaBackend.render(&pdf, 72).unwrap();
        assert_eq!(image.width, 842);
        assert_eq!(image.height, 595);
        assert_eq!(image.pixels.len(), 842 * 595 * 3);

        let double = SkiaBackend.render(&pdf, 144).unwrap();
        assert_eq!(double.width, 1684);
        assert_eq!(double.height, 1190);
    }

    #[test]
    fn test_render_paints_page_content() {
        let pdf = sample_pdf();
        let image = SkiaBackend.render(&pdf, 96).unwrap();
        // The page margin stays white; the cards and grid do not.
        assert_eq!(&image.pixels[0..3], &[255, 255, 255]);
        assert!(image
            .pixels
            .chunks_exact(3)
            .any(|px| px != [255, 255, 255]));
    }

    #[test]
    fn test_render_is_deterministic() {
        let pdf = sample_pdf();
        let first = SkiaBackend.render(&pdf, 96).unwrap();
        let second = SkiaBackend.render(&pdf, 96).unwrap();
        assert_eq!(first.pixels, second.pixels);
    }

    #[test]
    fn test_replay_clip_masks_fill() {
        // Clip to the left half, then fill the whole square red.
        let content = b"q\n0 0 50 100 re\nW n\n1 0 0 rg\n0 0 100 100 re\nf\nQ\n";
        let ops = reader::parse_content(content).unwrap();
        let page = ParsedPage {
            width: 100.0,
            height: 100.0,
            content: content.to_vec(),
            fonts: HashMap::new(),
            fill_alpha: HashMap::new(),
        };
        let mut pixmap = Pixmap::new(100, 100).unwrap();
        pixmap.fill(Color::WHITE);
        let device = Transform::from_row(1.0, 0.0, 0.0, -1.0, 0.0, 100.0);
        replay(&ops, &page, &HashMap::new(), &mut pixmap, device);

        let pixels = to_rgb(&pixmap);
        let at = |x: usize, y: usize| {
            let i = (y * 100 + x) * 3;
            (pixels[i], pixels[i + 1], pixels[i + 2])
        };
        assert_eq!(at(10, 50), (255, 0, 0));
        assert_eq!(at(90, 50), (255, 255, 255));
    }

    #[test]
    fn test_replay_restore_drops_clip() {
        // Same clip, but restored before the fill.
        let content = b"q\n0 0 50 100 re\nW n\nQ\n0 0 1 rg\n0 0 100 100 re\nf\n";
        let ops = reader::parse_content(content).unwrap();
        let page = ParsedPage {
            width: 100.0,
            height: 100.0,
            content: content.to_vec(),
            fonts: HashMap::new(),
            fill_alpha: HashMap::new(),
        };
        let mut pixmap = Pixmap::new(100, 100).unwrap();
        pixmap.fill(Color::WHITE);
        let device = Transform::from_row(1.0, 0.0, 0.0, -1.0, 0.0, 100.0);
        replay(&ops, &page, &HashMap::new(), &mut pixmap, device);

        let pixels = to_rgb(&pixmap);
        let right = (50 * 100 + 90) * 3;
        assert_eq!(&pixels[right..right + 3], &[0, 0, 255]);
    }
}
