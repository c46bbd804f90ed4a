//! Text measurement and grid sizing.
//!
//! Column widths are driven by real per-character advance widths, either
//! from a parsed TrueType face ([`FaceMetrics`]) or from the built-in
//! Helvetica tables ([`BuiltinMetrics`]) used when no system font is
//! available. Widths here decide layout; a character-count estimate
//! would drift from what the page actually draws.

use std::collections::HashMap;
use std::sync::Arc;

use ttf_parser::Face;

use crate::color::clamp_f32;
use crate::error::{Error, Result};
use crate::model::{ScheduleWeek, Slot};
use crate::style::{
    FontSizes, AVAIL_W, CELL_PAD_X, DAY_HEADER_GAP, DAY_W_EXTRA, DAY_W_FLOOR, DAY_W_MAX,
    DAY_W_MIN, SHIFT_W_EXTRA, SHIFT_W_FLOOR, SHIFT_W_MAX, SHIFT_W_MIN,
};

// ===== FONT METRICS =====

/// String width measurement for one face at a given size.
pub trait FontMetrics {
    /// Width of `text` in points at `size`.
    fn text_width(&self, text: &str, size: f32) -> f32;
}

/// Metrics backed by a parsed TrueType face.
///
/// The face bytes are shared (`Arc`) with the PDF embedder so discovery
/// reads each font file once. Parsing is re-done per call; `ttf-parser`
/// faces are zero-copy views and cheap to construct.
#[derive(Debug, Clone)]
pub struct FaceMetrics {
    data: Arc<Vec<u8>>,
    index: u32,
    units_per_em: f32,
}

impl FaceMetrics {
    /// Validates that the bytes parse as a face and captures its scale.
    pub fn new(data: Arc<Vec<u8>>, index: u32) -> Result<FaceMetrics> {
        let face = Face::parse(&data, index)
            .map_err(|e| Error::Font(format!("failed to parse font face: {:?}", e)))?;
        let units_per_em = face.units_per_em().max(1) as f32;
        Ok(FaceMetrics {
            data,
            index,
            units_per_em,
        })
    }

    /// The raw font file bytes.
    pub fn data(&self) -> &Arc<Vec<u8>> {
        &self.data
    }

    /// Face index within a collection file (0 for plain .ttf).
    pub fn index(&self) -> u32 {
        self.index
    }
}

impl FontMetrics for FaceMetrics {
    fn text_width(&self, text: &str, size: f32) -> f32 {
        // A face that parsed at construction can still fail here if the
        // bytes were swapped out; measurement failures read as width 0.
        let face = match Face::parse(&self.data, self.index) {
            Ok(f) => f,
            Err(_) => return 0.0,
        };
        let scale = size / self.units_per_em;
        let mut units = 0u64;
        for ch in text.chars() {
            if ch == '\n' {
                continue;
            }
            if let Some(glyph) = face.glyph_index(ch) {
                units += u64::from(face.glyph_hor_advance(glyph).unwrap_or(0));
            }
        }
        units as f32 * scale
    }
}

/// The two built-in fallback faces. These match the PDF Base-14 fonts
/// the writer falls back to, so measured and printed widths agree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinFace {
    /// Regular weight.
    Helvetica,
    /// Bold weight.
    HelveticaBold,
}

impl BuiltinFace {
    /// PostScript name used in the PDF font dictionary.
    pub fn postscript_name(self) -> &'static str {
        match self {
            BuiltinFace::Helvetica => "Helvetica",
            BuiltinFace::HelveticaBold => "Helvetica-Bold",
        }
    }
}

/// Metrics from the standard Adobe AFM width tables, in 1/1000 em.
#[derive(Debug, Clone, Copy)]
pub struct BuiltinMetrics {
    widths: &'static HashMap<char, f32>,
}

impl BuiltinMetrics {
    /// Width table for the given face.
    pub fn new(face: BuiltinFace) -> BuiltinMetrics {
        let widths: &'static HashMap<char, f32> = match face {
            BuiltinFace::Helvetica => &HELVETICA_WIDTHS,
            BuiltinFace::HelveticaBold => &HELVETICA_BOLD_WIDTHS,
        };
        BuiltinMetrics { widths }
    }

    /// Helvetica widths.
    pub fn regular() -> BuiltinMetrics {
        BuiltinMetrics::new(BuiltinFace::Helvetica)
    }

    /// Helvetica-Bold widths.
    pub fn bold() -> BuiltinMetrics {
        BuiltinMetrics::new(BuiltinFace::HelveticaBold)
    }

    /// Width of one character in 1/1000 em units; 500 for unknowns.
    pub fn char_width(&self, ch: char) -> f32 {
        *self.widths.get(&ch).unwrap_or(&500.0)
    }
}

impl FontMetrics for BuiltinMetrics {
    fn text_width(&self, text: &str, size: f32) -> f32 {
        let units: f32 = text
            .chars()
            .filter(|&c| c != '\n')
            .map(|c| self.char_width(c))
            .sum();
        units * size / 1000.0
    }
}

lazy_static::lazy_static! {
    static ref HELVETICA_WIDTHS: HashMap<char, f32> = helvetica_widths();
    static ref HELVETICA_BOLD_WIDTHS: HashMap<char, f32> = helvetica_bold_widths();
}

/// Adobe AFM widths for Helvetica, 1/1000 em.
fn helvetica_widths() -> HashMap<char, f32> {
    let mut w = HashMap::new();

    for (ch, units) in [
        (' ', 278.0),
        ('!', 278.0),
        ('"', 355.0),
        ('#', 556.0),
        ('$', 556.0),
        ('%', 889.0),
        ('&', 667.0),
        ('\'', 191.0),
        ('(', 333.0),
        (')', 333.0),
        ('*', 389.0),
        ('+', 584.0),
        (',', 278.0),
        ('-', 333.0),
        ('.', 278.0),
        ('/', 278.0),
        (':', 278.0),
        (';', 278.0),
        ('<', 584.0),
        ('=', 584.0),
        ('>', 584.0),
        ('?', 556.0),
        ('@', 1015.0),
        ('[', 278.0),
        ('\\', 278.0),
        (']', 278.0),
        ('^', 469.0),
        ('_', 556.0),
        ('`', 333.0),
        ('{', 334.0),
        ('|', 260.0),
        ('}', 334.0),
        ('~', 584.0),
    ] {
        w.insert(ch, units);
    }

    for digit in '0'..='9' {
        w.insert(digit, 556.0);
    }

    for (ch, units) in [
        ('A', 667.0),
        ('B', 667.0),
        ('C', 722.0),
        ('D', 722.0),
        ('E', 667.0),
        ('F', 611.0),
        ('G', 778.0),
        ('H', 722.0),
        ('I', 278.0),
        ('J', 500.0),
        ('K', 667.0),
        ('L', 556.0),
        ('M', 833.0),
        ('N', 722.0),
        ('O', 778.0),
        ('P', 667.0),
        ('Q', 778.0),
        ('R', 722.0),
        ('S', 667.0),
        ('T', 611.0),
        ('U', 722.0),
        ('V', 667.0),
        ('W', 944.0),
        ('X', 667.0),
        ('Y', 667.0),
        ('Z', 611.0),
    ] {
        w.insert(ch, units);
    }

    for (ch, units) in [
        ('a', 556.0),
        ('b', 556.0),
        ('c', 500.0),
        ('d', 556.0),
        ('e', 556.0),
        ('f', 278.0),
        ('g', 556.0),
        ('h', 556.0),
        ('i', 222.0),
        ('j', 222.0),
        ('k', 500.0),
        ('l', 222.0),
        ('m', 833.0),
        ('n', 556.0),
        ('o', 556.0),
        ('p', 556.0),
        ('q', 556.0),
        ('r', 333.0),
        ('s', 500.0),
        ('t', 278.0),
        ('u', 556.0),
        ('v', 500.0),
        ('w', 722.0),
        ('x', 500.0),
        ('y', 500.0),
        ('z', 500.0),
    ] {
        w.insert(ch, units);
    }

    // Non-ASCII characters the schedule actually prints.
    w.insert('\u{00A0}', 278.0); // no-break space
    w.insert('\u{2013}', 556.0); // en dash
    w.insert('\u{2014}', 1000.0);
    w.insert('\u{2018}', 222.0);
    w.insert('\u{2019}', 222.0);
    w.insert('\u{201C}', 333.0);
    w.insert('\u{201D}', 333.0);
    w.insert('\u{2022}', 350.0);
    w
}

/// Adobe AFM widths for Helvetica-Bold, 1/1000 em.
fn helvetica_bold_widths() -> HashMap<char, f32> {
    let mut w = HashMap::new();

    for (ch, units) in [
        (' ', 278.0),
        ('!', 333.0),
        ('"', 474.0),
        ('#', 556.0),
        ('$', 556.0),
        ('%', 889.0),
        ('&', 722.0),
        ('\'', 238.0),
        ('(', 333.0),
        (')', 333.0),
        ('*', 389.0),
        ('+', 584.0),
        (',', 278.0),
        ('-', 333.0),
        ('.', 278.0),
        ('/', 278.0),
        (':', 333.0),
        (';', 333.0),
        ('<', 584.0),
        ('=', 584.0),
        ('>', 584.0),
        ('?', 611.0),
        ('@', 975.0),
        ('[', 333.0),
        ('\\', 278.0),
        (']', 333.0),
        ('^', 584.0),
        ('_', 556.0),
        ('`', 333.0),
        ('{', 389.0),
        ('|', 280.0),
        ('}', 389.0),
        ('~', 584.0),
    ] {
        w.insert(ch, units);
    }

    for digit in '0'..='9' {
        w.insert(digit, 556.0);
    }

    for (ch, units) in [
        ('A', 722.0),
        ('B', 722.0),
        ('C', 722.0),
        ('D', 722.0),
        ('E', 667.0),
        ('F', 611.0),
        ('G', 778.0),
        ('H', 722.0),
        ('I', 278.0),
        ('J', 556.0),
        ('K', 722.0),
        ('L', 611.0),
        ('M', 833.0),
        ('N', 722.0),
        ('O', 778.0),
        ('P', 667.0),
        ('Q', 778.0),
        ('R', 722.0),
        ('S', 667.0),
        ('T', 611.0),
        ('U', 722.0),
        ('V', 667.0),
        ('W', 944.0),
        ('X', 667.0),
        ('Y', 667.0),
        ('Z', 611.0),
    ] {
        w.insert(ch, units);
    }

    for (ch, units) in [
        ('a', 556.0),
        ('b', 611.0),
        ('c', 556.0),
        ('d', 611.0),
        ('e', 556.0),
        ('f', 333.0),
        ('g', 611.0),
        ('h', 611.0),
        ('i', 278.0),
        ('j', 278.0),
        ('k', 556.0),
        ('l', 278.0),
        ('m', 889.0),
        ('n', 611.0),
        ('o', 611.0),
        ('p', 611.0),
        ('q', 611.0),
        ('r', 389.0),
        ('s', 556.0),
        ('t', 333.0),
        ('u', 611.0),
        ('v', 556.0),
        ('w', 778.0),
        ('x', 556.0),
        ('y', 556.0),
        ('z', 500.0),
    ] {
        w.insert(ch, units);
    }

    w.insert('\u{00A0}', 278.0);
    w.insert('\u{2013}', 556.0);
    w.insert('\u{2014}', 1000.0);
    w.insert('\u{2018}', 278.0);
    w.insert('\u{2019}', 278.0);
    w.insert('\u{201C}', 500.0);
    w.insert('\u{201D}', 500.0);
    w.insert('\u{2022}', 350.0);
    w
}

// ===== LABELS & VISIBILITY =====

/// Display cleanup applied to slot labels before measurement and
/// rendering.
pub fn clean_label(label: &str) -> &str {
    match label.trim() {
        "PH*/AL@" => "PH/AL",
        "Off Day" => "Rest Day",
        other => other,
    }
}

/// Whether a slot row has at least one assignment anywhere in the week.
/// Rows that fail this are dropped from the grid entirely.
pub fn slot_has_assignments(week: &ScheduleWeek, slot: &Slot) -> bool {
    week.cells
        .get(&slot.key)
        .map(|days| days.values().any(|cell| !cell.staff.is_empty()))
        .unwrap_or(false)
}

// ===== LINE WRAPPING =====

/// Greedy word wrap at `max_w` points, matching how the cell paragraphs
/// re-flow when the fit pass narrows a column below its natural width.
///
/// Breaks only at regular spaces (no-break spaces bind); when
/// `split_long_words` is set, a single word wider than the line splits
/// at character boundaries.
pub fn wrap_line(
    text: &str,
    max_w: f32,
    metrics: &dyn FontMetrics,
    size: f32,
    split_long_words: bool,
) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    if max_w <= 0.0 || metrics.text_width(text, size) <= max_w + 1e-4 {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split(' ') {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", current, word)
        };
        if metrics.text_width(&candidate, size) <= max_w + 1e-4 {
            current = candidate;
            continue;
        }
        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if split_long_words && metrics.text_width(word, size) > max_w + 1e-4 {
            let mut piece = String::new();
            for ch in word.chars() {
                let mut next = piece.clone();
                next.push(ch);
                if !piece.is_empty() && metrics.text_width(&next, size) > max_w + 1e-4 {
                    lines.push(piece);
                    piece = ch.to_string();
                } else {
                    piece = next;
                }
            }
            current = piece;
        } else {
            current = word.to_string();
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

// ===== COLUMN SIZING =====

/// Resolved table column widths: the shift column plus seven equal day
/// columns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnWidths {
    /// Shift label column width, points.
    pub shift_w: f32,
    /// Width of each of the seven day columns, points.
    pub day_w: f32,
}

impl ColumnWidths {
    /// Total table width.
    pub fn table_width(&self) -> f32 {
        self.shift_w + 7.0 * self.day_w
    }
}

/// Sizes the columns from the content that will actually print.
///
/// `shift_labels` are the cleaned labels of visible rows,
/// `day_headers` the (day, date) header pairs, `body_lines` every body
/// cell line exactly as it will render (PT time suffix included, blocked
/// cells excluded). If the natural total exceeds the page, the day
/// column narrows to fit, then both columns scale uniformly; the floors
/// only bite in degenerate geometries.
pub fn column_widths(
    shift_labels: &[&str],
    day_headers: &[(String, String); 7],
    body_lines: &[String],
    sizes: &FontSizes,
    bold: &dyn FontMetrics,
    body: &dyn FontMetrics,
) -> ColumnWidths {
    let mut shift_max = bold.text_width("Shift", sizes.th);
    for label in shift_labels {
        let w = bold.text_width(label, sizes.th);
        if w > shift_max {
            shift_max = w;
        }
    }
    let mut shift_w = clamp_f32(
        shift_max + CELL_PAD_X * 2.0 + SHIFT_W_EXTRA,
        SHIFT_W_MIN,
        SHIFT_W_MAX,
    );

    let mut day_max = 0.0f32;
    for (day, date) in day_headers {
        let need =
            bold.text_width(day, sizes.th) + body.text_width(date, sizes.subtext) + DAY_HEADER_GAP;
        if need > day_max {
            day_max = need;
        }
    }
    for line in body_lines {
        let w = body.text_width(line, sizes.td);
        if w > day_max {
            day_max = w;
        }
    }
    let mut day_w = clamp_f32(day_max + CELL_PAD_X * 2.0 + DAY_W_EXTRA, DAY_W_MIN, DAY_W_MAX);

    let mut table_width = shift_w + day_w * 7.0;
    if table_width > AVAIL_W {
        let day_fit = (AVAIL_W - shift_w) / 7.0;
        if day_fit < DAY_W_MIN {
            day_w = day_fit.max(DAY_W_FLOOR);
        } else {
            day_w = day_w.min(day_fit);
        }

        table_width = shift_w + day_w * 7.0;
        if table_width > AVAIL_W {
            let scale = AVAIL_W / table_width.max(1.0);
            shift_w = (shift_w * scale).max(SHIFT_W_FLOOR);
            day_w = (day_w * scale).max(DAY_W_FLOOR);
        }
    }

    log::debug!(
        "columns: shift_w={:.2} day_w={:.2} total={:.2} avail={:.2}",
        shift_w,
        day_w,
        shift_w + day_w * 7.0,
        AVAIL_W
    );

    ColumnWidths { shift_w, day_w }
}
