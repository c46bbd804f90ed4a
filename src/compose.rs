//! Document composer: turns a schedule week into a fully positioned
//! page model.
//!
//! The composer resolves everything the backends need up front: visible
//! rows, cell text lines (wrapped at final column widths), background
//! colors after precedence, card geometry and the vertical centering
//! offset. The PDF writer only translates the result into operators and
//! never re-measures, so both export paths and the tests see the exact
//! same layout.
//!
//! Coordinates are PDF-style: origin at the bottom-left of the page,
//! `y` grows upward, rectangles store their bottom edge.

use crate::color::Color;
use crate::measure::{
    clean_label, column_widths, slot_has_assignments, wrap_line, ColumnWidths, FontMetrics,
};
use crate::model::{Day, ScheduleWeek, Slot, StaffMap, Theme};
use crate::style::{
    FontSizes, Palette, StyleParams, StyleVariant, AVAIL_H, AVAIL_W, BODY_INDENT_SPACES,
    CARD_RADIUS, CARD_STROKE, CELL_PAD_X, DAY_HEADER_SPLIT, DIVIDER_LINE_W, DOC_TITLE,
    GRID_LINE_W, HEADER_BAND_PAD, HEADER_FRACTIONS, HEADER_LR_PAD, HEADER_TABLE_GAP, HEADER_VPAD,
    NOTES_BODY_LEADING, NOTES_BODY_SIZE, NOTES_GAP, NOTES_TITLE_LEADING, NOTES_TITLE_SIZE,
    PAGE_H, PAGE_MARGIN, PAGE_W, SHADOW_ALPHA, SHADOW_DX, SHADOW_DY, SHIFT_LEFT_PAD,
};

/// No-break space; the body cell indent that survives wrapping.
const NBSP: char = '\u{00A0}';

// ===== ROW CLASSIFICATION =====

/// Visual category of a row, decided from the slot key and label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    /// Ordinary hourly shift.
    Work,
    /// Part-time row.
    Pt,
    /// Rest day row.
    Off,
    /// Public holiday / annual leave row.
    Leave,
}

impl RowKind {
    /// Classifies a slot. Matching is case-insensitive and substring
    /// based, so renamed slots keep their tint as long as the words
    /// survive.
    pub fn classify(slot: &Slot) -> RowKind {
        let k = slot.key.trim().to_lowercase();
        let l = slot.label.trim().to_lowercase();
        if slot.is_pt() || l == "pt" || l.starts_with("pt ") {
            return RowKind::Pt;
        }
        if k.contains("off") || l.contains("off") {
            return RowKind::Off;
        }
        if k.contains("ph") || k.contains("al") || l.contains("ph") || l.contains("al") {
            return RowKind::Leave;
        }
        RowKind::Work
    }
}

// ===== PAGE MODEL =====

/// Which of the two document faces a run uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaceRole {
    /// Regular face.
    Body,
    /// Bold face.
    Bold,
}

/// A positioned single-line text run. `y` is the baseline.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    /// Left edge of the run.
    pub x: f32,
    /// Baseline.
    pub y: f32,
    /// The text, exactly as drawn.
    pub text: String,
    /// Which face draws it.
    pub face: FaceRole,
    /// Font size, points.
    pub size: f32,
    /// Fill color.
    pub color: Color,
}

/// An axis-aligned filled rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectFill {
    /// Left edge.
    pub x: f32,
    /// Bottom edge (page coordinates grow upward).
    pub y: f32,
    /// Width.
    pub w: f32,
    /// Height.
    pub h: f32,
    /// Fill color.
    pub color: Color,
}

/// A stroked straight line segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeLine {
    /// Start x.
    pub x1: f32,
    /// Start y.
    pub y1: f32,
    /// End x.
    pub x2: f32,
    /// End y.
    pub y2: f32,
    /// Stroke width.
    pub width: f32,
    /// Stroke color.
    pub color: Color,
}

/// A rounded rectangle used by the cards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundedRect {
    /// Left edge.
    pub x: f32,
    /// Bottom edge.
    pub y: f32,
    /// Width.
    pub w: f32,
    /// Height.
    pub h: f32,
    /// Corner radius.
    pub radius: f32,
}

/// The header card: a rounded rect filled with a vertical gradient,
/// dark at the bottom, lighter at the top.
#[derive(Debug, Clone, PartialEq)]
pub struct GradientCard {
    /// Card shape.
    pub rect: RoundedRect,
    /// Top gradient stop.
    pub top: Color,
    /// Bottom gradient stop.
    pub bottom: Color,
}

/// The table card: white rounded rect with a border stroke, drawn over
/// a soft black drop shadow.
#[derive(Debug, Clone, PartialEq)]
pub struct TableCard {
    /// Card shape.
    pub rect: RoundedRect,
    /// Card fill.
    pub fill: Color,
    /// Border color.
    pub stroke: Color,
    /// Border width.
    pub stroke_w: f32,
    /// Offset copy of the card shape painted first.
    pub shadow: RoundedRect,
    /// Shadow color.
    pub shadow_color: Color,
    /// Constant alpha the shadow paints with.
    pub shadow_alpha: f32,
}

/// One rendered day cell.
#[derive(Debug, Clone, PartialEq)]
pub struct CellModel {
    /// Final drawn lines, indent included, wrapped at the cell width.
    pub lines: Vec<String>,
    /// Resolved background after precedence.
    pub bg: Color,
    /// Whether the cell is blocked out.
    pub blocked: bool,
    /// True when the cell displays no staff (blocked cells included).
    pub empty: bool,
}

/// One visible row of the grid.
#[derive(Debug, Clone, PartialEq)]
pub struct RowModel {
    /// Key of the slot this row renders.
    pub slot_key: String,
    /// Cleaned display label.
    pub label: String,
    /// Visual category.
    pub kind: RowKind,
    /// Wrapped shift-column lines.
    pub label_lines: Vec<String>,
    /// Shift column background after precedence.
    pub shift_bg: Color,
    /// Monday through Sunday.
    pub cells: [CellModel; 7],
}

/// Notes block under the table.
#[derive(Debug, Clone, PartialEq)]
pub struct NotesBlock {
    /// Left edge.
    pub x: f32,
    /// Top edge of the title line.
    pub top: f32,
    /// Wrapped note lines.
    pub body_lines: Vec<String>,
}

/// The composed page: semantic grid plus flattened paint lists.
#[derive(Debug, Clone, PartialEq)]
pub struct DocModel {
    /// Resolved column widths.
    pub columns: ColumnWidths,
    /// Resolved font sizes.
    pub sizes: FontSizes,
    /// Variant layout knobs.
    pub params: StyleParams,
    /// Resolved colors.
    pub palette: Palette,
    /// `"{start} – {end}"` date range shown in the header band.
    pub week_title: String,
    /// (day label, date) pairs, Monday first. Dates are stored with
    /// plain spaces; the drawn runs swap in no-break spaces.
    pub header_cells: [(String, String); 7],
    /// Visible rows in sort order.
    pub rows: Vec<RowModel>,
    /// Header row first, then one entry per body row.
    pub row_heights: Vec<f32>,
    /// The gradient band above the table.
    pub header_card: GradientCard,
    /// The card the grid paints on.
    pub table_card: TableCard,
    /// Notes block, present when the week has non-blank notes.
    pub notes: Option<NotesBlock>,
    /// Empty space above the stack (vertical centering).
    pub top_offset: f32,
    /// Backgrounds in paint order (cards excluded), row-major.
    pub cell_fills: Vec<RectFill>,
    /// Grid lines, inner grid first, header divider last.
    pub grid_lines: Vec<StrokeLine>,
    /// All positioned text on the page.
    pub runs: Vec<TextRun>,
}

impl DocModel {
    /// Left edge of the table.
    pub fn table_x(&self) -> f32 {
        self.table_card.rect.x
    }

    /// Top edge of the table.
    pub fn table_top(&self) -> f32 {
        self.table_card.rect.y + self.table_card.rect.h
    }
}

// ===== CELL TEXT =====

fn body_indent() -> String {
    NBSP.to_string().repeat(BODY_INDENT_SPACES.max(1))
}

/// Formats a cell's display lines from resolved names. PT cells suffix
/// each name with the cell's time range; the compact variant joins the
/// first two names onto one line.
fn format_cell_lines(names: &[String], pt_time: Option<&str>, params: &StyleParams) -> Vec<String> {
    let mut lines: Vec<String> = names
        .iter()
        .map(|n| match pt_time {
            Some(t) if !t.is_empty() => format!("{} ({})", n, t),
            _ => n.clone(),
        })
        .collect();
    if params.join_first_pair && lines.len() >= 2 {
        let first = format!("{} / {}", lines[0], lines[1]);
        lines.splice(0..2, [first]);
    }
    lines
}

/// Pushes one run per line, stacking downward from `top` with the
/// paragraph's first baseline one font size below it.
fn stack_runs(
    runs: &mut Vec<TextRun>,
    lines: &[String],
    x: f32,
    top: f32,
    size: f32,
    leading: f32,
    face: FaceRole,
    color: Color,
) {
    for (i, line) in lines.iter().enumerate() {
        runs.push(TextRun {
            x,
            y: top - size - i as f32 * leading,
            text: line.clone(),
            face,
            size,
            color,
        });
    }
}

// ===== COMPOSITION =====

struct RawCell {
    lines: Vec<String>,
    blocked: bool,
}

/// Composes the page model for one week.
///
/// `slots` must already be in display order; rows without a single
/// assignment are dropped entirely. `body` and `bold` must be the
/// metrics of the faces the writer will draw with, otherwise the column
/// fit drifts from the printed text.
pub fn compose(
    week: &ScheduleWeek,
    slots: &[Slot],
    staff: &StaffMap,
    theme: &Theme,
    variant: StyleVariant,
    body: &dyn FontMetrics,
    bold: &dyn FontMetrics,
) -> DocModel {
    let params = variant.params();
    let sizes = FontSizes::resolve(theme, &params);
    let palette = Palette::default();

    let week_title = format!(
        "{} – {}",
        week.week_start.format("%d %b %Y"),
        week.week_end().format("%d %b %Y")
    );
    let header_cells: [(String, String); 7] = Day::ALL.map(|d| {
        (
            d.label().to_string(),
            week.date_for(d).format("%d %b").to_string(),
        )
    });

    // Visible rows and their unwrapped cell content.
    let mut visible: Vec<(&Slot, RowKind, [RawCell; 7])> = Vec::new();
    for slot in slots {
        if !slot_has_assignments(week, slot) {
            continue;
        }
        let kind = RowKind::classify(slot);
        let cells = Day::ALL.map(|day| match week.cell(&slot.key, day) {
            Some(cell) if slot.allow_block && cell.blocked => RawCell {
                lines: Vec::new(),
                blocked: true,
            },
            Some(cell) => {
                let names = staff.names_for(&cell.staff);
                let pt_time = if kind == RowKind::Pt {
                    Some(cell.pt_time.as_deref().unwrap_or("").trim())
                } else {
                    None
                };
                RawCell {
                    lines: format_cell_lines(&names, pt_time, &params),
                    blocked: false,
                }
            }
            None => RawCell {
                lines: Vec::new(),
                blocked: false,
            },
        });
        visible.push((slot, kind, cells));
    }

    // Column sizing from exactly the content that prints.
    let labels: Vec<&str> = visible
        .iter()
        .map(|(slot, _, _)| clean_label(&slot.label))
        .collect();
    let body_lines: Vec<String> = visible
        .iter()
        .flat_map(|(_, _, cells)| cells.iter().flat_map(|c| c.lines.iter().cloned()))
        .collect();
    let columns = column_widths(&labels, &header_cells, &body_lines, &sizes, bold, body);

    // Wrap at the final cell widths. The indent binds to the first word
    // so continuation lines stay flush left.
    let day_avail = columns.day_w - 2.0 * CELL_PAD_X;
    let shift_avail = columns.shift_w - SHIFT_LEFT_PAD - CELL_PAD_X;
    let indent = body_indent();

    let mut rows: Vec<RowModel> = Vec::new();
    for (r, (slot, kind, raw)) in visible.iter().enumerate() {
        let is_pt = *kind == RowKind::Pt;
        let td_size = if is_pt { sizes.td_pt_small } else { sizes.td };
        let label = clean_label(&slot.label).to_string();
        let label_size = if is_pt {
            sizes.pt_shift_small
        } else {
            sizes.header_th
        };
        let label_lines = wrap_line(&label, shift_avail, bold, label_size, false);

        let stripe = if r % 2 == 0 {
            palette.stripe_a
        } else {
            palette.stripe_b
        };
        let row_tint = match kind {
            RowKind::Off => Some(palette.off_row_bg),
            RowKind::Leave => Some(palette.leave_row_bg),
            RowKind::Pt => Some(palette.pt_row_bg),
            RowKind::Work => None,
        };
        let shift_bg = row_tint.unwrap_or(stripe);

        let cells = Day::ALL.map(|day| {
            let raw_cell = &raw[day.index()];
            let mut lines = Vec::new();
            for line in &raw_cell.lines {
                let text = format!("{}{}", indent, line);
                lines.extend(wrap_line(&text, day_avail, bold, td_size, true));
            }
            let empty = lines.is_empty();
            let mut bg = stripe;
            if day.is_weekend() {
                bg = palette.weekend_bg;
            }
            if let Some(tint) = row_tint {
                bg = tint;
            }
            if empty {
                bg = palette.empty_cell_bg;
            }
            CellModel {
                lines,
                bg,
                blocked: raw_cell.blocked,
                empty,
            }
        });

        rows.push(RowModel {
            slot_key: slot.key.clone(),
            label,
            kind: *kind,
            label_lines,
            shift_bg,
            cells,
        });
    }

    // Row heights: tallest cell content plus vertical padding.
    let header_row_h = sizes.th_leading().max(sizes.th_date_leading()) + 2.0 * HEADER_VPAD;
    let mut row_heights = vec![header_row_h];
    for row in &rows {
        let is_pt = row.kind == RowKind::Pt;
        let label_leading = if is_pt {
            sizes.pt_shift_leading()
        } else {
            sizes.th_leading()
        };
        let cell_leading = if is_pt {
            sizes.td_pt_leading()
        } else {
            sizes.td_leading()
        };
        let mut content_h = row.label_lines.len() as f32 * label_leading;
        for cell in &row.cells {
            content_h = content_h.max(cell.lines.len() as f32 * cell_leading);
        }
        row_heights.push(content_h + 2.0 * params.body_vpad);
    }
    let table_h: f32 = row_heights.iter().sum();
    let table_w = columns.table_width();

    // Notes flow under the table at full frame width.
    let trimmed_notes = week.notes.trim();
    let notes_body: Vec<String> = if trimmed_notes.is_empty() {
        Vec::new()
    } else {
        trimmed_notes
            .lines()
            .flat_map(|l| wrap_line(l.trim_end(), AVAIL_W, body, NOTES_BODY_SIZE, true))
            .collect()
    };
    let notes_h = if trimmed_notes.is_empty() {
        0.0
    } else {
        NOTES_GAP + NOTES_TITLE_LEADING + notes_body.len() as f32 * NOTES_BODY_LEADING
    };

    // Vertical centering of the whole stack inside the frame.
    let header_h = sizes.week_leading() + 2.0 * HEADER_BAND_PAD;
    let total_h = header_h + HEADER_TABLE_GAP + table_h + notes_h;
    let remaining = AVAIL_H - total_h;
    let top_offset = if remaining > 2.0 { remaining / 2.0 } else { 0.0 };

    let frame_top = PAGE_H - PAGE_MARGIN;
    let card_x = (PAGE_W - table_w) / 2.0;
    let band_top = frame_top - top_offset;
    let band_bottom = band_top - header_h;
    let table_top = band_bottom - HEADER_TABLE_GAP;
    let table_bottom = table_top - table_h;

    let header_card = GradientCard {
        rect: RoundedRect {
            x: card_x,
            y: band_bottom,
            w: table_w,
            h: header_h,
            radius: CARD_RADIUS,
        },
        top: palette.header_top,
        bottom: palette.header_bottom,
    };
    let table_rect = RoundedRect {
        x: card_x,
        y: table_bottom,
        w: table_w,
        h: table_h,
        radius: CARD_RADIUS,
    };
    let table_card = TableCard {
        rect: table_rect,
        fill: Color::WHITE,
        stroke: palette.border,
        stroke_w: CARD_STROKE,
        shadow: RoundedRect {
            x: table_rect.x + SHADOW_DX,
            y: table_rect.y + SHADOW_DY,
            w: table_rect.w,
            h: table_rect.h,
            radius: CARD_RADIUS,
        },
        shadow_color: Color::BLACK,
        shadow_alpha: SHADOW_ALPHA,
    };

    // ----- header band text -----
    let mut runs = Vec::new();
    let panel_w: [f32; 3] = [
        HEADER_FRACTIONS[0] * table_w,
        HEADER_FRACTIONS[1] * table_w,
        HEADER_FRACTIONS[2] * table_w,
    ];
    let band_baseline = band_top - (header_h - sizes.week_leading()) / 2.0 - sizes.week;
    let title_w = bold.text_width(DOC_TITLE, sizes.week);
    let title_avail = panel_w[1] - 2.0 * HEADER_BAND_PAD;
    runs.push(TextRun {
        x: card_x + panel_w[0] + HEADER_BAND_PAD + (title_avail - title_w) / 2.0,
        y: band_baseline,
        text: DOC_TITLE.to_string(),
        face: FaceRole::Bold,
        size: sizes.week,
        color: palette.header_text,
    });
    let range_w = bold.text_width(&week_title, sizes.week);
    runs.push(TextRun {
        x: card_x + table_w - HEADER_BAND_PAD - range_w,
        y: band_baseline,
        text: week_title.clone(),
        face: FaceRole::Bold,
        size: sizes.week,
        color: palette.header_text,
    });

    // ----- cell backgrounds -----
    let mut cell_fills = Vec::new();
    let col_x = |c: usize| -> f32 {
        if c == 0 {
            card_x
        } else {
            card_x + columns.shift_w + (c as f32 - 1.0) * columns.day_w
        }
    };
    let col_w = |c: usize| -> f32 {
        if c == 0 {
            columns.shift_w
        } else {
            columns.day_w
        }
    };

    let mut row_top = table_top;
    for c in 0..8 {
        cell_fills.push(RectFill {
            x: col_x(c),
            y: row_top - header_row_h,
            w: col_w(c),
            h: header_row_h,
            color: palette.header_row_bg,
        });
    }
    row_top -= header_row_h;
    for (row, h) in rows.iter().zip(row_heights.iter().skip(1)) {
        cell_fills.push(RectFill {
            x: col_x(0),
            y: row_top - h,
            w: col_w(0),
            h: *h,
            color: row.shift_bg,
        });
        for (d, cell) in row.cells.iter().enumerate() {
            cell_fills.push(RectFill {
                x: col_x(d + 1),
                y: row_top - h,
                w: col_w(d + 1),
                h: *h,
                color: cell.bg,
            });
        }
        row_top -= h;
    }

    // ----- grid lines -----
    let mut grid_lines = Vec::new();
    for c in 1..8 {
        let x = col_x(c);
        grid_lines.push(StrokeLine {
            x1: x,
            y1: table_bottom,
            x2: x,
            y2: table_top,
            width: GRID_LINE_W,
            color: palette.border,
        });
    }
    let mut boundary = table_top;
    for h in &row_heights[..row_heights.len() - 1] {
        boundary -= h;
        grid_lines.push(StrokeLine {
            x1: card_x,
            y1: boundary,
            x2: card_x + table_w,
            y2: boundary,
            width: GRID_LINE_W,
            color: palette.border,
        });
    }
    // The header divider restrikes the first boundary, heavier.
    grid_lines.push(StrokeLine {
        x1: card_x,
        y1: table_top - header_row_h,
        x2: card_x + table_w,
        y2: table_top - header_row_h,
        width: DIVIDER_LINE_W,
        color: palette.divider,
    });

    // ----- header row text -----
    let header_text_top = table_top - HEADER_VPAD;
    runs.push(TextRun {
        x: card_x + SHIFT_LEFT_PAD,
        y: header_text_top - sizes.header_th,
        text: "Shift".to_string(),
        face: FaceRole::Bold,
        size: sizes.header_th,
        color: palette.header_row_text,
    });
    let inner_day_w = (columns.day_w - 2.0 * CELL_PAD_X).max(10.0);
    let day_name_avail = inner_day_w * DAY_HEADER_SPLIT - 2.0 * HEADER_LR_PAD;
    for (d, (day, date)) in header_cells.iter().enumerate() {
        let inner_left = col_x(d + 1) + CELL_PAD_X;
        let day_lines = wrap_line(day, day_name_avail, bold, sizes.header_th, false);
        stack_runs(
            &mut runs,
            &day_lines,
            inner_left + HEADER_LR_PAD,
            header_text_top,
            sizes.header_th,
            sizes.th_leading(),
            FaceRole::Bold,
            palette.header_row_text,
        );
        // The date keeps its space as a no-break so it never wraps.
        let date_text = date.replace(' ', "\u{00A0}");
        let date_w = bold.text_width(&date_text, sizes.header_sub);
        runs.push(TextRun {
            x: inner_left + inner_day_w - HEADER_LR_PAD - date_w,
            y: header_text_top - sizes.header_sub,
            text: date_text,
            face: FaceRole::Bold,
            size: sizes.header_sub,
            color: palette.subtext,
        });
    }

    // ----- body text -----
    let mut row_top = table_top - header_row_h;
    for (row, h) in rows.iter().zip(row_heights.iter().skip(1)) {
        let is_pt = row.kind == RowKind::Pt;
        let text_top = row_top - params.body_vpad;
        let label_size = if is_pt {
            sizes.pt_shift_small
        } else {
            sizes.header_th
        };
        let label_leading = if is_pt {
            sizes.pt_shift_leading()
        } else {
            sizes.th_leading()
        };
        stack_runs(
            &mut runs,
            &row.label_lines,
            card_x + SHIFT_LEFT_PAD,
            text_top,
            label_size,
            label_leading,
            FaceRole::Bold,
            palette.header_row_text,
        );
        let td_size = if is_pt { sizes.td_pt_small } else { sizes.td };
        let td_leading = if is_pt {
            sizes.td_pt_leading()
        } else {
            sizes.td_leading()
        };
        for (d, cell) in row.cells.iter().enumerate() {
            stack_runs(
                &mut runs,
                &cell.lines,
                col_x(d + 1) + CELL_PAD_X,
                text_top,
                td_size,
                td_leading,
                FaceRole::Bold,
                palette.table_text,
            );
        }
        row_top -= h;
    }

    // ----- notes -----
    let notes = if trimmed_notes.is_empty() {
        None
    } else {
        let notes_top = table_bottom - NOTES_GAP;
        runs.push(TextRun {
            x: PAGE_MARGIN,
            y: notes_top - NOTES_TITLE_SIZE,
            text: "Notes".to_string(),
            face: FaceRole::Bold,
            size: NOTES_TITLE_SIZE,
            color: palette.table_text,
        });
        stack_runs(
            &mut runs,
            &notes_body,
            PAGE_MARGIN,
            notes_top - NOTES_TITLE_LEADING,
            NOTES_BODY_SIZE,
            NOTES_BODY_LEADING,
            FaceRole::Body,
            palette.table_text,
        );
        Some(NotesBlock {
            x: PAGE_MARGIN,
            top: notes_top,
            body_lines: notes_body,
        })
    };

    log::debug!(
        "composed week {}: {} rows, table {:.1}x{:.1}, top offset {:.1}",
        week.week_start,
        rows.len(),
        table_w,
        table_h,
        top_offset
    );

    DocModel {
        columns,
        sizes,
        params,
        palette,
        week_title,
        header_cells,
        rows,
        row_heights,
        header_card,
        table_card,
        notes,
        top_offset,
        cell_fills,
        grid_lines,
        runs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measure::BuiltinMetrics;
    use crate::model::seed_slots;
    use chrono::NaiveDate;

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 24).unwrap()
    }

    fn staff() -> StaffMap {
        [(1, "Alice"), (2, "Bob"), (3, "Carol")]
            .into_iter()
            .map(|(id, name)| (id, name.to_string()))
            .collect()
    }

    fn slot(key: &str) -> Slot {
        seed_slots().into_iter().find(|s| s.key == key).unwrap()
    }

    fn compose_default(week: &ScheduleWeek, slots: &[Slot]) -> DocModel {
        let body = BuiltinMetrics::regular();
        let bold = BuiltinMetrics::bold();
        compose(
            week,
            slots,
            &staff(),
            &Theme::default(),
            StyleVariant::Classic,
            &body,
            &bold,
        )
    }

    #[test]
    fn test_row_kind_classification() {
        assert_eq!(RowKind::classify(&slot("off_day")), RowKind::Off);
        assert_eq!(RowKind::classify(&slot("pt")), RowKind::Pt);
        assert_eq!(RowKind::classify(&slot("ph_al")), RowKind::Leave);
        assert_eq!(RowKind::classify(&slot("10am")), RowKind::Work);
        let renamed = Slot::new("morning", "Off rotation", 5);
        assert_eq!(RowKind::classify(&renamed), RowKind::Off);
    }

    #[test]
    fn test_single_assignment_week() {
        let slots = seed_slots();
        let mut week = ScheduleWeek::new(monday());
        week.ensure_defaults(&slots);
        week.assign_staff(&slot("10am"), Day::Mon, 1).unwrap();

        let doc = compose_default(&week, &slots);
        assert_eq!(doc.rows.len(), 1);
        let row = &doc.rows[0];
        assert_eq!(row.label, "10am");
        assert_eq!(row.cells[0].lines, vec!["\u{a0}\u{a0}Alice".to_string()]);
        assert!(!row.cells[0].empty);
        for cell in &row.cells[1..] {
            assert!(cell.empty);
            assert_eq!(cell.bg, doc.palette.empty_cell_bg);
        }
        // Saturday and Sunday are empty here, so the empty tint wins
        // over the weekend tint.
        assert_ne!(row.cells[5].bg, doc.palette.weekend_bg);
        assert_eq!(doc.week_title, "24 Aug 2026 – 30 Aug 2026");
        assert_eq!(doc.header_cells[0], ("Mon".to_string(), "24 Aug".to_string()));
        assert_eq!(doc.header_cells[6], ("Sun".to_string(), "30 Aug".to_string()));
    }

    #[test]
    fn test_default_row_heights() {
        let slots = seed_slots();
        let mut week = ScheduleWeek::new(monday());
        week.ensure_defaults(&slots);
        week.assign_staff(&slot("10am"), Day::Mon, 1).unwrap();

        let doc = compose_default(&week, &slots);
        // Header: max(11.6, 14.2) + 20. Body: max(11.6, 12.7) + 20.
        assert!((doc.row_heights[0] - 34.2).abs() < 1e-3);
        assert!((doc.row_heights[1] - 32.7).abs() < 1e-3);
        let expected_h: f32 = doc.row_heights.iter().sum();
        assert!((doc.table_card.rect.h - expected_h).abs() < 1e-3);
    }

    #[test]
    fn test_rows_without_assignments_are_dropped() {
        let slots = seed_slots();
        let mut week = ScheduleWeek::new(monday());
        week.ensure_defaults(&slots);
        week.assign_staff(&slot("10am"), Day::Mon, 1).unwrap();
        week.assign_staff(&slot("4pm"), Day::Fri, 2).unwrap();

        let doc = compose_default(&week, &slots);
        let keys: Vec<&str> = doc.rows.iter().map(|r| r.slot_key.as_str()).collect();
        assert_eq!(keys, vec!["10am", "4pm"]);
    }

    #[test]
    fn test_weekend_and_stripe_backgrounds() {
        let slots = seed_slots();
        let mut week = ScheduleWeek::new(monday());
        week.ensure_defaults(&slots);
        week.assign_staff(&slot("10am"), Day::Sat, 1).unwrap();
        week.assign_staff(&slot("11am"), Day::Mon, 2).unwrap();

        let doc = compose_default(&week, &slots);
        // Populated Saturday cell keeps the weekend tint.
        assert_eq!(doc.rows[0].cells[5].bg, doc.palette.weekend_bg);
        // Second body row shows the alternate stripe on its populated
        // weekday cell.
        assert_eq!(doc.rows[1].cells[0].bg, doc.palette.stripe_b);
        assert_eq!(doc.rows[0].shift_bg, doc.palette.stripe_a);
    }

    #[test]
    fn test_status_row_tints_cover_shift_column() {
        let slots = seed_slots();
        let mut week = ScheduleWeek::new(monday());
        week.ensure_defaults(&slots);
        week.assign_staff(&slot("off_day"), Day::Tue, 1).unwrap();

        let doc = compose_default(&week, &slots);
        let row = &doc.rows[0];
        assert_eq!(row.kind, RowKind::Off);
        assert_eq!(row.label, "Rest Day");
        assert_eq!(row.shift_bg, doc.palette.off_row_bg);
        assert_eq!(row.cells[1].bg, doc.palette.off_row_bg);
        // Empty cells in a tinted row still fall back to the empty tint.
        assert_eq!(row.cells[0].bg, doc.palette.empty_cell_bg);
    }

    #[test]
    fn test_pt_rows_suffix_names_and_shrink() {
        let slots = seed_slots();
        let mut week = ScheduleWeek::new(monday());
        week.ensure_defaults(&slots);
        week.assign_staff(&slot("pt"), Day::Wed, 2).unwrap();

        let doc = compose_default(&week, &slots);
        let row = &doc.rows[0];
        assert_eq!(row.kind, RowKind::Pt);
        assert_eq!(row.cells[2].lines, vec!["\u{a0}\u{a0}Bob (7-11)".to_string()]);
        let run = doc
            .runs
            .iter()
            .find(|r| r.text.contains("Bob"))
            .unwrap();
        assert!((run.size - doc.sizes.td_pt_small).abs() < 1e-6);

        // Clearing the time drops the suffix.
        week.set_pt_time("pt", Day::Wed, "  ").unwrap();
        let doc = compose_default(&week, &slots);
        assert_eq!(doc.rows[0].cells[2].lines, vec!["\u{a0}\u{a0}Bob".to_string()]);
    }

    #[test]
    fn test_blocked_cells_render_empty() {
        let slots = seed_slots();
        let pt = slot("pt");
        let mut week = ScheduleWeek::new(monday());
        week.ensure_defaults(&slots);
        week.assign_staff(&pt, Day::Mon, 1).unwrap();
        week.assign_staff(&pt, Day::Tue, 2).unwrap();
        assert!(week.set_blocked(&pt, Day::Tue).unwrap());

        let doc = compose_default(&week, &slots);
        let cell = &doc.rows[0].cells[1];
        assert!(cell.blocked);
        assert!(cell.empty);
        assert!(cell.lines.is_empty());
        assert_eq!(cell.bg, doc.palette.empty_cell_bg);
    }

    #[test]
    fn test_unknown_staff_ids_leave_cell_empty_but_row_visible() {
        let slots = seed_slots();
        let mut week = ScheduleWeek::new(monday());
        week.ensure_defaults(&slots);
        week.assign_staff(&slot("10am"), Day::Mon, 99).unwrap();

        let doc = compose_default(&week, &slots);
        assert_eq!(doc.rows.len(), 1);
        assert!(doc.rows[0].cells[0].empty);
        assert_eq!(doc.rows[0].cells[0].bg, doc.palette.empty_cell_bg);
    }

    #[test]
    fn test_compact_variant_joins_first_pair() {
        let slots = seed_slots();
        let mut week = ScheduleWeek::new(monday());
        week.ensure_defaults(&slots);
        let s = slot("10am");
        week.assign_staff(&s, Day::Mon, 1).unwrap();
        week.assign_staff(&s, Day::Mon, 2).unwrap();
        week.assign_staff(&s, Day::Mon, 3).unwrap();

        let body = BuiltinMetrics::regular();
        let bold = BuiltinMetrics::bold();
        let doc = compose(
            &week,
            &slots,
            &staff(),
            &Theme::default(),
            StyleVariant::Compact,
            &body,
            &bold,
        );
        let cell = &doc.rows[0].cells[0];
        assert_eq!(cell.lines.len(), 2);
        assert!(cell.lines[0].ends_with("Alice / Bob"));
        assert!(cell.lines[1].ends_with("Carol"));
        // Compact rows carry less vertical padding.
        assert!((doc.params.body_vpad - 8.0).abs() < 1e-6);
    }

    #[test]
    fn test_vertical_centering_and_card_geometry() {
        let slots = seed_slots();
        let mut week = ScheduleWeek::new(monday());
        week.ensure_defaults(&slots);
        week.assign_staff(&slot("10am"), Day::Mon, 1).unwrap();

        let doc = compose_default(&week, &slots);
        assert!(doc.top_offset > 0.0);
        let frame_top = PAGE_H - PAGE_MARGIN;
        let band = &doc.header_card.rect;
        assert!((band.y + band.h - (frame_top - doc.top_offset)).abs() < 1e-3);
        assert!(
            (doc.table_top() - (band.y - HEADER_TABLE_GAP)).abs() < 1e-3
        );
        // Cards share the centered x.
        assert!((band.x - doc.table_card.rect.x).abs() < 1e-6);
        assert!((band.x - (PAGE_W - doc.columns.table_width()) / 2.0).abs() < 1e-3);
        // Shadow offset.
        assert!((doc.table_card.shadow.x - doc.table_card.rect.x - SHADOW_DX).abs() < 1e-6);
        assert!((doc.table_card.shadow.y - doc.table_card.rect.y - SHADOW_DY).abs() < 1e-6);
    }

    #[test]
    fn test_paint_list_counts() {
        let slots = seed_slots();
        let mut week = ScheduleWeek::new(monday());
        week.ensure_defaults(&slots);
        week.assign_staff(&slot("10am"), Day::Mon, 1).unwrap();
        week.assign_staff(&slot("1pm"), Day::Tue, 2).unwrap();

        let doc = compose_default(&week, &slots);
        let n_rows = doc.rows.len();
        assert_eq!(doc.cell_fills.len(), 8 * (n_rows + 1));
        // 7 inner verticals, n inner horizontals, 1 divider.
        assert_eq!(doc.grid_lines.len(), 7 + n_rows + 1);
        let divider = doc.grid_lines.last().unwrap();
        assert!((divider.width - DIVIDER_LINE_W).abs() < 1e-6);
        assert!(doc.runs.iter().any(|r| r.text == "Shift"));
        assert!(doc.runs.iter().any(|r| r.text == DOC_TITLE));
    }

    #[test]
    fn test_notes_block() {
        let slots = seed_slots();
        let mut week = ScheduleWeek::new(monday());
        week.ensure_defaults(&slots);
        week.assign_staff(&slot("10am"), Day::Mon, 1).unwrap();
        week.notes = "Deep clean Friday\nStocktake Sunday".to_string();

        let doc = compose_default(&week, &slots);
        let notes = doc.notes.as_ref().unwrap();
        assert_eq!(
            notes.body_lines,
            vec!["Deep clean Friday".to_string(), "Stocktake Sunday".to_string()]
        );
        assert!(doc.runs.iter().any(|r| r.text == "Notes"));
        let body_run = doc
            .runs
            .iter()
            .find(|r| r.text == "Stocktake Sunday")
            .unwrap();
        assert_eq!(body_run.face, FaceRole::Body);

        week.notes = "   ".to_string();
        let doc = compose_default(&week, &slots);
        assert!(doc.notes.is_none());
    }

    #[test]
    fn test_compose_is_deterministic() {
        let slots = seed_slots();
        let mut week = ScheduleWeek::new(monday());
        week.ensure_defaults(&slots);
        week.assign_staff(&slot("10am"), Day::Mon, 1).unwrap();
        week.assign_staff(&slot("pt"), Day::Sun, 2).unwrap();
        week.notes = "Hand over keys".to_string();

        let a = compose_default(&week, &slots);
        let b = compose_default(&week, &slots);
        assert_eq!(a, b);
    }
}
