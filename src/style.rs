//! Visual style for the rendered schedule: page geometry, font size
//! roles, the color palette, and the style-variant parameters.
//!
//! Every theme-supplied size passes through a fixed designer band
//! ([`clamp_f32`]) so a hostile or typo'd theme can nudge the design but
//! never break the single-page layout.

use crate::color::{blend_hex, clamp_f32, Color};
use crate::model::Theme;

// ===== PAGE GEOMETRY =====

/// Points per millimetre.
pub const MM: f32 = 72.0 / 25.4;

/// Landscape A4 width, points.
pub const PAGE_W: f32 = 842.0;
/// Landscape A4 height, points.
pub const PAGE_H: f32 = 595.0;

/// Uniform page margin.
pub const PAGE_MARGIN: f32 = 16.0 * MM;

/// Content width inside the margins.
pub const AVAIL_W: f32 = PAGE_W - 2.0 * PAGE_MARGIN;
/// Content height inside the margins.
pub const AVAIL_H: f32 = PAGE_H - 2.0 * PAGE_MARGIN;

// ===== FIXED LAYOUT CONSTANTS =====

/// Centered title of the header band.
pub const DOC_TITLE: &str = "Sam's @ Batai Weekly Staff Schedule";

/// Header band panel fractions of the table width: spacer, title, dates.
pub const HEADER_FRACTIONS: [f32; 3] = [0.18, 0.54, 0.28];
/// Inner padding of the header band.
pub const HEADER_BAND_PAD: f32 = 10.0;

/// Gap between the header card and the table card.
pub const HEADER_TABLE_GAP: f32 = 16.0;
/// Gap between the table card and the notes block.
pub const NOTES_GAP: f32 = 6.0;

/// Size of the "Notes" heading.
pub const NOTES_TITLE_SIZE: f32 = 10.5;
/// Line height of the "Notes" heading.
pub const NOTES_TITLE_LEADING: f32 = 12.5;
/// Size of notes body lines.
pub const NOTES_BODY_SIZE: f32 = 10.0;
/// Line height of notes body lines.
pub const NOTES_BODY_LEADING: f32 = 12.8;

/// Rounded card corner radius, shared by both cards.
pub const CARD_RADIUS: f32 = 5.0;
/// Card border width.
pub const CARD_STROKE: f32 = 0.9;
/// Drop shadow x offset.
pub const SHADOW_DX: f32 = 2.2;
/// Drop shadow y offset (negative moves down on the page).
pub const SHADOW_DY: f32 = -2.2;
/// Constant alpha of the drop shadow.
pub const SHADOW_ALPHA: f32 = 0.10;
/// Band count of the vertical header gradient.
pub const GRADIENT_STEPS: u32 = 90;

/// Horizontal cell padding (all columns; the shift column adds more on
/// the left).
pub const CELL_PAD_X: f32 = 2.0;
/// Extra left padding of the shift label column.
pub const SHIFT_LEFT_PAD: f32 = 5.0;
/// Left/right padding inside the two-part day header cells.
pub const HEADER_LR_PAD: f32 = 3.0;
/// Spaces of indent prepended to every body cell line at draw time.
pub const BODY_INDENT_SPACES: usize = 2;

/// Width of interior grid lines.
pub const GRID_LINE_W: f32 = 0.45;
/// Width of the heavier line under the header row.
pub const DIVIDER_LINE_W: f32 = 0.9;

/// Vertical padding of the header row and of Classic body rows.
pub const HEADER_VPAD: f32 = 10.0;

/// Day column width band, lower bound (pt).
pub const DAY_W_MIN: f32 = 82.0;
/// Day column width band, upper bound (pt).
pub const DAY_W_MAX: f32 = 135.0;
/// Shift column width band, lower bound (pt).
pub const SHIFT_W_MIN: f32 = 92.0;
/// Shift column width band, upper bound (pt).
pub const SHIFT_W_MAX: f32 = 160.0;
/// Hard shift-column floor used only by the overflow scaler.
pub const SHIFT_W_FLOOR: f32 = 78.0;
/// Hard day-column floor used only by the overflow scaler.
pub const DAY_W_FLOOR: f32 = 70.0;

/// Extra width beyond text + padding when sizing the shift column.
pub const SHIFT_W_EXTRA: f32 = 6.0;
/// Extra width beyond text + padding when sizing day columns.
pub const DAY_W_EXTRA: f32 = 8.0;
/// Gap between day name and date when sizing the header cells.
pub const DAY_HEADER_GAP: f32 = 12.0;
/// Left fraction of the two-part day header cell (day name vs date).
pub const DAY_HEADER_SPLIT: f32 = 0.48;

// ===== STYLE VARIANTS =====

/// Layout variant selected by the caller. Unknown codes fall back to
/// [`StyleVariant::Classic`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleVariant {
    /// One staff name per line, roomier rows.
    Classic,
    /// First two names share a line, tighter rows, slightly smaller body
    /// text.
    Compact,
}

impl StyleVariant {
    /// Maps the stored style code to a variant (1 classic, 2 compact,
    /// anything else classic).
    pub fn from_code(code: i32) -> StyleVariant {
        match code {
            2 => StyleVariant::Compact,
            _ => StyleVariant::Classic,
        }
    }

    /// The layout knobs this variant renders with.
    pub fn params(self) -> StyleParams {
        match self {
            StyleVariant::Classic => StyleParams {
                variant: self,
                body_vpad: 10.0,
                body_size_delta: 0.0,
                join_first_pair: false,
            },
            StyleVariant::Compact => StyleParams {
                variant: self,
                body_vpad: 8.0,
                body_size_delta: -0.4,
                join_first_pair: true,
            },
        }
    }
}

/// Knobs that differ between the style variants. Both variants run
/// through the same composer; nothing branches on the variant after
/// these are resolved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StyleParams {
    /// The variant these knobs came from.
    pub variant: StyleVariant,
    /// Top and bottom padding of body rows.
    pub body_vpad: f32,
    /// Added to the body (td) sizes before clamping.
    pub body_size_delta: f32,
    /// Join the first two names of a cell as `"A / B"`.
    pub join_first_pair: bool,
}

impl Default for StyleParams {
    fn default() -> StyleParams {
        StyleVariant::Classic.params()
    }
}

// ===== FONT SIZE ROLES =====

/// Resolved font sizes for every text role in the document.
///
/// Each requested size clamps into its band; the derived header/PT sizes
/// shrink a fixed step below their parent role but never below their own
/// floor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontSizes {
    /// Title and date range in the header band.
    pub week: f32,
    /// Table header row base size.
    pub th: f32,
    /// Body cell text.
    pub td: f32,
    /// Secondary text (the date part of day headers).
    pub subtext: f32,
    /// PT row body base size.
    pub td_pt: f32,
    /// Day names and the shift column (th stepped down).
    pub header_th: f32,
    /// Header dates (subtext stepped down).
    pub header_sub: f32,
    /// PT row names (td_pt stepped down).
    pub td_pt_small: f32,
    /// PT row shift label (header_th stepped down).
    pub pt_shift_small: f32,
}

impl FontSizes {
    /// Resolves the theme's size hints for the given style variant.
    /// `None`, non-finite and non-positive hints all mean "default".
    pub fn resolve(theme: &Theme, params: &StyleParams) -> FontSizes {
        let week = clamp_f32(requested(theme.week_size, 12.8), 11.2, 14.5);
        let th = clamp_f32(requested(theme.table_header_size, 12.3), 11.2, 14.5);
        let td = clamp_f32(
            requested(theme.table_size, 12.1) + params.body_size_delta,
            10.8,
            14.6,
        );
        // Subtext and the PT body size track the week size by default so
        // dates and PT times read at the same scale as the title.
        let subtext = clamp_f32(requested(theme.subtext_size, week), 11.2, 14.5);
        let td_pt = clamp_f32(
            requested(theme.table_pt_size, week) + params.body_size_delta,
            11.2,
            14.5,
        );

        // Header row steps down slightly so day/date never wrap.
        let header_th = clamp_f32(th - 0.8, 10.6, th);
        let header_sub = clamp_f32(subtext - 0.8, 10.4, subtext);

        // PT row text is a step smaller than its base roles.
        let td_pt_small = clamp_f32(td_pt - 1.0, 10.2, td_pt);
        let pt_shift_small = clamp_f32(header_th - 1.0, 10.2, header_th);

        FontSizes {
            week,
            th,
            td,
            subtext,
            td_pt,
            header_th,
            header_sub,
            td_pt_small,
            pt_shift_small,
        }
    }

    /// Line height of header-band text.
    pub fn week_leading(&self) -> f32 {
        self.week + 2.2
    }

    /// Line height of day names and shift labels.
    pub fn th_leading(&self) -> f32 {
        self.header_th + 0.1
    }

    /// Line height of the date half of a day header cell.
    pub fn th_date_leading(&self) -> f32 {
        self.header_sub + 2.2
    }

    /// Line height of body cell lines.
    pub fn td_leading(&self) -> f32 {
        self.td + 0.6
    }

    /// Line height of PT row body lines.
    pub fn td_pt_leading(&self) -> f32 {
        self.td_pt_small + 0.6
    }

    /// Line height of the PT shift label.
    pub fn pt_shift_leading(&self) -> f32 {
        self.pt_shift_small + 0.1
    }
}

fn requested(v: Option<f32>, default: f32) -> f32 {
    match v {
        Some(x) if x.is_finite() && x > 0.0 => x,
        _ => default,
    }
}

// ===== PALETTE =====

/// Base of the default burgundy palette.
pub const BASE_HEADER_HEX: &str = "#611B29";

/// Resolved document palette. All tints derive from a handful of bases
/// through [`blend_hex`], so the derivation stays byte-stable.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    /// Header gradient, top stop.
    pub header_top: Color,
    /// Header gradient, bottom stop.
    pub header_bottom: Color,
    /// Title and date range text on the header band.
    pub header_text: Color,
    /// Day header row background.
    pub header_row_bg: Color,
    /// Day header row text.
    pub header_row_text: Color,
    /// Body cell text.
    pub table_text: Color,
    /// Small date line under each day label.
    pub subtext: Color,
    /// Interior grid lines and card border.
    pub border: Color,
    /// Heavier line under the header row.
    pub divider: Color,
    /// Saturday and Sunday column wash.
    pub weekend_bg: Color,
    /// Even row stripe.
    pub stripe_a: Color,
    /// Odd row stripe.
    pub stripe_b: Color,
    /// Rest day row wash.
    pub off_row_bg: Color,
    /// Public holiday / annual leave row wash.
    pub leave_row_bg: Color,
    /// PT row wash.
    pub pt_row_bg: Color,
    /// Cells of visible rows with nothing assigned that day.
    pub empty_cell_bg: Color,
    /// Reserved tint for unassigned PT cells. Kept in the palette but
    /// not applied by any variant; empty PT cells use `empty_cell_bg`.
    pub pt_empty_bg: Color,
}

impl Palette {
    /// Derives the palette from a header base color.
    pub fn from_base(base_hex: &str) -> Palette {
        let hx = |h: &str| Color::from_hex(h).unwrap_or(Color::WHITE);
        Palette {
            header_top: hx(&blend_hex(base_hex, "#FFFFFF", 0.20)),
            header_bottom: hx(&blend_hex(base_hex, "#000000", 0.20)),
            header_text: hx("#F8FAFC"),
            header_row_bg: hx(&blend_hex("#FFF3E8", "#FFFFFF", 0.10)),
            header_row_text: hx("#0F172A"),
            table_text: hx("#0F172A"),
            subtext: hx("#64748B"),
            border: hx("#D7DEE8"),
            divider: hx("#C6CFDB"),
            weekend_bg: hx(&blend_hex("#F3F6FB", "#FFFFFF", 0.08)),
            stripe_a: hx("#FFFFFF"),
            stripe_b: hx(&blend_hex("#FAFCFF", "#FFFFFF", 0.06)),
            off_row_bg: hx(&blend_hex("#F2BFC4", "#FFFFFF", 0.05)),
            leave_row_bg: hx(&blend_hex("#EFCF86", "#FFFFFF", 0.05)),
            pt_row_bg: hx(&blend_hex("#CBE8D4", "#FFFFFF", 0.05)),
            empty_cell_bg: hx(&blend_hex(base_hex, "#FFFFFF", 0.92)),
            pt_empty_bg: hx(&blend_hex("#D14B57", "#FFFFFF", 0.72)),
        }
    }
}

impl Default for Palette {
    fn default() -> Palette {
        Palette::from_base(BASE_HEADER_HEX)
    }
}
