// Allow some clippy lints that are too pedantic for this project
#![allow(clippy::too_many_arguments)]
#![allow(clippy::type_complexity)]

//! # Shift Sheet
//!
//! Weekly staff-shift schedules as print-ready documents: an assignment
//! grid becomes a styled landscape-A4 PDF, and from there a shareable
//! PNG at true physical size.
//!
//! ## What it renders
//!
//! - **One page per week**: header band with the date range, a grid of
//!   shift rows by weekday columns, an optional notes block
//! - **Two looks**: `Classic` and `Compact` variants over a
//!   theme-tintable palette
//! - **Self-fitting layout**: column widths from measured text, the
//!   grid narrowed and rescaled to the page width, row heights from
//!   wrapped line counts
//! - **Deterministic bytes**: the same week, staff, theme, and variant
//!   produce byte-identical PDFs, render after render
//!
//! ## Editing rules
//!
//! [`ScheduleWeek`] enforces the grid's invariants itself: no duplicate
//! assignment in a cell, no assignments on blocked cells, PT times only
//! on the PT row. Violations come back as [`Error::Schedule`] values,
//! never panics.
//!
//! ## Rasterization
//!
//! [`render_week_png`] draws the PDF with the in-process tiny-skia
//! backend (feature `rendering`, on by default) and falls back to
//! Ghostscript, then pdftoppm, when the host has them. The PNG is
//! trimmed of blank margins and carries its dpi in a pHYs chunk.
//!
//! ## Quick Start
//!
//! ```
//! use shift_sheet::{render_week_pdf, seed_slots, Day, ScheduleWeek, StaffMap, StyleVariant, Theme};
//! use chrono::NaiveDate;
//!
//! # fn main() -> shift_sheet::Result<()> {
//! let slots = seed_slots();
//! let mut week = ScheduleWeek::new(NaiveDate::from_ymd_opt(2026, 8, 24).unwrap());
//! week.ensure_defaults(&slots);
//!
//! let ten_am = slots.iter().find(|s| s.key == "10am").unwrap();
//! week.assign_staff(ten_am, Day::Mon, 1)?;
//!
//! let staff: StaffMap = [(1, "Alice".to_string())].into_iter().collect();
//! let pdf = render_week_pdf(&week, &slots, &staff, &Theme::default(), StyleVariant::Classic)?;
//! assert!(pdf.starts_with(b"%PDF-1.7"));
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

// Error handling
pub mod error;

// Schedule data model and editing rules
pub mod model;

// Color parsing and blending
pub mod color;

// Style variants, palette derivation, page geometry
pub mod style;

// Text measurement
pub mod measure;

// Page composition (grid -> paint lists)
pub mod compose;

// PDF writing
pub mod writer;

// PDF-to-PNG rasterization
pub mod raster;

// Re-exports
pub use color::Color;
pub use compose::{compose, DocModel};
pub use error::{Error, Result};
pub use measure::FontMetrics;
pub use model::{
    pdf_filename, png_filename, seed_slots, Day, ScheduleWeek, Slot, StaffMap, Theme,
};
pub use raster::{rasterize_pdf, RasterImage, DEFAULT_DPI, MAX_DPI, MIN_DPI};
pub use style::{StyleParams, StyleVariant};
pub use writer::fonts::{resolve_fonts, FontPair};
pub use writer::page::write_document;

/// Render one week's schedule to PDF bytes.
///
/// The top-level entry point: resolves fonts for the theme, composes
/// the page, and writes the document. Slots are re-sorted by
/// `(sort_order, label)` here, so caller ordering can never change the
/// output bytes. The week itself is not mutated; pair with
/// [`ScheduleWeek::ensure_defaults`] when loading.
pub fn render_week_pdf(
    week: &ScheduleWeek,
    slots: &[Slot],
    staff: &StaffMap,
    theme: &Theme,
    variant: StyleVariant,
) -> Result<Vec<u8>> {
    let slots = ordered_slots(slots);
    let mut fonts = resolve_fonts(theme);
    let model = compose(week, &slots, staff, theme, variant, &fonts.body, &fonts.bold);
    write_document(&model, &mut fonts)
}

/// Render one week's schedule to PNG bytes.
///
/// Renders the PDF exactly as [`render_week_pdf`] does, then
/// rasterizes its page via [`rasterize_pdf`] at the requested density
/// (clamped to [`MIN_DPI`]..=[`MAX_DPI`]; 0 selects [`DEFAULT_DPI`]).
pub fn render_week_png(
    week: &ScheduleWeek,
    slots: &[Slot],
    staff: &StaffMap,
    theme: &Theme,
    variant: StyleVariant,
    dpi: u32,
) -> Result<Vec<u8>> {
    let pdf = render_week_pdf(week, slots, staff, theme, variant)?;
    rasterize_pdf(&pdf, dpi)
}

fn ordered_slots(slots: &[Slot]) -> Vec<Slot> {
    let mut ordered = slots.to_vec();
    ordered.sort_by(|a, b| {
        a.sort_order
            .cmp(&b.sort_order)
            .then_with(|| a.label.cmp(&b.label))
    });
    ordered
}

// Version info
/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
