//! Example: render one week's schedule to PDF and PNG files
//!
//! Seeds a week with the default slot set, a few staff assignments, and
//! the stock theme, then writes both output formats into the current
//! directory.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example render_week
//! ```

use std::error::Error;
use std::fs;

use chrono::NaiveDate;
use shift_sheet::{
    pdf_filename, png_filename, render_week_pdf, render_week_png, seed_slots, Day, ScheduleWeek,
    StaffMap, StyleVariant, Theme,
};

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let slots = seed_slots();
    let mut week = ScheduleWeek::new(NaiveDate::from_ymd_opt(2026, 8, 24).unwrap());
    week.ensure_defaults(&slots);

    let staff: StaffMap = [(1, "Alice"), (2, "Bob"), (3, "Priya"), (4, "Marco")]
        .into_iter()
        .map(|(id, name)| (id, name.to_string()))
        .collect();

    let slot = |key: &str| slots.iter().find(|s| s.key == key).cloned().unwrap();
    let ten_am = slot("10am");
    let noon = slot("12pm");
    let off = slot("off_day");
    let pt = slot("pt");

    for day in Day::ALL {
        week.assign_staff(&ten_am, day, 1)?;
    }
    week.assign_staff(&noon, Day::Mon, 2)?;
    week.assign_staff(&noon, Day::Wed, 3)?;
    week.assign_staff(&off, Day::Sun, 4)?;
    week.assign_staff(&pt, Day::Sat, 3)?;
    week.set_pt_time("pt", Day::Sat, "7-11")?;
    week.set_blocked(&pt, Day::Sun)?;
    week.notes = "Keys with Alice. Deliveries arrive Wednesday morning.".to_string();

    let theme = Theme::default();

    println!("Rendering the week of {}...", week.week_start);

    let pdf = render_week_pdf(&week, &slots, &staff, &theme, StyleVariant::Classic)?;
    let pdf_name = pdf_filename(&week);
    fs::write(&pdf_name, &pdf)?;
    println!("  Saved: {} ({} bytes)", pdf_name, pdf.len());

    let dpi = 450;
    let png = render_week_png(&week, &slots, &staff, &theme, StyleVariant::Compact, dpi)?;
    let png_name = png_filename(&week, dpi);
    fs::write(&png_name, &png)?;
    println!("  Saved: {} ({} bytes)", png_name, png.len());

    Ok(())
}
