use crate::pdf::merge::merge_page;
use crate::pdf::overlay::{mm, Canvas, PageSize};
use anyhow::{Context, Result};
use lopdf::Document;
use tracing::debug;

/// Where and how page numbers are drawn.
///
/// The overlay is always laid out on `page_size`, whatever the size of the
/// page it lands on.
#[derive(Debug, Clone, PartialEq)]
pub struct StampStyle {
    pub page_size: PageSize,
    /// Counter-clockwise rotation applied before drawing, in degrees.
    pub rotation: f32,
    /// Text origin in the rotated frame, in points.
    pub offset_x: f32,
    pub offset_y: f32,
    pub font: &'static str,
    pub font_size: f32,
}

impl Default for StampStyle {
    fn default() -> Self {
        StampStyle {
            page_size: PageSize::A4,
            rotation: 270.0,
            offset_x: mm(-18.0),
            offset_y: mm(20.0),
            font: "Helvetica",
            font_size: 12.0,
        }
    }
}

/// Render the overlay carrying `number`.
pub fn page_number_overlay(number: usize, style: &StampStyle) -> Result<Document> {
    let mut canvas = Canvas::new(style.page_size).with_font(style.font, style.font_size);
    canvas.rotate(style.rotation);
    canvas.draw_string(style.offset_x, style.offset_y, &number.to_string());
    canvas.finish()
}

/// Number every page of `doc` from 1 in page order.
///
/// Returns how many pages were stamped.
pub fn stamp_page_numbers(doc: &mut Document, style: &StampStyle) -> Result<usize> {
    let pages = doc.get_pages();

    for (index, page_id) in pages.values().enumerate() {
        let number = index + 1;
        let overlay = page_number_overlay(number, style)?;
        merge_page(doc, *page_id, &overlay)
            .with_context(|| format!("Failed to stamp page {}", number))?;
        debug!(page = number, "stamped page number");
    }

    Ok(pages.len())
}
