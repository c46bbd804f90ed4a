//! Document assembly.
//!
//! Walks a composed [`DocModel`] in paint order, encodes its text
//! through the resolved fonts, and serializes the single-page document.
//! Object ids are allocated in a fixed order and every stream is
//! deterministic, so rendering the same inputs twice yields
//! byte-identical files.
//!
//! Font values carry per-document glyph usage; callers hand each
//! render a freshly resolved [`FontPair`].

use std::io::Write;

use crate::color::Color;
use crate::compose::{DocModel, FaceRole};
use crate::error::Result;
use crate::style::{DOC_TITLE, GRADIENT_STEPS, PAGE_H, PAGE_W};
use crate::writer::content::ContentBuilder;
use crate::writer::fonts::{DocFont, EncodedText, FontPair};
use crate::writer::graphics::ExtGStateBuilder;
use crate::writer::object::{Object, ObjectRef};
use crate::writer::serializer::ObjectSerializer;
use crate::writer::shading::paint_vertical_gradient;
use crate::writer::flate_compress;

/// Serialize a composed document to PDF bytes.
pub fn write_document(model: &DocModel, fonts: &mut FontPair) -> Result<Vec<u8>> {
    let content = build_content(model, fonts);
    let compressed = flate_compress(&content)?;
    log::debug!(
        "content stream {} bytes ({} compressed)",
        content.len(),
        compressed.len()
    );

    let mut writer = DocumentWriter::new();
    let catalog_id = writer.alloc();
    let pages_id = writer.alloc();
    let page_id = writer.alloc();

    let contents_ref = writer.add(Object::stream(
        vec![("Filter", Object::name("FlateDecode"))],
        compressed,
    ));
    let shadow_gs_ref = writer.add(
        ExtGStateBuilder::new()
            .fill_alpha(model.table_card.shadow_alpha)
            .build(),
    );
    let body_ref = add_font(&mut writer, &fonts.body)?;
    let bold_ref = add_font(&mut writer, &fonts.bold)?;
    let info_ref = writer.add(Object::dict(vec![
        ("Title", Object::string(DOC_TITLE)),
        ("Creator", Object::string("shift_sheet")),
    ]));

    writer.put(
        catalog_id,
        Object::dict(vec![
            ("Type", Object::name("Catalog")),
            ("Pages", Object::reference(pages_id, 0)),
        ]),
    );
    writer.put(
        pages_id,
        Object::dict(vec![
            ("Type", Object::name("Pages")),
            ("Kids", Object::Array(vec![Object::reference(page_id, 0)])),
            ("Count", Object::Integer(1)),
        ]),
    );
    writer.put(
        page_id,
        Object::dict(vec![
            ("Type", Object::name("Page")),
            ("Parent", Object::reference(pages_id, 0)),
            (
                "MediaBox",
                Object::rect(0.0, 0.0, f64::from(PAGE_W), f64::from(PAGE_H)),
            ),
            (
                "Resources",
                Object::dict(vec![
                    (
                        "Font",
                        Object::dict(vec![
                            ("F1", Object::Reference(body_ref)),
                            ("F2", Object::Reference(bold_ref)),
                        ]),
                    ),
                    (
                        "ExtGState",
                        Object::dict(vec![("GS0", Object::Reference(shadow_gs_ref))]),
                    ),
                ]),
            ),
            ("Contents", Object::Reference(contents_ref)),
        ]),
    );

    writer.finish(ObjectRef::new(catalog_id, 0), info_ref)
}

/// Emit the page's operators in paint order.
fn build_content(model: &DocModel, fonts: &mut FontPair) -> Vec<u8> {
    let mut builder = ContentBuilder::new();

    // Header band gradient.
    let band = &model.header_card;
    paint_vertical_gradient(
        &mut builder,
        band.rect.x,
        band.rect.y,
        band.rect.w,
        band.rect.h,
        band.rect.radius,
        band.bottom,
        band.top,
        GRADIENT_STEPS,
    );

    // Card drop shadow, then the card plate itself.
    let card = &model.table_card;
    builder.save_state();
    builder.ext_g_state("GS0");
    builder.fill_color(card.shadow_color);
    builder.rounded_rect(
        card.shadow.x,
        card.shadow.y,
        card.shadow.w,
        card.shadow.h,
        card.shadow.radius,
    );
    builder.fill();
    builder.restore_state();

    builder.fill_color(card.fill);
    builder.stroke_color(card.stroke);
    builder.line_width(card.stroke_w);
    builder.rounded_rect(
        card.rect.x,
        card.rect.y,
        card.rect.w,
        card.rect.h,
        card.rect.radius,
    );
    builder.fill_stroke();

    // Cell backgrounds overpaint the card, square corners included.
    let mut last_fill: Option<Color> = None;
    for fill in &model.cell_fills {
        if last_fill != Some(fill.color) {
            builder.fill_color(fill.color);
            last_fill = Some(fill.color);
        }
        builder.rect(fill.x, fill.y, fill.w, fill.h);
        builder.fill();
    }

    // Grid lines, header divider last.
    for line in &model.grid_lines {
        builder.stroke_color(line.color);
        builder.line_width(line.width);
        builder.move_to(line.x1, line.y1);
        builder.line_to(line.x2, line.y2);
        builder.stroke();
    }

    // Text runs.
    let mut last_text_color: Option<Color> = None;
    builder.begin_text();
    for run in &model.runs {
        let (resource, font) = match run.face {
            FaceRole::Body => ("F1", &mut fonts.body),
            FaceRole::Bold => ("F2", &mut fonts.bold),
        };
        builder.set_font(resource, run.size);
        if last_text_color != Some(run.color) {
            builder.fill_color(run.color);
            last_text_color = Some(run.color);
        }
        match font.encode_text(&run.text) {
            EncodedText::Literal(bytes) => {
                builder.text(bytes, run.x, run.y);
            }
            EncodedText::Hex(hex) => {
                builder.hex_text(&hex, run.x, run.y);
            }
        }
    }
    builder.end_text();

    builder.build()
}

/// Add a font's object graph, returning the ref the resource dict uses.
fn add_font(writer: &mut DocumentWriter, font: &DocFont) -> Result<ObjectRef> {
    match font {
        DocFont::Builtin(builtin) => Ok(writer.add(builtin.font_object())),
        DocFont::Embedded(embedded) => {
            let file_ref = writer.add(embedded.font_file_object()?);
            let descriptor_ref = writer.add(embedded.descriptor_object(file_ref));
            let cid_ref = writer.add(embedded.cid_font_object(descriptor_ref));
            let unicode_ref = writer.add(embedded.to_unicode_object()?);
            Ok(writer.add(embedded.type0_object(cid_ref, unicode_ref)))
        }
    }
}

/// Collects numbered objects and serializes the document skeleton.
struct DocumentWriter {
    objects: Vec<(u32, Object)>,
    next_id: u32,
}

impl DocumentWriter {
    fn new() -> DocumentWriter {
        DocumentWriter {
            objects: Vec::new(),
            next_id: 1,
        }
    }

    /// Reserve the next object id.
    fn alloc(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Store an object under a previously reserved id.
    fn put(&mut self, id: u32, obj: Object) {
        self.objects.push((id, obj));
    }

    /// Allocate and store in one step.
    fn add(&mut self, obj: Object) -> ObjectRef {
        let id = self.alloc();
        self.put(id, obj);
        ObjectRef::new(id, 0)
    }

    /// Write header, body, xref table, and trailer.
    fn finish(mut self, root: ObjectRef, info: ObjectRef) -> Result<Vec<u8>> {
        let serializer = ObjectSerializer::compact();
        let mut output = Vec::new();

        writeln!(output, "%PDF-1.7")?;
        output.extend_from_slice(b"%\xE2\xE3\xCF\xD3\n");

        self.objects.sort_by_key(|(id, _)| *id);
        let mut xref_offsets: Vec<usize> = Vec::with_capacity(self.objects.len());
        for (id, obj) in &self.objects {
            xref_offsets.push(output.len());
            output.extend_from_slice(&serializer.serialize_indirect(*id, 0, obj));
        }

        let xref_start = output.len();
        writeln!(output, "xref")?;
        writeln!(output, "0 {}", self.next_id)?;
        writeln!(output, "0000000000 65535 f ")?;
        for offset in &xref_offsets {
            writeln!(output, "{:010} 00000 n ", offset)?;
        }

        let trailer = Object::dict(vec![
            ("Size", Object::Integer(i64::from(self.next_id))),
            ("Root", Object::Reference(root)),
            ("Info", Object::Reference(info)),
        ]);
        writeln!(output, "trailer")?;
        output.extend_from_slice(&serializer.serialize(&trailer));
        writeln!(output)?;
        writeln!(output, "startxref")?;
        writeln!(output, "{}", xref_start)?;
        write!(output, "%%EOF")?;

        Ok(output)
    }
}
