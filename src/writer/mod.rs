//! PDF document writer.
//!
//! Layered bottom-up: [`object`] and [`serializer`] give the object
//! model and its byte form, [`content`] builds operator streams,
//! [`fonts`], [`graphics`] and [`shading`] supply the resources the
//! schedule page needs, and [`page`] assembles the finished document.
//!
//! The whole stack is deterministic: sorted dictionary keys, fixed
//! object-id allocation, no timestamps. Rendering the same schedule
//! twice produces byte-identical files, which the tests lean on.

pub mod content;
pub mod fonts;
pub mod graphics;
pub mod object;
pub mod page;
pub mod serializer;
pub mod shading;

pub use fonts::{resolve_fonts, DocFont, FontPair};
pub use page::write_document;

/// Compress bytes for a FlateDecode stream filter.
pub(crate) fn flate_compress(data: &[u8]) -> std::io::Result<Vec<u8>> {
    use flate2::write::ZlibEncoder;
    use flate2::Compression;
    use std::io::Write;

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    encoder.finish()
}
