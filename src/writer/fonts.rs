//! Font discovery and PDF font objects.
//!
//! The renderer draws with one regular and one bold face. Each is either
//! a system TrueType face discovered through `fontdb` and embedded as a
//! CIDFontType2/Identity-H composite font, or one of the built-in
//! Helvetica pair written as a plain Type1 dictionary with
//! WinAnsiEncoding. Discovery failures are never fatal: the built-in
//! fallback keeps rendering working on hosts with no usable fonts, at
//! the cost of glyph coverage outside WinAnsi.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use lazy_static::lazy_static;
use ttf_parser::{Face, GlyphId};

use crate::error::{Error, Result};
use crate::measure::{BuiltinFace, BuiltinMetrics, FontMetrics};
use crate::model::Theme;
use crate::writer::flate_compress;
use crate::writer::object::{Object, ObjectRef};

/// Families tried when the theme does not name one.
const DEFAULT_FAMILIES: [&str; 2] = ["DejaVu Sans", "Liberation Sans"];

lazy_static! {
    /// System font database, loaded once per process.
    static ref SYSTEM_FONTS: fontdb::Database = {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();
        log::debug!("system font database loaded: {} faces", db.len());
        db
    };
}

// ===== TEXT ENCODING =====

/// Text encoded for a specific font's content-stream representation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodedText {
    /// WinAnsi bytes for a literal string (built-in fonts)
    Literal(Vec<u8>),
    /// `<...>` glyph-id hex string (embedded Identity-H fonts)
    Hex(String),
}

/// Encode text as WinAnsi (CP1252) bytes for a Base-14 font.
///
/// ASCII and Latin-1 pass through; the CP1252 punctuation block covers
/// the characters the composer actually emits (NBSP indents, dashes in
/// notes). Anything else degrades to `?` rather than failing the render.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(text.len());
    for ch in text.chars() {
        let byte = match ch {
            '\u{20}'..='\u{7E}' => ch as u8,
            '\u{A0}'..='\u{FF}' => ch as u8,
            '\u{20AC}' => 0x80,
            '\u{2026}' => 0x85,
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201C}' => 0x93,
            '\u{201D}' => 0x94,
            '\u{2022}' => 0x95,
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            '\u{2122}' => 0x99,
            _ => b'?',
        };
        bytes.push(byte);
    }
    bytes
}

/// Decode WinAnsi bytes back to text.
///
/// Inverse of [`encode_win_ansi`] over the byte values the encoder can
/// produce; the raster backend uses it to turn literal strings from the
/// crate's own content streams back into characters.
pub(crate) fn decode_win_ansi(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|&byte| match byte {
            0x20..=0x7E => byte as char,
            0x80 => '\u{20AC}',
            0x85 => '\u{2026}',
            0x91 => '\u{2018}',
            0x92 => '\u{2019}',
            0x93 => '\u{201C}',
            0x94 => '\u{201D}',
            0x95 => '\u{2022}',
            0x96 => '\u{2013}',
            0x97 => '\u{2014}',
            0x99 => '\u{2122}',
            0xA0..=0xFF => char::from(byte),
            _ => '?',
        })
        .collect()
}

/// Raw bytes and face index of a system face matching the query.
///
/// The raster backend resolves Base-14 resource names through this so
/// literal-string text can still draw with real outlines.
pub(crate) fn system_face_bytes(
    families: &[fontdb::Family],
    weight: fontdb::Weight,
) -> Option<(Vec<u8>, u32)> {
    let query = fontdb::Query {
        families,
        weight,
        ..fontdb::Query::default()
    };
    let id = SYSTEM_FONTS.query(&query)?;
    SYSTEM_FONTS.with_face_data(id, |data, index| (data.to_vec(), index))
}

// ===== BUILT-IN FONTS =====

/// A Base-14 font used when no system face could be embedded.
#[derive(Debug, Clone, Copy)]
pub struct BuiltinFont {
    face: BuiltinFace,
    metrics: BuiltinMetrics,
}

impl BuiltinFont {
    /// Wraps a Base-14 face with its AFM width table.
    pub fn new(face: BuiltinFace) -> BuiltinFont {
        BuiltinFont {
            face,
            metrics: BuiltinMetrics::new(face),
        }
    }

    /// PostScript name for the BaseFont entry.
    pub fn postscript_name(&self) -> &'static str {
        self.face.postscript_name()
    }

    /// The complete Type1 font dictionary. Base-14 fonts need no
    /// descriptor or embedded program.
    pub fn font_object(&self) -> Object {
        Object::dict(vec![
            ("Type", Object::name("Font")),
            ("Subtype", Object::name("Type1")),
            ("BaseFont", Object::name(self.face.postscript_name())),
            ("Encoding", Object::name("WinAnsiEncoding")),
        ])
    }
}

impl FontMetrics for BuiltinFont {
    fn text_width(&self, text: &str, size: f32) -> f32 {
        self.metrics.text_width(text, size)
    }
}

// ===== EMBEDDED FONTS =====

/// A TrueType face embedded as a CIDFontType2 composite font.
///
/// Glyph lookup and width tables are built once at parse time; text
/// encoding records which glyphs a document actually shows so the `W`
/// array and ToUnicode CMap only carry what the page uses. The font
/// program itself is embedded whole (no subsetting), which keeps the
/// writer byte-deterministic without a tag generator.
#[derive(Debug)]
pub struct EmbeddedFont {
    /// PostScript name (falls back to family name, then "Embedded")
    pub name: String,
    data: Arc<Vec<u8>>,
    /// Unicode -> glyph id, cached from the face's cmap
    glyph_lookup: HashMap<char, u16>,
    /// Glyph id -> advance width in 1/1000 em
    glyph_widths: HashMap<u16, u16>,
    /// Glyphs shown so far
    used_glyphs: BTreeSet<u16>,
    /// Glyph id -> unicode, for the ToUnicode CMap
    used_chars: BTreeMap<u16, u32>,
    /// Typographic ascent, 1/1000 em.
    pub ascent: i32,
    /// Typographic descent, 1/1000 em (negative).
    pub descent: i32,
    /// Cap height, 1/1000 em.
    pub cap_height: i32,
    /// Font bounding box, 1/1000 em.
    pub bbox: (i32, i32, i32, i32),
    /// FontDescriptor flags word.
    pub flags: u32,
    /// Estimated vertical stem width.
    pub stem_v: i16,
    /// Italic angle, degrees.
    pub italic_angle: f32,
}

impl EmbeddedFont {
    /// Parse raw TTF/OTF bytes and capture metrics and glyph tables.
    ///
    /// Faces inside font collections are rejected: FontFile2 must carry
    /// a single TrueType program, and the whole collection file is all
    /// we have to embed.
    pub fn from_data(data: Vec<u8>, index: u32) -> Result<EmbeddedFont> {
        if index != 0 {
            return Err(Error::Font(
                "font collection faces cannot be embedded".to_string(),
            ));
        }
        let face = Face::parse(&data, 0)
            .map_err(|e| Error::Font(format!("failed to parse font face: {:?}", e)))?;

        let name = face_name(&face);
        let units_per_em = face.units_per_em().max(1);
        let to_pdf = |v: i16| i32::from(v) * 1000 / i32::from(units_per_em);

        // Walk the BMP once and cache every mapped glyph.
        let mut glyph_lookup = HashMap::new();
        for codepoint in 0..=0xFFFF_u32 {
            if let Some(ch) = char::from_u32(codepoint) {
                if let Some(gid) = face.glyph_index(ch) {
                    glyph_lookup.insert(ch, gid.0);
                }
            }
        }
        if glyph_lookup.is_empty() {
            return Err(Error::Font(format!("font '{}' has no unicode cmap", name)));
        }

        let mut glyph_widths = HashMap::new();
        for gid in 0..face.number_of_glyphs() {
            let advance = face.glyph_hor_advance(GlyphId(gid)).unwrap_or(0);
            let width_1000 = (u32::from(advance) * 1000 / u32::from(units_per_em)) as u16;
            glyph_widths.insert(gid, width_1000);
        }

        let mut flags = 0u32;
        if face.is_monospaced() {
            flags |= 1 << 0;
        }
        flags |= 1 << 5;
        if face.is_italic() {
            flags |= 1 << 6;
        }

        let bbox = face.global_bounding_box();
        Ok(EmbeddedFont {
            name,
            glyph_lookup,
            glyph_widths,
            used_glyphs: BTreeSet::new(),
            used_chars: BTreeMap::new(),
            ascent: to_pdf(face.ascender()),
            descent: to_pdf(face.descender()),
            cap_height: to_pdf(face.capital_height().unwrap_or(face.ascender())),
            bbox: (
                to_pdf(bbox.x_min),
                to_pdf(bbox.y_min),
                to_pdf(bbox.x_max),
                to_pdf(bbox.y_max),
            ),
            flags,
            stem_v: if face.is_bold() { 140 } else { 80 },
            italic_angle: face.italic_angle().unwrap_or(0.0),
            data: Arc::new(data),
        })
    }

    /// Raw font program bytes.
    pub fn font_data(&self) -> &[u8] {
        &self.data
    }

    /// Glyph id for a character, if the face maps it.
    pub fn glyph_id(&self, ch: char) -> Option<u16> {
        self.glyph_lookup.get(&ch).copied()
    }

    /// Advance width of a glyph in 1/1000 em; 500 for unknown ids.
    pub fn glyph_width(&self, gid: u16) -> u16 {
        self.glyph_widths.get(&gid).copied().unwrap_or(500)
    }

    /// Encode a string as an Identity-H hex string, recording the
    /// glyphs used. Unmapped characters encode as glyph 0 (.notdef).
    pub fn encode_string(&mut self, text: &str) -> String {
        let mut hex = String::with_capacity(text.len() * 4 + 2);
        hex.push('<');
        for ch in text.chars() {
            let gid = self.glyph_id(ch).unwrap_or(0);
            self.used_glyphs.insert(gid);
            self.used_chars.entry(gid).or_insert(ch as u32);
            hex.push_str(&format!("{:04X}", gid));
        }
        hex.push('>');
        hex
    }

    /// The FontFile2 stream, flate-compressed, with the uncompressed
    /// length in `Length1` as required for TrueType programs.
    pub fn font_file_object(&self) -> Result<Object> {
        let compressed = flate_compress(&self.data)?;
        Ok(Object::stream(
            vec![
                ("Filter", Object::name("FlateDecode")),
                ("Length1", Object::Integer(self.data.len() as i64)),
            ],
            compressed,
        ))
    }

    /// The FontDescriptor dictionary referencing the font program.
    pub fn descriptor_object(&self, font_file: ObjectRef) -> Object {
        let (llx, lly, urx, ury) = self.bbox;
        Object::dict(vec![
            ("Type", Object::name("FontDescriptor")),
            ("FontName", Object::name(&self.name)),
            ("Flags", Object::Integer(i64::from(self.flags))),
            (
                "FontBBox",
                Object::rect(f64::from(llx), f64::from(lly), f64::from(urx), f64::from(ury)),
            ),
            ("ItalicAngle", Object::Real(f64::from(self.italic_angle))),
            ("Ascent", Object::Integer(i64::from(self.ascent))),
            ("Descent", Object::Integer(i64::from(self.descent))),
            ("CapHeight", Object::Integer(i64::from(self.cap_height))),
            ("StemV", Object::Integer(i64::from(self.stem_v))),
            ("FontFile2", Object::Reference(font_file)),
        ])
    }

    /// The CIDFontType2 descendant dictionary.
    pub fn cid_font_object(&self, descriptor: ObjectRef) -> Object {
        Object::dict(vec![
            ("Type", Object::name("Font")),
            ("Subtype", Object::name("CIDFontType2")),
            ("BaseFont", Object::name(&self.name)),
            (
                "CIDSystemInfo",
                Object::dict(vec![
                    ("Registry", Object::string("Adobe")),
                    ("Ordering", Object::string("Identity")),
                    ("Supplement", Object::Integer(0)),
                ]),
            ),
            ("FontDescriptor", Object::Reference(descriptor)),
            ("DW", Object::Integer(1000)),
            ("W", widths_array(&self.used_glyphs, |gid| self.glyph_width(gid))),
            ("CIDToGIDMap", Object::name("Identity")),
        ])
    }

    /// The Type0 root font dictionary.
    pub fn type0_object(&self, descendant: ObjectRef, to_unicode: ObjectRef) -> Object {
        Object::dict(vec![
            ("Type", Object::name("Font")),
            ("Subtype", Object::name("Type0")),
            ("BaseFont", Object::name(&self.name)),
            ("Encoding", Object::name("Identity-H")),
            ("DescendantFonts", Object::Array(vec![Object::Reference(descendant)])),
            ("ToUnicode", Object::Reference(to_unicode)),
        ])
    }

    /// The ToUnicode CMap stream for text extraction.
    pub fn to_unicode_object(&self) -> Result<Object> {
        let cmap = tounicode_cmap(&self.used_chars);
        let compressed = flate_compress(cmap.as_bytes())?;
        Ok(Object::stream(
            vec![("Filter", Object::name("FlateDecode"))],
            compressed,
        ))
    }
}

impl FontMetrics for EmbeddedFont {
    fn text_width(&self, text: &str, size: f32) -> f32 {
        // Sum the same 1/1000 em widths the W array will carry, so the
        // measured fit matches what a viewer advances by.
        let units: u32 = text
            .chars()
            .map(|ch| u32::from(self.glyph_width(self.glyph_id(ch).unwrap_or(0))))
            .sum();
        units as f32 * size / 1000.0
    }
}

/// Extract a usable face name for BaseFont/FontName entries.
fn face_name(face: &Face) -> String {
    let find = |id: u16| {
        face.names()
            .into_iter()
            .find(|n| n.name_id == id)
            .and_then(|n| n.to_string())
    };
    find(ttf_parser::name_id::POST_SCRIPT_NAME)
        .or_else(|| find(ttf_parser::name_id::FAMILY))
        .map(|n| n.replace(' ', ""))
        .unwrap_or_else(|| "Embedded".to_string())
}

/// Build the CID `W` array, grouping consecutive glyph ids into runs:
/// `[start [w w ...] start [w ...] ...]`.
fn widths_array(used: &BTreeSet<u16>, width_of: impl Fn(u16) -> u16) -> Object {
    let glyphs: Vec<u16> = used.iter().copied().collect();
    let mut entries = Vec::new();
    let mut i = 0;
    while i < glyphs.len() {
        let start = glyphs[i];
        let mut end = start;
        let mut widths = vec![Object::Integer(i64::from(width_of(start)))];
        while i + 1 < glyphs.len() && glyphs[i + 1] == end + 1 {
            i += 1;
            end = glyphs[i];
            widths.push(Object::Integer(i64::from(width_of(end))));
        }
        entries.push(Object::Integer(i64::from(start)));
        entries.push(Object::Array(widths));
        i += 1;
    }
    Object::Array(entries)
}

/// Render the ToUnicode CMap text for glyph -> unicode mappings.
///
/// bfchar sections are chunked at 100 entries; codepoints beyond the
/// BMP are written as UTF-16 surrogate pairs.
fn tounicode_cmap(mappings: &BTreeMap<u16, u32>) -> String {
    let mut cmap = String::new();
    cmap.push_str("/CIDInit /ProcSet findresource begin\n");
    cmap.push_str("12 dict begin\n");
    cmap.push_str("begincmap\n");
    cmap.push_str("/CIDSystemInfo <<\n");
    cmap.push_str("  /Registry (Adobe)\n");
    cmap.push_str("  /Ordering (UCS)\n");
    cmap.push_str("  /Supplement 0\n");
    cmap.push_str(">> def\n");
    cmap.push_str("/CMapName /Adobe-Identity-UCS def\n");
    cmap.push_str("/CMapType 2 def\n");
    cmap.push_str("1 begincodespacerange\n");
    cmap.push_str("<0000> <FFFF>\n");
    cmap.push_str("endcodespacerange\n");

    let entries: Vec<(u16, u32)> = mappings.iter().map(|(&gid, &cp)| (gid, cp)).collect();
    for chunk in entries.chunks(100) {
        cmap.push_str(&format!("{} beginbfchar\n", chunk.len()));
        for &(gid, cp) in chunk {
            if cp <= 0xFFFF {
                cmap.push_str(&format!("<{:04X}> <{:04X}>\n", gid, cp));
            } else {
                let high = ((cp - 0x10000) >> 10) + 0xD800;
                let low = ((cp - 0x10000) & 0x3FF) + 0xDC00;
                cmap.push_str(&format!("<{:04X}> <{:04X}{:04X}>\n", gid, high, low));
            }
        }
        cmap.push_str("endbfchar\n");
    }

    cmap.push_str("endcmap\n");
    cmap.push_str("CMapName currentdict /CMap defineresource pop\n");
    cmap.push_str("end\n");
    cmap.push_str("end\n");
    cmap
}

// ===== DOCUMENT FONTS =====

/// One of the two faces a document draws with.
#[derive(Debug)]
pub enum DocFont {
    /// A Base-14 font, drawn as literal WinAnsi strings.
    Builtin(BuiltinFont),
    /// An embedded system face, drawn as hex glyph-id strings.
    Embedded(EmbeddedFont),
}

impl DocFont {
    /// Whether this face embeds a font program.
    pub fn is_embedded(&self) -> bool {
        matches!(self, DocFont::Embedded(_))
    }

    /// Encode text in this font's content-stream form, recording glyph
    /// usage for embedded faces.
    pub fn encode_text(&mut self, text: &str) -> EncodedText {
        match self {
            DocFont::Builtin(_) => EncodedText::Literal(encode_win_ansi(text)),
            DocFont::Embedded(font) => EncodedText::Hex(font.encode_string(text)),
        }
    }
}

impl FontMetrics for DocFont {
    fn text_width(&self, text: &str, size: f32) -> f32 {
        match self {
            DocFont::Builtin(font) => font.text_width(text, size),
            DocFont::Embedded(font) => font.text_width(text, size),
        }
    }
}

/// The regular/bold pair a render uses.
#[derive(Debug)]
pub struct FontPair {
    /// Regular face (F1).
    pub body: DocFont,
    /// Bold face (F2).
    pub bold: DocFont,
}

impl FontPair {
    /// The Base-14 Helvetica pair, bypassing discovery entirely.
    pub fn builtin() -> FontPair {
        FontPair {
            body: DocFont::Builtin(BuiltinFont::new(BuiltinFace::Helvetica)),
            bold: DocFont::Builtin(BuiltinFont::new(BuiltinFace::HelveticaBold)),
        }
    }
}

/// Resolve the document faces for a theme.
///
/// A theme override names one family and is honored or falls straight
/// back to the built-ins; without an override the default families are
/// tried in order. Either way resolution failure degrades silently to
/// Base-14 with a single warning.
pub fn resolve_fonts(theme: &Theme) -> FontPair {
    FontPair {
        body: resolve_in(
            &SYSTEM_FONTS,
            theme.font_body.as_deref(),
            fontdb::Weight::NORMAL,
            BuiltinFace::Helvetica,
        ),
        bold: resolve_in(
            &SYSTEM_FONTS,
            theme.font_bold.as_deref(),
            fontdb::Weight::BOLD,
            BuiltinFace::HelveticaBold,
        ),
    }
}

fn resolve_in(
    db: &fontdb::Database,
    family_override: Option<&str>,
    weight: fontdb::Weight,
    fallback: BuiltinFace,
) -> DocFont {
    let family_override = family_override.map(str::trim).filter(|f| !f.is_empty());
    let families: Vec<fontdb::Family> = match family_override {
        Some(name) => vec![fontdb::Family::Name(name)],
        None => DEFAULT_FAMILIES
            .iter()
            .map(|name| fontdb::Family::Name(name))
            .collect(),
    };
    let query = fontdb::Query {
        families: &families,
        weight,
        ..fontdb::Query::default()
    };

    if let Some(id) = db.query(&query) {
        let parsed = db.with_face_data(id, |data, index| {
            EmbeddedFont::from_data(data.to_vec(), index)
        });
        match parsed {
            Some(Ok(font)) => {
                log::debug!("resolved font '{}' (weight {})", font.name, weight.0);
                return DocFont::Embedded(font);
            }
            Some(Err(e)) => log::warn!("system font unusable: {}", e),
            None => log::warn!("system font data unavailable for query match"),
        }
    }

    log::warn!(
        "no system font for {:?} (weight {}); using built-in {}",
        family_override.unwrap_or("default families"),
        weight.0,
        fallback.postscript_name()
    );
    DocFont::Builtin(BuiltinFont::new(fallback))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::serializer::ObjectSerializer;

    #[test]
    fn test_win_ansi_ascii_passthrough() {
        assert_eq!(encode_win_ansi("Alice"), b"Alice".to_vec());
        assert_eq!(encode_win_ansi("10am - 2pm"), b"10am - 2pm".to_vec());
    }

    #[test]
    fn test_win_ansi_latin1_and_punctuation() {
        assert_eq!(encode_win_ansi("\u{a0}\u{a0}Bob"), vec![0xA0, 0xA0, b'B', b'o', b'b']);
        assert_eq!(encode_win_ansi("caf\u{e9}"), vec![b'c', b'a', b'f', 0xE9]);
        assert_eq!(encode_win_ansi("1 \u{2013} 7"), vec![b'1', b' ', 0x96, b' ', b'7']);
    }

    #[test]
    fn test_win_ansi_unknown_degrades_to_question_mark() {
        assert_eq!(encode_win_ansi("\u{2192}"), vec![b'?']);
        assert_eq!(encode_win_ansi("\u{4eca}\u{5468}"), vec![b'?', b'?']);
    }

    #[test]
    fn test_win_ansi_decode_inverts_encode() {
        for text in ["Alice", "caf\u{e9}", "1 \u{2013} 7", "\u{a0}\u{a0}Bob"] {
            assert_eq!(decode_win_ansi(&encode_win_ansi(text)), text);
        }
        assert_eq!(decode_win_ansi(&[0x01, 0x7F]), "??");
    }

    #[test]
    fn test_builtin_font_object() {
        let font = BuiltinFont::new(BuiltinFace::HelveticaBold);
        let serializer = ObjectSerializer::new();
        let text = serializer.serialize_to_string(&font.font_object());
        assert!(text.contains("/Type /Font"));
        assert!(text.contains("/Subtype /Type1"));
        assert!(text.contains("/BaseFont /Helvetica-Bold"));
        assert!(text.contains("/Encoding /WinAnsiEncoding"));
    }

    #[test]
    fn test_builtin_text_width_uses_afm_tables() {
        let font = DocFont::Builtin(BuiltinFont::new(BuiltinFace::HelveticaBold));
        // S 667 + h 611 + i 278 + f 333 + t 333 = 2222 units.
        let w = font.text_width("Shift", 11.5);
        assert!((w - 2.222 * 11.5).abs() < 1e-3);
    }

    #[test]
    fn test_builtin_encode_text_is_literal() {
        let mut font = DocFont::Builtin(BuiltinFont::new(BuiltinFace::Helvetica));
        match font.encode_text("Alice") {
            EncodedText::Literal(bytes) => assert_eq!(bytes, b"Alice".to_vec()),
            EncodedText::Hex(_) => panic!("builtin fonts encode as literal strings"),
        }
    }

    #[test]
    fn test_widths_array_groups_consecutive_runs() {
        let used: BTreeSet<u16> = [1, 2, 3, 10, 11, 20].into_iter().collect();
        let arr = widths_array(&used, |gid| gid * 10);
        let serializer = ObjectSerializer::new();
        let text = serializer.serialize_to_string(&arr);
        assert_eq!(text, "[1 [10 20 30] 10 [100 110] 20 [200]]");
    }

    #[test]
    fn test_widths_array_empty() {
        let arr = widths_array(&BTreeSet::new(), |_| 0);
        let serializer = ObjectSerializer::new();
        assert_eq!(serializer.serialize_to_string(&arr), "[]");
    }

    #[test]
    fn test_tounicode_cmap_structure() {
        let mut mappings = BTreeMap::new();
        mappings.insert(0x41u16, 'A' as u32);
        mappings.insert(0x42u16, 'B' as u32);
        let cmap = tounicode_cmap(&mappings);
        assert!(cmap.starts_with("/CIDInit /ProcSet findresource begin"));
        assert!(cmap.contains("/CMapName /Adobe-Identity-UCS def"));
        assert!(cmap.contains("<0000> <FFFF>"));
        assert!(cmap.contains("2 beginbfchar"));
        assert!(cmap.contains("<0041> <0041>"));
        assert!(cmap.contains("<0042> <0042>"));
        assert!(cmap.ends_with("end\nend\n"));
    }

    #[test]
    fn test_tounicode_cmap_chunks_at_100() {
        let mappings: BTreeMap<u16, u32> = (0..150u16).map(|g| (g, 0x4E00 + u32::from(g))).collect();
        let cmap = tounicode_cmap(&mappings);
        assert!(cmap.contains("100 beginbfchar"));
        assert!(cmap.contains("50 beginbfchar"));
        assert_eq!(cmap.matches("endbfchar").count(), 2);
    }

    #[test]
    fn test_tounicode_cmap_surrogate_pairs() {
        let mut mappings = BTreeMap::new();
        mappings.insert(7u16, 0x1F600u32);
        let cmap = tounicode_cmap(&mappings);
        assert!(cmap.contains("<0007> <D83DDE00>"));
    }

    #[test]
    fn test_resolve_empty_database_falls_back_to_builtin() {
        let db = fontdb::Database::new();
        let font = resolve_in(&db, None, fontdb::Weight::NORMAL, BuiltinFace::Helvetica);
        assert!(!font.is_embedded());
        let font = resolve_in(
            &db,
            Some("No Such Family"),
            fontdb::Weight::BOLD,
            BuiltinFace::HelveticaBold,
        );
        assert!(!font.is_embedded());
    }

    #[test]
    fn test_resolve_blank_override_uses_defaults() {
        let db = fontdb::Database::new();
        let font = resolve_in(&db, Some("   "), fontdb::Weight::NORMAL, BuiltinFace::Helvetica);
        assert!(!font.is_embedded());
    }
}
