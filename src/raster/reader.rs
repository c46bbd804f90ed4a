//! Minimal reader for the documents this crate writes.
//!
//! The in-process raster backend re-opens the crate's own output: one
//! page, a flate-compressed content stream, two font resources, and one
//! ExtGState. This reader parses exactly that shape. It is not a
//! general PDF parser; indirect stream lengths, object streams, and
//! multi-page trees are out of scope and surface as [`Error::Pdf`].

use std::collections::HashMap;
use std::io::Read;

use flate2::read::ZlibDecoder;

use crate::error::{Error, Result};
use crate::writer::object::{Object, ObjectRef};

// ===== PARSED PAGE =====

/// One font resource on the parsed page.
#[derive(Debug, Clone, PartialEq)]
pub enum PageFont {
    /// Base-14 simple font; its text arrives as WinAnsi literal strings.
    Simple { base_font: String },
    /// Embedded CIDFontType2; its text arrives as glyph-id hex strings.
    Embedded { font_file: Vec<u8> },
}

/// The single page of a schedule document, ready for rasterization.
#[derive(Debug, Clone)]
pub struct ParsedPage {
    /// Page width in points (from the MediaBox)
    pub width: f32,
    /// Page height in points
    pub height: f32,
    /// Decompressed content stream
    pub content: Vec<u8>,
    /// Font resources by resource name (`F1`, `F2`)
    pub fonts: HashMap<String, PageFont>,
    /// Fill alpha per ExtGState resource name (`GS0`)
    pub fill_alpha: HashMap<String, f32>,
}

/// Parse a schedule document and surface its single page.
pub fn read_page(pdf: &[u8]) -> Result<ParsedPage> {
    let (objects, trailer) = scan_document(pdf)?;

    let catalog = as_dict(entry(&objects, &trailer, "Root")?, "catalog")?;
    let pages = as_dict(entry(&objects, catalog, "Pages")?, "page tree")?;
    let kids = match entry(&objects, pages, "Kids")? {
        Object::Array(kids) if !kids.is_empty() => kids,
        _ => return Err(Error::Pdf("page tree has no kids".to_string())),
    };
    let page = as_dict(resolve(&objects, &kids[0]), "page")?;

    let (width, height) = media_box_size(entry(&objects, page, "MediaBox")?)?;
    let content = match entry(&objects, page, "Contents")? {
        Object::Stream { dict, data } => decode_stream(dict, data)?,
        _ => return Err(Error::Pdf("page contents is not a stream".to_string())),
    };

    let resources = as_dict(entry(&objects, page, "Resources")?, "resources")?;
    let fonts = font_resources(&objects, resources)?;
    let fill_alpha = alpha_resources(&objects, resources);

    log::debug!(
        "parsed page {}x{} pt, {} content bytes, {} fonts",
        width,
        height,
        content.len(),
        fonts.len()
    );
    Ok(ParsedPage {
        width,
        height,
        content,
        fonts,
        fill_alpha,
    })
}

/// Collect every indirect object up to the xref table, then the trailer.
fn scan_document(pdf: &[u8]) -> Result<(HashMap<u32, Object>, HashMap<String, Object>)> {
    let mut lex = Lexer::new(pdf);
    let mut objects = HashMap::new();
    loop {
        lex.skip_whitespace();
        if lex.at_end() {
            return Err(Error::Pdf("no xref table".to_string()));
        }
        if lex.starts_with(b"xref") {
            break;
        }
        let (id, object) = lex.parse_indirect()?;
        objects.insert(id, object);
    }

    // The table between here and the trailer is fixed-width digit lines.
    while !lex.at_end() && !lex.starts_with(b"trailer") {
        lex.pos += 1;
    }
    if !lex.eat_keyword(b"trailer") {
        return Err(Error::Pdf("no trailer dictionary".to_string()));
    }
    match lex.parse_object()? {
        Object::Dictionary(dict) => Ok((objects, dict)),
        _ => Err(Error::Pdf("trailer is not a dictionary".to_string())),
    }
}

fn resolve<'a>(objects: &'a HashMap<u32, Object>, object: &'a Object) -> &'a Object {
    match object {
        Object::Reference(r) => objects.get(&r.id).unwrap_or(&Object::Null),
        direct => direct,
    }
}

/// Fetch and resolve a dictionary entry.
fn entry<'a>(
    objects: &'a HashMap<u32, Object>,
    dict: &'a HashMap<String, Object>,
    key: &str,
) -> Result<&'a Object> {
    dict.get(key)
        .map(|value| resolve(objects, value))
        .ok_or_else(|| Error::Pdf(format!("missing /{}", key)))
}

fn as_dict<'a>(object: &'a Object, what: &str) -> Result<&'a HashMap<String, Object>> {
    match object {
        Object::Dictionary(dict) => Ok(dict),
        Object::Stream { dict, .. } => Ok(dict),
        _ => Err(Error::Pdf(format!("{} is not a dictionary", what))),
    }
}

fn as_number(object: &Object) -> Option<f32> {
    match object {
        Object::Integer(n) => Some(*n as f32),
        Object::Real(r) => Some(*r as f32),
        _ => None,
    }
}

fn media_box_size(object: &Object) -> Result<(f32, f32)> {
    let Object::Array(values) = object else {
        return Err(Error::Pdf("MediaBox is not an array".to_string()));
    };
    let corners: Vec<f32> = values.iter().filter_map(as_number).collect();
    if corners.len() != 4 {
        return Err(Error::Pdf("MediaBox needs four numbers".to_string()));
    }
    Ok((corners[2] - corners[0], corners[3] - corners[1]))
}

fn decode_stream(dict: &HashMap<String, Object>, data: &[u8]) -> Result<Vec<u8>> {
    match dict.get("Filter") {
        Some(Object::Name(name)) if name == "FlateDecode" => inflate(data),
        Some(other) => Err(Error::Pdf(format!("unsupported stream filter {:?}", other))),
        None => Ok(data.to_vec()),
    }
}

fn inflate(data: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    ZlibDecoder::new(data)
        .read_to_end(&mut out)
        .map_err(|e| Error::Pdf(format!("flate stream is corrupt: {}", e)))?;
    Ok(out)
}

fn font_resources(
    objects: &HashMap<u32, Object>,
    resources: &HashMap<String, Object>,
) -> Result<HashMap<String, PageFont>> {
    let mut fonts = HashMap::new();
    let Some(font_dict) = resources.get("Font") else {
        return Ok(fonts);
    };
    let font_dict = as_dict(resolve(objects, font_dict), "font resources")?;
    for (resource, value) in font_dict {
        let dict = as_dict(resolve(objects, value), "font")?;
        fonts.insert(resource.clone(), parse_font(objects, dict)?);
    }
    Ok(fonts)
}

fn parse_font(
    objects: &HashMap<u32, Object>,
    dict: &HashMap<String, Object>,
) -> Result<PageFont> {
    match dict.get("Subtype") {
        Some(Object::Name(subtype)) if subtype == "Type0" => {
            let descendants = match entry(objects, dict, "DescendantFonts")? {
                Object::Array(refs) if !refs.is_empty() => refs,
                _ => return Err(Error::Pdf("Type0 font without descendants".to_string())),
            };
            let cid = as_dict(resolve(objects, &descendants[0]), "CID font")?;
            let descriptor = as_dict(entry(objects, cid, "FontDescriptor")?, "font descriptor")?;
            let font_file = match entry(objects, descriptor, "FontFile2")? {
                Object::Stream { dict, data } => decode_stream(dict, data)?,
                _ => return Err(Error::Pdf("FontFile2 is not a stream".to_string())),
            };
            Ok(PageFont::Embedded { font_file })
        }
        _ => {
            let base_font = match dict.get("BaseFont") {
                Some(Object::Name(name)) => name.clone(),
                _ => String::new(),
            };
            Ok(PageFont::Simple { base_font })
        }
    }
}

fn alpha_resources(
    objects: &HashMap<u32, Object>,
    resources: &HashMap<String, Object>,
) -> HashMap<String, f32> {
    let mut alphas = HashMap::new();
    let Some(states) = resources.get("ExtGState") else {
        return alphas;
    };
    let Ok(states) = as_dict(resolve(objects, states), "ExtGState") else {
        return alphas;
    };
    for (resource, value) in states {
        if let Ok(dict) = as_dict(resolve(objects, value), "graphics state") {
            if let Some(alpha) = dict.get("ca").and_then(as_number) {
                alphas.insert(resource.clone(), alpha);
            }
        }
    }
    alphas
}

// ===== CONTENT STREAM OPERATIONS =====

/// A content-stream operation the raster backend replays.
///
/// Covers exactly the operator subset the writer emits.
#[derive(Debug, Clone, PartialEq)]
pub enum PageOp {
    /// `q`: push graphics state.
    Save,
    /// `Q`: pop graphics state.
    Restore,
    /// `w`: set stroke width.
    LineWidth(f32),
    /// `rg`: set fill color.
    FillColor(f32, f32, f32),
    /// `RG`: set stroke color.
    StrokeColor(f32, f32, f32),
    /// `re`: append a rectangle (x, y, w, h) to the path.
    Rect(f32, f32, f32, f32),
    /// `m`: start a subpath.
    MoveTo(f32, f32),
    /// `l`: straight segment.
    LineTo(f32, f32),
    /// `c`: cubic segment with two control points.
    CurveTo(f32, f32, f32, f32, f32, f32),
    /// `h`: close the subpath.
    ClosePath,
    /// `f`: fill the path.
    Fill,
    /// `S`: stroke the path.
    Stroke,
    /// `B`: fill then stroke.
    FillStroke,
    /// `W`: mark the path as a pending clip.
    Clip,
    /// `n`: end the path without painting (applies a pending clip).
    EndPath,
    /// `gs`: select an ExtGState by resource name.
    ExtGState(String),
    /// `BT`: begin a text object.
    BeginText,
    /// `ET`: end a text object.
    EndText,
    /// `Tf`: select a font resource at a size.
    SetFont(String, f32),
    /// `Tm`: set the text matrix.
    TextMatrix(f32, f32, f32, f32, f32, f32),
    /// Literal string: WinAnsi bytes for a Base-14 font.
    ShowText(Vec<u8>),
    /// Hex string: big-endian glyph-id byte pairs for an embedded font.
    ShowHex(Vec<u8>),
}

#[derive(Debug, Clone)]
enum Operand {
    Number(f32),
    Name(String),
    Literal(Vec<u8>),
    Hex(Vec<u8>),
}

/// Tokenize a decompressed content stream into operations.
pub fn parse_content(content: &[u8]) -> Result<Vec<PageOp>> {
    let mut lex = Lexer::new(content);
    let mut ops = Vec::new();
    let mut operands: Vec<Operand> = Vec::new();
    loop {
        lex.skip_whitespace();
        let Some(byte) = lex.peek() else {
            break;
        };
        match byte {
            b'(' => operands.push(Operand::Literal(lex.parse_literal_bytes()?)),
            b'<' => operands.push(Operand::Hex(lex.parse_hex_bytes()?)),
            b'/' => operands.push(Operand::Name(lex.parse_name()?)),
            b'+' | b'-' | b'.' | b'0'..=b'9' => {
                let number = lex.parse_number()?;
                let value = as_number(&number)
                    .ok_or_else(|| Error::Pdf("malformed numeric operand".to_string()))?;
                operands.push(Operand::Number(value));
            }
            _ => {
                let keyword = lex.parse_operator_keyword();
                if keyword.is_empty() {
                    return Err(lex.error(format!("stray byte 0x{:02X} in content", byte)));
                }
                if let Some(op) = build_op(&keyword, &mut operands)? {
                    ops.push(op);
                }
                operands.clear();
            }
        }
    }
    Ok(ops)
}

fn build_op(keyword: &str, operands: &mut Vec<Operand>) -> Result<Option<PageOp>> {
    let op = match keyword {
        "q" => PageOp::Save,
        "Q" => PageOp::Restore,
        "w" => {
            let [width] = pop_numbers(keyword, operands)?;
            PageOp::LineWidth(width)
        }
        "rg" => {
            let [r, g, b] = pop_numbers(keyword, operands)?;
            PageOp::FillColor(r, g, b)
        }
        "RG" => {
            let [r, g, b] = pop_numbers(keyword, operands)?;
            PageOp::StrokeColor(r, g, b)
        }
        "re" => {
            let [x, y, w, h] = pop_numbers(keyword, operands)?;
            PageOp::Rect(x, y, w, h)
        }
        "m" => {
            let [x, y] = pop_numbers(keyword, operands)?;
            PageOp::MoveTo(x, y)
        }
        "l" => {
            let [x, y] = pop_numbers(keyword, operands)?;
            PageOp::LineTo(x, y)
        }
        "c" => {
            let [x1, y1, x2, y2, x3, y3] = pop_numbers(keyword, operands)?;
            PageOp::CurveTo(x1, y1, x2, y2, x3, y3)
        }
        "h" => PageOp::ClosePath,
        "f" => PageOp::Fill,
        "S" => PageOp::Stroke,
        "B" => PageOp::FillStroke,
        "W" => PageOp::Clip,
        "n" => PageOp::EndPath,
        "gs" => PageOp::ExtGState(pop_name(keyword, operands)?),
        "BT" => PageOp::BeginText,
        "ET" => PageOp::EndText,
        "Tf" => {
            let [size] = pop_numbers(keyword, operands)?;
            PageOp::SetFont(pop_name(keyword, operands)?, size)
        }
        "Tm" => {
            let [a, b, c, d, e, f] = pop_numbers(keyword, operands)?;
            PageOp::TextMatrix(a, b, c, d, e, f)
        }
        "Tj" => match operands.pop() {
            Some(Operand::Literal(bytes)) => PageOp::ShowText(bytes),
            Some(Operand::Hex(bytes)) => PageOp::ShowHex(bytes),
            _ => return Err(Error::Pdf("Tj without a string operand".to_string())),
        },
        _ => {
            log::debug!("ignoring content operator '{}'", keyword);
            return Ok(None);
        }
    };
    Ok(Some(op))
}

fn pop_numbers<const N: usize>(keyword: &str, operands: &mut Vec<Operand>) -> Result<[f32; N]> {
    if operands.len() < N {
        return Err(Error::Pdf(format!(
            "'{}' needs {} numeric operands",
            keyword, N
        )));
    }
    let mut values = [0.0f32; N];
    for slot in values.iter_mut().rev() {
        match operands.pop() {
            Some(Operand::Number(n)) => *slot = n,
            _ => {
                return Err(Error::Pdf(format!(
                    "'{}' got a non-numeric operand",
                    keyword
                )))
            }
        }
    }
    Ok(values)
}

fn pop_name(keyword: &str, operands: &mut Vec<Operand>) -> Result<String> {
    match operands.pop() {
        Some(Operand::Name(name)) => Ok(name),
        _ => Err(Error::Pdf(format!("'{}' needs a name operand", keyword))),
    }
}

// ===== LEXER =====

fn is_whitespace(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\r' | b'\n' | b'\0' | b'\x0C')
}

fn is_delimiter(byte: u8) -> bool {
    matches!(
        byte,
        b'(' | b')' | b'<' | b'>' | b'[' | b']' | b'{' | b'}' | b'/' | b'%'
    )
}

fn is_regular(byte: u8) -> bool {
    !is_whitespace(byte) && !is_delimiter(byte)
}

fn hex_value(byte: u8) -> u8 {
    match byte {
        b'0'..=b'9' => byte - b'0',
        b'a'..=b'f' => byte - b'a' + 10,
        b'A'..=b'F' => byte - b'A' + 10,
        _ => 0,
    }
}

/// Byte cursor over PDF syntax.
struct Lexer<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Lexer<'a> {
    fn new(data: &'a [u8]) -> Lexer<'a> {
        Lexer { data, pos: 0 }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.data.len()
    }

    fn peek(&self) -> Option<u8> {
        self.data.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let byte = self.peek()?;
        self.pos += 1;
        Some(byte)
    }

    fn error(&self, message: String) -> Error {
        Error::Pdf(format!("{} at byte {}", message, self.pos))
    }

    /// Skip whitespace and `%` comments (which covers the header lines).
    fn skip_whitespace(&mut self) {
        while let Some(byte) = self.peek() {
            if is_whitespace(byte) {
                self.pos += 1;
            } else if byte == b'%' {
                while let Some(b) = self.bump() {
                    if b == b'\n' || b == b'\r' {
                        break;
                    }
                }
            } else {
                break;
            }
        }
    }

    fn starts_with(&self, keyword: &[u8]) -> bool {
        self.data
            .get(self.pos..)
            .is_some_and(|rest| rest.starts_with(keyword))
    }

    fn eat_keyword(&mut self, keyword: &[u8]) -> bool {
        if self.starts_with(keyword) {
            self.pos += keyword.len();
            true
        } else {
            false
        }
    }

    fn expect_keyword(&mut self, keyword: &str) -> Result<()> {
        self.skip_whitespace();
        if self.eat_keyword(keyword.as_bytes()) {
            Ok(())
        } else {
            Err(self.error(format!("expected '{}'", keyword)))
        }
    }

    /// Parse `id gen obj <object> endobj`.
    fn parse_indirect(&mut self) -> Result<(u32, Object)> {
        self.skip_whitespace();
        let id = self
            .try_parse_unsigned()
            .ok_or_else(|| self.error("expected object number".to_string()))?;
        self.skip_whitespace();
        self.try_parse_unsigned()
            .ok_or_else(|| self.error("expected generation number".to_string()))?;
        self.expect_keyword("obj")?;
        let object = self.parse_object()?;
        self.expect_keyword("endobj")?;
        Ok((id, object))
    }

    fn parse_object(&mut self) -> Result<Object> {
        self.skip_whitespace();
        match self.peek() {
            Some(b'<') if self.starts_with(b"<<") => self.parse_dictionary_or_stream(),
            Some(b'<') => Ok(Object::String(self.parse_hex_bytes()?)),
            Some(b'(') => Ok(Object::String(self.parse_literal_bytes()?)),
            Some(b'[') => self.parse_array(),
            Some(b'/') => Ok(Object::Name(self.parse_name()?)),
            Some(b't') | Some(b'f') | Some(b'n') => self.parse_keyword_object(),
            Some(byte) if byte == b'+' || byte == b'-' || byte == b'.' || byte.is_ascii_digit() => {
                self.parse_number_or_reference()
            }
            Some(byte) => Err(self.error(format!("unexpected byte 0x{:02X}", byte))),
            None => Err(self.error("unexpected end of data".to_string())),
        }
    }

    fn parse_keyword_object(&mut self) -> Result<Object> {
        if self.eat_keyword(b"true") {
            Ok(Object::Boolean(true))
        } else if self.eat_keyword(b"false") {
            Ok(Object::Boolean(false))
        } else if self.eat_keyword(b"null") {
            Ok(Object::Null)
        } else {
            Err(self.error("unknown keyword".to_string()))
        }
    }

    fn parse_number(&mut self) -> Result<Object> {
        let start = self.pos;
        if matches!(self.peek(), Some(b'+') | Some(b'-')) {
            self.pos += 1;
        }
        let mut saw_dot = false;
        while let Some(byte) = self.peek() {
            match byte {
                b'0'..=b'9' => self.pos += 1,
                b'.' if !saw_dot => {
                    saw_dot = true;
                    self.pos += 1;
                }
                _ => break,
            }
        }
        let text = std::str::from_utf8(&self.data[start..self.pos]).unwrap_or("");
        if saw_dot {
            text.parse::<f64>()
                .map(Object::Real)
                .map_err(|_| self.error(format!("malformed real '{}'", text)))
        } else {
            text.parse::<i64>()
                .map(Object::Integer)
                .map_err(|_| self.error(format!("malformed integer '{}'", text)))
        }
    }

    fn try_parse_unsigned(&mut self) -> Option<u32> {
        let start = self.pos;
        while matches!(self.peek(), Some(b'0'..=b'9')) {
            self.pos += 1;
        }
        if self.pos == start {
            return None;
        }
        std::str::from_utf8(&self.data[start..self.pos])
            .ok()?
            .parse()
            .ok()
    }

    /// A number, or `N G R` collapsed to a reference.
    fn parse_number_or_reference(&mut self) -> Result<Object> {
        let number = self.parse_number()?;
        if let Object::Integer(id) = number {
            let checkpoint = self.pos;
            self.skip_whitespace();
            if let Some(gen) = self.try_parse_unsigned() {
                self.skip_whitespace();
                if self.eat_keyword(b"R")
                    && !matches!(self.peek(), Some(b) if is_regular(b))
                    && id >= 0
                    && gen <= u32::from(u16::MAX)
                {
                    return Ok(Object::Reference(ObjectRef::new(id as u32, gen as u16)));
                }
            }
            self.pos = checkpoint;
        }
        Ok(number)
    }

    fn parse_literal_bytes(&mut self) -> Result<Vec<u8>> {
        self.pos += 1; // consume '('
        let mut bytes = Vec::new();
        let mut depth = 1usize;
        while let Some(byte) = self.bump() {
            match byte {
                b'\\' => {
                    let Some(escaped) = self.bump() else { break };
                    match escaped {
                        b'n' => bytes.push(b'\n'),
                        b'r' => bytes.push(b'\r'),
                        b't' => bytes.push(b'\t'),
                        other => bytes.push(other),
                    }
                }
                b'(' => {
                    depth += 1;
                    bytes.push(byte);
                }
                b')' => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(bytes);
                    }
                    bytes.push(byte);
                }
                _ => bytes.push(byte),
            }
        }
        Err(self.error("unterminated literal string".to_string()))
    }

    fn parse_hex_bytes(&mut self) -> Result<Vec<u8>> {
        self.pos += 1; // consume '<'
        let mut digits = Vec::new();
        loop {
            match self.bump() {
                Some(b'>') => break,
                Some(byte) if byte.is_ascii_hexdigit() => digits.push(byte),
                Some(byte) if is_whitespace(byte) => {}
                Some(byte) => {
                    return Err(self.error(format!("invalid hex digit 0x{:02X}", byte)))
                }
                None => return Err(self.error("unterminated hex string".to_string())),
            }
        }
        if digits.len() % 2 == 1 {
            digits.push(b'0');
        }
        Ok(digits
            .chunks_exact(2)
            .map(|pair| (hex_value(pair[0]) << 4) | hex_value(pair[1]))
            .collect())
    }

    fn parse_name(&mut self) -> Result<String> {
        self.pos += 1; // consume '/'
        let mut name = String::new();
        while let Some(byte) = self.peek() {
            if !is_regular(byte) {
                break;
            }
            self.pos += 1;
            if byte == b'#' {
                let hi = self.bump();
                let lo = self.bump();
                match (hi, lo) {
                    (Some(hi), Some(lo)) if hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit() => {
                        name.push(char::from((hex_value(hi) << 4) | hex_value(lo)));
                    }
                    _ => return Err(self.error("truncated #-escape in name".to_string())),
                }
            } else {
                name.push(char::from(byte));
            }
        }
        Ok(name)
    }

    fn parse_array(&mut self) -> Result<Object> {
        self.pos += 1; // consume '['
        let mut items = Vec::new();
        loop {
            self.skip_whitespace();
            match self.peek() {
                Some(b']') => {
                    self.pos += 1;
                    return Ok(Object::Array(items));
                }
                Some(_) => items.push(self.parse_object()?),
                None => return Err(self.error("unterminated array".to_string())),
            }
        }
    }

    fn parse_dictionary_or_stream(&mut self) -> Result<Object> {
        self.pos += 2; // consume '<<'
        let mut dict = HashMap::new();
        loop {
            self.skip_whitespace();
            match self.peek() {
                Some(b'>') if self.starts_with(b">>") => {
                    self.pos += 2;
                    break;
                }
                Some(b'/') => {
                    let key = self.parse_name()?;
                    let value = self.parse_object()?;
                    dict.insert(key, value);
                }
                Some(byte) => {
                    return Err(self.error(format!("unexpected 0x{:02X} in dictionary", byte)))
                }
                None => return Err(self.error("unterminated dictionary".to_string())),
            }
        }

        let checkpoint = self.pos;
        self.skip_whitespace();
        if !self.eat_keyword(b"stream") {
            self.pos = checkpoint;
            return Ok(Object::Dictionary(dict));
        }
        if self.peek() == Some(b'\r') {
            self.pos += 1;
        }
        if self.peek() == Some(b'\n') {
            self.pos += 1;
        }
        let length = match dict.get("Length") {
            Some(Object::Integer(n)) if *n >= 0 => *n as usize,
            _ => return Err(self.error("stream without a direct /Length".to_string())),
        };
        if self.pos + length > self.data.len() {
            return Err(self.error("stream data runs past end of input".to_string()));
        }
        let data = self.data[self.pos..self.pos + length].to_vec();
        self.pos += length;
        self.expect_keyword("endstream")?;
        Ok(Object::Stream { dict, data })
    }

    /// Bare operator keyword in a content stream.
    fn parse_operator_keyword(&mut self) -> String {
        let start = self.pos;
        while let Some(byte) = self.peek() {
            if byte.is_ascii_alphabetic() || byte == b'*' || byte == b'\'' || byte == b'"' {
                self.pos += 1;
            } else {
                break;
            }
        }
        String::from_utf8_lossy(&self.data[start..self.pos]).to_string()
    }
}
