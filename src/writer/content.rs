//! PDF content stream builder.
//!
//! Emits the graphics and text operators the schedule page uses
//! (ISO 32000-1 Sections 8-9). Ops are buffered in typed form and
//! rendered to bytes in one pass, one operator per line.

use crate::color::Color;

/// Circle-to-Bézier control point factor for quarter arcs.
const ARC_K: f32 = 0.552_284_75;

/// A buffered content-stream operation.
#[derive(Debug, Clone)]
enum ContentOp {
    /// `q`: push the graphics state.
    SaveState,
    /// `Q`: pop the graphics state.
    RestoreState,
    /// `BT`: open a text object.
    BeginText,
    /// `ET`: close the text object.
    EndText,
    /// `Tf`: select a font resource at a size.
    SetFont(String, f32),
    /// `Tm`: set the text matrix.
    SetTextMatrix(f32, f32, f32, f32, f32, f32),
    /// `Tj` with a literal string, bytes already encoded for the font.
    ShowText(Vec<u8>),
    /// `Tj` with a pre-built hex string (embedded CIDFonts).
    ShowHexText(String),
    /// `rg`: fill color.
    SetFillColorRGB(f32, f32, f32),
    /// `RG`: stroke color.
    SetStrokeColorRGB(f32, f32, f32),
    /// `w`: line width.
    SetLineWidth(f32),
    /// `m`: start a subpath.
    MoveTo(f32, f32),
    /// `l`: straight segment.
    LineTo(f32, f32),
    /// `c`: cubic Bézier segment.
    CurveTo(f32, f32, f32, f32, f32, f32),
    /// `re`: rectangle subpath.
    Rectangle(f32, f32, f32, f32),
    /// `h`: close the subpath.
    ClosePath,
    /// `S`: stroke the path.
    Stroke,
    /// `f`: fill the path.
    Fill,
    /// `B`: fill then stroke.
    FillStroke,
    /// `n`: drop the path unpainted.
    EndPath,
    /// `W`: intersect the clip with the path.
    Clip,
    /// `gs`: apply an ExtGState resource.
    SetExtGState(String),
}

/// `{n} {n} ... {operator}`, numbers in f32 display form.
fn numbers_then(out: &mut Vec<u8>, nums: &[f32], operator: &str) {
    for n in nums {
        out.extend_from_slice(n.to_string().as_bytes());
        out.push(b' ');
    }
    out.extend_from_slice(operator.as_bytes());
}

impl ContentOp {
    /// Append this operator's line, without the trailing newline.
    fn emit_into(&self, out: &mut Vec<u8>) {
        match self {
            ContentOp::SaveState => out.push(b'q'),
            ContentOp::RestoreState => out.push(b'Q'),
            ContentOp::BeginText => out.extend_from_slice(b"BT"),
            ContentOp::EndText => out.extend_from_slice(b"ET"),
            ContentOp::SetFont(name, size) => {
                out.extend_from_slice(format!("/{} {} Tf", name, size).as_bytes());
            }
            ContentOp::SetTextMatrix(a, b, c, d, e, f) => {
                numbers_then(out, &[*a, *b, *c, *d, *e, *f], "Tm");
            }
            ContentOp::ShowText(bytes) => {
                out.push(b'(');
                for &b in bytes {
                    match b {
                        b'(' | b')' | b'\\' => {
                            out.push(b'\\');
                            out.push(b);
                        }
                        b'\n' => out.extend_from_slice(b"\\n"),
                        b'\r' => out.extend_from_slice(b"\\r"),
                        b'\t' => out.extend_from_slice(b"\\t"),
                        _ => out.push(b),
                    }
                }
                out.extend_from_slice(b") Tj");
            }
            ContentOp::ShowHexText(hex) => {
                out.extend_from_slice(hex.as_bytes());
                out.extend_from_slice(b" Tj");
            }
            ContentOp::SetFillColorRGB(r, g, b) => numbers_then(out, &[*r, *g, *b], "rg"),
            ContentOp::SetStrokeColorRGB(r, g, b) => numbers_then(out, &[*r, *g, *b], "RG"),
            ContentOp::SetLineWidth(width) => numbers_then(out, &[*width], "w"),
            ContentOp::MoveTo(x, y) => numbers_then(out, &[*x, *y], "m"),
            ContentOp::LineTo(x, y) => numbers_then(out, &[*x, *y], "l"),
            ContentOp::CurveTo(x1, y1, x2, y2, x3, y3) => {
                numbers_then(out, &[*x1, *y1, *x2, *y2, *x3, *y3], "c");
            }
            ContentOp::Rectangle(x, y, w, h) => numbers_then(out, &[*x, *y, *w, *h], "re"),
            ContentOp::ClosePath => out.push(b'h'),
            ContentOp::Stroke => out.push(b'S'),
            ContentOp::Fill => out.push(b'f'),
            ContentOp::FillStroke => out.push(b'B'),
            ContentOp::EndPath => out.push(b'n'),
            ContentOp::Clip => out.push(b'W'),
            ContentOp::SetExtGState(name) => {
                out.extend_from_slice(format!("/{} gs", name).as_bytes());
            }
        }
    }
}

/// Builder for PDF content streams.
#[derive(Debug, Default)]
pub struct ContentBuilder {
    /// Ops in emission order.
    ops: Vec<ContentOp>,
    /// Last font selected, so repeat selections can be dropped.
    font: Option<(String, f32)>,
    /// Whether a `BT` block is open.
    in_text: bool,
}

impl ContentBuilder {
    /// Create a new content stream builder.
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, op: ContentOp) -> &mut Self {
        self.ops.push(op);
        self
    }

    /// Open a text object unless one is already open.
    pub fn begin_text(&mut self) -> &mut Self {
        if !self.in_text {
            self.in_text = true;
            self.push(ContentOp::BeginText);
        }
        self
    }

    /// Close the open text object, if any.
    pub fn end_text(&mut self) -> &mut Self {
        if self.in_text {
            self.in_text = false;
            self.push(ContentOp::EndText);
        }
        self
    }

    /// Select a font for text operations. Repeat selections are dropped.
    pub fn set_font(&mut self, resource: &str, size: f32) -> &mut Self {
        let selected = (resource, size);
        if self.font.as_ref().map(|(n, s)| (n.as_str(), *s)) != Some(selected) {
            self.font = Some((resource.to_string(), size));
            self.push(ContentOp::SetFont(resource.to_string(), size));
        }
        self
    }

    /// Show pre-encoded literal text at a position.
    pub fn text(&mut self, bytes: Vec<u8>, x: f32, y: f32) -> &mut Self {
        self.begin_text();
        self.push(ContentOp::SetTextMatrix(1.0, 0.0, 0.0, 1.0, x, y));
        self.push(ContentOp::ShowText(bytes))
    }

    /// Show hex-encoded text at a position (embedded CIDFonts).
    ///
    /// `hex` must already be formatted as `<XXXX...>` with one 4-digit
    /// glyph id per character.
    pub fn hex_text(&mut self, hex: &str, x: f32, y: f32) -> &mut Self {
        self.begin_text();
        self.push(ContentOp::SetTextMatrix(1.0, 0.0, 0.0, 1.0, x, y));
        self.push(ContentOp::ShowHexText(hex.to_string()))
    }

    /// Set fill color.
    pub fn fill_color(&mut self, color: Color) -> &mut Self {
        self.push(ContentOp::SetFillColorRGB(color.r, color.g, color.b))
    }

    /// Set stroke color.
    pub fn stroke_color(&mut self, color: Color) -> &mut Self {
        self.push(ContentOp::SetStrokeColorRGB(color.r, color.g, color.b))
    }

    /// Set line width.
    pub fn line_width(&mut self, width: f32) -> &mut Self {
        self.push(ContentOp::SetLineWidth(width))
    }

    /// Push the graphics state. Closes any open text object first.
    pub fn save_state(&mut self) -> &mut Self {
        self.end_text();
        self.push(ContentOp::SaveState)
    }

    /// Pop the graphics state. Closes any open text object first.
    pub fn restore_state(&mut self) -> &mut Self {
        self.end_text();
        self.push(ContentOp::RestoreState)
    }

    /// Append a rectangle to the current path.
    pub fn rect(&mut self, x: f32, y: f32, w: f32, h: f32) -> &mut Self {
        self.push(ContentOp::Rectangle(x, y, w, h))
    }

    /// Start a new subpath at a point.
    pub fn move_to(&mut self, x: f32, y: f32) -> &mut Self {
        self.push(ContentOp::MoveTo(x, y))
    }

    /// Straight segment to a point.
    pub fn line_to(&mut self, x: f32, y: f32) -> &mut Self {
        self.push(ContentOp::LineTo(x, y))
    }

    /// Append a rounded rectangle path with quarter-circle corners.
    pub fn rounded_rect(&mut self, x: f32, y: f32, w: f32, h: f32, r: f32) -> &mut Self {
        let r = r.min(w / 2.0).min(h / 2.0).max(0.0);
        if r <= 0.0 {
            return self.rect(x, y, w, h);
        }
        let k = ARC_K * r;
        self.push(ContentOp::MoveTo(x + r, y));
        self.push(ContentOp::LineTo(x + w - r, y));
        self.push(ContentOp::CurveTo(
            x + w - r + k,
            y,
            x + w,
            y + r - k,
            x + w,
            y + r,
        ));
        self.push(ContentOp::LineTo(x + w, y + h - r));
        self.push(ContentOp::CurveTo(
            x + w,
            y + h - r + k,
            x + w - r + k,
            y + h,
            x + w - r,
            y + h,
        ));
        self.push(ContentOp::LineTo(x + r, y + h));
        self.push(ContentOp::CurveTo(
            x + r - k,
            y + h,
            x,
            y + h - r + k,
            x,
            y + h - r,
        ));
        self.push(ContentOp::LineTo(x, y + r));
        self.push(ContentOp::CurveTo(x, y + r - k, x + r - k, y, x + r, y));
        self.push(ContentOp::ClosePath)
    }

    /// Fill the current path.
    pub fn fill(&mut self) -> &mut Self {
        self.push(ContentOp::Fill)
    }

    /// Stroke the current path.
    pub fn stroke(&mut self) -> &mut Self {
        self.push(ContentOp::Stroke)
    }

    /// Fill and stroke the current path.
    pub fn fill_stroke(&mut self) -> &mut Self {
        self.push(ContentOp::FillStroke)
    }

    /// Clip to the current path, consuming it without painting.
    pub fn clip(&mut self) -> &mut Self {
        self.push(ContentOp::Clip);
        self.push(ContentOp::EndPath)
    }

    /// Select an ExtGState resource (transparency etc).
    pub fn ext_g_state(&mut self, resource: &str) -> &mut Self {
        self.push(ContentOp::SetExtGState(resource.to_string()))
    }

    /// Render the buffered ops, one operator per line.
    pub fn build(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for op in &self.ops {
            op.emit_into(&mut out);
            out.push(b'\n');
        }
        out
    }

    /// Whether nothing has been emitted yet.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}
