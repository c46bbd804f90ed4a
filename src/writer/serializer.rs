//! PDF syntax emission.
//!
//! Turns [`Object`] trees into the byte syntax of ISO 32000-1:2008.
//! Dictionary keys come out sorted, so the same document model always
//! serializes to the same bytes.

use super::object::Object;
use std::collections::HashMap;

/// Uppercase hex digits, shared by `#xx` name escapes and `<...>`
/// hex strings.
const HEX: &[u8; 16] = b"0123456789ABCDEF";

/// Writes [`Object`] values in PDF syntax.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectSerializer {
    /// Compact mode drops the pretty-printed dictionary layout.
    compact: bool,
}

impl ObjectSerializer {
    /// Create a serializer that pretty-prints dictionary entries.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a serializer that emits minimal whitespace.
    pub fn compact() -> Self {
        Self { compact: true }
    }

    /// Render an object to bytes.
    pub fn serialize(&self, obj: &Object) -> Vec<u8> {
        let mut out = Vec::new();
        emit(&mut out, obj, self.compact);
        out
    }

    /// Serialize an object to a string (for debugging and tests).
    pub fn serialize_to_string(&self, obj: &Object) -> String {
        String::from_utf8_lossy(&self.serialize(obj)).to_string()
    }

    /// Serialize an indirect object definition.
    ///
    /// Format: `{id} {gen} obj\n{object}\nendobj\n`
    pub fn serialize_indirect(&self, id: u32, gen: u16, obj: &Object) -> Vec<u8> {
        let mut out = format!("{} {} obj\n", id, gen).into_bytes();
        emit(&mut out, obj, self.compact);
        out.extend_from_slice(b"\nendobj\n");
        out
    }
}

/// Append the serialized form of `obj` to `out`.
///
/// Byte-vector writes cannot fail, so the emitters below return
/// nothing.
fn emit(out: &mut Vec<u8>, obj: &Object, compact: bool) {
    match obj {
        Object::Null => out.extend_from_slice(b"null"),
        Object::Boolean(true) => out.extend_from_slice(b"true"),
        Object::Boolean(false) => out.extend_from_slice(b"false"),
        Object::Integer(n) => out.extend_from_slice(n.to_string().as_bytes()),
        Object::Real(v) => emit_real(out, *v),
        Object::String(data) => emit_string(out, data),
        Object::Name(name) => emit_name(out, name),
        Object::Array(items) => {
            out.push(b'[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(b' ');
                }
                emit(out, item, compact);
            }
            out.push(b']');
        }
        Object::Dictionary(dict) => emit_dict(out, dict, compact),
        Object::Stream { dict, data } => {
            // /Length comes from the payload unless the caller set one.
            let mut with_len = dict.clone();
            with_len
                .entry("Length".to_string())
                .or_insert(Object::Integer(data.len() as i64));
            emit_dict(out, &with_len, compact);
            out.extend_from_slice(b"\nstream\n");
            out.extend_from_slice(data);
            out.extend_from_slice(b"\nendstream");
        }
        Object::Reference(r) => out.extend_from_slice(format!("{} {} R", r.id, r.gen).as_bytes()),
    }
}

/// Reals keep at most five decimal places, trailing zeros dropped.
fn emit_real(out: &mut Vec<u8>, v: f64) {
    if v.fract() == 0.0 {
        out.extend_from_slice((v as i64).to_string().as_bytes());
        return;
    }
    let mut text = format!("{:.5}", v);
    while text.ends_with('0') {
        text.pop();
    }
    if text.ends_with('.') {
        text.pop();
    }
    out.extend_from_slice(text.as_bytes());
}

/// Readable ASCII takes literal `(...)` form with backslash escapes;
/// anything else becomes an uppercase hex string.
fn emit_string(out: &mut Vec<u8>, data: &[u8]) {
    let readable = data
        .iter()
        .copied()
        .all(|b| matches!(b, b'\n' | b'\r' | b'\t' | 0x20..=0x7E));

    if readable {
        out.push(b'(');
        for &b in data {
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
        out.push(b')');
    } else {
        out.push(b'<');
        for &b in data {
            out.push(HEX[(b >> 4) as usize]);
            out.push(HEX[(b & 0x0F) as usize]);
        }
        out.push(b'>');
    }
}

fn emit_name(out: &mut Vec<u8>, name: &str) {
    out.push(b'/');
    for b in name.bytes() {
        if plain_name_byte(b) {
            out.push(b);
        } else {
            out.push(b'#');
            out.push(HEX[(b >> 4) as usize]);
            out.push(HEX[(b & 0x0F) as usize]);
        }
    }
}

/// Bytes a name token may carry without a `#xx` escape.
fn plain_name_byte(b: u8) -> bool {
    b.is_ascii_graphic()
        && !matches!(
            b,
            b'#' | b'/' | b':' | b'=' | b'[' | b'\\' | b']' | b'{' | b'}'
        )
}

/// Dictionary keys are sorted so output never depends on hash order.
fn emit_dict(out: &mut Vec<u8>, dict: &HashMap<String, Object>, compact: bool) {
    let mut entries: Vec<(&String, &Object)> = dict.iter().collect();
    entries.sort_by_key(|&(k, _)| k);

    out.extend_from_slice(b"<<");
    for &(key, value) in &entries {
        if !compact {
            out.extend_from_slice(b"\n  ");
        }
        emit_name(out, key);
        out.push(b' ');
        emit(out, value, compact);
    }
    if !compact && !entries.is_empty() {
        out.push(b'\n');
    }
    out.extend_from_slice(b">>");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::object::ObjectRef;

    #[test]
    fn test_serialize_scalars() {
        let ser = ObjectSerializer::new();
        assert_eq!(ser.serialize_to_string(&Object::Null), "null");
        assert_eq!(ser.serialize_to_string(&Object::Boolean(true)), "true");
        assert_eq!(ser.serialize_to_string(&Object::Boolean(false)), "false");
        assert_eq!(ser.serialize_to_string(&Object::Integer(-123)), "-123");
    }

    #[test]
    fn test_serialize_real() {
        let ser = ObjectSerializer::new();
        assert_eq!(ser.serialize_to_string(&Object::Real(1.0)), "1");
        assert_eq!(ser.serialize_to_string(&Object::Real(0.5)), "0.5");
        assert_eq!(ser.serialize_to_string(&Object::Real(45.35433)), "45.35433");
        assert_eq!(ser.serialize_to_string(&Object::Real(-2.2)), "-2.2");
        // Rounding to five places can leave a bare trailing point.
        assert_eq!(ser.serialize_to_string(&Object::Real(2.000004)), "2");
    }

    #[test]
    fn test_serialize_string_escaping() {
        let ser = ObjectSerializer::new();
        assert_eq!(
            ser.serialize_to_string(&Object::String(b"Sam's (late) shift".to_vec())),
            "(Sam's \\(late\\) shift)"
        );
    }

    #[test]
    fn test_serialize_binary_string_as_hex() {
        let ser = ObjectSerializer::new();
        assert_eq!(
            ser.serialize_to_string(&Object::String(vec![0x00, 0xFF, 0x80])),
            "<00FF80>"
        );
    }

    #[test]
    fn test_serialize_name_escapes() {
        let ser = ObjectSerializer::new();
        assert_eq!(
            ser.serialize_to_string(&Object::name("Name With Space")),
            "/Name#20With#20Space"
        );
        assert_eq!(ser.serialize_to_string(&Object::name("FlateDecode")), "/FlateDecode");
    }

    #[test]
    fn test_pretty_mode_indents_dictionary_entries() {
        let ser = ObjectSerializer::new();
        let d = Object::dict(vec![("Type", Object::name("Page"))]);
        assert_eq!(ser.serialize_to_string(&d), "<<\n  /Type /Page\n>>");
        assert_eq!(ser.serialize_to_string(&Object::dict(vec![])), "<<>>");
    }

    #[test]
    fn test_dictionary_keys_are_sorted() {
        let ser = ObjectSerializer::compact();
        let d = Object::dict(vec![
            ("Zebra", Object::Integer(1)),
            ("Alpha", Object::Integer(2)),
            ("Mid", Object::Integer(3)),
        ]);
        let out = ser.serialize_to_string(&d);
        let a = out.find("/Alpha").unwrap();
        let m = out.find("/Mid").unwrap();
        let z = out.find("/Zebra").unwrap();
        assert!(a < m && m < z);
    }

    #[test]
    fn test_serialize_indirect_and_reference() {
        let ser = ObjectSerializer::new();
        let bytes = ser.serialize_indirect(7, 0, &Object::Integer(42));
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.starts_with("7 0 obj"));
        assert!(text.contains("42"));
        assert!(text.ends_with("endobj\n"));
        assert_eq!(
            ser.serialize_to_string(&Object::Reference(ObjectRef::new(10, 0))),
            "10 0 R"
        );
    }

    #[test]
    fn test_serialize_stream_includes_length() {
        let ser = ObjectSerializer::compact();
        let stream = Object::Stream {
            dict: HashMap::new(),
            data: b"0 0 10 10 re f".to_vec(),
        };
        let out = ser.serialize_to_string(&stream);
        assert!(out.contains("/Length 14"));
        assert!(out.contains("stream\n0 0 10 10 re f\nendstream"));
    }
}
