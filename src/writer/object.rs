//! PDF object model for the writer.
//!
//! A small subset of the PDF object system (ISO 32000-1 Section 7.3):
//! just the shapes the schedule document needs. The constructors on
//! [`Object`] keep page-building code terse.

use std::collections::HashMap;

/// Reference to an indirect object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectRef {
    /// Object number.
    pub id: u32,
    /// Generation number (always 0 in freshly written documents).
    pub gen: u16,
}

impl ObjectRef {
    /// Creates a reference to object `id` at generation `gen`.
    pub fn new(id: u32, gen: u16) -> Self {
        ObjectRef { id, gen }
    }
}

/// A PDF object.
#[derive(Debug, Clone, PartialEq)]
pub enum Object {
    /// The null object.
    Null,
    /// `true` or `false`.
    Boolean(bool),
    /// Whole number.
    Integer(i64),
    /// Fractional number.
    Real(f64),
    /// String bytes, already encoded for the target font or encoding.
    String(Vec<u8>),
    /// Name token, written with a leading slash.
    Name(String),
    /// Ordered list of objects.
    Array(Vec<Object>),
    /// Dictionary keyed by name.
    Dictionary(HashMap<String, Object>),
    /// A dictionary plus a raw byte payload.
    Stream {
        /// Stream dictionary (`Length` is filled in at write time).
        dict: HashMap<String, Object>,
        /// Stream payload, already encoded/compressed.
        data: Vec<u8>,
    },
    /// Reference to an indirect object.
    Reference(ObjectRef),
}

fn entry_map(entries: Vec<(&str, Object)>) -> HashMap<String, Object> {
    entries.into_iter().map(|(k, v)| (k.to_owned(), v)).collect()
}

impl Object {
    /// Name object from a bare token.
    pub fn name(s: &str) -> Object {
        Object::Name(s.to_owned())
    }

    /// String object from text (Latin subset, one byte per char).
    pub fn string(s: &str) -> Object {
        Object::String(s.bytes().collect())
    }

    /// Reference object pointing at `id`, generation `gen`.
    pub fn reference(id: u32, gen: u16) -> Object {
        Object::Reference(ObjectRef::new(id, gen))
    }

    /// Dictionary object from key/value entries.
    pub fn dict(entries: Vec<(&str, Object)>) -> Object {
        Object::Dictionary(entry_map(entries))
    }

    /// Rectangle array `[llx lly urx ury]` from an origin and size.
    pub fn rect(x: f64, y: f64, width: f64, height: f64) -> Object {
        let corners = [x, y, x + width, y + height];
        Object::Array(corners.into_iter().map(Object::Real).collect())
    }

    /// Stream object; `Length` is filled in when serialized.
    pub fn stream(entries: Vec<(&str, Object)>, data: Vec<u8>) -> Object {
        Object::Stream {
            dict: entry_map(entries),
            data,
        }
    }
}
