//! Extended graphics state dictionaries.
//!
//! The schedule page only needs constant-alpha transparency for the
//! card drop shadow, so this is a small subset of ExtGState
//! (ISO 32000-1 Section 8.4.5).

use crate::writer::object::Object;

/// Alphas outside [0, 1] are pinned to the range.
fn unit_alpha(a: f32) -> f32 {
    a.clamp(0.0, 1.0)
}

/// Builder for an ExtGState dictionary.
#[derive(Debug, Default)]
pub struct ExtGStateBuilder {
    fill_alpha: Option<f32>,
    stroke_alpha: Option<f32>,
}

impl ExtGStateBuilder {
    /// Create a new builder with no overrides.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the non-stroking (fill) alpha, clamped to [0, 1].
    pub fn fill_alpha(mut self, alpha: f32) -> Self {
        self.fill_alpha = Some(unit_alpha(alpha));
        self
    }

    /// Set the stroking alpha, clamped to [0, 1].
    pub fn stroke_alpha(mut self, alpha: f32) -> Self {
        self.stroke_alpha = Some(unit_alpha(alpha));
        self
    }

    /// Set both alphas at once.
    pub fn alpha(self, alpha: f32) -> Self {
        self.fill_alpha(alpha).stroke_alpha(alpha)
    }

    /// Build the ExtGState dictionary object.
    pub fn build(self) -> Object {
        let mut entries = vec![("Type", Object::name("ExtGState"))];
        if let Some(ca) = self.fill_alpha {
            entries.push(("ca", Object::Real(ca as f64)));
        }
        if let Some(ca) = self.stroke_alpha {
            entries.push(("CA", Object::Real(ca as f64)));
        }
        Object::dict(entries)
    }
}
