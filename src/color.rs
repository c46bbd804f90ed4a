//! Color parsing and blending for schedule themes.
//!
//! Palette derivation works on CSS-style hex strings (`#RRGGBB` or the
//! shorthand `#RGB`). Blending happens in normalized f64 channel space
//! and truncates back to 8-bit, so a theme's derived tints come out
//! byte-identical on every platform and every run.

/// An RGB color with channels in `[0.0, 1.0]`.
///
/// This is the working representation used by the composer and both
/// render backends. Parsing and formatting round-trip through the
/// 8-bit hex form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    /// Red channel.
    pub r: f32,
    /// Green channel.
    pub g: f32,
    /// Blue channel.
    pub b: f32,
}

impl Color {
    /// `#FFFFFF`.
    pub const WHITE: Color = Color {
        r: 1.0,
        g: 1.0,
        b: 1.0,
    };

    /// `#000000`.
    pub const BLACK: Color = Color {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };

    /// Creates a color from normalized channels.
    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Color { r, g, b }
    }

    /// Creates a color from 8-bit channels.
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Color {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
        }
    }

    /// Parses `#RRGGBB` or `#RGB` (leading `#` and surrounding
    /// whitespace optional, hex digits in either case).
    ///
    /// Returns `None` for anything else. Callers that need a fallback
    /// chain with `unwrap_or(Color::WHITE)`.
    pub fn from_hex(hex: &str) -> Option<Color> {
        let (r, g, b) = hex_to_rgb8(hex)?;
        Some(Color::from_rgb8(r, g, b))
    }

    /// Formats as `#RRGGBB` with uppercase hex digits.
    pub fn to_hex(&self) -> String {
        format!(
            "#{:02X}{:02X}{:02X}",
            channel_to_u8(self.r as f64),
            channel_to_u8(self.g as f64),
            channel_to_u8(self.b as f64)
        )
    }

    /// Linear interpolation toward `other` by `t` in `[0, 1]`.
    pub fn lerp(self, other: Color, t: f32) -> Color {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        Color {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
        }
    }

    /// Blends toward `dst` with the same f64 truncating channel math as
    /// [`blend_hex`], keeping gradient bands in step with the
    /// hex-derived palette.
    pub fn blend(self, dst: Color, t: f64) -> Color {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let ch = |s: f32, d: f32| -> f32 {
            let v = s as f64 + (d as f64 - s as f64) * t;
            channel_to_u8(v) as f32 / 255.0
        };
        Color {
            r: ch(self.r, dst.r),
            g: ch(self.g, dst.g),
            b: ch(self.b, dst.b),
        }
    }
}

/// Blends `src` toward `dst` by `t` and returns the result as hex.
///
/// `t` outside `[0, 1]` is clamped, NaN counts as `0.0`. Channels are
/// lerped in f64 and truncated (not rounded) to 8-bit, which pins the
/// derived palette exactly: blending black toward white at `t = 0.5`
/// yields `#7F7F7F`, never `#808080`. A malformed operand is treated
/// as white.
pub fn blend_hex(src: &str, dst: &str, t: f64) -> String {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    let (sr, sg, sb) = hex_to_rgb01(src).unwrap_or((1.0, 1.0, 1.0));
    let (dr, dg, db) = hex_to_rgb01(dst).unwrap_or((1.0, 1.0, 1.0));
    let r = sr + (dr - sr) * t;
    let g = sg + (dg - sg) * t;
    let b = sb + (db - sb) * t;
    format!(
        "#{:02X}{:02X}{:02X}",
        channel_to_u8(r),
        channel_to_u8(g),
        channel_to_u8(b)
    )
}

/// Blends `src` toward white by `t`. Shorthand for the most common
/// palette derivation.
pub fn lighten(src: &str, t: f64) -> String {
    blend_hex(src, "#FFFFFF", t)
}

/// Clamps `v` to `[lo, hi]`, mapping NaN to `lo`.
///
/// Used for font size and column width knobs where an out-of-range
/// value should degrade to the nearest safe bound instead of erroring.
pub fn clamp_f32(v: f32, lo: f32, hi: f32) -> f32 {
    if v.is_nan() {
        lo
    } else {
        v.clamp(lo, hi)
    }
}

fn channel_to_u8(c: f64) -> u8 {
    // Truncation toward zero, matching the palette contract above.
    (c * 255.0) as u8
}

fn hex_to_rgb8(hex: &str) -> Option<(u8, u8, u8)> {
    let h = hex.trim().trim_start_matches('#');
    let expanded;
    let h = match h.len() {
        3 => {
            let mut s = String::with_capacity(6);
            for c in h.chars() {
                s.push(c);
                s.push(c);
            }
            expanded = s;
            &expanded
        }
        6 => h,
        _ => return None,
    };
    let r = u8::from_str_radix(&h[0..2], 16).ok()?;
    let g = u8::from_str_radix(&h[2..4], 16).ok()?;
    let b = u8::from_str_radix(&h[4..6], 16).ok()?;
    Some((r, g, b))
}

fn hex_to_rgb01(hex: &str) -> Option<(f64, f64, f64)> {
    let (r, g, b) = hex_to_rgb8(hex)?;
    Some((r as f64 / 255.0, g as f64 / 255.0, b as f64 / 255.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_six_digit() {
        let c = Color::from_hex("#611B29").unwrap();
        assert_eq!(c.to_hex(), "#611B29");
    }

    #[test]
    fn test_parse_three_digit_expands() {
        assert_eq!(Color::from_hex("#FA3").unwrap().to_hex(), "#FFAA33");
        assert_eq!(Color::from_hex("fa3").unwrap().to_hex(), "#FFAA33");
    }

    #[test]
    fn test_parse_tolerates_whitespace_and_missing_hash() {
        assert_eq!(Color::from_hex(" 0F172A ").unwrap().to_hex(), "#0F172A");
        assert_eq!(Color::from_hex("ffffff").unwrap().to_hex(), "#FFFFFF");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Color::from_hex("").is_none());
        assert!(Color::from_hex("#12345").is_none());
        assert!(Color::from_hex("#GGGGGG").is_none());
        assert!(Color::from_hex("not a color").is_none());
    }

    #[test]
    fn test_color_blend_matches_hex_blend() {
        let a = Color::from_hex("#4D1520").unwrap();
        let b = Color::from_hex("#804853").unwrap();
        for t in [0.0, 0.25, 0.5, 1.0 / 89.0, 88.0 / 89.0, 1.0] {
            assert_eq!(a.blend(b, t).to_hex(), blend_hex("#4D1520", "#804853", t));
        }
    }

    #[test]
    fn test_blend_endpoints_are_exact() {
        assert_eq!(blend_hex("#611B29", "#FFFFFF", 0.0), "#611B29");
        assert_eq!(blend_hex("#611B29", "#FFFFFF", 1.0), "#FFFFFF");
        assert_eq!(blend_hex("#000000", "#ABCDEF", 1.0), "#ABCDEF");
    }

    #[test]
    fn test_blend_truncates_midpoint() {
        // 0.5 * 255 = 127.5 truncates to 0x7F.
        assert_eq!(blend_hex("#000000", "#FFFFFF", 0.5), "#7F7F7F");
    }

    #[test]
    fn test_blend_clamps_t() {
        assert_eq!(blend_hex("#611B29", "#FFFFFF", -0.5), "#611B29");
        assert_eq!(blend_hex("#611B29", "#FFFFFF", 2.0), "#FFFFFF");
        assert_eq!(blend_hex("#611B29", "#FFFFFF", f64::NAN), "#611B29");
    }

    #[test]
    fn test_blend_malformed_operand_is_white() {
        assert_eq!(blend_hex("bogus", "#000000", 0.0), "#FFFFFF");
        assert_eq!(blend_hex("#000000", "bogus", 1.0), "#FFFFFF");
    }

    #[test]
    fn test_default_palette_tints() {
        // Derivations used by the default burgundy theme.
        assert_eq!(blend_hex("#611B29", "#FFFFFF", 0.20), "#804853");
        assert_eq!(blend_hex("#611B29", "#000000", 0.20), "#4D1520");
        assert_eq!(blend_hex("#FFF3E8", "#FFFFFF", 0.10), "#FFF4EA");
        assert_eq!(blend_hex("#F2BFC4", "#FFFFFF", 0.05), "#F2C2C6");
        assert_eq!(blend_hex("#EFCF86", "#FFFFFF", 0.05), "#EFD18C");
        assert_eq!(blend_hex("#CBE8D4", "#FFFFFF", 0.05), "#CDE9D6");
        assert_eq!(blend_hex("#611B29", "#FFFFFF", 0.92), "#F2ECED");
        assert_eq!(blend_hex("#D14B57", "#FFFFFF", 0.72), "#F2CCCF");
    }

    #[test]
    fn test_small_tints_can_be_identity() {
        // Truncation swallows blends smaller than one 8-bit step.
        assert_eq!(lighten("#F3F6FB", 0.08), "#F3F6FB");
        assert_eq!(lighten("#FAFCFF", 0.06), "#FAFCFF");
    }

    #[test]
    fn test_lerp_matches_blend() {
        let a = Color::from_hex("#611B29").unwrap();
        let b = Color::WHITE;
        assert_eq!(a.lerp(b, 0.0).to_hex(), "#611B29");
        assert_eq!(a.lerp(b, 1.0).to_hex(), "#FFFFFF");
    }

    #[test]
    fn test_clamp_f32() {
        assert_eq!(clamp_f32(12.8, 11.2, 14.5), 12.8);
        assert_eq!(clamp_f32(9.0, 11.2, 14.5), 11.2);
        assert_eq!(clamp_f32(99.0, 11.2, 14.5), 14.5);
        assert_eq!(clamp_f32(f32::NAN, 11.2, 14.5), 11.2);
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        fn hex(c: (u8, u8, u8)) -> String {
            format!("#{:02X}{:02X}{:02X}", c.0, c.1, c.2)
        }

        proptest! {
            // Any channels, any t (NaN and infinities included): the
            // output is always a well-formed #RRGGBB string.
            #[test]
            fn prop_blend_output_always_parses(
                a in any::<(u8, u8, u8)>(),
                b in any::<(u8, u8, u8)>(),
                t in proptest::num::f64::ANY,
            ) {
                let out = blend_hex(&hex(a), &hex(b), t);
                prop_assert_eq!(out.len(), 7);
                prop_assert!(Color::from_hex(&out).is_some());
            }

            // t = 0 round-trips the source exactly; the channel math
            // must not drift an 8-bit step on a no-op blend.
            #[test]
            fn prop_blend_zero_is_identity(
                a in any::<(u8, u8, u8)>(),
                b in any::<(u8, u8, u8)>(),
            ) {
                let src = hex(a);
                let out = blend_hex(&src, &hex(b), 0.0);
                prop_assert_eq!(out, src);
            }

            // Truncation may land one step under the real-valued lerp
            // but never further off than that.
            #[test]
            fn prop_blend_tracks_the_real_lerp(
                a in any::<(u8, u8, u8)>(),
                b in any::<(u8, u8, u8)>(),
                t in 0.0f64..=1.0,
            ) {
                let out = blend_hex(&hex(a), &hex(b), t);
                let (r, g, bl) = hex_to_rgb8(&out).unwrap();
                let pairs = [(r, a.0, b.0), (g, a.1, b.1), (bl, a.2, b.2)];
                for (got, s, d) in pairs {
                    let exact = f64::from(s) + (f64::from(d) - f64::from(s)) * t;
                    prop_assert!(
                        (f64::from(got) - exact).abs() <= 1.0 + 1e-6,
                        "channel {} vs exact {}", got, exact
                    );
                }
            }

            // NaN and out-of-range values always land inside the band.
            #[test]
            fn prop_clamp_always_lands_in_band(
                v in proptest::num::f32::ANY,
                lo in 6.0f32..=20.0,
                span in 0.0f32..=12.0,
            ) {
                let hi = lo + span;
                let out = clamp_f32(v, lo, hi);
                prop_assert!(out >= lo && out <= hi);
            }
        }
    }
}
