//! # Font Management
//!
//! Planner pages only use the standard PDF fonts, which need no embedding.
//! This module maps font names to those fonts and measures text with their
//! AFM advance widths.

pub mod metrics;

pub use metrics::StandardFontMetrics;
use std::collections::HashMap;

/// The standard PDF fonts we carry metrics for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StandardFont {
    Helvetica,
    HelveticaBold,
    HelveticaOblique,
    HelveticaBoldOblique,
    Courier,
    CourierBold,
    CourierOblique,
    CourierBoldOblique,
}

impl StandardFont {
    /// The PDF name for this font.
    pub fn pdf_name(&self) -> &'static str {
        match self {
            Self::Helvetica => "Helvetica",
            Self::HelveticaBold => "Helvetica-Bold",
            Self::HelveticaOblique => "Helvetica-Oblique",
            Self::HelveticaBoldOblique => "Helvetica-BoldOblique",
            Self::Courier => "Courier",
            Self::CourierBold => "Courier-Bold",
            Self::CourierOblique => "Courier-Oblique",
            Self::CourierBoldOblique => "Courier-BoldOblique",
        }
    }

    /// Advance widths for this font. Obliques share the upright widths.
    pub fn metrics(&self) -> StandardFontMetrics {
        match self {
            Self::Helvetica | Self::HelveticaOblique => metrics::HELVETICA,
            Self::HelveticaBold | Self::HelveticaBoldOblique => metrics::HELVETICA_BOLD,
            Self::Courier
            | Self::CourierBold
            | Self::CourierOblique
            | Self::CourierBoldOblique => metrics::COURIER,
        }
    }

    const ALL: [StandardFont; 8] = [
        Self::Helvetica,
        Self::HelveticaBold,
        Self::HelveticaOblique,
        Self::HelveticaBoldOblique,
        Self::Courier,
        Self::CourierBold,
        Self::CourierOblique,
        Self::CourierBoldOblique,
    ];
}

/// Maps font names to standard fonts.
pub struct FontRegistry {
    fonts: HashMap<String, StandardFont>,
}

impl Default for FontRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl FontRegistry {
    pub fn new() -> Self {
        let fonts = StandardFont::ALL
            .iter()
            .map(|font| (font.pdf_name().to_ascii_lowercase(), *font))
            .collect();
        Self { fonts }
    }

    /// Look up a font by its PDF name, case-insensitively.
    pub fn get(&self, name: &str) -> Option<StandardFont> {
        self.fonts.get(&name.to_ascii_lowercase()).copied()
    }

    /// Look up a font, falling back to Helvetica if not found.
    pub fn resolve(&self, name: &str) -> StandardFont {
        match self.get(name) {
            Some(font) => font,
            None => {
                log::warn!("unknown font '{}', falling back to Helvetica", name);
                StandardFont::Helvetica
            }
        }
    }
}

/// Font lookup and measurement for the canvas.
#[derive(Default)]
pub struct FontContext {
    registry: FontRegistry,
}

impl FontContext {
    pub fn new() -> Self {
        Self {
            registry: FontRegistry::new(),
        }
    }

    /// Measure the width of a string in points.
    pub fn measure_string(&self, text: &str, font: StandardFont, font_size: f64) -> f64 {
        font.metrics().measure_string(text, font_size, 0.0)
    }

    /// Resolve a font name to a standard font.
    pub fn resolve(&self, name: &str) -> StandardFont {
        self.registry.resolve(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_context_helvetica() {
        let ctx = FontContext::new();
        let w = ctx.measure_string(" ", StandardFont::Helvetica, 12.0);
        assert!((w - 3.336).abs() < 0.001);
    }

    #[test]
    fn test_font_context_bold_wider() {
        let ctx = FontContext::new();
        let regular = ctx.measure_string("planner", StandardFont::Helvetica, 12.0);
        let bold = ctx.measure_string("planner", StandardFont::HelveticaBold, 12.0);
        assert!(bold > regular, "bold text should be wider than regular");
    }

    #[test]
    fn test_resolve_is_case_insensitive() {
        let ctx = FontContext::new();
        assert_eq!(ctx.resolve("helvetica-bold"), StandardFont::HelveticaBold);
        assert_eq!(ctx.resolve("Courier"), StandardFont::Courier);
    }

    #[test]
    fn test_resolve_fallback() {
        let ctx = FontContext::new();
        assert_eq!(ctx.resolve("Comic Sans"), StandardFont::Helvetica);
        assert!(FontRegistry::new().get("Comic Sans").is_none());
    }
}
