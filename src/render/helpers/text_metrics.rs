//! Text measurement for PDF builtin fonts
//!
//! Widths come from Adobe's AFM files for the Standard 14 fonts, so layout
//! needs no font files at all. All values are in points.

use printpdf::BuiltinFont;

/// Text measurer for PDF builtin fonts
pub struct BuiltinFontMeasurer {
    font: BuiltinFont,
}

impl BuiltinFontMeasurer {
    pub fn new(font: BuiltinFont) -> Self {
        Self { font }
    }

    pub fn font(&self) -> BuiltinFont {
        self.font
    }

    /// Character width in 1000 units per em
    fn char_width(&self, c: char) -> u16 {
        // Only the ASCII range has table entries; builtin fonts are WinAnsi
        if !c.is_ascii() {
            return if is_courier(self.font) { 600 } else { 556 };
        }

        let code = c as usize;
        match self.font {
            BuiltinFont::Helvetica | BuiltinFont::HelveticaOblique => {
                HELVETICA_WIDTHS.get(code).copied().unwrap_or(278)
            }
            BuiltinFont::HelveticaBold | BuiltinFont::HelveticaBoldOblique => {
                HELVETICA_BOLD_WIDTHS.get(code).copied().unwrap_or(278)
            }
            BuiltinFont::Courier
            | BuiltinFont::CourierBold
            | BuiltinFont::CourierOblique
            | BuiltinFont::CourierBoldOblique => 600, // Monospace
            _ => HELVETICA_WIDTHS.get(code).copied().unwrap_or(278),
        }
    }

    /// Measure text width in points
    pub fn width_pt(&self, text: &str, font_size: f32) -> f32 {
        let total: u32 = text.chars().map(|c| self.char_width(c) as u32).sum();
        (total as f32 / 1000.0) * font_size
    }

    /// Ascender height in points
    pub fn ascender_pt(&self, font_size: f32) -> f32 {
        let ascender = if is_courier(self.font) { 629 } else { 718 };
        (ascender as f32 / 1000.0) * font_size
    }

    /// Descender depth in points (positive value)
    pub fn descender_pt(&self, font_size: f32) -> f32 {
        let descender = if is_courier(self.font) { 157 } else { 207 };
        (descender as f32 / 1000.0) * font_size
    }
}

fn is_courier(font: BuiltinFont) -> bool {
    matches!(
        font,
        BuiltinFont::Courier
            | BuiltinFont::CourierBold
            | BuiltinFont::CourierOblique
            | BuiltinFont::CourierBoldOblique
    )
}

/// Builtin font for a combination of weight, slant and monospace
pub fn builtin_font(bold: bool, italic: bool, monospace: bool) -> BuiltinFont {
    match (monospace, bold, italic) {
        (true, true, true) => BuiltinFont::CourierBoldOblique,
        (true, true, false) => BuiltinFont::CourierBold,
        (true, false, true) => BuiltinFont::CourierOblique,
        (true, false, false) => BuiltinFont::Courier,
        (false, true, true) => BuiltinFont::HelveticaBoldOblique,
        (false, true, false) => BuiltinFont::HelveticaBold,
        (false, false, true) => BuiltinFont::HelveticaOblique,
        (false, false, false) => BuiltinFont::Helvetica,
    }
}

/// Measurer for any builtin font
pub fn measurer(font: BuiltinFont) -> BuiltinFontMeasurer {
    BuiltinFontMeasurer::new(font)
}

/// PostScript base font name, as written into a `/Font` resource
pub fn base_font_name(font: BuiltinFont) -> &'static str {
    match font {
        BuiltinFont::Helvetica => "Helvetica",
        BuiltinFont::HelveticaBold => "Helvetica-Bold",
        BuiltinFont::HelveticaOblique => "Helvetica-Oblique",
        BuiltinFont::HelveticaBoldOblique => "Helvetica-BoldOblique",
        BuiltinFont::Courier => "Courier",
        BuiltinFont::CourierBold => "Courier-Bold",
        BuiltinFont::CourierOblique => "Courier-Oblique",
        BuiltinFont::CourierBoldOblique => "Courier-BoldOblique",
        BuiltinFont::TimesRoman => "Times-Roman",
        BuiltinFont::TimesBold => "Times-Bold",
        BuiltinFont::TimesItalic => "Times-Italic",
        BuiltinFont::TimesBoldItalic => "Times-BoldItalic",
        BuiltinFont::Symbol => "Symbol",
        BuiltinFont::ZapfDingbats => "ZapfDingbats",
    }
}

// =============================================================================
// Adobe AFM Character Width Tables (ASCII subset, in 1000 units per em)
// =============================================================================

/// Helvetica character widths
#[rustfmt::skip]
static HELVETICA_WIDTHS: [u16; 128] = [
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, 0,
];

/// Helvetica-Bold character widths
#[rustfmt::skip]
static HELVETICA_BOLD_WIDTHS: [u16; 128] = [
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584, 0,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_helvetica_width() {
        let helvetica = measurer(BuiltinFont::Helvetica);
        // H=722 e=556 l=222 l=222 o=556 -> 2278 units
        let width = helvetica.width_pt("Hello", 10.0);
        assert!((width - 22.78).abs() < 0.01);

        let bigger = helvetica.width_pt("Hello", 20.0);
        assert!((bigger - width * 2.0).abs() < 0.01);
    }

    #[test]
    fn test_bold_is_wider() {
        let regular = measurer(BuiltinFont::Helvetica).width_pt("Pagination", 12.0);
        let bold = measurer(BuiltinFont::HelveticaBold).width_pt("Pagination", 12.0);
        assert!(bold > regular);
    }

    #[test]
    fn test_courier_is_monospace() {
        let courier = measurer(BuiltinFont::Courier);
        assert_eq!(courier.width_pt("iiii", 10.0), courier.width_pt("MMMM", 10.0));
        assert!((courier.width_pt("abc", 10.0) - 18.0).abs() < 0.001);
    }

    #[test]
    fn test_builtin_font_selection() {
        assert_eq!(builtin_font(false, false, false), BuiltinFont::Helvetica);
        assert_eq!(builtin_font(true, true, false), BuiltinFont::HelveticaBoldOblique);
        assert_eq!(builtin_font(false, false, true), BuiltinFont::Courier);
        assert_eq!(base_font_name(BuiltinFont::HelveticaBold), "Helvetica-Bold");
    }
}
