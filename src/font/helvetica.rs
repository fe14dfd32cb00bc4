//! Advance widths of the standard Helvetica faces, from the Adobe core AFM files.

use crate::primitives::FontWeight;

use super::TextMetrics;

pub const METRICS: TextMetrics = TextMetrics {
    ascent: 0.718,
    descent: -0.207,
    line_gap: 0.075,
};

/// Base font names for the regular, bold and oblique faces.
pub fn base_font(weight: FontWeight) -> &'static str {
    match weight {
        FontWeight::Normal => "Helvetica",
        FontWeight::Bold => "Helvetica-Bold",
        FontWeight::Italic => "Helvetica-Oblique",
    }
}

// Widths for ' '..='~'.
#[rustfmt::skip]
const REGULAR: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

pub fn advance(c: char, weight: FontWeight) -> u32 {
    let table = match weight {
        FontWeight::Bold => &BOLD,
        // The oblique face shares the regular widths.
        FontWeight::Normal | FontWeight::Italic => &REGULAR,
    };
    let width = match c {
        ' '..='~' => table[c as usize - ' ' as usize],
        '•' => 350,
        '‘' | '’' => 222,
        '“' | '”' => 333,
        '—' => 1000,
        _ => 556,
    };
    width as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_widths() {
        assert_eq!(advance(' ', FontWeight::Normal), 278);
        assert_eq!(advance('W', FontWeight::Normal), 944);
        assert_eq!(advance('i', FontWeight::Bold), 278);
        assert_eq!(advance('~', FontWeight::Italic), 584);
        assert_eq!(advance('—', FontWeight::Normal), 1000);
    }

    #[test]
    fn test_base_font_names() {
        assert_eq!(base_font(FontWeight::Italic), "Helvetica-Oblique");
    }
}
