use std::ops::Mul;

use thiserror::Error;

use crate::primitives::{FontWeight, MM_PER_PT};

pub use self::truetype::{Font, TrueTypeFamily};

pub mod helvetica;
mod truetype;

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct TextMetrics {
    pub ascent: f32,
    pub descent: f32,
    pub line_gap: f32,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to parse face: {0}")]
    FaceParsing(#[from] ttf_parser::FaceParsingError),
    #[error("missing post script name")]
    MissingPostScriptName,
    #[error("non-unicode string")]
    NonUnicodeString,
}

/// Glyph metrics needed to measure and place text.
pub trait Typeface: Sync {
    /// Horizontal advance of `c` in thousandths of an em.
    fn advance(&self, c: char, weight: FontWeight) -> u32;

    /// Vertical metrics in ems.
    fn metrics(&self, weight: FontWeight) -> TextMetrics;

    /// Width of `text` set at `size` points, in logical page units.
    fn text_width(&self, text: &str, size: f32, weight: FontWeight) -> f32 {
        let milli_em = text.chars().map(|c| self.advance(c, weight)).sum::<u32>();
        milli_em as f32 / 1000.0 * size * MM_PER_PT
    }
}

/// The faces a report is measured and rendered with.
#[derive(Default)]
pub enum FontSet<'a> {
    /// The standard Helvetica family every PDF reader provides.
    #[default]
    Helvetica,
    /// Caller-supplied TrueType faces, embedded into the output.
    TrueType(TrueTypeFamily<'a>),
}

impl Typeface for FontSet<'_> {
    fn advance(&self, c: char, weight: FontWeight) -> u32 {
        match self {
            Self::Helvetica => helvetica::advance(c, weight),
            Self::TrueType(family) => family.advance(c, weight),
        }
    }

    fn metrics(&self, weight: FontWeight) -> TextMetrics {
        match self {
            Self::Helvetica => helvetica::METRICS,
            Self::TrueType(family) => family.metrics(weight),
        }
    }
}

/// Maps a character onto its single-byte WinAnsi code, or `?` when it has none.
pub fn to_win_ansi(c: char) -> u8 {
    match c {
        ' '..='~' | '\u{a0}'..='\u{ff}' => c as u8,
        '€' => 0x80,
        '‘' => 0x91,
        '’' => 0x92,
        '“' => 0x93,
        '”' => 0x94,
        '•' => 0x95,
        '–' => 0x96,
        '—' => 0x97,
        _ => b'?',
    }
}

/// Whether every character of `text` has its own WinAnsi code.
pub fn is_win_ansi(text: &str) -> bool {
    text.chars().all(|c| c == '?' || to_win_ansi(c) != b'?')
}

/// Inverse of [`to_win_ansi`] for the codes a simple font can carry.
pub fn from_win_ansi(code: u8) -> Option<char> {
    match code {
        0x20..=0x7e | 0xa0..=0xff => Some(code as char),
        0x80 => Some('€'),
        0x91 => Some('‘'),
        0x92 => Some('’'),
        0x93 => Some('“'),
        0x94 => Some('”'),
        0x95 => Some('•'),
        0x96 => Some('–'),
        0x97 => Some('—'),
        _ => None,
    }
}

impl Mul<f32> for TextMetrics {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self {
        Self {
            ascent: self.ascent * rhs,
            descent: self.descent * rhs,
            line_gap: self.line_gap * rhs,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        font::{from_win_ansi, is_win_ansi, to_win_ansi, FontSet, TextMetrics, Typeface},
        primitives::FontWeight,
    };

    #[test]
    fn test_helvetica_text_width() {
        let fonts = FontSet::Helvetica;

        // "Hi" is 722 + 222 thousandths of an em.
        let width = fonts.text_width("Hi", 72.0, FontWeight::Normal);
        assert!((width - 0.944 * 25.4).abs() < 1e-3);

        let bold = fonts.text_width("Hi", 72.0, FontWeight::Bold);
        assert!(bold > width);
    }

    #[test]
    fn test_win_ansi_mapping() {
        assert_eq!(to_win_ansi('A'), b'A');
        assert_eq!(to_win_ansi('é'), 0xe9);
        assert_eq!(to_win_ansi('—'), 0x97);
        assert_eq!(to_win_ansi('漢'), b'?');
        assert_eq!(from_win_ansi(0x97), Some('—'));
        assert_eq!(from_win_ansi(0x81), None);
    }

    #[test]
    fn test_is_win_ansi() {
        assert!(is_win_ansi("Zoë O’Neil?"));
        assert!(!is_win_ansi("आशा राव"));
    }

    #[test]
    fn test_metrics_mul() {
        let metrics = TextMetrics {
            ascent: 0.75,
            descent: -0.25,
            line_gap: 0.0,
        };

        let scaled_metrics = metrics * 12.0;
        assert_eq!(scaled_metrics.ascent, 9.0);
        assert_eq!(scaled_metrics.descent, -3.0);
        assert_eq!(scaled_metrics.line_gap, 0.0);
    }
}
