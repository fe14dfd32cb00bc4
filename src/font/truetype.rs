use ttf_parser::{name_id, Face};

use crate::primitives::FontWeight;

use super::{from_win_ansi, Error, TextMetrics};

/// A parsed TrueType face borrowed from caller-owned bytes.
pub struct Font<'a> {
    pub data: &'a [u8],
    pub face: Face<'a>,
    pub ps_name: String,
}

/// Regular, bold and italic faces that replace the Helvetica family.
pub struct TrueTypeFamily<'a> {
    pub regular: Font<'a>,
    pub bold: Font<'a>,
    pub italic: Font<'a>,
}

impl<'a> Font<'a> {
    pub fn new(data: &'a [u8]) -> Result<Self, Error> {
        let face = Face::parse(data, 0)?;

        let ps_name = face
            .names()
            .into_iter()
            .find(|name| name.name_id == name_id::POST_SCRIPT_NAME)
            .ok_or(Error::MissingPostScriptName)?
            .to_string()
            .ok_or(Error::NonUnicodeString)?;

        Ok(Self {
            data,
            face,
            ps_name,
        })
    }

    /// Converts from font units to thousanths of an em.
    pub fn to_milli_em(&self, units: i16) -> i32 {
        1000 * units as i32 / self.face.units_per_em() as i32
    }

    pub fn metrics(&self) -> TextMetrics {
        let scale = 1.0 / self.face.units_per_em() as f32;
        TextMetrics {
            ascent: self.face.ascender() as f32 * scale,
            descent: self.face.descender() as f32 * scale,
            line_gap: self.face.line_gap() as f32 * scale,
        }
    }

    /// Advance of `c` in thousandths of an em, if the face has a glyph for it.
    pub fn advance(&self, c: char) -> Option<u32> {
        let glyph_id = self.face.glyph_index(c)?;
        let width = self.face.glyph_hor_advance(glyph_id)?;
        Some(1000 * width as u32 / self.face.units_per_em() as u32)
    }

    /// Widths for the single-byte codes `first..=last`, as a PDF simple font expects.
    pub fn win_ansi_widths(&self, first: u8, last: u8) -> Vec<u32> {
        (first..=last)
            .map(|code| {
                from_win_ansi(code)
                    .and_then(|c| self.advance(c))
                    .unwrap_or(0)
            })
            .collect()
    }
}

impl<'a> TrueTypeFamily<'a> {
    pub fn new(regular: &'a [u8], bold: &'a [u8], italic: &'a [u8]) -> Result<Self, Error> {
        Ok(Self {
            regular: Font::new(regular)?,
            bold: Font::new(bold)?,
            italic: Font::new(italic)?,
        })
    }

    pub fn face(&self, weight: FontWeight) -> &Font<'a> {
        match weight {
            FontWeight::Normal => &self.regular,
            FontWeight::Bold => &self.bold,
            FontWeight::Italic => &self.italic,
        }
    }

    pub(super) fn advance(&self, c: char, weight: FontWeight) -> u32 {
        let font = self.face(weight);
        font.advance(c)
            .or_else(|| font.advance('?'))
            .unwrap_or_default()
    }

    pub(super) fn metrics(&self, weight: FontWeight) -> TextMetrics {
        self.face(weight).metrics()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_garbage() {
        let result = Font::new(b"definitely not a font");
        assert!(matches!(result, Err(Error::FaceParsing(_))));
    }

    #[test]
    fn test_family_fails_on_first_bad_face() {
        let result = TrueTypeFamily::new(b"", b"", b"");
        assert!(result.is_err());
    }
}
