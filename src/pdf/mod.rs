//! Binds a composed [`Document`] to PDF 1.7.

use std::{fmt, io::Write};

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::{
    cursor::Document,
    error::PdfError,
    font::{helvetica, Font, FontSet},
    primitives::FontWeight,
};

use self::page::{PageBuilder, WinAnsiStr, PT_PER_MM};

pub mod page;

const HEADER: &[u8] = b"%PDF-1.7\n";

/// Codes covered by the `/Widths` array of an embedded face.
const FIRST_CHAR: u8 = 32;
const LAST_CHAR: u8 = 255;

const WEIGHTS: [FontWeight; 3] = [FontWeight::Normal, FontWeight::Bold, FontWeight::Italic];

/// Renders every page of `document` with `fonts`.
///
/// `fonts` should be the faces the document was measured with, or aligned
/// text will drift.
pub fn render_pdf(document: &Document, fonts: &FontSet) -> Result<Vec<u8>, PdfError> {
    let mut builder = PdfBuilder::new();
    for page in document.pages() {
        let content = PageBuilder::new(page.height(), fonts)
            .primitives(page.primitives())?
            .build();
        builder.page(&content, page.width(), page.height())?;
    }
    builder.info(document.title(), document.generated_at())?;
    builder.catalog(fonts)?;
    let pdf = builder.build()?;
    debug!(pages = document.pages().len(), bytes = pdf.len(), "PDF written");
    Ok(pdf)
}

/// Name under which the face for `weight` is listed in the page resources.
pub fn resource_name(weight: FontWeight) -> &'static str {
    match weight {
        FontWeight::Normal => "F1",
        FontWeight::Bold => "F2",
        FontWeight::Italic => "F3",
    }
}

pub struct PdfBuilder {
    content: Vec<u8>,
    xref: Vec<XRefEntry>,
    pages_ref: Ref,
    page_refs: Vec<Ref>,
    root: Ref,
    info: Option<Ref>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct Ref(u32, u16);

#[derive(Debug)]
enum XRefEntry {
    Free { next_free: u32, generation: u16 },
    InUse { offset: u32, generation: u16 },
}

impl fmt::Display for Ref {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} R", self.0, self.1)
    }
}

impl Default for PdfBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfBuilder {
    pub fn new() -> Self {
        let mut builder = Self {
            content: HEADER.to_owned(),
            xref: vec![XRefEntry::Free {
                // Will be filled in when XREF table is generated
                next_free: 0,
                generation: u16::MAX,
            }],
            pages_ref: Ref::default(),
            page_refs: Vec::new(),
            root: Ref::default(),
            info: None,
        };
        builder.pages_ref = builder.preallocate_object();
        builder
    }

    fn preallocate_object(&mut self) -> Ref {
        let id = self.xref.len() as u32;
        self.xref.push(XRefEntry::Free {
            next_free: 0,
            generation: u16::MAX,
        });
        Ref(id, 0)
    }

    fn start_object(&mut self) -> Result<Ref, PdfError> {
        let ref_ = self.preallocate_object();
        self.start_object_with_ref(ref_)?;
        Ok(ref_)
    }

    fn start_object_with_ref(&mut self, ref_: Ref) -> Result<(), PdfError> {
        let Ref(id, generation) = ref_;

        let offset = self.content.len() as u32;
        self.xref[id as usize] = XRefEntry::InUse { offset, generation };

        writeln!(self.content, "{id} {generation} obj")?;
        Ok(())
    }

    fn end_object(&mut self) -> Result<(), PdfError> {
        writeln!(self.content, "endobj")?;
        Ok(())
    }

    fn stream_object(&mut self, content: &[u8]) -> Result<Ref, PdfError> {
        let ref_ = self.start_object()?;
        writeln!(self.content, "<< /Length {} >>", content.len())?;
        writeln!(self.content, "stream")?;
        self.content.extend_from_slice(content);
        write!(self.content, "\nendstream\n")?;
        self.end_object()?;
        Ok(ref_)
    }

    /// One of the standard 14 fonts, which readers supply themselves.
    fn standard_font(&mut self, base_font: &str) -> Result<Ref, PdfError> {
        let font_ref = self.start_object()?;
        write!(
            self.content,
            "<< /Type /Font /Subtype /Type1 /BaseFont /{base_font} /Encoding /WinAnsiEncoding >>",
        )?;
        self.end_object()?;
        Ok(font_ref)
    }

    /// Embeds a TrueType face as an ASCII85-encoded font program.
    fn truetype_font(&mut self, font: &Font) -> Result<Ref, PdfError> {
        let encoded = ascii85_stream(font.data);
        let font_file2 = self.start_object()?;
        writeln!(
            self.content,
            "<< /Length {len} /Length1 {len1} /Filter /ASCII85Decode >>",
            len = encoded.len(),
            len1 = font.data.len(),
        )?;
        writeln!(self.content, "stream")?;
        self.content.extend_from_slice(encoded.as_bytes());
        write!(self.content, "\nendstream\n")?;
        self.end_object()?;

        let font_descriptor = self.start_object()?;
        write!(
            self.content,
            "<< /Type /FontDescriptor /FontName /{ps_name} /Flags 32 ",
            ps_name = font.ps_name,
        )?;
        let bbox = font.face.global_bounding_box();
        write!(
            self.content,
            "/FontBBox [{x1} {y1} {x2} {y2}] /ItalicAngle {angle} ",
            x1 = font.to_milli_em(bbox.x_min),
            y1 = font.to_milli_em(bbox.y_min),
            x2 = font.to_milli_em(bbox.x_max),
            y2 = font.to_milli_em(bbox.y_max),
            angle = font.face.italic_angle().unwrap_or(0.0),
        )?;
        write!(
            self.content,
            "/Ascent {ascent} /Descent {descent} ",
            ascent = font.to_milli_em(font.face.ascender()),
            descent = font.to_milli_em(font.face.descender()),
        )?;
        write!(
            self.content,
            "/CapHeight {cap_height} /StemV {stem_v} /FontFile2 {font_file2} >>",
            cap_height = font.to_milli_em(font.face.capital_height().unwrap_or(font.face.ascender())),
            stem_v = 80,
        )?;
        self.end_object()?;

        let widths_ref = self.start_object()?;
        write!(self.content, "[ ")?;
        for width in font.win_ansi_widths(FIRST_CHAR, LAST_CHAR) {
            write!(self.content, "{width} ")?;
        }
        write!(self.content, "]")?;
        self.end_object()?;

        let font_ref = self.start_object()?;
        write!(
            self.content,
            "<< /Type /Font /Subtype /TrueType /BaseFont /{ps_name} /FirstChar {FIRST_CHAR} /LastChar {LAST_CHAR} ",
            ps_name = font.ps_name,
        )?;
        write!(
            self.content,
            "/Widths {widths_ref} /FontDescriptor {font_descriptor} /Encoding /WinAnsiEncoding >>",
        )?;
        self.end_object()?;

        Ok(font_ref)
    }

    /// Adds a page of `width` x `height` millimetres drawing `content`.
    pub fn page(&mut self, content: &[u8], width: f32, height: f32) -> Result<(), PdfError> {
        let contents = self.stream_object(content)?;

        let page = self.start_object()?;
        write!(
            self.content,
            "<< /Type /Page /Parent {pages} /Contents {contents} /MediaBox [ 0 0 {w:.2} {h:.2} ] >>",
            pages = self.pages_ref,
            w = width * PT_PER_MM,
            h = height * PT_PER_MM,
        )?;
        self.end_object()?;

        self.page_refs.push(page);
        Ok(())
    }

    /// Document information dictionary.
    pub fn info(&mut self, title: &str, created: DateTime<Utc>) -> Result<(), PdfError> {
        let info = self.start_object()?;
        write!(
            self.content,
            "<< /Title {title} /Producer (career-report) /CreationDate (D:{date}Z) >>",
            title = WinAnsiStr(title),
            date = created.format("%Y%m%d%H%M%S"),
        )?;
        self.end_object()?;
        self.info = Some(info);
        Ok(())
    }

    pub fn catalog(&mut self, fonts: &FontSet) -> Result<(), PdfError> {
        let font_refs = WEIGHTS
            .into_iter()
            .map(|weight| {
                let ref_ = match fonts {
                    FontSet::Helvetica => self.standard_font(helvetica::base_font(weight))?,
                    FontSet::TrueType(family) => self.truetype_font(family.face(weight))?,
                };
                Ok::<_, PdfError>((resource_name(weight), ref_))
            })
            .collect::<Result<Vec<_>, PdfError>>()?;

        self.start_object_with_ref(self.pages_ref)?;
        write!(self.content, "<< /Type /Pages /Kids [ ")?;
        for page_ref in &self.page_refs {
            write!(self.content, "{page_ref} ")?;
        }
        write!(
            self.content,
            "] /Count {page_count} ",
            page_count = self.page_refs.len(),
        )?;
        write!(self.content, "/Resources << /Font << ")?;
        for (name, font_ref) in font_refs {
            write!(self.content, "/{name} {font_ref} ")?;
        }
        write!(self.content, ">> >> >>")?;
        self.end_object()?;

        let catalog = self.start_object()?;
        write!(
            self.content,
            "<< /Type /Catalog /Pages {pages} >>",
            pages = self.pages_ref,
        )?;
        self.end_object()?;

        self.root = catalog;
        Ok(())
    }

    pub fn build(self) -> Result<Vec<u8>, PdfError> {
        let Self {
            mut content,
            mut xref,
            root,
            info,
            ..
        } = self;

        let xref_size = xref.len() as u32;
        xref[0] = XRefEntry::Free {
            next_free: xref_size,
            generation: u16::MAX,
        };

        let start_xref = content.len();
        writeln!(content, "xref")?;
        writeln!(content, "0 {xref_size}")?;
        for entry in xref {
            let (n, g, c) = match entry {
                XRefEntry::Free {
                    next_free,
                    generation,
                } => (next_free, generation, 'f'),
                XRefEntry::InUse { offset, generation } => (offset, generation, 'n'),
            };
            write!(content, "{n:010} {g:05} {c}\r\n")?;
        }

        writeln!(content, "trailer")?;
        write!(content, "<< /Size {xref_size} /Root {root} ")?;
        if let Some(info) = info {
            write!(content, "/Info {info} ")?;
        }
        writeln!(content, ">>")?;

        writeln!(content, "startxref")?;
        writeln!(content, "{start_xref}")?;
        writeln!(content, "%%EOF")?;

        Ok(content)
    }
}

/// ASCII85 body of a stream: no `<~` prefix, terminated by `~>`.
fn ascii85_stream(data: &[u8]) -> String {
    let encoded = ascii85::encode(data);
    let body = encoded.strip_prefix("<~").unwrap_or(&encoded);
    if body.ends_with("~>") {
        body.to_owned()
    } else {
        format!("{body}~>")
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use glam::vec2;

    use crate::{
        config::LayoutConfig,
        cursor::{Document, PageCursor},
        font::FontSet,
        primitives::TextRun,
    };

    use super::{ascii85_stream, render_pdf};

    fn document(pages: usize) -> Document {
        let config = LayoutConfig::default();
        let mut cursor = PageCursor::new(&config, "1 May 2024").unwrap();
        cursor.write(TextRun::new("Hello", vec2(20.0, 20.0), 12.0).unwrap());
        for i in 1..pages {
            cursor.break_page(format!("Section {i}")).unwrap();
        }
        Document::new(
            "Test Report",
            Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap(),
            cursor.finish(),
            Vec::new(),
        )
    }

    #[test]
    fn test_pdf_structure() {
        let pdf = render_pdf(&document(3), &FontSet::Helvetica).unwrap();
        let text = String::from_utf8_lossy(&pdf);

        assert!(pdf.starts_with(b"%PDF-1.7\n"));
        assert!(text.ends_with("%%EOF\n"));
        assert!(text.contains("/Count 3 "));
        assert!(text.contains("/BaseFont /Helvetica-Bold /Encoding /WinAnsiEncoding"));
        assert!(text.contains("/CreationDate (D:20240501093000Z)"));
        assert_eq!(text.matches("/Type /Page ").count(), 3);
    }

    #[test]
    fn test_xref_offsets_point_at_objects() {
        let pdf = render_pdf(&document(1), &FontSet::Helvetica).unwrap();
        let text = String::from_utf8_lossy(&pdf);

        let start_xref = text
            .rsplit("startxref\n")
            .next()
            .and_then(|tail| tail.lines().next())
            .and_then(|line| line.parse::<usize>().ok())
            .unwrap();
        assert!(text[start_xref..].starts_with("xref\n"));

        let entries = text[start_xref..].lines().skip(2).take_while(|line| line.len() == 18);
        for (id, entry) in entries.enumerate().skip(1) {
            let offset = entry[..10].parse::<usize>().unwrap();
            assert!(text[offset..].starts_with(&format!("{id} 0 obj")), "object {id}");
        }
    }

    #[test]
    fn test_ascii85_stream_framing() {
        let encoded = ascii85_stream(b"hello world");
        assert!(!encoded.starts_with("<~"));
        assert!(encoded.ends_with("~>"));
    }
}
