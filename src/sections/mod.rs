//! Section renderers.
//!
//! A renderer first lays its content out into [`Block`]s, which is the only
//! step that can fail, and then flows the blocks through the cursor. A failed
//! section therefore never leaves partial output behind.

use glam::vec2;
use tracing::warn;

use crate::{
    config::LayoutConfig,
    cursor::{Block, PageCursor},
    error::{RenderError, ShapeError},
    font::Typeface,
    model::ReportModel,
    primitives::{Color, DrawPrimitive, FontWeight, Rect, TextAlign, TextRun, LINE_HEIGHT, MM_PER_PT},
    text_layout::{wrap_text, TextStyle},
};

pub use self::{
    bar_chart::BarChart, cover::Cover, domain_breakdown::DomainBreakdown,
    pathways::EducationalPathways, radar_chart::RadarChart,
    recommendations::CareerRecommendations, student_info::StudentInfoCard,
};

mod bar_chart;
mod cover;
mod domain_breakdown;
mod pathways;
mod radar_chart;
mod recommendations;
mod student_info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Cover,
    StudentInfo,
    DomainBreakdown,
    RadarChart,
    BarChart,
    CareerRecommendations,
    EducationalPathways,
}

/// Shared, read-only state every renderer lays out against.
pub struct RenderContext<'a> {
    pub config: &'a LayoutConfig,
    pub typeface: &'a dyn Typeface,
    pub date_label: &'a str,
}

pub trait SectionRenderer {
    fn kind(&self) -> SectionKind;

    /// Header title of the pages this section occupies.
    fn title(&self) -> &str;

    /// Lays the section out without touching any page.
    fn layout(&self, model: &ReportModel, ctx: &RenderContext) -> Result<Vec<Block>, RenderError>;

    /// Lays the section out and writes it, breaking onto continuation pages
    /// whenever the next block does not fit.
    fn render(&self, model: &ReportModel, ctx: &RenderContext, cursor: &mut PageCursor) -> Result<(), RenderError> {
        let blocks = self.layout(model, ctx)?;
        flow(cursor, blocks, self.title())
    }
}

/// Writes `blocks` in order, continuing on new pages titled `"<title> (continued)"`.
///
/// A block taller than a whole page body is cut at the bottom margin and the
/// loss is recorded as a warning.
pub fn flow(cursor: &mut PageCursor, blocks: Vec<Block>, title: &str) -> Result<(), RenderError> {
    for mut block in blocks {
        if !cursor.reserve(block.height).fits && !cursor.is_fresh() {
            cursor.break_page(format!("{title} (continued)"))?;
        }
        let room = cursor.bottom() - cursor.current_y();
        if block.height > room {
            let cut = block.truncate(room);
            if cut > 0 {
                let page = cursor.page_number();
                warn!(section = title, page, cut, "block taller than the page body was cut");
                cursor.record_warning(format!("{title}: content cut off at the bottom of page {page}"));
            }
        }
        cursor.write_block(block);
    }
    Ok(())
}

impl RenderContext<'_> {
    pub fn left(&self) -> f32 {
        self.config.margin
    }

    pub fn right(&self) -> f32 {
        self.config.page_width - self.config.margin
    }

    pub fn content_width(&self) -> f32 {
        self.config.content_width()
    }

    /// Baseline for a line of text whose box starts at `top`.
    pub fn baseline(&self, top: f32, size: f32, weight: FontWeight) -> f32 {
        let metrics = self.typeface.metrics(weight) * (size * MM_PER_PT);
        top + metrics.ascent
    }

    /// A single line of text whose box starts at `top`.
    pub fn text(&self, text: impl Into<String>, x: f32, top: f32, size: f32, weight: FontWeight) -> Result<TextRun, ShapeError> {
        Ok(TextRun::new(text, vec2(x, self.baseline(top, size, weight)), size)?
            .weight(weight)
            .color(self.config.theme.text))
    }

    /// Wraps `text` to `width` and returns the lines with the height they take.
    pub fn paragraph(
        &self,
        text: &str,
        x: f32,
        top: f32,
        width: f32,
        style: TextStyle,
        color: Color,
    ) -> Result<(Vec<DrawPrimitive>, f32), ShapeError> {
        let line_height = line_height(style.size);
        let lines = wrap_text(self.typeface, style, text, width);
        let mut primitives = Vec::with_capacity(lines.len());
        let mut y = top;
        for line in lines {
            primitives.push(self.text(line, x, y, style.size, style.weight)?.color(color).into());
            y += line_height;
        }
        Ok((primitives, y - top))
    }

    /// The bordered, rounded card every section draws its content on.
    pub fn card(&self, x: f32, top: f32, width: f32, height: f32) -> Result<Rect, ShapeError> {
        let theme = &self.config.theme;
        Rect::new(vec2(x, top), vec2(width, height))?
            .fill(theme.card_background)
            .stroke(theme.border, 0.3)
            .rounded(3.0)
    }

    /// A one-line notice used when a section has nothing to show.
    pub fn notice(&self, message: &str) -> Result<Block, ShapeError> {
        let size = 10.0;
        let height = line_height(size) + 2.0 * self.config.card_padding;
        let mut block = Block {
            height: height + self.config.card_gap,
            ..Block::default()
        };
        block.push(self.card(self.left(), 0.0, self.content_width(), height)?);
        block.push(
            self.text(message, self.left() + self.config.card_padding, self.config.card_padding, size, FontWeight::Italic)?
                .color(self.config.theme.muted),
        );
        Ok(block)
    }

    pub fn percent_label(&self, percentage: u8, x: f32, top: f32, size: f32) -> Result<TextRun, ShapeError> {
        Ok(self
            .text(format!("{percentage}%"), x, top, size, FontWeight::Bold)?
            .align(TextAlign::Right)
            .color(self.config.theme.primary))
    }
}

pub fn line_height(size: f32) -> f32 {
    size * MM_PER_PT * LINE_HEIGHT
}

/// Display name of a section: its label, or its humanised key when unlabelled.
pub fn display_label(key: &str, label: &str) -> String {
    if label.trim().is_empty() {
        crate::model::humanize_key(key)
    } else {
        label.to_owned()
    }
}


#[cfg(test)]
mod tests {
    use glam::vec2;

    use crate::{
        config::LayoutConfig,
        cursor::{Block, PageCursor},
        primitives::{DrawPrimitive, Rect},
    };

    use super::{display_label, flow};

    fn tall_block(height: f32) -> Block {
        let mut block = Block {
            height,
            ..Block::default()
        };
        block.push(Rect::new(vec2(15.0, 0.0), vec2(180.0, height)).unwrap());
        block
    }

    #[test]
    fn test_flow_breaks_with_continued_title() {
        let config = LayoutConfig::default();
        let mut cursor = PageCursor::new(&config, "").unwrap();
        cursor.break_page("Scores").unwrap();

        flow(&mut cursor, (0..5).map(|_| tall_block(100.0)).collect(), "Scores").unwrap();

        let pages = cursor.finish();
        let titles = pages.iter().map(|page| page.title()).collect::<Vec<_>>();
        assert_eq!(
            titles,
            vec![None, Some("Scores"), Some("Scores (continued)"), Some("Scores (continued)")],
        );
    }

    #[test]
    fn test_oversized_block_does_not_loop() {
        let config = LayoutConfig::default();
        let mut cursor = PageCursor::new(&config, "").unwrap();
        cursor.break_page("Scores").unwrap();

        flow(&mut cursor, vec![tall_block(400.0), tall_block(10.0)], "Scores").unwrap();

        assert_eq!(cursor.warnings(), ["Scores: content cut off at the bottom of page 2"]);
        let pages = cursor.finish();
        assert_eq!(pages.len(), 3);
        for page in &pages {
            assert!(page.primitives().iter().all(|p| p.bottom() <= page.height()));
        }
        let DrawPrimitive::Rect(rect) = &pages[1].primitives().last().unwrap() else {
            panic!("expected the clipped block");
        };
        assert_eq!(rect.origin.y + rect.size.y, config.body_bottom());
    }

    #[test]
    fn test_fitting_blocks_record_no_warnings() {
        let config = LayoutConfig::default();
        let mut cursor = PageCursor::new(&config, "").unwrap();
        cursor.break_page("Scores").unwrap();

        flow(&mut cursor, (0..5).map(|_| tall_block(100.0)).collect(), "Scores").unwrap();

        assert!(cursor.warnings().is_empty());
    }

    #[test]
    fn test_display_label() {
        assert_eq!(display_label("selfAwareness", ""), "Self Awareness");
        assert_eq!(display_label("R", "Realistic"), "Realistic");
    }
}
