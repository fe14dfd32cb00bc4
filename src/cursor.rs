//! Pages, the output document and the cursor that fills them.

use chrono::{DateTime, Utc};
use glam::vec2;
use serde::Serialize;
use tracing::{debug, warn};

use crate::{
    config::LayoutConfig,
    error::ShapeError,
    primitives::{Color, DrawPrimitive, FontWeight, Line, Rect, TextAlign, TextRun, MM_PER_PT},
};

/// Slack for float comparisons against the bottom limit.
const EPSILON: f32 = 1e-3;

const HEADER_BAND: f32 = 10.0;
const HEADER_TITLE_SIZE: f32 = 12.0;
const HEADER_META_SIZE: f32 = 8.0;
const FOOTER_SIZE: f32 = 8.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    number: u32,
    width: f32,
    height: f32,
    title: Option<String>,
    primitives: Vec<DrawPrimitive>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    title: String,
    generated_at: DateTime<Utc>,
    pages: Vec<Page>,
    warnings: Vec<String>,
}

/// A group of primitives laid out relative to its own top edge.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Block {
    pub height: f32,
    pub primitives: Vec<DrawPrimitive>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reservation {
    pub fits: bool,
    pub cursor_y: f32,
}

/// Tracks the write position on the page being filled.
///
/// Finalised pages are moved into an append-only list and never touched again.
pub struct PageCursor<'a> {
    config: &'a LayoutConfig,
    date_label: String,
    pages: Vec<Page>,
    current: Page,
    top: f32,
    current_y: f32,
    warnings: Vec<String>,
}

impl Page {
    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    /// Running header title; the first page has none.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn primitives(&self) -> &[DrawPrimitive] {
        &self.primitives
    }

    pub fn texts(&self) -> impl Iterator<Item = &TextRun> {
        self.primitives.iter().filter_map(DrawPrimitive::as_text)
    }

    pub fn contains_text(&self, needle: &str) -> bool {
        self.texts().any(|text| text.text == needle)
    }
}

impl Document {
    pub(crate) fn new(title: impl Into<String>, generated_at: DateTime<Utc>, pages: Vec<Page>, warnings: Vec<String>) -> Self {
        Self {
            title: title.into(),
            generated_at,
            pages,
            warnings,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn generated_at(&self) -> DateTime<Utc> {
        self.generated_at
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// Non-fatal problems met while composing: failed sections, content cut
    /// off at a page bottom and text the fonts cannot encode.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn texts(&self) -> impl Iterator<Item = &TextRun> {
        self.pages.iter().flat_map(Page::texts)
    }
}

impl Block {
    pub fn push(&mut self, primitive: impl Into<DrawPrimitive>) {
        self.primitives.push(primitive.into());
    }

    /// Cuts the block down to `limit` units of height.
    ///
    /// Primitives reaching below `limit` are dropped, except rects starting
    /// above it, which are clipped. Returns how many primitives were affected.
    pub fn truncate(&mut self, limit: f32) -> usize {
        let limit = limit.max(0.0);
        let before = self.primitives.len();
        let mut clipped = 0;
        self.primitives.retain_mut(|primitive| {
            if primitive.bottom() <= limit + EPSILON {
                return true;
            }
            match primitive {
                DrawPrimitive::Rect(rect) if rect.origin.y < limit => {
                    rect.size.y = limit - rect.origin.y;
                    clipped += 1;
                    true
                }
                _ => false,
            }
        });
        self.height = self.height.min(limit);
        before - self.primitives.len() + clipped
    }
}

impl<'a> PageCursor<'a> {
    /// Opens page 1 without a running header.
    pub fn new(config: &'a LayoutConfig, date_label: impl Into<String>) -> Result<Self, ShapeError> {
        let date_label = date_label.into();
        let current = open_page(config, 1, None, &date_label)?;
        Ok(Self {
            config,
            date_label,
            pages: Vec::new(),
            current,
            top: config.margin,
            current_y: config.margin,
            warnings: Vec::new(),
        })
    }

    pub fn config(&self) -> &LayoutConfig {
        self.config
    }

    pub fn current_y(&self) -> f32 {
        self.current_y
    }

    pub fn page_number(&self) -> u32 {
        self.current.number
    }

    pub fn bottom(&self) -> f32 {
        self.config.body_bottom()
    }

    /// Whether nothing has been written below the header of the current page.
    pub fn is_fresh(&self) -> bool {
        self.current_y <= self.top + EPSILON
    }

    pub fn reserve(&self, height_needed: f32) -> Reservation {
        Reservation {
            fits: self.current_y + height_needed <= self.bottom() + EPSILON,
            cursor_y: self.current_y,
        }
    }

    /// Finalises the current page and opens the next one under a running header.
    ///
    /// Returns the page that was just finalised.
    pub fn break_page(&mut self, title: impl Into<String>) -> Result<&Page, ShapeError> {
        let title = title.into();
        let number = self.current.number + 1;
        debug!(number, %title, "page break");

        let next = open_page(self.config, number, Some(title), &self.date_label)?;
        let finished = std::mem::replace(&mut self.current, next);
        self.pages.push(finished);
        self.top = self.config.body_top();
        self.current_y = self.top;

        Ok(&self.pages[self.pages.len() - 1])
    }

    /// Appends a primitive and advances by its declared height.
    pub fn write(&mut self, primitive: impl Into<DrawPrimitive>) {
        let primitive = primitive.into();
        let height = primitive.height();
        self.place(primitive);
        self.advance(height);
    }

    /// Appends a primitive without moving the cursor.
    pub fn place(&mut self, primitive: impl Into<DrawPrimitive>) {
        self.current.primitives.push(primitive.into());
    }

    /// Moves the cursor down, never past the bottom margin.
    pub fn advance(&mut self, dy: f32) {
        let target = self.current_y + dy.max(0.0);
        if target > self.bottom() + EPSILON {
            warn!(
                page = self.current.number,
                overflow = target - self.bottom(),
                "content overflows the bottom margin"
            );
        }
        self.current_y = target.min(self.bottom());
    }

    /// Places a block at the cursor and advances past it.
    pub fn write_block(&mut self, block: Block) {
        let y = self.current_y;
        for primitive in block.primitives {
            self.place(primitive.translated(y));
        }
        self.advance(block.height);
    }

    /// Remembers a non-fatal problem for the document's warning list.
    pub fn record_warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Flushes the current page and returns every page in order.
    pub fn finish(self) -> Vec<Page> {
        self.into_parts().0
    }

    /// Like [`finish`](Self::finish), also handing back the recorded warnings.
    pub fn into_parts(mut self) -> (Vec<Page>, Vec<String>) {
        self.pages.push(self.current);
        (self.pages, self.warnings)
    }
}

fn open_page(config: &LayoutConfig, number: u32, title: Option<String>, date_label: &str) -> Result<Page, ShapeError> {
    let mut primitives = Vec::new();
    if let Some(title) = &title {
        primitives.extend(header_primitives(config, number, title, date_label)?);
    }
    primitives.extend(footer_primitives(config)?);

    Ok(Page {
        number,
        width: config.page_width,
        height: config.page_height,
        title,
        primitives,
    })
}

/// Running header: a coloured band with the title, page number and date.
fn header_primitives(config: &LayoutConfig, number: u32, title: &str, date_label: &str) -> Result<Vec<DrawPrimitive>, ShapeError> {
    let theme = &config.theme;
    let left = config.margin;
    let right = config.page_width - config.margin;
    let band = HEADER_BAND.min(config.header_height);
    let baseline = config.margin + 0.5 * band + 0.35 * HEADER_TITLE_SIZE * MM_PER_PT;

    Ok(vec![
        Rect::new(vec2(left, config.margin), vec2(config.content_width(), band))?
            .fill(theme.primary)
            .rounded(2.0)?
            .into(),
        TextRun::new(title, vec2(left + 4.0, baseline), HEADER_TITLE_SIZE)?
            .weight(FontWeight::Bold)
            .color(Color::WHITE)
            .into(),
        TextRun::new(format!("Page {number}"), vec2(right - 4.0, baseline), HEADER_META_SIZE)?
            .align(TextAlign::Right)
            .color(Color::WHITE)
            .into(),
        TextRun::new(
            date_label,
            vec2(right, config.margin + band + HEADER_META_SIZE * MM_PER_PT + 0.5),
            HEADER_META_SIZE,
        )?
        .align(TextAlign::Right)
        .color(theme.muted)
        .into(),
    ])
}

fn footer_primitives(config: &LayoutConfig) -> Result<Vec<DrawPrimitive>, ShapeError> {
    let rule_y = config.body_bottom() + 3.0;
    let mut primitives = vec![Line::new(
        vec2(config.margin, rule_y),
        vec2(config.page_width - config.margin, rule_y),
        config.theme.border,
        0.3,
    )?
    .into()];
    if !config.footer_text.is_empty() {
        primitives.push(
            TextRun::new(&config.footer_text, vec2(config.page_width / 2.0, rule_y + 5.0), FOOTER_SIZE)?
                .align(TextAlign::Center)
                .color(config.theme.muted)
                .into(),
        );
    }
    Ok(primitives)
}

#[cfg(test)]
mod tests {
    use glam::{vec2, Vec2};

    use super::*;

    fn bar(height: f32) -> DrawPrimitive {
        Rect::new(Vec2::ZERO, vec2(10.0, height)).unwrap().into()
    }

    #[test]
    fn test_first_page_starts_at_margin() {
        let config = LayoutConfig::default();
        let cursor = PageCursor::new(&config, "1 May 2024").unwrap();
        assert_eq!(cursor.page_number(), 1);
        assert_eq!(cursor.current_y(), 15.0);
        assert!(cursor.is_fresh());
    }

    #[test]
    fn test_reserve_and_write() {
        let config = LayoutConfig::default();
        let mut cursor = PageCursor::new(&config, "").unwrap();

        assert!(cursor.reserve(267.0).fits);
        assert!(!cursor.reserve(267.5).fits);

        cursor.write(bar(100.0));
        assert_eq!(cursor.current_y(), 115.0);
        assert_eq!(cursor.reserve(5.0).cursor_y, 115.0);
        assert!(!cursor.is_fresh());
    }

    #[test]
    fn test_break_page_resets_below_header() {
        let config = LayoutConfig::default();
        let mut cursor = PageCursor::new(&config, "1 May 2024").unwrap();
        cursor.write(bar(200.0));

        let finished = cursor.break_page("Domain Breakdown").unwrap();
        assert_eq!(finished.number(), 1);
        assert_eq!(finished.title(), None);

        assert_eq!(cursor.page_number(), 2);
        assert_eq!(cursor.current_y(), config.body_top());
        assert!(cursor.is_fresh());

        let pages = cursor.finish();
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[1].title(), Some("Domain Breakdown"));
        assert!(pages[1].contains_text("Page 2"));
        assert!(pages[1].contains_text("1 May 2024"));
        assert!(pages[1].contains_text("Domain Breakdown"));
    }

    #[test]
    fn test_advance_is_clamped_to_bottom() {
        let config = LayoutConfig::default();
        let mut cursor = PageCursor::new(&config, "").unwrap();
        cursor.advance(1000.0);
        assert_eq!(cursor.current_y(), config.body_bottom());
    }

    #[test]
    fn test_write_block_translates_primitives() {
        let config = LayoutConfig::default();
        let mut cursor = PageCursor::new(&config, "").unwrap();
        let mut block = Block {
            height: 20.0,
            ..Block::default()
        };
        block.push(Rect::new(vec2(15.0, 2.0), vec2(10.0, 10.0)).unwrap());
        cursor.write_block(block);

        assert_eq!(cursor.current_y(), 35.0);
        let pages = cursor.finish();
        let DrawPrimitive::Rect(rect) = pages[0].primitives().last().unwrap() else {
            panic!("expected the block's rect");
        };
        assert_eq!(rect.origin, vec2(15.0, 17.0));
    }

    #[test]
    fn test_truncate_clips_rects_and_drops_low_text() {
        let mut block = Block {
            height: 300.0,
            ..Block::default()
        };
        block.push(Rect::new(Vec2::ZERO, vec2(180.0, 300.0)).unwrap());
        block.push(TextRun::new("kept", vec2(5.0, 100.0), 10.0).unwrap());
        block.push(TextRun::new("lost", vec2(5.0, 260.0), 10.0).unwrap());

        assert_eq!(block.truncate(250.0), 2);
        assert_eq!(block.height, 250.0);
        let texts = block
            .primitives
            .iter()
            .filter_map(DrawPrimitive::as_text)
            .map(|t| t.text.as_str())
            .collect::<Vec<_>>();
        assert_eq!(texts, vec!["kept"]);
        assert!(block.primitives.iter().all(|p| p.bottom() <= 250.0));
    }

    #[test]
    fn test_warnings_are_handed_back_in_order() {
        let config = LayoutConfig::default();
        let mut cursor = PageCursor::new(&config, "").unwrap();
        cursor.record_warning("first");
        cursor.record_warning("second");
        assert_eq!(cursor.warnings(), ["first", "second"]);

        let (pages, warnings) = cursor.into_parts();
        assert_eq!(pages.len(), 1);
        assert_eq!(warnings, vec!["first".to_owned(), "second".to_owned()]);
    }
}
