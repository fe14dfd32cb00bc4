use glam::vec2;

use crate::{
    cursor::Block,
    error::{RenderError, ShapeError},
    model::{format_score, humanize_key, ReportModel, ScoreGroup, ScoreSection},
    primitives::{DrawPrimitive, FontWeight, ProgressBar, TextAlign},
    text_layout::{wrap_text, TextStyle},
};

use super::{line_height, RenderContext, SectionKind, SectionRenderer};

const TITLE_SIZE: f32 = 12.0;
const SUBTITLE_SIZE: f32 = 9.0;
const BODY_SIZE: f32 = 9.5;
const FACET_SIZE: f32 = 8.0;
const BAR_HEIGHT: f32 = 3.5;
const FACET_BAR_HEIGHT: f32 = 2.0;
const PERCENT_COLUMN: f32 = 14.0;
const FACET_LABEL_WIDTH: f32 = 32.0;

/// One card per score section: title, description, `score/max` and a progress bar.
pub struct DomainBreakdown {
    pub title: String,
    pub group: ScoreGroup,
}

impl SectionRenderer for DomainBreakdown {
    fn kind(&self) -> SectionKind {
        SectionKind::DomainBreakdown
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn layout(&self, model: &ReportModel, ctx: &RenderContext) -> Result<Vec<Block>, RenderError> {
        let sections = model.sections_in(self.group).collect::<Vec<_>>();
        if sections.is_empty() {
            return Ok(vec![ctx.notice("No scores available for this section.")?]);
        }

        let mut blocks = Vec::with_capacity(sections.len());
        for section in sections {
            blocks.extend(self.card(section, ctx)?);
        }
        Ok(blocks)
    }
}

/// A horizontal strip of a card, laid out relative to its own top edge.
#[derive(Default)]
struct Row {
    height: f32,
    primitives: Vec<DrawPrimitive>,
}

impl Row {
    fn push(&mut self, primitive: impl Into<DrawPrimitive>) {
        self.primitives.push(primitive.into());
    }
}

impl DomainBreakdown {
    /// Lays out one section's card. A card too tall for a page body comes back
    /// as several blocks, each drawn on its own piece of card.
    fn card(&self, section: &ScoreSection, ctx: &RenderContext) -> Result<Vec<Block>, RenderError> {
        let theme = &ctx.config.theme;
        let pad = ctx.config.card_padding;
        let left = ctx.left() + pad;
        let right = ctx.right() - pad;
        let inner_width = right - left;
        let bar_width = inner_width - PERCENT_COLUMN;
        if bar_width <= 0.0 {
            return Err(RenderError::InvalidGeometry(inner_width));
        }

        let mut rows = Vec::new();

        let mut head = Row::default();
        let title = humanize_key(&section.key);
        head.push(ctx.text(&title, left, 0.0, TITLE_SIZE, FontWeight::Bold)?);
        head.push(
            ctx.text(
                format!("{}/{}", format_score(section.clamped_score()), format_score(section.clamped_max())),
                right,
                0.0,
                TITLE_SIZE,
                FontWeight::Bold,
            )?
            .align(TextAlign::Right)
            .color(theme.primary),
        );
        head.height = line_height(TITLE_SIZE);
        if !section.label.trim().is_empty() && squash(&section.label) != squash(&title) {
            head.push(
                ctx.text(&section.label, left, head.height, SUBTITLE_SIZE, FontWeight::Italic)?
                    .color(theme.muted),
            );
            head.height += line_height(SUBTITLE_SIZE);
        }
        rows.push(head);

        let style = TextStyle {
            size: BODY_SIZE,
            weight: FontWeight::Normal,
        };
        for line in wrap_text(ctx.typeface, style, section.resolved_description(), inner_width) {
            let mut row = Row {
                height: line_height(BODY_SIZE),
                ..Row::default()
            };
            row.push(ctx.text(line, left, 0.0, BODY_SIZE, FontWeight::Normal)?.color(theme.text));
            rows.push(row);
        }

        let mut bar = Row {
            height: 2.0 + BAR_HEIGHT,
            ..Row::default()
        };
        bar.push(ProgressBar::new(
            vec2(left, 2.0),
            vec2(bar_width, BAR_HEIGHT),
            section.fraction(),
            theme.track,
            theme.primary,
        )?);
        bar.push(ctx.percent_label(section.percentage(), right, 1.5, FACET_SIZE + 1.0)?);
        rows.push(bar);

        if let (Some(factors), ScoreGroup::Eq) = (ctx.config.eq_facets, self.group) {
            for (i, (label, factor)) in [("Self-Awareness", factors.self_awareness), ("Empathy", factors.empathy)]
                .into_iter()
                .enumerate()
            {
                let lead = if i == 0 { 2.0 } else { 0.0 };
                let mut row = Row {
                    height: lead + line_height(FACET_SIZE),
                    ..Row::default()
                };
                row.push(
                    ctx.text(label, left, lead - 0.8, FACET_SIZE, FontWeight::Normal)?
                        .color(theme.muted),
                );
                row.push(ProgressBar::new(
                    vec2(left + FACET_LABEL_WIDTH, lead),
                    vec2((bar_width - FACET_LABEL_WIDTH).max(0.0), FACET_BAR_HEIGHT),
                    section.fraction() * factor,
                    theme.track,
                    theme.accent,
                )?);
                rows.push(row);
            }
        }

        Ok(pack(rows, ctx)?)
    }
}

/// Stacks rows onto card pieces no taller than a page body.
fn pack(rows: Vec<Row>, ctx: &RenderContext) -> Result<Vec<Block>, ShapeError> {
    let pad = ctx.config.card_padding;
    let gap = ctx.config.card_gap;
    let limit = ctx.config.body_bottom() - ctx.config.body_top() - gap;

    let mut pieces = Vec::new();
    let mut piece = Block::default();
    let mut y = pad;
    for row in rows {
        if y > pad && y + row.height + pad > limit {
            pieces.push(close(piece, y + pad, ctx)?);
            piece = Block::default();
            y = pad;
        }
        piece.primitives.extend(row.primitives.into_iter().map(|p| p.translated(y)));
        y += row.height;
    }
    pieces.push(close(piece, y + pad, ctx)?);
    Ok(pieces)
}

fn close(mut piece: Block, card_height: f32, ctx: &RenderContext) -> Result<Block, ShapeError> {
    piece.primitives.insert(0, ctx.card(ctx.left(), 0.0, ctx.content_width(), card_height)?.into());
    piece.height = card_height + ctx.config.card_gap;
    Ok(piece)
}

/// Lowercased alphanumerics, so "Self-Awareness" matches "Self Awareness".
fn squash(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}
