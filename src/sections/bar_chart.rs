use glam::vec2;

use crate::{
    config::BarOrientation,
    cursor::Block,
    error::RenderError,
    model::{ReportModel, ScoreGroup, ScoreSection},
    primitives::{Color, FontWeight, Line, Rect, TextAlign},
};

use super::{display_label, line_height, RenderContext, SectionKind, SectionRenderer};

const LABEL_SIZE: f32 = 9.0;
const ROW_HEIGHT: f32 = 9.0;
const BAR_THICKNESS: f32 = 5.0;
const LABEL_COLUMN: f32 = 48.0;
const PERCENT_COLUMN: f32 = 14.0;
const CHART_HEIGHT: f32 = 70.0;
const COLUMN_FILL: f32 = 0.6;

/// One bar per section, its length proportional to the section's percentage.
pub struct BarChart {
    pub title: String,
    pub group: ScoreGroup,
    pub orientation: BarOrientation,
}

impl SectionRenderer for BarChart {
    fn kind(&self) -> SectionKind {
        SectionKind::BarChart
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn layout(&self, model: &ReportModel, ctx: &RenderContext) -> Result<Vec<Block>, RenderError> {
        let sections = model.sections_in(self.group).collect::<Vec<_>>();
        if sections.is_empty() {
            return Ok(vec![ctx.notice("No scores available for this chart.")?]);
        }

        match self.orientation {
            BarOrientation::Horizontal => sections
                .iter()
                .enumerate()
                .map(|(i, section)| horizontal_row(ctx, i, section))
                .collect(),
            BarOrientation::Vertical => Ok(vec![vertical_chart(ctx, &sections)?]),
        }
    }
}

/// Alternates between the primary and accent colours.
fn bar_color(ctx: &RenderContext, i: usize) -> Color {
    if i % 2 == 0 {
        ctx.config.theme.primary
    } else {
        ctx.config.theme.accent
    }
}

fn horizontal_row(ctx: &RenderContext, i: usize, section: &ScoreSection) -> Result<Block, RenderError> {
    let track_x = ctx.left() + LABEL_COLUMN;
    let track_width = ctx.content_width() - LABEL_COLUMN - PERCENT_COLUMN;
    if track_width <= 0.0 {
        return Err(RenderError::InvalidGeometry(ctx.content_width()));
    }
    let bar_top = 0.5 * (ROW_HEIGHT - BAR_THICKNESS);
    let text_top = 0.5 * (ROW_HEIGHT - line_height(LABEL_SIZE));

    let mut row = Block {
        height: ROW_HEIGHT,
        ..Block::default()
    };
    row.push(ctx.text(display_label(&section.key, &section.label), ctx.left(), text_top, LABEL_SIZE, FontWeight::Normal)?);
    row.push(Rect::new(vec2(track_x, bar_top), vec2(track_width, BAR_THICKNESS))?.fill(ctx.config.theme.track));
    row.push(
        Rect::new(vec2(track_x, bar_top), vec2(track_width * section.fraction(), BAR_THICKNESS))?
            .fill(bar_color(ctx, i)),
    );
    row.push(ctx.percent_label(section.percentage(), ctx.right(), text_top, LABEL_SIZE)?);
    Ok(row)
}

fn vertical_chart(ctx: &RenderContext, sections: &[&ScoreSection]) -> Result<Block, RenderError> {
    let theme = &ctx.config.theme;
    let slot = ctx.content_width() / sections.len() as f32;
    let bar_width = slot * COLUMN_FILL;
    let top = line_height(LABEL_SIZE);
    let base = top + CHART_HEIGHT;

    let mut chart = Block {
        height: base + 2.0 * line_height(LABEL_SIZE) + ctx.config.card_gap,
        ..Block::default()
    };

    for quarter in [0.25, 0.5, 0.75, 1.0] {
        let y = base - quarter * CHART_HEIGHT;
        chart.push(Line::new(vec2(ctx.left(), y), vec2(ctx.right(), y), theme.track, 0.2)?.dashed(vec![1.0, 1.0]));
    }
    chart.push(Line::new(vec2(ctx.left(), base), vec2(ctx.right(), base), theme.border, 0.4)?);

    for (i, section) in sections.iter().enumerate() {
        let center = ctx.left() + (i as f32 + 0.5) * slot;
        let height = CHART_HEIGHT * section.fraction();
        chart.push(
            Rect::new(vec2(center - 0.5 * bar_width, base - height), vec2(bar_width, height))?
                .fill(bar_color(ctx, i)),
        );
        chart.push(
            ctx.percent_label(section.percentage(), center, base - height - top, LABEL_SIZE)?
                .align(TextAlign::Center),
        );
        chart.push(
            ctx.text(display_label(&section.key, &section.label), center, base + 1.0, LABEL_SIZE - 1.0, FontWeight::Normal)?
                .align(TextAlign::Center),
        );
    }

    Ok(chart)
}
