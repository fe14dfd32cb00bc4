use glam::vec2;

use crate::{
    cursor::Block,
    error::RenderError,
    model::ReportModel,
    primitives::{Circle, Color, FontWeight, Rect, TextAlign},
};

use super::{RenderContext, SectionKind, SectionRenderer};

const BAND_HEIGHT: f32 = 70.0;

/// Title block at the top of the first page. Always the same height.
pub struct Cover;

impl SectionRenderer for Cover {
    fn kind(&self) -> SectionKind {
        SectionKind::Cover
    }

    fn title(&self) -> &str {
        "Cover"
    }

    fn layout(&self, model: &ReportModel, ctx: &RenderContext) -> Result<Vec<Block>, RenderError> {
        let theme = &ctx.config.theme;
        let left = ctx.left();
        let width = ctx.content_width();
        let center = left + 0.5 * width;

        let mut block = Block {
            height: BAND_HEIGHT + ctx.config.card_gap,
            ..Block::default()
        };
        block.push(
            Rect::new(vec2(left, 0.0), vec2(width, BAND_HEIGHT))?
                .fill(theme.primary)
                .rounded(4.0)?,
        );
        // Decorative bubbles inside the band.
        block.push(Circle::new(vec2(left + width - 22.0, 20.0), 14.0)?.fill(theme.primary.lighten(0.2)));
        block.push(Circle::new(vec2(left + width - 46.0, 50.0), 8.0)?.fill(theme.accent.lighten(0.3)));
        block.push(Circle::new(vec2(left + 18.0, 56.0), 6.0)?.fill(theme.primary.lighten(0.35)));

        let assessment = model.assessment_type;
        let generated = format!("Generated on {}", ctx.date_label);
        for (text, top, size, weight) in [
            (assessment.title(), 16.0, 22.0, FontWeight::Bold),
            (assessment.subtitle(), 32.0, 11.0, FontWeight::Normal),
            (generated.as_str(), 46.0, 9.0, FontWeight::Italic),
        ] {
            block.push(
                ctx.text(text, center, top, size, weight)?
                    .align(TextAlign::Center)
                    .color(Color::WHITE),
            );
        }

        Ok(vec![block])
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        config::LayoutConfig,
        model::{AssessmentType, ReportModel},
        sections::{test_support::context, SectionRenderer},
    };

    use super::Cover;

    #[test]
    fn test_cover_is_one_fixed_block() {
        let config = LayoutConfig::default();
        let ctx = context(&config);

        let riasec = Cover.layout(&ReportModel::new(AssessmentType::Riasec), &ctx).unwrap();
        let scct = Cover.layout(&ReportModel::new(AssessmentType::Scct), &ctx).unwrap();

        assert_eq!(riasec.len(), 1);
        assert_eq!(riasec[0].height, scct[0].height);

        let texts = riasec[0]
            .primitives
            .iter()
            .filter_map(|p| p.as_text())
            .map(|t| t.text.as_str())
            .collect::<Vec<_>>();
        assert_eq!(
            texts,
            vec![
                "RIASEC Career Interest Report",
                "Holland interest profile across six personality types",
                "Generated on 1 May 2024",
            ],
        );
    }
}
