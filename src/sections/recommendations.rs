use glam::vec2;
use itertools::Itertools;

use crate::{
    cursor::Block,
    error::RenderError,
    model::{CareerRecommendation, ReportModel},
    primitives::{Circle, Color, DrawPrimitive, FontWeight, ProgressBar, TextAlign},
    text_layout::TextStyle,
};

use super::{line_height, RenderContext, SectionKind, SectionRenderer};

pub const TOP_COUNT: usize = 3;
const COLUMN_GAP: f32 = 4.0;
const BADGE_RADIUS: f32 = 4.0;
const TITLE_SIZE: f32 = 11.0;
const MATCH_SIZE: f32 = 10.0;
const BODY_SIZE: f32 = 8.5;
const CAREER_SIZE: f32 = 9.0;

/// The best three recommendations as side-by-side cards.
pub struct CareerRecommendations {
    pub title: String,
}

impl SectionRenderer for CareerRecommendations {
    fn kind(&self) -> SectionKind {
        SectionKind::CareerRecommendations
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn layout(&self, model: &ReportModel, ctx: &RenderContext) -> Result<Vec<Block>, RenderError> {
        let top = top_recommendations(&model.recommendations);
        if top.is_empty() {
            return Ok(vec![ctx.notice("No career recommendations available.")?]);
        }

        let column_width = (ctx.content_width() - (TOP_COUNT - 1) as f32 * COLUMN_GAP) / TOP_COUNT as f32;
        let inner_width = column_width - 2.0 * ctx.config.card_padding;
        if inner_width <= 0.0 {
            return Err(RenderError::InvalidGeometry(ctx.content_width()));
        }

        let columns = top
            .iter()
            .enumerate()
            .map(|(rank, recommendation)| {
                let x = ctx.left() + rank as f32 * (column_width + COLUMN_GAP);
                column(ctx, rank, recommendation, x, inner_width)
            })
            .collect::<Result<Vec<_>, RenderError>>()?;

        let card_height = columns
            .iter()
            .map(|(_, height)| *height)
            .fold(0.0, f32::max);

        let mut block = Block {
            height: card_height + ctx.config.card_gap,
            ..Block::default()
        };
        for (rank, (primitives, _)) in columns.into_iter().enumerate() {
            let x = ctx.left() + rank as f32 * (column_width + COLUMN_GAP);
            block.push(ctx.card(x, 0.0, column_width, card_height)?);
            block.primitives.extend(primitives);
        }
        Ok(vec![block])
    }
}

/// Highest match first; equal matches keep their input order.
pub fn top_recommendations(recommendations: &[CareerRecommendation]) -> Vec<&CareerRecommendation> {
    recommendations
        .iter()
        .sorted_by(|a, b| clamp_match(b.match_percentage).total_cmp(&clamp_match(a.match_percentage)))
        .take(TOP_COUNT)
        .collect()
}

fn clamp_match(value: f32) -> f32 {
    if value.is_finite() {
        value.clamp(0.0, 100.0)
    } else {
        0.0
    }
}

fn column(
    ctx: &RenderContext,
    rank: usize,
    recommendation: &CareerRecommendation,
    x: f32,
    inner_width: f32,
) -> Result<(Vec<DrawPrimitive>, f32), RenderError> {
    let theme = &ctx.config.theme;
    let pad = ctx.config.card_padding;
    let left = x + pad;
    let mut primitives = Vec::<DrawPrimitive>::new();
    let mut y = pad;

    let badge = vec2(left + BADGE_RADIUS, y + BADGE_RADIUS);
    primitives.push(Circle::new(badge, BADGE_RADIUS)?.fill(theme.primary).into());
    primitives.push(
        ctx.text((rank + 1).to_string(), badge.x, badge.y - 0.5 * line_height(MATCH_SIZE), MATCH_SIZE, FontWeight::Bold)?
            .align(TextAlign::Center)
            .color(Color::WHITE)
            .into(),
    );
    let match_percentage = clamp_match(recommendation.match_percentage);
    primitives.push(
        ctx.text(format!("{}% match", match_percentage.round()), left + inner_width, y, MATCH_SIZE, FontWeight::Bold)?
            .align(TextAlign::Right)
            .color(theme.primary)
            .into(),
    );
    y += 2.0 * BADGE_RADIUS + 2.0;

    let title_style = TextStyle {
        size: TITLE_SIZE,
        weight: FontWeight::Bold,
    };
    let (lines, height) = ctx.paragraph(&recommendation.title, left, y, inner_width, title_style, theme.text)?;
    primitives.extend(lines);
    y += height + 1.0;

    primitives.push(
        ProgressBar::new(vec2(left, y), vec2(inner_width, 2.5), match_percentage / 100.0, theme.track, theme.accent)?
            .into(),
    );
    y += 4.5;

    let body = TextStyle {
        size: BODY_SIZE,
        weight: FontWeight::Normal,
    };
    if let Some(description) = recommendation.description.as_deref().filter(|d| !d.trim().is_empty()) {
        let (lines, height) = ctx.paragraph(description, left, y, inner_width, body, theme.muted)?;
        primitives.extend(lines);
        y += height + 1.5;
    }

    primitives.push(ctx.text("Careers", left, y, CAREER_SIZE, FontWeight::Bold)?.into());
    y += line_height(CAREER_SIZE);

    if recommendation.careers.is_empty() {
        primitives.push(
            ctx.text("No careers listed.", left, y, CAREER_SIZE, FontWeight::Italic)?
                .color(theme.muted)
                .into(),
        );
        y += line_height(CAREER_SIZE);
    }
    let career_style = TextStyle {
        size: CAREER_SIZE,
        weight: FontWeight::Normal,
    };
    for career in &recommendation.careers {
        let (lines, height) = ctx.paragraph(&format!("• {career}"), left, y, inner_width, career_style, theme.text)?;
        primitives.extend(lines);
        y += height;
    }

    Ok((primitives, y + pad))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::{
        config::LayoutConfig,
        model::{AssessmentType, CareerRecommendation, ReportModel},
        primitives::DrawPrimitive,
        sections::{test_support::context, SectionRenderer},
    };

    use super::{top_recommendations, CareerRecommendations};

    fn recommendation(key: &str, match_percentage: f32, careers: &[&str]) -> CareerRecommendation {
        CareerRecommendation {
            key: key.to_owned(),
            title: key.to_owned(),
            match_percentage,
            careers: careers.iter().map(|c| c.to_string()).collect(),
            description: None,
        }
    }

    #[test]
    fn test_ranks_by_match_and_keeps_ties_stable() {
        let recommendations = vec![
            recommendation("a", 40.0, &[]),
            recommendation("b", 90.0, &[]),
            recommendation("c", 75.0, &[]),
            recommendation("d", 90.0, &[]),
            recommendation("e", f32::NAN, &[]),
        ];
        let keys = top_recommendations(&recommendations)
            .into_iter()
            .map(|r| r.key.as_str())
            .collect::<Vec<_>>();
        assert_eq!(keys, vec!["b", "d", "c"]);
    }

    #[test]
    fn test_three_cards_side_by_side() {
        let config = LayoutConfig::default();
        let mut model = ReportModel::new(AssessmentType::CareerVision);
        model.recommendations = vec![
            recommendation("Engineering", 82.0, &["Civil Engineer", "Robotics Technician"]),
            recommendation("Design", 64.0, &["UX Designer"]),
            recommendation("Medicine", 91.0, &["Nurse", "Physiotherapist", "Pharmacist"]),
            recommendation("Law", 12.0, &["Paralegal"]),
        ];

        let renderer = CareerRecommendations {
            title: "Career Recommendations".to_owned(),
        };
        let blocks = renderer.layout(&model, &context(&config)).unwrap();
        assert_eq!(blocks.len(), 1);

        let cards = blocks[0]
            .primitives
            .iter()
            .filter_map(|p| match p {
                DrawPrimitive::Rect(rect) => Some((rect.origin.x, rect.size.y)),
                _ => None,
            })
            .collect::<Vec<_>>();
        assert_eq!(cards.len(), 3);
        assert!(cards[0].0 < cards[1].0 && cards[1].0 < cards[2].0);
        assert!(cards.iter().all(|&(_, height)| height == cards[0].1));

        let texts = blocks[0].primitives.iter().filter_map(|p| p.as_text()).map(|t| t.text.as_str()).collect::<Vec<_>>();
        assert!(texts.contains(&"• Pharmacist"));
        assert!(texts.contains(&"91% match"));
        assert!(!texts.contains(&"Law"));
    }

    #[test]
    fn test_no_recommendations_shows_notice() {
        let config = LayoutConfig::default();
        let renderer = CareerRecommendations {
            title: "Career Recommendations".to_owned(),
        };
        let blocks = renderer
            .layout(&ReportModel::new(AssessmentType::FuturePathways), &context(&config))
            .unwrap();
        assert_eq!(
            blocks[0].primitives[1].as_text().unwrap().text,
            "No career recommendations available."
        );
    }
}
