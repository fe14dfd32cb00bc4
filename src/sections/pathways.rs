use glam::vec2;
use tracing::debug;

use crate::{
    catalog,
    cursor::Block,
    error::RenderError,
    model::{humanize_key, ReportModel, ScoreGroup, ScoreSection, FALLBACK_DESCRIPTION},
    primitives::{FontWeight, Rect},
    text_layout::TextStyle,
};

use super::{display_label, line_height, RenderContext, SectionKind, SectionRenderer};

const HEADING_SIZE: f32 = 12.0;
const BODY_SIZE: f32 = 9.5;
const CHIP_SIZE: f32 = 9.0;
const CHIP_PADDING: f32 = 3.0;
const CHIP_GAP: f32 = 3.0;
const CHIP_HEIGHT: f32 = 7.0;

/// Suggested school subjects for the primary cluster.
pub struct EducationalPathways {
    pub title: String,
    pub group: ScoreGroup,
}

impl SectionRenderer for EducationalPathways {
    fn kind(&self) -> SectionKind {
        SectionKind::EducationalPathways
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn layout(&self, model: &ReportModel, ctx: &RenderContext) -> Result<Vec<Block>, RenderError> {
        let theme = &ctx.config.theme;
        let pad = ctx.config.card_padding;
        let left = ctx.left() + pad;
        let inner_width = ctx.content_width() - 2.0 * pad;

        let cluster = primary_cluster(model, self.group);
        let (label, description) = match &cluster {
            Some(key) => {
                let section = model.sections.iter().find(|s| &s.key == key);
                let label = section.map_or_else(|| humanize_key(key), |s| display_label(&s.key, &s.label));
                let description = section.map_or_else(
                    || catalog::description(key).unwrap_or(FALLBACK_DESCRIPTION),
                    ScoreSection::resolved_description,
                );
                (label, description)
            }
            None => ("Not determined".to_owned(), FALLBACK_DESCRIPTION),
        };
        let subjects: &[&str] = match cluster.as_deref().and_then(catalog::subjects) {
            Some(subjects) => subjects,
            None => {
                debug!(cluster = ?cluster, "no subject suggestions for cluster");
                &[]
            }
        };

        let mut block = Block::default();
        let mut y = pad;
        block.push(
            ctx.text(format!("Primary cluster: {label}"), left, y, HEADING_SIZE, FontWeight::Bold)?
                .color(theme.primary),
        );
        y += line_height(HEADING_SIZE);

        let body = TextStyle {
            size: BODY_SIZE,
            weight: FontWeight::Normal,
        };
        let (lines, height) = ctx.paragraph(description, left, y, inner_width, body, theme.text)?;
        block.primitives.extend(lines);
        y += height + 3.0;

        block.push(ctx.text("Suggested subjects", left, y, BODY_SIZE + 0.5, FontWeight::Bold)?);
        y += line_height(BODY_SIZE + 0.5) + 1.0;

        if subjects.is_empty() {
            block.push(
                ctx.text("No subject suggestions available for this cluster.", left, y, BODY_SIZE, FontWeight::Italic)?
                    .color(theme.muted),
            );
            y += line_height(BODY_SIZE);
        } else {
            // Chips wrap onto a new row when the current one is full.
            let mut x = left;
            for subject in subjects {
                let width = ctx.typeface.text_width(subject, CHIP_SIZE, FontWeight::Normal) + 2.0 * CHIP_PADDING;
                if x > left && x + width > left + inner_width {
                    x = left;
                    y += CHIP_HEIGHT + CHIP_GAP;
                }
                block.push(
                    Rect::new(vec2(x, y), vec2(width, CHIP_HEIGHT))?
                        .fill(theme.primary.lighten(0.85))
                        .rounded(0.5 * CHIP_HEIGHT)?,
                );
                let top = y + 0.5 * (CHIP_HEIGHT - line_height(CHIP_SIZE));
                block.push(ctx.text(*subject, x + CHIP_PADDING, top, CHIP_SIZE, FontWeight::Normal)?);
                x += width + CHIP_GAP;
            }
            y += CHIP_HEIGHT;
        }

        let card_height = y + pad;
        block
            .primitives
            .insert(0, ctx.card(ctx.left(), 0.0, ctx.content_width(), card_height)?.into());
        block.height = card_height + ctx.config.card_gap;
        Ok(vec![block])
    }
}

/// The caller's cluster, else the highest-scoring section of `group`.
/// Ties go to the earliest section.
pub fn primary_cluster(model: &ReportModel, group: ScoreGroup) -> Option<String> {
    if let Some(cluster) = model.primary_cluster.as_deref().filter(|c| !c.trim().is_empty()) {
        return Some(cluster.to_owned());
    }
    model
        .sections_in(group)
        .fold(None::<&ScoreSection>, |best, section| match best {
            Some(best) if best.percentage() >= section.percentage() => Some(best),
            _ => Some(section),
        })
        .map(|section| section.key.clone())
}

#[cfg(test)]
mod tests {
    use crate::{
        config::LayoutConfig,
        model::{AssessmentType, ReportModel, ScoreGroup, ScoreSection},
        sections::{test_support::context, SectionRenderer},
    };

    use super::{primary_cluster, EducationalPathways};

    fn model() -> ReportModel {
        let mut model = ReportModel::new(AssessmentType::Riasec);
        model.sections = vec![
            ScoreSection::new("R", "Realistic", 4.0, 10.0),
            ScoreSection::new("I", "Investigative", 9.0, 10.0),
            ScoreSection::new("A", "Artistic", 9.0, 10.0),
        ];
        model
    }

    fn texts(model: &ReportModel) -> Vec<String> {
        let config = LayoutConfig::default();
        let renderer = EducationalPathways {
            title: "Educational Pathways".to_owned(),
            group: ScoreGroup::Riasec,
        };
        renderer
            .layout(model, &context(&config))
            .unwrap()
            .iter()
            .flat_map(|block| block.primitives.iter())
            .filter_map(|p| p.as_text())
            .map(|t| t.text.clone())
            .collect()
    }

    #[test]
    fn test_primary_cluster_prefers_first_top_score() {
        assert_eq!(primary_cluster(&model(), ScoreGroup::Riasec).as_deref(), Some("I"));

        let mut explicit = model();
        explicit.primary_cluster = Some("A".to_owned());
        assert_eq!(primary_cluster(&explicit, ScoreGroup::Riasec).as_deref(), Some("A"));

        assert_eq!(primary_cluster(&model(), ScoreGroup::Eq), None);
    }

    #[test]
    fn test_lists_subjects_for_cluster() {
        let texts = texts(&model());
        assert_eq!(texts[0], "Primary cluster: Investigative");
        assert!(texts.iter().any(|t| t == "Computer Science"));
    }

    #[test]
    fn test_unknown_cluster_degrades_to_empty_list() {
        let mut model = model();
        model.primary_cluster = Some("unknownDomainXYZ".to_owned());

        let texts = texts(&model);
        assert_eq!(texts[0], "Primary cluster: Unknown Domain XYZ");
        assert!(texts.iter().any(|t| t == "Description not available."));
        assert!(texts.iter().any(|t| t == "No subject suggestions available for this cluster."));
    }
}
