use glam::vec2;
use tracing::warn;

use crate::{
    cursor::Block,
    error::RenderError,
    model::{format_score, ReportModel, ScoreGroup},
    primitives::{Circle, FontWeight, Line, RadarPolygon, Stroke, TextAlign},
};

use super::{display_label, line_height, RenderContext, SectionKind, SectionRenderer};

pub const MAX_AXES: usize = 6;
const MIN_AXES: usize = 3;
/// Distance between the outer ring and the axis labels.
const LABEL_OFFSET: f32 = 15.0;
const LABEL_SIZE: f32 = 9.0;
const VALUE_SIZE: f32 = 8.0;
const LEGEND_SIZE: f32 = 9.5;
const GRID_RINGS: [f32; 3] = [0.25, 0.5, 0.75];

/// Polar plot of up to six sections of one group, followed by a score legend.
pub struct RadarChart {
    pub title: String,
    pub group: ScoreGroup,
}

impl SectionRenderer for RadarChart {
    fn kind(&self) -> SectionKind {
        SectionKind::RadarChart
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn layout(&self, model: &ReportModel, ctx: &RenderContext) -> Result<Vec<Block>, RenderError> {
        let sections = model.sections_in(self.group).collect::<Vec<_>>();
        if sections.len() > MAX_AXES {
            warn!(
                axes = sections.len(),
                "radar chart shows only the first {MAX_AXES} sections"
            );
        }
        let sections = &sections[..sections.len().min(MAX_AXES)];
        if sections.len() < MIN_AXES {
            return Err(RenderError::TooFewAxes(sections.len()));
        }

        let theme = &ctx.config.theme;
        let radius = ctx.config.radar_radius;
        let label_band = LABEL_OFFSET + line_height(LABEL_SIZE) + line_height(VALUE_SIZE);
        let center = vec2(ctx.left() + 0.5 * ctx.content_width(), label_band + radius);

        let radar = RadarPolygon::new(
            center,
            radius,
            sections
                .iter()
                .map(|s| (display_label(&s.key, &s.label), s.ratio())),
            1.0,
            theme.primary.lighten(0.65),
            Stroke {
                color: theme.primary,
                width: 0.6,
            },
        )?;

        let mut chart = Block {
            height: 2.0 * (radius + label_band) + ctx.config.card_gap,
            ..Block::default()
        };

        for ring in GRID_RINGS {
            chart.push(Circle::new(center, ring * radius)?.stroke(theme.track, 0.3));
        }
        for end in radar.spoke_ends() {
            chart.push(Line::new(center, end, theme.border, 0.3)?);
        }
        chart.push(radar.clone());
        for vertex in radar.vertices() {
            chart.push(Circle::new(vertex, 1.2)?.fill(theme.primary));
        }
        chart.push(
            Circle::new(center, radius)?
                .stroke(theme.muted, 0.4)
                .dashed(vec![1.5, 1.5]),
        );

        for (i, (label, section)) in radar.axis_labels.iter().zip(sections).enumerate() {
            let anchor = radar.point_on_axis(i, radius + LABEL_OFFSET);
            let align = if anchor.x < center.x - 1.0 {
                TextAlign::Right
            } else if anchor.x > center.x + 1.0 {
                TextAlign::Left
            } else {
                TextAlign::Center
            };
            let top = anchor.y - 0.5 * line_height(LABEL_SIZE);
            chart.push(ctx.text(label, anchor.x, top, LABEL_SIZE, FontWeight::Bold)?.align(align));
            chart.push(
                ctx.text(
                    format!("{}%", section.percentage()),
                    anchor.x,
                    top + line_height(LABEL_SIZE),
                    VALUE_SIZE,
                    FontWeight::Normal,
                )?
                .align(align)
                .color(theme.muted),
            );
        }

        let mut blocks = vec![chart];
        for (label, section) in radar.axis_labels.iter().zip(sections) {
            let mut row = Block {
                height: line_height(LEGEND_SIZE),
                ..Block::default()
            };
            row.push(ctx.text(label, ctx.left(), 0.0, LEGEND_SIZE, FontWeight::Normal)?);
            row.push(
                ctx.text(
                    format!(
                        "{}/{} ({}%)",
                        format_score(section.clamped_score()),
                        format_score(section.clamped_max()),
                        section.percentage()
                    ),
                    ctx.right(),
                    0.0,
                    LEGEND_SIZE,
                    FontWeight::Bold,
                )?
                .align(TextAlign::Right),
            );
            blocks.push(row);
        }

        Ok(blocks)
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        config::LayoutConfig,
        error::RenderError,
        model::{ScoreGroup, ScoreSection},
        primitives::DrawPrimitive,
        sections::{
            test_support::{context, eq_model},
            SectionRenderer,
        },
    };

    use super::RadarChart;

    fn radar() -> RadarChart {
        RadarChart {
            title: "EQ Profile".to_owned(),
            group: ScoreGroup::Eq,
        }
    }

    #[test]
    fn test_vertices_follow_scores() {
        let config = LayoutConfig::default();
        let blocks = radar().layout(&eq_model(5, 8.0), &context(&config)).unwrap();

        let polygon = blocks[0]
            .primitives
            .iter()
            .find_map(|p| match p {
                DrawPrimitive::Radar(radar) => Some(radar),
                _ => None,
            })
            .unwrap();

        let vertices = polygon.vertices();
        assert_eq!(vertices.len(), 5);
        for vertex in vertices {
            let distance = vertex.distance(polygon.center);
            assert!((distance - 0.8 * polygon.radius).abs() < 1e-3, "{distance}");
        }
    }

    #[test]
    fn test_vertices_are_not_snapped_to_whole_percents() {
        let config = LayoutConfig::default();
        let mut model = eq_model(0, 0.0);
        model.sections = ["selfAwareness", "empathy", "motivation"]
            .into_iter()
            .map(|key| ScoreSection::new(key, "", 2.0, 3.0))
            .collect();

        let blocks = radar().layout(&model, &context(&config)).unwrap();
        let polygon = blocks[0]
            .primitives
            .iter()
            .find_map(|p| match p {
                DrawPrimitive::Radar(radar) => Some(radar),
                _ => None,
            })
            .unwrap();

        for vertex in polygon.vertices() {
            let distance = vertex.distance(polygon.center);
            assert!((distance - polygon.radius * 2.0 / 3.0).abs() < 1e-4, "{distance}");
        }
    }

    #[test]
    fn test_draws_dashed_boundary_and_labels() {
        let config = LayoutConfig::default();
        let blocks = radar().layout(&eq_model(5, 8.0), &context(&config)).unwrap();
        let chart = &blocks[0];

        let dashed = chart
            .primitives
            .iter()
            .filter(|p| matches!(p, DrawPrimitive::Circle(c) if c.dash.is_some()))
            .count();
        assert_eq!(dashed, 1);

        let spokes = chart.primitives.iter().filter(|p| matches!(p, DrawPrimitive::Line(_))).count();
        assert_eq!(spokes, 5);

        assert_eq!(blocks.len(), 1 + 5);
    }

    #[test]
    fn test_too_few_axes_is_an_error() {
        let config = LayoutConfig::default();
        let result = radar().layout(&eq_model(2, 8.0), &context(&config));
        assert_eq!(result.unwrap_err(), RenderError::TooFewAxes(2));
    }

    #[test]
    fn test_extra_axes_are_dropped() {
        let config = LayoutConfig::default();
        let mut model = eq_model(5, 8.0);
        model.sections.push(ScoreSection::new("extraOne", "", 1.0, 10.0));
        model.sections.push(ScoreSection::new("extraTwo", "", 1.0, 10.0));

        let blocks = radar().layout(&model, &context(&config)).unwrap();
        let axes = blocks[0]
            .primitives
            .iter()
            .find_map(|p| match p {
                DrawPrimitive::Radar(radar) => Some(radar.axis_count()),
                _ => None,
            });
        assert_eq!(axes, Some(6));
    }
}
