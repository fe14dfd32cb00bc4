//! Drives the section renderers for one report.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use chrono::Utc;
use tracing::{info, trace, warn};

use crate::{
    config::LayoutConfig,
    cursor::{Document, PageCursor},
    error::ComposeError,
    font::{FontSet, Typeface},
    model::{AssessmentType, ReportModel, ScoreGroup},
    sections::{
        BarChart, CareerRecommendations, Cover, DomainBreakdown, EducationalPathways, RadarChart,
        RenderContext, SectionRenderer, StudentInfoCard,
    },
};

/// Written in place of a section whose renderer failed.
pub const PLACEHOLDER: &str = "Content unavailable for this section.";

/// Format of the date shown on the cover and in every running header.
pub const DATE_FORMAT: &str = "%-d %B %Y";

static HELVETICA: FontSet<'static> = FontSet::Helvetica;

/// Progress of a single [`ReportComposer::compose`] call. Only ever moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ComposeState {
    Idle,
    ComposingCover,
    ComposingStudentInfo,
    ComposingSection(usize),
    Finalized,
}

/// Builds a [`Document`] from a [`ReportModel`].
///
/// The composer only holds configuration, so one instance can serve any number
/// of concurrent `compose` calls.
pub struct ReportComposer<'a> {
    config: LayoutConfig,
    typeface: &'a dyn Typeface,
    cancel: Option<Arc<AtomicBool>>,
}

impl Default for ReportComposer<'static> {
    fn default() -> Self {
        Self::new(LayoutConfig::default())
    }
}

impl ReportComposer<'static> {
    /// A composer measuring text with the built-in Helvetica metrics.
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            config,
            typeface: &HELVETICA,
            cancel: None,
        }
    }
}

impl<'a> ReportComposer<'a> {
    pub fn with_typeface<'b>(self, typeface: &'b dyn Typeface) -> ReportComposer<'b> {
        ReportComposer {
            config: self.config,
            typeface,
            cancel: self.cancel,
        }
    }

    /// Composition stops with [`ComposeError::Cancelled`] at the next section
    /// boundary once `flag` is set.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Parses a camelCase JSON model and composes it.
    pub fn compose_json(&self, json: &str) -> Result<Document, ComposeError> {
        let model = ReportModel::from_json(json)?;
        self.compose(&model)
    }

    pub fn compose(&self, model: &ReportModel) -> Result<Document, ComposeError> {
        let mut state = ComposeState::Idle;
        self.validate_geometry()?;

        let generated_at = model.generated_at.unwrap_or_else(Utc::now);
        let date_label = generated_at.format(DATE_FORMAT).to_string();
        let ctx = RenderContext {
            config: &self.config,
            typeface: self.typeface,
            date_label: &date_label,
        };
        let mut cursor = PageCursor::new(&self.config, date_label.as_str())?;

        transition(&mut state, ComposeState::ComposingCover);
        render_recovering(&Cover, model, &ctx, &mut cursor)?;

        transition(&mut state, ComposeState::ComposingStudentInfo);
        render_recovering(&StudentInfoCard, model, &ctx, &mut cursor)?;

        for (i, renderer) in plan(model.assessment_type, &self.config).iter().enumerate() {
            if self.is_cancelled() {
                info!(section = i, "composition cancelled");
                return Err(ComposeError::Cancelled(i));
            }
            transition(&mut state, ComposeState::ComposingSection(i));
            cursor.break_page(renderer.title())?;
            render_recovering(renderer.as_ref(), model, &ctx, &mut cursor)?;
        }

        transition(&mut state, ComposeState::Finalized);
        let (pages, warnings) = cursor.into_parts();
        info!(
            assessment = ?model.assessment_type,
            pages = pages.len(),
            warnings = warnings.len(),
            "report composed"
        );
        Ok(Document::new(model.assessment_type.title(), generated_at, pages, warnings))
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    fn validate_geometry(&self) -> Result<(), ComposeError> {
        let config = &self.config;
        let dimensions = [config.page_width, config.page_height, config.margin, config.header_height];
        let valid = dimensions.iter().all(|v| v.is_finite() && *v >= 0.0)
            && config.content_width() > 0.0
            && config.body_bottom() > config.body_top();
        if valid {
            Ok(())
        } else {
            Err(ComposeError::InvalidPageGeometry {
                width: config.page_width,
                height: config.page_height,
                margin: config.margin,
                header: config.header_height,
            })
        }
    }
}

fn transition(state: &mut ComposeState, next: ComposeState) {
    debug_assert!(next > *state, "compose state moved backwards: {state:?} -> {next:?}");
    trace!(from = ?*state, to = ?next, "compose state");
    *state = next;
}

/// Renders one section, replacing it with a placeholder notice if it fails.
fn render_recovering(
    renderer: &dyn SectionRenderer,
    model: &ReportModel,
    ctx: &RenderContext,
    cursor: &mut PageCursor,
) -> Result<(), ComposeError> {
    if let Err(err) = renderer.render(model, ctx, cursor) {
        warn!(section = renderer.title(), error = %err, "section failed to render");
        cursor.record_warning(format!("{}: {err}", renderer.title()));
        cursor.write_block(ctx.notice(PLACEHOLDER)?);
    }
    Ok(())
}

/// Sections following the cover and student card, in page order.
pub fn plan(assessment: AssessmentType, config: &LayoutConfig) -> Vec<Box<dyn SectionRenderer>> {
    let radar = |title: &str, group| -> Box<dyn SectionRenderer> {
        Box::new(RadarChart {
            title: title.to_owned(),
            group,
        })
    };
    let bars = |title: &str, group| -> Box<dyn SectionRenderer> {
        Box::new(BarChart {
            title: title.to_owned(),
            group,
            orientation: config.bar_orientation,
        })
    };
    let breakdown = |title: &str, group| -> Box<dyn SectionRenderer> {
        Box::new(DomainBreakdown {
            title: title.to_owned(),
            group,
        })
    };
    let pathways = |group| -> Box<dyn SectionRenderer> {
        Box::new(EducationalPathways {
            title: "Educational Pathways".to_owned(),
            group,
        })
    };
    let recommendations = || -> Box<dyn SectionRenderer> {
        Box::new(CareerRecommendations {
            title: "Career Recommendations".to_owned(),
        })
    };

    match assessment {
        AssessmentType::Riasec => vec![
            radar("Interest Profile", ScoreGroup::Riasec),
            bars("Interest Scores", ScoreGroup::Riasec),
            breakdown("Personality Types", ScoreGroup::Riasec),
            pathways(ScoreGroup::Riasec),
        ],
        AssessmentType::Eq => vec![
            radar("EQ Profile", ScoreGroup::Eq),
            breakdown("Domain Breakdown", ScoreGroup::Eq),
        ],
        AssessmentType::Scct => vec![breakdown("Career Readiness", ScoreGroup::Scct)],
        AssessmentType::FuturePathways => vec![
            bars("Cluster Scores", ScoreGroup::Pathways),
            breakdown("Cluster Breakdown", ScoreGroup::Pathways),
            recommendations(),
            pathways(ScoreGroup::Pathways),
        ],
        AssessmentType::CareerVision => vec![
            radar("Interest Profile", ScoreGroup::Riasec),
            bars("Career Pathways", ScoreGroup::Pathways),
            breakdown("Emotional Intelligence", ScoreGroup::Eq),
            recommendations(),
        ],
    }
}
