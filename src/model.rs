//! Input snapshot for one report and the score normalisation around it.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{catalog, error::ComposeError};

/// Substituted when neither the caller nor the catalogue has a description.
pub const FALLBACK_DESCRIPTION: &str = "Description not available.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssessmentType {
    #[serde(rename = "RIASEC", alias = "riasec")]
    Riasec,
    #[serde(rename = "EQ", alias = "eq")]
    Eq,
    #[serde(rename = "SCCT", alias = "scct")]
    Scct,
    #[serde(alias = "future-pathways")]
    FuturePathways,
    #[serde(alias = "career-vision")]
    CareerVision,
}

/// Which family of scores a section belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScoreGroup {
    Riasec,
    Eq,
    Scct,
    Pathways,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentInfo {
    pub name: Option<String>,
    pub class_label: Option<String>,
    pub section: Option<String>,
    pub school: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSection {
    pub key: String,
    pub label: String,
    pub score: f32,
    pub max_score: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Defaults to the primary group of the report's assessment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<ScoreGroup>,
}

/// A recommendation whose match percentage was computed upstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CareerRecommendation {
    pub key: String,
    pub title: String,
    #[serde(rename = "match")]
    pub match_percentage: f32,
    #[serde(default)]
    pub careers: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportModel {
    pub assessment_type: AssessmentType,
    #[serde(default)]
    pub student_info: Option<StudentInfo>,
    #[serde(default)]
    pub sections: Vec<ScoreSection>,
    #[serde(default)]
    pub recommendations: Vec<CareerRecommendation>,
    #[serde(default)]
    pub primary_cluster: Option<String>,
    #[serde(default)]
    pub generated_at: Option<DateTime<Utc>>,
}

/// Direction a Likert section is scored in.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Scale {
    #[default]
    Direct,
    /// Agreement lowers the score, so a higher total means fewer barriers.
    Inverted,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionSchema {
    pub key: String,
    pub label: String,
    pub max_score: f32,
    pub group: ScoreGroup,
    #[serde(default)]
    pub scale: Scale,
    /// Number of points on the answer scale.
    #[serde(default = "default_points")]
    pub points: u8,
}

fn default_points() -> u8 {
    5
}

impl AssessmentType {
    pub fn primary_group(self) -> ScoreGroup {
        match self {
            Self::Riasec | Self::CareerVision => ScoreGroup::Riasec,
            Self::Eq => ScoreGroup::Eq,
            Self::Scct => ScoreGroup::Scct,
            Self::FuturePathways => ScoreGroup::Pathways,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Riasec => "RIASEC Career Interest Report",
            Self::Eq => "EQ Navigator Report",
            Self::Scct => "SCCT Career Readiness Report",
            Self::FuturePathways => "Future Pathways Report",
            Self::CareerVision => "Career Vision Report",
        }
    }

    pub fn subtitle(self) -> &'static str {
        match self {
            Self::Riasec => "Holland interest profile across six personality types",
            Self::Eq => "Emotional intelligence across five core domains",
            Self::Scct => "Social cognitive career theory readiness profile",
            Self::FuturePathways => "Career cluster alignment and recommendations",
            Self::CareerVision => "Integrated interests, pathways and emotional intelligence",
        }
    }
}

impl ScoreSection {
    pub fn new(key: impl Into<String>, label: impl Into<String>, score: f32, max_score: f32) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            score,
            max_score,
            description: None,
            group: None,
        }
    }

    pub fn with_group(self, group: ScoreGroup) -> Self {
        Self {
            group: Some(group),
            ..self
        }
    }

    pub fn with_description(self, description: impl Into<String>) -> Self {
        Self {
            description: Some(description.into()),
            ..self
        }
    }

    /// The ceiling with negative and non-finite values treated as zero.
    pub fn clamped_max(&self) -> f32 {
        if self.max_score.is_finite() {
            self.max_score.max(0.0)
        } else {
            0.0
        }
    }

    pub fn clamped_score(&self) -> f32 {
        if self.score.is_finite() {
            self.score.clamp(0.0, self.clamped_max())
        } else {
            0.0
        }
    }

    /// `round(100 * score / maxScore)`, always within `0..=100`.
    pub fn percentage(&self) -> u8 {
        let max = self.clamped_max();
        if max <= 0.0 {
            return 0;
        }
        (100.0 * self.clamped_score() / max).round().clamp(0.0, 100.0) as u8
    }

    pub fn fraction(&self) -> f32 {
        self.percentage() as f32 / 100.0
    }

    /// Unrounded `score / maxScore` within `0..=1`, for geometry that should
    /// not snap to whole percents.
    pub fn ratio(&self) -> f32 {
        let max = self.clamped_max();
        if max <= 0.0 {
            0.0
        } else {
            (self.clamped_score() / max).clamp(0.0, 1.0)
        }
    }

    /// Caller description, then the catalogue, then the fixed fallback.
    pub fn resolved_description(&self) -> &str {
        if let Some(description) = self.description.as_deref().filter(|d| !d.trim().is_empty()) {
            return description;
        }
        catalog::description(&self.key).unwrap_or_else(|| {
            debug!(key = %self.key, "no description for section");
            FALLBACK_DESCRIPTION
        })
    }
}

impl ReportModel {
    pub fn new(assessment_type: AssessmentType) -> Self {
        Self {
            assessment_type,
            student_info: None,
            sections: Vec::new(),
            recommendations: Vec::new(),
            primary_cluster: None,
            generated_at: None,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, ComposeError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn group_of(&self, section: &ScoreSection) -> ScoreGroup {
        section
            .group
            .unwrap_or_else(|| self.assessment_type.primary_group())
    }

    pub fn sections_in(&self, group: ScoreGroup) -> impl Iterator<Item = &ScoreSection> {
        self.sections
            .iter()
            .filter(move |section| self.group_of(section) == group)
    }
}

impl SectionSchema {
    pub fn new(key: impl Into<String>, label: impl Into<String>, max_score: f32, group: ScoreGroup) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            max_score,
            group,
            scale: Scale::Direct,
            points: default_points(),
        }
    }

    /// A Likert section whose ceiling follows its question count.
    pub fn likert(key: impl Into<String>, label: impl Into<String>, questions: u8, group: ScoreGroup) -> Self {
        let points = default_points();
        Self::new(key, label, questions as f32 * points as f32, group)
    }

    pub fn inverted(self) -> Self {
        Self {
            scale: Scale::Inverted,
            ..self
        }
    }

    /// Score contributed by one answer on this section's scale.
    pub fn score_answer(&self, answer: u8) -> f32 {
        let points = self.points.max(1);
        let answer = answer.clamp(1, points);
        match self.scale {
            Scale::Direct => answer as f32,
            Scale::Inverted => (points + 1 - answer) as f32,
        }
    }
}

/// Builds score sections from raw per-key scores.
///
/// Missing keys score zero, scores are clamped into `[0, maxScore]` and
/// descriptions come from the catalogue.
pub fn normalize(raw_scores: &BTreeMap<String, f32>, schema: &[SectionSchema]) -> Vec<ScoreSection> {
    schema
        .iter()
        .map(|entry| {
            let raw = raw_scores.get(&entry.key).copied().unwrap_or_else(|| {
                debug!(key = %entry.key, "no raw score, defaulting to 0");
                0.0
            });
            let mut section = ScoreSection::new(&entry.key, &entry.label, raw, entry.max_score)
                .with_group(entry.group);
            section.score = section.clamped_score();
            section.description = Some(section.resolved_description().to_owned());
            section
        })
        .collect()
}

/// Sums Likert answers per section, honouring each section's scale.
pub fn score_answers(answers: &BTreeMap<String, Vec<u8>>, schema: &[SectionSchema]) -> BTreeMap<String, f32> {
    schema
        .iter()
        .filter_map(|entry| {
            let answers = answers.get(&entry.key)?;
            let total = answers.iter().map(|&a| entry.score_answer(a)).sum();
            Some((entry.key.clone(), total))
        })
        .collect()
}

/// Turns `selfAwareness` or `tech-innovator` into `Self Awareness` / `Tech Innovator`.
pub fn humanize_key(key: &str) -> String {
    let mut words = Vec::<String>::new();
    let mut current = String::new();
    let mut prev_lower = false;
    for c in key.chars() {
        if c == '-' || c == '_' || c.is_whitespace() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev_lower = false;
            continue;
        }
        if c.is_uppercase() && prev_lower && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        prev_lower = c.is_lowercase() || c.is_ascii_digit();
        current.push(c);
    }
    if !current.is_empty() {
        words.push(current);
    }

    words
        .iter()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Formats a score without a trailing `.0`.
pub fn format_score(value: f32) -> String {
    let rounded = (value * 10.0).round() / 10.0;
    if rounded.fract() == 0.0 {
        format!("{}", rounded as i64)
    } else {
        format!("{rounded:.1}")
    }
}
