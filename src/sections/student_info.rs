use itertools::Itertools;
use tracing::debug;

use crate::{
    cursor::{Block, PageCursor},
    error::RenderError,
    font::is_win_ansi,
    model::{ReportModel, StudentInfo},
    primitives::{DrawPrimitive, FontWeight},
};

use super::{flow, line_height, RenderContext, SectionKind, SectionRenderer};

const HEADING_SIZE: f32 = 12.0;
const ROW_SIZE: f32 = 10.0;
const ROW_GAP: f32 = 2.0;
const LABEL_WIDTH: f32 = 40.0;
const NOT_SPECIFIED: &str = "Not specified";

/// Bordered card with the student's details. Emits nothing for anonymous reports.
pub struct StudentInfoCard;

impl SectionRenderer for StudentInfoCard {
    fn kind(&self) -> SectionKind {
        SectionKind::StudentInfo
    }

    fn title(&self) -> &str {
        "Student Information"
    }

    fn layout(&self, model: &ReportModel, ctx: &RenderContext) -> Result<Vec<Block>, RenderError> {
        let Some(info) = &model.student_info else {
            return Ok(Vec::new());
        };

        let pad = ctx.config.card_padding;
        let x = ctx.left() + pad;
        let mut primitives: Vec<DrawPrimitive> = vec![ctx
            .text(self.title(), x, pad, HEADING_SIZE, FontWeight::Bold)?
            .color(ctx.config.theme.primary)
            .into()];

        let mut y = pad + line_height(HEADING_SIZE) + ROW_GAP;
        for (label, value) in rows(info) {
            primitives.push(
                ctx.text(label, x, y, ROW_SIZE, FontWeight::Bold)?
                    .color(ctx.config.theme.muted)
                    .into(),
            );
            primitives.push(ctx.text(value, x + LABEL_WIDTH, y, ROW_SIZE, FontWeight::Normal)?.into());
            y += line_height(ROW_SIZE) + ROW_GAP;
        }

        let card_height = y + pad - ROW_GAP;
        let mut block = Block {
            height: card_height + ctx.config.card_gap,
            ..Block::default()
        };
        block.push(ctx.card(ctx.left(), 0.0, ctx.content_width(), card_height)?);
        block.primitives.extend(primitives);
        Ok(vec![block])
    }

    /// Flows the card and notes every field the report fonts cannot show.
    fn render(&self, model: &ReportModel, ctx: &RenderContext, cursor: &mut PageCursor) -> Result<(), RenderError> {
        let blocks = self.layout(model, ctx)?;
        if let Some(info) = &model.student_info {
            for field in unencodable_fields(info) {
                debug!(field, "student field has characters outside WinAnsi");
                cursor.record_warning(format!(
                    "{}: {field} contains characters the report fonts cannot show",
                    self.title()
                ));
            }
        }
        flow(cursor, blocks, self.title())
    }
}

/// Labels of the rows whose text would print with `?` substitutions.
fn unencodable_fields(info: &StudentInfo) -> Vec<&'static str> {
    rows(info)
        .into_iter()
        .filter(|(_, value)| !is_win_ansi(value))
        .map(|(label, _)| label)
        .collect()
}

fn rows(info: &StudentInfo) -> [(&'static str, String); 3] {
    let present = |value: &Option<String>| {
        value
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_owned)
    };

    let class_section = [present(&info.class_label), present(&info.section)]
        .into_iter()
        .flatten()
        .join(" - ");

    [
        ("Name", present(&info.name).unwrap_or_else(|| NOT_SPECIFIED.to_owned())),
        (
            "Class - Section",
            if class_section.is_empty() {
                NOT_SPECIFIED.to_owned()
            } else {
                class_section
            },
        ),
        ("School", present(&info.school).unwrap_or_else(|| NOT_SPECIFIED.to_owned())),
    ]
}
