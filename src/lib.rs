//! Layout and pagination engine for career assessment reports.
//!
//! A [`ReportModel`](model::ReportModel) is composed into a
//! [`Document`](cursor::Document) of pages holding device-independent
//! primitives, which the [`pdf`] module then binds to PDF bytes.

use crate::{
    composer::ReportComposer,
    config::LayoutConfig,
    error::ReportError,
    font::FontSet,
    model::ReportModel,
    pdf::render_pdf,
};

pub mod catalog;
pub mod composer;
pub mod config;
pub mod cursor;
pub mod error;
pub mod font;
pub mod model;
pub mod pdf;
pub mod primitives;
pub mod sections;
pub mod telemetry;
pub mod text_layout;

/// Composes `model` and renders it with the built-in Helvetica family.
pub fn generate_pdf(model: &ReportModel, config: LayoutConfig) -> Result<Vec<u8>, ReportError> {
    let document = ReportComposer::new(config).compose(model)?;
    Ok(render_pdf(&document, &FontSet::Helvetica)?)
}
