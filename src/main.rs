use std::{
    fs, io,
    path::{Path, PathBuf},
    process::ExitCode,
};

use career_report::{
    composer::ReportComposer,
    config::LayoutConfig,
    error::{ComposeError, ConfigError, PdfError},
    font::{self, FontSet, TrueTypeFamily},
    pdf::render_pdf,
    telemetry::{self, TelemetryError},
};
use clap::{Parser, ValueEnum};
use thiserror::Error;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "career-report",
    about = "Lay out a career assessment report and write it as PDF or JSON",
    version
)]
struct Cli {
    /// Report model JSON file
    #[arg(long)]
    model: PathBuf,
    /// Where to write the rendered report
    #[arg(long)]
    output: PathBuf,
    /// Layout config JSON file overriding the A4 defaults
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = Format::Pdf)]
    format: Format,
    /// Regular TrueType face to embed instead of Helvetica
    #[arg(long, requires_all = ["font_bold", "font_italic"])]
    font_regular: Option<PathBuf>,
    #[arg(long, requires = "font_regular")]
    font_bold: Option<PathBuf>,
    #[arg(long, requires = "font_regular")]
    font_italic: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Pdf,
    /// The composed page list, for inspection
    Json,
}

#[derive(Debug, Error)]
enum CliError {
    #[error("failed to read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to write {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to load font: {0}")]
    Font(#[from] font::Error),
    #[error(transparent)]
    Compose(#[from] ComposeError),
    #[error(transparent)]
    Pdf(#[from] PdfError),
    #[error("failed to serialise document: {0}")]
    Json(#[from] serde_json::Error),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), CliError> {
    telemetry::init("info")?;

    let config = match &cli.config {
        Some(path) => LayoutConfig::load(path)?,
        None => LayoutConfig::default(),
    };
    let model = fs::read_to_string(&cli.model).map_err(|source| CliError::Read {
        path: cli.model.clone(),
        source,
    })?;

    let faces = match (&cli.font_regular, &cli.font_bold, &cli.font_italic) {
        (Some(regular), Some(bold), Some(italic)) => Some([read_bytes(regular)?, read_bytes(bold)?, read_bytes(italic)?]),
        _ => None,
    };
    let fonts = match &faces {
        Some([regular, bold, italic]) => FontSet::TrueType(TrueTypeFamily::new(regular, bold, italic)?),
        None => FontSet::Helvetica,
    };

    let document = ReportComposer::new(config)
        .with_typeface(&fonts)
        .compose_json(&model)?;

    let bytes = match cli.format {
        Format::Pdf => render_pdf(&document, &fonts)?,
        Format::Json => serde_json::to_vec_pretty(&document)?,
    };
    fs::write(&cli.output, bytes).map_err(|source| CliError::Write {
        path: cli.output.clone(),
        source,
    })?;

    info!(
        output = %cli.output.display(),
        pages = document.pages().len(),
        warnings = document.warnings().len(),
        "report written"
    );
    Ok(())
}

fn read_bytes(path: &Path) -> Result<Vec<u8>, CliError> {
    fs::read(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}
