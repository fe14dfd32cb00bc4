use thiserror::Error;

/// Raised when a primitive is constructed with an impossible geometry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ShapeError {
    #[error("{shape} has negative or non-finite {field}: {value}")]
    InvalidDimension {
        shape: &'static str,
        field: &'static str,
        value: f32,
    },
}

/// A fault inside a single section renderer. The composer recovers from these.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RenderError {
    #[error("invalid shape: {0}")]
    Shape(#[from] ShapeError),
    #[error("radar chart needs at least 3 axes, got {0}")]
    TooFewAxes(usize),
    #[error("section does not fit the content width ({0:.1} units available)")]
    InvalidGeometry(f32),
}

/// Errors that abort composition entirely.
#[derive(Debug, Error)]
pub enum ComposeError {
    #[error("page geometry leaves no room for content: {width}x{height} with margin {margin} and header {header}")]
    InvalidPageGeometry {
        width: f32,
        height: f32,
        margin: f32,
        header: f32,
    },
    #[error("page chrome could not be laid out: {0}")]
    Chrome(#[from] ShapeError),
    #[error("malformed report model: {0}")]
    MalformedModel(#[from] serde_json::Error),
    #[error("composition cancelled before section {0}")]
    Cancelled(usize),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("failed to write PDF: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to format content stream: {0}")]
    Format(#[from] std::fmt::Error),
}

/// Failure anywhere between a model and its PDF bytes.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error(transparent)]
    Compose(#[from] ComposeError),
    #[error(transparent)]
    Pdf(#[from] PdfError),
}
