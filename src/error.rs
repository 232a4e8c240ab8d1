//! Viewer error kinds

/// Errors surfaced by the viewer and its rendering backend
#[derive(Debug, thiserror::Error)]
pub enum ViewerError {
    /// The rendering library never reported itself ready
    #[error("rendering library unavailable after {attempts} attempts")]
    LibraryUnavailable { attempts: u32 },

    /// The fetch result carried a non-success status
    #[error("HTTP error! status: {status}")]
    HttpError { status: u16 },

    /// Zero-byte document payload
    #[error("document is empty")]
    EmptyDocument,

    /// Document opened but has no pages
    #[error("document has no pages")]
    InvalidDocument,

    /// A page render or metadata call failed
    #[error("render failed: {detail}")]
    RenderFailure { detail: String },

    /// Chapter navigation target could not be resolved
    #[error("invalid destination: {0}")]
    InvalidDestination(String),

    /// An operation needed a loaded document
    #[error("no document loaded")]
    NotLoaded,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ViewerError {
    pub fn render(detail: impl Into<String>) -> Self {
        Self::RenderFailure {
            detail: detail.into(),
        }
    }

    pub fn page_render(page: usize, detail: impl std::fmt::Display) -> Self {
        Self::RenderFailure {
            detail: format!("page {page}: {detail}"),
        }
    }
}

pub type Result<T> = std::result::Result<T, ViewerError>;

#[cfg(feature = "pdf")]
impl From<mupdf::error::Error> for ViewerError {
    fn from(err: mupdf::error::Error) -> Self {
        Self::render(err.to_string())
    }
}
