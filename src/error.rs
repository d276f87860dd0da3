pub type Result<T> = std::result::Result<T, FoliumError>;

#[derive(Debug)]
pub enum FoliumError {
    /// A fault raised by the underlying toolkit (cairo status, I/O failure).
    Backend(Box<dyn std::error::Error + Send + Sync>),
    /// An invalid resource descriptor: empty font family, mismatched image
    /// buffer, nonpositive pen width. These indicate a bug in the caller and
    /// are reported immediately rather than absorbed.
    Resource(String),
}

impl std::fmt::Display for FoliumError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FoliumError::Backend(_) => write!(f, "folium encountered a backend error"),
            FoliumError::Resource(msg) => write!(f, "invalid drawing resource: {}", msg),
        }
    }
}

impl std::error::Error for FoliumError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FoliumError::Backend(err) => Some(err.as_ref()),
            FoliumError::Resource(_) => None,
        }
    }
}

impl From<std::io::Error> for FoliumError {
    fn from(err: std::io::Error) -> Self {
        FoliumError::Backend(Box::new(err))
    }
}

#[cfg(feature = "cairo")]
impl From<cairo::Error> for FoliumError {
    fn from(err: cairo::Error) -> Self {
        FoliumError::Backend(Box::new(err))
    }
}

#[cfg(feature = "svg")]
impl From<png::EncodingError> for FoliumError {
    fn from(err: png::EncodingError) -> Self {
        FoliumError::Backend(Box::new(err))
    }
}
