use feed::FeedError;
use section::GeometryError;

#[derive(Debug, Clone, PartialEq)]
pub enum RenderError {
    Geometry(GeometryError),
    Feed(FeedError),
    InvalidThreshold { value: f64 },
}

impl std::fmt::Display for RenderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RenderError::Geometry(e) => write!(f, "geometry error: {e}"),
            RenderError::Feed(e) => write!(f, "feed error: {e}"),
            RenderError::InvalidThreshold { value } => {
                write!(f, "FOS display threshold must be finite, got {value}")
            }
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderError::Geometry(e) => Some(e),
            RenderError::Feed(e) => Some(e),
            RenderError::InvalidThreshold { .. } => None,
        }
    }
}

impl From<GeometryError> for RenderError {
    fn from(e: GeometryError) -> Self {
        RenderError::Geometry(e)
    }
}

impl From<FeedError> for RenderError {
    fn from(e: FeedError) -> Self {
        RenderError::Feed(e)
    }
}
