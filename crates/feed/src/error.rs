#[derive(Debug, Clone, PartialEq)]
pub enum FeedError {
    Json(String),
    CoordinateMismatch {
        index: usize,
        x_len: usize,
        y_len: usize,
    },
    NonFiniteFos {
        index: usize,
    },
    /// The backend handed over a list that is not ascending by FOS.
    Unsorted {
        index: usize,
        previous: f64,
        fos: f64,
    },
    EmptyColorTable,
    BadBucketKey {
        key: String,
    },
    UnknownBucket {
        key: String,
    },
}

impl std::fmt::Display for FeedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeedError::Json(msg) => write!(f, "malformed feed json: {msg}"),
            FeedError::CoordinateMismatch {
                index,
                x_len,
                y_len,
            } => write!(
                f,
                "candidate {index} has {x_len} x values but {y_len} y values"
            ),
            FeedError::NonFiniteFos { index } => {
                write!(f, "candidate {index} has a non-finite FOS")
            }
            FeedError::Unsorted {
                index,
                previous,
                fos,
            } => write!(
                f,
                "candidate feed not sorted by FOS: candidate {index} has FOS {fos} after {previous}"
            ),
            FeedError::EmptyColorTable => write!(f, "FOS color table is empty"),
            FeedError::BadBucketKey { key } => {
                write!(f, "color table key {key:?} is not a one-decimal number")
            }
            FeedError::UnknownBucket { key } => {
                write!(f, "no color for FOS bucket {key:?}")
            }
        }
    }
}

impl std::error::Error for FeedError {}

impl From<serde_json::Error> for FeedError {
    fn from(e: serde_json::Error) -> Self {
        FeedError::Json(e.to_string())
    }
}
