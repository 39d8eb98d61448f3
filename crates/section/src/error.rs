#[derive(Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// A scalar input was missing, unparsable or not finite.
    NonNumeric { field: String, value: String },
    PointCount { expected: usize, found: usize },
    ProfileOrder { detail: &'static str },
    DepthNotPositive { index: usize, depth: f64 },
    DepthOrder { index: usize, depth: f64, previous: f64 },
    InvalidRadius { radius: f64 },
    WaterAboveCrest { level: f64, crest: f64 },
}

impl std::fmt::Display for GeometryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GeometryError::NonNumeric { field, value } => {
                write!(f, "{field} is not a finite number (got {value:?})")
            }
            GeometryError::PointCount { expected, found } => {
                write!(f, "slope profile needs {expected} points, got {found}")
            }
            GeometryError::ProfileOrder { detail } => write!(f, "invalid slope profile: {detail}"),
            GeometryError::DepthNotPositive { index, depth } => {
                write!(f, "strata[{index}].depth_to_bottom must be positive, got {depth}")
            }
            GeometryError::DepthOrder {
                index,
                depth,
                previous,
            } => write!(
                f,
                "strata[{index}].depth_to_bottom={depth} is not below the previous stratum ({previous})"
            ),
            GeometryError::InvalidRadius { radius } => {
                write!(f, "slip circle radius must be positive, got {radius}")
            }
            GeometryError::WaterAboveCrest { level, crest } => {
                write!(f, "water table level {level} is above the slope crest {crest}")
            }
        }
    }
}

impl std::error::Error for GeometryError {}

/// Rejects NaN and infinities, naming the offending field.
pub fn finite(field: impl Into<String>, value: f64) -> Result<f64, GeometryError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(GeometryError::NonNumeric {
            field: field.into(),
            value: value.to_string(),
        })
    }
}
