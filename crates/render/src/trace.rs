use feed::Candidate;
use foundation::Vec2;
use section::{Fill, Shape, ShapeRole};
use serde::Serialize;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceMode {
    Lines,
    LinesText,
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct TraceStyle {
    pub mode: TraceMode,
    pub fill: Fill,
    pub line_width: f64,
}

impl TraceStyle {
    pub const fn line(fill: Fill) -> Self {
        Self {
            mode: TraceMode::Lines,
            fill,
            line_width: 2.0,
        }
    }
}

impl Default for TraceStyle {
    fn default() -> Self {
        Self::line(Fill::None)
    }
}

/// One drawable item handed to a [`crate::DrawingSurface`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trace {
    pub points: Vec<Vec2>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub style: TraceStyle,
    /// Set on candidate traces only; identifies which candidate was drawn.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fos: Option<f64>,
}

impl Trace {
    pub fn candidate(candidate: &Candidate, color: &str) -> Self {
        Self {
            points: candidate.points.clone(),
            color: Some(color.to_string()),
            label: Some(format!("{:.3}", candidate.fos)),
            style: TraceStyle::default(),
            fos: Some(candidate.fos),
        }
    }

    /// Section geometry as a trace; the slip arc and its marker take
    /// `critical_color`.
    pub fn from_shape(shape: &Shape, critical_color: Option<&str>) -> Self {
        let mut style = TraceStyle::line(shape.fill);
        let mut color = shape.color.clone();
        match shape.role {
            ShapeRole::WaterTable => style.line_width = 4.0,
            ShapeRole::SlipArc => color = critical_color.map(str::to_string),
            ShapeRole::CenterMarker => {
                style.mode = TraceMode::LinesText;
                color = critical_color.map(str::to_string);
            }
            ShapeRole::GroundLine | ShapeRole::ModelBase | ShapeRole::Stratum { .. } => {}
        }
        Self {
            points: shape.points.clone(),
            color,
            label: shape.label.clone(),
            style,
            fos: None,
        }
    }

    pub fn is_candidate(&self) -> bool {
        self.fos.is_some()
    }
}
