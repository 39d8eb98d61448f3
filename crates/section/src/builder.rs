use std::f64::consts::TAU;

use foundation::{Aabb2, Vec2};
use serde::{Deserialize, Serialize};

use crate::error::GeometryError;
use crate::palette::{WATER_COLOR, stratum_color};
use crate::profile::{CriticalCircle, MaterialProperties, SectionInput, SlopeProfile, Stratum};

pub const DEFAULT_ARC_SAMPLES: usize = 100;

/// How a shape is filled when drawn.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Fill {
    None,
    ToZeroY,
    /// Between this shape and the one drawn immediately before it.
    ToNextY,
    ToSelf,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "role")]
pub enum ShapeRole {
    GroundLine,
    ModelBase,
    Stratum { index: usize },
    WaterTable,
    SlipArc,
    CenterMarker,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub role: ShapeRole,
    pub points: Vec<Vec2>,
    pub fill: Fill,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Shape {
    fn new(role: ShapeRole, points: Vec<Vec2>, fill: Fill) -> Self {
        Self {
            role,
            points,
            fill,
            label: None,
            color: None,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SectionOptions {
    pub arc_samples: usize,
}

impl Default for SectionOptions {
    fn default() -> Self {
        Self {
            arc_samples: DEFAULT_ARC_SAMPLES,
        }
    }
}

/// One row of the material table: a stratum's name, fill and soil parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialRow {
    pub label: String,
    pub color: String,
    #[serde(flatten)]
    pub properties: MaterialProperties,
}

/// Drawable shapes of one cross-section, in draw order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionGeometry {
    pub shapes: Vec<Shape>,
    pub bounds: Aabb2,
    /// Material table rows, top stratum first.
    #[serde(default)]
    pub materials: Vec<MaterialRow>,
    /// FOS of the critical circle, when one was drawn.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub critical_fos: Option<f64>,
}

impl SectionGeometry {
    pub fn shape(&self, role: ShapeRole) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.role == role)
    }

    pub fn strata(&self) -> impl Iterator<Item = &Shape> {
        self.shapes
            .iter()
            .filter(|s| matches!(s.role, ShapeRole::Stratum { .. }))
    }
}

pub fn build_section(input: &SectionInput) -> Result<SectionGeometry, GeometryError> {
    build_section_with(input, &SectionOptions::default())
}

/// Builds the cross-section. All scalars are validated before any point is
/// produced, so a failure never leaves partial geometry behind.
pub fn build_section_with(
    input: &SectionInput,
    options: &SectionOptions,
) -> Result<SectionGeometry, GeometryError> {
    input.validate()?;
    let profile = &input.profile;

    let mut shapes = Vec::with_capacity(input.strata.len() + 5);
    shapes.push(Shape::new(
        ShapeRole::GroundLine,
        profile.points().to_vec(),
        Fill::ToZeroY,
    ));
    shapes.push(Shape::new(
        ShapeRole::ModelBase,
        vec![Vec2::ORIGIN, Vec2::new(profile.width(), 0.0)],
        Fill::ToNextY,
    ));

    let mut materials = Vec::with_capacity(input.strata.len());
    for stratum in &input.strata {
        let shape = stratum_shape(profile, stratum);
        materials.push(MaterialRow {
            label: stratum.label(),
            color: shape.color.clone().unwrap_or_default(),
            properties: stratum.properties,
        });
        shapes.push(shape);
    }

    if let Some(level) = input.water_table {
        let mut water = Shape::new(
            ShapeRole::WaterTable,
            horizon(profile, profile.slope_top() - level),
            Fill::None,
        );
        water.color = Some(WATER_COLOR.to_string());
        water.label = Some(format!("Water table RL {level}"));
        shapes.push(water);
    }

    let mut bounds = profile.bounds();
    if let Some(critical) = &input.critical {
        let (arc, marker) = critical_shapes(profile, critical, options.arc_samples);
        if let Some(b) = Aabb2::from_points(&arc.points) {
            bounds.min = [bounds.min[0].min(b.min[0]), bounds.min[1].min(b.min[1])];
            bounds.max = [bounds.max[0].max(b.max[0]), bounds.max[1].max(b.max[1])];
        }
        shapes.push(arc);
        shapes.push(marker);
    }

    Ok(SectionGeometry {
        shapes,
        bounds,
        materials,
        critical_fos: input.critical.map(|c| c.fos),
    })
}

fn stratum_shape(profile: &SlopeProfile, stratum: &Stratum) -> Shape {
    let mut shape = Shape::new(
        ShapeRole::Stratum {
            index: stratum.index,
        },
        horizon(profile, stratum.depth_to_bottom),
        Fill::ToNextY,
    );
    shape.label = Some(stratum.label());
    shape.color = Some(
        stratum
            .color
            .clone()
            .unwrap_or_else(|| stratum_color(stratum.index).to_string()),
    );
    shape
}

/// Horizontal line `depth` below the slope top, following the ground surface
/// down the face when it passes above the toe. Never drawn below `y = 0`.
pub fn horizon(profile: &SlopeProfile, depth: f64) -> Vec<Vec2> {
    let y = (profile.slope_top() - depth).max(0.0);
    let left = profile.top_left.x;
    if depth > profile.slope_depth() {
        return vec![Vec2::new(left, y), Vec2::new(profile.width(), y)];
    }
    vec![
        Vec2::new(left, y),
        Vec2::new(profile.face_x_at_depth(depth), y),
        profile.toe,
        Vec2::new(profile.width(), profile.slope_base()),
    ]
}

/// Samples the circle at `samples` equal angles and keeps the part that stays
/// inside the ground profile, framed center -> arc -> center.
pub fn clipped_arc(profile: &SlopeProfile, critical: &CriticalCircle, samples: usize) -> Vec<Vec2> {
    let circle = &critical.circle;
    let center = circle.center();
    let top = profile.slope_top();
    let base = profile.slope_base();

    let mut points = Vec::with_capacity(samples + 2);
    points.push(center);
    for i in 0..samples {
        let p = circle.point_at(TAU * i as f64 / samples as f64);
        let outside = (p.x >= center.x && p.y > base) || (p.x < center.x && p.y > top);
        if !outside {
            points.push(p);
        }
    }
    points.push(center);
    points
}

fn critical_shapes(
    profile: &SlopeProfile,
    critical: &CriticalCircle,
    samples: usize,
) -> (Shape, Shape) {
    let label = format!("{:.3}", critical.fos);

    let mut arc = Shape::new(
        ShapeRole::SlipArc,
        clipped_arc(profile, critical, samples),
        Fill::ToSelf,
    );
    arc.label = Some(label.clone());

    let mut marker = Shape::new(
        ShapeRole::CenterMarker,
        vec![critical.circle.center()],
        Fill::None,
    );
    marker.label = Some(label);

    (arc, marker)
}
