use foundation::{Aabb2, Vec2};
use serde::{Deserialize, Serialize};

use crate::error::{GeometryError, finite};

/// Cross-section outline: top-left corner, crest, toe, bottom-right corner.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlopeProfile {
    pub top_left: Vec2,
    pub crest: Vec2,
    pub toe: Vec2,
    pub bottom_right: Vec2,
}

impl SlopeProfile {
    pub fn new(top_left: Vec2, crest: Vec2, toe: Vec2, bottom_right: Vec2) -> Self {
        Self {
            top_left,
            crest,
            toe,
            bottom_right,
        }
    }

    pub fn from_points(points: &[Vec2]) -> Result<Self, GeometryError> {
        match points {
            [a, b, c, d] => Ok(Self::new(*a, *b, *c, *d)),
            _ => Err(GeometryError::PointCount {
                expected: 4,
                found: points.len(),
            }),
        }
    }

    pub fn points(&self) -> [Vec2; 4] {
        [self.top_left, self.crest, self.toe, self.bottom_right]
    }

    pub fn slope_top(&self) -> f64 {
        self.top_left.y
    }

    pub fn slope_base(&self) -> f64 {
        self.bottom_right.y
    }

    pub fn slope_depth(&self) -> f64 {
        self.slope_top() - self.slope_base()
    }

    /// Horizontal extent of the sloping face.
    pub fn slope_run(&self) -> f64 {
        self.toe.x - self.crest.x
    }

    pub fn width(&self) -> f64 {
        self.bottom_right.x
    }

    /// Where a horizontal line `depth` below the top crosses the sloping face.
    ///
    /// A vertical (or overhanging) face always crosses at the crest.
    pub fn face_x_at_depth(&self, depth: f64) -> f64 {
        let run = self.slope_run();
        let drop = self.crest.y - self.toe.y;
        if run <= 0.0 || drop <= 0.0 {
            return self.crest.x;
        }
        let y = self.slope_top() - depth;
        let t = ((self.crest.y - y) / drop).clamp(0.0, 1.0);
        self.crest.x + run * t
    }

    pub fn bounds(&self) -> Aabb2 {
        let pts = self.points();
        let mut b = Aabb2::new([0.0, 0.0], [0.0, 0.0]);
        if let Some(outline) = Aabb2::from_points(&pts) {
            b.min = [outline.min[0].min(0.0), outline.min[1].min(0.0)];
            b.max = outline.max;
        }
        b
    }

    pub fn validate(&self) -> Result<(), GeometryError> {
        let names = ["top_left", "crest", "toe", "bottom_right"];
        for (name, p) in names.iter().zip(self.points()) {
            finite(format!("profile.{name}.x"), p.x)?;
            finite(format!("profile.{name}.y"), p.y)?;
        }
        let [a, b, c, d] = self.points();
        if !(a.x <= b.x && b.x <= c.x && c.x <= d.x) {
            return Err(GeometryError::ProfileOrder {
                detail: "x coordinates must be non-decreasing left to right",
            });
        }
        if a.y != b.y {
            return Err(GeometryError::ProfileOrder {
                detail: "crest must be level with the top-left corner",
            });
        }
        if a.y < c.y || b.y < c.y || a.y < d.y {
            return Err(GeometryError::ProfileOrder {
                detail: "top points must not lie below the toe",
            });
        }
        if d.y < 0.0 {
            return Err(GeometryError::ProfileOrder {
                detail: "ground surface lies below the model base",
            });
        }
        Ok(())
    }
}

/// Soil parameters shown in the material table. Each one is optional.
#[derive(Debug, Default, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialProperties {
    /// kN/m3
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_weight: Option<f64>,
    /// kPa
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cohesion: Option<f64>,
    /// Degrees.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub friction_angle: Option<f64>,
}

impl MaterialProperties {
    pub fn is_empty(&self) -> bool {
        self.unit_weight.is_none() && self.cohesion.is_none() && self.friction_angle.is_none()
    }

    fn validate(&self, index: usize) -> Result<(), GeometryError> {
        let fields = [
            ("unit_weight", self.unit_weight),
            ("cohesion", self.cohesion),
            ("friction_angle", self.friction_angle),
        ];
        for (name, value) in fields {
            if let Some(v) = value {
                finite(format!("strata[{index}].{name}"), v)?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stratum {
    pub depth_to_bottom: f64,
    pub index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "MaterialProperties::is_empty")]
    pub properties: MaterialProperties,
}

impl Stratum {
    pub fn new(index: usize, depth_to_bottom: f64) -> Self {
        Self {
            depth_to_bottom,
            index,
            name: None,
            color: None,
            properties: MaterialProperties::default(),
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_properties(mut self, properties: MaterialProperties) -> Self {
        self.properties = properties;
        self
    }

    pub fn label(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("Stratum {}", self.index + 1))
    }
}

/// Checks the stack is finite, positive and strictly deepening top-down, and
/// that any material parameters given are finite.
pub fn validate_strata(strata: &[Stratum]) -> Result<(), GeometryError> {
    let mut previous: Option<f64> = None;
    for (i, s) in strata.iter().enumerate() {
        let depth = finite(format!("strata[{i}].depth_to_bottom"), s.depth_to_bottom)?;
        if depth <= 0.0 {
            return Err(GeometryError::DepthNotPositive { index: i, depth });
        }
        if let Some(prev) = previous {
            if depth <= prev {
                return Err(GeometryError::DepthOrder {
                    index: i,
                    depth,
                    previous: prev,
                });
            }
        }
        s.properties.validate(i)?;
        previous = Some(depth);
    }
    Ok(())
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlipCircle {
    pub center_x: f64,
    pub center_y: f64,
    pub radius: f64,
}

impl SlipCircle {
    pub fn new(center_x: f64, center_y: f64, radius: f64) -> Self {
        Self {
            center_x,
            center_y,
            radius,
        }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.center_x, self.center_y)
    }

    /// `[cx - r, cx + r]` by `[cy - r, cy + r]`.
    pub fn bounding_box(&self) -> Aabb2 {
        Aabb2::around(self.center(), self.radius)
    }

    pub fn point_at(&self, theta: f64) -> Vec2 {
        Vec2::new(
            self.center_x + self.radius * theta.cos(),
            self.center_y + self.radius * theta.sin(),
        )
    }

    pub fn validate(&self) -> Result<(), GeometryError> {
        finite("circle.center_x", self.center_x)?;
        finite("circle.center_y", self.center_y)?;
        let radius = finite("circle.radius", self.radius)?;
        if radius <= 0.0 {
            return Err(GeometryError::InvalidRadius { radius });
        }
        Ok(())
    }
}

/// The lowest-FOS circle reported by the search.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriticalCircle {
    pub circle: SlipCircle,
    pub fos: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionInput {
    pub profile: SlopeProfile,
    #[serde(default)]
    pub strata: Vec<Stratum>,
    #[serde(default)]
    pub critical: Option<CriticalCircle>,
    /// Reduced level of the water table, if any.
    #[serde(default)]
    pub water_table: Option<f64>,
}

impl SectionInput {
    pub fn new(profile: SlopeProfile) -> Self {
        Self {
            profile,
            strata: Vec::new(),
            critical: None,
            water_table: None,
        }
    }

    pub fn validate(&self) -> Result<(), GeometryError> {
        self.profile.validate()?;
        validate_strata(&self.strata)?;
        if let Some(critical) = &self.critical {
            critical.circle.validate()?;
            finite("critical.fos", critical.fos)?;
        }
        if let Some(level) = self.water_table {
            let level = finite("water_table", level)?;
            if level > self.profile.slope_top() {
                return Err(GeometryError::WaterAboveCrest {
                    level,
                    crest: self.profile.slope_top(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> SlopeProfile {
        SlopeProfile::new(
            Vec2::new(0.0, 10.0),
            Vec2::new(5.0, 10.0),
            Vec2::new(15.0, 0.0),
            Vec2::new(20.0, 0.0),
        )
    }

    #[test]
    fn derived_quantities() {
        let p = profile();
        assert_eq!(p.slope_top(), 10.0);
        assert_eq!(p.slope_base(), 0.0);
        assert_eq!(p.slope_depth(), 10.0);
        assert_eq!(p.slope_run(), 10.0);
        assert_eq!(p.face_x_at_depth(3.0), 8.0);
        assert_eq!(p.face_x_at_depth(10.0), 15.0);
    }

    #[test]
    fn face_crossing_follows_a_shallow_face() {
        let p = SlopeProfile::new(
            Vec2::new(0.0, 10.0),
            Vec2::new(5.0, 10.0),
            Vec2::new(25.0, 0.0),
            Vec2::new(30.0, 0.0),
        );
        assert_eq!(p.face_x_at_depth(3.0), 11.0);
    }

    #[test]
    fn vertical_face_crosses_at_crest() {
        let p = SlopeProfile::new(
            Vec2::new(0.0, 10.0),
            Vec2::new(5.0, 10.0),
            Vec2::new(5.0, 0.0),
            Vec2::new(20.0, 0.0),
        );
        assert_eq!(p.slope_run(), 0.0);
        assert_eq!(p.face_x_at_depth(4.0), 5.0);
    }

    #[test]
    fn rejects_profile_out_of_order() {
        let mut p = profile();
        p.toe.x = 2.0;
        assert!(matches!(
            p.validate(),
            Err(GeometryError::ProfileOrder { .. })
        ));
    }

    #[test]
    fn rejects_crest_below_top_left() {
        let mut p = profile();
        p.top_left.y = 12.0;
        assert_eq!(
            p.validate(),
            Err(GeometryError::ProfileOrder {
                detail: "crest must be level with the top-left corner",
            })
        );
    }

    #[test]
    fn rejects_nan_coordinate_by_name() {
        let mut p = profile();
        p.crest.y = f64::NAN;
        let err = p.validate().unwrap_err();
        assert_eq!(
            err,
            GeometryError::NonNumeric {
                field: "profile.crest.y".to_string(),
                value: "NaN".to_string(),
            }
        );
    }

    #[test]
    fn strata_must_deepen() {
        let strata = vec![Stratum::new(0, 3.0), Stratum::new(1, 3.0)];
        assert!(matches!(
            validate_strata(&strata),
            Err(GeometryError::DepthOrder { index: 1, .. })
        ));
        let strata = vec![Stratum::new(0, 0.0)];
        assert!(matches!(
            validate_strata(&strata),
            Err(GeometryError::DepthNotPositive { index: 0, .. })
        ));
    }

    #[test]
    fn material_parameters_must_be_finite() {
        let strata = vec![Stratum::new(0, 3.0).with_properties(MaterialProperties {
            cohesion: Some(f64::INFINITY),
            ..MaterialProperties::default()
        })];
        assert_eq!(
            validate_strata(&strata),
            Err(GeometryError::NonNumeric {
                field: "strata[0].cohesion".to_string(),
                value: "inf".to_string(),
            })
        );
    }

    #[test]
    fn circle_bounding_box() {
        let c = SlipCircle::new(10.0, 15.0, 8.0);
        let b = c.bounding_box();
        assert_eq!(b.min, [2.0, 7.0]);
        assert_eq!(b.max, [18.0, 23.0]);
        assert!(matches!(
            SlipCircle::new(0.0, 0.0, 0.0).validate(),
            Err(GeometryError::InvalidRadius { .. })
        ));
    }

    #[test]
    fn water_above_crest_is_rejected() {
        let mut input = SectionInput::new(profile());
        input.water_table = Some(12.0);
        assert!(matches!(
            input.validate(),
            Err(GeometryError::WaterAboveCrest { .. })
        ));
    }
}
