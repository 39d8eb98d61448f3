//! Raw section parameters as they arrive from form fields.
//!
//! Every scalar may be a JSON number or a numeric string; `resolve` turns the
//! whole document into a validated [`SectionInput`].

use foundation::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::{GeometryError, finite};
use crate::profile::{
    CriticalCircle, MaterialProperties, SectionInput, SlipCircle, SlopeProfile, Stratum,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Number(f64),
    Text(String),
}

impl Scalar {
    pub fn value(&self, field: &str) -> Result<f64, GeometryError> {
        match self {
            Scalar::Number(v) => finite(field, *v),
            Scalar::Text(s) => {
                let parsed = s
                    .trim()
                    .parse::<f64>()
                    .map_err(|_| GeometryError::NonNumeric {
                        field: field.to_string(),
                        value: s.clone(),
                    })?;
                finite(field, parsed)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointParams {
    pub x: Scalar,
    pub y: Scalar,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StratumParams {
    pub depth_to_bottom: Scalar,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub unit_weight: Option<Scalar>,
    #[serde(default)]
    pub cohesion: Option<Scalar>,
    #[serde(default)]
    pub friction_angle: Option<Scalar>,
}

fn optional(scalar: &Option<Scalar>, field: &str) -> Result<Option<f64>, GeometryError> {
    scalar.as_ref().map(|s| s.value(field)).transpose()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriticalParams {
    pub center_x: Scalar,
    pub center_y: Scalar,
    pub radius: Scalar,
    pub fos: Scalar,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionParams {
    pub slope: Vec<PointParams>,
    #[serde(default)]
    pub strata: Vec<StratumParams>,
    #[serde(default)]
    pub critical: Option<CriticalParams>,
    #[serde(default)]
    pub water_table: Option<Scalar>,
}

impl SectionParams {
    pub fn from_json_str(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }

    pub fn resolve(&self) -> Result<SectionInput, GeometryError> {
        let mut points = Vec::with_capacity(self.slope.len());
        for (i, p) in self.slope.iter().enumerate() {
            points.push(Vec2::new(
                p.x.value(&format!("slope[{i}].x"))?,
                p.y.value(&format!("slope[{i}].y"))?,
            ));
        }
        let profile = SlopeProfile::from_points(&points)?;

        let mut strata = Vec::with_capacity(self.strata.len());
        for (i, s) in self.strata.iter().enumerate() {
            let depth = s
                .depth_to_bottom
                .value(&format!("strata[{i}].depth_to_bottom"))?;
            let properties = MaterialProperties {
                unit_weight: optional(&s.unit_weight, &format!("strata[{i}].unit_weight"))?,
                cohesion: optional(&s.cohesion, &format!("strata[{i}].cohesion"))?,
                friction_angle: optional(
                    &s.friction_angle,
                    &format!("strata[{i}].friction_angle"),
                )?,
            };
            let mut stratum = Stratum::new(i, depth).with_properties(properties);
            stratum.name = s.name.clone();
            stratum.color = s.color.clone();
            strata.push(stratum);
        }

        let critical = match &self.critical {
            Some(c) => Some(CriticalCircle {
                circle: SlipCircle::new(
                    c.center_x.value("critical.center_x")?,
                    c.center_y.value("critical.center_y")?,
                    c.radius.value("critical.radius")?,
                ),
                fos: c.fos.value("critical.fos")?,
            }),
            None => None,
        };

        let water_table = optional(&self.water_table, "water_table")?;

        let input = SectionInput {
            profile,
            strata,
            critical,
            water_table,
        };
        input.validate()?;
        Ok(input)
    }
}
