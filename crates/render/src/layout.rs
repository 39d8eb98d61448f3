use feed::{FosColorTable, LegendRow};
use foundation::Vec2;
use section::{MaterialRow, SectionGeometry, ShapeRole};
use serde::Serialize;

use crate::config::RenderConfig;

#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Unusable sizes (zero, negative, NaN) fall back to the configured minimum.
    pub fn clamped(self, config: &RenderConfig) -> Self {
        let clamp = |v: f64, min: f64| if v.is_finite() && v >= min { v } else { min };
        Self {
            width: clamp(self.width, config.min_width),
            height: clamp(self.height, config.min_height),
        }
    }

    pub fn is_mobile(&self, config: &RenderConfig) -> bool {
        self.width < config.mobile_breakpoint
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct Margin {
    pub l: f64,
    pub r: f64,
    pub b: f64,
    pub t: f64,
    pub pad: f64,
}

impl Margin {
    pub fn uniform(m: f64) -> Self {
        Self {
            l: m,
            r: m,
            b: m,
            t: m,
            pad: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Annotation {
    pub position: Vec2,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Filled rectangle in data coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutShape {
    pub min: Vec2,
    pub max: Vec2,
    pub fill_color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub width: f64,
    pub height: f64,
    pub margin: Margin,
    /// x and y share one scale so the section is not distorted.
    pub equal_aspect: bool,
    pub annotations: Vec<Annotation>,
    pub shapes: Vec<LayoutShape>,
    /// Material table drawn over the chart; empty on narrow screens.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub material_table: Vec<MaterialRow>,
}

/// Tabular legend shown beside the chart on narrow screens.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MobileLegend {
    pub strata: Vec<MaterialRow>,
    pub fos_scale: Vec<LegendRow>,
}

/// Everything derived from the viewport: layout plus the optional legend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Presentation {
    pub viewport: Viewport,
    pub layout: Layout,
    pub legend: Option<MobileLegend>,
}

impl Presentation {
    pub fn derive(
        viewport: Viewport,
        config: &RenderConfig,
        section: &SectionGeometry,
        colors: &FosColorTable,
    ) -> Self {
        let viewport = viewport.clamped(config);
        let mut layout = Layout {
            width: viewport.width * config.width_factor,
            height: viewport.width * config.height_factor,
            margin: Margin::uniform(config.margin),
            equal_aspect: true,
            annotations: Vec::new(),
            shapes: Vec::new(),
            material_table: Vec::new(),
        };

        if viewport.is_mobile(config) {
            let legend = MobileLegend {
                strata: section.materials.clone(),
                fos_scale: colors.legend(),
            };
            return Self {
                viewport,
                layout,
                legend: Some(legend),
            };
        }

        layout.annotations = section_annotations(section);
        layout.shapes = fos_scale_bar(section, colors);
        layout.material_table = section.materials.clone();
        Self {
            viewport,
            layout,
            legend: None,
        }
    }
}

fn section_annotations(section: &SectionGeometry) -> Vec<Annotation> {
    let left = section.bounds.min[0];
    let mut out = Vec::new();

    // Stratum names sit halfway between their top and bottom boundaries.
    let mut upper = section
        .shape(ShapeRole::GroundLine)
        .and_then(|g| g.points.first())
        .map(|p| p.y)
        .unwrap_or(section.bounds.max[1]);
    for s in section.strata() {
        let lower = s.points.first().map(|p| p.y).unwrap_or(upper);
        out.push(Annotation {
            position: Vec2::new(left, (upper + lower) / 2.0),
            text: s.label.clone().unwrap_or_default(),
            color: None,
        });
        upper = lower;
    }

    if let Some(water) = section.shape(ShapeRole::WaterTable) {
        if let (Some(first), Some(second)) = (water.points.first(), water.points.get(1)) {
            out.push(Annotation {
                position: Vec2::new(first.x + (second.x - first.x) / 4.0, first.y),
                text: "\u{25bc}".to_string(),
                color: water.color.clone(),
            });
        }
    }
    out
}

fn fos_scale_bar(section: &SectionGeometry, colors: &FosColorTable) -> Vec<LayoutShape> {
    let rows = colors.legend();
    if rows.is_empty() {
        return Vec::new();
    }
    let b = section.bounds;
    let cell = b.width() / rows.len() as f64;
    let height = (b.height() * 0.03).max(f64::EPSILON);
    let y0 = b.max[1] + height;
    rows.into_iter()
        .enumerate()
        .map(|(i, row)| LayoutShape {
            min: Vec2::new(b.min[0] + cell * i as f64, y0),
            max: Vec2::new(b.min[0] + cell * (i + 1) as f64, y0 + height),
            fill_color: row.color,
        })
        .collect()
}
