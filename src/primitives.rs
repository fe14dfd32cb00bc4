//! Device-independent drawing primitives.
//!
//! Coordinates are logical page units (millimetres) with the origin in the
//! top-left corner and `y` growing downward. Font sizes are in points.

use std::f32::consts::PI;

use glam::{vec2, Vec2};
use serde::{Deserialize, Serialize};

use crate::error::ShapeError;

/// Line-height factor applied to font sizes.
pub const LINE_HEIGHT: f32 = 1.4;

/// Millimetres per typographic point.
pub const MM_PER_PT: f32 = 25.4 / 72.0;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Mixes the colour towards white. `amount` of 1.0 gives white.
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);
        let mix = |c: u8| (c as f32 + (255.0 - c as f32) * amount).round() as u8;
        Self::rgb(mix(self.r), mix(self.g), mix(self.b))
    }

    /// Components in the `0.0..=1.0` range.
    pub fn components(self) -> [f32; 3] {
        [self.r, self.g, self.b].map(|c| c as f32 / 255.0)
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
    Italic,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub color: Color,
    pub width: f32,
}

/// A single line of styled text anchored at its baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    pub text: String,
    pub pos: Vec2,
    pub size: f32,
    pub weight: FontWeight,
    pub align: TextAlign,
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
    pub fill: Option<Color>,
    pub stroke: Option<Stroke>,
    pub corner_radius: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
    pub fill: Option<Color>,
    pub stroke: Option<Stroke>,
    pub dash: Option<Vec<f32>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub from: Vec2,
    pub to: Vec2,
    pub color: Color,
    pub width: f32,
    pub dash: Option<Vec<f32>>,
}

/// A closed polar plot with one spoke per axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadarPolygon {
    pub center: Vec2,
    pub radius: f32,
    pub axis_labels: Vec<String>,
    pub axis_values: Vec<f32>,
    pub max_value: f32,
    pub fill: Color,
    pub stroke: Stroke,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressBar {
    pub origin: Vec2,
    pub size: Vec2,
    pub fraction: f32,
    pub track: Color,
    pub fill: Color,
    pub corner_radius: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DrawPrimitive {
    Text(TextRun),
    Rect(Rect),
    Circle(Circle),
    Line(Line),
    Radar(RadarPolygon),
    ProgressBar(ProgressBar),
}

fn check(shape: &'static str, field: &'static str, value: f32) -> Result<f32, ShapeError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(ShapeError::InvalidDimension {
            shape,
            field,
            value,
        })
    }
}

impl TextRun {
    pub fn new(text: impl Into<String>, pos: Vec2, size: f32) -> Result<Self, ShapeError> {
        Ok(Self {
            text: text.into(),
            pos,
            size: check("text", "size", size)?,
            weight: FontWeight::Normal,
            align: TextAlign::Left,
            color: Color::BLACK,
        })
    }

    pub fn weight(self, weight: FontWeight) -> Self {
        Self { weight, ..self }
    }

    pub fn align(self, align: TextAlign) -> Self {
        Self { align, ..self }
    }

    pub fn color(self, color: Color) -> Self {
        Self { color, ..self }
    }

    /// Height of one line of this run in logical units.
    pub fn line_height(&self) -> f32 {
        self.size * MM_PER_PT * LINE_HEIGHT
    }
}

impl Rect {
    pub fn new(origin: Vec2, size: Vec2) -> Result<Self, ShapeError> {
        check("rect", "width", size.x)?;
        check("rect", "height", size.y)?;
        Ok(Self {
            origin,
            size,
            fill: None,
            stroke: None,
            corner_radius: None,
        })
    }

    pub fn fill(self, color: Color) -> Self {
        Self {
            fill: Some(color),
            ..self
        }
    }

    pub fn stroke(self, color: Color, width: f32) -> Self {
        Self {
            stroke: Some(Stroke { color, width }),
            ..self
        }
    }

    pub fn rounded(self, radius: f32) -> Result<Self, ShapeError> {
        let radius = check("rect", "corner radius", radius)?;
        Ok(Self {
            corner_radius: Some(radius.min(0.5 * self.size.x.min(self.size.y))),
            ..self
        })
    }
}

impl Circle {
    pub fn new(center: Vec2, radius: f32) -> Result<Self, ShapeError> {
        Ok(Self {
            center,
            radius: check("circle", "radius", radius)?,
            fill: None,
            stroke: None,
            dash: None,
        })
    }

    pub fn fill(self, color: Color) -> Self {
        Self {
            fill: Some(color),
            ..self
        }
    }

    pub fn stroke(self, color: Color, width: f32) -> Self {
        Self {
            stroke: Some(Stroke { color, width }),
            ..self
        }
    }

    pub fn dashed(self, pattern: Vec<f32>) -> Self {
        Self {
            dash: Some(pattern),
            ..self
        }
    }
}

impl Line {
    pub fn new(from: Vec2, to: Vec2, color: Color, width: f32) -> Result<Self, ShapeError> {
        Ok(Self {
            from,
            to,
            color,
            width: check("line", "width", width)?,
            dash: None,
        })
    }

    pub fn dashed(self, pattern: Vec<f32>) -> Self {
        Self {
            dash: Some(pattern),
            ..self
        }
    }
}

impl RadarPolygon {
    pub fn new(
        center: Vec2,
        radius: f32,
        axes: impl IntoIterator<Item = (String, f32)>,
        max_value: f32,
        fill: Color,
        stroke: Stroke,
    ) -> Result<Self, ShapeError> {
        let radius = check("radar", "radius", radius)?;
        let (axis_labels, axis_values) = axes.into_iter().unzip();
        Ok(Self {
            center,
            radius,
            axis_labels,
            axis_values,
            max_value,
            fill,
            stroke,
        })
    }

    pub fn axis_count(&self) -> usize {
        self.axis_values.len()
    }

    /// Angle of the `i`th spoke in radians. The first spoke points up.
    pub fn axis_angle(&self, i: usize) -> f32 {
        let step = 2.0 * PI / self.axis_count().max(1) as f32;
        -0.5 * PI + step * i as f32
    }

    /// Point at `distance` along the `i`th spoke.
    pub fn point_on_axis(&self, i: usize, distance: f32) -> Vec2 {
        let angle = self.axis_angle(i);
        self.center + distance * vec2(angle.cos(), angle.sin())
    }

    /// Radius of the `i`th sample, clamped to `[0, radius]`.
    pub fn sample_radius(&self, i: usize) -> f32 {
        let value = self.axis_values.get(i).copied().unwrap_or(0.0);
        if self.max_value <= 0.0 || !value.is_finite() {
            return 0.0;
        }
        (self.radius * value / self.max_value).clamp(0.0, self.radius)
    }

    pub fn vertices(&self) -> Vec<Vec2> {
        (0..self.axis_count())
            .map(|i| self.point_on_axis(i, self.sample_radius(i)))
            .collect()
    }

    pub fn spoke_ends(&self) -> Vec<Vec2> {
        (0..self.axis_count())
            .map(|i| self.point_on_axis(i, self.radius))
            .collect()
    }
}

impl ProgressBar {
    pub fn new(
        origin: Vec2,
        size: Vec2,
        fraction: f32,
        track: Color,
        fill: Color,
    ) -> Result<Self, ShapeError> {
        check("progress bar", "width", size.x)?;
        check("progress bar", "height", size.y)?;
        let fraction = if fraction.is_finite() {
            fraction.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Ok(Self {
            origin,
            size,
            fraction,
            track,
            fill,
            corner_radius: 0.5 * size.y,
        })
    }

    pub fn filled_width(&self) -> f32 {
        self.size.x * self.fraction
    }
}

impl DrawPrimitive {
    /// Vertical space the primitive occupies when written through a cursor.
    pub fn height(&self) -> f32 {
        match self {
            Self::Text(text) => text.line_height(),
            Self::Rect(rect) => rect.size.y,
            Self::Circle(circle) => 2.0 * circle.radius,
            Self::Line(line) => (line.to.y - line.from.y).abs() + line.width,
            Self::Radar(radar) => 2.0 * radar.radius,
            Self::ProgressBar(bar) => bar.size.y,
        }
    }

    /// Lowest y the primitive reaches. Text counts down to its baseline.
    pub fn bottom(&self) -> f32 {
        match self {
            Self::Text(text) => text.pos.y,
            Self::Rect(rect) => rect.origin.y + rect.size.y,
            Self::Circle(circle) => circle.center.y + circle.radius,
            Self::Line(line) => line.from.y.max(line.to.y),
            Self::Radar(radar) => radar.center.y + radar.radius,
            Self::ProgressBar(bar) => bar.origin.y + bar.size.y,
        }
    }

    /// Shifts the primitive vertically by `dy`.
    pub fn translated(mut self, dy: f32) -> Self {
        let offset = vec2(0.0, dy);
        match &mut self {
            Self::Text(text) => text.pos += offset,
            Self::Rect(rect) => rect.origin += offset,
            Self::Circle(circle) => circle.center += offset,
            Self::Line(line) => {
                line.from += offset;
                line.to += offset;
            }
            Self::Radar(radar) => radar.center += offset,
            Self::ProgressBar(bar) => bar.origin += offset,
        }
        self
    }

    pub fn as_text(&self) -> Option<&TextRun> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }
}

macro_rules! impl_from_primitive {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for DrawPrimitive {
                fn from(value: $ty) -> Self {
                    Self::$variant(value)
                }
            }
        )*
    };
}

impl_from_primitive!(
    Text(TextRun),
    Rect(Rect),
    Circle(Circle),
    Line(Line),
    Radar(RadarPolygon),
    ProgressBar(ProgressBar),
);
