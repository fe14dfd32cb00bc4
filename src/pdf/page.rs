use std::fmt::{self, Write};

use itertools::Itertools;

use crate::{
    font::{to_win_ansi, Typeface},
    primitives::{Circle, Color, DrawPrimitive, Line, ProgressBar, RadarPolygon, Rect, TextAlign, TextRun},
};

use super::resource_name;

/// Points per millimetre.
pub const PT_PER_MM: f32 = 72.0 / 25.4;

/// Bezier handle length for approximating a quarter circle.
const KAPPA: f32 = 0.552_284_8;

/// A text string as a hex literal of WinAnsi codes.
pub struct WinAnsiStr<'a>(pub &'a str);

impl fmt::Display for WinAnsiStr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<")?;
        for c in self.0.chars() {
            write!(f, "{:02x}", to_win_ansi(c))?;
        }
        write!(f, ">")
    }
}

/// Builds the content stream of one page.
///
/// Primitives arrive in page units (millimetres, y down) and are written in
/// PDF user space (points, y up).
pub struct PageBuilder<'a> {
    content: String,
    page_height: f32,
    typeface: &'a dyn Typeface,
}

impl<'a> PageBuilder<'a> {
    pub fn new(page_height: f32, typeface: &'a dyn Typeface) -> Self {
        Self {
            content: String::new(),
            page_height,
            typeface,
        }
    }

    fn x(&self, mm: f32) -> f32 {
        mm * PT_PER_MM
    }

    fn y(&self, mm: f32) -> f32 {
        (self.page_height - mm) * PT_PER_MM
    }

    pub fn primitives(mut self, primitives: &[DrawPrimitive]) -> Result<Self, fmt::Error> {
        for primitive in primitives {
            writeln!(self.content, "q")?;
            match primitive {
                DrawPrimitive::Text(text) => self.text(text)?,
                DrawPrimitive::Rect(rect) => self.rect(rect)?,
                DrawPrimitive::Circle(circle) => self.circle(circle)?,
                DrawPrimitive::Line(line) => self.line(line)?,
                DrawPrimitive::Radar(radar) => self.radar(radar)?,
                DrawPrimitive::ProgressBar(bar) => self.progress_bar(bar)?,
            }
            writeln!(self.content, "Q")?;
        }
        Ok(self)
    }

    pub fn build(self) -> Vec<u8> {
        self.content.into_bytes()
    }

    fn text(&mut self, text: &TextRun) -> fmt::Result {
        let width = self.typeface.text_width(&text.text, text.size, text.weight);
        let left = match text.align {
            TextAlign::Left => text.pos.x,
            TextAlign::Center => text.pos.x - 0.5 * width,
            TextAlign::Right => text.pos.x - width,
        };
        let (x, y) = (self.x(left), self.y(text.pos.y));

        writeln!(self.content, "BT")?;
        writeln!(self.content, "/{} {} Tf", resource_name(text.weight), text.size)?;
        self.fill_color(text.color)?;
        writeln!(self.content, "{x:.2} {y:.2} Td")?;
        writeln!(self.content, "{} Tj", WinAnsiStr(&text.text))?;
        writeln!(self.content, "ET")
    }

    fn rect(&mut self, rect: &Rect) -> fmt::Result {
        let Some(paint) = self.paint(rect.fill, rect.stroke.map(|s| (s.color, s.width)), None)? else {
            return Ok(());
        };
        let radius = rect
            .corner_radius
            .unwrap_or(0.0)
            .min(0.5 * rect.size.x)
            .min(0.5 * rect.size.y);
        self.rounded_rect_path(rect.origin.x, rect.origin.y, rect.size.x, rect.size.y, radius)?;
        writeln!(self.content, "{paint}")
    }

    fn circle(&mut self, circle: &Circle) -> fmt::Result {
        let stroke = circle.stroke.map(|s| (s.color, s.width));
        let Some(paint) = self.paint(circle.fill, stroke, circle.dash.as_deref())? else {
            return Ok(());
        };
        let (cx, cy) = (self.x(circle.center.x), self.y(circle.center.y));
        let r = circle.radius * PT_PER_MM;
        let k = r * KAPPA;

        writeln!(self.content, "{:.2} {cy:.2} m", cx + r)?;
        writeln!(self.content, "{:.2} {:.2} {:.2} {:.2} {cx:.2} {:.2} c", cx + r, cy + k, cx + k, cy + r, cy + r)?;
        writeln!(self.content, "{:.2} {:.2} {:.2} {:.2} {:.2} {cy:.2} c", cx - k, cy + r, cx - r, cy + k, cx - r)?;
        writeln!(self.content, "{:.2} {:.2} {:.2} {:.2} {cx:.2} {:.2} c", cx - r, cy - k, cx - k, cy - r, cy - r)?;
        writeln!(self.content, "{:.2} {:.2} {:.2} {:.2} {:.2} {cy:.2} c", cx + k, cy - r, cx + r, cy - k, cx + r)?;
        writeln!(self.content, "h {paint}")
    }

    fn line(&mut self, line: &Line) -> fmt::Result {
        let (x0, y0) = (self.x(line.from.x), self.y(line.from.y));
        let (x1, y1) = (self.x(line.to.x), self.y(line.to.y));
        self.paint(None, Some((line.color, line.width)), line.dash.as_deref())?;
        writeln!(self.content, "{x0:.2} {y0:.2} m")?;
        writeln!(self.content, "{x1:.2} {y1:.2} l S")
    }

    fn radar(&mut self, radar: &RadarPolygon) -> fmt::Result {
        let Some(paint) = self.paint(Some(radar.fill), Some((radar.stroke.color, radar.stroke.width)), None)? else {
            return Ok(());
        };
        for (i, vertex) in radar.vertices().into_iter().enumerate() {
            let op = if i == 0 { "m" } else { "l" };
            let (x, y) = (self.x(vertex.x), self.y(vertex.y));
            writeln!(self.content, "{x:.2} {y:.2} {op}")?;
        }
        writeln!(self.content, "h {paint}")
    }

    fn progress_bar(&mut self, bar: &ProgressBar) -> fmt::Result {
        let radius = bar.corner_radius.min(0.5 * bar.size.y).min(0.5 * bar.size.x);
        self.fill_color(bar.track)?;
        self.rounded_rect_path(bar.origin.x, bar.origin.y, bar.size.x, bar.size.y, radius)?;
        writeln!(self.content, "f")?;

        let filled = bar.filled_width();
        if filled > 0.0 {
            self.fill_color(bar.fill)?;
            self.rounded_rect_path(bar.origin.x, bar.origin.y, filled, bar.size.y, radius.min(0.5 * filled))?;
            writeln!(self.content, "f")?;
        }
        Ok(())
    }

    fn fill_color(&mut self, color: Color) -> fmt::Result {
        let [r, g, b] = color.components();
        writeln!(self.content, "{r:.3} {g:.3} {b:.3} rg")
    }

    /// Sets up the graphics state and returns the painting operator, or
    /// `None` when there is nothing to paint.
    fn paint(
        &mut self,
        fill: Option<Color>,
        stroke: Option<(Color, f32)>,
        dash: Option<&[f32]>,
    ) -> Result<Option<&'static str>, fmt::Error> {
        if let Some(fill) = fill {
            self.fill_color(fill)?;
        }
        if let Some((color, width)) = stroke {
            let [r, g, b] = color.components();
            writeln!(self.content, "{r:.3} {g:.3} {b:.3} RG {:.2} w", width * PT_PER_MM)?;
        }
        if let Some(dash) = dash {
            let pattern = dash.iter().map(|d| format!("{:.2}", d * PT_PER_MM)).join(" ");
            writeln!(self.content, "[{pattern}] 0 d")?;
        }
        Ok(match (fill.is_some(), stroke.is_some()) {
            (true, true) => Some("B"),
            (true, false) => Some("f"),
            (false, true) => Some("S"),
            (false, false) => None,
        })
    }

    fn rounded_rect_path(&mut self, x: f32, top: f32, width: f32, height: f32, radius: f32) -> fmt::Result {
        let (x0, x1) = (self.x(x), self.x(x + width));
        let (y0, y1) = (self.y(top + height), self.y(top));
        let r = radius.max(0.0) * PT_PER_MM;
        if r <= 0.0 {
            return writeln!(self.content, "{x0:.2} {y0:.2} {:.2} {:.2} re", x1 - x0, y1 - y0);
        }
        let k = r * (1.0 - KAPPA);

        writeln!(self.content, "{:.2} {y0:.2} m", x0 + r)?;
        writeln!(self.content, "{:.2} {y0:.2} l", x1 - r)?;
        writeln!(self.content, "{:.2} {y0:.2} {x1:.2} {:.2} {x1:.2} {:.2} c", x1 - k, y0 + k, y0 + r)?;
        writeln!(self.content, "{x1:.2} {:.2} l", y1 - r)?;
        writeln!(self.content, "{x1:.2} {:.2} {:.2} {y1:.2} {:.2} {y1:.2} c", y1 - k, x1 - k, x1 - r)?;
        writeln!(self.content, "{:.2} {y1:.2} l", x0 + r)?;
        writeln!(self.content, "{:.2} {y1:.2} {x0:.2} {:.2} {x0:.2} {:.2} c", x0 + k, y1 - k, y1 - r)?;
        writeln!(self.content, "{x0:.2} {:.2} l", y0 + r)?;
        writeln!(self.content, "{x0:.2} {:.2} {:.2} {y0:.2} {:.2} {y0:.2} c", y0 + k, x0 + k, x0 + r)?;
        writeln!(self.content, "h")
    }
}
