//! Progress ring drawing.
//!
//! The ring is stroked as polylines sampled along a circle, starting at the
//! 12 o'clock position and running clockwise. Drawing goes through the
//! [`Canvas`] trait; [`SvgCanvas`] is the implementation the widget uses.

use crate::config::{Appearance, WidgetConfig};
use crate::models::ColorTheme;
use crate::stats::progress_emoji;
use std::f64::consts::PI;
use std::fmt::Write as _;

pub const DEFAULT_RING_SIZE: f64 = 320.0;
pub const BACKGROUND_SEGMENTS: usize = 60;
pub const EMOJI_FONT_SIZE: f64 = 120.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Color {
    pub hex: String,
    pub alpha: f64,
}

impl Color {
    pub fn new(hex: impl Into<String>, alpha: f64) -> Self {
        Self {
            hex: hex.into(),
            alpha,
        }
    }

    pub fn opaque(hex: impl Into<String>) -> Self {
        Self::new(hex, 1.0)
    }

    /// `rgba(r, g, b, a)` for CSS; falls back to the raw hex when it is not `#RRGGBB`.
    pub fn to_css(&self) -> String {
        let digits = self.hex.trim_start_matches('#');
        let channel = |range: std::ops::Range<usize>| {
            digits.get(range).and_then(|part| u8::from_str_radix(part, 16).ok())
        };
        match (digits.len(), channel(0..2), channel(2..4), channel(4..6)) {
            (6, Some(r), Some(g), Some(b)) => format!("rgba({r}, {g}, {b}, {})", self.alpha),
            _ => self.hex.clone(),
        }
    }
}

/// Drawing-context capability.
pub trait Canvas {
    fn stroke_polyline(&mut self, points: &[Point], color: &Color, line_width: f64);
    fn draw_text_in_rect(&mut self, text: &str, rect: Rect, font_size: f64, color: &Color);
}

/// Accent color for the active theme.
pub fn progress_color(config: &WidgetConfig, theme: ColorTheme, appearance: Appearance) -> Color {
    Color::opaque(config.theme_colors(theme).for_appearance(appearance))
}

/// Theme tint that deepens with progress, capped lower in light mode.
pub fn background_color(
    config: &WidgetConfig,
    theme: ColorTheme,
    appearance: Appearance,
    progress: f64,
) -> Color {
    let alpha = if appearance.is_dark() {
        (progress / 400.0).min(0.15)
    } else {
        (progress / 500.0).min(0.1)
    };
    Color::new(config.theme_colors(theme).for_appearance(appearance), alpha)
}

/// `steps + 1` points along an arc of `sweep` radians starting at 12 o'clock.
pub fn arc_points(center: f64, radius: f64, sweep: f64, steps: usize) -> Vec<Point> {
    (0..=steps)
        .map(|i| {
            let angle = -PI / 2.0 + sweep * i as f64 / steps as f64;
            Point {
                x: center + radius * angle.cos(),
                y: center + radius * angle.sin(),
            }
        })
        .collect()
}

pub fn progress_steps(sweep: f64) -> usize {
    ((sweep * 20.0).floor() as usize).max(10)
}

pub fn draw_progress_ring<C: Canvas>(
    canvas: &mut C,
    config: &WidgetConfig,
    progress: f64,
    size: f64,
    accent: &Color,
) {
    let center = size / 2.0;
    let radius = size * 0.4;
    let line_width = size * 0.1;

    let background = arc_points(center, radius, 2.0 * PI, BACKGROUND_SEGMENTS);
    canvas.stroke_polyline(&background, &Color::new("#E5E5E7", 0.5), line_width);

    if progress > 0.0 {
        let sweep = 2.0 * PI * progress.min(100.0) / 100.0;
        let arc = arc_points(center, radius, sweep, progress_steps(sweep));
        canvas.stroke_polyline(&arc, accent, line_width);
    }

    let emoji_rect = Rect {
        x: 0.0,
        y: size * 0.28,
        width: size,
        height: size,
    };
    canvas.draw_text_in_rect(
        progress_emoji(config, progress),
        emoji_rect,
        EMOJI_FONT_SIZE,
        &Color::opaque("#000000"),
    );
}

/// Builds an SVG document from canvas calls.
#[derive(Debug, Clone)]
pub struct SvgCanvas {
    size: f64,
    body: String,
}

impl SvgCanvas {
    pub fn new(size: f64) -> Self {
        Self {
            size,
            body: String::new(),
        }
    }

    pub fn finish(self) -> String {
        format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{size}\" height=\"{size}\" viewBox=\"0 0 {size} {size}\">{body}</svg>",
            size = self.size,
            body = self.body
        )
    }
}

impl Canvas for SvgCanvas {
    fn stroke_polyline(&mut self, points: &[Point], color: &Color, line_width: f64) {
        let mut coords = String::new();
        for (index, point) in points.iter().enumerate() {
            if index > 0 {
                coords.push(' ');
            }
            let _ = write!(coords, "{:.2},{:.2}", point.x, point.y);
        }
        let _ = write!(
            self.body,
            "<polyline points=\"{coords}\" fill=\"none\" stroke=\"{}\" stroke-opacity=\"{}\" stroke-width=\"{line_width}\"/>",
            color.hex, color.alpha
        );
    }

    fn draw_text_in_rect(&mut self, text: &str, rect: Rect, font_size: f64, color: &Color) {
        // Top of the rect is the top of the line box.
        let x = rect.x + rect.width / 2.0;
        let y = rect.y + font_size;
        let _ = write!(
            self.body,
            "<text x=\"{x}\" y=\"{y}\" font-size=\"{font_size}\" text-anchor=\"middle\" fill=\"{}\" fill-opacity=\"{}\">{}</text>",
            color.hex,
            color.alpha,
            escape_xml(text)
        );
    }
}

pub fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

pub fn render_ring_svg(
    config: &WidgetConfig,
    theme: ColorTheme,
    appearance: Appearance,
    progress: f64,
    size: f64,
) -> String {
    let mut canvas = SvgCanvas::new(size);
    let accent = progress_color(config, theme, appearance);
    draw_progress_ring(&mut canvas, config, progress, size, &accent);
    canvas.finish()
}
