use std::f32::consts::PI;

use ab_glyph::FontArc;
use chrono::{DateTime, Utc};
use rand::{seq::SliceRandom, Rng};
use tiny_skia::{
    GradientStop, LinearGradient, PathBuilder, Pixmap, Point, Rect, SpreadMode, Transform,
};

use crate::{
    countdown,
    render::{
        draw::{self, Shadow, TextLine},
        layout::{self, FitParams},
        palette::{self, with_alpha, ColorProfile},
        DashboardRequest, RenderError,
    },
};

pub const WIDTH: u32 = 1000;
pub const HEIGHT: u32 = 1000;

const CENTER_X: f32 = WIDTH as f32 / 2.0;

const RING_CENTER_Y: f32 = 390.0;
const RING_RADIUS: f32 = 210.0;
const RING_STROKE: f32 = 8.0;
const MARKER_COUNT: usize = 12;
const MARKER_DISTANCE: f32 = RING_RADIUS + 34.0;

const RIBBON_TOP: f32 = 650.0;
const RIBBON_WIDTH: f32 = 380.0;
const RIBBON_HEIGHT: f32 = 76.0;
const RIBBON_NOTCH: f32 = 32.0;

const HAIRLINE_SPACING: usize = 28;
const BORDER_INSET: f32 = 24.0;

const QUOTE_TOP: f32 = 872.0;
const QUOTE_SIZE: f32 = 28.0;
const QUOTE_LINE_HEIGHT: f32 = 36.0;
const QUOTE_MAX_LINES: usize = 3;

pub const DEFAULT_QUOTES: &[&str] = &[
    "Success is the sum of small efforts, repeated day in and day out.",
    "The expert in anything was once a beginner.",
    "Don't watch the clock; do what it does. Keep going.",
    "It always seems impossible until it's done.",
    "Push yourself, because no one else is going to do it for you.",
    "Study while others are sleeping; work while others are loafing.",
];

pub(super) struct Dashboard {
    pub pixmap: Pixmap,
    pub quote: String,
}

pub(super) fn render<R: Rng + ?Sized>(
    face: &FontArc,
    req: &DashboardRequest,
    rng: &mut R,
) -> Result<Dashboard, RenderError> {
    let colors = ColorProfile::random_accent(rng);
    let quote = match &req.quote {
        Some(quote) => quote.clone(),
        None => DEFAULT_QUOTES
            .choose(rng)
            .copied()
            .unwrap_or(DEFAULT_QUOTES[0])
            .to_owned(),
    };

    let mut pixmap = draw::canvas(WIDTH, HEIGHT)?;

    paint_background(&mut pixmap);
    paint_hairlines(&mut pixmap);
    paint_headline(&mut pixmap, face, &req.category);
    paint_knobs(&mut pixmap, &colors);
    paint_ring(&mut pixmap, &colors)?;
    paint_days(&mut pixmap, face, &req.days)?;
    paint_ribbon(&mut pixmap, face, &colors)?;
    paint_captions(&mut pixmap, face, &colors, req.until);
    paint_quote(&mut pixmap, face, &quote);
    paint_border(&mut pixmap, &colors);

    Ok(Dashboard { pixmap, quote })
}

fn paint_background(pixmap: &mut Pixmap) {
    let shader = LinearGradient::new(
        Point::from_xy(0.0, 0.0),
        Point::from_xy(0.0, HEIGHT as f32),
        vec![
            GradientStop::new(0.0, palette::rgb(palette::BACKGROUND)),
            GradientStop::new(1.0, palette::rgb(0x1e1b4b)),
        ],
        SpreadMode::Pad,
        Transform::identity(),
    );

    match shader {
        Some(shader) => {
            if let Some(rect) = Rect::from_xywh(0.0, 0.0, WIDTH as f32, HEIGHT as f32) {
                pixmap.fill_rect(rect, &draw::shaded(shader), Transform::identity(), None);
            }
        }
        None => pixmap.fill(palette::rgb(palette::BACKGROUND)),
    }
}

fn paint_hairlines(pixmap: &mut Pixmap) {
    let height = HEIGHT as f32;

    let mut pb = PathBuilder::new();
    for offset in (0..(WIDTH + HEIGHT) as usize).step_by(HAIRLINE_SPACING) {
        let x = offset as f32 - height;
        pb.move_to(x, 0.0);
        pb.line_to(x + height, height);
    }

    if let Some(path) = pb.finish() {
        let paint = draw::solid(palette::rgba(0xffffff, 0.04));
        draw::stroke(pixmap, &path, &paint, 1.0, Transform::identity());
    }
}

fn paint_headline(pixmap: &mut Pixmap, face: &FontArc, category: &str) {
    let text = format!("{} COUNTDOWN", category.to_uppercase());
    let size = layout::fit_font_size(
        face,
        &[text.as_str()],
        FitParams {
            start: 64.0,
            step: 2.0,
            floor: 20.0,
            max_width: WIDTH as f32 * 0.8,
        },
    );

    if let Some(path) = TextLine::new(face, size, &text).path_centered(CENTER_X, 84.0) {
        let paint = draw::solid(palette::rgba(0xf8fafc, 0.95));
        draw::fill(pixmap, &path, &paint, Transform::identity());
    }
}

/// Stopwatch knobs: a crown on top of the ring and a button at 45°.
fn paint_knobs(pixmap: &mut Pixmap, colors: &ColorProfile) {
    let top = Rect::from_xywh(
        CENTER_X - 45.0,
        RING_CENTER_Y - RING_RADIUS - 62.0,
        90.0,
        56.0,
    );
    if let Some(rect) = top {
        pixmap.fill_rect(
            rect,
            &draw::solid(colors.primary()),
            Transform::identity(),
            None,
        );
    }

    let (kx, ky) = on_ring(-PI / 4.0, RING_RADIUS + 22.0);
    if let Some(rect) = Rect::from_xywh(kx - 26.0, ky - 20.0, 52.0, 40.0) {
        pixmap.fill_rect(
            rect,
            &draw::solid(colors.secondary()),
            Transform::from_rotate_at(45.0, kx, ky),
            None,
        );
    }
}

fn paint_ring(pixmap: &mut Pixmap, colors: &ColorProfile) -> Result<(), RenderError> {
    let Some(ring) = PathBuilder::from_circle(CENTER_X, RING_CENTER_Y, RING_RADIUS) else {
        return Ok(());
    };

    let glow = with_alpha(colors.primary(), 0.8);
    draw::blurred_layer(pixmap, 12, |layer| {
        draw::stroke(layer, &ring, &draw::solid(glow), 30.0, Transform::identity())
    })?;

    if let Some(disc) = PathBuilder::from_circle(CENTER_X, RING_CENTER_Y, RING_RADIUS - RING_STROKE)
    {
        let paint = draw::solid(palette::rgba(0x020617, 0.85));
        draw::fill(pixmap, &disc, &paint, Transform::identity());
    }

    draw::stroke(
        pixmap,
        &ring,
        &draw::solid(colors.primary()),
        RING_STROKE * 2.0,
        Transform::identity(),
    );
    draw::stroke(
        pixmap,
        &ring,
        &draw::solid(palette::rgb(0xffffff)),
        RING_STROKE,
        Transform::identity(),
    );

    let mut pb = PathBuilder::new();
    for (i, (x, y)) in marker_positions().into_iter().enumerate() {
        let radius = if i % 3 == 0 { 9.0 } else { 6.0 };
        pb.push_circle(x, y, radius);
    }
    if let Some(markers) = pb.finish() {
        let paint = draw::solid(palette::rgba(0xffffff, 0.9));
        draw::fill(pixmap, &markers, &paint, Transform::identity());
    }

    Ok(())
}

fn paint_days(pixmap: &mut Pixmap, face: &FontArc, days: &str) -> Result<(), RenderError> {
    let inner_diameter = 2.0 * (RING_RADIUS - RING_STROKE);
    let size = layout::fit_font_size(
        face,
        &[days],
        FitParams {
            start: 200.0,
            step: 4.0,
            floor: 24.0,
            max_width: inner_diameter * 0.8,
        },
    );

    let Some(path) = TextLine::new(face, size, days).path_centered(CENTER_X, RING_CENTER_Y) else {
        return Ok(());
    };

    draw::drop_shadow(
        pixmap,
        &path,
        Transform::identity(),
        &Shadow {
            color: palette::rgba(0x000000, 0.6),
            blur: 6,
            offset: (0.0, 5.0),
        },
    )?;
    draw::fill(
        pixmap,
        &path,
        &draw::solid(palette::rgb(0xffffff)),
        Transform::identity(),
    );
    Ok(())
}

fn paint_ribbon(
    pixmap: &mut Pixmap,
    face: &FontArc,
    colors: &ColorProfile,
) -> Result<(), RenderError> {
    let Some(ribbon) = draw::polygon(&ribbon_points()) else {
        return Ok(());
    };

    let glow = with_alpha(colors.secondary(), 0.7);
    draw::blurred_layer(pixmap, 10, |layer| {
        draw::fill(layer, &ribbon, &draw::solid(glow), Transform::identity())
    })?;
    draw::fill(
        pixmap,
        &ribbon,
        &draw::solid(colors.primary()),
        Transform::identity(),
    );

    let label_center_x = CENTER_X - RIBBON_NOTCH / 2.0;
    if let Some(path) = TextLine::new(face, 46.0, "DAYS")
        .path_centered(label_center_x, RIBBON_TOP + RIBBON_HEIGHT / 2.0)
    {
        draw::fill(
            pixmap,
            &path,
            &draw::solid(palette::rgb(0xffffff)),
            Transform::identity(),
        );
    }
    Ok(())
}

fn paint_captions(
    pixmap: &mut Pixmap,
    face: &FontArc,
    colors: &ColorProfile,
    until: DateTime<Utc>,
) {
    if let Some(path) = TextLine::new(face, 72.0, "LEFT").path_centered(CENTER_X, 775.0) {
        draw::fill(
            pixmap,
            &path,
            &draw::solid(colors.secondary()),
            Transform::identity(),
        );
    }

    let caption = format!("Until {}", countdown::format_long_date(until));
    if let Some(path) = TextLine::new(face, 32.0, &caption).path_centered(CENTER_X, 830.0) {
        draw::fill(
            pixmap,
            &path,
            &draw::solid(palette::rgb(0xcbd5e1)),
            Transform::identity(),
        );
    }
}

fn paint_quote(pixmap: &mut Pixmap, face: &FontArc, quote: &str) {
    let text = format!("\u{201c}{}\u{201d}", quote.trim());
    let mut lines = layout::wrap_words(
        text.split_whitespace(),
        face,
        QUOTE_SIZE,
        WIDTH as f32 * 0.75,
    );

    if lines.len() > QUOTE_MAX_LINES {
        lines.truncate(QUOTE_MAX_LINES);
        if let Some(last) = lines.last_mut() {
            last.push('\u{2026}');
        }
    }

    let mut pb = PathBuilder::new();
    for (i, line) in lines.iter().enumerate() {
        let center_y = QUOTE_TOP + i as f32 * QUOTE_LINE_HEIGHT;
        TextLine::new(face, QUOTE_SIZE, line).push_centered(&mut pb, CENTER_X, center_y);
    }

    if let Some(path) = pb.finish() {
        let paint = draw::solid(palette::rgba(0xe2e8f0, 0.9));
        draw::fill(pixmap, &path, &paint, Transform::identity());
    }
}

fn paint_border(pixmap: &mut Pixmap, colors: &ColorProfile) {
    let rect = Rect::from_xywh(
        BORDER_INSET,
        BORDER_INSET,
        WIDTH as f32 - 2.0 * BORDER_INSET,
        HEIGHT as f32 - 2.0 * BORDER_INSET,
    );
    if let Some(rect) = rect {
        let path = PathBuilder::from_rect(rect);
        let paint = draw::solid(with_alpha(colors.secondary(), 0.8));
        draw::stroke(pixmap, &path, &paint, 4.0, Transform::identity());
    }
}

fn on_ring(angle: f32, distance: f32) -> (f32, f32) {
    (
        CENTER_X + distance * angle.cos(),
        RING_CENTER_Y + distance * angle.sin(),
    )
}

/// Twelve evenly spaced dots around the ring, starting at 12 o'clock.
fn marker_positions() -> [(f32, f32); MARKER_COUNT] {
    let step = 2.0 * PI / MARKER_COUNT as f32;
    std::array::from_fn(|i| on_ring(i as f32 * step - PI / 2.0, MARKER_DISTANCE))
}

/// Banner with a triangular notch cut into its right end.
fn ribbon_points() -> [(f32, f32); 5] {
    let left = CENTER_X - RIBBON_WIDTH / 2.0;
    let right = CENTER_X + RIBBON_WIDTH / 2.0;
    let bottom = RIBBON_TOP + RIBBON_HEIGHT;

    [
        (left, RIBBON_TOP),
        (right, RIBBON_TOP),
        (right - RIBBON_NOTCH, RIBBON_TOP + RIBBON_HEIGHT / 2.0),
        (right, bottom),
        (left, bottom),
    ]
}
