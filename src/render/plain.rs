use ab_glyph::FontArc;
use rand::Rng;
use tiny_skia::{GradientStop, LinearGradient, PathBuilder, Pixmap, Point, SpreadMode, Transform};

use crate::render::{
    draw::{self, Shadow, TextLine},
    layout::{self, FitParams},
    palette::{self, ColorProfile},
    RenderError,
};

pub const WIDTH: u32 = 1000;
pub const HEIGHT: u32 = 400;

const MAX_TILT_DEG: f32 = 5.0;
const LINE_GAP: f32 = 20.0;

pub(super) fn render<R: Rng + ?Sized>(
    face: &FontArc,
    text: &str,
    rng: &mut R,
) -> Result<Pixmap, RenderError> {
    let (width, height) = (WIDTH as f32, HEIGHT as f32);

    let mut pixmap = draw::canvas(WIDTH, HEIGHT)?;
    pixmap.fill(palette::rgb(palette::BACKGROUND));

    let (first, second) = layout::split_two_lines(text);
    let lines = [first.to_uppercase(), second.to_uppercase()];

    let size = layout::fit_font_size(
        face,
        &lines,
        FitParams {
            start: 100.0,
            step: 2.0,
            floor: 10.0,
            max_width: width * 0.85,
        },
    );

    let paint = match ColorProfile::random_text(rng) {
        ColorProfile::Solid(color) => draw::solid(color),
        ColorProfile::Pair { primary, secondary } => LinearGradient::new(
            Point::from_xy(0.0, 0.0),
            Point::from_xy(width, 0.0),
            vec![
                GradientStop::new(0.0, primary),
                GradientStop::new(1.0, secondary),
            ],
            SpreadMode::Pad,
            Transform::identity(),
        )
        .map(draw::shaded)
        .unwrap_or_else(|| draw::solid(primary)),
    };

    let tilt = rng.gen_range(-MAX_TILT_DEG..=MAX_TILT_DEG);
    let transform = Transform::from_rotate_at(tilt, width / 2.0, height / 2.0);

    let mut pb = PathBuilder::new();
    let line_height = size + LINE_GAP;
    let offsets = if lines[1].is_empty() {
        vec![0.0]
    } else {
        vec![-line_height / 2.0, line_height / 2.0]
    };
    for (line, offset) in lines.iter().zip(offsets) {
        TextLine::new(face, size, line).push_centered(&mut pb, width / 2.0, height / 2.0 + offset);
    }

    let Some(path) = pb.finish() else {
        return Ok(pixmap);
    };

    draw::drop_shadow(
        &mut pixmap,
        &path,
        transform,
        &Shadow {
            color: palette::rgba(0x000000, 0.7),
            blur: 10,
            offset: (6.0, 6.0),
        },
    )?;
    draw::fill(&mut pixmap, &path, &paint, transform);

    Ok(pixmap)
}
