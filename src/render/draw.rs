use ab_glyph::{Font, FontArc, GlyphId, OutlineCurve, Point as GlyphPoint, ScaleFont};
use tiny_skia::{
    Color, FillRule, Paint, Path, PathBuilder, Pixmap, PixmapPaint, Shader, Stroke, Transform,
};

use crate::render::{layout::Measure, RenderError};

pub fn canvas(width: u32, height: u32) -> Result<Pixmap, RenderError> {
    Pixmap::new(width, height).ok_or(RenderError::Canvas { width, height })
}

pub fn encode(pixmap: &Pixmap) -> Result<Vec<u8>, RenderError> {
    pixmap
        .encode_png()
        .map_err(|err| RenderError::Encode(err.to_string()))
}

pub fn solid(color: Color) -> Paint<'static> {
    Paint {
        shader: Shader::SolidColor(color),
        anti_alias: true,
        ..Paint::default()
    }
}

pub fn shaded(shader: Shader<'static>) -> Paint<'static> {
    Paint {
        shader,
        anti_alias: true,
        ..Paint::default()
    }
}

pub fn fill(pixmap: &mut Pixmap, path: &Path, paint: &Paint, transform: Transform) {
    pixmap.fill_path(path, paint, FillRule::Winding, transform, None);
}

pub fn stroke(pixmap: &mut Pixmap, path: &Path, paint: &Paint, width: f32, transform: Transform) {
    let stroke = Stroke {
        width,
        ..Stroke::default()
    };
    pixmap.stroke_path(path, paint, &stroke, transform, None);
}

/// Closed polygon through `points`.
pub fn polygon(points: &[(f32, f32)]) -> Option<Path> {
    let (first, rest) = points.split_first()?;
    let mut pb = PathBuilder::new();
    pb.move_to(first.0, first.1);
    for (x, y) in rest {
        pb.line_to(*x, *y);
    }
    pb.close();
    pb.finish()
}

/// Horizontal and vertical metrics of one line of text.
pub struct TextLine<'a> {
    face: &'a FontArc,
    size: f32,
    text: &'a str,
}

impl<'a> TextLine<'a> {
    pub fn new(face: &'a FontArc, size: f32, text: &'a str) -> Self {
        Self { face, size, text }
    }

    pub fn width(&self) -> f32 {
        self.face.measure_width(self.text, self.size)
    }

    /// Baseline that puts the visual middle of the line on `center_y`.
    pub fn middle_baseline(&self, center_y: f32) -> f32 {
        let scaled = self.face.as_scaled(self.size);
        center_y + (scaled.ascent() + scaled.descent()) / 2.0
    }

    /// Appends the glyph outlines, horizontally centered on `center_x` and
    /// vertically centered on `center_y`.
    pub fn push_centered(&self, pb: &mut PathBuilder, center_x: f32, center_y: f32) {
        let x = center_x - self.width() / 2.0;
        self.push(pb, x, self.middle_baseline(center_y));
    }

    pub fn push(&self, pb: &mut PathBuilder, x: f32, baseline: f32) {
        let scaled = self.face.as_scaled(self.size);
        let (h_scale, v_scale) = (scaled.h_scale_factor(), scaled.v_scale_factor());

        let mut caret = x;
        let mut prev: Option<GlyphId> = None;

        for ch in self.text.chars() {
            let id = scaled.glyph_id(ch);
            if let Some(prev) = prev {
                caret += scaled.kern(prev, id);
            }

            if let Some(outline) = self.face.outline(id) {
                // Font units are y-up, the canvas is y-down.
                let to_canvas =
                    |p: GlyphPoint| (caret + p.x * h_scale, baseline - p.y * v_scale);
                push_outline(pb, &outline.curves, to_canvas);
            }

            caret += scaled.h_advance(id);
            prev = Some(id);
        }
    }

    pub fn path_centered(&self, center_x: f32, center_y: f32) -> Option<Path> {
        let mut pb = PathBuilder::new();
        self.push_centered(&mut pb, center_x, center_y);
        pb.finish()
    }
}

fn push_outline(
    pb: &mut PathBuilder,
    curves: &[OutlineCurve],
    to_canvas: impl Fn(GlyphPoint) -> (f32, f32),
) {
    let mut contour_end: Option<GlyphPoint> = None;

    for curve in curves {
        let (start, end) = match curve {
            OutlineCurve::Line(p0, p1) => (*p0, *p1),
            OutlineCurve::Quad(p0, _, p2) => (*p0, *p2),
            OutlineCurve::Cubic(p0, _, _, p3) => (*p0, *p3),
        };

        // A curve not continuing the previous one starts a new contour.
        if contour_end != Some(start) {
            if contour_end.is_some() {
                pb.close();
            }
            let (x, y) = to_canvas(start);
            pb.move_to(x, y);
        }

        match curve {
            OutlineCurve::Line(_, p1) => {
                let (x, y) = to_canvas(*p1);
                pb.line_to(x, y);
            }
            OutlineCurve::Quad(_, c, p2) => {
                let ((cx, cy), (x, y)) = (to_canvas(*c), to_canvas(*p2));
                pb.quad_to(cx, cy, x, y);
            }
            OutlineCurve::Cubic(_, c1, c2, p3) => {
                let ((c1x, c1y), (c2x, c2y), (x, y)) =
                    (to_canvas(*c1), to_canvas(*c2), to_canvas(*p3));
                pb.cubic_to(c1x, c1y, c2x, c2y, x, y);
            }
        }

        contour_end = Some(end);
    }

    if contour_end.is_some() {
        pb.close();
    }
}

/// Paints into a scratch layer, blurs it and composites it onto `pixmap`.
/// Used for drop shadows and glows.
pub fn blurred_layer(
    pixmap: &mut Pixmap,
    radius: usize,
    paint_layer: impl FnOnce(&mut Pixmap),
) -> Result<(), RenderError> {
    let mut layer = canvas(pixmap.width(), pixmap.height())?;
    paint_layer(&mut layer);
    box_blur(&mut layer, radius, 2);

    pixmap.draw_pixmap(
        0,
        0,
        layer.as_ref(),
        &PixmapPaint::default(),
        Transform::identity(),
        None,
    );
    Ok(())
}

pub struct Shadow {
    pub color: Color,
    pub blur: usize,
    pub offset: (f32, f32),
}

/// Draws the blurred silhouette of `path` under the given transform.
pub fn drop_shadow(
    pixmap: &mut Pixmap,
    path: &Path,
    transform: Transform,
    shadow: &Shadow,
) -> Result<(), RenderError> {
    let transform = transform.post_translate(shadow.offset.0, shadow.offset.1);
    blurred_layer(pixmap, shadow.blur, |layer| {
        fill(layer, path, &solid(shadow.color), transform)
    })
}

/// Separable box blur over premultiplied RGBA, repeated `passes` times.
/// Pixels outside the canvas count as transparent.
pub fn box_blur(pixmap: &mut Pixmap, radius: usize, passes: usize) {
    if radius == 0 {
        return;
    }

    let (width, height) = (pixmap.width() as usize, pixmap.height() as usize);
    let data = pixmap.data_mut();
    let mut scratch = vec![0u8; data.len()];

    for _ in 0..passes {
        blur_axis(data, &mut scratch, height, width, radius, |line, i| {
            line * width + i
        });
        blur_axis(&scratch, data, width, height, radius, |line, i| {
            i * width + line
        });
    }
}

fn blur_axis(
    src: &[u8],
    dst: &mut [u8],
    lines: usize,
    len: usize,
    radius: usize,
    index: impl Fn(usize, usize) -> usize,
) {
    let window = (2 * radius + 1) as u32;

    for line in 0..lines {
        for channel in 0..4 {
            let at = |i: usize| u32::from(src[index(line, i) * 4 + channel]);

            let mut sum = (0..=radius.min(len.saturating_sub(1))).map(at).sum::<u32>();
            for i in 0..len {
                dst[index(line, i) * 4 + channel] = (sum / window) as u8;
                if i + radius + 1 < len {
                    sum += at(i + radius + 1);
                }
                if i >= radius {
                    sum -= at(i - radius);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use tiny_skia::PremultipliedColorU8;

    use super::*;
    use crate::render::font::tests::test_face;

    fn alpha_at(pixmap: &Pixmap, x: u32, y: u32) -> u8 {
        pixmap
            .pixel(x, y)
            .map_or(0, |p: PremultipliedColorU8| p.alpha())
    }

    #[test]
    fn blur_spreads_and_conserves() {
        let mut pixmap = canvas(21, 21).unwrap();
        pixmap.fill_rect(
            tiny_skia::Rect::from_xywh(10.0, 10.0, 1.0, 1.0).unwrap(),
            &solid(Color::BLACK),
            Transform::identity(),
            None,
        );
        assert_eq!(alpha_at(&pixmap, 10, 10), 255);
        assert_eq!(alpha_at(&pixmap, 12, 10), 0);

        box_blur(&mut pixmap, 2, 1);
        assert!(alpha_at(&pixmap, 10, 10) < 255);
        assert!(alpha_at(&pixmap, 12, 12) > 0);
        assert_eq!(alpha_at(&pixmap, 13, 10), 0);

        let untouched = canvas(4, 4).unwrap();
        let mut copy = untouched.clone();
        box_blur(&mut copy, 0, 3);
        assert_eq!(copy.data(), untouched.data());
    }

    #[test]
    fn polygon_needs_points() {
        assert!(polygon(&[]).is_none());
        let triangle = polygon(&[(0.0, 0.0), (10.0, 0.0), (5.0, 8.0)]).unwrap();
        let bounds = triangle.bounds();
        assert_eq!((bounds.width(), bounds.height()), (10.0, 8.0));
    }

    #[test]
    fn text_is_centered() {
        let face = test_face();

        let line = TextLine::new(&face, 60.0, "CENTER");
        let path = line.path_centered(500.0, 200.0).unwrap();
        let bounds = path.bounds();

        let mid_x = bounds.left() + bounds.width() / 2.0;
        let mid_y = bounds.top() + bounds.height() / 2.0;
        assert!((mid_x - 500.0).abs() < 6.0, "{mid_x}");
        assert!((mid_y - 200.0).abs() < 12.0, "{mid_y}");
        assert!(bounds.width() <= line.width() + 1.0);

        assert!(TextLine::new(&face, 60.0, "   ").path_centered(0.0, 0.0).is_none());
    }
}
