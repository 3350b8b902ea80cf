use std::f32::consts::{PI, TAU};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f32 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    pub fn midpoint(self, other: Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    /// Angle of the vector from `self` to `other`.
    pub fn angle_to(self, other: Point) -> f32 {
        (other.y - self.y).atan2(other.x - self.x)
    }
}

/// Optional zoom clamp. Both ends unbounded by default.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ZoomLimits {
    pub min: Option<f32>,
    pub max: Option<f32>,
}

impl ZoomLimits {
    pub const UNBOUNDED: ZoomLimits = ZoomLimits { min: None, max: None };

    pub fn clamp(&self, scale: f32) -> f32 {
        let mut scale = scale;
        if let Some(min) = self.min {
            scale = scale.max(min);
        }
        if let Some(max) = self.max {
            scale = scale.min(max);
        }
        scale
    }
}

/// Wraps an angle into `[-PI, PI]`.
pub fn normalize_angle(angle: f32) -> f32 {
    let mut a = angle % TAU;
    if a > PI {
        a -= TAU;
    } else if a < -PI {
        a += TAU;
    }
    a
}

/// Pan / zoom / twist transform shared by the tile view and the photo preview.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewState {
    pub scale: f32,
    pub offset_x: f32,
    pub offset_y: f32,
    pub rotation: f32,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            scale: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
            rotation: 0.0,
        }
    }
}

impl ViewState {
    pub fn reset(&mut self) {
        *self = ViewState::default();
    }

    /// Multiplies the scale. Factors that would make it non-finite or
    /// non-positive are dropped.
    pub fn zoom_by(&mut self, factor: f32, limits: &ZoomLimits) {
        let next = self.scale * factor;
        if !factor.is_finite() || factor <= 0.0 || !next.is_finite() || next <= 0.0 {
            log::debug!("Ignoring degenerate zoom factor {}", factor);
            return;
        }
        self.scale = limits.clamp(next);
    }

    pub fn pan_by(&mut self, dx: f32, dy: f32) {
        if dx.is_finite() && dy.is_finite() {
            self.offset_x += dx;
            self.offset_y += dy;
        }
    }

    pub fn rotate_by(&mut self, delta: f32) {
        if delta.is_finite() {
            self.rotation = normalize_angle(self.rotation + delta);
        }
    }

    /// Maps content space (origin at the content's top-left, `content` wide and
    /// tall) onto a canvas of size `canvas`, centering the content before the
    /// pan is applied.
    pub fn content_to_canvas(&self, canvas: (f32, f32), content: (f32, f32)) -> Affine {
        self.mapping(
            Point::new(canvas.0 / 2.0, canvas.1 / 2.0),
            Point::new(self.offset_x, self.offset_y),
            Point::new(content.0 / 2.0, content.1 / 2.0),
        )
    }

    /// Same mapping with the pan expressed in a different unit: the offset is
    /// divided by `units_per_pixel` first (canvas pixels per target pixel).
    pub fn scaled_pan_mapping(&self, center: Point, anchor: Point, units_per_pixel: f32) -> Affine {
        let ratio = if units_per_pixel > 0.0 { units_per_pixel } else { 1.0 };
        self.mapping(
            center,
            Point::new(self.offset_x / ratio, self.offset_y / ratio),
            anchor,
        )
    }

    /// `p -> center + offset + R(rotation) * (scale * (p - anchor))`
    fn mapping(&self, center: Point, offset: Point, anchor: Point) -> Affine {
        let (sin, cos) = self.rotation.sin_cos();
        let a = self.scale * cos;
        let b = -self.scale * sin;
        let c = self.scale * sin;
        let d = self.scale * cos;
        let tx = center.x + offset.x - (a * anchor.x + b * anchor.y);
        let ty = center.y + offset.y - (c * anchor.x + d * anchor.y);
        Affine { a, b, c, d, tx, ty }
    }
}

/// Row-major 2x3 affine matrix: `x' = a*x + b*y + tx`, `y' = c*x + d*y + ty`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub tx: f32,
    pub ty: f32,
}

impl Affine {
    pub const IDENTITY: Affine = Affine { a: 1.0, b: 0.0, c: 0.0, d: 1.0, tx: 0.0, ty: 0.0 };

    pub fn apply(&self, p: Point) -> Point {
        Point::new(
            self.a * p.x + self.b * p.y + self.tx,
            self.c * p.x + self.d * p.y + self.ty,
        )
    }

    pub fn inverse(&self) -> Option<Affine> {
        let det = self.a * self.d - self.b * self.c;
        let inv = 1.0 / det;
        // Only exact singularity counts; tiny scales have tiny determinants
        if det == 0.0 || !det.is_finite() || !inv.is_finite() {
            return None;
        }
        let a = self.d * inv;
        let b = -self.b * inv;
        let c = -self.c * inv;
        let d = self.a * inv;
        Some(Affine {
            a,
            b,
            c,
            d,
            tx: -(a * self.tx + b * self.ty),
            ty: -(c * self.tx + d * self.ty),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f32, b: f32) {
        assert!((a - b).abs() < 1e-3, "{} != {}", a, b);
    }

    #[test]
    fn test_reset_from_any_state() {
        let mut view = ViewState { scale: 7.5, offset_x: -300.0, offset_y: 12.0, rotation: 2.0 };
        view.reset();
        assert_eq!(view, ViewState { scale: 1.0, offset_x: 0.0, offset_y: 0.0, rotation: 0.0 });
    }

    #[test]
    fn test_degenerate_zoom_ignored() {
        let mut view = ViewState::default();
        view.zoom_by(f32::INFINITY, &ZoomLimits::UNBOUNDED);
        view.zoom_by(f32::NAN, &ZoomLimits::UNBOUNDED);
        view.zoom_by(0.0, &ZoomLimits::UNBOUNDED);
        view.zoom_by(-2.0, &ZoomLimits::UNBOUNDED);
        assert_eq!(view.scale, 1.0);
    }

    #[test]
    fn test_zoom_limits_clamp() {
        let limits = ZoomLimits { min: Some(0.5), max: Some(4.0) };
        let mut view = ViewState::default();
        for _ in 0..50 {
            view.zoom_by(1.1, &limits);
        }
        assert_eq!(view.scale, 4.0);
        for _ in 0..50 {
            view.zoom_by(0.9, &limits);
        }
        assert_eq!(view.scale, 0.5);
    }

    #[test]
    fn test_normalize_angle() {
        assert_close(normalize_angle(3.0 * PI / 2.0), -PI / 2.0);
        assert_close(normalize_angle(-3.0 * PI / 2.0), PI / 2.0);
        assert_close(normalize_angle(0.25), 0.25);
        assert_close(normalize_angle(5.0 * TAU + 0.5), 0.5);
    }

    #[test]
    fn test_unrotated_mapping_matches_centered_grid() {
        // 3x3 tiles of 10x10 on a 200x100 canvas, scale 2, panned by (5, -4)
        let view = ViewState { scale: 2.0, offset_x: 5.0, offset_y: -4.0, rotation: 0.0 };
        let m = view.content_to_canvas((200.0, 100.0), (30.0, 30.0));

        let start = m.apply(Point::ZERO);
        assert_close(start.x, (200.0 - 30.0 * 2.0) / 2.0 + 5.0);
        assert_close(start.y, (100.0 - 30.0 * 2.0) / 2.0 - 4.0);

        let far = m.apply(Point::new(30.0, 30.0));
        assert_close(far.x - start.x, 60.0);
    }

    #[test]
    fn test_inverse_round_trip() {
        let view = ViewState { scale: 1.7, offset_x: 12.0, offset_y: 3.0, rotation: 0.8 };
        let m = view.content_to_canvas((640.0, 480.0), (96.0, 96.0));
        let inv = m.inverse().unwrap();

        let p = Point::new(17.0, 81.0);
        let back = inv.apply(m.apply(p));
        assert_close(back.x, p.x);
        assert_close(back.y, p.y);
    }

    #[test]
    fn test_tiny_scale_still_invertible() {
        let view = ViewState { scale: 1e-4, rotation: 0.3, ..ViewState::default() };
        let m = view.content_to_canvas((64.0, 64.0), (36864.0, 36864.0));
        let inv = m.inverse().expect("small but non-zero scale");

        let p = Point::new(30000.0, 1200.0);
        let back = inv.apply(m.apply(p));
        assert!((back.x - p.x).abs() < 1.0);
        assert!((back.y - p.y).abs() < 1.0);

        let collapsed = Affine { a: 0.0, b: 0.0, c: 0.0, d: 0.0, tx: 5.0, ty: 5.0 };
        assert!(collapsed.inverse().is_none());
    }

    #[test]
    fn test_rotation_about_content_center() {
        let view = ViewState { rotation: PI / 2.0, ..ViewState::default() };
        let m = view.content_to_canvas((100.0, 100.0), (20.0, 20.0));

        // Center stays put
        let c = m.apply(Point::new(10.0, 10.0));
        assert_close(c.x, 50.0);
        assert_close(c.y, 50.0);

        // +x axis turns into +y (clockwise on screen)
        let right = m.apply(Point::new(20.0, 10.0));
        assert_close(right.x, 50.0);
        assert_close(right.y, 60.0);
    }
}
