use crate::color::Rgb;
use crate::math::Point2;

/// Drawing primitives the frame renderer emits
pub trait Surface {
    /// Clears the whole surface to the background
    fn clear(&mut self);

    /// Filled circle at `opacity` in [0, 1]
    fn fill_dot(&mut self, center: Point2, radius: f64, color: Rgb, opacity: f64);

    /// Radial glow: full color up to `core * radius`, fading to transparent at `radius`
    fn fill_glow(&mut self, center: Point2, radius: f64, core: f64, color: Rgb);

    /// Connected line through all points
    fn stroke_polyline(&mut self, points: &[Point2], width: f64, color: Rgb);
}

/// RGB pixel buffer with alpha blending onto a black background
pub struct Canvas {
    width: usize,
    height: usize,
    pixels: Vec<[f32; 3]>,
}

impl Canvas {
    pub fn new(width: usize, height: usize) -> Self {
        Canvas {
            width,
            height,
            pixels: vec![[0.0; 3]; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Reallocates the buffer for a new size, clearing it
    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.pixels = vec![[0.0; 3]; width * height];
    }

    /// Color of a pixel, or `None` outside the canvas
    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let [r, g, b] = self.pixels[y * self.width + x];
        let to_u8 = |c: f32| (c * 255.0).round().clamp(0.0, 255.0) as u8;
        Some(Rgb::new(to_u8(r), to_u8(g), to_u8(b)))
    }

    /// Blends `color` over the pixel at (x, y) with the given alpha
    fn blend(&mut self, x: isize, y: isize, color: Rgb, alpha: f64) {
        if x < 0 || y < 0 || x >= self.width as isize || y >= self.height as isize {
            return;
        }
        let alpha = alpha.clamp(0.0, 1.0) as f32;
        if alpha <= 0.0 {
            return;
        }
        let pixel = &mut self.pixels[y as usize * self.width + x as usize];
        let source = [color.r, color.g, color.b];
        for (channel, &value) in pixel.iter_mut().zip(source.iter()) {
            *channel = *channel * (1.0 - alpha) + (value as f32 / 255.0) * alpha;
        }
    }

    /// Whether a point is close enough to the canvas to be worth rasterizing
    fn is_drawable(&self, point: Point2) -> bool {
        let (w, h) = (self.width as f64, self.height as f64);
        point.is_finite()
            && point.x > -w
            && point.x < 2.0 * w
            && point.y > -h
            && point.y < 2.0 * h
    }

    /// Calls `shade` with the pixel position and its distance to `center`
    /// for every pixel whose center lies within `radius + 1`
    fn for_each_in_disc(
        &mut self,
        center: Point2,
        radius: f64,
        mut shade: impl FnMut(&mut Self, isize, isize, f64),
    ) {
        let min_x = (center.x - radius - 1.0).floor().max(0.0) as isize;
        let max_x = (center.x + radius + 1.0).ceil().min(self.width as f64 - 1.0) as isize;
        let min_y = (center.y - radius - 1.0).floor().max(0.0) as isize;
        let max_y = (center.y + radius + 1.0).ceil().min(self.height as f64 - 1.0) as isize;

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let dx = x as f64 + 0.5 - center.x;
                let dy = y as f64 + 0.5 - center.y;
                shade(self, x, y, (dx * dx + dy * dy).sqrt());
            }
        }
    }

    /// Draws a line between two points in the pixel buffer using Bresenham's algorithm
    fn draw_line(&mut self, from: Point2, to: Point2, width: f64, color: Rgb) {
        if !self.is_drawable(from) || !self.is_drawable(to) {
            return;
        }
        let (mut x0, mut y0, x1, y1) = (
            from.x.floor() as isize,
            from.y.floor() as isize,
            to.x.floor() as isize,
            to.y.floor() as isize,
        );
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy; // error value e_xy

        loop {
            if width > 1.0 {
                let center = Point2::new(x0 as f64 + 0.5, y0 as f64 + 0.5);
                self.fill_dot(center, width / 2.0, color, 1.0);
            } else {
                self.blend(x0, y0, color, width.max(0.0));
            }

            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }
}

impl Surface for Canvas {
    fn clear(&mut self) {
        self.pixels.iter_mut().for_each(|p| *p = [0.0; 3]);
    }

    fn fill_dot(&mut self, center: Point2, radius: f64, color: Rgb, opacity: f64) {
        if !self.is_drawable(center) || !(radius > 0.0) {
            return;
        }
        // Sub-pixel dots still light the pixel they fall in
        if radius < 0.5 {
            self.blend(center.x.floor() as isize, center.y.floor() as isize, color, opacity);
            return;
        }
        self.for_each_in_disc(center, radius, |canvas, x, y, distance| {
            let coverage = (radius + 0.5 - distance).clamp(0.0, 1.0);
            canvas.blend(x, y, color, opacity * coverage);
        });
    }

    fn fill_glow(&mut self, center: Point2, radius: f64, core: f64, color: Rgb) {
        if !self.is_drawable(center) || !(radius > 0.0) {
            return;
        }
        if radius < 0.5 {
            self.blend(center.x.floor() as isize, center.y.floor() as isize, color, 1.0);
            return;
        }
        let core = core.clamp(0.0, 1.0);
        self.for_each_in_disc(center, radius, |canvas, x, y, distance| {
            let t = distance / radius;
            let intensity = if t <= core {
                1.0
            } else if t >= 1.0 {
                0.0
            } else {
                1.0 - (t - core) / (1.0 - core)
            };
            canvas.blend(x, y, color, intensity);
        });
    }

    fn stroke_polyline(&mut self, points: &[Point2], width: f64, color: Rgb) {
        if let [single] = points {
            self.fill_dot(*single, width / 2.0, color, 1.0);
            return;
        }
        for segment in points.windows(2) {
            self.draw_line(segment[0], segment[1], width, color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NEON: Rgb = Rgb::new(0, 255, 255);

    fn lit_pixels(canvas: &Canvas) -> usize {
        let mut count = 0;
        for y in 0..canvas.height() {
            for x in 0..canvas.width() {
                if canvas.pixel(x, y) != Some(Rgb::BLACK) {
                    count += 1;
                }
            }
        }
        count
    }

    #[test]
    fn test_new_canvas_is_black() {
        let canvas = Canvas::new(8, 4);
        assert_eq!(lit_pixels(&canvas), 0);
        assert_eq!(canvas.pixel(8, 0), None);
    }

    #[test]
    fn test_dot_lights_its_center() {
        let mut canvas = Canvas::new(20, 20);
        canvas.fill_dot(Point2::new(10.5, 10.5), 2.0, NEON, 1.0);
        assert_eq!(canvas.pixel(10, 10), Some(NEON));
        assert_eq!(canvas.pixel(0, 0), Some(Rgb::BLACK));
        assert!(lit_pixels(&canvas) >= 9);
    }

    #[test]
    fn test_tiny_dot_lights_one_pixel() {
        let mut canvas = Canvas::new(10, 10);
        canvas.fill_dot(Point2::new(3.2, 7.9), 0.2, NEON, 1.0);
        assert_eq!(canvas.pixel(3, 7), Some(NEON));
        assert_eq!(lit_pixels(&canvas), 1);
    }

    #[test]
    fn test_half_opacity_blends_with_background() {
        let mut canvas = Canvas::new(4, 4);
        canvas.fill_dot(Point2::new(1.5, 1.5), 0.3, Rgb::WHITE, 0.5);
        assert_eq!(canvas.pixel(1, 1), Some(Rgb::new(128, 128, 128)));
    }

    #[test]
    fn test_non_finite_points_are_skipped() {
        let mut canvas = Canvas::new(10, 10);
        canvas.fill_dot(Point2::new(f64::NAN, 2.0), 3.0, NEON, 1.0);
        canvas.fill_glow(Point2::new(f64::INFINITY, 2.0), 3.0, 0.0, NEON);
        canvas.stroke_polyline(
            &[Point2::new(0.0, 0.0), Point2::new(f64::NAN, 5.0)],
            1.0,
            NEON,
        );
        assert_eq!(lit_pixels(&canvas), 0);
    }

    #[test]
    fn test_far_away_segments_are_skipped() {
        let mut canvas = Canvas::new(10, 10);
        canvas.stroke_polyline(
            &[Point2::new(5.0, 5.0), Point2::new(4.0e8, 5.0)],
            1.0,
            NEON,
        );
        assert_eq!(lit_pixels(&canvas), 0);
    }

    #[test]
    fn test_glow_fades_outwards() {
        let mut canvas = Canvas::new(40, 40);
        canvas.fill_glow(Point2::new(20.0, 20.0), 10.0, 0.4, NEON);
        let center = canvas.pixel(20, 20).unwrap();
        let edge = canvas.pixel(28, 20).unwrap();
        assert_eq!(center, NEON);
        assert!(edge.g < center.g);
        assert_eq!(canvas.pixel(20, 35), Some(Rgb::BLACK));
    }

    #[test]
    fn test_polyline_connects_points() {
        let mut canvas = Canvas::new(10, 10);
        canvas.stroke_polyline(
            &[Point2::new(0.5, 0.5), Point2::new(9.5, 0.5), Point2::new(9.5, 9.5)],
            1.0,
            NEON,
        );
        for x in 0..10 {
            assert_eq!(canvas.pixel(x, 0), Some(NEON));
        }
        for y in 0..10 {
            assert_eq!(canvas.pixel(9, y), Some(NEON));
        }
        assert_eq!(lit_pixels(&canvas), 19);
    }

    #[test]
    fn test_single_point_polyline_draws_a_dot() {
        let mut canvas = Canvas::new(10, 10);
        canvas.stroke_polyline(&[Point2::new(5.5, 5.5)], 4.0, NEON);
        assert_eq!(canvas.pixel(5, 5), Some(NEON));
        assert!(lit_pixels(&canvas) >= 9);
        assert_eq!(canvas.pixel(0, 0), Some(Rgb::BLACK));
    }

    #[test]
    fn test_clear_and_resize() {
        let mut canvas = Canvas::new(6, 6);
        canvas.fill_dot(Point2::new(3.0, 3.0), 2.0, NEON, 1.0);
        canvas.clear();
        assert_eq!(lit_pixels(&canvas), 0);
        canvas.resize(3, 2);
        assert_eq!((canvas.width(), canvas.height()), (3, 2));
        assert_eq!(canvas.pixel(2, 1), Some(Rgb::BLACK));
    }
}
