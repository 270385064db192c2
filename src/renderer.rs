use crate::color::Rgb;
use crate::config::{ConfigProvider, SceneConfig, TrailStyle};
use crate::graphics::Surface;
use crate::math::{Point2, Point3, Projector, Rotation};
use crate::sphere::{fibonacci_sphere, BeamPath, TrailSample, TrailSampler};
use crate::state::RenderSession;
use crate::vertex::Vertex;
use log::trace;

/// Screen radius of a sphere point, in projection units
const DOT_RADIUS: f64 = 2.0;
/// Width of the stroked trail, and the size of the head of a faded trail
const TRAIL_WIDTH: f64 = 4.0;
/// Opacity of a faded trail sample at full weight
const TRAIL_OPACITY: f64 = 0.8;

/// Drawing area the frame is laid out in
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    /// Projection units to surface pixels
    pub scale: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64, scale: f64) -> Self {
        Viewport {
            width,
            height,
            scale,
        }
    }

    /// Viewport whose scale fits a sphere of `radius` seen from `camera_distance`
    pub fn fit(width: f64, height: f64, radius: f64, camera_distance: f64) -> Self {
        // Nearest points are magnified by the perspective divide
        let nearest = camera_distance / (camera_distance - radius).max(camera_distance * 0.1);
        let extent = radius * nearest * 1.1;
        let scale = (width.min(height) / 2.0 / extent).max(f64::MIN_POSITIVE);
        Viewport::new(width, height, scale)
    }

    pub fn center(&self) -> Point2 {
        Point2::new(self.width / 2.0, self.height / 2.0)
    }
}

/// What one tick drew
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameInfo {
    pub color: Rgb,
    pub beam_head: Point2,
    pub trail_samples: usize,
}

/// Advances the animation and draws one frame per tick
pub struct FrameRenderer {
    sphere_points: Vec<Point3>,
    beam_path: BeamPath,
    camera_distance: f64,
    session: RenderSession,
}

impl FrameRenderer {
    pub fn new(scene: &SceneConfig) -> Self {
        FrameRenderer {
            sphere_points: fibonacci_sphere(scene.num_points, scene.sphere_radius),
            beam_path: BeamPath::new(scene.sphere_radius),
            camera_distance: scene.camera_distance,
            session: RenderSession::default(),
        }
    }

    pub fn session(&self) -> &RenderSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut RenderSession {
        &mut self.session
    }

    pub fn camera_distance(&self) -> f64 {
        self.camera_distance
    }

    pub fn sphere_radius(&self) -> f64 {
        self.beam_path.radius
    }

    /// Rotates and projects every sphere point
    pub fn project_sphere(&self, rotation: &Rotation, projector: &Projector) -> Vec<Vertex> {
        self.sphere_points
            .iter()
            .map(|&p| Vertex::project(rotation.apply(p), projector))
            .collect()
    }

    /// Runs one frame: advance the animation, then clear and redraw `surface`
    pub fn tick<C, S>(
        &mut self,
        config: &C,
        time_ms: f64,
        viewport: &Viewport,
        surface: &mut S,
    ) -> FrameInfo
    where
        C: ConfigProvider + ?Sized,
        S: Surface + ?Sized,
    {
        let style = config.trail_style();
        let trail_length = config.trail_length();

        self.session.rotation.advance(config.rotation_speed());
        self.session.beam.advance(config.beam_speed());
        self.session.frame += 1;

        let color = config
            .neon_color()
            .resolve(time_ms, config.color_cycle_speed());

        let (angle_x, angle_y) = self.session.rotation.angles();
        let rotation = Rotation::new(angle_x, angle_y);
        let projector =
            Projector::new(self.camera_distance, viewport.center()).with_scale(viewport.scale);
        let scale = viewport.scale;

        surface.clear();

        for vertex in self.project_sphere(&rotation, &projector) {
            surface.fill_dot(vertex.screen_position, DOT_RADIUS * scale, color, 1.0);
        }

        let progress = self.session.beam.progress;
        let head = Vertex::project(rotation.apply(self.beam_path.point_at(progress)), &projector);
        surface.fill_glow(
            head.screen_position,
            style.head_radius() * scale,
            style.head_core(),
            color,
        );

        let sampler = TrailSampler::new(self.beam_path, style.beam_delta());
        let trail = sampler.sample(progress, trail_length, &rotation, &projector);
        draw_trail(surface, &trail, style, scale, color);

        trace!(
            "frame {} angles=({:.3}, {:.3}) progress={:.3} head_z={:.1} color={}",
            self.session.frame,
            angle_x,
            angle_y,
            progress,
            head.position.z,
            color
        );

        FrameInfo {
            color,
            beam_head: head.screen_position,
            trail_samples: trail.len(),
        }
    }
}

fn draw_trail<S: Surface + ?Sized>(
    surface: &mut S,
    trail: &[TrailSample],
    style: TrailStyle,
    scale: f64,
    color: Rgb,
) {
    match style {
        TrailStyle::Stroke => {
            let points: Vec<Point2> = trail.iter().map(|s| s.vertex.screen_position).collect();
            surface.stroke_polyline(&points, TRAIL_WIDTH * scale, color);
        }
        TrailStyle::Faded => {
            for sample in trail {
                if sample.alpha <= 0.0 {
                    continue;
                }
                surface.fill_dot(
                    sample.vertex.screen_position,
                    TRAIL_WIDTH * sample.alpha * scale,
                    color,
                    sample.alpha * TRAIL_OPACITY,
                );
            }
        }
    }
}
