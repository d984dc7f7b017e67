//! Scene rendering - floor, bucket, objects, arm and the hand cursor
//!
//! Everything is laid out in world space and projected through the
//! configured `ViewRect` (front view, z dropped).

use glam::{DVec2, DVec3};
use tracing::warn;

use super::shapes::{create_fan_vertices, create_line_vertices, create_outline_vertices, Point, Vertex};
use super::state::GPU_STATE;
use crate::bridge;
use crate::config::{GameConfig, ViewRect};
use crate::physics::{ArmPose, ObjectView, RenderSnapshot, ShapeKind};

/// Colors for different visualization elements
mod colors {
    pub const ARM: [f32; 4] = [0.78, 0.80, 0.85, 1.0];
    pub const JOINT: [f32; 4] = [0.2, 0.9, 0.9, 1.0];
    pub const FLOOR: [f32; 4] = [0.3, 0.3, 0.4, 1.0];
    pub const BUCKET_FILL: [f32; 4] = [0.2, 0.9, 0.4, 0.15];
    pub const BUCKET_EDGE: [f32; 4] = [0.2, 0.9, 0.4, 0.9];
    pub const HELD: [f32; 4] = [1.0, 1.0, 1.0, 0.8];
    pub const CURSOR_OPEN: [f32; 4] = [0.2, 0.9, 0.9, 0.8];
    pub const CURSOR_GRIP: [f32; 4] = [1.0, 0.3, 0.3, 0.9];
    /// Background
    pub const BACKGROUND: wgpu::Color = wgpu::Color {
        r: 0.102, g: 0.102, b: 0.180, a: 1.0
    };
}

const CIRCLE_SEGMENTS: usize = 20;

/// Accumulates clip-space triangles for one frame
struct Painter<'a> {
    view: &'a ViewRect,
    vertices: Vec<Vertex>,
}

impl<'a> Painter<'a> {
    fn new(view: &'a ViewRect) -> Self {
        Self { view, vertices: Vec::new() }
    }

    fn clip(&self, p: DVec3) -> Point {
        self.view.to_clip(p)
    }

    fn line(&mut self, a: DVec3, b: DVec3, width: f64, color: [f32; 4]) {
        let (a, b) = (self.clip(a), self.clip(b));
        let width = self.view.scale_x(width);
        self.vertices.extend(create_line_vertices(a, b, width, color));
    }

    fn polygon(&mut self, corners: &[DVec3], color: [f32; 4]) {
        if corners.is_empty() {
            return;
        }
        let center = corners.iter().copied().sum::<DVec3>() / corners.len() as f64;
        let rim: Vec<Point> = corners.iter().map(|&p| self.clip(p)).collect();
        self.vertices.extend(create_fan_vertices(self.clip(center), &rim, color));
    }

    fn outline(&mut self, corners: &[DVec3], width: f64, color: [f32; 4]) {
        let points: Vec<Point> = corners.iter().map(|&p| self.clip(p)).collect();
        let width = self.view.scale_x(width);
        self.vertices.extend(create_outline_vertices(&points, width, color));
    }

    fn disc(&mut self, center: DVec3, radius: f64, color: [f32; 4]) {
        let rim = circle_points(center, radius);
        self.polygon(&rim, color);
    }

    fn ring(&mut self, center: DVec3, radius: f64, width: f64, color: [f32; 4]) {
        let rim = circle_points(center, radius);
        self.outline(&rim, width, color);
    }
}

fn circle_points(center: DVec3, radius: f64) -> Vec<DVec3> {
    (0..CIRCLE_SEGMENTS)
        .map(|i| {
            let angle = i as f64 / CIRCLE_SEGMENTS as f64 * std::f64::consts::TAU;
            center + (DVec2::from_angle(angle) * radius).extend(0.0)
        })
        .collect()
}

/// Sizes derived from the playfield so both presets look proportionate
struct Metrics {
    object_radius: f64,
    stroke: f64,
    floor_y: f64,
}

impl Metrics {
    fn from_config(config: &GameConfig) -> Self {
        let object_radius = config.interaction.grab_radius / 3.0;
        let (upper_arm, _) = config.arm.lengths();
        let arena_y = config.motion.arena.y;
        let limit = if config.motion.gravity.y >= 0.0 { arena_y.max } else { arena_y.min };
        let floor_y = limit
            .map(|y| y + object_radius * config.motion.gravity.y.signum())
            .unwrap_or(config.view.bottom);
        Self {
            object_radius,
            stroke: upper_arm * 0.05,
            floor_y,
        }
    }
}

fn draw_floor(painter: &mut Painter, metrics: &Metrics) {
    let view = *painter.view;
    painter.line(
        DVec3::new(view.left, metrics.floor_y, 0.0),
        DVec3::new(view.right, metrics.floor_y, 0.0),
        metrics.stroke * 0.5,
        colors::FLOOR,
    );
}

fn draw_bucket(painter: &mut Painter, config: &GameConfig, metrics: &Metrics) {
    let bucket = config.goal.bucket;
    let view = config.view;
    let x0 = bucket.x.min.unwrap_or(view.left);
    let x1 = bucket.x.max.unwrap_or(view.right);
    let y_lo = bucket.y.min.unwrap_or(metrics.floor_y);
    let y_hi = bucket.y.max.unwrap_or(metrics.floor_y);

    // open side faces away from the floor
    let (floor_side, open_side) = if (y_lo - metrics.floor_y).abs() < (y_hi - metrics.floor_y).abs() {
        (y_lo, y_hi)
    } else {
        (y_hi, y_lo)
    };

    let corners = [
        DVec3::new(x0, open_side, 0.0),
        DVec3::new(x0, floor_side, 0.0),
        DVec3::new(x1, floor_side, 0.0),
        DVec3::new(x1, open_side, 0.0),
    ];
    painter.polygon(&corners, colors::BUCKET_FILL);
    for pair in corners.windows(2) {
        painter.line(pair[0], pair[1], metrics.stroke * 0.4, colors::BUCKET_EDGE);
    }
}

fn draw_object(painter: &mut Painter, obj: &ObjectView, metrics: &Metrics) {
    let r = metrics.object_radius;
    let color = obj.color.0;
    match obj.shape {
        ShapeKind::Cube => {
            let spin = DVec2::from_angle(obj.rotation);
            let corners: Vec<DVec3> = [(-r, -r), (r, -r), (r, r), (-r, r)]
                .iter()
                .map(|&(x, y)| obj.position + spin.rotate(DVec2::new(x, y)).extend(0.0))
                .collect();
            painter.polygon(&corners, color);
        }
        ShapeKind::Ball => {
            painter.disc(obj.position, r, color);
            let stripe = (DVec2::from_angle(obj.rotation) * r * 0.8).extend(0.0);
            painter.line(obj.position - stripe, obj.position + stripe, r * 0.15, colors::HELD);
        }
    }
    if obj.is_grabbed {
        painter.ring(obj.position, r * 1.3, metrics.stroke * 0.2, colors::HELD);
    }
}

fn draw_arm(painter: &mut Painter, arm: &ArmPose, is_gripping: bool, metrics: &Metrics) {
    let [base, elbow, wrist] = arm.joints();
    let stroke = metrics.stroke;

    painter.disc(base, stroke * 2.0, colors::ARM);
    painter.line(base, elbow, stroke, colors::ARM);
    painter.line(elbow, wrist, stroke * 0.8, colors::ARM);
    painter.disc(elbow, stroke * 1.2, colors::JOINT);
    painter.disc(wrist, stroke, colors::JOINT);

    let spread = if is_gripping { 0.25 } else { 0.6 };
    let heading = arm.gripper_heading();
    let finger = stroke * 4.0;
    for side in [-1.0, 1.0] {
        let tip = wrist + (DVec2::from_angle(heading + side * spread) * finger).extend(0.0);
        painter.line(wrist, tip, stroke * 0.4, colors::JOINT);
    }
}

fn build_scene_vertices(snapshot: &RenderSnapshot, config: &GameConfig) -> Vec<Vertex> {
    let metrics = Metrics::from_config(config);
    let mut painter = Painter::new(&config.view);

    draw_floor(&mut painter, &metrics);
    draw_bucket(&mut painter, config, &metrics);
    for obj in snapshot.objects.iter() {
        draw_object(&mut painter, obj, &metrics);
    }
    draw_arm(&mut painter, &snapshot.arm, snapshot.is_gripping, &metrics);

    if let Some(target) = snapshot.target {
        let color = if snapshot.is_gripping { colors::CURSOR_GRIP } else { colors::CURSOR_OPEN };
        painter.ring(target, metrics.object_radius * 0.6, metrics.stroke * 0.2, color);
    }

    painter.vertices
}

/// Render one frame of the current game state
pub fn render_frame() {
    GPU_STATE.with(|state_cell| {
        let state_ref = state_cell.borrow();
        let state = match state_ref.as_ref() {
            Some(s) => s,
            None => return,
        };

        let snapshot = bridge::render_snapshot();
        let config = bridge::current_config();
        let mut vertices = build_scene_vertices(&snapshot, &config);
        if vertices.len() > state.capacity {
            warn!(count = vertices.len(), capacity = state.capacity, "vertex budget exceeded, truncating");
            vertices.truncate(state.capacity - state.capacity % 3);
        }

        let output = match state.surface.get_current_texture() {
            Ok(t) => t,
            Err(_) => return,
        };

        let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = state.device.create_command_encoder(
            &wgpu::CommandEncoderDescriptor { label: Some("Render Encoder") }
        );

        if !vertices.is_empty() {
            state.queue.write_buffer(
                &state.vertex_buffer,
                0,
                bytemuck::cast_slice(&vertices),
            );
        }

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(colors::BACKGROUND),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            if !vertices.is_empty() {
                pass.set_pipeline(&state.render_pipeline);
                pass.set_vertex_buffer(0, state.vertex_buffer.slice(..));
                pass.draw(0..vertices.len() as u32, 0..1);
            }
        }

        state.queue.submit(std::iter::once(encoder.finish()));
        output.present();
    });
}
