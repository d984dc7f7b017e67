//! Shape primitives - triangle lists in clip space

/// Vertex structure for rendering colored shapes
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    const ATTRIBS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x2,
        1 => Float32x4
    ];

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

pub type Point = (f32, f32);

/// Filled convex polygon as a triangle fan around `center`
pub fn create_fan_vertices(center: Point, rim: &[Point], color: [f32; 4]) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(rim.len() * 3);
    for (i, &a) in rim.iter().enumerate() {
        let b = rim[(i + 1) % rim.len()];
        vertices.push(Vertex { position: [center.0, center.1], color });
        vertices.push(Vertex { position: [a.0, a.1], color });
        vertices.push(Vertex { position: [b.0, b.1], color });
    }
    vertices
}

/// Closed outline through `points`
pub fn create_outline_vertices(points: &[Point], width: f32, color: [f32; 4]) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(points.len() * 6);
    for (i, &a) in points.iter().enumerate() {
        let b = points[(i + 1) % points.len()];
        vertices.extend(create_line_vertices(a, b, width, color));
    }
    vertices
}

/// Line segment rendered as a thin quad
pub fn create_line_vertices(a: Point, b: Point, width: f32, color: [f32; 4]) -> Vec<Vertex> {
    let dx = b.0 - a.0;
    let dy = b.1 - a.1;
    let len = (dx * dx + dy * dy).sqrt();

    if len < 0.001 {
        return vec![];
    }

    let px = -dy / len * width;
    let py = dx / len * width;

    vec![
        Vertex { position: [a.0 - px, a.1 - py], color },
        Vertex { position: [a.0 + px, a.1 + py], color },
        Vertex { position: [b.0 + px, b.1 + py], color },

        Vertex { position: [a.0 - px, a.1 - py], color },
        Vertex { position: [b.0 + px, b.1 + py], color },
        Vertex { position: [b.0 - px, b.1 - py], color },
    ]
}
