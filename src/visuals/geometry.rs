//! CPU-side geometry: vertex layout, draw lists, primitive meshes and colour helpers.

use bytemuck::{Pod, Zeroable};
use glam::{EulerRot, Mat4, Quat, Vec3};

/// GPU vertex (world space, flat-shaded)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    /// Face normal; zero for unlit lines and points
    pub normal: [f32; 3],
    /// Linear RGB + alpha
    pub color: [f32; 4],
    /// Linear RGB added after lighting
    pub emissive: [f32; 3],
}

/// Surface appearance shared by one primitive
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub color: [f32; 4],
    pub emissive: [f32; 3],
}

impl Material {
    /// Unlit colour with alpha
    pub fn flat(color: [f32; 3], opacity: f32) -> Self {
        Self {
            color: [color[0], color[1], color[2], opacity],
            emissive: [0.0; 3],
        }
    }

    /// Add `intensity` times the base colour as self-illumination
    pub fn glowing(color: [f32; 3], intensity: f32, opacity: f32) -> Self {
        Self {
            color: [color[0], color[1], color[2], opacity],
            emissive: color.map(|c| c * intensity),
        }
    }

    fn vertex(&self, position: Vec3, normal: Vec3) -> Vertex {
        Vertex {
            position: position.to_array(),
            normal: normal.to_array(),
            color: self.color,
            emissive: self.emissive,
        }
    }
}

/// Vertices for one frame, split by topology
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    pub triangles: Vec<Vertex>,
    pub lines: Vec<Vertex>,
    pub points: Vec<Vertex>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.triangles.clear();
        self.lines.clear();
        self.points.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty() && self.lines.is_empty() && self.points.is_empty()
    }

    pub fn vertex_count(&self) -> usize {
        self.triangles.len() + self.lines.len() + self.points.len()
    }

    /// Append a line segment (local space -> world via `model`)
    pub fn line(&mut self, model: Mat4, a: Vec3, b: Vec3, material: &Material) {
        self.lines
            .push(material.vertex(model.transform_point3(a), Vec3::ZERO));
        self.lines
            .push(material.vertex(model.transform_point3(b), Vec3::ZERO));
    }

    /// Append a single point
    pub fn point(&mut self, model: Mat4, p: Vec3, color: [f32; 4]) {
        self.points.push(Vertex {
            position: model.transform_point3(p).to_array(),
            normal: [0.0; 3],
            color,
            emissive: [0.0; 3],
        });
    }
}

/// Non-indexed triangle mesh in local space
#[derive(Debug, Clone)]
pub struct Mesh {
    positions: Vec<Vec3>,
}

impl Mesh {
    pub fn triangle_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Regular octahedron with the given circumradius
    pub fn octahedron(radius: f32) -> Self {
        let px = Vec3::X * radius;
        let nx = -px;
        let py = Vec3::Y * radius;
        let ny = -py;
        let pz = Vec3::Z * radius;
        let nz = -pz;

        let faces = [
            [px, py, pz],
            [pz, py, nx],
            [nx, py, nz],
            [nz, py, px],
            [px, pz, ny],
            [pz, nx, ny],
            [nx, nz, ny],
            [nz, px, ny],
        ];

        Self {
            positions: faces.iter().flatten().copied().collect(),
        }
    }

    /// Torus in the XY plane
    pub fn torus(radius: f32, tube: f32, radial_segments: usize, tubular_segments: usize) -> Self {
        let radial = radial_segments.max(3);
        let tubular = tubular_segments.max(3);

        let ring_point = |j: usize, i: usize| {
            let u = i as f32 / tubular as f32 * std::f32::consts::TAU;
            let v = j as f32 / radial as f32 * std::f32::consts::TAU;
            Vec3::new(
                (radius + tube * v.cos()) * u.cos(),
                (radius + tube * v.cos()) * u.sin(),
                tube * v.sin(),
            )
        };

        let mut positions = Vec::with_capacity(radial * tubular * 6);
        for j in 0..radial {
            for i in 0..tubular {
                let a = ring_point(j, i);
                let b = ring_point(j + 1, i);
                let c = ring_point(j + 1, i + 1);
                let d = ring_point(j, i + 1);
                positions.extend_from_slice(&[a, b, d, b, c, d]);
            }
        }

        Self { positions }
    }

    /// Axis-aligned box centred on the origin
    pub fn cuboid(width: f32, height: f32, depth: f32) -> Self {
        let h = Vec3::new(width, height, depth) * 0.5;
        let corner = |x: f32, y: f32, z: f32| Vec3::new(x * h.x, y * h.y, z * h.z);

        // Each face as a quad, counter-clockwise seen from outside
        let quads = [
            [corner(1., -1., -1.), corner(1., 1., -1.), corner(1., 1., 1.), corner(1., -1., 1.)],
            [corner(-1., -1., 1.), corner(-1., 1., 1.), corner(-1., 1., -1.), corner(-1., -1., -1.)],
            [corner(-1., 1., -1.), corner(-1., 1., 1.), corner(1., 1., 1.), corner(1., 1., -1.)],
            [corner(-1., -1., 1.), corner(-1., -1., -1.), corner(1., -1., -1.), corner(1., -1., 1.)],
            [corner(-1., -1., 1.), corner(1., -1., 1.), corner(1., 1., 1.), corner(-1., 1., 1.)],
            [corner(1., -1., -1.), corner(-1., -1., -1.), corner(-1., 1., -1.), corner(1., 1., -1.)],
        ];

        let mut positions = Vec::with_capacity(36);
        for [a, b, c, d] in quads {
            positions.extend_from_slice(&[a, b, c, a, c, d]);
        }
        Self { positions }
    }

    /// Transform into world space and append to `out`
    pub fn emit(&self, model: Mat4, material: &Material, out: &mut Vec<Vertex>) {
        for tri in self.positions.chunks_exact(3) {
            let a = model.transform_point3(tri[0]);
            let b = model.transform_point3(tri[1]);
            let c = model.transform_point3(tri[2]);
            // Degenerate (zero-scaled) faces get a zero normal and render unlit
            let normal = (b - a).cross(c - a).normalize_or_zero();
            out.push(material.vertex(a, normal));
            out.push(material.vertex(b, normal));
            out.push(material.vertex(c, normal));
        }
    }
}

/// Translation, XYZ Euler rotation and scale as one matrix
pub fn transform(translation: Vec3, rotation: Vec3, scale: Vec3) -> Mat4 {
    Mat4::from_scale_rotation_translation(
        scale,
        Quat::from_euler(EulerRot::XYZ, rotation.x, rotation.y, rotation.z),
        translation,
    )
}

/// sRGB component to linear
pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// `0xRRGGBB` (sRGB) to linear RGB
pub fn hex_color(hex: u32) -> [f32; 3] {
    let channel = |shift: u32| srgb_to_linear(((hex >> shift) & 0xff) as f32 / 255.0);
    [channel(16), channel(8), channel(0)]
}

/// HSL (all components 0..1, sRGB) to linear RGB
pub fn hsl_color(hue: f32, saturation: f32, lightness: f32) -> [f32; 3] {
    let h = hue.rem_euclid(1.0);
    let s = saturation.clamp(0.0, 1.0);
    let l = lightness.clamp(0.0, 1.0);

    let rgb = if s == 0.0 {
        [l; 3]
    } else {
        let q = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;
        [
            hue_to_rgb(p, q, h + 1.0 / 3.0),
            hue_to_rgb(p, q, h),
            hue_to_rgb(p, q, h - 1.0 / 3.0),
        ]
    };

    rgb.map(srgb_to_linear)
}

fn hue_to_rgb(p: f32, q: f32, t: f32) -> f32 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * 6.0 * (2.0 / 3.0 - t)
    } else {
        p
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_octahedron_vertices_on_sphere() {
        let mesh = Mesh::octahedron(1.5);
        assert_eq!(mesh.triangle_count(), 8);

        let mut out = Vec::new();
        mesh.emit(Mat4::IDENTITY, &Material::flat([1.0; 3], 1.0), &mut out);
        for v in &out {
            let r = Vec3::from_array(v.position).length();
            assert!((r - 1.5).abs() < 1e-5);
        }
    }

    #[test]
    fn test_octahedron_normals_point_outward() {
        let mut out = Vec::new();
        Mesh::octahedron(1.0).emit(Mat4::IDENTITY, &Material::flat([1.0; 3], 1.0), &mut out);
        for tri in out.chunks_exact(3) {
            let centroid = tri
                .iter()
                .map(|v| Vec3::from_array(v.position))
                .sum::<Vec3>()
                / 3.0;
            assert!(centroid.dot(Vec3::from_array(tri[0].normal)) > 0.0);
        }
    }

    #[test]
    fn test_torus_extent() {
        let mesh = Mesh::torus(2.5, 0.05, 16, 100);
        assert_eq!(mesh.triangle_count(), 16 * 100 * 2);
        for p in &mesh.positions {
            let planar = p.truncate().length();
            assert!(planar >= 2.45 - 1e-4 && planar <= 2.55 + 1e-4);
            assert!(p.z.abs() <= 0.05 + 1e-5);
        }
    }

    #[test]
    fn test_zero_scale_gives_finite_vertices() {
        let model = transform(Vec3::ZERO, Vec3::ZERO, Vec3::new(1.0, 0.0, 1.0));
        let mut out = Vec::new();
        Mesh::cuboid(0.15, 1.0, 0.15).emit(model, &Material::flat([1.0; 3], 1.0), &mut out);
        assert_eq!(out.len(), 36);
        assert!(out
            .iter()
            .all(|v| v.position.iter().chain(v.normal.iter()).all(|c| c.is_finite())));
    }

    #[test]
    fn test_colour_conversions() {
        assert_eq!(hex_color(0x000000), [0.0, 0.0, 0.0]);
        let white = hex_color(0xffffff);
        assert!(white.iter().all(|c| (c - 1.0).abs() < 1e-6));

        // Pure red at hue 0
        let red = hsl_color(0.0, 1.0, 0.5);
        assert!((red[0] - 1.0).abs() < 1e-6);
        assert!(red[1].abs() < 1e-6 && red[2].abs() < 1e-6);

        // Hue wraps
        assert_eq!(hsl_color(1.25, 0.7, 0.5), hsl_color(0.25, 0.7, 0.5));
    }

    #[test]
    fn test_line_and_point_are_unlit() {
        let mut list = DrawList::new();
        let material = Material::flat([0.2, 0.4, 0.6], 0.7);
        list.line(Mat4::IDENTITY, Vec3::ZERO, Vec3::X, &material);
        list.point(Mat4::IDENTITY, Vec3::Y, [1.0, 1.0, 1.0, 0.8]);

        assert_eq!(list.lines.len(), 2);
        assert_eq!(list.points.len(), 1);
        assert_eq!(list.vertex_count(), 3);
        assert_eq!(list.lines[1].position, [1.0, 0.0, 0.0]);
        assert_eq!(list.lines[0].normal, [0.0; 3]);
        assert_eq!(list.lines[0].color[3], 0.7);
    }
}
