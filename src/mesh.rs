use std::f32::consts::PI;
use std::fmt;

use glam::Vec3;

pub type Tri = [u32; 3];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MeshError {
    PositionNotFinite { index: usize },
    NormalNotFinite { index: usize },
    NormalsLenMismatch { normals: usize, positions: usize },
    TriangleIndexOutOfBounds { tri: usize, index: u32, vertex_count: usize },
}

impl fmt::Display for MeshError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            MeshError::PositionNotFinite { index } => write!(f, "position {index} is not finite"),
            MeshError::NormalNotFinite { index } => write!(f, "normal {index} is not finite"),
            MeshError::NormalsLenMismatch { normals, positions } => {
                write!(f, "{normals} normals for {positions} positions")
            }
            MeshError::TriangleIndexOutOfBounds {
                tri,
                index,
                vertex_count,
            } => write!(
                f,
                "triangle {tri} references vertex {index} of {vertex_count}"
            ),
        }
    }
}

impl std::error::Error for MeshError {}

/// Indexed triangle mesh with per-vertex normals, counter-clockwise front faces
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub indices: Vec<Tri>,
}

impl Mesh {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len()
    }

    /// Flat plane in XY facing +Z, centred on the origin
    pub fn plane(width: f32, height: f32, segments_x: u32, segments_y: u32) -> Self {
        let sx = segments_x.max(1);
        let sy = segments_y.max(1);
        let mut mesh = Mesh::default();

        for iy in 0..=sy {
            let y = height * 0.5 - height * iy as f32 / sy as f32;
            for ix in 0..=sx {
                let x = -width * 0.5 + width * ix as f32 / sx as f32;
                mesh.positions.push(Vec3::new(x, y, 0.0));
                mesh.normals.push(Vec3::Z);
            }
        }

        let row = sx + 1;
        for iy in 0..sy {
            for ix in 0..sx {
                let a = iy * row + ix;
                let b = (iy + 1) * row + ix;
                let c = (iy + 1) * row + ix + 1;
                let d = iy * row + ix + 1;
                mesh.indices.push([a, b, d]);
                mesh.indices.push([b, c, d]);
            }
        }

        mesh
    }

    /// Axis-aligned box centred on the origin, one quad per face
    pub fn cuboid(width: f32, height: f32, depth: f32) -> Self {
        let h = Vec3::new(width, height, depth) * 0.5;
        // (normal, u axis, v axis) with u x v == normal
        let faces = [
            (Vec3::X, -Vec3::Z, Vec3::Y),
            (-Vec3::X, Vec3::Z, Vec3::Y),
            (Vec3::Y, Vec3::X, -Vec3::Z),
            (-Vec3::Y, Vec3::X, Vec3::Z),
            (Vec3::Z, Vec3::X, Vec3::Y),
            (-Vec3::Z, -Vec3::X, Vec3::Y),
        ];

        let mut mesh = Mesh::default();
        for (normal, u, v) in faces {
            let base = mesh.positions.len() as u32;
            for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
                mesh.positions.push((normal + u * su + v * sv) * h);
                mesh.normals.push(normal);
            }
            mesh.indices.push([base, base + 1, base + 2]);
            mesh.indices.push([base, base + 2, base + 3]);
        }
        mesh
    }

    /// Latitude/longitude sphere centred on the origin
    pub fn uv_sphere(radius: f32, width_segments: u32, height_segments: u32) -> Self {
        let ws = width_segments.max(3);
        let hs = height_segments.max(2);
        let mut mesh = Mesh::default();

        for iy in 0..=hs {
            let v = iy as f32 / hs as f32;
            let theta = v * PI;
            for ix in 0..=ws {
                let u = ix as f32 / ws as f32;
                let phi = u * 2.0 * PI;
                let normal = Vec3::new(
                    -phi.cos() * theta.sin(),
                    theta.cos(),
                    phi.sin() * theta.sin(),
                );
                mesh.positions.push(normal * radius);
                mesh.normals.push(normal);
            }
        }

        let row = ws + 1;
        for iy in 0..hs {
            for ix in 0..ws {
                let a = iy * row + ix + 1;
                let b = iy * row + ix;
                let c = (iy + 1) * row + ix;
                let d = (iy + 1) * row + ix + 1;
                if iy != 0 {
                    mesh.indices.push([a, b, d]);
                }
                if iy != hs - 1 {
                    mesh.indices.push([b, c, d]);
                }
            }
        }

        mesh
    }

    pub fn validate(&self) -> Result<(), MeshError> {
        if self.normals.len() != self.positions.len() {
            return Err(MeshError::NormalsLenMismatch {
                normals: self.normals.len(),
                positions: self.positions.len(),
            });
        }
        if let Some(index) = self.positions.iter().position(|p| !p.is_finite()) {
            return Err(MeshError::PositionNotFinite { index });
        }
        if let Some(index) = self.normals.iter().position(|n| !n.is_finite()) {
            return Err(MeshError::NormalNotFinite { index });
        }

        let vertex_count = self.positions.len();
        for (tri, indices) in self.indices.iter().enumerate() {
            if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertex_count) {
                return Err(MeshError::TriangleIndexOutOfBounds {
                    tri,
                    index,
                    vertex_count,
                });
            }
        }
        Ok(())
    }
}
