use std::f32::consts::{PI, TAU};

use nalgebra::{Point2, Point3, Vector3};

/// Geometry for a triangle mesh, ready to be uploaded to the GPU.
///
/// Nothing in here knows about the rendering backend; `gui::assets` does the
/// conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshBuffer {
    pub positions: Vec<Point3<f32>>,
    pub normals: Vec<Vector3<f32>>,
    pub uvs: Vec<Point2<f32>>,
    pub indices: Vec<[u32; 3]>,
}

impl MeshBuffer {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of entries in the flattened index list (three per triangle).
    pub fn index_count(&self) -> usize {
        3 * self.indices.len()
    }
}

/// Builds a UV sphere centered on the origin, with +y as the polar axis.
///
/// The lattice has `(latitude_bands + 1) * (longitude_bands + 1)` vertices. The
/// first and last row collapse onto the poles, and the first and last column
/// coincide along the seam; that's what lets the texture wrap all the way around.
/// Triangles wind counter-clockwise when seen from outside the sphere.
pub fn generate_sphere(radius: f32, latitude_bands: u32, longitude_bands: u32) -> MeshBuffer {
    assert!(
        latitude_bands >= 1 && longitude_bands >= 1,
        "Sphere needs at least one band each way, got {}x{}",
        latitude_bands,
        longitude_bands
    );
    assert!(radius > 0.0, "Sphere radius must be positive, was {}", radius);

    let num_vertices = ((latitude_bands + 1) * (longitude_bands + 1)) as usize;
    let mut positions = Vec::with_capacity(num_vertices);
    let mut normals = Vec::with_capacity(num_vertices);
    let mut uvs = Vec::with_capacity(num_vertices);

    for lat in 0..=latitude_bands {
        let theta = lat as f32 * PI / latitude_bands as f32;
        let (sin_theta, cos_theta) = theta.sin_cos();

        for lon in 0..=longitude_bands {
            let phi = lon as f32 * TAU / longitude_bands as f32;
            let (sin_phi, cos_phi) = phi.sin_cos();

            let normal = Vector3::new(sin_theta * cos_phi, cos_theta, sin_theta * sin_phi);
            positions.push(Point3::from(normal * radius));
            normals.push(normal);
            uvs.push(Point2::new(
                lon as f32 / longitude_bands as f32,
                lat as f32 / latitude_bands as f32,
            ));
        }
    }

    let row_length = longitude_bands + 1;
    let mut indices = Vec::with_capacity((latitude_bands * longitude_bands * 2) as usize);
    for lat in 0..latitude_bands {
        for lon in 0..longitude_bands {
            // `first` is the upper-left corner of the cell, `second` the one below it
            let first = lat * row_length + lon;
            let second = first + row_length;

            indices.push([first, first + 1, second]);
            indices.push([second, first + 1, second + 1]);
        }
    }

    MeshBuffer {
        positions,
        normals,
        uvs,
        indices,
    }
}

/// Samples a circle of the given radius in the y = 0 plane, meant to be drawn as
/// a line strip. Returns `segments + 1` points; the last one is exactly the first.
pub fn generate_orbit_ring(radius: f32, segments: u32) -> Vec<Point3<f32>> {
    assert!(
        segments >= 1,
        "Must have at least one segment, segments was {}",
        segments
    );

    (0..=segments)
        // Wrap the final index back to zero so the loop closes without rounding error
        .map(|i| TAU * (i % segments) as f32 / segments as f32)
        .map(|angle| Point3::new(radius * angle.cos(), 0.0, radius * angle.sin()))
        .collect()
}

/// Builds a flat annulus in the y = 0 plane, for planetary rings.
///
/// Vertices alternate inner edge / outer edge around the circle, so there are
/// `2 * (segments + 1)` of them. Normals point along +y; the ring is meant to be
/// drawn with backface culling off.
pub fn generate_ring_disk(inner_radius: f32, outer_radius: f32, segments: u32) -> MeshBuffer {
    assert!(
        segments >= 1,
        "Must have at least one segment, segments was {}",
        segments
    );
    assert!(
        0.0 <= inner_radius && inner_radius < outer_radius,
        "Ring radii must satisfy 0 <= inner < outer, got {} and {}",
        inner_radius,
        outer_radius
    );

    let mut positions = Vec::with_capacity(2 * (segments as usize + 1));
    let mut uvs = Vec::with_capacity(positions.capacity());
    for i in 0..=segments {
        let u = i as f32 / segments as f32;
        let (sin, cos) = (TAU * (i % segments) as f32 / segments as f32).sin_cos();

        positions.push(Point3::new(inner_radius * cos, 0.0, inner_radius * sin));
        uvs.push(Point2::new(u, 0.0));
        positions.push(Point3::new(outer_radius * cos, 0.0, outer_radius * sin));
        uvs.push(Point2::new(u, 1.0));
    }

    let mut indices = Vec::with_capacity(2 * segments as usize);
    for i in 0..segments {
        let inner = 2 * i;
        let outer = inner + 1;
        let next_inner = inner + 2;
        let next_outer = inner + 3;

        // Counter-clockwise seen from +y
        indices.push([inner, next_inner, outer]);
        indices.push([outer, next_inner, next_outer]);
    }

    MeshBuffer {
        normals: vec![Vector3::y(); positions.len()],
        positions,
        uvs,
        indices,
    }
}
