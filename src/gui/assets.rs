use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use image::{DynamicImage, GenericImageView};
use kiss3d::resource::Mesh;
use nalgebra::{Point2, Point3, Vector3};

use crate::config::{AssetConfig, GeometryConfig};
use crate::error::AssetError;
use crate::math::mesh::{generate_orbit_ring, generate_ring_disk, generate_sphere, MeshBuffer};
use crate::model::{BodyID, BodyRegistry, CelestialBody};

/// Everything that has to be uploaded before the first frame. Built once at
/// startup; the scene nodes hold on to the meshes, and dropping this releases
/// our handles.
pub struct SceneAssets {
    pub sun_mesh: Rc<RefCell<Mesh>>,
    pub planet_mesh: Rc<RefCell<Mesh>>,
    pub ring_meshes: HashMap<BodyID, Rc<RefCell<Mesh>>>,
    pub orbit_paths: Vec<(BodyID, Vec<Point3<f32>>)>,
    /// Decoded up front, so a bad image fails startup instead of the first frame.
    pub textures: HashMap<BodyID, DynamicImage>,
}

impl SceneAssets {
    pub fn load(
        registry: &BodyRegistry,
        geometry: &GeometryConfig,
        assets: &AssetConfig,
    ) -> Result<Self, AssetError> {
        let sun = generate_sphere(1.0, geometry.sun_bands, geometry.sun_bands);
        let planet = generate_sphere(1.0, geometry.planet_bands, geometry.planet_bands);
        let sun_mesh = upload_mesh("sun", &sun)?;
        let planet_mesh = upload_mesh("planet", &planet)?;

        let mut ring_meshes = HashMap::new();
        for body in registry.bodies() {
            if let Some(ring) = &body.ring {
                let disk = generate_ring_disk(
                    ring.inner_radius,
                    ring.outer_radius,
                    geometry.ring_segments,
                );
                ring_meshes.insert(body.id, upload_mesh(&body.name, &disk)?);
            }
        }

        let orbit_paths = registry
            .planets()
            .map(|body| {
                let points = generate_orbit_ring(body.orbit_radius as f32, geometry.orbit_segments);
                (body.id, points)
            })
            .collect();

        let mut textures = HashMap::new();
        if let Some(dir) = &assets.texture_dir {
            for body in registry.bodies() {
                if let Some(path) = resolve_texture(dir, body)? {
                    textures.insert(body.id, decode_texture(&path)?);
                }
            }
        }

        tracing::info!(
            sun_vertices = sun.vertex_count(),
            planet_vertices = planet.vertex_count(),
            rings = ring_meshes.len(),
            textures = textures.len(),
            "scene assets ready"
        );

        Ok(SceneAssets {
            sun_mesh,
            planet_mesh,
            ring_meshes,
            orbit_paths,
            textures,
        })
    }
}

/// Where the body's texture lives, if it has one. A body that names a texture
/// which isn't there is an error; we don't fall back to flat colors.
pub fn resolve_texture(dir: &Path, body: &CelestialBody) -> Result<Option<PathBuf>, AssetError> {
    let name = match &body.texture {
        Some(name) => name,
        None => return Ok(None),
    };
    let path = dir.join(name);
    if !path.is_file() {
        return Err(AssetError::MissingTexture(path));
    }
    Ok(Some(path))
}

pub fn decode_texture(path: &Path) -> Result<DynamicImage, AssetError> {
    let image = image::open(path).map_err(|source| AssetError::InvalidTexture {
        path: path.to_owned(),
        source,
    })?;
    tracing::debug!(
        path = %path.display(),
        width = image.width(),
        height = image.height(),
        "decoded texture"
    );
    Ok(image)
}

type MeshParts = (
    Vec<Point3<f32>>,
    Vec<Point3<u16>>,
    Vec<Vector3<f32>>,
    Vec<Point2<f32>>,
);

/// Rearranges a mesh into the pieces kiss3d wants. kiss3d indexes with u16, so
/// big meshes get rejected here rather than silently wrapping.
pub fn mesh_parts(name: &str, buffer: &MeshBuffer) -> Result<MeshParts, AssetError> {
    let too_large = || AssetError::MeshTooLarge {
        name: name.to_owned(),
        vertices: buffer.vertex_count(),
    };
    if buffer.vertex_count() > u16::MAX as usize + 1 {
        return Err(too_large());
    }

    let faces = buffer
        .indices
        .iter()
        .map(|tri| -> Result<Point3<u16>, AssetError> {
            let [a, b, c] = tri.map(|i| u16::try_from(i).map_err(|_| too_large()));
            Ok(Point3::new(a?, b?, c?))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok((
        buffer.positions.clone(),
        faces,
        buffer.normals.clone(),
        buffer.uvs.clone(),
    ))
}

fn upload_mesh(name: &str, buffer: &MeshBuffer) -> Result<Rc<RefCell<Mesh>>, AssetError> {
    let (coords, faces, normals, uvs) = mesh_parts(name, buffer)?;
    let mesh = Mesh::new(coords, faces, Some(normals), Some(uvs), false);
    Ok(Rc::new(RefCell::new(mesh)))
}
