use anyhow::{Context, Result, bail};
use brickdat_scene::{Point3, Scene, SceneBuilder};
use brickdat_topology::Solid;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::debug;
use truck_meshalgo::prelude::*;
use truck_polymesh::{PolygonMesh, StandardVertex, obj};

use crate::config::ImportOptions;

/// Chord tolerance for solids modelled in millimetres at brick scale.
pub const DEFAULT_TESSELLATION_TOLERANCE: f64 = 0.05;

pub fn triangulate_solid(solid: &Solid, tol: f64) -> PolygonMesh {
    let mut mesh = solid.triangulation(tol).to_polygon();
    mesh.put_together_same_attrs(truck_base::tolerance::TOLERANCE);
    mesh.remove_unused_attrs();
    mesh
}

/// Builds a scene with one face per mesh polygon, welding shared edges and
/// softening those flatter than the crease angle.
///
/// Faces are added grouped by arity: every triangle, then every quad, then
/// the remaining polygons, each group in mesh order. `PolygonMesh` stores
/// the three kinds separately, so a file that interleaves quads and
/// triangles is not reproduced in file order. The result is still
/// deterministic for a given mesh.
pub fn scene_from_mesh(mesh: &PolygonMesh, options: &ImportOptions) -> Result<Scene> {
    let positions = mesh.positions();
    let mut builder = SceneBuilder::new(options.units);

    for tri in mesh.tri_faces() {
        builder.add_face(face_points(positions, tri)?);
    }
    for quad in mesh.quad_faces() {
        builder.add_face(face_points(positions, quad)?);
    }
    for face in mesh.faces().other_faces() {
        builder.add_face(face_points(positions, face)?);
    }

    let softened = builder
        .soften_by_angle(options.crease_angle)
        .context("soften imported edges")?;
    let scene = builder.build();
    debug!(
        faces = scene.faces().len(),
        edges = scene.edges().len(),
        softened,
        "mesh converted to scene"
    );
    Ok(scene)
}

pub fn scene_from_solid(solid: &Solid, tol: f64, options: &ImportOptions) -> Result<Scene> {
    let mesh = triangulate_solid(solid, tol);
    if mesh.positions().is_empty() {
        bail!("triangulation produced empty mesh");
    }
    scene_from_mesh(&mesh, options)
}

pub fn import_obj(path: impl AsRef<Path>, options: &ImportOptions) -> Result<Scene> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("open OBJ file {}", path.display()))?;
    let mesh = obj::read(BufReader::new(file))
        .with_context(|| format!("read OBJ file {}", path.display()))?;
    if mesh.positions().is_empty() {
        bail!("OBJ file {} contains no vertices", path.display());
    }
    scene_from_mesh(&mesh, options)
}

fn face_points(positions: &[Point3], face: &[StandardVertex]) -> Result<Vec<Point3>> {
    face.iter()
        .map(|vertex| {
            positions
                .get(vertex.pos)
                .copied()
                .with_context(|| format!("vertex index {} out of range", vertex.pos))
        })
        .collect()
}
