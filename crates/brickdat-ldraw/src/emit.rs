//! Face and edge emission.
//!
//! Emission is pure: each call maps one scene primitive to one [`Primitive`]
//! and never touches the output stream. Coordinates are converted from the
//! host length unit to millimetres and then to LDU (x 2.5). Axes are passed
//! through unchanged.

use brickdat_base::{LengthUnit, Tolerance};
use brickdat_scene::{Edge, Face, FaceId, Point3, Scene, Vector3};
use cgmath::InnerSpace;
use thiserror::Error;

use crate::primitive::Primitive;
use crate::select::EdgeKind;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LduConverter {
    unit: LengthUnit,
}

impl LduConverter {
    pub const fn new(unit: LengthUnit) -> Self {
        Self { unit }
    }

    pub fn for_scene(scene: &Scene) -> Self {
        Self::new(scene.length_unit())
    }

    pub fn value(&self, value: f64) -> f64 {
        self.unit.to_ldu(value)
    }

    pub fn point(&self, point: Point3) -> Point3 {
        Point3::new(self.value(point.x), self.value(point.y), self.value(point.z))
    }
}

/// Why a conditional edge has no control points.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ControlPointError {
    #[error("{count} adjacent faces, expected 2")]
    AdjacentFaces { count: usize },
    #[error("face #{} has no vertex off the edge", .face.index())]
    NoCandidate { face: FaceId },
    #[error("adjacent face #{} is not part of the scene", .face.index())]
    UnknownFace { face: FaceId },
}

pub fn emit_face(face: &Face, converter: &LduConverter) -> Primitive {
    let vertices = face.vertices();
    match *vertices.as_slice() {
        [a, b, c] => Primitive::Triangle([a, b, c].map(|p| converter.point(p))),
        [a, b, c, d] => Primitive::Quad([a, b, c, d].map(|p| converter.point(p))),
        _ if vertices.len() > 4 => {
            Primitive::comment(format!("Too many vertices: {}", vertices.len()))
        }
        _ => Primitive::comment(format!("Too few vertices: {}", vertices.len())),
    }
}

/// Emits an edge as a line, a conditional line, or a diagnostic comment when
/// its control points cannot be derived. Excluded edges yield `None`.
pub fn emit_edge(
    scene: &Scene,
    edge: &Edge,
    kind: EdgeKind,
    converter: &LduConverter,
    tolerance: &Tolerance,
) -> Option<Primitive> {
    let line = [converter.point(edge.start()), converter.point(edge.end())];
    match kind {
        EdgeKind::Excluded => None,
        EdgeKind::Regular => Some(Primitive::Line(line)),
        EdgeKind::Conditional => Some(match control_points(scene, edge, tolerance) {
            Ok(controls) => Primitive::OptionalLine {
                line,
                controls: controls.map(|p| converter.point(p)),
            },
            Err(err) => Primitive::comment(format!("Conditional edge skipped: {err}")),
        }),
    }
}

/// Picks one control point from each of the edge's two adjacent faces, in
/// adjacency order.
///
/// A face's candidates are its vertices that do not coincide with either
/// endpoint. The first candidate off the edge's supporting line wins, which
/// on a triangle is simply the opposite vertex.
pub fn control_points(
    scene: &Scene,
    edge: &Edge,
    tolerance: &Tolerance,
) -> Result<[Point3; 2], ControlPointError> {
    let [first, second] = edge.faces() else {
        return Err(ControlPointError::AdjacentFaces {
            count: edge.faces().len(),
        });
    };
    Ok([
        control_point(scene, *first, edge, tolerance)?,
        control_point(scene, *second, edge, tolerance)?,
    ])
}

fn control_point(
    scene: &Scene,
    id: FaceId,
    edge: &Edge,
    tolerance: &Tolerance,
) -> Result<Point3, ControlPointError> {
    let face = scene
        .face(id)
        .ok_or(ControlPointError::UnknownFace { face: id })?;
    let (start, end) = (edge.start(), edge.end());
    let axis = end - start;

    face.vertices()
        .into_iter()
        .filter(|&p| (p - start).magnitude() > tolerance.linear)
        .filter(|&p| (p - end).magnitude() > tolerance.linear)
        .find(|&p| distance_to_line(p, start, axis) > tolerance.linear)
        .ok_or(ControlPointError::NoCandidate { face: id })
}

fn distance_to_line(point: Point3, origin: Point3, axis: Vector3) -> f64 {
    let offset = point - origin;
    let len = axis.magnitude();
    if len <= f64::EPSILON {
        return offset.magnitude();
    }
    axis.cross(offset).magnitude() / len
}
