//! In-memory host scene: the faces, edges and opaque groups an export reads from.
//!
//! Every container is an ordered `Vec`. Top-level entities and the selection
//! iterate in insertion order, and the exporter relies on that order to keep
//! generated files diffable.

mod builder;

use brickdat_base::{LengthUnit, Units};
use cgmath::InnerSpace;
use thiserror::Error;

pub use builder::SceneBuilder;

pub type Point3 = cgmath::Point3<f64>;
pub type Vector3 = cgmath::Vector3<f64>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("unknown entity: {0}")]
    UnknownEntity(Entity),
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct FaceId(usize);

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct EdgeId(usize);

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct GroupId(usize);

impl FaceId {
    pub const fn index(self) -> usize {
        self.0
    }
}

impl EdgeId {
    pub const fn index(self) -> usize {
        self.0
    }
}

impl GroupId {
    pub const fn index(self) -> usize {
        self.0
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Entity {
    Face(FaceId),
    Edge(EdgeId),
    Group(GroupId),
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Face(id) => write!(f, "face #{}", id.0),
            Self::Edge(id) => write!(f, "edge #{}", id.0),
            Self::Group(id) => write!(f, "group #{}", id.0),
        }
    }
}

/// A polygon given as one or more vertex loops, outer boundary first.
#[derive(Clone, Debug, PartialEq)]
pub struct Face {
    loops: Vec<Vec<Point3>>,
}

impl Face {
    pub fn new(outer: Vec<Point3>) -> Self {
        Self {
            loops: vec![outer],
        }
    }

    pub fn with_holes(outer: Vec<Point3>, holes: Vec<Vec<Point3>>) -> Self {
        let mut loops = Vec::with_capacity(holes.len() + 1);
        loops.push(outer);
        loops.extend(holes);
        Self { loops }
    }

    pub fn loops(&self) -> &[Vec<Point3>] {
        &self.loops
    }

    /// All loops flattened into one list, keeping the first occurrence of each position.
    pub fn vertices(&self) -> Vec<Point3> {
        let mut vertices: Vec<Point3> = Vec::new();
        for point in self.loops.iter().flatten() {
            if !vertices.contains(point) {
                vertices.push(*point);
            }
        }
        vertices
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices().len()
    }

    /// Unit normal of the outer loop (Newell's method), `None` when degenerate.
    pub fn normal(&self) -> Option<Vector3> {
        let outer = self.loops.first()?;
        let mut normal = Vector3::new(0.0, 0.0, 0.0);
        for (i, current) in outer.iter().enumerate() {
            let next = outer[(i + 1) % outer.len()];
            normal.x += (current.y - next.y) * (current.z + next.z);
            normal.y += (current.z - next.z) * (current.x + next.x);
            normal.z += (current.x - next.x) * (current.y + next.y);
        }
        let len = normal.magnitude();
        if len <= 1.0e-12 {
            None
        } else {
            Some(normal / len)
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Edge {
    start: Point3,
    end: Point3,
    soft: bool,
    smooth: bool,
    faces: Vec<FaceId>,
}

impl Edge {
    pub fn new(start: Point3, end: Point3) -> Self {
        Self {
            start,
            end,
            soft: false,
            smooth: false,
            faces: Vec::new(),
        }
    }

    pub fn start(&self) -> Point3 {
        self.start
    }

    pub fn end(&self) -> Point3 {
        self.end
    }

    pub fn is_soft(&self) -> bool {
        self.soft
    }

    pub fn is_smooth(&self) -> bool {
        self.smooth
    }

    /// Adjacent faces, in the order they were attached to this edge.
    pub fn faces(&self) -> &[FaceId] {
        &self.faces
    }
}

/// An opaque group or component. Its contents are kept but never exported.
#[derive(Clone, Debug)]
pub struct Group {
    name: String,
    contents: Scene,
}

impl Group {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn contents(&self) -> &Scene {
        &self.contents
    }
}

#[derive(Clone, Debug, Default)]
pub struct Scene {
    units: Units,
    faces: Vec<Face>,
    edges: Vec<Edge>,
    groups: Vec<Group>,
    entities: Vec<Entity>,
    selection: Vec<Entity>,
}

impl Scene {
    pub fn units(&self) -> Units {
        self.units
    }

    pub fn length_unit(&self) -> LengthUnit {
        self.units.length
    }

    pub fn face(&self, id: FaceId) -> Option<&Face> {
        self.faces.get(id.0)
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id.0)
    }

    pub fn group(&self, id: GroupId) -> Option<&Group> {
        self.groups.get(id.0)
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Top-level entities in insertion order.
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Selected entities in selection order; empty when nothing is selected.
    pub fn selection(&self) -> &[Entity] {
        &self.selection
    }

    pub fn contains(&self, entity: Entity) -> bool {
        match entity {
            Entity::Face(id) => id.0 < self.faces.len(),
            Entity::Edge(id) => id.0 < self.edges.len(),
            Entity::Group(id) => id.0 < self.groups.len(),
        }
    }

    /// Replaces the selection. Duplicates are dropped, first occurrence wins.
    pub fn set_selection(&mut self, entities: impl IntoIterator<Item = Entity>) -> Result<()> {
        let mut selection = Vec::new();
        for entity in entities {
            if !self.contains(entity) {
                return Err(Error::UnknownEntity(entity));
            }
            if !selection.contains(&entity) {
                selection.push(entity);
            }
        }
        self.selection = selection;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    #[test]
    fn flatten_keeps_first_occurrence() {
        let face = Face::with_holes(
            vec![p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(1.0, 1.0, 0.0)],
            vec![vec![p(1.0, 0.0, 0.0), p(0.5, 0.2, 0.0)]],
        );
        assert_eq!(
            face.vertices(),
            vec![
                p(0.0, 0.0, 0.0),
                p(1.0, 0.0, 0.0),
                p(1.0, 1.0, 0.0),
                p(0.5, 0.2, 0.0)
            ]
        );
        assert_eq!(face.vertex_count(), 4);
    }

    #[test]
    fn normal_follows_winding() {
        let ccw = Face::new(vec![p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(0.0, 1.0, 0.0)]);
        let normal = ccw.normal().unwrap_or_else(|| panic!("triangle has a normal"));
        assert!((normal.z - 1.0).abs() < 1.0e-12);

        let line = Face::new(vec![p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(2.0, 0.0, 0.0)]);
        assert!(line.normal().is_none());
        assert!(Face::new(Vec::new()).normal().is_none());
    }

    #[test]
    fn selection_rejects_unknown_entities() {
        let mut scene = Scene::default();
        let err = scene.set_selection([Entity::Face(FaceId(3))]);
        assert!(matches!(err, Err(Error::UnknownEntity(Entity::Face(_)))));
        assert!(scene.selection().is_empty());
    }
}
