use std::collections::HashMap;

use brickdat_base::Units;
use cgmath::InnerSpace;
use tracing::debug;

use crate::{Edge, EdgeId, Entity, Error, Face, FaceId, Group, GroupId, Point3, Result, Scene};

type PositionKey = [u64; 3];

/// Assembles a [`Scene`] the way a host application would: faces weld onto
/// shared edges by exact position, and each new face or edge is appended to
/// the top-level entity list.
#[derive(Debug, Default)]
pub struct SceneBuilder {
    scene: Scene,
    edge_map: HashMap<(PositionKey, PositionKey), EdgeId>,
    // Per edge, whether each adjacent face walks it from start to end.
    windings: Vec<Vec<bool>>,
}

impl SceneBuilder {
    pub fn new(units: Units) -> Self {
        Self {
            scene: Scene {
                units,
                ..Scene::default()
            },
            ..Self::default()
        }
    }

    pub fn add_face(&mut self, outer: impl IntoIterator<Item = Point3>) -> FaceId {
        self.push_face(Face::new(outer.into_iter().collect()))
    }

    pub fn add_face_with_holes(
        &mut self,
        outer: impl IntoIterator<Item = Point3>,
        holes: Vec<Vec<Point3>>,
    ) -> FaceId {
        self.push_face(Face::with_holes(outer.into_iter().collect(), holes))
    }

    /// Adds a free-standing edge, or returns the existing edge between the same positions.
    pub fn add_edge(&mut self, start: Point3, end: Point3) -> EdgeId {
        self.edge_between(start, end).0
    }

    pub fn add_group(&mut self, name: impl Into<String>, contents: Scene) -> GroupId {
        let id = GroupId(self.scene.groups.len());
        self.scene.groups.push(Group {
            name: name.into(),
            contents,
        });
        self.scene.entities.push(Entity::Group(id));
        id
    }

    pub fn set_edge_flags(&mut self, id: EdgeId, soft: bool, smooth: bool) -> Result<()> {
        let edge = self
            .scene
            .edges
            .get_mut(id.0)
            .ok_or(Error::UnknownEntity(Entity::Edge(id)))?;
        edge.soft = soft;
        edge.smooth = smooth;
        Ok(())
    }

    /// Softens and smooths every edge between exactly two faces whose normals
    /// differ by less than `crease_degrees`. Other edges keep their flags.
    /// Returns the number of edges softened.
    pub fn soften_by_angle(&mut self, crease_degrees: f64) -> Result<usize> {
        if !crease_degrees.is_finite() || !(0.0..=180.0).contains(&crease_degrees) {
            return Err(Error::InvalidParameter(format!(
                "crease angle must be within 0..=180 degrees, got {crease_degrees}"
            )));
        }
        let cos_threshold = crease_degrees.to_radians().cos();

        let mut softened = 0;
        for (index, edge) in self.scene.edges.iter_mut().enumerate() {
            let [f0, f1] = edge.faces.as_slice() else {
                continue;
            };
            let (Some(n0), Some(n1)) = (
                self.scene.faces[f0.0].normal(),
                self.scene.faces[f1.0].normal(),
            ) else {
                continue;
            };
            // Consistently wound neighbours walk a shared edge in opposite directions.
            let winding = &self.windings[index];
            let n1 = if winding[0] == winding[1] { -n1 } else { n1 };
            if n0.dot(n1) > cos_threshold {
                edge.soft = true;
                edge.smooth = true;
                softened += 1;
            }
        }
        debug!(softened, crease_degrees, "softened edges by crease angle");
        Ok(softened)
    }

    pub fn select(&mut self, entities: impl IntoIterator<Item = Entity>) -> Result<()> {
        self.scene.set_selection(entities)
    }

    pub fn build(self) -> Scene {
        self.scene
    }

    fn push_face(&mut self, face: Face) -> FaceId {
        let id = FaceId(self.scene.faces.len());
        let mut boundary = Vec::new();
        for ring in face.loops() {
            if ring.len() < 2 {
                continue;
            }
            for (i, &start) in ring.iter().enumerate() {
                let end = ring[(i + 1) % ring.len()];
                if start != end {
                    boundary.push((start, end));
                }
            }
        }

        self.scene.faces.push(face);
        self.scene.entities.push(Entity::Face(id));

        for (start, end) in boundary {
            let (edge_id, forward) = self.edge_between(start, end);
            let edge = &mut self.scene.edges[edge_id.0];
            if !edge.faces.contains(&id) {
                edge.faces.push(id);
                self.windings[edge_id.0].push(forward);
            }
        }
        id
    }

    /// Returns the edge joining two positions and whether it runs from `start` to `end`.
    fn edge_between(&mut self, start: Point3, end: Point3) -> (EdgeId, bool) {
        let (a, b) = (position_key(start), position_key(end));
        let key = if a <= b { (a, b) } else { (b, a) };
        if let Some(&id) = self.edge_map.get(&key) {
            let forward = self.scene.edges[id.0].start == start;
            return (id, forward);
        }

        let id = EdgeId(self.scene.edges.len());
        self.scene.edges.push(Edge::new(start, end));
        self.scene.entities.push(Entity::Edge(id));
        self.windings.push(Vec::new());
        self.edge_map.insert(key, id);
        (id, true)
    }
}

fn position_key(point: Point3) -> PositionKey {
    // Adding zero folds -0.0 onto 0.0 so both weld together.
    [
        (point.x + 0.0).to_bits(),
        (point.y + 0.0).to_bits(),
        (point.z + 0.0).to_bits(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    #[test]
    fn shared_edges_are_welded() {
        let mut builder = SceneBuilder::new(Units::metric_mm());
        let a = builder.add_face([p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(0.0, 1.0, 0.0)]);
        let b = builder.add_face([p(1.0, 0.0, 0.0), p(1.0, 1.0, 0.0), p(0.0, 1.0, 0.0)]);
        let scene = builder.build();

        assert_eq!(scene.faces().len(), 2);
        assert_eq!(scene.edges().len(), 5);
        let shared: Vec<&Edge> = scene.edges().iter().filter(|e| e.faces().len() == 2).collect();
        assert_eq!(shared.len(), 1);
        assert_eq!(shared[0].faces(), &[a, b]);
        assert_eq!(scene.entities()[0], Entity::Face(a));
        assert_eq!(scene.entities().len(), 7);
    }

    #[test]
    fn coplanar_neighbours_are_softened() -> Result<()> {
        let mut builder = SceneBuilder::new(Units::metric_mm());
        builder.add_face([p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(0.0, 1.0, 0.0)]);
        builder.add_face([p(1.0, 0.0, 0.0), p(1.0, 1.0, 0.0), p(0.0, 1.0, 0.0)]);
        assert_eq!(builder.soften_by_angle(10.0)?, 1);

        let scene = builder.build();
        let soft: Vec<&Edge> = scene.edges().iter().filter(|e| e.is_soft()).collect();
        assert_eq!(soft.len(), 1);
        assert!(soft[0].is_smooth());
        assert_eq!(soft[0].faces().len(), 2);
        Ok(())
    }

    #[test]
    fn right_angle_stays_hard() -> Result<()> {
        let mut builder = SceneBuilder::new(Units::metric_mm());
        builder.add_face([p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(1.0, 1.0, 0.0), p(0.0, 1.0, 0.0)]);
        builder.add_face([p(0.0, 0.0, 0.0), p(0.0, 1.0, 0.0), p(0.0, 1.0, 1.0), p(0.0, 0.0, 1.0)]);
        assert_eq!(builder.soften_by_angle(30.0)?, 0);
        assert_eq!(builder.soften_by_angle(91.0)?, 1);
        assert!(builder.soften_by_angle(-1.0).is_err());
        Ok(())
    }

    #[test]
    fn flipped_neighbour_is_reoriented() -> Result<()> {
        let mut builder = SceneBuilder::new(Units::metric_mm());
        builder.add_face([p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(0.0, 1.0, 0.0)]);
        // Same plane, wound the same way along the shared edge.
        builder.add_face([p(1.0, 0.0, 0.0), p(0.0, 1.0, 0.0), p(1.0, 1.0, 0.0)]);
        assert_eq!(builder.soften_by_angle(5.0)?, 1);
        Ok(())
    }

    #[test]
    fn free_edges_are_reused_by_position() -> Result<()> {
        let mut builder = SceneBuilder::new(Units::default());
        let first = builder.add_edge(p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0));
        let again = builder.add_edge(p(1.0, 0.0, 0.0), p(-0.0, 0.0, 0.0));
        assert_eq!(first, again);
        builder.set_edge_flags(first, true, false)?;
        assert!(builder.set_edge_flags(EdgeId(9), true, true).is_err());

        let scene = builder.build();
        let edge = scene.edge(first).unwrap_or_else(|| panic!("edge exists"));
        assert!(edge.is_soft());
        assert!(!edge.is_smooth());
        assert!(edge.faces().is_empty());
        Ok(())
    }
}
