use brickdat_scene::{Edge, EdgeId, Entity, Face, FaceId, Scene};
use tracing::{debug, warn};

/// How an edge is exported, decided from its soft/smooth flags alone.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum EdgeKind {
    /// Neither flag set: a plain `2` line.
    Regular,
    /// Both flags set: a `5` conditional line.
    Conditional,
    /// Exactly one flag set: not exported.
    Excluded,
}

impl EdgeKind {
    pub const fn classify(soft: bool, smooth: bool) -> Self {
        match (soft, smooth) {
            (false, false) => Self::Regular,
            (true, true) => Self::Conditional,
            _ => Self::Excluded,
        }
    }

    pub fn of(edge: &Edge) -> Self {
        Self::classify(edge.is_soft(), edge.is_smooth())
    }
}

/// Faces and exportable edges in host order.
#[derive(Debug, Default)]
pub struct Selection<'a> {
    pub faces: Vec<(FaceId, &'a Face)>,
    pub edges: Vec<(EdgeId, &'a Edge, EdgeKind)>,
    /// Edges dropped because exactly one of soft/smooth was set.
    pub excluded: usize,
    /// Groups and unknown entities, which are never descended into.
    pub ignored: usize,
}

impl Selection<'_> {
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty() && self.edges.is_empty()
    }
}

/// Selects from the scene selection, or from every top-level entity when nothing is selected.
pub fn select(scene: &Scene) -> Selection<'_> {
    let input = if scene.selection().is_empty() {
        scene.entities()
    } else {
        scene.selection()
    };
    select_from(scene, input)
}

pub fn select_from<'a>(scene: &'a Scene, entities: &[Entity]) -> Selection<'a> {
    let mut selection = Selection::default();
    for &entity in entities {
        match entity {
            Entity::Face(id) => match scene.face(id) {
                Some(face) => selection.faces.push((id, face)),
                None => skip_unknown(&mut selection, entity),
            },
            Entity::Edge(id) => match scene.edge(id) {
                Some(edge) => match EdgeKind::of(edge) {
                    EdgeKind::Excluded => {
                        debug!(
                            edge = id.index(),
                            soft = edge.is_soft(),
                            smooth = edge.is_smooth(),
                            "edge excluded by soft/smooth flags"
                        );
                        selection.excluded += 1;
                    }
                    kind => selection.edges.push((id, edge, kind)),
                },
                None => skip_unknown(&mut selection, entity),
            },
            Entity::Group(id) => match scene.group(id) {
                Some(group) => {
                    debug!(
                        group = id.index(),
                        name = group.name(),
                        faces = group.contents().faces().len(),
                        "group contents are not exported"
                    );
                    selection.ignored += 1;
                }
                None => skip_unknown(&mut selection, entity),
            },
        }
    }
    selection
}

fn skip_unknown(selection: &mut Selection<'_>, entity: Entity) {
    warn!(%entity, "entity is not part of the scene");
    selection.ignored += 1;
}
