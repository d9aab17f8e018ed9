pub mod emit;
pub mod primitive;
pub mod select;

pub use emit::{ControlPointError, LduConverter, control_points, emit_edge, emit_face};
pub use primitive::{EDGE_COLOR, MAIN_COLOR, Primitive};
pub use select::{EdgeKind, Selection, select, select_from};
