pub mod config;
pub mod ldraw;
pub mod mesh;

pub use config::{DEFAULT_CREASE_ANGLE, ExportConfig, ExportOptions, ImportOptions, load_config};
pub use ldraw::{ExportSummary, export_ldraw, write_buffered, write_ldraw};
pub use mesh::{
    DEFAULT_TESSELLATION_TOLERANCE, import_obj, scene_from_mesh, scene_from_solid,
    triangulate_solid,
};
