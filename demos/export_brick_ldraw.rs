use anyhow::Result;
use brickdat_base::Units;
use brickdat_io::{
    DEFAULT_TESSELLATION_TOLERANCE, ExportOptions, ImportOptions, export_ldraw, scene_from_solid,
};
use brickdat_topology::SolidBuilder;

fn main() -> Result<()> {
    let solid = SolidBuilder::brick_body(2, 4, 3)?;
    let import = ImportOptions {
        units: Units::metric_mm(),
        ..ImportOptions::default()
    };
    let scene = scene_from_solid(&solid, DEFAULT_TESSELLATION_TOLERANCE, &import)?;
    let export = ExportOptions {
        title: Some("Brick 2 x 4 body".to_string()),
        ..ExportOptions::default()
    };
    export_ldraw(&scene, "out/brick_2x4.dat", &export)?;
    Ok(())
}
