use anyhow::{Result, bail};
use brickdat_io::{ExportOptions, ImportOptions, export_ldraw, import_obj};

fn main() -> Result<()> {
    let Some(input) = std::env::args().nth(1) else {
        bail!("usage: obj_to_ldraw <model.obj>");
    };
    let scene = import_obj(&input, &ImportOptions::default())?;
    let summary = export_ldraw(&scene, "out/model.dat", &ExportOptions::default())?;
    println!(
        "{} faces, {} edges written to out/model.dat",
        summary.faces(),
        summary.edges()
    );
    Ok(())
}
