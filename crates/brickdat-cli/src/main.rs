use anyhow::{Context, Result, bail};
use brickdat_base::{LengthUnit, Units};
use brickdat_io::{
    DEFAULT_TESSELLATION_TOLERANCE, ExportConfig, ExportSummary, export_ldraw, import_obj,
    load_config, scene_from_solid,
};
use brickdat_scene::{Entity, Scene};
use brickdat_topology::{Solid, SolidBuilder};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;

const UNTITLED: &str = "untitled.dat";

#[derive(Parser)]
#[command(name = "brickdat")]
#[command(about = "Export polygon meshes to LDraw part files")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Export an OBJ mesh to an LDraw .dat file
    Export(ExportArgs),
    /// Build demo geometry and export it to LDraw
    Generate {
        #[command(subcommand)]
        command: GenerateCommand,
    },
}

#[derive(Subcommand)]
enum GenerateCommand {
    Box(BoxArgs),
    Brick(BrickArgs),
    Stud(StudArgs),
}

#[derive(Args)]
struct OutputArgs {
    #[arg(long)]
    out: Option<PathBuf>,
    /// Largest angle, in degrees, at which an edge becomes a conditional line
    #[arg(long)]
    crease: Option<f64>,
    #[arg(long)]
    title: Option<String>,
    /// JSON file with `import` and `export` sections; flags override it
    #[arg(long)]
    config: Option<PathBuf>,
    /// Print the export summary as JSON
    #[arg(long)]
    summary: bool,
}

#[derive(Args)]
struct ExportArgs {
    #[arg(long = "in")]
    input: PathBuf,
    /// Length unit of the mesh coordinates (in, ft, mm, cm, m)
    #[arg(long)]
    unit: Option<LengthUnit>,
    /// Top-level entity indices to export instead of the whole mesh
    #[arg(long, value_delimiter = ',')]
    select: Vec<usize>,
    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Args)]
struct BoxArgs {
    /// Width, height and depth in millimetres
    #[arg(long)]
    size: String,
    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Args)]
struct BrickArgs {
    #[arg(long, default_value_t = 1)]
    columns: u32,
    #[arg(long, default_value_t = 1)]
    rows: u32,
    #[arg(long, default_value_t = 3)]
    plates: u32,
    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Args)]
struct StudArgs {
    #[command(flatten)]
    output: OutputArgs,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Export(args) => export(args),
        Command::Generate {
            command: GenerateCommand::Box(args),
        } => {
            let (width, height, depth) = parse_size(&args.size)?;
            let solid = SolidBuilder::box_solid(width, height, depth)
                .context("failed to build box solid")?;
            export_solid(&solid, args.output)
        }
        Command::Generate {
            command: GenerateCommand::Brick(args),
        } => {
            let solid = SolidBuilder::brick_body(args.columns, args.rows, args.plates)
                .context("failed to build brick body")?;
            export_solid(&solid, args.output)
        }
        Command::Generate {
            command: GenerateCommand::Stud(args),
        } => {
            let solid = SolidBuilder::stud().context("failed to build stud")?;
            export_solid(&solid, args.output)
        }
    }
}

fn export(args: ExportArgs) -> Result<()> {
    let mut config = resolve_config(&args.output)?;
    if let Some(unit) = args.unit {
        config.import.units.length = unit;
    }

    let mut scene = import_obj(&args.input, &config.import)?;
    if !args.select.is_empty() {
        select_indices(&mut scene, &args.select)?;
    }

    let out = output_path(args.output.out.as_deref(), Some(&args.input));
    let summary = export_ldraw(&scene, &out, &config.export).context("LDraw export failed")?;
    report(&out, &summary, args.output.summary)
}

fn export_solid(solid: &Solid, output: OutputArgs) -> Result<()> {
    let mut config = resolve_config(&output)?;
    config.import.units = Units::metric_mm();

    let scene = scene_from_solid(solid, DEFAULT_TESSELLATION_TOLERANCE, &config.import)?;
    let out = output_path(output.out.as_deref(), None);
    let summary = export_ldraw(&scene, &out, &config.export).context("LDraw export failed")?;
    report(&out, &summary, output.summary)
}

fn resolve_config(output: &OutputArgs) -> Result<ExportConfig> {
    let mut config = match &output.config {
        Some(path) => load_config(path)?,
        None => ExportConfig::default(),
    };
    if let Some(crease) = output.crease {
        config.import.crease_angle = crease;
    }
    if let Some(title) = &output.title {
        config.export.title = Some(title.clone());
    }
    Ok(config)
}

fn select_indices(scene: &mut Scene, indices: &[usize]) -> Result<()> {
    let entities: Vec<Entity> = indices
        .iter()
        .map(|&index| {
            scene.entities().get(index).copied().with_context(|| {
                format!(
                    "--select index {index} is out of range ({} entities)",
                    scene.entities().len()
                )
            })
        })
        .collect::<Result<_>>()?;
    scene.set_selection(entities)?;
    Ok(())
}

fn output_path(out: Option<&Path>, input: Option<&Path>) -> PathBuf {
    match (out, input) {
        (Some(out), _) => out.to_path_buf(),
        (None, Some(input)) => input.with_extension("dat"),
        (None, None) => PathBuf::from(UNTITLED),
    }
}

fn report(out: &Path, summary: &ExportSummary, as_json: bool) -> Result<()> {
    if summary.unsupported_faces + summary.malformed_edges > 0 {
        info!(
            unsupported_faces = summary.unsupported_faces,
            malformed_edges = summary.malformed_edges,
            "some primitives were written as comments"
        );
    }
    if summary.excluded_edges > 0 {
        info!(
            excluded_edges = summary.excluded_edges,
            "edges with only one of soft/smooth set were skipped"
        );
    }
    if as_json {
        println!("{}", serde_json::to_string_pretty(summary)?);
    }
    info!(path = %out.display(), "LDraw file written");
    Ok(())
}

fn parse_size(text: &str) -> Result<(f64, f64, f64)> {
    let parts: Vec<&str> = text.split(',').collect();
    if parts.len() != 3 {
        bail!("--size expects three comma-separated numbers, e.g. 8,9.6,8");
    }

    let width: f64 = parts[0].trim().parse().context("invalid width")?;
    let height: f64 = parts[1].trim().parse().context("invalid height")?;
    let depth: f64 = parts[2].trim().parse().context("invalid depth")?;
    Ok((width, height, depth))
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
