use anyhow::{Context, Result};
use brickdat_ldraw::{LduConverter, Primitive, emit_edge, emit_face, select};
use brickdat_scene::Scene;
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tracing::{debug, info, warn};

use crate::config::ExportOptions;

pub const FACES_MARKER: &str = "Faces";
pub const EDGES_MARKER: &str = "Edges";

/// Counts of what one export wrote or skipped.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ExportSummary {
    pub triangles: usize,
    pub quads: usize,
    pub unsupported_faces: usize,
    pub lines: usize,
    pub conditional_lines: usize,
    pub malformed_edges: usize,
    pub excluded_edges: usize,
    pub ignored_entities: usize,
}

impl ExportSummary {
    pub fn faces(&self) -> usize {
        self.triangles + self.quads + self.unsupported_faces
    }

    pub fn edges(&self) -> usize {
        self.lines + self.conditional_lines + self.malformed_edges
    }
}

/// Exports the scene to an LDraw file, creating missing parent directories.
///
/// A title without an explicit name gets the destination's file name in the
/// `0 Name:` header.
pub fn export_ldraw(
    scene: &Scene,
    path: impl AsRef<Path>,
    options: &ExportOptions,
) -> Result<ExportSummary> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output directory {}", parent.display()))?;
    }

    let mut options = options.clone();
    if options.title.is_some() && options.name.is_none() {
        options.name = path
            .file_name()
            .and_then(|name| name.to_str())
            .map(str::to_string);
    }

    let file =
        File::create(path).with_context(|| format!("create LDraw file {}", path.display()))?;
    let summary = write_buffered(scene, file, &options)
        .with_context(|| format!("write LDraw file {}", path.display()))?;
    info!(
        path = %path.display(),
        faces = summary.faces(),
        edges = summary.edges(),
        "LDraw export complete"
    );
    Ok(summary)
}

/// Writes through a [`BufWriter`] that is flushed whether or not emission
/// succeeds. The first error wins; `writer` is dropped exactly once on return.
pub fn write_buffered<W: Write>(
    scene: &Scene,
    writer: W,
    options: &ExportOptions,
) -> io::Result<ExportSummary> {
    let mut out = BufWriter::new(writer);
    let written = write_ldraw(scene, &mut out, options);
    let flushed = out.flush();
    let summary = written?;
    flushed?;
    Ok(summary)
}

/// Writes the optional header, then the face section, then the edge section.
pub fn write_ldraw<W: Write + ?Sized>(
    scene: &Scene,
    out: &mut W,
    options: &ExportOptions,
) -> io::Result<ExportSummary> {
    let selection = select(scene);
    let converter = LduConverter::for_scene(scene);
    let mut summary = ExportSummary {
        excluded_edges: selection.excluded,
        ignored_entities: selection.ignored,
        ..ExportSummary::default()
    };

    if let Some(title) = &options.title {
        writeln!(out, "0 {title}")?;
        if let Some(name) = &options.name {
            writeln!(out, "0 Name: {name}")?;
        }
    }

    writeln!(out, "{}", Primitive::comment(FACES_MARKER))?;
    for (id, face) in &selection.faces {
        let primitive = emit_face(face, &converter);
        match primitive {
            Primitive::Triangle(_) => summary.triangles += 1,
            Primitive::Quad(_) => summary.quads += 1,
            _ => {
                debug!(face = id.index(), %primitive, "face not exported as geometry");
                summary.unsupported_faces += 1;
            }
        }
        writeln!(out, "{primitive}")?;
    }

    writeln!(out, "{}", Primitive::comment(EDGES_MARKER))?;
    for (id, edge, kind) in &selection.edges {
        let Some(primitive) = emit_edge(scene, edge, *kind, &converter, &options.tolerance) else {
            continue;
        };
        match primitive {
            Primitive::Line(_) => summary.lines += 1,
            Primitive::OptionalLine { .. } => summary.conditional_lines += 1,
            _ => {
                warn!(edge = id.index(), %primitive, "conditional edge not exported");
                summary.malformed_edges += 1;
            }
        }
        writeln!(out, "{primitive}")?;
    }

    if summary.excluded_edges > 0 {
        debug!(
            count = summary.excluded_edges,
            "edges with only one of soft/smooth set were left out"
        );
    }
    Ok(summary)
}
