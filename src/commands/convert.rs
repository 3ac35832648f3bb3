//! The conversion run: one pass over the workouts directory.

use std::path::{Path, PathBuf};

use anyhow::Context;
use tempfile::Builder;
use thiserror::Error;

use crate::cli::Cli;
use crate::domain::models::{ConvertReport, FailedFile};
use crate::services::enumerate::workout_files;
use crate::services::output::print_one;
use crate::services::tcx::{extract_activity, TcxDocument};
use crate::services::transform::{EngineCommand, XsltEngine};

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("invalid workouts dir path: {}", .0.display())]
    InvalidWorkoutsDir(PathBuf),
    #[error("stylesheet not found: {}", .0.display())]
    StylesheetNotFound(PathBuf),
}

pub fn run(cli: &Cli) -> anyhow::Result<ConvertReport> {
    if !cli.dir.is_dir() {
        return Err(ConvertError::InvalidWorkoutsDir(cli.dir.clone()).into());
    }
    // checked before any output is written, so a missing stylesheet never
    // costs the caller an engine round-trip or a clobbered output file
    if !cli.stylesheet.is_file() {
        return Err(ConvertError::StylesheetNotFound(cli.stylesheet.clone()).into());
    }

    let engine = EngineCommand::new(&cli.engine, &cli.stylesheet);
    convert_dir(cli, &engine)
}

fn convert_dir(cli: &Cli, engine: &dyn XsltEngine) -> anyhow::Result<ConvertReport> {
    let mut doc = TcxDocument::new();
    if !cli.atomic {
        // the output path holds an empty skeleton until the final write
        doc.write_to(&cli.out)
            .with_context(|| format!("writing {}", cli.out.display()))?;
    }

    let mut report = ConvertReport::new(&cli.out);
    let entries =
        workout_files(&cli.dir).with_context(|| format!("listing {}", cli.dir.display()))?;
    for entry in entries {
        let path = entry.with_context(|| format!("listing {}", cli.dir.display()))?;
        let name = display_name(&path);
        if !cli.json {
            println!("converting '{name}'...");
        }
        match convert_one(engine, &path, &mut doc) {
            Ok(()) => report.converted.push(name),
            Err(err) if cli.keep_going => report.failed.push(FailedFile {
                file: name,
                error: format!("{err:#}"),
            }),
            Err(err) => return Err(err.context(format!("converting '{name}'"))),
        }
    }

    write_out(cli, &doc)?;

    if !cli.json {
        for failed in &report.failed {
            println!("failed '{}': {}", failed.file, failed.error);
        }
    }
    print_one(cli.json, &report, |r| {
        format!("wrote {} activities to {}", r.converted.len(), r.out)
    })?;
    Ok(report)
}

/// Transform one workout into a scoped scratch file and move its Activity
/// into the document. The scratch file is deleted on every exit path.
fn convert_one(engine: &dyn XsltEngine, source: &Path, doc: &mut TcxDocument) -> anyhow::Result<()> {
    let scratch = Builder::new()
        .prefix("nike2tcx-")
        .suffix(".tcx")
        .tempfile()
        .context("creating scratch file")?;
    engine.transform(source, scratch.path())?;
    let activity = extract_activity(scratch.path())?;
    doc.push_activity(activity);
    Ok(())
}

fn write_out(cli: &Cli, doc: &TcxDocument) -> anyhow::Result<()> {
    if cli.atomic {
        let dir = match cli.out.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let staged = Builder::new()
            .prefix(".nike2tcx-")
            .suffix(".tcx")
            .tempfile_in(dir)
            .context("staging output file")?;
        doc.write_to(staged.path())
            .with_context(|| format!("writing {}", cli.out.display()))?;
        staged
            .persist(&cli.out)
            .map_err(|e| e.error)
            .with_context(|| format!("replacing {}", cli.out.display()))?;
    } else {
        doc.write_to(&cli.out)
            .with_context(|| format!("writing {}", cli.out.display()))?;
    }
    Ok(())
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
