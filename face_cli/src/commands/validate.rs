//! Validate a project file.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use face_core::file_io::load_project;
use tracing::error;

use super::status_icon;

#[derive(Args)]
pub struct ValidateArgs {
    /// Project file (.tbm)
    pub path: PathBuf,
}

/// Soil profiles are validated while loading; section inputs are checked here.
pub fn execute(args: ValidateArgs) -> Result<()> {
    let project = load_project(&args.path)
        .with_context(|| format!("cannot load project {}", args.path.display()))?;

    println!("Project {} (schema {})", args.path.display(), project.meta.version);

    let mut failures = 0;
    for (_, section) in project.sections_by_label() {
        match section.input.validate() {
            Ok(()) => println!("  {} {}", status_icon(true), section.label()),
            Err(e) => {
                failures += 1;
                error!(section = section.label(), error = %e, "invalid section");
                println!("  {} {}: {}", status_icon(false), section.label(), e);
            }
        }
    }

    if failures > 0 {
        bail!("{} of {} sections are invalid", failures, project.section_count());
    }
    println!("{} sections valid", project.section_count());
    Ok(())
}
