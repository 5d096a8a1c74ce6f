//! Create a project file with a sample cross section.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;
use face_core::calculations::FaceSupportInput;
use face_core::file_io::{save_project, FileLock};
use face_core::project::{CrossSection, Project};
use face_core::soil::{SoilLayer, SoilProfile};
use tracing::info;

#[derive(Args)]
pub struct NewArgs {
    /// Project file to create (.tbm)
    pub path: PathBuf,

    #[arg(long, default_value = "")]
    pub engineer: String,

    #[arg(long, default_value = "")]
    pub job_id: String,

    #[arg(long, default_value = "")]
    pub tunnel: String,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

pub fn execute(args: NewArgs) -> Result<()> {
    if args.path.exists() && !args.force {
        bail!("{} already exists (use --force to overwrite)", args.path.display());
    }

    let mut project = Project::new(&args.engineer, &args.job_id, &args.tunnel);
    project.add_section(sample_section()?);

    let _lock = FileLock::acquire(&args.path, user_id(&args.engineer))?;
    save_project(&project, &args.path)?;
    info!(path = %args.path.display(), "project created");

    println!("Created {} with sample section 'km 0+000'", args.path.display());
    Ok(())
}

fn user_id(engineer: &str) -> String {
    if engineer.is_empty() {
        std::env::var("USER")
            .or_else(|_| std::env::var("USERNAME"))
            .unwrap_or_else(|_| "unknown".to_string())
    } else {
        engineer.to_string()
    }
}

fn sample_section() -> Result<CrossSection> {
    let profile = SoilProfile::new(vec![
        SoilLayer::new("Fill", 3.0, 18.0, 8.0, 27.5, 0.0).with_min_weights(17.0, 7.0),
        SoilLayer::new("Sand, medium dense", 14.0, 19.0, 10.0, 32.5, 0.0)
            .with_min_weights(18.0, 9.5),
        SoilLayer::new("Marl", 40.0, 21.0, 11.0, 25.0, 20.0).with_min_weights(20.0, 10.5),
    ])?;

    let mut input = FaceSupportInput::new("km 0+000", 9.5, 12.0, 3.0);
    input.surcharge_permanent_kpa = 10.0;
    input.surcharge_traffic_kpa = 10.0;
    input.delta_p_kpa = 10.0;
    input.silo.enabled = true;

    Ok(CrossSection::new(input, profile))
}
