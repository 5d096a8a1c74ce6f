//! Run the face support analysis for the sections of a project.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use face_core::calculations::{FaceSupportResult, ScenarioResult};
use face_core::file_io::load_project_with_lock_check;
use face_core::project::{CrossSection, PressureUnit};
use tracing::{info, warn};

use super::status_icon;

#[derive(Args)]
pub struct RunArgs {
    /// Project file (.tbm)
    pub path: PathBuf,

    /// Analyze only the section with this label
    #[arg(short, long)]
    pub section: Option<String>,

    /// Print the full results as JSON after the summary
    #[arg(long)]
    pub json: bool,

    /// Report pressures in bar instead of the project setting
    #[arg(long)]
    pub bar: bool,
}

pub fn execute(args: RunArgs) -> Result<()> {
    let (project, lock) = load_project_with_lock_check(&args.path)
        .with_context(|| format!("cannot load project {}", args.path.display()))?;
    if let Some(lock) = lock {
        warn!(
            user = %lock.user_id,
            machine = %lock.machine,
            "project is open elsewhere; results may be stale"
        );
    }

    let unit = if args.bar {
        PressureUnit::Bar
    } else {
        project.settings.pressure_unit
    };

    let sections: Vec<&CrossSection> = match &args.section {
        Some(label) => vec![project.find_section(label)?.1],
        None => project.sections_by_label().into_iter().map(|(_, s)| s).collect(),
    };
    info!(count = sections.len(), "analyzing sections");

    println!("{} / {} ({})", project.meta.job_id, project.meta.tunnel, project.settings.guideline);

    let mut results = Vec::with_capacity(sections.len());
    for section in sections {
        let result = section
            .analyze()
            .with_context(|| format!("analysis of section '{}' failed", section.label()))?;
        print_summary(section, &result, unit);
        results.push(result);
    }

    if args.json {
        println!();
        println!("{}", serde_json::to_string_pretty(&results)?);
    }

    Ok(())
}

fn print_summary(section: &CrossSection, result: &FaceSupportResult, unit: PressureUnit) {
    let input = &section.input;
    let p = |kpa: f64| unit.format(kpa);

    println!();
    println!("═══════════════════════════════════════");
    println!("  SECTION {}", result.label);
    println!("═══════════════════════════════════════");
    println!("Geometry:");
    println!(
        "  D = {:.2} m, crown at {:.2} m, water table at {:.2} m",
        input.diameter_m, input.crown_depth_m, input.water_depth_m
    );
    println!("  Soil layers: {}", section.profile.len());
    println!();
    println!("Crown stress:");
    println!("  σ'v       = {}", p(result.sigma_v_crown_kpa));
    if let Some(silo) = &result.silo {
        println!(
            "  unreduced = {} (silo: B = {:.2} m, h1 = {:.2} m, λ = {:.3})",
            p(result.sigma_v_crown_unreduced_kpa),
            silo.half_width_m,
            silo.silo_height_m,
            silo.lambda
        );
    }
    println!("  σ'v,min   = {}", p(result.sigma_v_crown_min_kpa));
    println!();
    println!(
        "Wedge ({}, {}):",
        input.k2_model.display_name(),
        input.vertical_stress_model.display_name()
    );
    println!(
        "  θcrit = {:.0}°, E_re = {:.1} kN",
        result.wedge.theta_crit_deg, result.wedge.max_ere_kn
    );
    println!(
        "  E_ci = {:.1} kN, W_ci = {:.1} kN, S_ci = {:.1} kN",
        result.forces.e_max_ci_kn, result.forces.w_ci_kn, result.forces.s_ci_kn
    );
    println!();
    for scenario in result.scenarios() {
        print_scenario(scenario, unit);
    }
    println!("═══════════════════════════════════════");
    println!("  RESULT: {}", if result.all_passed() { "PASS" } else { "FAIL" });
    println!("═══════════════════════════════════════");
}

fn print_scenario(scenario: &ScenarioResult, unit: PressureUnit) {
    let profile = &scenario.profile;
    println!("{}:", profile.scenario.display_name());
    println!(
        "  crown min {} / operational {}  (governs: {})",
        unit.format(profile.min_crown_kpa),
        unit.format(profile.operational_crown_kpa),
        profile.governing.description()
    );
    println!(
        "  blow-out  {:.2} ({} allowable vs {}) {}",
        scenario.blowout.eta,
        unit.format(scenario.blowout.allowable_kpa),
        unit.format(scenario.blowout.required_kpa),
        status_icon(scenario.blowout.passed)
    );
    let ingress = [("crown", &scenario.ingress_crown), ("invert", &scenario.ingress_invert)];
    for (name, check) in ingress {
        println!(
            "  ingress {:<6} {} vs {} {}",
            name,
            unit.format(check.provided_kpa),
            unit.format(check.required_kpa),
            status_icon(check.passed)
        );
    }
    println!();
}
