//! Stats command - coverage of a saved project.

use std::path::Path;

use fieldcover::store::CoverageStore;
use fieldcover::{CoverageStats, Project};

use super::common::print_stats;
use crate::error::CliError;

/// Run the stats command.
pub fn run(project_path: &Path) -> Result<(), CliError> {
    let project = Project::load_from(project_path)?;

    println!("Project: {}", project_path.display());
    println!(
        "  {} boundary, {} plan and {} protocol features",
        project.boundaries.len(),
        project.prescriptions.len(),
        project.as_applied.len()
    );
    println!();

    let store = CoverageStore::new(project.boundaries, project.prescriptions, project.as_applied);
    print_stats(&CoverageStats::compute(&store));
    Ok(())
}
