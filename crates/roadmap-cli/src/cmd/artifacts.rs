use crate::output::print_json;
use anyhow::Context;
use roadmap_core::artifact::{check_artifact_set, check_id_schema, scan_artifact_dir};
use std::path::Path;

pub fn run(dir: &Path, json: bool) -> anyhow::Result<()> {
    if !dir.is_dir() {
        anyhow::bail!("output directory not found: {}", dir.display());
    }
    let artifacts = scan_artifact_dir(dir)
        .with_context(|| format!("failed to read {}", dir.display()))?;
    let report = check_artifact_set(&artifacts);

    // Milestone numbering is advisory; it never fails the check.
    let mut warnings: Vec<String> = Vec::new();
    for content in artifacts.values() {
        for w in check_id_schema(content) {
            if !warnings.contains(&w) {
                warnings.push(w);
            }
        }
    }

    if json {
        let value = serde_json::json!({
            "report": report,
            "warnings": warnings,
        });
        print_json(&value)?;
    } else {
        println!(
            "{} artifacts, {} tasklists",
            report.artifact_count, report.tasklist_count
        );
        for issue in &report.issues {
            println!("[error] {issue}");
        }
        for w in &warnings {
            println!("[warning] {w}");
        }
        if report.valid {
            println!("Artifact set is complete.");
        }
    }

    if !report.valid {
        anyhow::bail!("artifact check failed");
    }
    Ok(())
}
