use crate::output::print_json;
use roadmap_core::config::WarnLevel;
use roadmap_core::extract::validate_spec;
use roadmap_core::io::read_spec;
use std::path::Path;

pub fn run(spec: &Path, json: bool) -> anyhow::Result<()> {
    let content = read_spec(spec)?;
    let report = validate_spec(&content);

    if json {
        let value = serde_json::json!({
            "valid": report.is_ok(),
            "length": report.length,
            "issues": report.issues,
        });
        print_json(&value)?;
    } else if report.issues.is_empty() {
        println!(
            "Specification is valid ({} characters).",
            report.length
        );
    } else {
        for issue in &report.issues {
            let prefix = match issue.level {
                WarnLevel::Warning => "warning",
                WarnLevel::Error => "error",
            };
            println!("[{prefix}] {}", issue.message);
        }
    }

    if !report.is_ok() {
        anyhow::bail!("specification failed validation");
    }
    Ok(())
}
