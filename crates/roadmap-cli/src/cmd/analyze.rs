use crate::cmd::load_config;
use crate::output::{fmt_list, fmt_percent, fmt_score, print_json, print_table};
use anyhow::Context;
use roadmap_core::io::read_spec;
use roadmap_core::paths::spec_stem;
use roadmap_core::pipeline::{analyze, PipelineInputs, RoadmapPlan};
use roadmap_core::template::FsProbe;
use std::path::Path;

/// Measurements supplied on the command line.
pub struct Overrides {
    pub risk: Option<String>,
    pub scope: Option<String>,
    pub dependency_depth: Option<u32>,
}

pub fn run(
    root: &Path,
    config: Option<&Path>,
    spec: &Path,
    overrides: Overrides,
    json: bool,
) -> anyhow::Result<()> {
    let config = load_config(root, config)?;
    let content = read_spec(spec)?;
    let inputs = PipelineInputs {
        root: root.to_path_buf(),
        risk_severity: overrides.risk,
        scope_size: overrides.scope,
        dependency_depth: overrides.dependency_depth,
    };

    let plan = analyze(&content, &spec_stem(spec), &inputs, &config, &FsProbe)
        .with_context(|| format!("cannot analyze {}", spec.display()))?;

    if json {
        print_json(&plan)
    } else {
        print_plan(&plan);
        Ok(())
    }
}

fn print_plan(plan: &RoadmapPlan) {
    println!("Title:        {}", plan.title);
    for issue in &plan.report.issues {
        println!("Warning:      {}", issue.message);
    }
    println!(
        "Requirements: {} ({} dependencies, {} risks)",
        plan.extraction.requirement_count(),
        plan.extraction.dependencies.len(),
        plan.extraction.risks.len()
    );
    println!();

    let rows = plan
        .domains
        .sorted_desc()
        .into_iter()
        .map(|s| vec![s.domain.clone(), fmt_percent(s.percent)])
        .collect();
    print_table(&["DOMAIN", "SHARE"], rows);
    println!();

    println!(
        "Complexity:   {} ({})",
        fmt_score(plan.complexity.score),
        plan.complexity.tier
    );
    let rows = plan
        .complexity
        .factors
        .iter()
        .map(|f| {
            vec![
                f.name.clone(),
                f.input.clone(),
                fmt_score(f.score),
                fmt_score(f.weight),
            ]
        })
        .collect();
    print_table(&["FACTOR", "INPUT", "SCORE", "WEIGHT"], rows);
    if !plan.complexity.degraded_factors.is_empty() {
        println!(
            "Degraded:     {} (unknown label, fallback score used)",
            plan.complexity.degraded_factors.join(", ")
        );
    }
    println!();

    let fallback = if plan.personas.fallback_used {
        " (fallback)"
    } else {
        ""
    };
    println!("Persona:      {}{fallback}", plan.personas.primary);
    println!("Consulting:   {}", fmt_list(&plan.personas.consulting));

    let source = &plan.template.discovery;
    match &plan.template.template_file {
        Some(file) => println!(
            "Template:     {} from {} ({})",
            plan.template.template_type,
            source.source,
            file.display()
        ),
        None => println!(
            "Template:     {} ({})",
            plan.template.template_type, source.source
        ),
    }

    let range = plan.milestones.count_range;
    println!("Milestones:   {}-{}", range.min, range.max);
    println!(
        "Required:     {}",
        fmt_list(&plan.milestones.required_milestones)
    );
}
