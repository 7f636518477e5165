use crate::output::{fmt_list, print_json, print_table};
use roadmap_core::extract::extract;
use roadmap_core::io::read_spec;
use roadmap_core::paths::spec_stem;
use std::path::Path;

fn yes_no(b: bool) -> &'static str {
    if b {
        "yes"
    } else {
        "no"
    }
}

pub fn run(spec: &Path, json: bool) -> anyhow::Result<()> {
    let content = read_spec(spec)?;
    let extraction = extract(&content, &spec_stem(spec));

    if json {
        return print_json(&extraction);
    }

    println!("Title:         {}", extraction.title);
    println!(
        "Requirements:  {} functional, {} non-functional",
        extraction.functional().count(),
        extraction.non_functional().count()
    );
    println!("In scope:      {}", yes_no(extraction.has_in_scope));
    println!("Out of scope:  {}", yes_no(extraction.has_out_of_scope));
    println!("Dependencies:  {}", fmt_list(&extraction.dependencies));
    println!("Risks:         {}", fmt_list(&extraction.risks));
    println!("Criteria:      {}", extraction.success_criteria.len());

    if !extraction.requirements.is_empty() {
        println!();
        let rows = extraction
            .requirements
            .iter()
            .map(|r| vec![r.id.clone(), r.kind.to_string(), r.description.clone()])
            .collect();
        print_table(&["ID", "KIND", "DESCRIPTION"], rows);
    }
    Ok(())
}
