//! Sequential composition of the scoring stages.
//!
//! Each stage is a pure function; this module only threads one stage's
//! output into the next and applies the hard stop on blocking validation
//! errors. The resulting [`RoadmapPlan`] carries no timestamps, so the same
//! document and configuration always serialize to the same bytes.

use crate::classifier::{self, DomainDistribution};
use crate::complexity::{self, ComplexityInputs, ComplexityScore};
use crate::config::PipelineConfig;
use crate::error::{Result, RoadmapError};
use crate::extract::{self, Extraction, SpecReport};
use crate::milestone::{self, MilestonePlan};
use crate::persona::{self, PersonaAssignment};
use crate::template::{self, PathProbe, TemplateSelection};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Caller-supplied measurements the document itself does not carry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineInputs {
    /// Project root that template locations are resolved against.
    #[serde(default)]
    pub root: PathBuf,
    /// Overrides `defaults.risk_severity`.
    #[serde(default)]
    pub risk_severity: Option<String>,
    /// Overrides `defaults.scope_size`.
    #[serde(default)]
    pub scope_size: Option<String>,
    /// Overrides the number of dependency items found in the document.
    #[serde(default)]
    pub dependency_depth: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadmapPlan {
    pub title: String,
    /// Non-blocking findings from the validation policy.
    pub report: SpecReport,
    pub extraction: Extraction,
    pub domains: DomainDistribution,
    pub domain_spread: u32,
    pub complexity_inputs: ComplexityInputs,
    pub complexity: ComplexityScore,
    pub personas: PersonaAssignment,
    pub template: TemplateSelection,
    pub milestones: MilestonePlan,
}

fn saturating_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

/// Run every stage over `spec_text`.
///
/// Returns `Err` only for blocking validation errors (empty document, no
/// requirements). Warnings travel in `RoadmapPlan::report`.
pub fn analyze(
    spec_text: &str,
    fallback_title: &str,
    inputs: &PipelineInputs,
    config: &PipelineConfig,
    probe: &dyn PathProbe,
) -> Result<RoadmapPlan> {
    let report = extract::validate_spec(spec_text);
    if let Some(err) = report.blocking_error() {
        tracing::warn!(error = %err, "specification failed validation");
        return Err(err);
    }
    for issue in &report.issues {
        tracing::warn!(kind = ?issue.kind, "{}", issue.message);
    }

    let extraction = extract::extract(spec_text, fallback_title);
    tracing::info!(
        title = %extraction.title,
        requirements = extraction.requirement_count(),
        dependencies = extraction.dependencies.len(),
        "extracted specification"
    );
    // A requirements heading passes validation, but complexity needs a count.
    if extraction.requirement_count() == 0 {
        tracing::warn!("no FR or NFR lines extracted");
        return Err(RoadmapError::NoRequirementsFound);
    }

    let domains = classifier::classify(spec_text, &config.domains);
    let domain_spread = domains.spread(config.classifier.materiality_threshold);

    let complexity_inputs = ComplexityInputs {
        requirement_count: saturating_u32(extraction.requirement_count()),
        dependency_depth: inputs
            .dependency_depth
            .unwrap_or_else(|| saturating_u32(extraction.dependencies.len())),
        domain_spread,
        risk_severity: inputs
            .risk_severity
            .clone()
            .unwrap_or_else(|| config.defaults.risk_severity.clone()),
        scope_size: inputs
            .scope_size
            .clone()
            .unwrap_or_else(|| config.defaults.scope_size.clone()),
    };
    let complexity = complexity::score_complexity(&complexity_inputs, &config.complexity);

    let personas = persona::select_personas(&domains, &config.domains, &config.personas);
    let template = template::select_template(
        &inputs.root,
        &domains,
        &config.domains,
        &config.templates,
        probe,
    );
    let milestones = milestone::plan_milestones(
        complexity.tier,
        &domains,
        &config.domains,
        &config.milestones,
    );

    tracing::info!(
        score = complexity.score,
        tier = %complexity.tier,
        persona = %personas.primary,
        template = %template.template_type,
        "analysis complete"
    );

    Ok(RoadmapPlan {
        title: extraction.title.clone(),
        report,
        extraction,
        domains,
        domain_spread,
        complexity_inputs,
        complexity,
        personas,
        template,
        milestones,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
