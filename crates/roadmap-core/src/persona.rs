use crate::classifier::DomainDistribution;
use crate::config::{DomainRule, PersonaConfig};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonaAssignment {
    pub primary: String,
    /// Sorted by domain share, highest first. Never contains `primary`.
    pub consulting: Vec<String>,
    pub fallback_used: bool,
}

fn persona_for(domain: &str, domains: &[DomainRule], config: &PersonaConfig) -> String {
    domains
        .iter()
        .find(|d| d.name == domain)
        .and_then(|d| d.persona.clone())
        .unwrap_or_else(|| config.fallback.clone())
}

/// Assign a primary persona and its consultants from a domain distribution.
///
/// The highest domain at or above `primary_threshold` owns the work; when
/// none qualifies the fallback persona does. Every other domain at or above
/// `consulting_threshold` consults, once per persona.
pub fn select_personas(
    dist: &DomainDistribution,
    domains: &[DomainRule],
    config: &PersonaConfig,
) -> PersonaAssignment {
    let sorted = dist.sorted_desc();
    let lead = sorted
        .first()
        .filter(|s| s.percent >= config.primary_threshold)
        .copied();

    let (primary, fallback_used) = match lead {
        Some(share) => (persona_for(&share.domain, domains, config), false),
        None => {
            tracing::info!(persona = %config.fallback, "no dominant domain, using fallback persona");
            (config.fallback.clone(), true)
        }
    };

    let mut consulting: Vec<String> = Vec::new();
    for share in sorted.iter().skip(usize::from(lead.is_some())) {
        if share.percent < config.consulting_threshold {
            continue;
        }
        let persona = persona_for(&share.domain, domains, config);
        if persona != primary && !consulting.contains(&persona) {
            consulting.push(persona);
        }
    }

    tracing::debug!(%primary, ?consulting, fallback_used, "selected personas");
    PersonaAssignment {
        primary,
        consulting,
        fallback_used,
    }
}
