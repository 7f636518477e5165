use crate::classifier::DomainDistribution;
use crate::config::{CountRange, DomainRule, MilestoneConfig};
use crate::types::Tier;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// MilestonePlan
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MilestonePlan {
    pub tier: Tier,
    pub count_range: CountRange,
    /// Domain-specific milestones that must appear, in domain table order.
    pub required_milestones: Vec<String>,
}

impl MilestonePlan {
    pub fn requires(&self, name: &str) -> bool {
        self.required_milestones.iter().any(|m| m == name)
    }
}

/// Derive the milestone count from the tier and collect the named milestone
/// of every domain at or above `required_threshold`.
pub fn plan_milestones(
    tier: Tier,
    dist: &DomainDistribution,
    domains: &[DomainRule],
    config: &MilestoneConfig,
) -> MilestonePlan {
    let mut required: Vec<String> = Vec::new();
    for rule in domains {
        let Some(name) = &rule.milestone else {
            continue;
        };
        if dist.get(&rule.name) >= config.required_threshold && !required.contains(name) {
            required.push(name.clone());
        }
    }

    let count_range = config.count_for(tier);
    tracing::debug!(%tier, min = count_range.min, max = count_range.max, ?required, "planned milestones");
    MilestonePlan {
        tier,
        count_range,
        required_milestones: required,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PipelineConfig;

    fn plan(tier: Tier, pairs: &[(&str, f64)]) -> MilestonePlan {
        let config = PipelineConfig::default();
        let dist = DomainDistribution::from_percentages(pairs.iter().copied());
        plan_milestones(tier, &dist, &config.domains, &config.milestones)
    }

    #[test]
    fn count_range_follows_tier() {
        let none: &[(&str, f64)] = &[];
        assert_eq!(plan(Tier::Low, none).count_range, CountRange { min: 3, max: 4 });
        assert_eq!(plan(Tier::Medium, none).count_range, CountRange { min: 4, max: 6 });
        assert_eq!(plan(Tier::High, none).count_range, CountRange { min: 5, max: 8 });
    }

    #[test]
    fn dominant_security_requires_audit() {
        let p = plan(Tier::Medium, &[("security", 70.0), ("backend", 30.0)]);
        assert_eq!(p.required_milestones, vec!["Security Audit"]);
        assert!(p.requires("Security Audit"));
        assert!(!p.requires("API Specification"));
    }

    #[test]
    fn multiple_domains_follow_table_order() {
        // Distribution order is deliberately reversed against the domain table.
        let p = plan(
            Tier::High,
            &[("performance", 45.0), ("frontend", 55.0)],
        );
        assert_eq!(
            p.required_milestones,
            vec!["UX Validation", "Performance Baseline"]
        );
    }

    #[test]
    fn threshold_is_inclusive() {
        let p = plan(Tier::Low, &[("backend", 40.0), ("frontend", 39.99)]);
        assert_eq!(p.required_milestones, vec!["API Specification"]);
    }

    #[test]
    fn documentation_has_no_forced_milestone() {
        let p = plan(Tier::Low, &[("documentation", 100.0)]);
        assert!(p.required_milestones.is_empty());
    }

    #[test]
    fn empty_distribution_requires_nothing() {
        let p = plan(Tier::Medium, &[("frontend", 0.0), ("security", 0.0)]);
        assert!(p.required_milestones.is_empty());
    }
}
