use crate::config::DomainRule;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// DomainShare / DomainDistribution
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainShare {
    pub domain: String,
    /// Weighted keyword count before normalization.
    pub raw: f64,
    /// Share of the total, 0-100.
    pub percent: f64,
}

/// Percentage distribution over the configured domains, in configuration
/// order. Sums to 100 whenever any keyword matched; all zero otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DomainDistribution {
    pub shares: Vec<DomainShare>,
}

impl DomainDistribution {
    /// Build a distribution directly from `(domain, percent)` pairs.
    pub fn from_percentages<S: Into<String>>(pairs: impl IntoIterator<Item = (S, f64)>) -> Self {
        Self {
            shares: pairs
                .into_iter()
                .map(|(domain, percent)| DomainShare {
                    domain: domain.into(),
                    raw: percent,
                    percent,
                })
                .collect(),
        }
    }

    pub fn get(&self, domain: &str) -> f64 {
        self.shares
            .iter()
            .find(|s| s.domain == domain)
            .map_or(0.0, |s| s.percent)
    }

    pub fn total(&self) -> f64 {
        self.shares.iter().map(|s| s.percent).sum()
    }

    /// True when no keyword matched anywhere.
    pub fn is_empty(&self) -> bool {
        self.shares.iter().all(|s| s.percent == 0.0)
    }

    /// Shares sorted by percentage, highest first. The sort is stable, so
    /// exact ties keep configuration order.
    pub fn sorted_desc(&self) -> Vec<&DomainShare> {
        let mut sorted: Vec<&DomainShare> = self.shares.iter().collect();
        sorted.sort_by(|a, b| b.percent.total_cmp(&a.percent));
        sorted
    }

    /// Highest share; the earliest configured domain wins a tie.
    pub fn top(&self) -> Option<&DomainShare> {
        self.sorted_desc().into_iter().next()
    }

    /// Number of domains whose share is strictly above `threshold`.
    pub fn spread(&self, threshold: f64) -> u32 {
        self.shares.iter().filter(|s| s.percent > threshold).count() as u32
    }
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Non-overlapping, case-insensitive substring count. Both arguments must
/// already be lowercased.
fn occurrences(haystack: &str, needle: &str) -> usize {
    if needle.is_empty() {
        return 0;
    }
    haystack.matches(needle).count()
}

/// Score `text` against every domain's keywords and normalize to percentages.
///
/// A keyword embedded in a longer word still counts ("auth" inside
/// "authentication").
pub fn classify(text: &str, domains: &[DomainRule]) -> DomainDistribution {
    let lower = text.to_lowercase();
    let raw: Vec<(String, f64)> = domains
        .iter()
        .map(|d| {
            let count: usize = d
                .keywords
                .iter()
                .map(|kw| occurrences(&lower, &kw.to_lowercase()))
                .sum();
            (d.name.clone(), count as f64 * d.weight)
        })
        .collect();

    let total: f64 = raw.iter().map(|(_, score)| score).sum();
    let shares = raw
        .into_iter()
        .map(|(domain, score)| DomainShare {
            percent: if total > 0.0 { score / total * 100.0 } else { 0.0 },
            raw: score,
            domain,
        })
        .collect();

    let dist = DomainDistribution { shares };
    tracing::debug!(
        total,
        top = dist.top().map(|s| s.domain.as_str()).unwrap_or("-"),
        "classified domains"
    );
    dist
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PipelineConfig;
    use crate::fixtures::{MINIMAL_SPEC, SAMPLE_SPEC};

    fn domains() -> Vec<DomainRule> {
        PipelineConfig::default().domains
    }

    #[test]
    fn sample_spec_is_security_heavy() {
        let dist = classify(SAMPLE_SPEC, &domains());
        assert!(dist.get("security") > 20.0, "security too low: {dist:?}");
        assert!(dist.get("backend") > 10.0, "backend too low: {dist:?}");
        assert_eq!(dist.top().unwrap().domain, "security");
    }

    #[test]
    fn percentages_sum_to_100() {
        for text in [SAMPLE_SPEC, MINIMAL_SPEC, "auth API encryption"] {
            let dist = classify(text, &domains());
            assert!((dist.total() - 100.0).abs() < 0.01, "sum {}", dist.total());
        }
    }

    #[test]
    fn empty_text_is_all_zero() {
        let dist = classify("", &domains());
        assert!(dist.is_empty());
        assert_eq!(dist.shares.len(), 5);
        assert!(dist.shares.iter().all(|s| s.percent == 0.0));
    }

    #[test]
    fn text_without_keywords_is_all_zero() {
        let dist = classify("zzz qqq xyzzy", &domains());
        assert!(dist.is_empty());
        assert_eq!(dist.total(), 0.0);
    }

    #[test]
    fn frontend_only_text() {
        let dist = classify(
            "UI components React CSS responsive layout design button modal",
            &domains(),
        );
        assert!(dist.get("frontend") > 50.0, "{dist:?}");
    }

    #[test]
    fn backend_only_text() {
        let dist = classify(
            "API database services endpoint REST controller model",
            &domains(),
        );
        assert!(dist.get("backend") > 50.0, "{dist:?}");
    }

    #[test]
    fn security_weight_boosts_equal_counts() {
        let dist = classify("auth API encryption database tokens server", &domains());
        assert!(dist.get("security") > dist.get("backend"));
    }

    #[test]
    fn matching_is_case_insensitive_substring() {
        let rules = vec![DomainRule {
            name: "security".to_string(),
            keywords: vec!["auth".to_string()],
            weight: 1.0,
            persona: None,
            template: None,
            milestone: None,
        }];
        let dist = classify("AUTHENTICATION and reauth", &rules);
        assert_eq!(dist.shares[0].raw, 2.0);
        assert_eq!(dist.get("security"), 100.0);
    }

    #[test]
    fn minimal_spec_detects_a_domain() {
        let dist = classify(MINIMAL_SPEC, &domains());
        assert!(dist.shares.iter().filter(|s| s.percent > 0.0).count() >= 1);
    }

    #[test]
    fn ties_keep_configuration_order() {
        let dist = DomainDistribution::from_percentages([
            ("frontend", 30.0),
            ("backend", 30.0),
            ("security", 40.0),
        ]);
        let order: Vec<&str> = dist.sorted_desc().iter().map(|s| s.domain.as_str()).collect();
        assert_eq!(order, vec!["security", "frontend", "backend"]);
    }

    #[test]
    fn spread_counts_domains_above_threshold() {
        let dist = DomainDistribution::from_percentages([
            ("frontend", 10.0),
            ("backend", 10.01),
            ("security", 79.99),
        ]);
        assert_eq!(dist.spread(10.0), 2);
    }

    #[test]
    fn alternate_domain_sets_are_supported() {
        let rules = vec![
            DomainRule {
                name: "data".to_string(),
                keywords: vec!["etl".to_string(), "warehouse".to_string()],
                weight: 1.0,
                persona: Some("analyst".to_string()),
                template: None,
                milestone: None,
            },
            DomainRule {
                name: "ml".to_string(),
                keywords: vec!["model".to_string()],
                weight: 2.0,
                persona: None,
                template: None,
                milestone: None,
            },
        ];
        let dist = classify("ETL into the warehouse, then train a model", &rules);
        assert_eq!(dist.get("data"), 50.0);
        assert_eq!(dist.get("ml"), 50.0);
    }
}
