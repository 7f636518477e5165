use crate::config::{ComplexityConfig, LabelFactor, RangeFactor};
use crate::types::Tier;
use serde::{Deserialize, Serialize};

/// Decimal places kept in the composite score.
const SCORE_PRECISION: f64 = 1e6;

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// The five raw measurements the scorer combines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplexityInputs {
    pub requirement_count: u32,
    pub dependency_depth: u32,
    /// Number of domains above the materiality threshold.
    pub domain_spread: u32,
    pub risk_severity: String,
    pub scope_size: String,
}

impl ComplexityInputs {
    pub fn new(
        requirement_count: u32,
        dependency_depth: u32,
        domain_spread: u32,
        risk_severity: impl Into<String>,
        scope_size: impl Into<String>,
    ) -> Self {
        Self {
            requirement_count,
            dependency_depth,
            domain_spread,
            risk_severity: risk_severity.into(),
            scope_size: scope_size.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorScore {
    pub name: String,
    /// The raw measurement as given (a count or a label).
    pub input: String,
    pub score: f64,
    pub weight: f64,
    pub contribution: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplexityScore {
    /// Weighted sum, clamped to `[0, 1]`.
    pub score: f64,
    pub tier: Tier,
    pub factors: Vec<FactorScore>,
    /// Label factors that fell back to their table's default score.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub degraded_factors: Vec<String>,
}

impl ComplexityScore {
    pub fn factor(&self, name: &str) -> Option<&FactorScore> {
        self.factors.iter().find(|f| f.name == name)
    }
}

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

fn range_factor(name: &str, value: u32, factor: &RangeFactor) -> FactorScore {
    let score = factor.scoring.lookup(value);
    FactorScore {
        name: name.to_string(),
        input: value.to_string(),
        score,
        weight: factor.weight,
        contribution: score * factor.weight,
    }
}

fn label_factor(
    name: &str,
    label: &str,
    factor: &LabelFactor,
    degraded: &mut Vec<String>,
) -> FactorScore {
    let score = match factor.scoring.lookup(label) {
        Ok(score) => score,
        Err(e) => {
            tracing::warn!(factor = name, error = %e, fallback = factor.scoring.fallback, "using fallback score");
            degraded.push(name.to_string());
            factor.scoring.fallback
        }
    };
    FactorScore {
        name: name.to_string(),
        input: label.to_string(),
        score,
        weight: factor.weight,
        contribution: score * factor.weight,
    }
}

/// Combine the five factors into a single score and tier.
///
/// Unknown labels never fail the run: the factor is scored with its table's
/// fallback and listed in `degraded_factors`.
pub fn score_complexity(inputs: &ComplexityInputs, config: &ComplexityConfig) -> ComplexityScore {
    let mut degraded = Vec::new();
    let factors = vec![
        range_factor(
            "requirement_count",
            inputs.requirement_count,
            &config.requirement_count,
        ),
        range_factor(
            "dependency_depth",
            inputs.dependency_depth,
            &config.dependency_depth,
        ),
        range_factor("domain_spread", inputs.domain_spread, &config.domain_spread),
        label_factor(
            "risk_severity",
            &inputs.risk_severity,
            &config.risk_severity,
            &mut degraded,
        ),
        label_factor(
            "scope_size",
            &inputs.scope_size,
            &config.scope_size,
            &mut degraded,
        ),
    ];

    // Summing weighted f64s drifts off the tier thresholds (0.4 becomes
    // 0.39999999999999997), so the total is rounded before the lookup.
    let sum = factors.iter().map(|f| f.contribution).sum::<f64>();
    let score = ((sum * SCORE_PRECISION).round() / SCORE_PRECISION).clamp(0.0, 1.0);
    let tier = config.tier(score);
    tracing::debug!(score, %tier, "scored complexity");

    ComplexityScore {
        score,
        tier,
        factors,
        degraded_factors: degraded,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn score(inputs: ComplexityInputs) -> ComplexityScore {
        score_complexity(&inputs, &ComplexityConfig::default())
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn medium_complexity_example() {
        let result = score(ComplexityInputs::new(18, 4, 3, "high_risks", "large"));
        assert!(approx(result.score, 0.59), "got {}", result.score);
        assert_eq!(result.tier, Tier::Medium);
        assert!(result.degraded_factors.is_empty());
    }

    #[test]
    fn low_complexity_example() {
        let result = score(ComplexityInputs::new(2, 0, 1, "no_risks", "small"));
        assert!(approx(result.score, 0.16), "got {}", result.score);
        assert_eq!(result.tier, Tier::Low);
    }

    #[test]
    fn high_complexity_example() {
        let result = score(ComplexityInputs::new(50, 15, 5, "critical_risks", "massive"));
        assert!(approx(result.score, 1.0), "got {}", result.score);
        assert!(result.score <= 1.0);
        assert_eq!(result.tier, Tier::High);
    }

    #[test]
    fn breakdown_lists_all_factors() {
        let result = score(ComplexityInputs::new(18, 4, 3, "high_risks", "large"));
        let names: Vec<&str> = result.factors.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "requirement_count",
                "dependency_depth",
                "domain_spread",
                "risk_severity",
                "scope_size"
            ]
        );
        let req = result.factor("requirement_count").unwrap();
        assert!(approx(req.score, 0.6));
        assert!(approx(req.contribution, 0.15));
        assert_eq!(req.input, "18");
    }

    #[test]
    fn unknown_label_degrades_to_fallback() {
        let result = score(ComplexityInputs::new(18, 4, 3, "apocalyptic", "large"));
        assert_eq!(result.degraded_factors, vec!["risk_severity".to_string()]);
        let risk = result.factor("risk_severity").unwrap();
        assert!(approx(risk.score, 0.5));
        // 0.15 + 0.125 + 0.12 + 0.075 + 0.09
        assert!(approx(result.score, 0.56), "got {}", result.score);
    }

    #[test]
    fn every_factor_score_is_in_unit_interval() {
        for n in [0, 1, 5, 6, 10, 11, 20, 21, 35, 36, 1000, u32::MAX] {
            let result = score(ComplexityInputs::new(n, n, n, "medium_risks", "medium"));
            for f in &result.factors {
                assert!(
                    (0.1..=1.0).contains(&f.score),
                    "{} scored {} for {n}",
                    f.name,
                    f.score
                );
            }
            assert!((0.0..=1.0).contains(&result.score));
        }
    }

    #[test]
    fn tier_boundaries_are_inclusive_toward_medium() {
        let config = ComplexityConfig::default();
        assert_eq!(config.tier(0.39), Tier::Low);
        assert_eq!(config.tier(0.4), Tier::Medium);
        assert_eq!(config.tier(0.7), Tier::Medium);
        assert_eq!(config.tier(0.71), Tier::High);
    }

    #[test]
    fn composite_score_landing_on_a_threshold_is_medium() {
        let low_edge = score(ComplexityInputs::new(3, 4, 3, "low_risks_only", "medium"));
        assert_eq!(low_edge.score, 0.4);
        assert_eq!(low_edge.tier, Tier::Medium);

        let high_edge = score(ComplexityInputs::new(8, 7, 5, "medium_risks", "massive"));
        assert_eq!(high_edge.score, 0.7);
        assert_eq!(high_edge.tier, Tier::Medium);
    }

    #[test]
    fn score_is_clamped_when_weights_overshoot() {
        let mut config = ComplexityConfig::default();
        config.requirement_count.weight = 2.0;
        let result = score_complexity(
            &ComplexityInputs::new(50, 15, 5, "critical_risks", "massive"),
            &config,
        );
        assert_eq!(result.score, 1.0);
    }
}
