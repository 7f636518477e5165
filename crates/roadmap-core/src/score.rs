use crate::config::ValidationConfig;
use crate::types::Decision;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Maximum points per score-card item.
pub const ITEM_MAX: u32 = 25;

/// Maximum value of any 0-100 score.
pub const SCORE_MAX: u32 = 100;

// ---------------------------------------------------------------------------
// Score cards
// ---------------------------------------------------------------------------

/// Quality reviewer's four focus areas, 25 points each.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityCard {
    pub completeness: u32,
    pub correctness: u32,
    pub consistency: u32,
    pub compliance: u32,
}

impl QualityCard {
    pub fn total(&self) -> u32 {
        [
            self.completeness,
            self.correctness,
            self.consistency,
            self.compliance,
        ]
        .iter()
        .map(|p| (*p).min(ITEM_MAX))
        .sum()
    }
}

/// Self-review questions, 25 points each.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelfReviewCard {
    pub q1_spec_coverage: u32,
    pub q2_path_conventions: u32,
    pub q3_critical_mistakes: u32,
    pub q4_traceability: u32,
}

impl SelfReviewCard {
    pub fn total(&self) -> u32 {
        [
            self.q1_spec_coverage,
            self.q2_path_conventions,
            self.q3_critical_mistakes,
            self.q4_traceability,
        ]
        .iter()
        .map(|p| (*p).min(ITEM_MAX))
        .sum()
    }
}

// ---------------------------------------------------------------------------
// ReviewerOutcome
// ---------------------------------------------------------------------------

/// What came back from an external reviewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "outcome", content = "score")]
pub enum ReviewerOutcome {
    Scored(u32),
    ParseFailure,
    Timeout,
}

impl ReviewerOutcome {
    /// The score to aggregate. Failures degrade to the configured defaults.
    pub fn resolve(self, config: &ValidationConfig) -> u32 {
        match self {
            ReviewerOutcome::Scored(n) => n.min(SCORE_MAX),
            ReviewerOutcome::ParseFailure => config.parse_failure_score,
            ReviewerOutcome::Timeout => config.timeout_score,
        }
    }

    pub fn is_degraded(self) -> bool {
        !matches!(self, ReviewerOutcome::Scored(_))
    }
}

static FIRST_INTEGER_RE: OnceLock<Regex> = OnceLock::new();

fn first_integer_re() -> &'static Regex {
    FIRST_INTEGER_RE.get_or_init(|| Regex::new(r"\d+").unwrap())
}

/// Parse a free-text reviewer reply such as `"Score: 87/100"`. The first
/// integer is taken; none, or one above 100, is a parse failure.
pub fn parse_reviewer_score(raw: &str) -> ReviewerOutcome {
    let Some(m) = first_integer_re().find(raw) else {
        return ReviewerOutcome::ParseFailure;
    };
    match m.as_str().parse::<u32>() {
        Ok(n) if n <= SCORE_MAX => ReviewerOutcome::Scored(n),
        _ => ReviewerOutcome::ParseFailure,
    }
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub quality_score: u32,
    pub review_score: u32,
    pub final_score: u32,
    pub decision: Decision,
}

fn basis_points(weight: f64) -> u64 {
    (weight * 10_000.0).round().max(0.0) as u64
}

/// Weighted mean of the two scores, rounded half-up.
///
/// Computed in basis points so that `0.6 * 85 + 0.4 * 85` is exactly 85.
pub fn final_score(quality: u32, review: u32, config: &ValidationConfig) -> u32 {
    let q = u64::from(quality.min(SCORE_MAX));
    let r = u64::from(review.min(SCORE_MAX));
    let weighted = q * basis_points(config.quality_weight) + r * basis_points(config.review_weight);
    ((weighted + 5_000) / 10_000) as u32
}

/// `>= pass → PASS`, `>= revise → REVISE`, otherwise `REJECT`.
pub fn decide(final_score: u32, config: &ValidationConfig) -> Decision {
    if final_score >= config.pass_threshold {
        Decision::Pass
    } else if final_score >= config.revise_threshold {
        Decision::Revise
    } else {
        Decision::Reject
    }
}

pub fn aggregate(quality: u32, review: u32, config: &ValidationConfig) -> ValidationResult {
    let quality_score = quality.min(SCORE_MAX);
    let review_score = review.min(SCORE_MAX);
    let final_score = final_score(quality_score, review_score, config);
    let decision = decide(final_score, config);
    tracing::debug!(quality_score, review_score, final_score, %decision, "aggregated validation scores");
    ValidationResult {
        quality_score,
        review_score,
        final_score,
        decision,
    }
}

/// Aggregate two reviewer outcomes, degrading failures to their defaults.
pub fn aggregate_outcomes(
    quality: ReviewerOutcome,
    review: ReviewerOutcome,
    config: &ValidationConfig,
) -> ValidationResult {
    for (name, outcome) in [("quality", quality), ("review", review)] {
        if outcome.is_degraded() {
            tracing::warn!(reviewer = name, ?outcome, "reviewer score unavailable, using default");
        }
    }
    aggregate(quality.resolve(config), review.resolve(config), config)
}

// ---------------------------------------------------------------------------
// Revision loop
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "step")]
pub enum RevisionStep {
    Proceed,
    Revise { iteration: u32 },
    AcceptWithWarning,
    Reject,
}

/// Next action after a validation round. `completed` is the number of
/// revision iterations already performed.
pub fn next_step(decision: Decision, completed: u32, config: &ValidationConfig) -> RevisionStep {
    match decision {
        Decision::Pass => RevisionStep::Proceed,
        Decision::Revise if completed < config.max_revise_iterations => RevisionStep::Revise {
            iteration: completed + 1,
        },
        Decision::Revise => RevisionStep::AcceptWithWarning,
        Decision::Reject => RevisionStep::Reject,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
