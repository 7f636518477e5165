use crate::cmd::load_config;
use crate::output::print_json;
use clap::{ArgGroup, Args};
use roadmap_core::score::{aggregate_outcomes, next_step, parse_reviewer_score, ReviewerOutcome, RevisionStep};
use std::path::Path;

#[derive(Args)]
#[command(
    group(ArgGroup::new("quality_source").required(true).args(["quality", "quality_raw", "quality_timeout"])),
    group(ArgGroup::new("review_source").required(true).args(["review", "review_raw", "review_timeout"]))
)]
pub struct ScoreArgs {
    /// Quality reviewer score (0-100)
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..=100))]
    quality: Option<u32>,
    /// Raw quality reviewer reply; the first integer is taken as the score
    #[arg(long)]
    quality_raw: Option<String>,
    /// The quality reviewer timed out
    #[arg(long)]
    quality_timeout: bool,

    /// Self-review score (0-100)
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..=100))]
    review: Option<u32>,
    /// Raw self-review reply; the first integer is taken as the score
    #[arg(long)]
    review_raw: Option<String>,
    /// The self-review timed out
    #[arg(long)]
    review_timeout: bool,

    /// Revision iterations already performed
    #[arg(long, default_value_t = 0)]
    iteration: u32,
}

fn outcome(score: Option<u32>, raw: Option<&str>, timed_out: bool) -> ReviewerOutcome {
    if timed_out {
        ReviewerOutcome::Timeout
    } else if let Some(raw) = raw {
        parse_reviewer_score(raw)
    } else {
        score.map_or(ReviewerOutcome::ParseFailure, ReviewerOutcome::Scored)
    }
}

fn describe(step: RevisionStep) -> String {
    match step {
        RevisionStep::Proceed => "proceed".to_string(),
        RevisionStep::Revise { iteration } => format!("revise (iteration {iteration})"),
        RevisionStep::AcceptWithWarning => "accept with warning".to_string(),
        RevisionStep::Reject => "reject".to_string(),
    }
}

pub fn run(root: &Path, config: Option<&Path>, args: ScoreArgs, json: bool) -> anyhow::Result<()> {
    let config = load_config(root, config)?;
    let quality = outcome(args.quality, args.quality_raw.as_deref(), args.quality_timeout);
    let review = outcome(args.review, args.review_raw.as_deref(), args.review_timeout);

    let result = aggregate_outcomes(quality, review, &config.validation);
    let step = next_step(result.decision, args.iteration, &config.validation);

    if json {
        let value = serde_json::json!({
            "quality_outcome": quality,
            "review_outcome": review,
            "result": result,
            "next_step": step,
        });
        return print_json(&value);
    }

    let note = |o: ReviewerOutcome| match o {
        ReviewerOutcome::Scored(_) => "",
        ReviewerOutcome::ParseFailure => " (parse failure default)",
        ReviewerOutcome::Timeout => " (timeout default)",
    };
    println!("Quality:   {}{}", result.quality_score, note(quality));
    println!("Review:    {}{}", result.review_score, note(review));
    println!("Final:     {}", result.final_score);
    println!("Decision:  {}", result.decision);
    println!("Next:      {}", describe(step));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_beats_other_sources() {
        assert_eq!(outcome(Some(90), None, true), ReviewerOutcome::Timeout);
    }

    #[test]
    fn raw_reply_is_parsed() {
        assert_eq!(
            outcome(None, Some("Score: 77/100"), false),
            ReviewerOutcome::Scored(77)
        );
        assert_eq!(outcome(None, Some("n/a"), false), ReviewerOutcome::ParseFailure);
    }

    #[test]
    fn step_descriptions() {
        assert_eq!(describe(RevisionStep::Revise { iteration: 2 }), "revise (iteration 2)");
        assert_eq!(describe(RevisionStep::AcceptWithWarning), "accept with warning");
    }
}
