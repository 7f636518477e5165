use crate::error::Result;
use crate::paths;
use crate::types::Decision;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::sync::OnceLock;

/// Documents every generated roadmap must contain, relative to the output
/// directory.
pub const REQUIRED_ARTIFACTS: &[&str] = &[
    "roadmap.md",
    "extraction.md",
    "test-strategy.md",
    "execution-prompt.md",
];

/// Milestone numbers outside this range are flagged as unusual.
pub const MILESTONE_RANGE: std::ops::RangeInclusive<u64> = 1..=20;

const DRAFT_SUFFIX: &str = ".draft";

// ---------------------------------------------------------------------------
// Patterns
// ---------------------------------------------------------------------------

static TASKLIST_RE: OnceLock<Regex> = OnceLock::new();
static MILESTONE_REF_RE: OnceLock<Regex> = OnceLock::new();
static MILESTONE_ID_RE: OnceLock<Regex> = OnceLock::new();
static DELIVERABLE_ID_RE: OnceLock<Regex> = OnceLock::new();
static TASK_ID_RE: OnceLock<Regex> = OnceLock::new();
static RISK_ID_RE: OnceLock<Regex> = OnceLock::new();

fn tasklist_re() -> &'static Regex {
    TASKLIST_RE.get_or_init(|| Regex::new(r"^tasklists/M\d+-[\w-]+\.md$").unwrap())
}

fn milestone_ref_re() -> &'static Regex {
    MILESTONE_REF_RE.get_or_init(|| Regex::new(r"\bM(\d+)\b").unwrap())
}

fn milestone_id_re() -> &'static Regex {
    MILESTONE_ID_RE.get_or_init(|| Regex::new(r"^M\d+$").unwrap())
}

fn deliverable_id_re() -> &'static Regex {
    DELIVERABLE_ID_RE.get_or_init(|| Regex::new(r"^D\d+\.\d+\.\d+$").unwrap())
}

fn task_id_re() -> &'static Regex {
    TASK_ID_RE.get_or_init(|| Regex::new(r"^T\d+\.\d+$").unwrap())
}

fn risk_id_re() -> &'static Regex {
    RISK_ID_RE.get_or_init(|| Regex::new(r"^R-\d{3}$").unwrap())
}

pub fn is_milestone_id(id: &str) -> bool {
    milestone_id_re().is_match(id)
}

pub fn is_deliverable_id(id: &str) -> bool {
    deliverable_id_re().is_match(id)
}

pub fn is_task_id(id: &str) -> bool {
    task_id_re().is_match(id)
}

pub fn is_risk_id(id: &str) -> bool {
    risk_id_re().is_match(id)
}

pub fn is_tasklist_name(name: &str) -> bool {
    tasklist_re().is_match(name)
}

// ---------------------------------------------------------------------------
// Artifact set
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactReport {
    pub valid: bool,
    pub issues: Vec<String>,
    pub artifact_count: usize,
    pub tasklist_count: usize,
}

fn is_tasklist_entry(name: &str) -> bool {
    name.starts_with(&format!("{}/", paths::TASKLISTS_DIR))
}

/// Check a generated artifact set, keyed by path relative to the output
/// directory with `/` separators.
pub fn check_artifact_set(artifacts: &BTreeMap<String, String>) -> ArtifactReport {
    let mut issues = Vec::new();

    for name in REQUIRED_ARTIFACTS {
        match artifacts.get(*name) {
            None => issues.push(format!("Missing artifact: {name}")),
            Some(content) if content.trim().is_empty() => {
                issues.push(format!("Empty artifact: {name}"))
            }
            Some(_) => {}
        }
    }

    let tasklists: Vec<(&String, &String)> = artifacts
        .iter()
        .filter(|(name, _)| is_tasklist_entry(name))
        .collect();
    if tasklists.is_empty() {
        issues.push("No tasklist files found".to_string());
    }
    for (name, content) in &tasklists {
        if !is_tasklist_name(name) {
            issues.push(format!("Invalid tasklist name: {name}"));
        } else if content.trim().is_empty() {
            issues.push(format!("Empty artifact: {name}"));
        }
    }

    ArtifactReport {
        valid: issues.is_empty(),
        issues,
        artifact_count: artifacts.len(),
        tasklist_count: tasklists.len(),
    }
}

/// Read every top-level file and every file under `tasklists/` from an
/// output directory. Subdirectories other than `tasklists/` are ignored.
pub fn scan_artifact_dir(dir: &Path) -> Result<BTreeMap<String, String>> {
    let mut out = BTreeMap::new();
    read_files(dir, None, &mut out)?;
    let tasklists = dir.join(paths::TASKLISTS_DIR);
    if tasklists.is_dir() {
        read_files(&tasklists, Some(paths::TASKLISTS_DIR), &mut out)?;
    }
    tracing::debug!(dir = %dir.display(), files = out.len(), "scanned artifact directory");
    Ok(out)
}

fn read_files(dir: &Path, prefix: Option<&str>, out: &mut BTreeMap<String, String>) -> Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        let key = match prefix {
            Some(p) => format!("{p}/{name}"),
            None => name,
        };
        let bytes = std::fs::read(entry.path())?;
        let content = match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(file = %key, "artifact is not valid UTF-8, reading lossily");
                String::from_utf8_lossy(e.as_bytes()).into_owned()
            }
        };
        out.insert(key, content);
    }
    Ok(())
}

/// Flag milestone references `M<n>` with `n` outside 1-20. Each distinct
/// reference is reported once, in order of first appearance.
pub fn check_id_schema(content: &str) -> Vec<String> {
    let mut issues: Vec<String> = Vec::new();
    for caps in milestone_ref_re().captures_iter(content) {
        let usual = caps[1]
            .parse::<u64>()
            .is_ok_and(|n| MILESTONE_RANGE.contains(&n));
        if usual {
            continue;
        }
        let msg = format!("Unusual milestone number: M{}", &caps[1]);
        if !issues.contains(&msg) {
            issues.push(msg);
        }
    }
    issues
}

// ---------------------------------------------------------------------------
// Completion gate
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ValidationStatus {
    Pass,
    Revise,
    Reject,
    Skipped,
}

impl From<Decision> for ValidationStatus {
    fn from(d: Decision) -> Self {
        match d {
            Decision::Pass => ValidationStatus::Pass,
            Decision::Revise => ValidationStatus::Revise,
            Decision::Reject => ValidationStatus::Reject,
        }
    }
}

impl fmt::Display for ValidationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ValidationStatus::Pass => "PASS",
            ValidationStatus::Revise => "REVISE",
            ValidationStatus::Reject => "REJECT",
            ValidationStatus::Skipped => "SKIPPED",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "action")]
pub enum GateOutcome {
    Proceed,
    ProceedWithWarning { warning: String },
    /// Generated files are kept, renamed to `<file>.draft`, when
    /// `preserve_drafts` is set.
    Stop { reason: String, preserve_drafts: bool },
}

impl GateOutcome {
    pub fn proceeds(&self) -> bool {
        !matches!(self, GateOutcome::Stop { .. })
    }
}

pub fn completion_gate(status: ValidationStatus, user_accepted: bool, no_validate: bool) -> GateOutcome {
    match status {
        ValidationStatus::Pass => GateOutcome::Proceed,
        ValidationStatus::Revise if user_accepted => GateOutcome::ProceedWithWarning {
            warning: "validation returned REVISE; accepted by user".to_string(),
        },
        ValidationStatus::Revise => GateOutcome::Stop {
            reason: "validation returned REVISE; user acceptance required".to_string(),
            preserve_drafts: true,
        },
        ValidationStatus::Reject => GateOutcome::Stop {
            reason: "validation returned REJECT".to_string(),
            preserve_drafts: true,
        },
        ValidationStatus::Skipped if no_validate => GateOutcome::Proceed,
        ValidationStatus::Skipped => GateOutcome::Stop {
            reason: "validation was skipped without being disabled".to_string(),
            preserve_drafts: false,
        },
    }
}

/// `roadmap.md` → `roadmap.md.draft`.
pub fn draft_name(name: &str) -> String {
    format!("{name}{DRAFT_SUFFIX}")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
