//! Requirement extraction and the specification validation policy.
//!
//! Extraction never fails: a document without matches yields empty
//! sequences. Whether that is acceptable is decided by [`validate_spec`],
//! which callers run before handing the extraction to later stages.

use crate::config::WarnLevel;
use crate::error::RoadmapError;
use crate::types::RequirementKind;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Content must be strictly longer than this many characters.
pub const MIN_CONTENT_LEN: usize = 100;

// ---------------------------------------------------------------------------
// Patterns
// ---------------------------------------------------------------------------

static TITLE_RE: OnceLock<Regex> = OnceLock::new();
static REQUIREMENT_RE: OnceLock<Regex> = OnceLock::new();
static REQUIREMENT_PRESENCE_RE: OnceLock<Regex> = OnceLock::new();
static IN_SCOPE_RE: OnceLock<Regex> = OnceLock::new();
static OUT_SCOPE_RE: OnceLock<Regex> = OnceLock::new();
static DEPENDENCIES_RE: OnceLock<Regex> = OnceLock::new();
static BULLET_RE: OnceLock<Regex> = OnceLock::new();
static RISK_RE: OnceLock<Regex> = OnceLock::new();
static CRITERIA_RE: OnceLock<Regex> = OnceLock::new();

fn title_re() -> &'static Regex {
    TITLE_RE.get_or_init(|| Regex::new(r"(?m)^# (.+)$").unwrap())
}

fn requirement_re() -> &'static Regex {
    REQUIREMENT_RE.get_or_init(|| {
        Regex::new(r"(?m)^[ \t]*(?:#{2,6}[ \t]+|[-*][ \t]+)?(N?FR)-(\d{3}):[ \t]*(.+)$").unwrap()
    })
}

fn requirement_presence_re() -> &'static Regex {
    REQUIREMENT_PRESENCE_RE.get_or_init(|| {
        Regex::new(
            r"(?m)^(?:## Requirements|## Functional Requirements|## FR-|## NFR-|- FR-\d{3}:|- NFR-\d{3}:)",
        )
        .unwrap()
    })
}

fn in_scope_re() -> &'static Regex {
    IN_SCOPE_RE.get_or_init(|| Regex::new(r"(?m)^#{2,3} In Scope").unwrap())
}

fn out_scope_re() -> &'static Regex {
    OUT_SCOPE_RE.get_or_init(|| Regex::new(r"(?m)^#{2,3} Out of Scope").unwrap())
}

fn dependencies_re() -> &'static Regex {
    DEPENDENCIES_RE.get_or_init(|| Regex::new(r"^#{2,3} Dependencies\b").unwrap())
}

fn bullet_re() -> &'static Regex {
    BULLET_RE.get_or_init(|| Regex::new(r"^[ \t]*[-*][ \t]+(.+)$").unwrap())
}

fn risk_re() -> &'static Regex {
    RISK_RE.get_or_init(|| Regex::new(r"\bR-(\d{3})\b").unwrap())
}

fn criteria_re() -> &'static Regex {
    CRITERIA_RE.get_or_init(|| Regex::new(r"(?m)^[ \t]*- \[ \] (.+)$").unwrap())
}

// ---------------------------------------------------------------------------
// Requirement
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirement {
    pub id: String,
    pub kind: RequirementKind,
    pub description: String,
}

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extraction {
    pub title: String,
    /// False when `title` is the caller's placeholder.
    pub has_title: bool,
    /// Functional and non-functional requirements in document order.
    pub requirements: Vec<Requirement>,
    pub has_in_scope: bool,
    pub has_out_of_scope: bool,
    pub dependencies: Vec<String>,
    pub risks: Vec<String>,
    pub success_criteria: Vec<String>,
}

impl Extraction {
    pub fn functional(&self) -> impl Iterator<Item = &Requirement> {
        self.of_kind(RequirementKind::Functional)
    }

    pub fn non_functional(&self) -> impl Iterator<Item = &Requirement> {
        self.of_kind(RequirementKind::NonFunctional)
    }

    fn of_kind(&self, kind: RequirementKind) -> impl Iterator<Item = &Requirement> {
        self.requirements.iter().filter(move |r| r.kind == kind)
    }

    pub fn requirement_count(&self) -> usize {
        self.requirements.len()
    }

    pub fn has_scope_boundaries(&self) -> bool {
        self.has_in_scope && self.has_out_of_scope
    }
}

/// Extract every structured element from a specification document.
/// `fallback_title` is used verbatim when the document has no `# ` heading.
pub fn extract(content: &str, fallback_title: &str) -> Extraction {
    let heading = title_re()
        .captures(content)
        .map(|c| c[1].trim().to_string())
        .filter(|t| !t.is_empty());

    let requirements = requirement_re()
        .captures_iter(content)
        .map(|c| {
            let kind = if &c[1] == "NFR" {
                RequirementKind::NonFunctional
            } else {
                RequirementKind::Functional
            };
            Requirement {
                id: format!("{}-{}", kind.prefix(), &c[2]),
                kind,
                description: c[3].trim().to_string(),
            }
        })
        .collect();

    let risks = risk_re()
        .captures_iter(content)
        .map(|c| format!("R-{}", &c[1]))
        .collect();

    let success_criteria = criteria_re()
        .captures_iter(content)
        .map(|c| c[1].trim().to_string())
        .collect();

    Extraction {
        has_title: heading.is_some(),
        title: heading.unwrap_or_else(|| fallback_title.to_string()),
        requirements,
        has_in_scope: in_scope_re().is_match(content),
        has_out_of_scope: out_scope_re().is_match(content),
        dependencies: dependency_items(content),
        risks,
        success_criteria,
    }
}

/// Bullet items under a `## Dependencies` heading, up to the next heading.
fn dependency_items(content: &str) -> Vec<String> {
    let mut items = Vec::new();
    let mut in_section = false;
    for line in content.lines() {
        if line.starts_with('#') {
            in_section = dependencies_re().is_match(line);
            continue;
        }
        if in_section {
            if let Some(c) = bullet_re().captures(line) {
                let item = c[1].trim();
                if !item.is_empty() {
                    items.push(item.to_string());
                }
            }
        }
    }
    items
}

// ---------------------------------------------------------------------------
// Validation policy
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    SpecEmpty,
    SpecTooShort,
    NoTitleFound,
    NoRequirementsFound,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecIssue {
    pub kind: IssueKind,
    pub level: WarnLevel,
    pub message: String,
}

impl SpecIssue {
    fn new(kind: IssueKind, level: WarnLevel, err: RoadmapError) -> Self {
        Self {
            kind,
            level,
            message: err.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecReport {
    pub length: usize,
    pub issues: Vec<SpecIssue>,
}

impl SpecReport {
    /// True when no error-level issue was found. Warnings do not block.
    pub fn is_ok(&self) -> bool {
        self.first_error().is_none()
    }

    pub fn first_error(&self) -> Option<&SpecIssue> {
        self.issues.iter().find(|i| i.level == WarnLevel::Error)
    }

    pub fn has(&self, kind: IssueKind) -> bool {
        self.issues.iter().any(|i| i.kind == kind)
    }

    /// The first error-level issue as a [`RoadmapError`], for callers that
    /// must stop before scoring.
    pub fn blocking_error(&self) -> Option<RoadmapError> {
        self.first_error().map(|issue| match issue.kind {
            IssueKind::SpecEmpty => RoadmapError::SpecEmpty,
            IssueKind::SpecTooShort => RoadmapError::SpecTooShort {
                len: self.length,
                min: MIN_CONTENT_LEN,
            },
            IssueKind::NoTitleFound => RoadmapError::NoTitleFound,
            IssueKind::NoRequirementsFound => RoadmapError::NoRequirementsFound,
        })
    }
}

/// Run the ordered content checks: non-empty, minimum length (warning),
/// title heading (warning), at least one requirement pattern (error).
/// An empty document stops after the first check.
pub fn validate_spec(content: &str) -> SpecReport {
    let length = content.chars().count();
    let mut issues = Vec::new();

    if content.trim().is_empty() {
        issues.push(SpecIssue::new(
            IssueKind::SpecEmpty,
            WarnLevel::Error,
            RoadmapError::SpecEmpty,
        ));
        return SpecReport { length, issues };
    }

    if length <= MIN_CONTENT_LEN {
        issues.push(SpecIssue::new(
            IssueKind::SpecTooShort,
            WarnLevel::Warning,
            RoadmapError::SpecTooShort {
                len: length,
                min: MIN_CONTENT_LEN,
            },
        ));
    }

    if !title_re().is_match(content) {
        issues.push(SpecIssue::new(
            IssueKind::NoTitleFound,
            WarnLevel::Warning,
            RoadmapError::NoTitleFound,
        ));
    }

    if !requirement_presence_re().is_match(content) && !requirement_re().is_match(content) {
        issues.push(SpecIssue::new(
            IssueKind::NoRequirementsFound,
            WarnLevel::Error,
            RoadmapError::NoRequirementsFound,
        ));
    }

    SpecReport { length, issues }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
