use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// RequirementKind
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequirementKind {
    Functional,
    NonFunctional,
}

impl RequirementKind {
    /// ID prefix used in specification documents.
    pub fn prefix(self) -> &'static str {
        match self {
            RequirementKind::Functional => "FR",
            RequirementKind::NonFunctional => "NFR",
        }
    }

    /// Format a sequence number as a zero-padded requirement ID (`FR-007`).
    pub fn id(self, seq: u32) -> String {
        format!("{}-{:03}", self.prefix(), seq)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RequirementKind::Functional => "functional",
            RequirementKind::NonFunctional => "non_functional",
        }
    }
}

impl fmt::Display for RequirementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Tier
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Tier {
    Low,
    Medium,
    High,
}

impl Tier {
    pub fn all() -> &'static [Tier] {
        &[Tier::Low, Tier::Medium, Tier::High]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Low => "LOW",
            Tier::Medium => "MEDIUM",
            Tier::High => "HIGH",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Decision
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Decision {
    Pass,
    Revise,
    Reject,
}

impl Decision {
    pub fn as_str(self) -> &'static str {
        match self {
            Decision::Pass => "PASS",
            Decision::Revise => "REVISE",
            Decision::Reject => "REJECT",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// TemplateSource
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateSource {
    Local,
    User,
    Plugin,
    Inline,
}

impl TemplateSource {
    /// Discovery order, highest priority first.
    pub fn all() -> &'static [TemplateSource] {
        &[
            TemplateSource::Local,
            TemplateSource::User,
            TemplateSource::Plugin,
            TemplateSource::Inline,
        ]
    }

    /// Lower number wins.
    pub fn priority(self) -> u8 {
        match self {
            TemplateSource::Local => 1,
            TemplateSource::User => 2,
            TemplateSource::Plugin => 3,
            TemplateSource::Inline => 4,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TemplateSource::Local => "local",
            TemplateSource::User => "user",
            TemplateSource::Plugin => "plugin",
            TemplateSource::Inline => "inline",
        }
    }
}

impl fmt::Display for TemplateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requirement_ids_are_zero_padded() {
        assert_eq!(RequirementKind::Functional.id(3), "FR-003");
        assert_eq!(RequirementKind::NonFunctional.id(12), "NFR-012");
    }

    #[test]
    fn tier_serializes_uppercase() {
        let json = serde_json::to_string(&Tier::Medium).unwrap();
        assert_eq!(json, "\"MEDIUM\"");
        let parsed: Tier = serde_json::from_str("\"HIGH\"").unwrap();
        assert_eq!(parsed, Tier::High);
    }

    #[test]
    fn decision_labels() {
        assert_eq!(Decision::Pass.to_string(), "PASS");
        assert_eq!(Decision::Revise.to_string(), "REVISE");
        assert_eq!(Decision::Reject.to_string(), "REJECT");
    }

    #[test]
    fn template_source_priorities_are_ordered() {
        let priorities: Vec<u8> = TemplateSource::all().iter().map(|s| s.priority()).collect();
        assert_eq!(priorities, vec![1, 2, 3, 4]);
        assert_eq!(TemplateSource::Inline.as_str(), "inline");
    }
}
