use crate::error::{Result, RoadmapError};
use crate::paths;
use crate::types::{TemplateSource, Tier};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

const WEIGHT_TOLERANCE: f64 = 1e-6;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

impl ConfigWarning {
    fn error(message: impl Into<String>) -> Self {
        Self {
            level: WarnLevel::Error,
            message: message.into(),
        }
    }

    fn warning(message: impl Into<String>) -> Self {
        Self {
            level: WarnLevel::Warning,
            message: message.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// DomainRule
// ---------------------------------------------------------------------------

/// One classification domain together with everything keyed on it: the
/// keyword set, its signal weight, and the persona / template type /
/// required milestone it maps to.
///
/// Declaration order is significant. It is the canonical tie-break order
/// for persona selection and template typing, and the emission order of
/// required milestones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainRule {
    pub name: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default = "default_domain_weight")]
    pub weight: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persona: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub milestone: Option<String>,
}

fn default_domain_weight() -> f64 {
    1.0
}

fn domain(
    name: &str,
    weight: f64,
    keywords: &[&str],
    persona: &str,
    template: &str,
    milestone: Option<&str>,
) -> DomainRule {
    DomainRule {
        name: name.to_string(),
        keywords: keywords.iter().map(|k| k.to_string()).collect(),
        weight,
        persona: Some(persona.to_string()),
        template: Some(template.to_string()),
        milestone: milestone.map(str::to_string),
    }
}

fn default_domains() -> Vec<DomainRule> {
    vec![
        domain(
            "frontend",
            1.0,
            &[
                "UI",
                "components",
                "UX",
                "accessibility",
                "responsive",
                "React",
                "Vue",
                "Angular",
                "CSS",
                "HTML",
                "component",
                "layout",
                "design",
                "user interface",
                "form",
                "button",
                "modal",
            ],
            "frontend",
            "feature-release",
            Some("UX Validation"),
        ),
        domain(
            "backend",
            1.0,
            &[
                "API",
                "database",
                "services",
                "infrastructure",
                "server",
                "endpoint",
                "REST",
                "GraphQL",
                "microservices",
                "authentication",
                "middleware",
                "controller",
                "model",
                "repository",
            ],
            "backend",
            "feature-release",
            Some("API Specification"),
        ),
        domain(
            "security",
            1.2,
            &[
                "auth",
                "encryption",
                "compliance",
                "vulnerabilities",
                "tokens",
                "OAuth",
                "JWT",
                "RBAC",
                "permissions",
                "audit",
                "penetration",
                "OWASP",
                "security",
                "authorization",
                "credentials",
            ],
            "security",
            "security-release",
            Some("Security Audit"),
        ),
        domain(
            "performance",
            1.0,
            &[
                "optimization",
                "caching",
                "scaling",
                "latency",
                "throughput",
                "CDN",
                "load balancing",
                "profiling",
                "benchmark",
                "memory",
                "CPU",
                "response time",
            ],
            "performance",
            "performance-release",
            Some("Performance Baseline"),
        ),
        domain(
            "documentation",
            0.8,
            &[
                "guides",
                "references",
                "migration",
                "docs",
                "README",
                "wiki",
                "tutorial",
                "manual",
                "specification",
                "documentation",
            ],
            "scribe",
            "documentation-release",
            None,
        ),
    ]
}

// ---------------------------------------------------------------------------
// ClassifierConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// A domain counts toward `domain_spread` when its share is strictly
    /// above this percentage.
    #[serde(default = "default_materiality")]
    pub materiality_threshold: f64,
}

fn default_materiality() -> f64 {
    10.0
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            materiality_threshold: default_materiality(),
        }
    }
}

// ---------------------------------------------------------------------------
// RangeTable
// ---------------------------------------------------------------------------

/// An inclusive integer range `[low, high]` scored as `score`.
/// `high: None` means open-ended.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreRange {
    pub low: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high: Option<u32>,
    pub score: f64,
}

impl ScoreRange {
    pub fn contains(&self, value: u32) -> bool {
        value >= self.low && self.high.map_or(true, |h| value <= h)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RangeTable {
    pub ranges: Vec<ScoreRange>,
}

impl RangeTable {
    pub fn new(ranges: Vec<ScoreRange>) -> Self {
        Self { ranges }
    }

    /// Score for `value`. Values above the highest closed range get the top
    /// score; a validated table never reaches that branch.
    pub fn lookup(&self, value: u32) -> f64 {
        if let Some(r) = self.ranges.iter().find(|r| r.contains(value)) {
            return r.score;
        }
        match (self.ranges.first(), self.ranges.last()) {
            (Some(first), _) if value < first.low => first.score,
            (_, Some(last)) => last.score,
            _ => 0.0,
        }
    }

    /// Exhaustiveness and non-overlap problems, one message per defect.
    pub fn problems(&self, name: &str) -> Vec<String> {
        let mut out = Vec::new();
        let Some(first) = self.ranges.first() else {
            out.push(format!("{name}: range table is empty"));
            return out;
        };
        if first.low != 0 {
            out.push(format!(
                "{name}: first range starts at {} (must start at 0)",
                first.low
            ));
        }
        for (i, r) in self.ranges.iter().enumerate() {
            if !(0.0..=1.0).contains(&r.score) {
                out.push(format!("{name}: score {} outside [0, 1]", r.score));
            }
            if let Some(high) = r.high {
                if high < r.low {
                    out.push(format!("{name}: range {}-{high} is inverted", r.low));
                }
            }
            let is_last = i + 1 == self.ranges.len();
            match (r.high, self.ranges.get(i + 1)) {
                (None, Some(_)) => out.push(format!(
                    "{name}: open-ended range at {} must be the last range",
                    r.low
                )),
                (Some(high), Some(next)) if next.low != high.saturating_add(1) => {
                    let what = if next.low <= high { "overlaps" } else { "leaves a gap before" };
                    out.push(format!(
                        "{name}: range ending at {high} {what} range starting at {}",
                        next.low
                    ));
                }
                (Some(high), None) if is_last => out.push(format!(
                    "{name}: last range ends at {high} (must be open-ended)"
                )),
                _ => {}
            }
        }
        out
    }
}

fn range(low: u32, high: Option<u32>, score: f64) -> ScoreRange {
    ScoreRange { low, high, score }
}

// ---------------------------------------------------------------------------
// LabelTable
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelScore {
    pub label: String,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelTable {
    pub labels: Vec<LabelScore>,
    /// Score used when a label is missing from the table.
    #[serde(default = "default_label_fallback")]
    pub fallback: f64,
}

fn default_label_fallback() -> f64 {
    0.5
}

impl LabelTable {
    fn new(labels: &[(&str, f64)]) -> Self {
        Self {
            labels: labels
                .iter()
                .map(|(label, score)| LabelScore {
                    label: label.to_string(),
                    score: *score,
                })
                .collect(),
            fallback: default_label_fallback(),
        }
    }

    pub fn lookup(&self, label: &str) -> Result<f64> {
        self.labels
            .iter()
            .find(|l| l.label == label)
            .map(|l| l.score)
            .ok_or_else(|| RoadmapError::ParseFailure(format!("unknown label '{label}'")))
    }

    pub fn contains(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l.label == label)
    }

    pub fn problems(&self, name: &str) -> Vec<String> {
        let mut out = Vec::new();
        if self.labels.is_empty() {
            out.push(format!("{name}: label table is empty"));
        }
        let mut seen = HashSet::new();
        for l in &self.labels {
            if !seen.insert(l.label.as_str()) {
                out.push(format!("{name}: duplicate label '{}'", l.label));
            }
            if !(0.0..=1.0).contains(&l.score) {
                out.push(format!("{name}: label '{}' score {} outside [0, 1]", l.label, l.score));
            }
        }
        if !(0.0..=1.0).contains(&self.fallback) {
            out.push(format!("{name}: fallback {} outside [0, 1]", self.fallback));
        }
        out
    }
}

// ---------------------------------------------------------------------------
// ComplexityConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeFactor {
    pub weight: f64,
    pub scoring: RangeTable,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelFactor {
    pub weight: f64,
    pub scoring: LabelTable,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplexityConfig {
    #[serde(default = "default_requirement_count")]
    pub requirement_count: RangeFactor,
    #[serde(default = "default_dependency_depth")]
    pub dependency_depth: RangeFactor,
    #[serde(default = "default_domain_spread")]
    pub domain_spread: RangeFactor,
    #[serde(default = "default_risk_severity")]
    pub risk_severity: LabelFactor,
    #[serde(default = "default_scope_size")]
    pub scope_size: LabelFactor,
    /// Scores below this are LOW.
    #[serde(default = "default_low_threshold")]
    pub low_threshold: f64,
    /// Scores above this are HIGH. Both thresholds are inclusive toward MEDIUM.
    #[serde(default = "default_high_threshold")]
    pub high_threshold: f64,
}

fn default_requirement_count() -> RangeFactor {
    RangeFactor {
        weight: 0.25,
        scoring: RangeTable::new(vec![
            range(0, Some(5), 0.2),
            range(6, Some(10), 0.4),
            range(11, Some(20), 0.6),
            range(21, Some(35), 0.8),
            range(36, None, 1.0),
        ]),
    }
}

fn default_dependency_depth() -> RangeFactor {
    RangeFactor {
        weight: 0.25,
        scoring: RangeTable::new(vec![
            range(0, Some(0), 0.1),
            range(1, Some(2), 0.3),
            range(3, Some(5), 0.5),
            range(6, Some(10), 0.7),
            range(11, None, 1.0),
        ]),
    }
}

fn default_domain_spread() -> RangeFactor {
    RangeFactor {
        weight: 0.20,
        scoring: RangeTable::new(vec![
            range(0, Some(1), 0.2),
            range(2, Some(2), 0.4),
            range(3, Some(3), 0.6),
            range(4, Some(4), 0.8),
            range(5, None, 1.0),
        ]),
    }
}

fn default_risk_severity() -> LabelFactor {
    LabelFactor {
        weight: 0.15,
        scoring: LabelTable::new(&[
            ("no_risks", 0.1),
            ("low_risks_only", 0.3),
            ("medium_risks", 0.5),
            ("high_risks", 0.7),
            ("critical_risks", 1.0),
        ]),
    }
}

fn default_scope_size() -> LabelFactor {
    LabelFactor {
        weight: 0.15,
        scoring: LabelTable::new(&[
            ("small", 0.2),
            ("medium", 0.4),
            ("large", 0.6),
            ("xlarge", 0.8),
            ("massive", 1.0),
        ]),
    }
}

fn default_low_threshold() -> f64 {
    0.4
}

fn default_high_threshold() -> f64 {
    0.7
}

impl Default for ComplexityConfig {
    fn default() -> Self {
        Self {
            requirement_count: default_requirement_count(),
            dependency_depth: default_dependency_depth(),
            domain_spread: default_domain_spread(),
            risk_severity: default_risk_severity(),
            scope_size: default_scope_size(),
            low_threshold: default_low_threshold(),
            high_threshold: default_high_threshold(),
        }
    }
}

impl ComplexityConfig {
    pub fn weight_sum(&self) -> f64 {
        self.requirement_count.weight
            + self.dependency_depth.weight
            + self.domain_spread.weight
            + self.risk_severity.weight
            + self.scope_size.weight
    }

    /// `< low → LOW`, `low..=high → MEDIUM`, `> high → HIGH`.
    pub fn tier(&self, score: f64) -> Tier {
        if score < self.low_threshold {
            Tier::Low
        } else if score <= self.high_threshold {
            Tier::Medium
        } else {
            Tier::High
        }
    }
}

// ---------------------------------------------------------------------------
// PersonaConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonaConfig {
    #[serde(default = "default_primary_threshold")]
    pub primary_threshold: f64,
    #[serde(default = "default_consulting_threshold")]
    pub consulting_threshold: f64,
    #[serde(default = "default_fallback_persona")]
    pub fallback: String,
}

fn default_primary_threshold() -> f64 {
    40.0
}

fn default_consulting_threshold() -> f64 {
    15.0
}

fn default_fallback_persona() -> String {
    "architect".to_string()
}

impl Default for PersonaConfig {
    fn default() -> Self {
        Self {
            primary_threshold: default_primary_threshold(),
            consulting_threshold: default_consulting_threshold(),
            fallback: default_fallback_persona(),
        }
    }
}

// ---------------------------------------------------------------------------
// TemplateConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateLocation {
    pub source: TemplateSource,
    /// `~/` is expanded against the user's home directory.
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateConfig {
    /// Searched in priority order. Inline generation is implicit and always last.
    #[serde(default = "default_locations")]
    pub locations: Vec<TemplateLocation>,
    #[serde(default = "default_template_type")]
    pub default_type: String,
    #[serde(default = "default_known_types")]
    pub known_types: Vec<String>,
}

fn default_locations() -> Vec<TemplateLocation> {
    vec![
        TemplateLocation {
            source: TemplateSource::Local,
            path: paths::LOCAL_TEMPLATES_DIR.to_string(),
        },
        TemplateLocation {
            source: TemplateSource::User,
            path: paths::USER_TEMPLATES_DIR.to_string(),
        },
        TemplateLocation {
            source: TemplateSource::Plugin,
            path: paths::PLUGIN_TEMPLATES_DIR.to_string(),
        },
    ]
}

fn default_template_type() -> String {
    "feature-release".to_string()
}

fn default_known_types() -> Vec<String> {
    [
        "feature-release",
        "quality-release",
        "documentation-release",
        "security-release",
        "performance-release",
        "migration-release",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            locations: default_locations(),
            default_type: default_template_type(),
            known_types: default_known_types(),
        }
    }
}

// ---------------------------------------------------------------------------
// MilestoneConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountRange {
    pub min: u32,
    pub max: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MilestoneConfig {
    #[serde(default = "default_low_count")]
    pub low: CountRange,
    #[serde(default = "default_medium_count")]
    pub medium: CountRange,
    #[serde(default = "default_high_count")]
    pub high: CountRange,
    /// A domain at or above this share forces its named milestone.
    #[serde(default = "default_required_threshold")]
    pub required_threshold: f64,
}

fn default_low_count() -> CountRange {
    CountRange { min: 3, max: 4 }
}

fn default_medium_count() -> CountRange {
    CountRange { min: 4, max: 6 }
}

fn default_high_count() -> CountRange {
    CountRange { min: 5, max: 8 }
}

fn default_required_threshold() -> f64 {
    40.0
}

impl Default for MilestoneConfig {
    fn default() -> Self {
        Self {
            low: default_low_count(),
            medium: default_medium_count(),
            high: default_high_count(),
            required_threshold: default_required_threshold(),
        }
    }
}

impl MilestoneConfig {
    pub fn count_for(&self, tier: Tier) -> CountRange {
        match tier {
            Tier::Low => self.low,
            Tier::Medium => self.medium,
            Tier::High => self.high,
        }
    }
}

// ---------------------------------------------------------------------------
// ValidationConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationConfig {
    #[serde(default = "default_quality_weight")]
    pub quality_weight: f64,
    #[serde(default = "default_review_weight")]
    pub review_weight: f64,
    /// Final scores at or above this pass.
    #[serde(default = "default_pass_threshold")]
    pub pass_threshold: u32,
    /// Final scores at or above this (and below `pass_threshold`) are revised.
    #[serde(default = "default_revise_threshold")]
    pub revise_threshold: u32,
    #[serde(default = "default_parse_failure_score")]
    pub parse_failure_score: u32,
    #[serde(default = "default_timeout_score")]
    pub timeout_score: u32,
    #[serde(default = "default_max_revise_iterations")]
    pub max_revise_iterations: u32,
}

fn default_quality_weight() -> f64 {
    0.60
}

fn default_review_weight() -> f64 {
    0.40
}

fn default_pass_threshold() -> u32 {
    85
}

fn default_revise_threshold() -> u32 {
    70
}

fn default_parse_failure_score() -> u32 {
    50
}

fn default_timeout_score() -> u32 {
    60
}

fn default_max_revise_iterations() -> u32 {
    2
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            quality_weight: default_quality_weight(),
            review_weight: default_review_weight(),
            pass_threshold: default_pass_threshold(),
            revise_threshold: default_revise_threshold(),
            parse_failure_score: default_parse_failure_score(),
            timeout_score: default_timeout_score(),
            max_revise_iterations: default_max_revise_iterations(),
        }
    }
}

// ---------------------------------------------------------------------------
// DefaultsConfig
// ---------------------------------------------------------------------------

/// Labels used when the caller does not supply a risk severity or scope size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default = "default_risk_label")]
    pub risk_severity: String,
    #[serde(default = "default_scope_label")]
    pub scope_size: String,
}

fn default_risk_label() -> String {
    "medium_risks".to_string()
}

fn default_scope_label() -> String {
    "medium".to_string()
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            risk_severity: default_risk_label(),
            scope_size: default_scope_label(),
        }
    }
}

// ---------------------------------------------------------------------------
// PipelineConfig (top-level)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default = "default_domains")]
    pub domains: Vec<DomainRule>,
    #[serde(default)]
    pub classifier: ClassifierConfig,
    #[serde(default)]
    pub complexity: ComplexityConfig,
    #[serde(default)]
    pub personas: PersonaConfig,
    #[serde(default)]
    pub templates: TemplateConfig,
    #[serde(default)]
    pub milestones: MilestoneConfig,
    #[serde(default)]
    pub validation: ValidationConfig,
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

fn default_version() -> u32 {
    1
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            domains: default_domains(),
            classifier: ClassifierConfig::default(),
            complexity: ComplexityConfig::default(),
            personas: PersonaConfig::default(),
            templates: TemplateConfig::default(),
            milestones: MilestoneConfig::default(),
            validation: ValidationConfig::default(),
            defaults: DefaultsConfig::default(),
        }
    }
}

impl PipelineConfig {
    pub fn domain(&self, name: &str) -> Option<&DomainRule> {
        self.domains.iter().find(|d| d.name == name)
    }

    /// Parse YAML and reject configurations with error-level problems.
    pub fn from_yaml(data: &str) -> Result<Self> {
        let cfg: PipelineConfig = serde_yaml::from_str(data)?;
        cfg.ensure_valid()?;
        Ok(cfg)
    }

    /// Load from an explicit path. A missing file is an error.
    pub fn load(path: &Path) -> Result<Self> {
        let cfg = Self::read_unchecked(path)?;
        cfg.ensure_valid()?;
        tracing::debug!(path = %path.display(), domains = cfg.domains.len(), "loaded pipeline config");
        Ok(cfg)
    }

    /// Parse a config file without rejecting invalid tables, so every
    /// problem can be reported.
    pub fn read_unchecked(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(RoadmapError::ConfigNotFound(path.to_path_buf()));
        }
        let data = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&data)?)
    }

    /// Load `<root>/.roadmap/config.yaml`, or the built-in tables when the
    /// project has none.
    pub fn load_or_default(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if path.exists() {
            Self::load(&path)
        } else {
            tracing::debug!(root = %root.display(), "no config file, using built-in tables");
            Ok(Self::default())
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(path, data.as_bytes())
    }

    /// Fail with `InvalidConfig` when any error-level problem is present.
    pub fn ensure_valid(&self) -> Result<()> {
        let errors: Vec<String> = self
            .validate()
            .into_iter()
            .filter(|w| w.level == WarnLevel::Error)
            .map(|w| w.message)
            .collect();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(RoadmapError::InvalidConfig(errors.join("; ")))
        }
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        // 1. Domains
        if self.domains.is_empty() {
            warnings.push(ConfigWarning::error("no domains configured"));
        }
        let mut names = HashSet::new();
        for d in &self.domains {
            if !names.insert(d.name.as_str()) {
                warnings.push(ConfigWarning::error(format!("duplicate domain '{}'", d.name)));
            }
            if !(d.weight.is_finite() && d.weight > 0.0) {
                warnings.push(ConfigWarning::error(format!(
                    "domain '{}' has non-positive weight {}",
                    d.name, d.weight
                )));
            }
            if d.keywords.is_empty() {
                warnings.push(ConfigWarning::warning(format!(
                    "domain '{}' has no keywords and can never match",
                    d.name
                )));
            }
            if d.keywords.iter().any(|k| k.trim().is_empty()) {
                warnings.push(ConfigWarning::error(format!(
                    "domain '{}' has an empty keyword",
                    d.name
                )));
            }
            if let Some(t) = &d.template {
                if !self.templates.known_types.contains(t) {
                    warnings.push(ConfigWarning::warning(format!(
                        "domain '{}' maps to unknown template type '{t}'",
                        d.name
                    )));
                }
            }
        }

        // 2. Complexity factors
        let c = &self.complexity;
        let sum = c.weight_sum();
        if (sum - 1.0).abs() > WEIGHT_TOLERANCE {
            warnings.push(ConfigWarning::error(format!(
                "complexity factor weights sum to {sum:.4} (must be 1.0)"
            )));
        }
        for (name, factor) in [
            ("requirement_count", &c.requirement_count),
            ("dependency_depth", &c.dependency_depth),
            ("domain_spread", &c.domain_spread),
        ] {
            warnings.extend(factor.scoring.problems(name).into_iter().map(ConfigWarning::error));
        }
        for (name, factor) in [("risk_severity", &c.risk_severity), ("scope_size", &c.scope_size)] {
            warnings.extend(factor.scoring.problems(name).into_iter().map(ConfigWarning::error));
        }
        if !(0.0 <= c.low_threshold && c.low_threshold <= c.high_threshold && c.high_threshold <= 1.0) {
            warnings.push(ConfigWarning::error(format!(
                "tier thresholds must satisfy 0 <= low ({}) <= high ({}) <= 1",
                c.low_threshold, c.high_threshold
            )));
        }

        // 3. Personas
        let p = &self.personas;
        if !(0.0 <= p.consulting_threshold
            && p.consulting_threshold <= p.primary_threshold
            && p.primary_threshold <= 100.0)
        {
            warnings.push(ConfigWarning::error(format!(
                "persona thresholds must satisfy 0 <= consulting ({}) <= primary ({}) <= 100",
                p.consulting_threshold, p.primary_threshold
            )));
        }
        if p.fallback.trim().is_empty() {
            warnings.push(ConfigWarning::error("fallback persona is empty"));
        }

        // 4. Template locations
        let mut sources = HashSet::new();
        for loc in &self.templates.locations {
            if loc.source == TemplateSource::Inline {
                warnings.push(ConfigWarning::error(
                    "inline is implicit and must not be listed in templates.locations",
                ));
            }
            if !sources.insert(loc.source) {
                warnings.push(ConfigWarning::error(format!(
                    "template source '{}' listed more than once",
                    loc.source
                )));
            }
        }

        // 5. Milestone ranges
        for tier in Tier::all() {
            let r = self.milestones.count_for(*tier);
            if r.min > r.max {
                warnings.push(ConfigWarning::error(format!(
                    "milestone range for {tier} is inverted ({}-{})",
                    r.min, r.max
                )));
            }
        }

        // 6. Validation aggregator
        let v = &self.validation;
        let vsum = v.quality_weight + v.review_weight;
        if (vsum - 1.0).abs() > WEIGHT_TOLERANCE || v.quality_weight < 0.0 || v.review_weight < 0.0 {
            warnings.push(ConfigWarning::error(format!(
                "validation weights sum to {vsum:.4} (must be 1.0, each non-negative)"
            )));
        }
        if !(v.revise_threshold <= v.pass_threshold && v.pass_threshold <= 100) {
            warnings.push(ConfigWarning::error(format!(
                "decision thresholds must satisfy revise ({}) <= pass ({}) <= 100",
                v.revise_threshold, v.pass_threshold
            )));
        }
        if v.parse_failure_score > 100 || v.timeout_score > 100 {
            warnings.push(ConfigWarning::error("default reviewer scores must be within 0-100"));
        }

        // 7. Default labels must resolve
        if !c.risk_severity.scoring.contains(&self.defaults.risk_severity) {
            warnings.push(ConfigWarning::warning(format!(
                "default risk severity '{}' is not in the risk_severity table",
                self.defaults.risk_severity
            )));
        }
        if !c.scope_size.scoring.contains(&self.defaults.scope_size) {
            warnings.push(ConfigWarning::warning(format!(
                "default scope size '{}' is not in the scope_size table",
                self.defaults.scope_size
            )));
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_is_valid() {
        let cfg = PipelineConfig::default();
        let warnings = cfg.validate();
        assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");
    }

    #[test]
    fn default_config_yaml_roundtrip() {
        let cfg = PipelineConfig::default();
        let yaml = serde_yaml::to_string(&cfg).unwrap();
        let parsed = PipelineConfig::from_yaml(&yaml).unwrap();
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let yaml = "version: 1\npersonas:\n  fallback: generalist\n";
        let cfg = PipelineConfig::from_yaml(yaml).unwrap();
        assert_eq!(cfg.personas.fallback, "generalist");
        assert_eq!(cfg.personas.primary_threshold, 40.0);
        assert_eq!(cfg.domains.len(), 5);
        assert_eq!(cfg.validation.pass_threshold, 85);
    }

    #[test]
    fn five_default_domains_with_weights() {
        let cfg = PipelineConfig::default();
        let names: Vec<&str> = cfg.domains.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["frontend", "backend", "security", "performance", "documentation"]
        );
        assert_eq!(cfg.domain("security").unwrap().weight, 1.2);
        assert_eq!(cfg.domain("documentation").unwrap().weight, 0.8);
        for d in ["frontend", "backend", "performance"] {
            assert_eq!(cfg.domain(d).unwrap().weight, 1.0);
        }
        for d in &cfg.domains {
            assert!(d.keywords.len() >= 5, "domain '{}' has too few keywords", d.name);
        }
    }

    #[test]
    fn documentation_maps_to_scribe_without_milestone() {
        let cfg = PipelineConfig::default();
        let doc = cfg.domain("documentation").unwrap();
        assert_eq!(doc.persona.as_deref(), Some("scribe"));
        assert!(doc.milestone.is_none());
    }

    #[test]
    fn complexity_weights_sum_to_one() {
        let cfg = ComplexityConfig::default();
        assert!((cfg.weight_sum() - 1.0).abs() < 0.001);
    }

    #[test]
    fn range_lookup_covers_zero_to_infinity() {
        let cfg = ComplexityConfig::default();
        for table in [
            &cfg.requirement_count.scoring,
            &cfg.dependency_depth.scoring,
            &cfg.domain_spread.scoring,
        ] {
            for v in (0..200).chain([u32::MAX]) {
                let s = table.lookup(v);
                assert!((0.1..=1.0).contains(&s), "score {s} for {v}");
            }
        }
    }

    #[test]
    fn requirement_count_ranges() {
        let t = default_requirement_count().scoring;
        assert_eq!(t.lookup(0), 0.2);
        assert_eq!(t.lookup(3), 0.2);
        assert_eq!(t.lookup(8), 0.4);
        assert_eq!(t.lookup(15), 0.6);
        assert_eq!(t.lookup(25), 0.8);
        assert_eq!(t.lookup(50), 1.0);
    }

    #[test]
    fn dependency_depth_ranges() {
        let t = default_dependency_depth().scoring;
        assert_eq!(t.lookup(0), 0.1);
        assert_eq!(t.lookup(2), 0.3);
        assert_eq!(t.lookup(4), 0.5);
        assert_eq!(t.lookup(7), 0.7);
        assert_eq!(t.lookup(15), 1.0);
    }

    #[test]
    fn closed_table_falls_back_to_top_score() {
        let t = RangeTable::new(vec![range(0, Some(2), 0.1), range(3, Some(4), 0.9)]);
        assert_eq!(t.lookup(100), 0.9);
        assert!(!t.problems("t").is_empty());
    }

    #[test]
    fn range_table_gap_detected() {
        let t = RangeTable::new(vec![range(0, Some(2), 0.1), range(4, None, 0.9)]);
        let problems = t.problems("gappy");
        assert!(problems.iter().any(|p| p.contains("gap")), "{problems:?}");
    }

    #[test]
    fn range_table_overlap_detected() {
        let t = RangeTable::new(vec![range(0, Some(5), 0.1), range(3, None, 0.9)]);
        let problems = t.problems("overlapping");
        assert!(problems.iter().any(|p| p.contains("overlaps")), "{problems:?}");
    }

    #[test]
    fn range_table_must_start_at_zero() {
        let t = RangeTable::new(vec![range(1, None, 0.5)]);
        assert!(t.problems("t").iter().any(|p| p.contains("must start at 0")));
    }

    #[test]
    fn open_range_in_middle_detected() {
        let t = RangeTable::new(vec![range(0, None, 0.5), range(3, None, 0.9)]);
        assert!(t.problems("t").iter().any(|p| p.contains("must be the last")));
    }

    #[test]
    fn label_lookup_unknown_is_parse_failure() {
        let t = default_scope_size().scoring;
        assert_eq!(t.lookup("large").unwrap(), 0.6);
        assert!(matches!(t.lookup("gigantic"), Err(RoadmapError::ParseFailure(_))));
    }

    #[test]
    fn bad_weights_rejected_at_load() {
        let yaml = r#"
complexity:
  requirement_count:
    weight: 0.5
    scoring:
      - { low: 0, score: 0.5 }
"#;
        let err = PipelineConfig::from_yaml(yaml).unwrap_err();
        match err {
            RoadmapError::InvalidConfig(msg) => assert!(msg.contains("weights sum")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn duplicate_domain_is_error() {
        let mut cfg = PipelineConfig::default();
        let dup = cfg.domains[0].clone();
        cfg.domains.push(dup);
        assert!(cfg
            .validate()
            .iter()
            .any(|w| w.level == WarnLevel::Error && w.message.contains("duplicate domain")));
    }

    #[test]
    fn inline_location_is_error() {
        let mut cfg = PipelineConfig::default();
        cfg.templates.locations.push(TemplateLocation {
            source: TemplateSource::Inline,
            path: "inline".to_string(),
        });
        assert!(cfg.ensure_valid().is_err());
    }

    #[test]
    fn unknown_default_label_is_warning_only() {
        let mut cfg = PipelineConfig::default();
        cfg.defaults.scope_size = "enormous".to_string();
        let warnings = cfg.validate();
        assert!(warnings.iter().any(|w| w.level == WarnLevel::Warning));
        assert!(cfg.ensure_valid().is_ok());
    }

    #[test]
    fn tier_thresholds_inclusive_toward_medium() {
        let cfg = ComplexityConfig::default();
        assert_eq!(cfg.tier(0.0), Tier::Low);
        assert_eq!(cfg.tier(0.39), Tier::Low);
        assert_eq!(cfg.tier(0.4), Tier::Medium);
        assert_eq!(cfg.tier(0.55), Tier::Medium);
        assert_eq!(cfg.tier(0.7), Tier::Medium);
        assert_eq!(cfg.tier(0.71), Tier::High);
        assert_eq!(cfg.tier(1.0), Tier::High);
    }

    #[test]
    fn save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = paths::config_path(dir.path());
        let mut cfg = PipelineConfig::default();
        cfg.personas.fallback = "lead".to_string();
        cfg.save(&path).unwrap();
        let loaded = PipelineConfig::load_or_default(dir.path()).unwrap();
        assert_eq!(loaded.personas.fallback, "lead");
    }

    #[test]
    fn load_missing_explicit_path_fails() {
        let dir = TempDir::new().unwrap();
        let err = PipelineConfig::load(&dir.path().join("nope.yaml")).unwrap_err();
        assert!(matches!(err, RoadmapError::ConfigNotFound(_)));
    }

    #[test]
    fn load_or_default_without_file() {
        let dir = TempDir::new().unwrap();
        let cfg = PipelineConfig::load_or_default(dir.path()).unwrap();
        assert_eq!(cfg, PipelineConfig::default());
    }

    #[test]
    fn read_unchecked_keeps_invalid_tables_for_reporting() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "personas:\n  primary_threshold: 10\n  consulting_threshold: 20\n").unwrap();
        let cfg = PipelineConfig::read_unchecked(&path).unwrap();
        assert!(cfg.validate().iter().any(|w| w.level == WarnLevel::Error));
        assert!(matches!(
            PipelineConfig::load(&path),
            Err(RoadmapError::InvalidConfig(_))
        ));
    }
}
