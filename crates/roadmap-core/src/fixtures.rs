//! Specification documents shared by the unit tests.

pub const SAMPLE_SPEC: &str = include_str!("../tests/fixtures/sample_spec.md");
pub const MINIMAL_SPEC: &str = include_str!("../tests/fixtures/minimal_spec.md");
pub const INVALID_SPEC: &str = include_str!("../tests/fixtures/invalid_spec.md");
