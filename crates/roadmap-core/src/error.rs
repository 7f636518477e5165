use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RoadmapError {
    #[error("Specification file not found: {}", .0.display())]
    SpecNotFound(PathBuf),

    #[error("Specification file is empty")]
    SpecEmpty,

    #[error("specification is too short: {len} characters (minimum {min})")]
    SpecTooShort { len: usize, min: usize },

    #[error("no title heading ('# Title') found in specification")]
    NoTitleFound,

    #[error("No requirements found in specification")]
    NoRequirementsFound,

    #[error("parse failure: {0}")]
    ParseFailure(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("config file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    #[error("home directory not found: set HOME environment variable")]
    HomeNotFound,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, RoadmapError>;
