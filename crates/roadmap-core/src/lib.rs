pub mod artifact;
pub mod classifier;
pub mod complexity;
pub mod config;
pub mod error;
pub mod extract;
pub mod io;
pub mod milestone;
pub mod paths;
pub mod persona;
pub mod pipeline;
pub mod score;
pub mod template;
pub mod types;

#[cfg(test)]
mod fixtures;

pub use error::{Result, RoadmapError};
