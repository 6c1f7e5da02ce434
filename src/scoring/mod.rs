//! Scoring: the development pillar and the overall health aggregate.

pub mod development;
pub mod health;

pub use development::score_development_activity;
pub use health::{Pillar, PillarScores};
