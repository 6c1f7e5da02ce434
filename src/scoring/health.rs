//! Overall token health from the five pillar scores.

use serde::{Deserialize, Serialize};

/// One of the five components of a token's health score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pillar {
    Security,
    Liquidity,
    Tokenomics,
    Community,
    Development,
}

impl Pillar {
    pub fn all() -> &'static [Pillar] {
        &[
            Pillar::Security,
            Pillar::Liquidity,
            Pillar::Tokenomics,
            Pillar::Community,
            Pillar::Development,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Security => "Security",
            Self::Liquidity => "Liquidity",
            Self::Tokenomics => "Tokenomics",
            Self::Community => "Community",
            Self::Development => "Development",
        }
    }
}

impl std::fmt::Display for Pillar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name().to_lowercase())
    }
}

/// Pillar scores in `[0, 100]`; `None` means unknown, which is not the same as 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PillarScores {
    #[serde(default)]
    pub security: Option<u8>,
    #[serde(default)]
    pub liquidity: Option<u8>,
    #[serde(default)]
    pub tokenomics: Option<u8>,
    #[serde(default)]
    pub community: Option<u8>,
    #[serde(default)]
    pub development: Option<u8>,
}

impl PillarScores {
    pub fn get(&self, pillar: Pillar) -> Option<u8> {
        match pillar {
            Pillar::Security => self.security,
            Pillar::Liquidity => self.liquidity,
            Pillar::Tokenomics => self.tokenomics,
            Pillar::Community => self.community,
            Pillar::Development => self.development,
        }
    }

    pub fn with_development(mut self, score: Option<u8>) -> Self {
        self.development = score;
        self
    }

    /// Number of pillars with a known score.
    pub fn known_count(&self) -> usize {
        Pillar::all()
            .iter()
            .filter(|p| self.get(**p).is_some())
            .count()
    }

    /// First pillar whose score is above 100, if any.
    pub fn out_of_range(&self) -> Option<Pillar> {
        Pillar::all()
            .iter()
            .copied()
            .find(|p| self.get(*p).is_some_and(|score| score > 100))
    }

    /// Rounded mean of the known pillars, or `None` if every pillar is unknown.
    pub fn overall(&self) -> Option<u8> {
        let known: Vec<f64> = Pillar::all()
            .iter()
            .filter_map(|p| self.get(*p))
            .map(f64::from)
            .collect();
        if known.is_empty() {
            return None;
        }
        let mean = known.iter().sum::<f64>() / known.len() as f64;
        Some(mean.round().min(100.0) as u8)
    }
}
