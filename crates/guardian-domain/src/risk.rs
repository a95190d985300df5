//! Risk levels and the score thresholds that derive them

use serde::{Deserialize, Serialize};

/// Scores at or above this are `High`
pub const HIGH_THRESHOLD: i64 = 75;

/// Scores at or above this (and below `HIGH_THRESHOLD`) are `Medium`
pub const MEDIUM_THRESHOLD: i64 = 50;

/// Upper bound of every clause score
pub const MAX_SCORE: u8 = 100;

/// Coarse risk badge derived from a numeric score
///
/// - Low: score < 50
/// - Medium: 50 <= score < 75
/// - High: score >= 75
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    /// Informational or benign clause
    Low,

    /// Clause worth a closer read
    Medium,

    /// Clause likely to hurt the signing party
    High,
}

impl RiskLevel {
    /// Derive the level from an integer score
    ///
    /// # Examples
    ///
    /// ```
    /// use guardian_domain::RiskLevel;
    ///
    /// assert_eq!(RiskLevel::from_score(75), RiskLevel::High);
    /// assert_eq!(RiskLevel::from_score(74), RiskLevel::Medium);
    /// assert_eq!(RiskLevel::from_score(49), RiskLevel::Low);
    /// ```
    pub fn from_score(score: i64) -> Self {
        if score >= HIGH_THRESHOLD {
            RiskLevel::High
        } else if score >= MEDIUM_THRESHOLD {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    /// Derive the level from an averaged score
    pub fn from_mean(score: f64) -> Self {
        if score >= HIGH_THRESHOLD as f64 {
            RiskLevel::High
        } else if score >= MEDIUM_THRESHOLD as f64 {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    /// Get the level name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }

    /// Parse a level from a backend-supplied string
    ///
    /// Case and surrounding whitespace are ignored; anything else yields `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "low" => Some(RiskLevel::Low),
            "medium" => Some(RiskLevel::Medium),
            "high" => Some(RiskLevel::High),
            _ => None,
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RiskLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid risk level: {}", s))
    }
}

/// Clamp any integer into the valid 0..=100 score range
pub fn clamp_score(score: i64) -> u8 {
    score.clamp(0, MAX_SCORE as i64) as u8
}
