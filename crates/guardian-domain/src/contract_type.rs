//! Contract type - coarse document classification driving policy selection

use serde::{Deserialize, Serialize};

/// Coarse classification of a contract document
///
/// Each type has a registered risk policy. Unknown type names resolve to
/// `General` so a policy is always available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContractType {
    /// Any contract without a dedicated policy
    #[default]
    General,

    /// Employment, labor or service contracts
    Employment,

    /// Lease and rental contracts
    Lease,
}

impl ContractType {
    /// Every known contract type, in registration order
    pub const ALL: [ContractType; 3] = [
        ContractType::General,
        ContractType::Employment,
        ContractType::Lease,
    ];

    /// Get the type name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            ContractType::General => "general",
            ContractType::Employment => "employment",
            ContractType::Lease => "lease",
        }
    }

    /// Parse a type from a string, ignoring case and surrounding whitespace
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "general" => Some(ContractType::General),
            "employment" => Some(ContractType::Employment),
            "lease" => Some(ContractType::Lease),
            _ => None,
        }
    }

    /// Parse a type, resolving unknown names to `General`
    ///
    /// # Examples
    ///
    /// ```
    /// use guardian_domain::ContractType;
    ///
    /// assert_eq!(ContractType::resolve("Lease"), ContractType::Lease);
    /// assert_eq!(ContractType::resolve("franchise"), ContractType::General);
    /// ```
    pub fn resolve(s: &str) -> Self {
        Self::parse(s).unwrap_or_default()
    }
}

impl std::fmt::Display for ContractType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ContractType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid contract type: {}", s))
    }
}
