use serde::{Deserialize, Serialize};

/// Scope string carried by every issued token.
///
/// All authenticated users receive both permissions; there is no per-account
/// differentiation.
pub const DEFAULT_SCOPE: &str = "blueprints.read blueprints.write";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    Read,
    Write,
}

impl Scope {
    pub fn as_str(self) -> &'static str {
        match self {
            Scope::Read => "blueprints.read",
            Scope::Write => "blueprints.write",
        }
    }

    /// Returns true when the space-delimited `scope` claim contains this scope.
    pub fn is_granted_by(self, scope_claim: &str) -> bool {
        scope_claim
            .split_whitespace()
            .any(|granted| granted == self.as_str())
    }
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Scope {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "blueprints.read" => Ok(Scope::Read),
            "blueprints.write" => Ok(Scope::Write),
            _ => Err(()),
        }
    }
}
