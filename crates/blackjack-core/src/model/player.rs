use core::fmt;
use serde::{Deserialize, Serialize};

/// Credit balances and bets. Signed: the malformed-bet fallback may overdraw.
pub type Credits = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    name: String,
    credits: Credits,
}

impl Player {
    pub fn new(name: impl Into<String>, credits: Credits) -> Self {
        Self {
            name: name.into(),
            credits,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn credits(&self) -> Credits {
        self.credits
    }

    pub fn with_credits(self, credits: Credits) -> Self {
        Self { credits, ..self }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} credits)", self.name, self.credits)
    }
}
