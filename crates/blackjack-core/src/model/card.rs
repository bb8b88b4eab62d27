use crate::model::rank::Rank;
use crate::model::suit::Suit;
use core::fmt;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Card {
    Ranked { rank: Rank, suit: Suit },
    Joker,
}

impl Card {
    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Card::Ranked { rank, suit }
    }

    pub const fn rank(self) -> Option<Rank> {
        match self {
            Card::Ranked { rank, .. } => Some(rank),
            Card::Joker => None,
        }
    }

    pub const fn suit(self) -> Option<Suit> {
        match self {
            Card::Ranked { suit, .. } => Some(suit),
            Card::Joker => None,
        }
    }

    pub const fn is_joker(self) -> bool {
        matches!(self, Card::Joker)
    }

    /// Point values the card may count as. Jokers have none.
    pub fn values(self) -> Result<&'static [u8], CardError> {
        match self {
            Card::Ranked { rank, .. } => Ok(rank.values()),
            Card::Joker => Err(CardError::InvalidCard { card: self }),
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Card::Ranked { rank, suit } => write!(f, "{rank} of {suit}"),
            Card::Joker => f.write_str("Joker"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CardError {
    #[error("card \"{card}\" has no point value")]
    InvalidCard { card: Card },
}
