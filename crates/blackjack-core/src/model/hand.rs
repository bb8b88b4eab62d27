use crate::model::card::{Card, CardError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

pub const BLACKJACK: u8 = 21;

/// Every total the cards can make, one per combination of card values.
/// Multi-ace hands get each soft and hard reading.
pub fn hand_values(cards: &[Card]) -> Result<BTreeSet<u8>, CardError> {
    let mut totals = BTreeSet::from([0u8]);
    for card in cards {
        let values = card.values()?;
        totals = totals
            .iter()
            .flat_map(|total| values.iter().map(move |value| total.saturating_add(*value)))
            .collect();
    }
    Ok(totals)
}

/// Highest total that does not exceed 21, or `None` when the hand is bust.
pub fn best_value(cards: &[Card]) -> Result<Option<u8>, CardError> {
    Ok(hand_values(cards)?
        .into_iter()
        .filter(|total| *total <= BLACKJACK)
        .max())
}

/// True when the hand is exactly two ranked cards of the same rank.
pub fn can_split(cards: &[Card]) -> bool {
    match cards {
        [first, second] => match (first.rank(), second.rank()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        },
        _ => false,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hand {
    cards: Vec<Card>,
}

impl Hand {
    pub fn new() -> Self {
        Self { cards: Vec::new() }
    }

    pub fn with_cards(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    pub fn add(&mut self, card: Card) {
        self.cards.push(card);
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn into_cards(self) -> Vec<Card> {
        self.cards
    }

    pub fn values(&self) -> Result<BTreeSet<u8>, CardError> {
        hand_values(&self.cards)
    }

    pub fn best_value(&self) -> Result<Option<u8>, CardError> {
        best_value(&self.cards)
    }

    pub fn is_bust(&self) -> Result<bool, CardError> {
        Ok(self.best_value()?.is_none())
    }

    pub fn can_split(&self) -> bool {
        can_split(&self.cards)
    }

    pub fn split(self) -> Result<(Hand, Hand), SplitError> {
        if !self.can_split() {
            return Err(SplitError::NotSplittable { hand: self });
        }
        let (first, second) = (self.cards[0], self.cards[1]);
        Ok((Hand::with_cards(vec![first]), Hand::with_cards(vec![second])))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SplitError {
    #[error("hand of {} card(s) cannot be split", hand.len())]
    NotSplittable { hand: Hand },
}
