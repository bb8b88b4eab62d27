use crate::game::decision::{BetInput, BetRequest, DecisionSource, HandView};
use crate::game::round::DEALER_STANDS_ON;
use crate::model::card::Card;
use crate::model::hand::Hand;
use crate::model::player::Credits;

/// Plays without a human: fixed bet, hits below a threshold, optional splits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoPlayer {
    stand_on: u8,
    bet: Option<Credits>,
    split: bool,
}

impl Default for AutoPlayer {
    /// Mirrors the dealer: stand on 17, bet the minimum, never split.
    fn default() -> Self {
        Self {
            stand_on: DEALER_STANDS_ON,
            bet: None,
            split: false,
        }
    }
}

impl AutoPlayer {
    pub const fn new(stand_on: u8, bet: Option<Credits>, split: bool) -> Self {
        Self {
            stand_on,
            bet,
            split,
        }
    }

    pub const fn stand_on(&self) -> u8 {
        self.stand_on
    }
}

impl DecisionSource for AutoPlayer {
    fn bet(&mut self, request: &BetRequest) -> BetInput {
        // Never below the minimum, and never more than is left.
        let wanted = self.bet.unwrap_or(request.minimum).max(request.minimum);
        BetInput::Amount(wanted.min(request.credits.max(request.minimum)))
    }

    fn split(&mut self, _hand: &Hand, _dealer_up: Card) -> bool {
        self.split
    }

    fn hit(&mut self, view: &HandView<'_>) -> bool {
        matches!(view.value, Some(total) if total < self.stand_on)
    }
}

#[cfg(test)]
mod tests {
    use super::AutoPlayer;
    use crate::game::decision::{BetInput, BetPurpose, BetRequest, DecisionSource, HandView};
    use crate::model::card::Card;
    use crate::model::hand::Hand;
    use crate::model::rank::Rank;
    use crate::model::suit::Suit;

    fn request(credits: i64) -> BetRequest {
        BetRequest {
            credits,
            minimum: 5,
            purpose: BetPurpose::Opening,
        }
    }

    #[test]
    fn default_bets_the_minimum() {
        assert_eq!(AutoPlayer::default().bet(&request(100)), BetInput::Amount(5));
    }

    #[test]
    fn fixed_bet_is_capped_by_balance() {
        let mut player = AutoPlayer::new(17, Some(50), false);
        assert_eq!(player.bet(&request(100)), BetInput::Amount(50));
        assert_eq!(player.bet(&request(20)), BetInput::Amount(20));
    }

    #[test]
    fn hits_below_threshold_only() {
        let mut player = AutoPlayer::default();
        assert_eq!(player.stand_on(), 17);
        let hand = Hand::new();
        let up = Card::new(Rank::Ten, Suit::Hearts);
        let view = |value| HandView {
            index: 0,
            hand: &hand,
            value,
            dealer_up: up,
        };
        assert!(player.hit(&view(Some(16))));
        assert!(!player.hit(&view(Some(17))));
        assert!(!player.hit(&view(None)));
    }
}
