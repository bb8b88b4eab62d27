use crate::game::decision::{DecisionSource, PresentationSink};
use crate::game::round::{RoundError, RoundReport, RoundResolver};
use crate::model::deck::{Deck, DeckManager, Discard, JOKERS_PER_DECK, STANDARD_DECK_SIZE};
use crate::model::player::{Credits, Player};
use rand::rngs::StdRng;
use serde::Serialize;
use thiserror::Error;
use tracing::info;

pub const DEFAULT_STARTING_CREDITS: Credits = 100;
pub const DEFAULT_MINIMUM_BET: Credits = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableRules {
    pub minimum_bet: Credits,
    pub include_jokers: bool,
}

impl Default for TableRules {
    fn default() -> Self {
        Self {
            minimum_bet: DEFAULT_MINIMUM_BET,
            include_jokers: false,
        }
    }
}

impl TableRules {
    pub const fn deck_size(&self) -> usize {
        if self.include_jokers {
            STANDARD_DECK_SIZE + JOKERS_PER_DECK
        } else {
            STANDARD_DECK_SIZE
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    pub rounds_played: u32,
    pub hands_won: u32,
    pub hands_lost: u32,
    pub starting_credits: Credits,
    pub final_credits: Credits,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("round {round} failed: {source}")]
    Round {
        round: u32,
        #[source]
        source: RoundError,
    },
}

/// One player at one table. The deck is shuffled once and carried, with its
/// discard pile, from round to round.
#[derive(Debug, Clone)]
pub struct Session<R = StdRng> {
    player: Player,
    deck: Deck,
    discard: Discard,
    deck_manager: DeckManager<R>,
    rules: TableRules,
    rounds_played: u32,
    hands_won: u32,
    hands_lost: u32,
}

impl Session<StdRng> {
    pub fn seeded(player: Player, rules: TableRules, seed: u64) -> Self {
        Self::new(player, rules, DeckManager::seeded(seed))
    }
}

impl<R: rand::Rng> Session<R> {
    pub fn new(player: Player, rules: TableRules, mut deck_manager: DeckManager<R>) -> Self {
        let deck = deck_manager.shuffle(Deck::create(rules.include_jokers));
        Self {
            player,
            deck,
            discard: Discard::new(),
            deck_manager,
            rules,
            rounds_played: 0,
            hands_won: 0,
            hands_lost: 0,
        }
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn rules(&self) -> TableRules {
        self.rules
    }

    pub fn seed(&self) -> Option<u64> {
        self.deck_manager.seed()
    }

    pub fn rounds_played(&self) -> u32 {
        self.rounds_played
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn discard(&self) -> &Discard {
        &self.discard
    }

    /// Cards between rounds. Always equals the deck size.
    pub fn card_count(&self) -> usize {
        self.deck.len() + self.discard.len()
    }

    /// Play continues while the balance is strictly above the minimum bet.
    pub fn can_continue(&self) -> bool {
        self.player.credits() > self.rules.minimum_bet
    }

    /// Plays one round. On error the session keeps its pre-round state.
    pub fn play_round<D, S>(
        &mut self,
        decisions: &mut D,
        sink: &mut S,
    ) -> Result<RoundReport, SessionError>
    where
        D: DecisionSource + ?Sized,
        S: PresentationSink + ?Sized,
    {
        let round = self.rounds_played + 1;
        let outcome = RoundResolver::new(
            &mut self.deck_manager,
            decisions,
            sink,
            self.rules.minimum_bet,
        )
        .play(self.player.clone(), self.deck.clone(), self.discard.clone())
        .map_err(|source| SessionError::Round { round, source })?;

        self.player = outcome.player;
        self.deck = outcome.deck;
        self.discard = outcome.discard;
        self.rounds_played = round;
        if let Some(settlement) = outcome.report.settlement() {
            for hand in &settlement.hands {
                if hand.outcome.is_win() {
                    self.hands_won += 1;
                } else {
                    self.hands_lost += 1;
                }
            }
        }
        Ok(outcome.report)
    }

    /// Plays rounds until the player can no longer cover the minimum bet or
    /// `max_rounds` is reached.
    pub fn run<D, S>(
        &mut self,
        decisions: &mut D,
        sink: &mut S,
        max_rounds: Option<u32>,
    ) -> Result<SessionSummary, SessionError>
    where
        D: DecisionSource + ?Sized,
        S: PresentationSink + ?Sized,
    {
        let starting_credits = self.player.credits();
        let mut played = 0u32;
        while self.can_continue() && max_rounds.is_none_or(|max| played < max) {
            let report = self.play_round(decisions, sink)?;
            played += 1;
            if matches!(report, RoundReport::Refused { .. }) {
                break;
            }
        }

        info!(
            player = self.player.name(),
            rounds = played,
            credits = self.player.credits(),
            "session finished"
        );
        Ok(SessionSummary {
            rounds_played: played,
            hands_won: self.hands_won,
            hands_lost: self.hands_lost,
            starting_credits,
            final_credits: self.player.credits(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{Session, SessionError, TableRules};
    use crate::game::autoplay::AutoPlayer;
    use crate::game::decision::NullSink;
    use crate::game::round::RoundError;
    use crate::model::player::Player;

    #[test]
    fn new_session_holds_a_shuffled_full_deck() {
        let session = Session::seeded(Player::new("Ada", 100), TableRules::default(), 5);
        assert_eq!(session.deck().len(), 52);
        assert!(session.discard().is_empty());
        assert_eq!(session.seed(), Some(5));
        assert!(session.can_continue());
    }

    #[test]
    fn cards_are_conserved_across_rounds() {
        let mut session = Session::seeded(Player::new("Ada", 1_000), TableRules::default(), 21);
        let mut player = AutoPlayer::default();
        for _ in 0..40 {
            session.play_round(&mut player, &mut NullSink).unwrap();
            assert_eq!(session.card_count(), 52);
        }
        assert_eq!(session.rounds_played(), 40);
    }

    #[test]
    fn balance_at_minimum_ends_play() {
        let session = Session::seeded(Player::new("Ada", 5), TableRules::default(), 1);
        assert!(!session.can_continue());
    }

    #[test]
    fn run_respects_round_cap() {
        let mut session = Session::seeded(Player::new("Ada", 1_000), TableRules::default(), 9);
        let summary = session
            .run(&mut AutoPlayer::default(), &mut NullSink, Some(3))
            .unwrap();
        assert_eq!(summary.rounds_played, 3);
        assert_eq!(summary.hands_won + summary.hands_lost, 3);
        assert_eq!(summary.final_credits, session.player().credits());
    }

    #[test]
    fn run_stops_when_credits_run_out() {
        let mut session = Session::seeded(Player::new("Ada", 30), TableRules::default(), 77);
        let summary = session
            .run(&mut AutoPlayer::new(17, Some(25), false), &mut NullSink, Some(10_000))
            .unwrap();
        assert!(summary.rounds_played < 10_000);
        assert!(summary.final_credits <= 5);
        assert!(!session.can_continue());
    }

    #[test]
    fn joker_deck_fails_once_a_joker_is_dealt() {
        let rules = TableRules {
            include_jokers: true,
            ..TableRules::default()
        };
        let mut session = Session::seeded(Player::new("Ada", 1_000_000), rules, 3);
        assert_eq!(session.card_count(), rules.deck_size());
        let err = session
            .run(&mut AutoPlayer::default(), &mut NullSink, Some(1_000))
            .expect_err("a joker is eventually dealt");
        let SessionError::Round { source, .. } = err;
        assert!(matches!(source, RoundError::Card(_)));
        assert_eq!(session.card_count(), 54);
    }
}
