#![deny(warnings)]
pub mod game;
pub mod model;

pub use game::autoplay::AutoPlayer;
pub use game::betting::{BetError, BetResolution, BettingController, Wager, WagerKind, place_bet};
pub use game::decision::{
    BetInput, BetPurpose, BetRequest, DecisionSource, EventLog, HandView, NullSink,
    PresentationSink, TableEvent,
};
pub use game::round::{
    HandOutcome, HandResult, RoundError, RoundOutcome, RoundPhase, RoundReport, RoundResolver,
    Settlement, play_round,
};
pub use game::session::{Session, SessionError, SessionSummary, TableRules};
pub use model::card::{Card, CardError};
pub use model::deck::{Deck, DeckError, DeckManager, Discard, Draw};
pub use model::hand::{Hand, SplitError, best_value, can_split, hand_values};
pub use model::player::{Credits, Player};
pub use model::rank::Rank;
pub use model::suit::Suit;

pub struct AppInfo;

impl AppInfo {
    pub const fn name() -> &'static str {
        "blackjack"
    }

    pub const fn version() -> &'static str {
        env!("CARGO_PKG_VERSION")
    }
}

#[cfg(test)]
mod tests {
    use super::AppInfo;

    #[test]
    fn exposes_static_metadata() {
        assert_eq!(AppInfo::name(), "blackjack");
        assert!(!AppInfo::version().is_empty());
    }
}
