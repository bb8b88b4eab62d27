use crate::game::betting::{BetError, Wager};
use crate::game::round::Settlement;
use crate::model::card::Card;
use crate::model::hand::Hand;
use crate::model::player::Credits;

/// Raw answer to a bet prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BetInput {
    Amount(Credits),
    Malformed(String),
}

impl BetInput {
    pub fn parse(text: &str) -> Self {
        let trimmed = text.trim();
        match trimmed.parse::<Credits>() {
            Ok(amount) => BetInput::Amount(amount),
            Err(_) => BetInput::Malformed(trimmed.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BetPurpose {
    Opening,
    Split,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BetRequest {
    pub credits: Credits,
    pub minimum: Credits,
    pub purpose: BetPurpose,
}

/// What the player sees when asked to hit or stand.
#[derive(Debug, Clone, Copy)]
pub struct HandView<'a> {
    pub index: usize,
    pub hand: &'a Hand,
    pub value: Option<u8>,
    pub dealer_up: Card,
}

/// Supplies the player's choices. Every call must return; the round blocks on it.
pub trait DecisionSource {
    fn bet(&mut self, request: &BetRequest) -> BetInput;
    fn split(&mut self, hand: &Hand, dealer_up: Card) -> bool;
    fn hit(&mut self, view: &HandView<'_>) -> bool;
}

impl<T: DecisionSource + ?Sized> DecisionSource for &mut T {
    fn bet(&mut self, request: &BetRequest) -> BetInput {
        (**self).bet(request)
    }

    fn split(&mut self, hand: &Hand, dealer_up: Card) -> bool {
        (**self).split(hand, dealer_up)
    }

    fn hit(&mut self, view: &HandView<'_>) -> bool {
        (**self).hit(view)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableEvent {
    BetRejected {
        purpose: BetPurpose,
        error: BetError,
    },
    BetPlaced {
        purpose: BetPurpose,
        wager: Wager,
    },
    Dealt {
        dealer: Hand,
        hand: Hand,
    },
    HandSplit {
        hands: [Hand; 2],
    },
    HandStarted {
        index: usize,
        hand: Hand,
        value: Option<u8>,
    },
    PlayerHit {
        index: usize,
        hand: Hand,
        value: Option<u8>,
    },
    PlayerBusted {
        index: usize,
        hand: Hand,
    },
    DealerHit {
        dealer: Hand,
    },
    RoundSettled(Settlement),
}

/// Receives table events to render. The engine never formats text itself.
pub trait PresentationSink {
    fn notify(&mut self, event: &TableEvent);
}

impl<T: PresentationSink + ?Sized> PresentationSink for &mut T {
    fn notify(&mut self, event: &TableEvent) {
        (**self).notify(event)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl PresentationSink for NullSink {
    fn notify(&mut self, _event: &TableEvent) {}
}

/// Sink that keeps every event, for inspection after a round.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<TableEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[TableEvent] {
        &self.events
    }
}

impl PresentationSink for EventLog {
    fn notify(&mut self, event: &TableEvent) {
        self.events.push(event.clone());
    }
}
