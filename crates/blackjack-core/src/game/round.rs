use crate::game::betting::{BetResolution, BettingController};
use crate::game::decision::{BetPurpose, DecisionSource, HandView, PresentationSink, TableEvent};
use crate::model::card::{Card, CardError};
use crate::model::deck::{Deck, DeckError, DeckManager, Discard, Draw};
use crate::model::hand::Hand;
use crate::model::player::{Credits, Player};
use serde::Serialize;
use thiserror::Error;
use tracing::{Level, debug, event, trace};

/// Dealer keeps drawing below this total. A soft 17 stands.
pub const DEALER_STANDS_ON: u8 = 17;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundPhase {
    Bet,
    Deal,
    PlayerDecision,
    Split,
    DealerTurn,
    Payout,
    Recycle,
}

pub const fn dealer_should_hit(value: Option<u8>) -> bool {
    match value {
        Some(total) => total < DEALER_STANDS_ON,
        None => false,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HandOutcome {
    Busted,
    DealerBusted,
    Won,
    Lost,
}

impl HandOutcome {
    /// Ties go to the dealer.
    pub const fn decide(value: Option<u8>, dealer_value: Option<u8>) -> Self {
        match (value, dealer_value) {
            (None, _) => HandOutcome::Busted,
            (Some(_), None) => HandOutcome::DealerBusted,
            (Some(player), Some(dealer)) if player > dealer => HandOutcome::Won,
            (Some(_), Some(_)) => HandOutcome::Lost,
        }
    }

    pub const fn is_win(self) -> bool {
        matches!(self, HandOutcome::DealerBusted | HandOutcome::Won)
    }

    /// Change against the balance held before the bet was staked.
    pub const fn net(self, bet: Credits) -> Credits {
        if self.is_win() { bet } else { -bet }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HandResult {
    pub hand: Hand,
    pub bet: Credits,
    pub value: Option<u8>,
    pub outcome: HandOutcome,
    pub net: Credits,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Settlement {
    pub dealer: Hand,
    pub dealer_value: Option<u8>,
    pub dealer_played: bool,
    pub hands: Vec<HandResult>,
    pub credits_before: Credits,
    pub credits_after: Credits,
}

impl Settlement {
    pub fn net(&self) -> Credits {
        self.credits_after - self.credits_before
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RoundReport {
    /// No wager could be placed; nothing was dealt.
    Refused { credits: Credits, minimum: Credits },
    Settled(Settlement),
}

impl RoundReport {
    pub fn settlement(&self) -> Option<&Settlement> {
        match self {
            RoundReport::Settled(settlement) => Some(settlement),
            RoundReport::Refused { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundOutcome {
    pub player: Player,
    pub deck: Deck,
    pub discard: Discard,
    pub report: RoundReport,
}

#[derive(Debug, Error)]
pub enum RoundError {
    #[error(transparent)]
    Card(#[from] CardError),
    #[error(transparent)]
    Deck(#[from] DeckError),
}

/// Plays one round: bet, deal, player decisions with an optional split,
/// dealer turn, payout and recycling of every hand into the discard pile.
pub struct RoundResolver<'a, R, D: ?Sized, S: ?Sized> {
    deck_manager: &'a mut DeckManager<R>,
    decisions: &'a mut D,
    sink: &'a mut S,
    minimum_bet: Credits,
    phase: RoundPhase,
}

impl<'a, R, D, S> RoundResolver<'a, R, D, S>
where
    R: rand::Rng,
    D: DecisionSource + ?Sized,
    S: PresentationSink + ?Sized,
{
    pub fn new(
        deck_manager: &'a mut DeckManager<R>,
        decisions: &'a mut D,
        sink: &'a mut S,
        minimum_bet: Credits,
    ) -> Self {
        Self {
            deck_manager,
            decisions,
            sink,
            minimum_bet,
            phase: RoundPhase::Bet,
        }
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn play(
        &mut self,
        player: Player,
        deck: Deck,
        discard: Discard,
    ) -> Result<RoundOutcome, RoundError> {
        let credits_before = player.credits();

        self.enter(RoundPhase::Bet);
        let opening = match BettingController::new(self.minimum_bet).collect(
            credits_before,
            BetPurpose::Opening,
            &mut *self.decisions,
            &mut *self.sink,
        ) {
            BetResolution::Placed(wager) => wager,
            BetResolution::Refused { credits, .. } => {
                debug!(credits, minimum = self.minimum_bet, "round skipped, no wager");
                return Ok(RoundOutcome {
                    player,
                    deck,
                    discard,
                    report: RoundReport::Refused {
                        credits,
                        minimum: self.minimum_bet,
                    },
                });
            }
        };
        let mut credits = opening.credits;

        self.enter(RoundPhase::Deal);
        let Draw {
            cards: dealer_cards,
            deck,
            discard,
        } = self.deck_manager.draw(deck, discard, 2)?;
        let Draw {
            cards: player_cards,
            mut deck,
            mut discard,
        } = self.deck_manager.draw(deck, discard, 2)?;
        let dealer = Hand::with_cards(dealer_cards);
        let hand = Hand::with_cards(player_cards);
        let dealer_up = dealer.cards()[0];
        dealer.best_value()?;
        hand.best_value()?;
        self.sink.notify(&TableEvent::Dealt {
            dealer: dealer.clone(),
            hand: hand.clone(),
        });

        let pair = match *hand.cards() {
            [first, second] if hand.can_split() => Some((first, second)),
            _ => None,
        };
        let mut seats = Vec::with_capacity(2);
        match pair {
            Some((first, second)) if self.decisions.split(&hand, dealer_up) => {
                self.enter(RoundPhase::Split);
                match BettingController::new(opening.bet).collect(
                    credits,
                    BetPurpose::Split,
                    &mut *self.decisions,
                    &mut *self.sink,
                ) {
                    BetResolution::Placed(wager) => {
                        credits = wager.credits;
                        let hands = [
                            Hand::with_cards(vec![first]),
                            Hand::with_cards(vec![second]),
                        ];
                        self.sink.notify(&TableEvent::HandSplit {
                            hands: hands.clone(),
                        });
                        let [first_hand, second_hand] = hands;
                        seats.push((first_hand, opening.bet));
                        seats.push((second_hand, wager.bet));
                    }
                    BetResolution::Refused { .. } => {
                        debug!("split abandoned, second bet refused");
                        seats.push((hand, opening.bet));
                    }
                }
            }
            _ => seats.push((hand, opening.bet)),
        }

        self.enter(RoundPhase::PlayerDecision);
        let mut played = Vec::with_capacity(seats.len());
        for (index, (hand, bet)) in seats.into_iter().enumerate() {
            let (hand, next_deck, next_discard) =
                self.resolve_hand(index, hand, dealer_up, deck, discard)?;
            deck = next_deck;
            discard = next_discard;
            let value = hand.best_value()?;
            played.push((hand, bet, value));
        }

        let dealer_played = played.iter().any(|(_, _, value)| value.is_some());
        let mut dealer = dealer;
        if dealer_played {
            self.enter(RoundPhase::DealerTurn);
            let (next_dealer, next_deck, next_discard) = self.dealer_turn(dealer, deck, discard)?;
            dealer = next_dealer;
            deck = next_deck;
            discard = next_discard;
        }
        let dealer_value = dealer.best_value()?;

        self.enter(RoundPhase::Payout);
        let mut hands = Vec::with_capacity(played.len());
        for (hand, bet, value) in played {
            let outcome = HandOutcome::decide(value, dealer_value);
            if outcome.is_win() {
                credits += 2 * bet;
            }
            hands.push(HandResult {
                hand,
                bet,
                value,
                outcome,
                net: outcome.net(bet),
            });
        }
        let settlement = Settlement {
            dealer,
            dealer_value,
            dealer_played,
            hands,
            credits_before,
            credits_after: credits,
        };

        self.enter(RoundPhase::Recycle);
        discard.extend(settlement.dealer.iter().copied());
        for result in &settlement.hands {
            discard.extend(result.hand.iter().copied());
        }

        event!(
            target: "blackjack_core::round",
            Level::INFO,
            player = player.name(),
            credits_before,
            credits_after = credits,
            hands = settlement.hands.len() as u32,
            dealer_value = ?dealer_value,
            "round settled"
        );
        self.sink.notify(&TableEvent::RoundSettled(settlement.clone()));

        Ok(RoundOutcome {
            player: player.with_credits(credits),
            deck,
            discard,
            report: RoundReport::Settled(settlement),
        })
    }

    fn resolve_hand(
        &mut self,
        index: usize,
        mut hand: Hand,
        dealer_up: Card,
        mut deck: Deck,
        mut discard: Discard,
    ) -> Result<(Hand, Deck, Discard), RoundError> {
        let mut value = hand.best_value()?;
        self.sink.notify(&TableEvent::HandStarted {
            index,
            hand: hand.clone(),
            value,
        });

        while value.is_some()
            && self.decisions.hit(&HandView {
                index,
                hand: &hand,
                value,
                dealer_up,
            })
        {
            let (card, next_deck, next_discard) = self.deck_manager.draw_one(deck, discard)?;
            deck = next_deck;
            discard = next_discard;
            hand.add(card);
            value = hand.best_value()?;
            trace!(index, %card, ?value, "player hit");
            if value.is_some() {
                self.sink.notify(&TableEvent::PlayerHit {
                    index,
                    hand: hand.clone(),
                    value,
                });
            } else {
                self.sink.notify(&TableEvent::PlayerBusted {
                    index,
                    hand: hand.clone(),
                });
            }
        }

        Ok((hand, deck, discard))
    }

    fn dealer_turn(
        &mut self,
        mut dealer: Hand,
        mut deck: Deck,
        mut discard: Discard,
    ) -> Result<(Hand, Deck, Discard), RoundError> {
        while dealer_should_hit(dealer.best_value()?) {
            let (card, next_deck, next_discard) = self.deck_manager.draw_one(deck, discard)?;
            deck = next_deck;
            discard = next_discard;
            dealer.add(card);
            trace!(%card, "dealer hit");
            self.sink.notify(&TableEvent::DealerHit {
                dealer: dealer.clone(),
            });
        }
        Ok((dealer, deck, discard))
    }

    fn enter(&mut self, phase: RoundPhase) {
        trace!(from = ?self.phase, to = ?phase, "round phase");
        self.phase = phase;
    }
}

/// Plays a single round. See [`RoundResolver`].
pub fn play_round<R, D, S>(
    player: Player,
    deck: Deck,
    discard: Discard,
    minimum_bet: Credits,
    deck_manager: &mut DeckManager<R>,
    decisions: &mut D,
    sink: &mut S,
) -> Result<RoundOutcome, RoundError>
where
    R: rand::Rng,
    D: DecisionSource + ?Sized,
    S: PresentationSink + ?Sized,
{
    RoundResolver::new(deck_manager, decisions, sink, minimum_bet).play(player, deck, discard)
}
