use crate::game::decision::{
    BetInput, BetPurpose, BetRequest, DecisionSource, PresentationSink, TableEvent,
};
use crate::model::player::Credits;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WagerKind {
    Accepted,
    /// The answer was not a number, so the table minimum was staked instead.
    ParseFallback,
}

/// A staked bet and the balance left after staking it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Wager {
    pub credits: Credits,
    pub bet: Credits,
    pub kind: WagerKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BetError {
    #[error("not enough money to bet: {credits} credits, minimum bet is {minimum}")]
    InsufficientFunds { credits: Credits, minimum: Credits },
    #[error("cannot bet {requested}: only {credits} credits available")]
    OverBet { requested: Credits, credits: Credits },
    #[error("bet of {requested} is below the minimum of {minimum}")]
    BelowMinimum { requested: Credits, minimum: Credits },
}

impl BetError {
    /// Whether asking again could succeed.
    pub const fn is_retryable(&self) -> bool {
        !matches!(self, BetError::InsufficientFunds { .. })
    }
}

/// Validates one bet answer.
///
/// A malformed answer is checked first and stakes exactly `minimum`, even when
/// the balance is short. Numeric answers are refused when the balance is below
/// the minimum, then checked against the balance and finally the minimum.
pub fn place_bet(credits: Credits, minimum: Credits, input: &BetInput) -> Result<Wager, BetError> {
    let requested = match input {
        BetInput::Malformed(_) => {
            return Ok(Wager {
                credits: credits - minimum,
                bet: minimum,
                kind: WagerKind::ParseFallback,
            });
        }
        BetInput::Amount(amount) => *amount,
    };

    if credits < minimum {
        return Err(BetError::InsufficientFunds { credits, minimum });
    }
    if requested > credits {
        return Err(BetError::OverBet { requested, credits });
    }
    if requested < minimum {
        return Err(BetError::BelowMinimum { requested, minimum });
    }

    Ok(Wager {
        credits: credits - requested,
        bet: requested,
        kind: WagerKind::Accepted,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BetResolution {
    Placed(Wager),
    Refused { credits: Credits, error: BetError },
}

/// Runs the bet prompt until an answer is accepted or the balance is too low.
#[derive(Debug, Clone, Copy)]
pub struct BettingController {
    minimum: Credits,
}

impl BettingController {
    pub const fn new(minimum: Credits) -> Self {
        Self { minimum }
    }

    pub fn collect<D, S>(
        &self,
        credits: Credits,
        purpose: BetPurpose,
        decisions: &mut D,
        sink: &mut S,
    ) -> BetResolution
    where
        D: DecisionSource + ?Sized,
        S: PresentationSink + ?Sized,
    {
        let request = BetRequest {
            credits,
            minimum: self.minimum,
            purpose,
        };

        loop {
            let input = decisions.bet(&request);
            match place_bet(credits, self.minimum, &input) {
                Ok(wager) => {
                    if wager.kind == WagerKind::ParseFallback {
                        warn!(?input, bet = wager.bet, "unreadable bet, staking the minimum");
                    } else {
                        debug!(bet = wager.bet, credits = wager.credits, "bet placed");
                    }
                    sink.notify(&TableEvent::BetPlaced { purpose, wager });
                    return BetResolution::Placed(wager);
                }
                Err(error) => {
                    sink.notify(&TableEvent::BetRejected { purpose, error });
                    if !error.is_retryable() {
                        return BetResolution::Refused { credits, error };
                    }
                    debug!(%error, "bet rejected, asking again");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{BetError, BetResolution, BettingController, WagerKind, place_bet};
    use crate::game::decision::{
        BetInput, BetPurpose, BetRequest, DecisionSource, EventLog, HandView, TableEvent,
    };
    use crate::model::card::Card;
    use crate::model::hand::Hand;
    use std::collections::VecDeque;

    struct Answers(VecDeque<BetInput>);

    impl DecisionSource for Answers {
        fn bet(&mut self, _request: &BetRequest) -> BetInput {
            self.0.pop_front().expect("test supplied enough answers")
        }

        fn split(&mut self, _hand: &Hand, _dealer_up: Card) -> bool {
            false
        }

        fn hit(&mut self, _view: &HandView<'_>) -> bool {
            false
        }
    }

    #[test]
    fn valid_bet_is_deducted() {
        let wager = place_bet(100, 5, &BetInput::Amount(20)).unwrap();
        assert_eq!(wager.credits, 80);
        assert_eq!(wager.bet, 20);
        assert_eq!(wager.kind, WagerKind::Accepted);
    }

    #[test]
    fn whole_balance_may_be_bet() {
        let wager = place_bet(30, 5, &BetInput::Amount(30)).unwrap();
        assert_eq!(wager.credits, 0);
    }

    #[test]
    fn short_balance_is_refused_before_other_checks() {
        assert_eq!(
            place_bet(4, 5, &BetInput::Amount(100)),
            Err(BetError::InsufficientFunds {
                credits: 4,
                minimum: 5
            })
        );
    }

    #[test]
    fn over_bet_is_rejected() {
        assert_eq!(
            place_bet(50, 5, &BetInput::Amount(51)),
            Err(BetError::OverBet {
                requested: 51,
                credits: 50
            })
        );
    }

    #[test]
    fn bet_below_minimum_is_rejected() {
        assert_eq!(
            place_bet(50, 5, &BetInput::Amount(4)),
            Err(BetError::BelowMinimum {
                requested: 4,
                minimum: 5
            })
        );
    }

    #[test]
    fn malformed_answer_stakes_minimum() {
        let wager = place_bet(50, 5, &BetInput::Malformed("ten".into())).unwrap();
        assert_eq!(wager.bet, 5);
        assert_eq!(wager.credits, 45);
        assert_eq!(wager.kind, WagerKind::ParseFallback);
    }

    #[test]
    fn malformed_answer_stakes_minimum_even_when_short() {
        let wager = place_bet(3, 5, &BetInput::Malformed(String::new())).unwrap();
        assert_eq!(wager.credits, -2);
        assert_eq!(wager.kind, WagerKind::ParseFallback);
    }

    #[test]
    fn controller_asks_again_after_invalid_amounts() {
        let mut answers = Answers(VecDeque::from([
            BetInput::Amount(500),
            BetInput::Amount(1),
            BetInput::Amount(10),
        ]));
        let mut log = EventLog::new();
        let resolution =
            BettingController::new(5).collect(100, BetPurpose::Opening, &mut answers, &mut log);

        assert!(matches!(
            resolution,
            BetResolution::Placed(wager) if wager.bet == 10 && wager.credits == 90
        ));
        let rejections = log
            .events()
            .iter()
            .filter(|event| matches!(event, TableEvent::BetRejected { .. }))
            .count();
        assert_eq!(rejections, 2);
        assert!(answers.0.is_empty());
    }

    #[test]
    fn controller_refuses_short_balance_without_retrying() {
        let mut answers = Answers(VecDeque::from([BetInput::Amount(5), BetInput::Amount(5)]));
        let resolution = BettingController::new(5).collect(
            4,
            BetPurpose::Opening,
            &mut answers,
            &mut EventLog::new(),
        );
        assert!(matches!(
            resolution,
            BetResolution::Refused {
                credits: 4,
                error: BetError::InsufficientFunds { .. }
            }
        ));
        assert_eq!(answers.0.len(), 1);
    }
}
