use std::io::{BufRead, Write};

use blackjack_core::{
    BetError, BetInput, BetPurpose, BetRequest, Card, DecisionSource, Hand, HandOutcome,
    HandView, PresentationSink, Settlement, TableEvent, WagerKind,
};
use tracing::warn;

/// Asks the player for every decision on a line-oriented terminal.
///
/// End of input reads as an empty answer: the bet falls back to the minimum
/// and every yes/no question is answered "no", so a closed stdin still ends
/// the session.
pub struct ConsoleDecisions<I, O> {
    input: I,
    output: O,
}

impl<I: BufRead, O: Write> ConsoleDecisions<I, O> {
    pub fn new(input: I, output: O) -> Self {
        Self { input, output }
    }

    pub fn ask(&mut self, prompt: &str) -> String {
        if let Err(err) = write!(self.output, "{prompt} ").and_then(|_| self.output.flush()) {
            warn!(%err, "failed to write prompt");
        }
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) => String::new(),
            Ok(_) => line.trim().to_string(),
            Err(err) => {
                warn!(%err, "failed to read answer");
                String::new()
            }
        }
    }

    fn confirm(&mut self, prompt: &str) -> bool {
        self.ask(prompt).eq_ignore_ascii_case("y")
    }

    pub fn into_inner(self) -> (I, O) {
        (self.input, self.output)
    }
}

impl<I: BufRead, O: Write> DecisionSource for ConsoleDecisions<I, O> {
    fn bet(&mut self, request: &BetRequest) -> BetInput {
        let prompt = format!(
            "What would you like to bet? ({} credits, default {})",
            request.credits, request.minimum
        );
        BetInput::parse(&self.ask(&prompt))
    }

    fn split(&mut self, _hand: &Hand, _dealer_up: Card) -> bool {
        self.confirm("Would you like to split? (y/n)")
    }

    fn hit(&mut self, _view: &HandView<'_>) -> bool {
        self.confirm("Hit? (y/n)")
    }
}

/// Renders table events as the plain-text transcript of a round.
pub struct ConsoleTable<W> {
    output: W,
    player_name: String,
}

impl<W: Write> ConsoleTable<W> {
    pub fn new(output: W, player_name: impl Into<String>) -> Self {
        Self {
            output,
            player_name: player_name.into(),
        }
    }

    pub fn into_inner(self) -> W {
        self.output
    }

    fn render(&self, event: &TableEvent) -> Vec<String> {
        match event {
            TableEvent::BetRejected { error, .. } => vec![rejection_text(error).to_string()],
            TableEvent::BetPlaced { purpose, wager } => {
                let mut lines = Vec::new();
                if wager.kind == WagerKind::ParseFallback {
                    lines.push(format!("Betting the minimum of {} credits.", wager.bet));
                }
                if *purpose == BetPurpose::Split {
                    lines.push(format!("Split hand bets {} credits.", wager.bet));
                }
                lines
            }
            TableEvent::Dealt { dealer, .. } => vec![dealer_line(dealer)],
            TableEvent::HandSplit { hands } => vec![format!(
                "Splitting into {} and {}.",
                card_list(&hands[0]),
                card_list(&hands[1])
            )],
            TableEvent::HandStarted { hand, value, .. }
            | TableEvent::PlayerHit { hand, value, .. } => vec![hand_line(hand, *value)],
            TableEvent::PlayerBusted { hand, .. } => vec![hand_line(hand, None)],
            TableEvent::DealerHit { dealer } => {
                vec!["Dealer is hitting...".to_string(), dealer_line(dealer)]
            }
            TableEvent::RoundSettled(settlement) => self.settlement_lines(settlement),
        }
    }

    fn settlement_lines(&self, settlement: &Settlement) -> Vec<String> {
        let mut lines = vec![
            "--==((Dealer))==--".to_string(),
            hand_line(&settlement.dealer, settlement.dealer_value),
            format!("--==(({}))==--", self.player_name),
        ];
        for result in &settlement.hands {
            lines.push(format!(
                "{} ({} credits)",
                hand_line(&result.hand, result.value),
                result.bet
            ));
            lines.push(match (result.outcome, result.value, settlement.dealer_value) {
                (HandOutcome::Busted, _, _) => "You busted.".to_string(),
                (HandOutcome::DealerBusted, _, _) => "Dealer has busted. You win!".to_string(),
                (HandOutcome::Won, Some(mine), Some(theirs)) => {
                    format!("You won! {mine} vs. {theirs}")
                }
                (_, Some(mine), Some(theirs)) => format!("You lose! {mine} vs. {theirs}"),
                (_, _, _) => "You lose!".to_string(),
            });
        }
        lines.push(format!(
            "Player: {}, Credits Remaining: {}",
            self.player_name, settlement.credits_after
        ));
        lines
    }
}

impl<W: Write> PresentationSink for ConsoleTable<W> {
    fn notify(&mut self, event: &TableEvent) {
        for line in self.render(event) {
            if let Err(err) = writeln!(self.output, "{line}") {
                warn!(%err, "failed to write table output");
                return;
            }
        }
    }
}

/// Writes each settled round as one JSON object per line.
pub struct JsonLines<W> {
    output: W,
}

impl<W: Write> JsonLines<W> {
    pub fn new(output: W) -> Self {
        Self { output }
    }

    pub fn into_inner(self) -> W {
        self.output
    }
}

impl<W: Write> PresentationSink for JsonLines<W> {
    fn notify(&mut self, event: &TableEvent) {
        let TableEvent::RoundSettled(settlement) = event else {
            return;
        };
        let written = serde_json::to_writer(&mut self.output, settlement)
            .map_err(std::io::Error::from)
            .and_then(|_| writeln!(self.output));
        if let Err(err) = written {
            warn!(%err, "failed to write round record");
        }
    }
}

pub fn rejection_text(error: &BetError) -> &'static str {
    match error {
        BetError::InsufficientFunds { .. } => "Not enough money to bet.",
        BetError::OverBet { .. } => "Cannot bet more money than you have.",
        BetError::BelowMinimum { .. } => "Bet must be greater than the minimum bet.",
    }
}

fn card_list(hand: &Hand) -> String {
    hand.iter()
        .map(Card::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn value_text(value: Option<u8>) -> String {
    value.map_or_else(|| "bust".to_string(), |total| total.to_string())
}

pub fn hand_line(hand: &Hand, value: Option<u8>) -> String {
    format!("Hand: {} ({})", card_list(hand), value_text(value))
}

/// The dealer's second card stays face down until the round settles.
pub fn dealer_line(dealer: &Hand) -> String {
    let shown = dealer
        .iter()
        .enumerate()
        .map(|(index, card)| {
            if index == 1 {
                "Card".to_string()
            } else {
                card.to_string()
            }
        })
        .collect::<Vec<_>>();
    format!("Dealer: {}", shown.join(", "))
}
