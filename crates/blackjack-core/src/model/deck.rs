use crate::model::card::Card;
use crate::model::rank::Rank;
use crate::model::suit::Suit;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use thiserror::Error;
use tracing::debug;

pub const STANDARD_DECK_SIZE: usize = 52;
pub const JOKERS_PER_DECK: usize = 2;

/// Draw pile. Cards are dealt from the end.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// Every rank of every suit, rank-major, with two jokers appended on request.
    pub fn create(include_jokers: bool) -> Self {
        let capacity = STANDARD_DECK_SIZE + if include_jokers { JOKERS_PER_DECK } else { 0 };
        let mut cards = Vec::with_capacity(capacity);
        for rank in Rank::ORDERED.iter().copied() {
            for suit in Suit::ALL.iter().copied() {
                cards.push(Card::new(rank, suit));
            }
        }
        if include_jokers {
            cards.extend([Card::Joker; JOKERS_PER_DECK]);
        }
        Self { cards }
    }

    pub fn from_cards(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Next card to be dealt.
    pub fn peek(&self) -> Option<&Card> {
        self.cards.last()
    }

    fn pop(&mut self) -> Option<Card> {
        self.cards.pop()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Discard {
    cards: Vec<Card>,
}

impl Discard {
    pub fn new() -> Self {
        Self { cards: Vec::new() }
    }

    pub fn from_cards(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Appends cards in order.
    pub fn extend<I: IntoIterator<Item = Card>>(&mut self, cards: I) {
        self.cards.extend(cards);
    }

    fn into_cards(self) -> Vec<Card> {
        self.cards
    }
}

/// Result of a draw: the dealt cards plus the updated piles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draw {
    pub cards: Vec<Card>,
    pub deck: Deck,
    pub discard: Discard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DeckError {
    #[error("cannot draw {requested} card(s): only {available} left in deck and discard")]
    Exhausted { requested: usize, available: usize },
}

/// Owns the shuffle source and moves cards between the draw and discard piles.
#[derive(Debug, Clone)]
pub struct DeckManager<R = StdRng> {
    rng: R,
    seed: Option<u64>,
    reshuffles: u32,
}

impl DeckManager<StdRng> {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed: Some(seed),
            reshuffles: 0,
        }
    }

    pub fn from_entropy() -> Self {
        Self::seeded(rand::random())
    }
}

impl<R: rand::Rng> DeckManager<R> {
    pub fn with_rng(rng: R) -> Self {
        Self {
            rng,
            seed: None,
            reshuffles: 0,
        }
    }

    /// Seed the random source was built from, if any. Replaying it reproduces every shuffle.
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn reshuffles(&self) -> u32 {
        self.reshuffles
    }

    pub fn shuffle(&mut self, deck: Deck) -> Deck {
        let mut cards = deck.cards;
        cards.shuffle(&mut self.rng);
        Deck { cards }
    }

    /// Draws `count` cards, turning the discard pile into a fresh shuffled deck
    /// whenever the deck runs dry. Fails without touching either pile when the
    /// two together hold fewer than `count` cards.
    pub fn draw(&mut self, deck: Deck, discard: Discard, count: usize) -> Result<Draw, DeckError> {
        let available = deck.len() + discard.len();
        if available < count {
            return Err(DeckError::Exhausted {
                requested: count,
                available,
            });
        }

        let mut deck = deck;
        let mut discard = discard;
        let mut cards = Vec::with_capacity(count);
        while cards.len() < count {
            if deck.is_empty() {
                deck = self.reshuffle(std::mem::take(&mut discard));
            }
            match deck.pop() {
                Some(card) => cards.push(card),
                None => {
                    return Err(DeckError::Exhausted {
                        requested: count,
                        available,
                    });
                }
            }
        }

        Ok(Draw {
            cards,
            deck,
            discard,
        })
    }

    /// Draws exactly one card.
    pub fn draw_one(
        &mut self,
        deck: Deck,
        discard: Discard,
    ) -> Result<(Card, Deck, Discard), DeckError> {
        let Draw {
            mut cards,
            deck,
            discard,
        } = self.draw(deck, discard, 1)?;
        match cards.pop() {
            Some(card) => Ok((card, deck, discard)),
            None => Err(DeckError::Exhausted {
                requested: 1,
                available: 0,
            }),
        }
    }

    fn reshuffle(&mut self, discard: Discard) -> Deck {
        self.reshuffles += 1;
        debug!(
            cards = discard.len(),
            reshuffles = self.reshuffles,
            "reshuffling discard pile into a new deck"
        );
        self.shuffle(Deck::from_cards(discard.into_cards()))
    }
}
