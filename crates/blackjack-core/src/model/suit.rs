use core::fmt;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Suit {
    Hearts = 0,
    Diamonds = 1,
    Clubs = 2,
    Spades = 3,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Hearts, Suit::Diamonds, Suit::Clubs, Suit::Spades];

    pub const fn symbol(self) -> &'static str {
        match self {
            Suit::Hearts => "H",
            Suit::Diamonds => "D",
            Suit::Clubs => "C",
            Suit::Spades => "S",
        }
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Suit::Hearts => "Hearts",
            Suit::Diamonds => "Diamonds",
            Suit::Clubs => "Clubs",
            Suit::Spades => "Spades",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::Suit;

    #[test]
    fn display_uses_full_names() {
        assert_eq!(Suit::Clubs.to_string(), "Clubs");
        assert_eq!(Suit::Hearts.to_string(), "Hearts");
    }

    #[test]
    fn symbols_are_single_letters() {
        for suit in Suit::ALL {
            assert_eq!(suit.symbol().len(), 1);
        }
    }
}
