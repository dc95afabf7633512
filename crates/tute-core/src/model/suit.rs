use core::fmt;
use core::ops::{Index, IndexMut};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Suit {
    Oros = 0,
    Copas = 1,
    Espadas = 2,
    Bastos = 3,
}

impl Suit {
    /// Scan order used when dealing the deck and when looking for cantes.
    pub const ALL: [Suit; 4] = [Suit::Oros, Suit::Copas, Suit::Espadas, Suit::Bastos];

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Suit::Oros),
            1 => Some(Suit::Copas),
            2 => Some(Suit::Espadas),
            3 => Some(Suit::Bastos),
            _ => None,
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn name(self) -> &'static str {
        match self {
            Suit::Oros => "oros",
            Suit::Copas => "copas",
            Suit::Espadas => "espadas",
            Suit::Bastos => "bastos",
        }
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Fixed-size table with one slot per suit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SuitTable<T> {
    slots: [T; 4],
}

impl<T> SuitTable<T> {
    pub const fn from_array(slots: [T; 4]) -> Self {
        Self { slots }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Suit, &T)> {
        Suit::ALL.iter().copied().zip(self.slots.iter())
    }
}

impl<T> Index<Suit> for SuitTable<T> {
    type Output = T;

    fn index(&self, suit: Suit) -> &T {
        &self.slots[suit.index()]
    }
}

impl<T> IndexMut<Suit> for SuitTable<T> {
    fn index_mut(&mut self, suit: Suit) -> &mut T {
        &mut self.slots[suit.index()]
    }
}
