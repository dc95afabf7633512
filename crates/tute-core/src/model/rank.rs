use core::fmt;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Rank {
    As = 1,
    Dos = 2,
    Tres = 3,
    Cuatro = 4,
    Cinco = 5,
    Seis = 6,
    Siete = 7,
    Ocho = 8,
    Nueve = 9,
    Sota = 10,
    Caballo = 11,
    Rey = 12,
}

impl Rank {
    pub const ORDERED: [Rank; 12] = [
        Rank::As,
        Rank::Dos,
        Rank::Tres,
        Rank::Cuatro,
        Rank::Cinco,
        Rank::Seis,
        Rank::Siete,
        Rank::Ocho,
        Rank::Nueve,
        Rank::Sota,
        Rank::Caballo,
        Rank::Rey,
    ];

    pub const fn from_value(value: u8) -> Option<Self> {
        match value {
            1 => Some(Rank::As),
            2 => Some(Rank::Dos),
            3 => Some(Rank::Tres),
            4 => Some(Rank::Cuatro),
            5 => Some(Rank::Cinco),
            6 => Some(Rank::Seis),
            7 => Some(Rank::Siete),
            8 => Some(Rank::Ocho),
            9 => Some(Rank::Nueve),
            10 => Some(Rank::Sota),
            11 => Some(Rank::Caballo),
            12 => Some(Rank::Rey),
            _ => None,
        }
    }

    /// Face value, 1 (as) through 12 (rey).
    pub const fn value(self) -> u8 {
        self as u8
    }

    /// Strength inside a suit: 1 beats everything, 12 loses to everything.
    pub const fn trick_ranking(self) -> u8 {
        match self {
            Rank::As => 1,
            Rank::Tres => 2,
            Rank::Rey => 3,
            Rank::Caballo => 4,
            Rank::Sota => 5,
            Rank::Nueve => 6,
            Rank::Ocho => 7,
            Rank::Siete => 8,
            Rank::Seis => 9,
            Rank::Cinco => 10,
            Rank::Cuatro => 11,
            Rank::Dos => 12,
        }
    }

    pub const fn points(self) -> u32 {
        match self {
            Rank::As => 11,
            Rank::Tres => 10,
            Rank::Rey => 4,
            Rank::Caballo => 3,
            Rank::Sota => 2,
            _ => 0,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Rank::As => "el as",
            Rank::Dos => "el dos",
            Rank::Tres => "el tres",
            Rank::Cuatro => "el cuatro",
            Rank::Cinco => "el cinco",
            Rank::Seis => "el seis",
            Rank::Siete => "el siete",
            Rank::Ocho => "el ocho",
            Rank::Nueve => "el nueve",
            Rank::Sota => "la sota",
            Rank::Caballo => "el caballo",
            Rank::Rey => "el rey",
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::Rank;

    #[test]
    fn from_value_maps() {
        assert_eq!(Rank::from_value(11), Some(Rank::Caballo));
        assert_eq!(Rank::from_value(0), None);
        assert_eq!(Rank::from_value(13), None);
    }

    #[test]
    fn trick_rankings_form_a_permutation() {
        let mut rankings: Vec<u8> = Rank::ORDERED.iter().map(|r| r.trick_ranking()).collect();
        rankings.sort_unstable();
        assert_eq!(rankings, (1..=12).collect::<Vec<u8>>());
    }

    #[test]
    fn ace_and_three_carry_most_points() {
        assert_eq!(Rank::As.points(), 11);
        assert_eq!(Rank::Tres.points(), 10);
        let total: u32 = Rank::ORDERED.iter().map(|r| r.points()).sum();
        assert_eq!(total, 30);
    }

    #[test]
    fn display_matches_names() {
        assert_eq!(Rank::Sota.to_string(), "la sota");
        assert_eq!(Rank::Rey.to_string(), "el rey");
    }
}
