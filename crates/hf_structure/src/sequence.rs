//! Nucleotide sequences over the RNA alphabet {A, C, G, U}.
//!
//! Parsing is case-insensitive, the stored sequence is always uppercase.

use std::fmt;
use std::ops::Index;

use crate::InvalidInput;
use crate::NAIDX;


/// A single nucleotide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Base {
    A,
    C,
    G,
    U,
}

impl Base {
    /// The Watson-Crick partner of this base.
    pub fn complement(self) -> Base {
        match self {
            Base::A => Base::U,
            Base::U => Base::A,
            Base::C => Base::G,
            Base::G => Base::C,
        }
    }

    /// Watson-Crick complementarity (A-U, G-C), optionally extended by
    /// G-U wobble pairs.
    pub fn pairs_with(self, other: Base, wobble: bool) -> bool {
        other == self.complement()
            || (wobble && matches!((self, other), (Base::G, Base::U) | (Base::U, Base::G)))
    }
}

impl TryFrom<char> for Base {
    type Error = char;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        match c.to_ascii_uppercase() {
            'A' => Ok(Base::A),
            'C' => Ok(Base::C),
            'G' => Ok(Base::G),
            'U' => Ok(Base::U),
            _ => Err(c),
        }
    }
}

impl From<Base> for char {
    fn from(b: Base) -> Self {
        match b {
            Base::A => 'A',
            Base::C => 'C',
            Base::G => 'G',
            Base::U => 'U',
        }
    }
}

/// An RNA sequence.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Sequence(Vec<Base>);

impl Sequence {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Base> + '_ {
        self.0.iter().copied()
    }

    pub fn as_slice(&self) -> &[Base] {
        &self.0
    }

    /// Whether positions `i` and `j` can form a base pair.
    pub fn can_pair(&self, i: usize, j: usize, wobble: bool) -> bool {
        self.0[i].pairs_with(self.0[j], wobble)
    }
}

impl TryFrom<&str> for Sequence {
    type Error = InvalidInput;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        let bases = s.chars()
            .enumerate()
            .map(|(position, c)| Base::try_from(c)
                .map_err(|symbol| InvalidInput::InvalidSymbol { symbol, position }))
            .collect::<Result<Vec<_>, _>>()?;

        if bases.len() > NAIDX::MAX as usize {
            return Err(InvalidInput::SequenceTooLong(bases.len()));
        }
        Ok(Sequence(bases))
    }
}

impl Index<usize> for Sequence {
    type Output = Base;

    fn index(&self, i: usize) -> &Base {
        &self.0[i]
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in &self.0 {
            write!(f, "{}", char::from(b))?;
        }
        Ok(())
    }
}
