//! Discrete structures as sets of base pairs.
//!
//! The relaxation network works on continuous strengths; whenever a
//! structure has to be named exactly (a reference given in dot-bracket
//! notation, or what survives pruning) it is a `PairSet`. Each pair is
//! stored as its packed `P1KEY`, so membership tests go through a
//! hash-free integer set.
//!
//! A pruned network may leave a position with two partners, or crossing
//! pairs. Such sets are valid `PairSet`s, they just have no dot-bracket
//! form.
//!

use std::fmt;
use ndarray::Array2;
use nohash_hasher::IntSet;

use crate::InvalidInput;
use crate::NAIDX;
use crate::P1KEY;


/// Positions `i < j` joined by a bond.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pair {
    i: NAIDX,
    j: NAIDX,
}

impl Pair {
    pub fn new(i: NAIDX, j: NAIDX) -> Self {
        debug_assert!(i < j, "pair ({i},{j}) is not ordered");
        Pair { i, j }
    }

    pub fn i(&self) -> NAIDX {
        self.i
    }

    pub fn j(&self) -> NAIDX {
        self.j
    }

    /// `j - i`.
    pub fn span(&self) -> usize {
        usize::from(self.j - self.i)
    }

    /// `i` in the high half, `j` in the low half.
    pub fn key(&self) -> P1KEY {
        P1KEY::from(self.i) << NAIDX::BITS | P1KEY::from(self.j)
    }

    pub fn from_key(key: P1KEY) -> Self {
        Pair::new((key >> NAIDX::BITS) as NAIDX, key as NAIDX)
    }
}

impl fmt::Display for Pair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.i, self.j)
    }
}

/// Unordered base pairs over a sequence of fixed length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairSet {
    length: usize,
    keys: IntSet<P1KEY>,
}

impl PairSet {
    pub fn new(length: usize) -> Self {
        Self {
            length,
            keys: IntSet::default(),
        }
    }

    /// Parse a dot-bracket string: `(` and `)` pair up, `.` is unpaired.
    pub fn from_dot_bracket(s: &str) -> Result<Self, InvalidInput> {
        let length = s.chars().count();
        if length > usize::from(NAIDX::MAX) {
            return Err(InvalidInput::SequenceTooLong(length));
        }
        let mut set = PairSet::new(length);
        let mut open: Vec<NAIDX> = Vec::new();
        for (position, symbol) in s.chars().enumerate() {
            match symbol {
                '(' => open.push(position as NAIDX),
                ')' => {
                    let i = open.pop().ok_or(InvalidInput::UnbalancedBracket(position))?;
                    set.insert(Pair::new(i, position as NAIDX));
                }
                '.' => (),
                _ => return Err(InvalidInput::InvalidStructureSymbol { symbol, position }),
            }
        }
        match open.last() {
            Some(&i) => Err(InvalidInput::UnbalancedBracket(usize::from(i))),
            None => Ok(set),
        }
    }

    /// Every strictly upper-triangular entry `(i, j)` of a square matrix
    /// that reaches `threshold`.
    pub fn from_matrix(matrix: &Array2<f64>, threshold: f64) -> Self {
        let (n, m) = matrix.dim();
        debug_assert_eq!(n, m);
        let mut set = PairSet::new(n);
        matrix.indexed_iter()
            .filter(|&((i, j), &value)| i < j && value >= threshold)
            .for_each(|((i, j), _)| {
                set.insert(Pair::new(i as NAIDX, j as NAIDX));
            });
        set
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Returns false if the pair was already present.
    pub fn insert(&mut self, pair: Pair) -> bool {
        debug_assert!(usize::from(pair.j()) < self.length);
        self.keys.insert(pair.key())
    }

    pub fn contains(&self, pair: &Pair) -> bool {
        self.keys.contains(&pair.key())
    }

    /// In no particular order; see `to_vec` for a sorted list.
    pub fn iter(&self) -> impl Iterator<Item = Pair> + '_ {
        self.keys.iter().map(|&key| Pair::from_key(key))
    }

    /// Sorted by `i`, then `j`.
    pub fn to_vec(&self) -> Vec<Pair> {
        let mut sorted: Vec<Pair> = self.iter().collect();
        sorted.sort_unstable_by_key(|p| (p.i(), p.j()));
        sorted
    }

    /// Length of the sequence the pairs refer to.
    pub fn length(&self) -> usize {
        self.length
    }

    /// `n × n` matrix with a 1 at `(i, j)` for every pair.
    pub fn to_matrix(&self) -> Array2<f64> {
        let mut m = Array2::zeros((self.length, self.length));
        for p in self.iter() {
            m[(usize::from(p.i()), usize::from(p.j()))] = 1.0;
        }
        m
    }

    /// Dot-bracket notation, if every position is paired at most once
    /// and no two pairs cross.
    pub fn dot_bracket(&self) -> Option<String> {
        let mut partner: Vec<Option<usize>> = vec![None; self.length];
        for p in self.iter() {
            let (i, j) = (usize::from(p.i()), usize::from(p.j()));
            if partner[i].replace(j).is_some() || partner[j].replace(i).is_some() {
                return None;
            }
        }

        let mut open = Vec::new();
        let mut db = String::with_capacity(self.length);
        for (k, &other) in partner.iter().enumerate() {
            match other {
                None => db.push('.'),
                Some(j) if j > k => {
                    open.push(k);
                    db.push('(');
                }
                Some(i) => {
                    if open.pop() != Some(i) {
                        return None;
                    }
                    db.push(')');
                }
            }
        }
        Some(db)
    }
}

impl fmt::Display for PairSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (k, pair) in self.to_vec().into_iter().enumerate() {
            if k > 0 {
                f.write_str(",")?;
            }
            write!(f, "{pair}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_packing() {
        let p = Pair::new(7, 300);
        assert_eq!(p.key(), (7 << 16) | 300);
        assert_eq!(Pair::from_key(p.key()), p);
        assert_eq!(p.span(), 293);
        assert_eq!(p.to_string(), "(7,300)");
    }

    #[test]
    fn test_pair_set_from_dot_bracket() {
        let ps = PairSet::from_dot_bracket("((..))").unwrap();
        assert_eq!(ps.length(), 6);
        assert_eq!(ps.len(), 2);
        assert_eq!(ps.to_vec(), vec![Pair::new(0, 5), Pair::new(1, 4)]);
        assert!(ps.contains(&Pair::new(1, 4)));
        assert!(!ps.contains(&Pair::new(0, 4)));

        let empty = PairSet::from_dot_bracket(".....").unwrap();
        assert!(empty.is_empty());
        assert_eq!(empty.length(), 5);
    }

    #[test]
    fn test_dot_bracket_errors() {
        assert_eq!(PairSet::from_dot_bracket("(()"), Err(InvalidInput::UnbalancedBracket(0)));
        assert_eq!(PairSet::from_dot_bracket("())"), Err(InvalidInput::UnbalancedBracket(2)));
        assert_eq!(
            PairSet::from_dot_bracket("(.x)"),
            Err(InvalidInput::InvalidStructureSymbol { symbol: 'x', position: 2 })
        );
    }

    #[test]
    fn test_dot_bracket_too_long() {
        let longest = format!("({})", ".".repeat(usize::from(NAIDX::MAX) - 2));
        let ps = PairSet::from_dot_bracket(&longest).unwrap();
        assert_eq!(ps.to_vec(), vec![Pair::new(0, NAIDX::MAX - 1)]);

        let too_long = format!("({})", ".".repeat(usize::from(NAIDX::MAX)));
        assert_eq!(
            PairSet::from_dot_bracket(&too_long),
            Err(InvalidInput::SequenceTooLong(usize::from(NAIDX::MAX) + 2))
        );
    }

    #[test]
    fn test_dot_bracket_output() {
        let ps = PairSet::from_dot_bracket("((...)).(...)").unwrap();
        assert_eq!(ps.dot_bracket().as_deref(), Some("((...)).(...)"));

        let mut knot = PairSet::new(8);
        knot.insert(Pair::new(0, 4));
        knot.insert(Pair::new(2, 7));
        assert_eq!(knot.dot_bracket(), None);

        let mut shared = PairSet::new(8);
        shared.insert(Pair::new(0, 6));
        shared.insert(Pair::new(0, 7));
        assert_eq!(shared.dot_bracket(), None);
    }

    #[test]
    fn test_matrix_conversions() {
        let ps = PairSet::from_dot_bracket("(.(...).)").unwrap();
        let m = ps.to_matrix();
        assert_eq!(m.dim(), (9, 9));
        assert_eq!(m[(0, 8)], 1.0);
        assert_eq!(m[(2, 6)], 1.0);
        assert_eq!(m.sum(), 2.0);
        assert_eq!(PairSet::from_matrix(&m, 0.5), ps);
        assert!(PairSet::from_matrix(&m, 1.5).is_empty());
    }

    #[test]
    fn test_display() {
        let ps = PairSet::from_dot_bracket("((..))").unwrap();
        assert_eq!(ps.to_string(), "(0,5),(1,4)");
        assert_eq!(PairSet::new(3).to_string(), "");
    }
}
