//! The indexed space of candidate base pairs.
//!
//! For a sequence of length `n`, every pair `(i, j)` with `j - i > min_loop`
//! is a candidate. Candidates are numbered `0..P` in row-major order over the
//! upper triangle: all pairs of `i = 0` first (ascending `j`), then `i = 1`,
//! and so on. The relaxation network keeps one value per candidate, and the
//! coupling matrix is indexed by candidate pairs on both axes.
//!

use nohash_hasher::IntMap;

use crate::InvalidInput;
use crate::Pair;
use crate::NAIDX;
use crate::P1KEY;


#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairSpace {
    length: usize,
    min_loop: usize,
    pairs: Vec<Pair>,
    index: IntMap<P1KEY, usize>,
}

impl PairSpace {
    /// Enumerate all candidate pairs for a sequence of the given length.
    ///
    /// Fails if `length <= min_loop`, or if the length does not fit `NAIDX`.
    pub fn new(length: usize, min_loop: usize) -> Result<Self, InvalidInput> {
        if length <= min_loop {
            return Err(InvalidInput::SequenceTooShort { length, min_loop });
        }
        if length > NAIDX::MAX as usize {
            return Err(InvalidInput::SequenceTooLong(length));
        }

        let mut pairs = Vec::with_capacity(Self::expected_size(length, min_loop));
        let mut index = IntMap::default();
        for i in 0..length {
            for j in (i + min_loop + 1)..length {
                let pair = Pair::new(i as NAIDX, j as NAIDX);
                index.insert(pair.key(), pairs.len());
                pairs.push(pair);
            }
        }

        Ok(Self {
            length,
            min_loop,
            pairs,
            index,
        })
    }

    /// Closed form for the number of candidates: sum over spans `d` in
    /// `min_loop + 1 .. n` of `n - d`.
    pub fn expected_size(length: usize, min_loop: usize) -> usize {
        ((min_loop + 1)..length).map(|d| length - d).sum()
    }

    /// Number of candidate pairs.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Length of the underlying sequence.
    pub fn length(&self) -> usize {
        self.length
    }

    pub fn min_loop(&self) -> usize {
        self.min_loop
    }

    /// The positions of candidate `k`.
    pub fn pair(&self, k: usize) -> Option<Pair> {
        self.pairs.get(k).copied()
    }

    /// The candidate index of positions `(i, j)`, if that pair is admissible.
    pub fn index_of(&self, i: usize, j: usize) -> Option<usize> {
        if i >= j || j >= self.length {
            return None;
        }
        let key = Pair::new(i as NAIDX, j as NAIDX).key();
        self.index.get(&key).copied()
    }

    /// All candidates in index order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = Pair> + '_ {
        self.pairs.iter().copied()
    }

    pub fn as_slice(&self) -> &[Pair] {
        &self.pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MIN_LOOP;

    #[test]
    fn test_too_short() {
        for n in 0..=MIN_LOOP {
            assert_eq!(
                PairSpace::new(n, MIN_LOOP),
                Err(InvalidInput::SequenceTooShort { length: n, min_loop: MIN_LOOP })
            );
        }
        let space = PairSpace::new(MIN_LOOP + 1, MIN_LOOP).unwrap();
        assert!(space.is_empty());
    }

    #[test]
    fn test_size_matches_closed_form() {
        for n in 5..60 {
            let space = PairSpace::new(n, MIN_LOOP).unwrap();
            let expected: usize = (5..n).map(|d| n - d).sum();
            assert_eq!(space.len(), expected);
            assert_eq!(PairSpace::expected_size(n, MIN_LOOP), expected);
        }
    }

    #[test]
    fn test_nine_nucleotides() {
        let space = PairSpace::new(9, MIN_LOOP).unwrap();
        assert_eq!(space.len(), 10);
        let expected = [(0, 5), (0, 6), (0, 7), (0, 8), (1, 6), (1, 7), (1, 8), (2, 7), (2, 8), (3, 8)];
        let found: Vec<(NAIDX, NAIDX)> = space.iter().map(|p| (p.i(), p.j())).collect();
        assert_eq!(found, expected);
    }

    #[test]
    fn test_index_bijection() {
        let space = PairSpace::new(23, MIN_LOOP).unwrap();
        for (k, p) in space.iter().enumerate() {
            assert!(p.span() > MIN_LOOP);
            assert_eq!(space.index_of(p.i() as usize, p.j() as usize), Some(k));
            assert_eq!(space.pair(k), Some(p));
        }
        assert_eq!(space.pair(space.len()), None);
        assert_eq!(space.index_of(0, 4), None);
        assert_eq!(space.index_of(5, 0), None);
        assert_eq!(space.index_of(0, 23), None);
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(PairSpace::new(17, MIN_LOOP), PairSpace::new(17, MIN_LOOP));
    }
}
