use crate::core::{Card, Pocket, DECK_SIZE};

/// Number of unordered pairs of distinct cards, C(52, 2).
pub const POCKET_COUNT: usize = DECK_SIZE * (DECK_SIZE - 1) / 2;

/// A value for every possible pocket.
///
/// Storage is a flat triangular array so `get(a, b)` and `get(b, a)` read the
/// same slot. Pairs that aren't a pocket (the same card twice or an index
/// past the deck) have no slot: reads give `T::default()` and writes are
/// dropped.
///
/// # Examples
///
/// ```
/// use holdem_ai::ai::PocketMatrix;
///
/// let mut m: PocketMatrix<u32> = PocketMatrix::default();
/// m.set(3, 40, 7);
/// assert_eq!(7, m.get(40, 3));
/// assert_eq!(0, m.get(5, 5));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PocketMatrix<T> {
    values: Vec<T>,
}

impl<T: Copy + Default> Default for PocketMatrix<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Copy + Default> PocketMatrix<T> {
    /// A matrix with every slot set to `fill`.
    pub fn new(fill: T) -> Self {
        Self {
            values: vec![fill; POCKET_COUNT],
        }
    }

    /// The flat slot for a pair of card indices, if they form a pocket.
    pub fn slot(i: usize, j: usize) -> Option<usize> {
        let (lo, hi) = if i < j { (i, j) } else { (j, i) };
        if lo == hi || hi >= DECK_SIZE {
            return None;
        }
        Some(hi * (hi - 1) / 2 + lo)
    }

    pub fn get(&self, i: usize, j: usize) -> T {
        Self::slot(i, j)
            .map(|s| self.values[s])
            .unwrap_or_default()
    }

    pub fn set(&mut self, i: usize, j: usize, value: T) {
        if let Some(s) = Self::slot(i, j) {
            self.values[s] = value;
        }
    }

    pub fn get_cards(&self, a: Card, b: Card) -> T {
        self.get(a.index(), b.index())
    }

    pub fn set_cards(&mut self, a: Card, b: Card, value: T) {
        self.set(a.index(), b.index(), value);
    }

    pub fn get_pocket(&self, pocket: &Pocket) -> T {
        self.get_cards(pocket.low(), pocket.high())
    }

    pub fn set_pocket(&mut self, pocket: &Pocket, value: T) {
        self.set_cards(pocket.low(), pocket.high(), value);
    }

    /// Reset every slot to `value`.
    pub fn clear(&mut self, value: T) {
        self.values.fill(value);
    }

    /// Walk every pocket with its value.
    pub fn iter(&self) -> impl Iterator<Item = (Pocket, &T)> + '_ {
        Pocket::all().zip(self.values.iter())
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut T> + '_ {
        self.values.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symmetric() {
        let mut m: PocketMatrix<f32> = PocketMatrix::default();
        for (i, j) in [(0, 1), (51, 50), (12, 40)] {
            m.set(i, j, (i + j) as f32);
            assert_eq!(m.get(i, j), m.get(j, i));
        }
        m.set(40, 12, 1.5);
        assert_eq!(1.5, m.get(12, 40));
    }

    #[test]
    fn test_slots_cover_every_pocket_once() {
        let mut seen = vec![false; POCKET_COUNT];
        for hi in 0..DECK_SIZE {
            for lo in 0..hi {
                let s = PocketMatrix::<u8>::slot(lo, hi).unwrap();
                assert!(!seen[s]);
                seen[s] = true;
            }
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn test_invalid_pairs() {
        let mut m: PocketMatrix<i32> = PocketMatrix::new(4);
        assert_eq!(0, m.get(7, 7));
        assert_eq!(0, m.get(3, 52));
        m.set(9, 9, 100);
        m.set(60, 1, 100);
        assert!(m.iter().all(|(_, v)| *v == 4));
    }

    #[test]
    fn test_pocket_and_card_access() {
        let mut m: PocketMatrix<u32> = PocketMatrix::default();
        let p = Pocket::from_str_cards("AsKh").unwrap();
        m.set_pocket(&p, 11);
        assert_eq!(11, m.get_cards(p.high(), p.low()));
        assert_eq!(11, m.get(48, 46));
    }

    #[test]
    fn test_iter_matches_slots() {
        let mut m: PocketMatrix<usize> = PocketMatrix::default();
        for p in Pocket::all() {
            m.set_pocket(&p, p.low().index() * 100 + p.high().index());
        }
        for (p, v) in m.iter() {
            assert_eq!(p.low().index() * 100 + p.high().index(), *v);
        }
    }

    #[test]
    fn test_clear() {
        let mut m: PocketMatrix<f64> = PocketMatrix::new(0.5);
        m.set(1, 2, 9.0);
        m.clear(2.0);
        assert_eq!(2.0, m.get(1, 2));
        assert_eq!(2.0, m.get(50, 51));
    }
}
