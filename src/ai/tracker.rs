//! Fixed size, recency weighted statistics.
//!
//! A tracker remembers the last `capacity` observations of something about a
//! player. Until more than `threshold` observations have been seen every
//! statistic hands back the caller's default instead of a number drawn from
//! too little data.
//!
//! Both trackers encode to a single line so that they can be stored in a
//! string keyed map:
//!
//! ```text
//! threshold,count,full,newest,capacity,values
//! ```
//!
//! `newest` is the slot holding the most recent entry. Boolean values are a
//! run of `T`/`F` with one letter per slot, float values are joined with `:`.

use std::fmt;

use tracing::trace;

use super::errors::{AiError, Result};

/// Storage shared by both trackers.
#[derive(Debug, Clone, PartialEq)]
struct Ring<T> {
    threshold: usize,
    slots: Vec<T>,
    /// The slot the next entry is written to.
    next: usize,
    count: usize,
    full: bool,
}

impl<T: Copy + Default> Ring<T> {
    fn new(capacity: usize, threshold: usize) -> Self {
        Self {
            threshold,
            slots: vec![T::default(); capacity.max(1)],
            next: 0,
            count: 0,
            full: false,
        }
    }

    fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Store a value, returning the one it pushed out.
    fn push(&mut self, value: T) -> Option<T> {
        let evicted = if self.full {
            Some(self.slots[self.next])
        } else {
            None
        };
        self.slots[self.next] = value;
        self.next = (self.next + 1) % self.capacity();
        if self.next == 0 {
            self.full = true;
        }
        self.count = (self.count + 1).min(self.capacity());
        evicted
    }

    fn is_ready(&self) -> bool {
        self.count > self.threshold
    }

    /// Held entries, oldest first.
    fn iter(&self) -> impl Iterator<Item = T> + '_ {
        let start = if self.full { self.next } else { 0 };
        (0..self.count).map(move |i| self.slots[(start + i) % self.capacity()])
    }

    fn newest_slot(&self) -> usize {
        if self.count == 0 {
            0
        } else {
            (self.next + self.capacity() - 1) % self.capacity()
        }
    }

    fn clear(&mut self) {
        self.slots.fill(T::default());
        self.next = 0;
        self.count = 0;
        self.full = false;
    }

    /// Mean of `f` over the held entries, the newest weighing the most.
    fn weighted_mean(&self, f: impl Fn(T) -> f32) -> f32 {
        let (mut sum, mut weights) = (0.0f32, 0.0f32);
        for (i, v) in self.iter().enumerate() {
            let w = (i + 1) as f32;
            sum += w * f(v);
            weights += w;
        }
        sum / weights
    }

    fn encode_with(&self, values: String) -> String {
        format!(
            "{},{},{},{},{},{}",
            self.threshold,
            self.count,
            self.full,
            self.newest_slot(),
            self.capacity(),
            values
        )
    }

    /// Parse the five header fields and hand back the raw values field.
    fn decode_header(s: &str) -> Result<(Self, &str)> {
        let bad = || AiError::TrackerDecode(s.to_string());
        let mut fields = s.splitn(6, ',');
        let mut next_field = || fields.next().ok_or_else(bad);
        let threshold: usize = next_field()?.trim().parse().map_err(|_| bad())?;
        let count: usize = next_field()?.trim().parse().map_err(|_| bad())?;
        let full: bool = next_field()?.trim().parse().map_err(|_| bad())?;
        let newest: usize = next_field()?.trim().parse().map_err(|_| bad())?;
        let capacity: usize = next_field()?.trim().parse().map_err(|_| bad())?;
        let values = next_field()?;

        // Every slot takes at least one character.
        if capacity == 0 || capacity > values.len() || count > capacity || newest >= capacity {
            return Err(bad());
        }
        if full != (count == capacity) {
            return Err(bad());
        }
        if !full && count > 0 && newest + 1 != count {
            return Err(bad());
        }
        let next = if count == 0 { 0 } else { (newest + 1) % capacity };
        let ring = Ring {
            threshold,
            slots: vec![T::default(); capacity],
            next,
            count,
            full,
        };
        Ok((ring, values))
    }
}

impl<T: Copy + Default + fmt::Display> Ring<T> {
    fn fmt_entries(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, v) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{v}")?;
        }
        f.write_str("]")
    }
}

/// Tracks how often something happened.
///
/// # Examples
///
/// ```
/// use holdem_ai::ai::BooleanTracker;
///
/// let mut t = BooleanTracker::new(5, 2);
/// t.add_entry(true);
/// t.add_entry(false);
/// assert_eq!(0.25, t.percent_true(0.25));
/// t.add_entry(true);
/// assert!(t.is_ready());
/// assert_eq!("2,3,false,2,5,TFTFF", t.encode());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct BooleanTracker {
    ring: Ring<bool>,
    count_true: usize,
}

impl BooleanTracker {
    /// A tracker of `capacity` entries, ready after more than `threshold`.
    pub fn new(capacity: usize, threshold: usize) -> Self {
        Self {
            ring: Ring::new(capacity, threshold),
            count_true: 0,
        }
    }

    pub fn add_entry(&mut self, value: bool) {
        if self.ring.push(value) == Some(true) {
            self.count_true -= 1;
        }
        if value {
            self.count_true += 1;
        }
    }

    /// Entries currently held.
    pub fn count(&self) -> usize {
        self.ring.count
    }

    pub fn count_true(&self) -> usize {
        self.count_true
    }

    pub fn capacity(&self) -> usize {
        self.ring.capacity()
    }

    pub fn threshold(&self) -> usize {
        self.ring.threshold
    }

    pub fn is_full(&self) -> bool {
        self.ring.full
    }

    pub fn is_ready(&self) -> bool {
        self.ring.is_ready()
    }

    pub fn percent_true(&self, default: f32) -> f32 {
        if !self.is_ready() {
            return default;
        }
        self.count_true as f32 / self.ring.count as f32
    }

    /// Like `percent_true` with later entries counting for more.
    pub fn weighted_percent_true(&self, default: f32) -> f32 {
        if !self.is_ready() {
            return default;
        }
        self.ring.weighted_mean(|v| if v { 1.0 } else { 0.0 })
    }

    /// Length of the run of `value` starting at the oldest entry held.
    pub fn consecutive(&self, value: bool) -> usize {
        self.ring.iter().take_while(|v| *v == value).count()
    }

    pub fn clear(&mut self) {
        self.ring.clear();
        self.count_true = 0;
    }

    pub fn encode(&self) -> String {
        let values = self
            .ring
            .slots
            .iter()
            .map(|v| if *v { 'T' } else { 'F' })
            .collect();
        self.ring.encode_with(values)
    }

    /// Restore the state written by `encode`. `None` or an empty string
    /// leave the tracker untouched.
    pub fn decode(&mut self, encoded: Option<&str>) -> Result<()> {
        let s = match encoded {
            Some(s) if !s.trim().is_empty() => s.trim(),
            _ => return Ok(()),
        };
        let (mut ring, values) = Ring::<bool>::decode_header(s)?;
        if values.chars().count() != ring.capacity() {
            return Err(AiError::TrackerDecode(s.to_string()));
        }
        for (slot, c) in ring.slots.iter_mut().zip(values.chars()) {
            *slot = match c {
                'T' => true,
                'F' => false,
                _ => return Err(AiError::TrackerDecode(s.to_string())),
            };
        }
        self.count_true = ring.iter().filter(|v| *v).count();
        self.ring = ring;
        trace!(encoded = s, "decoded boolean tracker");
        Ok(())
    }
}

impl fmt::Display for BooleanTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.ring.fmt_entries(f)
    }
}

/// Tracks a running measurement, such as how tight a player has been.
#[derive(Debug, Clone, PartialEq)]
pub struct FloatTracker {
    ring: Ring<f32>,
}

impl FloatTracker {
    pub fn new(capacity: usize, threshold: usize) -> Self {
        Self {
            ring: Ring::new(capacity, threshold),
        }
    }

    pub fn add_entry(&mut self, value: f32) {
        self.ring.push(value);
    }

    pub fn count(&self) -> usize {
        self.ring.count
    }

    pub fn capacity(&self) -> usize {
        self.ring.capacity()
    }

    pub fn threshold(&self) -> usize {
        self.ring.threshold
    }

    pub fn is_full(&self) -> bool {
        self.ring.full
    }

    pub fn is_ready(&self) -> bool {
        self.ring.is_ready()
    }

    pub fn average(&self, default: f32) -> f32 {
        if !self.is_ready() {
            return default;
        }
        self.ring.iter().sum::<f32>() / self.ring.count as f32
    }

    /// The mean with the oldest entry weighted 1 and the newest `count`.
    pub fn weighted_average(&self, default: f32) -> f32 {
        if !self.is_ready() {
            return default;
        }
        self.ring.weighted_mean(|v| v)
    }

    pub fn clear(&mut self) {
        self.ring.clear();
    }

    pub fn encode(&self) -> String {
        let values = self
            .ring
            .slots
            .iter()
            .map(|v| format!("{v:?}"))
            .collect::<Vec<_>>()
            .join(":");
        self.ring.encode_with(values)
    }

    /// Restore the state written by `encode`. `None` or an empty string
    /// leave the tracker untouched.
    pub fn decode(&mut self, encoded: Option<&str>) -> Result<()> {
        let s = match encoded {
            Some(s) if !s.trim().is_empty() => s.trim(),
            _ => return Ok(()),
        };
        let (mut ring, values) = Ring::<f32>::decode_header(s)?;
        let parsed = values
            .split(':')
            .map(|v| v.trim().parse::<f32>())
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|_| AiError::TrackerDecode(s.to_string()))?;
        if parsed.len() != ring.capacity() {
            return Err(AiError::TrackerDecode(s.to_string()));
        }
        ring.slots = parsed;
        self.ring = ring;
        trace!(encoded = s, "decoded float tracker");
        Ok(())
    }
}

impl fmt::Display for FloatTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.ring.fmt_entries(f)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn booleans(values: &[bool]) -> BooleanTracker {
        let mut t = BooleanTracker::new(5, 2);
        for v in values {
            t.add_entry(*v);
        }
        t
    }

    #[test]
    fn test_readiness_needs_more_than_threshold() {
        let mut t = BooleanTracker::new(5, 2);
        t.add_entry(true);
        t.add_entry(true);
        assert!(!t.is_ready());
        assert_eq!(0.3, t.percent_true(0.3));
        assert_eq!(0.3, t.weighted_percent_true(0.3));
        t.add_entry(true);
        assert!(t.is_ready());

        let mut one = BooleanTracker::new(1, 0);
        assert!(!one.is_ready());
        one.add_entry(false);
        assert!(one.is_ready());
    }

    #[test]
    fn test_all_true_and_all_false() {
        let t = booleans(&[true; 5]);
        assert_eq!(1.0, t.percent_true(0.5));
        assert_eq!(1.0, t.weighted_percent_true(0.5));
        let f = booleans(&[false; 5]);
        assert_eq!(0.0, f.percent_true(0.5));
        assert_eq!(0.0, f.weighted_percent_true(0.5));
    }

    #[test]
    fn test_partial_percent_between() {
        let t = booleans(&[true, false, true, false]);
        assert_relative_eq!(0.5, t.percent_true(0.0));
        // (1 + 3) / (1 + 2 + 3 + 4)
        assert_relative_eq!(0.4, t.weighted_percent_true(0.0));
    }

    #[test]
    fn test_overwrites_oldest() {
        let mut t = booleans(&[true, true, true, true, true]);
        assert!(t.is_full());
        t.add_entry(false);
        assert_eq!(5, t.count());
        assert_eq!(4, t.count_true());
        assert_eq!("[true, true, true, true, false]", t.to_string());
        for _ in 0..5 {
            t.add_entry(false);
        }
        assert_eq!(0, t.count_true());
    }

    #[test]
    fn test_consecutive_from_oldest() {
        assert_eq!(1, booleans(&[true, false]).consecutive(true));
        let t = booleans(&[true, true, false]);
        assert_eq!(2, t.consecutive(true));
        assert_eq!(0, t.consecutive(false));
        assert_eq!(2, booleans(&[false, false, true, true, true]).consecutive(false));
        assert_eq!(5, booleans(&[true; 5]).consecutive(true));
        assert_eq!(0, booleans(&[]).consecutive(true));
    }

    #[test]
    fn test_boolean_encode() {
        assert_eq!("2,0,false,0,5,FFFFF", booleans(&[]).encode());
        assert_eq!("2,3,false,2,5,TFTFF", booleans(&[true, false, true]).encode());
        assert_eq!(
            "2,5,true,4,5,TFTFT",
            booleans(&[true, false, true, false, true]).encode()
        );
        // Two more entries wrap round to slot 1.
        assert_eq!(
            "2,5,true,1,5,FFTFT",
            booleans(&[true, false, true, false, true, false, false]).encode()
        );
    }

    #[test]
    fn test_boolean_decode_restores_state() {
        let original = booleans(&[true, false, true, false, true, false, true]);
        let mut decoded = BooleanTracker::new(3, 1);
        decoded.decode(Some(&original.encode())).unwrap();
        assert_eq!(original, decoded);
        assert_eq!(original.count_true(), decoded.count_true());
        assert_eq!(
            original.weighted_percent_true(0.0),
            decoded.weighted_percent_true(0.0)
        );

        // And it keeps working from where it left off.
        let mut a = original.clone();
        a.add_entry(false);
        decoded.add_entry(false);
        assert_eq!(a, decoded);
    }

    #[test]
    fn test_decode_nothing_is_a_no_op() {
        let mut t = booleans(&[true]);
        t.decode(None).unwrap();
        t.decode(Some("")).unwrap();
        assert_eq!(1, t.count());
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let mut t = BooleanTracker::new(5, 2);
        for bad in [
            "junk",
            "2,3,false,2,5",
            "2,3,false,2,5,TFT",
            "2,3,false,2,5,TFTXF",
            "2,6,false,2,5,TFTFF",
            "2,3,false,7,5,TFTFF",
        ] {
            assert!(
                matches!(t.decode(Some(bad)), Err(AiError::TrackerDecode(_))),
                "{bad}"
            );
        }
        assert_eq!(0, t.count());
    }

    #[test]
    fn test_clear_keeps_shape() {
        let mut t = booleans(&[true, true, true, true, true, true]);
        t.clear();
        assert_eq!(0, t.count());
        assert_eq!(0, t.count_true());
        assert!(!t.is_full());
        assert_eq!(5, t.capacity());
        assert_eq!(2, t.threshold());
    }

    #[test]
    fn test_float_weighted_average() {
        let mut t = FloatTracker::new(5, 2);
        for v in [1.0, 2.0, 3.0] {
            t.add_entry(v);
        }
        assert_relative_eq!(2.0, t.average(0.0));
        assert_relative_eq!(14.0 / 6.0, t.weighted_average(0.0));
    }

    #[test]
    fn test_float_default_until_ready() {
        let mut t = FloatTracker::new(5, 2);
        t.add_entry(1.0);
        assert_eq!(99.0, t.weighted_average(99.0));
        assert_eq!(99.0, t.average(99.0));
    }

    #[test]
    fn test_float_wraps() {
        let mut t = FloatTracker::new(5, 2);
        for v in 0..7 {
            t.add_entry(v as f32);
        }
        assert!(t.is_full());
        assert_eq!(5, t.count());
        assert_eq!("[2, 3, 4, 5, 6]", t.to_string());
        assert_relative_eq!(4.0, t.average(0.0));
    }

    #[test]
    fn test_float_encode_round_trip() {
        let mut t = FloatTracker::new(5, 2);
        assert!(t.encode().starts_with("2,0,false,0,5,"));
        for v in [1.5, 0.0, -1.25] {
            t.add_entry(v);
        }
        let encoded = t.encode();
        assert_eq!("2,3,false,2,5,1.5:0.0:-1.25:0.0:0.0", encoded);

        let mut decoded = FloatTracker::new(5, 2);
        decoded.decode(Some(&encoded)).unwrap();
        assert_eq!(t, decoded);
        assert_eq!(t.to_string(), decoded.to_string());
        assert_eq!(t.weighted_average(0.0), decoded.weighted_average(0.0));
    }

    #[test]
    fn test_float_decode_full() {
        let mut t = FloatTracker::new(5, 2);
        for v in 0..8 {
            t.add_entry(v as f32 * 1.5);
        }
        let mut decoded = FloatTracker::new(5, 2);
        decoded.decode(Some(&t.encode())).unwrap();
        assert!(decoded.is_full());
        assert_eq!(t.count(), decoded.count());
        assert_eq!(t.weighted_average(0.0), decoded.weighted_average(0.0));
        assert!(matches!(
            decoded.decode(Some("2,1,false,0,2,1.0:x")),
            Err(AiError::TrackerDecode(_))
        ));
    }
}
