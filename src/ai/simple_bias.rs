//! Static tables of how likely a player is to hold each starting hand.
//!
//! Starting hands are put in order with the Chen formula, suited before
//! offsuit and higher cards first on ties. Table `t` describes a player who
//! plays roughly `t * 10` percent of hands: the best hands weigh 1.0 and the
//! weight falls away quickly for hands outside that range. Table 10 plays
//! everything.
//!
//! The tables are computed, not measured, so they only approximate real
//! player ranges. They agree with the usual reference points: pairs and
//! big suited aces near the top, small offsuit hands at the bottom.

use std::sync::OnceLock;

use crate::core::{Card, Pocket, Value};

use super::hand_selection::{HandClass, HAND_CLASS_COUNT};

/// Highest table index.
pub const MAX_TABLE: usize = 10;

/// Table weights are stored in thousandths, never below one.
const SCALE: f32 = 1000.0;

struct Tables {
    /// Share of all pockets in stronger classes, by `HandClass::index`.
    percentile: [f32; HAND_CLASS_COUNT],
    bias: [[u16; HAND_CLASS_COUNT]; MAX_TABLE + 1],
}

fn tables() -> &'static Tables {
    static TABLES: OnceLock<Tables> = OnceLock::new();
    TABLES.get_or_init(build_tables)
}

/// Chen score doubled so half points stay integers.
fn chen_x2(class: &HandClass) -> i32 {
    let points = |v: Value| -> i32 {
        match v {
            Value::Ace => 20,
            Value::King => 16,
            Value::Queen => 14,
            Value::Jack => 12,
            v => v as i32 + 2,
        }
    };
    if class.is_pair() {
        return (points(class.high()) * 2).max(10);
    }
    let mut score = points(class.high());
    if class.suited() {
        score += 4;
    }
    let gap = class.high().gap(class.low()) - 1;
    score -= match gap {
        0 => 0,
        1 => 2,
        2 => 4,
        3 => 8,
        _ => 10,
    };
    if gap <= 1 && class.high() < Value::Queen {
        score += 2;
    }
    score
}

fn build_tables() -> Tables {
    let mut classes: Vec<HandClass> = HandClass::all().collect();
    classes.sort_by_key(|c| {
        (
            -chen_x2(c),
            !c.suited(),
            std::cmp::Reverse(c.high()),
            std::cmp::Reverse(c.low()),
        )
    });

    let mut percentile = [0.0f32; HAND_CLASS_COUNT];
    let mut seen = 0usize;
    for c in &classes {
        percentile[c.index()] = seen as f32 / 1326.0;
        seen += c.combos();
    }

    let mut bias = [[0u16; HAND_CLASS_COUNT]; MAX_TABLE + 1];
    for (t, row) in bias.iter_mut().enumerate() {
        let looseness = 1.0 - t as f32 / MAX_TABLE as f32;
        let steepness = 16.0 * looseness * looseness;
        for (slot, p) in row.iter_mut().zip(percentile.iter()) {
            let weight = (1.0 - p).powf(steepness);
            *slot = ((weight * SCALE).round() as u16).clamp(1, SCALE as u16);
        }
    }
    Tables { percentile, bias }
}

/// Lookups into the bias tables.
pub struct SimpleBias;

impl SimpleBias {
    /// Weight of a hand in table `table`, between 0.001 and 1.0. Tables past
    /// the last are read as the last.
    pub fn bias_value(table: usize, a: Card, b: Card) -> f32 {
        Self::class_bias(table, &HandClass::of(a, b))
    }

    pub fn bias_value_pocket(table: usize, pocket: &Pocket) -> f32 {
        Self::class_bias(table, &HandClass::of_pocket(pocket))
    }

    /// By card index. Pairs of indices that aren't a pocket weigh 0.
    pub fn bias_value_indices(table: usize, i: usize, j: usize) -> f32 {
        Pocket::from_indices(i, j).map_or(0.0, |p| Self::bias_value_pocket(table, &p))
    }

    pub fn class_bias(table: usize, class: &HandClass) -> f32 {
        let t = table.min(MAX_TABLE);
        f32::from(tables().bias[t][class.index()]) / SCALE
    }

    /// Where a hand sits among all starting hands: 1.0 for aces, falling
    /// towards 0 for the worst hands.
    pub fn class_strength(class: &HandClass) -> f32 {
        1.0 - tables().percentile[class.index()]
    }

    pub fn pocket_strength(pocket: &Pocket) -> f32 {
        Self::class_strength(&HandClass::of_pocket(pocket))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bias(table: usize, hand: &str) -> f32 {
        let pocket = Pocket::from_str_cards(hand).unwrap();
        SimpleBias::bias_value_pocket(table, &pocket)
    }

    #[test]
    fn test_extremes() {
        assert_eq!(1.0, bias(0, "AsAh"));
        assert_eq!(0.001, bias(0, "2c2d"));
        assert!(bias(0, "5c3d") < 0.1);
        assert_eq!(1.0, bias(10, "2c7d"));
    }

    #[test]
    fn test_never_decreasing_with_table() {
        for class in HandClass::all() {
            let mut last = 0.0;
            for t in 0..=MAX_TABLE {
                let b = SimpleBias::class_bias(t, &class);
                assert!(b >= last, "{class} at {t}");
                assert!((0.001..=1.0).contains(&b));
                last = b;
            }
            assert_eq!(1.0, last);
        }
        assert!(bias(5, "AsQs") > bias(0, "AsQs"));
    }

    #[test]
    fn test_suited_connected_high_first() {
        assert!(bias(1, "AsKs") > bias(1, "AhKd"));
        assert!(bias(5, "8s9s") > bias(5, "8s9h"));
        assert!(bias(5, "9sTs") >= bias(5, "8sTs"));
        assert!(bias(5, "QsQh") > 0.6);
    }

    #[test]
    fn test_access_agrees() {
        let a = Card::try_from("As").unwrap();
        let k = Card::try_from("Kh").unwrap();
        assert_eq!(
            SimpleBias::bias_value(4, a, k),
            SimpleBias::bias_value_indices(4, a.index(), k.index())
        );
        assert_eq!(SimpleBias::bias_value(3, a, k), SimpleBias::bias_value(3, k, a));
        assert_eq!(0.0, SimpleBias::bias_value_indices(4, 7, 7));
        assert_eq!(
            SimpleBias::bias_value(MAX_TABLE, a, k),
            SimpleBias::bias_value(99, a, k)
        );
    }

    #[test]
    fn test_class_strength_order() {
        let aa = HandClass::from_notation("AA").unwrap();
        let aks = HandClass::from_notation("AKs").unwrap();
        let seven_two = HandClass::from_notation("72o").unwrap();
        assert_eq!(1.0, SimpleBias::class_strength(&aa));
        assert!(SimpleBias::class_strength(&aks) > 0.95);
        assert!(SimpleBias::class_strength(&seven_two) < 0.05);
    }
}
