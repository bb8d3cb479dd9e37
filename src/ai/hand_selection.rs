//! Starting hand classes and the schemes that group them.
//!
//! There are 169 distinct starting hands once suits are ignored: 13 pairs,
//! 78 suited and 78 offsuit combinations. A [`HandSelectionScheme`] sorts
//! some of them into groups, each with a strength from 0 to 10.

use std::collections::BTreeSet;
use std::fmt;

use crate::core::{Card, Pocket, Value};

use super::errors::{AiError, Result};

/// One of the 169 starting hands, written `AA`, `AKs` or `AKo`.
///
/// # Examples
///
/// ```
/// use holdem_ai::ai::HandClass;
/// use holdem_ai::core::Value;
///
/// let aks = HandClass::new(Value::King, Value::Ace, true);
/// assert_eq!("AKs", aks.to_string());
/// assert_eq!(aks, HandClass::from_notation("AKs").unwrap());
/// assert!(!HandClass::from_notation("QQ").unwrap().suited());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub struct HandClass {
    high: Value,
    low: Value,
    suited: bool,
}

/// Number of starting hand classes.
pub const HAND_CLASS_COUNT: usize = 169;

impl HandClass {
    /// Values are put in order and pairs are never suited.
    pub fn new(v1: Value, v2: Value, suited: bool) -> Self {
        let (high, low) = if v1 >= v2 { (v1, v2) } else { (v2, v1) };
        Self {
            high,
            low,
            suited: suited && high != low,
        }
    }

    pub fn pair(value: Value) -> Self {
        Self::new(value, value, false)
    }

    /// The class of two cards.
    pub fn of(a: Card, b: Card) -> Self {
        Self::new(a.value, b.value, a.suit == b.suit)
    }

    pub fn of_pocket(pocket: &Pocket) -> Self {
        Self::of(pocket.low(), pocket.high())
    }

    pub fn high(&self) -> Value {
        self.high
    }

    pub fn low(&self) -> Value {
        self.low
    }

    pub fn suited(&self) -> bool {
        self.suited
    }

    pub fn is_pair(&self) -> bool {
        self.high == self.low
    }

    /// Number of distinct pockets in this class.
    pub fn combos(&self) -> usize {
        if self.is_pair() {
            6
        } else if self.suited {
            4
        } else {
            12
        }
    }

    /// Position in the usual 13x13 grid. Suited hands sit above the
    /// diagonal, offsuit hands below it.
    pub fn index(&self) -> usize {
        let (h, l) = (self.high as usize, self.low as usize);
        if self.suited {
            h * 13 + l
        } else {
            l * 13 + h
        }
    }

    pub fn all() -> impl Iterator<Item = HandClass> {
        let values = Value::values();
        (0..values.len()).flat_map(move |i| {
            (0..=i).flat_map(move |j| {
                let offsuit = HandClass::new(values[i], values[j], false);
                let suited = (i != j).then(|| HandClass::new(values[i], values[j], true));
                std::iter::once(offsuit).chain(suited)
            })
        })
    }

    pub fn from_notation(s: &str) -> Result<Self> {
        let bad = || AiError::InvalidHandClass(s.to_string());
        let chars: Vec<char> = s.trim().chars().collect();
        if !(2..=3).contains(&chars.len()) {
            return Err(bad());
        }
        let v1 = Value::from_char(chars[0]).ok_or_else(bad)?;
        let v2 = Value::from_char(chars[1]).ok_or_else(bad)?;
        let suited = match chars.get(2).map(|c| c.to_ascii_lowercase()) {
            None if v1 == v2 => false,
            Some('s') if v1 != v2 => true,
            Some('o') => false,
            _ => return Err(bad()),
        };
        Ok(Self::new(v1, v2, suited))
    }
}

impl fmt::Display for HandClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.high.to_char(), self.low.to_char())?;
        if self.is_pair() {
            Ok(())
        } else if self.suited {
            f.write_str("s")
        } else {
            f.write_str("o")
        }
    }
}

impl TryFrom<String> for HandClass {
    type Error = AiError;

    fn try_from(value: String) -> Result<Self> {
        Self::from_notation(&value)
    }
}

impl From<HandClass> for String {
    fn from(class: HandClass) -> Self {
        class.to_string()
    }
}

/// A set of starting hands played the same way.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HandGroup {
    #[cfg_attr(feature = "serde", serde(default))]
    classes: BTreeSet<HandClass>,
    /// 0 to 10.
    #[cfg_attr(feature = "serde", serde(default))]
    strength: u8,
}

impl HandGroup {
    pub fn new(strength: u8) -> Self {
        Self {
            classes: BTreeSet::new(),
            strength: strength.min(10),
        }
    }

    /// Build from a list of notations such as `["AA", "AKs"]`.
    pub fn from_notation<'a>(strength: u8, classes: impl IntoIterator<Item = &'a str>) -> Result<Self> {
        let mut group = Self::new(strength);
        for c in classes {
            group.set_contains(HandClass::from_notation(c)?, true);
        }
        Ok(group)
    }

    pub fn strength(&self) -> u8 {
        self.strength
    }

    pub fn set_strength(&mut self, strength: u8) {
        self.strength = strength.min(10);
    }

    pub fn contains(&self, class: &HandClass) -> bool {
        self.classes.contains(class)
    }

    pub fn set_contains(&mut self, class: HandClass, contains: bool) {
        if contains {
            self.classes.insert(class);
        } else {
            self.classes.remove(&class);
        }
    }

    pub fn set_contains_pair(&mut self, value: Value, contains: bool) {
        self.set_contains(HandClass::pair(value), contains);
    }

    pub fn set_contains_suited(&mut self, v1: Value, v2: Value, contains: bool) {
        self.set_contains(HandClass::new(v1, v2, true), contains);
    }

    pub fn set_contains_offsuit(&mut self, v1: Value, v2: Value, contains: bool) {
        self.set_contains(HandClass::new(v1, v2, false), contains);
    }

    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    /// Pockets covered by this group.
    pub fn combo_count(&self) -> usize {
        self.classes.iter().map(HandClass::combos).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn classes(&self) -> impl Iterator<Item = &HandClass> {
        self.classes.iter()
    }
}

/// A named way of sorting starting hands into groups.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HandSelectionScheme {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: String,
    #[cfg_attr(feature = "serde", serde(default))]
    groups: Vec<HandGroup>,
}

impl HandSelectionScheme {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// A copy of another scheme under a new name.
    pub fn copy_as(other: &HandSelectionScheme, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..other.clone()
        }
    }

    pub fn groups(&self) -> &[HandGroup] {
        &self.groups
    }

    pub fn groups_mut(&mut self) -> &mut Vec<HandGroup> {
        &mut self.groups
    }

    pub fn add_group(&mut self, group: HandGroup) {
        self.groups.push(group);
    }

    pub fn has_groups(&self) -> bool {
        self.groups.iter().any(|g| !g.is_empty())
    }

    /// Strength of the strongest group holding this hand, over 10. Hands in
    /// no group are 0.
    pub fn hand_strength(&self, a: Card, b: Card) -> f32 {
        self.class_strength(&HandClass::of(a, b))
    }

    pub fn hand_strength_pocket(&self, pocket: &Pocket) -> f32 {
        self.class_strength(&HandClass::of_pocket(pocket))
    }

    pub fn class_strength(&self, class: &HandClass) -> f32 {
        self.groups
            .iter()
            .filter(|g| g.contains(class))
            .map(|g| g.strength)
            .max()
            .map_or(0.0, |s| f32::from(s) / 10.0)
    }

    /// Make sure there's exactly one group without hands at the end to add
    /// to.
    pub fn ensure_empty_group(&mut self) {
        self.remove_empty_groups();
        self.groups.push(HandGroup::default());
    }

    pub fn remove_empty_groups(&mut self) {
        self.groups.retain(|g| !g.is_empty());
    }

    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[cfg(feature = "serde")]
    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
