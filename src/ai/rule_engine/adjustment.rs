use crate::ai::errors::{AiError, Result};

use super::codes::{Curve, Factor, Outcome};

/// One rule's say on one outcome.
///
/// The raw value is normalized into `[0, 1]` with `min` and `max` unless the
/// two are equal, in which case the value is used as is. The normalized `x`
/// is bent by the curve and optionally inverted to give `fx`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutcomeAdjustment {
    outcome: Outcome,
    factor: Factor,
    curve: Curve,
    invert: bool,
    weight: f32,
    min: f32,
    max: f32,
    value: f32,
    x: f32,
    fx: f32,
}

impl OutcomeAdjustment {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        outcome: Outcome,
        factor: Factor,
        curve: Curve,
        invert: bool,
        weight: f32,
        min: f32,
        max: f32,
        value: f32,
    ) -> Result<Self> {
        if value.is_nan() {
            return Err(AiError::NanAdjustment("value"));
        }
        if weight.is_nan() {
            return Err(AiError::NanAdjustment("weight"));
        }
        let x = if min == max {
            value
        } else {
            ((value.clamp(min.min(max), min.max(max)) - min) / (max - min)).clamp(0.0, 1.0)
        };
        let f = curve.apply(x);
        let fx = if invert { 1.0 - f } else { f };
        Ok(Self {
            outcome,
            factor,
            curve,
            invert,
            weight,
            min,
            max,
            value,
            x,
            fx,
        })
    }

    /// The value counted straight through with a weight of one.
    pub fn linear(outcome: Outcome, factor: Factor, value: f32) -> Result<Self> {
        Self::new(outcome, factor, Curve::Linear, false, 1.0, 0.0, 0.0, value)
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn factor(&self) -> Factor {
        self.factor
    }

    pub fn curve(&self) -> Curve {
        self.curve
    }

    pub fn is_inverted(&self) -> bool {
        self.invert
    }

    pub fn weight(&self) -> f32 {
        self.weight
    }

    pub fn min(&self) -> f32 {
        self.min
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn x(&self) -> f32 {
        self.x
    }

    pub fn fx(&self) -> f32 {
        self.fx
    }

    /// `weight * fx`.
    pub fn evaluate(&self) -> f32 {
        self.weight * self.fx
    }
}

/// How the adjustments made to one outcome are folded into its score.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AccumulationPolicy {
    /// Add every contribution up.
    #[default]
    Sum,
    /// Contributions averaged by weight.
    WeightedMean,
    /// Only the largest contribution counts.
    Max,
}

/// Running totals for one outcome, enough to score it under any policy.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OutcomeScore {
    sum: f32,
    weights: f32,
    max: Option<f32>,
    count: usize,
}

impl OutcomeScore {
    pub fn add(&mut self, adjustment: &OutcomeAdjustment) {
        let contribution = adjustment.evaluate();
        self.sum += contribution;
        self.weights += adjustment.weight();
        self.max = Some(self.max.map_or(contribution, |m| m.max(contribution)));
        self.count += 1;
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn value(&self, policy: AccumulationPolicy) -> f32 {
        match policy {
            AccumulationPolicy::Sum => self.sum,
            AccumulationPolicy::WeightedMean if self.weights != 0.0 => self.sum / self.weights,
            AccumulationPolicy::WeightedMean => 0.0,
            AccumulationPolicy::Max => self.max.unwrap_or(0.0),
        }
    }
}
