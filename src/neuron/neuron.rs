use serde::{Serialize, Deserialize};
use std::f64::consts::E;

use crate::error::{NetError, Result};

/// Selects which neuron variant a layer is built from.
///
/// - `Input`     — holds a settable scalar; produces it verbatim.
/// - `Threshold` — perceptron-style step function over a weighted sum.
/// - `Sigmoid`   — logistic activation over a weighted sum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NeuronKind {
    Input,
    Threshold,
    Sigmoid,
}

/// A single neuron. Non-input variants do not hold references to their
/// input neurons; they store the wired input arity (`inputs`) and the
/// owning layer resolves the actual parent outputs at evaluation time.
///
/// Invariant for wired non-input neurons: `weights.len() == inputs`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Neuron {
    Input { value: f64 },
    Threshold { inputs: usize, bias: f64, weights: Vec<f64>, threshold: f64 },
    Sigmoid { inputs: usize, bias: f64, weights: Vec<f64>, threshold: f64 },
}

/// Logistic function: `1 / (1 + e^-t)`.
pub fn sigmoid(t: f64) -> f64 {
    1.0 / (1.0 + E.powf(-t))
}

impl Neuron {
    /// Builds a zero-valued neuron of the requested kind, no inputs wired.
    pub fn new(kind: NeuronKind) -> Neuron {
        match kind {
            NeuronKind::Input => Neuron::Input { value: 0.0 },
            NeuronKind::Threshold => Neuron::Threshold {
                inputs: 0,
                bias: 0.0,
                weights: Vec::new(),
                threshold: 0.0,
            },
            NeuronKind::Sigmoid => Neuron::Sigmoid {
                inputs: 0,
                bias: 0.0,
                weights: Vec::new(),
                threshold: 0.0,
            },
        }
    }

    pub fn kind(&self) -> NeuronKind {
        match self {
            Neuron::Input { .. } => NeuronKind::Input,
            Neuron::Threshold { .. } => NeuronKind::Threshold,
            Neuron::Sigmoid { .. } => NeuronKind::Sigmoid,
        }
    }

    /// Computes this neuron's output from the given parent-layer outputs.
    ///
    /// - Input: returns the stored scalar; `inputs` is ignored.
    /// - Threshold: `sum(inputs[i] * weights[i]) + bias`, then `1.0` iff
    ///   strictly greater than the threshold, else `0.0`. Equality yields
    ///   `0.0`.
    /// - Sigmoid: the same weighted sum fed through the logistic function.
    ///   Note: the sigmoid path does NOT add `bias` to the sum; the field
    ///   is carried but unused here.
    pub fn output(&self, inputs: &[f64]) -> Result<f64> {
        match self {
            Neuron::Input { value } => Ok(*value),
            Neuron::Threshold { bias, weights, threshold, .. } => {
                let total = weighted_sum(weights, inputs)?;
                Ok(if total + bias > *threshold { 1.0 } else { 0.0 })
            }
            Neuron::Sigmoid { weights, .. } => {
                let total = weighted_sum(weights, inputs)?;
                Ok(sigmoid(total))
            }
        }
    }

    /// Replaces bias/weights/threshold in place without changing the wired
    /// arity. Silent no-op for the Input variant.
    pub fn update_info(&mut self, bias: f64, weights: Vec<f64>, threshold: f64) -> Result<()> {
        match self {
            Neuron::Input { .. } => Ok(()),
            Neuron::Threshold { inputs, bias: b, weights: w, threshold: t }
            | Neuron::Sigmoid { inputs, bias: b, weights: w, threshold: t } => {
                if *inputs > 0 && weights.len() != *inputs {
                    return Err(NetError::ShapeMismatch {
                        expected: *inputs,
                        actual: weights.len(),
                    });
                }
                *b = bias;
                *w = weights;
                *t = threshold;
                Ok(())
            }
        }
    }

    /// Atomically rewires the input arity together with bias/weights/
    /// threshold. Silent no-op for the Input variant.
    pub fn set_inputs(
        &mut self,
        input_count: usize,
        bias: f64,
        weights: Vec<f64>,
        threshold: f64,
    ) -> Result<()> {
        match self {
            Neuron::Input { .. } => Ok(()),
            Neuron::Threshold { inputs, bias: b, weights: w, threshold: t }
            | Neuron::Sigmoid { inputs, bias: b, weights: w, threshold: t } => {
                if weights.len() != input_count {
                    return Err(NetError::ShapeMismatch {
                        expected: input_count,
                        actual: weights.len(),
                    });
                }
                *inputs = input_count;
                *b = bias;
                *w = weights;
                *t = threshold;
                Ok(())
            }
        }
    }

    /// Sets the stored scalar of an Input neuron. Silent no-op for the
    /// other variants.
    pub fn set_value(&mut self, value: f64) {
        if let Neuron::Input { value: v } = self {
            *v = value;
        }
    }

    pub fn bias(&self) -> f64 {
        match self {
            Neuron::Input { .. } => 0.0,
            Neuron::Threshold { bias, .. } | Neuron::Sigmoid { bias, .. } => *bias,
        }
    }

    pub fn threshold(&self) -> f64 {
        match self {
            Neuron::Input { .. } => 0.0,
            Neuron::Threshold { threshold, .. } | Neuron::Sigmoid { threshold, .. } => *threshold,
        }
    }

    pub fn weights(&self) -> &[f64] {
        match self {
            Neuron::Input { .. } => &[],
            Neuron::Threshold { weights, .. } | Neuron::Sigmoid { weights, .. } => weights,
        }
    }
}

/// Dot product of a weight vector with the parent outputs; the lengths
/// must match exactly.
fn weighted_sum(weights: &[f64], inputs: &[f64]) -> Result<f64> {
    if weights.len() != inputs.len() {
        return Err(NetError::ShapeMismatch {
            expected: weights.len(),
            actual: inputs.len(),
        });
    }
    Ok(weights.iter().zip(inputs.iter()).map(|(w, x)| w * x).sum())
}
