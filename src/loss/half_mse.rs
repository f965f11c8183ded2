use crate::error::{NetError, Result};
use crate::math::io_vector::IOVector;

pub struct HalfMseCost;

impl HalfMseCost {
    /// Halved MSE: mean((|output - goal|)² / 2). Pure; fails with a shape
    /// mismatch unless both vectors have the same length.
    pub fn cost(output: &IOVector, goal: &IOVector) -> Result<f64> {
        if output.len() != goal.len() {
            return Err(NetError::ShapeMismatch {
                expected: output.len(),
                actual: goal.len(),
            });
        }
        let n = output.len() as f64;
        let total: f64 = output
            .as_slice()
            .iter()
            .zip(goal.as_slice())
            .map(|(a, b)| (a - b).abs().powi(2) / 2.0)
            .sum();
        Ok(total / n)
    }
}
