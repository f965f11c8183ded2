pub mod math;
pub mod neuron;
pub mod layers;
pub mod loss;
pub mod error;

// Convenience re-exports
pub use math::io_vector::IOVector;
pub use neuron::neuron::{Neuron, NeuronKind};
pub use layers::layer::{Layer, LayerHandle};
pub use loss::half_mse::HalfMseCost;
pub use error::{NetError, Result};
