pub mod layer;

pub use layer::{Layer, LayerHandle};
