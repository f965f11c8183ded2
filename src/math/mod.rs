pub mod io_vector;

pub use io_vector::IOVector;
