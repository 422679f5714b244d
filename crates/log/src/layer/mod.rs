//! Custom tracing layers

pub mod sampling;

pub use sampling::SamplingLayer;
