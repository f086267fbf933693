pub mod alignment;
pub mod annotation;
pub mod classify;
pub mod delta;
pub mod error;
pub mod mapping;
pub mod propagate;
pub mod quality;
pub mod senses;
pub mod snapshot;
pub mod tokens;
pub mod types;
