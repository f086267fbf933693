pub mod substitutions;

pub use substitutions::Substitutions;
