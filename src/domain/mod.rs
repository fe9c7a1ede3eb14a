pub mod types;

pub use types::{Category, ClassificationResult};
