pub mod history;
pub mod normalizer;
pub mod report;

pub use history::normalize_history;
pub use normalizer::{normalize, normalize_value};
pub use report::aggregate;
