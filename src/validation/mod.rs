pub mod format;
pub mod noise;
pub mod post_checks;

pub use format::{FormatIssue, FormatValidator};
pub use noise::{NoiseFilter, NoiseIssue};
pub use post_checks::PostValidator;
