pub mod pattern;

pub use pattern::{PatternIssue, PatternReport, PatternValidator, TrackedPattern};
