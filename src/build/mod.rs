mod compile;
mod core;
mod feedback;
mod link;
mod utils;

pub use compile::{CompileReport, FileOutcome, FileStatus, SkipReason, compile, compile_args};
pub use self::core::{BuildResult, Builder, Stage};
pub use feedback::FeedbackAnalyzer;
pub use link::{LinkOutcome, link, link_args};
pub use utils::{SOURCE_EXTENSIONS, is_source_extension, name_components, path_components};
