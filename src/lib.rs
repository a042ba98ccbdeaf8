pub mod block;
pub mod detect;
pub mod error;
pub mod lexer;
pub mod server;
pub mod token;
pub mod types;
pub mod writer;

pub use detect::detect_project;
pub use types::{CssTarget, ProjectInfo, ProjectType, TargetKind, ThemeColors};
pub use writer::{write_font_to_target, write_theme_to_target, WriteOutcome};
