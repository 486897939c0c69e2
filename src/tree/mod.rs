//! Directory discovery and structure building
//!
//! - `PatternFilter`: combined default, gitignore and user ignore rules
//! - `FileWalker`: include-glob discovery bounded by depth
//! - `StructureTree`: arena tree folded from relative paths

mod config;
mod filter;
mod structure;
mod walker;

pub use config::{AnalysisConfig, DEFAULT_INCLUDE_PATTERN};
pub use filter::{DEFAULT_IGNORE_PATTERNS, PatternFilter};
pub use structure::{NodeId, StructureTree};
pub use walker::FileWalker;

pub(crate) use walker::to_relative;
