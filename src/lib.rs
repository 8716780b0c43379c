pub mod config;
pub mod doc;
pub mod error;
pub mod languages;
pub mod loader;
pub mod output;
pub mod pipeline;
pub mod syntax;

pub use config::{Config, ExtractMode};
pub use error::{DocError, Result};
pub use loader::{load_directory, FileSet, Parser, Pos, Position};
pub use pipeline::{document_directory, generate};
