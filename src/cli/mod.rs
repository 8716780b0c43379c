mod commands;

use std::path::PathBuf;

use clap::Parser;

use godocjson::config::{Config, ExtractMode};
use godocjson::error::Result;

pub use commands::generate_json;

#[derive(Parser, Debug)]
#[command(name = "godocjson")]
#[command(about = "Extract Go package documentation as JSON")]
#[command(version)]
#[command(after_long_help = r#"
EXAMPLES:
    # Document the package in ./pkg/server
    godocjson ./pkg/server

    # Skip test files
    godocjson -e '_test\.go$' ./pkg/server

    # Include unexported declarations
    godocjson --all ./pkg/server

Set RUST_LOG=godocjson=debug to trace the pipeline on stderr.
"#)]
pub struct Cli {
    /// Exclude files whose base name matches this regex
    #[arg(short = 'e', value_name = "PATTERN")]
    pub exclude: Option<String>,

    /// Document unexported declarations too
    #[arg(long)]
    pub all: bool,

    /// Directory containing the Go package
    pub directory: PathBuf,
}

impl Cli {
    pub fn into_config(self) -> Result<Config> {
        let mode = if self.all { ExtractMode::All } else { ExtractMode::Exported };
        let config = Config::new(self.directory).with_mode(mode);
        match self.exclude {
            Some(pattern) => config.with_exclude(&pattern),
            None => Ok(config),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal() {
        let cli = Cli::try_parse_from(["godocjson", "./pkg"]).unwrap();
        let config = cli.into_config().unwrap();

        assert_eq!(config.directory, PathBuf::from("./pkg"));
        assert_eq!(config.import_path, "./pkg");
        assert_eq!(config.mode, ExtractMode::Exported);
        assert!(config.exclude.is_none());
    }

    #[test]
    fn test_parse_all_flags() {
        let cli = Cli::try_parse_from(["godocjson", "-e", "_test\\.go$", "--all", "pkg"]).unwrap();
        let config = cli.into_config().unwrap();

        assert_eq!(config.mode, ExtractMode::All);
        assert!(config.exclude.unwrap().is_match("a_test.go"));
    }

    #[test]
    fn test_directory_is_required() {
        let err = Cli::try_parse_from(["godocjson"]).unwrap_err();

        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_invalid_pattern() {
        let cli = Cli::try_parse_from(["godocjson", "-e", "(", "pkg"]).unwrap();

        assert!(cli.into_config().is_err());
    }
}
