use std::io::Write;

use godocjson::config::Config;
use godocjson::error::Result;
use godocjson::pipeline;

/// Write the documentation of `config.directory` to `out`.
pub fn generate_json<W: Write>(config: &Config, out: &mut W) -> Result<()> {
    tracing::debug!("Documenting {}", config.directory.display());
    let written = pipeline::generate(config, out)?;
    if written == 0 {
        tracing::warn!("No Go source files in {}", config.directory.display());
    }
    Ok(())
}
