use anyhow::Context;
use voc_config::VocConfig;
use voc_core::LineageSettings;

use crate::cli::GlobalFlags;

/// Load layered configuration (with `.env`) and turn it into core settings.
pub fn load_settings(flags: &GlobalFlags) -> anyhow::Result<LineageSettings> {
    let config = VocConfig::load_with_dotenv(flags.config.as_deref())
        .context("failed to load tinyvoc configuration")?;
    let settings = config
        .settings()
        .context("invalid tinyvoc configuration")?;

    tracing::debug!(
        file_name = %settings.file_name,
        chunk_size = settings.chunk_size,
        max_depth = settings.max_depth,
        "configuration loaded"
    );
    Ok(settings)
}
