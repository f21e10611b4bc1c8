use lancache_sync_domain::{CliOverrides, Config};

/// Read and merge configuration. Validation is per command and happens once
/// logging is up.
pub fn load_config(
    config_path: Option<&str>,
    cli_overrides: CliOverrides,
) -> anyhow::Result<Config> {
    Ok(Config::load(config_path, cli_overrides)?)
}
