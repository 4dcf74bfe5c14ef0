use crate::config::types::{Config, ConfigOverrides};
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Parses TOML configuration text without validating it
///
/// Missing sections and keys fall back to their defaults, so empty text is
/// a complete configuration.
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    Ok(toml::from_str(content)?)
}

/// Reads a configuration file along with the hash of the exact bytes parsed
///
/// The result is not validated: values may still be replaced by
/// command-line overrides, and only the merged configuration is checked.
/// The hash is logged at startup so a mirror can be traced back to the
/// settings that produced it.
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let text = std::fs::read_to_string(path)?;
    let config = parse_config(&text)?;
    Ok((config, digest(text.as_bytes())))
}

/// Builds the effective configuration for a run
///
/// Layers, lowest priority first: built-in defaults, the optional file at
/// `path`, then `overrides`. Validation runs once on the merged result.
///
/// # Returns
///
/// * `Ok((Config, Some(hash)))` - A file was read; `hash` is its SHA-256
/// * `Ok((Config, None))` - No file was given
/// * `Err(ConfigError)` - The file could not be read or parsed, or the
///   merged configuration is invalid
///
/// # Example
///
/// ```no_run
/// use site_archiver::config::{load_layered, ConfigOverrides};
/// use std::path::Path;
///
/// let overrides = ConfigOverrides {
///     max_concurrent_pages: Some(4),
///     ..ConfigOverrides::default()
/// };
/// let (config, _hash) = load_layered(Some(Path::new("archiver.toml")), &overrides).unwrap();
/// assert_eq!(config.crawler.max_concurrent_pages, 4);
/// ```
pub fn load_layered(
    path: Option<&Path>,
    overrides: &ConfigOverrides,
) -> Result<(Config, Option<String>), ConfigError> {
    let (mut config, hash) = match path {
        Some(path) => {
            let (config, hash) = load_config_with_hash(path)?;
            (config, Some(hash))
        }
        None => (Config::default(), None),
    };

    config.apply_overrides(overrides);
    validate(&config)?;
    Ok((config, hash))
}

fn digest(content: &[u8]) -> String {
    hex::encode(Sha256::digest(content))
}
