use std::env;
use std::time::Duration;

use engine::{
    resolve_asset_paths, AssetDirectory, ContentLoadError, ContentSize, MapDataSource,
    MissingFlagPolicy, Overworld, OverworldConfig, SessionError, StartupError, DIRECTION_MASK,
};
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

use super::cli::{RunOptions, ScriptedTap};

pub(crate) const MISSING_FLAGS_ENV_VAR: &str = "OVERWORLD_MISSING_FLAGS";

#[derive(Debug, Error)]
pub(crate) enum BootstrapError {
    #[error(transparent)]
    Startup(#[from] StartupError),
    #[error(transparent)]
    Content(#[from] ContentLoadError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("map catalog is empty; pass --map or add a map to assets/catalog.json")]
    EmptyCatalog,
    #[error("invalid {var} value '{value}' (expected open, solid or a flag value)")]
    MissingFlags { var: &'static str, value: String },
}

pub(crate) struct AppWiring {
    pub(crate) assets: AssetDirectory,
    pub(crate) overworld: Overworld,
    pub(crate) content: ContentSize,
    pub(crate) taps: Vec<ScriptedTap>,
    pub(crate) tick: Duration,
    pub(crate) max_sim_time: Duration,
}

pub(crate) fn build_app(options: RunOptions) -> Result<AppWiring, BootstrapError> {
    init_tracing();
    info!("=== Overworld Startup ===");

    let config = OverworldConfig {
        missing_flag_policy: missing_flag_policy_from_env()?,
        ..OverworldConfig::default()
    };
    let paths = resolve_asset_paths()?;
    info!(root = %paths.root.display(), "asset_root_resolved");
    let assets = AssetDirectory::open(&paths)?;

    let map_id = match options.map_id {
        Some(map_id) => map_id,
        None => assets
            .map_ids()
            .first()
            .cloned()
            .ok_or(BootstrapError::EmptyCatalog)?,
    };

    // Without a measured size the map renders at its nominal tile size.
    let content = match options.content {
        Some(content) => content,
        None => nominal_content_size(&assets, &map_id, config.tile_size_px),
    };
    let overworld = Overworld::new(&assets, &map_id, content, config)?;

    Ok(AppWiring {
        assets,
        overworld,
        content,
        taps: options.taps,
        tick: options.tick,
        max_sim_time: options.max_sim_time,
    })
}

fn nominal_content_size(assets: &AssetDirectory, map_id: &str, tile_size_px: f32) -> ContentSize {
    match assets.load_tile_map(map_id) {
        Ok(map) => ContentSize::new(
            map.width as f32 * tile_size_px,
            map.height as f32 * tile_size_px,
        ),
        Err(_) => ContentSize::new(tile_size_px, tile_size_px),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}

fn missing_flag_policy_from_env() -> Result<MissingFlagPolicy, BootstrapError> {
    match env::var(MISSING_FLAGS_ENV_VAR) {
        Ok(raw) => parse_missing_flag_policy(&raw).ok_or(BootstrapError::MissingFlags {
            var: MISSING_FLAGS_ENV_VAR,
            value: raw,
        }),
        Err(_) => Ok(MissingFlagPolicy::default()),
    }
}

fn parse_missing_flag_policy(raw: &str) -> Option<MissingFlagPolicy> {
    let value = raw.trim();
    match value.to_ascii_lowercase().as_str() {
        "" | "open" => Some(MissingFlagPolicy::Open),
        "solid" => Some(MissingFlagPolicy::Fallback(DIRECTION_MASK)),
        lowered => {
            let flag = match lowered.strip_prefix("0x") {
                Some(hex) => u16::from_str_radix(hex, 16).ok()?,
                None => lowered.parse::<u16>().ok()?,
            };
            Some(MissingFlagPolicy::Fallback(flag))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_flag_policy_parses_keywords_and_numbers() {
        assert_eq!(parse_missing_flag_policy("open"), Some(MissingFlagPolicy::Open));
        assert_eq!(parse_missing_flag_policy("  "), Some(MissingFlagPolicy::Open));
        assert_eq!(
            parse_missing_flag_policy("Solid"),
            Some(MissingFlagPolicy::Fallback(DIRECTION_MASK))
        );
        assert_eq!(
            parse_missing_flag_policy("1536"),
            Some(MissingFlagPolicy::Fallback(1536))
        );
        assert_eq!(
            parse_missing_flag_policy("0x060F"),
            Some(MissingFlagPolicy::Fallback(0x060F))
        );
    }

    #[test]
    fn missing_flag_policy_rejects_garbage() {
        assert_eq!(parse_missing_flag_policy("sometimes"), None);
        assert_eq!(parse_missing_flag_policy("0xZZ"), None);
        assert_eq!(parse_missing_flag_policy("70000"), None);
    }
}
