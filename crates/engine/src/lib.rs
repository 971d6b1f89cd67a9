use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub mod content;
pub mod overworld;

pub use content::{
    AssetDirectory, ContentLoadError, InMemoryMaps, MapCatalogDocument, MapDataSource, MapEntry,
    TileMapDocument, TilesetDocument,
};
pub use overworld::{
    AnimationTicket, ArrivalContext, ArrivalHandler, ArrivalTrigger, AvatarSnapshot,
    CollisionIndex, ContentSize, CoordinateMapper, Direction, Location, LocationAction,
    LocationResolver, MapSession, MissingFlagPolicy, MovementController, MovementEvent,
    MovementState, NormalizedRect, Overworld, OverworldConfig, PathPlanner, PathStep, PixelRect,
    PlannedPath, SessionError, TapTarget, TileCoord, TileFlags, TileMapStore, TilemapError,
    TravelDestination, Vec2, DEFAULT_MAX_PATH_STEPS, DEFAULT_STEP_DURATION, DEFAULT_TILE_SIZE_PX,
    DIRECTION_MASK,
};

pub const ROOT_ENV_VAR: &str = "OVERWORLD_ROOT";

#[derive(Debug, Clone)]
pub struct AssetPaths {
    pub root: PathBuf,
    pub catalog_path: PathBuf,
    pub maps_dir: PathBuf,
    pub tilesets_dir: PathBuf,
}

impl AssetPaths {
    pub fn from_root(root: PathBuf) -> Self {
        let assets = root.join("assets");
        Self {
            catalog_path: assets.join("catalog.json"),
            maps_dir: assets.join("maps"),
            tilesets_dir: assets.join("tilesets"),
            root,
        }
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to read environment variable {var}: {source}")]
    EnvVar {
        var: &'static str,
        #[source]
        source: env::VarError,
    },
    #[error("failed to resolve current executable path: {0}")]
    CurrentExe(#[source] std::io::Error),
    #[error("current executable path has no parent directory: {0}")]
    ExeHasNoParent(PathBuf),
    #[error(
        "OVERWORLD_ROOT is set but does not point to a valid project root: {path}\n\
A valid root must contain assets/catalog.json."
    )]
    InvalidEnvRoot { path: PathBuf },
    #[error(
        "Could not detect project root by walking upward from executable directory: {start_dir}\n\
Expected a directory containing Cargo.toml and assets/catalog.json.\n\
Set {env_var} explicitly, for example:\n\
Bash/zsh: export {env_var}=\"/path/to/overworld\""
    )]
    RootNotFound {
        start_dir: PathBuf,
        env_var: &'static str,
    },
}

pub fn resolve_asset_paths() -> Result<AssetPaths, StartupError> {
    Ok(AssetPaths::from_root(resolve_root()?))
}

fn resolve_root() -> Result<PathBuf, StartupError> {
    match env::var(ROOT_ENV_VAR) {
        Ok(value) => {
            let normalized = normalize_path(&PathBuf::from(value));
            if has_catalog(&normalized) {
                Ok(normalized)
            } else {
                Err(StartupError::InvalidEnvRoot { path: normalized })
            }
        }
        Err(env::VarError::NotPresent) => {
            let exe = env::current_exe().map_err(StartupError::CurrentExe)?;
            let exe_dir = exe
                .parent()
                .map(Path::to_path_buf)
                .ok_or_else(|| StartupError::ExeHasNoParent(exe.clone()))?;

            for candidate in exe_dir.ancestors() {
                if is_repo_marker(candidate) {
                    return Ok(normalize_path(candidate));
                }
            }

            Err(StartupError::RootNotFound {
                start_dir: normalize_path(&exe_dir),
                env_var: ROOT_ENV_VAR,
            })
        }
        Err(source) => Err(StartupError::EnvVar {
            var: ROOT_ENV_VAR,
            source,
        }),
    }
}

fn has_catalog(path: &Path) -> bool {
    path.join("assets").join("catalog.json").is_file()
}

fn is_repo_marker(path: &Path) -> bool {
    path.join("Cargo.toml").is_file() && has_catalog(path)
}

fn normalize_path(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn repo_marker_requires_cargo_toml_and_catalog() {
        let temp = TempDir::new().expect("tempdir");
        let root = temp.path();
        assert!(!is_repo_marker(root));
        fs::write(root.join("Cargo.toml"), "").expect("write cargo");
        assert!(!is_repo_marker(root));
        fs::create_dir_all(root.join("assets")).expect("mkdir");
        fs::write(root.join("assets").join("catalog.json"), "{\"maps\": []}").expect("write");
        assert!(is_repo_marker(root));
    }

    #[test]
    fn asset_paths_hang_off_root() {
        let paths = AssetPaths::from_root(PathBuf::from("/tmp/world"));
        assert_eq!(paths.catalog_path, PathBuf::from("/tmp/world/assets/catalog.json"));
        assert_eq!(paths.maps_dir, PathBuf::from("/tmp/world/assets/maps"));
        assert_eq!(paths.tilesets_dir, PathBuf::from("/tmp/world/assets/tilesets"));
    }
}
