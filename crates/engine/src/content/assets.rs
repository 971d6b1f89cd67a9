use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use tracing::info;

use crate::AssetPaths;

use super::source::MapDataSource;
use super::types::{
    ContentLoadError, MapCatalogDocument, MapEntry, TileMapDocument, TilesetDocument,
};

/// Filesystem-backed content: `catalog.json`, `maps/<id>.json` and
/// `tilesets/<id>.json` under the asset root.
#[derive(Debug, Clone)]
pub struct AssetDirectory {
    maps_dir: PathBuf,
    tilesets_dir: PathBuf,
    entries: HashMap<String, MapEntry>,
    map_order: Vec<String>,
}

impl AssetDirectory {
    pub fn open(paths: &AssetPaths) -> Result<Self, ContentLoadError> {
        let catalog: MapCatalogDocument = read_json(&paths.catalog_path)?;
        let mut entries = HashMap::with_capacity(catalog.maps.len());
        let mut map_order = Vec::with_capacity(catalog.maps.len());
        for entry in catalog.maps {
            if entries.contains_key(&entry.id) {
                return Err(ContentLoadError::DuplicateMap { map_id: entry.id });
            }
            map_order.push(entry.id.clone());
            entries.insert(entry.id.clone(), entry);
        }
        info!(
            catalog = %paths.catalog_path.display(),
            map_count = map_order.len(),
            "map_catalog_loaded"
        );
        Ok(Self {
            maps_dir: paths.maps_dir.clone(),
            tilesets_dir: paths.tilesets_dir.clone(),
            entries,
            map_order,
        })
    }

    /// Map ids in catalog order.
    pub fn map_ids(&self) -> &[String] {
        &self.map_order
    }
}

impl MapDataSource for AssetDirectory {
    fn map_entry(&self, map_id: &str) -> Result<MapEntry, ContentLoadError> {
        self.entries
            .get(map_id)
            .cloned()
            .ok_or_else(|| ContentLoadError::UnknownMap {
                map_id: map_id.to_string(),
            })
    }

    fn load_tile_map(&self, map_id: &str) -> Result<TileMapDocument, ContentLoadError> {
        if !self.entries.contains_key(map_id) {
            return Err(ContentLoadError::UnknownMap {
                map_id: map_id.to_string(),
            });
        }
        read_json(&self.maps_dir.join(format!("{map_id}.json")))
    }

    fn load_tileset(&self, tileset_id: &str) -> Result<TilesetDocument, ContentLoadError> {
        let path = self.tilesets_dir.join(format!("{tileset_id}.json"));
        if !path.is_file() {
            return Err(ContentLoadError::UnknownTileset {
                tileset_id: tileset_id.to_string(),
            });
        }
        read_json(&path)
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ContentLoadError> {
    let raw = fs::read_to_string(path).map_err(|source| read_error(path, source))?;
    let mut deserializer = serde_json::Deserializer::from_str(&raw);
    serde_path_to_error::deserialize::<_, T>(&mut deserializer).map_err(|error| {
        let json_path = error.path().to_string();
        let source = error.into_inner();
        ContentLoadError::Parse {
            path: path.to_path_buf(),
            json_path: if json_path.is_empty() {
                ".".to_string()
            } else {
                json_path
            },
            message: source.to_string(),
        }
    })
}

fn read_error(path: &Path, source: io::Error) -> ContentLoadError {
    ContentLoadError::ReadFile {
        path: path.to_path_buf(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;
    use crate::overworld::{LocationAction, TileCoord};

    fn setup_asset_paths(root: &Path) -> AssetPaths {
        let paths = AssetPaths::from_root(root.to_path_buf());
        fs::create_dir_all(&paths.maps_dir).expect("mkdir maps");
        fs::create_dir_all(&paths.tilesets_dir).expect("mkdir tilesets");
        paths
    }

    fn write_file(path: &Path, content: &str) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("mkdir");
        }
        fs::write(path, content).expect("write");
    }

    const CATALOG: &str = r#"{
        "maps": [
            {
                "id": "town",
                "name": "Town",
                "tileset": "outdoor",
                "spawn": {"x": 1, "y": 1},
                "locations": [
                    {
                        "id": "notebook",
                        "name": "Notebook",
                        "bounds": {"left": 0.0, "right": 0.5, "top": 0.0, "bottom": 0.5},
                        "action": "notebook"
                    }
                ]
            },
            {"id": "beach", "name": "Beach", "tileset": "missing", "spawn": {"x": 0, "y": 0}}
        ]
    }"#;

    #[test]
    fn loads_catalog_map_and_tileset() {
        let temp = TempDir::new().expect("tempdir");
        let paths = setup_asset_paths(temp.path());
        write_file(&paths.catalog_path, CATALOG);
        write_file(
            &paths.maps_dir.join("town.json"),
            r#"{"width": 2, "height": 1, "data": [1, 1, 0, 2]}"#,
        );
        write_file(
            &paths.tilesets_dir.join("outdoor.json"),
            r#"{"flags": [0, 1536, null]}"#,
        );

        let assets = AssetDirectory::open(&paths).expect("open");
        assert_eq!(assets.map_ids(), ["town".to_string(), "beach".to_string()]);

        let entry = assets.map_entry("town").expect("entry");
        assert_eq!(entry.tileset, "outdoor");
        assert_eq!(entry.spawn, TileCoord::new(1, 1));
        assert_eq!(entry.locations[0].action, LocationAction::Notebook);

        let map = assets.load_tile_map("town").expect("map");
        assert_eq!(map.data.len(), 4);
        let tileset = assets.load_tileset("outdoor").expect("tileset");
        assert_eq!(tileset.flags, vec![Some(0), Some(1536), None]);
    }

    #[test]
    fn missing_tileset_is_reported_by_id() {
        let temp = TempDir::new().expect("tempdir");
        let paths = setup_asset_paths(temp.path());
        write_file(&paths.catalog_path, CATALOG);
        let assets = AssetDirectory::open(&paths).expect("open");
        let err = assets.load_tileset("missing").expect_err("err");
        assert!(matches!(
            err,
            ContentLoadError::UnknownTileset { ref tileset_id } if tileset_id == "missing"
        ));
    }

    #[test]
    fn unknown_map_is_rejected_before_touching_disk() {
        let temp = TempDir::new().expect("tempdir");
        let paths = setup_asset_paths(temp.path());
        write_file(&paths.catalog_path, CATALOG);
        let assets = AssetDirectory::open(&paths).expect("open");
        let err = assets.load_tile_map("castle").expect_err("err");
        assert!(matches!(err, ContentLoadError::UnknownMap { .. }));
    }

    #[test]
    fn parse_errors_carry_json_path() {
        let temp = TempDir::new().expect("tempdir");
        let paths = setup_asset_paths(temp.path());
        write_file(&paths.catalog_path, CATALOG);
        write_file(
            &paths.maps_dir.join("town.json"),
            r#"{"width": 2, "height": 1, "data": [1, "wall"]}"#,
        );
        let assets = AssetDirectory::open(&paths).expect("open");
        let err = assets.load_tile_map("town").expect_err("err");
        match err {
            ContentLoadError::Parse { json_path, .. } => assert_eq!(json_path, "data[1]"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn duplicate_catalog_ids_fail() {
        let temp = TempDir::new().expect("tempdir");
        let paths = setup_asset_paths(temp.path());
        write_file(
            &paths.catalog_path,
            r#"{"maps": [
                {"id": "a", "name": "A", "tileset": "t", "spawn": {"x": 0, "y": 0}},
                {"id": "a", "name": "B", "tileset": "t", "spawn": {"x": 0, "y": 0}}
            ]}"#,
        );
        let err = AssetDirectory::open(&paths).expect_err("err");
        assert!(matches!(err, ContentLoadError::DuplicateMap { .. }));
    }
}
