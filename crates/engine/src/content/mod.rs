mod assets;
mod source;
mod types;

pub use assets::AssetDirectory;
pub use source::{InMemoryMaps, MapDataSource};
pub use types::{
    ContentLoadError, MapCatalogDocument, MapEntry, TileMapDocument, TilesetDocument,
};
