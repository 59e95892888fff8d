use serde::{Deserialize, Serialize};

use crate::error::TerrainError;

/// Position of a tile inside a tileset image, in tile units.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileRef {
    pub x: u32,
    pub y: u32,
}

/// Tag-indexed tile lookup supplied by the tileset.
pub trait TileCatalog {
    /// First tile whose tag set contains every tag in `tags`.
    fn find(&self, tags: &[&str]) -> Option<TileRef>;

    /// Like `find`, but a miss is a configuration error.
    fn require(&self, tags: &[&str]) -> Result<TileRef, TerrainError> {
        self.find(tags)
            .ok_or_else(|| TerrainError::MissingTile(tags.iter().map(|t| t.to_string()).collect()))
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub tile: TileRef,
    pub tags: Vec<String>,
}

/// Flat list of tagged tiles, searched in order.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagCatalog {
    pub entries: Vec<CatalogEntry>,
}

impl TagCatalog {
    pub fn from_json(text: &str) -> Result<Self, TerrainError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn push(&mut self, x: u32, y: u32, tags: &[&str]) {
        self.entries.push(CatalogEntry {
            tile: TileRef { x, y },
            tags: tags.iter().map(|t| t.to_string()).collect(),
        });
    }

    /// Base biomes on row 0; river edges for every non-empty direction set
    /// from row 1 on, tagged with the joined direction indices ("035").
    pub fn builtin() -> Self {
        let mut c = Self::default();
        c.push(0, 0, &["grassland"]);
        c.push(1, 0, &["shallow water", "water"]);
        c.push(2, 0, &["deep water", "water"]);
        c.push(3, 0, &["rocky hills", "hills"]);
        c.push(4, 0, &["swamp", "wet"]);
        c.push(5, 0, &["mountains"]);
        c.push(6, 0, &["desert"]);
        c.push(7, 0, &["river"]);
        for mask in 1u32..64 {
            let dirs: String = (0..6u32)
                .filter(|&i| mask & (1 << i) != 0)
                .map(|i| char::from(b'0' + i as u8))
                .collect();
            c.push(mask % 8, 1 + mask / 8, &["river", dirs.as_str()]);
        }
        c
    }
}

impl TileCatalog for TagCatalog {
    fn find(&self, tags: &[&str]) -> Option<TileRef> {
        self.entries
            .iter()
            .find(|e| tags.iter().all(|t| e.tags.iter().any(|et| et == t)))
            .map(|e| e.tile)
    }
}
