use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::biome::Biome;
use crate::hex::Hex;

/// Per-coordinate attributes. `None` means "not computed yet", which is
/// distinct from a zero value.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct TileRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elevation: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plate: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gradient: Option<[f64; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub water: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precipitation: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub watershed: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub divide: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub river: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shoreline: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub biome: Option<Biome>,
}

impl TileRecord {
    #[inline]
    pub fn is_land(&self) -> bool {
        self.elevation.is_some_and(|e| e > 0.0)
    }

    #[inline]
    pub fn is_divide(&self) -> bool {
        self.divide == Some(true)
    }

    #[inline]
    pub fn is_river(&self) -> bool {
        self.river == Some(true)
    }

    #[inline]
    pub fn is_shoreline(&self) -> bool {
        self.shoreline == Some(true)
    }
}

/// Sparse coordinate → record map. Records live in a flat vector in insertion
/// order; the hash index only serves lookups, so iteration is deterministic.
#[derive(Clone, Debug, Default)]
pub struct TileStore {
    keys: Vec<Hex>,
    records: Vec<TileRecord>,
    index: HashMap<Hex, usize>,
}

impl TileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, h: Hex) -> Option<&TileRecord> {
        self.index.get(&h).map(|&i| &self.records[i])
    }

    /// Existing record only; never inserts.
    pub fn get_mut(&mut self, h: Hex) -> Option<&mut TileRecord> {
        self.index.get(&h).map(|&i| &mut self.records[i])
    }

    /// Record for `h`, created empty on first access.
    pub fn entry(&mut self, h: Hex) -> &mut TileRecord {
        let i = match self.index.get(&h) {
            Some(&i) => i,
            None => {
                let i = self.records.len();
                self.keys.push(h);
                self.records.push(TileRecord::default());
                self.index.insert(h, i);
                i
            }
        };
        &mut self.records[i]
    }

    #[inline]
    pub fn elevation(&self, h: Hex) -> Option<f64> {
        self.get(h).and_then(|t| t.elevation)
    }

    #[inline]
    pub fn watershed(&self, h: Hex) -> Option<u32> {
        self.get(h).and_then(|t| t.watershed)
    }

    pub fn coords(&self) -> &[Hex] {
        &self.keys
    }

    pub fn iter(&self) -> impl Iterator<Item = (Hex, &TileRecord)> {
        self.keys.iter().copied().zip(self.records.iter())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Hex, &mut TileRecord)> {
        self.keys.iter().copied().zip(self.records.iter_mut())
    }

    /// Min and max of a numeric attribute over the records that have it.
    pub fn range(&self, field: impl Fn(&TileRecord) -> Option<f64>) -> Option<(f64, f64)> {
        self.records.iter().filter_map(field).fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }

    /// Members of each watershed, in store order, keyed by id.
    pub fn group_by_watershed(&self) -> BTreeMap<u32, Vec<Hex>> {
        let mut groups: BTreeMap<u32, Vec<Hex>> = BTreeMap::new();
        for (h, t) in self.iter() {
            if let Some(w) = t.watershed {
                groups.entry(w).or_default().push(h);
            }
        }
        groups
    }

    /// Drop everything the watershed pass derives so it can be re-run.
    pub fn clear_hydrology(&mut self) {
        for t in &mut self.records {
            t.shoreline = None;
            t.watershed = None;
            t.divide = None;
            t.river = None;
            t.biome = None;
        }
    }
}
