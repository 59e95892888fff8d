pub mod biome;
pub mod catalog;
pub mod config;
pub mod elevation;
pub mod erosion;
pub mod error;
pub mod hex;
pub mod hydrology;
pub mod plates;
pub mod render;
pub mod rng;
pub mod store;

use std::time::Instant;

use biome::{BaseTiles, TileLayers};
use catalog::TileCatalog;
use config::Params;
pub use error::TerrainError;
use rng::Rng;
use store::TileStore;

pub use hex::{Bounds, Hex};

pub struct Timing {
    pub name: &'static str,
    pub ms: f64,
}

/// Terrain generator for one hex map.
///
/// Owns the attribute store and the single RNG every stage draws from.
/// Stages run in order: `generate`, any number of `erode`, then `watershed`.
pub struct HexMap {
    params: Params,
    rng: Rng,
    store: TileStore,
    layers: TileLayers,
    timings: Vec<Timing>,
}

impl HexMap {
    pub fn new(params: Params) -> Result<Self, TerrainError> {
        params.validate()?;
        Ok(Self {
            rng: Rng::new(params.seed),
            params,
            store: TileStore::new(),
            layers: TileLayers::default(),
            timings: Vec::new(),
        })
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn store(&self) -> &TileStore {
        &self.store
    }

    pub fn layers(&self) -> &TileLayers {
        &self.layers
    }

    pub fn timings(&self) -> &[Timing] {
        &self.timings
    }

    fn timed<T>(&mut self, name: &'static str, f: impl FnOnce(&mut Self) -> T) -> T {
        let t = Instant::now();
        let out = f(self);
        let ms = t.elapsed().as_secs_f64() * 1000.0;
        log::debug!("{:<12} {:8.1} ms", name, ms);
        self.timings.push(Timing { name, ms });
        out
    }

    /// Plates, smoothing passes and the first gradient field.
    /// Starts from an empty store and a freshly seeded RNG.
    pub fn generate(&mut self) {
        self.store = TileStore::new();
        self.layers = TileLayers::default();
        self.rng = Rng::new(self.params.seed);
        self.timings.clear();

        let plates = self.timed("plates", |m| {
            plates::simulate_plates(&mut m.store, &m.params, &mut m.rng)
        });
        self.timed("smooth", |m| {
            elevation::smooth_passes(&mut m.store, m.params.smooth)
        });
        self.timed("gradient", |m| elevation::compute_gradient(&mut m.store));

        log::info!(
            "generated {} tiles from {} plates (seed {})",
            self.store.len(),
            plates,
            self.params.seed
        );
    }

    /// One hydraulic erosion pass. Repeatable.
    pub fn erode(&mut self) {
        self.timed("erode", |m| erosion::erode(&mut m.store, &m.params, &mut m.rng));
    }

    /// Watersheds, divides, rivers and biome tiles.
    ///
    /// Base tiles are resolved first; a catalog error leaves the map untouched.
    pub fn watershed(&mut self, catalog: &impl TileCatalog) -> Result<(), TerrainError> {
        let base = BaseTiles::resolve(catalog)?;
        self.store.clear_hydrology();
        let basins = self.timed("watershed", |m| hydrology::assign_watersheds(&mut m.store));
        let divides = self.timed("divides", |m| hydrology::mark_divides(&mut m.store));
        let rivers = self.timed("rivers", |m| hydrology::trace_rivers(&mut m.store));
        self.layers = self.timed("biomes", |m| {
            biome::paint(&mut m.store, &base, catalog, &m.params)
        });

        log::info!(
            "{} watersheds, {} divide tiles, {} river tiles",
            basins,
            divides,
            rivers
        );
        Ok(())
    }

    /// Full pipeline: generate, `erosion_passes` erosion passes, watershed.
    pub fn run(&mut self, catalog: &impl TileCatalog) -> Result<(), TerrainError> {
        let total = Instant::now();
        self.generate();
        for _ in 0..self.params.erosion_passes {
            self.erode();
        }
        self.watershed(catalog)?;
        self.timings.push(Timing {
            name: "TOTAL",
            ms: total.elapsed().as_secs_f64() * 1000.0,
        });
        Ok(())
    }
}
