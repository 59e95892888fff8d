use rayon::prelude::*;

use crate::biome::Biome;
use crate::hex::Hex;
use crate::rng::splitmix32;
use crate::store::{TileRecord, TileStore};

const SQRT_3: f64 = 1.732_050_807_568_877;

// Color palette (meter-scale elevation, max around 10000)
const BACKGROUND: [u8; 4] = [12, 12, 16, 255];
const WATER_DEEP: [u8; 4] = [18, 36, 70, 255];
const WATER_SHALLOW: [u8; 4] = [38, 78, 120, 255];
const COAST_SHALLOW: [u8; 4] = [52, 100, 145, 255];
const LAND_LOW: [u8; 4] = [70, 130, 62, 255];
const LAND_MID: [u8; 4] = [140, 180, 100, 255];
const MOUNTAIN_LOW: [u8; 4] = [140, 120, 100, 255];
const SNOW: [u8; 4] = [245, 248, 250, 255];
const HILLS: [u8; 4] = [150, 135, 95, 255];
const SWAMP: [u8; 4] = [70, 95, 70, 255];
const RIVER_BLUE: [u8; 4] = [15, 40, 140, 255];
const DIVIDE: [u8; 4] = [30, 30, 30, 255];

#[inline]
fn lerp_color(a: [u8; 4], b: [u8; 4], t: f64) -> [u8; 4] {
    let t = t.clamp(0.0, 1.0);
    [
        (a[0] as f64 + (b[0] as f64 - a[0] as f64) * t).round() as u8,
        (a[1] as f64 + (b[1] as f64 - a[1] as f64) * t).round() as u8,
        (a[2] as f64 + (b[2] as f64 - a[2] as f64) * t).round() as u8,
        255,
    ]
}

/// Distinct color per id, stable across runs.
#[inline]
fn palette(id: u32) -> [u8; 4] {
    let h = splitmix32(id.wrapping_mul(7).wrapping_add(123));
    [
        (h & 0xFF) as u8 | 60,
        ((h >> 8) & 0xFF) as u8 | 60,
        ((h >> 16) & 0xFF) as u8 | 60,
        255,
    ]
}

/// Pixel frame for a flat-top hex layout that fits every stored coordinate.
#[derive(Clone, Copy, Debug)]
pub struct Frame {
    pub w: usize,
    pub h: usize,
    size: f64,
    min_x: f64,
    min_y: f64,
}

impl Frame {
    /// `size` is the hex circumradius in pixels.
    pub fn fit(store: &TileStore, size: f64) -> Self {
        let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
        let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
        for &h in store.coords() {
            let [x, y] = hex_to_pixel(h, size);
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }
        if store.is_empty() {
            return Self { w: 1, h: 1, size, min_x: 0.0, min_y: 0.0 };
        }
        min_x -= size;
        min_y -= size;
        Self {
            w: (max_x + size - min_x).ceil() as usize + 1,
            h: (max_y + size - min_y).ceil() as usize + 1,
            size,
            min_x,
            min_y,
        }
    }

    pub fn hex_at(&self, px: usize, py: usize) -> Hex {
        pixel_to_hex(
            [px as f64 + 0.5 + self.min_x, py as f64 + 0.5 + self.min_y],
            self.size,
        )
    }
}

pub fn hex_to_pixel(h: Hex, size: f64) -> [f64; 2] {
    [
        size * 1.5 * h.q as f64,
        size * SQRT_3 * (h.r as f64 + h.q as f64 / 2.0),
    ]
}

/// Fractional axial position rounded through cube coordinates.
pub fn pixel_to_hex(p: [f64; 2], size: f64) -> Hex {
    let qf = (2.0 / 3.0 * p[0]) / size;
    let rf = (-1.0 / 3.0 * p[0] + SQRT_3 / 3.0 * p[1]) / size;
    let sf = -qf - rf;

    let (mut q, mut r, s) = (qf.round(), rf.round(), sf.round());
    let (dq, dr, ds) = ((q - qf).abs(), (r - rf).abs(), (s - sf).abs());
    if dq > dr && dq > ds {
        q = -r - s;
    } else if dr > ds {
        r = -q - s;
    }
    Hex::new(q as i32, r as i32)
}

/// Fill rows in parallel; `color` decides each stored hex, the rest is background.
fn rasterize<F>(store: &TileStore, frame: &Frame, color: F) -> Vec<u8>
where
    F: Fn(Hex, &TileRecord) -> [u8; 4] + Sync,
{
    let w = frame.w;
    let mut rgba = vec![0u8; w * frame.h * 4];
    rgba.par_chunks_mut(w * 4).enumerate().for_each(|(y, row)| {
        for x in 0..w {
            let h = frame.hex_at(x, y);
            let c = store.get(h).map_or(BACKGROUND, |t| color(h, t));
            row[x * 4..x * 4 + 4].copy_from_slice(&c);
        }
    });
    rgba
}

fn elevation_color(elev: f64) -> [u8; 4] {
    if elev <= 0.0 {
        let depth = (-elev).min(10000.0) / 10000.0;
        if depth < 0.2 {
            lerp_color(COAST_SHALLOW, WATER_SHALLOW, depth / 0.2)
        } else {
            lerp_color(WATER_SHALLOW, WATER_DEEP, (depth - 0.2) / 0.8)
        }
    } else if elev < 3000.0 {
        lerp_color(LAND_LOW, LAND_MID, elev / 3000.0)
    } else if elev < 6000.0 {
        lerp_color(LAND_MID, MOUNTAIN_LOW, (elev - 3000.0) / 3000.0)
    } else {
        lerp_color(MOUNTAIN_LOW, SNOW, (elev - 6000.0) / 4000.0)
    }
}

/// Final map colored by biome.
pub fn render_biomes(store: &TileStore, frame: &Frame) -> Vec<u8> {
    rasterize(store, frame, |_, t| match t.biome {
        Some(Biome::Mountain) => SNOW,
        Some(Biome::Hills) => HILLS,
        Some(Biome::ShallowWater) => COAST_SHALLOW,
        Some(Biome::DeepWater) => WATER_DEEP,
        Some(Biome::River) => RIVER_BLUE,
        Some(Biome::Swamp) => SWAMP,
        Some(Biome::Grassland) => LAND_LOW,
        None => t.elevation.map_or(BACKGROUND, elevation_color),
    })
}

pub fn render_elevation(store: &TileStore, frame: &Frame) -> Vec<u8> {
    rasterize(store, frame, |_, t| t.elevation.map_or(BACKGROUND, elevation_color))
}

/// Diagnostic: plate color buckets, seeds in white.
pub fn render_plates(store: &TileStore, frame: &Frame) -> Vec<u8> {
    rasterize(store, frame, |_, t| {
        if t.seed == Some(true) {
            [255, 255, 255, 255]
        } else {
            t.color.map_or([128, 128, 128, 255], palette)
        }
    })
}

/// Diagnostic: watershed ids with divides dark and rivers blue.
pub fn render_watersheds(store: &TileStore, frame: &Frame) -> Vec<u8> {
    rasterize(store, frame, |_, t| {
        if t.is_divide() {
            DIVIDE
        } else if t.is_river() {
            RIVER_BLUE
        } else {
            t.watershed.map_or(BACKGROUND, palette)
        }
    })
}

/// Diagnostic: gradient direction mapped to red/green around mid gray.
pub fn render_flow(store: &TileStore, frame: &Frame) -> Vec<u8> {
    rasterize(store, frame, |_, t| match t.gradient {
        Some([gx, gy]) => [
            (128.0 + 127.0 * gx.clamp(-1.0, 1.0)) as u8,
            (128.0 + 127.0 * gy.clamp(-1.0, 1.0)) as u8,
            128,
            255,
        ],
        None => BACKGROUND,
    })
}
