use std::net::SocketAddr;

use axum::http::StatusCode;
use axum::{Json, Router, routing::post};
use base64::Engine;
use image::ImageEncoder;
use image::codecs::png::PngEncoder;
use serde::Serialize;
use tower_http::services::ServeDir;

use hexgen::catalog::TagCatalog;
use hexgen::config::Params;
use hexgen::render::{self, Frame};
use hexgen::store::{TileRecord, TileStore};
use hexgen::{Bounds, Hex, HexMap};

const HEX_SIZE: f64 = 8.0;
const MAX_TILES: u64 = 250_000;

#[derive(Serialize)]
struct GenerateResponse {
    layers: Vec<Layer>,
    timings: Vec<TimingEntry>,
    width: usize,
    height: usize,
    tiles: Vec<TileEntry>,
}

#[derive(Serialize)]
struct Layer {
    name: String,
    data_url: String,
}

#[derive(Serialize)]
struct TimingEntry {
    name: String,
    ms: f64,
}

#[derive(Serialize)]
struct TileEntry {
    hex: Hex,
    #[serde(flatten)]
    record: TileRecord,
}

fn encode_png(rgba: &[u8], w: usize, h: usize) -> Result<String, image::ImageError> {
    let mut buf = Vec::new();
    let encoder = PngEncoder::new(&mut buf);
    encoder.write_image(rgba, w as u32, h as u32, image::ExtendedColorType::Rgba8)?;
    let b64 = base64::engine::general_purpose::STANDARD.encode(&buf);
    Ok(format!("data:image/png;base64,{}", b64))
}

/// Upper bound on the coordinates `bounds` would enumerate.
fn tile_estimate(bounds: &Bounds) -> u64 {
    match *bounds {
        Bounds::Rect { width, height } => {
            let cols = width.max(0) as u64 / 2 * 2 + 1;
            cols.saturating_mul(height.max(0) as u64 + 1)
        }
        Bounds::Hexagon { radius } => {
            let r = radius as u64;
            r.saturating_mul(r + 1).saturating_mul(3).saturating_add(1)
        }
    }
}

fn check_size(bounds: &Bounds) -> Result<(), String> {
    let n = tile_estimate(bounds);
    if n > MAX_TILES {
        return Err(format!("map too large: about {} tiles, limit {}", n, MAX_TILES));
    }
    Ok(())
}

fn build_response(params: Params) -> Result<GenerateResponse, String> {
    check_size(&params.bounds)?;
    let mut map = HexMap::new(params).map_err(|e| e.to_string())?;
    map.run(&TagCatalog::builtin()).map_err(|e| e.to_string())?;

    let store = map.store();
    let frame = Frame::fit(store, HEX_SIZE);
    let renders: [(&str, fn(&TileStore, &Frame) -> Vec<u8>); 5] = [
        ("plates", render::render_plates),
        ("elevation", render::render_elevation),
        ("flow", render::render_flow),
        ("watersheds", render::render_watersheds),
        ("map", render::render_biomes),
    ];
    let mut layers = Vec::with_capacity(renders.len());
    for (name, f) in renders {
        let data_url = encode_png(&f(store, &frame), frame.w, frame.h).map_err(|e| e.to_string())?;
        layers.push(Layer { name: name.into(), data_url });
    }

    let timings = map
        .timings()
        .iter()
        .map(|t| TimingEntry {
            name: t.name.to_string(),
            ms: t.ms,
        })
        .collect();

    let tiles = store
        .iter()
        .map(|(hex, record)| TileEntry { hex, record: record.clone() })
        .collect();

    Ok(GenerateResponse {
        layers,
        timings,
        width: frame.w,
        height: frame.h,
        tiles,
    })
}

async fn generate_handler(
    Json(params): Json<Params>,
) -> Result<Json<GenerateResponse>, (StatusCode, String)> {
    let result = tokio::task::spawn_blocking(move || build_response(params))
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    match result {
        Ok(response) => Ok(Json(response)),
        Err(msg) => {
            log::warn!("generate rejected: {}", msg);
            Err((StatusCode::BAD_REQUEST, msg))
        }
    }
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    env_logger::init();
    let frontend = ServeDir::new("frontend");

    let app = Router::new()
        .route("/api/generate", post(generate_handler))
        .fallback_service(frontend);

    let addr = SocketAddr::from(([127, 0, 0, 1], 3000));
    log::info!("hexgen server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await
}
