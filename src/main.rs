use std::error::Error;
use std::path::PathBuf;

use hexgen::catalog::TagCatalog;
use hexgen::config::Params;
use hexgen::render::{self, Frame};
use hexgen::{Bounds, HexMap};

const HEX_SIZE: f64 = 8.0;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args: Vec<String> = std::env::args().collect();

    let seed: u32 = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(42);
    let width: i32 = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(40);
    let height: i32 = args.get(3).and_then(|s| s.parse().ok()).unwrap_or(30);
    let out_dir: PathBuf = args
        .get(4)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("artifacts"));
    let catalog = match args.get(5) {
        Some(path) => TagCatalog::from_json(&std::fs::read_to_string(path)?)?,
        None => TagCatalog::builtin(),
    };

    std::fs::create_dir_all(&out_dir)?;

    let params = Params {
        seed,
        bounds: Bounds::Rect { width, height },
        ..Params::default()
    };

    eprintln!(
        "Generating {}x{} hex map with seed={}, plates={}, drops={}",
        width, height, seed, params.plates, params.drops
    );

    let mut map = HexMap::new(params)?;
    map.run(&catalog)?;

    eprintln!("\nTimings:");
    for t in map.timings() {
        eprintln!("  {:20} {:8.1} ms", t.name, t.ms);
    }

    let store = map.store();
    let frame = Frame::fit(store, HEX_SIZE);
    let save = |name: &str, rgba: &[u8]| -> Result<(), Box<dyn Error>> {
        let path = out_dir.join(name);
        image::save_buffer(
            &path,
            rgba,
            frame.w as u32,
            frame.h as u32,
            image::ColorType::Rgba8,
        )?;
        eprintln!("Saved {}", path.display());
        Ok(())
    };

    save("plates.png", &render::render_plates(store, &frame))?;
    save("elevation.png", &render::render_elevation(store, &frame))?;
    save("flow.png", &render::render_flow(store, &frame))?;
    save("watersheds.png", &render::render_watersheds(store, &frame))?;
    save("map.png", &render::render_biomes(store, &frame))?;

    let layers = map.layers();
    eprintln!(
        "\n{} base tiles, {} river edge tiles",
        layers.base.len(),
        layers.edges.len()
    );
    Ok(())
}
