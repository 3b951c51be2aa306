use std::error::Error;

use clap::Parser;

use tilescape::ascii::{self, AsciiMode};
use tilescape::export;
use tilescape::grid::Rect;
use tilescape::{TileAtlas, TileWorld, WorldConfig};

#[derive(Parser, Debug)]
#[command(name = "tilescape")]
#[command(about = "Classify a window of the procedural tile world and preview it")]
struct Args {
    /// Master noise seed
    #[arg(short, long, default_value = "42")]
    seed: u64,

    /// Window width in cells
    #[arg(short = 'W', long, default_value = "80")]
    width: i32,

    /// Window height in cells
    #[arg(short = 'H', long, default_value = "40")]
    height: i32,

    /// Window origin X in world cells
    #[arg(short = 'x', long, default_value = "0")]
    origin_x: i32,

    /// Window origin Y in world cells
    #[arg(short = 'y', long, default_value = "0")]
    origin_y: i32,

    /// JSON config file (overrides --seed)
    #[arg(short, long)]
    config: Option<String>,

    /// Tileset image to slice for PNG export
    #[arg(short, long)]
    atlas: Option<String>,

    /// Write the window as a PNG (requires --atlas)
    #[arg(short, long)]
    output: Option<String>,

    /// Render vegetation intensity instead of biomes
    #[arg(long)]
    intensity: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => WorldConfig::from_path(path)?,
        None => WorldConfig {
            seed: args.seed,
            ..WorldConfig::default()
        },
    };
    let tile_size = config.tile_size;

    println!("Generating world with seed: {}", config.seed);
    let mut world = TileWorld::new(config)?;

    if let Some(path) = &args.atlas {
        println!("Slicing atlas: {path}");
        let atlas = TileAtlas::load(path, tile_size)?;
        println!("Atlas holds {} tiles of {}px", atlas.len(), atlas.tile_size());
        world = world.with_atlas(atlas);
    }

    let window = Rect::new(args.origin_x, args.origin_y, args.width, args.height);
    println!(
        "Preparing {}x{} window at ({}, {})...",
        window.w, window.h, window.x, window.y
    );
    world.prepare(window);
    println!("Classified {} cells", world.grid().classified_count());

    match (&args.output, &args.atlas) {
        (Some(out), Some(path)) => {
            // Re-slice rather than move the atlas out of the world.
            let atlas = TileAtlas::load(path, tile_size)?;
            let img = export::render_window_image(world.grid(), &atlas, window);
            img.save(out)?;
            println!("Saved {out}");
        }
        (Some(_), None) => {
            return Err("PNG export needs an atlas, pass --atlas".into());
        }
        (None, _) => {
            let mode = if args.intensity {
                AsciiMode::Intensity
            } else {
                AsciiMode::Biome
            };
            print!("{}", ascii::render_window(world.grid(), window, mode));
        }
    }

    Ok(())
}
