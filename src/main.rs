//! Skyc player CLI - Headless show playback from JSON configuration.

#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use skyc_player::{
    library::Library,
    loader::load_show,
    playback::ShowSession,
    scene::{Marker, MarkerScene, flatten_positions},
    schema::ViewerConfig,
};

fn main() {
    #[cfg(feature = "dhat-heap")]
    let _profiler = dhat::Profiler::new_heap();

    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <config.json> [seconds]", args[0]);
        eprintln!("       {} --info <show.skyc>", args[0]);
        eprintln!();
        eprintln!("Play a drone show headless from JSON configuration.");
        eprintln!();
        eprintln!("Arguments:");
        eprintln!("  config.json  Path to viewer configuration file");
        eprintln!("  seconds      Wall-clock seconds to play (default: show duration)");
        eprintln!();
        eprintln!("Example configuration is generated with --example flag.");
        std::process::exit(1);
    }

    match args[1].as_str() {
        "--example" => {
            print_example_config();
            return;
        }
        "--info" => {
            let Some(path) = args.get(2) else {
                eprintln!("Usage: {} --info <show.skyc>", args[0]);
                std::process::exit(1);
            };
            print_show_info(Path::new(path));
            return;
        }
        _ => {}
    }

    let config_path = PathBuf::from(&args[1]);

    // Load configuration
    let config_str = fs::read_to_string(&config_path).unwrap_or_else(|e| {
        eprintln!("Error reading config file: {}", e);
        std::process::exit(1);
    });

    let config: ViewerConfig = serde_json::from_str(&config_str).unwrap_or_else(|e| {
        eprintln!("Error parsing config: {}", e);
        std::process::exit(1);
    });

    if let Err(e) = config.validate() {
        eprintln!("Invalid config: {}", e);
        std::process::exit(1);
    }

    // Open the library and its first show
    let library = Library::open(&config).unwrap_or_else(|e| {
        eprintln!("Error opening show library: {}", e);
        std::process::exit(1);
    });

    let Some(name) = library.first().map(str::to_string) else {
        eprintln!("Show library is empty");
        std::process::exit(1);
    };

    let bytes = library.read(&name).unwrap_or_else(|e| {
        eprintln!("Error reading show: {}", e);
        std::process::exit(1);
    });

    let mut session = ShowSession::new(MarkerScene::new(), Marker::default(), &config.playback);
    if let Err(e) = session.set_file(&name, &bytes) {
        eprintln!("Error loading {}: {}", name, e);
        std::process::exit(1);
    }

    let seconds: f64 = args
        .get(2)
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| session.duration() / config.playback.time_scale);
    let dt = config.frame_interval();
    let frames = (seconds / dt).ceil().max(0.0) as u64;

    println!("Skyc Player");
    println!("===========");
    println!("Library: {} ({} shows)", library.root().display(), library.files().len());
    println!("Show: {}", name);
    println!("Drones: {}", session.drone_count());
    println!("Duration: {:.2}s", session.duration());
    println!(
        "Playback: {} fps, x{} speed, {}",
        config.frame_rate,
        config.playback.time_scale,
        if config.playback.looping { "looping" } else { "hold at end" }
    );
    println!("Frames: {}", frames);
    println!();

    // Run playback
    println!("Playing...");
    session.play();
    let start = Instant::now();

    for i in 0..frames {
        session.advance(dt);

        // Print progress every 10%
        if (i + 1) % (frames / 10).max(1) == 0 {
            let elapsed = start.elapsed().as_secs_f32();
            let frames_per_sec = (i + 1) as f32 / elapsed;
            println!(
                "  Frame {}/{}: t={:.2}s, extent={:.2}m, {:.1} frames/s",
                i + 1,
                frames,
                session.current_time(),
                swarm_extent(&flatten_positions(session.registry())),
                frames_per_sec
            );
        }
    }

    let elapsed = start.elapsed();

    println!();
    println!("Final state:");
    println!("  Show time: {:.2}s", session.current_time());
    println!("  Finished: {}", session.engine().is_finished());
    println!("  State writes: {}", session.scene().applied());
    println!(
        "Time: {:.2}s ({:.1} frames/s)",
        elapsed.as_secs_f32(),
        frames as f32 / elapsed.as_secs_f32()
    );
}

/// Largest distance of any drone from the origin.
fn swarm_extent(positions: &[f32]) -> f32 {
    positions
        .chunks_exact(3)
        .map(|p| (p[0] * p[0] + p[1] * p[1] + p[2] * p[2]).sqrt())
        .fold(0.0, f32::max)
}

fn print_show_info(path: &Path) {
    let bytes = fs::read(path).unwrap_or_else(|e| {
        eprintln!("Error reading show file: {}", e);
        std::process::exit(1);
    });

    let show = load_show(&bytes).unwrap_or_else(|e| {
        eprintln!("Error loading show: {}", e);
        std::process::exit(1);
    });

    println!("Show: {}", show.title().unwrap_or("(untitled)"));
    println!("Drones: {}", show.len());
    println!("Span: {:.2}s - {:.2}s", show.start_time(), show.duration());
    println!();
    for drone in show.drones() {
        let trajectory = &drone.trajectory;
        println!(
            "  {}: {} samples, {:.2}s - {:.2}s",
            drone.id,
            trajectory.len(),
            trajectory.start_time(),
            trajectory.end_time()
        );
    }
}

fn print_example_config() {
    let config = ViewerConfig::default();

    println!("Example configuration (config.json):");
    match serde_json::to_string_pretty(&config) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing config: {}", e),
    }
}
