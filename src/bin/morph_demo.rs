//! Headless morph runner: load a shape, dismantle it, rebuild into another.
//!
//! Usage: cargo run --release --bin morph_demo -- [OPTIONS]
//!
//! Options:
//!   --from <PRESET>           Starting shape (default: Eagle)
//!   --to <PRESET>             Rebuild target (default: Cat)
//!   --import <FILE>           Rebuild into a JSON voxel file instead of --to
//!   --config <FILE>           Engine config JSON (default: built-in)
//!   --seed <SEED>             Scatter seed (default: config or OS entropy)
//!   --dismantle-frames <N>    Frames to let the rubble settle (default: 180)
//!   --max-frames <N>          Give up the rebuild after N frames (default: 3600)
//!   --output <FILE>           Write the final shape as JSON

use std::path::PathBuf;
use std::time::Duration;

use voxmorph::core::logging;
use voxmorph::core::time::FrameClock;
use voxmorph::core::Result;
use voxmorph::render::{FrameDriver, HeadlessAdapter};
use voxmorph::shape::{Preset, Target, parse_targets};
use voxmorph::simulation::{Engine, EngineConfig, EngineState};

fn main() {
    logging::init();

    if let Err(e) = run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let from: Preset = parse_str_arg(&args, "--from").as_deref().unwrap_or("Eagle").parse()?;
    let to: Preset = parse_str_arg(&args, "--to").as_deref().unwrap_or("Cat").parse()?;
    let import = parse_str_arg(&args, "--import").map(PathBuf::from);
    let config_path = parse_str_arg(&args, "--config").map(PathBuf::from);
    let seed = parse_u64_arg(&args, "--seed");
    let dismantle_frames = parse_u32_arg(&args, "--dismantle-frames").unwrap_or(180);
    let max_frames = parse_u32_arg(&args, "--max-frames").unwrap_or(3600);
    let output = parse_str_arg(&args, "--output").map(PathBuf::from);

    let mut config = match &config_path {
        Some(path) => EngineConfig::load_json(path)?,
        None => EngineConfig::default(),
    };
    if let Some(seed) = seed {
        config = config.with_seed(seed);
    }

    let rebuild_targets: Vec<Target> = match &import {
        Some(path) => parse_targets(&std::fs::read_to_string(path)?)?,
        None => to.generate(),
    };
    let rebuild_name = match &import {
        Some(path) => path.display().to_string(),
        None => to.to_string(),
    };

    println!("=== Voxmorph ===");
    println!("From:    {}", from);
    println!("To:      {}", rebuild_name);
    println!("Seed:    {}", config.seed.map_or("random".to_string(), |s| s.to_string()));
    println!();

    let mut engine = Engine::new(config)?;
    engine.load(&from.generate())?;
    let mut driver = FrameDriver::new(engine, HeadlessAdapter::new())?;
    let mut clock = FrameClock::fixed(Duration::from_secs_f64(1.0 / 60.0));

    driver.frame(clock.tick())?;
    driver.engine_mut().dismantle();
    for _ in 0..dismantle_frames {
        driver.frame(clock.tick())?;
    }
    if let Some((min, max)) = driver.adapter().bounds() {
        println!("Rubble bounds: {:?} .. {:?}", min, max);
    }

    driver.engine_mut().rebuild(&rebuild_targets)?;
    if let Some(plan) = driver.engine().rebuild_plan() {
        println!(
            "Rebuild: {} voxels travel, {} stay as rubble",
            plan.destination_count(),
            plan.rubble_count()
        );
    }

    let mut frames = 0;
    while driver.engine().state() == EngineState::Rebuilding && frames < max_frames {
        driver.frame(clock.tick())?;
        frames += 1;
    }

    let state = driver.engine().state();
    println!(
        "Finished in {} state after {} frames ({:.2}s session time)",
        state,
        frames,
        clock.now_secs()
    );
    if state != EngineState::Stable {
        log::warn!("Rebuild did not complete within {} frames", max_frames);
    }

    let colors = driver.engine().unique_colors();
    println!("Colors:  {}", colors.join(", "));

    if let Some(path) = output {
        std::fs::write(&path, driver.engine().export_json()?)?;
        println!("Wrote {}", path.display());
    }

    driver.dispose();
    Ok(())
}

fn parse_u64_arg(args: &[String], flag: &str) -> Option<u64> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_u32_arg(args: &[String], flag: &str) -> Option<u32> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_str_arg(args: &[String], flag: &str) -> Option<String> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}
