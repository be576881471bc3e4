//! `umbra` - render a built-in scene to a PNG.
//!
//! Usage: umbra [--config render.json] [key=value ...]
//!
//! Settings come from `RenderConfig` defaults, then the optional JSON file,
//! then each `key=value` override in order. Numeric settings are parsed as
//! JSON; string and enum settings take the text as is, so `integrator=path`
//! and `width=800` both work.

use std::env;
use std::fs;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use log::LevelFilter;
use serde_json::Value;
use umbra_renderer::{build_scene, render, RenderConfig};

fn print_usage() {
    println!("Usage: umbra [--config <file.json>] [key=value ...]");
    println!("\nKeys:");
    println!("  width, height, samples_per_pixel, max_depth, gamma, seed,");
    println!("  bucket_size, bvh_leaf_size, integrator, scene, output");
    println!("\nExamples:");
    println!("  umbra scene=random width=1024 height=768 samples_per_pixel=10");
    println!("  umbra scene=lights integrator=path samples_per_pixel=64");
}

/// Apply a single `key=value` override on top of `config`.
fn apply_override(config: RenderConfig, arg: &str) -> Result<RenderConfig> {
    let Some((key, raw)) = arg.split_once('=') else {
        bail!("expected key=value, got '{arg}'");
    };

    let mut value = serde_json::to_value(&config)?;
    let Some(fields) = value.as_object_mut() else {
        bail!("render config is not a JSON object");
    };
    let Some(current) = fields.get(key) else {
        bail!("unknown setting '{key}'");
    };

    // String settings take the raw text, everything else is parsed as JSON
    let parsed = if current.is_string() {
        Value::String(raw.to_string())
    } else {
        serde_json::from_str(raw).with_context(|| format!("invalid value for '{key}': {raw}"))?
    };
    fields.insert(key.to_string(), parsed);

    serde_json::from_value(value).with_context(|| format!("invalid value for '{key}': {raw}"))
}

fn load_config(args: &[String]) -> Result<RenderConfig> {
    let mut config = RenderConfig::default();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                i += 1;
                let Some(path) = args.get(i) else {
                    bail!("--config needs a file path");
                };
                let text = fs::read_to_string(path)
                    .with_context(|| format!("failed to read config file {path}"))?;
                config = serde_json::from_str(&text)
                    .with_context(|| format!("failed to parse config file {path}"))?;
            }
            arg => config = apply_override(config, arg)?,
        }
        i += 1;
    }
    Ok(config)
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(LevelFilter::Info)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage();
        return Ok(());
    }

    let config = load_config(&args)?;
    log::info!(
        "Scene '{:?}' with {} integrator -> {}",
        config.scene,
        config.integrator,
        config.output
    );

    let start = Instant::now();
    let (scene, camera) = build_scene(&config);
    log::info!("Scene ready in {:.2?}", start.elapsed());

    if config.integrator.needs_lights() && scene.lights().is_empty() {
        log::warn!(
            "{} integrator on a scene without lights renders black",
            config.integrator
        );
    }

    let integrator = config.integrator.build();
    let image = render(&scene, &camera, integrator.as_ref(), &config);
    image
        .save_png(&config.output, config.gamma)
        .with_context(|| format!("failed to write {}", config.output))?;

    log::info!("Done in {:.2?}", start.elapsed());
    Ok(())
}
