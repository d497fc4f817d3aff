use balls_engine::config::EngineConfig;
use balls_engine::Engine;
use balls_shared::config::WorldConfig;
use balls_shared::protocol::Snapshot;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};

const WORLD_WIDTH: f64 = 800.0;
const WORLD_HEIGHT: f64 = 600.0;

/// How often the headless renderer dumps a frame
const RENDER_PERIOD: Duration = Duration::from_secs(1);

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let config = EngineConfig {
        rng_seed: rand::random(),
        ..Default::default()
    };
    let world_config = WorldConfig::default();

    // Validate configuration before starting
    if let Err(e) = config.validate().and_then(|_| world_config.validate()) {
        eprintln!("Invalid engine configuration: {}", e);
        std::process::exit(1);
    }

    let mut engine = Engine::create(WORLD_WIDTH, WORLD_HEIGHT, config, world_config);
    engine.start();

    // Headless renderer: reads the latest frame at its own cadence
    let mut frames = engine.subscribe();
    let renderer = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(RENDER_PERIOD);
        loop {
            ticker.tick().await;
            match frames.has_changed() {
                Ok(true) => {
                    let snap = frames.borrow_and_update().clone();
                    render(&snap);
                }
                Ok(false) => continue,
                // Loop ended and dropped the sender
                Err(_) => break,
            }
        }
    });

    tracing::info!("Bouncing balls engine running, keys: s/S a/A m/M g/G t/T r o q");
    println!("Type a key and Enter: s/S speed, a/A max balls, m/M size ratio,");
    println!("g/G gravity, t/T rotate gravity, r restart, o overlay, q quit");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line {
                    Ok(Some(line)) => {
                        if !handle_key(&engine, line.trim()).await {
                            break;
                        }
                    }
                    Ok(None) => break,
                    Err(e) => {
                        tracing::error!("Failed to read input: {}", e);
                        break;
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    engine.stop().await;
    renderer.abort();
    tracing::info!("Bye");
}

/// Translate a key into an engine command. Returns false when the user quits.
/// Upper case increases, lower case decreases, as with the shift key.
async fn handle_key(engine: &Engine, key: &str) -> bool {
    let Some(c) = key.chars().next() else {
        return true;
    };
    let shift = c.is_ascii_uppercase();
    match c.to_ascii_lowercase() {
        's' => {
            if let Some(exp) = engine.change_speed(shift).await {
                println!("speed: {:.2}", balls_shared::protocol::speed_multiplier(exp));
            }
        }
        'a' => {
            if let Some(max) = engine.change_max_bodies(shift).await {
                println!("max # of balls: {}", max);
            }
        }
        'm' => {
            if let Some(ratio) = engine.change_size_ratio(shift).await {
                println!("min/max ball ratio: {:.1}", ratio as f64 / 100.0);
            }
        }
        'g' => {
            if let Some(abs) = engine.change_gravity_magnitude(shift).await {
                println!("abs gravity: {:.1}", abs);
            }
        }
        't' => {
            if let Some(snap) = rotate_and_snapshot(engine, shift).await {
                println!("rotate gravity: {} deg", snap.gravity_degrees);
            }
        }
        'r' => {
            engine.restart().await;
        }
        'o' => {
            if let Some(shown) = engine.toggle_overlay().await {
                println!("OSD: {}", if shown { "on" } else { "off" });
            }
        }
        'q' | 'x' => return false,
        _ => println!("unknown key: {}", key),
    }
    true
}

async fn rotate_and_snapshot(engine: &Engine, clockwise: bool) -> Option<Snapshot> {
    engine.rotate_gravity(clockwise).await?;
    engine.snapshot().await
}

fn render(snap: &Snapshot) {
    if snap.show_overlay {
        tracing::info!(
            "{} balls, speed x{}, gravity {:.2} @ {} deg",
            snap.balls.len(),
            snap.speed_multiplier(),
            snap.gravity_fraction,
            snap.gravity_degrees
        );
    }
    match serde_json::to_string(snap) {
        Ok(json) => println!("{}", json),
        Err(e) => tracing::error!("Failed to encode snapshot: {}", e),
    }
}
