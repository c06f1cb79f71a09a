//! Zoo Merge headless entry point
//!
//! Runs an autoplay session at the fixed timestep: drops land at random x
//! every few ticks until the pile crosses the line or the tick budget runs
//! out. The final frame is printed as JSON.
//!
//! Usage: `zoo-merge [config.json]`

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use zoo_merge::GameConfig;
use zoo_merge::consts::SIM_DT;
use zoo_merge::persistence::FileStore;
use zoo_merge::sim::{Flow, GameEvent, PhysicsWorld, Session, TickInput};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Zoo Merge (headless) starting...");

    let mut config = match std::env::args().nth(1).map(PathBuf::from) {
        Some(path) => match GameConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("{}", e);
                std::process::exit(1);
            }
        },
        None => {
            log::warn!("No config file given, using defaults");
            GameConfig::default()
        }
    };
    let seed = *config.seed.get_or_insert_with(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or_default()
    });

    let store = FileStore::new(config.high_score_path.clone());
    let world = PhysicsWorld::new(config.gravity);
    let interval = u64::from(config.autoplay_drop_interval.max(1));
    let max_ticks = config.autoplay_max_ticks;
    let mut session = match Session::new(config, world, store) {
        Ok(session) => session,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };

    // Separate stream from the spawn queue so drop positions don't perturb it
    let mut hand = Pcg32::seed_from_u64(seed ^ 0x9e37_79b9_7f4a_7c15);
    let (left, right) = (session.config().left_wall(), session.config().right_wall());

    for tick in 0..max_ticks {
        let drop_x = (tick % interval == 0).then(|| hand.random_range(left..right));
        let input = TickInput {
            drop_x,
            ..Default::default()
        };
        if session.tick(&input, SIM_DT) == Flow::Quit {
            break;
        }

        for event in session.drain_events() {
            match event {
                GameEvent::Merged {
                    produced, points, ..
                } => log::info!(
                    "Merged into {} (+{})",
                    session.species().get(produced).name,
                    points
                ),
                GameEvent::GameOver {
                    score,
                    new_high_score,
                } => log::info!(
                    "Game over at tick {} with score {}{}",
                    session.state().time_ticks,
                    score,
                    if new_high_score { " (new high score)" } else { "" }
                ),
                other => log::debug!("{:?}", other),
            }
        }

        if session.state().is_over() {
            break;
        }
    }

    match serde_json::to_string_pretty(&session.frame()) {
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("Failed to serialize final frame: {}", e),
    }
}
