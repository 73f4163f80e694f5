//! Brickfall headless runner
//!
//! Plays a seeded autoplay session at the fixed timestep and logs how it went.
//!
//! Usage: `brickfall [seed] [tuning.json]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();

    if let Err(e) = native::run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The simulation is embedded by a host on the web; there is no runner
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::error::Error;

    use brickfall::Tuning;
    use brickfall::consts::*;
    use brickfall::sim::{GameEvent, GamePhase, GameState, autoplay_input, tick};
    use brickfall::view::FrameInstances;

    /// Ten simulated minutes
    const MAX_FRAMES: u64 = 60 * 60 * 10;
    /// Stop after clearing this many levels
    const MAX_LEVELS: u32 = 5;

    pub fn run() -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args().skip(1);
        let seed = match args.next() {
            Some(s) => s.parse::<u64>()?,
            None => 0xB10C,
        };
        let tuning = match args.next() {
            Some(path) => Tuning::from_json(&std::fs::read_to_string(path)?)?,
            None => Tuning::default(),
        };

        log::info!("Brickfall (headless) starting with seed {}", seed);

        let mut state = GameState::new(seed, SCREEN_WIDTH, SCREEN_HEIGHT, tuning);
        let mut frame = FrameInstances::new();
        let mut blocks_destroyed = 0u32;
        let mut powerups_collected = 0u32;

        for _ in 0..MAX_FRAMES {
            let input = autoplay_input(&state);
            tick(&mut state, &input, SIM_DT);

            for event in &state.events {
                match event {
                    GameEvent::BlockDestroyed { .. } => blocks_destroyed += 1,
                    GameEvent::PowerUpCollected { kind } => {
                        powerups_collected += 1;
                        log::info!("Collected {:?}", kind);
                    }
                    _ => {}
                }
            }

            match state.phase {
                GamePhase::Playing => {}
                GamePhase::LevelComplete => {
                    if state.level.level >= MAX_LEVELS {
                        break;
                    }
                    if let Some(bonus) = state.advance_level() {
                        log::info!("Level bonus {}", bonus);
                    }
                }
                GamePhase::GameOver => break,
            }

            frame.collect(&state);
        }

        log::info!(
            "Finished after {} frames ({:.1}s world time): level {}, score {}, max combo {}, {} blocks, {} power-ups, {} lives left",
            state.frame,
            state.time.elapsed,
            state.level.level,
            state.paddle.score,
            state.max_combo,
            blocks_destroyed,
            powerups_collected,
            state.paddle.lives
        );
        log::debug!(
            "Last frame: {} rects, {} circles, {} trail points",
            frame.globals.rect_count,
            frame.globals.circle_count,
            frame.globals.trail_count
        );

        Ok(())
    }
}
