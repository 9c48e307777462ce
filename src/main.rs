//! Meteor Duel entry point
//!
//! Natively this runs a headless match. The browser build is driven by the
//! library's `startGame` export instead (see `platform::host`).

/// Headless demo: a scripted player that tracks the lowest meteor and fires
/// on a fixed rhythm, against the CPU, for a fixed stretch of simulated time.
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use meteor_duel::audio::AudioManager;
    use meteor_duel::{GameEvent, Session, Settings, TickInput};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Meteor Duel (native) starting...");
    log::info!("Native mode runs a headless match - build for wasm32 to play in the browser");

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse::<u64>().ok())
        .unwrap_or(7);

    let mut session = match Session::new(Settings {
        seed: Some(seed),
        score_board_show_cpu_speed: true,
        ..Default::default()
    }) {
        Ok(session) => session,
        Err(e) => {
            log::error!("Invalid settings: {}", e);
            std::process::exit(1);
        }
    };

    const FRAME_MS: u64 = 16;
    const MATCH_MS: u64 = 5 * 60 * 1000;
    let mut shots = 0u32;
    let mut audio = AudioManager::new();

    while session.now_ms() < MATCH_MS {
        let state = session.state();
        let target = state
            .meteors
            .iter()
            .filter(|m| !m.is_exploding())
            .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
            .map(|m| m.bounds().left + m.bounds().width / 2.0);
        let fire = session.now_ms() % 240 < FRAME_MS;

        meteor_duel::sim::tick(
            &mut session,
            &TickInput {
                pointer_x: target,
                fire,
            },
            FRAME_MS,
        );

        for event in session.drain_events() {
            match event {
                GameEvent::ProjectileFired { .. } => shots += 1,
                GameEvent::Sound { cue } => audio.play(cue),
                GameEvent::RoundEnded { winner, .. } => {
                    log::info!("{:?} wins a round at {}ms", winner, session.now_ms())
                }
                _ => {}
            }
        }
    }

    println!("{}", session.scoreboard());
    log::info!(
        "{} shots fired, {} sound cues in {}s",
        shots,
        audio.played(),
        MATCH_MS / 1000
    );
    session.teardown();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The page drives the game through the library's `startGame` export
}
