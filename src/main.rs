//! Attack of the S-Corp entry point
//!
//! The browser build drives [`scorp_attack::App`] from requestAnimationFrame
//! via the wasm module in the library crate. The native binary is a headless
//! soak runner: it plays a scripted run at full speed and reports the result,
//! which is handy for profiling and for catching panics without a browser.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use scorp_attack::audio::LogAudio;
    use scorp_attack::consts::*;
    use scorp_attack::persistence::FileScores;
    use scorp_attack::sim::GamePhase;
    use scorp_attack::{App, Settings};
    use std::time::{SystemTime, UNIX_EPOCH};

    env_logger::init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or(0)
        });

    log::info!("Attack of the S-Corp headless soak (seed {seed})");

    let scores = FileScores::new("scorp_attack_highscore.json");
    let mut app = App::new(
        seed,
        Box::new(LogAudio),
        Box::new(scores),
        Settings::default(),
    );

    app.input.start_pressed = true;
    app.advance(TICK_DT, 0.0);

    // Scripted pilot: sweep under the action and hold fire. Ten simulated
    // minutes or a finished run, whichever comes first.
    let max_ticks = 10 * 60 * TICK_HZ as u64;
    app.input.fire = true;
    while app.state.time_ticks < max_ticks {
        let sweep = (app.state.time_ticks / 40) % 2 == 0;
        app.input.left = sweep;
        app.input.right = !sweep;
        app.advance(TICK_DT, app.state.time_ticks as f64 * TICK_DT as f64);

        match app.state.phase {
            GamePhase::GameOver | GamePhase::Victory => break,
            _ => {}
        }
    }

    log::info!(
        "Soak finished: phase {:?}, wave {}, score {}, high score {}, {} ticks",
        app.state.phase,
        app.state.wave + 1,
        app.state.score,
        app.state.high_score,
        app.state.time_ticks
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Browser entry point lives in the library crate
}
