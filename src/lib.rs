//! Math Sprint core crate.
//!
//! A sixty second arithmetic quiz for Telegram mini apps. The round engine in
//! [`round`] is plain Rust and runs under `cargo test` on the host; the
//! browser side (`app`, [`render`], [`telegram`]) wires it to the page and is
//! started from JS with `start_game()`.

use wasm_bindgen::prelude::*;

mod app;
pub mod config;
pub mod effects;
pub mod error;
pub mod logging;
pub mod render;
pub mod rng;
pub mod round;
pub mod telegram;

pub use app::{BackAction, Screen, back_action, hearts};
pub use config::{DifficultyBounds, RoundConfig};
pub use error::{GameError, GameResult};
pub use rng::SeededRandom;
pub use round::{
    AnswerOutcome, Clock, Difficulty, FeedbackEvent, FeedbackSink, ManualClock, Operation, Phase,
    Question, RandomSource, RoundEngine, RoundState, RoundSummary, TickOutcome, generate_question,
    parse_answer,
};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

// -----------------------------------------------------------------------------
// Unified entrypoint
// -----------------------------------------------------------------------------

/// Wire the page and get ready for the first round. `config_json` may
/// override any [`RoundConfig`] field.
#[wasm_bindgen]
pub fn start_game(config_json: Option<String>) -> Result<(), JsValue> {
    app::start_app(config_json)
}
