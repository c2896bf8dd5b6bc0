//! Carrot Rush core crate.
//!
//! A small browser mini-game: carrots and bugs scatter across a field, the
//! player pulls carrots against a countdown and loses instantly on a bug.
//! The round state machine in [`round`] is pure Rust and runs natively under
//! `cargo test`; [`dom`] wires it to the browser (DOM, audio, the interval
//! timer) and is only exercised in a wasm environment.

use wasm_bindgen::prelude::*;

pub mod dom;
pub mod round;

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Mount the game UI and listeners. Safe to call more than once; later calls
/// are no-ops. The round itself begins when the player presses the button.
#[wasm_bindgen]
pub fn start_game() -> Result<(), JsValue> {
    dom::mount()
}
