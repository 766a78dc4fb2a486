//! Digital-rain hero canvas and shared-fragment bootstrap for the portfolio
//! site.
//!
//! The simulation ([`rain`]) is plain Rust and draws through the [`surface`]
//! trait so it runs and tests on the host; the browser driver is compiled
//! only for wasm32.

pub mod config;
pub mod error;
pub mod loader;
pub mod rain;
pub mod surface;
pub mod trail;

pub use config::RainConfig;
pub use rain::{LoopState, RainEngine, Tick};

// Only compile wasm-specific code when targeting wasm32.

#[cfg(target_arch = "wasm32")]
pub mod wasm {
    use wasm_bindgen::prelude::*;

    use crate::loader::{default_fragments, RetryPolicy};

    mod canvas;
    mod fetch;
    mod render;

    pub use canvas::CanvasSurface;
    pub use fetch::load_components;
    pub use render::{activate, RainDriver, CONFIG_ATTRIBUTE};

    #[wasm_bindgen(start)]
    pub fn main() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).ok();

        wasm_bindgen_futures::spawn_local(fetch::load_components(
            default_fragments(),
            RetryPolicy::default(),
        ));
        render::init()
    }

    /// Resumes the rain after [`stop_rain`]; no-op off the rain page.
    #[wasm_bindgen]
    pub fn start_rain() {
        render::with_active(RainDriver::start);
    }

    #[wasm_bindgen]
    pub fn stop_rain() {
        render::with_active(RainDriver::stop);
    }
}
