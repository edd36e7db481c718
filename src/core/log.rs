//! Console logging
//!
//! In the browser everything goes to `console.log` / `console.warn`.
//! On native targets (tests, benches) only warnings are printed to stderr;
//! wasm-bindgen imports cannot be called outside wasm32.
//!
//! Usage:
//! ```rust
//! use toaster_physics::{engine_log, engine_warn};
//!
//! engine_log!("world ready: {} particles", 8000);
//! engine_warn!("rejected dt={}", -1.0);
//! ```

/// Info-level message (browser console only)
#[macro_export]
macro_rules! engine_log {
    ($($arg:tt)*) => {{
        $crate::core::log::info(&format!($($arg)*));
    }};
}

/// Warning-level message
#[macro_export]
macro_rules! engine_warn {
    ($($arg:tt)*) => {{
        $crate::core::log::warn(&format!($($arg)*));
    }};
}

#[doc(hidden)]
pub fn info(message: &str) {
    #[cfg(target_arch = "wasm32")]
    {
        web_sys::console::log_1(&message.into());
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = message;
    }
}

#[doc(hidden)]
pub fn warn(message: &str) {
    #[cfg(target_arch = "wasm32")]
    {
        web_sys::console::warn_1(&message.into());
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        eprintln!("[toaster-physics] {}", message);
    }
}
