/// Milliseconds on a monotonic-enough clock.
/// `Instant` panics on wasm32-unknown-unknown, so the browser build reads `Date.now()`.
#[cfg(target_arch = "wasm32")]
#[inline]
fn now_ms() -> f64 {
    js_sys::Date::now()
}

/// Native clock: milliseconds since the first reading in this process
#[cfg(not(target_arch = "wasm32"))]
#[inline]
fn now_ms() -> f64 {
    use std::sync::OnceLock;
    use std::time::Instant;

    static EPOCH: OnceLock<Instant> = OnceLock::new();
    EPOCH.get_or_init(Instant::now).elapsed().as_secs_f64() * 1000.0
}

/// Stopwatch for per-pass step timings
#[derive(Clone, Copy, Debug)]
pub(crate) struct PerfTimer {
    started_ms: f64,
}

impl PerfTimer {
    #[inline]
    pub(crate) fn start() -> Self {
        PerfTimer { started_ms: now_ms() }
    }

    /// Only start when metrics are on
    #[inline]
    pub(crate) fn start_if(enabled: bool) -> Option<Self> {
        enabled.then(Self::start)
    }

    /// Never negative, even if the wall clock steps back
    #[inline]
    pub(crate) fn elapsed_ms(&self) -> f64 {
        (now_ms() - self.started_ms).max(0.0)
    }
}
