//! Timestamps for pointer samples, in milliseconds since an arbitrary start.
//! Only differences between two readings are meaningful.

#[cfg(not(target_arch = "wasm32"))]
pub fn current_time_millis() -> f64 {
    use std::sync::OnceLock;
    use std::time::Instant;

    static START: OnceLock<Instant> = OnceLock::new();
    START.get_or_init(Instant::now).elapsed().as_secs_f64() * 1000.0
}

/// Milliseconds since page load
#[cfg(target_arch = "wasm32")]
pub fn current_time_millis() -> f64 {
    web_sys::window()
        .and_then(|window| window.performance())
        .map(|perf| perf.now())
        .unwrap_or(0.0)
}
