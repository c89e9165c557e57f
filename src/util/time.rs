/// Seconds since the first call; the controller's clock for batched applies
#[cfg(not(target_arch = "wasm32"))]
pub fn current_time_secs() -> f64 {
    use std::sync::OnceLock;
    use std::time::Instant;

    static START: OnceLock<Instant> = OnceLock::new();
    START.get_or_init(Instant::now).elapsed().as_secs_f64()
}

/// Seconds since page load
#[cfg(target_arch = "wasm32")]
pub fn current_time_secs() -> f64 {
    web_sys::window()
        .and_then(|window| window.performance())
        .map(|perf| perf.now() / 1000.0)
        .unwrap_or(0.0)
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;

    #[test]
    fn test_clock_is_monotonic() {
        let a = current_time_secs();
        let b = current_time_secs();
        assert!(b >= a);
    }
}
