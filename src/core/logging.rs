//! Logging initialization

/// Initialize the logging system
///
/// Uses env_logger with default filter level of `info`.
/// Override with RUST_LOG environment variable, e.g. `RUST_LOG=voxpaint=debug`
/// to see per-execute paint summaries.
///
/// # Example
/// ```
/// voxpaint::core::logging::init();
/// log::info!("Painting started");
/// ```
pub fn init() {
    // try_init so tests and embedding pipelines can call this more than once
    let _ = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info")
    ).try_init();
}
