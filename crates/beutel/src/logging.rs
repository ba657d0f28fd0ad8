use tracing_subscriber::EnvFilter;

/// Install the global subscriber. `RUST_LOG` controls filtering (default
/// `info`); `json` switches to one JSON object per line.
pub fn init(json: bool) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if json {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .json()
            .with_current_span(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_file(true)
            .with_line_number(true)
            .with_level(true)
            .init();
    }
}
