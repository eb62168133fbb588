use tracing_subscriber::EnvFilter;

/// Console logging. `RUST_LOG` wins over the `-v` count.
pub fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "prodlist=info",
        1 => "prodlist=debug",
        _ => "prodlist=trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_target(false)
        .init();
}
