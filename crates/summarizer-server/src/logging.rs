use std::io::Write;

/// Initializes `env_logger`. `RUST_LOG`, when set, takes precedence over
/// the debug flag.
pub fn init_logging(debug: bool) {
    let filter = if debug {
        "debug"
    } else {
        "info,actix_server=warn"
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter))
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] {} [{}] {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}
