use log::LevelFilter;

const CRATES: [&str; 2] = ["trapmodes", "modesolve"];

/// Installs the stderr logger. `RUST_LOG`, when set, takes precedence over
/// the `-v` count.
pub fn init(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    let filter = CRATES
        .iter()
        .map(|name| format!("{name}={}", level.as_str().to_lowercase()))
        .collect::<Vec<_>>()
        .join(",");

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter))
        .format_timestamp(None)
        .init();
}
