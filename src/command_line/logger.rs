use env_logger::{Builder, Env, Target};
use std::io::Write;

/// Sets up `env_logger` on stderr so it never mixes with solutions printed on stdout.
///
/// `RUST_LOG` wins when set; otherwise only warnings are shown, or engine debug output
/// with `--debug`.
pub(crate) fn init_logger(debug: bool) {
    let default = if debug { "debug" } else { "warn" };

    let result = Builder::from_env(Env::default().default_filter_or(default))
        .format(|buf, record| {
            writeln!(
                buf,
                "[{:<5}] {} - {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .target(Target::Stderr)
        .try_init();

    if let Err(e) = result {
        eprintln!("Logger already initialised: {e}");
    }
}
