use env_logger::{Builder, Env};
use std::io::Write;

/// Diagnostics go to stderr; stdout is reserved for command output
pub fn init_logging() {
    let logging_env = Env::default().filter_or("RUST_LOG", "info");
    Builder::from_env(logging_env)
        .format(|buf, record| {
            writeln!(
                buf,
                "{} {} {}",
                chrono::Local::now().format("%H:%M:%S"),
                record.target(),
                record.args()
            )
        })
        .init();
}
