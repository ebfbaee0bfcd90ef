use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Initialize structured logging with tracing
/// Call once at startup. Output goes to stderr so command output on stdout
/// stays clean. `RUST_LOG` overrides `default_level`.
pub fn init_logging(json: bool, default_level: &str) {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

  let registry = tracing_subscriber::registry().with(filter);

  let result = if json {
    tracing::subscriber::set_global_default(
      registry.with(
        fmt::layer()
          .with_writer(std::io::stderr)
          .with_target(true)
          .with_file(true)
          .with_line_number(true)
          .json(),
      ),
    )
  } else {
    tracing::subscriber::set_global_default(
      registry.with(fmt::layer().with_writer(std::io::stderr).with_target(false)),
    )
  };

  if let Err(e) = result {
    eprintln!("Logging already initialized: {}", e);
    return;
  }

  tracing::debug!(json, "Structured logging initialized");
}
