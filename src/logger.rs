use std::io::Write;
use std::time::Instant;

use log::{LevelFilter, Log, Metadata, Record};
use parking_lot::Mutex;

/// Where diagnostic records end up. Console progress messages never go through here.
enum Sink {
    Stderr,
    File(Mutex<std::fs::File>),
}

struct GitpushLogger {
    sink: Sink,
    filter: LevelFilter,
    start: Instant,
}

fn format_record(elapsed: f64, record: &Record) -> String {
    format!(
        "[{elapsed:.3}s] [{}] {}: {}",
        record.level(),
        record.target(),
        record.args()
    )
}

impl Log for GitpushLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.filter
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let elapsed = self.start.elapsed().as_secs_f64();
        let line = format_record(elapsed, record);
        match self.sink {
            Sink::Stderr => eprintln!("{line}"),
            Sink::File(ref file) => {
                let _ = writeln!(file.lock(), "{line}");
            }
        }
    }

    fn flush(&self) {
        match self.sink {
            Sink::Stderr => {
                let _ = std::io::stderr().flush();
            }
            Sink::File(ref file) => {
                let _ = file.lock().flush();
            }
        }
    }
}

/// Level from `RUST_LOG`, falling back to `default`.
fn filter_from_env(value: Option<&str>, default: LevelFilter) -> LevelFilter {
    value.and_then(|s| s.parse().ok()).unwrap_or(default)
}

/// Initialize the global logger. Must be called once before any logging.
///
/// Records go to `log_file` when given, otherwise to stderr. Without `RUST_LOG`
/// a log file captures `info` and above, stderr only `warn` and above.
///
/// # Panics
///
/// Panics if called more than once.
pub fn init(log_file: Option<std::fs::File>) {
    let default = if log_file.is_some() {
        LevelFilter::Info
    } else {
        LevelFilter::Warn
    };
    let filter = filter_from_env(std::env::var("RUST_LOG").ok().as_deref(), default);

    let logger = GitpushLogger {
        sink: log_file.map_or(Sink::Stderr, |f| Sink::File(Mutex::new(f))),
        filter,
        start: Instant::now(),
    };

    log::set_boxed_logger(Box::new(logger)).expect("logger already initialized");
    log::set_max_level(filter);
}
