use crate::shared::constants;
use lazy_static::lazy_static;
use std::backtrace::Backtrace;
use std::fs::OpenOptions;
use std::io::Write;
use std::panic;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// File sink for diagnostics. Clicks and captures happen on the user's
/// live desktop, so stdout stays reserved for prompts and results; all
/// debugging detail goes to log files in the working directory.
#[derive(Clone)]
struct LogSink {
    error_path: PathBuf,
    debug_path: PathBuf,
}

lazy_static! {
    static ref SINK: Mutex<Option<LogSink>> = Mutex::new(None);
}

fn append_line(path: &Path, line: &str) {
    if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(path) {
        let _ = writeln!(file, "{}", line);
    }
}

fn start_file(path: &Path, label: &str) {
    if let Ok(mut file) = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)
    {
        let _ = writeln!(file, "=== {} Started: {} ===", label, chrono::Local::now());
    }
}

/// Truncate both log files and install a panic hook that records the
/// panic message and backtrace before the process dies.
pub fn init() {
    let cwd = std::env::current_dir().unwrap_or_default();
    let sink = LogSink {
        error_path: cwd.join(constants::ERROR_LOG_FILE),
        debug_path: cwd.join(constants::DEBUG_LOG_FILE),
    };

    start_file(&sink.error_path, "Error Log");
    start_file(&sink.debug_path, "Debug Log");

    *SINK.lock().unwrap() = Some(sink.clone());

    panic::set_hook(Box::new(move |info| {
        let msg = match info.payload().downcast_ref::<&str>() {
            Some(s) => *s,
            None => match info.payload().downcast_ref::<String>() {
                Some(s) => &s[..],
                None => "Box<Any>",
            },
        };
        let location = info
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()))
            .unwrap_or_else(|| "unknown".to_string());

        let report = format!(
            "\nPANIC at {}:\n{}\nBacktrace:\n{:?}\n",
            location,
            msg,
            Backtrace::capture()
        );
        append_line(&sink.error_path, &report);
        append_line(&sink.debug_path, &report);
        println!(
            "Application crashed. See {} for details.",
            sink.error_path.display()
        );
    }));
}

pub fn log(level: &str, msg: &str) {
    if let Some(sink) = SINK.lock().unwrap().as_ref() {
        let timestamp = chrono::Local::now().format("%H:%M:%S%.3f");
        let line = format!("[{}][{}] {}", timestamp, level, msg);
        append_line(&sink.debug_path, &line);
        if level == "ERROR" {
            append_line(&sink.error_path, &line);
        }
    }
}

pub fn info(msg: &str) {
    log("INFO", msg);
}

pub fn error(msg: &str) {
    log("ERROR", msg);
}

pub fn debug(msg: &str) {
    log("DEBUG", msg);
}
