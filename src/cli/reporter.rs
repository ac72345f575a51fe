use colored::*;
use std::error::Error;
use std::fmt::{Display, Write as _};
use std::io::{self, Write};
use std::sync::{Mutex, MutexGuard};
use crate::utils::exit::{terminate, ERROR_EXIT_CODE};

/// Destination for report lines
pub type SinkWriter = Box<dyn Write + Send>;

// `None` means stderr.
static SINK: Mutex<Option<SinkWriter>> = Mutex::new(None);

static SINK_OVERRIDE_LOCK: Mutex<()> = Mutex::new(());

/// Redirect report lines until the returned guard is dropped
pub fn override_sink(writer: SinkWriter) -> SinkGuard {
    let lock = SINK_OVERRIDE_LOCK
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());

    let previous = SINK
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .replace(writer);

    SinkGuard {
        previous,
        _lock: lock,
    }
}

/// Restores the previous log sink when dropped
pub struct SinkGuard {
    previous: Option<SinkWriter>,
    _lock: MutexGuard<'static, ()>,
}

impl Drop for SinkGuard {
    fn drop(&mut self) {
        let mut sink = SINK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(writer) = sink.as_mut() {
            let _ = writer.flush();
        }
        *sink = self.previous.take();
    }
}

fn write_line(line: &str) {
    let mut sink = SINK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    // A sink that cannot be written to has nowhere left to report to.
    let _ = match sink.as_mut() {
        Some(writer) => writeln!(writer, "{}", line),
        None => writeln!(io::stderr().lock(), "{}", line),
    };
}

fn concat(parts: &[&dyn Display]) -> String {
    let mut message = String::new();
    for part in parts {
        let _ = write!(message, "{}", part);
    }
    message
}

fn emit_error(err: Option<&dyn Error>, parts: &[&dyn Display]) {
    if !parts.is_empty() {
        write_line(&format!("{}{}", "Error: ".red(), concat(parts)));
    }
    if let Some(err) = err {
        write_line(&err.to_string().yellow().to_string());
    }
}

/// Write a success line. Never terminates.
pub fn report_success(parts: &[&dyn Display]) {
    write_line(&format!("{}{}", "Success: ".green(), concat(parts)));
}

/// Report an error and terminate with status 1.
///
/// An empty `parts` suppresses the `Error: ` line and a missing `err`
/// suppresses the detail line; termination happens either way.
pub fn report_error(err: Option<&dyn Error>, parts: &[&dyn Display]) {
    emit_error(err, parts);
    terminate(ERROR_EXIT_CODE);
}

/// Report `err` as the error line followed by one `Hint: ` line per hint,
/// in order, then terminate with status 1.
pub fn report_error_with_hints(err: &dyn Error, hints: &[&str]) {
    emit_error(None, &[&err.to_string()]);
    for hint in hints {
        write_line(&format!("{}{}", "Hint: ".cyan(), hint));
    }
    terminate(ERROR_EXIT_CODE);
}
