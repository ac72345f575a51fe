//! Test support for code that reports through the process-wide sink and
//! exit controller.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use crate::cli::reporter::{override_sink, SinkGuard};
use crate::utils::exit::{override_exit, ExitGuard, ExitRecorder};

/// In-memory writer shared between the sink and the test
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    pub fn contents(&self) -> String {
        let bytes = self.bytes.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Captures report lines and exit requests until dropped.
///
/// While a capture is alive no other capture can start, so tests running on
/// parallel threads take turns.
pub struct Capture {
    buffer: SharedBuffer,
    recorder: ExitRecorder,
    // Dropped in declaration order: exit first, then sink.
    _exit: ExitGuard,
    _sink: SinkGuard,
}

impl Capture {
    pub fn start() -> Self {
        let buffer = SharedBuffer::default();
        let recorder = ExitRecorder::new();
        let sink = override_sink(Box::new(buffer.clone()));
        let exit = override_exit(recorder.exit_fn());

        Self {
            buffer,
            recorder,
            _exit: exit,
            _sink: sink,
        }
    }

    /// Captured lines with color codes removed
    pub fn lines(&self) -> Vec<String> {
        strip_ansi(&self.buffer.contents())
            .lines()
            .map(str::to_string)
            .collect()
    }

    /// Captured output exactly as written, color codes included
    pub fn raw(&self) -> String {
        self.buffer.contents()
    }

    pub fn exit_codes(&self) -> Vec<i32> {
        self.recorder.codes()
    }
}

/// Remove `ESC [ ... m` color sequences
pub fn strip_ansi(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\u{1b}' && chars.peek() == Some(&'[') {
            chars.next();
            for c in chars.by_ref() {
                if c.is_ascii_alphabetic() {
                    break;
                }
            }
        } else {
            out.push(c);
        }
    }
    out
}
