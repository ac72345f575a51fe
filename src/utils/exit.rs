use std::sync::{Arc, Mutex, MutexGuard, RwLock};

/// Function value used to end the process with a status code
pub type ExitFn = Arc<dyn Fn(i32) + Send + Sync>;

/// Status code used for every reported error
pub const ERROR_EXIT_CODE: i32 = 1;

// `None` means the real `std::process::exit`.
static EXIT_FN: RwLock<Option<ExitFn>> = RwLock::new(None);

// Held by an `ExitGuard` for its whole lifetime so overrides never interleave.
static OVERRIDE_LOCK: Mutex<()> = Mutex::new(());

/// Terminate with the given status code.
///
/// In production this never returns. When an override is installed the
/// override is called instead and control comes back to the caller, which
/// must then stop on its own.
pub fn terminate(code: i32) {
    let current = EXIT_FN
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .clone();

    match current {
        Some(exit_fn) => exit_fn(code),
        None => std::process::exit(code),
    }
}

/// Replace the exit function until the returned guard is dropped
pub fn override_exit(exit_fn: ExitFn) -> ExitGuard {
    let lock = OVERRIDE_LOCK
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());

    let mut slot = EXIT_FN
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    let previous = slot.replace(exit_fn);

    ExitGuard {
        previous,
        _lock: lock,
    }
}

/// Restores the previous exit function when dropped
pub struct ExitGuard {
    previous: Option<ExitFn>,
    _lock: MutexGuard<'static, ()>,
}

impl Drop for ExitGuard {
    fn drop(&mut self) {
        let mut slot = EXIT_FN
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *slot = self.previous.take();
    }
}

/// Records requested exit codes instead of terminating
#[derive(Debug, Clone, Default)]
pub struct ExitRecorder {
    codes: Arc<Mutex<Vec<i32>>>,
}

impl ExitRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exit function that appends to this recorder
    pub fn exit_fn(&self) -> ExitFn {
        let codes = Arc::clone(&self.codes);
        Arc::new(move |code| {
            codes
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .push(code);
        })
    }

    /// Every code passed to `terminate` so far, in call order
    pub fn codes(&self) -> Vec<i32> {
        self.codes
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}
