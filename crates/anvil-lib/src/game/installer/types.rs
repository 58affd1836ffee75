use std::sync::atomic::{AtomicU32, Ordering};

/// Progress sink for installation. Implementations must be cheap: the asset
/// pool calls `set_step_count` once per finished object.
pub trait ProgressReporter: Send + Sync {
    /// Start a new step with optional total steps
    fn start_step(&self, name: &str, total_steps: Option<u32>);

    /// Set a short status message
    fn set_message(&self, message: &str);

    /// Set a numeric step count for the current step (e.g. "3/12").
    /// `total` may be None when unknown.
    fn set_step_count(&self, current: u32, total: Option<u32>);

    /// Mark operation as complete
    fn done(&self, success: bool, message: Option<&str>);
}

/// Reporter that discards everything.
pub struct SilentProgressReporter;

impl ProgressReporter for SilentProgressReporter {
    fn start_step(&self, _name: &str, _total_steps: Option<u32>) {}
    fn set_message(&self, _message: &str) {}
    fn set_step_count(&self, _current: u32, _total: Option<u32>) {}
    fn done(&self, _success: bool, _message: Option<&str>) {}
}

/// Reporter that forwards step changes to the `log` facade.
#[derive(Default)]
pub struct LogProgressReporter {
    last_logged: AtomicU32,
}

impl ProgressReporter for LogProgressReporter {
    fn start_step(&self, name: &str, total_steps: Option<u32>) {
        self.last_logged.store(0, Ordering::Relaxed);
        match total_steps {
            Some(total) => log::info!("{} ({} items)", name, total),
            None => log::info!("{}", name),
        }
    }

    fn set_message(&self, message: &str) {
        log::debug!("{}", message);
    }

    fn set_step_count(&self, current: u32, total: Option<u32>) {
        // Roughly every 10% for big batches.
        let Some(total) = total else { return };
        let stride = (total / 10).max(1);
        let last = self.last_logged.load(Ordering::Relaxed);
        if current == total || current >= last + stride {
            self.last_logged.store(current, Ordering::Relaxed);
            log::info!("  {}/{}", current, total);
        }
    }

    fn done(&self, success: bool, message: Option<&str>) {
        match (success, message) {
            (true, Some(msg)) => log::info!("{}", msg),
            (true, None) => log::info!("Done"),
            (false, Some(msg)) => log::error!("{}", msg),
            (false, None) => log::error!("Failed"),
        }
    }
}
