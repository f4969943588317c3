#[derive(Debug, Clone)]
pub enum Progress {
    SearchStart { mirror: bool },
    CandidateEvaluated { index: usize, rmsd: f64, mirror: bool },
    Improved { index: usize, rmsd: f64, mirror: bool },
    SearchFinish { evaluated: usize, best_rmsd: f64 },

    Message(String),
}

pub type ProgressCallback<'a> = Box<dyn Fn(Progress) + Send + Sync + 'a>;
pub type CancelCheck<'a> = Box<dyn Fn() -> bool + Send + Sync + 'a>;

/// Event sink and cancellation hook for long searches. Cancellation is polled
/// between candidates, never in the middle of one.
#[derive(Default)]
pub struct ProgressReporter<'a> {
    callback: Option<ProgressCallback<'a>>,
    cancel: Option<CancelCheck<'a>>,
}

impl<'a> ProgressReporter<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(callback: ProgressCallback<'a>) -> Self {
        Self {
            callback: Some(callback),
            cancel: None,
        }
    }

    pub fn with_cancel(mut self, cancel: CancelCheck<'a>) -> Self {
        self.cancel = Some(cancel);
        self
    }

    #[inline]
    pub fn report(&self, event: Progress) {
        if let Some(cb) = &self.callback {
            cb(event);
        }
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(|check| check())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[test]
    fn report_forwards_events_to_callback() {
        let seen = Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|event| {
            if let Progress::Message(m) = event {
                seen.lock().unwrap().push(m);
            }
        }));
        reporter.report(Progress::Message("hello".to_string()));
        reporter.report(Progress::SearchStart { mirror: false });
        drop(reporter);
        assert_eq!(seen.into_inner().unwrap(), vec!["hello".to_string()]);
    }

    #[test]
    fn default_reporter_is_silent_and_never_cancelled() {
        let reporter = ProgressReporter::new();
        reporter.report(Progress::Message("ignored".to_string()));
        assert!(!reporter.is_cancelled());
    }

    #[test]
    fn cancel_check_is_polled_on_demand() {
        let flag = AtomicBool::new(false);
        let reporter = ProgressReporter::new().with_cancel(Box::new(|| flag.load(Ordering::SeqCst)));
        assert!(!reporter.is_cancelled());
        flag.store(true, Ordering::SeqCst);
        assert!(reporter.is_cancelled());
    }
}
