/// Observational progress channel for the presentation layer.
///
/// Messages are human-readable and purely informational; correctness never
/// depends on them being seen.
pub trait ProgressReporter {
    fn report(&self, message: &str);
}

/// Discards everything. Default when no front-end is attached.
pub struct NullProgress;

impl ProgressReporter for NullProgress {
    fn report(&self, _message: &str) {}
}
