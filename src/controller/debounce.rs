use std::time::Duration;

use tokio::time::Instant;

/// Cancel-and-restart timer holding the most recent value until it has been
/// left alone for the quiet period.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    quiet: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            pending: None,
        }
    }

    /// Replaces any buffered value and restarts the quiet period from `now`.
    pub fn push(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now + self.quiet));
    }

    /// When the buffered value will settle, if there is one.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, deadline)| *deadline)
    }

    /// Releases the buffered value once its quiet period has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match self.deadline() {
            Some(deadline) if now >= deadline => self.pending.take().map(|(value, _)| value),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUIET: Duration = Duration::from_millis(500);

    #[test]
    fn value_settles_after_quiet_period() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(QUIET);

        debouncer.push("a", start);
        assert_eq!(debouncer.poll(start + Duration::from_millis(499)), None);
        assert_eq!(debouncer.poll(start + QUIET), Some("a"));
        assert_eq!(debouncer.deadline(), None);
    }

    #[test]
    fn each_push_restarts_the_timer() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(QUIET);

        debouncer.push("j", start);
        debouncer.push("jo", start + Duration::from_millis(200));
        debouncer.push("joh", start + Duration::from_millis(400));

        assert_eq!(debouncer.poll(start + Duration::from_millis(600)), None);
        assert_eq!(
            debouncer.deadline(),
            Some(start + Duration::from_millis(900))
        );
        assert_eq!(debouncer.poll(start + Duration::from_millis(900)), Some("joh"));
        assert_eq!(debouncer.poll(start + Duration::from_secs(5)), None);
    }
}
