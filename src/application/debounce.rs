/// Coalesces a burst of values into the last one, released after `delay_ms`
/// of quiet.
///
/// Time is passed in explicitly so the same logic backs both the browser
/// timer and deterministic tests.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay_ms: f64,
    pending: Option<(T, f64)>,
}

impl<T> Debouncer<T> {
    pub fn new(delay_ms: f64) -> Self {
        Self { delay_ms, pending: None }
    }

    pub fn delay_ms(&self) -> f64 {
        self.delay_ms
    }

    /// Replace any pending value and push the deadline out.
    pub fn schedule(&mut self, value: T, now_ms: f64) {
        self.pending = Some((value, now_ms + self.delay_ms));
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Release the pending value if its deadline has passed.
    pub fn take_due(&mut self, now_ms: f64) -> Option<T> {
        match &self.pending {
            Some((_, deadline)) if now_ms >= *deadline => self.pending.take().map(|(v, _)| v),
            _ => None,
        }
    }

    /// Release the pending value regardless of its deadline.
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take().map(|(v, _)| v)
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::Debouncer;

    #[test]
    fn burst_collapses_to_last_value() {
        let mut debouncer = Debouncer::new(300.0);
        debouncer.schedule(1, 0.0);
        debouncer.schedule(2, 100.0);
        debouncer.schedule(3, 250.0);
        assert_eq!(debouncer.take_due(400.0), None);
        assert_eq!(debouncer.take_due(550.0), Some(3));
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn cancel_drops_pending_write() {
        let mut debouncer = Debouncer::new(300.0);
        debouncer.schedule("x", 0.0);
        debouncer.cancel();
        assert_eq!(debouncer.take_due(1_000.0), None);
        debouncer.schedule("y", 0.0);
        assert_eq!(debouncer.flush(), Some("y"));
    }
}
