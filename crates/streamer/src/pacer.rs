use std::time::Duration;

/// The suspension point between two emissions.
pub trait Pacer {
    fn pause(&mut self);
}

/// Blocks the calling thread for a fixed interval on every pause.
#[derive(Debug, Clone, Copy)]
pub struct FixedInterval {
    interval: Duration,
}

impl FixedInterval {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Pacer for FixedInterval {
    fn pause(&mut self) {
        if !self.interval.is_zero() {
            std::thread::sleep(self.interval);
        }
    }
}

impl<P: Pacer + ?Sized> Pacer for &mut P {
    fn pause(&mut self) {
        (**self).pause();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn zero_interval_returns_immediately() {
        let mut pacer = FixedInterval::new(Duration::ZERO);
        let start = Instant::now();
        for _ in 0..100 {
            pacer.pause();
        }
        assert!(start.elapsed() < Duration::from_millis(50));
    }

    #[test]
    fn pause_waits_at_least_the_interval() {
        let mut pacer = FixedInterval::new(Duration::from_millis(20));
        let start = Instant::now();
        pacer.pause();
        assert!(start.elapsed() >= Duration::from_millis(20));
    }
}
