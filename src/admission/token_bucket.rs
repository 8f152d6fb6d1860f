//! Token Bucket Module
//!
//! Non-blocking token bucket guarding calls to the upstream source.

use std::time::Duration;

use parking_lot::Mutex;
use serde::Serialize;
use tokio::time::Instant;

// == Bucket State ==
#[derive(Debug)]
struct BucketState {
    /// Tokens currently available, fractional between refills
    available: f64,
    /// Instant of the last refill computation
    last_refill: Instant,
    admitted: u64,
    denied: u64,
}

// == Gate Stats ==
/// Snapshot of admission decisions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GateStats {
    pub capacity: u32,
    pub available_tokens: f64,
    pub admitted: u64,
    pub denied: u64,
}

// == Admission Gate ==
/// Token bucket rate limiter.
///
/// Starts full with `capacity` tokens and replenishes one token per
/// `refill_interval`, continuously. [`AdmissionGate::allow`] never waits: it
/// consumes a token when one is available and reports `false` otherwise.
#[derive(Debug)]
pub struct AdmissionGate {
    /// Maximum number of tokens (burst size)
    capacity: u32,
    /// Time needed to replenish a single token
    refill_interval: Duration,
    state: Mutex<BucketState>,
}

impl AdmissionGate {
    // == Constructor ==
    /// Creates a full bucket.
    ///
    /// A zero `capacity` denies every call. A zero `refill_interval` keeps
    /// the bucket permanently full.
    pub fn new(capacity: u32, refill_interval: Duration) -> Self {
        Self {
            capacity,
            refill_interval,
            state: Mutex::new(BucketState {
                available: f64::from(capacity),
                last_refill: Instant::now(),
                admitted: 0,
                denied: 0,
            }),
        }
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn refill_interval(&self) -> Duration {
        self.refill_interval
    }

    // == Allow ==
    /// Consumes one token if available.
    pub fn allow(&self) -> bool {
        let mut state = self.state.lock();
        self.refill(&mut state, Instant::now());

        if state.available >= 1.0 {
            state.available -= 1.0;
            state.admitted += 1;
            true
        } else {
            state.denied += 1;
            false
        }
    }

    /// Current token count, including refill accrued since the last call.
    pub fn available_tokens(&self) -> f64 {
        let mut state = self.state.lock();
        self.refill(&mut state, Instant::now());
        state.available
    }

    pub fn stats(&self) -> GateStats {
        let mut state = self.state.lock();
        self.refill(&mut state, Instant::now());
        GateStats {
            capacity: self.capacity,
            available_tokens: state.available,
            admitted: state.admitted,
            denied: state.denied,
        }
    }

    fn refill(&self, state: &mut BucketState, now: Instant) {
        let capacity = f64::from(self.capacity);

        if self.refill_interval.is_zero() {
            state.available = capacity;
        } else {
            let elapsed = now.saturating_duration_since(state.last_refill);
            let accrued = elapsed.as_secs_f64() / self.refill_interval.as_secs_f64();
            state.available = (state.available + accrued).min(capacity);
        }
        state.last_refill = now;
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tokio::time::advance;

    #[tokio::test(start_paused = true)]
    async fn test_burst_then_deny() {
        let gate = AdmissionGate::new(2, Duration::from_secs(1));

        let results: Vec<bool> = (0..3).map(|_| gate.allow()).collect();

        assert_eq!(results, vec![true, true, false]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_refills_one_token_per_interval() {
        let gate = AdmissionGate::new(2, Duration::from_secs(1));
        assert!(gate.allow());
        assert!(gate.allow());
        assert!(!gate.allow());

        advance(Duration::from_millis(500)).await;
        assert!(!gate.allow(), "Half a token is not enough");

        advance(Duration::from_millis(500)).await;
        assert!(gate.allow());
        assert!(!gate.allow());
    }

    #[tokio::test(start_paused = true)]
    async fn test_refill_is_capped_at_capacity() {
        let gate = AdmissionGate::new(3, Duration::from_millis(10));
        assert!(gate.allow());

        advance(Duration::from_secs(60)).await;

        assert_eq!(gate.available_tokens(), 3.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_steady_state_rate_over_long_window() {
        let gate = AdmissionGate::new(5, Duration::from_millis(100));
        let mut admitted = 0;

        // Hammer the gate every 10ms for 10 seconds
        for _ in 0..1_000 {
            for _ in 0..10 {
                if gate.allow() {
                    admitted += 1;
                }
            }
            advance(Duration::from_millis(10)).await;
        }

        // Burst plus one token per 100ms
        assert!(admitted <= 5 + 100, "admitted {}", admitted);
        assert!(admitted >= 100, "admitted {}", admitted);
    }

    #[test]
    fn test_zero_capacity_denies_everything() {
        let gate = AdmissionGate::new(0, Duration::from_secs(1));
        assert!(!gate.allow());
        assert_eq!(gate.stats().denied, 1);
    }

    #[test]
    fn test_zero_interval_keeps_bucket_full() {
        let gate = AdmissionGate::new(1, Duration::ZERO);
        assert!(gate.allow());
        assert!(gate.allow());
    }

    #[test]
    fn test_stats_count_decisions() {
        let gate = AdmissionGate::new(1, Duration::from_secs(3600));
        gate.allow();
        gate.allow();
        gate.allow();

        let stats = gate.stats();
        assert_eq!(stats.capacity, 1);
        assert_eq!(stats.admitted, 1);
        assert_eq!(stats.denied, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_callers_never_overdraw() {
        let gate = Arc::new(AdmissionGate::new(10, Duration::from_secs(3600)));
        let mut handles = vec![];

        for _ in 0..64 {
            let gate = Arc::clone(&gate);
            handles.push(tokio::spawn(async move { gate.allow() }));
        }

        let mut admitted = 0;
        for handle in handles {
            if handle.await.unwrap() {
                admitted += 1;
            }
        }
        assert_eq!(admitted, 10);
    }

    #[test]
    fn test_threads_never_overdraw() {
        let gate = Arc::new(AdmissionGate::new(25, Duration::from_secs(3600)));

        let admitted: usize = std::thread::scope(|scope| {
            let workers: Vec<_> = (0..8)
                .map(|_| {
                    let gate = Arc::clone(&gate);
                    scope.spawn(move || (0..20).filter(|_| gate.allow()).count())
                })
                .collect();
            workers.into_iter().map(|w| w.join().unwrap()).sum()
        });

        assert_eq!(admitted, 25);
    }
}
