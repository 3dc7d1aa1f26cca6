//! Analysis tap
//!
//! Non-destructive monitoring point on the mono feed, for waveform
//! visualization. The audio callback pushes with `try_lock` and simply skips
//! the push under contention, so the real-time path never blocks on a reader.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Bounded ring of recent time-domain samples
///
/// Cloning shares the underlying ring; the engine keeps one handle and the
/// processor another.
#[derive(Debug, Clone)]
pub struct AnalysisTap {
    ring: Arc<Mutex<VecDeque<f32>>>,
    capacity: usize,
}

impl AnalysisTap {
    /// Create a tap holding the most recent `capacity` samples.
    pub fn new(capacity: usize) -> Self {
        Self {
            ring: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity,
        }
    }

    /// Maximum snapshot length in samples.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Push a block of mono samples from the audio callback.
    ///
    /// Non-blocking: if a snapshot is being taken right now, this block is
    /// dropped rather than stalling the audio thread.
    pub fn push(&self, samples: &[f32]) {
        if let Ok(mut ring) = self.ring.try_lock() {
            for &sample in samples {
                if ring.len() == self.capacity {
                    ring.pop_front();
                }
                ring.push_back(sample);
            }
        }
    }

    /// Copy out the recorded samples, oldest first.
    pub fn snapshot(&self) -> Vec<f32> {
        match self.ring.lock() {
            Ok(ring) => ring.iter().copied().collect(),
            Err(_) => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_returns_pushed_samples() {
        let tap = AnalysisTap::new(8);
        tap.push(&[0.1, 0.2, 0.3]);
        assert_eq!(tap.snapshot(), vec![0.1, 0.2, 0.3]);
    }

    #[test]
    fn ring_keeps_most_recent() {
        let tap = AnalysisTap::new(4);
        tap.push(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(tap.snapshot(), vec![3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn clones_share_the_ring() {
        let tap = AnalysisTap::new(4);
        let writer = tap.clone();
        writer.push(&[0.5]);
        assert_eq!(tap.snapshot(), vec![0.5]);
    }

    #[test]
    fn empty_tap_snapshot_is_empty() {
        let tap = AnalysisTap::new(4);
        assert!(tap.snapshot().is_empty());
    }
}
