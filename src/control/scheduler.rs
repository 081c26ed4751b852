//! Frame scheduling. A scheduler hands out one `TickRequest` per frame until
//! it is exhausted or cancelled; the simulation never polls a wall clock
//! directly, so tests can drive it with synthetic timestamps.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crate::constants::MILLIS_PER_SECOND;

pub trait TimeSource {
    /// Monotonic timestamp in milliseconds.
    fn now(&self) -> f64;
}

#[derive(Debug, Clone)]
pub struct MonotonicTimeSource {
    start: Instant,
}

impl MonotonicTimeSource {
    pub fn new() -> Self {
        MonotonicTimeSource {
            start: Instant::now(),
        }
    }
}

impl Default for MonotonicTimeSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for MonotonicTimeSource {
    fn now(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * MILLIS_PER_SECOND
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickRequest {
    pub frame: u64,
    pub timestamp_ms: f64,
}

/// Revokes future tick requests. Cloneable so another thread can stop the loop.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

pub trait FrameScheduler {
    /// Waits for the next frame. `None` once the loop has been cancelled or
    /// the scheduler has no frames left.
    fn request_next_tick(&mut self) -> Option<TickRequest>;

    fn cancel_token(&self) -> CancelToken;

    fn cancel(&mut self) {
        self.cancel_token().cancel();
    }
}

#[derive(Debug)]
enum TimestampSource {
    FixedRate {
        next_ms: f64,
        interval_ms: f64,
        remaining: u64,
    },
    Scripted(VecDeque<f64>),
}

/// Produces timestamps without sleeping.
#[derive(Debug)]
pub struct SyntheticScheduler {
    source: TimestampSource,
    frame: u64,
    token: CancelToken,
}

impl SyntheticScheduler {
    /// `frames` ticks spaced `interval_ms` apart, the first at `start_ms + interval_ms`.
    pub fn fixed_rate(start_ms: f64, interval_ms: f64, frames: u64) -> Self {
        SyntheticScheduler {
            source: TimestampSource::FixedRate {
                next_ms: start_ms + interval_ms,
                interval_ms,
                remaining: frames,
            },
            frame: 0,
            token: CancelToken::default(),
        }
    }

    pub fn from_timestamps<I: IntoIterator<Item = f64>>(timestamps: I) -> Self {
        SyntheticScheduler {
            source: TimestampSource::Scripted(timestamps.into_iter().collect()),
            frame: 0,
            token: CancelToken::default(),
        }
    }
}

impl FrameScheduler for SyntheticScheduler {
    fn request_next_tick(&mut self) -> Option<TickRequest> {
        if self.token.is_cancelled() {
            return None;
        }
        let timestamp_ms = match &mut self.source {
            TimestampSource::FixedRate {
                next_ms,
                interval_ms,
                remaining,
            } => {
                if *remaining == 0 {
                    return None;
                }
                *remaining -= 1;
                let timestamp = *next_ms;
                *next_ms += *interval_ms;
                timestamp
            }
            TimestampSource::Scripted(queue) => queue.pop_front()?,
        };
        self.frame += 1;
        Some(TickRequest {
            frame: self.frame,
            timestamp_ms,
        })
    }

    fn cancel_token(&self) -> CancelToken {
        self.token.clone()
    }
}

/// Sleeps until each frame is due, reading timestamps from a `TimeSource`.
#[derive(Debug)]
pub struct RealtimeScheduler<T: TimeSource> {
    time_source: T,
    interval: Duration,
    remaining: Option<u64>,
    next_due: Option<Instant>,
    frame: u64,
    token: CancelToken,
}

impl<T: TimeSource> RealtimeScheduler<T> {
    pub fn new(time_source: T, interval: Duration, frames: Option<u64>) -> Self {
        RealtimeScheduler {
            time_source,
            interval,
            remaining: frames,
            next_due: None,
            frame: 0,
            token: CancelToken::default(),
        }
    }
}

impl<T: TimeSource> FrameScheduler for RealtimeScheduler<T> {
    fn request_next_tick(&mut self) -> Option<TickRequest> {
        if self.token.is_cancelled() || self.remaining == Some(0) {
            return None;
        }

        let due = self.next_due.unwrap_or_else(Instant::now);
        let now = Instant::now();
        if due > now {
            thread::sleep(due - now);
        }
        // Stop requests revoked while sleeping.
        if self.token.is_cancelled() {
            return None;
        }

        self.next_due = Some(due.max(now) + self.interval);
        if let Some(remaining) = self.remaining.as_mut() {
            *remaining -= 1;
        }
        self.frame += 1;
        Some(TickRequest {
            frame: self.frame,
            timestamp_ms: self.time_source.now(),
        })
    }

    fn cancel_token(&self) -> CancelToken {
        self.token.clone()
    }
}
