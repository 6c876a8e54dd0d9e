use std::collections::VecDeque;

use log::trace;

use super::clock::Clock;
use super::model_trait::{Device, Reportable, ReportableDevice};
use super::{DeviceRecord, DeviceReport, QueueReport};
use crate::utils::errors::SimulationError;

/// The queue holds waiting transacts in FIFO order, remembering the tick
/// each one entered.  On every dequeue the residence time is folded into
/// the wait statistics, and on every tick the current length is sampled,
/// giving a time-averaged length.
///
/// The queue itself never moves transacts; the driver decides when to
/// enqueue (typically on arrivals) and when to dequeue (typically when a
/// processor becomes idle).
#[derive(Debug, Clone)]
pub struct Queue {
    clock: Clock,
    waiting: VecDeque<u64>,
    metrics: Metrics,
}

#[derive(Debug, Clone, Default)]
struct Metrics {
    enqueued: usize,
    dequeued: usize,
    max_length: usize,
    length_integral: u64,
    total_wait: u64,
    min_wait: Option<u64>,
    max_wait: u64,
}

impl Queue {
    pub fn new(name: String) -> Self {
        Self {
            clock: Clock::new(name),
            waiting: VecDeque::new(),
            metrics: Metrics::default(),
        }
    }

    pub fn store_records(mut self, store_records: bool) -> Self {
        self.clock.set_store_records(store_records);
        self
    }

    /// Add `count` transacts, all stamped with the current tick.  Enqueuing
    /// zero transacts is a no-op.
    pub fn enqueue_n(&mut self, count: usize) {
        for _ in 0..count {
            self.waiting.push_back(self.clock.ticks());
            self.metrics.enqueued += 1;
            self.metrics.max_length = usize::max(self.metrics.max_length, self.waiting.len());
        }
        if count > 0 {
            trace!(
                "{} enqueued {} at tick {}, length {}",
                self.clock.name(),
                count,
                self.clock.ticks(),
                self.waiting.len()
            );
            self.clock.record("Enqueue", count.to_string());
        }
    }

    pub fn enqueue(&mut self) {
        self.enqueue_n(1)
    }

    /// Remove `count` transacts, oldest first.  Fails if the queue runs
    /// empty before `count` transacts were removed; transacts removed before
    /// the failure stay removed and accounted for.
    pub fn dequeue_n(&mut self, count: usize) -> Result<(), SimulationError> {
        for _ in 0..count {
            let entered = self.waiting.pop_front().ok_or_else(|| {
                SimulationError::IllegalState(format![
                    "cannot dequeue from empty queue {}",
                    self.clock.name()
                ])
            })?;
            let wait = self.clock.ticks() - entered;
            self.metrics.dequeued += 1;
            self.metrics.total_wait += wait;
            self.metrics.max_wait = u64::max(self.metrics.max_wait, wait);
            self.metrics.min_wait = Some(match self.metrics.min_wait {
                Some(min_wait) => u64::min(min_wait, wait),
                None => wait,
            });
            self.clock.record("Dequeue", wait.to_string());
        }
        Ok(())
    }

    pub fn dequeue(&mut self) -> Result<(), SimulationError> {
        self.dequeue_n(1)
    }

    pub fn len(&self) -> usize {
        self.waiting.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waiting.is_empty()
    }

    /// The longest the queue has been, measured after each enqueue.
    pub fn max_length(&self) -> usize {
        self.metrics.max_length
    }

    /// The length sampled once per tick, averaged over all ticks.
    pub fn average_length(&self) -> f64 {
        if self.clock.ticks() > 0 {
            self.metrics.length_integral as f64 / self.clock.ticks() as f64
        } else {
            0.0
        }
    }

    pub fn total_enqueued(&self) -> usize {
        self.metrics.enqueued
    }

    pub fn total_dequeued(&self) -> usize {
        self.metrics.dequeued
    }

    pub fn total_wait(&self) -> u64 {
        self.metrics.total_wait
    }

    /// The shortest residence time of any dequeued transact, or `None`
    /// before the first dequeue.  A zero wait is a genuine observation.
    pub fn min_wait(&self) -> Option<u64> {
        self.metrics.min_wait
    }

    pub fn max_wait(&self) -> u64 {
        self.metrics.max_wait
    }

    /// Accumulated waiting time divided by the number of transacts ever
    /// enqueued, so transacts still waiting count with no wait yet.
    pub fn average_wait(&self) -> f64 {
        if self.metrics.enqueued > 0 {
            self.metrics.total_wait as f64 / self.metrics.enqueued as f64
        } else {
            0.0
        }
    }
}

impl Device for Queue {
    fn name(&self) -> &str {
        self.clock.name()
    }

    fn ticks(&self) -> u64 {
        self.clock.ticks()
    }

    fn advance(&mut self) -> Result<(), SimulationError> {
        self.clock.tick();
        self.metrics.length_integral += self.waiting.len() as u64;
        Ok(())
    }
}

impl Reportable for Queue {
    fn status(&self) -> String {
        match self.waiting.len() {
            0 => String::from("Empty"),
            length => format!["Holding {}", length],
        }
    }

    fn report(&self) -> DeviceReport {
        DeviceReport::Queue(QueueReport {
            name: self.clock.name().to_string(),
            ticks: self.clock.ticks(),
            length: self.len(),
            max_length: self.max_length(),
            average_length: self.average_length(),
            enqueued: self.total_enqueued(),
            min_wait: self.min_wait(),
            max_wait: self.max_wait(),
            average_wait: self.average_wait(),
        })
    }

    fn records(&self) -> &Vec<DeviceRecord> {
        self.clock.records()
    }
}

impl ReportableDevice for Queue {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dequeues_oldest_first() -> Result<(), SimulationError> {
        let mut queue = Queue::new(String::from("line"));
        queue.advance()?;
        queue.enqueue();
        (0..3).try_for_each(|_| queue.advance())?;
        queue.enqueue();
        queue.advance()?;
        // Entered at ticks 1 and 4, now at tick 5
        queue.dequeue()?;
        assert_eq!(queue.max_wait(), 4);
        assert_eq!(queue.min_wait(), Some(4));
        queue.dequeue()?;
        assert_eq!(queue.min_wait(), Some(1));
        assert_eq!(queue.total_wait(), 5);
        assert!(queue.is_empty());
        Ok(())
    }

    #[test]
    fn zero_wait_is_a_real_minimum() -> Result<(), SimulationError> {
        let mut queue = Queue::new(String::from("line"));
        assert_eq!(queue.min_wait(), None);
        queue.advance()?;
        queue.enqueue();
        queue.advance()?;
        queue.dequeue()?;
        assert_eq!(queue.min_wait(), Some(1));
        queue.enqueue();
        queue.dequeue()?;
        assert_eq!(queue.min_wait(), Some(0));
        Ok(())
    }

    #[test]
    fn length_is_sampled_once_per_tick() -> Result<(), SimulationError> {
        let mut queue = Queue::new(String::from("line"));
        queue.enqueue_n(2);
        queue.advance()?;
        queue.advance()?;
        queue.dequeue_n(2)?;
        queue.advance()?;
        queue.advance()?;
        // Samples: 2, 2, 0, 0
        assert!((queue.average_length() - 1.0).abs() < 1e-12);
        assert_eq!(queue.max_length(), 2);
        assert_eq!(queue.ticks(), 4);
        Ok(())
    }

    #[test]
    fn average_wait_counts_every_enqueued_transact() -> Result<(), SimulationError> {
        let mut queue = Queue::new(String::from("line"));
        queue.enqueue_n(2);
        (0..3).try_for_each(|_| queue.advance())?;
        queue.dequeue()?;
        assert!((queue.average_wait() - 1.5).abs() < 1e-12);
        assert_eq!(queue.total_enqueued(), 2);
        assert_eq!(queue.total_dequeued(), 1);
        Ok(())
    }

    #[test]
    fn empty_dequeue_is_an_illegal_state() {
        let mut queue = Queue::new(String::from("line"));
        queue.enqueue();
        assert!(matches!(
            queue.dequeue_n(2),
            Err(SimulationError::IllegalState(_))
        ));
        assert_eq!(queue.total_dequeued(), 1);
        assert!(queue.dequeue_n(0).is_ok());
    }

    #[test]
    fn zero_enqueue_is_a_no_op() {
        let mut queue = Queue::new(String::from("line"));
        queue.enqueue_n(0);
        assert_eq!(queue.total_enqueued(), 0);
        assert_eq!(queue.status(), "Empty");
    }

    #[test]
    fn empty_statistics_are_zero() {
        let queue = Queue::new(String::from("line"));
        assert_eq!(queue.average_length(), 0.0);
        assert_eq!(queue.average_wait(), 0.0);
    }
}
