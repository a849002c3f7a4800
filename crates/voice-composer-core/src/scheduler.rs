//! Single-threaded cooperative scheduler.
//!
//! [`RunLoop`] keeps a queue of one-shot and repeating tasks keyed by a
//! virtual clock. The owner decides how that clock relates to wall time:
//! the host advances it from an `Instant`, tests advance it by hand.
//! Due tasks are handed back one at a time, so a dispatch that cancels
//! another due task always wins over it.

use std::{
    collections::{BTreeMap, HashMap},
    time::Duration,
};

use tracing::trace;

/// Repeating tasks never fire more often than this.
const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Cancellable handle returned for every scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskHandle(u64);

/// Timer facility consumed by the recording and playback controllers.
pub trait Scheduler<T> {
    /// Current scheduler time, measured from the scheduler's origin.
    fn now(&self) -> Duration;

    /// Runs `task` once after `delay`.
    fn schedule_once(&mut self, delay: Duration, task: T) -> TaskHandle;

    /// Runs `task` every `interval`, first after one interval.
    fn schedule_repeating(&mut self, interval: Duration, task: T) -> TaskHandle;

    /// Prevents a scheduled task from firing again. Returns `false` when the
    /// handle had already fired (one-shot) or been cancelled.
    fn cancel(&mut self, handle: TaskHandle) -> bool;
}

struct Entry<T> {
    handle: TaskHandle,
    task: T,
    repeat: Option<Duration>,
}

/// Virtual-time task queue implementing [`Scheduler`].
pub struct RunLoop<T> {
    now: Duration,
    next_handle: u64,
    next_seq: u64,
    queue: BTreeMap<(Duration, u64), Entry<T>>,
    keys: HashMap<TaskHandle, (Duration, u64)>,
}

impl<T: Clone> RunLoop<T> {
    /// Creates an empty run loop at time zero.
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_handle: 0,
            next_seq: 0,
            queue: BTreeMap::new(),
            keys: HashMap::new(),
        }
    }

    /// Deadline of the earliest pending task.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.queue.keys().next().map(|(deadline, _)| *deadline)
    }

    /// Whether `handle` will still fire.
    pub fn is_scheduled(&self, handle: TaskHandle) -> bool {
        self.keys.contains_key(&handle)
    }

    /// Number of pending tasks.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Whether no task is pending.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Removes the earliest task due at or before `target` and moves the
    /// clock to its deadline. Repeating tasks are re-queued one interval
    /// after the deadline they just fired for.
    pub fn pop_due(&mut self, target: Duration) -> Option<T> {
        let key = *self.queue.keys().next()?;
        if key.0 > target {
            return None;
        }

        let entry = self.queue.remove(&key)?;
        self.keys.remove(&entry.handle);
        self.now = self.now.max(key.0);

        trace!(handle = entry.handle.0, at_ms = key.0.as_millis(), "Task due");

        match entry.repeat {
            Some(interval) => {
                let task = entry.task.clone();
                self.insert(entry.handle, key.0 + interval, entry.task, Some(interval));
                Some(task)
            }
            None => Some(entry.task),
        }
    }

    /// Dispatches every task due up to `target`, then moves the clock to
    /// `target`. Returns the number of tasks dispatched.
    pub fn run_until<F>(&mut self, target: Duration, mut dispatch: F) -> usize
    where
        F: FnMut(&mut Self, T),
    {
        let mut fired = 0;
        while let Some(task) = self.pop_due(target) {
            dispatch(self, task);
            fired += 1;
        }
        self.now = self.now.max(target);
        fired
    }

    /// [`run_until`](Self::run_until) relative to the current time.
    pub fn advance<F>(&mut self, by: Duration, dispatch: F) -> usize
    where
        F: FnMut(&mut Self, T),
    {
        let target = self.now + by;
        self.run_until(target, dispatch)
    }

    fn insert(&mut self, handle: TaskHandle, deadline: Duration, task: T, repeat: Option<Duration>) {
        let key = (deadline, self.next_seq);
        self.next_seq += 1;
        self.queue.insert(
            key,
            Entry {
                handle,
                task,
                repeat,
            },
        );
        self.keys.insert(handle, key);
    }

    fn allocate(&mut self) -> TaskHandle {
        let handle = TaskHandle(self.next_handle);
        self.next_handle += 1;
        handle
    }
}

impl<T: Clone> Default for RunLoop<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Scheduler<T> for RunLoop<T> {
    fn now(&self) -> Duration {
        self.now
    }

    fn schedule_once(&mut self, delay: Duration, task: T) -> TaskHandle {
        let handle = self.allocate();
        let deadline = self.now + delay;
        self.insert(handle, deadline, task, None);
        handle
    }

    fn schedule_repeating(&mut self, interval: Duration, task: T) -> TaskHandle {
        let interval = interval.max(MIN_INTERVAL);
        let handle = self.allocate();
        let deadline = self.now + interval;
        self.insert(handle, deadline, task, Some(interval));
        handle
    }

    fn cancel(&mut self, handle: TaskHandle) -> bool {
        match self.keys.remove(&handle) {
            Some(key) => {
                self.queue.remove(&key);
                true
            }
            None => false,
        }
    }
}
