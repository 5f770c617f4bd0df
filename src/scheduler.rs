use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::context::{Context, Service};

/// Fixed interval between a slot state change and its `after_*` hook.
pub const SETTLE_DELAY: Duration = Duration::from_millis(250);

type Callback = Box<dyn FnOnce() + Send>;

struct Entry {
    due: Instant,
    callback: Callback,
}

/// Fire-and-forget delayed-callback queue. Entries are never cancelled; the
/// host pumps `tick` once per frame with the current instant and due
/// callbacks run then, in the order they were scheduled.
pub struct Scheduler {
    queue: Mutex<Vec<Entry>>,
}

impl Service for Scheduler {
    fn init(_ctx: &Context) -> Self {
        Self {
            queue: Mutex::new(Vec::new()),
        }
    }
}

impl Scheduler {
    pub fn schedule_after<F>(&self, delay: Duration, callback: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.schedule_at(Instant::now() + delay, callback)
    }

    pub fn schedule_at<F>(&self, due: Instant, callback: F)
    where
        F: FnOnce() + Send + 'static,
    {
        if let Ok(mut queue) = self.queue.lock() {
            queue.push(Entry {
                due,
                callback: Box::new(callback),
            });
        }
    }

    /// Run every callback whose deadline has passed. Returns how many fired.
    /// Callbacks run outside the queue lock, so they may schedule more work.
    pub fn tick(&self, now: Instant) -> usize {
        let due: Vec<Callback> = {
            let mut queue = match self.queue.lock() {
                Ok(queue) => queue,
                Err(_) => return 0,
            };
            let mut fired = Vec::new();
            let mut i = 0;
            while i < queue.len() {
                if queue[i].due <= now {
                    fired.push(queue.remove(i).callback);
                } else {
                    i += 1;
                }
            }
            fired
        };
        let count = due.len();
        for callback in due {
            callback();
        }
        count
    }

    pub fn pending(&self) -> usize {
        self.queue.lock().map(|q| q.len()).unwrap_or(0)
    }
}
