use std::cell::RefCell;
use std::collections::BTreeMap;
use std::time::Duration;

use log::trace;

pub type TaskId = u64;
pub type Task = Box<dyn FnOnce()>;

/// One-shot delayed callbacks on a single cooperative loop. Game logic schedules its
/// countdown ticks through this; cancelled tasks never run.
pub trait Scheduler {
    /// Current loop time, measured from the scheduler's creation.
    fn now(&self) -> Duration;

    fn schedule(&self, delay: Duration, task: Task) -> TaskId;

    /// Returns false when the task already ran or was cancelled before.
    fn cancel(&self, id: TaskId) -> bool;
}

struct SchedulerState {
    now: Duration,
    next_id: TaskId,
    queue: BTreeMap<(Duration, TaskId), Task>,
}

/// Scheduler whose clock only moves when the host loop calls `advance`. A UI loop feeds it
/// the real time between frames; tests feed it whatever they need.
pub struct ManualScheduler {
    state: RefCell<SchedulerState>,
}

impl Default for ManualScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self {
            state: RefCell::new(SchedulerState {
                now: Duration::ZERO,
                next_id: 0,
                queue: BTreeMap::new(),
            }),
        }
    }

    /// Moves the clock forward, running every task that comes due in order. Tasks may
    /// schedule further tasks; those run too if they fall inside the window. Returns how many
    /// tasks ran.
    pub fn advance(&self, by: Duration) -> usize {
        let target = self.state.borrow().now.saturating_add(by);
        let mut fired = 0;
        loop {
            let task = {
                let mut state = self.state.borrow_mut();
                let due = match state.queue.first_key_value() {
                    Some((&(due, _), _)) if due <= target => due,
                    _ => break,
                };
                state.now = due;
                state.queue.pop_first().map(|(_, task)| task)
            };
            // state is released here so the task can use the scheduler
            if let Some(task) = task {
                task();
                fired += 1;
            }
        }
        self.state.borrow_mut().now = target;
        fired
    }

    pub fn pending(&self) -> usize {
        self.state.borrow().queue.len()
    }
}

impl Scheduler for ManualScheduler {
    fn now(&self) -> Duration {
        self.state.borrow().now
    }

    fn schedule(&self, delay: Duration, task: Task) -> TaskId {
        let mut state = self.state.borrow_mut();
        let id = state.next_id;
        state.next_id += 1;
        let due = state.now.saturating_add(delay);
        state.queue.insert((due, id), task);
        trace!(target: "scheduler", "Scheduled task {} due at {:?}", id, due);
        id
    }

    fn cancel(&self, id: TaskId) -> bool {
        let mut state = self.state.borrow_mut();
        let key = state.queue.keys().find(|(_, task_id)| *task_id == id).copied();
        match key {
            Some(key) => {
                state.queue.remove(&key);
                trace!(target: "scheduler", "Cancelled task {}", id);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_tasks_run_when_due() {
        let scheduler = ManualScheduler::new();
        let ran = Rc::new(Cell::new(0));
        let ran_clone = Rc::clone(&ran);
        scheduler.schedule(
            Duration::from_millis(500),
            Box::new(move || ran_clone.set(ran_clone.get() + 1)),
        );

        assert_eq!(scheduler.advance(Duration::from_millis(499)), 0);
        assert_eq!(ran.get(), 0);
        assert_eq!(scheduler.advance(Duration::from_millis(1)), 1);
        assert_eq!(ran.get(), 1);
        assert_eq!(scheduler.now(), Duration::from_millis(500));
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_cancelled_task_never_runs() {
        let scheduler = ManualScheduler::new();
        let ran = Rc::new(Cell::new(false));
        let ran_clone = Rc::clone(&ran);
        let id = scheduler.schedule(Duration::from_secs(1), Box::new(move || ran_clone.set(true)));

        assert!(scheduler.cancel(id));
        assert!(!scheduler.cancel(id));
        scheduler.advance(Duration::from_secs(5));
        assert!(!ran.get());
    }

    #[test]
    fn test_rescheduling_chain_within_window() {
        let scheduler = Rc::new(ManualScheduler::new());
        let ticks = Rc::new(RefCell::new(Vec::new()));

        fn tick(scheduler: Rc<ManualScheduler>, ticks: Rc<RefCell<Vec<Duration>>>) {
            ticks.borrow_mut().push(scheduler.now());
            let next_scheduler = Rc::clone(&scheduler);
            scheduler.schedule(
                Duration::from_secs(1),
                Box::new(move || tick(next_scheduler, ticks)),
            );
        }

        let scheduler_clone = Rc::clone(&scheduler);
        let ticks_clone = Rc::clone(&ticks);
        scheduler.schedule(
            Duration::from_secs(1),
            Box::new(move || tick(scheduler_clone, ticks_clone)),
        );

        assert_eq!(scheduler.advance(Duration::from_millis(3500)), 3);
        assert_eq!(
            *ticks.borrow(),
            vec![
                Duration::from_secs(1),
                Duration::from_secs(2),
                Duration::from_secs(3)
            ]
        );
        assert_eq!(scheduler.pending(), 1);
    }

    #[test]
    fn test_same_deadline_runs_in_schedule_order() {
        let scheduler = ManualScheduler::new();
        let order = Rc::new(RefCell::new(Vec::new()));
        for n in 0..3 {
            let order = Rc::clone(&order);
            scheduler.schedule(Duration::from_millis(10), Box::new(move || order.borrow_mut().push(n)));
        }
        scheduler.advance(Duration::from_millis(10));
        assert_eq!(*order.borrow(), vec![0, 1, 2]);
    }
}
