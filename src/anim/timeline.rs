//! Cancellable one-shot and repeating tasks on a scene-local clock.

/// Handle for a scheduled task; pass it to [`Timeline::cancel`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TaskId(u64);

/// An event that came due during [`Timeline::advance`].
#[derive(Clone, Debug, PartialEq)]
pub struct Fired<E> {
    pub event: E,
    /// Seconds between the deadline and the end of the advance.
    pub late: f32,
}

#[derive(Debug)]
struct Task<E> {
    id: TaskId,
    due: f64,
    period: Option<f64>,
    event: E,
}

/// A clock that fires events at scheduled times.
///
/// Time only moves when the owner calls [`advance`](Timeline::advance), so a scene
/// that is no longer updated cannot fire anything. Cancelled tasks are removed
/// immediately and never fire afterwards.
#[derive(Debug)]
pub struct Timeline<E> {
    now: f64,
    tasks: Vec<Task<E>>,
    next_id: u64,
}

impl<E> Default for Timeline<E> {
    fn default() -> Self {
        Self {
            now: 0.0,
            tasks: Vec::new(),
            next_id: 0,
        }
    }
}

impl<E: Clone> Timeline<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire `event` once, `delay` seconds from now.
    pub fn after(&mut self, delay: f32, event: E) -> TaskId {
        self.schedule(f64::from(delay.max(0.0)), None, event)
    }

    /// Fire `event` every `period` seconds, first time one period from now.
    pub fn every(&mut self, period: f32, event: E) -> TaskId {
        debug_assert!(period > 0.0, "repeating task needs a positive period");
        let period = f64::from(period).max(1e-3);
        self.schedule(period, Some(period), event)
    }

    fn schedule(&mut self, delay: f64, period: Option<f64>, event: E) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.tasks.push(Task {
            id,
            due: self.now + delay,
            period,
            event,
        });
        id
    }

    /// Remove a task. Returns false if it already fired (one-shot) or was unknown.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.id != id);
        self.tasks.len() != before
    }

    /// Drop every pending task.
    pub fn clear(&mut self) {
        self.tasks.clear();
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Advance the clock by `dt` seconds and return every event that came due,
    /// in deadline order (ties broken by scheduling order). A repeating task
    /// fires once per elapsed period.
    pub fn advance(&mut self, dt: f32) -> Vec<Fired<E>> {
        let target = self.now + f64::from(dt.max(0.0));
        let mut fired = Vec::new();

        loop {
            let next = self
                .tasks
                .iter()
                .enumerate()
                .filter(|(_, task)| task.due <= target)
                .min_by(|(_, a), (_, b)| a.due.total_cmp(&b.due).then(a.id.0.cmp(&b.id.0)))
                .map(|(index, _)| index);

            let Some(index) = next else {
                break;
            };

            let task = &mut self.tasks[index];
            self.now = self.now.max(task.due);
            fired.push(Fired {
                event: task.event.clone(),
                late: (target - task.due) as f32,
            });
            match task.period {
                Some(period) => task.due += period,
                None => {
                    self.tasks.swap_remove(index);
                }
            }
        }

        self.now = target;
        fired
    }
}
