use parking_lot::{Condvar, Mutex};
use std::{
    sync::{Arc, Weak},
    time::{Duration, Instant},
};

/// How an interruptible sleep ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SleepOutcome {
    /// The full duration elapsed
    TimedOut,
    /// The signal was raised before the duration elapsed
    Interrupted,
}

#[derive(Default)]
struct State {
    interrupted: bool,
    children: Vec<Weak<Shared>>,
}

#[derive(Default)]
struct Shared {
    state: Mutex<State>,
    condition: Condvar,
}

impl Shared {
    fn interrupt(&self) {
        let children = {
            let mut state = self.state.lock();
            state.interrupted = true;
            self.condition.notify_all();
            state
                .children
                .iter()
                .filter_map(Weak::upgrade)
                .collect::<Vec<_>>()
        };

        for child in children {
            child.interrupt();
        }
    }
}

/// A cooperative stop flag shared by every worker that sleeps
///
/// Raising the signal wakes all sleepers immediately so shutdown isn't held up by
/// a sleep in progress. Clones share the same flag. A [child](StopSignal::child) can
/// be raised and lowered on its own, and is also raised whenever its parent is.
#[derive(Clone, Default)]
pub struct StopSignal {
    shared: Arc<Shared>,
}

impl StopSignal {
    /// A signal raised along with this one
    ///
    /// The child starts raised if this signal already is.
    pub fn child(&self) -> StopSignal {
        let child = StopSignal::default();

        let mut state = self.shared.state.lock();
        state.children.retain(|existing| existing.strong_count() > 0);
        state.children.push(Arc::downgrade(&child.shared));
        child.shared.state.lock().interrupted = state.interrupted;

        child
    }

    /// Raise the signal and wake every sleeper, including those on child signals
    pub fn interrupt(&self) {
        self.shared.interrupt();
    }

    /// Lower the signal so workers can be started again
    pub fn reset(&self) {
        self.shared.state.lock().interrupted = false;
    }

    /// Whether the signal has been raised
    pub fn is_interrupted(&self) -> bool {
        self.shared.state.lock().interrupted
    }

    /// Sleep for `duration`, returning early if the signal is raised
    pub fn sleep(&self, duration: Duration) -> SleepOutcome {
        let deadline = Instant::now() + duration;
        let mut state = self.shared.state.lock();

        while !state.interrupted {
            if self
                .shared
                .condition
                .wait_until(&mut state, deadline)
                .timed_out()
            {
                break;
            }
        }

        if state.interrupted {
            SleepOutcome::Interrupted
        } else {
            SleepOutcome::TimedOut
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn sleep_times_out_without_a_signal() {
        let signal = StopSignal::default();
        assert_eq!(
            signal.sleep(Duration::from_millis(5)),
            SleepOutcome::TimedOut
        );
    }

    #[test]
    fn raised_signal_interrupts_immediately() {
        let signal = StopSignal::default();
        signal.interrupt();

        let start = Instant::now();
        assert_eq!(
            signal.sleep(Duration::from_secs(10)),
            SleepOutcome::Interrupted
        );
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn interrupt_wakes_a_sleeping_thread() {
        let signal = StopSignal::default();
        let sleeper = {
            let signal = signal.clone();
            thread::spawn(move || signal.sleep(Duration::from_secs(10)))
        };

        thread::sleep(Duration::from_millis(20));
        signal.interrupt();

        assert_eq!(sleeper.join().unwrap(), SleepOutcome::Interrupted);
    }

    #[test]
    fn reset_lowers_the_signal() {
        let signal = StopSignal::default();
        signal.interrupt();
        signal.reset();
        assert!(!signal.is_interrupted());
    }

    #[test]
    fn raising_a_parent_wakes_a_child_sleeper() {
        let parent = StopSignal::default();
        let child = parent.child();
        let sleeper = thread::spawn(move || child.sleep(Duration::from_secs(10)));

        thread::sleep(Duration::from_millis(20));
        let start = Instant::now();
        parent.interrupt();

        assert_eq!(sleeper.join().unwrap(), SleepOutcome::Interrupted);
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn raising_a_child_leaves_the_parent_down() {
        let parent = StopSignal::default();
        let child = parent.child();
        child.interrupt();

        assert!(child.is_interrupted());
        assert!(!parent.is_interrupted());
    }

    #[test]
    fn child_of_a_raised_signal_starts_raised() {
        let parent = StopSignal::default();
        parent.interrupt();
        assert!(parent.child().is_interrupted());
    }
}
