//! Call-rate limiters for high-frequency events.

use std::cell::Cell;
use std::rc::Rc;

use lumen_window::{TimerId, Window};

/// Trailing-edge debounce
///
/// Every call cancels the pending one and schedules `f` `wait_ms` later
/// with its own argument, so only the last call of a burst runs.
pub fn debounce<A: 'static>(
    wait_ms: u64,
    f: impl Fn(&mut Window, A) + 'static,
) -> impl Fn(&mut Window, A) + 'static {
    let f = Rc::new(f);
    let pending: Rc<Cell<Option<TimerId>>> = Rc::default();

    move |window: &mut Window, arg: A| {
        if let Some(id) = pending.take() {
            window.clear_timeout(id);
        }
        let f = Rc::clone(&f);
        let slot = Rc::clone(&pending);
        let id = window.set_timeout(wait_ms, move |w| {
            slot.set(None);
            f(w, arg);
        });
        pending.set(Some(id));
    }
}

/// Leading-edge throttle
///
/// The first call runs immediately; calls during the following
/// `limit_ms` are dropped.
pub fn throttle<A: 'static>(
    limit_ms: u64,
    f: impl Fn(&mut Window, A) + 'static,
) -> impl Fn(&mut Window, A) + 'static {
    let cooling = Rc::new(Cell::new(false));

    move |window: &mut Window, arg: A| {
        if cooling.get() {
            return;
        }
        cooling.set(true);
        f(window, arg);
        let flag = Rc::clone(&cooling);
        window.set_timeout(limit_ms, move |_| flag.set(false));
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use lumen_dom::Document;
    use lumen_window::Viewport;

    use super::*;

    fn window() -> Window {
        Window::new(Document::default(), Viewport::default())
    }

    fn recorder() -> (Rc<RefCell<Vec<(u64, u32)>>>, impl Fn(&mut Window, u32) + 'static) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        (log, move |w: &mut Window, arg: u32| sink.borrow_mut().push((w.now(), arg)))
    }

    #[test]
    fn test_debounce_runs_last_call_only() {
        let mut window = window();
        let (log, f) = recorder();
        let debounced = debounce(10, f);

        debounced(&mut window, 0);
        window.advance(5);
        debounced(&mut window, 5);
        window.advance(3);
        debounced(&mut window, 8);
        window.advance(100);

        assert_eq!(*log.borrow(), vec![(18, 8)]);
        assert_eq!(window.pending_timers(), 0);
    }

    #[test]
    fn test_debounce_separate_bursts() {
        let mut window = window();
        let (log, f) = recorder();
        let debounced = debounce(10, f);

        debounced(&mut window, 1);
        window.advance(20);
        debounced(&mut window, 2);
        window.advance(20);

        assert_eq!(*log.borrow(), vec![(10, 1), (30, 2)]);
    }

    #[test]
    fn test_throttle_drops_calls_in_cooldown() {
        let mut window = window();
        let (log, f) = recorder();
        let throttled = throttle(50, f);

        throttled(&mut window, 0);
        window.advance(10);
        throttled(&mut window, 10);
        window.advance(10);
        throttled(&mut window, 20);
        window.advance(100);

        assert_eq!(*log.borrow(), vec![(0, 0)]);

        throttled(&mut window, 120);
        assert_eq!(log.borrow().len(), 2);
    }
}
