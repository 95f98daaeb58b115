use super::*;
use crate::loom::{self, future, sync::Arc, thread};

#[test]
fn signal_releases_waiters() {
    loom::model(|| {
        let event = Arc::new(ManualResetEvent::new());
        let spawn_waiter = |event: &Arc<ManualResetEvent>| {
            let event = event.clone();
            thread::spawn(move || future::block_on(event.wait(CallerId::next())))
        };
        let waiter1 = spawn_waiter(&event);
        let waiter2 = spawn_waiter(&event);

        event.signal();

        waiter1.join().unwrap();
        waiter2.join().unwrap();
        assert_eq!(event.waiters(), 0);
    });
}

#[test]
fn reset_races_signal() {
    loom::model(|| {
        let event = Arc::new(ManualResetEvent::new());
        let wait = event.wait(CallerId::next());
        let waiter = thread::spawn(move || future::block_on(wait));

        let resetter = thread::spawn({
            let event = event.clone();
            move || {
                event.reset();
            }
        });
        event.signal();
        resetter.join().unwrap();

        // whichever order `signal` and `reset` ran in, the waiter that was
        // registered before either of them must have been released.
        waiter.join().unwrap();
        assert_eq!(event.waiters(), 0);
    });
}
