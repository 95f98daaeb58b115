use super::*;
mod loom;

#[test]
fn wait_future_is_future() {
    crate::loom::model(|| {
        let event = ManualResetEvent::new();
        crate::util::test::assert_future(event.wait(CallerId::next()));
        crate::util::test::assert_send_sync::<ManualResetEvent>();
    })
}
