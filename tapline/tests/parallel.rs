use std::time::Duration;
use tapline::{
    testing::{Counter, Recorder},
    AsyncParallelBailHook, AsyncParallelHook, HookError,
};
use tokio::time::sleep;

#[tokio::test]
async fn test_parallel_waits_for_every_tap() {
    let mut hook: AsyncParallelHook<u32> = AsyncParallelHook::new(&["x"]);
    let recorder = Recorder::new();

    for (name, delay) in [("slow", 30u64), ("medium", 20), ("fast", 5)] {
        let recorder = recorder.clone();
        hook.tap_async(name, move |_| {
            let recorder = recorder.clone();
            Box::pin(async move {
                sleep(Duration::from_millis(delay)).await;
                recorder.note(name);
                Ok(None)
            })
        });
    }

    hook.call_async(&1).await.unwrap();

    let mut entries = recorder.entries();
    entries.sort();
    assert_eq!(entries, ["fast", "medium", "slow"]);
}

#[tokio::test]
async fn test_parallel_reports_first_error_exactly_once() {
    // One tap fails immediately while its siblings are still pending; the
    // outer completion fires once, with the failure, and the siblings'
    // successful completions are never observed.
    let mut hook: AsyncParallelHook<u32> = AsyncParallelHook::new(&["x"]);
    let recorder = Recorder::new();

    let first = recorder.clone();
    hook.tap_async("pending-0", move |_| {
        let recorder = first.clone();
        Box::pin(async move {
            sleep(Duration::from_millis(50)).await;
            recorder.note("done-0");
            Ok(None)
        })
    });
    hook.tap_async("failing", |_| {
        Box::pin(async { Err("broken pipe".into()) })
    });
    let third = recorder.clone();
    hook.tap_async("pending-2", move |_| {
        let recorder = third.clone();
        Box::pin(async move {
            sleep(Duration::from_millis(50)).await;
            recorder.note("done-2");
            Ok(None)
        })
    });

    let completions = Counter::new();
    let seen = completions.clone();
    hook.call_with(&1, move |outcome| {
        assert!(matches!(outcome, Err(HookError::Tap { .. })));
        seen.bump();
    })
    .await;

    assert_eq!(completions.count(), 1);
    assert!(recorder.is_empty());
}

#[tokio::test]
async fn test_parallel_bail_resolves_in_tap_order() {
    // The second tap finishes first with a defined result, but the win is
    // decided in tap order: the first tap's "nothing" has to arrive before
    // the second tap's result is accepted.
    let mut hook: AsyncParallelBailHook<u32, u32> = AsyncParallelBailHook::new(&["x"]);
    let recorder = Recorder::new();

    let first = recorder.clone();
    hook.tap_async("slow-nothing", move |_| {
        let recorder = first.clone();
        Box::pin(async move {
            sleep(Duration::from_millis(20)).await;
            recorder.note("slow-nothing");
            Ok(None)
        })
    });
    hook.tap_async("fast-result", |_| Box::pin(async { Ok(Some(7)) }));

    assert_eq!(hook.call_async(&1).await.unwrap(), Some(7));
    // The earlier slot really was awaited.
    assert_eq!(recorder.entries(), ["slow-nothing"]);
}

#[tokio::test]
async fn test_parallel_bail_error_in_earlier_slot_wins() {
    let mut hook: AsyncParallelBailHook<u32, u32> = AsyncParallelBailHook::new(&["x"]);
    hook.tap_async("failing", |_| Box::pin(async { Err("early loss".into()) }));
    hook.tap_async("winning-later", |_| {
        Box::pin(async {
            sleep(Duration::from_millis(10)).await;
            Ok(Some(1))
        })
    });

    let err = hook.call_async(&1).await.unwrap_err();
    assert!(matches!(err, HookError::Tap { .. }));
}

#[tokio::test]
async fn test_parallel_bail_all_quiet_resolves_none() {
    let mut hook: AsyncParallelBailHook<u32, u32> = AsyncParallelBailHook::new(&["x"]);
    hook.tap_async("a", |_| Box::pin(async { Ok(None) }));
    hook.tap_callback("b", |_, done| done.ok());
    hook.tap("c", |_| Ok(None));

    assert_eq!(hook.call_async(&1).await.unwrap(), None);
}

#[tokio::test]
async fn test_parallel_single_tap_degrades_to_series() {
    let mut hook: AsyncParallelHook<u32> = AsyncParallelHook::new(&["x"]);
    let ran = Counter::new();
    let counter = ran.clone();
    hook.tap("only", move |_| {
        counter.bump();
        Ok(None)
    });

    hook.call_async(&1).await.unwrap();
    assert_eq!(ran.count(), 1);
}

#[tokio::test]
async fn test_parallel_with_zero_taps_completes() {
    let hook: AsyncParallelHook<u32> = AsyncParallelHook::new(&["x"]);
    assert!(hook.call_async(&1).await.is_ok());
}
