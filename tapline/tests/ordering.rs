use tapline::{Interceptor, SyncHook, TapOptions};

fn names(hook: &SyncHook<u32>) -> Vec<String> {
    hook.taps().iter().map(|tap| tap.name.clone()).collect()
}

#[test]
fn test_before_hints_order_taps() {
    let mut hook: SyncHook<u32> = SyncHook::new(&["x"]);
    hook.tap("A", |_| Ok(None));
    hook.tap("B", |_| Ok(None));
    hook.tap(TapOptions::new("C").before("B"), |_| Ok(None));
    hook.tap(TapOptions::new("D").before_all(["A", "C"]), |_| Ok(None));

    assert_eq!(names(&hook), ["D", "A", "C", "B"]);
}

#[test]
fn test_stage_hints_order_taps() {
    let mut hook: SyncHook<u32> = SyncHook::new(&["x"]);
    hook.tap(TapOptions::new("a").stage(10), |_| Ok(None));
    hook.tap(TapOptions::new("b").stage(-5), |_| Ok(None));
    hook.tap("c", |_| Ok(None));
    hook.tap(TapOptions::new("d").stage(0), |_| Ok(None));

    assert_eq!(names(&hook), ["b", "c", "d", "a"]);
}

#[test]
fn test_before_with_absent_target_lands_first() {
    let mut hook: SyncHook<u32> = SyncHook::new(&["x"]);
    hook.tap("A", |_| Ok(None));
    hook.tap("B", |_| Ok(None));
    hook.tap(TapOptions::new("C").before("never-registered"), |_| Ok(None));

    assert_eq!(names(&hook), ["C", "A", "B"]);
}

#[test]
fn test_duplicate_before_names_fold() {
    let mut hook: SyncHook<u32> = SyncHook::new(&["x"]);
    hook.tap("A", |_| Ok(None));
    hook.tap(TapOptions::new("B").before_all(["A", "A", "A"]), |_| {
        Ok(None)
    });

    assert_eq!(names(&hook), ["B", "A"]);
}

#[test]
fn test_with_options_defaults_apply_and_user_wins() {
    let mut hook: SyncHook<u32> = SyncHook::new(&["x"]);
    hook.tap("plain", |_| Ok(None));
    {
        let mut staged = hook.with_options(TapOptions::default().stage(50));
        staged.tap("late", |_| Ok(None));
        staged.tap(TapOptions::new("early").stage(-50), |_| Ok(None));
    }

    assert_eq!(names(&hook), ["early", "plain", "late"]);
    assert_eq!(hook.taps()[2].stage, 50);
}

#[test]
fn test_with_options_empty_defaults_are_transparent() {
    let mut direct: SyncHook<u32> = SyncHook::new(&["x"]);
    direct.tap(TapOptions::new("a").stage(3), |_| Ok(None));

    let mut via_facade: SyncHook<u32> = SyncHook::new(&["x"]);
    via_facade
        .with_options(TapOptions::default())
        .tap(TapOptions::new("a").stage(3), |_| Ok(None));

    assert_eq!(names(&direct), names(&via_facade));
    assert_eq!(direct.taps()[0].stage, via_facade.taps()[0].stage);
}

#[test]
fn test_with_options_stacks_merges() {
    let mut hook: SyncHook<u32> = SyncHook::new(&["x"]);
    {
        let mut outer = hook.with_options(TapOptions::default().stage(10));
        let mut inner = outer.with_options(TapOptions::default().stage(20));
        inner.tap("tap", |_| Ok(None));
    }
    // The innermost defaults win.
    assert_eq!(hook.taps()[0].stage, 20);
}

#[test]
fn test_register_interceptors_fold_in_registration_order() {
    let mut hook: SyncHook<u32> = SyncHook::new(&["x"]);
    hook.intercept(
        Interceptor::builder()
            .on_register(|mut tap| {
                tap.extra.insert("first".into(), tap.extra.len().into());
                tap
            })
            .build(),
    );
    hook.intercept(
        Interceptor::builder()
            .on_register(|mut tap| {
                tap.extra.insert("second".into(), tap.extra.len().into());
                tap
            })
            .build(),
    );
    hook.tap("a", |_| Ok(None));

    let tap = &hook.taps()[0];
    // Left fold: "first" saw an empty map, "second" saw one entry.
    assert_eq!(tap.extra["first"], 0);
    assert_eq!(tap.extra["second"], 1);
}

#[test]
fn test_intercept_rewrites_existing_taps_in_place() {
    let mut hook: SyncHook<u32> = SyncHook::new(&["x"]);
    hook.tap("a", |_| Ok(None));
    hook.tap("b", |_| Ok(None));
    hook.intercept(
        Interceptor::builder()
            .on_register(|mut tap| {
                tap.extra.insert("retro".into(), true.into());
                tap
            })
            .build(),
    );

    assert!(hook
        .taps()
        .iter()
        .all(|tap| tap.extra.get("retro") == Some(&true.into())));
}
