mod support;

use ai_action::{
    Action, ActionResult, Behavior, BehaviorStatus, EventResult, Priority, Subscriptions,
};
use ai_core::events::{Injured, Killed, Sight, Stuck};
use ai_core::Event;
use ai_tools::{DebugFlags, Diagnostics, Severity};
use support::{lenient, step, top, Bot, RcSink, Scripted};

fn injured() -> Injured {
    Injured {
        attacker: Some(2),
        damage: 10.0,
    }
}

fn sight() -> Sight {
    Sight { subject: 2 }
}

/// `Idle` suspended under `Chase`, both started, log cleared.
fn idle_under_chase(idle: Scripted, chase: Scripted) -> (Behavior<Bot>, Bot) {
    let mut bot = Bot::new(1);
    let idle = idle.then(ActionResult::suspend_for(chase, "Enemy spotted"));
    let mut behavior = Behavior::new(idle.boxed());

    step(&mut behavior, &mut bot, 0);
    step(&mut behavior, &mut bot, 1);
    assert_eq!(top(&behavior), Some("Chase"));
    bot.take_log();

    (behavior, bot)
}

#[test]
fn event_results_are_applied_on_the_next_update() {
    let mut bot = Bot::new(1);
    let idle = Scripted::new("Idle").reacting(
        "Stuck",
        EventResult::try_change_to(Scripted::new("Unstick"), Priority::Try, "Stuck"),
    );
    let mut behavior = Behavior::new(idle.boxed());
    step(&mut behavior, &mut bot, 0);
    bot.take_log();

    behavior.on_event(&mut bot, &Stuck);
    assert_eq!(top(&behavior), Some("Idle"));
    assert!(behavior
        .stack()
        .get(behavior.root().expect("root"))
        .is_some_and(|n| n.pending().is_change_to()));

    step(&mut behavior, &mut bot, 1);
    assert_eq!(
        bot.take_log(),
        vec!["Idle:event:Stuck", "Idle:end(Unstick)", "Unstick:start(Idle)"]
    );
    assert_eq!(top(&behavior), Some("Unstick"));
}

#[test]
fn events_before_the_first_update_are_ignored() {
    let mut bot = Bot::new(1);
    let idle = Scripted::new("Idle").reacting(
        "Killed",
        EventResult::try_done(Priority::Critical, "Dead"),
    );
    let mut behavior = Behavior::new(idle.boxed());

    behavior.on_event(&mut bot, &Killed);
    step(&mut behavior, &mut bot, 0);

    assert_eq!(bot.take_log(), vec!["Idle:start(none)"]);
    assert_eq!(step(&mut behavior, &mut bot, 1), BehaviorStatus::Running);
}

#[test]
fn first_responder_in_stack_order_wins() {
    let chase = Scripted::new("Chase").reacting(
        "Stuck",
        EventResult::try_change_to(Scripted::new("Unstick"), Priority::Try, "Stuck"),
    );
    let idle = Scripted::new("Idle").reacting(
        "Stuck",
        EventResult::try_done(Priority::Critical, "Give up"),
    );
    let (mut behavior, mut bot) = idle_under_chase(idle, chase);

    behavior.on_event(&mut bot, &Stuck);
    assert_eq!(bot.take_log(), vec!["Chase:event:Stuck"]);

    step(&mut behavior, &mut bot, 2);
    assert_eq!(
        bot.take_log(),
        vec!["Chase:end(Unstick)", "Unstick:start(Chase)"]
    );
    assert_eq!(
        behavior.debug_lines(),
        vec!["Actions:", "- Unstick ( << Idle )"]
    );
}

#[test]
fn unhandled_events_fall_through_to_buried_actions() {
    let idle = Scripted::new("Idle").reacting(
        "Sight",
        EventResult::try_sustain(Priority::Try, "Watching"),
    );
    let (mut behavior, mut bot) = idle_under_chase(idle, Scripted::new("Chase"));

    behavior.on_event(&mut bot, &sight());

    assert_eq!(bot.take_log(), vec!["Chase:event:Sight", "Idle:event:Sight"]);
    let idle_id = behavior.stack().find("Idle").expect("idle");
    assert!(behavior
        .stack()
        .get(idle_id)
        .is_some_and(|n| n.pending().is_sustain()));
}

#[test]
fn higher_priority_result_survives_regardless_of_order() {
    for important_first in [true, false] {
        let mut bot = Bot::new(1);
        let idle = Scripted::new("Idle")
            .reacting(
                "Stuck",
                EventResult::try_change_to(Scripted::new("Unstick"), Priority::Try, "Stuck"),
            )
            .reacting(
                "Injured",
                EventResult::try_change_to(Scripted::new("Flee"), Priority::Important, "Hurt"),
            );
        let mut behavior = Behavior::new(idle.boxed());
        step(&mut behavior, &mut bot, 0);

        if important_first {
            behavior.on_event(&mut bot, &injured());
            behavior.on_event(&mut bot, &Stuck);
        } else {
            behavior.on_event(&mut bot, &Stuck);
            behavior.on_event(&mut bot, &injured());
        }
        step(&mut behavior, &mut bot, 1);

        assert_eq!(top(&behavior), Some("Flee"), "important_first={important_first}");
    }
}

#[test]
fn stored_result_has_the_maximum_priority_for_every_arrival_order() {
    let orders = [
        [Priority::Try, Priority::Important, Priority::Critical],
        [Priority::Try, Priority::Critical, Priority::Important],
        [Priority::Important, Priority::Try, Priority::Critical],
        [Priority::Important, Priority::Critical, Priority::Try],
        [Priority::Critical, Priority::Try, Priority::Important],
        [Priority::Critical, Priority::Important, Priority::Try],
    ];

    for order in orders {
        let mut bot = Bot::new(1);
        let mut behavior = Behavior::new(Scripted::new("Idle").boxed());
        step(&mut behavior, &mut bot, 0);
        let root = behavior.root().expect("root");

        for priority in order {
            behavior.stack_mut().store_pending_event_result(
                root,
                EventResult::try_done(priority, format!("{priority:?}")),
                "Test",
            );
        }

        let pending = behavior.stack().get(root).map(|n| n.pending()).expect("root");
        assert_eq!(pending.priority, Priority::Critical, "{order:?}");
        assert_eq!(pending.reason, "Critical", "{order:?}");
    }
}

#[test]
fn equal_priority_results_keep_the_latest() {
    let mut bot = Bot::new(1);
    let idle = Scripted::new("Idle")
        .reacting(
            "Stuck",
            EventResult::try_change_to(Scripted::new("Unstick"), Priority::Important, "Stuck"),
        )
        .reacting(
            "Injured",
            EventResult::try_change_to(Scripted::new("Flee"), Priority::Important, "Hurt"),
        );
    let mut behavior = Behavior::new(idle.boxed());
    step(&mut behavior, &mut bot, 0);

    behavior.on_event(&mut bot, &Stuck);
    behavior.on_event(&mut bot, &injured());
    step(&mut behavior, &mut bot, 1);

    assert_eq!(top(&behavior), Some("Flee"));
}

#[test]
fn sustain_blocks_lower_priority_changes_without_transitioning() {
    let mut bot = Bot::new(1);
    let idle = Scripted::new("Idle")
        .reacting(
            "Sight",
            EventResult::try_sustain(Priority::Important, "Keep watching"),
        )
        .reacting(
            "Stuck",
            EventResult::try_change_to(Scripted::new("Unstick"), Priority::Try, "Stuck"),
        );
    let mut behavior = Behavior::new(idle.boxed());
    step(&mut behavior, &mut bot, 0);
    bot.take_log();

    behavior.on_event(&mut bot, &sight());
    behavior.on_event(&mut bot, &Stuck);
    step(&mut behavior, &mut bot, 1);

    assert_eq!(top(&behavior), Some("Idle"));
    assert_eq!(
        bot.take_log(),
        vec!["Idle:event:Sight", "Idle:event:Stuck", "Idle:update"]
    );
}

#[test]
fn sustain_survives_the_action_suspending_itself() {
    let mut bot = Bot::new(1);
    let idle = Scripted::new("Idle")
        .reacting(
            "Sight",
            EventResult::try_sustain(Priority::Important, "Keep watching"),
        )
        .reacting(
            "Stuck",
            EventResult::try_change_to(Scripted::new("Unstick"), Priority::Try, "Stuck"),
        )
        .then(ActionResult::suspend_for(Scripted::new("Chase"), "Enemy spotted"));
    let mut behavior = Behavior::new(idle.boxed());
    step(&mut behavior, &mut bot, 0);
    behavior.on_event(&mut bot, &sight());
    step(&mut behavior, &mut bot, 1);
    assert_eq!(top(&behavior), Some("Chase"));

    let idle_id = behavior.stack().find("Idle").expect("idle");
    assert!(behavior
        .stack()
        .get(idle_id)
        .is_some_and(|n| n.is_suspended() && n.pending().is_sustain()));

    // The sustained priority still turns away a weaker change.
    behavior.on_event(&mut bot, &Stuck);
    bot.take_log();
    step(&mut behavior, &mut bot, 2);

    assert_eq!(bot.take_log(), vec!["Chase:update"]);
    assert_eq!(top(&behavior), Some("Chase"));
}

#[test]
fn pending_change_blocks_resume_and_unwinds_the_cover() {
    let idle = Scripted::new("Idle").reacting(
        "Stuck",
        EventResult::try_change_to(Scripted::new("Unstick"), Priority::Try, "Stuck"),
    );
    let (mut behavior, mut bot) = idle_under_chase(idle, Scripted::new("Chase"));

    behavior.on_event(&mut bot, &Stuck);
    bot.take_log();

    // Chase is out of scope: it finishes without updating, and Idle does not resume.
    step(&mut behavior, &mut bot, 2);
    assert_eq!(bot.take_log(), vec!["Chase:end(Idle)"]);
    assert_eq!(top(&behavior), Some("Idle"));

    step(&mut behavior, &mut bot, 3);
    assert_eq!(
        bot.take_log(),
        vec!["Idle:end(Unstick)", "Unstick:start(Idle)"]
    );
    assert_eq!(behavior.stack().len(), 1);
    assert!(behavior.stack().validate().is_ok());
}

#[test]
fn out_of_scope_stack_unwinds_one_level_per_tick() {
    let mut bot = Bot::new(1);
    let b = Scripted::new("B").then(ActionResult::suspend_for(Scripted::new("C"), "Deeper"));
    let a = Scripted::new("A")
        .then(ActionResult::suspend_for(b, "Deeper"))
        .reacting("Killed", EventResult::try_done(Priority::Critical, "Dead"));
    let mut behavior = Behavior::new(a.boxed());

    for tick in 0..3 {
        step(&mut behavior, &mut bot, tick);
    }
    assert_eq!(
        behavior.debug_lines(),
        vec!["Actions:", "- C ( << B << A )"]
    );
    bot.take_log();

    behavior.on_event(&mut bot, &Killed);
    assert_eq!(
        bot.take_log(),
        vec!["C:event:Killed", "B:event:Killed", "A:event:Killed"]
    );

    step(&mut behavior, &mut bot, 3);
    assert_eq!(top(&behavior), Some("B"));
    assert_eq!(bot.take_log(), vec!["C:end(B)", "B:resume(C)"]);

    step(&mut behavior, &mut bot, 4);
    assert_eq!(top(&behavior), Some("A"));
    assert_eq!(bot.take_log(), vec!["B:end(A)"]);

    assert_eq!(step(&mut behavior, &mut bot, 5), BehaviorStatus::Complete);
    assert_eq!(bot.take_log(), vec!["A:end(none)"]);
}

#[test]
fn buried_suspend_request_pushes_onto_the_top() {
    let idle = Scripted::new("Idle").reacting(
        "Injured",
        EventResult::try_suspend_for(Scripted::new("Flinch"), Priority::Important, "Ouch"),
    );
    let (mut behavior, mut bot) = idle_under_chase(idle, Scripted::new("Chase"));

    behavior.on_event(&mut bot, &injured());
    bot.take_log();
    step(&mut behavior, &mut bot, 2);

    assert_eq!(
        bot.take_log(),
        vec!["Chase:suspend(Flinch)", "Flinch:start(Chase)"]
    );
    assert_eq!(
        behavior.debug_lines(),
        vec!["Actions:", "- Flinch ( << Chase << Idle )"]
    );
    assert!(behavior.stack().validate().is_ok());
}

#[test]
fn colliding_critical_results_are_reported() {
    support::init_tracing();
    let mut bot = Bot::new(1);
    let sink = RcSink::default();
    let events = sink.0.clone();
    let idle = Scripted::new("Idle")
        .reacting("Killed", EventResult::try_done(Priority::Critical, "Dead"))
        .reacting(
            "Injured",
            EventResult::try_change_to(Scripted::new("Flee"), Priority::Critical, "Hurt"),
        );
    let mut behavior = Behavior::with_diagnostics(
        idle.boxed(),
        lenient(),
        Diagnostics::new(DebugFlags::EVENTS).with_sink(Box::new(sink)),
    );
    step(&mut behavior, &mut bot, 0);

    behavior.on_event(&mut bot, &Killed);
    behavior.on_event(&mut bot, &injured());

    let warnings: Vec<String> = events
        .borrow()
        .iter()
        .filter(|e| e.severity == Severity::Warning)
        .map(|e| e.message.to_string())
        .collect();
    assert_eq!(warnings, vec!["Idle Injured - critical events collision!"]);

    // The later critical result still replaces the earlier one.
    step(&mut behavior, &mut bot, 1);
    assert_eq!(top(&behavior), Some("Flee"));
}

#[derive(Debug)]
struct Noise {
    loudness: f32,
}

impl Event for Noise {}

/// Ignores quiet noises and goes to look at loud ones.
struct Listen;

impl Listen {
    fn on_noise(&mut self, me: &mut Bot, noise: &Noise) -> EventResult<Bot> {
        me.log.push(format!("Listen:noise({})", noise.loudness));
        if noise.loudness < 0.5 {
            return EventResult::try_continue();
        }
        EventResult::try_change_to(Scripted::new("Investigate"), Priority::Try, "Heard something")
    }
}

impl Action<Bot> for Listen {
    fn subscribe(&self, subscriptions: &mut Subscriptions<Bot>) {
        subscriptions.on_event::<Self, Noise>(Self::on_noise);
    }
}

#[test]
fn subscribed_custom_events_reach_their_handler() {
    let mut bot = Bot::new(1);
    let mut behavior = Behavior::new(Box::new(Listen));
    step(&mut behavior, &mut bot, 0);

    behavior.on_event(&mut bot, &Noise { loudness: 0.1 });
    step(&mut behavior, &mut bot, 1);
    assert_eq!(top(&behavior), Some("Listen"));

    behavior.on_event(&mut bot, &Noise { loudness: 0.9 });
    step(&mut behavior, &mut bot, 2);
    assert_eq!(top(&behavior), Some("Investigate"));

    assert_eq!(
        bot.take_log(),
        vec![
            "Listen:noise(0.1)",
            "Listen:noise(0.9)",
            "Investigate:start(Listen)",
        ]
    );
}

#[test]
fn subscriptions_know_what_they_handle() {
    let mut subscriptions = Subscriptions::<Bot>::with_builtin_events();
    assert!(subscriptions.handles_event::<Stuck>());
    assert!(!subscriptions.handles_event::<Noise>());

    Listen.subscribe(&mut subscriptions);
    assert!(subscriptions.handles_event::<Noise>());
}
