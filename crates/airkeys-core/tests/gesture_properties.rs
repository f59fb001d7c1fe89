//! Integration tests for the airkeys-core gesture pipeline.
//!
//! These tests drive the public API the way the interaction loop does:
//! generate buttons from the registry, evaluate hands with the detectors,
//! and apply accepted clicks to the keyboard state.

use std::time::{Duration, Instant};

use airkeys_core::{
    ButtonSet, HandObservation, KeyAction, KeyboardState, LayoutId, LayoutRegistry,
    PinchClickDetector, Point, TwoHandDetector,
};

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

/// Centre of the first button with `label`.
fn centre_of(buttons: &ButtonSet, label: &str) -> Point {
    let b = buttons
        .iter()
        .find(|b| b.label == label)
        .unwrap_or_else(|| panic!("no key labelled {label}"));
    Point::new(b.rect.x + b.rect.width / 2.0, b.rect.y + b.rect.height / 2.0)
}

/// A hand pointing at `tip` with index and middle tips `gap` pixels apart.
fn pointing(tip: Point, gap: f32) -> HandObservation {
    HandObservation::synthetic(
        Point::new(tip.x, tip.y + 350.0),
        tip,
        Point::new(tip.x + gap, tip.y),
    )
}

fn wrists_apart(distance: f32) -> Vec<HandObservation> {
    let left = Point::new(500.0, 650.0);
    let right = Point::new(500.0 + distance, 650.0);
    vec![
        HandObservation::synthetic(left, Point::new(left.x, 300.0), Point::new(left.x + 50.0, 300.0)),
        HandObservation::synthetic(right, Point::new(right.x, 300.0), Point::new(right.x + 50.0, 300.0)),
    ]
}

/// Evaluates one pinch and applies the click, if any.  Returns the injected text.
fn pinch_and_apply(
    detector: &mut PinchClickDetector,
    state: &mut KeyboardState,
    buttons: &ButtonSet,
    hand: &HandObservation,
    now: Instant,
) -> Option<String> {
    let click = detector.evaluate(hand, buttons, now).click?;
    state.apply(&click.action).injection().map(str::to_string)
}

// ── Debounce property ─────────────────────────────────────────────────────────

#[test]
fn test_two_pinches_inside_click_delay_accept_exactly_one() {
    let registry = LayoutRegistry::default();
    let buttons = registry.generate(&LayoutId::new("qwerty")).unwrap();
    let t0 = Instant::now();

    for gap_ms in [0, 1, 50, 150, 299] {
        for (first, second) in [("Q", "Q"), ("Q", "W"), ("A", "L")] {
            let mut detector = PinchClickDetector::default();
            let a = detector.evaluate(&pointing(centre_of(&buttons, first), 10.0), &buttons, t0);
            let b = detector.evaluate(
                &pointing(centre_of(&buttons, second), 10.0),
                &buttons,
                t0 + ms(gap_ms),
            );
            let accepted = [a, b].iter().filter(|r| r.click.is_some()).count();
            assert_eq!(accepted, 1, "{first}->{second} {gap_ms}ms apart");
        }
    }
}

// ── Cooldown property ─────────────────────────────────────────────────────────

#[test]
fn test_two_switches_inside_cooldown_accept_exactly_one() {
    let t0 = Instant::now();
    for gap_ms in [0, 10, 500, 1999, 2000] {
        let mut detector = TwoHandDetector::default();
        let a = detector.evaluate(&wrists_apart(60.0), t0).unwrap();
        let b = detector.evaluate(&wrists_apart(60.0), t0 + ms(gap_ms)).unwrap();
        let accepted = [a, b].iter().filter(|r| r.switch.is_some()).count();
        assert_eq!(accepted, 1, "switches {gap_ms}ms apart");
    }
}

// ── Layout cycle closure ──────────────────────────────────────────────────────

#[test]
fn test_cycling_registry_length_times_returns_to_start() {
    let registry = LayoutRegistry::default();
    let n = registry.len();

    for start in registry.layouts() {
        for k in 1..=3 {
            let mut current = start.clone();
            for _ in 0..(n * k) {
                current = registry.cycle(&current).unwrap().clone();
            }
            assert_eq!(&current, start, "{k} full cycles from {start}");
        }
    }
}

// ── Case-fold idempotence ─────────────────────────────────────────────────────

#[test]
fn test_same_label_twice_appends_identical_folded_text() {
    for caps in [false, true] {
        let mut state = KeyboardState::new(LayoutId::new("qwerty"));
        if caps {
            state.apply(&KeyAction::CapsLock);
        }
        let action = KeyAction::Text("G".to_string());

        let first = state.apply(&action);
        let second = state.apply(&action);

        assert_eq!(first, second);
        let expected = if caps { "GG" } else { "gg" };
        assert_eq!(state.text(), expected);
    }
}

// ── Scenarios ─────────────────────────────────────────────────────────────────

#[test]
fn test_scenario_a_plain_q_is_typed_and_injected() {
    let registry = LayoutRegistry::default();
    let buttons = registry.generate(&LayoutId::new("qwerty")).unwrap();
    let mut detector = PinchClickDetector::default();
    let mut state = KeyboardState::new(LayoutId::new("qwerty"));

    let injected = pinch_and_apply(
        &mut detector,
        &mut state,
        &buttons,
        &pointing(centre_of(&buttons, "Q"), 12.0),
        Instant::now(),
    );

    assert_eq!(state.text(), "q");
    assert_eq!(injected.as_deref(), Some("q"));
}

#[test]
fn test_scenario_b_caps_lock_uppercases_a() {
    let mut state = KeyboardState::new(LayoutId::new("qwerty"));
    state.apply(&KeyAction::CapsLock);

    state.apply(&KeyAction::Text("a".to_string()));

    assert_eq!(state.text(), "A");
}

#[test]
fn test_scenario_c_double_backspace_on_empty_buffer() {
    let registry = LayoutRegistry::default();
    let buttons = registry.generate(&LayoutId::new("qwerty")).unwrap();
    let mut detector = PinchClickDetector::default();
    let mut state = KeyboardState::new(LayoutId::new("qwerty"));
    let hand = pointing(centre_of(&buttons, "⌫"), 5.0);
    let t0 = Instant::now();

    pinch_and_apply(&mut detector, &mut state, &buttons, &hand, t0);
    pinch_and_apply(&mut detector, &mut state, &buttons, &hand, t0 + ms(400));

    assert_eq!(state.text(), "");
}

#[test]
fn test_scenario_d_close_wrists_advance_layout_by_one() {
    let registry = LayoutRegistry::default();
    let mut detector = TwoHandDetector::default();
    let mut state = KeyboardState::new(LayoutId::new("qwerty"));

    let reading = detector.evaluate(&wrists_apart(80.0), Instant::now()).unwrap();
    if reading.switch.is_some() {
        let next = registry.cycle(state.active_layout()).unwrap().clone();
        state.set_active_layout(next);
    }

    assert_eq!(state.active_layout().as_str(), "numeric");
}

#[test]
fn test_scenario_e_repeat_pinch_inside_delay_is_rejected() {
    let registry = LayoutRegistry::default();
    let buttons = registry.generate(&LayoutId::new("qwerty")).unwrap();
    let mut detector = PinchClickDetector::default();
    let mut state = KeyboardState::new(LayoutId::new("qwerty"));
    let hand = pointing(centre_of(&buttons, "E"), 25.0);
    let t0 = Instant::now();

    let first = pinch_and_apply(&mut detector, &mut state, &buttons, &hand, t0);
    let after_first = state.text().to_string();
    let second = pinch_and_apply(&mut detector, &mut state, &buttons, &hand, t0 + ms(100));

    assert_eq!(first.as_deref(), Some("e"));
    assert!(second.is_none());
    assert_eq!(state.text(), after_first);
}

// ── Pinch and switch in the same frame ────────────────────────────────────────

#[test]
fn test_pinch_and_layout_switch_can_fire_in_same_frame() {
    let registry = LayoutRegistry::default();
    let buttons = registry.generate(&LayoutId::new("numeric")).unwrap();
    let mut pinch = PinchClickDetector::default();
    let mut two_hand = TwoHandDetector::default();
    let now = Instant::now();

    // Both hands hover "5" on the numeric pad with wrists 20px apart.
    let tip = centre_of(&buttons, "5");
    let hands = vec![
        HandObservation::synthetic(Point::new(180.0, 600.0), tip, Point::new(tip.x + 5.0, tip.y)),
        HandObservation::synthetic(Point::new(200.0, 600.0), tip, Point::new(tip.x + 5.0, tip.y)),
    ];

    let click = pinch.evaluate(&hands[0], &buttons, now).click;
    let switch = two_hand.evaluate(&hands, now).and_then(|r| r.switch);

    assert!(click.is_some());
    assert!(switch.is_some());
}
