use std::sync::Arc;
use tokio::time::{timeout, Duration};

use devsense::environment::{HeadlessEnvironment, ScriptedEnvironment};
use devsense::{
    classify, CapabilitySignals, ChangeSignal, DetectionSession, DeviceInfo, DeviceSnapshot,
    DeviceType, PrimaryInput,
};

const TIMEOUT_MS: u64 = 200;

fn signals(
    primary_fine: bool,
    primary_hover: bool,
    any_fine: bool,
    any_hover: bool,
    any_coarse: bool,
) -> CapabilitySignals {
    CapabilitySignals {
        primary_fine,
        primary_hover,
        any_fine,
        any_hover,
        any_coarse,
    }
}

fn start(initial: CapabilitySignals, reactive: Option<bool>) -> (Arc<ScriptedEnvironment>, DetectionSession<ScriptedEnvironment>) {
    let env = Arc::new(ScriptedEnvironment::new(initial).with_screen(1366, 768));
    let session = DetectionSession::new(Arc::clone(&env), reactive).expect("start session");
    (env, session)
}

async fn next_published(rx: &mut tokio::sync::watch::Receiver<DeviceInfo>) -> DeviceInfo {
    timeout(Duration::from_millis(TIMEOUT_MS), rx.changed())
        .await
        .expect("no classification published in time")
        .expect("session dropped unexpectedly");
    *rx.borrow_and_update()
}

#[test]
fn touch_only_hardware() {
    let (_, session) = start(signals(true, true, true, false, true), None);
    assert_eq!(session.device_type(), DeviceType::TouchOnly);
    assert_eq!(session.primary_input(), PrimaryInput::Touch);
}

#[test]
fn mouse_only_hardware() {
    let (_, session) = start(signals(false, false, true, true, false), None);
    assert_eq!(session.device_type(), DeviceType::MouseOnly);
    assert_eq!(session.primary_input(), PrimaryInput::Mouse);
}

#[test]
fn hybrid_with_mouse_primary() {
    let (_, session) = start(signals(true, true, true, true, true), None);
    assert_eq!(session.device_type(), DeviceType::Hybrid);
    assert_eq!(session.primary_input(), PrimaryInput::Mouse);
}

#[test]
fn hybrid_with_touch_primary() {
    let (_, session) = start(signals(true, false, true, true, true), None);
    assert_eq!(session.device_type(), DeviceType::Hybrid);
    assert_eq!(session.primary_input(), PrimaryInput::Touch);
}

#[test]
fn non_interactive_context_yields_defaults() {
    let session = DetectionSession::new(Arc::new(HeadlessEnvironment::new()), None).unwrap();
    assert_eq!(
        session.snapshot(),
        DeviceSnapshot {
            device_type: DeviceType::MouseOnly,
            primary_input: PrimaryInput::Mouse,
            max_width: 0,
        }
    );
}

#[test]
fn unavailable_scripted_environment_is_never_queried() {
    let env = Arc::new(ScriptedEnvironment::new(signals(false, false, false, false, true)));
    env.set_available(false);

    let session = DetectionSession::new(Arc::clone(&env), Some(true)).unwrap();

    assert_eq!(env.query_count(), 0);
    assert_eq!(env.listener_count(ChangeSignal::Resize), 0);
    assert_eq!(session.device_info(), DeviceInfo::default());
    assert_eq!(session.max_width(), 0);
}

#[tokio::test]
async fn reactive_session_publishes_resize_reclassification() {
    let (env, session) = start(signals(true, true, true, true, false), Some(true));
    let mut rx = session.watch();

    let rotated = signals(false, false, false, false, true);
    env.set_signals(rotated);
    env.emit(ChangeSignal::Resize).unwrap();

    assert_eq!(next_published(&mut rx).await, classify(rotated));
    assert_eq!(session.updates(), 1);
    assert_eq!(session.max_width(), 1366);
}

#[tokio::test]
async fn signals_from_another_thread_reach_the_session() {
    let (env, session) = start(signals(true, true, true, true, false), Some(true));
    let mut rx = session.watch();

    let emitter = Arc::clone(&env);
    let hybrid = signals(true, true, true, true, true);
    std::thread::spawn(move || {
        emitter.set_signals(hybrid);
        emitter.emit(ChangeSignal::OrientationChange)
    })
    .join()
    .unwrap()
    .unwrap();

    let published = next_published(&mut rx).await;
    assert_eq!(published.device_type, DeviceType::Hybrid);
    assert_eq!(published.primary_input, PrimaryInput::Mouse);
}

#[tokio::test]
async fn concurrent_signals_never_lose_a_reclassification() {
    let (env, session) = start(signals(true, true, true, true, false), Some(true));

    let emitters: Vec<_> = (0..4)
        .map(|_| {
            let env = Arc::clone(&env);
            std::thread::spawn(move || {
                for _ in 0..25 {
                    env.emit(ChangeSignal::Resize).unwrap();
                }
            })
        })
        .collect();
    for emitter in emitters {
        emitter.join().unwrap();
    }

    assert_eq!(session.updates(), 100);
    assert_eq!(session.device_type(), DeviceType::MouseOnly);
}

#[tokio::test]
async fn teardown_silences_later_signals() {
    let (env, mut session) = start(signals(true, true, true, true, false), Some(true));
    let mut rx = session.watch();

    session.teardown();
    env.set_signals(signals(false, false, false, false, true));
    env.emit(ChangeSignal::Resize).unwrap();
    env.emit(ChangeSignal::OrientationChange).unwrap();

    assert!(!rx.has_changed().unwrap());
    assert_eq!(session.updates(), 0);
    assert_eq!(session.device_type(), DeviceType::MouseOnly);
}

#[tokio::test]
async fn receivers_observe_session_end() {
    let (env, session) = start(signals(true, true, true, true, false), Some(true));
    let mut rx = session.watch();

    drop(session);

    let closed = timeout(Duration::from_millis(TIMEOUT_MS), rx.changed())
        .await
        .expect("receiver did not observe the session ending");
    assert!(closed.is_err());
    assert_eq!(env.listener_count(ChangeSignal::Resize), 0);
    assert_eq!(env.listener_count(ChangeSignal::OrientationChange), 0);
}
