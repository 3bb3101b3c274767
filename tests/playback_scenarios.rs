use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use algoscope::prelude::*;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Seen {
    Render(usize),
    Narrate(usize, TimingMode),
}

type Log = Rc<RefCell<Vec<Seen>>>;

fn trace(algorithm: Algorithm, values: &[i64], target: Option<i64>) -> Trace {
    let mut input = TraceInput::new(values.to_vec());
    if let Some(target) = target {
        input = input.with_target(target);
    }
    algorithm.generate(&input, &TraceOptions::default()).unwrap()
}

fn observed(trace: Trace) -> (PlaybackController, Log) {
    let log: Log = Rc::new(RefCell::new(Vec::new()));
    let mut controller = PlaybackController::new();

    let sink = Rc::clone(&log);
    controller.set_renderer(move |_: &Step, index: usize| sink.borrow_mut().push(Seen::Render(index)));
    let sink = Rc::clone(&log);
    controller.subscribe_fn(move |event: &NarrationEvent| {
        sink.borrow_mut().push(Seen::Narrate(event.step_index, event.timing_mode));
        Ok(())
    });

    controller.load(trace);
    log.borrow_mut().clear();
    (controller, log)
}

fn renders(log: &Log) -> Vec<usize> {
    log.borrow()
        .iter()
        .filter_map(|s| match s {
            Seen::Render(i) => Some(*i),
            Seen::Narrate(..) => None,
        })
        .collect()
}

#[test]
fn play_from_idle_visits_every_index_in_order() {
    let trace = trace(
        Algorithm::BinarySearch,
        &[1, 3, 5, 7, 9, 11, 13, 15, 17, 19],
        Some(7),
    );
    let len = trace.len();
    let (mut controller, log) = observed(trace);

    controller.play().unwrap();
    // Drive with uneven frame times
    let mut frames = [16u64, 250, 734, 1000, 3].into_iter().cycle();
    while controller.is_playing() {
        controller.advance(Duration::from_millis(frames.next().unwrap()));
    }

    assert_eq!(renders(&log), (0..len).collect::<Vec<_>>());
    assert_eq!(controller.mode(), PlaybackMode::Paused);
    assert_eq!(controller.cursor(), len - 1);
}

#[test]
fn render_precedes_narration_for_every_write() {
    let (mut controller, log) = observed(trace(Algorithm::InsertionSort, &[3, 1, 2], None));

    controller.play().unwrap();
    controller.advance(Duration::from_millis(1000));
    controller.seek(0).unwrap();
    controller.next().unwrap();

    let log = log.borrow();
    assert_eq!(log.len() % 2, 0);
    for pair in log.chunks(2) {
        match pair {
            [Seen::Render(a), Seen::Narrate(b, _)] => assert_eq!(a, b),
            other => panic!("unexpected order: {other:?}"),
        }
    }
    assert_eq!(log[1], Seen::Narrate(0, TimingMode::UserGesture));
    assert_eq!(log[3], Seen::Narrate(1, TimingMode::Controlled));
}

#[test]
fn rapid_manual_stepping_never_skips_notifications() {
    let trace = trace(Algorithm::SelectionSort, &[5, 4, 3, 2, 1], None);
    let last = trace.last_index();
    let (mut controller, log) = observed(trace);

    let mut expected = Vec::new();
    for _ in 0..last {
        controller.next().unwrap();
        expected.push(controller.cursor());
    }
    for _ in 0..3 {
        controller.previous().unwrap();
        expected.push(controller.cursor());
    }
    controller.seek(2).unwrap();
    expected.push(2);

    assert_eq!(renders(&log), expected);
    assert_eq!(controller.notification_count(), 1 + expected.len() as u64);
}

#[test]
fn seek_out_of_range_clamps() {
    let trace = trace(Algorithm::QuickSort, &[3, 6, 1, 5], None);
    let last = trace.last_index();
    let (mut controller, log) = observed(trace);

    controller.seek(last + 100).unwrap();
    assert_eq!(controller.cursor(), last);
    controller.seek(0).unwrap();
    assert_eq!(controller.cursor(), 0);
    assert_eq!(renders(&log), vec![last, 0]);
}

#[test]
fn rerun_while_playing_drops_old_timer() {
    let (mut controller, log) = observed(trace(Algorithm::BubbleSort, &[9, 8, 7, 6, 5], None));
    controller.play().unwrap();
    controller.advance(Duration::from_millis(2500));
    assert!(controller.cursor() > 0);

    let fresh = trace(Algorithm::LinearSearch, &[4, 8, 15], Some(8));
    let fresh_algorithm = fresh.algorithm().to_string();
    controller.load(fresh);
    log.borrow_mut().clear();

    controller.advance(Duration::from_secs(60));
    assert!(log.borrow().is_empty());
    assert_eq!(controller.trace().map(Trace::algorithm), Some(fresh_algorithm.as_str()));
    assert_eq!(controller.cursor(), 0);
    assert_eq!(controller.mode(), PlaybackMode::Idle);
}

#[test]
fn speed_change_applies_to_next_tick() {
    let (mut controller, log) = observed(trace(Algorithm::BubbleSort, &[4, 3, 2, 1], None));
    controller.set_speed(SpeedPreset::Slow.into());
    controller.play().unwrap();

    controller.advance(Duration::from_millis(1500));
    controller.set_speed(SpeedPreset::VeryFast.into());
    assert_eq!(controller.next_deadline(), Some(Duration::from_millis(1500)));

    controller.advance(Duration::from_millis(1500));
    assert_eq!(controller.next_deadline(), Some(Duration::from_millis(200)));
    assert_eq!(renders(&log), vec![0, 1, 2]);
}

#[test]
fn replay_after_finish_restarts_from_zero() {
    let (mut controller, log) = observed(trace(Algorithm::LinearSearch, &[1, 2], Some(2)));
    controller.play().unwrap();
    controller.run_to_end();
    let first_pass = renders(&log);
    log.borrow_mut().clear();

    controller.play().unwrap();
    controller.run_to_end();
    assert_eq!(renders(&log), first_pass);
    assert_eq!(log.borrow()[1], Seen::Narrate(0, TimingMode::UserGesture));
}

#[test]
fn speech_narrator_unlocks_on_play() {
    #[derive(Default)]
    struct Spoken(Vec<String>);
    impl SpeechBackend for Spoken {
        fn speak(&mut self, text: &str) -> Result<(), algoscope::narration::SpeechError> {
            self.0.push(text.to_string());
            Ok(())
        }
        fn stop(&mut self) -> Result<(), algoscope::narration::SpeechError> {
            Ok(())
        }
    }

    let narrator = Rc::new(RefCell::new(SpeechNarrator::new(Spoken::default())));
    let mut controller = PlaybackController::new();
    controller.subscribe(Rc::clone(&narrator));

    controller.load(trace(Algorithm::LinearSearch, &[4, 8], Some(8)));
    assert!(!narrator.borrow().is_unlocked());
    assert_eq!(narrator.borrow().spoken(), 0);

    controller.play().unwrap();
    controller.run_to_end();
    let narrator = narrator.borrow();
    assert!(narrator.is_unlocked());
    assert_eq!(narrator.spoken(), controller.len());
    assert!(narrator.backend().0[0].starts_with("Start linear search"));
}

#[test]
fn config_drives_controller() {
    let config = ScopeConfig::from_yaml(
        r"
playback:
  speed: very_fast
",
    )
    .unwrap();
    let controller = PlaybackController::from_config(&config.playback).unwrap();
    assert_eq!(controller.speed().delay(), Duration::from_millis(200));
    assert_eq!(controller.state().mode, PlaybackMode::Idle);
}
