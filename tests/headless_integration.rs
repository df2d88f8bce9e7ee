use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use rand::{rngs::StdRng, SeedableRng};

use typist::app::{App, AppState, Flow};
use typist::clock::ManualClock;
use typist::runtime::{ChannelSource, EventLoop, SourceClosed, TypistEvent};
use typist::sentences::SentenceSet;
use typist::session::{CharState, Controller};

fn key(c: char) -> TypistEvent {
    TypistEvent::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
}

fn single(target: &str) -> SentenceSet {
    SentenceSet::new("test", vec![target.to_string()]).unwrap()
}

// Headless run of the real event loop shape: EventLoop over a channel feeding App
#[test]
fn headless_typing_flow_completes() {
    let clock = ManualClock::new();
    let mut app = App::new(Controller::with_parts(
        single("hi"),
        &clock,
        StdRng::seed_from_u64(9),
    ));

    let (tx, rx) = mpsc::channel();
    let events = EventLoop::new(ChannelSource::new(rx), Duration::from_millis(5));

    tx.send(key('h')).unwrap();
    tx.send(key('i')).unwrap();

    for _ in 0..100u32 {
        let event = events.next().unwrap();
        if let TypistEvent::Key(_) = event {
            clock.advance(Duration::from_millis(250));
        }
        if app.handle_event(event) == Flow::Quit || app.state() == AppState::Results {
            break;
        }
    }

    assert_eq!(app.state(), AppState::Results);
    // started on 'h', finished 250ms later on 'i'
    assert_eq!(app.controller.compute_speed(), 480);
}

#[test]
fn headless_escape_quits() {
    let clock = ManualClock::new();
    let mut app = App::new(Controller::with_parts(
        single("hello"),
        &clock,
        StdRng::seed_from_u64(9),
    ));

    let (tx, rx) = mpsc::channel();
    let events = EventLoop::new(ChannelSource::new(rx), Duration::from_millis(5));
    tx.send(key('h')).unwrap();
    tx.send(TypistEvent::Key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE)))
        .unwrap();

    let mut quit = false;
    for _ in 0..50u32 {
        if app.handle_event(events.next().unwrap()) == Flow::Quit {
            quit = true;
            break;
        }
    }

    assert!(quit);
    assert_eq!(app.controller.input(), "h");
}

#[test]
fn closed_source_ends_the_loop_instead_of_ticking() {
    let clock = ManualClock::new();
    let mut app = App::new(Controller::with_parts(
        single("hello"),
        &clock,
        StdRng::seed_from_u64(9),
    ));

    let (tx, rx) = mpsc::channel();
    let events = EventLoop::new(ChannelSource::new(rx), Duration::from_millis(100));
    tx.send(key('h')).unwrap();
    drop(tx);

    let mut steps = 0u32;
    let outcome = loop {
        match events.next() {
            Ok(event) => {
                steps += 1;
                if app.handle_event(event) == Flow::Quit {
                    break Ok(());
                }
            }
            Err(e) => break Err(e),
        }
        assert!(steps < 10, "loop kept running after the source closed");
    };

    assert_eq!(outcome, Err(SourceClosed));
    assert_eq!(steps, 1);
    assert_eq!(app.controller.input(), "h");
}

#[test]
fn controller_scenarios_end_to_end() {
    let clock = ManualClock::new();
    let mut controller = Controller::with_parts(single("ab"), &clock, StdRng::seed_from_u64(1));

    // wrong characters never complete
    controller.submit_input("x");
    controller.submit_input("xy");
    assert!(!controller.is_completed());
    assert_eq!(
        controller.diff(),
        vec![CharState::Incorrect, CharState::Incorrect]
    );

    // the timer started on "x" and does not move
    let start = controller.session().started_at();
    assert!(start.is_some());

    controller.submit_input("a");
    clock.advance(Duration::from_secs(2));
    controller.submit_input("ab");

    assert!(controller.is_completed());
    assert_eq!(controller.session().started_at(), start);
    assert_eq!(controller.compute_speed(), 60);

    controller.restart();
    assert!(!controller.is_completed());
    assert_eq!(controller.input(), "");
    assert_eq!(controller.session().started_at(), None);
    assert_eq!(controller.compute_speed(), 0);
}

#[test]
fn restart_draws_from_the_candidate_set() {
    let clock = ManualClock::new();
    let set = SentenceSet::new(
        "three",
        vec!["one".into(), "two".into(), "three".into()],
    )
    .unwrap();
    let mut controller = Controller::with_parts(set, &clock, StdRng::seed_from_u64(5));

    for _ in 0..20 {
        controller.restart();
        assert!(controller.sentences().contains(controller.target()));
    }
}
