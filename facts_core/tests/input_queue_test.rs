use facts_core::input::events::{InputEvent, InputSource, Key};
use facts_core::input::InputQueue;
use std::thread;

#[test]
fn test_input_queue_transmission() {
    let queue = InputQueue::new();
    let sender = queue.sender();

    // Spawn a producer thread
    let handle = thread::spawn(move || {
        sender.send(InputEvent::keyboard(100, Key::Digit(4))).unwrap();
        sender.send(InputEvent::keypad(150, Key::Enter)).unwrap();
    });

    handle.join().unwrap();

    let received1 = queue.pop().expect("Should receive first event");
    assert_eq!(received1.timestamp, 100);
    assert_eq!(received1.key, Key::Digit(4));
    assert_eq!(received1.source, InputSource::Keyboard);

    let received2 = queue.pop().expect("Should receive second event");
    assert_eq!(received2.key, Key::Enter);
    assert_eq!(received2.source, InputSource::Keypad);

    // Queue should be empty now
    assert!(queue.pop().is_none());
}

#[test]
fn test_input_queue_ordering() {
    let queue = InputQueue::new();

    queue.push(InputEvent::keypad(10, Key::Digit(1)));
    queue.push(InputEvent::keypad(11, Key::Digit(2)));

    let e1 = queue.pop().unwrap();
    let e2 = queue.pop().unwrap();

    assert_eq!(e1.timestamp, 10);
    assert_eq!(e2.timestamp, 11);
}

#[test]
fn test_sender_fails_after_queue_dropped() {
    let queue = InputQueue::new();
    let sender = queue.sender();
    drop(queue);

    assert!(sender.send(InputEvent::keyboard(0, Key::Enter)).is_err());
}
