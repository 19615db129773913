pub mod adapter;
pub mod buffer;
pub mod events;

use std::time::Duration;

use self::events::InputEvent;
use crossbeam_channel::{unbounded, Receiver, Sender};

pub struct InputQueue {
    sender: Sender<InputEvent>,
    receiver: Receiver<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        let (sender, receiver) = unbounded();
        Self { sender, receiver }
    }

    /// Pushes an event into the queue.
    pub fn push(&self, event: InputEvent) {
        let _ = self.sender.send(event);
    }

    /// Non-blocking. Returns None if queue is empty.
    pub fn pop(&self) -> Option<InputEvent> {
        self.receiver.try_recv().ok()
    }

    /// Waits up to `timeout` for the next event.
    pub fn pop_timeout(&self, timeout: Duration) -> Option<InputEvent> {
        self.receiver.recv_timeout(timeout).ok()
    }

    /// Sender for an input source living on another thread. Sends start
    /// failing once this queue is dropped, which is the source's signal to stop.
    pub fn sender(&self) -> Sender<InputEvent> {
        self.sender.clone()
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}
