use lanebeat_ports::input::InputEvent;
use lanebeat_ports::types::{Lane, Seconds};
use log::warn;
use parking_lot::Mutex;
use rtrb::{Consumer, Producer, RingBuffer};
use std::sync::Arc;

pub const INPUT_QUEUE_CAPACITY: usize = 1024;

/// Cloneable handle the input collaborator pushes lane events through.
#[derive(Clone)]
pub struct InputSink {
    producer: Arc<Mutex<Producer<InputEvent>>>,
}

impl InputSink {
    /// Returns `false` when the queue is full and the event was dropped.
    pub fn push(&self, event: InputEvent) -> bool {
        let mut guard = self.producer.lock();
        match guard.push(event) {
            Ok(()) => true,
            Err(_) => {
                warn!("input queue full, dropping {event:?}");
                false
            }
        }
    }

    pub fn press(&self, lane: Lane, timestamp: Seconds) -> bool {
        self.push(InputEvent::press(lane, timestamp))
    }

    pub fn release(&self, lane: Lane, timestamp: Seconds) -> bool {
        self.push(InputEvent::release(lane, timestamp))
    }
}

pub(crate) fn input_queue(capacity: usize) -> (InputSink, Consumer<InputEvent>) {
    let (producer, consumer) = RingBuffer::new(capacity);
    (
        InputSink {
            producer: Arc::new(Mutex::new(producer)),
        },
        consumer,
    )
}

pub(crate) fn drain(consumer: &mut Consumer<InputEvent>) -> Vec<InputEvent> {
    let mut pending = Vec::new();
    while let Ok(event) = consumer.pop() {
        pending.push(event);
    }
    pending
}
