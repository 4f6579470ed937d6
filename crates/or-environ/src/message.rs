//! On-screen message queue

use tracing::trace;

/// Default number of messages kept before the least important is dropped
pub const DEFAULT_CAPACITY: usize = 8;

/// A queued message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub text: String,
    pub priority: u32,
    /// Frames left to display
    pub remaining_frames: u32,
    seq: u64,
}

/// Bounded priority queue of transient messages.
///
/// [`MessageQueue::pull`] returns the highest-priority message, the newest
/// one among equals, and counts down its remaining frames.
#[derive(Debug, Clone)]
pub struct MessageQueue {
    entries: Vec<Message>,
    capacity: usize,
    next_seq: u64,
}

impl MessageQueue {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            capacity: capacity.max(1),
            next_seq: 0,
        }
    }

    /// Queue `text` for `frames` frames. A full queue drops its least
    /// important, oldest entry (possibly the new one).
    pub fn push(&mut self, text: impl Into<String>, priority: u32, frames: u32) {
        let message = Message {
            text: text.into(),
            priority,
            remaining_frames: frames.max(1),
            seq: self.next_seq,
        };
        self.next_seq += 1;
        trace!("Queued message \"{}\" (priority {}, {} frames)", message.text, priority, frames);
        self.entries.push(message);

        if self.entries.len() > self.capacity {
            if let Some(lowest) = self
                .entries
                .iter()
                .enumerate()
                .min_by_key(|(_, m)| (m.priority, m.seq))
                .map(|(i, _)| i)
            {
                let dropped = self.entries.remove(lowest);
                trace!("Message queue full, dropped \"{}\"", dropped.text);
            }
        }
    }

    /// Text of the message to show this frame
    pub fn pull(&mut self) -> Option<String> {
        let index = self
            .entries
            .iter()
            .enumerate()
            .max_by_key(|(_, m)| (m.priority, m.seq))
            .map(|(i, _)| i)?;

        let message = &mut self.entries[index];
        message.remaining_frames -= 1;
        if message.remaining_frames == 0 {
            Some(self.entries.remove(index).text)
        } else {
            Some(message.text.clone())
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Queued messages, oldest first
    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.entries.iter()
    }
}

impl Default for MessageQueue {
    fn default() -> Self {
        Self::new()
    }
}
