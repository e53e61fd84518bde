//! Append-only per-interval history of queue contents.
//!
//! Presentation collaborators scrub through past states by indexing these
//! logs with an interval number.  Each frame is an id-sequence copy taken at
//! the end of phase 6, *before* the missed-passenger purge — matching what
//! was on screen during that minute.
//!
//! History is cleared only by a full re-run; rewinding does not truncate it.

use std::collections::VecDeque;

use pax_core::PassengerId;

use crate::ServiceBank;

/// One interval's copy of a queue family: one id sequence per lane.
pub type QueueFrame = Vec<Vec<PassengerId>>;

/// The five per-interval logs consumed by inspection views.
#[derive(Clone, Debug, Default)]
pub struct HistoryLog {
    pub served_ticket: Vec<QueueFrame>,
    pub queued_ticket: Vec<QueueFrame>,
    pub served_checkpoint: Vec<QueueFrame>,
    pub queued_checkpoint: Vec<QueueFrame>,
    pub hold_rooms: Vec<QueueFrame>,
}

fn copy_rooms(rooms: &[VecDeque<PassengerId>]) -> QueueFrame {
    rooms.iter().map(|q| q.iter().copied().collect()).collect()
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one interval's copies of all five queue families.
    pub fn append_interval(
        &mut self,
        ticket: &ServiceBank,
        checkpoint: &ServiceBank,
        hold_rooms: &[VecDeque<PassengerId>],
    ) {
        self.served_ticket.push(copy_rooms(ticket.completed()));
        self.queued_ticket.push(copy_rooms(ticket.waiting()));
        self.served_checkpoint.push(copy_rooms(checkpoint.completed()));
        self.queued_checkpoint.push(copy_rooms(checkpoint.waiting()));
        self.hold_rooms.push(copy_rooms(hold_rooms));
    }

    /// Number of intervals recorded so far.
    pub fn len(&self) -> usize {
        self.hold_rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hold_rooms.is_empty()
    }

    pub fn clear(&mut self) {
        self.served_ticket.clear();
        self.queued_ticket.clear();
        self.served_checkpoint.clear();
        self.queued_checkpoint.clear();
        self.hold_rooms.clear();
    }
}
