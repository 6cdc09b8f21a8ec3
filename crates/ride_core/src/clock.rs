//! Discrete-event clock in simulation milliseconds.
//!
//! Every state change is driven by an [`Event`] popped from the clock: events
//! dispatched by the app surface and the timer events the systems schedule for
//! the scripted choreography. Events with equal timestamps pop in insertion order.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use bevy_ecs::prelude::Resource;
use serde::{Deserialize, Serialize};

use crate::state::RideEvent;

pub const ONE_SEC_MS: u64 = 1000;

/// The two animated legs of a trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Leg {
    /// Driver start location to pickup.
    Pickup,
    /// Pickup to destination.
    Destination,
}

impl Leg {
    pub fn as_str(self) -> &'static str {
        match self {
            Leg::Pickup => "pickup",
            Leg::Destination => "destination",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EventKind {
    /// A ride event handed to the dispatcher.
    Dispatch(RideEvent),
    /// Delay after a transition elapsed; the leg's progress stream starts.
    LegStart { leg: Leg, generation: u64 },
    /// Pull the next value from the active progress stream.
    ProgressTick { leg: Leg, generation: u64 },
    /// Pause after the final progress value elapsed; the leg is finished.
    LegSettled { leg: Leg, generation: u64 },
}

impl EventKind {
    /// Generation token of timer events; `None` for dispatched events.
    pub fn generation(&self) -> Option<u64> {
        match self {
            EventKind::Dispatch(_) => None,
            EventKind::LegStart { generation, .. }
            | EventKind::ProgressTick { generation, .. }
            | EventKind::LegSettled { generation, .. } => Some(*generation),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Event {
    pub timestamp: u64,
    pub kind: EventKind,
    seq: u64,
}

impl PartialEq for Event {
    fn eq(&self, other: &Self) -> bool {
        self.timestamp == other.timestamp && self.seq == other.seq
    }
}

impl Eq for Event {}

impl Ord for Event {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering to make BinaryHeap a min-heap by (timestamp, seq).
        other
            .timestamp
            .cmp(&self.timestamp)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Event {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// The event currently being processed by the schedule.
#[derive(Debug, Clone, Copy, Resource)]
pub struct CurrentEvent(pub Event);

#[derive(Debug, Default, Resource)]
pub struct SimulationClock {
    now: u64,
    next_seq: u64,
    events: BinaryHeap<Event>,
}

impl SimulationClock {
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Schedule `kind` at an absolute time. Times in the past are moved to `now`.
    pub fn schedule_at(&mut self, timestamp: u64, kind: EventKind) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.events.push(Event {
            timestamp: timestamp.max(self.now),
            kind,
            seq,
        });
    }

    pub fn schedule_in(&mut self, delay_ms: u64, kind: EventKind) {
        self.schedule_at(self.now.saturating_add(delay_ms), kind);
    }

    pub fn pop_next(&mut self) -> Option<Event> {
        let event = self.events.pop()?;
        self.now = event.timestamp;
        Some(event)
    }

    pub fn next_event_time(&self) -> Option<u64> {
        self.events.peek().map(|e| e.timestamp)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
