//! Event types and sinks for observing stroke builds.
//!
//! This module defines [`StrokeEvent`] and a set of sinks to emit, collect,
//! or forward events while executing a build via
//! [`crate::stroke::builder::StrokeBuilder`].
use glam::Vec3;

use crate::brush::ItemId;
use crate::stroke::PlacementRecord;

/// Describes events emitted while a stroke is built.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub enum StrokeEvent {
    /// Emitted when a build starts for a guide.
    BuildStarted {
        /// Id of the active brush.
        brush_id: String,
        /// Number of candidates the guide produced.
        candidate_count: usize,
    },

    /// Emitted when the build finishes.
    BuildFinished {
        /// Number of records placed.
        placed: usize,
        /// Number of candidates rejected.
        rejected: usize,
    },

    /// Emitted when a candidate becomes a placement record.
    PlacementMade {
        /// Index of the candidate along the guide.
        candidate_index: usize,
        /// The record data.
        record: PlacementRecord,
    },

    /// Emitted when a candidate is dropped.
    CandidateRejected {
        /// Index of the candidate along the guide.
        candidate_index: usize,
        /// Item the candidate would have placed.
        item_id: ItemId,
        /// Guide-space position of the candidate.
        position: Vec3,
        /// Why the candidate was dropped.
        reason: RejectReason,
    },

    /// Non-fatal warning generated during the build.
    Warning {
        /// Context string (e.g. brush id, item id).
        context: String,
        /// Human-readable message.
        message: String,
    },
}

/// Why a candidate was rejected during a build.
///
/// A missing surface hit is not a rejection; the candidate falls back to
/// its guide-plane pose.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// The resolved bounds collided with an existing object or an
    /// already-accepted record.
    Overlap,
}

/// Discriminant for [`StrokeEvent`], used to skip building events nobody
/// listens to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrokeEventKind {
    BuildStarted,
    BuildFinished,
    PlacementMade,
    CandidateRejected,
    Warning,
}

/// A generic event sink that accepts [`StrokeEvent`]s.
pub trait EventSink {
    /// Whether the sink is interested in events of the given kind.
    fn wants(&self, _kind: StrokeEventKind) -> bool {
        true
    }

    fn send(&mut self, event: StrokeEvent);

    fn send_many<I>(&mut self, events: I)
    where
        Self: Sized,
        I: IntoIterator<Item = StrokeEvent>,
    {
        for e in events {
            self.send(e);
        }
    }
}

/// A no-op event sink.
impl EventSink for () {
    fn wants(&self, _kind: StrokeEventKind) -> bool {
        false
    }

    #[inline]
    fn send(&mut self, _event: StrokeEvent) {}
}

/// An event sink that forwards to a user-provided closure.
pub struct FnSink<F>
where
    F: FnMut(StrokeEvent),
{
    f: F,
}

impl<F> FnSink<F>
where
    F: FnMut(StrokeEvent),
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> EventSink for FnSink<F>
where
    F: FnMut(StrokeEvent),
{
    #[inline]
    fn send(&mut self, event: StrokeEvent) {
        (self.f)(event);
    }
}

/// An event sink that collects all events in a `Vec`.
#[derive(Default)]
pub struct VecSink {
    events: Vec<StrokeEvent>,
}

impl VecSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn with_capacity(cap: usize) -> Self {
        Self {
            events: Vec::with_capacity(cap),
        }
    }

    pub fn into_inner(self) -> Vec<StrokeEvent> {
        self.events
    }

    pub fn as_slice(&self) -> &[StrokeEvent] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl EventSink for VecSink {
    #[inline]
    fn send(&mut self, event: StrokeEvent) {
        self.events.push(event);
    }
}
