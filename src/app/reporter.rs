// app/reporter.rs
// Sinks for per-tick snapshots and the completion signal

use crossbeam::channel::Sender;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::body::Species;
use crate::simulation::{SpeciesCounts, TickSnapshot};

/// Why a run stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Acid or base ran out; no further reaction is possible
    Exhausted,
    /// The cancel token was set between ticks
    Cancelled,
    /// The tick ceiling was reached first
    TickLimit,
}

/// Final signal of a run, emitted exactly once.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Completion {
    pub ticks: u64,
    pub total_reacted: usize,
    pub counts: SpeciesCounts,
    pub reason: StopReason,
}

/// Receives snapshots in strict tick order, then one completion.
pub trait Reporter {
    fn on_snapshot(&mut self, snapshot: &TickSnapshot);
    fn on_complete(&mut self, completion: &Completion);
}

impl<R: Reporter + ?Sized> Reporter for &mut R {
    fn on_snapshot(&mut self, snapshot: &TickSnapshot) {
        (**self).on_snapshot(snapshot)
    }

    fn on_complete(&mut self, completion: &Completion) {
        (**self).on_complete(completion)
    }
}

impl<R: Reporter + ?Sized> Reporter for Box<R> {
    fn on_snapshot(&mut self, snapshot: &TickSnapshot) {
        (**self).on_snapshot(snapshot)
    }

    fn on_complete(&mut self, completion: &Completion) {
        (**self).on_complete(completion)
    }
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn on_snapshot(&mut self, _snapshot: &TickSnapshot) {}
    fn on_complete(&mut self, _completion: &Completion) {}
}

/// Keeps every snapshot in memory.
#[derive(Debug, Default, Clone)]
pub struct CollectingReporter {
    pub snapshots: Vec<TickSnapshot>,
    pub completions: Vec<Completion>,
}

impl Reporter for CollectingReporter {
    fn on_snapshot(&mut self, snapshot: &TickSnapshot) {
        self.snapshots.push(snapshot.clone());
    }

    fn on_complete(&mut self, completion: &Completion) {
        self.completions.push(completion.clone());
    }
}

/// Render the results table: initial / reacted / remaining per species.
pub fn format_table(counts: &SpeciesCounts) -> String {
    let mut out = format!(
        "{:<14}{:>10}{:>10}{:>10}\n",
        "species", "initial", "reacted", "remaining"
    );
    for (species, tally) in counts.rows() {
        out.push_str(&format!(
            "{:<14}{:>10}{:>10}{:>10}\n",
            species.label(),
            tally.initial,
            tally.reacted,
            tally.remaining
        ));
    }
    out
}

/// Logs the live table every `every` ticks and whenever a reaction happens.
#[derive(Debug, Clone)]
pub struct LogReporter {
    every: u64,
}

impl LogReporter {
    pub fn new(every: u64) -> Self {
        Self { every: every.max(1) }
    }
}

impl Default for LogReporter {
    fn default() -> Self {
        Self::new(1)
    }
}

impl Reporter for LogReporter {
    fn on_snapshot(&mut self, snapshot: &TickSnapshot) {
        if snapshot.reacted_this_tick > 0 || snapshot.tick % self.every == 0 {
            info!(
                "tick {} (+{} {}, {} effects)\n{}",
                snapshot.tick,
                snapshot.reacted_this_tick,
                Species::Product.formula(),
                snapshot.effects.len(),
                format_table(&snapshot.counts)
            );
        }
    }

    fn on_complete(&mut self, completion: &Completion) {
        info!(
            "run finished after {} ticks ({:?}): {} pairs reacted\n{}",
            completion.ticks,
            completion.reason,
            completion.total_reacted,
            format_table(&completion.counts)
        );
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ReportEvent {
    Snapshot(Box<TickSnapshot>),
    Complete(Completion),
}

/// Forwards events to another thread, e.g. a renderer. Events are sent in
/// the order they occur; a dropped receiver is not an error for the run.
#[derive(Debug, Clone)]
pub struct ChannelReporter {
    tx: Sender<ReportEvent>,
}

impl ChannelReporter {
    pub fn new(tx: Sender<ReportEvent>) -> Self {
        Self { tx }
    }

    fn send(&self, event: ReportEvent) {
        if self.tx.send(event).is_err() {
            debug!("report receiver dropped; event discarded");
        }
    }
}

impl Reporter for ChannelReporter {
    fn on_snapshot(&mut self, snapshot: &TickSnapshot) {
        self.send(ReportEvent::Snapshot(Box::new(snapshot.clone())));
    }

    fn on_complete(&mut self, completion: &Completion) {
        self.send(ReportEvent::Complete(completion.clone()));
    }
}

/// Sends every event to both reporters, first `.0` then `.1`.
#[derive(Debug, Default, Clone)]
pub struct Fanout<A, B>(pub A, pub B);

impl<A: Reporter, B: Reporter> Reporter for Fanout<A, B> {
    fn on_snapshot(&mut self, snapshot: &TickSnapshot) {
        self.0.on_snapshot(snapshot);
        self.1.on_snapshot(snapshot);
    }

    fn on_complete(&mut self, completion: &Completion) {
        self.0.on_complete(completion);
        self.1.on_complete(completion);
    }
}
