// src/monitor/watch.rs
// =============================================================================
// This module implements the fetch -> diff -> render cycle of the monitor
// command.
//
// How it works:
// 1. A control task ticks at the configured interval
// 2. Every tick stamps the next cycle number and spawns an independent
//    fetch task, so a slow fetch never delays the next tick
// 3. A successful fetch sends exactly one MonitorEvent into a channel;
//    a failed fetch logs a warning and sends nothing (the cycle is skipped)
// 4. The channel's single consumer applies events in cycle order against
//    the baseline snapshot it owns, producing one ChangeSet per applied
//    event
//
// Ordering: fetches may complete out of tick order. Events are applied
// only with strictly increasing cycle numbers; an event older than the
// last applied one is stale and is discarded, so the baseline never moves
// backwards and a diff is never computed against a newer snapshot.
//
// Cancellation: when the shutdown signal fires, the control task stops
// ticking and drops its event sender. In-flight fetch tasks finish on
// their own timeout and drop theirs; the channel closes once the last
// sender is gone, and the consumer exits after draining it. Nothing is
// rendered twice and no task outlives the command.
//
// Rust concepts:
// - tokio::select!: Waits on the ticker and the shutdown signal at once
// - mpsc channels: Multi-producer (fetch tasks), single consumer (render)
// - watch channels: Broadcast a one-way shutdown flag
// =============================================================================

use chrono::{DateTime, Utc};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::time::MissedTickBehavior;

use crate::fetch::FetchError;
use crate::og::{diff_snapshots, ChangeSet, Snapshot};

/// One completed fetch cycle of the monitored URL.
///
/// `seq` is the cycle number stamped at dispatch time; consumers use it
/// to apply events in dispatch order even when fetches complete out of
/// order. Failed cycles send no event, so gaps in `seq` are normal.
#[derive(Debug, Clone)]
pub struct MonitorEvent {
    pub seq: u64,
    pub timestamp: DateTime<Utc>,
    pub snapshot: Snapshot,
}

/// The render loop's view of the monitored URL: the last applied snapshot
/// and the cycle number that produced it.
///
/// Owned by exactly one consumer; nothing else reads or writes it, which
/// is what lets the monitor run without locks.
#[derive(Debug, Default)]
pub struct MonitorState {
    baseline: Snapshot,
    last_applied: Option<u64>,
}

impl MonitorState {
    pub fn new() -> Self {
        Self::default()
    }

    // Applies one event against the baseline
    //
    // Returns:
    //   Some(changeset) - the event was applied; the baseline now holds
    //                     its snapshot. The first applied event diffs
    //                     against the empty baseline, so every tag shows
    //                     up as an added change.
    //   None            - the event is stale (its cycle is not newer than
    //                     the last applied one) and was discarded
    pub fn apply(&mut self, event: MonitorEvent) -> Option<ChangeSet> {
        if let Some(last) = self.last_applied {
            if event.seq <= last {
                tracing::debug!(
                    cycle = event.seq,
                    last_applied = last,
                    "monitor.event.stale"
                );
                return None;
            }
        }

        let diff = diff_snapshots(&self.baseline, &event.snapshot);
        self.baseline = event.snapshot;
        self.last_applied = Some(event.seq);
        Some(diff)
    }
}

// Spawns the monitor's control task and returns the event channel
//
// Parameters:
//   interval: time between cycle dispatches; the first cycle fires one
//             full interval after the call, like a wall clock
//   fetch: the per-cycle fetch operation, bounded by its own timeout;
//          a parameter (rather than hard-wired HTTP) so the loop's
//          guarantees can be tested without a network
//   shutdown: flips to true (or closes) when the loop should stop
//
// Returns: the receiving end of the event channel. The channel closes
// once the control task has exited and every in-flight fetch has
// settled, so `recv() == None` means the loop is fully terminated.
pub fn spawn_ticker<F, Fut>(
    interval: Duration,
    fetch: F,
    mut shutdown: watch::Receiver<bool>,
) -> mpsc::Receiver<MonitorEvent>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Snapshot, FetchError>> + Send + 'static,
{
    let (event_tx, event_rx) = mpsc::channel(16);
    let fetch = Arc::new(fetch);

    tokio::spawn(async move {
        // Start one interval in the future so the first check happens at
        // the same cadence as every later one
        let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut seq: u64 = 0;

        loop {
            tokio::select! {
                // Err means the sender side is gone, which also stops us
                _ = shutdown.changed() => break,
                _ = ticker.tick() => {
                    seq += 1;
                    let fetch = fetch.clone();
                    let tx = event_tx.clone();

                    // Independent task per cycle: a hung fetch only ties
                    // up its own cycle, never the ticker
                    tokio::spawn(async move {
                        match fetch().await {
                            Ok(snapshot) => {
                                let event = MonitorEvent {
                                    seq,
                                    timestamp: Utc::now(),
                                    snapshot,
                                };
                                // Send fails only when the consumer is
                                // gone; nothing left to do then
                                let _ = tx.send(event).await;
                            }
                            Err(error) => {
                                tracing::warn!(cycle = seq, error = %error, "monitor.fetch.failed");
                            }
                        }
                    });
                }
            }
        }
        // The control task's sender drops here; once the in-flight fetch
        // tasks drop their clones the channel closes and the consumer
        // drains out
    });

    event_rx
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What is tokio::select!?
//    - Waits on several futures at once and runs the branch of whichever
//      finishes first
//    - Here it races the ticker against the shutdown signal, so a pending
//      tick never delays cancellation
//
// 2. mpsc vs watch channels:
//    - mpsc = multi-producer, single-consumer: every fetch task gets a
//      sender clone, the render loop holds the one receiver
//    - watch = one value, many observers: a good fit for a shutdown flag
//
// 3. How does the consumer know the loop is finished?
//    - An mpsc channel closes when every sender has been dropped
//    - The control task holds one sender and each in-flight fetch holds a
//      clone, so recv() returns None exactly when all of them are done
//
// 4. Why sequence numbers instead of just applying events as they arrive?
//    - Two fetches can be in flight at once when a fetch outlives the
//      tick interval, and they can finish in either order
//    - Applying an old snapshot over a newer one would produce a diff
//      against a baseline that never existed on the page
// -----------------------------------------------------------------------------
