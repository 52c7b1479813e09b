//! The parsed GC log: an ordered sequence of events plus run-level
//! aggregates.
//!
//! Text parsing happens elsewhere. A model arrives here either built in code
//! through `GcModel::from_events` or as a JSON document through `load`:
//!
//! ```json
//! { "events": [
//!     { "timestamp": "2017-03-01T10:00:00.123Z",
//!       "pause": 0.0123,
//!       "event_type": { "name": "GC (Allocation Failure)",
//!                       "generation": "YOUNG",
//!                       "concurrency": "SERIAL" },
//!       "detail": { "kind": "collection",
//!                   "young": { "total": 100, "pre_used": 80, "post_used": 20 } } }
//! ] }
//! ```

use export::ExportError;
use serde_json;
use std::io::Read;

mod event;
mod stats;

pub use self::event::{Concurrency, EventDetail, ExtendedType, GcEvent, Generation, MemoryUsage};
pub use self::stats::Stats;

/// KB released over the run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreedMemory {
    /// Freed by all collections
    pub total: i64,
    /// Freed by collections other than full collections
    pub by_gc: i64,
    /// Freed by full collections
    pub by_full_gc: i64,
}

/// A parsed GC log with its run-level aggregates.
///
/// `events` is in chronological order. The aggregates are taken as given by
/// whoever built the model; nothing in this crate recomputes them behind the
/// builder's back.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GcModel {
    /// Every event of the log, in order
    pub events: Vec<GcEvent>,
    /// Pause statistics over all events
    pub pause: Stats,
    /// Pause statistics over full collections
    pub full_gc_pause: Stats,
    /// Freed memory
    pub freed_memory: FreedMemory,
    /// Peak heap capacity observed, KB
    pub footprint: i64,
    /// Percentage of run time not spent paused
    pub throughput: f64,
}

#[derive(Deserialize)]
struct EventLog {
    events: Vec<GcEvent>,
}

impl GcModel {
    /// Build a model from its events, computing every aggregate.
    pub fn from_events(events: Vec<GcEvent>) -> GcModel {
        let mut pauses = Vec::with_capacity(events.len());
        let mut full_gc_pauses = Vec::new();
        let mut freed = FreedMemory::default();
        let mut footprint = 0;

        for event in &events {
            pauses.push(event.pause);
            if event.is_full() {
                full_gc_pauses.push(event.pause);
            }
            if !event.is_collection() {
                continue;
            }
            let generations = event.young().into_iter().chain(event.tenured());
            let mut event_freed = 0;
            let mut event_total = 0;
            for usage in generations {
                event_freed += usage.freed();
                event_total += usage.total;
            }
            if event.is_full() {
                freed.by_full_gc += event_freed;
            } else {
                freed.by_gc += event_freed;
            }
            footprint = ::std::cmp::max(footprint, event_total);
        }
        freed.total = freed.by_gc + freed.by_full_gc;

        let pause = Stats::from_samples(&pauses);
        let full_gc_pause = Stats::from_samples(&full_gc_pauses);
        let throughput = throughput(&events, pause.sum());
        GcModel {
            events: events,
            pause: pause,
            full_gc_pause: full_gc_pause,
            freed_memory: freed,
            footprint: footprint,
            throughput: throughput,
        }
    }

    /// Number of events in the model.
    pub fn size(&self) -> usize {
        self.events.len()
    }

    /// True when the model holds no events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Share of the observed running time, in percent, not spent in pauses.
///
/// Running time spans the first to the last timestamped event plus that last
/// event's pause. Without a positive running time nothing was observed to be
/// paused and the answer is 100.
fn throughput(events: &[GcEvent], pause_sum: f64) -> f64 {
    let mut timestamped = events
        .iter()
        .filter_map(|e| e.timestamp.map(|t| (t, e.pause)));
    let (first, first_pause) = match timestamped.next() {
        Some(pair) => pair,
        None => return 100.0,
    };
    let (last, last_pause) = timestamped.last().unwrap_or((first, first_pause));
    let span_ms = last.timestamp_millis() - first.timestamp_millis();
    let running = span_ms as f64 / 1000.0 + last_pause;
    if running <= 0.0 {
        100.0
    } else {
        100.0 * (running - pause_sum) / running
    }
}

/// Read a JSON event log and build its model.
///
/// Malformed input is reported as `ExportError::Data`. Values are not
/// otherwise validated: negative memory figures pass through untouched.
pub fn load<R: Read>(reader: R) -> Result<GcModel, ExportError> {
    let log: EventLog = serde_json::from_reader(reader)
        .map_err(|e| ExportError::Data(format!("could not parse GC model: {}", e)))?;
    Ok(GcModel::from_events(log.events))
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::fs::File;
    use std::io::Write;
    use tempdir::TempDir;

    fn young_gc(pause: f64) -> GcEvent {
        GcEvent::new(
            ExtendedType::new("GC (Allocation Failure)", Generation::Young, Concurrency::Serial),
            pause,
        ).collection(Some(MemoryUsage::new(100, 80, 20)), None)
    }

    fn full_gc(pause: f64) -> GcEvent {
        GcEvent::new(
            ExtendedType::new("Full GC (Ergonomics)", Generation::All, Concurrency::Serial),
            pause,
        ).collection(
            Some(MemoryUsage::new(100, 90, 0)),
            Some(MemoryUsage::new(400, 300, 150)),
        )
    }

    #[test]
    fn aggregates_from_events() {
        let stopped = GcEvent::new(
            ExtendedType::new(
                "Total time for which application threads were stopped",
                Generation::Other,
                Concurrency::Serial,
            ),
            0.001,
        );
        let model = GcModel::from_events(vec![young_gc(0.1), full_gc(0.5), stopped]);

        assert_eq!(3, model.size());
        assert_eq!(3, model.pause.n());
        assert!((model.pause.sum() - 0.601).abs() < 1e-9);
        assert_eq!(1, model.full_gc_pause.n());
        assert_eq!(0.5, model.full_gc_pause.sum());
        assert_eq!(60, model.freed_memory.by_gc);
        assert_eq!(240, model.freed_memory.by_full_gc);
        assert_eq!(300, model.freed_memory.total);
        assert_eq!(500, model.footprint);
        assert_eq!(100.0, model.throughput);
    }

    #[test]
    fn throughput_from_timestamps() {
        let t0 = Utc.ymd(2017, 3, 1).and_hms(10, 0, 0);
        let t1 = Utc.ymd(2017, 3, 1).and_hms(10, 0, 9);
        let model = GcModel::from_events(vec![
            young_gc(0.5).timestamp(t0),
            young_gc(0.5).timestamp(t1),
        ]);
        // 9s span + 0.5s last pause, 1s paused
        assert!((model.throughput - 100.0 * 8.5 / 9.5).abs() < 1e-9);
    }

    #[test]
    fn empty_model() {
        let model = GcModel::from_events(Vec::new());
        assert!(model.is_empty());
        assert_eq!(0, model.pause.n());
        assert_eq!(0, model.footprint);
        assert_eq!(100.0, model.throughput);
    }

    #[test]
    fn load_json_log() {
        let dir = TempDir::new("gcflux").unwrap();
        let path = dir.path().join("gc.json");
        let mut fp = File::create(&path).unwrap();
        fp.write_all(
            br#"{ "events": [
                { "timestamp": "2017-03-01T10:00:00.123Z",
                  "pause": 0.0123,
                  "event_type": { "name": "GC (Allocation Failure)",
                                  "generation": "YOUNG",
                                  "concurrency": "SERIAL" },
                  "detail": { "kind": "collection",
                              "young": { "total": 100, "pre_used": 80, "post_used": 20 } } },
                { "pause": 0.0,
                  "event_type": { "name": "CMS-concurrent-mark",
                                  "generation": "TENURED",
                                  "concurrency": "CONCURRENT" } }
            ] }"#,
        ).unwrap();
        drop(fp);

        let model = load(File::open(&path).unwrap()).unwrap();
        assert_eq!(2, model.size());
        let first = &model.events[0];
        assert_eq!(Some(&MemoryUsage::new(100, 80, 20)), first.young());
        assert_eq!(None, first.tenured());
        assert_eq!(
            1488362400123,
            first.timestamp.map(|t| t.timestamp_millis()).unwrap()
        );
        let second = &model.events[1];
        assert_eq!(EventDetail::Informational, second.detail);
        assert_eq!(Concurrency::Concurrent, second.event_type.concurrency);
        assert_eq!(None, second.timestamp);
    }

    #[test]
    fn load_rejects_garbage() {
        match load(&b"{ \"events\": 12 }"[..]) {
            Err(ExportError::Data(_)) => {}
            other => panic!("expected data error, got {:?}", other),
        }
    }
}
