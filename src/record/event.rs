use constants::EVENT_MEASUREMENT;
use metric::{Record, TagMap};
use model::{GcEvent, MemoryUsage};
use time;

/// Build the point for a single GC event.
///
/// The point is stamped with the event's own time, falling back to the wall
/// clock when the log printed none. On top of `tags` it carries `name`,
/// `generation` and `collection`. Memory figures of a generation the event
/// did not report are 0. `total` is always 0.
///
/// Every event produces a point, informational ones included.
pub fn event_record(event: &GcEvent, tags: &TagMap) -> Record {
    let ts = time::epoch_ms_or_now(event.timestamp.as_ref());
    let empty = MemoryUsage::default();
    let young = event.young().unwrap_or(&empty);
    let tenured = event.tenured().unwrap_or(&empty);
    let kind = &event.event_type;

    Record::new(EVENT_MEASUREMENT, ts)
        .overlay_tags_from_map(tags)
        .overlay_tag("name", kind.name.as_str())
        .overlay_tag("generation", kind.generation.name())
        .overlay_tag("collection", kind.concurrency.name())
        .field("pause", event.pause)
        .field("total", 0i64)
        .field("yTotal", young.total)
        .field("yPre", young.pre_used)
        .field("yPost", young.post_used)
        .field("tPre", tenured.pre_used)
        .field("tPost", tenured.post_used)
        .field("tTotal", tenured.total)
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::{TimeZone, Utc};
    use metric::FieldValue;
    use model::{Concurrency, ExtendedType, Generation};
    use quickcheck::{Arbitrary, Gen, QuickCheck, TestResult};
    use rand::Rng;
    use tags::{resolve, TagConfig};

    #[derive(Clone, Debug)]
    struct ArbEvent(GcEvent);

    fn arb_usage<G: Gen>(g: &mut G) -> Option<MemoryUsage> {
        if g.gen() {
            let total: i64 = g.gen_range(0, 1 << 20);
            let pre: i64 = g.gen_range(0, total + 1);
            let post: i64 = g.gen_range(0, pre + 1);
            Some(MemoryUsage::new(total, pre, post))
        } else {
            None
        }
    }

    impl Arbitrary for ArbEvent {
        fn arbitrary<G: Gen>(g: &mut G) -> ArbEvent {
            let generation = match g.gen_range(0, 5) {
                0 => Generation::Young,
                1 => Generation::Tenured,
                2 => Generation::Perm,
                3 => Generation::All,
                _ => Generation::Other,
            };
            let concurrency = if g.gen() {
                Concurrency::Serial
            } else {
                Concurrency::Concurrent
            };
            let name: String = g.gen_ascii_chars().take(8).collect();
            let pause = f64::from(g.gen_range(0u32, 10_000)) / 1000.0;
            let mut event = GcEvent::new(ExtendedType::new(name, generation, concurrency), pause);
            if g.gen() {
                let young = arb_usage(g);
                let tenured = arb_usage(g);
                event = event.collection(young, tenured);
            }
            if g.gen() {
                let ms: i64 = g.gen_range(0, 2_000_000_000_000);
                event = event.timestamp(Utc.timestamp_millis(ms));
            }
            ArbEvent(event)
        }
    }

    fn int(record: &Record, name: &str) -> i64 {
        match record.get_field(name) {
            Some(FieldValue::Integer(i)) => i,
            other => panic!("field {} not an integer: {:?}", name, other),
        }
    }

    #[test]
    fn young_only_collection() {
        let event = GcEvent::new(
            ExtendedType::new("GC (Allocation Failure)", Generation::Young, Concurrency::Serial),
            0.0123,
        ).collection(Some(MemoryUsage::new(100, 80, 20)), None)
            .timestamp(Utc.ymd(1990, 6, 12).and_hms_milli(9, 10, 11, 0));
        let tags = resolve(&TagConfig::default());
        let record = event_record(&event, &tags);

        assert_eq!("gc", record.measurement);
        assert_eq!(645181811000, record.time);
        assert_eq!(Some(FieldValue::Float(0.0123)), record.get_field("pause"));
        assert_eq!(0, int(&record, "total"));
        assert_eq!(100, int(&record, "yTotal"));
        assert_eq!(80, int(&record, "yPre"));
        assert_eq!(20, int(&record, "yPost"));
        assert_eq!(0, int(&record, "tPre"));
        assert_eq!(0, int(&record, "tPost"));
        assert_eq!(0, int(&record, "tTotal"));

        assert_eq!(Some("GC (Allocation Failure)"), record.tags.get("name"));
        assert_eq!(Some("YOUNG"), record.tags.get("generation"));
        assert_eq!(Some("SERIAL"), record.tags.get("collection"));
        assert_eq!(Some("WEB"), record.tags.get("test"));
        assert_eq!(Some("build"), record.tags.get("build"));
        assert_eq!(7, record.tags.len());
    }

    #[test]
    fn field_order() {
        let event = GcEvent::new(
            ExtendedType::new("Full GC", Generation::All, Concurrency::Serial),
            1.5,
        );
        let record = event_record(&event, &TagMap::default());
        let names: Vec<&str> = record.fields.iter().map(|&(ref k, _)| k.as_str()).collect();
        assert_eq!(
            vec!["pause", "total", "yTotal", "yPre", "yPost", "tPre", "tPost", "tTotal"],
            names
        );
    }

    #[test]
    fn informational_event_is_not_filtered() {
        let event = GcEvent::new(
            ExtendedType::new(
                "Total time for which application threads were stopped",
                Generation::Other,
                Concurrency::Serial,
            ),
            0.0,
        );
        let record = event_record(&event, &TagMap::default());
        assert_eq!(0, int(&record, "yTotal"));
        assert_eq!(0, int(&record, "tTotal"));
        assert_eq!(Some("OTHER"), record.tags.get("generation"));
    }

    #[test]
    fn absent_tenured_is_zero() {
        fn inner(ev: ArbEvent) -> TestResult {
            let event = ev.0;
            if event.tenured().is_some() {
                return TestResult::discard();
            }
            let record = event_record(&event, &TagMap::default());
            if int(&record, "tPre") != 0 || int(&record, "tPost") != 0
                || int(&record, "tTotal") != 0
            {
                return TestResult::failed();
            }
            TestResult::passed()
        }
        QuickCheck::new()
            .tests(1000)
            .max_tests(10000)
            .quickcheck(inner as fn(ArbEvent) -> TestResult);
    }

    #[test]
    fn missing_timestamp_is_now() {
        fn inner(ev: ArbEvent) -> TestResult {
            let event = ev.0;
            let before = time::now_ms();
            let record = event_record(&event, &TagMap::default());
            let after = time::now_ms();
            match event.timestamp {
                Some(t) => {
                    if record.time != t.timestamp_millis() {
                        return TestResult::failed();
                    }
                }
                None => {
                    if record.time < before || record.time > after {
                        return TestResult::failed();
                    }
                }
            }
            TestResult::passed()
        }
        QuickCheck::new()
            .tests(1000)
            .quickcheck(inner as fn(ArbEvent) -> TestResult);
    }

    #[test]
    fn base_tags_carried() {
        fn inner(ev: ArbEvent, build: Option<String>) -> TestResult {
            let config = TagConfig {
                build: build.clone(),
                ..TagConfig::default()
            };
            let tags = resolve(&config);
            let record = event_record(&ev.0, &tags);
            let expected = build.unwrap_or_else(|| "build".to_string());
            if record.tags.get("build") != Some(expected.as_str()) {
                return TestResult::failed();
            }
            TestResult::passed()
        }
        QuickCheck::new()
            .tests(1000)
            .quickcheck(inner as fn(ArbEvent, Option<String>) -> TestResult);
    }
}
