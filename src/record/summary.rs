use constants::SUMMARY_MEASUREMENT;
use metric::{Record, TagMap};
use model::GcModel;
use time;

/// Build the single aggregate point for a run.
///
/// Values are lifted from the model's aggregates as they are; nothing is
/// recomputed here. Pauses are in seconds, memory in KB and throughput in
/// percent.
pub fn summary_record(model: &GcModel, tags: &TagMap) -> Record {
    Record::new(SUMMARY_MEASUREMENT, time::now_ms())
        .overlay_tags_from_map(tags)
        .overlay_tag("summary", "overall")
        .field("gcEvents", model.size() as i64)
        .field("totalGCPause", model.pause.sum())
        .field("pauseMin", model.pause.min())
        .field("pauseMax", model.pause.max())
        .field("pauseAvg", model.pause.average())
        .field("fullGCNum", model.full_gc_pause.n() as i64)
        .field("fullGCSum", model.full_gc_pause.sum())
        .field("freedMemory", model.freed_memory.total)
        .field("freedMemoryByGC", model.freed_memory.by_gc)
        .field("freedMemoryFullGC", model.freed_memory.by_full_gc)
        .field("footprint", model.footprint)
        .field("throughput", model.throughput)
}
