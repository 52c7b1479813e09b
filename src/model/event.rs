use chrono::{DateTime, Utc};

/// The memory pool a collection works on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Generation {
    /// Young generation, collected often and cheaply
    Young,
    /// Tenured / old generation
    Tenured,
    /// Permanent generation / metaspace
    Perm,
    /// Whole heap, i.e. a full collection
    All,
    /// Anything the parser could not place
    Other,
}

impl Generation {
    /// Upper case name, as emitted into tags.
    pub fn name(&self) -> &'static str {
        match *self {
            Generation::Young => "YOUNG",
            Generation::Tenured => "TENURED",
            Generation::Perm => "PERM",
            Generation::All => "ALL",
            Generation::Other => "OTHER",
        }
    }
}

/// Whether the collector ran alongside the application or stopped it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Concurrency {
    /// Stop-the-world
    Serial,
    /// Ran concurrently with the application
    Concurrent,
}

impl Concurrency {
    /// Upper case name, as emitted into tags.
    pub fn name(&self) -> &'static str {
        match *self {
            Concurrency::Serial => "SERIAL",
            Concurrency::Concurrent => "CONCURRENT",
        }
    }
}

/// Name and classification of an event, e.g. `GC (Allocation Failure)`
/// working serially on the young generation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExtendedType {
    /// Event type name as printed in the log
    pub name: String,
    /// Generation the event works on
    pub generation: Generation,
    /// Concurrency mode of the event
    pub concurrency: Concurrency,
}

impl ExtendedType {
    /// Make a new `ExtendedType`.
    pub fn new<S>(name: S, generation: Generation, concurrency: Concurrency) -> ExtendedType
    where
        S: Into<String>,
    {
        ExtendedType {
            name: name.into(),
            generation: generation,
            concurrency: concurrency,
        }
    }
}

/// Usage of one generation around a collection, in KB.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryUsage {
    /// Capacity of the generation
    pub total: i64,
    /// Used before the collection
    pub pre_used: i64,
    /// Used after the collection
    pub post_used: i64,
}

impl MemoryUsage {
    /// Make a new `MemoryUsage`.
    pub fn new(total: i64, pre_used: i64, post_used: i64) -> MemoryUsage {
        MemoryUsage {
            total: total,
            pre_used: pre_used,
            post_used: post_used,
        }
    }

    /// KB released by the collection.
    pub fn freed(&self) -> i64 {
        self.pre_used - self.post_used
    }
}

/// What an event carries beyond its common shape.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EventDetail {
    /// No memory figures, e.g. a safepoint or "application stopped" line.
    Informational,
    /// A collection with per-generation usage. Either generation may be
    /// missing from the log.
    Collection {
        /// Young generation usage
        #[serde(default)]
        young: Option<MemoryUsage>,
        /// Tenured generation usage
        #[serde(default)]
        tenured: Option<MemoryUsage>,
    },
}

impl Default for EventDetail {
    fn default() -> EventDetail {
        EventDetail::Informational
    }
}

/// One parsed GC log event.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GcEvent {
    /// Wall-clock time of the event, when the log printed one
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    /// Pause duration in seconds
    pub pause: f64,
    /// Event classification
    pub event_type: ExtendedType,
    /// Memory payload, if any
    #[serde(default)]
    pub detail: EventDetail,
}

impl GcEvent {
    /// Make an informational event with no timestamp.
    pub fn new(event_type: ExtendedType, pause: f64) -> GcEvent {
        GcEvent {
            timestamp: None,
            pause: pause,
            event_type: event_type,
            detail: EventDetail::Informational,
        }
    }

    /// Set the event timestamp.
    pub fn timestamp(mut self, time: DateTime<Utc>) -> GcEvent {
        self.timestamp = Some(time);
        self
    }

    /// Turn the event into a collection with the given generation usage.
    pub fn collection(
        mut self,
        young: Option<MemoryUsage>,
        tenured: Option<MemoryUsage>,
    ) -> GcEvent {
        self.detail = EventDetail::Collection {
            young: young,
            tenured: tenured,
        };
        self
    }

    /// Young generation usage, if this is a collection that reported it.
    pub fn young(&self) -> Option<&MemoryUsage> {
        match self.detail {
            EventDetail::Collection { ref young, .. } => young.as_ref(),
            EventDetail::Informational => None,
        }
    }

    /// Tenured generation usage, if this is a collection that reported it.
    pub fn tenured(&self) -> Option<&MemoryUsage> {
        match self.detail {
            EventDetail::Collection { ref tenured, .. } => tenured.as_ref(),
            EventDetail::Informational => None,
        }
    }

    /// True when the event carries generation usage.
    pub fn is_collection(&self) -> bool {
        match self.detail {
            EventDetail::Collection { .. } => true,
            EventDetail::Informational => false,
        }
    }

    /// True for a collection of the whole heap.
    pub fn is_full(&self) -> bool {
        self.event_type.generation == Generation::All
    }
}
