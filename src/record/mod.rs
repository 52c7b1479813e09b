//! Pure builders turning the GC model into time-series `Record`s.
//!
//! Both builders take the resolved environment tags by reference and layer
//! their own record-specific tags on top.

mod event;
mod summary;

pub use self::event::event_record;
pub use self::summary::summary_record;
