//! Mentor and mentee records
//!
//! Both pools share one representation: a keyed record with a loosely typed
//! attribute map, stored in an insertion-ordered [`RecordTable`].

pub mod table;
pub mod types;
pub mod value;

pub use table::{Record, RecordTable};
pub use types::{GroupId, RecordKey};
pub use value::{AttributeMap, AttributeValue};
