//! Target classifiers: send target in, column predicates out.
//!
//! One classifier per schema generation. Each is a pure function over [`PlatformTarget`]; the
//! exhaustive `match` inside means a new target variant does not compile until every generation
//! decides how to address it.

mod session;
mod uninfo;

use cesaa_core::PlatformTarget;
use storage::{PredicateSet, RecordSchema};

use crate::error::Result;

pub use session::SessionClassifier;
pub use uninfo::UninfoClassifier;

/// Maps a send target to the predicates that select its conversation in one schema generation.
pub trait TargetClassifier: Send + Sync {
    /// Table layout the predicates refer to.
    type Schema: RecordSchema;

    /// Returns [`crate::Error::UnsupportedTarget`] for variants this generation cannot address.
    /// Absent or empty ids are left out, so a target may yield an empty set.
    fn classify(&self, target: &PlatformTarget) -> Result<PredicateSet>;
}

/// Filter type of the schema a classifier targets.
pub type FilterOf<C> = <<C as TargetClassifier>::Schema as RecordSchema>::Filter;

/// Decimal form used for every numeric id.
fn decimal(id: i64) -> String {
    id.to_string()
}
