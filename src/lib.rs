//! Cassette: bootstrap-time configuration tuning for Cassandra nodes.
//!
//! Merges a declarative set of desired settings, the node's runtime identity,
//! and the pre-existing on-disk `cassandra.yaml` into the document the
//! database starts from, and writes the companion commit-log archive
//! properties file. Runs once per node-bootstrap cycle, before the database
//! process starts.

pub mod archive;
pub mod document;
pub mod error;
pub mod logging;
pub mod settings;
pub mod source;
pub mod tuner;

pub use error::{DocumentError, TunerError};
pub use settings::TunerSettings;
pub use source::{ConfigSource, NodeIdentity};
pub use tuner::{set_auto_bootstrap, SnitchResolver, Tuner};
