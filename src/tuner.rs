//! The tuning engine: ordered merge of desired settings, node identity, and
//! the pre-existing on-disk document.
//!
//! Rules run in a fixed sequence; ordering only matters where two rules touch
//! overlapping structures. All mutation happens in memory and the document is
//! persisted once at the end, so a structural failure leaves the on-disk file
//! byte-identical.

pub mod partitioner;

mod caches;
mod security;

use crate::archive;
use crate::document::{self, Document};
use crate::error::TunerError;
use crate::source::{ConfigSource, NodeIdentity};
use serde_yaml::Value;
use std::path::Path;
use tracing::{debug, info};

/// Resolves the placement strategy written to `endpoint_snitch` from the
/// source's base value. Deployments layering a dynamic or composite snitch on
/// top of the base one plug in their own resolver.
pub type SnitchResolver = Box<dyn Fn(&str) -> String + Send + Sync>;

/// One-shot configuration tuner, invoked by the bootstrap orchestrator before
/// the database process starts.
pub struct Tuner {
    snitch_resolver: SnitchResolver,
}

impl Default for Tuner {
    fn default() -> Self {
        Self::new()
    }
}

impl Tuner {
    /// A tuner that writes the source's snitch unchanged.
    pub fn new() -> Self {
        Self {
            snitch_resolver: Box::new(|base| base.to_string()),
        }
    }

    /// A tuner with a custom placement-strategy resolver.
    pub fn with_snitch_resolver(snitch_resolver: SnitchResolver) -> Self {
        Self { snitch_resolver }
    }

    /// One full bootstrap tuning pass: load the document, merge every rule,
    /// persist it, then write the commit-log archive properties when enabled.
    pub fn tune_configuration(
        &self,
        source: &dyn ConfigSource,
        document_path: &Path,
        identity: &NodeIdentity,
    ) -> Result<(), TunerError> {
        let mut doc = document::load(document_path)?;
        self.apply(&mut doc, source, identity)?;

        info!(
            path = %document_path.display(),
            document = %document::render(&doc)?,
            "tuned configuration document"
        );
        document::write(document_path, &doc)?;

        archive::write_commitlog_archive_properties(source)?;
        Ok(())
    }

    /// Apply the fixed rule sequence to an in-memory document. Keys no rule
    /// touches keep their value and position.
    pub fn apply(
        &self,
        doc: &mut Document,
        source: &dyn ConfigSource,
        identity: &NodeIdentity,
    ) -> Result<(), TunerError> {
        document::set_str(doc, "cluster_name", &source.cluster_name());
        document::set_int(doc, "storage_port", i64::from(source.storage_port()));
        document::set_int(doc, "ssl_storage_port", i64::from(source.ssl_storage_port()));
        document::set_bool(doc, "start_rpc", source.rpc_enabled());
        document::set_int(doc, "rpc_port", i64::from(source.rpc_port()));
        document::set_bool(
            doc,
            "start_native_transport",
            source.native_transport_enabled(),
        );
        document::set_int(
            doc,
            "native_transport_port",
            i64::from(source.native_transport_port()),
        );
        document::set_str(doc, "listen_address", &identity.host_address);
        document::set_str(doc, "rpc_address", &identity.host_address);
        debug!(host = %identity.host_address, "applied network identity");

        // a restoring node must never attempt a fresh bootstrap join
        let auto_bootstrap = !source.restore_active();
        document::set_bool(doc, "auto_bootstrap", auto_bootstrap);
        debug!(auto_bootstrap, "applied bootstrap suppression");

        document::set_str(doc, "saved_caches_directory", &source.saved_caches_directory());
        document::set_str(doc, "commitlog_directory", &source.commitlog_directory());
        document::set_str_seq(doc, "data_file_directories", &source.data_file_directories());
        debug!("applied storage paths");

        let incremental = incremental_backups_enabled(source);
        document::set_bool(doc, "incremental_backups", incremental);
        debug!(incremental, "applied incremental backup flag");

        let snitch = (self.snitch_resolver)(&source.endpoint_snitch());
        document::set_str(doc, "endpoint_snitch", &snitch);
        debug!(snitch = %snitch, "applied endpoint snitch");

        document::set_int(
            doc,
            "in_memory_compaction_limit_in_mb",
            source.in_memory_compaction_limit_mb(),
        );
        document::set_int(
            doc,
            "compaction_throughput_mb_per_sec",
            source.compaction_throughput_mb(),
        );
        document::set_int(
            doc,
            "memtable_total_space_in_mb",
            source.memtable_total_space_mb(),
        );
        document::set_int(
            doc,
            "stream_throughput_outbound_megabits_per_sec",
            source.stream_throughput_mbits(),
        );
        document::set_bool(
            doc,
            "multithreaded_compaction",
            source.multithreaded_compaction(),
        );
        document::set_int(doc, "max_hint_window_in_ms", source.max_hint_window_ms());
        document::set_int(
            doc,
            "hinted_handoff_throttle_in_kb",
            source.hinted_handoff_throttle_kb(),
        );
        document::set_int(doc, "concurrent_reads", source.concurrent_reads());
        document::set_int(doc, "concurrent_writes", source.concurrent_writes());
        document::set_int(doc, "concurrent_compactors", source.concurrent_compactors());
        debug!("applied resource tuning scalars");

        let existing = document::str_value(doc, "partitioner").map(str::to_string);
        let resolved =
            partitioner::resolve_partitioner(existing.as_deref(), &source.partitioner());
        document::set_str(doc, "partitioner", &resolved);
        debug!(partitioner = %resolved, "applied partitioner merge");

        document::set_str(doc, "authenticator", &source.authenticator());
        document::set_str(doc, "authorizer", &source.authorizer());
        document::set_str(doc, "internode_compression", &source.internode_compression());
        document::set_bool(doc, "dynamic_snitch", source.dynamic_snitch());
        debug!("applied auth and transport strategies");

        caches::apply(doc, source);
        debug!("applied cache sizing");

        security::apply(doc, source)?;
        debug!("applied encryption options");

        set_seed_provider(doc, &identity.seed_provider_class)?;
        debug!(seed_provider = %identity.seed_provider_class, "applied seed discovery");

        // force to 1 until vnodes are properly supported
        document::set_int(doc, "num_tokens", 1);

        Ok(())
    }
}

/// Incremental backups run only when a backup hour is scheduled, incremental
/// backup is requested, and the node's rack is eligible. An empty rack list
/// means every rack is eligible.
fn incremental_backups_enabled(source: &dyn ConfigSource) -> bool {
    if source.backup_hour() < 0 || !source.incremental_backup() {
        return false;
    }
    let racks = source.backup_racks();
    racks.is_empty() || racks.contains(&source.rack())
}

/// Overwrite the class name of the first seed-provider entry.
fn set_seed_provider(doc: &mut Document, class_name: &str) -> Result<(), TunerError> {
    let key = Value::String("seed_provider".to_string());
    let entry = match doc.get_mut(&key) {
        Some(Value::Sequence(seq)) => seq.first_mut(),
        _ => {
            return Err(TunerError::Structure(
                "'seed_provider' sequence is missing".to_string(),
            ))
        }
    };

    match entry {
        Some(Value::Mapping(first)) => {
            document::set_str(first, "class_name", class_name);
            Ok(())
        }
        Some(_) => Err(TunerError::Structure(
            "first 'seed_provider' entry is not a mapping".to_string(),
        )),
        None => Err(TunerError::Structure(
            "'seed_provider' sequence is empty".to_string(),
        )),
    }
}

/// Flip the bootstrap flag in an existing document.
///
/// Independent read-mutate-write cycle used outside the main tuning flow, for
/// example to re-enable bootstrap once a restore completes.
pub fn set_auto_bootstrap(document_path: &Path, enabled: bool) -> Result<(), TunerError> {
    let mut doc = document::load(document_path)?;
    document::set_bool(&mut doc, "auto_bootstrap", enabled);
    info!(
        auto_bootstrap = enabled,
        path = %document_path.display(),
        "updated bootstrap flag"
    );
    document::write(document_path, &doc)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::TunerSettings;

    fn backup_source(hour: i32, incremental: bool, racks: &[&str], rack: &str) -> TunerSettings {
        TunerSettings {
            backup_hour: hour,
            incremental_backup: incremental,
            backup_racks: racks.iter().map(|r| r.to_string()).collect(),
            rack: rack.to_string(),
            ..TunerSettings::default()
        }
    }

    #[test]
    fn test_incremental_backup_boundary_matrix() {
        // (hour, incremental, racks, rack) across every boundary combination
        let cases = [
            (12, true, vec![], "1a", true),
            (12, true, vec!["1a"], "1a", true),
            (12, true, vec!["1b"], "1a", false),
            (12, false, vec![], "1a", false),
            (12, false, vec!["1a"], "1a", false),
            (12, false, vec!["1b"], "1a", false),
            (-1, true, vec![], "1a", false),
            (-1, true, vec!["1a"], "1a", false),
            (-1, true, vec!["1b"], "1a", false),
            (-1, false, vec![], "1a", false),
            (-1, false, vec!["1a"], "1a", false),
            (-1, false, vec!["1b"], "1a", false),
        ];

        for (hour, incremental, racks, rack, expected) in cases {
            let source = backup_source(hour, incremental, &racks, rack);
            assert_eq!(
                incremental_backups_enabled(&source),
                expected,
                "hour={hour} incremental={incremental} racks={racks:?} rack={rack}"
            );
        }
    }

    #[test]
    fn test_backup_hour_zero_is_scheduled() {
        let source = backup_source(0, true, &[], "1a");
        assert!(incremental_backups_enabled(&source));
    }

    #[test]
    fn test_seed_provider_class_name_is_overwritten() {
        let mut doc: Document = serde_yaml::from_str(
            "seed_provider:\n  - class_name: old.SeedProvider\n    parameters:\n      - seeds: \"127.0.0.1\"\n",
        )
        .unwrap();

        set_seed_provider(&mut doc, "com.example.DiscoverySeedProvider").unwrap();

        let seq = doc
            .get(&Value::String("seed_provider".to_string()))
            .and_then(Value::as_sequence)
            .unwrap();
        let first = seq[0].as_mapping().unwrap();
        assert_eq!(
            first.get(&Value::String("class_name".to_string())),
            Some(&Value::String("com.example.DiscoverySeedProvider".to_string()))
        );
        // sibling parameters entry survives
        assert!(first.contains_key(&Value::String("parameters".to_string())));
    }

    #[test]
    fn test_missing_seed_provider_is_structural_error() {
        let mut doc = Document::new();
        assert!(matches!(
            set_seed_provider(&mut doc, "x"),
            Err(TunerError::Structure(_))
        ));
    }

    #[test]
    fn test_empty_seed_provider_sequence_is_structural_error() {
        let mut doc: Document = serde_yaml::from_str("seed_provider: []\n").unwrap();
        assert!(matches!(
            set_seed_provider(&mut doc, "x"),
            Err(TunerError::Structure(_))
        ));
    }

    #[test]
    fn test_scalar_seed_provider_entry_is_structural_error() {
        let mut doc: Document = serde_yaml::from_str("seed_provider:\n  - just-a-string\n").unwrap();
        assert!(matches!(
            set_seed_provider(&mut doc, "x"),
            Err(TunerError::Structure(_))
        ));
    }

    #[test]
    fn test_snitch_resolver_wraps_base_value() {
        let tuner = Tuner::with_snitch_resolver(Box::new(|base| {
            format!("com.example.CompositeSnitch({base})")
        }));
        let mut doc: Document = serde_yaml::from_str(
            "seed_provider:\n  - class_name: old.SeedProvider\n\
             client_encryption_options:\n  enabled: false\n\
             server_encryption_options:\n  internode_encryption: none\n",
        )
        .unwrap();
        let source = TunerSettings::default();
        let identity = NodeIdentity {
            host_address: "10.0.0.1".to_string(),
            seed_provider_class: "com.example.SeedProvider".to_string(),
        };

        tuner.apply(&mut doc, &source, &identity).unwrap();

        assert_eq!(
            document::str_value(&doc, "endpoint_snitch"),
            Some("com.example.CompositeSnitch(org.apache.cassandra.locator.SimpleSnitch)")
        );
    }
}
