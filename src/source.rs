//! The tunable source and node identity consumed by the tuning engine.

use std::path::PathBuf;

/// Runtime identity of the node being tuned, discovered by the caller.
#[derive(Debug, Clone)]
pub struct NodeIdentity {
    /// Address used for both `listen_address` and `rpc_address`.
    pub host_address: String,
    /// Class name written into the first `seed_provider` entry.
    pub seed_provider_class: String,
}

/// Read-only accessor surface for every tunable the engine writes.
///
/// Implementations are pure and synchronous. Optional accessors return `None`
/// to suppress the corresponding document write; `None` is distinct from an
/// empty string.
pub trait ConfigSource {
    fn cluster_name(&self) -> String;
    fn storage_port(&self) -> u16;
    fn ssl_storage_port(&self) -> u16;
    fn rpc_enabled(&self) -> bool;
    fn rpc_port(&self) -> u16;
    fn native_transport_enabled(&self) -> bool;
    fn native_transport_port(&self) -> u16;

    /// True while the node is recovering from a backup. A restoring node must
    /// never attempt a fresh bootstrap join.
    fn restore_active(&self) -> bool;

    fn saved_caches_directory(&self) -> String;
    fn commitlog_directory(&self) -> String;
    fn data_file_directories(&self) -> Vec<String>;

    /// Hour of the daily snapshot; negative disables scheduled backups.
    fn backup_hour(&self) -> i32;
    fn incremental_backup(&self) -> bool;
    /// Racks eligible for backup; empty means all racks.
    fn backup_racks(&self) -> Vec<String>;
    fn rack(&self) -> String;

    fn endpoint_snitch(&self) -> String;
    fn in_memory_compaction_limit_mb(&self) -> i64;
    fn compaction_throughput_mb(&self) -> i64;
    fn partitioner(&self) -> String;
    fn memtable_total_space_mb(&self) -> i64;
    fn stream_throughput_mbits(&self) -> i64;
    fn multithreaded_compaction(&self) -> bool;
    fn max_hint_window_ms(&self) -> i64;
    fn hinted_handoff_throttle_kb(&self) -> i64;
    fn authenticator(&self) -> String;
    fn authorizer(&self) -> String;
    fn internode_compression(&self) -> String;
    fn dynamic_snitch(&self) -> bool;
    fn concurrent_reads(&self) -> i64;
    fn concurrent_writes(&self) -> i64;
    fn concurrent_compactors(&self) -> i64;

    fn key_cache_size_mb(&self) -> Option<String>;
    fn key_cache_keys_to_save(&self) -> Option<String>;
    fn row_cache_size_mb(&self) -> Option<String>;
    fn row_cache_keys_to_save(&self) -> Option<String>;

    fn client_ssl_enabled(&self) -> bool;
    fn internode_encryption(&self) -> String;

    fn commitlog_backup_enabled(&self) -> bool;
    fn commitlog_archive_command(&self) -> String;
    fn commitlog_restore_command(&self) -> String;
    fn commitlog_restore_directories(&self) -> String;
    fn commitlog_restore_point_in_time(&self) -> String;

    /// Database installation root; the archive properties file lives under it.
    fn install_dir(&self) -> PathBuf;
}
