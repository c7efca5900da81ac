//! File/environment-backed implementation of [`ConfigSource`].
//!
//! Settings are layered: Cassandra-flavored defaults, then an optional TOML
//! file, then `CASSETTE_*` environment variables. The struct doubles as the
//! test double for the engine since every field is public.

use crate::error::TunerError;
use crate::source::ConfigSource;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Declarative desired settings for one node.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TunerSettings {
    pub cluster_name: String,
    pub storage_port: u16,
    pub ssl_storage_port: u16,
    pub rpc_enabled: bool,
    pub rpc_port: u16,
    pub native_transport_enabled: bool,
    pub native_transport_port: u16,

    /// Snapshot selector a restore is running from; empty means no restore is
    /// in progress.
    pub restore_snapshot: String,

    pub saved_caches_directory: String,
    pub commitlog_directory: String,
    pub data_file_directories: Vec<String>,

    pub backup_hour: i32,
    pub incremental_backup: bool,
    pub backup_racks: Vec<String>,
    pub rack: String,

    pub endpoint_snitch: String,
    pub in_memory_compaction_limit_mb: i64,
    pub compaction_throughput_mb: i64,
    pub partitioner: String,
    pub memtable_total_space_mb: i64,
    pub stream_throughput_mbits: i64,
    pub multithreaded_compaction: bool,
    pub max_hint_window_ms: i64,
    pub hinted_handoff_throttle_kb: i64,
    pub authenticator: String,
    pub authorizer: String,
    pub internode_compression: String,
    pub dynamic_snitch: bool,
    pub concurrent_reads: i64,
    pub concurrent_writes: i64,
    pub concurrent_compactors: i64,

    pub key_cache_size_mb: Option<String>,
    pub key_cache_keys_to_save: Option<String>,
    pub row_cache_size_mb: Option<String>,
    pub row_cache_keys_to_save: Option<String>,

    pub client_ssl_enabled: bool,
    pub internode_encryption: String,

    pub commitlog_backup_enabled: bool,
    pub commitlog_archive_command: String,
    pub commitlog_restore_command: String,
    pub commitlog_restore_directories: String,
    pub commitlog_restore_point_in_time: String,

    pub install_dir: PathBuf,
}

impl Default for TunerSettings {
    fn default() -> Self {
        Self {
            cluster_name: "cass_cluster".to_string(),
            storage_port: 7000,
            ssl_storage_port: 7001,
            rpc_enabled: true,
            rpc_port: 9160,
            native_transport_enabled: true,
            native_transport_port: 9042,
            restore_snapshot: String::new(),
            saved_caches_directory: "/var/lib/cassandra/saved_caches".to_string(),
            commitlog_directory: "/var/lib/cassandra/commitlog".to_string(),
            data_file_directories: vec!["/var/lib/cassandra/data".to_string()],
            backup_hour: 12,
            incremental_backup: true,
            backup_racks: Vec::new(),
            rack: String::new(),
            endpoint_snitch: "org.apache.cassandra.locator.SimpleSnitch".to_string(),
            in_memory_compaction_limit_mb: 128,
            compaction_throughput_mb: 8,
            partitioner: "org.apache.cassandra.dht.RandomPartitioner".to_string(),
            memtable_total_space_mb: 1024,
            stream_throughput_mbits: 400,
            multithreaded_compaction: false,
            max_hint_window_ms: 10_800_000,
            hinted_handoff_throttle_kb: 1024,
            authenticator: "org.apache.cassandra.auth.AllowAllAuthenticator".to_string(),
            authorizer: "org.apache.cassandra.auth.AllowAllAuthorizer".to_string(),
            internode_compression: "dc".to_string(),
            dynamic_snitch: true,
            concurrent_reads: 32,
            concurrent_writes: 32,
            concurrent_compactors: 1,
            key_cache_size_mb: None,
            key_cache_keys_to_save: None,
            row_cache_size_mb: None,
            row_cache_keys_to_save: None,
            client_ssl_enabled: false,
            internode_encryption: "none".to_string(),
            commitlog_backup_enabled: false,
            commitlog_archive_command: String::new(),
            commitlog_restore_command: String::new(),
            commitlog_restore_directories: String::new(),
            commitlog_restore_point_in_time: String::new(),
            install_dir: PathBuf::from("/etc/cassandra"),
        }
    }
}

impl TunerSettings {
    /// Load settings from an optional TOML file with `CASSETTE_*` environment
    /// overrides on top of the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, TunerError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }
        let merged = builder
            .add_source(Environment::with_prefix("CASSETTE").separator("__"))
            .build()?;
        let settings: TunerSettings = merged.try_deserialize()?;
        Ok(settings)
    }
}

impl ConfigSource for TunerSettings {
    fn cluster_name(&self) -> String {
        self.cluster_name.clone()
    }

    fn storage_port(&self) -> u16 {
        self.storage_port
    }

    fn ssl_storage_port(&self) -> u16 {
        self.ssl_storage_port
    }

    fn rpc_enabled(&self) -> bool {
        self.rpc_enabled
    }

    fn rpc_port(&self) -> u16 {
        self.rpc_port
    }

    fn native_transport_enabled(&self) -> bool {
        self.native_transport_enabled
    }

    fn native_transport_port(&self) -> u16 {
        self.native_transport_port
    }

    fn restore_active(&self) -> bool {
        !self.restore_snapshot.is_empty()
    }

    fn saved_caches_directory(&self) -> String {
        self.saved_caches_directory.clone()
    }

    fn commitlog_directory(&self) -> String {
        self.commitlog_directory.clone()
    }

    fn data_file_directories(&self) -> Vec<String> {
        self.data_file_directories.clone()
    }

    fn backup_hour(&self) -> i32 {
        self.backup_hour
    }

    fn incremental_backup(&self) -> bool {
        self.incremental_backup
    }

    fn backup_racks(&self) -> Vec<String> {
        self.backup_racks.clone()
    }

    fn rack(&self) -> String {
        self.rack.clone()
    }

    fn endpoint_snitch(&self) -> String {
        self.endpoint_snitch.clone()
    }

    fn in_memory_compaction_limit_mb(&self) -> i64 {
        self.in_memory_compaction_limit_mb
    }

    fn compaction_throughput_mb(&self) -> i64 {
        self.compaction_throughput_mb
    }

    fn partitioner(&self) -> String {
        self.partitioner.clone()
    }

    fn memtable_total_space_mb(&self) -> i64 {
        self.memtable_total_space_mb
    }

    fn stream_throughput_mbits(&self) -> i64 {
        self.stream_throughput_mbits
    }

    fn multithreaded_compaction(&self) -> bool {
        self.multithreaded_compaction
    }

    fn max_hint_window_ms(&self) -> i64 {
        self.max_hint_window_ms
    }

    fn hinted_handoff_throttle_kb(&self) -> i64 {
        self.hinted_handoff_throttle_kb
    }

    fn authenticator(&self) -> String {
        self.authenticator.clone()
    }

    fn authorizer(&self) -> String {
        self.authorizer.clone()
    }

    fn internode_compression(&self) -> String {
        self.internode_compression.clone()
    }

    fn dynamic_snitch(&self) -> bool {
        self.dynamic_snitch
    }

    fn concurrent_reads(&self) -> i64 {
        self.concurrent_reads
    }

    fn concurrent_writes(&self) -> i64 {
        self.concurrent_writes
    }

    fn concurrent_compactors(&self) -> i64 {
        self.concurrent_compactors
    }

    fn key_cache_size_mb(&self) -> Option<String> {
        self.key_cache_size_mb.clone()
    }

    fn key_cache_keys_to_save(&self) -> Option<String> {
        self.key_cache_keys_to_save.clone()
    }

    fn row_cache_size_mb(&self) -> Option<String> {
        self.row_cache_size_mb.clone()
    }

    fn row_cache_keys_to_save(&self) -> Option<String> {
        self.row_cache_keys_to_save.clone()
    }

    fn client_ssl_enabled(&self) -> bool {
        self.client_ssl_enabled
    }

    fn internode_encryption(&self) -> String {
        self.internode_encryption.clone()
    }

    fn commitlog_backup_enabled(&self) -> bool {
        self.commitlog_backup_enabled
    }

    fn commitlog_archive_command(&self) -> String {
        self.commitlog_archive_command.clone()
    }

    fn commitlog_restore_command(&self) -> String {
        self.commitlog_restore_command.clone()
    }

    fn commitlog_restore_directories(&self) -> String {
        self.commitlog_restore_directories.clone()
    }

    fn commitlog_restore_point_in_time(&self) -> String {
        self.commitlog_restore_point_in_time.clone()
    }

    fn install_dir(&self) -> PathBuf {
        self.install_dir.clone()
    }
}
