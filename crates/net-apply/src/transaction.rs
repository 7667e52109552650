//! Transactional application of a single interface configuration

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use ifcfg_network_config::{FileStore, IfcfgParser, InterfaceConfig, PathResolver};
use ifcfg_network_core::error::ConfigError;
use ifcfg_network_core::{NetworkError, Result};

use crate::rollback::Snapshot;
use crate::service::ServiceController;

/// Transaction states
///
/// `Idle → Stopping → Writing → Starting → Committed`, or from `Starting`
/// (and `Writing` on an I/O error) through `RollingBack` to `RolledBack`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TransactionState {
    /// Transaction created but not started
    Idle,
    /// Interface is being brought down
    Stopping,
    /// New configuration is being written
    Writing,
    /// Interface is being brought up with the new configuration
    Starting,
    /// Interface came up with the new configuration
    Committed,
    /// Snapshot is being restored
    RollingBack,
    /// Snapshot restored and restart attempted
    RolledBack,
    /// Interface could not be brought down; nothing was written
    Aborted,
    /// Snapshot could not be written back
    Failed,
}

/// Record of one save transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique transaction ID
    pub id: String,
    /// Interface the transaction applies to
    pub interface: String,
    /// Timestamp when transaction was created
    pub timestamp: u64,
    /// Current transaction state
    pub state: TransactionState,
    /// md5 of the file contents before the transaction
    pub snapshot_checksum: Option<String>,
    /// Whether the file read back identical to the snapshot after a rollback
    pub restore_verified: Option<bool>,
}

static TRANSACTION_SEQ: AtomicU64 = AtomicU64::new(0);

impl Transaction {
    fn new(interface: &str) -> Self {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        let seq = TRANSACTION_SEQ.fetch_add(1, Ordering::Relaxed);

        Self {
            id: format!(
                "txn_{}_{}_{}_{}",
                interface,
                now.as_millis(),
                std::process::id(),
                seq
            ),
            interface: interface.to_string(),
            timestamp: now.as_secs(),
            state: TransactionState::Idle,
            snapshot_checksum: None,
            restore_verified: None,
        }
    }
}

/// Per-interface locks shared by every applier in the process.
///
/// Two transactions on the same interface would race on both the file and the
/// service state, so `save` holds the interface lock from stop to final start.
/// Entries nobody holds are dropped whenever a lock is requested.
#[derive(Debug, Clone, Default)]
pub struct InterfaceLocks {
    locks: Arc<Mutex<HashMap<String, Arc<Mutex<()>>>>>,
}

impl InterfaceLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the lock for an interface, creating it on first use
    pub async fn lock_for(&self, interface: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        locks.retain(|_, lock| Arc::strong_count(lock) > 1);
        locks
            .entry(interface.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Number of interfaces currently tracked
    pub async fn len(&self) -> usize {
        self.locks.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

/// Configuration of one interface, backed by its ifcfg file.
///
/// Setters change the in-memory configuration only. `save` and
/// `apply_static` push it to disk and restart the interface, putting the old
/// file back when the interface does not come up.
pub struct InterfaceApplier {
    interface: String,
    path: PathBuf,
    config: InterfaceConfig,
    parser: IfcfgParser,
    store: Arc<dyn FileStore>,
    service: Arc<dyn ServiceController>,
    locks: InterfaceLocks,
    /// Transaction log directory
    transaction_log_dir: Option<PathBuf>,
    last_transaction: Option<Transaction>,
}

impl InterfaceApplier {
    /// Load the configuration of `interface`.
    ///
    /// Fails with `MissingConfigurationFile` when the interface has no ifcfg
    /// file.
    pub async fn open(
        interface: &str,
        resolver: &dyn PathResolver,
        store: Arc<dyn FileStore>,
        service: Arc<dyn ServiceController>,
    ) -> Result<Self> {
        let path = resolver.resolve(interface)?;

        if !store.exists(&path).await {
            return Err(NetworkError::Configuration(
                ConfigError::MissingConfigurationFile {
                    path: path.display().to_string(),
                },
            ));
        }

        let raw = store.read(&path).await?;
        let content = String::from_utf8(raw).map_err(|_| {
            NetworkError::Configuration(ConfigError::Encoding {
                path: path.display().to_string(),
            })
        })?;

        let parser = IfcfgParser::new();
        let config = parser.parse(&content);
        debug!(
            "Loaded {} keys for interface {} from {:?}",
            config.len(),
            interface,
            path
        );

        Ok(Self {
            interface: interface.to_string(),
            path,
            config,
            parser,
            store,
            service,
            locks: InterfaceLocks::new(),
            transaction_log_dir: None,
            last_transaction: None,
        })
    }

    /// Share interface locks with other appliers
    pub fn with_locks(mut self, locks: InterfaceLocks) -> Self {
        self.locks = locks;
        self
    }

    /// Record transaction state changes as JSON lines in `dir`
    pub fn with_transaction_log_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.transaction_log_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    pub fn interface(&self) -> &str {
        &self.interface
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current in-memory configuration
    pub fn config(&self) -> &InterfaceConfig {
        &self.config
    }

    /// Most recent save transaction, if any
    pub fn last_transaction(&self) -> Option<&Transaction> {
        self.last_transaction.as_ref()
    }

    pub fn set_address(&mut self, ip: &str) -> Result<()> {
        Ok(self.config.set_address(ip)?)
    }

    pub fn set_gateway(&mut self, ip: &str) -> Result<()> {
        Ok(self.config.set_gateway(ip)?)
    }

    pub fn set_netmask(&mut self, mask: &str) -> Result<()> {
        Ok(self.config.set_netmask(mask)?)
    }

    pub fn set_dns<S: AsRef<str>>(&mut self, servers: &[S]) {
        self.config.set_dns(servers)
    }

    pub fn set_search_order<S: AsRef<str>>(&mut self, domains: &[S]) {
        self.config.set_search_order(domains)
    }

    pub fn enable_dhcp(&mut self) {
        self.config.enable_dhcp()
    }

    /// Configure static addressing and save.
    ///
    /// All inputs are validated against a staged copy first. A validation
    /// error leaves the in-memory configuration untouched and nothing is
    /// written.
    pub async fn apply_static<S: AsRef<str>>(
        &mut self,
        ip: &str,
        mask: &str,
        gateway: &str,
        dns: &[S],
        search: Option<&[S]>,
    ) -> Result<bool> {
        let mut staged = self.config.clone();
        staged.set_address(ip)?;
        staged.set_netmask(mask)?;
        staged.set_gateway(gateway)?;
        staged.set_dns(dns);
        if let Some(domains) = search {
            staged.set_search_order(domains);
        }

        self.config = staged;
        self.save().await
    }

    /// Write the configuration and restart the interface.
    ///
    /// Returns `Ok(false)` when the interface could not be stopped (nothing is
    /// written) or did not start with the new file (the previous file is put
    /// back and a restart attempted). I/O errors are returned as errors.
    pub async fn save(&mut self) -> Result<bool> {
        let lock = self.locks.lock_for(&self.interface).await;
        let _guard = lock.lock().await;

        let mut transaction = Transaction::new(&self.interface);
        let result = self.run_transaction(&mut transaction).await;

        match &result {
            Ok(true) => info!("Committed transaction {}", transaction.id),
            Ok(false) => warn!(
                "Transaction {} ended in state {:?}",
                transaction.id, transaction.state
            ),
            Err(e) => error!("Transaction {} failed: {}", transaction.id, e),
        }

        self.last_transaction = Some(transaction);
        result
    }

    async fn run_transaction(&self, transaction: &mut Transaction) -> Result<bool> {
        let snapshot = Snapshot::capture(self.store.as_ref(), &self.path).await?;
        transaction.snapshot_checksum = Some(snapshot.checksum().to_string());

        self.transition(transaction, TransactionState::Stopping).await;
        if !self.service.stop(&self.interface).await {
            warn!(
                "Failed to bring down interface {}, leaving configuration untouched",
                self.interface
            );
            self.transition(transaction, TransactionState::Aborted).await;
            return Ok(false);
        }

        self.transition(transaction, TransactionState::Writing).await;
        let content = self.parser.generate(&self.config);
        if let Err(e) = self.store.write(&self.path, content.as_bytes()).await {
            error!("Failed to write {:?}: {}", self.path, e);
            self.roll_back(transaction, &snapshot).await?;
            return Err(e);
        }

        self.transition(transaction, TransactionState::Starting).await;
        if self.service.start(&self.interface).await {
            self.transition(transaction, TransactionState::Committed).await;
            return Ok(true);
        }

        warn!(
            "Interface {} did not come up with the new configuration, rolling back",
            self.interface
        );
        self.roll_back(transaction, &snapshot).await?;
        Ok(false)
    }

    /// Put the snapshot back and try to bring the interface up again.
    ///
    /// Only a failed write of the snapshot is an error. A read-back that
    /// fails or does not match is logged and the restart still happens.
    async fn roll_back(&self, transaction: &mut Transaction, snapshot: &Snapshot) -> Result<()> {
        self.transition(transaction, TransactionState::RollingBack).await;

        if let Err(e) = snapshot.restore(self.store.as_ref()).await {
            error!(
                "Failed to restore {:?} for transaction {}: {}",
                self.path, transaction.id, e
            );
            self.transition(transaction, TransactionState::Failed).await;
            return Err(e);
        }

        match snapshot.verify(self.store.as_ref()).await {
            Ok(()) => transaction.restore_verified = Some(true),
            Err(e) => {
                error!(
                    "Could not verify restored {:?} for transaction {}: {}",
                    self.path, transaction.id, e
                );
                transaction.restore_verified = Some(false);
            }
        }

        // Best effort; the outcome is already a failure
        if !self.service.start(&self.interface).await {
            warn!(
                "Interface {} did not come back up with the previous configuration",
                self.interface
            );
        }

        self.transition(transaction, TransactionState::RolledBack).await;
        info!("Rolled back transaction {}", transaction.id);
        Ok(())
    }

    /// Update transaction state
    async fn transition(&self, transaction: &mut Transaction, state: TransactionState) {
        transaction.state = state;
        debug!("Transaction {} state changed to {:?}", transaction.id, state);

        if let Err(e) = self.log_transaction(transaction).await {
            warn!("Failed to log transaction {}: {}", transaction.id, e);
        }
    }

    /// Append transaction event to the log, if one is configured
    async fn log_transaction(&self, transaction: &Transaction) -> Result<()> {
        let log_dir = match &self.transaction_log_dir {
            Some(dir) => dir,
            None => return Ok(()),
        };

        let log_entry = TransactionLogEntry {
            timestamp: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap_or_default()
                .as_secs(),
            transaction_id: &transaction.id,
            interface: &transaction.interface,
            state: transaction.state,
            message: format!("State changed to {:?}", transaction.state),
        };
        let log_line = format!("{}\n", serde_json::to_string(&log_entry)?);

        fs::create_dir_all(log_dir).await?;
        let log_file = log_dir.join(format!("{}.log", transaction.id));
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .await?;
        file.write_all(log_line.as_bytes()).await?;

        Ok(())
    }
}

/// One line of a transaction log
#[derive(Serialize)]
struct TransactionLogEntry<'a> {
    timestamp: u64,
    transaction_id: &'a str,
    interface: &'a str,
    state: TransactionState,
    message: String,
}
