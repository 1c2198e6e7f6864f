//! The decision ledger.
//!
//! Committed advice is durable and append-only: records are written once
//! and never mutated; repair is recorded as new entries. Two
//! implementations are bundled - an in-memory ledger for tests and
//! ephemeral use, and a sled-backed ledger for audit trails that must
//! survive restarts.

use crate::advice::AdviceWithProof;
use crate::proof::Proof;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use std::sync::Mutex;
use thiserror::Error;
use uuid::Uuid;

/// Tree name for committed advice records.
const RECORD_TREE: &str = "advice_records";

/// Errors from ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The backing store failed.
    #[error("ledger storage error: {0}")]
    Storage(String),

    /// A record could not be serialized.
    #[error("ledger serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Persistence was mandatory but the write failed.
    #[error("mandatory ledger write failed: {0}")]
    WriteRequired(String),
}

impl From<sled::Error> for LedgerError {
    fn from(err: sled::Error) -> Self {
        LedgerError::Storage(err.to_string())
    }
}

/// Result type for ledger operations.
pub type Result<T> = std::result::Result<T, LedgerError>;

/// A durable decision record, the only artifact that outlives a request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerRecord {
    /// Record identifier, `advice:<draft id>`.
    pub id: String,
    /// Blended risk at decision time.
    pub risk: f64,
    /// Full ordered proof set, tokens included.
    pub proofs: Vec<Proof>,
    /// Externality and harms snapshot.
    pub assessment: Value,
    /// Decision timestamp, epoch seconds.
    pub decided_at: f64,
}

impl LedgerRecord {
    /// Builds the record for a piece of proof-carrying advice.
    pub fn from_advice(awp: &AdviceWithProof) -> Self {
        Self {
            id: format!("advice:{}", awp.id),
            risk: awp.risk,
            proofs: awp.proofs.clone(),
            assessment: awp.assessment.clone(),
            decided_at: awp.decided_at,
        }
    }
}

/// Write-once persistence for decision records.
pub trait DecisionLedger: Send + Sync {
    /// Persists a record and returns its ledger reference.
    fn register(&self, record: &LedgerRecord) -> Result<String>;
}

/// In-memory ledger, for tests and ephemeral runs.
#[derive(Debug, Default)]
pub struct MemoryLedger {
    records: Mutex<Vec<(String, LedgerRecord)>>,
}

impl MemoryLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of committed records.
    pub fn len(&self) -> usize {
        self.records.lock().expect("memory ledger poisoned").len()
    }

    /// Whether the ledger is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fetches a committed record by ledger reference.
    pub fn get(&self, ledger_id: &str) -> Option<LedgerRecord> {
        self.records
            .lock()
            .expect("memory ledger poisoned")
            .iter()
            .find(|(id, _)| id == ledger_id)
            .map(|(_, record)| record.clone())
    }
}

impl DecisionLedger for MemoryLedger {
    fn register(&self, record: &LedgerRecord) -> Result<String> {
        let ledger_id = Uuid::new_v4().to_string();
        self.records
            .lock()
            .expect("memory ledger poisoned")
            .push((ledger_id.clone(), record.clone()));
        Ok(ledger_id)
    }
}

/// Sled-backed ledger for durable audit trails.
#[derive(Clone)]
pub struct SledLedger {
    records: sled::Tree,
}

impl SledLedger {
    /// Opens or creates a ledger database at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let db = sled::open(path)?;
        let records = db.open_tree(RECORD_TREE)?;
        Ok(Self { records })
    }

    /// Creates an in-memory sled ledger, for tests.
    pub fn temporary() -> Result<Self> {
        let db = sled::Config::new().temporary(true).open()?;
        let records = db.open_tree(RECORD_TREE)?;
        Ok(Self { records })
    }

    /// Fetches a committed record by ledger reference.
    pub fn get(&self, ledger_id: &str) -> Result<Option<LedgerRecord>> {
        match self.records.get(ledger_id.as_bytes())? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Number of committed records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the ledger is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl DecisionLedger for SledLedger {
    fn register(&self, record: &LedgerRecord) -> Result<String> {
        let ledger_id = Uuid::new_v4().to_string();
        let bytes = serde_json::to_vec(record)?;
        self.records.insert(ledger_id.as_bytes(), bytes)?;
        self.records
            .flush()
            .map_err(|e| LedgerError::Storage(e.to_string()))?;
        Ok(ledger_id)
    }
}
