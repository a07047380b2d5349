//! Filesystem persistence for resumable wizard sessions.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::answers::AnswerEntry;
use crate::config::{self, WizardConfig};
use crate::navigation::NavigationPosition;

/// Everything needed to resume a session where the applicant left off.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub session_id: Uuid,
    pub job_type: String,
    #[serde(default)]
    pub position: Option<NavigationPosition>,
    #[serde(default)]
    pub answers: Vec<Vec<AnswerEntry>>,
    #[serde(default)]
    pub skipped: Vec<u32>,
    pub saved_at: DateTime<Utc>,
}

/// Result returned after writing a snapshot.
#[derive(Debug, Clone)]
pub struct SnapshotWriteOutcome {
    pub path: PathBuf,
    pub hash: String,
}

#[derive(Debug, Clone)]
pub struct SnapshotStore {
    root: PathBuf,
}

impl SnapshotStore {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn from_config(config: &WizardConfig) -> Result<Self> {
        Ok(Self::new(config::snapshot_dir(config)?))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, session_id: Uuid) -> PathBuf {
        self.root.join(format!("{session_id}.json"))
    }

    pub fn save(&self, snapshot: &SessionSnapshot) -> Result<SnapshotWriteOutcome> {
        fs::create_dir_all(&self.root)
            .with_context(|| format!("Failed creating snapshot directory {:?}", self.root))?;
        let path = self.path_for(snapshot.session_id);
        let payload = serde_json::to_vec_pretty(snapshot)
            .with_context(|| format!("Failed serializing session snapshot {:?}", path))?;
        let hash = compute_hash(&payload);
        let mut file = fs::File::create(&path)
            .with_context(|| format!("Failed opening session snapshot {:?}", path))?;
        file.write_all(&payload)?;
        tracing::debug!(session_id = %snapshot.session_id, %hash, "session snapshot saved");
        Ok(SnapshotWriteOutcome { path, hash })
    }

    pub fn load(&self, session_id: Uuid) -> Result<Option<SessionSnapshot>> {
        let path = self.path_for(session_id);
        if !path.exists() {
            return Ok(None);
        }
        let data =
            fs::read(&path).with_context(|| format!("Failed reading session snapshot {:?}", path))?;
        let snapshot = serde_json::from_slice(&data)
            .with_context(|| format!("Failed parsing session snapshot {:?}", path))?;
        Ok(Some(snapshot))
    }

    /// Returns whether a snapshot existed.
    pub fn remove(&self, session_id: Uuid) -> Result<bool> {
        let path = self.path_for(session_id);
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(&path)
            .with_context(|| format!("Failed removing session snapshot {:?}", path))?;
        Ok(true)
    }
}

/// Lowercase hex SHA-256 of the provided bytes.
pub fn compute_hash(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    format!("{:x}", digest)
}
