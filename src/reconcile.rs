/*!
 * Per-file reconciliation against the remote container
 *
 * Each file moves through a small state machine:
 *
 * ```text
 *            manifest lookup            existence check
 *  file ──► Keyed   (fingerprinted) ──► Present ──► Skipped
 *       └─► Unkeyed (original name) ──► Missing ──► Uploaded
 * ```
 *
 * Keyed files always get their manifest URL rewritten, whichever terminal
 * state they reach. Files are processed one at a time so the tally and the
 * manifest have a single writer.
 */

use crate::backend::{content_type_for, AssetStore};
use crate::collect::AssetFile;
use crate::error::Result;
use crate::fingerprint::{fingerprint, fingerprinted_name};
use bytes::Bytes;
use cdn_core_manifest::Manifest;
use serde::Serialize;
use std::fs::File;
use std::io::BufReader;
use tracing::{debug, info};

/// Whether a file is tracked by the manifest
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Key present in the manifest: fingerprint the name and rewrite the URL
    Keyed,
    /// Not referenced: upload under the original name, manifest untouched
    Unkeyed,
}

impl Disposition {
    pub fn of(key: &str, manifest: &Manifest) -> Self {
        if manifest.contains(key) {
            Disposition::Keyed
        } else {
            Disposition::Unkeyed
        }
    }
}

/// Result of the existence check for a candidate blob name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteState {
    Present,
    Missing,
}

impl RemoteState {
    pub fn from_exists(exists: bool) -> Self {
        if exists {
            RemoteState::Present
        } else {
            RemoteState::Missing
        }
    }

    /// Terminal state reached from this remote state
    pub fn outcome(self) -> Outcome {
        match self {
            RemoteState::Present => Outcome::Skipped,
            RemoteState::Missing => Outcome::Uploaded,
        }
    }
}

/// Terminal state of one file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Uploaded,
    Skipped,
}

/// Decision for one file before any remote call is made
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePlan {
    /// Manifest key (`/` + relative path)
    pub key: String,
    pub disposition: Disposition,
    /// Blob name to check and upload under
    pub blob_name: String,
}

impl FilePlan {
    /// Plan `file`, hashing its contents when the manifest tracks it
    pub fn for_file(file: &AssetFile, manifest: &Manifest) -> Result<Self> {
        let key = file.key();
        let disposition = Disposition::of(&key, manifest);

        let blob_name = match disposition {
            Disposition::Keyed => {
                let reader = BufReader::new(File::open(&file.path)?);
                fingerprinted_name(&file.relative, &fingerprint(reader)?)
            }
            Disposition::Unkeyed => file.relative.clone(),
        };

        Ok(Self {
            key,
            disposition,
            blob_name,
        })
    }

    /// URL to record in the manifest, if this file is tracked
    pub fn manifest_url(&self, base_url: &str) -> Option<String> {
        match self.disposition {
            Disposition::Keyed => Some(format!("{}{}", base_url, self.blob_name)),
            Disposition::Unkeyed => None,
        }
    }
}

/// Uploaded/skipped counters for one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunTally {
    pub uploaded: usize,
    pub skipped: usize,
}

impl RunTally {
    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Uploaded => self.uploaded += 1,
            Outcome::Skipped => self.skipped += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.uploaded + self.skipped
    }
}

/// Summary of a completed run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    #[serde(flatten)]
    pub tally: RunTally,
    /// Manifest keys that never received a URL
    pub unresolved: Vec<String>,
    /// Uploads were simulated and the manifest was not saved
    pub dry_run: bool,
}

/// Drives one reconciliation pass against an [`AssetStore`]
pub struct Reconciler<'a, S: AssetStore + ?Sized> {
    store: &'a S,
    base_url: &'a str,
    dry_run: bool,
}

impl<'a, S: AssetStore + ?Sized> Reconciler<'a, S> {
    /// `base_url` is prefixed verbatim to blob names when rewriting the manifest
    pub fn new(store: &'a S, base_url: &'a str) -> Self {
        Self {
            store,
            base_url,
            dry_run: false,
        }
    }

    /// Check existence but never upload
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Reconcile a single file, updating `manifest` if the file is tracked
    pub async fn reconcile_file(&self, file: &AssetFile, manifest: &mut Manifest) -> Result<Outcome> {
        let plan = FilePlan::for_file(file, manifest)?;
        debug!(
            key = %plan.key,
            blob = %plan.blob_name,
            disposition = ?plan.disposition,
            "Planned asset"
        );

        let remote = RemoteState::from_exists(self.store.exists(&plan.blob_name).await?);
        let outcome = remote.outcome();

        if outcome == Outcome::Uploaded {
            if self.dry_run {
                info!("Would upload {} to {}", plan.key, plan.blob_name);
            } else {
                info!("Uploading {} to {}", plan.key, plan.blob_name);
                let content = Bytes::from(tokio::fs::read(&file.path).await?);
                self.store
                    .upload(&plan.blob_name, content, &content_type_for(&plan.blob_name))
                    .await?;
            }
        } else {
            debug!(blob = %plan.blob_name, "Already present, skipping");
        }

        if let Some(url) = plan.manifest_url(self.base_url) {
            manifest.set(plan.key, url);
        }

        Ok(outcome)
    }

    /// Reconcile every file in `files`, aborting on the first error
    pub async fn run<I>(&self, files: I, manifest: &mut Manifest) -> Result<SyncReport>
    where
        I: IntoIterator<Item = Result<AssetFile>>,
    {
        let mut tally = RunTally::default();

        for file in files {
            let outcome = self.reconcile_file(&file?, manifest).await?;
            tally.record(outcome);
        }

        let unresolved: Vec<String> = manifest.unresolved().map(str::to_string).collect();
        for key in &unresolved {
            debug!(key = %key, "Manifest entry was not resolved to a URL");
        }

        Ok(SyncReport {
            tally,
            unresolved,
            dry_run: self.dry_run,
        })
    }
}
