/*!
 * One complete sync run: load the manifest, reconcile every asset, save
 */

use crate::backend::AssetStore;
use crate::collect::collect;
use crate::config::SyncConfig;
use crate::error::Result;
use crate::reconcile::{Reconciler, SyncReport};
use cdn_core_manifest::Manifest;
use tracing::{debug, info};

/// Synchronize the configured asset directory with `store`
///
/// The manifest is written back only after every file has been reconciled,
/// and never in dry-run mode. Any error aborts the run with the manifest file
/// left as it was.
pub async fn run_sync(config: &SyncConfig, store: &dyn AssetStore) -> Result<SyncReport> {
    let mut manifest = Manifest::load(&config.file_list)?;
    info!(
        manifest = %config.file_list.display(),
        entries = manifest.len(),
        backend = store.backend_name(),
        "Starting sync of {}",
        config.source_dir.display()
    );

    for key in manifest.unrooted() {
        debug!(key = %key, "Manifest key has no leading '/' and cannot match a file");
    }

    let files = collect(
        &config.source_dir,
        &config.key_root,
        &config.extensions,
        Some(&config.file_list),
    );

    let reconciler = Reconciler::new(store, &config.container_url).with_dry_run(config.dry_run);
    let report = reconciler.run(files, &mut manifest).await?;

    if config.dry_run {
        debug!("Dry run, manifest not saved");
    } else {
        manifest.save(&config.file_list)?;
        debug!(manifest = %config.file_list.display(), "Manifest saved");
    }

    info!(
        uploaded = report.tally.uploaded,
        skipped = report.tally.skipped,
        unresolved = report.unresolved.len(),
        "Sync complete"
    );
    Ok(report)
}
