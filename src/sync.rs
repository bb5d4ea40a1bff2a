//! Sync orchestration: run the analysis pipeline per stream and write the
//! rendered files. `render_batch` is the pure part; the rest is plumbing.

use std::fs;

use anyhow::{Context, Result};
use aws_sdk_cloudwatchlogs::Client as CwClient;
use tracing::{info, warn};

use crate::analyze::{analyze_events, remove_shared_values};
use crate::config::Config;
use crate::cw;
use crate::render::render_event;
use crate::store::stream_log_path;
use crate::types::RawEvent;

/// Marker written ahead of the shared-field header block.
const SHARED_MARKER: &str = "<SHARED>";

/// Output of the batch pipeline: optional shared-field header plus one line
/// per event, in batch order.
#[derive(Debug)]
pub struct RenderedBatch {
    pub header: Option<String>,
    pub lines: Vec<String>,
}

impl RenderedBatch {
    /// Full file contents: the header block and a blank line when shared
    /// fields exist, then the rendered lines.
    pub fn to_file_contents(&self) -> String {
        let body = self.lines.join("\n");
        match &self.header {
            Some(header) => format!("{header}\n\n{body}\n"),
            None => format!("{body}\n"),
        }
    }
}

/// Run the whole pipeline over one batch: classify, sample, extract shared
/// fields, pick effective zoom keys, render every event.
pub fn render_batch(raw: Vec<RawEvent>, zoom_override: Option<&str>) -> RenderedBatch {
    let analysis = analyze_events(raw);
    let mut events = analysis.events;
    remove_shared_values(&mut events, &analysis.shared_fields);

    let zoom_fields: Vec<String> = match zoom_override {
        Some(zoom) => zoom.split(',').map(str::to_string).collect(),
        None => analysis.zoom_guess,
    };

    let lines = events
        .iter()
        .map(|ev| render_event(ev, &zoom_fields))
        .collect();

    let header = if analysis.shared_fields.is_empty() {
        None
    } else {
        let pretty = serde_json::to_string_pretty(&analysis.shared_fields)
            .unwrap_or_else(|_| "{}".to_string());
        Some(format!("{SHARED_MARKER} {pretty}"))
    };

    RenderedBatch { header, lines }
}

/// Sync one group: walk its streams newest-first, render each stream's
/// events to its own file, and stop at the first stream with no events.
/// A failure on one stream is reported and the walk moves on to the next.
pub async fn sync_group(client: &CwClient, cfg: &Config, group: &str) -> Result<()> {
    let streams = cw::list_streams(client, group).await?;
    for (index, stream) in streams.iter().enumerate() {
        match sync_stream(client, cfg, group, index + 1, stream).await {
            Ok(true) => {}
            Ok(false) => break,
            Err(err) => warn!("failed to sync {}/{}: {err:?}", group, stream.name),
        }
    }
    Ok(())
}

/// Sync a single stream. Returns `Ok(false)` when the stream had no events,
/// which ends the group's walk (streams are ordered most-recent-first).
async fn sync_stream(
    client: &CwClient,
    cfg: &Config,
    group: &str,
    index: usize,
    stream: &cw::StreamInfo,
) -> Result<bool> {
    let events = cw::fetch_events(client, group, &stream.name)
        .await
        .with_context(|| format!("fetching events for {}/{}", group, stream.name))?;
    if events.is_empty() {
        return Ok(false);
    }

    let path = stream_log_path(&cfg.sync_dir, group, index, stream.creation_ms);
    info!("syncing {}, {} events", path.display(), events.len());

    let batch = render_batch(events, cfg.zoom_override());
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
    }
    fs::write(&path, batch.to_file_contents())
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(true)
}

/// Sync every selected group. A failure in one group is reported with its
/// cause and does not stop the others.
pub async fn sync_all(client: &CwClient, cfg: &Config, groups: &[String]) {
    for group in groups {
        if let Err(err) = sync_group(client, cfg, group).await {
            warn!("failed to sync {group}: {err:?}");
        }
    }
}
