//! Flat-file persistence: group lists, subscriptions, and synced log paths.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::{fs, io};

use anyhow::{Context, Result};
use chrono::{DateTime, Local, Utc};

/// Read a line-per-entry file; a missing file is an empty list.
pub fn read_lines(path: &Path) -> Result<Vec<String>> {
    let data = match fs::read_to_string(path) {
        Ok(d) => d,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => return Err(err).with_context(|| format!("reading {}", path.display())),
    };
    Ok(data
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect())
}

/// Write entries one per line, atomically (temp file then rename).
pub fn write_lines(path: &Path, entries: &[String]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, entries.join("\n")).with_context(|| format!("writing {}", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| format!("replacing {}", path.display()))?;
    Ok(())
}

/// Merge `selected` into the subscription file, keeping it sorted and
/// deduplicated. Returns the merged list.
pub fn add_subscriptions(path: &Path, selected: &[String]) -> Result<Vec<String>> {
    let mut subs: BTreeSet<String> = read_lines(path)?.into_iter().collect();
    subs.extend(selected.iter().cloned());
    let merged: Vec<String> = subs.into_iter().collect();
    write_lines(path, &merged)?;
    Ok(merged)
}

/// Make a log group name usable as a directory name. Lambda groups lose
/// their `/aws/lambda/` prefix so the directory reads as the function name.
pub fn sanitize_group_name(group: &str) -> String {
    group.replace(['/', '\\'], "_").replace("_aws_lambda_", "")
}

/// Path of the rendered file for one stream: `<dir>/<group>/<index>__<hour>.log`,
/// where the hour comes from the stream's creation time in the local zone and
/// `index` is the 1-based position in the stream listing.
pub fn stream_log_path(sync_dir: &Path, group: &str, index: usize, creation_ms: i64) -> PathBuf {
    let created = DateTime::<Utc>::from_timestamp_millis(creation_ms)
        .unwrap_or_else(|| DateTime::<Utc>::from_timestamp_millis(0).unwrap())
        .with_timezone(&Local)
        .format("%Y-%m-%dT%H");
    sync_dir
        .join(sanitize_group_name(group))
        .join(format!("{index}__{created}.log"))
}
