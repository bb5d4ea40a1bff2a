//! CloudWatch Logs calls: group listing, stream listing, event fetching.

use std::time::Duration;

use anyhow::{Context, Result};
use aws_sdk_cloudwatchlogs::types::OrderBy;
use aws_sdk_cloudwatchlogs::Client as CwClient;
use tokio::time::sleep;
use tracing::warn;

use crate::types::RawEvent;

/// One log stream as surfaced by `describe_log_streams`.
#[derive(Debug, Clone)]
pub struct StreamInfo {
    pub name: String,
    pub creation_ms: i64,
}

/// All log group names, across every page.
pub async fn list_log_groups(client: &CwClient) -> Result<Vec<String>> {
    let mut groups = Vec::new();
    let mut pages = client.describe_log_groups().into_paginator().send();
    while let Some(page) = pages.next().await {
        let page = page.context("describe_log_groups")?;
        if let Some(items) = page.log_groups {
            for group in items {
                if let Some(name) = group.log_group_name {
                    groups.push(name);
                }
            }
        }
    }
    Ok(groups)
}

/// Streams of a group, most recent event first.
pub async fn list_streams(client: &CwClient, group: &str) -> Result<Vec<StreamInfo>> {
    let resp = client
        .describe_log_streams()
        .log_group_name(group)
        .order_by(OrderBy::LastEventTime)
        .descending(true)
        .send()
        .await
        .context("describe_log_streams")?;

    let mut streams = Vec::new();
    if let Some(items) = resp.log_streams {
        for stream in items {
            if let (Some(name), Some(created)) = (stream.log_stream_name, stream.creation_time) {
                streams.push(StreamInfo {
                    name,
                    creation_ms: created,
                });
            }
        }
    }
    Ok(streams)
}

/// Events of one stream, in response order.
pub async fn fetch_events(client: &CwClient, group: &str, stream: &str) -> Result<Vec<RawEvent>> {
    let req = client
        .get_log_events()
        .log_group_name(group)
        .log_stream_name(stream);
    let resp = send_with_backoff(req).await?;

    let mut events = Vec::new();
    if let Some(items) = resp.events {
        for event in items {
            if let (Some(ts), Some(msg)) = (event.timestamp, event.message) {
                events.push(RawEvent {
                    message: msg,
                    timestamp_ms: ts,
                });
            }
        }
    }
    Ok(events)
}

/// Send `get_log_events` with bounded retry on throttling and transport noise.
async fn send_with_backoff(
    req: aws_sdk_cloudwatchlogs::operation::get_log_events::builders::GetLogEventsFluentBuilder,
) -> Result<aws_sdk_cloudwatchlogs::operation::get_log_events::GetLogEventsOutput> {
    let mut attempt = 0u32;
    loop {
        attempt += 1;
        match req.clone().send().await {
            Ok(resp) => return Ok(resp),
            Err(err) => {
                let msg = format!("{err:?}");
                let is_retryable = msg.contains("ThrottlingException")
                    || msg.contains("ServiceUnavailable")
                    || msg.contains("dispatch failure")
                    || msg.contains("SendRequest");
                if is_retryable && attempt < 20 {
                    let backoff = Duration::from_millis(500 * (attempt as u64).min(10));
                    warn!(
                        "CW throttled/retryable attempt={}: retrying in {:?}",
                        attempt, backoff
                    );
                    sleep(backoff).await;
                    continue;
                }
                return Err(err).context("get_log_events throttled/failed");
            }
        }
    }
}
