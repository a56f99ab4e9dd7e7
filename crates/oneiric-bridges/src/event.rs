// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Oneiric Contributors

//! The Event bridge's dispatcher (§4.5, §4.8): topic fan-out with filters,
//! priority ordering, and a fanout policy.

use oneiric_core::{CandidateDescriptor, Domain, RetryPolicy, SharedEventHandler};
use oneiric_lifecycle::LifecycleManager;
use oneiric_registry::CandidateRegistry;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use std::time::Duration;
use tokio::task::JoinSet;
use tracing::warn;

/// Per-invocation timeout applied when `retry_policy.timeout_ms` is unset
/// (§4.8: "from `retry_policy.timeout` or a global default").
const DEFAULT_HANDLER_TIMEOUT: Duration = Duration::from_secs(30);

/// One `event_filters` entry: a dotted-path matcher into payload/headers
/// (§4.8). Matchers are small and fully enumerable, so no JSONPath crate is
/// pulled in for this.
#[derive(Debug, Clone, Deserialize)]
struct EventFilterSpec {
    path: String,
    op: FilterOp,
    #[serde(default)]
    value: Value,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
enum FilterOp {
    Equals,
    In,
    Exists,
    Not,
}

impl EventFilterSpec {
    fn matches(&self, payload: &Value, headers: &Value) -> bool {
        let found = lookup(payload, &self.path).or_else(|| lookup(headers, &self.path));
        match self.op {
            FilterOp::Exists => found.is_some(),
            FilterOp::Not => found.is_none() || found != Some(&self.value),
            FilterOp::Equals => found == Some(&self.value),
            FilterOp::In => match (&found, self.value.as_array()) {
                (Some(found), Some(options)) => options.iter().any(|o| o == *found),
                _ => false,
            },
        }
    }
}

/// Resolve `a.b.c` into `payload`/`headers`, tolerating absent segments.
fn lookup<'a>(root: &'a Value, dotted_path: &str) -> Option<&'a Value> {
    dotted_path.split('.').try_fold(root, |node, segment| node.get(segment))
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct EventExtras {
    event_topics: Vec<String>,
    event_filters: Vec<EventFilterSpec>,
    event_priority: i32,
    event_fanout_policy: FanoutPolicy,
    concurrent: bool,
    retry_policy: RetryPolicy,
}

impl Default for EventExtras {
    fn default() -> Self {
        Self {
            event_topics: Vec::new(),
            event_filters: Vec::new(),
            event_priority: 0,
            event_fanout_policy: FanoutPolicy::All,
            concurrent: false,
            retry_policy: RetryPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
enum FanoutPolicy {
    All,
    Exclusive,
}

/// Outcome of one handler invocation (§4.8 item 5).
#[derive(Debug, Clone, serde::Serialize)]
pub struct HandlerResult {
    pub domain_key: String,
    pub provider: String,
    pub attempts: u32,
    pub duration_ms: u64,
    pub status: HandlerStatus,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HandlerStatus {
    Succeeded,
    Failed,
}

/// Fans an event out to every matching candidate in the `event` domain.
pub struct EventDispatcher {
    registry: Arc<CandidateRegistry>,
    lifecycle: Arc<LifecycleManager>,
}

impl EventDispatcher {
    pub fn new(registry: Arc<CandidateRegistry>, lifecycle: Arc<LifecycleManager>) -> Self {
        Self { registry, lifecycle }
    }

    /// §4.8 steps 1-5: collect, filter, sort, fan out, retry per handler.
    pub async fn dispatch(&self, topic: &str, payload: Value, headers: Value) -> Vec<HandlerResult> {
        let mut matched = self.matching_candidates(topic, &payload, &headers);
        if matched.is_empty() {
            return Vec::new();
        }

        matched.sort_by(|a, b| {
            b.1.event_priority
                .cmp(&a.1.event_priority)
                .then_with(|| b.0.priority.cmp(&a.0.priority))
                .then_with(|| b.0.stack_level.cmp(&a.0.stack_level))
                .then_with(|| b.0.source_order.cmp(&a.0.source_order))
        });

        let policy = matched[0].1.event_fanout_policy;
        let to_invoke = if policy == FanoutPolicy::Exclusive { vec![matched.remove(0)] } else { matched };

        self.invoke_all(to_invoke, payload, headers).await
    }

    fn matching_candidates(
        &self,
        topic: &str,
        payload: &Value,
        headers: &Value,
    ) -> Vec<(CandidateDescriptor, EventExtras)> {
        self.registry
            .list_raw(Domain::Event, None)
            .into_iter()
            .filter_map(|descriptor| {
                let extras: EventExtras =
                    serde_json::from_value(descriptor.metadata.extras.0.clone()).unwrap_or_default();
                if !extras.event_topics.iter().any(|t| t == topic) {
                    return None;
                }
                if !extras.event_filters.iter().all(|f| f.matches(payload, headers)) {
                    return None;
                }
                Some((descriptor, extras))
            })
            .collect()
    }

    /// Runs handlers declared `concurrent=true` together via a `JoinSet`,
    /// flushing that batch before each sequential handler so priority order
    /// is preserved at the seams (§4.8 item 4).
    async fn invoke_all(
        &self,
        to_invoke: Vec<(CandidateDescriptor, EventExtras)>,
        payload: Value,
        headers: Value,
    ) -> Vec<HandlerResult> {
        let mut results = Vec::with_capacity(to_invoke.len());
        let mut batch: Vec<(CandidateDescriptor, EventExtras)> = Vec::new();

        for (descriptor, extras) in to_invoke {
            if extras.concurrent {
                batch.push((descriptor, extras));
                continue;
            }
            if !batch.is_empty() {
                results.extend(self.run_batch(std::mem::take(&mut batch), &payload, &headers).await);
            }
            results.push(self.invoke_one(&descriptor, &extras, &payload, &headers).await);
        }
        if !batch.is_empty() {
            results.extend(self.run_batch(batch, &payload, &headers).await);
        }
        results
    }

    async fn run_batch(
        &self,
        batch: Vec<(CandidateDescriptor, EventExtras)>,
        payload: &Value,
        headers: &Value,
    ) -> Vec<HandlerResult> {
        let mut set = JoinSet::new();
        for (idx, (descriptor, extras)) in batch.into_iter().enumerate() {
            let payload = payload.clone();
            let headers = headers.clone();
            let dispatcher = self.lifecycle.clone();
            set.spawn(async move {
                let result = invoke(&dispatcher, &descriptor, &extras, &payload, &headers).await;
                (idx, result)
            });
        }

        let mut ordered: Vec<Option<HandlerResult>> = Vec::new();
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok((idx, result)) => {
                    if ordered.len() <= idx {
                        ordered.resize(idx + 1, None);
                    }
                    ordered[idx] = Some(result);
                }
                Err(error) => warn!(%error, "event handler task panicked"),
            }
        }
        ordered.into_iter().flatten().collect()
    }

    async fn invoke_one(
        &self,
        descriptor: &CandidateDescriptor,
        extras: &EventExtras,
        payload: &Value,
        headers: &Value,
    ) -> HandlerResult {
        invoke(&self.lifecycle, descriptor, extras, payload, headers).await
    }
}

async fn invoke(
    lifecycle: &LifecycleManager,
    descriptor: &CandidateDescriptor,
    extras: &EventExtras,
    payload: &Value,
    headers: &Value,
) -> HandlerResult {
    let policy = &extras.retry_policy;
    let start = Instant::now();
    let mut last_error = None;

    for attempt in 0..policy.attempts {
        if attempt > 0 {
            tokio::time::sleep(policy.delay_for(attempt)).await;
        }

        let timeout = policy.timeout_ms.map(Duration::from_millis).unwrap_or(DEFAULT_HANDLER_TIMEOUT);
        let outcome = tokio::time::timeout(timeout, run_once(lifecycle, descriptor, payload, headers)).await;
        match outcome {
            Ok(Ok(())) => {
                return HandlerResult {
                    domain_key: descriptor.id.key.clone(),
                    provider: descriptor.id.provider.clone(),
                    attempts: attempt + 1,
                    duration_ms: start.elapsed().as_millis() as u64,
                    status: HandlerStatus::Succeeded,
                    error: None,
                }
            }
            Ok(Err(message)) => last_error = Some(message),
            Err(_) => last_error = Some(format!("handler timed out after {}ms", timeout.as_millis())),
        }
    }

    HandlerResult {
        domain_key: descriptor.id.key.clone(),
        provider: descriptor.id.provider.clone(),
        attempts: policy.attempts,
        duration_ms: start.elapsed().as_millis() as u64,
        status: HandlerStatus::Failed,
        error: last_error,
    }
}

async fn run_once(
    lifecycle: &LifecycleManager,
    descriptor: &CandidateDescriptor,
    payload: &Value,
    headers: &Value,
) -> Result<(), String> {
    let handle = lifecycle
        .activate_as(Domain::Event, &descriptor.id.key, &descriptor.id.provider)
        .await
        .map_err(|e| e.to_string())?;

    let handler: std::sync::Arc<SharedEventHandler> =
        handle.downcast::<SharedEventHandler>().ok_or_else(|| "instance is not an EventHandler".to_string())?;

    handler.handle(payload, headers).await.map(|_| ())
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
