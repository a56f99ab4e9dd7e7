use super::*;
use async_trait::async_trait;
use oneiric_core::candidate::{Candidate, CandidateId, CandidateMetadata, Capabilities, Extras, Factory};
use oneiric_core::{EventHandler, Instance, NoHooks, Source};
use std::sync::atomic::{AtomicU32, Ordering};

struct CountingHandler {
    calls: Arc<AtomicU32>,
    fail_first_n: u32,
}

#[async_trait]
impl EventHandler for CountingHandler {
    async fn handle(&self, _payload: &Value, _headers: &Value) -> Result<Value, String> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        if n < self.fail_first_n {
            Err("not yet".to_string())
        } else {
            Ok(Value::Null)
        }
    }
}

struct HandlerFactory(Arc<AtomicU32>, u32);

impl Factory for HandlerFactory {
    fn build(&self, _settings: Value) -> Result<Instance, String> {
        let handler: SharedEventHandler = Arc::new(CountingHandler { calls: self.0.clone(), fail_first_n: self.1 });
        Ok(Arc::new(handler) as Instance)
    }
}

fn event_candidate(key: &str, provider: &str, topics: &[&str], priority: i32, calls: Arc<AtomicU32>) -> Candidate {
    let extras = serde_json::json!({ "event_topics": topics, "event_priority": priority });
    Candidate {
        id: CandidateId { domain: Domain::Event, key: key.to_string(), provider: provider.to_string() },
        priority: 0,
        stack_level: 0,
        source: Source::LocalPkg,
        source_order: 0,
        capabilities: Capabilities::default(),
        metadata: CandidateMetadata { extras: Extras(extras), ..Default::default() },
        factory: Arc::new(HandlerFactory(calls, 0)),
        hooks: Arc::new(NoHooks),
        registered_at: 0,
    }
}

#[tokio::test]
async fn dispatch_collects_by_topic_and_runs_handler() {
    let registry = Arc::new(CandidateRegistry::new());
    let calls = Arc::new(AtomicU32::new(0));
    registry
        .register(event_candidate("orders", "notify", &["order.created"], 0, calls.clone()), true)
        .unwrap();

    let resolver = Arc::new(oneiric_registry::Resolver::new(registry.clone()));
    let lifecycle = Arc::new(LifecycleManager::new(registry.clone(), resolver));
    let dispatcher = EventDispatcher::new(registry, lifecycle);

    let results = dispatcher.dispatch("order.created", Value::Null, Value::Null).await;
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].status, HandlerStatus::Succeeded);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn dispatch_ignores_non_matching_topics() {
    let registry = Arc::new(CandidateRegistry::new());
    let calls = Arc::new(AtomicU32::new(0));
    registry
        .register(event_candidate("orders", "notify", &["order.created"], 0, calls), true)
        .unwrap();

    let resolver = Arc::new(oneiric_registry::Resolver::new(registry.clone()));
    let lifecycle = Arc::new(LifecycleManager::new(registry.clone(), resolver));
    let dispatcher = EventDispatcher::new(registry, lifecycle);

    let results = dispatcher.dispatch("order.shipped", Value::Null, Value::Null).await;
    assert!(results.is_empty());
}

#[tokio::test]
async fn exclusive_fanout_invokes_only_top_priority_handler() {
    let registry = Arc::new(CandidateRegistry::new());
    let low_calls = Arc::new(AtomicU32::new(0));
    let high_calls = Arc::new(AtomicU32::new(0));

    let low_extras = serde_json::json!({
        "event_topics": ["order.created"], "event_priority": 1, "event_fanout_policy": "exclusive"
    });
    let mut low = event_candidate("orders", "low", &["order.created"], 1, low_calls.clone());
    low.metadata.extras = Extras(low_extras);

    let high_extras = serde_json::json!({
        "event_topics": ["order.created"], "event_priority": 10, "event_fanout_policy": "exclusive"
    });
    let mut high = event_candidate("orders", "high", &["order.created"], 10, high_calls.clone());
    high.metadata.extras = Extras(high_extras);

    registry.register(low, true).unwrap();
    registry.register(high, true).unwrap();

    let resolver = Arc::new(oneiric_registry::Resolver::new(registry.clone()));
    let lifecycle = Arc::new(LifecycleManager::new(registry.clone(), resolver));
    let dispatcher = EventDispatcher::new(registry, lifecycle);

    let results = dispatcher.dispatch("order.created", Value::Null, Value::Null).await;
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].provider, "high");
    assert_eq!(high_calls.load(Ordering::SeqCst), 1);
    assert_eq!(low_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn retry_policy_retries_until_success() {
    let registry = Arc::new(CandidateRegistry::new());
    let calls = Arc::new(AtomicU32::new(0));
    let mut candidate = event_candidate("orders", "flaky", &["order.created"], 0, calls.clone());
    candidate.factory = Arc::new(HandlerFactory(calls.clone(), 2));
    let extras = serde_json::json!({
        "event_topics": ["order.created"],
        "retry_policy": { "attempts": 3, "base_delay_ms": 1, "multiplier": 1.0, "jitter": 0.0 }
    });
    candidate.metadata.extras = Extras(extras);
    registry.register(candidate, true).unwrap();

    let resolver = Arc::new(oneiric_registry::Resolver::new(registry.clone()));
    let lifecycle = Arc::new(LifecycleManager::new(registry.clone(), resolver));
    let dispatcher = EventDispatcher::new(registry, lifecycle);

    let results = dispatcher.dispatch("order.created", Value::Null, Value::Null).await;
    assert_eq!(results[0].status, HandlerStatus::Succeeded);
    assert_eq!(results[0].attempts, 3);
}

#[test]
fn filter_matches_equals_on_dotted_path() {
    let filter = EventFilterSpec { path: "a.b".to_string(), op: FilterOp::Equals, value: Value::from(42) };
    let payload = serde_json::json!({ "a": { "b": 42 } });
    assert!(filter.matches(&payload, &Value::Null));
    let other = serde_json::json!({ "a": { "b": 7 } });
    assert!(!filter.matches(&other, &Value::Null));
}
