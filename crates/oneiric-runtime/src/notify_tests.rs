use super::*;
use async_trait::async_trait;
use oneiric_core::test_support::test_candidate;
use oneiric_core::{Domain, Instance, Source};
use oneiric_lifecycle::LifecycleManager;
use oneiric_registry::{CandidateRegistry, Resolver};
use parking_lot::Mutex;

struct RecordingSender {
    last: Mutex<Option<(String, Value)>>,
}

#[async_trait]
impl oneiric_core::NotificationSender for RecordingSender {
    async fn send(&self, target: &str, message: &Value) -> Result<(), String> {
        *self.last.lock() = Some((target.to_string(), message.clone()));
        Ok(())
    }
}

fn setup() -> (Arc<RecordingSender>, NotificationRouter) {
    let registry = Arc::new(CandidateRegistry::new());
    let sender = Arc::new(RecordingSender { last: Mutex::new(None) });
    let erased: SharedNotificationSender = sender.clone();
    let instance: Instance = Arc::new(erased);
    let mut candidate = test_candidate(Domain::Adapter, "chat", "slack", 0, 0, Source::LocalPkg);
    candidate.factory = Arc::new(oneiric_core::test_support::FixedFactory(instance));
    registry.register(candidate, true).unwrap();

    let resolver = Arc::new(Resolver::new(registry.clone()));
    let lifecycle = Arc::new(LifecycleManager::new(registry, resolver.clone()));
    let bridge = Bridge::new(Domain::Adapter, resolver, lifecycle);
    (sender, NotificationRouter::new(bridge))
}

#[tokio::test]
async fn routes_a_notify_request_to_the_resolved_adapter() {
    let (sender, router) = setup();
    let request = NotifyRequest {
        channel: "chat".to_string(),
        level: "warning".to_string(),
        message: "disk usage high".to_string(),
        context: serde_json::json!({"host": "db-1"}),
    };

    router.route(request, "#ops").await.unwrap();

    let (target, message) = sender.last.lock().clone().unwrap();
    assert_eq!(target, "#ops");
    assert_eq!(message["title"], "warning");
    assert_eq!(message["text"], "disk usage high");
    assert_eq!(message["extra"]["host"], "db-1");
}

#[tokio::test]
async fn unresolved_channel_surfaces_as_unresolved_candidate() {
    let (_sender, router) = setup();
    let request = NotifyRequest {
        channel: "missing".to_string(),
        level: "info".to_string(),
        message: "hi".to_string(),
        context: Value::Null,
    };

    let error = router.route(request, "#ops").await.unwrap_err();
    assert!(matches!(error, OneiricError::UnresolvedCandidate { .. }));
}
