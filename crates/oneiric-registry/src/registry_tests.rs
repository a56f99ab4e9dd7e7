use super::*;
use oneiric_core::test_support::test_candidate;
use oneiric_core::{Domain, Source};

#[test]
fn register_assigns_monotonic_source_order() {
    let registry = CandidateRegistry::new();
    let a = test_candidate(Domain::Adapter, "cache", "memory", 0, 10, Source::LocalPkg);
    let b = test_candidate(Domain::Adapter, "cache", "redis", 0, 30, Source::LocalPkg);
    registry.register(a, true).unwrap();
    registry.register(b, true).unwrap();

    let listed = registry.list_raw(Domain::Adapter, Some("cache"));
    let memory = listed.iter().find(|c| c.id.provider == "memory").unwrap();
    let redis = listed.iter().find(|c| c.id.provider == "redis").unwrap();
    assert!(redis.source_order > memory.source_order);
}

#[test]
fn reregistration_from_same_source_preserves_source_order() {
    let registry = CandidateRegistry::new();
    let a = test_candidate(Domain::Adapter, "cache", "redis", 0, 30, Source::LocalPkg);
    registry.register(a, true).unwrap();
    let first_order = registry.list_raw(Domain::Adapter, Some("cache"))[0].source_order;

    let a2 = test_candidate(Domain::Adapter, "cache", "redis", 5, 30, Source::LocalPkg);
    registry.register(a2, true).unwrap();
    let listed = registry.list_raw(Domain::Adapter, Some("cache"));
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].source_order, first_order);
    assert_eq!(listed[0].priority, 5);
}

#[test]
fn strict_mode_rejects_cross_source_identity_reuse() {
    let registry = CandidateRegistry::new();
    let a = test_candidate(Domain::Adapter, "cache", "redis", 0, 30, Source::LocalPkg);
    registry.register(a, true).unwrap();

    let b = test_candidate(Domain::Adapter, "cache", "redis", 0, 30, Source::Remote);
    let result = registry.register(b, true);
    assert!(matches!(result, Err(OneiricError::DuplicateRegistration { .. })));
}

#[test]
fn non_strict_mode_allows_shadowing_across_sources() {
    let registry = CandidateRegistry::new();
    let a = test_candidate(Domain::Adapter, "cache", "redis", 0, 30, Source::LocalPkg);
    registry.register(a, true).unwrap();

    let b = test_candidate(Domain::Adapter, "cache", "redis", 0, 30, Source::Remote);
    registry.register(b, false).unwrap();

    let listed = registry.list_raw(Domain::Adapter, Some("cache"));
    assert_eq!(listed.len(), 2);
}

#[test]
fn unregister_removes_only_the_targeted_source() {
    let registry = CandidateRegistry::new();
    let a = test_candidate(Domain::Adapter, "cache", "memory", 0, 10, Source::LocalPkg);
    let token = registry.register(a, true).unwrap();
    let b = test_candidate(Domain::Adapter, "cache", "redis", 0, 30, Source::Remote);
    registry.register(b, true).unwrap();

    let removed = registry.unregister(token).unwrap();
    assert_eq!(removed.id.provider, "memory");
    assert_eq!(registry.list_raw(Domain::Adapter, Some("cache")).len(), 1);
}

#[test]
fn retire_source_except_never_touches_other_sources() {
    let registry = CandidateRegistry::new();
    let local = test_candidate(Domain::Adapter, "cache", "memory", 0, 10, Source::LocalPkg);
    registry.register(local, true).unwrap();
    let remote_old = test_candidate(Domain::Adapter, "cache", "redis_v1", 0, 30, Source::Remote);
    registry.register(remote_old, true).unwrap();

    let mut keep = std::collections::HashSet::new();
    keep.insert(("cache".to_string(), "redis_v2".to_string()));
    let remote_new = test_candidate(Domain::Adapter, "cache", "redis_v2", 0, 30, Source::Remote);
    registry.register(remote_new, true).unwrap();

    let removed = registry.retire_source_except(Domain::Adapter, Source::Remote, &keep);
    assert_eq!(removed.len(), 1);
    assert_eq!(removed[0].id.provider, "redis_v1");

    let listed = registry.list_raw(Domain::Adapter, Some("cache"));
    assert!(listed.iter().any(|c| c.id.provider == "memory"));
    assert!(listed.iter().any(|c| c.id.provider == "redis_v2"));
    assert!(!listed.iter().any(|c| c.id.provider == "redis_v1"));
}

#[test]
fn subscribers_observe_inserts_and_removes() {
    let registry = CandidateRegistry::new();
    let seen = Arc::new(parking_lot::Mutex::new(Vec::new()));
    let seen_clone = seen.clone();
    registry.subscribe(move |event| {
        seen_clone.lock().push(format!("{:?}", event));
    });

    let a = test_candidate(Domain::Adapter, "cache", "memory", 0, 10, Source::LocalPkg);
    let token = registry.register(a, true).unwrap();
    registry.unregister(token);

    assert_eq!(seen.lock().len(), 2);
}
