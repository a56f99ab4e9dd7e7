use super::*;
use oneiric_core::test_support::test_candidate;
use oneiric_core::Source;
use oneiric_registry::CandidateRegistry;

fn bridge_with(candidates: Vec<oneiric_core::Candidate>) -> Bridge {
    let registry = Arc::new(CandidateRegistry::new());
    for c in candidates {
        registry.register(c, true).unwrap();
    }
    let resolver = Arc::new(Resolver::new(registry.clone()));
    let lifecycle = Arc::new(LifecycleManager::new(registry, resolver.clone()));
    Bridge::new(Domain::Adapter, resolver, lifecycle)
}

#[tokio::test]
async fn use_key_activates_the_resolved_winner() {
    let bridge = bridge_with(vec![test_candidate(
        Domain::Adapter,
        "cache",
        "memory",
        0,
        0,
        Source::LocalPkg,
    )]);
    let handle = bridge.use_key("cache", None).await.unwrap();
    assert_eq!(handle.candidate.id.provider, "memory");
}

#[tokio::test]
async fn use_key_with_pinned_provider_overrides_the_resolver() {
    let bridge = bridge_with(vec![
        test_candidate(Domain::Adapter, "cache", "memory", 10, 0, Source::LocalPkg),
        test_candidate(Domain::Adapter, "cache", "redis", 0, 0, Source::LocalPkg),
    ]);
    let handle = bridge.use_key("cache", Some("redis")).await.unwrap();
    assert_eq!(handle.candidate.id.provider, "redis");
}

#[tokio::test]
async fn shadowed_excludes_only_the_winner() {
    let bridge = bridge_with(vec![
        test_candidate(Domain::Adapter, "cache", "memory", 10, 0, Source::LocalPkg),
        test_candidate(Domain::Adapter, "cache", "redis", 0, 0, Source::LocalPkg),
    ]);
    let shadowed = bridge.shadowed("cache");
    assert_eq!(shadowed.len(), 1);
    assert_eq!(shadowed[0].id.provider, "redis");
}

#[tokio::test]
async fn explain_reports_the_override_tier_first() {
    let bridge = bridge_with(vec![test_candidate(
        Domain::Adapter,
        "cache",
        "memory",
        0,
        0,
        Source::LocalPkg,
    )]);
    let trace = bridge.explain("cache");
    assert_eq!(trace.steps[0].tier, oneiric_registry::Tier::Override);
}
