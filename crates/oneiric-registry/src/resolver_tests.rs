use super::*;
use oneiric_core::test_support::test_candidate;
use oneiric_core::{Domain, Source};
use std::sync::Arc;

fn registry_with(candidates: Vec<oneiric_core::Candidate>) -> Arc<CandidateRegistry> {
    let registry = Arc::new(CandidateRegistry::new());
    for c in candidates {
        registry.register(c, true).unwrap();
    }
    registry
}

#[test]
fn registration_order_breaks_ties_when_nothing_else_distinguishes() {
    let registry = registry_with(vec![
        test_candidate(Domain::Adapter, "cache", "memory", 0, 0, Source::LocalPkg),
        test_candidate(Domain::Adapter, "cache", "redis", 0, 0, Source::LocalPkg),
    ]);
    let resolver = Resolver::new(registry);
    let winner = resolver.resolve(Domain::Adapter, "cache").unwrap();
    assert_eq!(winner.id.provider, "redis");
}

#[test]
fn stack_level_outranks_registration_order() {
    let registry = registry_with(vec![
        test_candidate(Domain::Adapter, "cache", "memory", 0, 5, Source::LocalPkg),
        test_candidate(Domain::Adapter, "cache", "redis", 0, 1, Source::LocalPkg),
    ]);
    let resolver = Resolver::new(registry);
    let winner = resolver.resolve(Domain::Adapter, "cache").unwrap();
    assert_eq!(winner.id.provider, "memory");
}

#[test]
fn explicit_priority_outranks_stack_level() {
    let registry = registry_with(vec![
        test_candidate(Domain::Adapter, "cache", "memory", 10, 1, Source::LocalPkg),
        test_candidate(Domain::Adapter, "cache", "redis", 0, 99, Source::LocalPkg),
    ]);
    let resolver = Resolver::new(registry);
    let winner = resolver.resolve(Domain::Adapter, "cache").unwrap();
    assert_eq!(winner.id.provider, "memory");
}

#[test]
fn explicit_override_outranks_everything() {
    let registry = registry_with(vec![
        test_candidate(Domain::Adapter, "cache", "memory", 99, 99, Source::LocalPkg),
        test_candidate(Domain::Adapter, "cache", "redis", 0, 0, Source::LocalPkg),
    ]);
    let resolver = Resolver::new(registry);
    resolver.set_config(ResolverConfig {
        selections: HashMap::from([((Domain::Adapter, "cache".to_string()), "redis".to_string())]),
        stack_order: Vec::new(),
    });
    let winner = resolver.resolve(Domain::Adapter, "cache").unwrap();
    assert_eq!(winner.id.provider, "redis");
}

#[test]
fn unresolved_when_slot_is_empty() {
    let registry = Arc::new(CandidateRegistry::new());
    let resolver = Resolver::new(registry);
    let err = resolver.resolve(Domain::Adapter, "cache").unwrap_err();
    assert!(matches!(err, OneiricError::UnresolvedCandidate { .. }));
}

#[test]
fn resolve_excluding_skips_failed_candidates() {
    let registry = registry_with(vec![
        test_candidate(Domain::Adapter, "cache", "memory", 0, 10, Source::LocalPkg),
        test_candidate(Domain::Adapter, "cache", "redis", 0, 5, Source::LocalPkg),
    ]);
    let resolver = Resolver::new(registry);
    let excluded = HashSet::from(["memory".to_string()]);
    let winner = resolver.resolve_excluding(Domain::Adapter, "cache", &excluded).unwrap();
    assert_eq!(winner.id.provider, "redis");
}

#[test]
fn explain_trace_steps_reproduce_the_winner() {
    let registry = registry_with(vec![
        test_candidate(Domain::Adapter, "cache", "memory", 0, 10, Source::LocalPkg),
        test_candidate(Domain::Adapter, "cache", "redis", 0, 5, Source::LocalPkg),
    ]);
    let resolver = Resolver::new(registry);
    let trace = resolver.explain(Domain::Adapter, "cache");
    let winner = trace.winner.as_ref().unwrap();
    assert_eq!(winner.id.provider, "memory");
    let last_step = trace.steps.last().unwrap();
    assert!(last_step.survivors.contains(&"memory".to_string()));
}

#[test]
fn stack_order_infers_priority_when_candidate_priority_is_unset() {
    let registry = registry_with(vec![
        test_candidate(Domain::Adapter, "cache", "memory", 0, 0, Source::LocalPkg),
        test_candidate(Domain::Adapter, "cache", "redis", 0, 0, Source::LocalPkg),
    ]);
    let resolver = Resolver::new(registry);
    // memory is owned by "sites", redis by "oneiric"; stack_order ranks
    // "oneiric" above "sites", so redis should win via inferred priority.
    resolver.set_config(ResolverConfig {
        selections: HashMap::new(),
        stack_order: vec!["sites".to_string(), "oneiric".to_string()],
    });
    // Without owners set, inferred priority is 0 for both, so this falls
    // through to registration order (redis registered second).
    let winner = resolver.resolve(Domain::Adapter, "cache").unwrap();
    assert_eq!(winner.id.provider, "redis");
}
