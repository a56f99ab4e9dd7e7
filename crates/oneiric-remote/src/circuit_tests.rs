use super::*;

#[test]
fn stays_closed_below_the_failure_threshold() {
    let breaker = CircuitBreaker::new(3, Duration::from_secs(30));
    assert!(!breaker.record_failure());
    assert!(!breaker.record_failure());
    assert!(!breaker.is_open());
}

#[test]
fn opens_once_the_threshold_is_reached() {
    let breaker = CircuitBreaker::new(2, Duration::from_secs(30));
    assert!(!breaker.record_failure());
    assert!(breaker.record_failure());
    assert!(breaker.is_open());
}

#[test]
fn a_success_resets_the_failure_count() {
    let breaker = CircuitBreaker::new(2, Duration::from_secs(30));
    breaker.record_failure();
    breaker.record_success();
    assert!(!breaker.record_failure());
    assert!(!breaker.is_open());
}

#[test]
fn reopening_after_the_reset_interval_elapses_allows_a_retry() {
    let breaker = CircuitBreaker::new(1, Duration::from_millis(10));
    assert!(breaker.record_failure());
    assert!(breaker.is_open());
    std::thread::sleep(Duration::from_millis(20));
    assert!(!breaker.is_open());
}
