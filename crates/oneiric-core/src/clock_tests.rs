use super::*;

#[test]
fn fake_clock_advances_both_instant_and_epoch() {
    let clock = FakeClock::new();
    let before = clock.now();
    let before_epoch = clock.epoch_ms();
    clock.advance(Duration::from_millis(500));
    assert_eq!(clock.now() - before, Duration::from_millis(500));
    assert_eq!(clock.epoch_ms() - before_epoch, 500);
}

#[test]
fn system_clock_epoch_ms_is_monotonic_nondecreasing() {
    let clock = SystemClock;
    let a = clock.epoch_ms();
    let b = clock.epoch_ms();
    assert!(b >= a);
}
