#![no_main]

use libfuzzer_sys::fuzz_target;
use timeblock_core::normalize::clamp_and_round;

fn f64_at(data: &[u8], i: usize) -> f64 {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&data[i * 8..i * 8 + 8]);
    f64::from_le_bytes(buf)
}

fuzz_target!(|data: &[u8]| {
    // value, min, span, step
    if data.len() < 32 {
        return;
    }
    let value = f64_at(data, 0);
    let min = f64_at(data, 1);
    let span = f64_at(data, 2).abs();
    let step = f64_at(data, 3).abs();
    if !(min.is_finite() && span.is_finite() && (min + span).is_finite()) {
        return;
    }
    let max = min + span;
    let step = (step.is_finite() && step > 0.0).then_some(step);
    // Grid indices past 2^48 no longer round-trip through f64 division.
    if step.is_some_and(|s| min.abs().max(max.abs()) / s > 2f64.powi(48)) {
        return;
    }

    let once = clamp_and_round(value, min, max, step);

    // Post-conditions that must always hold:
    assert!(once >= min && once <= max, "{once} escaped [{min}, {max}]");
    assert_eq!(
        clamp_and_round(once, min, max, step).to_bits(),
        once.to_bits(),
        "normalize is not idempotent for {value}"
    );
});
