use charger_adc::{Averager, ChargeFilter, Reading};

const WINDOW: usize = 32;
const THRESHOLD: Reading = 61;

/// Straightforward mean-over-available reference for the scenario checks
fn reference_average(history: &[Reading]) -> Reading {
    let start = history.len().saturating_sub(WINDOW);
    let window = &history[start..];
    let sum: u32 = window.iter().map(|&s| u32::from(s)).sum();
    (sum / window.len() as u32) as Reading
}

#[test]
fn constant_input_converges_exactly() {
    let mut averager: Averager<WINDOW> = Averager::new();
    for _ in 0..WINDOW * 3 {
        averager.push(713);
    }
    assert!(averager.is_full());
    assert_eq!(averager.average(), 713);
}

#[test]
fn warm_up_averages_over_available_samples() {
    let mut averager: Averager<4> = Averager::new();
    assert_eq!(averager.average(), 0);
    assert!(averager.is_empty());

    averager.push(10);
    assert_eq!(averager.average(), 10);
    averager.push(13);
    // (10 + 13) / 2 truncates
    assert_eq!(averager.average(), 11);
    assert_eq!(averager.len(), 2);
    assert!(!averager.is_full());
}

#[test]
fn full_window_evicts_oldest() {
    let mut averager: Averager<4> = Averager::new();
    for sample in [100, 200, 300, 400, 500] {
        averager.push(sample);
    }

    let held: Vec<Reading> = averager.samples().copied().collect();
    assert_eq!(held, vec![200, 300, 400, 500]);
    assert_eq!(averager.average(), 350);
}

#[test]
fn reset_empties_the_window() {
    let mut averager: Averager<4> = Averager::new();
    averager.push(1000);
    averager.reset();

    assert!(averager.is_empty());
    assert_eq!(averager.average(), 0);
    averager.push(8);
    assert_eq!(averager.average(), 8);
}

#[test]
fn plateau_then_decline_terminates_at_first_qualifying_sample() {
    let mut filter: ChargeFilter<WINDOW> = ChargeFilter::new(THRESHOLD);
    let mut history = Vec::new();

    for _ in 0..30 {
        history.push(2000);
        assert!(!filter.new_data(2000));
    }
    assert_eq!(filter.highest(), 2000);
    assert_eq!(filter.average(), 2000);

    let mut fired_at = None;
    for k in 1..=100u16 {
        let sample = 2000 - 5 * k;
        history.push(sample);
        let charged = filter.new_data(sample);

        let expected = 2000 - reference_average(&history) > THRESHOLD;
        assert_eq!(charged, expected, "ramp sample {}", k);
        assert_eq!(filter.highest(), 2000);

        if charged && fired_at.is_none() {
            fired_at = Some(k);
        }
    }

    // Drop first exceeds 61 counts on the 28th ramp sample.
    assert_eq!(fired_at, Some(28));
}

#[test]
fn rising_input_never_terminates() {
    let mut filter: ChargeFilter<WINDOW> = ChargeFilter::new(THRESHOLD);
    for k in 0..500u16 {
        assert!(!filter.new_data(500 + k));
    }
    assert!(filter.highest() >= filter.average());
}

#[test]
fn reset_starts_a_fresh_cycle() {
    let mut filter: ChargeFilter<WINDOW> = ChargeFilter::new(THRESHOLD);
    for _ in 0..WINDOW {
        filter.new_data(900);
    }
    filter.reset();

    assert_eq!(filter.highest(), 0);
    assert!(filter.window().is_empty());
    assert!(!filter.new_data(300));
    assert_eq!(filter.highest(), 300);
}
