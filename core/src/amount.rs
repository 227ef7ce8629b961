//! Amount generation.
//!
//! Every revealed amount is a multiple of 1000 inside the configured
//! range whenever the range contains one.

use crate::{
    config::{Denomination, DrawMode, Settings},
    rng::GameRng,
    types::Amount,
};

pub const ROUNDING_UNIT: i128 = 1000;

/// Largest and smallest multiples of 1000 an `Amount` can hold.
pub const MAX_ROUNDED: Amount = Amount::MAX - Amount::MAX % 1000;
pub const MIN_ROUNDED: Amount = Amount::MIN - Amount::MIN % 1000;

/// Nearest multiple of 1000. Halves round toward positive infinity,
/// so 1500 becomes 2000 and -1500 becomes -1000. Values past the
/// outermost representable multiples land on them.
pub fn round_to_thousand(value: Amount) -> Amount {
    let rounded = (value as i128 + ROUNDING_UNIT / 2).div_euclid(ROUNDING_UNIT) * ROUNDING_UNIT;
    saturate(rounded)
}

/// Multiples of 1000 inside [lo, hi] as (first, last), if any.
fn thousands_within(lo: Amount, hi: Amount) -> Option<(Amount, Amount)> {
    let first = -((-(lo as i128)).div_euclid(ROUNDING_UNIT)) * ROUNDING_UNIT;
    let last = (hi as i128).div_euclid(ROUNDING_UNIT) * ROUNDING_UNIT;
    (first <= last).then(|| (saturate(first), saturate(last)))
}

/// Clamp a multiple of 1000 into `Amount`, staying a multiple.
fn saturate(v: i128) -> Amount {
    v.clamp(MIN_ROUNDED as i128, MAX_ROUNDED as i128) as Amount
}

/// Uniform draw over the settings range, rounded to the nearest 1000.
///
/// Rounding can step past a bound (10_400..10_900 draws 10_400 and
/// rounds to 10_000); the result is then pulled back to the nearest
/// in-range multiple. A range with no multiple of 1000 at all keeps
/// the plain rounded value.
pub fn generate_amount(settings: &Settings, rng: &mut GameRng) -> Amount {
    let (lo, hi) = settings.bounds();
    let raw = rng.next_i64_in(lo, hi);
    let rounded = round_to_thousand(raw);

    let amount = match thousands_within(lo, hi) {
        Some((first, last)) => rounded.clamp(first, last),
        None => rounded,
    };
    log::debug!("amount: raw={raw} rounded={rounded} amount={amount} range={lo}..={hi}");
    amount
}

/// Weighted pick among the denominations inside the settings range.
/// Falls back to a uniform draw when none is eligible.
pub fn draw_denomination(
    table: &[Denomination],
    settings: &Settings,
    rng: &mut GameRng,
) -> Amount {
    let (lo, hi) = settings.bounds();
    let eligible: Vec<&Denomination> = table
        .iter()
        .filter(|d| d.weight > 0.0 && (lo..=hi).contains(&d.amount))
        .collect();
    let total_weight: f64 = eligible.iter().map(|d| d.weight).sum();

    if eligible.is_empty() || total_weight <= 0.0 {
        log::debug!("amount: no denomination in {lo}..={hi}, using range draw");
        return generate_amount(settings, rng);
    }

    let mut roll = rng.next_f64() * total_weight;
    for d in &eligible {
        if roll < d.weight {
            return d.amount;
        }
        roll -= d.weight;
    }
    // Float residue lands on the last entry.
    eligible[eligible.len() - 1].amount
}

/// Draw one amount according to the configured mode.
pub fn draw(
    mode: DrawMode,
    table: &[Denomination],
    settings: &Settings,
    rng: &mut GameRng,
) -> Amount {
    match mode {
        DrawMode::Range => generate_amount(settings, rng),
        DrawMode::Denominations => draw_denomination(table, settings, rng),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_halves_up() {
        assert_eq!(round_to_thousand(0), 0);
        assert_eq!(round_to_thousand(499), 0);
        assert_eq!(round_to_thousand(500), 1000);
        assert_eq!(round_to_thousand(1499), 1000);
        assert_eq!(round_to_thousand(1500), 2000);
        assert_eq!(round_to_thousand(-1500), -1000);
        assert_eq!(round_to_thousand(-1501), -2000);
        assert_eq!(round_to_thousand(-499), 0);
    }

    #[test]
    fn rounding_saturates_at_extremes() {
        assert_eq!(MAX_ROUNDED, Amount::MAX - 807);
        assert_eq!(MIN_ROUNDED, Amount::MIN + 808);

        for v in [Amount::MAX, Amount::MAX - 300, Amount::MIN, Amount::MIN + 100] {
            let rounded = round_to_thousand(v);
            assert_eq!(rounded % 1000, 0, "{v} rounded to {rounded}");
        }
        assert_eq!(round_to_thousand(Amount::MAX), MAX_ROUNDED);
        assert_eq!(round_to_thousand(Amount::MIN), MIN_ROUNDED);
    }

    #[test]
    fn thousands_within_handles_signs() {
        assert_eq!(thousands_within(10_100, 10_200), None);
        assert_eq!(thousands_within(10_100, 12_000), Some((11_000, 12_000)));
        assert_eq!(thousands_within(-2_500, -500), Some((-2_000, -1_000)));
        assert_eq!(thousands_within(0, 0), Some((0, 0)));
        assert_eq!(thousands_within(Amount::MAX - 100, Amount::MAX), None);
        assert_eq!(
            thousands_within(Amount::MIN, Amount::MAX),
            Some((MIN_ROUNDED, MAX_ROUNDED))
        );
    }
}
