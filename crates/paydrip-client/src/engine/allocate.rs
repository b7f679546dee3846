use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::engine::ScheduleError;

/// Round to 2 decimal places with conventional midpoint-away-from-zero
/// money rounding.
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Canonical 2-decimal-place rendering of a money amount.
pub fn money_string(value: Decimal) -> String {
    let mut rescaled = round_money(value);
    rescaled.rescale(2);
    rescaled.to_string()
}

/// Per-installment amount for a fixed installment count.
pub fn allocate_by_count(
    total_amount: Decimal,
    installment_count: usize,
) -> Result<Decimal, ScheduleError> {
    if installment_count == 0 {
        return Err(ScheduleError::InvalidDuration);
    }
    ensure_positive_total(total_amount)?;

    let count = Decimal::from(installment_count as u64);
    Ok(round_money(total_amount / count))
}

/// Installment count for a fixed per-installment amount: the floor of
/// `total / payout`. A payout larger than the total yields zero
/// installments and is rejected.
pub fn allocate_by_amount(
    total_amount: Decimal,
    payout_amount: Decimal,
) -> Result<usize, ScheduleError> {
    ensure_positive_total(total_amount)?;
    if payout_amount <= Decimal::ZERO {
        return Err(ScheduleError::InvalidAllocation {
            reason: "payout amount must be positive".to_string(),
        });
    }

    let count = (total_amount / payout_amount)
        .floor()
        .to_usize()
        .ok_or_else(|| ScheduleError::InvalidAllocation {
            reason: "installment count is out of range".to_string(),
        })?;
    if count == 0 {
        return Err(ScheduleError::InvalidAllocation {
            reason: "payout amount exceeds the total amount".to_string(),
        });
    }
    Ok(count)
}

/// Amount of installment `index` (0-based). The final installment absorbs
/// the rounding remainder so the disbursed amounts sum exactly to the
/// locked total.
pub fn installment_amount(
    total_amount: Decimal,
    payout_amount: Decimal,
    installment_count: usize,
    index: usize,
) -> Decimal {
    if installment_count == 0 || index >= installment_count {
        return Decimal::ZERO;
    }
    if index + 1 == installment_count {
        let scheduled = payout_amount * Decimal::from((installment_count - 1) as u64);
        return total_amount - scheduled;
    }
    payout_amount
}

fn ensure_positive_total(total_amount: Decimal) -> Result<(), ScheduleError> {
    if total_amount <= Decimal::ZERO {
        return Err(ScheduleError::InvalidAllocation {
            reason: "total amount must be positive".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use crate::engine::ScheduleError;

    use super::{
        allocate_by_amount, allocate_by_count, installment_amount, money_string, round_money,
    };

    #[test]
    fn even_division_splits_exactly() {
        let payout = allocate_by_count(dec!(120000), 12);
        assert_eq!(payout, Ok(dec!(10000)));
    }

    #[test]
    fn uneven_division_rounds_to_cents() {
        let payout = allocate_by_count(dec!(100), 3);
        assert_eq!(payout, Ok(dec!(33.33)));
    }

    #[test]
    fn zero_installments_is_an_invalid_duration() {
        let payout = allocate_by_count(dec!(100), 0);
        assert_eq!(payout, Err(ScheduleError::InvalidDuration));
    }

    #[test]
    fn non_positive_totals_are_rejected() {
        assert!(allocate_by_count(Decimal::ZERO, 4).is_err());
        assert!(allocate_by_count(dec!(-10), 4).is_err());
        assert!(allocate_by_amount(Decimal::ZERO, dec!(5)).is_err());
    }

    #[test]
    fn allocate_by_amount_floors_the_count() {
        let count = allocate_by_amount(dec!(1000), dec!(300));
        assert_eq!(count, Ok(3));
    }

    #[test]
    fn allocate_by_amount_rejects_oversized_payouts() {
        let count = allocate_by_amount(dec!(100), dec!(250));
        assert!(count.is_err());
    }

    #[test]
    fn allocate_by_amount_rejects_non_positive_payouts() {
        assert!(allocate_by_amount(dec!(100), Decimal::ZERO).is_err());
        assert!(allocate_by_amount(dec!(100), dec!(-5)).is_err());
    }

    #[test]
    fn final_installment_absorbs_the_rounding_remainder() {
        let total = dec!(100);
        let payout = allocate_by_count(total, 3).unwrap_or_default();
        let amounts: Vec<Decimal> = (0..3)
            .map(|index| installment_amount(total, payout, 3, index))
            .collect();
        assert_eq!(amounts, vec![dec!(33.33), dec!(33.33), dec!(33.34)]);
        assert_eq!(amounts.iter().copied().sum::<Decimal>(), total);
    }

    #[test]
    fn installment_sum_matches_the_total_for_amount_overrides() {
        // floor(1000 / 300) = 3 installments; the last absorbs the rest.
        let total = dec!(1000);
        let payout = dec!(300);
        let count = allocate_by_amount(total, payout).unwrap_or_default();
        let sum: Decimal = (0..count)
            .map(|index| installment_amount(total, payout, count, index))
            .sum();
        assert_eq!(sum, total);
        assert_eq!(installment_amount(total, payout, count, count - 1), dec!(400));
    }

    #[test]
    fn money_string_always_shows_two_decimal_places() {
        assert_eq!(money_string(dec!(10000)), "10000.00");
        assert_eq!(money_string(dec!(33.333)), "33.33");
        assert_eq!(money_string(dec!(0.5)), "0.50");
    }

    #[test]
    fn round_money_uses_midpoint_away_from_zero() {
        assert_eq!(round_money(dec!(2.005)), dec!(2.01));
        assert_eq!(round_money(dec!(-2.005)), dec!(-2.01));
    }
}
