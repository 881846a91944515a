//! Property tests for the tax engine invariants.

use proptest::prelude::{prop_assert, prop_assert_eq, proptest};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tax_core::calculations::{PaymentSchedule, payment_schedule};
use tax_core::{PaymentFrequency, TaxEngine};

/// Amount in cents, as a two-place decimal.
fn cents(value: u64) -> Decimal {
    Decimal::new(value as i64, 2)
}

fn frequency_from_index(index: usize) -> PaymentFrequency {
    let token = PaymentFrequency::TOKENS[index % PaymentFrequency::TOKENS.len()];
    PaymentFrequency::parse(token).unwrap()
}

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(256))]

    #[test]
    fn prop_breakdown_slices_sum_to_taxable_income(taxable in 0u64..20_000_000_00) {
        let engine = TaxEngine::default();
        let taxable = cents(taxable);

        let result = engine.income_tax(taxable);

        let sliced: Decimal = result.bracket_breakdown.iter().map(|b| b.taxable_amount).sum();
        let tolerance = dec!(0.01) * Decimal::from(result.bracket_breakdown.len());
        prop_assert!((sliced - taxable).abs() <= tolerance);
    }

    #[test]
    fn prop_income_tax_is_monotonic(
        low in 0u64..10_000_000_00,
        delta in 0u64..1_000_000_00,
    ) {
        let engine = TaxEngine::default();

        let lower = engine.income_tax(cents(low));
        let higher = engine.income_tax(cents(low + delta));

        prop_assert!(higher.total_tax >= lower.total_tax);
    }

    #[test]
    fn prop_social_security_is_twenty_percent_of_gross(
        gross in 0u64..10_000_000_00,
        expenses in 0u64..10_000_000_00,
    ) {
        let engine = TaxEngine::default();
        let gross = cents(gross);

        let direct = engine.social_security(gross);
        prop_assert!((direct.total_contribution - gross * dec!(0.20)).abs() <= dec!(0.01));

        if gross > Decimal::ZERO {
            let summary = engine.summary(gross, cents(expenses));
            prop_assert_eq!(summary.social_security, direct);
        }
    }

    #[test]
    fn prop_installments_cover_annual_total(
        annual in 0u64..10_000_000_00,
        frequency in 0usize..3,
    ) {
        let annual = cents(annual);
        let frequency = frequency_from_index(frequency);

        let plan = PaymentSchedule::new(annual, frequency);

        let count = Decimal::from(plan.number_of_payments);
        prop_assert_eq!(plan.schedule.len() as u32, plan.number_of_payments);
        prop_assert!((plan.payment_amount * count - annual).abs() <= dec!(0.01) * count);
    }

    #[test]
    fn prop_calculations_are_idempotent(
        gross in 0u64..5_000_000_00,
        expenses in 0u64..5_000_000_00,
    ) {
        let engine = TaxEngine::default();

        let first = engine.summary(cents(gross), cents(expenses));
        let second = engine.summary(cents(gross), cents(expenses));
        prop_assert_eq!(&first, &second);

        let first_plan = payment_schedule(first.total_taxes, "monthly").unwrap();
        let second_plan = payment_schedule(second.total_taxes, "monthly").unwrap();
        prop_assert_eq!(first_plan, second_plan);
    }

    #[test]
    fn prop_net_income_plus_taxes_is_gross(
        gross in 1u64..5_000_000_00,
        expenses in 0u64..5_000_000_00,
    ) {
        let summary = TaxEngine::default().summary(cents(gross), cents(expenses));

        prop_assert_eq!(summary.net_income + summary.total_taxes, summary.gross_income);
        prop_assert!(summary.taxable_income >= Decimal::ZERO);
    }
}
