//! Simulated account summary

use super::view::{format_signed, format_usd};
use crate::store::AssetBalance;
use rust_decimal::Decimal;

/// Cash, holding and mark-to-market equity of the paper account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountSummary {
    pub quote_asset: String,
    pub base_asset: String,
    pub cash: Decimal,
    pub held: Decimal,
    /// Latest price of the traded pair, zero when unknown
    pub mark_price: Decimal,
    pub equity: Decimal,
    /// Equity minus the starting equity
    pub pnl: Decimal,
}

impl AccountSummary {
    pub fn compute(
        balances: &[AssetBalance],
        base_asset: &str,
        quote_asset: &str,
        mark_price: Option<Decimal>,
        initial_equity: Decimal,
    ) -> Self {
        let amount = |asset: &str| {
            balances
                .iter()
                .find(|b| b.asset == asset)
                .map(|b| b.amount)
                .unwrap_or(Decimal::ZERO)
        };
        let cash = amount(quote_asset);
        let held = amount(base_asset);
        let mark_price = mark_price.unwrap_or(Decimal::ZERO);
        let equity = cash.saturating_add(held.saturating_mul(mark_price));

        Self {
            quote_asset: quote_asset.to_string(),
            base_asset: base_asset.to_string(),
            cash,
            held,
            mark_price,
            equity,
            pnl: equity.saturating_sub(initial_equity),
        }
    }

    pub fn render(&self) -> String {
        let mut held = self.held.round_dp(6);
        held.rescale(6);

        format!(
            "Paper account\n  Cash ({}): {}\n  Held {}: {}\n  Net equity: {} ({})\n",
            self.quote_asset,
            format_usd(self.cash, 2),
            self.base_asset,
            held,
            format_usd(self.equity, 2),
            format_signed(self.pnl, 2),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn balances(cash: Decimal, held: Decimal) -> Vec<AssetBalance> {
        vec![
            AssetBalance {
                asset: "USDT".into(),
                amount: cash,
            },
            AssetBalance {
                asset: "BTC".into(),
                amount: held,
            },
        ]
    }

    #[test]
    fn test_equity_marks_holding() {
        let summary = AccountSummary::compute(
            &balances(dec!(90000), dec!(0.5)),
            "BTC",
            "USDT",
            Some(dec!(100000)),
            dec!(100000),
        );
        assert_eq!(summary.equity, dec!(140000));
        assert_eq!(summary.pnl, dec!(40000));

        let text = summary.render();
        assert!(text.contains("Cash (USDT): $90,000.00"));
        assert!(text.contains("Held BTC: 0.500000"));
        assert!(text.contains("Net equity: $140,000.00 (+40000.00)"));
    }

    #[test]
    fn test_missing_price_and_rows_read_as_zero() {
        let summary = AccountSummary::compute(&[], "BTC", "USDT", None, dec!(100000));
        assert_eq!(summary.equity, dec!(0));
        assert_eq!(summary.pnl, dec!(-100000));
        assert!(summary.render().contains("(-100000.00)"));
    }

    #[test]
    fn test_huge_holding_saturates() {
        let summary = AccountSummary::compute(
            &balances(Decimal::MAX, Decimal::MAX),
            "BTC",
            "USDT",
            Some(dec!(100000)),
            dec!(100000),
        );
        assert_eq!(summary.equity, Decimal::MAX);
        assert!(summary.render().starts_with("Paper account"));
    }
}
