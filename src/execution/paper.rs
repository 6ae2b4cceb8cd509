//! Paper trading threshold rule
//!
//! Buys a fixed fraction of cash below a low threshold and sells a fixed
//! fraction of the holding above a high threshold. Balances live in the
//! shared store and each trade is two separate updates, debit then credit,
//! with nothing tying them together.

use super::{Side, TradeAction};
use crate::config::TradingConfig;
use crate::store::{BalanceBook, StoreError};
use rust_decimal::Decimal;

/// Static buy/sell thresholds with fixed-fraction sizing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThresholdRule {
    /// Buy when price is strictly below this
    pub buy_below: Decimal,
    /// Sell when price is strictly above this
    pub sell_above: Decimal,
    /// Fraction of cash spent per buy (e.g., 0.1 = 10%)
    pub buy_fraction: Decimal,
    /// Fraction of holding sold per sell (e.g., 0.5 = 50%)
    pub sell_fraction: Decimal,
}

impl ThresholdRule {
    /// Create from TradingConfig
    pub fn from_config(config: &TradingConfig) -> Self {
        Self {
            buy_below: config.buy_below,
            sell_above: config.sell_above,
            buy_fraction: config.buy_fraction,
            sell_fraction: config.sell_fraction,
        }
    }

    /// Decide the trade for `price` given current cash and holding.
    ///
    /// Amounts too large for `Decimal` produce no trade.
    pub fn decide(&self, price: Decimal, cash: Decimal, held: Decimal) -> Option<TradeAction> {
        if price <= Decimal::ZERO {
            return None;
        }

        if price < self.buy_below {
            let spend = cash.checked_mul(self.buy_fraction)?;
            if spend <= Decimal::ZERO {
                return None;
            }
            let quantity = spend.checked_div(price)?;
            return Some(TradeAction {
                side: Side::Buy,
                price,
                quantity,
                notional: spend,
                cash_after: cash.checked_sub(spend)?,
                held_after: held.checked_add(quantity)?,
            });
        }

        if price > self.sell_above {
            let quantity = held.checked_mul(self.sell_fraction)?;
            if quantity <= Decimal::ZERO {
                return None;
            }
            let proceeds = quantity.checked_mul(price)?;
            return Some(TradeAction {
                side: Side::Sell,
                price,
                quantity,
                notional: proceeds,
                cash_after: cash.checked_add(proceeds)?,
                held_after: held.checked_sub(quantity)?,
            });
        }

        None
    }
}

impl Default for ThresholdRule {
    fn default() -> Self {
        Self::from_config(&TradingConfig::default())
    }
}

/// Applies the threshold rule to balances held in a store
#[derive(Debug, Clone)]
pub struct PaperTrader {
    rule: ThresholdRule,
    /// Pair whose samples drive the rule
    symbol: String,
    /// Asset bought and sold
    base_asset: String,
    /// Cash asset
    quote_asset: String,
}

impl PaperTrader {
    pub fn new(
        rule: ThresholdRule,
        symbol: impl Into<String>,
        base_asset: impl Into<String>,
        quote_asset: impl Into<String>,
    ) -> Self {
        Self {
            rule,
            symbol: symbol.into(),
            base_asset: base_asset.into(),
            quote_asset: quote_asset.into(),
        }
    }

    /// Create from TradingConfig
    pub fn from_config(config: &TradingConfig) -> Self {
        Self::new(
            ThresholdRule::from_config(config),
            &config.symbol,
            &config.base_asset,
            &config.quote_asset,
        )
    }

    /// Whether samples of `symbol` drive this trader
    pub fn watches(&self, symbol: &str) -> bool {
        self.symbol == symbol
    }

    pub fn rule(&self) -> &ThresholdRule {
        &self.rule
    }

    /// Read balances, decide, and write the two updates.
    ///
    /// A failure between the debit and the credit leaves the book
    /// inconsistent; nothing reconciles it.
    pub async fn apply<B>(&self, book: &B, price: Decimal) -> Result<Option<TradeAction>, StoreError>
    where
        B: BalanceBook + ?Sized,
    {
        let cash = book.balance(&self.quote_asset).await?;
        let held = book.balance(&self.base_asset).await?;

        let Some(action) = self.rule.decide(price, cash, held) else {
            tracing::debug!(%price, %cash, %held, "Threshold rule: no action");
            return Ok(None);
        };

        match action.side {
            Side::Buy => {
                book.set_balance(&self.quote_asset, action.cash_after).await?;
                book.set_balance(&self.base_asset, action.held_after).await?;
            }
            Side::Sell => {
                book.set_balance(&self.base_asset, action.held_after).await?;
                book.set_balance(&self.quote_asset, action.cash_after).await?;
            }
        }

        tracing::info!(
            side = ?action.side,
            price = %action.price,
            quantity = %action.quantity,
            notional = %action.notional,
            cash = %action.cash_after,
            held = %action.held_after,
            "Paper trade executed"
        );

        Ok(Some(action))
    }
}
