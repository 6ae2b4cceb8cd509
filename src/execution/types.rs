//! Execution types

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Trade side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    /// Spend cash to acquire the asset
    Buy,
    /// Sell part of the held asset for cash
    Sell,
}

/// A simulated trade decided by the threshold rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeAction {
    pub side: Side,
    /// Execution price
    pub price: Decimal,
    /// Asset quantity bought or sold
    pub quantity: Decimal,
    /// Cash spent (buy) or received (sell)
    pub notional: Decimal,
    /// Cash balance after the trade
    pub cash_after: Decimal,
    /// Asset balance after the trade
    pub held_after: Decimal,
}
