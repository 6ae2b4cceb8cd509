//! Execution module
//!
//! Paper trading against simulated balances

mod paper;
mod types;

pub use paper::{PaperTrader, ThresholdRule};
pub use types::{Side, TradeAction};
