//! Per-symbol series built from loaded samples

use crate::store::PriceSample;
use rust_decimal::{Decimal, RoundingStrategy};

/// Samples of one symbol, oldest first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolSeries {
    pub symbol: String,
    pub samples: Vec<PriceSample>,
}

impl SymbolSeries {
    /// Most recent sample
    pub fn latest(&self) -> Option<&PriceSample> {
        self.samples.last()
    }

    /// Percentage change from the preceding sample to the latest one
    pub fn change_pct(&self) -> Option<Decimal> {
        let n = self.samples.len();
        if n < 2 {
            return None;
        }
        let prev = self.samples[n - 2].price;
        let latest = self.samples[n - 1].price;
        if prev.is_zero() {
            return None;
        }
        latest
            .checked_sub(prev)?
            .checked_div(prev)?
            .checked_mul(Decimal::ONE_HUNDRED)
    }

    /// Text table of the last `window` samples, oldest first
    pub fn recent_table(&self, window: usize) -> String {
        let start = self.samples.len().saturating_sub(window);
        let mut out = format!("{:<19}  {:<12}  {}\n", "time", "symbol", "price");
        for s in &self.samples[start..] {
            out.push_str(&format!("{:<19}  {:<12}  {}\n", s.time, s.symbol, s.price));
        }
        out
    }
}

/// Loaded samples grouped by symbol
#[derive(Debug, Clone, Default)]
pub struct MarketView {
    series: Vec<SymbolSeries>,
}

impl MarketView {
    /// Group samples by symbol.
    ///
    /// Symbols keep the order in which they first appear in `samples`;
    /// each series is re-sorted by timestamp, ties keeping input order.
    pub fn from_samples(samples: Vec<PriceSample>) -> Self {
        let mut series: Vec<SymbolSeries> = Vec::new();
        for sample in samples {
            match series.iter_mut().find(|s| s.symbol == sample.symbol) {
                Some(s) => s.samples.push(sample),
                None => series.push(SymbolSeries {
                    symbol: sample.symbol.clone(),
                    samples: vec![sample],
                }),
            }
        }

        for s in &mut series {
            let mut indexed: Vec<(usize, PriceSample)> = s.samples.drain(..).enumerate().collect();
            // Input is newest first, so a later index is an older row
            indexed.sort_by(|(ia, a), (ib, b)| a.time.cmp(&b.time).then(ib.cmp(ia)));
            s.samples = indexed.into_iter().map(|(_, sample)| sample).collect();
        }

        Self { series }
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Available symbols
    pub fn symbols(&self) -> Vec<&str> {
        self.series.iter().map(|s| s.symbol.as_str()).collect()
    }

    pub fn series(&self, symbol: &str) -> Option<&SymbolSeries> {
        self.series.iter().find(|s| s.symbol == symbol)
    }

    /// Requested symbol, or the first one when none is given
    pub fn select(&self, symbol: Option<&str>) -> Option<&SymbolSeries> {
        match symbol {
            Some(symbol) => self.series(symbol),
            None => self.series.first(),
        }
    }

    /// Latest price of `symbol`, if loaded
    pub fn latest_price(&self, symbol: &str) -> Option<Decimal> {
        self.series(symbol)
            .and_then(|s| s.latest())
            .map(|s| s.price)
    }
}

/// Signed percentage with two decimals, e.g. "+10.00%"
pub fn format_change(pct: Decimal) -> String {
    format!("{}%", format_signed(pct, 2))
}

/// Value rounded to `dp` decimals with an explicit sign
pub fn format_signed(value: Decimal, dp: u32) -> String {
    let mut rounded = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(dp);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        rounded.to_string()
    } else {
        format!("+{}", rounded.abs())
    }
}

/// Dollar amount with thousands separators and `dp` decimals
pub fn format_usd(value: Decimal, dp: u32) -> String {
    let mut rounded = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(dp);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let text = rounded.abs().to_string();
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i.to_string(), Some(f.to_string())),
        None => (text, None),
    };

    let mut grouped = String::new();
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if negative { "-" } else { "" };
    match frac_part {
        Some(f) => format!("{}${}.{}", sign, grouped, f),
        None => format!("{}${}", sign, grouped),
    }
}
