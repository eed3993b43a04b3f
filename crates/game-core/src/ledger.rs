use serde::Serialize;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TradeSide {
    Buy,
    Sell,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct TradeExecution {
    pub side: TradeSide,
    pub quantity: u64,
    pub price: u64,
    pub cash_after: u64,
    pub holdings_after: u64,
}

/// Cash and holdings for one session. Only two trade shapes exist: buy the
/// maximum affordable whole quantity, or sell the entire holding. Both are
/// total: invalid preconditions are no-ops (`None`), never errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TradingLedger {
    cash: u64,
    holdings: u64,
}

impl TradingLedger {
    pub fn new(starting_capital: u64) -> Self {
        Self {
            cash: starting_capital,
            holdings: 0,
        }
    }

    pub fn cash(&self) -> u64 {
        self.cash
    }

    pub fn holdings(&self) -> u64 {
        self.holdings
    }

    pub fn buy_max(&mut self, price: u64) -> Option<TradeExecution> {
        if price == 0 || self.cash < price {
            return None;
        }

        let quantity = self.cash / price;
        if quantity == 0 {
            return None;
        }

        self.holdings += quantity;
        self.cash -= quantity * price;

        Some(TradeExecution {
            side: TradeSide::Buy,
            quantity,
            price,
            cash_after: self.cash,
            holdings_after: self.holdings,
        })
    }

    pub fn sell_all(&mut self, price: u64) -> Option<TradeExecution> {
        if self.holdings == 0 {
            return None;
        }

        let quantity = self.holdings;
        self.cash = self.cash.saturating_add(quantity.saturating_mul(price));
        self.holdings = 0;

        Some(TradeExecution {
            side: TradeSide::Sell,
            quantity,
            price,
            cash_after: self.cash,
            holdings_after: 0,
        })
    }

    /// Cash plus the quantity-weighted value of remaining holdings.
    pub fn settlement_value(&self, price: u64) -> u64 {
        self.cash.saturating_add(self.holdings.saturating_mul(price))
    }
}

#[cfg(test)]
mod tests {
    use super::{TradeSide, TradingLedger};

    #[test]
    fn buy_max_then_sell_all_at_higher_price_realizes_gain() {
        let mut ledger = TradingLedger::new(20_000_000);

        let buy = ledger.buy_max(5_000_000).unwrap();
        assert_eq!(buy.side, TradeSide::Buy);
        assert_eq!(buy.quantity, 4);
        assert_eq!(ledger.cash(), 0);
        assert_eq!(ledger.holdings(), 4);

        let sell = ledger.sell_all(6_000_000).unwrap();
        assert_eq!(sell.side, TradeSide::Sell);
        assert_eq!(sell.quantity, 4);
        assert_eq!(ledger.cash(), 24_000_000);
        assert_eq!(ledger.holdings(), 0);
        assert_eq!(ledger.settlement_value(6_000_000), 24_000_000);
    }

    #[test]
    fn buy_keeps_remainder_cash_when_price_does_not_divide_evenly() {
        let mut ledger = TradingLedger::new(10_000_000);

        let buy = ledger.buy_max(7_000_000).unwrap();

        assert_eq!(buy.quantity, 1);
        assert_eq!(ledger.cash(), 3_000_000);
        assert_eq!(ledger.holdings(), 1);
    }

    #[test]
    fn insufficient_cash_buy_is_a_no_op() {
        let mut ledger = TradingLedger::new(1_000_000);

        assert!(ledger.buy_max(5_000_000).is_none());
        assert_eq!(ledger.cash(), 1_000_000);
        assert_eq!(ledger.holdings(), 0);
    }

    #[test]
    fn zero_price_buy_is_a_no_op() {
        let mut ledger = TradingLedger::new(1_000_000);

        assert!(ledger.buy_max(0).is_none());
        assert_eq!(ledger.cash(), 1_000_000);
    }

    #[test]
    fn empty_holdings_sell_is_a_no_op() {
        let mut ledger = TradingLedger::new(1_000_000);

        assert!(ledger.sell_all(5_000_000).is_none());
        assert_eq!(ledger.cash(), 1_000_000);
        assert_eq!(ledger.holdings(), 0);
    }

    #[test]
    fn buy_then_sell_at_same_price_restores_cash_exactly() {
        let mut ledger = TradingLedger::new(10_000_000);

        ledger.buy_max(6_500_000).unwrap();
        ledger.sell_all(6_500_000).unwrap();

        assert_eq!(ledger.cash(), 10_000_000);
        assert_eq!(ledger.holdings(), 0);
    }

    #[test]
    fn settlement_value_includes_unsold_holdings() {
        let mut ledger = TradingLedger::new(10_000_000);

        ledger.buy_max(5_000_000).unwrap();

        assert_eq!(ledger.settlement_value(7_000_000), 14_000_000);
    }
}
