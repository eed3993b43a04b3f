use game_core::{AssetKind, Polarity, TradeSide};

#[derive(Clone, Debug, serde::Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum SessionEvent {
    Connected,
    Started {
        asset: AssetKind,
        starting_capital: u64,
        duration_secs: u32,
        price: u64,
    },
    ClockTick {
        remaining_secs: u32,
    },
    PriceUpdated {
        tick: u64,
        price: u64,
    },
    NewsPublished {
        text: String,
        polarity: Polarity,
        impact_multiplier: f64,
    },
    TradeExecuted {
        side: TradeSide,
        quantity: u64,
        price: u64,
        cash: u64,
        holdings: u64,
    },
    Ended {
        final_value: u64,
        return_rate: f64,
    },
}

impl SessionEvent {
    pub fn connected() -> Self {
        Self::Connected
    }

    pub fn news_published(text: impl Into<String>, polarity: Polarity, impact_multiplier: f64) -> Self {
        Self::NewsPublished {
            text: text.into(),
            polarity,
            impact_multiplier,
        }
    }
}
