mod assets;
mod config;
mod ledger;
mod news;
mod price;
mod settlement;

pub use assets::{AssetKind, AssetProfile};
pub use config::GameConfig;
pub use ledger::{TradeExecution, TradeSide, TradingLedger};
pub use news::{select_next, NewsHistory, NewsItem, NewsTemplate, Polarity, NEWS_CATALOG};
pub use price::{PriceModel, PricePoint};
pub use settlement::Settlement;

#[cfg(test)]
mod tests {
    use super::GameConfig;

    #[test]
    fn game_config_defaults_match_game_rules() {
        let config = GameConfig::default();
        assert_eq!(config.duration_secs, 120);
        assert_eq!(config.starting_capital, 10_000_000);
        assert_eq!(config.base_price_min, 5_000_000);
        assert_eq!(config.base_price_max, 9_000_000);
        assert_eq!(config.price_floor, 1_000_000);
        assert_eq!(config.price_ceiling, 20_000_000);
        assert_eq!(config.price_history_cap, 60);
        assert_eq!(config.news_history_cap, 20);
        assert_eq!(config.news_delay_min_ms, 5_000);
        assert_eq!(config.news_delay_max_ms, 8_000);
        assert_eq!(config.news_min_remaining_secs, 5);
        assert_eq!(config.news_reaction_delay_ms, 2_500);
    }
}
