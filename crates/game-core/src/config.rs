/// Tunables for a single game session.
///
/// Price history is sampled on mutation: every walk step and every applied
/// news impact records exactly one point, so a frozen clock records nothing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameConfig {
    pub duration_secs: u32,
    pub starting_capital: u64,
    pub base_price_min: u64,
    pub base_price_max: u64,
    pub price_floor: u64,
    pub price_ceiling: u64,
    pub price_history_cap: usize,
    pub news_history_cap: usize,
    pub news_delay_min_ms: u64,
    pub news_delay_max_ms: u64,
    pub news_min_remaining_secs: u32,
    pub news_reaction_delay_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            duration_secs: 120,
            starting_capital: 10_000_000,
            base_price_min: 5_000_000,
            base_price_max: 9_000_000,
            price_floor: 1_000_000,
            price_ceiling: 20_000_000,
            price_history_cap: 60,
            news_history_cap: 20,
            news_delay_min_ms: 5_000,
            news_delay_max_ms: 8_000,
            news_min_remaining_secs: 5,
            news_reaction_delay_ms: 2_500,
        }
    }
}
