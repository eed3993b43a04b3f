use std::collections::VecDeque;

use rand::Rng;
use serde::Serialize;

use crate::assets::AssetProfile;
use crate::config::GameConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PricePoint {
    pub tick: u64,
    pub price: u64,
}

/// The single authoritative price for a session.
///
/// Prices are integer currency units clamped to `[price_floor, price_ceiling]`.
/// Every mutation floors the intermediate product and appends one history
/// point; the history keeps the most recent `price_history_cap` points.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceModel {
    current: u64,
    floor: u64,
    ceiling: u64,
    max_step_pct: f64,
    tick: u64,
    history: VecDeque<PricePoint>,
    history_cap: usize,
}

impl PriceModel {
    pub fn new<R: Rng>(rng: &mut R, config: &GameConfig, profile: &AssetProfile) -> Self {
        let start = rng.random_range(config.base_price_min..=config.base_price_max);
        let mut model = Self {
            current: start,
            floor: config.price_floor,
            ceiling: config.price_ceiling,
            max_step_pct: profile.max_step_pct,
            tick: 0,
            history: VecDeque::with_capacity(config.price_history_cap),
            history_cap: config.price_history_cap,
        };
        model.history.push_back(PricePoint {
            tick: 0,
            price: start,
        });
        model
    }

    pub fn current(&self) -> u64 {
        self.current
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn history(&self) -> impl Iterator<Item = PricePoint> + '_ {
        self.history.iter().copied()
    }

    pub fn history_points(&self) -> Vec<PricePoint> {
        self.history.iter().copied().collect()
    }

    /// Applies a multiplicative news shock. The only mutation path exposed to
    /// the news scheduler. Non-finite or non-positive multipliers are ignored.
    pub fn apply_impact(&mut self, multiplier: f64) -> u64 {
        if !multiplier.is_finite() || multiplier <= 0.0 {
            return self.current;
        }

        self.current = self.clamp(scale(self.current, multiplier));
        self.record_point();
        self.current
    }

    /// One bounded random-walk step: `price × (1 ± pct)` with `pct` drawn
    /// uniformly from `[0, max_step_pct]`.
    pub fn step<R: Rng>(&mut self, rng: &mut R) -> u64 {
        let pct = rng.random_range(0.0..=self.max_step_pct);
        let multiplier = if rng.random_bool(0.5) {
            1.0 + pct
        } else {
            1.0 - pct
        };

        self.current = self.clamp(scale(self.current, multiplier));
        self.record_point();
        self.current
    }

    fn clamp(&self, price: u64) -> u64 {
        price.clamp(self.floor, self.ceiling)
    }

    fn record_point(&mut self) {
        self.tick += 1;
        self.history.push_back(PricePoint {
            tick: self.tick,
            price: self.current,
        });
        while self.history.len() > self.history_cap {
            self.history.pop_front();
        }
    }
}

fn scale(price: u64, multiplier: f64) -> u64 {
    (price as f64 * multiplier).floor() as u64
}
