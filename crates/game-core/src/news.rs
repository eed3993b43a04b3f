use std::collections::VecDeque;

use rand::Rng;
use serde::Serialize;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    Good,
    Bad,
}

/// One entry of the static news catalog. Good news carries a multiplier above
/// 1.0, bad news below.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewsTemplate {
    pub text: &'static str,
    pub polarity: Polarity,
    pub impact_multiplier: f64,
}

pub const NEWS_CATALOG: &[NewsTemplate] = &[
    NewsTemplate {
        text: "Regulators announce surprise easing for the asset class!",
        polarity: Polarity::Good,
        impact_multiplier: 1.15,
    },
    NewsTemplate {
        text: "Global recession fears spread across markets",
        polarity: Polarity::Bad,
        impact_multiplier: 0.85,
    },
    NewsTemplate {
        text: "Major institutional buyers pile in",
        polarity: Polarity::Good,
        impact_multiplier: 1.10,
    },
    NewsTemplate {
        text: "Profit-taking wave floods the order book",
        polarity: Polarity::Bad,
        impact_multiplier: 0.90,
    },
    NewsTemplate {
        text: "Technical rebound zone reached",
        polarity: Polarity::Good,
        impact_multiplier: 1.08,
    },
    NewsTemplate {
        text: "Security breach reported at a major venue!",
        polarity: Polarity::Bad,
        impact_multiplier: 0.75,
    },
    NewsTemplate {
        text: "Surprise earnings beat announced",
        polarity: Polarity::Good,
        impact_multiplier: 1.25,
    },
];

/// A news event as shown to the player. The price impact is applied
/// separately, after the reaction delay.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewsItem {
    pub text: String,
    pub polarity: Polarity,
    pub impact_multiplier: f64,
    pub seconds_elapsed: u32,
}

/// Uniform draw from `catalog`, excluding the immediately previous event's
/// text. Falls back to the unrestricted catalog if the filter empties the
/// pool, which can only happen for a single-entry catalog.
pub fn select_next<'a, R: Rng>(
    rng: &mut R,
    catalog: &'a [NewsTemplate],
    exclude_text: Option<&str>,
) -> &'a NewsTemplate {
    debug_assert!(!catalog.is_empty(), "news catalog must not be empty");

    let eligible: Vec<&NewsTemplate> = catalog
        .iter()
        .filter(|template| exclude_text != Some(template.text))
        .collect();

    if eligible.is_empty() {
        &catalog[rng.random_range(0..catalog.len())]
    } else {
        eligible[rng.random_range(0..eligible.len())]
    }
}

/// Bounded most-recent-first record of emitted events. Purely observational.
#[derive(Debug, Clone, PartialEq)]
pub struct NewsHistory {
    items: VecDeque<NewsItem>,
    cap: usize,
}

impl NewsHistory {
    pub fn new(cap: usize) -> Self {
        Self {
            items: VecDeque::with_capacity(cap),
            cap,
        }
    }

    pub fn push(&mut self, item: NewsItem) {
        self.items.push_front(item);
        self.items.truncate(self.cap);
    }

    pub fn latest(&self) -> Option<&NewsItem> {
        self.items.front()
    }

    pub fn items(&self) -> Vec<NewsItem> {
        self.items.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
