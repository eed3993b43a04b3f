use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use game_core::{
    select_next, AssetKind, AssetProfile, GameConfig, NewsHistory, NewsItem, PriceModel,
    PricePoint, Settlement, TradeExecution, TradingLedger, NEWS_CATALOG,
};

use crate::events::SessionEvent;

const EVENT_CHANNEL_CAPACITY: usize = 256;

#[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Idle,
    Running,
    Ended,
}

/// One game session: countdown clock, news scheduler, deferred price impacts
/// and the player's ledger, all mutating one shared state.
///
/// Every timer callback re-checks `status` at the moment it fires and no-ops
/// once the session has ended; aborting the spawned tasks is best-effort
/// cleanup on top of that guard, not the correctness mechanism.
#[derive(Clone)]
pub struct GameSession {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    config: GameConfig,
    asset: AssetProfile,
    state: Mutex<GameState>,
    events_tx: broadcast::Sender<SessionEvent>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

struct GameState {
    status: SessionStatus,
    frozen: bool,
    time_remaining_secs: u32,
    price: PriceModel,
    ledger: TradingLedger,
    news: NewsHistory,
    last_news_text: Option<&'static str>,
    rng: StdRng,
    settlement: Option<Settlement>,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct SessionSnapshot {
    pub status: SessionStatus,
    pub asset: AssetKind,
    pub frozen: bool,
    pub time_remaining_secs: u32,
    pub price: u64,
    pub cash: u64,
    pub holdings: u64,
    pub total_value: u64,
    pub return_rate: f64,
    pub price_history: Vec<PricePoint>,
    pub news: Vec<NewsItem>,
    pub settlement: Option<Settlement>,
}

impl GameSession {
    pub fn new(asset: AssetKind, config: GameConfig, seed: u64) -> Self {
        let profile = asset.profile();
        let mut rng = StdRng::seed_from_u64(seed);
        let price = PriceModel::new(&mut rng, &config, &profile);
        let (events_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        let state = GameState {
            status: SessionStatus::Idle,
            frozen: false,
            time_remaining_secs: config.duration_secs,
            price,
            ledger: TradingLedger::new(config.starting_capital),
            news: NewsHistory::new(config.news_history_cap),
            last_news_text: None,
            rng,
            settlement: None,
        };

        Self {
            inner: Arc::new(SessionInner {
                config,
                asset: profile,
                state: Mutex::new(state),
                events_tx,
                tasks: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Idle → Running. Spawns the countdown and news tasks; must be called
    /// from within a tokio runtime. Calling it twice is a no-op.
    pub fn start(&self) {
        {
            let mut state = self.inner.lock_state();
            if state.status != SessionStatus::Idle {
                return;
            }
            state.status = SessionStatus::Running;
            self.inner.publish(SessionEvent::Started {
                asset: self.inner.asset.kind,
                starting_capital: self.inner.config.starting_capital,
                duration_secs: self.inner.config.duration_secs,
                price: state.price.current(),
            });
        }

        info!(asset = self.inner.asset.display_name, "session started");

        let clock = tokio::spawn(run_clock(Arc::clone(&self.inner)));
        let news = tokio::spawn(run_news_schedule(Arc::clone(&self.inner)));
        let mut tasks = self.inner.lock_tasks();
        tasks.push(clock);
        tasks.push(news);
    }

    /// All-in buy at the current price. No-op unless Running and the cash
    /// covers at least one unit.
    pub fn buy(&self) -> Option<TradeExecution> {
        self.trade(|ledger, price| ledger.buy_max(price))
    }

    /// All-out sell at the current price. No-op unless Running and holdings
    /// are non-zero.
    pub fn sell(&self) -> Option<TradeExecution> {
        self.trade(|ledger, price| ledger.sell_all(price))
    }

    fn trade(
        &self,
        op: impl FnOnce(&mut TradingLedger, u64) -> Option<TradeExecution>,
    ) -> Option<TradeExecution> {
        let mut state = self.inner.lock_state();
        if state.status != SessionStatus::Running {
            return None;
        }

        let price = state.price.current();
        let execution = op(&mut state.ledger, price)?;
        drop(state);

        debug!(
            side = ?execution.side,
            quantity = execution.quantity,
            price = execution.price,
            "trade executed"
        );
        self.inner.publish(SessionEvent::TradeExecuted {
            side: execution.side,
            quantity: execution.quantity,
            price: execution.price,
            cash: execution.cash_after,
            holdings: execution.holdings_after,
        });
        Some(execution)
    }

    /// Practice-mode hold: a frozen clock neither counts down nor walks the
    /// price, but trades and news remain live.
    pub fn set_frozen(&self, frozen: bool) {
        self.inner.lock_state().frozen = frozen;
    }

    /// Explicit end override. Returns the settlement on the first call and
    /// `None` once the session has already ended; both paths cancel every
    /// pending timer.
    pub fn end(&self) -> Option<Settlement> {
        let settlement = self.inner.finish();
        self.inner.abort_tasks();
        settlement
    }

    pub fn status(&self) -> SessionStatus {
        self.inner.lock_state().status
    }

    pub fn settlement(&self) -> Option<Settlement> {
        self.inner.lock_state().settlement
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.inner.events_tx.subscribe()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.inner.lock_state();
        let price = state.price.current();
        let total_value = state.ledger.settlement_value(price);
        let return_rate =
            Settlement::from_final_value(total_value, self.inner.config.starting_capital)
                .return_rate;

        SessionSnapshot {
            status: state.status,
            asset: self.inner.asset.kind,
            frozen: state.frozen,
            time_remaining_secs: state.time_remaining_secs,
            price,
            cash: state.ledger.cash(),
            holdings: state.ledger.holdings(),
            total_value,
            return_rate,
            price_history: state.price.history_points(),
            news: state.news.items(),
            settlement: state.settlement,
        }
    }
}

impl SessionInner {
    fn lock_state(&self) -> MutexGuard<'_, GameState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lock_tasks(&self) -> MutexGuard<'_, Vec<JoinHandle<()>>> {
        self.tasks.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn publish(&self, event: SessionEvent) {
        // Nobody listening is fine; presentation is fire-and-forget.
        let _ = self.events_tx.send(event);
    }

    /// Running → Ended, exactly once. The first caller produces the
    /// settlement; later callers get `None`.
    fn finish(&self) -> Option<Settlement> {
        let mut state = self.lock_state();
        if state.status == SessionStatus::Ended {
            return None;
        }
        state.status = SessionStatus::Ended;

        let final_value = state.ledger.settlement_value(state.price.current());
        let settlement = Settlement::from_final_value(final_value, self.config.starting_capital);
        state.settlement = Some(settlement);
        drop(state);

        info!(
            final_value = settlement.final_value,
            return_rate = settlement.return_rate,
            "session ended"
        );
        self.publish(SessionEvent::Ended {
            final_value: settlement.final_value,
            return_rate: settlement.return_rate,
        });
        Some(settlement)
    }

    fn abort_tasks(&self) {
        let mut tasks = self.lock_tasks();
        for task in tasks.drain(..) {
            task.abort();
        }
    }
}

impl Drop for SessionInner {
    fn drop(&mut self) {
        if let Ok(tasks) = self.tasks.get_mut() {
            for task in tasks.drain(..) {
                task.abort();
            }
        }
    }
}

/// Countdown driver: once per second, decrement the clock and take one price
/// walk step. Reaching zero ends the session and cancels the other timers.
async fn run_clock(inner: Arc<SessionInner>) {
    let mut ticker = tokio::time::interval(Duration::from_secs(1));
    // The first interval tick completes immediately; skip it so the countdown
    // starts one full second after start().
    ticker.tick().await;

    loop {
        ticker.tick().await;

        let reached_zero = {
            let mut state = inner.lock_state();
            if state.status != SessionStatus::Running {
                break;
            }
            if state.frozen {
                continue;
            }

            state.time_remaining_secs -= 1;
            let GameState { price, rng, .. } = &mut *state;
            let current = price.step(rng);
            let tick = price.tick();
            let remaining = state.time_remaining_secs;

            inner.publish(SessionEvent::PriceUpdated {
                tick,
                price: current,
            });
            inner.publish(SessionEvent::ClockTick {
                remaining_secs: remaining,
            });
            remaining == 0
        };

        if reached_zero {
            inner.finish();
            inner.abort_tasks();
            break;
        }
    }
}

/// News driver: one immediate emission, then a randomized 5-8 s cadence.
/// Each emission defers its price impact by the fixed reaction delay; the
/// impact re-checks the session status at fire time and discards itself if
/// the session has ended in the meantime.
async fn run_news_schedule(inner: Arc<SessionInner>) {
    loop {
        let emitted = emit_news(&inner);
        if !emitted {
            break;
        }

        let delay_ms = {
            let mut state = inner.lock_state();
            state
                .rng
                .random_range(inner.config.news_delay_min_ms..=inner.config.news_delay_max_ms)
        };
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    }
}

/// Emits one news event if the session is Running with enough time left.
/// Returns false once the schedule should stop.
fn emit_news(inner: &Arc<SessionInner>) -> bool {
    let template = {
        let mut state = inner.lock_state();
        if state.status != SessionStatus::Running {
            return false;
        }
        if state.time_remaining_secs <= inner.config.news_min_remaining_secs {
            return false;
        }

        let GameState {
            rng,
            news,
            last_news_text,
            time_remaining_secs,
            ..
        } = &mut *state;
        let template = select_next(rng, NEWS_CATALOG, *last_news_text);
        *last_news_text = Some(template.text);
        news.push(NewsItem {
            text: template.text.to_owned(),
            polarity: template.polarity,
            impact_multiplier: template.impact_multiplier,
            seconds_elapsed: inner.config.duration_secs - *time_remaining_secs,
        });
        *template
    };

    debug!(text = template.text, "news emitted");
    inner.publish(SessionEvent::news_published(
        template.text,
        template.polarity,
        template.impact_multiplier,
    ));

    let impact_inner = Arc::clone(inner);
    let reaction_delay = Duration::from_millis(inner.config.news_reaction_delay_ms);
    let impact = tokio::spawn(async move {
        tokio::time::sleep(reaction_delay).await;

        let mut state = impact_inner.lock_state();
        if state.status != SessionStatus::Running {
            // The session ended while the impact was pending; discard it.
            return;
        }
        let price = state.price.apply_impact(template.impact_multiplier);
        let tick = state.price.tick();
        impact_inner.publish(SessionEvent::PriceUpdated { tick, price });
    });
    inner.lock_tasks().push(impact);

    true
}
