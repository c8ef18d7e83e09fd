//! The trading loop.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};
use tradebot_core::error::{FetchError, IndicatorError, OrderError, TradingError};
use tradebot_core::traits::{MarketDataGateway, OrderDispatcher, SignalRule};
use tradebot_core::types::{Candle, Order, PriceSeries};
use tradebot_indicators::IndicatorEngine;
use tradebot_risk::{FillLedger, RejectReason, RiskDecision, RiskGate, RiskState};

use crate::SessionStats;

/// How prices are obtained each cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataMode {
    /// Poll the latest price and grow a local series
    Quotes,
    /// Fetch a fresh candle window
    Candles { interval_secs: u64, lookback: usize },
}

/// Trader configuration.
#[derive(Debug, Clone)]
pub struct TraderConfig {
    pub symbol: String,
    /// Shares per order
    pub order_quantity: Decimal,
    pub poll_interval: Duration,
    pub data_mode: DataMode,
    /// Prices kept in quote mode (0 = unlimited)
    pub history_capacity: usize,
    /// Leave the loop once the gateway reports no data
    pub stop_on_no_data: bool,
}

impl TraderConfig {
    pub fn new(symbol: impl Into<String>, order_quantity: Decimal) -> Self {
        Self {
            symbol: symbol.into(),
            order_quantity,
            poll_interval: Duration::from_secs(60),
            data_mode: DataMode::Quotes,
            history_capacity: 1000,
            stop_on_no_data: false,
        }
    }
}

/// What a single cycle did.
#[derive(Debug)]
pub enum CycleOutcome {
    /// Not enough history for the indicators yet
    WarmingUp { required: usize, available: usize },
    /// The rule produced no signal
    Hold,
    /// The risk gate refused the signal
    Rejected(RejectReason),
    /// An order was accepted by the dispatcher
    Executed(Order),
    /// A collaborator failed; nothing was traded
    Failed(TradingError),
}

impl CycleOutcome {
    pub fn is_executed(&self) -> bool {
        matches!(self, CycleOutcome::Executed(_))
    }

    fn is_no_data(&self) -> bool {
        matches!(
            self,
            CycleOutcome::Failed(TradingError::Fetch(FetchError::NoData(_)))
        )
    }
}

/// An order whose fills are still arriving.
#[derive(Debug, Clone)]
struct PendingOrder {
    id: String,
    /// Quantity already booked into the ledger
    booked: Decimal,
}

/// Single-symbol polling trader.
///
/// Runs Gateway -> Indicators -> Signal -> Risk -> Dispatch once per cycle.
/// Any collaborator failure abandons the cycle without placing an order.
pub struct Trader {
    config: TraderConfig,
    gateway: Arc<dyn MarketDataGateway>,
    dispatcher: Arc<dyn OrderDispatcher>,
    engine: IndicatorEngine,
    rule: Box<dyn SignalRule>,
    gate: RiskGate,
    risk_state: RiskState,
    series: PriceSeries,
    ledger: FillLedger,
    pending: Vec<PendingOrder>,
    stats: SessionStats,
}

impl Trader {
    pub fn new(
        config: TraderConfig,
        gateway: Arc<dyn MarketDataGateway>,
        dispatcher: Arc<dyn OrderDispatcher>,
        engine: IndicatorEngine,
        rule: Box<dyn SignalRule>,
        gate: RiskGate,
        risk_state: RiskState,
    ) -> Self {
        let series = PriceSeries::with_capacity(config.symbol.clone(), config.history_capacity);
        Self {
            config,
            gateway,
            dispatcher,
            engine,
            rule,
            gate,
            risk_state,
            series,
            ledger: FillLedger::new(),
            pending: Vec::new(),
            stats: SessionStats::default(),
        }
    }

    pub fn config(&self) -> &TraderConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut TraderConfig {
        &mut self.config
    }

    pub fn risk_state(&self) -> &RiskState {
        &self.risk_state
    }

    pub fn ledger(&self) -> &FillLedger {
        &self.ledger
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    /// Prices accumulated in quote mode.
    pub fn series(&self) -> &PriceSeries {
        &self.series
    }

    /// Orders still waiting for fills.
    pub fn pending_orders(&self) -> usize {
        self.pending.len()
    }

    /// Run cycles until `shutdown` resolves.
    pub async fn run<F>(&mut self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        info!(
            symbol = %self.config.symbol,
            rule = self.rule.name(),
            gateway = self.gateway.name(),
            dispatcher = self.dispatcher.name(),
            interval_secs = self.config.poll_interval.as_secs(),
            warm_up = self.engine.required_points(),
            "Starting trading loop"
        );

        loop {
            let outcome = self.run_cycle().await;

            if self.config.stop_on_no_data && outcome.is_no_data() {
                info!("Market data exhausted, stopping");
                break;
            }

            tokio::select! {
                _ = &mut shutdown => {
                    info!("Shutdown requested");
                    break;
                }
                _ = tokio::time::sleep(self.config.poll_interval) => {}
            }
        }

        info!(
            cycles = self.stats.cycles,
            orders = self.stats.orders,
            rejected = self.stats.rejected,
            failures = self.stats.failures,
            loss = %self.risk_state.current_loss,
            "Trading loop stopped"
        );
    }

    /// Run one cycle at the current time.
    pub async fn run_cycle(&mut self) -> CycleOutcome {
        self.run_cycle_at(Utc::now()).await
    }

    /// Run one cycle as if the clock read `now`.
    pub async fn run_cycle_at(&mut self, now: DateTime<Utc>) -> CycleOutcome {
        let outcome = self.cycle(now).await;
        self.stats.record(&outcome);

        match &outcome {
            CycleOutcome::WarmingUp { required, available } => {
                info!(required, available, "Warming up");
            }
            CycleOutcome::Hold => debug!("No signal"),
            CycleOutcome::Rejected(_) => {}
            CycleOutcome::Executed(order) => {
                info!(
                    order_id = %order.id,
                    symbol = %order.symbol,
                    side = %order.side,
                    quantity = %order.quantity,
                    status = ?order.status,
                    "Order placed"
                );
            }
            CycleOutcome::Failed(err) => error!(error = %err, "Cycle failed"),
        }

        outcome
    }

    async fn cycle(&mut self, now: DateTime<Utc>) -> CycleOutcome {
        self.risk_state.roll_day(now.date_naive());
        self.reconcile().await;

        let candles = match self.load_candles().await {
            Ok(candles) => candles,
            Err(err) => return CycleOutcome::Failed(err.into()),
        };

        let snapshot = match self.engine.compute(&candles) {
            Ok(snapshot) => snapshot,
            Err(IndicatorError::InsufficientData { required, available }) => {
                return CycleOutcome::WarmingUp { required, available };
            }
            Err(err) => return CycleOutcome::Failed(err.into()),
        };
        let Some(latest) = candles.last() else {
            return CycleOutcome::WarmingUp {
                required: self.engine.required_points(),
                available: 0,
            };
        };

        debug!(
            sma_short = snapshot.sma_short,
            sma_long = snapshot.sma_long,
            rsi = ?snapshot.rsi,
            macd = ?snapshot.macd.map(|m| m.macd),
            macd_signal = ?snapshot.macd.map(|m| m.signal),
            support = snapshot.support,
            resistance = snapshot.resistance,
            "Indicators"
        );

        let signal = self.rule.evaluate(&snapshot, latest);
        if !signal.is_actionable() {
            return CycleOutcome::Hold;
        }
        info!(signal = %signal, close = latest.close, rule = self.rule.name(), "Signal");

        let positions = match self.dispatcher.open_positions().await {
            Ok(positions) => positions,
            Err(err) => return CycleOutcome::Failed(err.into()),
        };

        let approval = match self
            .gate
            .evaluate(signal, &self.config.symbol, &positions, &self.risk_state)
        {
            RiskDecision::Approved(approval) => approval,
            RiskDecision::Rejected(reason) => return CycleOutcome::Rejected(reason),
        };

        let request = approval.into_order(self.config.order_quantity);
        match self.dispatcher.place_order(request).await {
            Ok(order) => {
                self.track(&order);
                CycleOutcome::Executed(order)
            }
            Err(err) => CycleOutcome::Failed(err.into()),
        }
    }

    async fn load_candles(&mut self) -> Result<Vec<Candle>, FetchError> {
        let symbol = self.config.symbol.as_str();

        match self.config.data_mode {
            DataMode::Quotes => {
                let quote = self.gateway.fetch_quote(symbol).await?;
                info!(symbol, price = quote.price, bid = quote.bid, ask = quote.ask, "Quote");
                self.series.push_price(quote.timestamp, quote.price);
                Ok(self.series.candles())
            }
            DataMode::Candles {
                interval_secs,
                lookback,
            } => {
                let candles = self
                    .gateway
                    .fetch_candles(symbol, interval_secs, lookback)
                    .await?;
                if let Some(last) = candles.last() {
                    info!(symbol, candles = candles.len(), close = last.close, "Candles");
                }
                Ok(candles)
            }
        }
    }

    /// Book the filled part of a new order and remember it if more may come.
    fn track(&mut self, order: &Order) {
        let booked = self.book_fill(order, Decimal::ZERO);
        if !order.status.is_terminal() {
            self.pending.push(PendingOrder {
                id: order.id.to_string(),
                booked,
            });
        }
    }

    /// Poll pending orders and book any new fills.
    async fn reconcile(&mut self) {
        let pending = std::mem::take(&mut self.pending);

        for mut entry in pending {
            match self.dispatcher.get_order(&entry.id).await {
                Ok(order) => {
                    entry.booked = self.book_fill(&order, entry.booked);
                    if !order.status.is_terminal() {
                        self.pending.push(entry);
                    }
                }
                Err(OrderError::NotFound(id)) => {
                    warn!(order_id = %id, "Pending order no longer known to broker");
                }
                Err(err) => {
                    warn!(order_id = %entry.id, error = %err, "Order status check failed");
                    self.pending.push(entry);
                }
            }
        }
    }

    /// Book fills beyond `booked` into the ledger; returns the new booked total.
    fn book_fill(&mut self, order: &Order, booked: Decimal) -> Decimal {
        let Some((filled, price)) = order.fill() else {
            return booked;
        };
        let delta = filled - booked;
        if delta <= Decimal::ZERO {
            return booked;
        }

        let realized = self
            .ledger
            .record_fill(&order.symbol, order.side, delta, price);
        if !realized.is_zero() {
            self.risk_state.record_realized_pnl(realized);
            info!(
                symbol = %order.symbol,
                realized = %realized,
                daily_loss = %self.risk_state.current_loss,
                "Realized P&L"
            );
        }
        filled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;
    use std::collections::{HashMap, VecDeque};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use tradebot_core::traits::Quote;
    use tradebot_core::types::{OrderRequest, OrderStatus, Position, PositionSide, Side};
    use tradebot_indicators::IndicatorSettings;
    use tradebot_risk::PositionPolicy;
    use tradebot_strategies::{CrossoverConfig, CrossoverRule};

    struct FakeGateway {
        quotes: Mutex<VecDeque<f64>>,
        candles: Mutex<Result<Vec<Candle>, FetchError>>,
        calls: AtomicUsize,
    }

    impl FakeGateway {
        fn with_quotes(prices: impl IntoIterator<Item = f64>) -> Self {
            Self {
                quotes: Mutex::new(prices.into_iter().collect()),
                candles: Mutex::new(Ok(Vec::new())),
                calls: AtomicUsize::new(0),
            }
        }

        fn with_candles(candles: Result<Vec<Candle>, FetchError>) -> Self {
            Self {
                quotes: Mutex::new(VecDeque::new()),
                candles: Mutex::new(candles),
                calls: AtomicUsize::new(0),
            }
        }

        fn set_candles(&self, candles: Vec<Candle>) {
            *self.candles.lock().unwrap() = Ok(candles);
        }
    }

    #[async_trait]
    impl MarketDataGateway for FakeGateway {
        async fn fetch_quote(&self, symbol: &str) -> Result<Quote, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let price = self
                .quotes
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| FetchError::NoData(symbol.to_string()))?;
            Ok(Quote {
                symbol: symbol.to_string(),
                price,
                bid: price,
                ask: price,
                timestamp: 0,
            })
        }

        async fn fetch_candles(
            &self,
            _symbol: &str,
            _interval_secs: u64,
            _count: usize,
        ) -> Result<Vec<Candle>, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.candles.lock().unwrap().clone()
        }

        fn name(&self) -> &str {
            "Fake"
        }
    }

    #[derive(Default)]
    struct FakeDispatcher {
        positions: Mutex<Vec<Position>>,
        /// Fill price for new orders; `None` leaves them accepted
        fill_price: Mutex<Option<Decimal>>,
        placed: Mutex<Vec<OrderRequest>>,
        orders: Mutex<HashMap<String, Order>>,
        position_queries: AtomicUsize,
    }

    impl FakeDispatcher {
        fn filling_at(price: Decimal) -> Self {
            let dispatcher = Self::default();
            *dispatcher.fill_price.lock().unwrap() = Some(price);
            dispatcher
        }

        fn placed(&self) -> Vec<OrderRequest> {
            self.placed.lock().unwrap().clone()
        }

        fn fill_all(&self, price: Decimal) {
            for order in self.orders.lock().unwrap().values_mut() {
                order.status = OrderStatus::Filled;
                order.filled_quantity = order.quantity;
                order.filled_avg_price = Some(price);
            }
        }
    }

    #[async_trait]
    impl OrderDispatcher for FakeDispatcher {
        async fn open_positions(&self) -> Result<Vec<Position>, FetchError> {
            self.position_queries.fetch_add(1, Ordering::SeqCst);
            Ok(self.positions.lock().unwrap().clone())
        }

        async fn place_order(&self, request: OrderRequest) -> Result<Order, OrderError> {
            let mut order = Order::from_request(&request);
            if let Some(price) = *self.fill_price.lock().unwrap() {
                order.status = OrderStatus::Filled;
                order.filled_quantity = order.quantity;
                order.filled_avg_price = Some(price);
            }
            self.placed.lock().unwrap().push(request);
            self.orders
                .lock()
                .unwrap()
                .insert(order.id.to_string(), order.clone());
            Ok(order)
        }

        async fn get_order(&self, order_id: &str) -> Result<Order, OrderError> {
            self.orders
                .lock()
                .unwrap()
                .get(order_id)
                .cloned()
                .ok_or_else(|| OrderError::NotFound(order_id.to_string()))
        }

        fn name(&self) -> &str {
            "Fake"
        }
    }

    fn candles(closes: impl IntoIterator<Item = i32>) -> Vec<Candle> {
        closes
            .into_iter()
            .enumerate()
            .map(|(i, c)| Candle::from_price(i as i64 * 60_000, c as f64))
            .collect()
    }

    /// Warm-up of 10 candles.
    fn small_settings() -> IndicatorSettings {
        IndicatorSettings {
            short_period: 3,
            long_period: 10,
            rsi_period: 5,
            macd_fast: 3,
            macd_slow: 6,
            macd_signal: 3,
            levels_lookback: None,
        }
    }

    fn trader(
        mode: DataMode,
        settings: IndicatorSettings,
        gateway: Arc<FakeGateway>,
        dispatcher: Arc<FakeDispatcher>,
    ) -> Trader {
        let mut config = TraderConfig::new("AAPL", dec!(10));
        config.data_mode = mode;
        config.poll_interval = Duration::ZERO;

        Trader::new(
            config,
            gateway,
            dispatcher,
            IndicatorEngine::new(settings).unwrap(),
            Box::new(CrossoverRule::new(CrossoverConfig::default())),
            RiskGate::new(PositionPolicy::SinglePositionPerSymbol),
            RiskState::new(dec!(100), dec!(500)),
        )
    }

    fn candle_mode() -> DataMode {
        DataMode::Candles {
            interval_secs: 60,
            lookback: 10,
        }
    }

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, day, 15, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_failure_places_no_order() {
        let gateway = Arc::new(FakeGateway::with_candles(Err(FetchError::Connection(
            "timed out".into(),
        ))));
        let dispatcher = Arc::new(FakeDispatcher::filling_at(dec!(100)));
        let mut trader = trader(candle_mode(), small_settings(), gateway, dispatcher.clone());

        let outcome = trader.run_cycle().await;

        assert!(matches!(
            outcome,
            CycleOutcome::Failed(TradingError::Fetch(FetchError::Connection(_)))
        ));
        assert!(dispatcher.placed().is_empty());
        assert_eq!(dispatcher.position_queries.load(Ordering::SeqCst), 0);
        assert_eq!(trader.stats().failures, 1);
    }

    #[tokio::test]
    async fn test_warming_up_with_default_settings() {
        let gateway = Arc::new(FakeGateway::with_quotes([150.0]));
        let dispatcher = Arc::new(FakeDispatcher::default());
        let mut trader = trader(
            DataMode::Quotes,
            IndicatorSettings::default(),
            gateway,
            dispatcher.clone(),
        );

        let outcome = trader.run_cycle().await;

        assert!(matches!(
            outcome,
            CycleOutcome::WarmingUp { required: 50, available: 1 }
        ));
        assert!(dispatcher.placed().is_empty());
    }

    #[tokio::test]
    async fn test_approved_buy_places_one_order() {
        let gateway = Arc::new(FakeGateway::with_candles(Ok(candles(1..=10))));
        let dispatcher = Arc::new(FakeDispatcher::filling_at(dec!(10)));
        let mut trader = trader(candle_mode(), small_settings(), gateway, dispatcher.clone());

        let outcome = trader.run_cycle().await;

        assert!(outcome.is_executed());
        let placed = dispatcher.placed();
        assert_eq!(placed.len(), 1);
        assert_eq!(placed[0].symbol, "AAPL");
        assert_eq!(placed[0].side, Side::Buy);
        assert_eq!(placed[0].quantity, dec!(10));
        assert_eq!(
            trader.ledger().position("AAPL").map(|p| p.quantity),
            Some(dec!(10))
        );
    }

    #[tokio::test]
    async fn test_position_limit_rejects_buy() {
        let gateway = Arc::new(FakeGateway::with_candles(Ok(candles(1..=10))));
        let dispatcher = Arc::new(FakeDispatcher::filling_at(dec!(10)));
        dispatcher.positions.lock().unwrap().push(Position::new(
            "AAPL",
            dec!(100),
            PositionSide::Long,
            dec!(150),
        ));
        let mut trader = trader(candle_mode(), small_settings(), gateway, dispatcher.clone());

        let outcome = trader.run_cycle().await;

        assert!(matches!(
            outcome,
            CycleOutcome::Rejected(RejectReason::PositionLimit { .. })
        ));
        assert!(dispatcher.placed().is_empty());
    }

    #[tokio::test]
    async fn test_hold_skips_risk_and_dispatch() {
        let gateway = Arc::new(FakeGateway::with_candles(Ok(candles([5; 10]))));
        let dispatcher = Arc::new(FakeDispatcher::filling_at(dec!(5)));
        let mut trader = trader(candle_mode(), small_settings(), gateway, dispatcher.clone());

        assert!(matches!(trader.run_cycle().await, CycleOutcome::Hold));
        assert_eq!(dispatcher.position_queries.load(Ordering::SeqCst), 0);
        assert!(dispatcher.placed().is_empty());
    }

    #[tokio::test]
    async fn test_quote_mode_accumulates_history() {
        let gateway = Arc::new(FakeGateway::with_quotes((1..=10).map(f64::from)));
        let dispatcher = Arc::new(FakeDispatcher::filling_at(dec!(10)));
        let mut trader = trader(
            DataMode::Quotes,
            small_settings(),
            gateway,
            dispatcher.clone(),
        );

        for available in 1..10 {
            let outcome = trader.run_cycle().await;
            assert!(matches!(
                outcome,
                CycleOutcome::WarmingUp { required: 10, available: a } if a == available
            ));
        }

        assert!(trader.run_cycle().await.is_executed());
        assert_eq!(trader.series().len(), 10);
        assert_eq!(dispatcher.placed().len(), 1);
    }

    #[tokio::test]
    async fn test_realized_loss_trips_limit_until_next_day() {
        let gateway = Arc::new(FakeGateway::with_candles(Ok(candles(1..=10))));
        let dispatcher = Arc::new(FakeDispatcher::filling_at(dec!(150)));
        let mut trader = trader(
            candle_mode(),
            small_settings(),
            gateway.clone(),
            dispatcher.clone(),
        );

        // Buy 10 @ 150
        assert!(trader.run_cycle_at(at(4)).await.is_executed());

        // Sell 10 @ 90, realizing -600
        gateway.set_candles(candles((1..=10).rev()));
        *dispatcher.fill_price.lock().unwrap() = Some(dec!(90));
        let outcome = trader.run_cycle_at(at(4)).await;
        assert!(matches!(&outcome, CycleOutcome::Executed(order) if order.side == Side::Sell));
        assert_eq!(trader.risk_state().current_loss, dec!(600));
        assert!(trader.ledger().position("AAPL").is_none());

        // Limit reached for the rest of the day
        gateway.set_candles(candles(1..=10));
        let outcome = trader.run_cycle_at(at(4)).await;
        assert!(matches!(
            outcome,
            CycleOutcome::Rejected(RejectReason::DailyLossLimit { .. })
        ));
        assert_eq!(dispatcher.placed().len(), 2);

        // A new day resets the counter
        assert!(trader.run_cycle_at(at(5)).await.is_executed());
        assert_eq!(trader.risk_state().current_loss, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_pending_order_reconciled_next_cycle() {
        let gateway = Arc::new(FakeGateway::with_candles(Ok(candles(1..=10))));
        let dispatcher = Arc::new(FakeDispatcher::default());
        let mut trader = trader(candle_mode(), small_settings(), gateway, dispatcher.clone());

        let outcome = trader.run_cycle().await;
        assert!(matches!(
            &outcome,
            CycleOutcome::Executed(order) if order.status == OrderStatus::Accepted
        ));
        assert_eq!(trader.pending_orders(), 1);
        assert!(trader.ledger().position("AAPL").is_none());

        dispatcher.fill_all(dec!(12));
        dispatcher.positions.lock().unwrap().push(Position::new(
            "AAPL",
            dec!(10),
            PositionSide::Long,
            dec!(12),
        ));
        let outcome = trader.run_cycle().await;

        assert!(matches!(
            outcome,
            CycleOutcome::Rejected(RejectReason::PositionAlreadyOpen { .. })
        ));

        assert_eq!(trader.pending_orders(), 0);
        let position = trader.ledger().position("AAPL").unwrap();
        assert_eq!(position.quantity, dec!(10));
        assert_eq!(position.avg_entry_price, dec!(12));
    }

    #[tokio::test]
    async fn test_run_stops_when_data_exhausted() {
        let gateway = Arc::new(FakeGateway::with_quotes([1.0, 2.0, 3.0]));
        let dispatcher = Arc::new(FakeDispatcher::default());
        let mut trader = trader(
            DataMode::Quotes,
            small_settings(),
            gateway.clone(),
            dispatcher,
        );
        trader.config.stop_on_no_data = true;

        trader.run(std::future::pending::<()>()).await;

        assert_eq!(gateway.calls.load(Ordering::SeqCst), 4);
        assert_eq!(trader.stats().cycles, 4);
        assert_eq!(trader.stats().warming_up, 3);
        assert_eq!(trader.stats().failures, 1);
    }

    #[tokio::test]
    async fn test_run_honours_shutdown() {
        let gateway = Arc::new(FakeGateway::with_quotes([1.0, 2.0, 3.0]));
        let dispatcher = Arc::new(FakeDispatcher::default());
        let mut trader = trader(
            DataMode::Quotes,
            small_settings(),
            gateway.clone(),
            dispatcher,
        );
        trader.config.poll_interval = Duration::from_secs(3600);

        trader.run(std::future::ready(())).await;

        assert_eq!(gateway.calls.load(Ordering::SeqCst), 1);
    }
}
