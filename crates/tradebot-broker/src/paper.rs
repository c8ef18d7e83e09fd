//! Paper trading broker for simulation.

use async_trait::async_trait;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::info;
use tradebot_core::error::{FetchError, OrderError};
use tradebot_core::traits::{MarketDataGateway, OrderDispatcher, Quote};
use tradebot_core::types::{Candle, Order, OrderRequest, OrderStatus, Position, PositionSide, Side};
use uuid::Uuid;

#[derive(Debug, Default)]
struct PaperState {
    marks: HashMap<String, Decimal>,
    positions: HashMap<String, Position>,
    orders: HashMap<Uuid, Order>,
}

/// In-memory broker that fills market orders immediately at the marked price.
#[derive(Debug)]
pub struct PaperBroker {
    state: Mutex<PaperState>,
    slippage_pct: Decimal,
}

impl Default for PaperBroker {
    fn default() -> Self {
        Self::new()
    }
}

impl PaperBroker {
    /// Create a paper broker with no positions and no slippage.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(PaperState::default()),
            slippage_pct: Decimal::ZERO,
        }
    }

    /// Set slippage percentage applied against the order side.
    pub fn with_slippage(mut self, slippage_pct: Decimal) -> Self {
        self.slippage_pct = slippage_pct;
        self
    }

    fn lock(&self) -> MutexGuard<'_, PaperState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record the latest market price for a symbol.
    pub fn mark(&self, symbol: &str, price: Decimal) {
        self.lock().marks.insert(symbol.to_string(), price);
    }

    /// Record the latest market price from a float quote.
    pub fn mark_f64(&self, symbol: &str, price: f64) {
        if let Some(price) = Decimal::from_f64_retain(price) {
            self.mark(symbol, price.round_dp(6));
        }
    }

    /// Seed an existing position.
    pub fn set_position(&self, position: Position) {
        let mut state = self.lock();
        if position.is_open() {
            state.positions.insert(position.symbol.clone(), position);
        } else {
            state.positions.remove(&position.symbol);
        }
    }

    /// Current position in a symbol.
    pub fn position(&self, symbol: &str) -> Option<Position> {
        self.lock().positions.get(symbol).cloned()
    }

    /// All orders placed so far.
    pub fn orders(&self) -> Vec<Order> {
        let mut orders: Vec<Order> = self.lock().orders.values().cloned().collect();
        orders.sort_by_key(|o| o.created_at);
        orders
    }

    fn fill_price(&self, mark: Decimal, side: Side) -> Decimal {
        match side {
            Side::Buy => mark * (dec!(1) + self.slippage_pct / dec!(100)),
            Side::Sell => mark * (dec!(1) - self.slippage_pct / dec!(100)),
        }
    }
}

#[async_trait]
impl OrderDispatcher for PaperBroker {
    async fn open_positions(&self) -> Result<Vec<Position>, FetchError> {
        Ok(self.lock().positions.values().cloned().collect())
    }

    async fn place_order(&self, request: OrderRequest) -> Result<Order, OrderError> {
        if request.quantity <= Decimal::ZERO {
            return Err(OrderError::InvalidOrder(format!(
                "Quantity must be positive, got {}",
                request.quantity
            )));
        }

        let mut state = self.lock();
        let mark = *state.marks.get(&request.symbol).ok_or_else(|| {
            OrderError::Rejected(format!("No market price for {}", request.symbol))
        })?;
        let price = self.fill_price(mark, request.side);

        let mut order = Order::from_request(&request);
        order.status = OrderStatus::Filled;
        order.filled_quantity = request.quantity;
        order.filled_avg_price = Some(price);

        let position = state
            .positions
            .entry(request.symbol.clone())
            .or_insert_with(|| Position::new(&request.symbol, Decimal::ZERO, PositionSide::Long, price));
        position.apply_fill(request.side, request.quantity, price);
        if !position.is_open() {
            state.positions.remove(&request.symbol);
        }

        state.orders.insert(order.id, order.clone());

        info!(
            symbol = %order.symbol,
            side = %order.side,
            quantity = %order.quantity,
            price = %price,
            "Paper order filled"
        );
        Ok(order)
    }

    async fn get_order(&self, order_id: &str) -> Result<Order, OrderError> {
        let uuid = Uuid::parse_str(order_id)
            .map_err(|_| OrderError::NotFound(order_id.to_string()))?;

        self.lock()
            .orders
            .get(&uuid)
            .cloned()
            .ok_or_else(|| OrderError::NotFound(order_id.to_string()))
    }

    fn name(&self) -> &str {
        "Paper"
    }
}

/// Gateway wrapper that marks a [`PaperBroker`] with every price it sees.
pub struct PaperFeed<G> {
    inner: G,
    broker: Arc<PaperBroker>,
}

impl<G: MarketDataGateway> PaperFeed<G> {
    pub fn new(inner: G, broker: Arc<PaperBroker>) -> Self {
        Self { inner, broker }
    }
}

#[async_trait]
impl<G: MarketDataGateway> MarketDataGateway for PaperFeed<G> {
    async fn fetch_quote(&self, symbol: &str) -> Result<Quote, FetchError> {
        let quote = self.inner.fetch_quote(symbol).await?;
        self.broker.mark_f64(symbol, quote.price);
        Ok(quote)
    }

    async fn fetch_candles(
        &self,
        symbol: &str,
        interval_secs: u64,
        count: usize,
    ) -> Result<Vec<Candle>, FetchError> {
        let candles = self.inner.fetch_candles(symbol, interval_secs, count).await?;
        if let Some(last) = candles.last() {
            self.broker.mark_f64(symbol, last.close);
        }
        Ok(candles)
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedGateway;

    #[async_trait]
    impl MarketDataGateway for FixedGateway {
        async fn fetch_quote(&self, symbol: &str) -> Result<Quote, FetchError> {
            Ok(Quote {
                symbol: symbol.to_string(),
                price: 101.5,
                bid: 101.4,
                ask: 101.6,
                timestamp: 0,
            })
        }

        async fn fetch_candles(&self, _: &str, _: u64, _: usize) -> Result<Vec<Candle>, FetchError> {
            Ok(vec![Candle::from_price(0, 99.0), Candle::from_price(1, 100.0)])
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    #[tokio::test]
    async fn test_fills_at_mark() {
        let broker = PaperBroker::new();
        broker.mark("AAPL", dec!(150));

        let order = broker
            .place_order(OrderRequest::market("AAPL", Side::Buy, dec!(10)))
            .await
            .unwrap();

        assert!(order.is_filled());
        assert_eq!(order.fill(), Some((dec!(10), dec!(150))));

        let positions = broker.open_positions().await.unwrap();
        assert_eq!(positions.len(), 1);
        assert_eq!(positions[0].quantity, dec!(10));
        assert!(positions[0].is_long());
    }

    #[tokio::test]
    async fn test_rejects_without_mark() {
        let broker = PaperBroker::new();

        let result = broker
            .place_order(OrderRequest::market("AAPL", Side::Buy, dec!(10)))
            .await;
        assert!(matches!(result, Err(OrderError::Rejected(_))));
        assert!(broker.orders().is_empty());
    }

    #[tokio::test]
    async fn test_rejects_non_positive_quantity() {
        let broker = PaperBroker::new();
        broker.mark("AAPL", dec!(150));

        let result = broker
            .place_order(OrderRequest::market("AAPL", Side::Buy, Decimal::ZERO))
            .await;
        assert!(matches!(result, Err(OrderError::InvalidOrder(_))));
    }

    #[tokio::test]
    async fn test_round_trip_closes_position() {
        let broker = PaperBroker::new();
        broker.mark("AAPL", dec!(150));
        broker
            .place_order(OrderRequest::market("AAPL", Side::Buy, dec!(10)))
            .await
            .unwrap();

        broker.mark("AAPL", dec!(140));
        broker
            .place_order(OrderRequest::market("AAPL", Side::Sell, dec!(10)))
            .await
            .unwrap();

        assert!(broker.position("AAPL").is_none());
        assert_eq!(broker.orders().len(), 2);
    }

    #[tokio::test]
    async fn test_slippage_against_side() {
        let broker = PaperBroker::new().with_slippage(dec!(1));
        broker.mark("AAPL", dec!(100));

        let buy = broker
            .place_order(OrderRequest::market("AAPL", Side::Buy, dec!(1)))
            .await
            .unwrap();
        assert_eq!(buy.filled_avg_price, Some(dec!(101)));

        let sell = broker
            .place_order(OrderRequest::market("AAPL", Side::Sell, dec!(1)))
            .await
            .unwrap();
        assert_eq!(sell.filled_avg_price, Some(dec!(99)));
    }

    #[tokio::test]
    async fn test_get_order() {
        let broker = PaperBroker::new();
        broker.mark("AAPL", dec!(150));
        let order = broker
            .place_order(OrderRequest::market("AAPL", Side::Sell, dec!(5)))
            .await
            .unwrap();

        let fetched = broker.get_order(&order.id.to_string()).await.unwrap();
        assert_eq!(fetched, order);

        assert!(matches!(
            broker.get_order("not-a-uuid").await,
            Err(OrderError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_feed_marks_broker() {
        let broker = Arc::new(PaperBroker::new());
        let feed = PaperFeed::new(FixedGateway, broker.clone());

        feed.fetch_quote("AAPL").await.unwrap();
        let order = broker
            .place_order(OrderRequest::market("AAPL", Side::Buy, dec!(1)))
            .await
            .unwrap();
        assert_eq!(order.filled_avg_price, Some(dec!(101.5)));

        feed.fetch_candles("MSFT", 60, 2).await.unwrap();
        let order = broker
            .place_order(OrderRequest::market("MSFT", Side::Buy, dec!(1)))
            .await
            .unwrap();
        assert_eq!(order.filled_avg_price, Some(dec!(100)));
    }
}
