//! Alpaca broker integration for paper and live trading.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use reqwest::{header, Client, RequestBuilder, Response, StatusCode};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use tradebot_core::error::{AuthError, FetchError, OrderError};
use tradebot_core::traits::{MarketDataGateway, OrderDispatcher, Quote};
use tradebot_core::types::{
    Candle, Order, OrderRequest, OrderStatus, Position, PositionSide, Side,
};
use uuid::Uuid;

use crate::session::{PasswordAuthenticator, TokenSession};

const PAPER_URL: &str = "https://paper-api.alpaca.markets";
const LIVE_URL: &str = "https://api.alpaca.markets";
const DATA_URL: &str = "https://data.alpaca.markets";

/// How requests are authenticated.
#[derive(Debug, Clone)]
pub enum Credentials {
    /// Static API key pair sent as headers
    Keys { api_key: String, api_secret: String },
    /// Username/password exchanged for a short-lived bearer token
    Login {
        username: String,
        password: String,
        token_url: String,
    },
}

impl Credentials {
    /// Read an API key pair from the named environment variables.
    pub fn keys_from_env(key_var: &str, secret_var: &str) -> Result<Self, AuthError> {
        Ok(Credentials::Keys {
            api_key: env_var(key_var)?,
            api_secret: env_var(secret_var)?,
        })
    }

    /// Read a username/password pair from the named environment variables.
    pub fn login_from_env(
        username_var: &str,
        password_var: &str,
        token_url: impl Into<String>,
    ) -> Result<Self, AuthError> {
        Ok(Credentials::Login {
            username: env_var(username_var)?,
            password: env_var(password_var)?,
            token_url: token_url.into(),
        })
    }
}

fn env_var(name: &str) -> Result<String, AuthError> {
    std::env::var(name).map_err(|_| AuthError::Missing(format!("{} not set", name)))
}

/// Alpaca API configuration.
#[derive(Debug, Clone)]
pub struct AlpacaConfig {
    pub credentials: Credentials,
    pub paper: bool,
    /// Trading API root
    pub base_url: String,
    /// Market data API root
    pub data_url: String,
    /// Market data feed (`iex` or `sip`)
    pub feed: String,
}

impl AlpacaConfig {
    /// Paper trading endpoints.
    pub fn paper(credentials: Credentials) -> Self {
        Self {
            credentials,
            paper: true,
            base_url: PAPER_URL.to_string(),
            data_url: DATA_URL.to_string(),
            feed: "iex".to_string(),
        }
    }

    /// Live trading endpoints.
    pub fn live(credentials: Credentials) -> Self {
        Self {
            paper: false,
            base_url: LIVE_URL.to_string(),
            ..Self::paper(credentials)
        }
    }
}

#[derive(Debug, Deserialize)]
struct AlpacaPosition {
    symbol: String,
    qty: String,
    avg_entry_price: String,
    side: String,
}

#[derive(Debug, Deserialize)]
struct AlpacaOrder {
    id: String,
    client_order_id: String,
    status: String,
    symbol: String,
    qty: Option<String>,
    filled_qty: String,
    side: String,
    filled_avg_price: Option<String>,
    created_at: String,
}

#[derive(Debug, Serialize)]
struct CreateOrderRequest {
    symbol: String,
    qty: String,
    side: &'static str,
    #[serde(rename = "type")]
    order_type: &'static str,
    time_in_force: &'static str,
    client_order_id: String,
}

impl From<&OrderRequest> for CreateOrderRequest {
    fn from(request: &OrderRequest) -> Self {
        Self {
            symbol: request.symbol.clone(),
            qty: request.quantity.to_string(),
            side: request.side.as_str(),
            order_type: "market",
            time_in_force: "gtc",
            client_order_id: request.client_order_id.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct AlpacaBar {
    t: String,
    o: f64,
    h: f64,
    l: f64,
    c: f64,
    v: f64,
}

#[derive(Debug, Deserialize)]
struct AlpacaBarsResponse {
    #[serde(default)]
    bars: Option<Vec<AlpacaBar>>,
}

#[derive(Debug, Deserialize)]
struct AlpacaTrade {
    p: f64,
    t: String,
}

#[derive(Debug, Deserialize)]
struct AlpacaLatestQuote {
    ap: f64,
    bp: f64,
    t: String,
}

#[derive(Debug, Deserialize)]
struct AlpacaSnapshot {
    #[serde(rename = "latestTrade")]
    latest_trade: Option<AlpacaTrade>,
    #[serde(rename = "latestQuote")]
    latest_quote: Option<AlpacaLatestQuote>,
}

/// Alpaca bar timeframe for a candle interval.
///
/// The bars endpoint accepts 1-59 minutes, 1-23 hours, one day or one week.
fn bar_timeframe(interval_secs: u64) -> Option<String> {
    match interval_secs {
        s if s % 3600 == 0 && (1..24).contains(&(s / 3600)) => Some(format!("{}Hour", s / 3600)),
        s if s % 60 == 0 && (1..60).contains(&(s / 60)) => Some(format!("{}Min", s / 60)),
        86_400 => Some("1Day".to_string()),
        604_800 => Some("1Week".to_string()),
        _ => None,
    }
}

fn parse_millis(ts: &str) -> Option<i64> {
    DateTime::parse_from_rfc3339(ts)
        .ok()
        .map(|dt| dt.timestamp_millis())
}

fn quote_from_snapshot(symbol: &str, snapshot: AlpacaSnapshot) -> Result<Quote, FetchError> {
    let (bid, ask, quote_ts) = match &snapshot.latest_quote {
        Some(q) => (q.bp, q.ap, parse_millis(&q.t)),
        None => (0.0, 0.0, None),
    };

    let (price, timestamp) = match (&snapshot.latest_trade, &snapshot.latest_quote) {
        (Some(trade), _) => (trade.p, parse_millis(&trade.t).or(quote_ts)),
        (None, Some(q)) if q.ap > 0.0 && q.bp > 0.0 => ((q.ap + q.bp) / 2.0, quote_ts),
        _ => return Err(FetchError::NoData(symbol.to_string())),
    };

    Ok(Quote {
        symbol: symbol.to_string(),
        price,
        bid,
        ask,
        timestamp: timestamp.unwrap_or_else(|| Utc::now().timestamp_millis()),
    })
}

fn candles_from_bars(bars: Vec<AlpacaBar>) -> Result<Vec<Candle>, FetchError> {
    let mut candles = bars
        .into_iter()
        .map(|b| {
            let ts = parse_millis(&b.t)
                .ok_or_else(|| FetchError::Parse(format!("Invalid bar timestamp: {}", b.t)))?;
            Ok(Candle::new(ts, b.o, b.h, b.l, b.c, b.v))
        })
        .collect::<Result<Vec<_>, FetchError>>()?;

    candles.sort_by_key(|c| c.timestamp);
    Ok(candles)
}

fn parse_decimal(field: &str, value: &str) -> Result<Decimal, String> {
    value
        .parse()
        .map_err(|_| format!("Invalid {}: {}", field, value))
}

fn parse_side(side: &str) -> Result<Side, String> {
    match side {
        "buy" => Ok(Side::Buy),
        "sell" => Ok(Side::Sell),
        _ => Err(format!("Unknown side: {}", side)),
    }
}

fn parse_status(status: &str) -> OrderStatus {
    match status {
        "partially_filled" => OrderStatus::PartiallyFilled,
        "filled" => OrderStatus::Filled,
        "canceled" => OrderStatus::Canceled,
        "expired" | "done_for_day" => OrderStatus::Expired,
        "rejected" => OrderStatus::Rejected,
        // new, accepted, pending_new, held, ...
        _ => OrderStatus::Accepted,
    }
}

fn parse_position(p: AlpacaPosition) -> Result<Position, FetchError> {
    let quantity = parse_decimal("qty", &p.qty).map_err(FetchError::Parse)?;
    let avg_entry_price =
        parse_decimal("avg_entry_price", &p.avg_entry_price).map_err(FetchError::Parse)?;

    let side = match p.side.as_str() {
        "short" => PositionSide::Short,
        "long" => PositionSide::Long,
        _ if quantity < Decimal::ZERO => PositionSide::Short,
        _ => PositionSide::Long,
    };

    Ok(Position::new(p.symbol, quantity, side, avg_entry_price))
}

fn parse_order(order: AlpacaOrder) -> Result<Order, OrderError> {
    let id = Uuid::parse_str(&order.id)
        .map_err(|_| OrderError::Parse(format!("Invalid order id: {}", order.id)))?;
    let side = parse_side(&order.side).map_err(OrderError::Parse)?;

    let quantity = match &order.qty {
        Some(qty) => parse_decimal("qty", qty).map_err(OrderError::Parse)?,
        None => Decimal::ZERO,
    };
    let filled_quantity = parse_decimal("filled_qty", &order.filled_qty).map_err(OrderError::Parse)?;
    let filled_avg_price = match &order.filled_avg_price {
        Some(price) => Some(parse_decimal("filled_avg_price", price).map_err(OrderError::Parse)?),
        None => None,
    };

    let created_at = DateTime::parse_from_rfc3339(&order.created_at)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| OrderError::Parse(format!("Invalid created_at: {}", order.created_at)))?;

    Ok(Order {
        id,
        client_order_id: order.client_order_id,
        symbol: order.symbol,
        side,
        quantity,
        status: parse_status(&order.status),
        filled_quantity,
        filled_avg_price,
        created_at,
    })
}

/// Alpaca broker client.
pub struct AlpacaBroker {
    base_url: String,
    data_url: String,
    feed: String,
    paper: bool,
    client: Client,
    session: Option<TokenSession<PasswordAuthenticator>>,
}

impl AlpacaBroker {
    /// Create a new Alpaca broker client.
    pub fn new(config: AlpacaConfig) -> Result<Self, AuthError> {
        let mut headers = header::HeaderMap::new();

        if let Credentials::Keys { api_key, api_secret } = &config.credentials {
            headers.insert(
                "APCA-API-KEY-ID",
                header::HeaderValue::from_str(api_key)
                    .map_err(|e| AuthError::Missing(e.to_string()))?,
            );
            headers.insert(
                "APCA-API-SECRET-KEY",
                header::HeaderValue::from_str(api_secret)
                    .map_err(|e| AuthError::Missing(e.to_string()))?,
            );
        }

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| AuthError::Connection(e.to_string()))?;

        let session = match config.credentials {
            Credentials::Login {
                username,
                password,
                token_url,
            } => Some(TokenSession::new(PasswordAuthenticator::new(
                client.clone(),
                token_url,
                username,
                password,
            ))),
            Credentials::Keys { .. } => None,
        };

        Ok(Self {
            base_url: config.base_url,
            data_url: config.data_url,
            feed: config.feed,
            paper: config.paper,
            client,
            session,
        })
    }

    /// Attach a bearer token when running on a login session.
    async fn authorize(&self, request: RequestBuilder) -> Result<RequestBuilder, AuthError> {
        match &self.session {
            Some(session) => Ok(request.bearer_auth(session.bearer().await?)),
            None => Ok(request),
        }
    }

    /// Status and body of a failed response.
    async fn failure(&self, resp: Response) -> (StatusCode, String) {
        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED {
            if let Some(session) = &self.session {
                session.invalidate().await;
            }
        }
        let text = resp.text().await.unwrap_or_default();
        (status, text)
    }

    async fn get_data<T: serde::de::DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, FetchError> {
        let resp = self
            .authorize(request)
            .await?
            .send()
            .await
            .map_err(|e| FetchError::Connection(e.to_string()))?;

        if !resp.status().is_success() {
            let (status, body) = self.failure(resp).await;
            if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
                return Err(FetchError::Authentication(format!("{}: {}", status, body)));
            }
            return Err(FetchError::Api {
                status: status.as_u16(),
                body,
            });
        }

        resp.json()
            .await
            .map_err(|e| FetchError::Parse(e.to_string()))
    }
}

#[async_trait]
impl MarketDataGateway for AlpacaBroker {
    async fn fetch_quote(&self, symbol: &str) -> Result<Quote, FetchError> {
        let url = format!("{}/v2/stocks/{}/snapshot", self.data_url, symbol);
        let request = self.client.get(&url).query(&[("feed", self.feed.as_str())]);

        let snapshot: AlpacaSnapshot = self.get_data(request).await?;
        let quote = quote_from_snapshot(symbol, snapshot)?;

        debug!(symbol, price = quote.price, bid = quote.bid, ask = quote.ask, "Quote fetched");
        Ok(quote)
    }

    async fn fetch_candles(
        &self,
        symbol: &str,
        interval_secs: u64,
        count: usize,
    ) -> Result<Vec<Candle>, FetchError> {
        let timeframe =
            bar_timeframe(interval_secs).ok_or(FetchError::InvalidInterval(interval_secs))?;

        // Wide enough to cover closed sessions; `sort=desc` + `limit` keeps the newest bars.
        let span = Duration::seconds((interval_secs as i64) * (count as i64) * 4).max(Duration::days(7));
        let start = (Utc::now() - span).to_rfc3339();

        let url = format!("{}/v2/stocks/{}/bars", self.data_url, symbol);
        let request = self.client.get(&url).query(&[
            ("timeframe", timeframe.clone()),
            ("start", start),
            ("limit", count.to_string()),
            ("sort", "desc".to_string()),
            ("feed", self.feed.clone()),
        ]);

        let data: AlpacaBarsResponse = self.get_data(request).await?;
        let candles = candles_from_bars(data.bars.unwrap_or_default())?;

        if candles.is_empty() {
            return Err(FetchError::NoData(symbol.to_string()));
        }

        debug!(symbol, timeframe = %timeframe, count = candles.len(), "Candles fetched");
        Ok(candles)
    }

    fn name(&self) -> &str {
        if self.paper { "Alpaca Paper" } else { "Alpaca Live" }
    }
}

#[async_trait]
impl OrderDispatcher for AlpacaBroker {
    async fn open_positions(&self) -> Result<Vec<Position>, FetchError> {
        let url = format!("{}/v2/positions", self.base_url);
        let positions: Vec<AlpacaPosition> = self.get_data(self.client.get(&url)).await?;

        let positions = positions
            .into_iter()
            .map(parse_position)
            .collect::<Result<Vec<_>, _>>()?;

        debug!(count = positions.len(), "Open positions fetched");
        Ok(positions)
    }

    async fn place_order(&self, request: OrderRequest) -> Result<Order, OrderError> {
        if request.quantity <= Decimal::ZERO {
            return Err(OrderError::InvalidOrder(format!(
                "Quantity must be positive, got {}",
                request.quantity
            )));
        }

        let url = format!("{}/v2/orders", self.base_url);
        let create_req = CreateOrderRequest::from(&request);

        debug!("Submitting order: {:?}", create_req);

        let resp = self
            .authorize(self.client.post(&url).json(&create_req))
            .await?
            .send()
            .await
            .map_err(|e| OrderError::Connection(e.to_string()))?;

        if !resp.status().is_success() {
            let (status, text) = self.failure(resp).await;
            if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
                return Err(OrderError::Authentication(format!("{}: {}", status, text)));
            }
            return Err(OrderError::Rejected(format!("{}: {}", status, text)));
        }

        let order: AlpacaOrder = resp
            .json()
            .await
            .map_err(|e| OrderError::Parse(e.to_string()))?;

        info!(
            "Order submitted: {} {} {} ({})",
            order.side,
            order.qty.as_deref().unwrap_or("?"),
            order.symbol,
            order.status
        );
        parse_order(order)
    }

    async fn get_order(&self, order_id: &str) -> Result<Order, OrderError> {
        let url = format!("{}/v2/orders/{}", self.base_url, order_id);
        let resp = self
            .authorize(self.client.get(&url))
            .await?
            .send()
            .await
            .map_err(|e| OrderError::Connection(e.to_string()))?;

        if !resp.status().is_success() {
            let (status, text) = self.failure(resp).await;
            return Err(match status {
                StatusCode::NOT_FOUND => OrderError::NotFound(order_id.to_string()),
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    OrderError::Authentication(format!("{}: {}", status, text))
                }
                _ => OrderError::Rejected(format!("{}: {}", status, text)),
            });
        }

        let order: AlpacaOrder = resp
            .json()
            .await
            .map_err(|e| OrderError::Parse(e.to_string()))?;
        parse_order(order)
    }

    fn name(&self) -> &str {
        if self.paper { "Alpaca Paper" } else { "Alpaca Live" }
    }
}
