//! Scripted exchange gateway for tests and dry runs.
//!
//! Each operation answers from its own FIFO queue of scripted responses.
//! When a market-data queue is down to its last response, that response
//! repeats forever. Order placement and order reads are strictly consumed:
//! running out of them returns `GatewayError::Exhausted`.

use std::collections::{HashMap, VecDeque};

use parking_lot::Mutex;
use spotloop_core::{BookTop, Candle, Order, OrderId, OrderRequest, Price};
use spotloop_registry::{RawAccountInfo, RawSymbolInfo};

use crate::gateway::{BoxFuture, ExchangeGateway, GatewayError, GatewayResult};

/// Gateway operation, for scripting errors and counting calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Candles,
    BookTop,
    DailyAveragePrice,
    SymbolInfo,
    AccountInfo,
    PlaceOrder,
    GetOrder,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Candles => "candles",
            Self::BookTop => "book_top",
            Self::DailyAveragePrice => "daily_average_price",
            Self::SymbolInfo => "symbol_info",
            Self::AccountInfo => "account_info",
            Self::PlaceOrder => "place_order",
            Self::GetOrder => "get_order",
        }
    }

    fn is_sticky(&self) -> bool {
        !matches!(self, Self::PlaceOrder | Self::GetOrder)
    }
}

#[derive(Debug)]
struct Script<T> {
    operation: Operation,
    queue: VecDeque<GatewayResult<T>>,
}

impl<T: Clone> Script<T> {
    fn new(operation: Operation) -> Self {
        Self {
            operation,
            queue: VecDeque::new(),
        }
    }

    fn next(&mut self) -> GatewayResult<T> {
        if self.operation.is_sticky() && self.queue.len() == 1 {
            return self.queue[0].clone();
        }
        self.queue
            .pop_front()
            .unwrap_or(Err(GatewayError::Exhausted(self.operation.as_str())))
    }
}

/// Deterministic fake gateway.
#[derive(Debug)]
pub struct ScriptedGateway {
    candles: Mutex<Script<Vec<Candle>>>,
    book_top: Mutex<Script<BookTop>>,
    daily_average: Mutex<Script<Price>>,
    symbol_info: Mutex<Script<RawSymbolInfo>>,
    account_info: Mutex<Script<RawAccountInfo>>,
    place_order: Mutex<Script<Order>>,
    get_order: Mutex<Script<Order>>,
    /// Recorded placements for verification.
    placed: Mutex<Vec<OrderRequest>>,
    calls: Mutex<HashMap<Operation, usize>>,
}

impl Default for ScriptedGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedGateway {
    pub fn new() -> Self {
        Self {
            candles: Mutex::new(Script::new(Operation::Candles)),
            book_top: Mutex::new(Script::new(Operation::BookTop)),
            daily_average: Mutex::new(Script::new(Operation::DailyAveragePrice)),
            symbol_info: Mutex::new(Script::new(Operation::SymbolInfo)),
            account_info: Mutex::new(Script::new(Operation::AccountInfo)),
            place_order: Mutex::new(Script::new(Operation::PlaceOrder)),
            get_order: Mutex::new(Script::new(Operation::GetOrder)),
            placed: Mutex::new(Vec::new()),
            calls: Mutex::new(HashMap::new()),
        }
    }

    pub fn push_candles(&self, candles: Vec<Candle>) -> &Self {
        self.candles.lock().queue.push_back(Ok(candles));
        self
    }

    pub fn push_book_top(&self, book: BookTop) -> &Self {
        self.book_top.lock().queue.push_back(Ok(book));
        self
    }

    pub fn push_daily_average(&self, price: Price) -> &Self {
        self.daily_average.lock().queue.push_back(Ok(price));
        self
    }

    pub fn push_symbol_info(&self, info: RawSymbolInfo) -> &Self {
        self.symbol_info.lock().queue.push_back(Ok(info));
        self
    }

    pub fn push_account_info(&self, info: RawAccountInfo) -> &Self {
        self.account_info.lock().queue.push_back(Ok(info));
        self
    }

    /// Response to the next `place_order`.
    pub fn push_placement(&self, order: Order) -> &Self {
        self.place_order.lock().queue.push_back(Ok(order));
        self
    }

    /// Response to the next `get_order`.
    pub fn push_order_read(&self, order: Order) -> &Self {
        self.get_order.lock().queue.push_back(Ok(order));
        self
    }

    /// Queue an error as the next response of `operation`.
    pub fn push_error(&self, operation: Operation, error: GatewayError) -> &Self {
        match operation {
            Operation::Candles => self.candles.lock().queue.push_back(Err(error)),
            Operation::BookTop => self.book_top.lock().queue.push_back(Err(error)),
            Operation::DailyAveragePrice => self.daily_average.lock().queue.push_back(Err(error)),
            Operation::SymbolInfo => self.symbol_info.lock().queue.push_back(Err(error)),
            Operation::AccountInfo => self.account_info.lock().queue.push_back(Err(error)),
            Operation::PlaceOrder => self.place_order.lock().queue.push_back(Err(error)),
            Operation::GetOrder => self.get_order.lock().queue.push_back(Err(error)),
        }
        self
    }

    /// Requests passed to `place_order`, in call order.
    pub fn placed_orders(&self) -> Vec<OrderRequest> {
        self.placed.lock().clone()
    }

    /// Number of calls made to `operation`.
    pub fn calls(&self, operation: Operation) -> usize {
        self.calls.lock().get(&operation).copied().unwrap_or(0)
    }

    fn record_call(&self, operation: Operation) {
        *self.calls.lock().entry(operation).or_insert(0) += 1;
    }
}

impl ExchangeGateway for ScriptedGateway {
    fn candles<'a>(
        &'a self,
        _symbol: &'a str,
        _interval: &'a str,
        limit: usize,
    ) -> BoxFuture<'a, GatewayResult<Vec<Candle>>> {
        Box::pin(async move {
            self.record_call(Operation::Candles);
            let candles = self.candles.lock().next()?;
            let start = candles.len().saturating_sub(limit);
            Ok(candles[start..].to_vec())
        })
    }

    fn book_top<'a>(&'a self, _symbol: &'a str) -> BoxFuture<'a, GatewayResult<BookTop>> {
        Box::pin(async move {
            self.record_call(Operation::BookTop);
            self.book_top.lock().next()
        })
    }

    fn daily_average_price<'a>(&'a self, _symbol: &'a str) -> BoxFuture<'a, GatewayResult<Price>> {
        Box::pin(async move {
            self.record_call(Operation::DailyAveragePrice);
            self.daily_average.lock().next()
        })
    }

    fn symbol_info<'a>(&'a self, _symbol: &'a str) -> BoxFuture<'a, GatewayResult<RawSymbolInfo>> {
        Box::pin(async move {
            self.record_call(Operation::SymbolInfo);
            self.symbol_info.lock().next()
        })
    }

    fn account_info(&self) -> BoxFuture<'_, GatewayResult<RawAccountInfo>> {
        Box::pin(async move {
            self.record_call(Operation::AccountInfo);
            self.account_info.lock().next()
        })
    }

    fn place_order(&self, request: OrderRequest) -> BoxFuture<'_, GatewayResult<Order>> {
        Box::pin(async move {
            self.record_call(Operation::PlaceOrder);
            self.placed.lock().push(request);
            self.place_order.lock().next()
        })
    }

    fn get_order<'a>(
        &'a self,
        _symbol: &'a str,
        _order_id: OrderId,
    ) -> BoxFuture<'a, GatewayResult<Order>> {
        Box::pin(async move {
            self.record_call(Operation::GetOrder);
            self.get_order.lock().next()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use spotloop_core::{OrderSide, OrderStatus, Size};

    fn order(id: u64) -> Order {
        Order {
            id: OrderId(id),
            side: OrderSide::Buy,
            status: OrderStatus::New,
            requested_quantity: Size::new(dec!(1)),
            requested_price: Price::new(dec!(100)),
            executed_quantity: Size::ZERO,
            is_working: true,
        }
    }

    #[tokio::test]
    async fn test_market_data_tail_is_sticky() {
        let gw = ScriptedGateway::new();
        gw.push_daily_average(Price::new(dec!(100)))
            .push_daily_average(Price::new(dec!(101)));

        assert_eq!(gw.daily_average_price("X").await.unwrap(), Price::new(dec!(100)));
        assert_eq!(gw.daily_average_price("X").await.unwrap(), Price::new(dec!(101)));
        assert_eq!(gw.daily_average_price("X").await.unwrap(), Price::new(dec!(101)));
        assert_eq!(gw.calls(Operation::DailyAveragePrice), 3);
    }

    #[tokio::test]
    async fn test_orders_are_consumed() {
        let gw = ScriptedGateway::new();
        gw.push_placement(order(1));

        let request = OrderRequest::limit(
            "BTCUSDT",
            OrderSide::Buy,
            Size::new(dec!(1)),
            Price::new(dec!(100)),
        );
        assert_eq!(gw.place_order(request.clone()).await.unwrap().id, OrderId(1));

        let err = gw.place_order(request).await.unwrap_err();
        assert!(matches!(err, GatewayError::Exhausted("place_order")));
        assert_eq!(gw.placed_orders().len(), 2);

        let err = gw.get_order("BTCUSDT", OrderId(1)).await.unwrap_err();
        assert!(matches!(err, GatewayError::Exhausted("get_order")));
    }

    #[tokio::test]
    async fn test_scripted_error() {
        let gw = ScriptedGateway::new();
        gw.push_error(Operation::BookTop, GatewayError::Http("timeout".to_string()))
            .push_book_top(BookTop::empty());

        assert!(gw.book_top("X").await.is_err());
        assert!(gw.book_top("X").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_candles_respect_limit() {
        let gw = ScriptedGateway::new();
        let candles: Vec<_> = (1..=5)
            .map(|i| Candle::new(i, Price::new(rust_decimal::Decimal::from(i))))
            .collect();
        gw.push_candles(candles);

        let got = gw.candles("X", "1m", 3).await.unwrap();
        assert_eq!(got.len(), 3);
        assert_eq!(got[0].open_time, 3);
    }
}
