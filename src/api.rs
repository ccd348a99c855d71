//! The HTTP transport (ambient, not core): parses form-encoded requests, dispatches
//! to the registry, and renders the wire contract's JSON responses.

use axum::{
    Form, Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::json;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::{
    orders::{Order, Side, TimeInForce},
    state::AppState,
    trade::LevelInfo,
};

type ApiErr = (StatusCode, Json<serde_json::Value>);

fn err(status: StatusCode, msg: impl AsRef<str>) -> ApiErr {
    (status, Json(json!({ "error": msg.as_ref() })))
}

/// All fields are `Option<String>` so presence can be checked before any parsing is
/// attempted, per the 400-vs-500 split this transport draws.
#[derive(Deserialize)]
pub struct TradeForm {
    book: Option<String>,
    orderid: Option<String>,
    tradetype: Option<String>,
    side: Option<String>,
    price: Option<String>,
    quantity: Option<String>,
}

#[derive(Deserialize)]
pub struct CancelForm {
    book: Option<String>,
    orderid: Option<String>,
}

fn parse_side(raw: &str) -> Option<Side> {
    match raw {
        "BUY" => Some(Side::Buy),
        "SELL" => Some(Side::Sell),
        _ => None,
    }
}

fn parse_tif(raw: &str) -> Option<TimeInForce> {
    match raw {
        "GTC" => Some(TimeInForce::GoodTillCancel),
        "FAK" => Some(TimeInForce::FillAndKill),
        _ => None,
    }
}

/// `POST /trade`
pub async fn trade(State(state): State<AppState>, Form(form): Form<TradeForm>) -> impl IntoResponse {
    let (Some(book), Some(orderid), Some(tradetype), Some(side), Some(price), Some(quantity)) = (
        form.book.as_deref(),
        form.orderid.as_deref(),
        form.tradetype.as_deref(),
        form.side.as_deref(),
        form.price.as_deref(),
        form.quantity.as_deref(),
    ) else {
        warn!("trade rejected: missing parameter");
        return err(StatusCode::BAD_REQUEST, "missing parameter").into_response();
    };

    let parsed = (|| {
        let orderid = orderid.parse::<u64>().ok()?;
        let tif = parse_tif(tradetype)?;
        let side = parse_side(side)?;
        let price = price.parse::<i32>().ok()?;
        let quantity = quantity.parse::<u32>().ok()?;
        Some((orderid, tif, side, price, quantity))
    })();

    let Some((orderid, tif, side, price, quantity)) = parsed else {
        warn!(book, "trade rejected: unparseable parameter");
        return err(StatusCode::INTERNAL_SERVER_ERROR, "failed to parse order parameters").into_response();
    };

    let order = Order::new(orderid, side, price, tif, quantity);
    let mut registry = state.registry.write().await;
    let engine = registry.get_or_create(book);
    match engine.add(order) {
        Ok(trades) => {
            info!(book, orderid, trade_count = trades.len(), "order placed");
            (StatusCode::OK, Json(json!({ "message": "Order placed successfully" }))).into_response()
        }
        Err(e) => {
            warn!(book, orderid, error = %e, "trade rejected: engine error");
            err(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

/// `POST /cancel`
pub async fn cancel(State(state): State<AppState>, Form(form): Form<CancelForm>) -> impl IntoResponse {
    let (Some(book), Some(orderid)) = (form.book.as_deref(), form.orderid.as_deref()) else {
        warn!("cancel rejected: missing parameter");
        return err(StatusCode::BAD_REQUEST, "missing parameter").into_response();
    };

    let Ok(orderid) = orderid.parse::<u64>() else {
        warn!(book, "cancel rejected: unparseable orderid");
        return err(StatusCode::INTERNAL_SERVER_ERROR, "failed to parse orderid").into_response();
    };

    let mut registry = state.registry.write().await;
    let engine = registry.get_or_create(book);
    if engine.contains(orderid) {
        engine.cancel(orderid);
        info!(book, orderid, "order cancelled");
        (StatusCode::OK, Json(json!({ "message": "Order Info Received" }))).into_response()
    } else {
        warn!(book, orderid, "cancel: order id not found");
        (StatusCode::OK, Json(json!({ "message": "Order ID not found" }))).into_response()
    }
}

#[derive(serde::Serialize)]
struct BookView {
    bids: Vec<LevelInfo>,
    asks: Vec<LevelInfo>,
}

/// `GET /book/{symbol}`
pub async fn get_book(State(state): State<AppState>, Path(symbol): Path<String>) -> impl IntoResponse {
    let mut registry = state.registry.write().await;
    let engine = registry.get_or_create(&symbol);
    let (bids, asks) = engine.depth();
    Json(BookView { bids, asks })
}

/// `GET /size/{symbol}`
pub async fn get_size(State(state): State<AppState>, Path(symbol): Path<String>) -> impl IntoResponse {
    let mut registry = state.registry.write().await;
    let engine = registry.get_or_create(&symbol);
    Json(json!({ "size": engine.size() }))
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/trade", post(trade))
        .route("/cancel", post(cancel))
        .route("/book/{symbol}", get(get_book))
        .route("/size/{symbol}", get(get_size))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
