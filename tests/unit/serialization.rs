//! `Trade` and `Order` carry `serde` impls so a caller can externalize
//! them without this crate depending on any particular wire format.

use matching_core::prelude::*;

#[test]
fn trade_round_trips_through_json() {
    let engine = Engine::new(EngineConfig::default());
    engine.submit(Side::Sell, "AAPL", 10, 100).unwrap();
    engine.submit(Side::Buy, "AAPL", 10, 100).unwrap();

    let trades = engine.journal_snapshot();
    assert_eq!(trades.len(), 1);

    let json = serde_json::to_string(&trades[0]).expect("trade should serialize");
    assert!(json.contains("\"qty\":10"));

    let restored: Trade = serde_json::from_str(&json).expect("trade should deserialize");
    assert_eq!(restored, trades[0]);
}

#[test]
fn order_round_trips_through_json() {
    let engine = Engine::new(EngineConfig::default());
    let symbol = engine.index_of("AAPL").unwrap();
    let order = Order {
        id: 7,
        side: Side::Buy,
        symbol,
        price: Price::new(150).unwrap(),
        arrival_ts: 3,
    };

    let json = serde_json::to_string(&order).expect("order should serialize");
    let restored: Order = serde_json::from_str(&json).expect("order should deserialize");
    assert_eq!(restored, order);
}
