use super::{Category, Delivery, Direction, InboundMessage, Intent, TradeRecord, ValidationError};

use anyhow::Result;

use crate::types::Price;

fn create_record(title: &str, price: u32, intent: Intent, delivery: Delivery) -> Result<TradeRecord> {
    Ok(TradeRecord::new(Category::Collectible, title, Price::new(price)?, intent, delivery, "")?)
}

#[test]
fn test_direction_classification_covers_all_four_quadrants() {
    assert_eq!(Direction::classify(Intent::Long, Delivery::Spot), Direction::Buy);
    assert_eq!(Direction::classify(Intent::Short, Delivery::Spot), Direction::Sell);
    assert_eq!(Direction::classify(Intent::Long, Delivery::Futures { days: 15 }), Direction::Long);
    assert_eq!(Direction::classify(Intent::Short, Delivery::Futures { days: 7 }), Direction::Short);
}

#[test]
fn test_direction_codes_round_trip_through_lookup() {
    for direction in [Direction::Buy, Direction::Sell, Direction::Long, Direction::Short] {
        assert_eq!(Direction::from_code(direction.code()), Some(direction));
    }

    assert_eq!(Direction::from_code(0), None);
    assert_eq!(Direction::from_code(5), None);
}

#[test]
fn test_intent_tokens_map_to_acquire_or_dispose() {
    assert_eq!(Intent::from_token("多"), Some(Intent::Long));
    assert_eq!(Intent::from_token("收"), Some(Intent::Long));
    assert_eq!(Intent::from_token("求"), Some(Intent::Long));
    assert_eq!(Intent::from_token("空"), Some(Intent::Short));
    assert_eq!(Intent::from_token("出"), Some(Intent::Short));
    assert_eq!(Intent::from_token("卖"), None);
}

#[test]
fn test_zero_day_delivery_collapses_to_spot() {
    assert_eq!(Delivery::from_days(0), Delivery::Spot);
    assert_eq!(Delivery::from_days(15).days(), 15);
}

#[test]
fn test_record_delivery_days_are_zero_exactly_for_spot_directions() -> Result<()> {
    let spot = create_record("马币", 13, Intent::Long, Delivery::Spot)?;
    let futures = create_record("马币", 13, Intent::Long, Delivery::Futures { days: 15 })?;

    assert!(spot.direction.is_spot());
    assert_eq!(spot.delivery_days, 0);
    assert!(!futures.direction.is_spot());
    assert_eq!(futures.delivery_days, 15);

    Ok(())
}

#[test]
fn test_record_rejects_blank_title_and_truncates_long_ones() -> Result<()> {
    let blank = TradeRecord::new(Category::Ticket, "   ", Price::new(100)?, Intent::Short, Delivery::Spot, "");

    assert_eq!(blank, Err(ValidationError::EmptyTitle));

    let long_title = "长".repeat(100);
    let record = create_record(&long_title, 10, Intent::Short, Delivery::Spot)?;

    assert_eq!(record.title.chars().count(), crate::config::TITLE_MAX_CHARS);

    Ok(())
}

#[test]
fn test_dedup_key_ignores_case_and_whitespace_but_not_direction() -> Result<()> {
    let first = create_record("深圳F4 1080看台", 3000, Intent::Short, Delivery::Spot)?;
    let second = create_record(" 深圳f4 1080 看台", 2800, Intent::Short, Delivery::Spot)?;
    let buy = create_record("深圳F4 1080看台", 2800, Intent::Long, Delivery::Spot)?;

    assert_eq!(first.dedup_key(), second.dedup_key());
    assert_ne!(first.dedup_key(), buy.dedup_key());

    Ok(())
}

#[test]
fn test_outranks_prefers_best_price_per_direction() -> Result<()> {
    let cheap_ask = create_record("工行卡龙的奇迹", 800, Intent::Short, Delivery::Spot)?;
    let dear_ask = create_record("工行卡龙的奇迹", 850, Intent::Short, Delivery::Spot)?;
    let low_bid = create_record("工行卡龙的奇迹", 800, Intent::Long, Delivery::Spot)?;
    let high_bid = create_record("工行卡龙的奇迹", 850, Intent::Long, Delivery::Spot)?;

    assert!(cheap_ask.outranks(&dear_ask));
    assert!(!dear_ask.outranks(&cheap_ask));
    assert!(high_bid.outranks(&low_bid));
    assert!(!low_bid.outranks(&high_bid));

    Ok(())
}

#[test]
fn test_outranks_is_a_strict_order_for_equal_prices() -> Result<()> {
    let first = create_record("马币", 13, Intent::Short, Delivery::Spot)?.with_provenance(&InboundMessage::new("群A", None, ""));
    let second = create_record("马币", 13, Intent::Short, Delivery::Spot)?.with_provenance(&InboundMessage::new("群B", None, ""));

    assert!(first.outranks(&second) ^ second.outranks(&first));
    assert!(!first.outranks(&first.clone()));

    Ok(())
}

#[test]
fn test_record_serializes_direction_as_integer_code() -> Result<()> {
    let record = create_record("马币5000枚", 13, Intent::Long, Delivery::Futures { days: 15 })?;
    let json = serde_json::to_value(&record)?;

    assert_eq!(json["trade_type"], 3);
    assert_eq!(json["price"], 13);
    assert_eq!(json["delivery_days"], 15);
    assert_eq!(json["category"], "collectible");

    Ok(())
}

#[test]
fn test_system_notices_are_recognised_by_sender_suffix() {
    assert!(InboundMessage::new("群", Some("12345@chatroom"), "x").is_system_notice());
    assert!(!InboundMessage::new("群", Some("wxid_abc"), "x").is_system_notice());
    assert!(!InboundMessage::new("群", Some(""), "x").is_system_notice());
}
