use super::{dedupe, RecordStorage, Storage, TradeBook};
use crate::models::{Category, Delivery, Direction, InboundMessage, Intent, TradeRecord};
use crate::types::Price;
use anyhow::{anyhow, Result};

fn record(title: &str, price: u32, intent: Intent, days: u32) -> Result<TradeRecord> {
    Ok(TradeRecord::new(Category::Collectible, title, Price::new(price)?, intent, Delivery::from_days(days), "")?)
}

fn sample_batch() -> Result<Vec<TradeRecord>> {
    Ok(vec![
        record("工行卡龙的奇迹", 850, Intent::Short, 0)?,
        record("工行卡龙的奇迹", 800, Intent::Short, 0)?,
        record("工行卡龙的奇迹", 780, Intent::Long, 0)?,
        record("工行卡龙的奇迹", 790, Intent::Long, 0)?,
        record("马币", 13, Intent::Long, 15)?,
        record("马币", 14, Intent::Long, 15)?,
        record("马币", 15, Intent::Short, 15)?,
        record("马钞标百", 16800, Intent::Long, 7)?
    ])
}

#[test]
fn test_scenario_sell_duplicates_keep_lowest_price() -> Result<()> {
    let records = dedupe(vec![
        record("工行卡龙的奇迹", 850, Intent::Short, 0)?,
        record("工行卡龙的奇迹", 800, Intent::Short, 0)?
    ]);

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].direction, Direction::Sell);
    assert_eq!(records[0].price.value(), 800);

    Ok(())
}

#[test]
fn test_buy_and_long_duplicates_keep_highest_price() -> Result<()> {
    let records = dedupe(vec![
        record("马币", 13, Intent::Long, 15)?,
        record("马币", 14, Intent::Long, 15)?,
        record("银马", 7000, Intent::Long, 0)?,
        record("银马", 6900, Intent::Long, 0)?
    ]);

    let prices: Vec<(String, u32)> = records.iter().map(|record| (record.title.clone(), record.price.value())).collect();

    assert_eq!(prices, vec![("银马".to_string(), 7000), ("马币".to_string(), 14)]);

    Ok(())
}

#[test]
fn test_dedup_key_separates_directions_and_normalizes_titles() -> Result<()> {
    let records = dedupe(vec![
        record("工行卡龙的奇迹", 850, Intent::Short, 0)?,
        record("工行卡龙的奇迹", 780, Intent::Long, 0)?,
        record(" 工行卡 龙的奇迹", 820, Intent::Short, 0)?
    ]);

    assert_eq!(records.len(), 2);
    assert!(records.iter().any(|record| record.direction == Direction::Buy && record.price.value() == 780));
    assert!(records.iter().any(|record| record.direction == Direction::Sell && record.price.value() == 820));

    Ok(())
}

#[test]
fn test_equal_prices_resolve_independently_of_arrival_order() -> Result<()> {
    let first = record("马币", 13, Intent::Long, 15)?.with_provenance(&InboundMessage::new("A群", Some("wxid_a"), ""));
    let second = record("马币", 13, Intent::Long, 15)?.with_provenance(&InboundMessage::new("B群", Some("wxid_b"), ""));

    let forward = dedupe(vec![first.clone(), second.clone()]);
    let backward = dedupe(vec![second, first]);

    assert_eq!(forward, backward);
    assert_eq!(forward[0].source_group, "A群");

    Ok(())
}

#[test]
fn test_dedupe_is_idempotent() -> Result<()> {
    let once = dedupe(sample_batch()?);

    let mut twice_input = sample_batch()?;
    twice_input.extend(sample_batch()?);

    assert_eq!(dedupe(twice_input), once);
    assert_eq!(dedupe(once.clone()), once);

    Ok(())
}

#[test]
fn test_book_merge_is_independent_of_partitioning() -> Result<()> {
    let batch = sample_batch()?;
    let whole = dedupe(batch.clone());

    for split in 0..=batch.len() {
        let (left, right) = batch.split_at(split);

        let mut left_book: TradeBook = left.iter().cloned().collect();
        let right_book: TradeBook = right.iter().cloned().collect();
        let mut swapped: TradeBook = right.iter().cloned().collect();

        swapped.merge(left_book.clone());
        left_book.merge(right_book);

        assert_eq!(left_book.into_records(), whole, "split at {split}");
        assert_eq!(swapped.into_records(), whole, "swapped split at {split}");
    }

    Ok(())
}

#[test]
fn test_book_offer_reports_whether_record_is_held() -> Result<()> {
    let mut book = TradeBook::new();

    assert!(book.is_empty());
    assert!(book.offer(record("马币", 13, Intent::Short, 0)?));
    assert!(!book.offer(record("马币", 14, Intent::Short, 0)?));
    assert!(book.offer(record("马币", 12, Intent::Short, 0)?));
    assert_eq!(book.len(), 1);

    Ok(())
}

#[test]
fn test_storage_absorbs_books_with_merge_rule() -> Result<()> {
    let storage = RecordStorage::new();

    assert!(storage.is_empty());

    storage.absorb(vec![record("工行卡龙的奇迹", 850, Intent::Short, 0)?].into_iter().collect());
    storage.absorb(vec![record("工行卡龙的奇迹", 800, Intent::Short, 0)?].into_iter().collect());
    storage.offer(record("工行卡龙的奇迹", 900, Intent::Short, 0)?);

    let records = storage.records();
    let kept = records.first().ok_or_else(|| anyhow!("Record missing from storage"))?;

    assert_eq!(storage.len(), 1);
    assert_eq!(kept.price.value(), 800);

    Ok(())
}

#[test]
fn test_storage_snapshot_is_sorted() -> Result<()> {
    let storage = RecordStorage::new();

    for record in sample_batch()?.into_iter().rev() {
        storage.offer(record);
    }

    assert_eq!(storage.records(), dedupe(sample_batch()?));

    Ok(())
}
