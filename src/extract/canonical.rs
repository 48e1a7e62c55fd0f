use std::sync::LazyLock;

use regex::Regex;

use crate::config::RESIDUAL_NAME_MAX_CHARS;
use crate::models::{Delivery, ValidationError};

static RE_DECORATIONS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[發\]|[🈶🔥⚠💎📱🌟🍎🎫💰✈🈲🚀⭐💥🉐👉❤💛🧡\u{FE0F}]+").unwrap()
});

static RE_DAY_COUNT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+)天").unwrap()
});

static RE_COUNTED_UNITS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d+[个枚套刀张]").unwrap()
});

static RE_STATUS_WORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d+天期|期货|现货|闷包|拆包|原盒|封装|云商|无347|非001|001").unwrap()
});

/// Raw descriptor keyword to canonical product name.
///
/// Evaluated top to bottom and the first keyword contained in the text wins,
/// so a keyword must always come before any shorter keyword it contains
/// (`工行卡龙的奇迹` before `龙的奇迹` before `工行卡`). Reordering entries changes
/// results.
pub static PRODUCT_TABLE: &[(&str, &str)] = &[
    ("150克彩银马", "150克彩银马"),
    ("150g银马", "150克银马"),
    ("150克银马", "150克银马"),
    ("15g圆形银马", "15克圆形银马"),
    ("15克银马", "15克彩银马"),
    ("彩银马15克", "15克彩银马"),
    ("公斤银马", "公斤银马"),
    ("彩金银马", "彩金银马"),
    ("金银马", "金银马"),
    ("彩银马", "彩银马"),
    ("银马", "银马"),
    ("梅花马金币", "梅花马金币"),
    ("梅花马", "梅花马"),
    ("工行卡龙的奇迹", "工行卡龙的奇迹"),
    ("龙的奇迹", "工行卡龙的奇迹"),
    ("工行卡", "工行卡龙的奇迹"),
    ("工商卡", "工行卡龙的奇迹"),
    ("交行卡", "交行卡"),
    ("交通卡", "交行卡"),
    ("农行卡", "农行卡"),
    ("建行卡", "建行卡"),
    ("中行卡", "中行卡"),
    ("马钞标百", "马钞标百"),
    ("标百", "马钞标百"),
    ("马钞散钞", "马钞散钞"),
    ("散钞", "马钞散钞"),
    ("马钞", "马钞"),
    ("马币", "马币"),
    ("驰跃宏图", "驰跃宏图"),
    ("中国龙智能卡", "中国龙智能卡"),
    ("中国龙", "中国龙智能卡"),
    ("2026贺岁金银", "2026贺岁金银福字"),
    ("贺岁金银福字", "贺岁金银福字"),
    ("贺岁金银", "贺岁金银福字"),
    ("2026贺岁银币", "2026贺岁银币福字"),
    ("贺岁银币福字", "贺岁银币福字"),
    ("贺岁银币", "贺岁银币福字"),
    ("福字银币", "贺岁银币福字"),
    ("福字金银", "贺岁金银福字"),
    ("80周年抗战金银", "80周年抗战金银"),
    ("抗战金银", "80周年抗战金银"),
    ("大运河银币", "大运河银币"),
    ("大运河", "大运河银币"),
    ("永结同心银币", "永结同心银币"),
    ("永结同心", "永结同心银币"),
    ("瑞气盈门银币", "瑞气盈门银币"),
    ("瑞气盈门", "瑞气盈门银币"),
    ("大黑马", "150克银马封装"),
    ("蛇钞", "蛇钞"),
    ("龙钞", "龙钞"),
    ("生肖大版折", "马年生肖大版折")
];

/// Listing noise that disqualifies a product name.
const BLOCKED_NAME_KEYWORDS: &[&str] = &[
    "通走", "包邮", "求点", "有量", "私聊", "加钱", "标价", "降价", "最后",
    "优酷", "网易云", "饿了么", "芒果", "闪购", "苏宁", "爱奇艺", "腾讯",
    "哔哩", "美团", "滴滴", "京东", "淘宝", "天猫", "年卡", "月卡", "季卡",
    "会员", "VIP", "影城", "电影票", "小时付", "天期34", "天期35", ".7"
];

/// A product name must mention at least one of these.
const ALLOWED_NAME_KEYWORDS: &[&str] = &[
    "马币", "马钞", "标百", "散钞", "工行", "交行", "建行", "农行", "中行",
    "银马", "金马", "彩银", "梅花", "福字", "贺岁", "驰跃", "龙钞", "蛇钞",
    "智能卡", "中国龙", "大运河", "永结同心", "瑞气盈门", "抗战", "纪念"
];

/// Removes emoji decorations and the `[發]` marker senders sprinkle over listings.
pub fn strip_decorations(line: &str) -> String {
    RE_DECORATIONS.replace_all(line, "").into_owned()
}

pub fn canonical_product(text: &str) -> Option<&'static str> {
    PRODUCT_TABLE.iter()
        .find(|(keyword, _)| text.contains(keyword))
        .map(|(_, canonical)| *canonical)
}

/// Fallback name when no table keyword matches: counts, terms and status
/// words stripped, cut to a bounded length. `None` under two chars.
pub fn residual_name(text: &str) -> Option<String> {
    let cleaned = RE_COUNTED_UNITS.replace_all(text, "");
    let cleaned = RE_STATUS_WORDS.replace_all(&cleaned, "");
    let cleaned = cleaned.trim_matches(|character| matches!(character, '，' | ',' | '、' | '。'));

    if cleaned.chars().count() < 2 {
        return None;
    }

    Some(cleaned.chars().take(RESIDUAL_NAME_MAX_CHARS).collect())
}

/// Post-canonicalization gate for collectible product names.
///
/// # Errors
/// - `NameTooShort` under two chars.
/// - `BlockedKeyword` when the name carries listing noise.
/// - `MissingDomainKeyword` when nothing marks it as a coin/note product.
pub fn validate_collectible_name(name: &str) -> Result<(), ValidationError> {
    if name.chars().count() < 2 {
        return Err(ValidationError::name_too_short(name));
    }

    if let Some(keyword) = BLOCKED_NAME_KEYWORDS.iter().find(|keyword| name.contains(*keyword)) {
        return Err(ValidationError::blocked_keyword(name, keyword));
    }

    if !ALLOWED_NAME_KEYWORDS.iter().any(|keyword| name.contains(keyword)) {
        return Err(ValidationError::missing_domain_keyword(name));
    }

    Ok(())
}

/// Product name, then serial condition, then quantity.
pub fn compose_collectible_title(product: &str, annotations: &str, quantity: Option<&str>) -> String {
    let mut title = if annotations.contains("非001") {
        format!("{product}（非001）")
    } else if annotations.contains("001") {
        format!("{product}（001）")
    } else {
        product.to_string()
    };

    if let Some(quantity) = quantity {
        title.push(' ');
        title.push_str(quantity);
    }

    title
}

/// Reads a delivery descriptor such as `15天期`, `现货` or `到货即交割`.
///
/// Futures need an explicit positive day count; everything else is spot.
pub fn delivery_from_descriptor(descriptor: &str) -> Delivery {
    if descriptor.contains("现货") || descriptor.contains("到货即交割") {
        return Delivery::Spot;
    }

    RE_DAY_COUNT.captures(descriptor)
        .and_then(|captures| captures[1].parse::<u32>().ok())
        .map(Delivery::from_days)
        .unwrap_or_default()
}
