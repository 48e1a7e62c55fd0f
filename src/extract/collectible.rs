use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, trace};

use crate::config::{COLLECTIBLE_MIN_LINE_CHARS, QUANTITY_TAG_LIMIT};
use crate::extract::canonical::{
    canonical_product, compose_collectible_title, delivery_from_descriptor, residual_name, strip_decorations,
    validate_collectible_name
};
use crate::extract::context::{collectible_global_info, is_global_info_line};
use crate::models::{Category, Intent, TradeRecord, ValidationError};
use crate::types::Price;

static RE_ENTRY_SEPARATOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s{2,}|\n").unwrap()
});

static RE_STRUCTURED_ENTRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([^,，]+)[,，](\d+)[,，]([多空])[,，]([^,，]+)[,，](.*)$").unwrap()
});

static RE_PRICE_VERB_TERM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+)\s*(出|收|求)\s*(\d+天期)?\s*(.+)").unwrap()
});

static RE_PRICE_VERB_COUNT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+)(?:/[枚套个刀张])?元?\s*(出|收|求)\s*(\d+)?[个枚套刀张]\s*(.+)").unwrap()
});

static RE_DECIMAL_PRICE_VERB: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+(?:\.\d+)?)(?:/[枚套个刀张])?元?\s*(收|出|求)\s*(.+)").unwrap()
});

static RE_VERB_FIRST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(收|出|求)\s*(.+)").unwrap()
});

static RE_PRICE_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+)(?:~|～|-|起)?(\d+)?").unwrap()
});

static RE_TERM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+)天期").unwrap()
});

static RE_STANDALONE_SERIAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[，,\s]001[，,\s]|^001[，,\s]|[，,\s]001$").unwrap()
});

/// Packaging and sourcing words copied into the annotations when present.
const STATUS_TAGS: &[(&str, &str)] = &[
    ("闷包", "闷包"),
    ("拆包", "拆包"),
    ("原盒", "原盒"),
    ("封装", "封装"),
    ("云商", "云商"),
    ("不挑号", "不挑号"),
    ("第一批", "第一批货源")
];

/// Fields of one natural-language listing once a grammar has identified the product.
#[derive(Debug, Clone, PartialEq, Eq)]
struct CoinLine {
    price: Price,
    intent: Intent,
    product: String,
    /// `现货`, `N天期`, `期货` or `到货即交割`.
    delivery_label: String,
    annotations: Vec<String>,
    quantity: Option<String>
}

type LineGrammar = fn(&str) -> Option<CoinLine>;

/// First grammar that identifies a product owns the line.
const LINE_GRAMMARS: &[(&str, LineGrammar)] = &[
    ("price_verb_term", price_verb_term),
    ("price_verb_count", price_verb_count),
    ("decimal_price_verb", decimal_price_verb),
    ("verb_price_range", verb_price_range)
];

struct ProductInfo {
    name: Option<String>,
    delivery_label: String,
    annotations: Vec<String>
}

/// Structured entries first; natural language only when no entry fits the
/// five-field grammar.
pub fn parse_collectible_message(text: &str) -> Vec<TradeRecord> {
    let (matched, records) = parse_structured(text);

    if matched > 0 {
        return records;
    }

    parse_natural_language(text)
}

/// `name,price,多|空,delivery,notes` entries separated by runs of whitespace or newlines.
///
/// Returns how many entries fit the grammar alongside the records that also
/// passed validation.
pub fn parse_structured(text: &str) -> (usize, Vec<TradeRecord>) {
    let mut matched = 0;
    let mut records = Vec::new();

    for entry in RE_ENTRY_SEPARATOR.split(text).map(str::trim).filter(|entry| !entry.is_empty()) {
        let Some(captures) = RE_STRUCTURED_ENTRY.captures(entry) else {
            continue;
        };

        matched += 1;

        let name = captures[1].trim();
        let descriptor = captures[4].trim();
        let notes = captures[5].trim();
        let extra_info = if notes.is_empty() { descriptor } else { notes };

        let built = Price::from_str(&captures[2])
            .map_err(ValidationError::from)
            .and_then(|price| {
                validate_collectible_name(name)?;
                let intent = Intent::from_token(&captures[3]).unwrap_or(Intent::Long);
                TradeRecord::new(Category::Collectible, name, price, intent, delivery_from_descriptor(descriptor), extra_info)
            });

        match built {
            Ok(record) => records.push(record),
            Err(error) => debug!("Structured entry [{entry}] discarded: {error}")
        }
    }

    (matched, records)
}

pub fn parse_natural_language(text: &str) -> Vec<TradeRecord> {
    let normalized = text.replace(['❗', '！'], "\n");
    let lines: Vec<&str> = normalized.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    let global_info = collectible_global_info(&lines);

    lines.iter()
        .filter(|line| line.chars().count() >= COLLECTIBLE_MIN_LINE_CHARS)
        .filter(|line| !is_global_info_line(line))
        .filter_map(|line| parse_line(line, &global_info))
        .collect()
}

fn parse_line(raw_line: &str, global_info: &str) -> Option<TradeRecord> {
    let cleaned = strip_decorations(raw_line);
    let line = cleaned.trim();

    if line.is_empty() {
        return None;
    }

    let Some((name, coin)) = LINE_GRAMMARS.iter().find_map(|(name, grammar)| grammar(line).map(|coin| (name, coin))) else {
        trace!("Collectible line [{line}] matched no grammar");
        return None;
    };

    trace!("Collectible line [{line}] matched by [{name}]");

    if let Err(error) = validate_collectible_name(&coin.product) {
        debug!("Collectible line [{line}] discarded: {error}");
        return None;
    }

    let line_info = if coin.annotations.is_empty() {
        coin.delivery_label.clone()
    } else {
        coin.annotations.join("；")
    };

    let title = compose_collectible_title(&coin.product, &line_info, coin.quantity.as_deref());

    let extra_info = if global_info.is_empty() {
        line_info
    } else {
        format!("{line_info}；{global_info}")
    };

    let delivery = delivery_from_descriptor(&coin.delivery_label);

    match TradeRecord::new(Category::Collectible, &title, coin.price, coin.intent, delivery, extra_info) {
        Ok(record) => Some(record),
        Err(error) => {
            debug!("Collectible line [{line}] discarded: {error}");
            None
        }
    }
}

/// `16800收7天期标百，非001`
fn price_verb_term(line: &str) -> Option<CoinLine> {
    let captures = RE_PRICE_VERB_TERM.captures(line)?;
    let price = Price::from_str(&captures[1]).ok()?;
    let intent = Intent::from_token(&captures[2])?;
    let info = product_info(captures[4].trim());
    let product = info.name?;

    let mut delivery_label = info.delivery_label;
    let mut annotations = info.annotations;

    if let Some(term) = captures.get(3).map(|term| term.as_str()) {
        delivery_label = term.to_string();

        if !annotations.iter().any(|annotation| annotation.contains(term)) {
            annotations.insert(0, term.to_string());
        }
    }

    Some(CoinLine { price, intent, product, delivery_label, annotations, quantity: None })
}

/// `950/枚收5个工商卡`
fn price_verb_count(line: &str) -> Option<CoinLine> {
    let captures = RE_PRICE_VERB_COUNT.captures(line)?;
    let price = Price::from_str(&captures[1]).ok()?;
    let intent = Intent::from_token(&captures[2])?;
    let rest = captures[4].trim();
    let info = product_info(rest);
    let product = info.name?;

    let head: String = rest.chars().take(10).collect();
    let looks_like_weight = head.contains("15") || head.contains('克') || head.contains('g');

    let quantity = captures.get(3)
        .and_then(|count| count.as_str().parse::<u32>().ok())
        .filter(|count| *count < QUANTITY_TAG_LIMIT && !looks_like_weight)
        .map(|count| format!("{count}个"));

    Some(CoinLine {
        price,
        intent,
        product,
        delivery_label: info.delivery_label,
        annotations: info.annotations,
        quantity
    })
}

/// `13.5收马币15天期`
fn decimal_price_verb(line: &str) -> Option<CoinLine> {
    let captures = RE_DECIMAL_PRICE_VERB.captures(line)?;
    let price = Price::from_str(&captures[1]).ok()?;
    let intent = Intent::from_token(&captures[2])?;
    let info = product_info(captures[3].trim());
    let product = info.name?;

    Some(CoinLine {
        price,
        intent,
        product,
        delivery_label: info.delivery_label,
        annotations: info.annotations,
        quantity: None
    })
}

/// `收7000-7500银马原盒`, the upper bound of a range is the price.
fn verb_price_range(line: &str) -> Option<CoinLine> {
    let captures = RE_VERB_FIRST.captures(line)?;
    let intent = Intent::from_token(&captures[1])?;
    let rest = captures[2].trim();

    let range = RE_PRICE_RANGE.captures(rest)?;
    let bound = range.get(2).or_else(|| range.get(1))?;
    let price = Price::from_str(bound.as_str()).ok()?;
    let end = range.get(0).map_or(0, |whole| whole.end());

    let info = product_info(rest[end..].trim());
    let product = info.name?;

    Some(CoinLine {
        price,
        intent,
        product,
        delivery_label: info.delivery_label,
        annotations: info.annotations,
        quantity: None
    })
}

/// Product name, delivery term and annotations from a listing description.
fn product_info(text: &str) -> ProductInfo {
    let mut annotations = Vec::new();

    let delivery_label = if let Some(captures) = RE_TERM.captures(text) {
        let term = format!("{}天期", &captures[1]);
        annotations.push(term.clone());
        term
    } else if text.contains("期货") {
        annotations.push("期货".to_string());
        "期货".to_string()
    } else if text.contains("到货") && !text.contains("现货") {
        "到货即交割".to_string()
    } else {
        "现货".to_string()
    };

    if text.contains("无347") || text.contains("无3、4、7") {
        annotations.push("无347".to_string());
    }

    if text.contains("非001") {
        annotations.push("非001".to_string());
    } else if RE_STANDALONE_SERIAL.is_match(text) {
        annotations.push("001".to_string());
    }

    let name = canonical_product(text)
        .map(str::to_string)
        .or_else(|| residual_name(text));

    for (keyword, tag) in STATUS_TAGS {
        if text.contains(keyword) {
            annotations.push(tag.to_string());
        }
    }

    ProductInfo { name, delivery_label, annotations }
}
