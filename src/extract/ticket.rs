use std::str::FromStr;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use tracing::{debug, trace};

use crate::config::{TICKET_NOMINAL_FLOOR, TICKET_PRICE_MAX, TICKET_PRICE_MIN};
use crate::extract::canonical::strip_decorations;
use crate::extract::context::{next_date, ticket_annotations};
use crate::models::{Category, Delivery, Intent, TradeRecord, ValidationError};
use crate::types::Price;

static RE_ROW_DEPTH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{3,4})的?(看台|内场)?前(\d+)排[\s\-]*(\d{4,5})").unwrap()
});

static RE_NOMINAL_SALE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{3,4})[-的](\d{3,5})$").unwrap()
});

static RE_AREA_NOMINAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(看台|内场)(\d{3,4})[-\s]*(\d{3,5})").unwrap()
});

static RE_PREMIUM_AREA: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{3,4})?(VIP|vip|内场)前?(\d+)?排?[\s\-]*(\d{4,5})").unwrap()
});

static RE_BOX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([四五]层)?包厢[\s\-]*(\d{3,5})").unwrap()
});

static RE_UNIT_QUANTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d{3,4})[×x*](\d+)\s+(\d{3,5})").unwrap()
});

static RE_AREA_NOTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{3,4})[-\s]*(\d{3,5})[（(]([^）)]+)[）)]").unwrap()
});

static RE_ROW_QUANTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{3,4})前(\d+)排[*×x]?(\d+)?\s+(\d{3,5})").unwrap()
});

static RE_STAGE_SIDE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(舞台两侧|两侧)[\s\-]*(\d{3,5})").unwrap()
});

static RE_PAIR_SCAN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|\D)(\d{3,4})[-的](\d{3,5})").unwrap()
});

const DEFAULT_AREA: &str = "看台";

/// Raw fields one recognizer pulls out of a ticket line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketFields {
    /// Nominal price and area (`1080看台`), or a fixed descriptor (`四层包厢`).
    pub grade: String,
    pub price: Price,
    /// Row depth, quantity or area note.
    pub seat: String
}

type Recognizer = fn(&str) -> Vec<TicketFields>;

/// Tried in order; the first recognizer that yields anything owns the line.
///
/// Area-prefixed pairs (`内场1280-2800`) sit ahead of the VIP/inner-field
/// grammar, which would otherwise read the nominal price as a row number.
const RECOGNIZERS: &[(&str, Recognizer)] = &[
    ("row_depth", row_depth),
    ("nominal_sale_pair", nominal_sale_pair),
    ("area_nominal_pair", area_nominal_pair),
    ("premium_area", premium_area),
    ("box", box_seat),
    ("unit_quantity", unit_quantity),
    ("area_note", area_note),
    ("row_quantity", row_quantity),
    ("stage_side", stage_side),
    ("repeated_pairs", repeated_pairs)
];

/// Runs the recognizer cascade over one cleaned line.
pub fn match_line(line: &str) -> Vec<TicketFields> {
    for (name, recognizer) in RECOGNIZERS {
        let fields = recognizer(line);

        if !fields.is_empty() {
            trace!("Ticket line [{line}] matched by [{name}]");
            return fields;
        }
    }

    trace!("Ticket line [{line}] matched no recognizer");
    Vec::new()
}

/// Extracts every ticket listing of a message whose subject is already known.
///
/// Lines are folded in order so a date named on one line applies to the
/// listings below it until another date appears.
pub fn parse_ticket_message(text: &str, subject: &str) -> Vec<TradeRecord> {
    let notes = ticket_annotations(text);
    let intent = ticket_intent(text);
    let mut date = None;
    let mut records = Vec::new();

    for raw_line in text.lines() {
        let cleaned = strip_decorations(raw_line);
        let line = cleaned.trim();

        if line.is_empty() {
            continue;
        }

        date = next_date(date, line);

        for fields in match_line(line) {
            let title = match date {
                Some(date) => format!("{subject} {date} {}", fields.grade),
                None => format!("{subject} {}", fields.grade)
            };

            let extra_info = std::iter::once(fields.seat.as_str())
                .filter(|seat| !seat.is_empty())
                .chain(notes.iter().map(String::as_str))
                .collect::<Vec<_>>()
                .join("，");

            match TradeRecord::new(Category::Ticket, &title, fields.price, intent, Delivery::Spot, extra_info) {
                Ok(record) => records.push(record),
                Err(error) => debug!("Ticket line [{line}] discarded: {error}")
            }
        }
    }

    records
}

/// Ticket adverts are sales unless the message opens with a buying verb.
fn ticket_intent(text: &str) -> Intent {
    let opening = text.lines().map(str::trim).find(|line| !line.is_empty()).unwrap_or_default();

    if opening.starts_with('收') || opening.starts_with('求') {
        Intent::Long
    } else {
        Intent::Short
    }
}

fn sale_price(digits: &str) -> Option<Price> {
    let price = Price::from_str(digits).ok()?;

    if !price.within(TICKET_PRICE_MIN, TICKET_PRICE_MAX) {
        debug!("{}", ValidationError::price_out_of_range(price.value(), TICKET_PRICE_MIN, TICKET_PRICE_MAX));
        return None;
    }

    Some(price)
}

/// A nominal/sale pair is trusted when the sale is the larger number, or
/// when both numbers are large enough to be real prices.
fn accept_pair(nominal: &str, sale: &str) -> bool {
    match (nominal.parse::<u32>(), sale.parse::<u32>()) {
        (Ok(nominal), Ok(sale)) => {
            nominal < sale || (nominal >= TICKET_NOMINAL_FLOOR && sale >= TICKET_NOMINAL_FLOOR)
        }
        _ => false
    }
}

fn group<'h>(captures: &Captures<'h>, index: usize) -> &'h str {
    captures.get(index).map_or("", |found| found.as_str())
}

fn single(grade: String, price: &str, seat: String) -> Vec<TicketFields> {
    sale_price(price)
        .map(|price| vec![TicketFields { grade, price, seat }])
        .unwrap_or_default()
}

fn row_depth(line: &str) -> Vec<TicketFields> {
    let Some(captures) = RE_ROW_DEPTH.captures(line) else {
        return Vec::new();
    };

    let area = captures.get(2).map_or(DEFAULT_AREA, |found| found.as_str());

    single(
        format!("{}{area}", group(&captures, 1)),
        group(&captures, 4),
        format!("前{}排", group(&captures, 3))
    )
}

fn nominal_sale_pair(line: &str) -> Vec<TicketFields> {
    let compact: String = line.chars().filter(|character| !character.is_whitespace()).collect();

    let Some(captures) = RE_NOMINAL_SALE.captures(&compact) else {
        return Vec::new();
    };

    let (nominal, sale) = (group(&captures, 1), group(&captures, 2));

    if !accept_pair(nominal, sale) {
        return Vec::new();
    }

    single(format!("{nominal}{DEFAULT_AREA}"), sale, String::new())
}

fn area_nominal_pair(line: &str) -> Vec<TicketFields> {
    let Some(captures) = RE_AREA_NOMINAL.captures(line) else {
        return Vec::new();
    };

    single(
        format!("{}{}", group(&captures, 2), group(&captures, 1)),
        group(&captures, 3),
        String::new()
    )
}

fn premium_area(line: &str) -> Vec<TicketFields> {
    let Some(captures) = RE_PREMIUM_AREA.captures(line) else {
        return Vec::new();
    };

    let seat = captures.get(3)
        .map(|row| format!("前{}排", row.as_str()))
        .unwrap_or_default();

    single(
        format!("{}{}", group(&captures, 1), group(&captures, 2)),
        group(&captures, 4),
        seat
    )
}

fn box_seat(line: &str) -> Vec<TicketFields> {
    let Some(captures) = RE_BOX.captures(line) else {
        return Vec::new();
    };

    single(format!("{}包厢", group(&captures, 1)), group(&captures, 2), String::new())
}

fn unit_quantity(line: &str) -> Vec<TicketFields> {
    let Some(captures) = RE_UNIT_QUANTITY.captures(line) else {
        return Vec::new();
    };

    single(
        format!("{}{DEFAULT_AREA}", group(&captures, 1)),
        group(&captures, 3),
        format!("×{}", group(&captures, 2))
    )
}

fn area_note(line: &str) -> Vec<TicketFields> {
    let Some(captures) = RE_AREA_NOTE.captures(line) else {
        return Vec::new();
    };

    single(
        format!("{}{DEFAULT_AREA}", group(&captures, 1)),
        group(&captures, 2),
        group(&captures, 3).to_string()
    )
}

fn row_quantity(line: &str) -> Vec<TicketFields> {
    let Some(captures) = RE_ROW_QUANTITY.captures(line) else {
        return Vec::new();
    };

    let mut seat = format!("前{}排", group(&captures, 2));

    if let Some(quantity) = captures.get(3) {
        seat.push('×');
        seat.push_str(quantity.as_str());
    }

    single(format!("{}{DEFAULT_AREA}", group(&captures, 1)), group(&captures, 4), seat)
}

fn stage_side(line: &str) -> Vec<TicketFields> {
    let Some(captures) = RE_STAGE_SIDE.captures(line) else {
        return Vec::new();
    };

    single("舞台两侧".to_string(), group(&captures, 2), String::new())
}

/// Several nominal-sale pairs on one line (`1080-3000 1280-3500`), one listing each.
fn repeated_pairs(line: &str) -> Vec<TicketFields> {
    let pairs: Vec<(&str, &str)> = RE_PAIR_SCAN.captures_iter(line)
        .map(|captures| (group(&captures, 1), group(&captures, 2)))
        .collect();

    if pairs.len() < 2 {
        return Vec::new();
    }

    pairs.into_iter()
        .filter(|(nominal, sale)| accept_pair(nominal, sale))
        .flat_map(|(nominal, sale)| single(format!("{nominal}{DEFAULT_AREA}"), sale, String::new()))
        .collect()
}
