use std::fmt;
use std::fmt::{Display, Formatter};
use std::sync::LazyLock;

use regex::Regex;

static SUBJECT_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)(成都|深圳|广州|上海|北京|杭州|武汉|南昌|厦门|佛山|天津|郑州|三亚|长沙|海口|泉州|福州)(F4|刘宇宁|张杰|王力宏|陈楚生|周传雄|袁娅维|邓紫棋|张韶涵|韩红|陈慧娴|郭德纲|伍佰|何浩楠|蒲熠星|王心凌|华晨宇|任贤齐|杨丞琳|陈柏宇|姜育恒|汪苏泷|陈嘉桦|王赫野|谢霆锋|孙燕姿)",
        r"(?i)(香港|澳门)(BP|blackpink|SJ|张学友|孙燕姿|汪苏泷)",
        r"(韩红)(杭州|武汉|深圳|上海)",
        r"(陈慧娴)(武汉|深圳|上海|广州)"
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).unwrap())
    .collect()
});

/// Fixed show names whose wording varies between senders.
static SPECIAL_SUBJECTS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        (r"你好星期六", "你好星期六"),
        (r"湖南卫视.*?晚会", "湖南卫视晚会"),
        (r"上海F1", "上海F1"),
        (r"德云社.*?封箱", "德云社封箱")
    ]
    .iter()
    .map(|(pattern, name)| (Regex::new(pattern).unwrap(), *name))
    .collect()
});

static RE_MONTH_DAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{1,2})月(\d{1,2})日?").unwrap()
});

static RE_DAY_ONLY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,2})号").unwrap()
});

static RE_DOTTED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|\D)(1[0-2]|0?[1-9])\.([0-3]?\d)(?:号|\D|$)").unwrap()
});

static RE_REBATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[返反](\d+)").unwrap()
});

static RE_DEAD_DELIVERY_DEPOSIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"死交割[：:]*定金[：:]*(\d+)[/／]?\s*刀").unwrap()
});

static RE_LEADING_TRADE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d+\s*(收|出|求)").unwrap()
});

static RE_VERB_PRICE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(收|出|求)\d+").unwrap()
});

/// Administrative words that mark a collectible line as message-wide terms.
const GLOBAL_INFO_KEYWORDS: &[&str] = &[
    "死交割", "定金", "互打", "中介", "熟人", "口头",
    "具体私聊", "私聊确认", "以上", "有量私聊", "标价私聊",
    "新品行情", "行情变动"
];

/// Finds the show a ticket message is about. `None` drops the message from the ticket path.
pub fn subject_identity(text: &str) -> Option<String> {
    if let Some(found) = SUBJECT_PATTERNS.iter().find_map(|pattern| pattern.find(text)) {
        return Some(found.as_str().to_string());
    }

    SPECIAL_SUBJECTS.iter()
        .find(|(pattern, _)| pattern.is_match(text))
        .map(|(_, name)| name.to_string())
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct ShowDate {
    pub month: u32,
    pub day: u32
}

impl ShowDate {
    pub fn checked(month: u32, day: u32) -> Option<Self> {
        ((1..=12).contains(&month) && (1..=31).contains(&day)).then_some(Self { month, day })
    }
}

impl Display for ShowDate {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}月{}日", self.month, self.day)
    }
}

/// One step of the per-message date fold: the date a line establishes, or
/// the carried one when the line names none.
///
/// A bare `D号` keeps the carried month and assumes January when nothing is
/// carried yet. Out-of-range months or days never replace the carried date.
pub fn next_date(prior: Option<ShowDate>, line: &str) -> Option<ShowDate> {
    if let Some(captures) = RE_MONTH_DAY.captures(line) {
        if let Some(date) = parse_show_date(&captures[1], &captures[2]) {
            return Some(date);
        }
    }

    if let Some(captures) = RE_DAY_ONLY.captures(line) {
        let month = prior.map_or(1, |date| date.month);
        let date = captures[1].parse().ok().and_then(|day| ShowDate::checked(month, day));

        if date.is_some() {
            return date;
        }
    }

    if let Some(captures) = RE_DOTTED.captures(line) {
        if let Some(date) = parse_show_date(&captures[1], &captures[2]) {
            return Some(date);
        }
    }

    prior
}

fn parse_show_date(month: &str, day: &str) -> Option<ShowDate> {
    ShowDate::checked(month.parse().ok()?, day.parse().ok()?)
}

/// Message-wide ticket notes: one delivery-speed variant, then the
/// additive tags.
pub fn ticket_annotations(text: &str) -> Vec<String> {
    let mut notes = Vec::new();

    if text.contains("邀请函秒发") || text.contains("函秒发") {
        notes.push("邀请函秒发".to_string());
    } else if text.contains("秒发") {
        notes.push("秒发".to_string());
    } else if text.contains("秒录") || text.contains("录信息") {
        notes.push("录信息".to_string());
    }

    if text.contains("现票") {
        notes.push("现票".to_string());
    }

    if let Some(captures) = RE_REBATE.captures(text) {
        notes.push(format!("返{}", &captures[1]));
    }

    notes
}

/// Whether a collectible line states message-wide terms rather than a trade.
pub fn is_global_info_line(line: &str) -> bool {
    let line = line.trim();

    if !GLOBAL_INFO_KEYWORDS.iter().any(|keyword| line.contains(keyword)) {
        return false;
    }

    !RE_LEADING_TRADE.is_match(line) && !RE_VERB_PRICE.is_match(line)
}

/// Message-wide collectible terms.
///
/// Trailing global-info lines are read from the bottom up until the first
/// trade line, then the whole message is scanned for deposit and
/// settlement-channel terms. Each fragment appears once, in message order.
pub fn collectible_global_info(lines: &[&str]) -> String {
    let mut fragments: Vec<String> = Vec::new();

    for line in lines.iter().rev().map(|line| line.trim()).filter(|line| !line.is_empty()) {
        if !is_global_info_line(line) {
            break;
        }

        for fragment in global_fragments(line).into_iter().rev() {
            if !fragments.contains(&fragment) {
                fragments.insert(0, fragment);
            }
        }
    }

    let full_text = lines.join("\n");

    if let Some(captures) = RE_DEAD_DELIVERY_DEPOSIT.captures(&full_text) {
        push_unique(&mut fragments, format!("死交割定金{}/刀", &captures[1]));
    }

    if full_text.contains("互打") && !fragments.iter().any(|fragment| fragment.contains("互打")) {
        if full_text.contains("熟人") {
            push_unique(&mut fragments, "熟人口头支持".to_string());
        }
        if full_text.contains("中介") {
            push_unique(&mut fragments, "中介互打".to_string());
        }
    }

    fragments.join("；")
}

fn global_fragments(line: &str) -> Vec<String> {
    let mut fragments = Vec::new();

    if let Some(captures) = RE_DEAD_DELIVERY_DEPOSIT.captures(line) {
        fragments.push(format!("死交割定金{}/刀", &captures[1]));
    }
    if line.contains("熟人口头") {
        fragments.push("熟人口头支持".to_string());
    }
    if line.contains("中介互打") {
        fragments.push("中介互打".to_string());
    }

    fragments
}

fn push_unique(fragments: &mut Vec<String>, fragment: String) {
    if !fragments.contains(&fragment) {
        fragments.push(fragment);
    }
}
