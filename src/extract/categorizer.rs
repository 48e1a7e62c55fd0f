use std::sync::LazyLock;

use regex::Regex;

use crate::config::TICKET_MIN_CHARS;
use crate::models::Category;

static RE_PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[[^\[\]]*\]$|^@").unwrap()
});

static RE_PRICE_RUN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d{3,}").unwrap()
});

const GREETINGS: &[&str] = &[
    "大家好", "早上好", "早安", "午安", "晚上好", "晚安", "你好", "您好", "谢谢", "收到", "好的"
];

/// Retail, subscription and ticket-domain words; checked before the coin keywords.
const COLLECTIBLE_EXCLUDE_KEYWORDS: &[&str] = &[
    "优酷", "网易云", "饿了么", "芒果", "闪购", "苏宁", "爱奇艺", "QQ音乐",
    "腾讯视频", "哔哩哔哩", "B站", "美团", "滴滴", "京东", "淘宝", "天猫",
    "年卡", "月卡", "季卡", "会员", "VIP", "影城", "电影票", "小时付",
    "演唱会", "门票", "看台", "内场", "包厢", "邀请函", "秒发", "秒录",
    "配单", "剁票", "返点", "返佣"
];

const COLLECTIBLE_KEYWORDS: &[&str] = &[
    "马币", "马钞", "工行卡", "交行卡", "建行卡", "农行卡", "中行卡",
    "纪念钞", "纪念币", "闷包", "标百", "刀", "枚", "套",
    "驰跃宏图", "龙钞", "蛇钞", "航天钞", "冬奥钞", "亚运钞",
    "做多", "做空", "交割", "期货", "现货", "保证金",
    "银马", "金马", "彩银", "梅花马", "福字", "贺岁", "大运河",
    "永结同心", "瑞气盈门", "抗战", "智能卡", "中国龙"
];

const TICKET_KEYWORDS: &[&str] = &[
    "出", "票", "排", "内场", "看台", "VIP", "包厢", "秒发", "秒录", "邀请函", "录信息"
];

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum MessageCategory {
    NotTrade,
    Trade(Category)
}

/// Decides which extraction path, if any, a raw message takes.
///
/// Anything without a run of three digits carries no plausible price and is
/// dropped up front. The collectible path is tried first and its exclusion list is consulted
/// before its inclusion list, so a ticket advert that happens to say `套` or
/// `枚` still lands on the ticket path.
pub fn classify(text: &str) -> MessageCategory {
    let text = text.trim();

    if text.is_empty() || is_pure_chat(text) || !RE_PRICE_RUN.is_match(text) {
        return MessageCategory::NotTrade;
    }

    if is_collectible(text) {
        return MessageCategory::Trade(Category::Collectible);
    }

    if is_ticket(text) {
        return MessageCategory::Trade(Category::Ticket);
    }

    MessageCategory::NotTrade
}

fn is_pure_chat(text: &str) -> bool {
    if RE_PLACEHOLDER.is_match(text) {
        return true;
    }

    let bare = text.trim_matches(|character: char| !character.is_alphanumeric());

    GREETINGS.contains(&bare)
}

fn is_collectible(text: &str) -> bool {
    if COLLECTIBLE_EXCLUDE_KEYWORDS.iter().any(|keyword| text.contains(keyword)) {
        return false;
    }

    COLLECTIBLE_KEYWORDS.iter().any(|keyword| text.contains(keyword))
}

fn is_ticket(text: &str) -> bool {
    if text.chars().count() < TICKET_MIN_CHARS {
        return false;
    }

    TICKET_KEYWORDS.iter().any(|keyword| text.contains(keyword))
}
