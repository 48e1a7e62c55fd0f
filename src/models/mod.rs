mod errors;
mod message;
mod record;
#[cfg(test)]
mod tests;

use std::fmt;
use std::fmt::{Display, Formatter};

use serde::{Serialize, Serializer};

pub use errors::ValidationError;
pub use message::InboundMessage;
pub use record::{DedupKey, TradeRecord};

/// Trade direction as published downstream.
///
/// Buy/Sell are spot trades, Long/Short carry a forward delivery term.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Direction {
    Buy,
    Sell,
    Long,
    Short
}

impl Direction {
    pub fn code(&self) -> u8 {
        match self {
            Direction::Buy => 1,
            Direction::Sell => 2,
            Direction::Long => 3,
            Direction::Short => 4
        }
    }

    /// Lookup for integer codes coming back from external collaborators.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Direction::Buy),
            2 => Some(Direction::Sell),
            3 => Some(Direction::Long),
            4 => Some(Direction::Short),
            _ => None
        }
    }

    /// Combines trade intent with the delivery term.
    pub fn classify(intent: Intent, delivery: Delivery) -> Self {
        match (intent, delivery) {
            (Intent::Long, Delivery::Spot) => Direction::Buy,
            (Intent::Short, Delivery::Spot) => Direction::Sell,
            (Intent::Long, Delivery::Futures { .. }) => Direction::Long,
            (Intent::Short, Delivery::Futures { .. }) => Direction::Short
        }
    }

    /// Acquiring sides keep the highest bid, disposing sides the lowest ask.
    pub fn prefers_higher(&self) -> bool {
        matches!(self, Direction::Buy | Direction::Long)
    }

    pub fn is_spot(&self) -> bool {
        matches!(self, Direction::Buy | Direction::Sell)
    }

    pub fn intent(&self) -> Intent {
        if self.prefers_higher() {
            Intent::Long
        } else {
            Intent::Short
        }
    }
}

impl Serialize for Direction {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u8(self.code())
    }
}

/// The acquire/dispose half of a direction token (多/收/求 vs 空/出).
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Intent {
    Long,
    Short
}

impl Intent {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "多" | "收" | "求" => Some(Intent::Long),
            "空" | "出" => Some(Intent::Short),
            _ => None
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
pub enum Delivery {
    #[default]
    Spot,
    Futures {
        days: u32
    }
}

impl Delivery {
    /// Futures only exist with a positive day count; anything else is spot.
    pub fn from_days(days: u32) -> Self {
        if days == 0 {
            Delivery::Spot
        } else {
            Delivery::Futures { days }
        }
    }

    pub fn days(&self) -> u32 {
        match self {
            Delivery::Spot => 0,
            Delivery::Futures { days } => *days
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Ticket,
    Collectible
}

impl Display for Category {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Category::Ticket => write!(formatter, "ticket"),
            Category::Collectible => write!(formatter, "collectible")
        }
    }
}
