use serde::{Deserialize, Serialize};

use super::users::UserId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PrizeType {
    Token,
}

impl PrizeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrizeType::Token => "token",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpinSegment {
    pub index: usize,
    pub value: i64,
    pub prize_type: PrizeType,
    pub weight: f64,
}

impl SpinSegment {
    const fn token(index: usize, value: i64, weight: f64) -> Self {
        SpinSegment {
            index,
            value,
            prize_type: PrizeType::Token,
            weight,
        }
    }

    /// Amount added to the user's token balance when this segment wins.
    pub fn balance_credit(&self) -> i64 {
        match self.prize_type {
            PrizeType::Token => self.value,
        }
    }
}

/// Wheel layout, in drawing order. Weights sum to 1.0.
pub const SPIN_SEGMENTS: [SpinSegment; 10] = [
    SpinSegment::token(0, 1000, 0.01),
    SpinSegment::token(1, 10, 0.30),
    SpinSegment::token(2, 25, 0.20),
    SpinSegment::token(3, 50, 0.15),
    SpinSegment::token(4, 75, 0.12),
    SpinSegment::token(5, 100, 0.09),
    SpinSegment::token(6, 250, 0.05),
    SpinSegment::token(7, 500, 0.03),
    SpinSegment::token(8, 150, 0.03),
    SpinSegment::token(9, 5, 0.02),
];

/// Segment used when rounding leaves the draw above the cumulative total.
pub const FALLBACK_SEGMENT: usize = 1;

/// Picks the first segment whose cumulative weight reaches `draw`.
///
/// `draw` is expected in `[0, 1)`. If float drift makes the scan run off the
/// end, `segments[FALLBACK_SEGMENT]` is returned (or the last segment for
/// tables shorter than that). `None` only for an empty table.
pub fn select_segment(segments: &[SpinSegment], draw: f64) -> Option<&SpinSegment> {
    let mut cumulative = 0.0;

    for segment in segments {
        cumulative += segment.weight;
        if cumulative >= draw {
            return Some(segment);
        }
    }

    segments.get(FALLBACK_SEGMENT).or_else(|| segments.last())
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpinResult {
    pub success: bool,
    pub prize_index: usize,
    pub prize_value: i64,
    pub prize_type: PrizeType,
    pub remaining_spins: i32,
    pub new_balance: i64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SpinHistoryRecord {
    pub id: String,
    pub user_id: UserId,
    pub prize_type: PrizeType,
    pub prize_amount: i64,
}
