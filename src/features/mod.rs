//! Feature row handling and feature metadata
//!
//! The upstream timeline parser delivers one flat record of engineered
//! statistics per analyzed match; this module holds that record, the
//! numeric/boolean type map, and the narrative category each statistic
//! belongs to.

pub mod category;
pub mod row;
pub mod types;

pub use category::FeedbackCategory;
pub use row::{FeatureRow, FeatureValue};
pub use types::{FeatureType, FeatureTypeMap};

/// Tracked statistics, in declared order.
///
/// Feedback lines are emitted in this order so output is reproducible. Every
/// feature row is expected to carry each of these keys, possibly null; the
/// one-hot role columns appended by the upstream builder are deliberately not
/// listed since they never receive their own feedback.
pub const TRACKED_FEATURES: &[&str] = &[
    "first_ward_time",
    "first_item_after_4min_time",
    "boots_purchase_time",
    "gold_diff_at_5",
    "cs_diff_at_10",
    "gold_diff_trend_5_to_10",
    "avg_cs_per_min",
    "fight_impact_score",
    "gold_diff_at_10",
    "gold_diff_at_15",
    "gold_diff_trend_10_to_15",
    "first_teamfight_join_time",
    "first_death_time",
    "first_kill_or_assist_time",
    "kda",
    "early_roam",
    "has_early_lane_prio",
];
