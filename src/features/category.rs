//! Narrative category for each tracked feature

use std::fmt;

use serde::{Deserialize, Serialize};

/// The four buckets feedback lines are grouped under. Routing is a pure total
/// function of the feature name; anything not explicitly listed falls into
/// Strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FeedbackCategory {
    #[serde(rename = "Early Game")]
    EarlyGame,
    #[serde(rename = "Laning Phase")]
    LaningPhase,
    #[serde(rename = "Mid Game")]
    MidGame,
    #[serde(rename = "Strategy")]
    Strategy,
}

impl FeedbackCategory {
    pub const ALL: [FeedbackCategory; 4] = [
        FeedbackCategory::EarlyGame,
        FeedbackCategory::LaningPhase,
        FeedbackCategory::MidGame,
        FeedbackCategory::Strategy,
    ];

    pub fn for_feature(feature: &str) -> Self {
        match feature {
            "first_ward_time" | "first_item_after_4min_time" | "boots_purchase_time" => {
                FeedbackCategory::EarlyGame
            }
            "cs_diff_at_10" | "gold_diff_at_5" | "gold_diff_trend_5_to_10" | "avg_cs_per_min"
            | "fight_impact_score" => FeedbackCategory::LaningPhase,
            "gold_diff_at_10" | "gold_diff_at_15" | "gold_diff_trend_10_to_15"
            | "first_teamfight_join_time" => FeedbackCategory::MidGame,
            _ => FeedbackCategory::Strategy,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            FeedbackCategory::EarlyGame => "Early Game",
            FeedbackCategory::LaningPhase => "Laning Phase",
            FeedbackCategory::MidGame => "Mid Game",
            FeedbackCategory::Strategy => "Strategy",
        }
    }
}

impl fmt::Display for FeedbackCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::TRACKED_FEATURES;

    #[test]
    fn test_explicit_buckets() {
        assert_eq!(
            FeedbackCategory::for_feature("first_ward_time"),
            FeedbackCategory::EarlyGame
        );
        assert_eq!(
            FeedbackCategory::for_feature("boots_purchase_time"),
            FeedbackCategory::EarlyGame
        );
        assert_eq!(
            FeedbackCategory::for_feature("cs_diff_at_10"),
            FeedbackCategory::LaningPhase
        );
        assert_eq!(
            FeedbackCategory::for_feature("fight_impact_score"),
            FeedbackCategory::LaningPhase
        );
        assert_eq!(
            FeedbackCategory::for_feature("gold_diff_at_15"),
            FeedbackCategory::MidGame
        );
        assert_eq!(
            FeedbackCategory::for_feature("first_teamfight_join_time"),
            FeedbackCategory::MidGame
        );
    }

    #[test]
    fn test_default_bucket_is_strategy() {
        assert_eq!(
            FeedbackCategory::for_feature("kda"),
            FeedbackCategory::Strategy
        );
        assert_eq!(
            FeedbackCategory::for_feature("some_future_stat"),
            FeedbackCategory::Strategy
        );
    }

    #[test]
    fn test_every_tracked_feature_routes() {
        // Total function: each declared feature lands in exactly one bucket.
        for feature in TRACKED_FEATURES {
            let category = FeedbackCategory::for_feature(feature);
            assert!(FeedbackCategory::ALL.contains(&category));
        }
    }
}
