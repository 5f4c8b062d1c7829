use crate::model::{Category, ClassificationResult, SeasonalityResult, TrendResult};

/// One entry of the decision table. Rules are evaluated in order; the first
/// whose predicate holds decides the category.
pub struct Rule {
    pub category: Category,
    pub matches: fn(&SeasonalityResult, &TrendResult) -> bool,
    pub confidence: fn(&SeasonalityResult, &TrendResult) -> f64,
}

/// Ordered decision table. Conditions overlap, so order is significant.
/// The last rule always matches.
pub const RULES: [Rule; 7] = [
    Rule {
        category: Category::RisingStar,
        matches: |_, t| t.slope > 0.5 && t.r_squared > 0.5,
        confidence: |_, t| (t.r_squared + t.slope / 2.0).min(0.95),
    },
    Rule {
        category: Category::FadingOut,
        matches: |_, t| t.slope < -0.5 && t.r_squared > 0.5,
        confidence: |_, t| (t.r_squared + t.slope.abs() / 2.0).min(0.95),
    },
    Rule {
        category: Category::SeasonalHero,
        matches: |s, t| s.is_seasonal && t.slope.abs() < 0.3,
        confidence: |s, _| s.seasonality_score.min(0.9),
    },
    Rule {
        category: Category::Evergreen,
        matches: |s, t| !s.is_seasonal && t.slope.abs() < 0.3,
        confidence: |s, _| (0.8 - s.seasonality_score).max(0.0),
    },
    Rule {
        category: Category::RandomErratic,
        matches: |s, t| t.r_squared < 0.3 && !s.is_seasonal,
        confidence: |_, _| 0.6,
    },
    Rule {
        category: Category::DecliningSeasonal,
        matches: |s, t| s.is_seasonal && t.slope < -0.2,
        confidence: |s, t| (s.seasonality_score + t.slope.abs() / 3.0).min(0.85),
    },
    Rule {
        category: Category::Stable,
        matches: |_, _| true,
        confidence: |_, _| 0.5,
    },
];

/// Fixed recommendation text for each category.
pub fn insight(category: Category) -> &'static str {
    match category {
        Category::RisingStar => {
            "Strong upward trend. Consider increasing marketing investment and inventory."
        }
        Category::FadingOut => {
            "Declining trend detected. Consider a product refresh or discontinuation."
        }
        Category::SeasonalHero => "Strong seasonal pattern. Plan inventory around peak months.",
        Category::Evergreen => "Reliable, consistent performer. Good for steady revenue.",
        Category::RandomErratic => {
            "Unpredictable pattern. Investigate external factors affecting sales."
        }
        Category::DecliningSeasonal => "Seasonal product losing momentum. May need repositioning.",
        Category::Stable => "Steady performance with no major trend.",
    }
}

pub struct Classifier;

impl Classifier {
    /// Maps a seasonality/trend pair to exactly one category.
    pub fn classify(seasonality: &SeasonalityResult, trend: &TrendResult) -> ClassificationResult {
        let (category, raw) = RULES
            .iter()
            .find(|rule| (rule.matches)(seasonality, trend))
            .map(|rule| (rule.category, (rule.confidence)(seasonality, trend)))
            .unwrap_or((Category::Stable, 0.5));

        ClassificationResult {
            category,
            confidence: clamp_confidence(raw),
            insight: insight(category).to_string(),
        }
    }
}

fn clamp_confidence(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}
