//! Deterministic review summary, used when the AI backend returns nothing.

use crate::domain::review::Review;

/// Review text containing any of these counts toward the pros list.
pub const POSITIVE_KEYWORDS: &[&str] =
    &["great", "good", "perfect", "love", "value", "works", "quality"];

/// Review text containing any of these counts toward the cons list. A
/// review may land in both lists, or in neither.
pub const NEGATIVE_KEYWORDS: &[&str] =
    &["bad", "poor", "disappointed", "durable", "worse", "problem", "okay"];

pub const NO_PROS_PLACEHOLDER: &str = "No strong pros detected from text.";
pub const NO_CONS_PLACEHOLDER: &str = "No strong cons detected from text.";

const MAX_LISTED: usize = 3;

/// Pure keyword-heuristic summary: mean rating to one decimal, then up to
/// three pros and three cons in original review order. Reproducible for
/// the same review set. Callers reject the zero-review case before asking
/// for a summary; the guard here only keeps the function total.
pub fn basic_review_summary(reviews: &[Review]) -> String {
    if reviews.is_empty() {
        return "No reviews yet.".to_string();
    }

    let mean = reviews.iter().map(|review| f64::from(review.rating)).sum::<f64>()
        / reviews.len() as f64;

    let mut pros = Vec::new();
    let mut cons = Vec::new();
    for review in reviews {
        let text = review.text.to_lowercase();
        if POSITIVE_KEYWORDS.iter().any(|keyword| text.contains(keyword)) {
            pros.push(review.text.clone());
        }
        if NEGATIVE_KEYWORDS.iter().any(|keyword| text.contains(keyword)) {
            cons.push(review.text.clone());
        }
    }
    pros.truncate(MAX_LISTED);
    cons.truncate(MAX_LISTED);
    if pros.is_empty() {
        pros.push(NO_PROS_PLACEHOLDER.to_string());
    }
    if cons.is_empty() {
        cons.push(NO_CONS_PLACEHOLDER.to_string());
    }

    let mut lines = Vec::new();
    lines.push(format!(
        "Overall sentiment: average rating is {mean:.1}/5 from {} review(s).",
        reviews.len()
    ));
    lines.push(String::new());
    lines.push("Top pros:".to_string());
    for pro in &pros {
        lines.push(format!("- {pro}"));
    }
    lines.push(String::new());
    lines.push("Top cons:".to_string());
    for con in &cons {
        lines.push(format!("- {con}"));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::{basic_review_summary, NO_CONS_PLACEHOLDER, NO_PROS_PLACEHOLDER};
    use crate::domain::product::ProductId;
    use crate::domain::review::{Review, ReviewId};

    fn review(id: i64, rating: u8, text: &str) -> Review {
        Review {
            id: ReviewId(id),
            product_id: ProductId(1),
            rating,
            text: text.to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn mean_rating_is_arithmetic_mean_to_one_decimal() {
        let reviews = vec![
            review(1, 5, "Great quality and works perfectly."),
            review(2, 4, "Good value for money. I like it."),
            review(3, 3, "It's okay, but could be better."),
            review(4, 2, "Not very durable. Disappointed."),
        ];
        let summary = basic_review_summary(&reviews);
        assert!(summary.starts_with("Overall sentiment: average rating is 3.5/5 from 4 review(s)."));
    }

    #[test]
    fn a_review_may_count_as_both_pro_and_con() {
        let reviews = vec![review(1, 3, "Works okay I guess.")];
        let summary = basic_review_summary(&reviews);
        let pros_section = summary.split("Top cons:").next().unwrap_or("");
        assert!(pros_section.contains("- Works okay I guess."));
        assert!(summary.split("Top cons:").nth(1).unwrap_or("").contains("- Works okay I guess."));
    }

    #[test]
    fn lists_never_exceed_three_entries_and_keep_review_order() {
        let reviews: Vec<_> =
            (1..=5).map(|n| review(n, 5, &format!("Great item number {n}."))).collect();
        let summary = basic_review_summary(&reviews);
        assert!(summary.contains("- Great item number 1."));
        assert!(summary.contains("- Great item number 3."));
        assert!(!summary.contains("- Great item number 4."));
        assert!(summary.contains(NO_CONS_PLACEHOLDER));
    }

    #[test]
    fn placeholders_substitute_for_empty_lists() {
        let reviews = vec![review(1, 4, "Arrived on time.")];
        let summary = basic_review_summary(&reviews);
        assert!(summary.contains(NO_PROS_PLACEHOLDER));
        assert!(summary.contains(NO_CONS_PLACEHOLDER));
    }

    #[test]
    fn summary_is_reproducible_for_same_reviews() {
        let reviews = vec![
            review(1, 5, "Love it, great value."),
            review(2, 1, "Bad quality, had a problem."),
        ];
        assert_eq!(basic_review_summary(&reviews), basic_review_summary(&reviews));
    }
}
