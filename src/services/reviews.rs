use mongodb::bson::{oid::ObjectId, DateTime};

use crate::models::Review;

/// Derived aggregate fields of a reviewable document. Recomputed from the
/// full review set on every append; nothing else may write them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReviewTotals {
    pub rating: f64,
    pub num_reviews: i32,
}

#[derive(Debug, PartialEq, Eq)]
pub enum ReviewError {
    Duplicate,
}

pub fn recompute_totals(reviews: &[Review]) -> ReviewTotals {
    let num_reviews = reviews.len() as i32;
    let rating = if reviews.is_empty() {
        0.0
    } else {
        reviews.iter().map(|r| r.rating).sum::<f64>() / num_reviews as f64
    };
    ReviewTotals { rating, num_reviews }
}

/// Appends one review and recomputes the aggregate. One review per reviewer
/// per document; a duplicate leaves the list untouched. Shared by the hotel
/// and location review flows. Callers persist the array plus the returned
/// totals in one conditional update keyed on the prior `num_reviews`.
pub fn append_review(
    reviews: &mut Vec<Review>,
    reviewer_id: ObjectId,
    reviewer_name: &str,
    rating: f64,
    comment: &str,
) -> Result<(Review, ReviewTotals), ReviewError> {
    if reviews.iter().any(|r| r.user_id == Some(reviewer_id)) {
        return Err(ReviewError::Duplicate);
    }

    let review = Review {
        user_id: Some(reviewer_id),
        user_name: reviewer_name.to_string(),
        rating,
        comment: comment.to_string(),
        created_at: DateTime::now(),
    };
    reviews.push(review.clone());

    Ok((review, recompute_totals(reviews)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn legacy_review(rating: f64) -> Review {
        Review {
            user_id: None,
            user_name: "Anonymous".to_string(),
            rating,
            comment: String::new(),
            created_at: DateTime::now(),
        }
    }

    #[test]
    fn rating_is_the_plain_mean() {
        let mut reviews = Vec::new();
        let ratings = [5.0, 3.0, 4.0, 1.0];
        for (i, r) in ratings.iter().enumerate() {
            let (_, totals) =
                append_review(&mut reviews, ObjectId::new(), &format!("user{}", i), *r, "ok")
                    .unwrap();
            assert_eq!(totals.num_reviews, (i + 1) as i32);
        }
        let totals = recompute_totals(&reviews);
        assert!((totals.rating - 13.0 / 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn duplicate_reviewer_is_rejected_without_mutation() {
        let reviewer = ObjectId::new();
        let mut reviews = Vec::new();
        append_review(&mut reviews, reviewer, "asha", 4.0, "nice").unwrap();
        let before = recompute_totals(&reviews);

        let err = append_review(&mut reviews, reviewer, "asha", 1.0, "again");
        assert_eq!(err.unwrap_err(), ReviewError::Duplicate);
        assert_eq!(reviews.len(), 1);
        assert_eq!(recompute_totals(&reviews), before);
    }

    #[test]
    fn anonymous_legacy_rows_never_block_a_reviewer() {
        let mut reviews = vec![legacy_review(2.0), legacy_review(4.0)];
        let (_, totals) = append_review(&mut reviews, ObjectId::new(), "ravi", 3.0, "ok").unwrap();
        assert_eq!(totals.num_reviews, 3);
        assert!((totals.rating - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_review_set_has_zero_totals() {
        let totals = recompute_totals(&[]);
        assert_eq!(totals.num_reviews, 0);
        assert_eq!(totals.rating, 0.0);
    }
}
