use thiserror::Error;

/// Errors that can occur when constructing a rating value.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RatingValueError {
    #[error("Rating must be between 0 and 10, got {0}")]
    OutOfRange(f64),
    #[error("Rating must be a number")]
    NotANumber,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_display() {
        assert_eq!(
            RatingValueError::OutOfRange(11.5).to_string(),
            "Rating must be between 0 and 10, got 11.5"
        );
    }

    #[test]
    fn test_not_a_number_display() {
        assert_eq!(
            RatingValueError::NotANumber.to_string(),
            "Rating must be a number"
        );
    }
}
