//! Review rating type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when a rating is outside the accepted range.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq)]
pub enum RatingError {
    /// The value is not within [1.0, 5.0] (or is not finite).
    #[error("rating must be between {min} and {max}, got {value}")]
    OutOfRange {
        /// Offending value.
        value: f64,
        /// Lower bound (inclusive).
        min: f64,
        /// Upper bound (inclusive).
        max: f64,
    },
}

/// A star rating on a review.
///
/// Valid range is [1.0, 5.0]; construction enforces it so a stored review can
/// never carry an out-of-range value.
///
/// ```
/// use bigear_core::Rating;
///
/// assert!(Rating::new(4.5).is_ok());
/// assert!(Rating::new(0.5).is_err());
/// assert!(Rating::new(5.1).is_err());
/// assert!(Rating::new(f64::NAN).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rating(f64);

impl Rating {
    /// Minimum accepted rating.
    pub const MIN: f64 = 1.0;
    /// Maximum accepted rating.
    pub const MAX: f64 = 5.0;

    /// Create a rating, validating the range.
    ///
    /// # Errors
    ///
    /// Returns `RatingError::OutOfRange` if `value` is NaN or outside
    /// [`Self::MIN`, `Self::MAX`].
    pub fn new(value: f64) -> Result<Self, RatingError> {
        if value.is_finite() && (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(RatingError::OutOfRange {
                value,
                min: Self::MIN,
                max: Self::MAX,
            })
        }
    }

    /// Get the underlying value.
    #[must_use]
    pub const fn value(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<f64> for Rating {
    type Error = RatingError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Rating> for f64 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Rating {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <f64 as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <f64 as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Rating {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let v = <f64 as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self(v))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Rating {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <f64 as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_bounds() {
        assert_eq!(Rating::new(1.0).unwrap().value(), 1.0);
        assert_eq!(Rating::new(5.0).unwrap().value(), 5.0);
        assert_eq!(Rating::new(3.5).unwrap().value(), 3.5);
    }

    #[test]
    fn test_rejects_out_of_range() {
        assert!(Rating::new(0.999).is_err());
        assert!(Rating::new(5.001).is_err());
        assert!(Rating::new(-1.0).is_err());
        assert!(Rating::new(f64::NAN).is_err());
        assert!(Rating::new(f64::INFINITY).is_err());
    }

    #[test]
    fn test_serde_transparent() {
        let rating = Rating::new(4.5).unwrap();
        let json = serde_json::to_string(&rating).unwrap();
        assert_eq!(json, "4.5");

        let parsed: Rating = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, rating);
    }
}
