//! [`Review`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{unit, DateTimeOf};
use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{booking, property, user};
#[cfg(doc)]
use crate::domain::{Booking, Payment, Property, User};

/// Review left by a renter on a [`Property`].
///
/// May exist only for a confirmed [`Booking`] with a completed [`Payment`],
/// at most one per renter and [`Booking`].
#[derive(Clone, Debug)]
pub struct Review {
    /// ID of this [`Review`].
    pub id: Id,

    /// ID of the reviewed [`Booking`].
    pub booking_id: booking::Id,

    /// ID of the reviewed [`Property`].
    pub property_id: property::Id,

    /// ID of the [`User`] who left this [`Review`].
    pub renter_id: user::Id,

    /// [`Rating`] of this [`Review`].
    pub rating: Rating,

    /// Optional [`Comment`] of this [`Review`].
    pub comment: Option<Comment>,

    /// [`DateTime`] when this [`Review`] was created or last edited.
    pub created_at: CreationDateTime,
}

/// ID of a [`Review`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    PartialEq,
    Serialize,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// Rating of a [`Review`], an integer in `1..=5`.
#[derive(
    Clone, Copy, Debug, Deserialize, Display, Eq, Hash, Into, PartialEq,
    PartialOrd, Ord, Serialize,
)]
pub struct Rating(u8);

impl Rating {
    /// Minimal allowed [`Rating`].
    pub const MIN: u8 = 1;

    /// Maximal allowed [`Rating`].
    pub const MAX: u8 = 5;

    /// Creates a new [`Rating`] if the given `rating` is within bounds.
    #[must_use]
    pub fn new(rating: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX)
            .contains(&rating)
            .then_some(Self(rating))
    }

    /// Returns this [`Rating`] as a [`u8`].
    #[must_use]
    pub const fn u8(self) -> u8 {
        self.0
    }
}

/// Free-text comment of a [`Review`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Comment(String);

impl Comment {
    /// Creates a new [`Comment`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `comment` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(comment: impl Into<String>) -> Self {
        Self(comment.into())
    }

    /// Creates a new [`Comment`] if the given `comment` is valid.
    #[must_use]
    pub fn new(comment: impl Into<String>) -> Option<Self> {
        let comment = comment.into();
        Self::check(&comment).then_some(Self(comment))
    }

    /// Checks whether the given `comment` is a valid [`Comment`].
    fn check(comment: impl AsRef<str>) -> bool {
        let comment = comment.as_ref();
        !comment.is_empty() && comment.len() <= 4096
    }
}

impl FromStr for Comment {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Comment`")
    }
}

/// [`DateTime`] when a [`Review`] was created or last edited.
pub type CreationDateTime = DateTimeOf<(Review, unit::Creation)>;

#[cfg(test)]
mod spec {
    use super::Rating;

    #[test]
    fn rating_bounds() {
        assert!(Rating::new(0).is_none());
        assert!(Rating::new(6).is_none());

        assert_eq!(Rating::new(1).map(Rating::u8), Some(1));
        assert_eq!(Rating::new(5).map(Rating::u8), Some(5));
    }
}
