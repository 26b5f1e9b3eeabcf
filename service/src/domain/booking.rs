//! [`Booking`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, DateTimeOf};
use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{property, user};
#[cfg(doc)]
use crate::domain::{Payment, Property, User};

/// Booking request of a [`Property`] by a renter.
///
/// Bookings are never hard-deleted: cancellation is a [`Status`] flip, so
/// payment and review history stays reachable.
#[derive(Clone, Debug)]
pub struct Booking {
    /// ID of this [`Booking`].
    pub id: Id,

    /// ID of the booked [`Property`].
    pub property_id: property::Id,

    /// ID of the [`User`] who requested this [`Booking`].
    ///
    /// [`None`] for anonymous walk-in requests, which carry contact
    /// information only.
    pub renter_id: Option<user::Id>,

    /// Contact [`RenterName`] supplied with this [`Booking`].
    pub renter_name: RenterName,

    /// Contact [`RenterPhone`] supplied with this [`Booking`].
    pub renter_phone: RenterPhone,

    /// Optional [`Message`] to the [`Property`] owner.
    pub message: Option<Message>,

    /// Current [`Status`] of this [`Booking`].
    pub status: Status,

    /// [`DateTime`] when this [`Booking`] was created.
    pub created_at: CreationDateTime,

    /// [`DateTime`] when this [`Booking`] was last transitioned.
    pub updated_at: UpdateDateTime,
}

impl Booking {
    /// Indicates whether the provided [`User`] is the renter owning this
    /// [`Booking`].
    ///
    /// Anonymous [`Booking`]s are owned by nobody.
    #[must_use]
    pub fn is_owned_by(&self, renter_id: user::Id) -> bool {
        self.renter_id == Some(renter_id)
    }
}

/// ID of a [`Booking`].
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

define_kind! {
    #[doc = "Status of a [`Booking`]."]
    enum Status {
        #[doc = "Awaiting the owner's decision."]
        Pending = 1,

        #[doc = "Accepted by the owner; payment and review may proceed."]
        Confirmed = 2,

        #[doc = "Declined by the owner; dead end."]
        Rejected = 3,

        #[doc = "Withdrawn by the renter; dead end."]
        Cancelled = 4,
    }
}

impl Status {
    /// Indicates whether the owner may still decide a [`Booking`] in this
    /// [`Status`].
    #[must_use]
    pub fn is_decidable(&self) -> bool {
        *self == Self::Pending
    }

    /// Indicates whether a [`Booking`] in this [`Status`] may be cancelled
    /// by its renter.
    ///
    /// A completed [`Payment`] blocks cancellation separately from the
    /// [`Status`] itself.
    #[must_use]
    pub fn is_cancellable(&self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed)
    }

    /// Indicates whether this [`Status`] is a dead end for any further
    /// action.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Rejected | Self::Cancelled)
    }
}

/// Compare-and-set transition of a [`Booking`] [`Status`].
///
/// Applied only to rows still in the `from` [`Status`], so two interleaved
/// decisions cannot both win.
#[derive(Clone, Copy, Debug)]
pub struct StatusChange {
    /// ID of the [`Booking`] to transition.
    pub id: Id,

    /// [`Status`] the [`Booking`] is expected to be in.
    pub from: Status,

    /// [`Status`] to transition the [`Booking`] into.
    pub to: Status,

    /// [`DateTime`] to stamp the transition with.
    pub updated_at: UpdateDateTime,
}

/// Contact name supplied with a [`Booking`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct RenterName(String);

impl RenterName {
    /// Creates a new [`RenterName`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `name` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Creates a new [`RenterName`] if the given `name` is valid.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        Self::check(&name).then_some(Self(name))
    }

    /// Checks whether the given `name` is a valid [`RenterName`].
    fn check(name: impl AsRef<str>) -> bool {
        let name = name.as_ref();
        name.trim() == name && !name.is_empty() && name.len() <= 512
    }
}

impl FromStr for RenterName {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `RenterName`")
    }
}

/// Contact phone supplied with a [`Booking`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct RenterPhone(String);

impl RenterPhone {
    /// Creates a new [`RenterPhone`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `phone` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(phone: impl Into<String>) -> Self {
        Self(phone.into())
    }

    /// Creates a new [`RenterPhone`] if the given `phone` is valid.
    #[must_use]
    pub fn new(phone: impl Into<String>) -> Option<Self> {
        let phone = phone.into();
        Self::check(&phone).then_some(Self(phone))
    }

    /// Checks whether the given `phone` is a valid [`RenterPhone`].
    fn check(phone: impl AsRef<str>) -> bool {
        let phone = phone.as_ref();
        !phone.is_empty()
            && phone.len() <= 32
            && phone
                .chars()
                .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | ' '))
    }
}

impl FromStr for RenterPhone {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `RenterPhone`")
    }
}

/// Free-text message attached to a [`Booking`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Message(String);

impl Message {
    /// Creates a new [`Message`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `message` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    /// Creates a new [`Message`] if the given `message` is valid.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Option<Self> {
        let message = message.into();
        Self::check(&message).then_some(Self(message))
    }

    /// Checks whether the given `message` is a valid [`Message`].
    fn check(message: impl AsRef<str>) -> bool {
        let message = message.as_ref();
        !message.is_empty() && message.len() <= 4096
    }
}

impl FromStr for Message {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Message`")
    }
}

/// [`DateTime`] when a [`Booking`] was created.
pub type CreationDateTime = DateTimeOf<(Booking, unit::Creation)>;

/// [`DateTime`] when a [`Booking`] was last transitioned.
pub type UpdateDateTime = DateTimeOf<(Booking, unit::Update)>;

#[cfg(test)]
mod spec {
    use super::Status;

    #[test]
    fn only_pending_is_decidable() {
        assert!(Status::Pending.is_decidable());
        assert!(!Status::Confirmed.is_decidable());
        assert!(!Status::Rejected.is_decidable());
        assert!(!Status::Cancelled.is_decidable());
    }

    #[test]
    fn cancellable_before_dead_end() {
        assert!(Status::Pending.is_cancellable());
        assert!(Status::Confirmed.is_cancellable());
        assert!(!Status::Rejected.is_cancellable());
        assert!(!Status::Cancelled.is_cancellable());
    }

    #[test]
    fn dead_ends() {
        assert!(Status::Rejected.is_terminal());
        assert!(Status::Cancelled.is_terminal());
        assert!(!Status::Pending.is_terminal());
        assert!(!Status::Confirmed.is_terminal());
    }
}
