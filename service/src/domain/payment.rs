//! [`Payment`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, DateTimeOf, Money};
use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{booking, user};
#[cfg(doc)]
use crate::domain::{Booking, Property, User};

/// Payment recorded for a [`Booking`].
///
/// At most one [`Status::Completed`] [`Payment`] may exist per [`Booking`]:
/// the engine re-checks before inserting, and the store enforces it with a
/// partial unique index, so the invariant survives restarts and concurrent
/// clients.
#[derive(Clone, Debug)]
pub struct Payment {
    /// ID of this [`Payment`].
    pub id: Id,

    /// ID of the paid [`Booking`].
    pub booking_id: booking::Id,

    /// ID of the [`User`] who paid.
    pub payer_id: user::Id,

    /// Paid amount, expected to equal the [`Property`] rent.
    pub amount: Money,

    /// [`Status`] of this [`Payment`].
    pub status: Status,

    /// [`Method`] this [`Payment`] was made with.
    pub method: Method,

    /// [`TransactionId`] of this [`Payment`], unique per attempt.
    pub transaction_id: TransactionId,

    /// [`IdempotencyKey`] of the request that produced this [`Payment`].
    pub idempotency_key: IdempotencyKey,

    /// [`DateTime`] when this [`Payment`] was created.
    pub created_at: CreationDateTime,
}

/// ID of a [`Payment`].
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
    #[doc = "Status of a [`Payment`]."]
    enum Status {
        #[doc = "Successfully recorded; the only status this system writes."]
        Completed = 1,
    }
}

/// Method a [`Payment`] was made with.
///
/// Free-form tag ("manual", "bkash", ...); no gateway integration stands
/// behind it.
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Method(String);

impl Method {
    /// Creates a new [`Method`] if the given `method` is valid.
    #[must_use]
    pub fn new(method: impl Into<String>) -> Option<Self> {
        let method = method.into();
        Self::check(&method).then_some(Self(method))
    }

    /// Checks whether the given `method` is a valid [`Method`].
    fn check(method: impl AsRef<str>) -> bool {
        let method = method.as_ref();
        method.trim() == method && !method.is_empty() && method.len() <= 64
    }
}

impl Default for Method {
    fn default() -> Self {
        Self("manual".into())
    }
}

impl FromStr for Method {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Method`")
    }
}

/// Opaque transaction identifier of a [`Payment`].
///
/// Fresh per attempt for auditing; idempotency is guarded by the
/// [`IdempotencyKey`] and the completed-payment re-read instead.
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct TransactionId(String);

impl TransactionId {
    /// Generates a new random [`TransactionId`].
    #[must_use]
    pub fn generate() -> Self {
        Self(format!("TXN-{}", Uuid::new_v4().simple()))
    }
}

impl Default for TransactionId {
    fn default() -> Self {
        Self::generate()
    }
}

/// Idempotency key of a [`Payment`] request.
///
/// Persisted on the [`Payment`] row and unique across the store, so replays
/// are detected across restarts and concurrent clients alike.
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
pub struct IdempotencyKey(Uuid);

impl IdempotencyKey {
    /// Creates a new random [`IdempotencyKey`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// [`DateTime`] when a [`Payment`] was created.
pub type CreationDateTime = DateTimeOf<(Payment, unit::Creation)>;
