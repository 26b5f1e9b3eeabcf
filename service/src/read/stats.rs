//! Admin statistics read model definitions.

use derive_more::{From, Into};

#[cfg(doc)]
use crate::domain::{Booking, Property, User};

/// Total counts shown on the admin dashboard.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Totals {
    /// Total count of non-deleted [`User`]s.
    pub users: TotalCount,

    /// Total count of [`Property`]s.
    pub properties: TotalCount,

    /// Total count of [`Booking`]s, cancelled ones included.
    pub bookings: TotalCount,
}

/// Total count of some entity.
#[derive(Clone, Copy, Debug, Eq, From, Hash, Into, PartialEq)]
pub struct TotalCount(i32);
