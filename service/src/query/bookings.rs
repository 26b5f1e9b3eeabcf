//! [`Query`] collection related to the multiple [`Booking`]s.

use common::operations::By;

use crate::{domain::user, read};
#[cfg(doc)]
use crate::{
    domain::{Booking, Property},
    Query,
};

use super::DatabaseQuery;

/// Queries [`Booking`]s requested by a renter, newest first.
pub type ForRenter =
    DatabaseQuery<By<Vec<read::booking::RenterView>, user::Id>>;

/// Queries [`Booking`]s of all [`Property`]s of an owner, newest first.
pub type ForOwner = DatabaseQuery<By<Vec<read::booking::OwnerView>, user::Id>>;

/// Queries the count of pending [`Booking`]s of all [`Property`]s of an
/// owner.
pub type PendingCount =
    DatabaseQuery<By<read::booking::PendingCount, user::Id>>;
