//! [`Query`] collection related to the multiple [`Property`]s.

use common::operations::By;

use crate::{domain::user, read};
#[cfg(doc)]
use crate::{domain::Property, Query};

use super::DatabaseQuery;

/// Queries a list of [`Property`]s matching a
/// [`read::property::list::Filter`], newest first.
pub type List = DatabaseQuery<
    By<Vec<read::property::Card>, read::property::list::Filter>,
>;

/// Queries total count of [`Property`]s matching a
/// [`read::property::list::Filter`].
pub type TotalCount = DatabaseQuery<
    By<read::property::list::TotalCount, read::property::list::Filter>,
>;

/// Queries all [`Property`]s of an owner, newest first.
pub type ForOwner = DatabaseQuery<By<Vec<read::property::Card>, user::Id>>;
