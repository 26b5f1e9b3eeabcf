//! [`Query`] collection related to the multiple [`Payment`]s.

use common::operations::By;

use crate::domain::{user, Payment};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries all [`Payment`]s made by a payer, newest first.
pub type ForPayer = DatabaseQuery<By<Vec<Payment>, user::Id>>;
