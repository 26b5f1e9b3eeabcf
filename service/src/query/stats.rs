//! [`Query`] collection related to admin statistics.

use common::operations::By;

use crate::read;
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries the [`read::stats::Totals`] of the whole system.
pub type Totals = DatabaseQuery<By<read::stats::Totals, ()>>;
