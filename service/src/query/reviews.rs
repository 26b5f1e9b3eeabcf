//! [`Query`] collection related to the multiple [`Review`]s.

use common::operations::By;

use crate::domain::{property, Review};
#[cfg(doc)]
use crate::{domain::Property, Query};

use super::DatabaseQuery;

/// Queries all [`Review`]s of a [`Property`], newest first.
pub type ForProperty = DatabaseQuery<By<Vec<Review>, property::Id>>;
