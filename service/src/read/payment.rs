//! [`Payment`] read model definition.
//!
//! [`Payment`]: crate::domain::Payment

#[cfg(doc)]
use crate::domain::{payment::Status, Payment};

/// Wrapper around a [`Payment`] indicating that its [`Status`] is
/// [`Status::Completed`].
#[derive(Clone, Copy, Debug)]
pub struct Completed<T>(pub T);
