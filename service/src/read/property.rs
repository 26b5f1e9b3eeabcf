//! [`Property`] read model definitions.
//!
//! [`Property`]: crate::domain::Property

use common::Money;

use crate::domain::property;
#[cfg(doc)]
use crate::domain::Property;

/// Subset of a [`Property`] shown on dashboard cards.
#[derive(Clone, Debug)]
pub struct Card {
    /// ID of the [`Property`].
    pub id: property::Id,

    /// [`property::Name`] of the [`Property`].
    pub name: property::Name,

    /// [`property::Location`] of the [`Property`].
    pub location: property::Location,

    /// Monthly rent of the [`Property`].
    pub rent: Money,

    /// URL of the main image of the [`Property`].
    pub image_url: property::image::Url,

    /// [`property::Availability`] of the [`Property`].
    pub availability: property::Availability,
}

pub mod list {
    //! [`Property`] listing definitions.
    //!
    //! [`Property`]: crate::domain::Property

    use derive_more::{From, Into};

    use crate::domain::property;
    #[cfg(doc)]
    use crate::domain::Property;

    /// Filter for browsing [`Property`]s.
    #[derive(Clone, Debug, Default)]
    pub struct Filter {
        /// Search term to fuzzy match against [`property::Name`] and
        /// [`property::Location`].
        pub search: Option<String>,

        /// [`property::Kind`] to narrow the listing to.
        pub kind: Option<property::Kind>,

        /// Indicator whether only available [`Property`]s are wanted.
        pub only_available: bool,
    }

    /// Total count of [`Property`]s.
    #[derive(Clone, Copy, Debug, Eq, From, Hash, Into, PartialEq)]
    pub struct TotalCount(i32);
}
