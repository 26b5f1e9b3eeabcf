//! [`Property`] definitions.

pub mod image;

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, DateTimeOf, Money};
use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::user;
#[cfg(doc)]
use crate::domain::User;

pub use self::image::Image;

/// Property listed for rent.
#[derive(Clone, Debug)]
pub struct Property {
    /// ID of this [`Property`].
    pub id: Id,

    /// ID of the [`User`] owning this [`Property`].
    pub owner_id: user::Id,

    /// [`Name`] of this [`Property`].
    pub name: Name,

    /// [`Location`] of this [`Property`].
    pub location: Location,

    /// Monthly rent of this [`Property`].
    pub rent: Money,

    /// [`Kind`] of this [`Property`].
    pub kind: Kind,

    /// [`Kind`]-specific [`Attributes`] of this [`Property`].
    pub attributes: Attributes,

    /// Free-text [`Details`] of this [`Property`].
    pub details: Option<Details>,

    /// [`image::Url`] of the main image of this [`Property`].
    pub image_url: image::Url,

    /// [`Availability`] of this [`Property`].
    pub availability: Availability,

    /// [`DateTime`] when this [`Property`] was created.
    pub created_at: CreationDateTime,
}

impl Property {
    /// Indicates whether this [`Property`] is open for new bookings.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.availability == Availability::Available
    }
}

/// ID of a [`Property`].
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

/// Name of a [`Property`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Name(String);

impl Name {
    /// Creates a new [`Name`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `name` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Creates a new [`Name`] if the given `name` is valid.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        Self::check(&name).then_some(Self(name))
    }

    /// Checks whether the given `name` is a valid [`Name`].
    fn check(name: impl AsRef<str>) -> bool {
        let name = name.as_ref();
        name.trim() == name && !name.is_empty() && name.len() <= 512
    }
}

impl FromStr for Name {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Name`")
    }
}

/// Location of a [`Property`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Location(String);

impl Location {
    /// Creates a new [`Location`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `location` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(location: impl Into<String>) -> Self {
        Self(location.into())
    }

    /// Creates a new [`Location`] if the given `location` is valid.
    #[must_use]
    pub fn new(location: impl Into<String>) -> Option<Self> {
        let location = location.into();
        Self::check(&location).then_some(Self(location))
    }

    /// Checks whether the given `location` is a valid [`Location`].
    fn check(location: impl AsRef<str>) -> bool {
        let location = location.as_ref();
        location.trim() == location
            && !location.is_empty()
            && location.len() <= 512
    }
}

impl FromStr for Location {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Location`")
    }
}

/// Free-text details of a [`Property`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Details(String);

impl Details {
    /// Creates a new [`Details`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `details` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(details: impl Into<String>) -> Self {
        Self(details.into())
    }

    /// Creates a new [`Details`] if the given `details` is valid.
    #[must_use]
    pub fn new(details: impl Into<String>) -> Option<Self> {
        let details = details.into();
        Self::check(&details).then_some(Self(details))
    }

    /// Checks whether the given `details` is a valid [`Details`].
    fn check(details: impl AsRef<str>) -> bool {
        let details = details.as_ref();
        !details.is_empty() && details.len() <= 4096
    }
}

impl FromStr for Details {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Details`")
    }
}

/// Purpose of an office [`Property`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Purpose(String);

impl Purpose {
    /// Creates a new [`Purpose`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `purpose` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(purpose: impl Into<String>) -> Self {
        Self(purpose.into())
    }

    /// Creates a new [`Purpose`] if the given `purpose` is valid.
    #[must_use]
    pub fn new(purpose: impl Into<String>) -> Option<Self> {
        let purpose = purpose.into();
        Self::check(&purpose).then_some(Self(purpose))
    }

    /// Checks whether the given `purpose` is a valid [`Purpose`].
    fn check(purpose: impl AsRef<str>) -> bool {
        let purpose = purpose.as_ref();
        purpose.trim() == purpose
            && !purpose.is_empty()
            && purpose.len() <= 512
    }
}

impl FromStr for Purpose {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Purpose`")
    }
}

define_kind! {
    #[doc = "Kind of a [`Property`]."]
    enum Kind {
        #[doc = "Apartment for a family."]
        Family = 1,

        #[doc = "Apartment shared by bachelors."]
        Bachelor = 2,

        #[doc = "Sublet within a larger unit."]
        Sublet = 3,

        #[doc = "Hostel with shared facilities."]
        Hostel = 4,

        #[doc = "Office space."]
        Office = 5,
    }
}

define_kind! {
    #[doc = "Availability of a [`Property`]."]
    enum Availability {
        #[doc = "Open for new bookings."]
        Available = 1,

        #[doc = "Rented out after a completed payment."]
        Rented = 2,
    }
}

define_kind! {
    #[doc = "Gender restriction of a hostel [`Property`]."]
    enum Gender {
        #[doc = "Male-only hostel."]
        Male = 1,

        #[doc = "Female-only hostel."]
        Female = 2,
    }
}

/// Count of rooms of some sort in a [`Property`].
pub type Count = u16;

/// [`Kind`]-specific attributes of a [`Property`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Attributes {
    /// Attributes of a [`Kind::Family`], [`Kind::Bachelor`] or
    /// [`Kind::Sublet`] residence.
    Residence {
        /// Number of bedrooms.
        beds: Count,

        /// Number of bathrooms.
        baths: Count,

        /// Number of corridors.
        corridors: Count,
    },

    /// Attributes of a [`Kind::Hostel`].
    Hostel {
        /// [`Gender`] restriction of the hostel.
        gender: Gender,

        /// Number of beds.
        beds: Count,

        /// Number of bathrooms.
        baths: Count,
    },

    /// Attributes of a [`Kind::Office`].
    Office {
        /// Number of rooms.
        rooms: Count,

        /// [`Purpose`] the office suits, if stated.
        purpose: Option<Purpose>,
    },
}

impl Attributes {
    /// Checks whether these [`Attributes`] suit the provided [`Kind`].
    #[must_use]
    pub fn matches(&self, kind: Kind) -> bool {
        match (self, kind) {
            (
                Self::Residence { .. },
                Kind::Family | Kind::Bachelor | Kind::Sublet,
            )
            | (Self::Hostel { .. }, Kind::Hostel)
            | (Self::Office { .. }, Kind::Office) => true,
            (Self::Residence { .. }, Kind::Hostel | Kind::Office)
            | (
                Self::Hostel { .. } | Self::Office { .. },
                Kind::Family | Kind::Bachelor | Kind::Sublet,
            )
            | (Self::Hostel { .. }, Kind::Office)
            | (Self::Office { .. }, Kind::Hostel) => false,
        }
    }
}

/// [`DateTime`] when a [`Property`] was created.
pub type CreationDateTime = DateTimeOf<(Property, unit::Creation)>;

#[cfg(test)]
mod spec {
    use super::{Attributes, Gender, Kind};

    #[test]
    fn attributes_match_their_kind() {
        let residence = Attributes::Residence {
            beds: 3,
            baths: 2,
            corridors: 1,
        };
        assert!(residence.matches(Kind::Family));
        assert!(residence.matches(Kind::Bachelor));
        assert!(residence.matches(Kind::Sublet));
        assert!(!residence.matches(Kind::Hostel));
        assert!(!residence.matches(Kind::Office));

        let hostel = Attributes::Hostel {
            gender: Gender::Female,
            beds: 8,
            baths: 2,
        };
        assert!(hostel.matches(Kind::Hostel));
        assert!(!hostel.matches(Kind::Family));

        let office = Attributes::Office {
            rooms: 4,
            purpose: None,
        };
        assert!(office.matches(Kind::Office));
        assert!(!office.matches(Kind::Sublet));
    }
}
