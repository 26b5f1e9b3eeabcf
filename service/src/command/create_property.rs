//! [`Command`] for creating a new [`Property`].

use common::{
    operations::{By, Commit, Insert, Select, Transact, Transacted},
    DateTime, Money,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{property, user, Property, User},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`Property`] listing.
#[derive(Clone, Debug)]
pub struct CreateProperty {
    /// ID of the [`User`] who owns the new [`Property`].
    pub owner_id: user::Id,

    /// [`property::Name`] of the new [`Property`].
    pub name: property::Name,

    /// [`property::Location`] of the new [`Property`].
    pub location: property::Location,

    /// Monthly rent of the new [`Property`].
    pub rent: Money,

    /// [`property::Kind`] of the new [`Property`].
    pub kind: property::Kind,

    /// [`property::Attributes`] of the new [`Property`], expected to match
    /// its [`property::Kind`].
    pub attributes: property::Attributes,

    /// Optional [`property::Details`] of the new [`Property`].
    pub details: Option<property::Details>,

    /// Image URLs of the new [`Property`], the first one being the main.
    pub images: Vec<property::image::Url>,
}

impl<Db> Command<CreateProperty> for Service<Db>
where
    Db: Database<
            Select<By<Option<User>, user::Id>>,
            Ok = Option<User>,
            Err = Traced<database::Error>,
        > + Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<Insert<Property>, Err = Traced<database::Error>>
        + Database<Insert<property::Image>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Property;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateProperty,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateProperty {
            owner_id,
            name,
            location,
            rent,
            kind,
            attributes,
            details,
            images,
        } = cmd;

        if !rent.is_positive() {
            return Err(tracerr::new!(E::NonPositiveRent(rent)));
        }
        if !attributes.matches(kind) {
            return Err(tracerr::new!(E::AttributesMismatch(kind)));
        }
        let Some(main_image) = images.first().cloned() else {
            return Err(tracerr::new!(E::NoImages));
        };

        let owner = self
            .database()
            .execute(Select(By::<Option<User>, _>::new(owner_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .filter(|u| u.deleted_at.is_none())
            .ok_or(E::UserNotExists(owner_id))
            .map_err(tracerr::wrap!())?;
        if owner.role != user::Role::Owner {
            return Err(tracerr::new!(E::NotOwner(owner_id)));
        }

        let property = Property {
            id: property::Id::new(),
            owner_id: owner.id,
            name,
            location,
            rent,
            kind,
            attributes,
            details,
            image_url: main_image,
            availability: property::Availability::Available,
            created_at: DateTime::now().coerce(),
        };

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Insert(property.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        for (i, url) in images.into_iter().enumerate() {
            let image = property::Image {
                id: property::image::Id::new(),
                property_id: property.id,
                url,
                is_main: i == 0,
                created_at: DateTime::now().coerce(),
            };
            tx.execute(Insert(image))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))
                .map(drop)?;
        }
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(property)
    }
}

/// Error of [`CreateProperty`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Rent is not positive.
    #[display("Rent `{_0}` is not positive")]
    NonPositiveRent(#[error(not(source))] Money),

    /// [`property::Attributes`] don't fit the [`property::Kind`].
    #[display("Attributes don't fit the `{_0}` kind")]
    AttributesMismatch(#[error(not(source))] property::Kind),

    /// No image URLs provided.
    #[display("No image URLs provided")]
    NoImages,

    /// [`User`] with the provided ID does not exist.
    #[display("`User(id: {_0})` does not exist")]
    UserNotExists(#[error(not(source))] user::Id),

    /// [`User`] with the provided ID is not an owner.
    #[display("`User(id: {_0})` is not an owner")]
    NotOwner(#[error(not(source))] user::Id),
}
