//! [`Command`] for creating a new [`Booking`].

use common::{
    operations::{By, Commit, Insert, Select, Transact, Transacted},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{booking, property, user, Booking, Property, User},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`Booking`] request.
#[derive(Clone, Debug)]
pub struct CreateBooking {
    /// ID of the [`Property`] to book.
    pub property_id: property::Id,

    /// ID of the [`User`] requesting the [`Booking`], if authenticated.
    pub renter_id: Option<user::Id>,

    /// Contact name of the renter.
    pub renter_name: booking::RenterName,

    /// Contact phone of the renter.
    pub renter_phone: booking::RenterPhone,

    /// Optional message to the [`Property`] owner.
    pub message: Option<booking::Message>,
}

impl<Db> Command<CreateBooking> for Service<Db>
where
    Db: Database<
            Select<By<Option<Property>, property::Id>>,
            Ok = Option<Property>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<User>, user::Id>>,
            Ok = Option<User>,
            Err = Traced<database::Error>,
        > + Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<Insert<Booking>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Booking;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreateBooking) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateBooking {
            property_id,
            renter_id,
            renter_name,
            renter_phone,
            message,
        } = cmd;

        let property = self
            .database()
            .execute(Select(By::<Option<Property>, _>::new(property_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::PropertyNotExists(property_id))
            .map_err(tracerr::wrap!())?;
        if !property.is_available() {
            return Err(tracerr::new!(E::PropertyNotAvailable(property_id)));
        }

        if let Some(renter_id) = renter_id {
            self.database()
                .execute(Select(By::<Option<User>, _>::new(renter_id)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?
                .filter(|u| u.deleted_at.is_none())
                .ok_or(E::UserNotExists(renter_id))
                .map_err(tracerr::wrap!())
                .map(drop)?;
        }

        let booking = Booking {
            id: booking::Id::new(),
            property_id: property.id,
            renter_id,
            renter_name,
            renter_phone,
            message,
            status: booking::Status::Pending,
            created_at: DateTime::now().coerce(),
            updated_at: DateTime::now().coerce(),
        };

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Insert(booking.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(booking)
    }
}

/// Error of [`CreateBooking`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Property`] with the provided ID does not exist.
    #[display("`Property(id: {_0})` does not exist")]
    PropertyNotExists(#[error(not(source))] property::Id),

    /// [`Property`] with the provided ID is not available for booking.
    #[display("`Property(id: {_0})` is not available")]
    PropertyNotAvailable(#[error(not(source))] property::Id),

    /// [`User`] with the provided ID does not exist.
    #[display("`User(id: {_0})` does not exist")]
    UserNotExists(#[error(not(source))] user::Id),
}
