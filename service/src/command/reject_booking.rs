//! [`Command`] for rejecting a pending [`Booking`].

use common::{
    operations::{By, Select, Update},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{booking, property, user, Booking, Property},
    infra::{database, Database},
    Service,
};
#[cfg(doc)]
use crate::domain::User;

use super::Command;

/// [`Command`] for rejecting a pending [`Booking`] by the owner of the
/// booked [`Property`].
#[derive(Clone, Copy, Debug)]
pub struct RejectBooking {
    /// ID of the [`Booking`] to reject.
    pub booking_id: booking::Id,

    /// ID of the [`User`] rejecting the [`Booking`].
    pub executor_id: user::Id,
}

impl<Db> Command<RejectBooking> for Service<Db>
where
    Db: Database<
            Select<By<Option<Booking>, booking::Id>>,
            Ok = Option<Booking>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Property>, property::Id>>,
            Ok = Option<Property>,
            Err = Traced<database::Error>,
        > + Database<
            Update<booking::StatusChange>,
            Ok = u64,
            Err = Traced<database::Error>,
        >,
{
    type Ok = Booking;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: RejectBooking) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let RejectBooking {
            booking_id,
            executor_id,
        } = cmd;

        let mut booking = self
            .database()
            .execute(Select(By::<Option<Booking>, _>::new(booking_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::BookingNotExists(booking_id))
            .map_err(tracerr::wrap!())?;

        let property = self
            .database()
            .execute(Select(By::<Option<Property>, _>::new(
                booking.property_id,
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::PropertyNotExists(booking.property_id))
            .map_err(tracerr::wrap!())?;
        if property.owner_id != executor_id {
            return Err(tracerr::new!(E::NotPropertyOwner(executor_id)));
        }

        if !booking.status.is_decidable() {
            return Err(tracerr::new!(E::AlreadyDecided(booking.status)));
        }

        let change = booking::StatusChange {
            id: booking.id,
            from: booking::Status::Pending,
            to: booking::Status::Rejected,
            updated_at: DateTime::now().coerce(),
        };
        let affected = self
            .database()
            .execute(Update(change))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if affected == 0 {
            return Err(tracerr::new!(E::AlreadyDecided(booking.status)));
        }

        booking.status = change.to;
        booking.updated_at = change.updated_at;
        Ok(booking)
    }
}

/// Error of [`RejectBooking`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Booking`] with the provided ID does not exist.
    #[display("`Booking(id: {_0})` does not exist")]
    BookingNotExists(#[error(not(source))] booking::Id),

    /// [`Property`] with the provided ID does not exist.
    #[display("`Property(id: {_0})` does not exist")]
    PropertyNotExists(#[error(not(source))] property::Id),

    /// [`User`] with the provided ID is not the owner of the booked
    /// [`Property`].
    #[display("`User(id: {_0})` is not the owner of the booked `Property`")]
    NotPropertyOwner(#[error(not(source))] user::Id),

    /// [`Booking`] is not pending anymore.
    #[display("`Booking` is already `{_0}`")]
    AlreadyDecided(#[error(not(source))] booking::Status),
}
