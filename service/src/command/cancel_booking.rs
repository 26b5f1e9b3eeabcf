//! [`Command`] for cancelling a [`Booking`].

use common::{
    operations::{By, Commit, Lock, Select, Transact, Transacted, Update},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{booking, user, Booking, Payment},
    infra::{database, Database},
    read::payment::Completed,
    Service,
};
#[cfg(doc)]
use crate::domain::User;

use super::Command;

/// [`Command`] for cancelling a [`Booking`] by its renter.
///
/// Anonymous [`Booking`]s carry no renter and cannot be cancelled.
#[derive(Clone, Copy, Debug)]
pub struct CancelBooking {
    /// ID of the [`Booking`] to cancel.
    pub booking_id: booking::Id,

    /// ID of the [`User`] cancelling the [`Booking`].
    pub executor_id: user::Id,
}

impl<Db> Command<CancelBooking> for Service<Db>
where
    Db: Database<
            Select<By<Option<Booking>, booking::Id>>,
            Ok = Option<Booking>,
            Err = Traced<database::Error>,
        > + Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Lock<By<Booking, booking::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Booking>, booking::Id>>,
            Ok = Option<Booking>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Completed<Payment>>, booking::Id>>,
            Ok = Option<Completed<Payment>>,
            Err = Traced<database::Error>,
        > + Database<
            Update<booking::StatusChange>,
            Ok = u64,
            Err = Traced<database::Error>,
        > + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Booking;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CancelBooking) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CancelBooking {
            booking_id,
            executor_id,
        } = cmd;

        self.database()
            .execute(Select(By::<Option<Booking>, _>::new(booking_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::BookingNotExists(booking_id))
            .map_err(tracerr::wrap!())
            .and_then(|b| {
                b.is_owned_by(executor_id)
                    .then_some(())
                    .ok_or(E::NotBookingOwner(executor_id))
                    .map_err(tracerr::wrap!())
            })?;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Serializes with payments of the same `Booking`, so a cancellation
        // cannot slip in between a payment check and its insertion.
        tx.execute(Lock(By::new(booking_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut booking = tx
            .execute(Select(By::<Option<Booking>, _>::new(booking_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::BookingNotExists(booking_id))
            .map_err(tracerr::wrap!())?;
        if !booking.status.is_cancellable() {
            return Err(tracerr::new!(E::NotCancellable(booking.status)));
        }

        let paid = tx
            .execute(Select(By::<Option<Completed<Payment>>, _>::new(
                booking_id,
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if paid.is_some() {
            return Err(tracerr::new!(E::AlreadyPaid(booking_id)));
        }

        let change = booking::StatusChange {
            id: booking.id,
            from: booking.status,
            to: booking::Status::Cancelled,
            updated_at: DateTime::now().coerce(),
        };
        tx.execute(Update(change))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        booking.status = change.to;
        booking.updated_at = change.updated_at;
        Ok(booking)
    }
}

/// Error of [`CancelBooking`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Booking`] with the provided ID does not exist.
    #[display("`Booking(id: {_0})` does not exist")]
    BookingNotExists(#[error(not(source))] booking::Id),

    /// [`User`] with the provided ID is not the renter of the [`Booking`].
    #[display("`User(id: {_0})` is not the renter of the `Booking`")]
    NotBookingOwner(#[error(not(source))] user::Id),

    /// [`Booking`] is already in a dead-end status.
    #[display("`Booking` is already `{_0}`")]
    NotCancellable(#[error(not(source))] booking::Status),

    /// [`Booking`] with the provided ID has a completed [`Payment`].
    #[display("`Booking(id: {_0})` already has a completed `Payment`")]
    AlreadyPaid(#[error(not(source))] booking::Id),
}
