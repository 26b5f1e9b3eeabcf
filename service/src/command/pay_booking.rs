//! [`Command`] for paying a confirmed [`Booking`].

use common::{
    operations::{By, Commit, Insert, Lock, Select, Transact, Transacted, Update},
    DateTime, Money,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{booking, payment, property, user, Booking, Payment, Property},
    infra::{database, Database},
    read::payment::Completed,
    Service,
};
#[cfg(doc)]
use crate::domain::User;

use super::Command;

/// [`Command`] for paying a confirmed [`Booking`] by its renter.
///
/// Records the [`Payment`] and flips the booked [`Property`] to
/// [`property::Availability::Rented`] in a single transaction, so no partial
/// outcome survives a failure in between.
#[derive(Clone, Debug)]
pub struct PayBooking {
    /// ID of the [`Booking`] to pay.
    pub booking_id: booking::Id,

    /// ID of the [`User`] paying the [`Booking`].
    pub payer_id: user::Id,

    /// Asserted amount of the [`Payment`], expected to equal the booked
    /// [`Property`] rent.
    pub amount: Money,

    /// [`payment::Method`] the [`Payment`] is made with.
    pub method: Option<payment::Method>,

    /// [`payment::IdempotencyKey`] of the request.
    ///
    /// A replay with the same key returns the already recorded [`Payment`]
    /// instead of failing.
    pub idempotency_key: payment::IdempotencyKey,
}

impl<Db> Command<PayBooking> for Service<Db>
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
            Select<By<Option<Payment>, payment::IdempotencyKey>>,
            Ok = Option<Payment>,
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
        > + Database<Insert<Payment>, Err = Traced<database::Error>>
        + Database<Update<Property>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Payment;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: PayBooking) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let PayBooking {
            booking_id,
            payer_id,
            amount,
            method,
            idempotency_key,
        } = cmd;

        if let Some(payment) = self
            .database()
            .execute(Select(By::<Option<Payment>, _>::new(idempotency_key)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
        {
            return Ok(payment);
        }

        let booking = self
            .database()
            .execute(Select(By::<Option<Booking>, _>::new(booking_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::BookingNotExists(booking_id))
            .map_err(tracerr::wrap!())?;
        if !booking.is_owned_by(payer_id) {
            return Err(tracerr::new!(E::NotBookingOwner(payer_id)));
        }

        let mut property = self
            .database()
            .execute(Select(By::<Option<Property>, _>::new(
                booking.property_id,
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::PropertyNotExists(booking.property_id))
            .map_err(tracerr::wrap!())?;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Serializes concurrent payments and cancellations of the same
        // `Booking`: whoever loses the lock race sees the winner's committed
        // rows on the re-reads below.
        tx.execute(Lock(By::new(booking_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let booking = tx
            .execute(Select(By::<Option<Booking>, _>::new(booking_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::BookingNotExists(booking_id))
            .map_err(tracerr::wrap!())?;
        if booking.status != booking::Status::Confirmed {
            return Err(tracerr::new!(E::NotPayable(booking.status)));
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

        if !amount.is_positive() {
            return Err(tracerr::new!(E::InvalidAmount(amount)));
        }

        let payment = Payment {
            id: payment::Id::new(),
            booking_id: booking.id,
            payer_id,
            amount,
            status: payment::Status::Completed,
            method: method.unwrap_or_default(),
            transaction_id: payment::TransactionId::generate(),
            idempotency_key,
            created_at: DateTime::now().coerce(),
        };
        tx.execute(Insert(payment.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        property.availability = property::Availability::Rented;
        tx.execute(Update(property))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        log::info!(
            "`Booking(id: {booking_id})` paid: \
             `Payment(transaction_id: {})`",
            payment.transaction_id,
        );

        Ok(payment)
    }
}

/// Error of [`PayBooking`] [`Command`] execution.
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

    /// [`User`] with the provided ID is not the renter of the [`Booking`].
    #[display("`User(id: {_0})` is not the renter of the `Booking`")]
    NotBookingOwner(#[error(not(source))] user::Id),

    /// [`Booking`] is not confirmed.
    #[display("`Booking` is `{_0}`, not `CONFIRMED`")]
    NotPayable(#[error(not(source))] booking::Status),

    /// [`Booking`] with the provided ID has a completed [`Payment`] already.
    #[display("`Booking(id: {_0})` already has a completed `Payment`")]
    AlreadyPaid(#[error(not(source))] booking::Id),

    /// Asserted amount is not positive.
    #[display("Amount `{_0}` is not positive")]
    InvalidAmount(#[error(not(source))] Money),
}
