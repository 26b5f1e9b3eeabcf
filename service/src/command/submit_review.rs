//! [`Command`] for submitting or editing a [`Review`].

use common::{
    operations::{By, Commit, Insert, Select, Transact, Transacted, Update},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{booking, property, review, user, Booking, Payment, Review},
    infra::{database, Database},
    read::payment::Completed,
    Service,
};
#[cfg(doc)]
use crate::domain::{Property, User};

use super::Command;

/// [`Command`] for submitting a [`Review`] on a paid [`Booking`], or editing
/// the one already left.
///
/// A renter holds at most one [`Review`] per [`Booking`]: submitting a new
/// one over an existing one fails, and editing requires naming the existing
/// [`Review`] explicitly.
#[derive(Clone, Debug)]
pub struct SubmitReview {
    /// ID of the reviewed [`Booking`].
    pub booking_id: booking::Id,

    /// ID of the reviewed [`Property`].
    pub property_id: property::Id,

    /// ID of the [`User`] leaving the [`Review`].
    pub renter_id: user::Id,

    /// Rating of the [`Review`], expected within
    /// [`review::Rating::MIN`]`..=`[`review::Rating::MAX`].
    pub rating: u8,

    /// Optional [`review::Comment`] of the [`Review`].
    pub comment: Option<review::Comment>,

    /// ID of the existing [`Review`] to edit, if editing.
    ///
    /// [`None`] submits a fresh [`Review`].
    pub editing: Option<review::Id>,
}

impl<Db> Command<SubmitReview> for Service<Db>
where
    Db: Database<
            Select<By<Option<Booking>, booking::Id>>,
            Ok = Option<Booking>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Completed<Payment>>, booking::Id>>,
            Ok = Option<Completed<Payment>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Review>, (user::Id, booking::Id)>>,
            Ok = Option<Review>,
            Err = Traced<database::Error>,
        > + Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<Insert<Review>, Err = Traced<database::Error>>
        + Database<Update<Review>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Review;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: SubmitReview) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let SubmitReview {
            booking_id,
            property_id,
            renter_id,
            rating,
            comment,
            editing,
        } = cmd;

        let rating = review::Rating::new(rating)
            .ok_or(E::InvalidRating(rating))
            .map_err(tracerr::wrap!())?;

        let booking = self
            .database()
            .execute(Select(By::<Option<Booking>, _>::new(booking_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::BookingNotExists(booking_id))
            .map_err(tracerr::wrap!())?;
        if !booking.is_owned_by(renter_id) {
            return Err(tracerr::new!(E::NotBookingOwner(renter_id)));
        }
        if booking.status != booking::Status::Confirmed {
            return Err(tracerr::new!(E::NotReviewable(booking.status)));
        }

        self.database()
            .execute(Select(By::<Option<Completed<Payment>>, _>::new(
                booking_id,
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::NotPaid(booking_id))
            .map_err(tracerr::wrap!())
            .map(drop)?;

        let existing = self
            .database()
            .execute(Select(By::<Option<Review>, _>::new((
                renter_id, booking_id,
            ))))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let review = match editing {
            Some(review_id) => {
                let mut review = existing
                    .filter(|r| r.id == review_id)
                    .ok_or(E::NotReviewAuthor(renter_id))
                    .map_err(tracerr::wrap!())?;

                review.rating = rating;
                review.comment = comment;
                review.created_at = DateTime::now().coerce();

                let tx = self
                    .database()
                    .execute(Transact)
                    .await
                    .map_err(tracerr::map_from_and_wrap!(=> E))?;
                tx.execute(Update(review.clone()))
                    .await
                    .map_err(tracerr::map_from_and_wrap!(=> E))
                    .map(drop)?;
                tx.execute(Commit)
                    .await
                    .map_err(tracerr::map_from_and_wrap!(=> E))
                    .map(drop)?;

                review
            }
            None => {
                if existing.is_some() {
                    return Err(tracerr::new!(E::DuplicateReview(booking_id)));
                }

                let review = Review {
                    id: review::Id::new(),
                    booking_id: booking.id,
                    property_id,
                    renter_id,
                    rating,
                    comment,
                    created_at: DateTime::now().coerce(),
                };

                let tx = self
                    .database()
                    .execute(Transact)
                    .await
                    .map_err(tracerr::map_from_and_wrap!(=> E))?;
                tx.execute(Insert(review.clone()))
                    .await
                    .map_err(tracerr::map_from_and_wrap!(=> E))
                    .map(drop)?;
                tx.execute(Commit)
                    .await
                    .map_err(tracerr::map_from_and_wrap!(=> E))
                    .map(drop)?;

                review
            }
        };

        Ok(review)
    }
}

/// Error of [`SubmitReview`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Rating is out of bounds.
    #[display("Rating `{_0}` is out of `1..=5` bounds")]
    InvalidRating(#[error(not(source))] u8),

    /// [`Booking`] with the provided ID does not exist.
    #[display("`Booking(id: {_0})` does not exist")]
    BookingNotExists(#[error(not(source))] booking::Id),

    /// [`User`] with the provided ID is not the renter of the [`Booking`].
    #[display("`User(id: {_0})` is not the renter of the `Booking`")]
    NotBookingOwner(#[error(not(source))] user::Id),

    /// [`Booking`] is not confirmed.
    #[display("`Booking` is `{_0}`, not `CONFIRMED`")]
    NotReviewable(#[error(not(source))] booking::Status),

    /// [`Booking`] with the provided ID has no completed [`Payment`].
    #[display("`Booking(id: {_0})` has no completed `Payment`")]
    NotPaid(#[error(not(source))] booking::Id),

    /// [`Booking`] with the provided ID is reviewed already.
    #[display("`Booking(id: {_0})` is reviewed already")]
    DuplicateReview(#[error(not(source))] booking::Id),

    /// [`User`] with the provided ID does not author the [`Review`] being
    /// edited.
    #[display("`User(id: {_0})` does not author the edited `Review`")]
    NotReviewAuthor(#[error(not(source))] user::Id),
}
