//! [`Command`] definition.

pub mod cancel_booking;
pub mod confirm_booking;
pub mod create_booking;
pub mod create_property;
pub mod delete_property;
pub mod delete_user;
pub mod pay_booking;
pub mod reject_booking;
pub mod submit_review;

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{
    cancel_booking::CancelBooking, confirm_booking::ConfirmBooking,
    create_booking::CreateBooking, create_property::CreateProperty,
    delete_property::DeleteProperty, delete_user::DeleteUser,
    pay_booking::PayBooking, reject_booking::RejectBooking,
    submit_review::SubmitReview,
};
