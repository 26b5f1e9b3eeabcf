//! Domain entities definitions.

pub mod booking;
pub mod payment;
pub mod property;
pub mod review;
pub mod user;

pub use self::{
    booking::Booking, payment::Payment, property::Property, review::Review,
    user::User,
};
