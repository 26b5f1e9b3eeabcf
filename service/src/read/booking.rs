//! [`Booking`] read model definitions.
//!
//! [`Booking`]: crate::domain::Booking

use derive_more::{From, Into};

use crate::{
    domain::{booking, Booking, Review},
    read,
};
#[cfg(doc)]
use crate::domain::Payment;

/// Actions currently available on a [`Booking`] to its renter.
///
/// Derived from the [`booking::Status`], the presence of a completed
/// [`Payment`], and the presence of a [`Review`], all at the same instant, so
/// the flags never contradict each other.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Eligibility {
    /// Indicator whether the [`Booking`] may be cancelled.
    pub can_cancel: bool,

    /// Indicator whether the [`Booking`] may be paid.
    pub can_pay: bool,

    /// Indicator whether a [`Review`] may be submitted.
    pub can_review: bool,

    /// Indicator whether the existing [`Review`] may be edited.
    pub can_edit_review: bool,
}

impl Eligibility {
    /// Derives an [`Eligibility`] from the given [`Booking`] facts.
    ///
    /// A completed [`Payment`] locks the [`Booking`] in: neither cancelling
    /// nor paying again is possible once `is_paid` holds.
    #[must_use]
    pub fn derive(
        status: booking::Status,
        is_paid: bool,
        has_review: bool,
    ) -> Self {
        let reviewable = status == booking::Status::Confirmed && is_paid;
        Self {
            can_cancel: status.is_cancellable() && !is_paid,
            can_pay: status == booking::Status::Confirmed && !is_paid,
            can_review: reviewable && !has_review,
            can_edit_review: reviewable && has_review,
        }
    }
}

/// [`Booking`] as seen by its renter on the dashboard.
#[derive(Clone, Debug)]
pub struct RenterView {
    /// The [`Booking`] itself.
    pub booking: Booking,

    /// [`read::property::Card`] of the booked property.
    pub property: read::property::Card,

    /// Indicator whether a completed [`Payment`] exists for the [`Booking`].
    pub is_paid: bool,

    /// [`Review`] left by the renter on the [`Booking`], if any.
    pub review: Option<Review>,
}

impl RenterView {
    /// Returns the [`Eligibility`] of this [`RenterView`].
    #[must_use]
    pub fn eligibility(&self) -> Eligibility {
        Eligibility::derive(
            self.booking.status,
            self.is_paid,
            self.review.is_some(),
        )
    }
}

/// [`Booking`] as seen by the owner of the booked property.
#[derive(Clone, Debug)]
pub struct OwnerView {
    /// The [`Booking`] itself.
    pub booking: Booking,

    /// [`read::property::Card`] of the booked property.
    pub property: read::property::Card,
}

/// Count of [`booking::Status::Pending`] [`Booking`]s.
#[derive(Clone, Copy, Debug, Eq, From, Hash, Into, PartialEq)]
pub struct PendingCount(i32);

#[cfg(test)]
mod spec {
    use crate::domain::booking::Status;

    use super::Eligibility;

    #[test]
    fn pending_unpaid_may_only_cancel() {
        let e = Eligibility::derive(Status::Pending, false, false);

        assert!(e.can_cancel);
        assert!(!e.can_pay);
        assert!(!e.can_review);
        assert!(!e.can_edit_review);
    }

    #[test]
    fn confirmed_unpaid_may_cancel_or_pay() {
        let e = Eligibility::derive(Status::Confirmed, false, false);

        assert!(e.can_cancel);
        assert!(e.can_pay);
        assert!(!e.can_review);
        assert!(!e.can_edit_review);
    }

    #[test]
    fn confirmed_paid_may_only_review() {
        let e = Eligibility::derive(Status::Confirmed, true, false);

        assert!(!e.can_cancel);
        assert!(!e.can_pay);
        assert!(e.can_review);
        assert!(!e.can_edit_review);
    }

    #[test]
    fn confirmed_paid_reviewed_may_only_edit() {
        let e = Eligibility::derive(Status::Confirmed, true, true);

        assert!(!e.can_cancel);
        assert!(!e.can_pay);
        assert!(!e.can_review);
        assert!(e.can_edit_review);
    }

    #[test]
    fn dead_ends_allow_nothing() {
        for status in [Status::Rejected, Status::Cancelled] {
            for is_paid in [false, true] {
                for has_review in [false, true] {
                    let e = Eligibility::derive(status, is_paid, has_review);

                    assert!(!e.can_cancel);
                    assert!(!e.can_pay);
                    assert!(!e.can_review);
                    assert!(!e.can_edit_review);
                }
            }
        }
    }

    #[test]
    fn payment_excludes_cancellation_and_repayment() {
        for status in [
            Status::Pending,
            Status::Confirmed,
            Status::Rejected,
            Status::Cancelled,
        ] {
            for has_review in [false, true] {
                let e = Eligibility::derive(status, true, has_review);

                assert!(!e.can_cancel);
                assert!(!e.can_pay);
            }
        }
    }

    #[test]
    fn review_flags_are_mutually_exclusive() {
        for status in [
            Status::Pending,
            Status::Confirmed,
            Status::Rejected,
            Status::Cancelled,
        ] {
            for is_paid in [false, true] {
                for has_review in [false, true] {
                    let e = Eligibility::derive(status, is_paid, has_review);

                    assert!(!(e.can_review && e.can_edit_review));
                }
            }
        }
    }
}
