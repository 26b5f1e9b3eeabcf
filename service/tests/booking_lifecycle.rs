//! Scenario tests driving the booking lifecycle through [`Service`] commands
//! against an in-memory database.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
};

use common::{
    operations::{
        By, Commit, Delete, Insert, Lock, Select, Transact, Update,
    },
    DateTime, Handler, Money,
};
use service::{
    command::{
        cancel_booking, confirm_booking, create_property, delete_user,
        pay_booking, submit_review, CancelBooking, ConfirmBooking,
        CreateBooking, CreateProperty, DeleteProperty, DeleteUser, PayBooking,
        RejectBooking, SubmitReview,
    },
    domain::{
        booking, payment, property, review, user, Booking, Payment, Property,
        Review, User,
    },
    infra::database,
    read::payment::Completed,
    Service,
};
use tracerr::Traced;

/// In-memory tables backing [`Mock`].
#[derive(Debug, Default)]
struct Store {
    users: HashMap<user::Id, User>,
    properties: HashMap<property::Id, Property>,
    images: Vec<property::Image>,
    bookings: HashMap<booking::Id, Booking>,
    payments: Vec<Payment>,
    reviews: Vec<Review>,
}

/// In-memory database standing in for Postgres.
///
/// Transactions are modelled as the database itself, so every write is
/// immediately visible, which is exactly what the re-read guards of the
/// commands expect from a committed competitor.
#[derive(Clone, Debug, Default)]
struct Mock(Arc<Mutex<Store>>);

impl Mock {
    fn store(&self) -> MutexGuard<'_, Store> {
        self.0.lock().unwrap()
    }
}

type Err = Traced<database::Error>;

impl Handler<Transact> for Mock {
    type Ok = Self;
    type Err = Err;

    async fn execute(&self, _: Transact) -> Result<Self::Ok, Self::Err> {
        Ok(self.clone())
    }
}

impl Handler<Commit> for Mock {
    type Ok = ();
    type Err = Err;

    async fn execute(&self, _: Commit) -> Result<Self::Ok, Self::Err> {
        Ok(())
    }
}

impl Handler<Lock<By<Booking, booking::Id>>> for Mock {
    type Ok = ();
    type Err = Err;

    async fn execute(
        &self,
        _: Lock<By<Booking, booking::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(())
    }
}

impl Handler<Select<By<Option<User>, user::Id>>> for Mock {
    type Ok = Option<User>;
    type Err = Err;

    async fn execute(
        &self,
        Select(by): Select<By<Option<User>, user::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self.store().users.get(&by.into_inner()).cloned())
    }
}

impl Handler<Update<User>> for Mock {
    type Ok = ();
    type Err = Err;

    async fn execute(
        &self,
        Update(user): Update<User>,
    ) -> Result<Self::Ok, Self::Err> {
        drop(self.store().users.insert(user.id, user));
        Ok(())
    }
}

impl Handler<Select<By<Option<Property>, property::Id>>> for Mock {
    type Ok = Option<Property>;
    type Err = Err;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Property>, property::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self.store().properties.get(&by.into_inner()).cloned())
    }
}

impl Handler<Insert<Property>> for Mock {
    type Ok = ();
    type Err = Err;

    async fn execute(
        &self,
        Insert(property): Insert<Property>,
    ) -> Result<Self::Ok, Self::Err> {
        drop(self.store().properties.insert(property.id, property));
        Ok(())
    }
}

impl Handler<Update<Property>> for Mock {
    type Ok = ();
    type Err = Err;

    async fn execute(
        &self,
        Update(property): Update<Property>,
    ) -> Result<Self::Ok, Self::Err> {
        drop(self.store().properties.insert(property.id, property));
        Ok(())
    }
}

impl Handler<Delete<By<Property, property::Id>>> for Mock {
    type Ok = ();
    type Err = Err;

    async fn execute(
        &self,
        Delete(by): Delete<By<Property, property::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        let mut store = self.store();
        drop(store.properties.remove(&id));
        store.images.retain(|i| i.property_id != id);
        store.bookings.retain(|_, b| b.property_id != id);
        Ok(())
    }
}

impl Handler<Insert<property::Image>> for Mock {
    type Ok = ();
    type Err = Err;

    async fn execute(
        &self,
        Insert(image): Insert<property::Image>,
    ) -> Result<Self::Ok, Self::Err> {
        self.store().images.push(image);
        Ok(())
    }
}

impl Handler<Select<By<Option<Booking>, booking::Id>>> for Mock {
    type Ok = Option<Booking>;
    type Err = Err;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Booking>, booking::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self.store().bookings.get(&by.into_inner()).cloned())
    }
}

impl Handler<Insert<Booking>> for Mock {
    type Ok = ();
    type Err = Err;

    async fn execute(
        &self,
        Insert(booking): Insert<Booking>,
    ) -> Result<Self::Ok, Self::Err> {
        drop(self.store().bookings.insert(booking.id, booking));
        Ok(())
    }
}

impl Handler<Update<booking::StatusChange>> for Mock {
    type Ok = u64;
    type Err = Err;

    async fn execute(
        &self,
        Update(change): Update<booking::StatusChange>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut store = self.store();
        let Some(booking) = store.bookings.get_mut(&change.id) else {
            return Ok(0);
        };
        if booking.status != change.from {
            return Ok(0);
        }
        booking.status = change.to;
        booking.updated_at = change.updated_at;
        Ok(1)
    }
}

impl Handler<Select<By<Option<Payment>, payment::IdempotencyKey>>> for Mock {
    type Ok = Option<Payment>;
    type Err = Err;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Payment>, payment::IdempotencyKey>>,
    ) -> Result<Self::Ok, Self::Err> {
        let key = by.into_inner();
        Ok(self
            .store()
            .payments
            .iter()
            .find(|p| p.idempotency_key == key)
            .cloned())
    }
}

impl Handler<Select<By<Option<Completed<Payment>>, booking::Id>>> for Mock {
    type Ok = Option<Completed<Payment>>;
    type Err = Err;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Completed<Payment>>, booking::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let booking_id = by.into_inner();
        Ok(self
            .store()
            .payments
            .iter()
            .find(|p| {
                p.booking_id == booking_id
                    && p.status == payment::Status::Completed
            })
            .cloned()
            .map(Completed))
    }
}

impl Handler<Insert<Payment>> for Mock {
    type Ok = ();
    type Err = Err;

    async fn execute(
        &self,
        Insert(payment): Insert<Payment>,
    ) -> Result<Self::Ok, Self::Err> {
        self.store().payments.push(payment);
        Ok(())
    }
}

impl Handler<Select<By<Option<Review>, (user::Id, booking::Id)>>> for Mock {
    type Ok = Option<Review>;
    type Err = Err;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Review>, (user::Id, booking::Id)>>,
    ) -> Result<Self::Ok, Self::Err> {
        let (renter_id, booking_id) = by.into_inner();
        Ok(self
            .store()
            .reviews
            .iter()
            .find(|r| r.renter_id == renter_id && r.booking_id == booking_id)
            .cloned())
    }
}

impl Handler<Insert<Review>> for Mock {
    type Ok = ();
    type Err = Err;

    async fn execute(
        &self,
        Insert(review): Insert<Review>,
    ) -> Result<Self::Ok, Self::Err> {
        self.store().reviews.push(review);
        Ok(())
    }
}

impl Handler<Update<Review>> for Mock {
    type Ok = ();
    type Err = Err;

    async fn execute(
        &self,
        Update(review): Update<Review>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut store = self.store();
        if let Some(r) = store.reviews.iter_mut().find(|r| r.id == review.id)
        {
            *r = review;
        } else {
            store.reviews.push(review);
        }
        Ok(())
    }
}

fn service() -> Service<Mock> {
    Service::new(Mock::default())
}

fn seed_user(svc: &Service<Mock>, role: user::Role) -> user::Id {
    let user = User {
        id: user::Id::new(),
        name: user::Name::new("Jane Renter").unwrap(),
        email: Some(user::Email::new("jane@example.com").unwrap()),
        phone: Some(user::Phone::new("+880 17 0000 0000").unwrap()),
        role,
        created_at: DateTime::now().coerce(),
        deleted_at: None,
    };
    let id = user.id;
    drop(svc.database().store().users.insert(id, user));
    id
}

fn seed_property(svc: &Service<Mock>, owner_id: user::Id) -> property::Id {
    let property = Property {
        id: property::Id::new(),
        owner_id,
        name: property::Name::new("Green Hill Flat").unwrap(),
        location: property::Location::new("Dhanmondi, Dhaka").unwrap(),
        rent: Money::from(12_000),
        kind: property::Kind::Family,
        attributes: property::Attributes::Residence {
            beds: 3,
            baths: 2,
            corridors: 1,
        },
        details: None,
        image_url: "https://img.example.com/flat.jpg".parse().unwrap(),
        availability: property::Availability::Available,
        created_at: DateTime::now().coerce(),
    };
    let id = property.id;
    drop(svc.database().store().properties.insert(id, property));
    id
}

async fn book(
    svc: &Service<Mock>,
    property_id: property::Id,
    renter_id: Option<user::Id>,
) -> Booking {
    svc.execute(CreateBooking {
        property_id,
        renter_id,
        renter_name: booking::RenterName::new("Jane Renter").unwrap(),
        renter_phone: booking::RenterPhone::new("+880 17 0000 0000").unwrap(),
        message: None,
    })
    .await
    .unwrap()
}

async fn confirm(
    svc: &Service<Mock>,
    booking_id: booking::Id,
    executor_id: user::Id,
) -> Booking {
    svc.execute(ConfirmBooking {
        booking_id,
        executor_id,
    })
    .await
    .unwrap()
}

async fn pay(
    svc: &Service<Mock>,
    booking_id: booking::Id,
    payer_id: user::Id,
) -> Payment {
    svc.execute(PayBooking {
        booking_id,
        payer_id,
        amount: Money::from(12_000),
        method: None,
        idempotency_key: payment::IdempotencyKey::new(),
    })
    .await
    .unwrap()
}

#[tokio::test]
async fn renter_books_available_property() {
    let svc = service();
    let owner = seed_user(&svc, user::Role::Owner);
    let renter = seed_user(&svc, user::Role::Renter);
    let property_id = seed_property(&svc, owner);

    let booking = book(&svc, property_id, Some(renter)).await;

    assert_eq!(booking.status, booking::Status::Pending);
    assert_eq!(booking.property_id, property_id);
    assert!(booking.is_owned_by(renter));
}

#[tokio::test]
async fn rented_property_cannot_be_booked() {
    let svc = service();
    let owner = seed_user(&svc, user::Role::Owner);
    let renter = seed_user(&svc, user::Role::Renter);
    let property_id = seed_property(&svc, owner);
    svc.database()
        .store()
        .properties
        .get_mut(&property_id)
        .unwrap()
        .availability = property::Availability::Rented;

    let err = svc
        .execute(CreateBooking {
            property_id,
            renter_id: Some(renter),
            renter_name: booking::RenterName::new("Jane Renter").unwrap(),
            renter_phone: booking::RenterPhone::new("+880 17 0000 0000")
                .unwrap(),
            message: None,
        })
        .await
        .unwrap_err();

    use service::command::create_booking::ExecutionError as E;
    assert!(matches!(err.as_ref(), E::PropertyNotAvailable(_)));
}

#[tokio::test]
async fn owner_confirms_pending_booking() {
    let svc = service();
    let owner = seed_user(&svc, user::Role::Owner);
    let renter = seed_user(&svc, user::Role::Renter);
    let property_id = seed_property(&svc, owner);
    let booking = book(&svc, property_id, Some(renter)).await;

    let confirmed = confirm(&svc, booking.id, owner).await;

    assert_eq!(confirmed.status, booking::Status::Confirmed);
}

#[tokio::test]
async fn non_owner_cannot_decide_booking() {
    let svc = service();
    let owner = seed_user(&svc, user::Role::Owner);
    let renter = seed_user(&svc, user::Role::Renter);
    let property_id = seed_property(&svc, owner);
    let booking = book(&svc, property_id, Some(renter)).await;

    let err = svc
        .execute(ConfirmBooking {
            booking_id: booking.id,
            executor_id: renter,
        })
        .await
        .unwrap_err();

    use confirm_booking::ExecutionError as E;
    assert!(matches!(err.as_ref(), E::NotPropertyOwner(id) if *id == renter));
}

#[tokio::test]
async fn rejected_booking_is_final() {
    let svc = service();
    let owner = seed_user(&svc, user::Role::Owner);
    let renter = seed_user(&svc, user::Role::Renter);
    let property_id = seed_property(&svc, owner);
    let booking = book(&svc, property_id, Some(renter)).await;

    let rejected = svc
        .execute(RejectBooking {
            booking_id: booking.id,
            executor_id: owner,
        })
        .await
        .unwrap();
    assert_eq!(rejected.status, booking::Status::Rejected);

    let err = svc
        .execute(ConfirmBooking {
            booking_id: booking.id,
            executor_id: owner,
        })
        .await
        .unwrap_err();

    use confirm_booking::ExecutionError as E;
    assert!(matches!(
        err.as_ref(),
        E::AlreadyDecided(booking::Status::Rejected),
    ));
}

#[tokio::test]
async fn renter_cancels_pending_booking() {
    let svc = service();
    let owner = seed_user(&svc, user::Role::Owner);
    let renter = seed_user(&svc, user::Role::Renter);
    let property_id = seed_property(&svc, owner);
    let booking = book(&svc, property_id, Some(renter)).await;

    let cancelled = svc
        .execute(CancelBooking {
            booking_id: booking.id,
            executor_id: renter,
        })
        .await
        .unwrap();

    assert_eq!(cancelled.status, booking::Status::Cancelled);
    assert!(cancelled.status.is_terminal());
}

#[tokio::test]
async fn anonymous_booking_cannot_be_cancelled() {
    let svc = service();
    let owner = seed_user(&svc, user::Role::Owner);
    let stranger = seed_user(&svc, user::Role::Renter);
    let property_id = seed_property(&svc, owner);
    let booking = book(&svc, property_id, None).await;

    let err = svc
        .execute(CancelBooking {
            booking_id: booking.id,
            executor_id: stranger,
        })
        .await
        .unwrap_err();

    use cancel_booking::ExecutionError as E;
    assert!(matches!(err.as_ref(), E::NotBookingOwner(_)));
}

#[tokio::test]
async fn payment_requires_confirmation() {
    let svc = service();
    let owner = seed_user(&svc, user::Role::Owner);
    let renter = seed_user(&svc, user::Role::Renter);
    let property_id = seed_property(&svc, owner);
    let booking = book(&svc, property_id, Some(renter)).await;

    let err = svc
        .execute(PayBooking {
            booking_id: booking.id,
            payer_id: renter,
            amount: Money::from(12_000),
            method: None,
            idempotency_key: payment::IdempotencyKey::new(),
        })
        .await
        .unwrap_err();

    use pay_booking::ExecutionError as E;
    assert!(matches!(
        err.as_ref(),
        E::NotPayable(booking::Status::Pending),
    ));
}

#[tokio::test]
async fn non_positive_amount_is_rejected() {
    let svc = service();
    let owner = seed_user(&svc, user::Role::Owner);
    let renter = seed_user(&svc, user::Role::Renter);
    let property_id = seed_property(&svc, owner);
    let booking = book(&svc, property_id, Some(renter)).await;
    let _ = confirm(&svc, booking.id, owner).await;

    let err = svc
        .execute(PayBooking {
            booking_id: booking.id,
            payer_id: renter,
            amount: Money::from(0),
            method: None,
            idempotency_key: payment::IdempotencyKey::new(),
        })
        .await
        .unwrap_err();

    use pay_booking::ExecutionError as E;
    assert!(matches!(err.as_ref(), E::InvalidAmount(_)));
    assert!(svc.database().store().payments.is_empty());
}

#[tokio::test]
async fn payment_marks_property_rented() {
    let svc = service();
    let owner = seed_user(&svc, user::Role::Owner);
    let renter = seed_user(&svc, user::Role::Renter);
    let property_id = seed_property(&svc, owner);
    let booking = book(&svc, property_id, Some(renter)).await;
    let _ = confirm(&svc, booking.id, owner).await;

    let payment = pay(&svc, booking.id, renter).await;

    assert_eq!(payment.status, payment::Status::Completed);
    assert_eq!(payment.amount, Money::from(12_000));
    assert_eq!(payment.method.to_string(), "manual");
    assert!(!svc
        .database()
        .store()
        .properties
        .get(&property_id)
        .unwrap()
        .is_available());
}

#[tokio::test]
async fn paid_booking_cannot_be_cancelled() {
    let svc = service();
    let owner = seed_user(&svc, user::Role::Owner);
    let renter = seed_user(&svc, user::Role::Renter);
    let property_id = seed_property(&svc, owner);
    let booking = book(&svc, property_id, Some(renter)).await;
    let _ = confirm(&svc, booking.id, owner).await;
    let _ = pay(&svc, booking.id, renter).await;

    let err = svc
        .execute(CancelBooking {
            booking_id: booking.id,
            executor_id: renter,
        })
        .await
        .unwrap_err();

    use cancel_booking::ExecutionError as E;
    assert!(matches!(err.as_ref(), E::AlreadyPaid(id) if *id == booking.id));
}

#[tokio::test]
async fn second_payment_attempt_fails() {
    let svc = service();
    let owner = seed_user(&svc, user::Role::Owner);
    let renter = seed_user(&svc, user::Role::Renter);
    let property_id = seed_property(&svc, owner);
    let booking = book(&svc, property_id, Some(renter)).await;
    let _ = confirm(&svc, booking.id, owner).await;
    let _ = pay(&svc, booking.id, renter).await;

    let err = svc
        .execute(PayBooking {
            booking_id: booking.id,
            payer_id: renter,
            amount: Money::from(12_000),
            method: None,
            idempotency_key: payment::IdempotencyKey::new(),
        })
        .await
        .unwrap_err();

    use pay_booking::ExecutionError as E;
    assert!(matches!(err.as_ref(), E::AlreadyPaid(_)));
    assert_eq!(svc.database().store().payments.len(), 1);
}

#[tokio::test]
async fn replayed_payment_request_is_idempotent() {
    let svc = service();
    let owner = seed_user(&svc, user::Role::Owner);
    let renter = seed_user(&svc, user::Role::Renter);
    let property_id = seed_property(&svc, owner);
    let booking = book(&svc, property_id, Some(renter)).await;
    let _ = confirm(&svc, booking.id, owner).await;

    let key = payment::IdempotencyKey::new();
    let cmd = PayBooking {
        booking_id: booking.id,
        payer_id: renter,
        amount: Money::from(12_000),
        method: None,
        idempotency_key: key,
    };
    let first = svc.execute(cmd.clone()).await.unwrap();
    let second = svc.execute(cmd).await.unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(svc.database().store().payments.len(), 1);
}

#[tokio::test]
async fn review_requires_payment() {
    let svc = service();
    let owner = seed_user(&svc, user::Role::Owner);
    let renter = seed_user(&svc, user::Role::Renter);
    let property_id = seed_property(&svc, owner);
    let booking = book(&svc, property_id, Some(renter)).await;
    let _ = confirm(&svc, booking.id, owner).await;

    let err = svc
        .execute(SubmitReview {
            booking_id: booking.id,
            property_id,
            renter_id: renter,
            rating: 5,
            comment: None,
            editing: None,
        })
        .await
        .unwrap_err();

    use submit_review::ExecutionError as E;
    assert!(matches!(err.as_ref(), E::NotPaid(_)));
}

#[tokio::test]
async fn review_rating_must_be_within_bounds() {
    let svc = service();
    let owner = seed_user(&svc, user::Role::Owner);
    let renter = seed_user(&svc, user::Role::Renter);
    let property_id = seed_property(&svc, owner);
    let booking = book(&svc, property_id, Some(renter)).await;
    let _ = confirm(&svc, booking.id, owner).await;
    let _ = pay(&svc, booking.id, renter).await;

    use submit_review::ExecutionError as E;
    for rating in [0, 6] {
        let err = svc
            .execute(SubmitReview {
                booking_id: booking.id,
                property_id,
                renter_id: renter,
                rating,
                comment: None,
                editing: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err.as_ref(), E::InvalidRating(r) if *r == rating));
    }
    assert!(svc.database().store().reviews.is_empty());
}

#[tokio::test]
async fn second_review_on_same_booking_is_rejected() {
    let svc = service();
    let owner = seed_user(&svc, user::Role::Owner);
    let renter = seed_user(&svc, user::Role::Renter);
    let property_id = seed_property(&svc, owner);
    let booking = book(&svc, property_id, Some(renter)).await;
    let _ = confirm(&svc, booking.id, owner).await;
    let _ = pay(&svc, booking.id, renter).await;

    let _ = svc
        .execute(SubmitReview {
            booking_id: booking.id,
            property_id,
            renter_id: renter,
            rating: 3,
            comment: None,
            editing: None,
        })
        .await
        .unwrap();

    let err = svc
        .execute(SubmitReview {
            booking_id: booking.id,
            property_id,
            renter_id: renter,
            rating: 5,
            comment: None,
            editing: None,
        })
        .await
        .unwrap_err();

    use submit_review::ExecutionError as E;
    assert!(matches!(err.as_ref(), E::DuplicateReview(_)));
    assert_eq!(svc.database().store().reviews.len(), 1);
}

#[tokio::test]
async fn editing_replaces_existing_review() {
    let svc = service();
    let owner = seed_user(&svc, user::Role::Owner);
    let renter = seed_user(&svc, user::Role::Renter);
    let property_id = seed_property(&svc, owner);
    let booking = book(&svc, property_id, Some(renter)).await;
    let _ = confirm(&svc, booking.id, owner).await;
    let _ = pay(&svc, booking.id, renter).await;

    let first = svc
        .execute(SubmitReview {
            booking_id: booking.id,
            property_id,
            renter_id: renter,
            rating: 3,
            comment: None,
            editing: None,
        })
        .await
        .unwrap();

    let second = svc
        .execute(SubmitReview {
            booking_id: booking.id,
            property_id,
            renter_id: renter,
            rating: 5,
            comment: Some("Much better after the repairs".parse().unwrap()),
            editing: Some(first.id),
        })
        .await
        .unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(second.rating.u8(), 5);
    assert_eq!(svc.database().store().reviews.len(), 1);
}

#[tokio::test]
async fn editing_someone_elses_review_is_rejected() {
    let svc = service();
    let owner = seed_user(&svc, user::Role::Owner);
    let renter = seed_user(&svc, user::Role::Renter);
    let property_id = seed_property(&svc, owner);
    let booking = book(&svc, property_id, Some(renter)).await;
    let _ = confirm(&svc, booking.id, owner).await;
    let _ = pay(&svc, booking.id, renter).await;

    let review = svc
        .execute(SubmitReview {
            booking_id: booking.id,
            property_id,
            renter_id: renter,
            rating: 3,
            comment: None,
            editing: None,
        })
        .await
        .unwrap();

    // Wrong ID names no review of this renter on this booking.
    let err = svc
        .execute(SubmitReview {
            booking_id: booking.id,
            property_id,
            renter_id: renter,
            rating: 5,
            comment: None,
            editing: Some(review::Id::new()),
        })
        .await
        .unwrap_err();

    use submit_review::ExecutionError as E;
    assert!(matches!(err.as_ref(), E::NotReviewAuthor(_)));
    let stored = svc.database().store().reviews[0].clone();
    assert_eq!(stored.id, review.id);
    assert_eq!(stored.rating.u8(), 3);
}

#[tokio::test]
async fn only_renter_reviews_own_booking() {
    let svc = service();
    let owner = seed_user(&svc, user::Role::Owner);
    let renter = seed_user(&svc, user::Role::Renter);
    let stranger = seed_user(&svc, user::Role::Renter);
    let property_id = seed_property(&svc, owner);
    let booking = book(&svc, property_id, Some(renter)).await;
    let _ = confirm(&svc, booking.id, owner).await;
    let _ = pay(&svc, booking.id, renter).await;

    let err = svc
        .execute(SubmitReview {
            booking_id: booking.id,
            property_id,
            renter_id: stranger,
            rating: 1,
            comment: None,
            editing: None,
        })
        .await
        .unwrap_err();

    use submit_review::ExecutionError as E;
    assert!(matches!(err.as_ref(), E::NotBookingOwner(_)));
}

#[tokio::test]
async fn owner_role_required_for_listing() {
    let svc = service();
    let renter = seed_user(&svc, user::Role::Renter);

    let err = svc
        .execute(CreateProperty {
            owner_id: renter,
            name: property::Name::new("Green Hill Flat").unwrap(),
            location: property::Location::new("Dhanmondi, Dhaka").unwrap(),
            rent: Money::from(12_000),
            kind: property::Kind::Family,
            attributes: property::Attributes::Residence {
                beds: 3,
                baths: 2,
                corridors: 1,
            },
            details: None,
            images: vec!["https://img.example.com/flat.jpg".parse().unwrap()],
        })
        .await
        .unwrap_err();

    use create_property::ExecutionError as E;
    assert!(matches!(err.as_ref(), E::NotOwner(_)));
}

#[tokio::test]
async fn property_attributes_must_fit_kind() {
    let svc = service();
    let owner = seed_user(&svc, user::Role::Owner);

    let err = svc
        .execute(CreateProperty {
            owner_id: owner,
            name: property::Name::new("Sunrise Hostel").unwrap(),
            location: property::Location::new("Mirpur, Dhaka").unwrap(),
            rent: Money::from(4_500),
            kind: property::Kind::Hostel,
            attributes: property::Attributes::Office {
                rooms: 2,
                purpose: None,
            },
            details: None,
            images: vec!["https://img.example.com/hostel.jpg"
                .parse()
                .unwrap()],
        })
        .await
        .unwrap_err();

    use create_property::ExecutionError as E;
    assert!(matches!(
        err.as_ref(),
        E::AttributesMismatch(property::Kind::Hostel),
    ));
}

#[tokio::test]
async fn created_listing_stores_images_with_main_first() {
    let svc = service();
    let owner = seed_user(&svc, user::Role::Owner);

    let property = svc
        .execute(CreateProperty {
            owner_id: owner,
            name: property::Name::new("Lake View Office").unwrap(),
            location: property::Location::new("Gulshan, Dhaka").unwrap(),
            rent: Money::from(55_000),
            kind: property::Kind::Office,
            attributes: property::Attributes::Office {
                rooms: 6,
                purpose: Some("Software firm".parse().unwrap()),
            },
            details: None,
            images: vec![
                "https://img.example.com/office-front.jpg".parse().unwrap(),
                "https://img.example.com/office-hall.jpg".parse().unwrap(),
            ],
        })
        .await
        .unwrap();

    let store = svc.database().store();
    let images: Vec<_> = store
        .images
        .iter()
        .filter(|i| i.property_id == property.id)
        .collect();
    assert_eq!(images.len(), 2);
    assert_eq!(images.iter().filter(|i| i.is_main).count(), 1);
    assert_eq!(
        property.image_url.to_string(),
        "https://img.example.com/office-front.jpg",
    );
}

#[tokio::test]
async fn owner_or_admin_deletes_property() {
    let svc = service();
    let owner = seed_user(&svc, user::Role::Owner);
    let stranger = seed_user(&svc, user::Role::Renter);
    let admin = seed_user(&svc, user::Role::Admin);
    let property_id = seed_property(&svc, owner);

    use service::command::delete_property::ExecutionError as E;
    let err = svc
        .execute(DeleteProperty {
            property_id,
            executor_id: stranger,
        })
        .await
        .unwrap_err();
    assert!(matches!(err.as_ref(), E::NotPropertyOwner(_)));

    svc.execute(DeleteProperty {
        property_id,
        executor_id: admin,
    })
    .await
    .unwrap();
    assert!(!svc.database().store().properties.contains_key(&property_id));
}

#[tokio::test]
async fn only_admin_deletes_accounts() {
    let svc = service();
    let owner = seed_user(&svc, user::Role::Owner);
    let renter = seed_user(&svc, user::Role::Renter);
    let admin = seed_user(&svc, user::Role::Admin);

    use delete_user::ExecutionError as E;
    let err = svc
        .execute(DeleteUser {
            user_id: renter,
            executor_id: owner,
        })
        .await
        .unwrap_err();
    assert!(matches!(err.as_ref(), E::NotAdmin(_)));

    svc.execute(DeleteUser {
        user_id: renter,
        executor_id: admin,
    })
    .await
    .unwrap();
    assert!(svc
        .database()
        .store()
        .users
        .get(&renter)
        .unwrap()
        .deleted_at
        .is_some());
}

#[tokio::test]
async fn admin_account_is_protected() {
    let svc = service();
    let admin = seed_user(&svc, user::Role::Admin);
    let other_admin = seed_user(&svc, user::Role::Admin);

    let err = svc
        .execute(DeleteUser {
            user_id: other_admin,
            executor_id: admin,
        })
        .await
        .unwrap_err();

    use delete_user::ExecutionError as E;
    assert!(matches!(err.as_ref(), E::CannotDeleteAdmin(_)));
}
