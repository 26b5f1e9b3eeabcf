//! [`Booking`]-related [`Database`] implementations.

use common::operations::{By, Insert, Lock, Select, Update};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{booking, payment, review, user, Booking, Review},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read,
};

use super::property::card;

/// Restores a [`Booking`] out of the provided [`Row`].
fn booking(row: &Row) -> Booking {
    Booking {
        id: row.get("id"),
        property_id: row.get("property_id"),
        renter_id: row.get("renter_id"),
        renter_name: row.get("renter_name"),
        renter_phone: row.get("renter_phone"),
        message: row.get("message"),
        status: row.get("status"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

impl<C> Database<Select<By<Option<Booking>, booking::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Booking>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Booking>, booking::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: booking::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id, property_id, renter_id, renter_name, renter_phone, \
                   message, status, created_at, updated_at \
            FROM bookings \
            WHERE id = $1::UUID \
            LIMIT 1";
        Ok(self
            .query_opt(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .map(|row| booking(&row)))
    }
}

impl<C> Database<Insert<Booking>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(booking): Insert<Booking>,
    ) -> Result<Self::Ok, Self::Err> {
        let Booking {
            id,
            property_id,
            renter_id,
            renter_name,
            renter_phone,
            message,
            status,
            created_at,
            updated_at,
        } = booking;

        const SQL: &str = "\
            INSERT INTO bookings (\
                id, property_id, renter_id, renter_name, renter_phone, \
                message, status, created_at, updated_at \
            ) VALUES (\
                $1::UUID, $2::UUID, $3::UUID, $4::VARCHAR, $5::VARCHAR, \
                $6::VARCHAR, $7::INT2, $8::TIMESTAMPTZ, $9::TIMESTAMPTZ \
            )";
        self.exec(
            SQL,
            &[
                &id,
                &property_id,
                &renter_id,
                &renter_name,
                &renter_phone,
                &message,
                &status,
                &created_at,
                &updated_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Update<booking::StatusChange>> for Postgres<C>
where
    C: Connection,
{
    type Ok = u64;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(change): Update<booking::StatusChange>,
    ) -> Result<Self::Ok, Self::Err> {
        let booking::StatusChange {
            id,
            from,
            to,
            updated_at,
        } = change;

        // Touches the row only while it still holds the expected status, so
        // the affected rows count tells whether the transition won.
        const SQL: &str = "\
            UPDATE bookings \
            SET status = $3::INT2, \
                updated_at = $4::TIMESTAMPTZ \
            WHERE id = $1::UUID \
              AND status = $2::INT2";
        self.exec(SQL, &[&id, &from, &to, &updated_at])
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Lock<By<Booking, booking::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Booking, booking::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: booking::Id = by.into_inner();

        const SQL: &str = "\
            INSERT INTO bookings_lock \
            VALUES ($1::UUID) \
            ON CONFLICT (id) DO NOTHING";
        self.query(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Select<By<Vec<read::booking::RenterView>, user::Id>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<read::booking::RenterView>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<read::booking::RenterView>, user::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let renter_id: user::Id = by.into_inner();

        const SQL: &str = "\
            SELECT b.id, b.property_id, b.renter_id, \
                   b.renter_name, b.renter_phone, \
                   b.message, b.status, b.created_at, b.updated_at, \
                   p.id AS p_id, \
                   p.name AS p_name, \
                   p.location AS p_location, \
                   p.rent AS p_rent, \
                   p.image_url AS p_image_url, \
                   p.availability AS p_availability, \
                   EXISTS(SELECT 1 \
                          FROM payments \
                          WHERE booking_id = b.id \
                            AND status = $2::INT2) AS is_paid, \
                   r.id AS r_id, \
                   r.rating AS r_rating, \
                   r.comment AS r_comment, \
                   r.created_at AS r_created_at \
            FROM bookings AS b \
            JOIN properties AS p \
              ON p.id = b.property_id \
            LEFT JOIN reviews AS r \
                   ON r.booking_id = b.id \
                  AND r.renter_id = b.renter_id \
            WHERE b.renter_id = $1::UUID \
            ORDER BY b.created_at DESC";
        Ok(self
            .query(SQL, &[&renter_id, &payment::Status::Completed])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(|row| {
                let b = booking(row);
                let review =
                    row.get::<_, Option<review::Id>>("r_id").map(|id| {
                        Review {
                            id,
                            booking_id: b.id,
                            property_id: b.property_id,
                            renter_id,
                            rating: review::Rating::new(
                                u8::try_from(row.get::<_, i16>("r_rating"))
                                    .expect("`rating` overflow"),
                            )
                            .expect("`rating` out of bounds"),
                            comment: row.get("r_comment"),
                            created_at: row.get("r_created_at"),
                        }
                    });
                read::booking::RenterView {
                    property: card(row),
                    is_paid: row.get("is_paid"),
                    review,
                    booking: b,
                }
            })
            .collect())
    }
}

impl<C> Database<Select<By<Vec<read::booking::OwnerView>, user::Id>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<read::booking::OwnerView>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<read::booking::OwnerView>, user::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let owner_id: user::Id = by.into_inner();

        const SQL: &str = "\
            SELECT b.id, b.property_id, b.renter_id, \
                   b.renter_name, b.renter_phone, \
                   b.message, b.status, b.created_at, b.updated_at, \
                   p.id AS p_id, \
                   p.name AS p_name, \
                   p.location AS p_location, \
                   p.rent AS p_rent, \
                   p.image_url AS p_image_url, \
                   p.availability AS p_availability \
            FROM bookings AS b \
            JOIN properties AS p \
              ON p.id = b.property_id \
            WHERE p.owner_id = $1::UUID \
            ORDER BY b.created_at DESC";
        Ok(self
            .query(SQL, &[&owner_id])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(|row| read::booking::OwnerView {
                property: card(row),
                booking: booking(row),
            })
            .collect())
    }
}

impl<C> Database<Select<By<read::booking::PendingCount, user::Id>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = read::booking::PendingCount;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<read::booking::PendingCount, user::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let owner_id: user::Id = by.into_inner();

        const SQL: &str = "\
            SELECT COUNT(*)::INT4 \
            FROM bookings AS b \
            JOIN properties AS p \
              ON p.id = b.property_id \
            WHERE p.owner_id = $1::UUID \
              AND b.status = $2::INT2";
        self.query_opt(SQL, &[&owner_id, &booking::Status::Pending])
            .await
            .map_err(tracerr::wrap!())
            .map(|row| row.expect("always exists").get::<_, i32>(0).into())
    }
}
