//! [`Review`]-related [`Database`] implementations.

use common::operations::{By, Insert, Select, Update};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{booking, property, review, user, Review},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
};

/// Restores a [`Review`] out of the provided [`Row`].
fn review(row: &Row) -> Review {
    Review {
        id: row.get("id"),
        booking_id: row.get("booking_id"),
        property_id: row.get("property_id"),
        renter_id: row.get("renter_id"),
        rating: review::Rating::new(
            u8::try_from(row.get::<_, i16>("rating"))
                .expect("`rating` overflow"),
        )
        .expect("`rating` out of bounds"),
        comment: row.get("comment"),
        created_at: row.get("created_at"),
    }
}

impl<C> Database<Select<By<Option<Review>, (user::Id, booking::Id)>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Review>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Review>, (user::Id, booking::Id)>>,
    ) -> Result<Self::Ok, Self::Err> {
        let (renter_id, booking_id) = by.into_inner();

        const SQL: &str = "\
            SELECT id, booking_id, property_id, renter_id, \
                   rating, comment, created_at \
            FROM reviews \
            WHERE renter_id = $1::UUID \
              AND booking_id = $2::UUID \
            LIMIT 1";
        Ok(self
            .query_opt(SQL, &[&renter_id, &booking_id])
            .await
            .map_err(tracerr::wrap!())?
            .map(|row| review(&row)))
    }
}

impl<C> Database<Select<By<Vec<Review>, property::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Review>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Review>, property::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let property_id: property::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id, booking_id, property_id, renter_id, \
                   rating, comment, created_at \
            FROM reviews \
            WHERE property_id = $1::UUID \
            ORDER BY created_at DESC";
        Ok(self
            .query(SQL, &[&property_id])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(review)
            .collect())
    }
}

impl<C> Database<Insert<Review>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Review>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(review): Insert<Review>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(review)).await.map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Review>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(review): Update<Review>,
    ) -> Result<Self::Ok, Self::Err> {
        let Review {
            id,
            booking_id,
            property_id,
            renter_id,
            rating,
            comment,
            created_at,
        } = review;

        let rating = i16::from(rating.u8());

        const SQL: &str = "\
            INSERT INTO reviews (\
                id, booking_id, property_id, renter_id, \
                rating, comment, created_at \
            ) VALUES (\
                $1::UUID, $2::UUID, $3::UUID, $4::UUID, \
                $5::INT2, $6::VARCHAR, $7::TIMESTAMPTZ \
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET rating = EXCLUDED.rating, \
                comment = EXCLUDED.comment, \
                created_at = EXCLUDED.created_at";
        self.exec(
            SQL,
            &[
                &id,
                &booking_id,
                &property_id,
                &renter_id,
                &rating,
                &comment,
                &created_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}
