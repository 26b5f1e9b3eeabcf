//! [`Payment`]-related [`Database`] implementations.

use common::operations::{By, Insert, Select};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{booking, payment, user, Payment},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read::payment::Completed,
};

/// Columns of the `payments` table forming a [`Payment`].
const COLUMNS: &str = "\
    id, booking_id, payer_id, amount, status, method, \
    transaction_id, idempotency_key, created_at";

/// Restores a [`Payment`] out of the provided [`Row`].
fn payment(row: &Row) -> Payment {
    Payment {
        id: row.get("id"),
        booking_id: row.get("booking_id"),
        payer_id: row.get("payer_id"),
        amount: row.get("amount"),
        status: row.get("status"),
        method: row.get("method"),
        transaction_id: row.get("transaction_id"),
        idempotency_key: row.get("idempotency_key"),
        created_at: row.get("created_at"),
    }
}

impl<C> Database<Select<By<Option<Payment>, payment::IdempotencyKey>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Payment>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Payment>, payment::IdempotencyKey>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let key: payment::IdempotencyKey = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM payments \
             WHERE idempotency_key = $1::UUID \
             LIMIT 1",
        );
        Ok(self
            .query_opt(&sql, &[&key])
            .await
            .map_err(tracerr::wrap!())?
            .map(|row| payment(&row)))
    }
}

impl<C> Database<Select<By<Option<Completed<Payment>>, booking::Id>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Completed<Payment>>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Completed<Payment>>, booking::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let booking_id: booking::Id = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM payments \
             WHERE booking_id = $1::UUID \
               AND status = $2::INT2 \
             LIMIT 1",
        );
        Ok(self
            .query_opt(&sql, &[&booking_id, &payment::Status::Completed])
            .await
            .map_err(tracerr::wrap!())?
            .map(|row| Completed(payment(&row))))
    }
}

impl<C> Database<Insert<Payment>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(payment): Insert<Payment>,
    ) -> Result<Self::Ok, Self::Err> {
        let Payment {
            id,
            booking_id,
            payer_id,
            amount,
            status,
            method,
            transaction_id,
            idempotency_key,
            created_at,
        } = payment;

        const SQL: &str = "\
            INSERT INTO payments (\
                id, booking_id, payer_id, amount, status, method, \
                transaction_id, idempotency_key, created_at \
            ) VALUES (\
                $1::UUID, $2::UUID, $3::UUID, $4::NUMERIC, $5::INT2, \
                $6::VARCHAR, $7::VARCHAR, $8::UUID, $9::TIMESTAMPTZ \
            )";
        self.exec(
            SQL,
            &[
                &id,
                &booking_id,
                &payer_id,
                &amount,
                &status,
                &method,
                &transaction_id,
                &idempotency_key,
                &created_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Select<By<Vec<Payment>, user::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Payment>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Payment>, user::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let payer_id: user::Id = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM payments \
             WHERE payer_id = $1::UUID \
             ORDER BY created_at DESC",
        );
        Ok(self
            .query(&sql, &[&payer_id])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(payment)
            .collect())
    }
}
