//! Statistics-related [`Database`] implementations.

use common::operations::{By, Select};
use tracerr::Traced;

use crate::{
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read,
};

impl<C> Database<Select<By<read::stats::Totals, ()>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = read::stats::Totals;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(_): Select<By<read::stats::Totals, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = "\
            SELECT (SELECT COUNT(*)::INT4 \
                    FROM users \
                    WHERE deleted_at IS NULL) AS users, \
                   (SELECT COUNT(*)::INT4 \
                    FROM properties) AS properties, \
                   (SELECT COUNT(*)::INT4 \
                    FROM bookings) AS bookings";
        self.query_opt(SQL, &[])
            .await
            .map_err(tracerr::wrap!())
            .map(|row| {
                let row = row.expect("always exists");
                read::stats::Totals {
                    users: row.get::<_, i32>("users").into(),
                    properties: row.get::<_, i32>("properties").into(),
                    bookings: row.get::<_, i32>("bookings").into(),
                }
            })
    }
}
