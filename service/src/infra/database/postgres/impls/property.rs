//! [`Property`]-related [`Database`] implementations.

use common::operations::{By, Delete, Insert, Select, Update};
use itertools::Itertools as _;
use postgres_types::ToSql;
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{property, user, Property},
    infra::{
        database::{
            self,
            postgres::{Connection, FuzzPattern},
            Postgres,
        },
        Database,
    },
    read,
};

/// Columns of the `properties` table forming a [`Property`].
const COLUMNS: &str = "\
    id, owner_id, name, location, rent, kind, \
    gender, beds, baths, corridors, rooms, purpose, \
    details, image_url, availability, created_at";

/// Restores [`property::Attributes`] out of their nullable columns.
fn attributes(kind: property::Kind, row: &Row) -> property::Attributes {
    let count = |column: &str| {
        property::Count::try_from(row.get::<_, i32>(column))
            .unwrap_or_else(|_| panic!("`{column}` overflow"))
    };
    match kind {
        property::Kind::Family
        | property::Kind::Bachelor
        | property::Kind::Sublet => property::Attributes::Residence {
            beds: count("beds"),
            baths: count("baths"),
            corridors: count("corridors"),
        },
        property::Kind::Hostel => property::Attributes::Hostel {
            gender: row.get("gender"),
            beds: count("beds"),
            baths: count("baths"),
        },
        property::Kind::Office => property::Attributes::Office {
            rooms: count("rooms"),
            purpose: row.get("purpose"),
        },
    }
}

/// Restores a [`Property`] out of the provided [`Row`].
fn property(row: &Row) -> Property {
    let kind = row.get("kind");
    Property {
        id: row.get("id"),
        owner_id: row.get("owner_id"),
        name: row.get("name"),
        location: row.get("location"),
        rent: row.get("rent"),
        kind,
        attributes: attributes(kind, row),
        details: row.get("details"),
        image_url: row.get("image_url"),
        availability: row.get("availability"),
        created_at: row.get("created_at"),
    }
}

/// Restores a [`read::property::Card`] out of the provided [`Row`] with
/// `p_`-prefixed columns.
pub(super) fn card(row: &Row) -> read::property::Card {
    read::property::Card {
        id: row.get("p_id"),
        name: row.get("p_name"),
        location: row.get("p_location"),
        rent: row.get("p_rent"),
        image_url: row.get("p_image_url"),
        availability: row.get("p_availability"),
    }
}

impl<C> Database<Select<By<Option<Property>, property::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Property>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Property>, property::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: property::Id = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM properties \
             WHERE id = $1::UUID \
             LIMIT 1",
        );
        Ok(self
            .query_opt(&sql, &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .map(|row| property(&row)))
    }
}

impl<C> Database<Insert<Property>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Property>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(property): Insert<Property>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(property))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Property>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(property): Update<Property>,
    ) -> Result<Self::Ok, Self::Err> {
        let Property {
            id,
            owner_id,
            name,
            location,
            rent,
            kind,
            attributes,
            details,
            image_url,
            availability,
            created_at,
        } = property;

        let (gender, beds, baths, corridors, rooms, purpose) = match attributes
        {
            property::Attributes::Residence {
                beds,
                baths,
                corridors,
            } => (
                None,
                Some(i32::from(beds)),
                Some(i32::from(baths)),
                Some(i32::from(corridors)),
                None,
                None,
            ),
            property::Attributes::Hostel {
                gender,
                beds,
                baths,
            } => (
                Some(gender),
                Some(i32::from(beds)),
                Some(i32::from(baths)),
                None,
                None,
                None,
            ),
            property::Attributes::Office { rooms, purpose } => {
                (None, None, None, None, Some(i32::from(rooms)), purpose)
            }
        };

        const SQL: &str = "\
            INSERT INTO properties (\
                id, owner_id, name, location, rent, kind, \
                gender, beds, baths, corridors, rooms, purpose, \
                details, image_url, availability, created_at \
            ) VALUES (\
                $1::UUID, $2::UUID, $3::VARCHAR, $4::VARCHAR, \
                $5::NUMERIC, $6::INT2, \
                $7::INT2, $8::INT4, $9::INT4, $10::INT4, \
                $11::INT4, $12::VARCHAR, \
                $13::VARCHAR, $14::VARCHAR, $15::INT2, $16::TIMESTAMPTZ \
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET owner_id = EXCLUDED.owner_id, \
                name = EXCLUDED.name, \
                location = EXCLUDED.location, \
                rent = EXCLUDED.rent, \
                kind = EXCLUDED.kind, \
                gender = EXCLUDED.gender, \
                beds = EXCLUDED.beds, \
                baths = EXCLUDED.baths, \
                corridors = EXCLUDED.corridors, \
                rooms = EXCLUDED.rooms, \
                purpose = EXCLUDED.purpose, \
                details = EXCLUDED.details, \
                image_url = EXCLUDED.image_url, \
                availability = EXCLUDED.availability, \
                created_at = EXCLUDED.created_at";
        self.exec(
            SQL,
            &[
                &id,
                &owner_id,
                &name,
                &location,
                &rent,
                &kind,
                &gender,
                &beds,
                &baths,
                &corridors,
                &rooms,
                &purpose,
                &details,
                &image_url,
                &availability,
                &created_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Delete<By<Property, property::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Property, property::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: property::Id = by.into_inner();

        const SQL: &str = "\
            DELETE FROM properties \
            WHERE id = $1::UUID";
        self.exec(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Insert<property::Image>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(image): Insert<property::Image>,
    ) -> Result<Self::Ok, Self::Err> {
        let property::Image {
            id,
            property_id,
            url,
            is_main,
            created_at,
        } = image;

        const SQL: &str = "\
            INSERT INTO property_images (\
                id, property_id, url, is_main, created_at \
            ) VALUES (\
                $1::UUID, $2::UUID, $3::VARCHAR, $4::BOOL, $5::TIMESTAMPTZ \
            )";
        self.exec(SQL, &[&id, &property_id, &url, &is_main, &created_at])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Select<By<Vec<property::Image>, property::Id>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<property::Image>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<property::Image>, property::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let property_id: property::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id, property_id, url, is_main, created_at \
            FROM property_images \
            WHERE property_id = $1::UUID \
            ORDER BY is_main DESC, created_at ASC";
        Ok(self
            .query(SQL, &[&property_id])
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| property::Image {
                id: row.get("id"),
                property_id: row.get("property_id"),
                url: row.get("url"),
                is_main: row.get("is_main"),
                created_at: row.get("created_at"),
            })
            .collect())
    }
}

impl<C>
    Database<
        Select<By<Vec<read::property::Card>, read::property::list::Filter>>,
    > for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<read::property::Card>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<Vec<read::property::Card>, read::property::list::Filter>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::property::list::Filter {
            search,
            kind,
            only_available,
        } = by.into_inner();

        let mut ps: Vec<&(dyn ToSql + Sync)> = vec![];

        let search_pattern =
            search.as_deref().map(FuzzPattern::new);
        let search_idx = search_pattern.as_ref().map(|p| {
            ps.push(p);
            ps.len()
        });
        let kind_idx = kind.as_ref().map(|k| {
            ps.push(k);
            ps.len()
        });
        let availability = property::Availability::Available;
        let availability_idx = only_available.then(|| {
            ps.push(&availability);
            ps.len()
        });

        let sql = format!(
            "SELECT id AS p_id, \
                    name AS p_name, \
                    location AS p_location, \
                    rent AS p_rent, \
                    image_url AS p_image_url, \
                    availability AS p_availability \
             FROM properties \
             WHERE true \
                   {search_filtering} \
                   {kind_filtering} \
                   {availability_filtering} \
             ORDER BY created_at DESC",
            search_filtering =
                search_idx.into_iter().format_with("", |idx, f| {
                    f(&format_args!(
                        "AND (LOWER(name) SIMILAR TO LOWER(${idx}::VARCHAR) \
                         OR LOWER(location) \
                            SIMILAR TO LOWER(${idx}::VARCHAR))"
                    ))
                }),
            kind_filtering = kind_idx.into_iter().format_with("", |idx, f| {
                f(&format_args!("AND kind = ${idx}::INT2"))
            }),
            availability_filtering =
                availability_idx.into_iter().format_with("", |idx, f| {
                    f(&format_args!("AND availability = ${idx}::INT2"))
                }),
        );
        Ok(self
            .query(&sql, ps.as_slice())
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(card)
            .collect())
    }
}

impl<C>
    Database<
        Select<
            By<read::property::list::TotalCount, read::property::list::Filter>,
        >,
    > for Postgres<C>
where
    C: Connection,
{
    type Ok = read::property::list::TotalCount;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<read::property::list::TotalCount, read::property::list::Filter>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::property::list::Filter {
            search,
            kind,
            only_available,
        } = by.into_inner();

        let mut ps: Vec<&(dyn ToSql + Sync)> = vec![];

        let search_pattern = search.as_deref().map(FuzzPattern::new);
        let search_idx = search_pattern.as_ref().map(|p| {
            ps.push(p);
            ps.len()
        });
        let kind_idx = kind.as_ref().map(|k| {
            ps.push(k);
            ps.len()
        });
        let availability = property::Availability::Available;
        let availability_idx = only_available.then(|| {
            ps.push(&availability);
            ps.len()
        });

        let sql = format!(
            "SELECT COUNT(*)::INT4 \
             FROM properties \
             WHERE true \
                   {search_filtering} \
                   {kind_filtering} \
                   {availability_filtering}",
            search_filtering =
                search_idx.into_iter().format_with("", |idx, f| {
                    f(&format_args!(
                        "AND (LOWER(name) SIMILAR TO LOWER(${idx}::VARCHAR) \
                         OR LOWER(location) \
                            SIMILAR TO LOWER(${idx}::VARCHAR))"
                    ))
                }),
            kind_filtering = kind_idx.into_iter().format_with("", |idx, f| {
                f(&format_args!("AND kind = ${idx}::INT2"))
            }),
            availability_filtering =
                availability_idx.into_iter().format_with("", |idx, f| {
                    f(&format_args!("AND availability = ${idx}::INT2"))
                }),
        );
        self.query_opt(&sql, ps.as_slice())
            .await
            .map_err(tracerr::wrap!())
            .map(|row| row.expect("always exists").get::<_, i32>(0).into())
    }
}

impl<C> Database<Select<By<Vec<read::property::Card>, user::Id>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<read::property::Card>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<read::property::Card>, user::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let owner_id: user::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id AS p_id, \
                   name AS p_name, \
                   location AS p_location, \
                   rent AS p_rent, \
                   image_url AS p_image_url, \
                   availability AS p_availability \
            FROM properties \
            WHERE owner_id = $1::UUID \
            ORDER BY created_at DESC";
        Ok(self
            .query(SQL, &[&owner_id])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(card)
            .collect())
    }
}
