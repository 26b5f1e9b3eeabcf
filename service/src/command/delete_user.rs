//! [`Command`] for deleting a [`User`].

use common::{
    operations::{By, Commit, Select, Transact, Transacted, Update},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{user, User},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for deleting a [`User`] by an admin.
///
/// Deletion is soft: the [`User`] row stays, so bookings, payments and
/// reviews keep their author, but the account disappears from listings and
/// cannot act anymore. Admins cannot be deleted.
#[derive(Clone, Copy, Debug)]
pub struct DeleteUser {
    /// ID of the [`User`] to delete.
    pub user_id: user::Id,

    /// ID of the [`User`] performing the deletion.
    pub executor_id: user::Id,
}

impl<Db> Command<DeleteUser> for Service<Db>
where
    Db: Database<
            Select<By<Option<User>, user::Id>>,
            Ok = Option<User>,
            Err = Traced<database::Error>,
        > + Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<Update<User>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: DeleteUser) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let DeleteUser {
            user_id,
            executor_id,
        } = cmd;

        let executor = self
            .database()
            .execute(Select(By::<Option<User>, _>::new(executor_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .filter(|u| u.deleted_at.is_none())
            .ok_or(E::UserNotExists(executor_id))
            .map_err(tracerr::wrap!())?;
        if executor.role != user::Role::Admin {
            return Err(tracerr::new!(E::NotAdmin(executor_id)));
        }

        let mut user = self
            .database()
            .execute(Select(By::<Option<User>, _>::new(user_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .filter(|u| u.deleted_at.is_none())
            .ok_or(E::UserNotExists(user_id))
            .map_err(tracerr::wrap!())?;
        if user.role == user::Role::Admin {
            return Err(tracerr::new!(E::CannotDeleteAdmin(user_id)));
        }

        user.deleted_at = Some(DateTime::now().coerce());

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Update(user))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        log::info!("`User(id: {user_id})` deleted by `User(id: {executor_id})`");

        Ok(())
    }
}

/// Error of [`DeleteUser`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`User`] with the provided ID does not exist.
    #[display("`User(id: {_0})` does not exist")]
    UserNotExists(#[error(not(source))] user::Id),

    /// [`User`] with the provided ID is not an admin.
    #[display("`User(id: {_0})` is not an admin")]
    NotAdmin(#[error(not(source))] user::Id),

    /// [`User`] with the provided ID is an admin and cannot be deleted.
    #[display("`User(id: {_0})` is an admin and cannot be deleted")]
    CannotDeleteAdmin(#[error(not(source))] user::Id),
}
