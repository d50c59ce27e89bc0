//! User business logic - creation and listing of users.
//!
//! Merchant users are normally created together with their merchant; the batch
//! entry point here serves the administrator import.

use crate::{
    entities::{User, UserRole, UserStatus, user},
    errors::Result,
    models::UserRequest,
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::{info, instrument};

/// Inserts one user with the given role and status.
///
/// Generic over the connection so merchant creation can run it inside its own
/// store transaction.
pub async fn create_user<C>(db: &C, role: UserRole, status: UserStatus) -> Result<user::Model>
where
    C: ConnectionTrait,
{
    let now = chrono::Utc::now();
    let user = user::ActiveModel {
        created_at: Set(now),
        updated_at: Set(now),
        role: Set(role),
        status: Set(status),
        ..Default::default()
    };

    Ok(user.insert(db).await?)
}

/// Validates every request, then inserts all users in one store transaction.
///
/// Nothing is written if any request carries an invalid role or status.
#[instrument(skip_all, fields(count = requests.len()))]
pub async fn create_users(
    db: &DatabaseConnection,
    requests: &[UserRequest],
) -> Result<Vec<user::Model>> {
    let parsed = requests
        .iter()
        .map(|request| -> Result<(UserRole, UserStatus)> {
            Ok((request.role.parse()?, request.status.parse()?))
        })
        .collect::<Result<Vec<_>>>()?;

    let txn = db.begin().await?;
    let mut created = Vec::with_capacity(parsed.len());
    for (role, status) in parsed {
        created.push(create_user(&txn, role, status).await?);
    }
    txn.commit().await?;

    info!("Created {} users", created.len());
    Ok(created)
}

/// Retrieves all users ordered by id.
pub async fn get_all_users(db: &DatabaseConnection) -> Result<Vec<user::Model>> {
    User::find()
        .order_by_asc(user::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}
