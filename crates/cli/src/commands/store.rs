//! Store management commands.

use storelane_core::StoreId;
use storelane_platform::db::stores;

use super::CommandError;

/// Hard-delete a store. Categories, products, and orders cascade.
///
/// The API surface only soft-deletes (`active = false`); this is the
/// operator escape hatch for data-removal requests.
///
/// # Errors
///
/// Returns an error without `--yes`, for unknown stores, or when the
/// database is unreachable.
pub async fn delete(id: i32, yes: bool) -> Result<(), CommandError> {
    if !yes {
        return Err(CommandError::Aborted(
            "refusing to hard-delete without --yes".to_string(),
        ));
    }

    let pool = super::connect().await?;
    let store_id = StoreId::new(id);

    match stores::delete_store(&pool, store_id).await {
        Ok(()) => {
            tracing::info!(%store_id, "Store deleted");
            Ok(())
        }
        Err(storelane_platform::db::RepositoryError::NotFound) => Err(CommandError::Aborted(
            format!("store {store_id} does not exist"),
        )),
        Err(storelane_platform::db::RepositoryError::Database(e)) => Err(e.into()),
        Err(e) => Err(CommandError::Aborted(e.to_string())),
    }
}
