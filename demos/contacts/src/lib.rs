pub mod controllers;
pub mod models;

use axum::Router;
use chopin_jsonable::Config;
use chopin_jsonable::detect::DetectorError;
use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr, Schema};

/// Shared application state for all handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
}

/// Create the tables this app needs if they don't exist yet.
pub async fn setup_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let mut stmt = Schema::new(backend).create_table_from_entity(models::contact::Entity);
    stmt.if_not_exists();
    db.execute(backend.build(&stmt)).await?;
    Ok(())
}

pub fn router(state: AppState, config: &Config) -> Result<Router, DetectorError> {
    Ok(controllers::contacts::routes(&state, config)?.with_state(state))
}
