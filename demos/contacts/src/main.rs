use chopin_jsonable::{Config, db, logging};
use chopin_jsonable_contacts::{AppState, router, setup_schema};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_logging();

    let config = Config::from_env();
    let db = db::connect(&config).await?;
    setup_schema(&db).await?;

    let app = router(AppState { db }, &config)?.layer(TraceLayer::new_for_http());

    let listener = TcpListener::bind(config.socket_addr()?).await?;
    tracing::info!("listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
