use std::time::Duration;

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use fusion_payment_engine::{OrderFlowApi, SqliteDatabase};
use log::info;

use crate::{
    auth::ApiKeyStore,
    config::ServerConfig,
    errors::ServerError,
    integrations::FusionNotifier,
    routes::{gateway, health},
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, 25)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    db.run_migrations().await.map_err(|e| ServerError::InitializeError(e.to_string()))?;
    info!("🚀️ Database ready at {}", config.database_url);
    let srv = create_server_instance(config, db)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance(config: ServerConfig, db: SqliteDatabase) -> Result<Server, ServerError> {
    let notifier = FusionNotifier::new(config.relay_timeout)?;
    let host = config.host.clone();
    let port = config.port;
    let srv = HttpServer::new(move || {
        let orders_api = OrderFlowApi::new(db.clone());
        let key_store = ApiKeyStore::new(config.api_keys.reveal().clone());
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("fpg::access_log"))
            .app_data(web::Data::new(orders_api))
            .app_data(web::Data::new(notifier.clone()))
            .app_data(web::Data::new(key_store))
            .app_data(web::Data::new(config.clone()))
            .service(health)
            .service(web::resource("/").route(web::route().to(gateway::<SqliteDatabase, FusionNotifier>)))
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((host.as_str(), port))?
    .run();
    Ok(srv)
}
