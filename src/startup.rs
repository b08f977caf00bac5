use actix_web::dev::Server;
use actix_web::{middleware::Logger, web, App, HttpServer};
use sqlx::PgPool;
use std::net::TcpListener;
use std::sync::Arc;

use crate::auth::{LoginDispatcher, TokenCodec};
use crate::configuration::JwtSettings;
use crate::middleware::{AuthenticationGate, LoggerMiddleware};
use crate::routes;
use crate::store::{AccountStore, PgAccountStore};

pub fn run(
    listener: TcpListener,
    connection: PgPool,
    jwt_config: JwtSettings,
) -> Result<Server, std::io::Error> {
    let codec = TokenCodec::new(&jwt_config);
    let accounts: Arc<dyn AccountStore> = Arc::new(PgAccountStore::new(connection.clone()));

    let connection = web::Data::new(connection);
    let codec_data = web::Data::new(codec.clone());
    let accounts_data: web::Data<dyn AccountStore> = web::Data::from(accounts.clone());
    let dispatcher = web::Data::new(LoginDispatcher::new(accounts, codec.clone()));

    let server = HttpServer::new(move || {
        App::new()
            // Innermost first; LoggerMiddleware runs after the gate has attached identity.
            .wrap(LoggerMiddleware)
            .wrap(AuthenticationGate::new(codec.clone()))
            .wrap(Logger::default())
            // Shared state
            .app_data(connection.clone())
            .app_data(codec_data.clone())
            .app_data(accounts_data.clone())
            .app_data(dispatcher.clone())
            .configure(routes::register)
    })
    .listen(listener)?
    .run();

    Ok(server)
}
