use std::net::TcpListener;

use actix_web::dev::Server;
use actix_web::{web, App, HttpServer};
use tracing_actix_web::TracingLogger;

use crate::mail::send_email::EmailClient;
use crate::routes::campaigns::{campaign_history, publish_campaign};
use crate::routes::health::health_check;
use crate::store::CampaignStore;

pub fn run(
    listener: TcpListener,
    email_client: EmailClient,
    store: CampaignStore,
) -> Result<Server, std::io::Error> {
    let email_client = web::Data::new(email_client);
    let store = web::Data::new(store);
    Ok(HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .route("/health", web::get().to(health_check))
            .route("/campaigns", web::post().to(publish_campaign))
            .route("/campaigns", web::get().to(campaign_history))
            .app_data(email_client.clone())
            .app_data(store.clone())
    })
    .listen(listener)?
    .run())
}
