use std::net::TcpListener;

use once_cell::sync::Lazy;
use wiremock::MockServer;

use mailburst::config::{get_configuration, Configuration};
use mailburst::mail::send_email::EmailClient;
use mailburst::run::run;
use mailburst::store::CampaignStore;
use mailburst::telemetry::{get_subscriber, init_subscriber};

static TRACING: Lazy<()> = Lazy::new(|| {
    if std::env::var("TEST_LOG").is_ok() {
        init_subscriber(get_subscriber(
            "test".into(),
            "debug".into(),
            std::io::stdout,
        ));
    } else {
        init_subscriber(get_subscriber("test".into(), "debug".into(), std::io::sink));
    }
});

pub struct TestApp {
    pub addr: String,
    pub email_server: MockServer,
    pub config: Configuration,
}

impl TestApp {
    pub async fn post_campaign(&self, body: &serde_json::Value) -> reqwest::Response {
        reqwest::Client::new()
            .post(format!("{}/campaigns", self.addr))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn get_campaigns(&self) -> reqwest::Response {
        reqwest::Client::new()
            .get(format!("{}/campaigns", self.addr))
            .send()
            .await
            .expect("Failed to execute request.")
    }
}

pub async fn spawn_app() -> TestApp {
    Lazy::force(&TRACING);

    // stands in for the remote mail API.
    let email_server = MockServer::start().await;

    let mut configuration = get_configuration().expect("should load configuration");
    configuration.email_client.base_url = email_server.uri();

    let listener = TcpListener::bind(format!("{}:0", configuration.app.host))
        .expect("failed to bind to random port");
    let port = listener.local_addr().unwrap().port();

    let sender = configuration
        .email_client
        .sender()
        .expect("invalid sender email address.");
    let email_client = EmailClient::new(configuration.email_client.clone(), sender);

    let server =
        run(listener, email_client, CampaignStore::new()).expect("Failed to bind address");
    let _ = tokio::spawn(server);

    let hostname = configuration.app.host.clone();
    TestApp {
        config: configuration,
        email_server,
        addr: format!("http://{}:{}", hostname, port),
    }
}
