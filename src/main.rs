use std::net::{Ipv4Addr, SocketAddr, TcpListener};

use tracing::info;

use rinha_pessoas::configuration::get_static_configuration;
use rinha_pessoas::schema::provision_schema;
use rinha_pessoas::telemetry::{get_subscriber, init_subscriber};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let subscriber = get_subscriber("rinha-pessoas".into(), "info".into(), std::io::stdout);
    init_subscriber(subscriber);

    let configuration = get_static_configuration().expect("failed to read configuration");
    let pool = configuration.database.connection_pool();
    provision_schema(&pool)
        .await
        .expect("failed to provision the database schema");

    let address = SocketAddr::from((Ipv4Addr::UNSPECIFIED, configuration.application_port));
    let listener = TcpListener::bind(address)?;

    info!("Starting server at {}...", address);
    rinha_pessoas::run(listener, pool)?.await
}
