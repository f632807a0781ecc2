mod common;

use ariregister::AriregisterClient;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    common::init_tracing();

    let client = AriregisterClient::new(common::config_from_env()?);
    let config = client.config();
    let healthy = client.is_healthy().await;

    println!(
        "environment: {:?}, endpoint: {}, healthy: {healthy}",
        config.environment(),
        config.service_endpoint()
    );
    if !healthy {
        std::process::exit(1);
    }
    Ok(())
}
