mod common;

use ariregister::AriregisterClient;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    common::init_tracing();

    let client = AriregisterClient::new(common::config_from_env()?);
    let operations = client.operations().await;
    if operations.is_empty() {
        println!("no operations found at {}", client.config().service_url());
    }
    for operation in operations {
        println!("{operation}");
    }
    Ok(())
}
