mod common;

use ariregister::{AriregisterClient, Params, validator};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    common::init_tracing();

    let input = std::env::args()
        .nth(1)
        .unwrap_or_else(|| ariregister::client::HEALTH_CHECK_REGISTRY_CODE.to_owned());
    let Some(code) = validator::validate_registry_code(Some(input.as_str()))? else {
        return Err("registry code is required".into());
    };

    let client = AriregisterClient::builder(common::config_from_env()?).build()?;
    let response = client
        .call("lihtandmed_v2", Params::new().with("ariregistri_kood", code))
        .await?;

    let company = response.find(&["keha", "ettevotjad", "item"]);
    match company {
        Some(company) => println!("{:#}", company.to_json()),
        None => println!("no company found"),
    }

    Ok(())
}
