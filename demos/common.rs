use std::io;

use ariregister::{Config, Environment};
use tracing_subscriber::EnvFilter;

pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("ariregister=info")),
        )
        .init();
}

fn required_env(name: &str) -> Result<String, io::Error> {
    std::env::var(name).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{name} environment variable is required"),
        )
    })
}

/// Config from `ARIREGISTER_USERNAME`/`ARIREGISTER_PASSWORD`; set
/// `ARIREGISTER_TEST=1` to use the demo environment.
pub fn config_from_env() -> Result<Config, Box<dyn std::error::Error>> {
    let username = required_env("ARIREGISTER_USERNAME")?;
    let password = required_env("ARIREGISTER_PASSWORD")?;
    let environment = match std::env::var("ARIREGISTER_TEST").as_deref() {
        Ok("1") | Ok("true") => Environment::Test,
        _ => Environment::Production,
    };
    let mut config = Config::for_environment(environment).with_credentials(username, password)?;
    config.set_log_calls(true);
    Ok(config)
}
