use avatar_client::{demo, logger, AvatarClient, ClientConfig};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(e) = logger::init_with_config(logger::LoggerConfig::new()) {
        eprintln!("{}", e);
    }

    log::info!("🎨 AvatarPyCor Rust example");

    let client = match AvatarClient::new(ClientConfig::new()) {
        Ok(client) => client,
        Err(e) => {
            log::error!("Failed to initialize avatar client: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match demo::run(&client).await {
        Ok(report) => {
            if report.failures() == 0 {
                log::info!("🎉 Example finished");
            } else {
                log::warn!(
                    "Example finished with {} of {} steps failing",
                    report.failures(),
                    report.outcomes.len()
                );
            }
            ExitCode::SUCCESS
        }
        Err(_) => ExitCode::FAILURE,
    }
}
