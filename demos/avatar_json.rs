use avatar_client::{gender, AvatarClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    avatar_client::logger::init()?;

    // Local instance of the avatar service.
    let client = AvatarClient::with_base_url("http://127.0.0.1:5000")?;

    let status = client.api_status().await?;
    log::info!("{}: {}", status.status, status.message);

    let response = client.get_avatar_json(280, gender::FEMALE).await?;
    if response.success {
        println!("{}", response.data.svg);
    } else {
        log::error!("{}", response.error_message());
    }

    Ok(())
}
