use std::io::Read;

use anyhow::Result;
use tracing::info;

use embed_composer::Composer;
use embed_composer::form::AutoConfirm;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    info!("Starting embed composer");

    // Non-interactive driver: a bulk JSON payload on stdin becomes the
    // composed embed list.
    let mut raw = String::new();
    std::io::stdin().read_to_string(&mut raw)?;

    let mut composer = Composer::new(Box::new(AutoConfirm))?;
    composer.apply_bulk(0, &raw)?;

    let request = composer.outbound_request()?;
    println!("{}", serde_json::to_string_pretty(&request)?);

    if std::env::var("BACKEND_URL").is_ok() {
        let token = std::env::var("BACKEND_TOKEN").unwrap_or_default();
        composer.submit(&token).await?;
        info!("Embed delivered to the backend");
    }

    Ok(())
}
