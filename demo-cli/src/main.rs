use dotenvy::dotenv;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cleanmycity_client::{ClientConfig, SessionClient, session_store_from_env};

/// Walks the session lifecycle against a running CleanMyCity backend:
/// bootstrap, sign-in, a few API reads, and sign-out.
///
/// Configuration comes from `CMC_*` environment variables (or `.env`);
/// `CMC_DEMO_EMAIL` / `CMC_DEMO_PASSWORD` select the account to sign in with.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{}=debug", env!("CARGO_CRATE_NAME")).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let client = SessionClient::new(ClientConfig::from_env(), session_store_from_env())?;

    match client.bootstrap().await? {
        Some(user) => tracing::info!("Restored session for {} ({})", user.full_name, user.role),
        None => tracing::info!("No stored session, starting anonymous"),
    }

    let mut events = client.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            tracing::warn!("Session notification: {:?}", event);
        }
    });

    if !client.is_authenticated() {
        let email =
            std::env::var("CMC_DEMO_EMAIL").unwrap_or_else(|_| "citizen@example.com".to_string());
        let password =
            std::env::var("CMC_DEMO_PASSWORD").unwrap_or_else(|_| "citizen123".to_string());
        let user = client.login(&email, &password).await?;
        println!("Signed in as {} ({})", user.full_name, user.role);
    }

    let organizations = client.public_organizations().await?;
    println!("{} organizations accept reports:", organizations.len());
    for organization in &organizations {
        println!(
            "  [{}] {} <{}>",
            organization.id, organization.name, organization.email
        );
    }

    let issues = client.my_issues().await?;
    println!("Your reported issues ({}):", issues.len());
    for issue in &issues {
        println!("  #{} {} [{}]", issue.id, issue.title, issue.status);
    }

    client.logout().await?;
    println!("Signed out, local session cleared");

    Ok(())
}
