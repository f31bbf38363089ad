use crate::{
    cli::actions::Action,
    entrata,
    entrata::handlers::CookieSettings,
    flow::{urls, AuthFlow, FlowConfig},
    identity::{redacted, IdentityClient},
};
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;
use url::Url;

/// Handle the server action
pub async fn handle(action: Action) -> Result<()> {
    match action {
        Action::Server {
            port,
            identity_url,
            public_url,
            secure_cookies,
        } => {
            Url::parse(&public_url)
                .with_context(|| format!("Invalid public URL: {public_url}"))?;

            let client = Arc::new(
                IdentityClient::new(&identity_url, urls::USER_AREA)
                    .context("Invalid identity service URL")?,
            );

            info!(
                "Upstream identity service: {}",
                redacted(&identity_url)
            );

            let flow = Arc::new(AuthFlow::new(
                client.clone(),
                client,
                FlowConfig::new(&public_url),
            ));

            entrata::new(
                port,
                flow,
                CookieSettings {
                    secure: secure_cookies,
                },
            )
            .await?;
        }
    }

    Ok(())
}
