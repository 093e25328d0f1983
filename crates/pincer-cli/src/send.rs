//! `pincer send` — one-shot frame exchange with a running gateway.

use anyhow::{Context, Result};

use pincer_core::config::load_config;
use pincer_core::ClientFrame;
use pincer_gateway::{GatewayClient, RetryPolicy};

use crate::helpers;

/// Send one raw JSON frame and print the reply.
pub async fn run(frame: &str, url: Option<String>) -> Result<()> {
    // Validate locally so a typo fails fast instead of as a gateway error.
    let frame: ClientFrame =
        serde_json::from_str(frame).context("frame is not a valid protocol message")?;

    let config = load_config(None);
    let url = url.unwrap_or_else(|| helpers::gateway_url(&config));

    let mut client = GatewayClient::new(url, RetryPolicy::default());
    let mut session = client.connect().await?;

    let reply = session.request(&frame).await?;
    helpers::print_frame(&reply);

    session.close().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use pincer_core::ClientFrame;

    #[test]
    fn valid_frames_parse() {
        assert!(serde_json::from_str::<ClientFrame>(r#"{"type":"ping"}"#).is_ok());
        assert!(serde_json::from_str::<ClientFrame>(
            r#"{"type":"memory","operation":"append","data":"x"}"#
        )
        .is_ok());
    }

    #[test]
    fn invalid_frame_rejected_before_connecting() {
        assert!(serde_json::from_str::<ClientFrame>(r#"{"type":"warp"}"#).is_err());
        assert!(serde_json::from_str::<ClientFrame>("not json").is_err());
    }
}
