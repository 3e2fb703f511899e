use anyhow::{Context, Error as Anyhow};
use clap::Parser;
use lib::sync;
use tracing::{info, instrument};

/// Relays the state of the game between remote players.
#[derive(Debug, Parser)]
#[clap(disable_help_flag = true, disable_version_flag = true)]
pub struct Relay {
    /// The address to listen on.
    #[clap(default_value = "127.0.0.1:7878")]
    address: String,
}

impl Relay {
    #[instrument(level = "trace", skip(self), err, fields(address = %self.address))]
    pub async fn execute(self) -> Result<(), Anyhow> {
        let relay = sync::Relay::bind(&self.address)
            .await
            .with_context(|| format!("failed to listen on `{}`", self.address))?;

        info!(addr = %relay.local_addr()?, "listening");
        Ok(relay.run().await?)
    }
}
