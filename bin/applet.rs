use anyhow::Error as Anyhow;
use clap::Subcommand;
use derive_more::From;

mod local;
mod relay;
mod remote;

#[derive(From, Subcommand)]
pub enum Applet {
    Local(local::Local),
    Remote(remote::Remote),
    Relay(relay::Relay),
}

impl Default for Applet {
    fn default() -> Self {
        local::Local::default().into()
    }
}

impl Applet {
    pub async fn execute(self) -> Result<(), Anyhow> {
        match self {
            Applet::Local(a) => Ok(a.execute().await?),
            Applet::Remote(a) => Ok(a.execute().await?),
            Applet::Relay(a) => Ok(a.execute().await?),
        }
    }
}
