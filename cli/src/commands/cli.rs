use clap::{Args as ClapArgs, Parser, Subcommand};

#[derive(Parser, Debug)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Override the API base URL from the config file.
    #[arg(long, global = true)]
    pub api_url: Option<String>,
}

#[derive(ClapArgs, Debug, Clone, Default)]
pub struct DemoArgs {
    /// Credential the walkthrough stores before startup. Unset uses the demo
    /// token; anything else walks the session-expiry path.
    #[arg(long)]
    pub token: Option<String>,

    /// Run the walkthrough against the anonymous session.
    #[arg(long, default_value_t = false)]
    pub anonymous: bool,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct StateArgs {
    /// Compact JSON instead of pretty-printed.
    #[arg(long, default_value_t = false)]
    pub compact: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Narrated walkthrough of startup, ownership guards and dialogs.
    Demo(DemoArgs),
    /// Run startup against the configured API and print the state snapshot.
    State(StateArgs),
}
