//! Command-line arguments.

use clap::{ArgAction, Args, Parser, Subcommand};
use zoo_core::{FormKind, Resource};

#[derive(Parser)]
#[command(
    name = "zoo-admin",
    version,
    about = "Browse and maintain the zoo records database",
    long_about = "Browse and maintain the zoo records database.\n\n\
                  List pages are addressed like links (`/habitats?page=2&pageSize=10`),\n\
                  so any view can be reopened exactly as it was."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[command(flatten)]
    pub endpoints: Endpoints,

    /// Raise log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Args, Debug, Clone)]
pub struct Endpoints {
    /// Base URL of the zoo records API.
    #[arg(
        long = "api-url",
        env = "ZOO_API_URL",
        default_value = "http://localhost:3000",
        global = true
    )]
    pub api_url: String,

    /// Base URL of the sports league API.
    #[arg(
        long = "sports-url",
        env = "SPORTS_API_URL",
        default_value = "https://www.thesportsdb.com/api/v1/json/3",
        global = true
    )]
    pub sports_url: String,
}

#[derive(Subcommand)]
pub enum Command {
    /// Render one location and exit.
    Open {
        #[arg(value_name = "LOCATION", default_value = "/species")]
        location: String,
    },

    /// Open a location and keep navigating from a prompt.
    Browse {
        #[arg(value_name = "LOCATION", default_value = "/species")]
        location: String,
    },

    /// Create a habitat or species.
    Create(CreateArgs),

    /// Delete one record of any collection.
    Delete(DeleteArgs),

    /// Search sports leagues by country and sport.
    Leagues {
        #[arg(short = 'c', long)]
        country: Option<String>,

        #[arg(short = 's', long)]
        sport: Option<String>,
    },
}

#[derive(Args)]
pub struct CreateArgs {
    /// `habitat` or `species`.
    #[arg(value_name = "KIND")]
    pub kind: FormKind,

    /// Prefill a field (`name=value`); remaining fields are prompted for.
    #[arg(short = 'f', long = "field", value_name = "NAME=VALUE", value_parser = parse_field)]
    pub fields: Vec<(String, String)>,
}

#[derive(Args)]
pub struct DeleteArgs {
    /// Collection to delete from.
    #[arg(value_name = "RESOURCE")]
    pub resource: Resource,

    /// ID to delete; picked from the listed IDs when omitted.
    #[arg(long)]
    pub id: Option<String>,

    /// Skip the confirmation prompt.
    #[arg(short = 'y', long)]
    pub yes: bool,
}

fn parse_field(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(name, value)| (name.trim().to_string(), value.trim().to_string()))
        .filter(|(name, _)| !name.is_empty())
        .ok_or_else(|| format!("expected NAME=VALUE, got `{raw}`"))
}
