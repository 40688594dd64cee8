//! Terminal front end for the zoo records API.
//!
//! The core builds every request and interprets every response; this binary
//! only moves bytes (`UreqTransport`), reads input and prints tables.

use anyhow::Result;
use clap::Parser;
use zoo_core::sports::LeagueQuery;
use zoo_core::{Location, SportsClient, ZooClient};

mod browse;
mod commands;
mod config;
mod logging;
mod prompt;
mod render;
mod transport;

use crate::browse::{Action, Session, HELP};
use crate::config::{Cli, Command};
use crate::transport::UreqTransport;

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let transport = UreqTransport::new();
    let zoo = ZooClient::new(&cli.endpoints.api_url);
    let sports = SportsClient::new(&cli.endpoints.sports_url);

    match cli.command {
        Command::Open { location } => {
            Session::open(transport, zoo, sports, Location::parse(&location)).render();
        }
        Command::Leagues { country, sport } => {
            let query = LeagueQuery { country, sport };
            Session::open(transport, zoo, sports, query.location()).render();
        }
        Command::Browse { location } => browse(Session::open(
            transport,
            zoo,
            sports,
            Location::parse(&location),
        ))?,
        Command::Create(args) => commands::create(&transport, &zoo, args)?,
        Command::Delete(args) => commands::delete(&transport, &zoo, args)?,
    }
    Ok(())
}

fn browse(mut session: Session<UreqTransport>) -> Result<()> {
    println!("{HELP}");
    session.render();
    loop {
        let Some(line) = prompt::ask(&format!("{}> ", session.location()))? else {
            return Ok(());
        };
        match line.parse::<Action>() {
            Ok(action) => {
                if !session.apply(action) {
                    return Ok(());
                }
                session.render();
            }
            Err(message) => eprintln!("{message}"),
        }
    }
}
