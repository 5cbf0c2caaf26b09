use clap::Parser;
use tracing::error;

use crate::commands::{Command, Opt};

mod commands;
mod errors;
mod fetch;

fn main() {
    let opt = Opt::parse();

    let tracing_level = if opt.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt::fmt()
        .with_max_level(tracing_level)
        .with_writer(std::io::stderr)
        .init();

    let result = commands::settings(&opt).and_then(|settings| match opt.cmd {
        Command::Appcatalogs(cmd) => commands::appcatalogs::execute(cmd, settings),
        Command::Charts(cmd) => commands::charts::execute(cmd, settings),
        Command::Crds(cmd) => commands::crds::execute(cmd, settings),
        Command::Installations(cmd) => commands::installations::execute(cmd, settings),
        Command::Repositories(cmd) => commands::repositories::execute(cmd, settings),
        Command::Users(cmd) => commands::users::execute(cmd, settings),
    });

    match result {
        Ok(output) => {
            if let Some(output) = output {
                println!("{output}");
                std::process::exit(0);
            }
        }
        Err(e) => {
            error!("{e}");
            std::process::exit(1);
        }
    };
}
