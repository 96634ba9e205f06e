use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "medichain")]
pub struct Opt {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    #[command(name = "startnode", about = "Start a ledger node")]
    StartNode {
        #[arg(
            long = "addr",
            help = "Address to listen on (defaults to NODE_ADDRESS or 127.0.0.1:5002)"
        )]
        addr: Option<String>,
    },
}
