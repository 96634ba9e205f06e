use clap::Parser;
use log::{error, info, LevelFilter};
use medichain::{Command, Opt, Server, GLOBAL_CONFIG};
use std::process;

#[tokio::main]
async fn main() {
    env_logger::builder().filter_level(LevelFilter::Info).init();

    let opt = Opt::parse();

    if let Err(e) = run_command(opt.command).await {
        error!("Error: {e}");
        process::exit(1);
    }
}

async fn run_command(command: Command) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Command::StartNode { addr } => {
            if let Some(addr) = addr {
                GLOBAL_CONFIG.set_node_addr(addr);
            }
            let socket_addr = GLOBAL_CONFIG.get_node_addr();

            // Each node gets a fresh random identity, credited as the patient
            // of the system-authored transaction in every block it mines.
            let node_identity = uuid::Uuid::new_v4().simple().to_string();
            info!("Node identity: {node_identity}");

            let server = Server::new(node_identity)?;
            server.run(&socket_addr).await?;
        }
    }
    Ok(())
}
