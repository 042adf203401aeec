use clap::Parser;
use log::info;
use mcprops::api::serve::{self, AppState};
use mcprops::config::Config;
use mcprops::store::PropertiesStore;
use std::path::PathBuf;

/// Minecraft server properties editor.
///
/// Serves an editor for the server.properties of a server directory on a local address.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// path to the Minecraft server directory
    #[arg(short, long)]
    path: PathBuf,

    /// config file to use instead of config.toml next to the executable
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let store = match PropertiesStore::open(&args.path) {
        Ok(store) => store,
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(1);
        }
    };

    let config = Config::load(args.config.as_deref())?;

    info!("starting the server.properties editor");
    info!("server path: {}", store.server_path().display());

    serve::run(AppState::new(store, &config), config).await
}
