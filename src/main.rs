use std::net::IpAddr;
use std::path::PathBuf;
use std::process;

use anyhow::{bail, Context};
use clap::Parser;
use theme_forseen::error::ServeError;
use theme_forseen::server::{self, ServerConfig};

#[derive(Parser)]
#[command(name = "theme-forseen", version)]
#[command(about = "ThemeForseen dev server — lets the ThemeForseen widget write themes and fonts into your project's CSS")]
#[command(
    long_about = "ThemeForseen dev server\n\n\
    Detects your project type (Next.js, Vite, Astro, SvelteKit, Nuxt, Remix or plain HTML),\n\
    finds the stylesheet to write to and accepts apply requests from the ThemeForseen widget\n\
    running in your browser."
)]
struct Cli {
    /// Server port
    #[arg(long, short, default_value_t = server::DEFAULT_PORT)]
    port: u16,

    /// Address to bind
    #[arg(long, default_value = "127.0.0.1")]
    host: IpAddr,

    /// Project root (default: current directory)
    #[arg(long)]
    root: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();
    init_logging();

    if let Err(e) = run(cli) {
        match e.downcast_ref::<ServeError>() {
            Some(ServeError::PortInUse { port }) => {
                eprintln!("Error: Port {port} is already in use.");
                eprintln!("Another ThemeForseen server may be running.");
            }
            _ => eprintln!("error: {e:#}"),
        }
        process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let root = match cli.root {
        Some(root) => root,
        None => std::env::current_dir().context("cannot determine current directory")?,
    };
    if !root.is_dir() {
        bail!("'{}' is not a directory", root.display());
    }

    let config = ServerConfig {
        root,
        host: cli.host,
        port: cli.port,
    };

    // One thread: requests are handled one at a time, so writes to a target
    // never interleave.
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to create tokio runtime")?;
    rt.block_on(server::serve(config))?;
    Ok(())
}

fn init_logging() {
    let filter = std::env::var("THEME_FORSEEN_LOG")
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| "info".to_string());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
