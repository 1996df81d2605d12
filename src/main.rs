//! Front-name router service.
//!
//! # Architecture Overview
//!
//! ```text
//!                 ┌──────────────────────────────────────────────────────┐
//!                 │                    FRONT ROUTER                      │
//!                 │                                                      │
//!   Request       │  ┌─────────┐    ┌───────────┐    ┌──────────────┐   │
//!   ──────────────┼─▶│  http   │───▶│ resolver  │───▶│ module list  │   │
//!                 │  │ server  │    │  guards   │    │  (registry)  │   │
//!                 │  └─────────┘    └─────┬─────┘    └──────────────┘   │
//!                 │                       │ per candidate module         │
//!                 │                       ▼                              │
//!                 │            ┌────────────────────┐                    │
//!                 │            │ secure check       │──▶ 302 redirect    │
//!                 │            │ controller locator │                    │
//!                 │            └─────────┬──────────┘                    │
//!   Response      │                      ▼                               │
//!   ◀─────────────┼──────────── controller dispatch                      │
//!                 └──────────────────────────────────────────────────────┘
//! ```

use std::error::Error;
use std::path::PathBuf;

use axum::http::Method;
use clap::{Parser, Subcommand};
use serde_json::json;
use tokio::net::TcpListener;

use front_router::config::{load_config, RouterConfig};
use front_router::http::{request::front_request, HttpServer};
use front_router::observability::{logging, metrics};
use front_router::routing::{FrontResponse, MatchOutcome, ModuleRegistry, RouteResolver};

#[derive(Parser)]
#[command(name = "front-router")]
#[command(about = "Resolves front-names to module controllers", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "front-router.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve HTTP requests (default)
    Serve,
    /// Print the front-name to module lists of the configured area
    Routes,
    /// Resolve a single path without serving
    Resolve {
        /// Request path, e.g. /blog/post/view
        path: String,

        #[arg(short, long, default_value = "GET")]
        method: String,

        /// Treat the request as arriving over https
        #[arg(long)]
        secure: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let config = load_config(&cli.config)?;

    logging::init_logging(&config.observability);

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(config).await?,
        Commands::Routes => {
            let registry = ModuleRegistry::from_source(&config, &config.server.area, &config.server.router_name);
            println!("{}", serde_json::to_string_pretty(&registry)?);
        }
        Commands::Resolve { path, method, secure } => {
            let method = Method::from_bytes(method.to_uppercase().as_bytes())?;
            resolve(&config, method, &path, secure)?;
        }
    }

    Ok(())
}

async fn serve(config: RouterConfig) -> Result<(), Box<dyn Error>> {
    tracing::info!(
        bind_address = %config.listener.bind_address,
        area = %config.server.area,
        router_name = %config.server.router_name,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    HttpServer::new(config).run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

fn resolve(config: &RouterConfig, method: Method, path: &str, secure: bool) -> Result<(), Box<dyn Error>> {
    let resolver = RouteResolver::from_config(config);
    let mut request = front_request(method, path, secure, &config.admin.front_name);
    let mut response = FrontResponse::new();

    let report = match resolver.match_request(&mut request, &mut response)? {
        MatchOutcome::Matched(route) => json!({
            "outcome": "matched",
            "front_name": route.front_name,
            "module": route.controller_module,
            "class": route.class.name,
            "action": route.action,
            "route_name": route.route_name,
            "body": response.body(),
        }),
        MatchOutcome::Redirected { location } => json!({
            "outcome": "redirected",
            "location": location,
        }),
        MatchOutcome::NoMatch(reason) => json!({
            "outcome": "no_match",
            "reason": format!("{:?}", reason),
        }),
    };

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
