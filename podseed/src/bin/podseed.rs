//! CLI for podseed: print the SRV query for a service, or look it up and print the seed endpoints.

use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use podseed::{DnsSrvResolver, SrvFinder, SrvQuery};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "podseed")]
#[command(about = "Resolve cluster discovery seed endpoints from DNS SRV records")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Names {
    /// Service name (e.g. my-service.default.svc.cluster.local)
    #[arg(long)]
    service_name: String,
    /// Container port name (e.g. discovery); queries _<port>._tcp.<service>
    #[arg(long)]
    port_name: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the SRV query built from the names, without any DNS traffic.
    Query {
        #[command(flatten)]
        names: Names,
    },
    /// Look up SRV records and print one endpoint per line.
    Lookup {
        #[command(flatten)]
        names: Names,
        /// Lookup timeout in milliseconds
        #[arg(long, default_value_t = 1000, value_parser = clap::value_parser!(u64).range(1..))]
        timeout_ms: u64,
        /// Fail instead of serving the last known answer
        #[arg(long)]
        no_retain: bool,
        /// Cache successful answers for their TTL
        #[arg(long)]
        cache: bool,
        /// Print endpoints as a JSON array
        #[arg(long)]
        json: bool,
    },
}

fn run_lookup(
    names: Names,
    timeout_ms: u64,
    retain: bool,
    cache: bool,
    json: bool,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let dns = DnsSrvResolver::builder()
        .dns_lookup_timeout(Duration::from_millis(timeout_ms))
        .retaining_data_on_failures(retain)
        .caching_lookups(cache);
    let finder = SrvFinder::with_dns(dns);
    finder.set_service_name(names.service_name)?;
    if let Some(port) = names.port_name {
        finder.set_container_port_name(port)?;
    }
    tracing::debug!(finder = ?finder, "configured");

    let resolution = finder.resolve()?;
    if json {
        println!("{}", serde_json::to_string_pretty(&resolution.endpoints)?);
    } else {
        for endpoint in &resolution.endpoints {
            println!("{}", endpoint);
        }
    }
    eprintln!(
        "{} endpoint(s) for {} ({})",
        resolution.endpoints.len(),
        resolution.query,
        resolution.source
    );
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Query { names } => {
            let query = SrvQuery::from_parts(Some(names.service_name), names.port_name)?;
            println!("{}", query);
            Ok(())
        }
        Commands::Lookup {
            names,
            timeout_ms,
            no_retain,
            cache,
            json,
        } => run_lookup(names, timeout_ms, !no_retain, cache, json),
    }
}
