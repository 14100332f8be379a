//! Example: seed list from a Kubernetes headless service via SRV records.
//!
//! cargo run --example kubernetes -- my-service.default.svc.cluster.local discovery

use podseed::{Discovery, DiscoveryModule, SrvFinderConfig};

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let service_name = args
        .next()
        .unwrap_or_else(|| "my-service.default.svc.cluster.local".to_string());
    let mut config = SrvFinderConfig::new(service_name);
    config.container_port_name = args.next();

    let mut discovery = Discovery::new();
    discovery.register(&mut DiscoveryModule::new().srv(&config)?)?;

    println!("Finder: {:?}", discovery.finder());
    for endpoint in discovery.seed_list()? {
        println!("  {}", endpoint);
    }
    Ok(())
}
