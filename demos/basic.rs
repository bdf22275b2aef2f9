// SPDX-License-Identifier: MIT OR Apache-2.0

//! Basic usage example for the layercfg crate.
//!
//! This example demonstrates:
//! - Creating a resolver (loads `.env` from the working directory if present)
//! - Building the typed presets from environment variables
//! - Reading ad hoc keys through the `APP_` prefix
//! - Formatting a database connection string
//!
//! To run this example:
//! ```bash
//! export DB_NAME="orders"
//! export DB_PASSWORD="secret"
//! export SERVER_PORT="9000"
//! export APP_FEATURE_SEARCH="on"
//!
//! cargo run --example basic
//! ```

use layercfg::prelude::*;

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    println!("=== layercfg: Basic Usage ===\n");

    let mut resolver = Resolver::new(Vec::<ResolverOption>::new())?;
    println!("Environment prefix: {}\n", resolver.env_prefix());

    println!("--- Server ---");
    let server = ServerConfig::from_resolver(&mut resolver);
    println!("Listening on {}", server.address());
    println!(
        "Timeouts: read={} write={} idle={}",
        server.read_timeout, server.write_timeout, server.idle_timeout
    );

    println!("\n--- Database ---");
    let db = DatabaseConfig::from_resolver(&mut resolver);
    println!("{:?}", db);
    match db.validate() {
        Ok(()) => println!("Connection string: {}", db.connection_string()),
        Err(e) => println!("Database config is not usable yet: {}", e),
    }

    println!("\n--- Resilience ---");
    let policy = ResilienceConfig::from_resolver(&mut resolver);
    println!(
        "Retries: {} starting at {} (x{}, capped at {})",
        policy.max_retries, policy.initial_delay, policy.multiplier, policy.max_delay
    );

    println!("\n--- Ad hoc keys ---");
    resolver.set_default("feature.search", false);
    println!("feature.search = {}", resolver.get_bool("feature.search"));

    println!("\nKnown keys:");
    for key in resolver.all_keys() {
        println!("  {}", key);
    }

    Ok(())
}
