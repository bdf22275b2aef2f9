// SPDX-License-Identifier: MIT OR Apache-2.0

//! Validation example for the layercfg crate.
//!
//! Each scenario runs against its own in-memory environment, so nothing
//! from the shell leaks in and nothing is written back to it.
//!
//! To run this example:
//! ```bash
//! cargo run --example validation
//! ```

use layercfg::prelude::*;
use std::sync::Arc;

fn resolver(vars: &[(&str, &str)]) -> Result<Resolver> {
    let env = Arc::new(MemoryEnv::with_vars(vars.iter().copied()));
    Resolver::builder()
        .with_environment(env)
        .without_env_file()
        .build()
}

fn report(label: &str, outcome: std::result::Result<(), ValidationError>) {
    match outcome {
        Ok(()) => println!("{}: valid", label),
        Err(e) => println!("{}: {}", label, e),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    println!("=== Example 1: Valid Configuration ===");
    let mut r = resolver(&[("DB_HOST", "localhost"), ("DB_PASSWORD", "secret")])?;
    let db = DatabaseConfig::from_resolver(&mut r);
    report("database", db.validate());
    println!("Database: {}@{}:{}/{}", db.user, db.host, db.port, db.database);

    println!("\n=== Example 2: Missing Required Field ===");
    let mut r = resolver(&[])?;
    let db = DatabaseConfig::from_resolver(&mut r);
    report("database", db.validate());

    println!("\n=== Example 3: Invalid Port ===");
    let mut r = resolver(&[("SERVER_PORT", "99999")])?;
    let server = ServerConfig::from_resolver(&mut r);
    report("server", server.validate());

    println!("\n=== Example 4: Out of Range Temperature ===");
    let mut r = resolver(&[("OPENAI_API_KEY", "sk-demo"), ("OPENAI_TEMPERATURE", "3.5")])?;
    let openai = OpenAiConfig::from_resolver(&mut r);
    report("openai", openai.validate());

    println!("\n=== Example 5: Pool Bounds ===");
    let mut r = resolver(&[
        ("DB_PASSWORD", "secret"),
        ("DB_MIN_CONNS", "20"),
        ("DB_MAX_CONNS", "10"),
    ])?;
    let db = DatabaseConfig::from_resolver(&mut r);
    report("database", db.validate());

    println!("\n=== Example 6: Backoff Ordering ===");
    let mut r = resolver(&[
        ("RESILIENCE_INITIAL_DELAY", "30s"),
        ("RESILIENCE_MAX_DELAY", "1s"),
    ])?;
    let policy = ResilienceConfig::from_resolver(&mut r);
    report("resilience", policy.validate());

    Ok(())
}
