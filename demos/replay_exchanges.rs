//! Exchange replay demonstration.
//!
//! This example shows the discovery flow end to end:
//! 1. Start a `JwtDiscoverer` on an in-memory `ReplaySource`
//! 2. Push exchanges carrying tokens in each supported location
//! 3. Inspect what reached the `MemoryStore`
//!
//! Run with: `cargo run --example replay_exchanges`

use std::rc::Rc;

use jwt_discovery::{Exchange, JwtDiscoverer, MemoryStore, ReplaySource};

const TOKEN: &str = "eyJhbGciOiJIUzI1NiJ9.eyJzdWIiOiJhbGljZSJ9.c2ln";

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    println!("=== Exchange Replay Example ===\n");

    let store = Rc::new(MemoryStore::new());
    let mut source = ReplaySource::new();
    let discoverer = JwtDiscoverer::new(Rc::clone(&store)).start(&mut source);
    println!("Discoverer is {}", discoverer.state());

    // Scenario 1: Token in the query string
    source.push(Exchange::new(
        "req-query",
        format!("https://app.test/cb?id_token={}&state=xyz", TOKEN),
    ));

    // Scenario 2: Bearer credential on a request
    source.push(
        Exchange::new("req-bearer", "https://api.test/me")
            .with_request_header("authorization", format!("Bearer {}", TOKEN)),
    );

    // Scenario 3: JSON-encoded client header
    source.push(
        Exchange::new("req-client", "https://api.test/session")
            .with_request_header("x-client", format!(r#"{{"Context":"{}"}}"#, TOKEN)),
    );

    // Scenario 4: Implicit-flow redirect with a route fragment
    source.push(
        Exchange::new("req-redirect", "https://idp.test/authorize")
            .with_response_header("location", format!("https://app.test/#/?access_token={}", TOKEN)),
    );

    // Scenario 5: Nothing to report
    source.push(Exchange::new("req-static", "https://cdn.test/app.js"));

    let stopped = discoverer.stop(&mut source);
    println!("Discoverer is {}\n", stopped.state());

    println!("--- Stored findings ({} exchange(s)) ---", store.len());
    store.with_records(|records| {
        for record in records {
            for finding in record.jwts() {
                println!(
                    "{:<14} {:<16} {:<16} {}",
                    record.id(),
                    finding.location_type(),
                    finding.name(),
                    finding.raw_value()
                );
            }
        }
    });

    assert!(store.get("req-static").is_none());
    println!("\n✓ Exchanges without tokens never reached the store");
}
