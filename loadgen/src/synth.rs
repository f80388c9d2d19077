//! Synthetic log entry content.
//!
//! Entries are assembled from fixed candidate tables: real-looking service
//! and endpoint names, and hacker-movie flavored error sentences with a
//! Python-style traceback frame wrapped around them.

use rand::Rng;
use shared::models::LogEntry;

/// Services a synthetic entry can claim to come from.
pub const SERVICES: [&str; 3] = ["user-service", "auth-service", "payment-service"];

/// Endpoints a synthetic entry can claim to be observed on.
pub const ENDPOINTS: [&str; 3] = ["/api/users", "/api/login", "/api/payments"];

const VERBS: [&str; 12] = [
    "bypass",
    "override",
    "compress",
    "copy",
    "navigate",
    "index",
    "connect",
    "generate",
    "quantify",
    "calculate",
    "synthesize",
    "parse",
];

const ADJECTIVES: [&str; 12] = [
    "auxiliary",
    "primary",
    "back-end",
    "digital",
    "open-source",
    "virtual",
    "cross-platform",
    "redundant",
    "online",
    "haptic",
    "wireless",
    "neural",
];

const NOUNS: [&str; 16] = [
    "driver",
    "protocol",
    "bandwidth",
    "panel",
    "microchip",
    "program",
    "port",
    "card",
    "array",
    "interface",
    "system",
    "sensor",
    "firewall",
    "pixel",
    "alarm",
    "matrix",
];

const MODULES: [&str; 10] = [
    "handler", "worker", "session", "billing", "gateway", "cache", "router", "parser", "config",
    "daemon",
];

const FUNCTIONS: [&str; 8] = [
    "synergize",
    "aggregate",
    "orchestrate",
    "streamline",
    "incentivize",
    "leverage",
    "recontextualize",
    "iterate",
];

const EXTENSIONS: [&str; 6] = ["py", "go", "rs", "js", "rb", "php"];

fn pick<'a, R: Rng + ?Sized>(rng: &mut R, table: &'a [&'a str]) -> &'a str {
    table[rng.random_range(0..table.len())]
}

/// Produces one fully populated random log entry.
#[must_use]
pub fn random_entry() -> LogEntry {
    let mut rng = rand::rng();
    let error = error_message(&mut rng);
    let traceback = traceback(&mut rng, &error);

    LogEntry::new(pick(&mut rng, &SERVICES), pick(&mut rng, &ENDPOINTS))
        .with_error(error)
        .with_traceback(traceback)
}

fn error_message<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!(
        "If we {} the {} {}, we can get to the {} through the {} {}!",
        pick(rng, &VERBS),
        pick(rng, &ADJECTIVES),
        pick(rng, &NOUNS),
        pick(rng, &NOUNS),
        pick(rng, &ADJECTIVES),
        pick(rng, &NOUNS),
    )
}

/// Single-frame traceback ending in the error message itself.
fn traceback<R: Rng + ?Sized>(rng: &mut R, error: &str) -> String {
    let path = format!(
        "/{}/{}.{}",
        pick(rng, &MODULES),
        pick(rng, &MODULES),
        pick(rng, &EXTENSIONS)
    );
    format!(
        "File \"{}\", line {}, in {}\n    {}",
        path,
        rng.random_range(10..=100),
        pick(rng, &FUNCTIONS),
        error
    )
}
