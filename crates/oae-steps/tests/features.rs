//! Runs the bundled feature files against a live server.
//!
//! The target comes from the `OAE_*` environment variables:
//!
//! ```text
//! OAE_SERVER_URL=http://localhost:8080 cargo test -p oae-steps --features live-server --test features
//! ```

use cucumber::World as _;
use oae_steps::OaeWorld;

#[tokio::main]
async fn main() {
    OaeWorld::cucumber()
        .max_concurrent_scenarios(1)
        .run_and_exit(concat!(env!("CARGO_MANIFEST_DIR"), "/features"))
        .await;
}
