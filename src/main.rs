//! # Voxel World Entry Point
//!
//! Generates the configured world and renders it into the software command-list
//! backend, logging what happened along the way.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info cargo run --release -- world.json
//! ```

fn main() {
    voxel_world::run();
}
