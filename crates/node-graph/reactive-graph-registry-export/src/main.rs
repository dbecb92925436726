//! Dump the node catalog as JSON, for editors that build their menus from it.
//!
//! Usage: `reactive-graph-registry-export [OUTPUT]`. Without OUTPUT the catalog goes to
//! stdout.

use std::fs;
use std::io::{self, Write};

use anyhow::{Context, Result};

fn main() -> Result<()> {
    let json = serde_json::to_string_pretty(&reactive_graph_core::registry())
        .context("failed to serialize node registry")?;
    match std::env::args().nth(1) {
        Some(path) => {
            fs::write(&path, json).with_context(|| format!("failed to write {path}"))?;
        }
        None => {
            let mut out = io::stdout().lock();
            writeln!(out, "{json}").context("failed to write to stdout")?;
        }
    }
    Ok(())
}
