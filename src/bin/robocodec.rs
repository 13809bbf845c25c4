// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! # Robocodec CLI
//!
//! ## Usage
//!
//! ```sh
//! robocodec decode --type JointState --definition joint_state.msg --payload joint_state.bin
//! ```

use std::path::PathBuf;
use std::process;

use clap::{Parser as ClapParser, Subcommand};
use robocodec::{FlatMessage, Parser, DEFAULT_MAX_ARRAY_SIZE};
use serde_json::json;

#[derive(ClapParser)]
#[command(name = "robocodec")]
#[command(about = "Introspection-based decoder for ROS1 binary messages", long_about = None)]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = "ArcheBase")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a raw message buffer against a `.msg` definition and print the
    /// flattened result as JSON.
    Decode {
        /// Root message type name, e.g. "sensor_msgs/JointState".
        #[arg(long)]
        r#type: String,

        /// Path to the `.msg`-style definition text.
        #[arg(long)]
        definition: PathBuf,

        /// Path to the raw message payload bytes.
        #[arg(long)]
        payload: PathBuf,

        /// Maximum element count before a non-byte array is rejected.
        #[arg(long, default_value_t = DEFAULT_MAX_ARRAY_SIZE)]
        max_array_size: usize,
    },
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Decode {
            r#type,
            definition,
            payload,
            max_array_size,
        } => {
            let definition_text = std::fs::read_to_string(&definition)?;
            let buffer = std::fs::read(&payload)?;

            let parser = Parser::new();
            parser.register(&r#type, &r#type, &definition_text)?;

            let mut flat = FlatMessage::new();
            parser.deserialize(&r#type, &buffer, &mut flat, max_array_size)?;

            let out = json!({
                "value": flat.value.iter().map(|(p, v)| json!({"path": p, "value": v.to_string()})).collect::<Vec<_>>(),
                "name": flat.name.iter().map(|(p, v)| json!({"path": p, "value": v})).collect::<Vec<_>>(),
                "blob": flat.blob.iter().map(|(p, b)| json!({"path": p, "len": b.len()})).collect::<Vec<_>>(),
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
            Ok(())
        }
    }
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
