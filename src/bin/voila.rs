//! Voila CLI
//!
//! Command-line driver for a Voila data file.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};
use voila::{replay, Config, StorageEngine, SyncStrategy};

/// Voila CLI
#[derive(Parser, Debug)]
#[command(name = "voila")]
#[command(about = "Minimal append-only key-value store")]
#[command(version)]
struct Args {
    /// Data file
    #[arg(short, long, default_value = "voila.db")]
    db: PathBuf,

    /// fsync after every insert
    #[arg(long)]
    sync_every_write: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Insert a key-value pair
    Insert {
        /// The key to insert
        key: String,

        /// The value to insert
        value: String,
    },

    /// Get a value by key
    Get {
        /// The key to get
        key: String,
    },

    /// Check whether a key exists
    Exists {
        /// The key to check
        key: String,
    },

    /// List all keys
    Keys,

    /// Show replay statistics for the data file
    Stats,

    /// Scan the data file without modifying it
    Verify,

    /// Insert sample data and read it back
    Demo,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt().with_env_filter(filter).with_target(true).init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> voila::Result<()> {
    let sync_strategy = if args.sync_every_write {
        SyncStrategy::EveryWrite
    } else {
        SyncStrategy::OnClose
    };
    let config = Config::builder()
        .path(&args.db)
        .sync_strategy(sync_strategy)
        .build();

    match args.command {
        Commands::Insert { key, value } => with_db(config, |db| {
            db.insert(&key, value.as_bytes())?;
            println!("OK");
            Ok(())
        }),
        Commands::Get { key } => with_db(config, |db| {
            let value = db.get(&key)?;
            println!("{}", String::from_utf8_lossy(&value));
            Ok(())
        }),
        Commands::Exists { key } => with_db(config, |db| {
            println!("{}", db.exists(&key));
            Ok(())
        }),
        Commands::Keys => with_db(config, |db| {
            for key in db.keys() {
                println!("{}", String::from_utf8_lossy(&key));
            }
            Ok(())
        }),
        Commands::Stats => with_db(config, |db| {
            print_stats(&db.replay_stats());
            println!("write cursor:     {}", db.write_cursor());
            Ok(())
        }),
        Commands::Verify => {
            let stats = replay::verify(&args.db)?;
            print_stats(&stats);
            if stats.has_torn_tail() {
                println!("data file has a partial trailing record");
            }
            Ok(())
        }
        Commands::Demo => with_db(config, demo),
    }
}

/// Open the data file, run `f`, then close it
fn with_db(
    config: Config,
    f: impl FnOnce(&mut StorageEngine) -> voila::Result<()>,
) -> voila::Result<()> {
    let mut db = StorageEngine::open_with(config)?;
    f(&mut db)?;
    db.close()
}

fn demo(db: &mut StorageEngine) -> voila::Result<()> {
    println!("Inserting data...");
    let data: [(&str, &[u8]); 4] = [
        ("name", b"Voila Database"),
        ("version", b"1.0.0"),
        ("author", b"Your Name"),
        ("binary", &[0x48, 0x65, 0x6c, 0x6c, 0x6f]),
    ];
    for (key, value) in data {
        db.insert(key, value)?;
        println!("✓ Inserted {}", key);
    }

    println!("\nRetrieving data...");
    for key in db.keys() {
        let value = db.get(&key)?;
        let key = String::from_utf8_lossy(&key);
        if key == "binary" {
            println!("Key: {} -> Value: {:?} (binary)", key, value);
        } else {
            println!("Key: {} -> Value: {}", key, String::from_utf8_lossy(&value));
        }
    }

    println!("\nChecking key existence...");
    for key in ["name", "nonexistent", "version"] {
        println!("Key '{}' exists: {}", key, db.exists(key));
    }

    println!("\nData will persist between runs - try running this again!");
    Ok(())
}

fn print_stats(stats: &voila::ReplayStats) {
    println!("records replayed: {}", stats.records_replayed);
    println!("keys indexed:     {}", stats.keys_indexed);
    println!("records shadowed: {}", stats.records_shadowed);
    println!("end offset:       {}", stats.end_offset);
    println!("trailing bytes:   {}", stats.trailing_bytes);
    println!("truncated:        {}", stats.was_truncated);
}
