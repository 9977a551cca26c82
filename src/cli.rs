//! Command-line interface for kvbridge.

use clap::{Args as ClapArgs, Parser, Subcommand};
use kvbridge::host::DEFAULT_ADDR;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Command-line arguments for kvbridge.
#[derive(Debug, Parser)]
#[command(version, propagate_version = true)]
pub(crate) struct Args {
    /// Give up on a remote call after this many milliseconds.
    #[arg(long, global = true)]
    pub(crate) timeout_ms: Option<u64>,
    /// The operation to perform.
    #[command(subcommand)]
    pub(crate) command: Command,
}

/// What operation to perform.
#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// Serve an in-memory key-value store over gRPC.
    ///
    /// The server listens on the given address until interrupted.
    #[clap(alias = "run")]
    Serve {
        /// The address to listen on.
        #[clap(default_value_t = DEFAULT_ADDR)]
        addr: SocketAddr,
    },
    /// Get the value associated with a key and write it to stdout.
    ///
    /// If the key is not present, nothing is written and the process exits with a failure status
    /// code.
    #[clap(alias = "fetch")]
    Get {
        #[allow(clippy::missing_docs_in_private_items)]
        #[command(flatten)]
        remote: Remote,
        /// The key to look up.
        key: String,
    },
    /// Set the value for a key.
    ///
    /// If the key already exists, the value is replaced.
    #[clap(aliases = ["set", "save", "store"])]
    Put {
        #[allow(clippy::missing_docs_in_private_items)]
        #[command(flatten)]
        remote: Remote,
        /// The key to store the value under.
        key: String,
        /// The file to read the value from.
        ///
        /// If `-`, the value is read from stdin.
        file_path: PathBuf,
    },
    /// Remove the value for a key.
    ///
    /// If the key is not present, the process exits with a failure status code.
    #[clap(aliases = ["delete", "rm"])]
    Remove {
        #[allow(clippy::missing_docs_in_private_items)]
        #[command(flatten)]
        remote: Remote,
        /// The key to remove.
        key: String,
    },
}

/// Where the key-value service is running.
#[derive(Debug, ClapArgs)]
pub(crate) struct Remote {
    /// The URI of the key-value service.
    #[arg(short, long, default_value = "http://[::1]:50051")]
    pub(crate) endpoint: String,
}
