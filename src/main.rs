//! A command-line interface for serving and querying a kvbridge key-value service.
//!
//! For usage, run `cargo run --features binary -- --help`.

mod cli;

use crate::cli::{Args, Command, Remote};
use clap::Parser as _;
use kvbridge::client::RemoteStore;
use kvbridge::host::ServiceHost;
use kvbridge::store::{KeyValueStore, MemoryStore};
use kvbridge::structs::kv::{GetRequest, PutRequest, RemoveRequest};
use kvbridge::CancellationToken;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tokio::fs;
use tokio::io::{self, AsyncReadExt as _, AsyncWriteExt as _};
use tracing_subscriber::EnvFilter;

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    // stdout carries values, so logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let Args {
        timeout_ms,
        command,
    } = Args::parse();
    let timeout = timeout_ms.map(Duration::from_millis);

    let future = async {
        match command {
            Command::Serve { addr } => serve(addr).await,
            Command::Get { remote, key } => {
                let store = connect(remote, timeout).await?;
                get(&store, key).await
            }
            Command::Put {
                remote,
                key,
                file_path,
            } => {
                let store = connect(remote, timeout).await?;
                put(&store, key, file_path).await
            }
            Command::Remove { remote, key } => {
                let store = connect(remote, timeout).await?;
                remove(&store, key).await
            }
        }
    };

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(future)
}

/// Serve an in-memory store on `addr` until interrupted.
async fn serve(addr: SocketAddr) -> Result<ExitCode, Box<dyn std::error::Error>> {
    ServiceHost::builder()
        .store(MemoryStore::new())
        .addr(addr)
        .build()?
        .serve_until(async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                tracing::error!(%err, "unable to listen for shutdown signal");
            }
        })
        .await?;
    Ok(ExitCode::SUCCESS)
}

async fn connect(
    Remote { endpoint }: Remote,
    timeout: Option<Duration>,
) -> Result<RemoteStore, Box<dyn std::error::Error>> {
    let store = RemoteStore::connect(endpoint).await?;
    Ok(match timeout {
        Some(timeout) => store.with_timeout(timeout),
        None => store,
    })
}

/// A token that is cancelled when the user interrupts the process.
fn interrupt_token() -> CancellationToken {
    let token = CancellationToken::new();
    let _join_handle = tokio::spawn({
        let token = token.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                token.cancel();
            }
        }
    });
    token
}

/// Write the value for `key` to stdout.
async fn get(store: &RemoteStore, key: String) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let result = store
        .get_value(GetRequest { key }, interrupt_token())
        .await?;
    let Some(value) = result.into_value() else {
        return Ok(ExitCode::FAILURE);
    };

    let mut stdout = io::stdout();
    stdout.write_all(&value).await?;
    stdout.flush().await?;
    Ok(ExitCode::SUCCESS)
}

async fn put(
    store: &RemoteStore,
    key: String,
    file_path: PathBuf,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let value = read_file_or_stdin(file_path).await?;
    let result = store
        .put_value(PutRequest { key, value }, interrupt_token())
        .await?;
    Ok(if result.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

async fn remove(store: &RemoteStore, key: String) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let result = store
        .remove_value(RemoveRequest { key }, interrupt_token())
        .await?;
    Ok(if result.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Given a path, read from stdin if the path is "-". Otherwise, read the file at that path.
async fn read_file_or_stdin(file_path: PathBuf) -> io::Result<Vec<u8>> {
    if file_path == PathBuf::from("-") {
        let mut bytes = Vec::new();
        let _num_bytes = io::stdin().read_to_end(&mut bytes).await?;
        Ok(bytes)
    } else {
        fs::read(file_path).await
    }
}
