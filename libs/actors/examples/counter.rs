//! Counter actors served by the in-process runtime
//!
//! ```text
//! cargo run -p actor-rpc --example counter -- --config rpc.toml --name alice
//! ```
//!
//! `ACTOR_RPC_LOGGING__LEVEL=debug` shows lookups, dispatch and retries.

use actor_config::{init_tracing, RpcConfig};
use actor_rpc::{actor_interface, ActorDispatcher, DispatchError, LocalRuntime, RpcNamespace};
use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Counter to increment
    #[arg(short, long, default_value = "alice")]
    name: String,

    /// Number of increments
    #[arg(long, default_value_t = 3)]
    times: u32,
}

#[derive(Default)]
struct Counter {
    value: AtomicU64,
}

impl Counter {
    async fn increment(self: Arc<Self>, _: ()) -> Result<u64, DispatchError> {
        Ok(self.value.fetch_add(1, Ordering::SeqCst) + 1)
    }

    async fn add(self: Arc<Self>, (amount,): (u64,)) -> Result<u64, DispatchError> {
        Ok(self.value.fetch_add(amount, Ordering::SeqCst) + amount)
    }

    async fn get(self: Arc<Self>, _: ()) -> Result<u64, DispatchError> {
        Ok(self.value.load(Ordering::SeqCst))
    }
}

actor_interface! {
    struct CounterClient {
        fn increment() -> u64;
        fn add(amount: u64) -> u64;
        fn get() -> u64;
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = RpcConfig::load(args.config.as_deref())?;
    init_tracing(&config.logging)?;

    let runtime = LocalRuntime::new("counters", |_| {
        ActorDispatcher::new(Counter::default())
            .method("increment", Counter::increment)
            .method("add", Counter::add)
            .method("get", Counter::get)
    });
    let namespace = RpcNamespace::from_config(runtime, &config)?;

    let counter = CounterClient::from(namespace.get(args.name.as_str())?);
    let bob = CounterClient::from(namespace.get("bob")?);

    for _ in 0..args.times {
        let value = counter.increment().await.context("increment counter")?;
        info!(name = %args.name, value, "counter incremented");
    }
    bob.add(40).await.context("add to bob")?;
    bob.increment().await.context("increment bob")?;

    // Same name, same actor
    let again = CounterClient::from(namespace.get(args.name.as_str())?);
    info!(
        counter = again.get().await?,
        bob = bob.get().await?,
        actors = namespace.inner().instance_count(),
        "final counts"
    );

    Ok(())
}
