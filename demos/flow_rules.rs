//! Flow-rule demo: a rate-limit rule list kept live from an in-process store.
//!
//! Run with `cargo run --example flow_rules`.

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use tracing::info;

use rivulet::{LiveSource, decode, store::MemoryStore, store::StoreHandle};

#[derive(Debug, Clone, Deserialize)]
struct FlowRule {
    resource: String,
    count: u32,
}

#[tokio::main]
async fn main() -> Result<(), rivulet::SourceError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let store = MemoryStore::new();
    store
        .set("flow-rules", r#"[{"resource":"foo","count":10}]"#)
        .await;

    let handle: Arc<dyn StoreHandle> = Arc::new(store.clone());
    let source = LiveSource::start(
        handle,
        "flow-rules",
        "flow-rules-channel",
        decode::json::<Vec<FlowRule>>(),
    )
    .await?;

    print_rules("after initial load", source.get());

    store
        .set_then_publish(
            "flow-rules",
            "flow-rules-channel",
            r#"[{"resource":"foo","count":20}]"#,
        )
        .await;
    tokio::time::sleep(Duration::from_millis(50)).await;
    print_rules("after publish", source.get());

    store.publish("flow-rules-channel", "{ not json").await;
    tokio::time::sleep(Duration::from_millis(50)).await;
    print_rules("after malformed publish", source.get());

    source.close().await;
    Ok(())
}

fn print_rules(stage: &str, rules: Option<Vec<FlowRule>>) {
    match rules {
        Some(rules) => {
            for rule in rules {
                info!("{stage}: resource={} count={}", rule.resource, rule.count);
            }
        }
        None => info!("{stage}: no rules loaded"),
    }
}
