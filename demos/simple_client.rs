use std::{sync::Arc, time::Duration};

use futures::StreamExt;
use a2a_bridge::{
    client::{classify, Signal},
    prelude::*,
};

// Configuration - update these to match your agent
const AGENT_URL: &str = "http://localhost:8083/api/a2a/kagent/homelab";
const AUTH_TOKEN: &str = "your-auth-token";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    println!("A2A Bridge Simple Client Example\n");

    let client = A2AClientBuilder::new_http(AGENT_URL.parse()?)
        .with_bearer_auth(AUTH_TOKEN)
        .with_timeout(Duration::from_secs(300))
        .build()?;

    // Step 1: Discover the agent
    let card = match client.discover().await {
        Ok(card) => {
            println!("Connected to: {}", card.name);
            println!("  Description: {}", card.description);
            println!("  Streaming: {}", card.capabilities.streaming);
            println!();
            card
        }
        Err(e) => {
            eprintln!("Failed to discover agent: {e}\n\nMake sure AGENT_URL points to a running A2A agent");
            return Ok(());
        }
    };

    // Step 2: Watch the raw events of one message
    let client = client.with_rpc_url(Some(card.url.clone()));
    let mut events = client
        .message_events(Message::user("Are all nodes ready?"), card.capabilities.streaming)
        .await?;

    while let Some(event) = events.next().await {
        for signal in classify(&event?) {
            match signal {
                Signal::Text(text) => println!("  text: {text}"),
                Signal::ContextUpdate(context_id) => println!("  context: {context_id}"),
                Signal::Progress(state) => println!("  state: {state}"),
                Signal::Terminal(state) => println!("  finished: {state}"),
            }
        }
    }

    // Step 3: Hold a two-turn conversation through the bridge
    let bridge = AgentBridge::new(client, Arc::new(InMemorySessionStore::new()));
    for text in ["Which node has the most pods?", "And how much memory is it using?"] {
        println!("\n> {text}");
        for chunk in bridge.handle_turn("demo", text).await? {
            println!("{chunk}");
        }
    }

    Ok(())
}
