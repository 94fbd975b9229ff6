//! a2a-bridge - session-aware bridge to a remote A2A agent
//!
//! ## Usage
//!
//! ```bash
//! # Expose the remote agent as a local A2A endpoint
//! A2A_AGENT_URL=http://kagent:8083/api/a2a/kagent/homelab a2a-bridge serve
//!
//! # Talk to it from the terminal
//! A2A_AGENT_URL=http://kagent:8083/api/a2a/kagent/homelab a2a-bridge chat
//! ```

use std::{collections::VecDeque, io::Write, sync::Arc, time::Duration};

use a2a_bridge::{
    bridge::{compose_prompt, is_reset_command, AgentBridge, ChatLine, ERROR_REPLY},
    chunk::DEFAULT_MAX_MESSAGE_LENGTH,
    client::{A2AClientBuilder, A2AService},
    server::{
        config::{DEFAULT_HOST, DEFAULT_PORT},
        serve, RelayProcessor, ServerConfig,
    },
    session::InMemorySessionStore,
    transport::HttpTransport,
};
use clap::{Args, Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use url::Url;

type HttpBridge = AgentBridge<A2AService<HttpTransport>>;

/// Session-aware bridge to a remote A2A agent
#[derive(Parser, Debug)]
#[command(name = "a2a-bridge")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    remote: RemoteArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
struct RemoteArgs {
    /// Base URL of the remote agent
    #[arg(long, env = "A2A_AGENT_URL")]
    agent_url: Url,

    /// Bearer token passed through to the remote agent
    #[arg(long, env = "A2A_API_TOKEN", hide_env_values = true)]
    api_token: Option<String>,

    /// Upper bound for one agent call, delegation chains included
    #[arg(long, env = "A2A_TIMEOUT_SECS", default_value_t = 300,
          value_parser = clap::value_parser!(u64).range(1..))]
    timeout_secs: u64,

    /// Longest reply chunk handed to the chat surface
    #[arg(long, env = "MAX_MESSAGE_LENGTH", default_value_t = DEFAULT_MAX_MESSAGE_LENGTH)]
    max_message_length: usize,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the remote agent as a local A2A JSON-RPC endpoint
    Serve {
        #[arg(long, env = "A2A_HOST", default_value = DEFAULT_HOST)]
        host: String,

        #[arg(long, env = "A2A_PORT", default_value_t = DEFAULT_PORT)]
        port: u16,

        /// URL advertised on the agent card
        #[arg(long, env = "A2A_BASE_URL")]
        base_url: Option<String>,

        /// Agent name on the card
        #[arg(long, env = "BOT_NAME", default_value = "A2A Bridge")]
        name: String,
    },
    /// Chat with the remote agent from the terminal
    Chat {
        /// Earlier lines sent along with each message
        #[arg(long, env = "HISTORY_LIMIT", default_value_t = 5)]
        history_limit: usize,

        /// Name the agent sees for you
        #[arg(long, env = "USER", default_value = "user")]
        user: String,

        /// Conversation the remote session is kept under
        #[arg(long, default_value = "console")]
        conversation: String,
    },
}

fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();
}

fn build_bridge(remote: &RemoteArgs) -> anyhow::Result<HttpBridge> {
    anyhow::ensure!(
        remote.max_message_length > 0,
        "MAX_MESSAGE_LENGTH must be greater than zero"
    );

    let mut builder = A2AClientBuilder::new_http(remote.agent_url.clone())
        .with_timeout(Duration::from_secs(remote.timeout_secs));
    if let Some(token) = remote.api_token.as_deref().filter(|t| !t.trim().is_empty()) {
        builder = builder.with_bearer_auth(token);
    }
    let client = builder.build()?;

    tracing::info!(
        agent_url = %client.config().agent_url,
        timeout_secs = remote.timeout_secs,
        "Remote agent configured"
    );

    Ok(AgentBridge::new(client, Arc::new(InMemorySessionStore::new()))
        .with_max_message_length(remote.max_message_length))
}

async fn chat(
    bridge: HttpBridge,
    user: String,
    history_limit: usize,
    conversation: String,
) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut recent: VecDeque<ChatLine> = VecDeque::with_capacity(history_limit);

    println!("Connected. Type !reset to start a fresh session, Ctrl-D to quit.");
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let content = match line.trim() {
            "" => "Hello!",
            text => text,
        };

        let turn = if is_reset_command(content) {
            recent.clear();
            bridge.handle_turn(&conversation, content).await
        } else {
            let prompt = compose_prompt(&recent, &user, content);
            recent.push_back(ChatLine::new(user.as_str(), content));
            while recent.len() > history_limit {
                recent.pop_front();
            }
            bridge.handle_turn(&conversation, &prompt).await
        };

        match turn {
            Ok(chunks) => {
                for chunk in chunks {
                    println!("{}\n", chunk);
                }
            }
            Err(e) => {
                tracing::error!(conversation = %conversation, error = %e, "Error processing message");
                println!("{}\n", ERROR_REPLY);
            }
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let bridge = build_bridge(&cli.remote)?;

    match cli.command {
        Commands::Serve {
            host,
            port,
            base_url,
            name,
        } => {
            let config = ServerConfig::default()
                .with_bind(host, port)
                .with_base_url(base_url)
                .with_name(name);
            let processor = RelayProcessor::new(Arc::new(bridge), tokio::runtime::Handle::current());
            serve(config, Arc::new(processor)).await
        }
        Commands::Chat {
            history_limit,
            user,
            conversation,
        } => chat(bridge, user, history_limit, conversation).await,
    }
}
