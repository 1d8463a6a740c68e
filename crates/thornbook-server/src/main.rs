//! Thornbook server binary.
//!
//! # Usage
//!
//! ```bash
//! # Start with two invited members; their activation tokens are logged
//! thornbook-server --bind 0.0.0.0:3001 --invite maria --invite jonas
//!
//! # Stable session tokens across restarts
//! thornbook-server --token-secret "$(cat secret.txt)"
//! ```

use clap::Parser;
use rand::RngCore;
use thornbook_core::{GroupRecord, MemoryStore, RecordStore, UserRecord};
use thornbook_server::{AppState, TokenService, router};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

/// Thornbook guestbook server
#[derive(Parser, Debug)]
#[command(name = "thornbook-server")]
#[command(about = "End-to-end encrypted guestbook server")]
#[command(version)]
struct Args {
    /// Address to bind to
    #[arg(short, long, default_value = "0.0.0.0:3001")]
    bind: String,

    /// Secret for signing session tokens; random per process when omitted
    #[arg(long)]
    token_secret: Option<String>,

    /// Session token lifetime in seconds
    #[arg(long, default_value = "3600")]
    token_ttl: u64,

    /// Name of the guestbook group
    #[arg(long, default_value = "Thornbook")]
    group_name: String,

    /// Invite a member (repeatable); activation tokens are logged at startup
    #[arg(long)]
    invite: Vec<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

    tracing::info!("Thornbook server starting");

    let secret = match args.token_secret {
        Some(secret) => secret.into_bytes(),
        None => {
            tracing::warn!("No --token-secret provided - sessions will not survive a restart");
            let mut secret = vec![0u8; 32];
            rand::rngs::OsRng.fill_bytes(&mut secret);
            secret
        },
    };

    let store = MemoryStore::new();
    seed(&store, &args.group_name, &args.invite)?;

    let state = AppState::new(store, TokenService::new(&secret, args.token_ttl));
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&args.bind).await?;
    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the group and invited members, logging each activation token.
fn seed(
    store: &MemoryStore,
    group_name: &str,
    invites: &[String],
) -> Result<(), Box<dyn std::error::Error>> {
    let group = GroupRecord { id: Uuid::new_v4().to_string(), name: group_name.to_string() };
    store.put_group(&group)?;

    for name in invites {
        let token = Uuid::new_v4().simple().to_string();
        let user = UserRecord::invited(
            Uuid::new_v4().to_string(),
            name.clone(),
            group.id.clone(),
            token.clone(),
        );
        store.put_user(&user)?;

        tracing::info!(name = %name, token = %token, "invitation created");
    }

    Ok(())
}
