// mailslayer - Compose and edit messages with an LLM
// Author: kelexine (https://github.com/kelexine)

use anyhow::Result;
use clap::Parser;
use mailslayer::cli::{edit_request, Args, AuthArgs, Command};
use mailslayer::completion::CompletionService;
use mailslayer::config::AppConfig;
use mailslayer::error::MailError;
use mailslayer::models::{Language, Mode};
use mailslayer::openai::{CompletionBackend, OpenAiClient};
use mailslayer::server::create_router;
use mailslayer::session::{Credential, Session, SessionStore};
use mailslayer::utils::logging;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Phase 1: Load configuration
    let mut config = AppConfig::load_from(args.config.as_deref())?;

    // Phase 2: Initialize logging
    logging::init(&config.logging)?;
    info!("Starting mailslayer v{}", env!("CARGO_PKG_VERSION"));

    // Phase 3: Build the OpenAI backend shared by every session
    let client = OpenAiClient::new(&config.openai)?;
    info!(
        "Using model {} at {}",
        client.model(),
        client.base_url()
    );

    match args.command.unwrap_or(Command::Serve { port: None }) {
        Command::Serve { port } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            serve(config, client).await
        }
        Command::Create { auth, style, intent } => {
            let language: Language = style.language.into();
            let request = style.into_request(Mode::Create, intent);
            let session = one_shot_session(&config, client, &auth);
            print_outcome(session.generate(request).await, language)
        }
        Command::Reply { auth, style, original } => {
            let language: Language = style.language.into();
            let request = style.into_request(Mode::Reply, original);
            let session = one_shot_session(&config, client, &auth);
            print_outcome(session.generate(request).await, language)
        }
        Command::Edit {
            auth,
            original,
            instruction,
            language,
        } => {
            let request = edit_request(original, instruction, language);
            let language = request.language;
            let session = one_shot_session(&config, client, &auth);
            print_outcome(session.edit(request).await, language)
        }
        Command::Check { auth } => {
            let key = auth
                .api_key
                .and_then(Credential::new)
                .ok_or(MailError::MissingCredential)?;
            let latency = client.check_connectivity(key.expose()).await?;
            println!("OK ({} ms)", latency.as_millis());
            Ok(())
        }
    }
}

/// A single throwaway session for the one-shot subcommands.
fn one_shot_session(config: &AppConfig, client: OpenAiClient, auth: &AuthArgs) -> Session {
    let backend: Arc<dyn CompletionBackend> = Arc::new(client);
    let credential = auth.api_key.clone().and_then(Credential::new);
    Session::new(credential, CompletionService::from_config(backend, config))
}

fn print_outcome(result: mailslayer::error::Result<String>, language: Language) -> Result<()> {
    match result {
        Ok(text) => {
            println!("{}", text);
            Ok(())
        }
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("{}", e.user_message(language));
            std::process::exit(1);
        }
    }
}

async fn serve(config: AppConfig, client: OpenAiClient) -> Result<()> {
    let config = Arc::new(config);
    let sessions = SessionStore::new(Arc::new(client), config.clone());

    if let Some(limit) = config.completion.call_timeout() {
        info!("Completion cycles time out after {}s", limit.as_secs());
    }

    info!(
        "Idle sessions close after {}s",
        config.session.idle_timeout().as_secs()
    );
    let sweeper = sessions.spawn_sweeper();

    let app = create_router(config.clone(), sessions);
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;

    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    sweeper.abort();
    info!("Server shut down gracefully");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }
}
