// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

use anyhow::{Context, bail};
use cell_inspector::{
    app,
    logging::{self, LoggingConfig},
    metrics,
    pipeline::{DecodeSession, Notation, SessionState, render},
    state::AppState,
};
use config::{Args, Command, InspectorConfig};
use std::io::Read;
use std::net::SocketAddr;
use tokio::io::{AsyncBufReadExt, BufReader};

#[cfg(not(target_os = "windows"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse_args();
    let config = InspectorConfig::from_env_file(&args.env_file)?;

    logging::init_with_config(LoggingConfig::from(&config.log))?;

    let state = AppState::new(config)?;

    match args.command {
        Command::Serve => serve(state).await,
        Command::Decode { input, format } => decode_once(&state, &input, format.as_deref()),
        Command::Watch { format } => watch(&state, format.as_deref()).await,
        Command::Schemas => {
            for message in &state.schema.messages {
                let width = message.opcode_bits.div_ceil(4);
                println!("0x{:0width$x}  {}", message.opcode, message.name, width = width);
            }
            Ok(())
        }
    }
}

async fn serve(state: AppState) -> anyhow::Result<()> {
    if state.config.metrics.enabled {
        metrics::init(&state.config.metrics.prometheus_prefix)
            .context("Failed to initialize metrics registry")?;
    }

    let addr: SocketAddr = format!("{}:{}", state.config.server.bind_host, state.config.server.port)
        .parse()
        .context("Invalid bind address")?;

    tracing::info!("Starting server on {}", addr);
    tracing::info!("Log level: {}", state.config.log.level);
    tracing::info!("Schema messages: {}", state.schema.messages.len());
    tracing::info!("Metrics enabled: {}", state.config.metrics.enabled);

    let app = app::create_app(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn notation(state: &AppState, format: Option<&str>) -> anyhow::Result<Notation> {
    match format {
        Some(f) => Ok(f.parse()?),
        None => Ok(state.default_notation),
    }
}

fn decode_once(state: &AppState, input: &str, format: Option<&str>) -> anyhow::Result<()> {
    let notation = notation(state, format)?;
    let input = if input == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read input from stdin")?;
        buf
    } else {
        input.to_string()
    };

    let output = state.pipeline.run(&input)?;
    println!("{}", render(&output, notation)?.trim_end());
    Ok(())
}

async fn watch(state: &AppState, format: Option<&str>) -> anyhow::Result<()> {
    let notation = notation(state, format)?;
    let session = DecodeSession::new(state.pipeline.clone());
    let mut updates = session.subscribe();

    let printer = tokio::spawn(async move {
        while updates.changed().await.is_ok() {
            let current = updates.borrow_and_update().clone();
            match current {
                SessionState::Idle => {}
                SessionState::Ready { ticket, output } => match render(&output, notation) {
                    Ok(text) => println!("# {}\n{}", ticket, text.trim_end()),
                    Err(e) => eprintln!("# {}: {}", ticket, e),
                },
                SessionState::Failed { ticket, message, .. } => eprintln!("# {}: {}", ticket, message),
            }
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        session.submit(line).await;
    }

    drop(session);
    if printer.await.is_err() {
        bail!("Output task panicked");
    }

    Ok(())
}
