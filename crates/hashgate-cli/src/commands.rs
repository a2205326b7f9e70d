use std::sync::Arc;

use anyhow::Context;
use colored::Colorize;
use hashgate_crypto::compute_key_with;
use hashgate_server::{HashgateServer, ServerConfig};
use hashgate_store::InMemoryObjectStore;
use hashgate_types::ObjectKey;
use serde_json::{json, Value};

use crate::cli::*;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Serve(args) => cmd_serve(args).await,
        Command::Key(args) => cmd_key(args, &cli.format),
        Command::Config(args) => cmd_config(args, &cli.format),
    }
}

async fn cmd_serve(args: ServeArgs) -> anyhow::Result<()> {
    let mut config = ServerConfig::load(args.config.as_deref())?;
    if let Some(bind) = &args.bind {
        config.bind_addr = bind
            .parse()
            .with_context(|| format!("invalid --bind address {bind:?}"))?;
    }

    let server = if args.memory {
        tracing::warn!("using in-memory object store; objects are lost on exit");
        HashgateServer::new(config, Arc::new(InMemoryObjectStore::new()))?
    } else {
        HashgateServer::connect(config).await?
    };
    println!(
        "{} hashgate on {} (bucket: {})",
        "✓".green().bold(),
        server.config().bind_addr.to_string().bold(),
        server.config().bucket.yellow()
    );
    server.serve().await?;
    Ok(())
}

fn derive_key(args: &KeyArgs) -> anyhow::Result<ObjectKey> {
    let payload = if args.file {
        std::fs::read(&args.data).with_context(|| format!("reading {}", args.data))?
    } else {
        args.data.as_bytes().to_vec()
    };
    Ok(compute_key_with(&payload, &args.ext, &args.algorithm)?)
}

fn cmd_key(args: KeyArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let key = derive_key(&args)?;
    match format {
        OutputFormat::Text => println!("{}", key.as_str().cyan()),
        OutputFormat::Json => println!(
            "{}",
            json!({ "key": key, "algorithm": args.algorithm.to_ascii_lowercase() })
        ),
    }
    Ok(())
}

/// Config as JSON with both secrets masked.
fn redacted(config: &ServerConfig) -> anyhow::Result<Value> {
    let mut value = serde_json::to_value(config)?;
    if !config.secret_key.is_empty() {
        value["secret_key"] = json!("<redacted>");
    }
    if config.s3.secret_access_key.is_some() {
        value["s3"]["secret_access_key"] = json!("<redacted>");
    }
    Ok(value)
}

fn cmd_config(args: ConfigArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let config = ServerConfig::load(args.config.as_deref())?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&redacted(&config)?)?),
        OutputFormat::Text => {
            println!("bind_addr: {}", config.bind_addr.to_string().bold());
            let bucket = if config.bucket.is_empty() {
                "(not set)".red().to_string()
            } else {
                config.bucket.yellow().to_string()
            };
            println!("bucket: {bucket}");
            println!("endpoint: {}", config.s3.endpoint_url.as_deref().unwrap_or("(aws default)"));
            println!("region: {}", config.s3.region.as_deref().unwrap_or("(aws default)"));
            println!("algorithm: {}", config.algorithm.to_string().cyan());
            println!("content_type: {}", config.content_type);
            println!("max_concurrent_requests: {}", config.max_concurrent_requests);
            println!("request_timeout_secs: {}", config.request_timeout_secs);
            match config.validate() {
                Ok(()) => println!("{} configuration is complete", "✓".green().bold()),
                Err(e) => println!("{} {e}", "✗".red().bold()),
            }
        }
    }
    Ok(())
}
