//! DocDesk CLI: terminal client for the document console backend.
//!
//! Set DOCDESK_API_URL (or API_URL) and optionally DOCDESK_API_TOKEN.
//! Upload limits come from the DOCDESK_* policy variables.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use docdesk_api_client::ApiClient;
use docdesk_cli::{
    format_report, format_status_table, init_tracing, unmatched_scan_names, upload_failure,
};
use docdesk_core::{ClientConfig, UploadPolicy};
use docdesk_services::{Catalog, FileSelection, UploadSession};
use serde::Serialize;

#[derive(Parser)]
#[command(name = "docdesk", about = "DocDesk document console CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List documents already stored on the server
    Docs,
    /// Validate and upload files in one batch
    Upload {
        /// Paths of the files to upload
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Request a security scan for this filename (repeatable)
        #[arg(long = "scan", value_name = "NAME")]
        scan: Vec<String>,
        /// Validate only; print the table without submitting
        #[arg(long)]
        dry_run: bool,
    },
    /// Delete a stored document by filename
    Delete {
        /// Filename as shown by `docdesk docs`
        filename: String,
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
    /// Show the server's authentication setup
    AuthSetup,
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize response")?;
    println!("{}", out);
    Ok(())
}

/// Ask the server whether it expects credentials; keep sending them if it can't say.
async fn connect(config: &ClientConfig) -> anyhow::Result<ApiClient> {
    let client = ApiClient::from_config(config)
        .context("Failed to create API client. Check DOCDESK_API_URL (or API_URL)")?;

    match client.auth_setup().await {
        Ok(setup) => Ok(client.with_login(setup.use_login)),
        Err(e) => {
            tracing::warn!(error = %e, "Could not fetch auth setup, assuming login is in use");
            Ok(client)
        }
    }
}

async fn upload(
    client: ApiClient,
    policy: &UploadPolicy,
    files: Vec<PathBuf>,
    scan: Vec<String>,
    dry_run: bool,
) -> anyhow::Result<()> {
    let catalog = Catalog::new();
    catalog
        .refresh(&client, None)
        .await
        .context("Failed to load the document catalog")?;

    let session = UploadSession::new(catalog, policy, Arc::new(client));
    session
        .add_files(files.into_iter().map(FileSelection::path).collect())
        .await
        .context("Failed to read the selected files")?;

    let selected = session.store().snapshot().await;
    for name in unmatched_scan_names(&scan, &selected) {
        tracing::warn!(filename = %name, "--scan names no selected file, ignoring");
    }
    for candidate in &selected {
        if scan.iter().any(|name| name == candidate.filename()) {
            session.toggle_scan(candidate.id(), true).await?;
        }
    }

    print!("{}", format_status_table(&session.store().snapshot().await));
    if dry_run {
        return Ok(());
    }

    let report = session.submit(None).await?;
    println!();
    print!("{}", format_status_table(&session.store().snapshot().await));
    println!("{}", format_report(&report));

    if let Some(message) = upload_failure(&report) {
        anyhow::bail!(message);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = ClientConfig::from_env().context("Invalid client configuration")?;
    let policy = UploadPolicy::from_env().context("Invalid upload policy")?;

    match cli.command {
        Commands::Docs => {
            let client = connect(&config).await?;
            let docs = client.get_docs_info(None).await?;
            print_json(&docs)?;
        }
        Commands::Upload {
            files,
            scan,
            dry_run,
        } => {
            let client = connect(&config).await?;
            upload(client, &policy, files, scan, dry_run).await?;
        }
        Commands::Delete { filename, yes } => {
            if !yes {
                anyhow::bail!("Refusing to delete '{}' without --yes", filename);
            }
            let client = connect(&config).await?;
            let catalog = Catalog::new();
            catalog
                .delete_document(&filename, &client, None)
                .await
                .with_context(|| format!("Failed to delete '{}'", filename))?;
            print_json(&serde_json::json!({
                "success": true,
                "message": format!("Document {} deleted", filename)
            }))?;
        }
        Commands::AuthSetup => {
            let client = ApiClient::from_config(&config)?;
            let setup = client.auth_setup().await?;
            print_json(&setup)?;
        }
    }

    Ok(())
}
