//! Verigate CLI: pre-check local media files against a project's metadata
//! requirements, or run the full submission gate and submit.
//!
//! Set VERIGATE_API_URL (or pass --api-url) when talking to a server.

use anyhow::{bail, Context};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use uuid::Uuid;
use verigate_cli::{guess_content_type, init_tracing, render_verdict};
use verigate_client::{Identity, SelectedFile, SubmissionGate};
use verigate_core::models::{ProjectConfig, SubmitResponse};
use verigate_processing::MetadataExtractor;

#[derive(Parser)]
#[command(name = "verigate", about = "Media verification CLI")]
struct Cli {
    /// API base URL (or VERIGATE_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// ffprobe binary used for video metadata
    #[arg(long, global = true, default_value = "ffprobe")]
    ffprobe: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check local files against a project's requirements without submitting
    Check {
        /// Project UUID, fetched from the API
        #[arg(long, conflicts_with = "config")]
        project: Option<Uuid>,
        /// Local project config JSON, for offline checking
        #[arg(long)]
        config: Option<PathBuf>,
        /// Files to check
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Run the submission gate over local files and submit the passing set
    Submit {
        /// Project UUID
        #[arg(long)]
        project: Uuid,
        /// Submitter name
        #[arg(long)]
        name: String,
        /// Submitter email
        #[arg(long)]
        email: String,
        /// Submitter user ID (digits only)
        #[arg(long)]
        user_id: String,
        /// Files to submit
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

/// Wire shape of GET /api/projects/{id}.
#[derive(Deserialize)]
struct ProjectResponse {
    name: String,
    config: ProjectConfig,
}

fn api_url(cli_value: Option<String>) -> anyhow::Result<String> {
    cli_value
        .or_else(|| std::env::var("VERIGATE_API_URL").ok())
        .map(|url| url.trim_end_matches('/').to_string())
        .context("API URL required. Pass --api-url or set VERIGATE_API_URL")
}

async fn fetch_project(base_url: &str, id: Uuid) -> anyhow::Result<ProjectResponse> {
    let url = format!("{}/api/projects/{}", base_url, id);
    let response = reqwest::get(&url).await.context("Request failed")?;
    if !response.status().is_success() {
        bail!("GET {} returned {}", url, response.status());
    }
    response.json().await.context("Unreadable project response")
}

fn load_selected_file(path: &Path) -> anyhow::Result<SelectedFile> {
    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("Bad file name: {}", path.display()))?
        .to_string();
    let data = std::fs::read(path).with_context(|| format!("Cannot read {}", path.display()))?;
    let last_modified: DateTime<Utc> = std::fs::metadata(path)
        .and_then(|m| m.modified())
        .map(DateTime::from)
        .unwrap_or_else(|_| Utc::now());

    Ok(SelectedFile {
        content_type: guess_content_type(&filename).to_string(),
        filename,
        size: data.len() as u64,
        last_modified,
        data: Bytes::from(data),
    })
}

async fn run_check(
    config: ProjectConfig,
    project_name: Option<String>,
    files: Vec<PathBuf>,
    ffprobe: String,
) -> anyhow::Result<()> {
    if let Some(name) = project_name {
        println!("Project: {}", name);
    }

    let extractor = MetadataExtractor::new(ffprobe);
    let mut hard_passing = 0usize;
    let total = files.len();

    for path in files {
        let file = load_selected_file(&path)?;
        let metadata = extractor
            .extract(&file.filename, &file.content_type, &file.data)
            .await;
        let verdict = verigate_core::evaluate(&metadata, &config.metadata_requirements);
        if verdict.hard_pass {
            hard_passing += 1;
        }
        print!("{}", render_verdict(&file.filename, &verdict));
    }

    println!(
        "\n{} of {} files pass required checks (project needs {})",
        hard_passing, total, config.required_files
    );
    if hard_passing < config.required_files as usize {
        bail!("Not enough passing files for submission");
    }
    Ok(())
}

async fn run_submit(
    base_url: String,
    project: Uuid,
    identity: Identity,
    files: Vec<PathBuf>,
    ffprobe: String,
) -> anyhow::Result<()> {
    let fetched = fetch_project(&base_url, project).await?;
    println!("Project: {}", fetched.name);

    let mut gate = SubmissionGate::new(fetched.config, MetadataExtractor::new(ffprobe));

    let mut batch = Vec::with_capacity(files.len());
    for path in &files {
        batch.push(load_selected_file(path)?);
    }
    let outcome = gate.add_files(batch).await;
    if let Some(message) = &outcome.message {
        println!("{}", message);
    }
    for pending in gate.queue() {
        print!("{}", render_verdict(&pending.file.filename, &pending.verdict));
    }

    let payload = gate
        .build_payload(&identity)
        .map_err(|errors| anyhow::anyhow!("Not eligible to submit:\n  {}", errors.join("\n  ")))?;

    let url = format!("{}/api/verify/{}", base_url, project);
    let response = reqwest::Client::new()
        .post(&url)
        .json(&payload)
        .send()
        .await
        .context("Submit request failed")?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        bail!("POST {} returned {}: {}", url, status, body);
    }

    let result: SubmitResponse = response.json().await.context("Unreadable submit response")?;
    println!(
        "Submitted {} files: submission {} (email sent: {})",
        payload.files.len(),
        result.submission_id,
        result.email_sent
    );
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Check {
            project,
            config,
            files,
        } => {
            let (config, project_name) = match (project, config) {
                (_, Some(path)) => {
                    let raw = std::fs::read_to_string(&path)
                        .with_context(|| format!("Cannot read {}", path.display()))?;
                    let config: ProjectConfig =
                        serde_json::from_str(&raw).context("Unreadable project config")?;
                    (config, None)
                }
                (Some(id), None) => {
                    let base_url = api_url(cli.api_url)?;
                    let fetched = fetch_project(&base_url, id).await?;
                    (fetched.config, Some(fetched.name))
                }
                (None, None) => bail!("Pass either --project or --config"),
            };
            run_check(config, project_name, files, cli.ffprobe).await
        }
        Commands::Submit {
            project,
            name,
            email,
            user_id,
            files,
        } => {
            let base_url = api_url(cli.api_url)?;
            let identity = Identity {
                name,
                email,
                user_id,
            };
            run_submit(base_url, project, identity, files, cli.ffprobe).await
        }
    }
}
