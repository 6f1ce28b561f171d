//! Adscribe CLI - operator-side tooling for the Adscribe API.
//!
//! Screenshot composition runs locally (the server does no image
//! processing); report generation calls the API. Set ADSCRIBE_API_URL to
//! point at a non-default deployment.

use std::path::PathBuf;

use anyhow::{bail, Context};
use bytes::Bytes;
use clap::{Parser, Subcommand, ValueEnum};
use uuid::Uuid;

use adscribe_processing::{decode_screenshots, StitchAxis, StitchDirection, StitchSession};

#[derive(Parser)]
#[command(name = "adscribe", about = "Adscribe report tooling")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum AxisArg {
    Vertical,
    Horizontal,
}

impl From<AxisArg> for StitchAxis {
    fn from(axis: AxisArg) -> Self {
        match axis {
            AxisArg::Vertical => StitchAxis::Vertical,
            AxisArg::Horizontal => StitchAxis::Horizontal,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Composite several screenshots into one image
    Stitch {
        /// Screenshot files, in stacking order
        files: Vec<PathBuf>,
        /// Stitch axis
        #[arg(long, value_enum, default_value = "vertical")]
        axis: AxisArg,
        /// Move an item before composing, e.g. --move 2:up (repeatable)
        #[arg(long = "move", value_name = "INDEX:up|down")]
        moves: Vec<String>,
        /// Drop an item by index before composing (repeatable)
        #[arg(long = "drop", value_name = "INDEX")]
        drops: Vec<usize>,
        /// Output PNG path
        #[arg(short, long, default_value = "stitched.png")]
        output: PathBuf,
    },
    /// Generate a report from screenshots via the API
    Generate {
        /// Client UUID
        #[arg(long)]
        client: Uuid,
        /// Screenshot files (at most 5 are used)
        files: Vec<PathBuf>,
        /// Freeform notes for the analyst prompt
        #[arg(long)]
        notes: Option<String>,
        /// Optional CSV export to attach
        #[arg(long)]
        csv: Option<PathBuf>,
    },
}

fn parse_move(spec: &str) -> anyhow::Result<(usize, StitchDirection)> {
    let (index, direction) = spec
        .split_once(':')
        .context("move spec must look like INDEX:up or INDEX:down")?;
    let index: usize = index.parse().context("move index must be a number")?;
    let direction = match direction {
        "up" => StitchDirection::Up,
        "down" => StitchDirection::Down,
        other => bail!("unknown move direction: {}", other),
    };
    Ok((index, direction))
}

async fn read_files(paths: &[PathBuf]) -> anyhow::Result<Vec<Bytes>> {
    let mut out = Vec::with_capacity(paths.len());
    for path in paths {
        let data = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        out.push(Bytes::from(data));
    }
    Ok(out)
}

fn file_data_uri(path: &PathBuf, data: &[u8]) -> String {
    use base64::{engine::general_purpose::STANDARD, Engine};
    let media_type = match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .as_deref()
    {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        _ => "image/png",
    };
    format!("data:{};base64,{}", media_type, STANDARD.encode(data))
}

fn api_url() -> String {
    std::env::var("ADSCRIBE_API_URL").unwrap_or_else(|_| "http://localhost:4000".to_string())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_target(false).init();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Stitch {
            files,
            axis,
            moves,
            drops,
            output,
        } => {
            if files.len() < 2 {
                bail!("請至少選擇 2 張圖片");
            }

            let raw = read_files(&files).await?;
            let decoded = decode_screenshots(raw).await;

            let mut session = StitchSession::new();
            for (path, result) in files.iter().zip(decoded) {
                match result {
                    Ok(screenshot) => session.add(screenshot),
                    Err(e) => eprintln!("skipping {}: {}", path.display(), e),
                }
            }

            for spec in &moves {
                let (index, direction) = parse_move(spec)?;
                if !session.reorder(index, direction) {
                    eprintln!("move {} ignored (boundary or out of range)", spec);
                }
            }
            let mut drops = drops;
            drops.sort_unstable_by(|a, b| b.cmp(a));
            for index in drops {
                session.remove(index);
            }

            let composite = session.compose(axis.into())?;
            session.clear();

            tokio::fs::write(&output, &composite.data)
                .await
                .with_context(|| format!("Failed to write {}", output.display()))?;
            println!(
                "{} ({}x{})",
                output.display(),
                composite.width,
                composite.height
            );
        }
        Commands::Generate {
            client,
            files,
            notes,
            csv,
        } => {
            let raw = read_files(&files).await?;
            let screenshots: Vec<String> = files
                .iter()
                .zip(raw.iter())
                .map(|(path, data)| file_data_uri(path, data))
                .collect();

            let (csv_data, csv_file_name) = match csv {
                Some(path) => {
                    let data = tokio::fs::read_to_string(&path)
                        .await
                        .with_context(|| format!("Failed to read {}", path.display()))?;
                    let name = path
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned());
                    (Some(data), name)
                }
                None => (None, None),
            };

            let body = serde_json::json!({
                "clientId": client,
                "screenshots": screenshots,
                "notes": notes,
                "csvData": csv_data,
                "csvFileName": csv_file_name,
            });

            let response = reqwest::Client::new()
                .post(format!("{}/api/generate", api_url()))
                .json(&body)
                .send()
                .await
                .context("Failed to reach the Adscribe API")?;

            let status = response.status();
            let payload: serde_json::Value = response
                .json()
                .await
                .context("Failed to parse API response")?;
            if !status.is_success() {
                bail!(
                    "generation failed: {}",
                    payload
                        .get("error")
                        .and_then(|e| e.as_str())
                        .unwrap_or("unknown error")
                );
            }

            println!("{}", serde_json::to_string_pretty(&payload)?);
        }
    }

    Ok(())
}
