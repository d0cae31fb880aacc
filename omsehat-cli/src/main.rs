//! omsehat CLI: interactive health-assistant chat and doctor directory
//! listing. Config from env (.env supported) and optional CLI args.

use std::io::{self, BufRead, Write};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chat_orchestrator::{ChatOrchestrator, SubmitOutcome};
use clap::{Parser, Subcommand};
use completion_client::{GeminiCompletionService, GeminiConfig};
use doctor_monitor::{filter_doctors, DoctorDirectoryClient, DEFAULT_ENDPOINT};
use omsehat_core::{ImageAttachment, Message, Sender};
use tracing::info;

#[derive(Parser)]
#[command(name = "omsehat")]
#[command(about = "Om Sehat CLI: chat with the AI health assistant, list doctors", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive chat with the AI health assistant (GEMINI_API_KEY from env).
    Chat {
        /// Model override (default from GEMINI_MODEL, else gemini-2.5-flash).
        #[arg(short, long)]
        model: Option<String>,
        /// Delay in milliseconds before the assistant reply is shown
        /// (default from TYPING_DELAY_MS, else 1000).
        #[arg(long)]
        typing_delay_ms: Option<u64>,
    },
    /// Fetch and print the doctor directory.
    Doctors {
        /// Filter by name, specialty, or room number.
        #[arg(short, long)]
        search: Option<String>,
        /// Endpoint override (default from DOCTORS_ENDPOINT, else the public one).
        #[arg(long)]
        endpoint: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    omsehat_core::init_tracing("omsehat.log", "info")?;

    let cli = Cli::parse();
    match cli.command {
        Commands::Chat {
            model,
            typing_delay_ms,
        } => run_chat(model, typing_delay_ms).await,
        Commands::Doctors { search, endpoint } => run_doctors(search, endpoint).await,
    }
}

/// Resolves the typing delay: CLI arg, then TYPING_DELAY_MS, then 1000 ms.
fn resolve_typing_delay(arg: Option<u64>, env_value: Option<String>) -> Duration {
    let ms = arg
        .or_else(|| env_value.and_then(|v| v.parse().ok()))
        .unwrap_or(1000);
    Duration::from_millis(ms)
}

async fn run_chat(model: Option<String>, typing_delay_ms: Option<u64>) -> Result<()> {
    let mut config = GeminiConfig::from_env()?;
    if let Some(model) = model {
        config.model = model;
    }
    let typing_delay =
        resolve_typing_delay(typing_delay_ms, std::env::var("TYPING_DELAY_MS").ok());
    info!(model = %config.model, ?typing_delay, "starting chat session");

    let service = GeminiCompletionService::from_config(&config);
    let orchestrator = ChatOrchestrator::new(Arc::new(service))
        .with_typing_delay(typing_delay)
        .with_welcome();

    if let Some(welcome) = orchestrator.messages().last() {
        print_message(welcome);
    }
    println!("Perintah: /image <path>, /drop-image, /quit");

    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();

        if line == "/quit" || line == "/exit" {
            break;
        }
        if let Some(path) = line.strip_prefix("/image ") {
            if let Err(err) = stage_image(&orchestrator, path.trim()) {
                println!("{err:#}");
            }
            continue;
        }
        if line == "/drop-image" {
            orchestrator.remove_attached_image();
            println!("Lampiran dihapus.");
            continue;
        }

        match orchestrator.submit(line).await {
            SubmitOutcome::Exchanged => {
                if let Some(reply) = orchestrator.messages().last() {
                    print_message(reply);
                }
            }
            SubmitOutcome::Ignored => {}
            SubmitOutcome::Busy => println!("Masih menunggu balasan sebelumnya..."),
        }
    }
    Ok(())
}

fn print_message(message: &Message) {
    let who = match message.sender {
        Sender::User => "Anda",
        Sender::Assistant => "Om SAPA",
    };
    println!(
        "[{}] {}: {}",
        message.timestamp.format("%H:%M:%S"),
        who,
        message.text
    );
}

/// Reads the file and stages it on the orchestrator. Non-image media types
/// are rejected by the orchestrator and reported here.
fn stage_image(orchestrator: &ChatOrchestrator, path: &str) -> Result<()> {
    let path = Path::new(path);
    let bytes =
        std::fs::read(path).with_context(|| format!("cannot read {}", path.display()))?;
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("attachment")
        .to_string();
    let mime_type = mime_for_path(path).unwrap_or("application/octet-stream");

    let attachment = ImageAttachment {
        file_name: file_name.clone(),
        mime_type: mime_type.to_string(),
        bytes,
    };
    if orchestrator.attach_image(attachment) {
        println!("Gambar dilampirkan: {file_name}");
    } else {
        println!("Bukan berkas gambar: {file_name}");
    }
    Ok(())
}

/// Media type from the file extension; None when it is not a known image type.
fn mime_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

async fn run_doctors(search: Option<String>, endpoint: Option<String>) -> Result<()> {
    let endpoint = endpoint
        .or_else(|| std::env::var("DOCTORS_ENDPOINT").ok())
        .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
    let client = DoctorDirectoryClient::with_endpoint(endpoint);

    let doctors = client.fetch_doctors().await?;
    let doctors = match search {
        Some(query) => filter_doctors(&doctors, &query),
        None => doctors,
    };

    if doctors.is_empty() {
        println!("Tidak ada dokter ditemukan.");
        return Ok(());
    }
    for doctor in &doctors {
        println!(
            "{} | {} | Ruang {} | {}",
            doctor.name, doctor.specialty, doctor.roomno, doctor.email
        );
    }
    Ok(())
}
