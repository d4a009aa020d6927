use clap::{Parser, Subcommand};
use serde_json::Value;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "edge-cli")]
#[command(about = "Send edge events to a running edge-adapter", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Dispatch an edge event read from a JSON file ("-" for stdin)
    Invoke {
        event: PathBuf,
        /// Send this x-request-id instead of letting the server pick one
        #[arg(long)]
        request_id: Option<String>,
    },
    /// Check that the server is up
    Health,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Invoke { event, request_id } => {
            let raw = if event.as_os_str() == "-" {
                std::io::read_to_string(std::io::stdin())?
            } else {
                std::fs::read_to_string(&event)?
            };
            let event: Value = serde_json::from_str(&raw)?;

            let mut req = client.post(format!("{}/invoke", cli.url)).json(&event);
            if let Some(id) = request_id {
                req = req.header("x-request-id", id);
            }
            print_response(req.send().await?).await?;
        }
        Commands::Health => {
            let res = client.get(format!("{}/health", cli.url)).send().await?;
            println!("{} {}", res.status(), res.text().await?);
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: edge-adapter returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    for name in ["x-request-id", "x-edge-wait-for-background"] {
        if let Some(value) = res.headers().get(name).and_then(|v| v.to_str().ok()) {
            eprintln!("{}: {}", name, value);
        }
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
