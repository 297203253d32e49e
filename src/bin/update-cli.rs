use clap::{Parser, Subcommand};
use reqwest::StatusCode;
use serde_json::Value;

#[derive(Parser)]
#[command(name = "update-cli")]
#[command(about = "Query an update server the way a desktop client would", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask for the best update for a platform and version
    Check {
        /// Platform id, e.g. linux-x86_64
        platform: String,
        /// Version currently installed
        current_version: String,
        #[arg(long, default_value = "")]
        customer: String,
        #[arg(long, default_value = "")]
        region: String,
        #[arg(long, default_value = "")]
        machine_id: String,
    },
    /// Show server health and active config generation
    Health,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    match cli.command {
        Commands::Check {
            platform,
            current_version,
            customer,
            region,
            machine_id,
        } => {
            let mut request = client.get(format!("{base}/update/{platform}/{current_version}"));
            for (name, value) in [
                ("X-CUSTOMER", customer),
                ("X-REGION", region),
                ("X-MACHINE-ID", machine_id),
            ] {
                if !value.is_empty() {
                    request = request.header(name, value);
                }
            }
            let res = request.send().await?;
            if res.status() == StatusCode::NO_CONTENT {
                println!("No update available");
                return Ok(());
            }
            print_response(res).await?;
        }
        Commands::Health => {
            let res = client.get(format!("{base}/health")).send().await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: update server returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
