use clap::{Parser, Subcommand};
use people_server::Person;
use serde_json::Value;

#[derive(Parser)]
#[command(name = "people-cli")]
#[command(about = "Client for the people server", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every stored person
    List,
    /// Create a person
    Add { name: String },
    /// Look up a person by name
    Get { name: String },
    /// Check that the server is up
    Ping,
    /// Run the server's health checks
    Health,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    match cli.command {
        Commands::List => {
            let res = client.get(format!("{}/people", base)).send().await?;
            print_response(res).await?;
        }
        Commands::Add { name } => {
            let res = client
                .post(format!("{}/people", base))
                .json(&Person::new(name))
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Get { name } => {
            let res = client.get(format!("{}/people/{}", base, name)).send().await?;
            print_response(res).await?;
        }
        Commands::Ping => {
            let res = client.get(format!("{}/ping", base)).send().await?;
            print_response(res).await?;
        }
        Commands::Health => {
            let res = client.get(format!("{}/health", base)).send().await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;

    if !status.is_success() {
        eprintln!("Error: server returned status {}", status);
        if !text.is_empty() {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    if text.is_empty() {
        println!("{}", status);
    } else if let Ok(json) = serde_json::from_str::<Value>(&text) {
        println!("{}", serde_json::to_string_pretty(&json)?);
    } else {
        println!("{}", text);
    }
    Ok(())
}
