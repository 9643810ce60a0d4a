use std::process::ExitCode;

use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "storefront-cli")]
#[command(about = "Command line client for the Storefront API", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8000")]
    url: String,

    /// Admin bearer token, used by `stats`.
    #[arg(short, long, env = "ADMIN_API_KEY")]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check service health
    Health {
        #[arg(long)]
        detailed: bool,
    },
    /// List one page of products
    Products {
        #[arg(long, default_value_t = 1)]
        page: u64,
        #[arg(long, default_value_t = 10)]
        page_size: u64,
    },
    /// Show a single product
    Product { id: u64 },
    /// Show admin statistics
    Stats,
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let request = match cli.command {
        Commands::Health { detailed } => {
            let path = if detailed { "health/detailed" } else { "health" };
            client.get(format!("{base}/api/v1/{path}"))
        }
        Commands::Products { page, page_size } => client
            .get(format!("{base}/api/v1/products"))
            .query(&[("page", page), ("page_size", page_size)]),
        Commands::Product { id } => client.get(format!("{base}/api/v1/products/{id}")),
        Commands::Stats => {
            let mut headers = HeaderMap::new();
            if let Some(token) = &cli.token {
                headers.insert(AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {token}"))?);
            }
            client.get(format!("{base}/api/v1/admin/stats")).headers(headers)
        }
    };

    print_envelope(request.send().await?).await
}

async fn print_envelope(res: reqwest::Response) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let status = res.status();
    let body: Value = res.json().await?;

    if succeeded(&body) {
        println!("{}", serde_json::to_string_pretty(&body)?);
        return Ok(ExitCode::SUCCESS);
    }

    eprintln!("Error {}: {}", status.as_u16(), body["message"].as_str().unwrap_or("unknown error"));
    if let Some(errors) = body.get("errors") {
        eprintln!("{}", serde_json::to_string_pretty(errors)?);
    }
    Ok(ExitCode::FAILURE)
}

/// Whether `body` is an envelope reporting success.
fn succeeded(body: &Value) -> bool {
    body["success"].as_bool() == Some(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_envelope() {
        assert!(succeeded(&json!({"success": true, "message": "ok", "status_code": 200})));
    }

    #[test]
    fn test_error_envelope_fails() {
        assert!(!succeeded(&json!({"success": false, "message": "Not Found", "status_code": 404})));
    }

    #[test]
    fn test_non_envelope_body_fails() {
        assert!(!succeeded(&json!({"detail": "oops"})));
    }
}
