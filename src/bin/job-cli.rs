use std::collections::HashMap;

use clap::{Parser, Subcommand};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "job-cli")]
#[command(about = "Submit jobs to a local job-proxy worker", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check whether the worker's backend is ready
    Status,
    /// Run the backend health check as a job
    Health,
    /// List models through the backend
    Models,
    /// Run an arbitrary job
    Run {
        #[arg(short, long, default_value = "GET")]
        method: String,

        #[arg(short, long, default_value = "/")]
        path: String,

        /// JSON body
        #[arg(short, long)]
        body: Option<String>,

        /// Remote file to upload as multipart
        #[arg(short, long)]
        file_url: Option<String>,

        /// Query parameter as key=value (repeatable)
        #[arg(short, long = "query", value_parser = parse_key_value)]
        query: Vec<(String, String)>,

        /// Header as key=value (repeatable)
        #[arg(short = 'H', long = "header", value_parser = parse_key_value)]
        header: Vec<(String, String)>,
    },
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected key=value, got '{}'", raw))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let input = match cli.command {
        Commands::Status => {
            let res = client.get(format!("{}/health", cli.url)).send().await?;
            return print_response(res).await;
        }
        Commands::Health => json!({ "method": "GET", "path": "/health" }),
        Commands::Models => json!({ "method": "GET", "path": "/v1/models" }),
        Commands::Run { method, path, body, file_url, query, header } => {
            let body: Value = match body {
                Some(raw) => serde_json::from_str(&raw)?,
                None => Value::Null,
            };
            json!({
                "method": method,
                "path": path,
                "body": body,
                "file_url": file_url,
                "query_params": query.into_iter().collect::<HashMap<_, _>>(),
                "headers": header.into_iter().collect::<HashMap<_, _>>(),
            })
        }
    };

    let res = client
        .post(format!("{}/runsync", cli.url))
        .json(&json!({ "input": input }))
        .send()
        .await?;
    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;
    if !status.is_success() {
        eprintln!("Error: worker returned status {}", status);
    }

    match serde_json::from_str::<Value>(&text) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) => println!("{}", text),
    }
    Ok(())
}
