use anyhow::Result;
use dashboard::cli::{parse_args, USAGE};
use dashboard::{Dashboard, ErrorRouter, StderrChannel};
use scenario_client::ClientConfig;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let filter = || {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
    };
    let json_logging = std::env::var("RUST_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    // stdout carries the result document only
    if json_logging {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter())
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter())
            .with_writer(std::io::stderr)
            .init();
    }

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "--help" || a == "-h") {
        println!("{}", USAGE);
        return Ok(());
    }
    let request = match parse_args(&args) {
        Ok(request) => request,
        Err(e) => {
            eprintln!("Error: {:#}\n\n{}", e, USAGE);
            std::process::exit(2);
        }
    };

    let config = ClientConfig::from_env();
    tracing::info!(
        "Sending {} request to {} (timeout {:?})",
        request.operation(),
        config.base_url,
        config.timeout
    );

    let mut dashboard = Dashboard::new(&config, ErrorRouter::new(StderrChannel))?;
    match dashboard.execute(request).await {
        Some(view) => {
            println!("{}", serde_json::to_string_pretty(&view)?);
            Ok(())
        }
        None => std::process::exit(1),
    }
}
