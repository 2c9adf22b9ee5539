use clap::{Parser, Subcommand};
use reqwest::RequestBuilder;
use serde_json::Value;

#[derive(Parser)]
#[command(name = "wimbledon-cli")]
#[command(about = "Query a running Wimbledon finals API", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:5000")]
    url: String,

    /// Pre-shared API key (sent as X-API-Key).
    #[arg(short, long, env = "API_KEY")]
    key: Option<String>,

    /// Basic-auth username; used when no key is given.
    #[arg(long, env = "API_USERNAME")]
    user: Option<String>,

    /// Basic-auth password.
    #[arg(long, env = "API_PASSWORD")]
    password: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check service health
    Health,
    /// Show the final played in a given year
    Year { year: String },
    /// Summarise a player's finals
    Player {
        name: String,
        /// Include every final, most recent first
        #[arg(long)]
        details: bool,
    },
}

impl Cli {
    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        if let Some(key) = &self.key {
            request.header("X-API-Key", key)
        } else if let Some(user) = &self.user {
            request.basic_auth(user, self.password.as_deref())
        } else {
            request
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let request = match &cli.command {
        Commands::Health => client.get(format!("{base}/health")),
        Commands::Year { year } => cli.authorize(
            client
                .get(format!("{base}/wimbledon"))
                .query(&[("year", year)]),
        ),
        Commands::Player { name, details } => {
            let mut url = reqwest::Url::parse(&format!("{base}/wimbledon/player/"))?;
            url.path_segments_mut()
                .map_err(|_| "base URL cannot carry a path")?
                .pop_if_empty()
                .push(name);
            let mut request = client.get(url);
            if *details {
                request = request.query(&[("details", "true")]);
            }
            cli.authorize(request)
        }
    };

    let res = request.send().await?;
    let ok = print_response(res).await?;
    if !ok {
        std::process::exit(1);
    }
    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<bool, Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: API returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(false);
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(true)
}
