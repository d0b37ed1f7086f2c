use clap::{Args, Parser, Subcommand};
use serde_json::{json, Map, Value};

#[derive(Parser)]
#[command(name = "posts-cli")]
#[command(about = "Command-line client for the articles API", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every article
    List,
    /// Show one article
    Get { id: String },
    /// Create an article
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
        #[command(flatten)]
        author: AuthorArgs,
    },
    /// Change some fields of an article
    Update {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content: Option<String>,
        #[command(flatten)]
        author: AuthorArgs,
    },
    /// Delete an article
    Delete { id: String },
}

#[derive(Args)]
struct AuthorArgs {
    #[arg(long)]
    first_name: Option<String>,
    #[arg(long)]
    last_name: Option<String>,
}

impl AuthorArgs {
    fn to_json(&self) -> Option<Value> {
        if self.first_name.is_none() && self.last_name.is_none() {
            return None;
        }
        Some(json!({
            "firstName": self.first_name.clone().unwrap_or_default(),
            "lastName": self.last_name.clone().unwrap_or_default(),
        }))
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let posts = format!("{}/posts", cli.url.trim_end_matches('/'));

    let res = match cli.command {
        Commands::List => client.get(&posts).send().await?,
        Commands::Get { id } => client.get(format!("{posts}/{id}")).send().await?,
        Commands::Create { title, content, author } => {
            let body = json!({
                "title": title,
                "content": content,
                "author": author.to_json().unwrap_or_else(|| json!({})),
            });
            client.post(&posts).json(&body).send().await?
        }
        Commands::Update { id, title, content, author } => {
            let mut body = Map::new();
            body.insert("id".into(), Value::String(id.clone()));
            if let Some(title) = title {
                body.insert("title".into(), Value::String(title));
            }
            if let Some(content) = content {
                body.insert("content".into(), Value::String(content));
            }
            if let Some(author) = author.to_json() {
                body.insert("author".into(), author);
            }
            client.put(format!("{posts}/{id}")).json(&body).send().await?
        }
        Commands::Delete { id } => client.delete(format!("{posts}/{id}")).send().await?,
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;

    if !status.is_success() {
        eprintln!("Error: articles API returned status {}", status);
        if !text.is_empty() {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    if text.is_empty() {
        println!("{}", status);
        return Ok(());
    }

    let json: Value = serde_json::from_str(&text)?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
