use ats_client::cli::table::{list_to_table, render_table};
use ats_client::logging;
use ats_client::{default_config_path, AuthArgs, ClientApp, ClientResult, GlobalArgs, RequestOptions};
use clap::{Parser, Subcommand, ValueEnum};
use log::debug;
use reqwest::blocking::Response;
use serde_json::{Map, Value};
use std::process;

const APP_NAME: &str = "ats";

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Output format for list results
#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Bordered text table
    Table,
    /// Pretty-printed JSON
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Send a GET request and print the response body
    Get {
        #[command(flatten)]
        auth: AuthArgs,
        /// Path segments joined onto the server URL
        #[arg(required = true)]
        path: Vec<String>,
    },
    /// Send a POST request and print the response body
    Post {
        #[command(flatten)]
        auth: AuthArgs,
        /// JSON request body
        #[arg(long)]
        json: Option<String>,
        /// Path segments joined onto the server URL
        #[arg(required = true)]
        path: Vec<String>,
    },
    /// Send a PUT request and print the response body
    Put {
        #[command(flatten)]
        auth: AuthArgs,
        /// JSON request body
        #[arg(long)]
        json: Option<String>,
        /// Path segments joined onto the server URL
        #[arg(required = true)]
        path: Vec<String>,
    },
    /// Send a DELETE request and print the response body
    Delete {
        #[command(flatten)]
        auth: AuthArgs,
        /// Path segments joined onto the server URL
        #[arg(required = true)]
        path: Vec<String>,
    },
    /// GET a list of objects and print it as a table
    List {
        #[command(flatten)]
        auth: AuthArgs,
        /// Output format
        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
        /// Path segments joined onto the server URL
        #[arg(required = true)]
        path: Vec<String>,
    },
}

fn main() {
    let cli = Cli::parse();
    logging::init_from_args(&cli.global).ok();

    if let Err(e) = run(cli) {
        eprintln!("error: {}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> ClientResult<()> {
    let app = ClientApp::initialize(&cli.global, default_config_path(APP_NAME))?;
    debug!("Server URL: {}", app.server_url());

    match cli.command {
        Commands::Get { auth, path } => {
            let response = app.context(&auth)?.get(&path, RequestOptions::new())?;
            print_body(response)
        }
        Commands::Post { auth, json, path } => {
            let response = app.context(&auth)?.post(&path, json_options(json)?)?;
            print_body(response)
        }
        Commands::Put { auth, json, path } => {
            let response = app.context(&auth)?.put(&path, json_options(json)?)?;
            print_body(response)
        }
        Commands::Delete { auth, path } => {
            let response = app.context(&auth)?.delete(&path, RequestOptions::new())?;
            print_body(response)
        }
        Commands::List { auth, format, path } => handle_list(&app, &auth, format, &path),
    }
}

fn json_options(json: Option<String>) -> ClientResult<RequestOptions> {
    match json {
        Some(text) => {
            let body: Value = serde_json::from_str(&text)?;
            RequestOptions::new().json(&body)
        }
        None => Ok(RequestOptions::new()),
    }
}

fn print_body(response: Response) -> ClientResult<()> {
    let text = response.text()?;
    match serde_json::from_str::<Value>(&text) {
        Ok(value) => println!("{}", serde_json::to_string_pretty(&value)?),
        Err(_) if text.is_empty() => {}
        Err(_) => println!("{}", text),
    }
    Ok(())
}

fn handle_list(app: &ClientApp, auth: &AuthArgs, format: OutputFormat, path: &[String]) -> ClientResult<()> {
    let response = app.context(auth)?.get(path, RequestOptions::new())?;
    let objects: Vec<Map<String, Value>> = serde_json::from_str(&response.text()?)?;

    match format {
        OutputFormat::Table => {
            let (columns, rows) = list_to_table(&objects);
            println!("{}", render_table(&columns, rows));
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&objects)?);
        }
    }
    Ok(())
}
