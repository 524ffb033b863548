//! frankenticket: issue and check ECB-encrypted tickets.
//!
//! # Quick Start
//!
//! ```bash
//! frankenticket serve --port 8080
//! frankenticket login --info '{"team": "blue"}'
//! frankenticket auth eee09539a710755e...
//! frankenticket --cipher aes lambda event.json
//! ```

use clap::{ArgAction, Args, Parser, Subcommand};
use frankenticket::cipher::{BLOCK_SIZE, Block, BlockCipher, CipherKey, CipherKind};
use frankenticket::web::lambda::handle_event_json;
use frankenticket::{Config, ConfigLoader, Response, TicketServer, TicketService};
use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "frankenticket",
    version,
    about = "Issue and verify ECB-encrypted tickets",
    long_about = "frankenticket hands out encrypted JSON tickets and checks them.\n\n\
        Tickets are encrypted block by block (ECB) under AES-128 or a\n\
        20-round MD5 Feistel cipher. Blocks can be cut and reordered."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Ticket cipher (`aes-128-ecb` or `broken-feistel`)
    #[arg(long, global = true)]
    cipher: Option<CipherKind>,

    /// Hex-encoded cipher key
    #[arg(long, global = true)]
    key: Option<String>,

    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output as JSON instead of human-readable text
    #[arg(long, global = true, action = ArgAction::SetTrue)]
    json: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the ticket API over HTTP
    Serve(ServeArgs),

    /// Issue a ticket
    Login(LoginArgs),

    /// Check a hex ticket
    Auth(AuthArgs),

    /// Run a serverless event file through the service
    Lambda(LambdaArgs),

    /// Encrypt one 16-byte block
    EncryptBlock(BlockArgs),

    /// Decrypt one 16-byte block
    DecryptBlock(BlockArgs),

    /// Print a fresh random key
    Keygen(KeygenArgs),
}

#[derive(Args, Debug)]
struct ServeArgs {
    /// Bind address
    #[arg(long)]
    bind: Option<String>,

    /// Port; 0 picks a free one
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Args, Debug)]
struct LoginArgs {
    /// JSON value placed in the ticket's `info` field
    #[arg(long, default_value = "null")]
    info: String,
}

#[derive(Args, Debug)]
struct AuthArgs {
    /// Hex-encoded ticket
    ticket: String,
}

#[derive(Args, Debug)]
struct LambdaArgs {
    /// Path to the event JSON file
    event: PathBuf,
}

#[derive(Args, Debug)]
struct BlockArgs {
    /// 32 hex digits
    block: String,
}

#[derive(Args, Debug)]
struct KeygenArgs {
    /// Key length in bytes
    #[arg(long, default_value_t = 16)]
    len: usize,
}

// ---------------------------------------------------------------------------
// Setup
// ---------------------------------------------------------------------------

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_config(cli: &Cli) -> Result<Config, String> {
    let mut loader = ConfigLoader::new();
    if let Some(path) = &cli.config {
        loader = loader.with_file(path);
    }
    let mut config = loader.load().map_err(|e| e.to_string())?;
    if let Some(cipher) = cli.cipher {
        config.cipher = cipher;
    }
    if let Some(key) = &cli.key {
        config.key_hex.clone_from(key);
    }
    config.validate().map_err(|e| e.to_string())?;
    Ok(config)
}

fn build_service(config: &Config) -> Result<TicketService, String> {
    TicketService::from_config(config).map_err(|e| e.to_string())
}

fn print_response(response: &Response, json: bool) -> Result<(), String> {
    if json {
        println!("{}", response.to_json());
    } else {
        let body: Value = serde_json::from_str(&response.to_json()).map_err(|e| e.to_string())?;
        println!("HTTP {}", response.status_code);
        if let Value::Object(fields) = body {
            for (name, value) in fields {
                match value {
                    Value::String(text) => println!("{name}: {text}"),
                    other => println!("{name}: {other}"),
                }
            }
        }
    }
    if response.status_code == 200 {
        Ok(())
    } else {
        Err(format!("request failed with status {}", response.status_code))
    }
}

fn parse_block(text: &str) -> Result<Block, String> {
    let bytes = hex::decode(text.trim()).map_err(|e| format!("Invalid block hex: {e}"))?;
    Block::try_from(bytes.as_slice()).map_err(|_| {
        format!(
            "A block is {BLOCK_SIZE} bytes ({} hex digits), got {} bytes",
            BLOCK_SIZE * 2,
            bytes.len()
        )
    })
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

fn cmd_serve(args: ServeArgs, mut config: Config) -> Result<(), String> {
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    let service = Arc::new(build_service(&config)?);
    let server_config = frankenticket::web::ServerConfig {
        bind_addr: config.bind_addr.clone(),
        ..Default::default()
    };
    let mut server = TicketServer::with_config(config.port, service, server_config);
    server
        .start()
        .map_err(|e| format!("Failed to bind {}: {e}", config.socket_addr()))?;

    while server.is_running() {
        thread::sleep(Duration::from_millis(250));
    }
    Ok(())
}

fn cmd_login(args: &LoginArgs, config: &Config, json: bool) -> Result<(), String> {
    let info: Value =
        serde_json::from_str(&args.info).map_err(|e| format!("--info is not JSON: {e}"))?;
    let service = build_service(config)?;
    print_response(&service.login(info), json)
}

fn cmd_auth(args: &AuthArgs, config: &Config, json: bool) -> Result<(), String> {
    let service = build_service(config)?;
    print_response(&service.auth(args.ticket.trim()), json)
}

fn cmd_lambda(args: &LambdaArgs, config: &Config, json: bool) -> Result<(), String> {
    let event = fs::read_to_string(&args.event)
        .map_err(|e| format!("Failed to read {}: {e}", args.event.display()))?;
    let service = build_service(config)?;
    let response = handle_event_json(&service, &event);
    if json {
        println!(
            "{}",
            serde_json::to_string(&response).map_err(|e| e.to_string())?
        );
    } else {
        println!("statusCode: {}", response.status_code);
        println!("body: {}", response.body);
    }
    Ok(())
}

fn cmd_block(args: &BlockArgs, config: &Config, encrypt: bool, json: bool) -> Result<(), String> {
    let block = parse_block(&args.block)?;
    let key = CipherKey::from_hex(&config.key_hex).map_err(|e| e.to_string())?;
    let cipher = config.cipher.build(&key).map_err(|e| e.to_string())?;
    let output = if encrypt {
        cipher.encrypt_block(&block)
    } else {
        cipher.decrypt_block(&block)
    };
    let output = hex::encode(output);
    if json {
        let report = serde_json::json!({
            "cipher": cipher.name(),
            "input": args.block.trim().to_ascii_lowercase(),
            "output": output,
        });
        println!("{report}");
    } else {
        println!("{output}");
    }
    Ok(())
}

fn cmd_keygen(args: &KeygenArgs, json: bool) -> Result<(), String> {
    let key = CipherKey::generate(args.len).map_err(|e| e.to_string())?;
    if json {
        println!("{}", serde_json::json!({ "key": key.to_hex() }));
    } else {
        println!("{}", key.to_hex());
    }
    Ok(())
}

fn run(cli: Cli) -> Result<(), String> {
    if let Command::Keygen(args) = &cli.command {
        return cmd_keygen(args, cli.json);
    }
    let config = load_config(&cli)?;
    match cli.command {
        Command::Serve(args) => cmd_serve(args, config),
        Command::Login(args) => cmd_login(&args, &config, cli.json),
        Command::Auth(args) => cmd_auth(&args, &config, cli.json),
        Command::Lambda(args) => cmd_lambda(&args, &config, cli.json),
        Command::EncryptBlock(args) => cmd_block(&args, &config, true, cli.json),
        Command::DecryptBlock(args) => cmd_block(&args, &config, false, cli.json),
        Command::Keygen(args) => cmd_keygen(&args, cli.json),
    }
}

fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(msg) => {
            eprintln!("Error: {msg}");
            ExitCode::FAILURE
        }
    }
}
