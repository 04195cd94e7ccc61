use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "hears")]
#[command(about = "Hears CLI: Webex command bot", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show version
    Version,

    /// Create the configuration directory and a default config file.
    Init {
        /// Config file path (default: HEARS_CONFIG_PATH or ~/.hears/config.json)
        #[arg(long, short, value_name = "PATH")]
        config: Option<std::path::PathBuf>,
    },

    /// Run the gateway: receive Webex webhook deliveries and answer commands.
    Gateway {
        /// Config file path (default: HEARS_CONFIG_PATH or ~/.hears/config.json)
        #[arg(long, short, value_name = "PATH")]
        config: Option<std::path::PathBuf>,

        /// HTTP port (default from config, PORT env, or 3000)
        #[arg(long, short)]
        port: Option<u16>,
    },

    /// List the built-in commands in match order.
    #[command(name = "commands")]
    ListCommands,

    /// Post a synthetic webhook delivery to a running gateway and print its acknowledgment.
    Webhook {
        /// Config file path, used to locate the gateway (default: HEARS_CONFIG_PATH or ~/.hears/config.json)
        #[arg(long, short, value_name = "PATH")]
        config: Option<std::path::PathBuf>,

        /// Gateway webhook URL (default: http://{bind}:{port}{webhookPath} from config)
        #[arg(long, value_name = "URL")]
        url: Option<String>,

        #[arg(long, value_name = "ID")]
        message_id: String,

        #[arg(long, value_name = "ID")]
        person_id: String,

        #[arg(long, value_name = "ID")]
        room_id: String,

        /// "direct" or "group"
        #[arg(long, default_value = "direct")]
        room_type: String,
    },
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Version) => {
            println!("hears {}", env!("CARGO_PKG_VERSION"));
        }
        Some(Commands::Init { config }) => {
            if let Err(e) = run_init(config) {
                log::error!("init failed: {}", e);
                std::process::exit(1);
            }
        }
        Some(Commands::Gateway { config, port }) => {
            if let Err(e) = run_gateway(config, port).await {
                log::error!("gateway failed: {:#}", e);
                std::process::exit(1);
            }
        }
        Some(Commands::ListCommands) => run_commands(),
        Some(Commands::Webhook {
            config,
            url,
            message_id,
            person_id,
            room_id,
            room_type,
        }) => {
            let data = serde_json::json!({
                "id": message_id,
                "personId": person_id,
                "roomId": room_id,
                "roomType": room_type,
            });
            if let Err(e) = run_webhook(config, url, data).await {
                log::error!("webhook failed: {:#}", e);
                std::process::exit(1);
            }
        }
        None => {
            println!("Run with --help for usage");
        }
    }
}

fn run_init(config_path: Option<std::path::PathBuf>) -> anyhow::Result<()> {
    let path = config_path.unwrap_or_else(hears::config::default_config_path);
    let dir = hears::init::init_config_dir(&path)?;
    println!("initialized configuration at {}", dir.display());
    Ok(())
}

async fn run_gateway(
    config_path: Option<std::path::PathBuf>,
    port: Option<u16>,
) -> anyhow::Result<()> {
    let (mut config, path) = hears::config::load_config(config_path)?;
    if let Some(p) = port {
        config.gateway.port = p;
    }
    log::info!("starting gateway on {}:{}", config.gateway.bind, config.gateway.port);
    hears::gateway::run_gateway(config, path).await
}

fn run_commands() {
    let registry = hears::commands::default_registry();
    for def in registry.all() {
        let help = if def.help_text.is_empty() {
            "(fallback)"
        } else {
            def.help_text.as_str()
        };
        println!("{:>5}  {:<8}  {}", def.priority, def.id(), help);
    }
}

async fn run_webhook(
    config_path: Option<std::path::PathBuf>,
    url: Option<String>,
    data: serde_json::Value,
) -> anyhow::Result<()> {
    let url = match url {
        Some(u) => u,
        None => {
            let (config, _) = hears::config::load_config(config_path)?;
            format!(
                "http://{}:{}{}",
                config.gateway.bind.trim(),
                config.gateway.port,
                hears::config::normalize_path(&config.gateway.webhook_path)
            )
        }
    };
    let body = serde_json::json!({
        "id": "cli",
        "name": "hears-cli",
        "resource": "messages",
        "event": "created",
        "data": data,
    });
    let ack: serde_json::Value = reqwest::Client::new()
        .post(&url)
        .json(&body)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    println!("{}", serde_json::to_string_pretty(&ack)?);
    Ok(())
}
