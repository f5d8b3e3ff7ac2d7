use clap::Parser;
use clap::Subcommand;
use smartapply::config::AppConfig;
use smartapply::Result;
use tracing::info;

#[derive(Parser)]
#[command(name = "smartapply")]
#[command(about = "Retrieval-augmented resume and job-description matching service")]
#[command(version)]
struct Cli {
    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Host to bind (overrides config)
        #[arg(long)]
        host: Option<String>,
        /// Port to bind (overrides config)
        #[arg(long)]
        port: Option<u16>,
        /// Disable permissive CORS
        #[arg(long)]
        no_cors: bool,
    },
    /// Load and validate configuration, then print a summary
    CheckConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load()?;

    if cli.verbose {
        smartapply::logging::init_simple_logging()?;
    } else {
        smartapply::logging::init_logging_with_config(Some(&config))?;
    }

    match cli.command {
        Commands::Serve {
            host,
            port,
            no_cors,
        } => {
            config.validate()?;

            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);
            let enable_cors = if no_cors {
                false
            } else {
                config.server.enable_cors
            };

            smartapply::api::serve_api(&config, host, port, enable_cors).await
        }
        Commands::CheckConfig => {
            config.validate()?;
            info!("Configuration OK");
            println!("embeddings: {} @ {}", config.embedding_model(), config.embeddings.endpoint);
            println!(
                "vector store: index '{}' ({} dims, {}/{})",
                config.vector_store.index,
                config.embedding_dimension(),
                config.vector_store.cloud,
                config.vector_store.region
            );
            println!("llm: {} @ {}", config.llm_model(), config.llm_endpoint());
            println!("server: {}:{}", config.server.host, config.server.port);
            Ok(())
        }
    }
}
