use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use openyolo_model::FingerprintAlgorithm;
use openyoloctl::commands::{self, CtlPlatform, DomainReport, Resolution};
use openyoloctl::{CtlConfig, CtlConfigSource};
use tracing_subscriber::{
    EnvFilter, layer::SubscriberExt, util::SubscriberInitExt,
};
use url::Url;

/// Exit status of `resolve` when the package has no trusted domain.
const EXIT_UNTRUSTED: u8 = 2;

#[derive(Parser)]
#[command(
    name = "openyoloctl",
    about = "Inspect, mint and resolve OpenYOLO authentication domains"
)]
struct Cli {
    /// Config file (TOML, or JSON by extension); overrides the environment
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate a domain and describe its parts
    Parse {
        domain: String,
        #[arg(long)]
        json: bool,
    },
    /// Fingerprint a DER signing certificate
    Fingerprint {
        #[arg(long)]
        cert: PathBuf,
        #[arg(long)]
        algorithm: Option<FingerprintAlgorithm>,
    },
    /// Mint the Android domain for a package and its signing certificate
    Android {
        #[arg(long)]
        package: String,
        #[arg(long)]
        cert: PathBuf,
        #[arg(long)]
        algorithm: Option<FingerprintAlgorithm>,
    },
    /// Derive the web domain of a URL's origin
    Web { url: Url },
    /// Resolve an installed package through a certificate store
    Resolve {
        #[arg(long)]
        package: String,
        #[arg(long)]
        store: Option<PathBuf>,
        #[arg(long)]
        algorithm: Option<FingerprintAlgorithm>,
    },
    /// Domain of the configured self package
    #[command(name = "self")]
    SelfDomain {
        #[arg(long)]
        store: Option<PathBuf>,
        #[arg(long)]
        package: Option<String>,
    },
    /// Encode a domain as hex protobuf wire bytes
    Encode { domain: String },
    /// Decode hex protobuf wire bytes into a domain
    Decode { hex: String },
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let (config, source) = match &cli.config {
        Some(path) => (
            CtlConfig::load_from_file(path)?,
            CtlConfigSource::Flag(path.clone()),
        ),
        None => CtlConfig::load_from_env()?,
    };

    init_tracing(&config);
    tracing::debug!(?source, "loaded openyoloctl config");

    run(cli.command, &config)
}

fn init_tracing(config: &CtlConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        config
            .log_filter
            .as_deref()
            .and_then(|directive| EnvFilter::try_new(directive).ok())
            .unwrap_or_else(|| "info".into())
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(command: Command, config: &CtlConfig) -> Result<ExitCode> {
    let default_algorithm = config.fingerprint_algorithm;

    match command {
        Command::Parse { domain, json } => {
            let report = commands::parse(&domain)?;
            print_report(&report, json)?;
        }
        Command::Fingerprint { cert, algorithm } => {
            let fingerprint = commands::fingerprint(
                &cert,
                algorithm.unwrap_or(default_algorithm),
            )?;
            println!("{fingerprint}");
        }
        Command::Android {
            package,
            cert,
            algorithm,
        } => {
            let domain = commands::android(
                &package,
                &cert,
                algorithm.unwrap_or(default_algorithm),
            )?;
            println!("{domain}");
        }
        Command::Web { url } => {
            println!("{}", commands::web(&url)?);
        }
        Command::Resolve {
            package,
            store,
            algorithm,
        } => {
            let store = commands::open_store(store, config)?;
            let algorithm = algorithm.unwrap_or(default_algorithm);
            match commands::resolve(&store, &package, algorithm)? {
                Resolution::Trusted(domain) => println!("{domain}"),
                Resolution::Untrusted => {
                    tracing::warn!(
                        package = %package,
                        store = %store.root().display(),
                        "package has no trusted authentication domain"
                    );
                    return Ok(ExitCode::from(EXIT_UNTRUSTED));
                }
            }
        }
        Command::SelfDomain { store, package } => {
            let store = commands::open_store(store, config)?;
            let package = package
                .or_else(|| config.self_package.clone())
                .context(
                    "no self package given; pass --package or set self_package",
                )?;
            let platform = CtlPlatform::new(store, package);
            println!("{}", commands::self_package(&platform)?);
        }
        Command::Encode { domain } => {
            println!("{}", commands::encode(&domain)?);
        }
        Command::Decode { hex } => {
            println!("{}", commands::decode(&hex)?);
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn print_report(report: &DomainReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        print!("{report}");
    }
    Ok(())
}
