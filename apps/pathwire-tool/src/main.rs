use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use pathwire_codec::path::{PathReq, PathReqFlags};
use pathwire_codec::{describe_raw, encode_payload, Payload};
use pathwire_core::{pad_to_block, IsdAsn};
use pathwire_crypto::{Ed25519Signer, SignS, SignedBlobS, Signer};
use tracing::{debug, info, warn};

mod config;

use crate::config::ToolConfig;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, short)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate an Ed25519 key pair at the configured paths
    Keygen {
        /// Replace existing key files
        #[arg(long)]
        force: bool,
    },
    /// Encode a path request and print it as hex
    PathReq {
        /// Destination ISD-AS, e.g. 1-ff00:0:111
        dst: IsdAsn,
        /// Source ISD-AS
        src: IsdAsn,
        /// Request id
        #[arg(long, default_value_t = 1)]
        id: u64,
        /// Ask the path service to bypass its cache
        #[arg(long)]
        flush: bool,
    },
    /// Decode a hex payload and print its description
    Decode { payload: String },
    /// Sign a hex blob with the configured secret key
    Sign { blob: String },
    /// Verify a hex signature over a hex blob with the configured public key
    Verify {
        blob: String,
        signature: String,
        /// Signing timestamp, seconds since the Unix epoch
        timestamp: u64,
    },
    /// Zero-pad a hex buffer to the configured block size
    Pad { data: String },
    /// Print a commented sample configuration
    SampleConfig,
}

fn parse_hex(label: &str, raw: &str) -> anyhow::Result<Vec<u8>> {
    hex::decode(raw.trim()).with_context(|| format!("{label} is not valid hex"))
}

fn read_hex_file(path: &Path) -> anyhow::Result<Vec<u8>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read key from {}", path.display()))?;
    parse_hex(&path.display().to_string(), &raw)
}

fn write_hex_file(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(path, format!("{}\n", hex::encode(bytes)))
        .with_context(|| format!("failed to write {}", path.display()))
}

fn keygen(cfg: &ToolConfig, force: bool) -> anyhow::Result<()> {
    if !force && cfg.secret_key_path.exists() {
        bail!(
            "{} already exists (use --force to replace it)",
            cfg.secret_key_path.display()
        );
    }
    let signer = Ed25519Signer::generate();
    write_hex_file(&cfg.secret_key_path, &signer.secret_bytes())?;
    write_hex_file(&cfg.public_key_path, &signer.public_key())?;
    info!(
        "wrote key pair to {} and {}",
        cfg.secret_key_path.display(),
        cfg.public_key_path.display()
    );
    println!("{}", hex::encode(signer.public_key()));
    Ok(())
}

fn envelope(cfg: &ToolConfig) -> anyhow::Result<SignS> {
    let sign_type = cfg.sign_type()?;
    Ok(SignS::new(sign_type, cfg.sign_src.clone())?)
}

fn run(cli: Cli) -> anyhow::Result<()> {
    if let Commands::SampleConfig = cli.command {
        print!("{}", ToolConfig::sample());
        return Ok(());
    }

    let cfg = ToolConfig::new(cli.config).context("failed to load config")?;
    cfg.validate().context("invalid config")?;
    debug!(?cfg, "config loaded");
    execute(&cfg, cli.command)
}

fn execute(cfg: &ToolConfig, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Keygen { force } => keygen(cfg, force)?,
        Commands::PathReq {
            dst,
            src,
            id,
            flush,
        } => {
            let payload = Payload::new(
                id,
                PathReq {
                    dst,
                    src,
                    max_paths: cfg.max_paths,
                    flags: PathReqFlags {
                        flush,
                        ..PathReqFlags::default()
                    },
                },
            );
            let bytes = encode_payload(&payload)?;
            info!("{}", payload.describe());
            println!("{}", hex::encode(bytes));
        }
        Commands::Decode { payload } => {
            let bytes = parse_hex("payload", &payload)?;
            println!("{}", describe_raw(&bytes));
        }
        Commands::Sign { blob } => {
            let blob = parse_hex("blob", &blob)?;
            let secret = read_hex_file(&cfg.secret_key_path)?;
            let signed = SignedBlobS::new_signed(blob, envelope(cfg)?, &secret)?;
            println!("timestamp: {}", signed.sign.timestamp());
            println!("signature: {}", hex::encode(signed.sign.signature()));
            println!("packed: {}", hex::encode(signed.pack()));
            info!("{signed}");
        }
        Commands::Verify {
            blob,
            signature,
            timestamp,
        } => {
            let blob = parse_hex("blob", &blob)?;
            let signature = parse_hex("signature", &signature)?;
            let public = read_hex_file(&cfg.public_key_path)?;
            let sign = envelope(cfg)?.with_signature(timestamp, signature);
            if let Err(err) = sign.verify(&public, &blob) {
                warn!("verification failed for {}", sign.src());
                return Err(err).context("signature rejected");
            }
            println!("ok");
        }
        Commands::Pad { data } => {
            let data = parse_hex("data", &data)?;
            println!("{}", hex::encode(pad_to_block(data, cfg.block_size)));
        }
        Commands::SampleConfig => print!("{}", ToolConfig::sample()),
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let filter = std::env::var("PATHWIRE_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    run(Cli::parse())
}
