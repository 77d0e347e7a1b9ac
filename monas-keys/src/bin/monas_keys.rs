//! monas-keys binary entry point.
//!
//! Generates RSA key pairs as PEM files and signs/verifies messages with them.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use monas_keys::{
    HashAlgorithm, KeyImportParams, KeyService, KeysConfig, RsaCryptoProvider, Signature,
};

const PRIVATE_KEY_FILE: &str = "private_key.pem";
const PUBLIC_KEY_FILE: &str = "public_key.pem";

/// monas-keys CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "monas-keys")]
#[command(about = "Monas Keys - RSA key pairs, PEM export and signatures")]
struct Args {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a key pair and export it as PEM.
    Generate {
        /// What the key pair is for.
        #[arg(short, long, value_enum)]
        usage: Usage,

        /// Modulus length in bits.
        #[arg(short, long)]
        bits: Option<usize>,

        /// Hash bound to the keys (SHA-256, SHA-384, SHA-512). PEM does not record it,
        /// so pass the same --hash (or config) to sign and verify.
        #[arg(long)]
        hash: Option<String>,

        /// Directory to write private_key.pem and public_key.pem to; prints to stdout if omitted.
        #[arg(short, long)]
        out_dir: Option<PathBuf>,
    },
    /// Sign a message with a PEM private key and print the signature.
    Sign {
        /// PEM private key file.
        #[arg(short, long)]
        key: PathBuf,

        /// Hash the key was generated with; overrides the config.
        #[arg(long)]
        hash: Option<String>,

        #[command(flatten)]
        message: MessageArgs,
    },
    /// Verify a signature with a PEM public key.
    Verify {
        /// PEM public key file.
        #[arg(short, long)]
        key: PathBuf,

        /// Base64 signature.
        #[arg(short, long)]
        signature: String,

        /// Hash the key was generated with; overrides the config.
        #[arg(long)]
        hash: Option<String>,

        #[command(flatten)]
        message: MessageArgs,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Usage {
    Encrypt,
    Sign,
}

#[derive(ClapArgs, Debug)]
#[group(required = true, multiple = false)]
struct MessageArgs {
    /// Message text (signed as UTF-8).
    #[arg(short, long)]
    message: Option<String>,

    /// File whose bytes are the message.
    #[arg(short, long)]
    input: Option<PathBuf>,
}

impl MessageArgs {
    fn read(&self) -> Result<Vec<u8>> {
        match (&self.message, &self.input) {
            (Some(text), _) => Ok(text.as_bytes().to_vec()),
            (None, Some(path)) => {
                std::fs::read(path).with_context(|| format!("reading {}", path.display()))
            }
            (None, None) => bail!("either --message or --input is required"),
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = match &args.config {
        Some(path) => {
            tracing::info!("Loading configuration from {:?}", path);
            KeysConfig::from_file(path)?
        }
        None => KeysConfig::default(),
    };

    match args.command {
        Command::Generate {
            usage,
            bits,
            hash,
            out_dir,
        } => {
            if let Some(bits) = bits {
                config.modulus_bits = bits;
            }
            override_hash(&mut config, hash.as_deref())?;
            generate(config, usage, out_dir.as_deref())
        }
        Command::Sign { key, hash, message } => {
            override_hash(&mut config, hash.as_deref())?;
            sign(config, &key, &message.read()?)
        }
        Command::Verify {
            key,
            signature,
            hash,
            message,
        } => {
            override_hash(&mut config, hash.as_deref())?;
            let valid = verify(config, &key, &signature, &message.read()?)?;
            println!("{}", if valid { "valid" } else { "invalid" });
            if !valid {
                std::process::exit(1);
            }
            Ok(())
        }
    }
}

fn override_hash(config: &mut KeysConfig, hash: Option<&str>) -> Result<()> {
    if let Some(hash) = hash {
        config.hash = hash.parse::<HashAlgorithm>()?;
    }
    Ok(())
}

fn generate(config: KeysConfig, usage: Usage, out_dir: Option<&Path>) -> Result<()> {
    let service = KeyService::with_config(RsaCryptoProvider::new(), config);

    let pair = match usage {
        Usage::Encrypt => service.generate_encryption_key_pair_from_config()?,
        Usage::Sign => service.generate_signing_key_pair_from_config()?,
    };
    let pem = service.to_pem(&pair)?;

    match out_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
            let private_path = dir.join(PRIVATE_KEY_FILE);
            let public_path = dir.join(PUBLIC_KEY_FILE);
            write_private(&private_path, &pem.private_key)?;
            std::fs::write(&public_path, format!("{}\n", pem.public_key))
                .with_context(|| format!("writing {}", public_path.display()))?;
            tracing::info!("Wrote {:?} and {:?}", private_path, public_path);
        }
        None => {
            println!("{}", pem.private_key);
            println!("{}", pem.public_key);
        }
    }
    Ok(())
}

#[cfg(unix)]
fn write_private(path: &Path, pem: &str) -> Result<()> {
    use std::io::Write;
    use std::os::unix::fs::OpenOptionsExt;

    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)
        .with_context(|| format!("writing {}", path.display()))?;
    writeln!(file, "{pem}")?;
    Ok(())
}

#[cfg(not(unix))]
fn write_private(path: &Path, pem: &str) -> Result<()> {
    std::fs::write(path, format!("{pem}\n")).with_context(|| format!("writing {}", path.display()))
}

fn import_params(config: &KeysConfig) -> KeyImportParams {
    KeyImportParams::new(config.signature_algorithm, config.hash)
}

fn sign(config: KeysConfig, key_path: &Path, message: &[u8]) -> Result<()> {
    let pem = std::fs::read_to_string(key_path)
        .with_context(|| format!("reading {}", key_path.display()))?;
    let params = import_params(&config);
    let service = KeyService::with_config(RsaCryptoProvider::new(), config);

    let key = service.import_private_key_pem(&pem, &params)?;
    let signature = service.sign(&key, message)?;
    println!("{signature}");
    Ok(())
}

fn verify(config: KeysConfig, key_path: &Path, signature: &str, message: &[u8]) -> Result<bool> {
    let pem = std::fs::read_to_string(key_path)
        .with_context(|| format!("reading {}", key_path.display()))?;
    let params = import_params(&config);
    let service = KeyService::with_config(RsaCryptoProvider::new(), config);

    let key = service.import_public_key_pem(&pem, &params)?;
    let signature = Signature::from_text(signature.trim())?;
    Ok(service.verify(&key, &signature, message)?)
}
