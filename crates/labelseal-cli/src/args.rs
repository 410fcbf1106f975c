use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

#[derive(Parser, Debug, Clone)]
#[command(name = "labelseal", version, about = "Sign shipping-label claims and verify signed payloads")]
pub struct Cli {
    /// Emit JSON output on stdout.
    #[arg(long, global = true)]
    pub json: bool,

    /// JSON config file (key paths, passphrase source, QR/page settings).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Where the private-key passphrase comes from. There is no built-in value.
#[derive(Args, Debug, Clone, Default)]
pub struct PassphraseArgs {
    /// Environment variable holding the passphrase (default: LABELSEAL_PASSPHRASE).
    #[arg(long, value_name = "NAME")]
    pub passphrase_env: Option<String>,

    /// File whose first line is the passphrase. Wins over --passphrase-env.
    #[arg(long, value_name = "PATH")]
    pub passphrase_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Generate an Ed25519 key pair: encrypted private.pem and public.pem.
    Keygen {
        /// Directory to write the key files into.
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,

        /// PBKDF2 iterations for the private key encryption.
        #[arg(long)]
        kdf_iterations: Option<u32>,

        /// Overwrite existing key files.
        #[arg(long)]
        force: bool,

        #[command(flatten)]
        passphrase: PassphraseArgs,
    },

    /// Sign a claims document and write the signed payload (plus optional QR/label).
    Sign {
        /// Claims YAML file.
        claims: PathBuf,

        /// Encrypted private key (PEM).
        #[arg(long)]
        key: Option<PathBuf>,

        /// Signed payload output path.
        #[arg(long)]
        out: Option<PathBuf>,

        /// Also write the payload as a QR code (SVG).
        #[arg(long)]
        qr: Option<PathBuf>,

        /// Also write a printable label (SVG) with QR code and recipient/sender fields.
        #[arg(long)]
        label: Option<PathBuf>,

        #[command(flatten)]
        passphrase: PassphraseArgs,
    },

    /// Verify a signed payload against a public keyring.
    Verify {
        /// Signed payload file.
        payload: PathBuf,

        /// Armored keyring with one or more PUBLIC KEY blocks.
        #[arg(long)]
        keyring: Option<PathBuf>,
    },

    /// Split a signed payload and show its digest and claims without verifying.
    Inspect {
        payload: PathBuf,
    },
}
