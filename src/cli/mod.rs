pub mod commands;
pub mod context;
pub mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// List keys, encrypt, decrypt, sign and verify with your local gpg.
#[derive(Parser, Debug)]
#[command(name = "gpgwrap", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to the config file (default: <config dir>/gpgwrap/config.toml)
    #[arg(long, global = true, env = "GPGWRAP_CONFIG")]
    pub config: Option<PathBuf>,

    /// gpg binary to run
    #[arg(long, global = true, env = "GPGWRAP_GPG")]
    pub gpg: Option<PathBuf>,

    /// gpg home directory (passed as --homedir)
    #[arg(long, global = true)]
    pub homedir: Option<PathBuf>,

    /// Verbose output (debug logging, including gpg invocations)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode: only show errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List public keys in the keyring
    Keys {
        /// Print the keys as JSON
        #[arg(long)]
        json: bool,
    },

    /// Encrypt text for a recipient (reads stdin unless --input is given)
    Encrypt {
        /// Recipient email
        #[arg(short, long)]
        recipient: String,
        /// Read the text from this file
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Decrypt armored text (reads stdin unless --input is given)
    Decrypt {
        /// Read the ciphertext from this file
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Use the saved passphrase for this email
        #[arg(long)]
        passphrase_for: Option<String>,
    },

    /// Encrypt a file for a recipient
    EncryptFile {
        /// File to encrypt
        file: PathBuf,
        /// Recipient email
        #[arg(short, long)]
        recipient: String,
        /// Output path (default: FILE.<encrypted_suffix>)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Write binary OpenPGP instead of ASCII armor
        #[arg(long)]
        binary: bool,
        /// Overwrite the output without asking
        #[arg(short, long)]
        force: bool,
    },

    /// Decrypt a file
    DecryptFile {
        /// File to decrypt
        file: PathBuf,
        /// Output path (default: FILE without .gpg/.asc)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Use the saved passphrase for this email
        #[arg(long)]
        passphrase_for: Option<String>,
        /// Overwrite the output without asking
        #[arg(short, long)]
        force: bool,
    },

    /// Clear-sign text (reads stdin unless --input is given)
    Sign {
        /// Signing key id
        #[arg(short, long)]
        key: String,
        /// Read the text from this file
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Verify clear-signed text; exits 1 when the signature is not good
    Verify {
        /// Read the signed text from this file
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
}
