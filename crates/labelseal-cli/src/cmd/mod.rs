use anyhow::Result;

use crate::args::{Cli, Command};
use crate::config::FileConfig;

mod inspect;
mod keygen;
mod sign;
mod verify;

pub fn dispatch(cli: Cli) -> Result<()> {
    let cfg = FileConfig::load(cli.config.as_deref())?;
    match cli.command {
        Command::Keygen { out_dir, kdf_iterations, force, passphrase } => {
            keygen::run(&cfg, &out_dir, kdf_iterations, force, &passphrase)
        }
        Command::Sign { claims, key, out, qr, label, passphrase } => sign::run(
            &cfg,
            &claims,
            sign::Outputs {
                key,
                payload: out,
                qr,
                label,
            },
            &passphrase,
        ),
        Command::Verify { payload, keyring } => verify::run(&cfg, &payload, keyring),
        Command::Inspect { payload } => inspect::run(&cfg, &payload),
    }
}
