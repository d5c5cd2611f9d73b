//! Effective parameter dump.

use crate::{ParamArgs, ParamsArgs};
use anyhow::{Context, Result};

/// Prints parameters as pretty JSON, corrected unless `--raw`.
///
/// Corrections are listed on stderr.
pub fn run(args: ParamsArgs, params: &ParamArgs, verbose: bool) -> Result<()> {
    let params = if args.raw {
        super::load_params(params)?
    } else {
        let (params, handler) = super::effective_params(params)?;
        for event in handler.error_history() {
            if verbose {
                eprintln!("{event}");
            } else {
                eprintln!("corrected {}", event.field().unwrap_or("?"));
            }
        }
        params
    };
    let json = serde_json::to_string_pretty(&params).context("Failed to serialize parameters")?;
    println!("{json}");
    Ok(())
}
