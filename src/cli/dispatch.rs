use crate::cli::actions::Action;
use anyhow::{Context, Result, anyhow};
use std::path::PathBuf;

// return Action based on the subcommand
pub fn dispatch(matches: &clap::ArgMatches) -> Result<Action> {
    // Closure to return subcommand_matches
    let sub_m = |subcommand| -> Result<&clap::ArgMatches> {
        matches
            .subcommand_matches(subcommand)
            .context("arguments missing")
    };

    let arg = |sub_m: &clap::ArgMatches, name: &str| -> Result<String> {
        sub_m
            .get_one::<String>(name)
            .map(ToString::to_string)
            .with_context(|| format!("missing <{name}>"))
    };

    match matches.subcommand_name() {
        Some("upload") => {
            let sub_m = sub_m("upload")?;
            let product_id = arg(sub_m, "product")?;
            let file = sub_m
                .get_one::<PathBuf>("file")
                .cloned()
                .context("missing <file>")?;
            Ok(Action::Upload { product_id, file })
        }

        Some("output") => {
            let sub_m = sub_m("output")?;
            Ok(Action::CreateOutput {
                variant_id: arg(sub_m, "variant")?,
                output_type: arg(sub_m, "type")?,
                representation: sub_m.get_one::<String>("representation").cloned(),
                version: sub_m.get_one::<String>("version").cloned(),
                wait: !sub_m.get_one::<bool>("no-wait").copied().unwrap_or(false),
            })
        }

        Some("outputs") => {
            let sub_m = sub_m("outputs")?;
            Ok(Action::ListOutputs {
                variant_id: arg(sub_m, "variant")?,
            })
        }

        Some("wait") => {
            let sub_m = sub_m("wait")?;
            Ok(Action::WaitOutput {
                output_id: arg(sub_m, "output")?,
            })
        }

        Some("download") => {
            let sub_m = sub_m("download")?;
            Ok(Action::Download {
                output_id: arg(sub_m, "output")?,
            })
        }

        Some(other) => Err(anyhow!("unknown subcommand: {other}")),

        None => Err(anyhow!("missing subcommand, try --help")),
    }
}
