use crate::{
    api::{
        Api,
        actions::{CreateOutput, OutputSettings},
    },
    cli::{
        actions::{Action, wait::wait_and_print},
        globals::GlobalArgs,
    },
};
use anyhow::{Context, Result};
use tokio_util::sync::CancellationToken;

/// # Errors
///
/// Will return `Err` if the output can not be created or, when waiting, does
/// not succeed in time
pub async fn handle(
    api: &Api,
    action: Action,
    globals: &GlobalArgs,
    cancel: &CancellationToken,
) -> Result<()> {
    if let Action::CreateOutput {
        variant_id,
        output_type,
        representation,
        version,
        wait,
    } = action
    {
        let settings = OutputSettings {
            representation,
            version,
        };

        let output_id = CreateOutput::new(&variant_id, &output_type, &settings)
            .request(api)
            .await
            .context("error creating output")?;

        log::info!("created {output_type} output {output_id} for variant {variant_id}");

        if wait {
            wait_and_print(api, &output_id, globals, cancel).await?;
        } else {
            println!("{output_id}");
        }
    }

    Ok(())
}
