use crate::{
    api::{Api, actions::ListOutputs},
    cli::actions::Action,
};
use anyhow::{Context, Result};

/// # Errors
///
/// Will return `Err` if the outputs can not be listed
pub async fn handle(api: &Api, action: Action) -> Result<()> {
    if let Action::ListOutputs { variant_id } = action {
        let outputs = ListOutputs::new(&variant_id)
            .request(api)
            .await
            .context("error retrieving outputs")?;

        for output in outputs {
            println!("{}\t{}\t{}", output.id, output.output_type, output.status);
        }
    }

    Ok(())
}
