use crate::{
    api::{Api, actions::GetDownloadUrl},
    cli::actions::Action,
};
use anyhow::{Context, Result};

/// # Errors
///
/// Will return `Err` if the download URL can not be retrieved
pub async fn handle(api: &Api, action: Action) -> Result<()> {
    if let Action::Download { output_id } = action {
        let url = GetDownloadUrl::new(&output_id)
            .request(api)
            .await
            .context("error retrieving download url")?;

        println!("{url}");
    }

    Ok(())
}
