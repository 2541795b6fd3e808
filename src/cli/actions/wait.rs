use crate::{
    api::{Api, actions::GetDownloadUrl},
    cli::{actions::Action, globals::GlobalArgs, progressbar::Bar},
    job::{JobHandle, JobPoller},
};
use anyhow::{Context, Result};
use tokio_util::sync::CancellationToken;

/// # Errors
///
/// Will return `Err` if the output does not succeed in time or the download
/// URL can not be retrieved
pub async fn handle(
    api: &Api,
    action: Action,
    globals: &GlobalArgs,
    cancel: &CancellationToken,
) -> Result<()> {
    if let Action::WaitOutput { output_id } = action {
        wait_and_print(api, &output_id, globals, cancel).await?;
    }

    Ok(())
}

/// Poll the output until it settles, then print its download URL.
///
/// # Errors
///
/// Will return `Err` if the output does not succeed in time or the download
/// URL can not be retrieved
pub async fn wait_and_print(
    api: &Api,
    output_id: &str,
    globals: &GlobalArgs,
    cancel: &CancellationToken,
) -> Result<()> {
    let handle = JobHandle::new(output_id);

    let bar = Bar::new_spinner(globals.quiet);
    bar.set_message(format!("output {handle}"));

    let poller = JobPoller::new(api, globals.poll);

    let rs = poller
        .wait_for(&handle, cancel, |progress| {
            bar.set_message(format!(
                "output {handle}: {} ({}/{})",
                progress.status, progress.attempt, progress.max_attempts
            ));
        })
        .await;

    bar.finish_and_clear();

    let result = rs?;

    log::info!("output {handle} ready after {} attempts", result.attempts);

    let url = GetDownloadUrl::new(handle.id())
        .request(api)
        .await
        .context("error retrieving download url")?;

    println!("{url}");

    Ok(())
}
