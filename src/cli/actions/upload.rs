use crate::{
    api::{Api, limits::ChunkLimits},
    cli::{actions::Action, globals::GlobalArgs, progressbar::Bar},
    error::UploadError,
    transport::ProductUploads,
    upload::{UploadEvent, UploadOptions, UploadSession, UploadTarget},
};
use anyhow::Result;
use bytesize::ByteSize;
use tokio_util::sync::CancellationToken;

/// # Errors
///
/// Will return `Err` if the file can not be read or any upload phase fails
pub async fn handle(
    api: &Api,
    action: Action,
    globals: &GlobalArgs,
    cancel: &CancellationToken,
) -> Result<()> {
    if let Action::Upload { product_id, file } = action {
        let target = UploadTarget::open(&file)
            .await
            .map_err(|source| UploadError::Open {
                path: file.clone(),
                source,
            })?;

        log::info!(
            "upload {} ({}) to product {product_id}",
            target.name(),
            ByteSize(target.size())
        );

        let transport = ProductUploads::new(api, &product_id);

        let options = UploadOptions {
            limits: ChunkLimits::default(),
            max_concurrency: usize::from(globals.max_requests),
        };

        let bar = Bar::new(target.size(), globals.quiet);
        let pb = bar.progress.clone();

        let session = UploadSession::new(&transport, options)
            .with_cancel(cancel.clone())
            .with_progress(move |event| match event {
                UploadEvent::Planned { plan, .. } => {
                    log::debug!("{} chunks of {}", plan.chunk_count, ByteSize(plan.chunk_size));
                }
                UploadEvent::Phase(phase) => {
                    if let Some(pb) = &pb {
                        pb.set_message(phase.to_string());
                    }
                }
                UploadEvent::ChunkSent { bytes, .. } => {
                    if let Some(pb) = &pb {
                        pb.inc(*bytes);
                    }
                }
            });

        let rs = session.upload(&target).await;

        match rs {
            Ok(object_key) => {
                bar.finish();
                println!("{object_key}");
            }
            Err(e) => {
                bar.finish_and_clear();
                return Err(e.into());
            }
        }
    }

    Ok(())
}
