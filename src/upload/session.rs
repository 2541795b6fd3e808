use crate::{
    api::{actions::CompleteUploadRequest, limits::ChunkLimits, responses::UploadReservation},
    error::{TransportError, UploadError, UploadPhase},
    transport::UploadTransport,
    upload::{
        plan::{ChunkPlan, ChunkRange, plan_with},
        target::UploadTarget,
    },
};
use futures::stream::{FuturesUnordered, StreamExt};
use tokio_util::sync::CancellationToken;

/// Upper bound of concurrent chunk transfers.
pub const MAX_CONCURRENCY: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadOptions {
    pub limits: ChunkLimits,
    /// Chunks in flight at once, clamped to `1..=MAX_CONCURRENCY`. 1 sends
    /// them strictly in order.
    pub max_concurrency: usize,
}

impl Default for UploadOptions {
    fn default() -> Self {
        Self {
            limits: ChunkLimits::default(),
            max_concurrency: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadEvent {
    Planned { plan: ChunkPlan, total_size: u64 },
    Phase(UploadPhase),
    ChunkSent { index: u64, bytes: u64 },
}

enum State {
    Reserving,
    Transferring(UploadReservation),
    Finalizing(UploadReservation),
    Done(String),
}

type ChunkResult = Result<ChunkRange, (u64, TransportError)>;

/// Turns a local file into an object key: reserve presigned URLs, send every
/// chunk, then commit the upload.
pub struct UploadSession<'a, T: UploadTransport + ?Sized> {
    transport: &'a T,
    options: UploadOptions,
    cancel: CancellationToken,
    on_event: Option<Box<dyn Fn(&UploadEvent) + Send + Sync + 'a>>,
}

impl<'a, T: UploadTransport + ?Sized> UploadSession<'a, T> {
    #[must_use]
    pub fn new(transport: &'a T, options: UploadOptions) -> Self {
        Self {
            transport,
            options,
            cancel: CancellationToken::new(),
            on_event: None,
        }
    }

    #[must_use]
    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    #[must_use]
    pub fn with_progress(mut self, on_event: impl Fn(&UploadEvent) + Send + Sync + 'a) -> Self {
        self.on_event = Some(Box::new(on_event));
        self
    }

    fn emit(&self, event: &UploadEvent) {
        if let Some(on_event) = &self.on_event {
            on_event(event);
        }
    }

    fn check_cancelled(&self, phase: UploadPhase, completed: Vec<u64>) -> Result<(), UploadError> {
        if self.cancel.is_cancelled() {
            log::warn!("upload cancelled before {phase}");
            return Err(UploadError::Cancelled { phase, completed });
        }
        Ok(())
    }

    /// Upload `target` and return the object key.
    ///
    /// # Errors
    ///
    /// Will return `Err` naming the phase that failed, a failed chunk aborts the
    /// session before the upload is committed
    pub async fn upload(&self, target: &UploadTarget) -> Result<String, UploadError> {
        let plan = plan_with(target.size(), self.options.limits);

        log::info!(
            "Chunks for {} with size {}: chunk size: {}, number of chunks: {}",
            target.name(),
            target.size(),
            plan.chunk_size,
            plan.chunk_count
        );

        self.emit(&UploadEvent::Planned {
            plan,
            total_size: target.size(),
        });

        let mut state = State::Reserving;

        loop {
            state = match state {
                State::Reserving => {
                    self.check_cancelled(UploadPhase::Reserve, Vec::new())?;
                    self.emit(&UploadEvent::Phase(UploadPhase::Reserve));
                    State::Transferring(self.reserve(target, &plan).await?)
                }

                State::Transferring(reservation) => {
                    self.check_cancelled(UploadPhase::Transfer, Vec::new())?;
                    self.emit(&UploadEvent::Phase(UploadPhase::Transfer));
                    self.transfer(target, &plan, &reservation).await?;
                    State::Finalizing(reservation)
                }

                State::Finalizing(reservation) => {
                    self.check_cancelled(UploadPhase::Finalize, (0..plan.chunk_count).collect())?;
                    self.emit(&UploadEvent::Phase(UploadPhase::Finalize));
                    State::Done(self.finalize(target, &reservation).await?)
                }

                State::Done(object_key) => {
                    log::info!("Upload finished, objectKey: {object_key}");
                    return Ok(object_key);
                }
            };
        }
    }

    async fn reserve(
        &self,
        target: &UploadTarget,
        plan: &ChunkPlan,
    ) -> Result<UploadReservation, UploadError> {
        log::info!("Getting {} upload urls for {}", plan.chunk_count, target.name());

        let reservation = tokio::select! {
            biased;
            () = self.cancel.cancelled() => {
                return Err(UploadError::Cancelled { phase: UploadPhase::Reserve, completed: Vec::new() });
            }
            rs = self.transport.reserve_upload(target.name(), plan.chunk_count) => {
                rs.map_err(UploadError::Reservation)?
            }
        };

        let got = reservation.urls.len();
        if u64::try_from(got).ok() != Some(plan.chunk_count) {
            return Err(UploadError::ReservationMismatch {
                expected: plan.chunk_count,
                got,
            });
        }

        log::info!("Got {got} upload urls");

        Ok(reservation)
    }

    // bounded window of in-flight chunks, the first failure drops the rest
    async fn transfer(
        &self,
        target: &UploadTarget,
        plan: &ChunkPlan,
        reservation: &UploadReservation,
    ) -> Result<(), UploadError> {
        let max_requests = self.options.max_concurrency.clamp(1, MAX_CONCURRENCY);
        let mut pending = plan.ranges(target.size()).zip(reservation.urls.iter());
        let mut tasks = FuturesUnordered::new();
        let mut completed: Vec<u64> = Vec::with_capacity(reservation.urls.len());

        log::debug!("Max concurrent requests: {max_requests}");

        loop {
            while tasks.len() < max_requests {
                let Some((range, url)) = pending.next() else {
                    break;
                };
                log::debug!("Task push chunk: {}", range.index);
                tasks.push(self.send_chunk(target, range, url, plan.chunk_count));
            }

            if tasks.is_empty() {
                break;
            }

            tokio::select! {
                biased;
                () = self.cancel.cancelled() => {
                    completed.sort_unstable();
                    return Err(UploadError::Cancelled { phase: UploadPhase::Transfer, completed });
                }
                Some(rs) = tasks.next() => match rs {
                    Ok(range) => {
                        completed.push(range.index);
                        self.emit(&UploadEvent::ChunkSent { index: range.index, bytes: range.len() });
                    }
                    Err((chunk_index, source)) => {
                        log::error!("Error uploading chunk {chunk_index}: {source}");
                        completed.sort_unstable();
                        return Err(UploadError::Transfer { chunk_index, completed, source });
                    }
                },
            }
        }

        Ok(())
    }

    async fn send_chunk(
        &self,
        target: &UploadTarget,
        range: ChunkRange,
        url: &str,
        count: u64,
    ) -> ChunkResult {
        log::debug!("Uploading chunk {} of {}", range.index + 1, count);

        let bytes = target
            .read_range(&range)
            .await
            .map_err(|e| (range.index, TransportError::Io(e)))?;

        self.transport
            .put_chunk(url, range.index, bytes)
            .await
            .map_err(|e| (range.index, e))?;

        Ok(range)
    }

    async fn finalize(
        &self,
        target: &UploadTarget,
        reservation: &UploadReservation,
    ) -> Result<String, UploadError> {
        log::info!("Completing upload for {}", target.name());

        let request = CompleteUploadRequest::new(
            &reservation.object_key,
            &reservation.upload_key,
            target.name(),
            target.size(),
        );

        let completed = tokio::select! {
            biased;
            () = self.cancel.cancelled() => {
                let completed = (0..reservation.urls.len() as u64).collect();
                return Err(UploadError::Cancelled { phase: UploadPhase::Finalize, completed });
            }
            rs = self.transport.finalize_upload(&request) => rs.map_err(UploadError::Finalize)?,
        };

        if completed.object_key.is_empty() {
            log::warn!("complete-upload returned no objectKey, using the reserved one");
            return Ok(reservation.object_key.clone());
        }

        if completed.object_key != reservation.object_key {
            log::info!(
                "objectKey {} superseded by {}",
                reservation.object_key,
                completed.object_key
            );
        }

        Ok(completed.object_key)
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;
    use crate::api::responses::CompletedUpload;
    use async_trait::async_trait;
    use bytes::Bytes;
    use std::{io::Write, sync::Mutex, time::Duration};
    use tempfile::NamedTempFile;

    #[derive(Default)]
    struct FakeTransport {
        fail_at: Option<u64>,
        missing_urls: u64,
        cancel_at: Option<(u64, CancellationToken)>,
        // chunks that don't fail take this long to confirm
        latency: Option<Duration>,
        calls: Mutex<Vec<String>>,
    }

    impl FakeTransport {
        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: String) {
            self.calls.lock().unwrap().push(call);
        }
    }

    #[async_trait]
    impl UploadTransport for FakeTransport {
        async fn reserve_upload(
            &self,
            file_name: &str,
            parts: u64,
        ) -> Result<UploadReservation, TransportError> {
            self.record(format!("reserve:{file_name}:{parts}"));
            Ok(UploadReservation {
                urls: (0..parts - self.missing_urls)
                    .map(|i| format!("https://bucket/part{i}"))
                    .collect(),
                object_key: "urn:obj:1".to_string(),
                upload_key: "upl-1".to_string(),
            })
        }

        async fn put_chunk(&self, url: &str, index: u64, bytes: Bytes) -> Result<(), TransportError> {
            self.record(format!("put:{index}:{}", bytes.len()));
            assert_eq!(url, format!("https://bucket/part{index}"));
            if let Some((at, token)) = &self.cancel_at {
                if *at == index {
                    token.cancel();
                }
            }
            if self.fail_at == Some(index) {
                return Err(TransportError::from_status(500, "boom".to_string()));
            }
            if let Some(latency) = self.latency {
                tokio::time::sleep(latency).await;
                self.record(format!("done:{index}"));
            }
            Ok(())
        }

        async fn finalize_upload(
            &self,
            request: &CompleteUploadRequest,
        ) -> Result<CompletedUpload, TransportError> {
            self.record(format!("finalize:{}:{}", request.file_name, request.file_size));
            assert_eq!(request.upload_key, "upl-1");
            Ok(CompletedUpload {
                object_key: request.object_key.clone(),
            })
        }
    }

    // 4 byte chunks, a 20 byte file makes 5 of them
    fn options(max_concurrency: usize) -> UploadOptions {
        UploadOptions {
            limits: ChunkLimits::new(25, 4),
            max_concurrency,
        }
    }

    async fn target(content: &[u8]) -> (NamedTempFile, UploadTarget) {
        let mut tmp_file = NamedTempFile::new().unwrap();
        tmp_file.write_all(content).unwrap();
        let target = UploadTarget::open(tmp_file.path()).await.unwrap();
        (tmp_file, target)
    }

    #[tokio::test]
    async fn test_upload_in_order() {
        let transport = FakeTransport::default();
        let (_tmp, target) = target(b"0123456789abcdefghij").await;

        let key = UploadSession::new(&transport, options(1))
            .upload(&target)
            .await
            .unwrap();
        assert_eq!(key, "urn:obj:1");

        let name = target.name().to_string();
        assert_eq!(
            transport.calls(),
            vec![
                format!("reserve:{name}:5"),
                "put:0:4".to_string(),
                "put:1:4".to_string(),
                "put:2:4".to_string(),
                "put:3:4".to_string(),
                "put:4:4".to_string(),
                format!("finalize:{name}:20"),
            ]
        );
    }

    #[tokio::test]
    async fn test_upload_concurrent_sends_every_chunk_once() {
        let transport = FakeTransport::default();
        let (_tmp, target) = target(b"0123456789abcdefghi").await;

        UploadSession::new(&transport, options(3))
            .upload(&target)
            .await
            .unwrap();

        let calls = transport.calls();
        let mut puts: Vec<&String> = calls.iter().filter(|c| c.starts_with("put:")).collect();
        puts.sort();
        assert_eq!(puts, vec!["put:0:4", "put:1:4", "put:2:4", "put:3:4", "put:4:3"]);
        assert!(calls.last().unwrap().starts_with("finalize:"));
    }

    #[tokio::test]
    async fn test_failed_chunk_skips_finalize() {
        let transport = FakeTransport {
            fail_at: Some(2),
            ..FakeTransport::default()
        };
        let (_tmp, target) = target(b"0123456789abcdefghij").await;

        let err = UploadSession::new(&transport, options(1))
            .upload(&target)
            .await
            .unwrap_err();

        match &err {
            UploadError::Transfer {
                chunk_index,
                completed,
                source,
            } => {
                assert_eq!(*chunk_index, 2);
                assert_eq!(completed, &vec![0, 1]);
                assert_eq!(source.http_failure().unwrap().status, 500);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(err.phase(), UploadPhase::Transfer);

        let calls = transport.calls();
        assert!(!calls.iter().any(|c| c.starts_with("finalize")));
        assert!(!calls.iter().any(|c| c.starts_with("put:3")));
    }

    #[tokio::test]
    async fn test_concurrent_failure_drops_in_flight_chunks() {
        let transport = FakeTransport {
            fail_at: Some(2),
            latency: Some(Duration::from_secs(30)),
            ..FakeTransport::default()
        };
        let (_tmp, target) = target(b"0123456789abcdefghij").await;

        let err = tokio::time::timeout(
            Duration::from_secs(10),
            UploadSession::new(&transport, options(4)).upload(&target),
        )
        .await
        .expect("failure should not wait on in-flight chunks")
        .unwrap_err();

        match &err {
            UploadError::Transfer {
                chunk_index,
                completed,
                ..
            } => {
                assert_eq!(*chunk_index, 2);
                assert!(completed.is_empty());
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let calls = transport.calls();
        assert!(calls.iter().any(|c| c.starts_with("put:2")));
        assert!(!calls.iter().any(|c| c.starts_with("put:4")));
        assert!(!calls.iter().any(|c| c.starts_with("done:")));
        assert!(!calls.iter().any(|c| c.starts_with("finalize")));
    }

    #[tokio::test]
    async fn test_empty_file_single_part() {
        let transport = FakeTransport::default();
        let (_tmp, target) = target(b"").await;

        let events = Mutex::new(Vec::new());
        let key = UploadSession::new(&transport, options(1))
            .with_progress(|e| events.lock().unwrap().push(e.clone()))
            .upload(&target)
            .await
            .unwrap();
        assert_eq!(key, "urn:obj:1");

        let calls = transport.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[1], "put:0:0");

        let events = events.into_inner().unwrap();
        assert_eq!(
            events[0],
            UploadEvent::Planned {
                plan: ChunkPlan {
                    chunk_size: 0,
                    chunk_count: 1
                },
                total_size: 0
            }
        );
        assert!(events.contains(&UploadEvent::ChunkSent { index: 0, bytes: 0 }));
        assert_eq!(
            events.last(),
            Some(&UploadEvent::Phase(UploadPhase::Finalize))
        );
    }

    #[tokio::test]
    async fn test_reservation_mismatch() {
        let transport = FakeTransport {
            missing_urls: 1,
            ..FakeTransport::default()
        };
        let (_tmp, target) = target(b"0123456789abcdefghij").await;

        let err = UploadSession::new(&transport, options(1))
            .upload(&target)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            UploadError::ReservationMismatch {
                expected: 5,
                got: 4
            }
        ));
        assert_eq!(transport.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_cancel_before_start() {
        let transport = FakeTransport::default();
        let (_tmp, target) = target(b"0123").await;
        let token = CancellationToken::new();
        token.cancel();

        let err = UploadSession::new(&transport, options(1))
            .with_cancel(token)
            .upload(&target)
            .await
            .unwrap_err();
        assert_eq!(err.phase(), UploadPhase::Reserve);
        assert!(transport.calls().is_empty());
    }

    #[tokio::test]
    async fn test_cancel_during_transfer() {
        let token = CancellationToken::new();
        let transport = FakeTransport {
            cancel_at: Some((1, token.clone())),
            ..FakeTransport::default()
        };
        let (_tmp, target) = target(b"0123456789abcdefghij").await;

        let err = UploadSession::new(&transport, options(1))
            .with_cancel(token)
            .upload(&target)
            .await
            .unwrap_err();

        match err {
            UploadError::Cancelled { phase, completed } => {
                assert_eq!(phase, UploadPhase::Transfer);
                assert_eq!(completed.first(), Some(&0));
                assert!(completed.len() <= 2);
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let calls = transport.calls();
        assert!(!calls.iter().any(|c| c.starts_with("put:2")));
        assert!(!calls.iter().any(|c| c.starts_with("finalize")));
    }
}
