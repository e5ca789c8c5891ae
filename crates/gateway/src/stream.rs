use bytes::Bytes;
use futures::StreamExt;
use futures::stream::BoxStream;
use tokio::sync::oneshot;

use crate::error::GatewayResult;

pub type ChunkStream = BoxStream<'static, GatewayResult<Bytes>>;

/// Pull reader over a streamed advice body.
///
/// The underlying body is released exactly once: on [`AdviceStream::release`], or on
/// drop when the reader leaves scope early (including on an error path).
pub struct AdviceStream {
    chunks: Option<ChunkStream>,
    release_tx: Option<oneshot::Sender<()>>,
}

impl AdviceStream {
    pub fn new(chunks: ChunkStream) -> Self {
        Self {
            chunks: Some(chunks),
            release_tx: None,
        }
    }

    /// Builds a stream from already available chunks.
    pub fn from_chunks<I>(chunks: I) -> Self
    where
        I: IntoIterator<Item = GatewayResult<Bytes>>,
        I::IntoIter: Send + 'static,
    {
        Self::new(futures::stream::iter(chunks).boxed())
    }

    /// Notifies `release_tx` once the body has been released.
    pub fn with_release_signal(mut self, release_tx: oneshot::Sender<()>) -> Self {
        self.release_tx = Some(release_tx);
        self
    }

    /// Next chunk in arrival order, or `None` once the body is exhausted.
    pub async fn read(&mut self) -> Option<GatewayResult<Bytes>> {
        let chunks = self.chunks.as_mut()?;
        chunks.next().await
    }

    pub fn is_released(&self) -> bool {
        self.chunks.is_none()
    }

    pub fn release(mut self) {
        self.release_inner();
    }

    fn release_inner(&mut self) {
        if self.chunks.take().is_none() {
            return;
        }

        tracing::trace!("advice stream released");
        if let Some(release_tx) = self.release_tx.take() {
            let _ = release_tx.send(());
        }
    }
}

impl Drop for AdviceStream {
    fn drop(&mut self) {
        self.release_inner();
    }
}

impl std::fmt::Debug for AdviceStream {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("AdviceStream")
            .field("released", &self.is_released())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GatewayError;

    #[tokio::test]
    async fn reads_chunks_in_order_then_ends() {
        let mut stream = AdviceStream::from_chunks(vec![
            Ok(Bytes::from_static(b"Hel")),
            Ok(Bytes::from_static(b"lo")),
        ]);

        let first = stream.read().await.transpose().ok().flatten();
        let second = stream.read().await.transpose().ok().flatten();

        assert_eq!(first, Some(Bytes::from_static(b"Hel")));
        assert_eq!(second, Some(Bytes::from_static(b"lo")));
        assert!(stream.read().await.is_none());
    }

    #[tokio::test]
    async fn explicit_release_signals_once() {
        let (release_tx, mut release_rx) = oneshot::channel();
        let stream = AdviceStream::from_chunks(vec![Ok(Bytes::from_static(b"x"))])
            .with_release_signal(release_tx);

        stream.release();

        assert!(release_rx.try_recv().is_ok());
    }

    #[tokio::test]
    async fn dropping_mid_stream_releases() {
        let (release_tx, release_rx) = oneshot::channel();
        let mut stream = AdviceStream::from_chunks(vec![
            Ok(Bytes::from_static(b"partial")),
            Err(GatewayError::Status {
                stage: "test",
                status: 500,
                body: "boom".to_string(),
            }),
        ])
        .with_release_signal(release_tx);

        assert!(matches!(stream.read().await, Some(Ok(_))));
        assert!(matches!(stream.read().await, Some(Err(_))));
        drop(stream);

        assert!(release_rx.await.is_ok());
    }

    #[tokio::test]
    async fn released_stream_reads_nothing() {
        let mut stream = AdviceStream::from_chunks(vec![Ok(Bytes::from_static(b"x"))]);
        stream.release_inner();

        assert!(stream.is_released());
        assert!(stream.read().await.is_none());
    }
}
