#![deny(unsafe_code)]

//! Backend contract for the Compass chat client.

use std::future::Future;
use std::pin::Pin;

use compass_timeline::{MessageReply, Snippet};

pub mod error;
pub mod http;
pub mod stream;

pub use error::{GatewayError, GatewayResult};
pub use http::{DEFAULT_ENDPOINT, GatewayConfig, HttpGateway};
pub use stream::{AdviceStream, ChunkStream};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// External backend providing retrieval and advice generation.
pub trait Gateway: Send + Sync {
    /// Looks up reference snippets for one user message, or flags a crisis.
    fn send_message<'a>(&'a self, text: &'a str) -> BoxFuture<'a, GatewayResult<MessageReply>>;

    /// Opens a streamed advice body built from `context` and `snippets`.
    fn get_advice<'a>(
        &'a self,
        context: &'a str,
        snippets: &'a [Snippet],
    ) -> BoxFuture<'a, GatewayResult<AdviceStream>>;
}
