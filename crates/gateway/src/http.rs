use compass_timeline::{MessageReply, Snippet};
use futures::StreamExt;
use serde::Serialize;
use snafu::{ResultExt, ensure};

use crate::error::{
    BuildClientSnafu, GatewayError, GatewayResult, MissingEndpointSnafu, ParseReplySnafu,
    ReadBodySnafu, RequestSnafu, StatusSnafu,
};
use crate::stream::AdviceStream;
use crate::{BoxFuture, Gateway};

pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000";
const CHAT_PATH: &str = "/api/chat";
const ADVICE_PATH: &str = "/api/get_advice";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    pub endpoint: String,
}

impl GatewayConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into().trim().trim_end_matches('/').to_string(),
        }
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self::new(DEFAULT_ENDPOINT)
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
}

#[derive(Debug, Serialize)]
struct AdviceRequest<'a> {
    message: &'a str,
    snippets: &'a [Snippet],
}

/// Gateway speaking to the Compass HTTP API.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpGateway {
    pub fn new(config: GatewayConfig) -> GatewayResult<Self> {
        ensure!(
            !config.endpoint.is_empty(),
            MissingEndpointSnafu {
                stage: "http-gateway-new",
            }
        );

        let client = reqwest::Client::builder().build().context(BuildClientSnafu {
            stage: "build-client",
        })?;

        Ok(Self {
            client,
            endpoint: config.endpoint,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.endpoint, path)
    }

    async fn post_json<T>(
        &self,
        stage: &'static str,
        path: &str,
        body: &T,
    ) -> GatewayResult<reqwest::Response>
    where
        T: Serialize + ?Sized,
    {
        let url = self.url(path);
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .context(RequestSnafu {
                stage,
                url: url.clone(),
            })?;

        let status = response.status();
        if !status.is_success() {
            // Body is diagnostic only; an unreadable body must not mask the status.
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(
                url = %url,
                status = status.as_u16(),
                "gateway returned an error status"
            );
            return StatusSnafu {
                stage,
                status: status.as_u16(),
                body,
            }
            .fail();
        }

        Ok(response)
    }

    async fn send_message_inner(&self, text: &str) -> GatewayResult<MessageReply> {
        let response = self
            .post_json("send-message", CHAT_PATH, &ChatRequest { message: text })
            .await?;

        let payload = response.text().await.context(ReadBodySnafu {
            stage: "read-chat-reply",
        })?;

        let reply: MessageReply = serde_json::from_str(&payload).context(ParseReplySnafu {
            stage: "parse-chat-reply",
        })?;

        tracing::debug!(
            crisis = reply.crisis,
            snippet_count = reply.snippets.len(),
            "received chat reply"
        );
        Ok(reply)
    }

    async fn get_advice_inner(
        &self,
        context: &str,
        snippets: &[Snippet],
    ) -> GatewayResult<AdviceStream> {
        let response = self
            .post_json(
                "get-advice",
                ADVICE_PATH,
                &AdviceRequest {
                    message: context,
                    snippets,
                },
            )
            .await?;

        let chunks = response
            .bytes_stream()
            .map(|chunk| {
                chunk.map_err(|source| GatewayError::StreamChunk {
                    stage: "advice-chunk",
                    source,
                })
            })
            .boxed();

        Ok(AdviceStream::new(chunks))
    }
}

impl Gateway for HttpGateway {
    fn send_message<'a>(&'a self, text: &'a str) -> BoxFuture<'a, GatewayResult<MessageReply>> {
        Box::pin(self.send_message_inner(text))
    }

    fn get_advice<'a>(
        &'a self,
        context: &'a str,
        snippets: &'a [Snippet],
    ) -> BoxFuture<'a, GatewayResult<AdviceStream>> {
        Box::pin(self.get_advice_inner(context, snippets))
    }
}
