use snafu::Snafu;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum GatewayError {
    #[snafu(display("gateway endpoint is empty on `{stage}`"))]
    MissingEndpoint { stage: &'static str },
    #[snafu(display("failed to build http client on `{stage}`, {source}"))]
    BuildClient {
        stage: &'static str,
        source: reqwest::Error,
    },
    #[snafu(display("request to {url} failed on `{stage}`, {source}"))]
    Request {
        stage: &'static str,
        url: String,
        source: reqwest::Error,
    },
    #[snafu(display("gateway returned status {status} on `{stage}`: {body}"))]
    Status {
        stage: &'static str,
        status: u16,
        body: String,
    },
    #[snafu(display("failed to read response body on `{stage}`, {source}"))]
    ReadBody {
        stage: &'static str,
        source: reqwest::Error,
    },
    #[snafu(display("failed to parse gateway reply on `{stage}`, {source}"))]
    ParseReply {
        stage: &'static str,
        source: serde_json::Error,
    },
    #[snafu(display("advice stream broke on `{stage}`, {source}"))]
    StreamChunk {
        stage: &'static str,
        source: reqwest::Error,
    },
}

pub type GatewayResult<T> = Result<T, GatewayError>;
