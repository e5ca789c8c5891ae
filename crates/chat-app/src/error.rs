use compass_gateway::GatewayError;
use snafu::Snafu;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum AppError {
    #[snafu(display("failed to create gateway on `{stage}`, {source}"))]
    CreateGateway {
        stage: &'static str,
        source: GatewayError,
    },
    #[snafu(display("failed to read input on `{stage}`, {source}"))]
    ReadInput {
        stage: &'static str,
        source: std::io::Error,
    },
}
