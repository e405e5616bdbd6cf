#![doc = include_str!("../README.md")]

pub mod cli;
pub mod endpoint;
pub mod error;
pub mod limiter;
pub mod plan;
pub mod report;
pub mod scenario;
pub mod sequencer;
pub mod transport;

pub(crate) mod transaction;

pub use error::{DriverError, TransportError};
pub use scenario::ScenarioRunner;
pub use sequencer::Sequencer;

pub mod prelude {
    pub use crate::cli::LoadCli;
    pub use crate::report::{ConsoleSink, OutputFormat, ReportSink};
    pub use crate::transport::{ApiRequest, HttpTransport, Transport};
    pub use crate::{DriverError, ScenarioRunner, Sequencer, TransportError};

    pub use catalog_load_core::{
        DriverConfig, Endpoint, OperationMix, RequestOutcome, ScenarioConfig, ScenarioReport,
    };
}
