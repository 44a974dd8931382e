//! Sync layer: survey agent API, response-shape decoding, bounded retry reads,
//! and wallet JSON-RPC submission.

pub mod api;
pub mod decode;
pub mod reader;
pub mod retry;

#[cfg(feature = "http")]
pub mod http;
#[cfg(feature = "http")]
pub mod rpc;

pub use api::{AnswerSubmission, ChainError, SurveyApi, SyncError, TransactionSubmitter};
pub use reader::{ConsistentReader, ReadOutcome};
pub use retry::{RetryPolicy, retry_with_delay};

#[cfg(feature = "http")]
pub use http::SurveyClient;
#[cfg(feature = "http")]
pub use rpc::RpcWalletSubmitter;
