//! Wallet JSON-RPC transport for the create-survey transaction.
//!
//! Signing stays with the wallet: the call goes out as `eth_sendTransaction`
//! and the wallet (or a node holding the unlocked account) returns the hash.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use surveysensei_core::CreateSurveyCall;
use surveysensei_core::chain::hex_quantity;
use tracing::{info, warn};

use crate::api::{ChainError, TransactionSubmitter};

pub struct RpcWalletSubmitter {
    client: reqwest::Client,
    rpc_url: String,
}

#[derive(Debug, Deserialize)]
struct RpcReply {
    result: Option<serde_json::Value>,
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

impl RpcWalletSubmitter {
    pub fn new(rpc_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            rpc_url,
        }
    }
}

#[async_trait]
impl TransactionSubmitter for RpcWalletSubmitter {
    async fn submit(&self, call: &CreateSurveyCall) -> Result<String, ChainError> {
        let request = send_transaction_request(call)?;
        info!(
            rpc = %self.rpc_url,
            survey_id = %call.survey_id,
            value = %call.value(),
            "sending createSurveyOnChain"
        );

        let resp = self.client.post(&self.rpc_url).json(&request).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ChainError::Server {
                status: status.as_u16(),
                body,
            });
        }
        let text = resp.text().await?;
        let hash = parse_reply(&text)?;
        info!(tx_hash = %hash, "transaction submitted");
        Ok(hash)
    }
}

fn send_transaction_request(call: &CreateSurveyCall) -> Result<serde_json::Value, ChainError> {
    Ok(json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": "eth_sendTransaction",
        "params": [{
            "from": call.creator,
            "to": call.contract,
            "value": hex_quantity(call.value()),
            "data": call.encode_hex()?,
        }],
    }))
}

fn parse_reply(text: &str) -> Result<String, ChainError> {
    let reply: RpcReply =
        serde_json::from_str(text).map_err(|e| ChainError::Malformed(e.to_string()))?;
    if let Some(err) = reply.error {
        warn!(code = err.code, message = %err.message, "wallet rejected transaction");
        return Err(ChainError::Rejected {
            code: err.code,
            message: err.message,
        });
    }
    match reply.result {
        Some(serde_json::Value::String(hash)) if hash.starts_with("0x") => Ok(hash),
        other => Err(ChainError::Malformed(format!(
            "expected transaction hash, got {other:?}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use surveysensei_core::{ChainConfig, SurveyPlan};

    fn call() -> CreateSurveyCall {
        let plan = SurveyPlan {
            survey_id: "S1".into(),
            total_reward: "0.5".into(),
            target_responses: 10,
        };
        CreateSurveyCall::from_plan(
            &ChainConfig::default(),
            &plan,
            "0x00000000000000000000000000000000000000aa",
        )
        .unwrap()
    }

    #[test]
    fn request_carries_value_and_calldata() {
        let req = send_transaction_request(&call()).unwrap();
        let tx = &req["params"][0];
        assert_eq!(req["method"], "eth_sendTransaction");
        assert_eq!(tx["value"], "0x6f05b59d3b20000");
        assert!(tx["data"].as_str().unwrap().starts_with("0x"));
        assert_eq!(tx["from"], "0x00000000000000000000000000000000000000aa");
    }

    #[test]
    fn reply_with_hash_is_ok() {
        let hash = parse_reply(r#"{"jsonrpc":"2.0","id":1,"result":"0xdeadbeef"}"#).unwrap();
        assert_eq!(hash, "0xdeadbeef");
    }

    #[test]
    fn user_rejection_is_rejected_error() {
        let reply = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": {"code": 4001, "message": "User rejected the request."}
        });
        let err = parse_reply(&reply.to_string()).unwrap_err();
        match err {
            ChainError::Rejected { code, message } => {
                assert_eq!(code, 4001);
                assert_eq!(message, "User rejected the request.");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn reply_without_hash_is_malformed() {
        assert!(matches!(
            parse_reply(r#"{"jsonrpc":"2.0","id":1,"result":null}"#),
            Err(ChainError::Malformed(_))
        ));
        assert!(matches!(parse_reply("<html>"), Err(ChainError::Malformed(_))));
    }
}
