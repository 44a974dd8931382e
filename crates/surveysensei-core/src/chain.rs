//! Chain selection and the create-survey contract call.
//!
//! The call is ABI-encoded here so that any wallet transport only has to
//! forward `{ from, to, value, data }`.

use ethers::abi::{Token, encode};
use ethers::types::{Address, U256};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::reward::{RewardError, to_base_units};
use crate::survey::SurveyPlan;

pub const BNB_MAINNET_ID: u64 = 56;
pub const BNB_TESTNET_ID: u64 = 97;

/// Deployed survey rewards contract.
pub const DEFAULT_SURVEY_CONTRACT: &str = "0xF01973c4A8eDC7B8173AdC8E097A1EfE479f4571";

pub const CREATE_SURVEY_SIGNATURE: &str = "createSurveyOnChain(string,address,uint256,uint256)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Mainnet,
    Testnet,
}

impl Network {
    /// 56 selects mainnet; every other id falls back to testnet.
    pub fn from_chain_id(id: u64) -> Self {
        if id == BNB_MAINNET_ID {
            Self::Mainnet
        } else {
            Self::Testnet
        }
    }

    pub fn chain_id(&self) -> u64 {
        match self {
            Self::Mainnet => BNB_MAINNET_ID,
            Self::Testnet => BNB_TESTNET_ID,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Mainnet => "BNB Smart Chain",
            Self::Testnet => "BNB Smart Chain Testnet",
        }
    }

    pub fn explorer_tx_base(&self) -> &'static str {
        match self {
            Self::Mainnet => "https://bscscan.com/tx/",
            Self::Testnet => "https://testnet.bscscan.com/tx/",
        }
    }

    pub fn default_rpc_url(&self) -> &'static str {
        match self {
            Self::Mainnet => "https://bsc-dataseed.binance.org",
            Self::Testnet => "https://data-seed-prebsc-1-s1.binance.org:8545",
        }
    }

    pub fn tx_url(&self, hash: &str) -> String {
        format!("{}{}", self.explorer_tx_base(), hash)
    }
}

/// Where and how the create-survey transaction is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainConfig {
    pub network: Network,
    pub contract_address: String,
    pub rpc_url: String,
}

impl ChainConfig {
    /// Defaults for the given chain id: the deployed contract and the
    /// network's public RPC.
    pub fn from_chain_id(id: u64) -> Self {
        let network = Network::from_chain_id(id);
        Self {
            network,
            contract_address: DEFAULT_SURVEY_CONTRACT.to_string(),
            rpc_url: network.default_rpc_url().to_string(),
        }
    }

    pub fn with_contract(mut self, address: impl Into<String>) -> Self {
        self.contract_address = address.into();
        self
    }

    pub fn with_rpc_url(mut self, url: impl Into<String>) -> Self {
        self.rpc_url = url.into();
        self
    }
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self::from_chain_id(BNB_TESTNET_ID)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CallError {
    #[error(transparent)]
    Reward(#[from] RewardError),

    #[error("invalid address: {0}")]
    InvalidAddress(String),
}

/// `createSurveyOnChain(surveyId, creator, totalReward, targetResponses)`
/// with `totalReward` also attached as the transaction value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateSurveyCall {
    pub contract: String,
    pub survey_id: String,
    pub creator: String,
    pub total_reward_base_units: u128,
    pub target_responses: u64,
}

impl CreateSurveyCall {
    pub fn from_plan(
        config: &ChainConfig,
        plan: &SurveyPlan,
        creator: &str,
    ) -> Result<Self, CallError> {
        Ok(Self {
            contract: config.contract_address.clone(),
            survey_id: plan.survey_id.clone(),
            creator: creator.to_string(),
            total_reward_base_units: to_base_units(&plan.total_reward)?,
            target_responses: plan.target_responses,
        })
    }

    pub fn value(&self) -> u128 {
        self.total_reward_base_units
    }

    /// ABI-encoded calldata: selector followed by the encoded arguments.
    pub fn encode(&self) -> Result<Vec<u8>, CallError> {
        let creator = parse_address(&self.creator)?;
        let args = encode(&[
            Token::String(self.survey_id.clone()),
            Token::Address(creator),
            Token::Uint(U256::from(self.total_reward_base_units)),
            Token::Uint(U256::from(self.target_responses)),
        ]);

        let mut data = Vec::with_capacity(4 + args.len());
        data.extend_from_slice(&selector(CREATE_SURVEY_SIGNATURE));
        data.extend_from_slice(&args);
        Ok(data)
    }

    pub fn encode_hex(&self) -> Result<String, CallError> {
        Ok(format!("0x{}", hex::encode(self.encode()?)))
    }
}

/// First four bytes of the Keccak-256 hash of a function signature.
pub fn selector(signature: &str) -> [u8; 4] {
    ethers::utils::id(signature)
}

/// JSON-RPC quantity encoding (`0x`-prefixed, no leading zeros).
pub fn hex_quantity(value: u128) -> String {
    format!("{value:#x}")
}

/// Parse a 20-byte hex address, with or without `0x`.
pub fn parse_address(raw: &str) -> Result<Address, CallError> {
    let trimmed = raw.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    let bytes = hex::decode(digits).map_err(|_| CallError::InvalidAddress(raw.to_string()))?;
    let bytes: [u8; 20] = bytes
        .try_into()
        .map_err(|_| CallError::InvalidAddress(raw.to_string()))?;
    Ok(Address::from(bytes))
}
