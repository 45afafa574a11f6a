use std::fmt::{self, Display};

use near_sdk::{
    borsh::{self, BorshDeserialize, BorshSerialize},
    json_types::Base64VecU8,
    serde::{Deserialize, Serialize},
    AccountId,
};

use crate::error::CodecError;
use crate::fraction::U256;

/// Width of an encoded `Uint256` value.
const UINT256_LEN: usize = 32;

#[derive(
    BorshDeserialize, BorshSerialize, Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq,
)]
#[serde(crate = "near_sdk::serde")]
pub enum ParameterType {
    None,
    Address,
    Uint256,
    String,
    Bytes,
    Bool,
}

impl Display for ParameterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ParameterType::None => "none",
            ParameterType::Address => "address",
            ParameterType::Uint256 => "uint256",
            ParameterType::String => "string",
            ParameterType::Bytes => "bytes",
            ParameterType::Bool => "bool",
        };
        write!(f, "{}", name)
    }
}

/// Named parameter as kept in the store: raw bytes plus the declared type tag.
#[derive(BorshDeserialize, BorshSerialize, Serialize, Deserialize, Clone)]
#[cfg_attr(not(target_arch = "wasm32"), derive(Debug, PartialEq))]
#[serde(crate = "near_sdk::serde")]
pub struct Parameter {
    pub name: String,
    pub value: Base64VecU8,
    pub parameter_type: ParameterType,
}

/// Decoded form of a parameter value.
#[derive(Clone)]
#[cfg_attr(not(target_arch = "wasm32"), derive(Debug, PartialEq))]
pub enum ParameterValue {
    None,
    Address(AccountId),
    Uint256(U256),
    String(String),
    Bytes(Vec<u8>),
    Bool(bool),
}

impl ParameterValue {
    pub fn parameter_type(&self) -> ParameterType {
        match self {
            ParameterValue::None => ParameterType::None,
            ParameterValue::Address(_) => ParameterType::Address,
            ParameterValue::Uint256(_) => ParameterType::Uint256,
            ParameterValue::String(_) => ParameterType::String,
            ParameterValue::Bytes(_) => ParameterType::Bytes,
            ParameterValue::Bool(_) => ParameterType::Bool,
        }
    }

    fn encode(&self) -> Vec<u8> {
        match self {
            ParameterValue::None => vec![],
            ParameterValue::Address(account_id) => account_id.as_str().as_bytes().to_vec(),
            ParameterValue::Uint256(value) => {
                let mut bytes = vec![0; UINT256_LEN];
                value.to_big_endian(&mut bytes);
                bytes
            }
            ParameterValue::String(value) => value.as_bytes().to_vec(),
            ParameterValue::Bytes(value) => value.clone(),
            ParameterValue::Bool(value) => vec![*value as u8],
        }
    }
}

impl Parameter {
    pub fn new(name: &str, value: ParameterValue) -> Self {
        Self {
            name: name.to_string(),
            value: value.encode().into(),
            parameter_type: value.parameter_type(),
        }
    }

    /// Decodes the value according to its declared tag.
    pub fn decode(&self) -> Result<ParameterValue, CodecError> {
        let bytes = self.value.0.as_slice();
        let value = match self.parameter_type {
            ParameterType::None => ParameterValue::None,
            ParameterType::Address => {
                let account = std::str::from_utf8(bytes)
                    .ok()
                    .and_then(|s| s.parse::<AccountId>().ok())
                    .ok_or_else(|| self.malformed())?;
                ParameterValue::Address(account)
            }
            ParameterType::Uint256 => {
                if bytes.len() != UINT256_LEN {
                    return Err(self.malformed());
                }
                ParameterValue::Uint256(U256::from_big_endian(bytes))
            }
            ParameterType::String => ParameterValue::String(
                String::from_utf8(bytes.to_vec()).map_err(|_| self.malformed())?,
            ),
            ParameterType::Bytes => ParameterValue::Bytes(bytes.to_vec()),
            ParameterType::Bool => match bytes {
                [0] => ParameterValue::Bool(false),
                [1] => ParameterValue::Bool(true),
                _ => return Err(self.malformed()),
            },
        };
        Ok(value)
    }

    fn expect_type(&self, expected: ParameterType) -> Result<(), CodecError> {
        if self.parameter_type != expected {
            return Err(CodecError::invalid_type(
                &self.name,
                expected,
                self.parameter_type,
            ));
        }
        Ok(())
    }

    fn malformed(&self) -> CodecError {
        CodecError::MalformedValue(self.name.clone())
    }

    pub fn as_address(&self) -> Result<AccountId, CodecError> {
        self.expect_type(ParameterType::Address)?;
        match self.decode()? {
            ParameterValue::Address(account_id) => Ok(account_id),
            _ => Err(self.malformed()),
        }
    }

    pub fn as_uint256(&self) -> Result<U256, CodecError> {
        self.expect_type(ParameterType::Uint256)?;
        match self.decode()? {
            ParameterValue::Uint256(value) => Ok(value),
            _ => Err(self.malformed()),
        }
    }

    pub fn as_string(&self) -> Result<String, CodecError> {
        self.expect_type(ParameterType::String)?;
        match self.decode()? {
            ParameterValue::String(value) => Ok(value),
            _ => Err(self.malformed()),
        }
    }

    pub fn as_bytes(&self) -> Result<Vec<u8>, CodecError> {
        self.expect_type(ParameterType::Bytes)?;
        Ok(self.value.0.clone())
    }

    pub fn as_bool(&self) -> Result<bool, CodecError> {
        self.expect_type(ParameterType::Bool)?;
        match self.decode()? {
            ParameterValue::Bool(value) => Ok(value),
            _ => Err(self.malformed()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_accessors() {
        let quorum = Parameter::new(
            "constitution.quorum",
            ParameterValue::Uint256(U256::from(10u128.pow(26))),
        );
        assert_eq!(quorum.value.0.len(), 32);
        assert_eq!(quorum.as_uint256(), Ok(U256::from(10u128.pow(26))));

        let flag = Parameter::new("flag", ParameterValue::Bool(true));
        assert_eq!(flag.as_bool(), Ok(true));

        let owner = Parameter::new(
            "owner",
            ParameterValue::Address("owner.near".parse().unwrap()),
        );
        assert_eq!(owner.as_address().unwrap().as_str(), "owner.near");

        let url = Parameter::new("url", ParameterValue::String("https://dao".into()));
        assert_eq!(url.decode(), Ok(ParameterValue::String("https://dao".into())));
    }

    #[test]
    fn mismatched_tag_is_rejected() {
        let url = Parameter::new("url", ParameterValue::String("x".into()));
        assert_eq!(
            url.as_uint256(),
            Err(CodecError::InvalidParameterType {
                name: "url".into(),
                expected: ParameterType::Uint256,
                actual: ParameterType::String,
            })
        );
        assert_eq!(
            url.as_bool().unwrap_err().to_string(),
            "invalid parameter type for url: expected bool, got string"
        );
    }

    #[test]
    fn malformed_payload_is_rejected() {
        let broken = Parameter {
            name: "flag".into(),
            value: vec![7].into(),
            parameter_type: ParameterType::Bool,
        };
        assert_eq!(broken.as_bool(), Err(CodecError::MalformedValue("flag".into())));

        let short = Parameter {
            name: "big".into(),
            value: vec![1; 31].into(),
            parameter_type: ParameterType::Uint256,
        };
        assert_eq!(short.as_uint256(), Err(CodecError::MalformedValue("big".into())));
    }

    #[test]
    fn uint256_keeps_all_32_bytes() {
        let wide = Parameter {
            name: "big".into(),
            value: vec![1; 32].into(),
            parameter_type: ParameterType::Uint256,
        };
        let value = wide.as_uint256().unwrap();
        assert!(value > U256::from(u128::MAX));
        assert_eq!(value.byte(31), 1);

        let max = Parameter::new("max", ParameterValue::Uint256(U256::MAX));
        assert_eq!(max.value.0, vec![0xff; 32]);
        assert_eq!(max.as_uint256(), Ok(U256::MAX));
    }
}
