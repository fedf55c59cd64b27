//! Asset identifier: the native asset sentinel or a token contract
//!
//! Native and token balances share one accounting structure; the asset
//! identifier is the ledger's first-dimension key for both.

use crate::ids::TokenId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Either the platform's native value unit or a specific fungible token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "address", rename_all = "lowercase")]
pub enum Asset {
    /// The native asset sentinel
    Native,
    /// A fungible token, identified by its contract address
    Token(TokenId),
}

impl Asset {
    /// Create a token asset from an address string
    pub fn token(address: impl Into<TokenId>) -> Self {
        Self::Token(address.into())
    }

    /// Check if this is the native-asset sentinel
    pub fn is_native(&self) -> bool {
        matches!(self, Asset::Native)
    }

    /// Get the token address, if this is a token asset
    pub fn token_id(&self) -> Option<&TokenId> {
        match self {
            Asset::Native => None,
            Asset::Token(id) => Some(id),
        }
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Asset::Native => write!(f, "native"),
            Asset::Token(id) => write!(f, "token:{}", id),
        }
    }
}

impl From<TokenId> for Asset {
    fn from(id: TokenId) -> Self {
        Self::Token(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_native_sentinel() {
        assert!(Asset::Native.is_native());
        assert!(Asset::Native.token_id().is_none());
    }

    #[test]
    fn test_token_asset() {
        let asset = Asset::token("0xTOK");
        assert!(!asset.is_native());
        assert_eq!(asset.token_id().unwrap().as_str(), "0xTOK");
    }

    #[test]
    fn test_asset_equality_is_by_address() {
        assert_eq!(Asset::token("0xTOK"), Asset::token("0xTOK"));
        assert_ne!(Asset::token("0xTOK"), Asset::token("0xOTHER"));
        assert_ne!(Asset::Native, Asset::token("0xTOK"));
    }

    #[test]
    fn test_asset_display() {
        assert_eq!(Asset::Native.to_string(), "native");
        assert_eq!(Asset::token("0xTOK").to_string(), "token:0xTOK");
    }

    #[test]
    fn test_asset_serialization() {
        let asset = Asset::token("0xTOK");
        let json = serde_json::to_string(&asset).unwrap();
        let deserialized: Asset = serde_json::from_str(&json).unwrap();
        assert_eq!(asset, deserialized);

        let native = Asset::Native;
        let json = serde_json::to_string(&native).unwrap();
        let deserialized: Asset = serde_json::from_str(&json).unwrap();
        assert_eq!(native, deserialized);
    }
}
