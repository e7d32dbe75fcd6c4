//! Address helpers
//!
//! Addresses are opaque comparable strings. The only structure the gate looks
//! at is the 20 byte account behind them: EVM senders use the `0x` hex form,
//! native accounts the bech32 form, and either one may appear in the exempt
//! list.

use crate::error::{LockupError, Result};
use bech32::{FromBase32, ToBase32, Variant};

/// Length in bytes of an EVM address.
pub const ETH_ADDRESS_LEN: usize = 20;

const MAX_ADDRESS_LENGTH: usize = 128;

/// Parses a `0x` prefixed EVM address and returns its canonical lowercase form.
pub fn normalize_eth_address(addr: &str) -> Result<String> {
    Ok(format!("0x{}", hex::encode(eth_address_bytes(addr)?)))
}

fn eth_address_bytes(addr: &str) -> Result<Vec<u8>> {
    let hex_part = addr
        .strip_prefix("0x")
        .or_else(|| addr.strip_prefix("0X"))
        .ok_or_else(|| LockupError::InvalidParams(format!("address {} is missing 0x prefix", addr)))?;

    let bytes = hex::decode(hex_part)
        .map_err(|e| LockupError::InvalidParams(format!("invalid hex address {}: {}", addr, e)))?;
    if bytes.len() != ETH_ADDRESS_LEN {
        return Err(LockupError::InvalidParams(format!(
            "EVM address must be {} bytes, got {}",
            ETH_ADDRESS_LEN,
            bytes.len()
        )));
    }

    Ok(bytes)
}

/// Encodes the account behind a `0x` address as bech32 under `prefix`.
pub fn eth_to_bech32(addr: &str, prefix: &str) -> Result<String> {
    let bytes = eth_address_bytes(addr)?;
    bech32::encode(prefix, bytes.to_base32(), Variant::Bech32)
        .map_err(|e| LockupError::InvalidParams(format!("cannot encode {} as bech32: {}", addr, e)))
}

/// Decodes a bech32 account address under `prefix` into its `0x` form.
pub fn bech32_to_eth(addr: &str, prefix: &str) -> Result<String> {
    let (hrp, data, _variant) = bech32::decode(addr)
        .map_err(|e| LockupError::InvalidParams(format!("invalid bech32 address {}: {}", addr, e)))?;
    if hrp != prefix {
        return Err(LockupError::InvalidParams(format!(
            "address {} has prefix {}, expected {}",
            addr, hrp, prefix
        )));
    }
    let bytes = Vec::<u8>::from_base32(&data)
        .map_err(|e| LockupError::InvalidParams(format!("invalid bech32 address {}: {}", addr, e)))?;
    if bytes.len() != ETH_ADDRESS_LEN {
        return Err(LockupError::InvalidParams(format!(
            "account address must be {} bytes, got {}",
            ETH_ADDRESS_LEN,
            bytes.len()
        )));
    }
    Ok(format!("0x{}", hex::encode(bytes)))
}

/// Every form of `addr` that names the same account: the address itself,
/// plus its canonical `0x` and bech32 encodings when it parses as either.
pub fn account_aliases(addr: &str, prefix: &str) -> Vec<String> {
    let mut aliases = vec![addr.to_string()];
    if is_eth_address(addr) {
        aliases.extend(normalize_eth_address(addr).ok());
        aliases.extend(eth_to_bech32(addr, prefix).ok());
    } else if let Ok(eth) = bech32_to_eth(addr, prefix) {
        aliases.extend(eth_to_bech32(&eth, prefix).ok());
        aliases.push(eth);
    }
    aliases
}

fn is_eth_address(addr: &str) -> bool {
    addr.starts_with("0x") || addr.starts_with("0X")
}

/// Validates an address for inclusion in the exempt list.
pub fn validate_address(addr: &str) -> Result<()> {
    if addr.is_empty() {
        return Err(LockupError::InvalidParams("address cannot be empty".to_string()));
    }
    if addr.len() > MAX_ADDRESS_LENGTH {
        return Err(LockupError::InvalidParams(format!(
            "address exceeds maximum length of {}",
            MAX_ADDRESS_LENGTH
        )));
    }
    if addr.chars().any(char::is_whitespace) {
        return Err(LockupError::InvalidParams(format!(
            "address '{}' contains whitespace",
            addr
        )));
    }
    if is_eth_address(addr) {
        normalize_eth_address(addr)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_mixed_case() {
        let addr = "0xAbCdEf0000000000000000000000000000000001";
        assert_eq!(
            normalize_eth_address(addr).unwrap(),
            "0xabcdef0000000000000000000000000000000001"
        );
    }

    #[test]
    fn test_normalize_rejects_bad_input() {
        assert!(normalize_eth_address("abcdef").is_err());
        assert!(normalize_eth_address("0x1234").is_err());
        assert!(normalize_eth_address("0xzz00000000000000000000000000000000000000").is_err());
    }

    #[test]
    fn test_validate_address() {
        assert!(validate_address("althea1qqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqq8p93tc").is_ok());
        assert!(validate_address("0x0000000000000000000000000000000000000000").is_ok());
        assert!(validate_address("").is_err());
        assert!(validate_address("has space").is_err());
        assert!(validate_address("0x00").is_err());
    }

    #[test]
    fn test_bech32_and_hex_name_the_same_account() {
        let hex = "0x1111111111111111111111111111111111111111";
        let bech = eth_to_bech32(hex, "althea").unwrap();
        assert!(bech.starts_with("althea1"));
        assert_eq!(bech32_to_eth(&bech, "althea").unwrap(), hex);
        assert_eq!(
            eth_to_bech32("0xABCDEF0000000000000000000000000000000001", "althea").unwrap(),
            eth_to_bech32("0xabcdef0000000000000000000000000000000001", "althea").unwrap()
        );
    }

    #[test]
    fn test_bech32_prefix_must_match() {
        let bech = eth_to_bech32("0x1111111111111111111111111111111111111111", "cosmos").unwrap();
        assert!(bech32_to_eth(&bech, "althea").is_err());
        assert!(bech32_to_eth("althea1notbech32", "althea").is_err());
    }

    #[test]
    fn test_account_aliases() {
        let hex = "0xAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";
        let bech = eth_to_bech32(hex, "althea").unwrap();
        let lower = hex.to_lowercase();

        let from_hex = account_aliases(hex, "althea");
        assert!(from_hex.contains(&hex.to_string()));
        assert!(from_hex.contains(&lower));
        assert!(from_hex.contains(&bech));

        let from_bech = account_aliases(&bech, "althea");
        assert!(from_bech.contains(&lower));
        assert!(from_bech.contains(&bech));

        assert_eq!(account_aliases("opaque-name", "althea"), vec!["opaque-name"]);
    }
}
