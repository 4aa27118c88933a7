use ethers::types::{Address, U256};
use ethers::utils::{format_units, to_checksum, ConversionError, Units};

use crate::error::SwapError;
use crate::types::{SwapRequest, ValidatedSwap};

/// Accepts `0x`-prefixed or bare 40-digit hex. Mixed-case input must carry a
/// valid EIP-55 checksum; all-lower or all-upper input is taken as is.
pub fn parse_address(input: &str) -> Result<Address, SwapError> {
    let trimmed = input.trim();
    let digits = trimmed.strip_prefix("0x").unwrap_or(trimmed);

    if digits.len() != 40 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(SwapError::invalid_input(
            "token address",
            format!("{:?} is not a 20-byte hex address", trimmed),
        ));
    }

    let bytes = hex::decode(digits)
        .map_err(|err| SwapError::invalid_input("token address", err.to_string()))?;
    let address = Address::from_slice(&bytes);

    let has_lower = digits.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = digits.chars().any(|c| c.is_ascii_uppercase());
    if has_lower && has_upper && to_checksum(&address, None)[2..] != *digits {
        return Err(SwapError::invalid_input(
            "token address",
            format!("{} has a bad checksum", trimmed),
        ));
    }

    Ok(address)
}

/// Parses a non-negative decimal string into fixed point with `units` decimals
/// (`"ether"`, `"gwei"`, or a decimal count). Input must be plain digits with
/// at most one `.`, no more significant fractional digits than `units` allows, and must
/// fit in a `U256`.
pub fn parse_decimal<K>(field: &'static str, input: &str, units: K) -> Result<U256, SwapError>
where
    K: TryInto<Units, Error = ConversionError>,
{
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(SwapError::invalid_input(field, "value is empty"));
    }
    let decimals = units
        .try_into()
        .map_err(|err| SwapError::invalid_input(field, err.to_string()))?
        .as_num() as usize;

    let (integer, fraction) = trimmed.split_once('.').unwrap_or((trimmed, ""));
    let all_digits = |part: &str| part.chars().all(|c| c.is_ascii_digit());
    if !all_digits(integer) || !all_digits(fraction) || integer.len() + fraction.len() == 0 {
        return Err(SwapError::invalid_input(
            field,
            format!("{:?} is not a decimal number", trimmed),
        ));
    }
    // trailing zeros carry no precision: "42.0" is fine with zero decimals
    let fraction = fraction.trim_end_matches('0');
    if fraction.len() > decimals {
        return Err(SwapError::invalid_input(
            field,
            format!("{} has more than {} fractional digits", trimmed, decimals),
        ));
    }

    let too_large = || SwapError::invalid_input(field, format!("{} is too large", trimmed));
    let integer = if integer.is_empty() {
        U256::zero()
    } else {
        U256::from_dec_str(integer).map_err(|_| too_large())?
    };
    let fraction = if fraction.is_empty() {
        U256::zero()
    } else {
        let padded = format!("{:0<width$}", fraction, width = decimals);
        U256::from_dec_str(&padded).map_err(|_| too_large())?
    };
    let scale = U256::from(10)
        .checked_pow(U256::from(decimals))
        .ok_or_else(too_large)?;

    integer
        .checked_mul(scale)
        .and_then(|scaled| scaled.checked_add(fraction))
        .ok_or_else(too_large)
}

/// Formats a raw token amount, trimming trailing zeros down to one fractional
/// digit (`1.500000` -> `1.5`, `2.000` -> `2.0`).
pub fn format_token_amount(amount: U256, decimals: u8) -> anyhow::Result<String> {
    let formatted = format_units(amount, u32::from(decimals))?;
    Ok(match formatted.split_once('.') {
        Some((integer, fraction)) => {
            let fraction = fraction.trim_end_matches('0');
            if fraction.is_empty() {
                format!("{}.0", integer)
            } else {
                format!("{}.{}", integer, fraction)
            }
        }
        None => format!("{}.0", formatted),
    })
}

/// Validates every field of a request. Nothing here touches the network.
pub fn validate_request(request: &SwapRequest) -> Result<ValidatedSwap, SwapError> {
    let token_out = parse_address(&request.token_address)?;
    let amount_in = parse_decimal("ETH amount", &request.eth_amount, "ether")?;
    if amount_in.is_zero() {
        return Err(SwapError::invalid_input(
            "ETH amount",
            "amount must be greater than zero",
        ));
    }
    let gas_price = parse_decimal("gas price", &request.gas_gwei, "gwei")?;

    Ok(ValidatedSwap {
        token_out,
        amount_in,
        gas_price,
    })
}
