use serenity::all::Permissions;

use crate::server::error::internal::InternalError;

/// Parses a Discord permission bitmask.
///
/// Discord sends permissions as a decimal string because the values exceed the
/// integer range some clients can represent exactly. The string is parsed as an
/// unsigned 64-bit integer, never through a float. Bits serenity doesn't know about
/// are kept.
///
/// # Arguments
/// - `value` - Decimal-string permission bitmask
///
/// # Returns
/// - `Ok(Permissions)` - Parsed bitmask
/// - `Err(InternalError::ParsePermissions)` - Not an unsigned 64-bit integer
pub fn parse_permissions(value: &str) -> Result<Permissions, InternalError> {
    let bits = value
        .trim()
        .parse::<u64>()
        .map_err(|e| InternalError::ParsePermissions {
            value: value.to_string(),
            source: e,
        })?;

    Ok(Permissions::from_bits_retain(bits))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_manage_guild_bit() {
        let permissions = parse_permissions("32").unwrap();
        assert!(permissions.contains(Permissions::MANAGE_GUILD));
    }

    #[test]
    fn parses_values_beyond_53_bits_exactly() {
        // 2^53 + 1 is not representable as an f64; bit 5 must still be read correctly.
        let value = ((1u64 << 53) + 1).to_string();
        let permissions = parse_permissions(&value).unwrap();
        assert_eq!(permissions.bits(), (1u64 << 53) + 1);
        assert!(!permissions.contains(Permissions::MANAGE_GUILD));

        let value = ((1u64 << 62) | 32).to_string();
        let permissions = parse_permissions(&value).unwrap();
        assert!(permissions.contains(Permissions::MANAGE_GUILD));
    }

    #[test]
    fn rejects_non_numeric_bitmask() {
        assert!(matches!(
            parse_permissions("administrator"),
            Err(InternalError::ParsePermissions { .. })
        ));
        assert!(parse_permissions("-32").is_err());
        assert!(parse_permissions("3.2e1").is_err());
    }
}
