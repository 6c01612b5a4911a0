//! Alias construction, normalization and hashing.
//!
//! Members are registered under aliases, but the gateway only stores alias
//! hashes in member records. The hash is computed over the normalized,
//! prost-encoded alias so that `Foo@Example.com` and `foo@example.com`
//! resolve to the same member.

use prost::Message;
use sha2::{Digest, Sha256};
use transport::proto::common::{Alias, AliasType};

/// Builds an email alias.
pub fn email(value: &str) -> Alias {
    alias(AliasType::Email, value)
}

/// Builds a domain alias.
pub fn domain(value: &str) -> Alias {
    alias(AliasType::Domain, value)
}

/// Builds a phone alias.
pub fn phone(value: &str) -> Alias {
    alias(AliasType::Phone, value)
}

/// Builds a custom alias scoped to `realm`.
pub fn custom(value: &str, realm: &str) -> Alias {
    Alias {
        realm: realm.to_owned(),
        ..alias(AliasType::Custom, value)
    }
}

fn alias(kind: AliasType, value: &str) -> Alias {
    Alias {
        r#type: kind as i32,
        value: value.to_owned(),
        realm: String::new(),
    }
}

/// Returns the canonical form of `alias`.
///
/// Emails and domains are trimmed and lowercased; phone numbers keep only
/// digits and a leading `+`; other types are trimmed.
pub fn normalize(alias: &Alias) -> Alias {
    let value = alias.value.trim();
    let value = match alias.r#type() {
        AliasType::Email | AliasType::Domain => value.to_lowercase(),
        AliasType::Phone => value
            .char_indices()
            .filter(|(i, c)| c.is_ascii_digit() || (*i == 0 && *c == '+'))
            .map(|(_, c)| c)
            .collect(),
        _ => value.to_owned(),
    };
    Alias {
        value,
        ..alias.clone()
    }
}

/// Base58-encoded SHA-256 of the normalized, prost-encoded alias.
pub fn alias_hash(alias: &Alias) -> String {
    let bytes = normalize(alias).encode_to_vec();
    bs58::encode(Sha256::digest(&bytes)).into_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_is_lowercased_and_trimmed() {
        assert_eq!(normalize(&email("  Alice@Example.COM ")).value, "alice@example.com");
    }

    #[test]
    fn phone_keeps_digits_and_leading_plus() {
        assert_eq!(normalize(&phone("+1 (555) 010-9999")).value, "+15550109999");
        assert_eq!(normalize(&phone("555+1")).value, "5551");
    }

    #[test]
    fn custom_keeps_case_and_realm() {
        let a = normalize(&custom(" BankUser ", "bank-x"));
        assert_eq!(a.value, "BankUser");
        assert_eq!(a.realm, "bank-x");
        assert_eq!(a.r#type(), AliasType::Custom);
    }

    #[test]
    fn hash_ignores_formatting_differences() {
        assert_eq!(
            alias_hash(&email("Bob@Example.com")),
            alias_hash(&email("bob@example.com"))
        );
        assert_ne!(
            alias_hash(&email("bob@example.com")),
            alias_hash(&domain("bob@example.com"))
        );
    }
}
