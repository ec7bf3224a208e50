use tracing::{info, warn};

use crate::{decode, Error, Row, Source};
use crate::error::Result;

/// Name reserved for the account that can look at every client.
pub const ADMIN_NAME: &str = "admin";

/// A partner's login identity.
#[derive(Debug, Clone, PartialEq)]
pub struct Credential {
    name: String,
    key: String,
    admin: bool,
}

impl Credential {
    pub fn new(name: &str, key: &str) -> Credential {
        let name = name.trim();

        Credential {
            admin: name.to_lowercase() == ADMIN_NAME,
            name: name.to_string(),
            key: key.trim().to_string(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn is_admin(&self) -> bool {
        self.admin
    }

    /// Names match case-insensitively, keys must be identical. Both sides
    /// are trimmed first.
    pub fn matches(&self, name: &str, key: &str) -> bool {
        self.name.trim().to_lowercase() == name.trim().to_lowercase()
            && self.key.trim() == key.trim()
    }
}

/// Reads the `name,key` table, skipping the header and any row missing one
/// of the two.
pub fn credentials_from_table(rows: &[Row]) -> Vec<Credential> {
    rows.iter()
        .skip(1)
        .filter_map(|row| match (row.get(0), row.get(1)) {
            (Some(name), Some(key)) if !name.is_empty() && !key.is_empty() => {
                Some(Credential::new(name, key))
            }
            _ => None,
        })
        .collect()
}

/// Accounts that stay available when the credential sheet can't be reached.
pub fn fallback_credentials() -> Vec<Credential> {
    vec![
        Credential::new("admin", "admin-123"),
        Credential::new("DIAZ", "diaz-125"),
        Credential::new("SVF", "svf-#1234"),
        Credential::new("PROMESA", "promesa-%123"),
    ]
}

/// Never fails, a broken source means the built-in accounts are used.
pub fn load_credentials(source: &dyn Source) -> Vec<Credential> {
    match source.fetch() {
        Ok(text) => credentials_from_table(&decode(&text)),
        Err(e) => {
            warn!(source = %source.describe(), error = %e, "falling back to the built-in credential list");

            fallback_credentials()
        }
    }
}

pub fn authenticate<'a>(credentials: &'a [Credential], name: &str, key: &str) -> Result<&'a Credential> {
    match credentials.iter().find(|c| c.matches(name, key)) {
        Some(credential) => {
            info!(name = credential.name(), admin = credential.is_admin(), "login accepted");

            Ok(credential)
        }
        None => {
            warn!(name = name.trim(), "login rejected");

            Err(Error::InvalidCredentials)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{authenticate, credentials_from_table, fallback_credentials, load_credentials, Credential};
    use crate::{decode, mock::MockSource, Error};

    #[test]
    fn test_admin_flag() {
        assert!(Credential::new(" Admin ", "x").is_admin());
        assert!(!Credential::new("administrator", "x").is_admin());
        assert!(!Credential::new("DIAZ", "x").is_admin());
    }

    #[test]
    fn test_name_is_case_insensitive_key_is_exact() {
        let credentials = vec![Credential::new("DIAZ", "diaz-125")];

        assert_eq!(authenticate(&credentials, " diaz ", "diaz-125").unwrap().name(), "DIAZ");
        assert!(authenticate(&credentials, "Diaz", " diaz-125 ").is_ok());

        match authenticate(&credentials, "diaz", "diaz -125") {
            Err(Error::InvalidCredentials) => {}
            other => panic!("didn't expect {:?}", other),
        }
        assert!(authenticate(&credentials, "diaz", "DIAZ-125").is_err());
        assert!(authenticate(&credentials, "dia", "diaz-125").is_err());
    }

    #[test]
    fn test_rejection_message() {
        let err = authenticate(&[], "nobody", "nothing").unwrap_err();

        assert_eq!(err.to_string(), "Invalid Name or Api Key. Please try again.");
    }

    #[test]
    fn test_from_table() {
        let rows = decode(include_str!("../test/assets/credentials.csv"));
        let credentials = credentials_from_table(&rows);

        assert_eq!(
            credentials,
            vec![
                Credential::new("admin", "admin-123"),
                Credential::new("DIAZ", "diaz-125"),
                Credential::new("PROMESA", "promesa-%123"),
            ]
        );
        assert_eq!(credentials[1].name(), "DIAZ");
        assert_eq!(credentials[1].key(), "diaz-125");
        assert!(credentials[0].is_admin());
    }

    #[test]
    fn test_load_falls_back_on_failure() {
        let source = MockSource::new(vec![None]);

        assert_eq!(load_credentials(&source), fallback_credentials());
    }

    #[test]
    fn test_load_from_source() {
        let source = MockSource::new(vec![Some("Name,Api_Key\nSVF,svf-1\n".to_string())]);
        let credentials = load_credentials(&source);

        assert_eq!(credentials, vec![Credential::new("SVF", "svf-1")]);
        assert!(authenticate(&credentials, "svf", "svf-1").is_ok());
    }

    #[test]
    fn test_fallback_accounts() {
        let credentials = fallback_credentials();

        assert!(authenticate(&credentials, "admin", "admin-123").unwrap().is_admin());
        assert!(authenticate(&credentials, "promesa", "promesa-%123").is_ok());
    }
}
