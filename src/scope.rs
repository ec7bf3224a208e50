use std::collections::BTreeSet;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use crate::{Credential, Record};

/// Label of the scope that includes every client.
pub const GLOBAL: &str = "Global";

/// Which client's records a ranking is computed over.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Scope {
    #[default]
    Global,
    Client(String),
}

impl Scope {
    /// Non-admin viewers only ever see their own records, whatever was
    /// selected. Admins see what they selected.
    pub fn effective(viewer: &Credential, selected: &Scope) -> Scope {
        if viewer.is_admin() {
            selected.clone()
        } else {
            Scope::Client(viewer.name().to_string())
        }
    }

    pub fn matches(&self, record: &Record) -> bool {
        match *self {
            Scope::Global => true,
            Scope::Client(ref client) => record.client.to_lowercase() == client.to_lowercase(),
        }
    }

    pub fn filter<'r>(&self, records: &'r [Record]) -> Vec<&'r Record> {
        records.iter().filter(|r| self.matches(r)).collect()
    }

    pub fn label(&self) -> &str {
        match *self {
            Scope::Global => GLOBAL,
            Scope::Client(ref client) => client,
        }
    }
}

impl FromStr for Scope {
    type Err = Infallible;

    fn from_str(label: &str) -> Result<Scope, Self::Err> {
        let label = label.trim();

        if label.is_empty() || label.eq_ignore_ascii_case(GLOBAL) {
            Ok(Scope::Global)
        } else {
            Ok(Scope::Client(label.to_string()))
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Options an admin can pick from: the global scope followed by every
/// client present in the records, sorted and without repetitions.
pub fn client_options(records: &[Record]) -> Vec<String> {
    let clients: BTreeSet<&str> = records
        .iter()
        .map(|r| r.client.as_str())
        .filter(|c| !c.is_empty())
        .collect();

    let mut options = Vec::with_capacity(clients.len() + 1);

    options.push(GLOBAL.to_string());
    options.extend(clients.into_iter().map(|c| c.to_string()));

    options
}

#[cfg(test)]
mod tests {
    use super::{client_options, Scope};
    use crate::{Credential, Record};

    fn record(client: &str) -> Record {
        Record {
            client: client.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_matches_ignores_case() {
        let scope = Scope::Client("Diaz".to_string());

        assert!(scope.matches(&record("DIAZ")));
        assert!(scope.matches(&record("diaz")));
        assert!(!scope.matches(&record("SVF")));
        assert!(!scope.matches(&record("")));
        assert!(Scope::Global.matches(&record("")));
    }

    #[test]
    fn test_effective() {
        let admin = Credential::new("admin", "k");
        let partner = Credential::new("DIAZ", "k");
        let selected = Scope::Client("SVF".to_string());

        assert_eq!(Scope::effective(&admin, &selected), selected);
        assert_eq!(Scope::effective(&admin, &Scope::Global), Scope::Global);
        assert_eq!(
            Scope::effective(&partner, &Scope::Global),
            Scope::Client("DIAZ".to_string())
        );
        assert_eq!(
            Scope::effective(&partner, &selected),
            Scope::Client("DIAZ".to_string())
        );
    }

    #[test]
    fn test_parse() {
        assert_eq!("Global".parse::<Scope>().unwrap(), Scope::Global);
        assert_eq!("global".parse::<Scope>().unwrap(), Scope::Global);
        assert_eq!(" SVF ".parse::<Scope>().unwrap(), Scope::Client("SVF".to_string()));
        assert_eq!(Scope::Client("SVF".to_string()).to_string(), "SVF");
        assert_eq!(Scope::Global.label(), "Global");
    }

    #[test]
    fn test_filter() {
        let records = vec![record("DIAZ"), record("SVF"), record("diaz")];

        assert_eq!(Scope::Client("diaz".to_string()).filter(&records).len(), 2);
        assert_eq!(Scope::Global.filter(&records).len(), 3);
    }

    #[test]
    fn test_client_options() {
        let records = vec![record("SVF"), record(""), record("DIAZ"), record("SVF"), record("PROMESA")];

        assert_eq!(client_options(&records), vec!["Global", "DIAZ", "PROMESA", "SVF"]);
        assert_eq!(client_options(&[]), vec!["Global"]);
    }
}
