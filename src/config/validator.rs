//! Registry validation: identifier syntax, key presence and uniqueness.

use crate::config::TableDescriptor;
use crate::error::ConfigError;
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

fn identifier_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]{0,62}$").expect("static regex"))
}

/// Whether `s` is usable as a quoted identifier in generated SQL.
pub fn is_identifier(s: &str) -> bool {
    identifier_re().is_match(s)
}

pub fn validate(tables: &[TableDescriptor]) -> Result<(), ConfigError> {
    let mut table_names = HashSet::new();
    for t in tables {
        if !is_identifier(t.name) {
            return Err(ConfigError::InvalidIdentifier(t.name.to_string()));
        }
        if !table_names.insert(t.name) {
            return Err(ConfigError::DuplicateTable(t.name.to_string()));
        }

        let mut column_names = HashSet::new();
        for c in &t.columns {
            if !is_identifier(c.name) {
                return Err(ConfigError::InvalidIdentifier(format!("{}.{}", t.name, c.name)));
            }
            if !column_names.insert(c.name) {
                return Err(ConfigError::DuplicateColumn {
                    table: t.name.to_string(),
                    column: c.name.to_string(),
                });
            }
            if c.primary_key && c.nullable {
                return Err(ConfigError::NullablePrimaryKey {
                    table: t.name.to_string(),
                    column: c.name.to_string(),
                });
            }
            if let Some(fk) = &c.references {
                if !is_identifier(fk.table) || !is_identifier(fk.column) {
                    return Err(ConfigError::InvalidIdentifier(format!("{}.{}", fk.table, fk.column)));
                }
            }
        }

        if t.primary_key().next().is_none() {
            return Err(ConfigError::MissingPrimaryKey {
                table: t.name.to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ColumnDescriptor as Col;

    #[test]
    fn accepts_plain_identifiers() {
        assert!(is_identifier("Case_"));
        assert!(is_identifier("INVESTIGATION_Rank"));
        assert!(!is_identifier("Case\"; DROP TABLE users; --"));
        assert!(!is_identifier("1abc"));
        assert!(!is_identifier(""));
    }

    #[test]
    fn rejects_table_without_key() {
        let tables = vec![TableDescriptor::new("Note", vec![Col::text("Body")])];
        assert!(matches!(validate(&tables), Err(ConfigError::MissingPrimaryKey { .. })));
    }

    #[test]
    fn rejects_duplicates() {
        let tables = vec![
            TableDescriptor::new("Note", vec![Col::int("Id").key()]),
            TableDescriptor::new("Note", vec![Col::int("Id").key()]),
        ];
        assert!(matches!(validate(&tables), Err(ConfigError::DuplicateTable(_))));

        let tables = vec![TableDescriptor::new("Note", vec![Col::int("Id").key(), Col::text("Id")])];
        assert!(matches!(validate(&tables), Err(ConfigError::DuplicateColumn { .. })));
    }

    #[test]
    fn rejects_bad_identifiers() {
        let tables = vec![TableDescriptor::new("Note", vec![Col::int("Id").key(), Col::text("bad name")])];
        assert!(matches!(validate(&tables), Err(ConfigError::InvalidIdentifier(_))));

        let tables = vec![TableDescriptor::new(
            "Note",
            vec![Col::int("Id").key(), Col::int("Owner").references("User s", "Id")],
        )];
        assert!(matches!(validate(&tables), Err(ConfigError::InvalidIdentifier(_))));
    }

    #[test]
    fn rejects_nullable_key() {
        let mut id = Col::int("Id").key();
        id.nullable = true;
        let tables = vec![TableDescriptor::new("Note", vec![id])];
        assert!(matches!(validate(&tables), Err(ConfigError::NullablePrimaryKey { .. })));
    }
}
