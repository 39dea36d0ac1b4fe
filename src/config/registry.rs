//! Table registry: typed per-table descriptors for generic CRUD.

use crate::config::validate;
use crate::error::{AppError, ConfigError};
use std::collections::HashMap;

/// SQL type of a registered column. Bound values are cast to this type in generated SQL.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SqlType {
    Integer,
    Text,
    Date,
}

impl SqlType {
    /// Cast target used in placeholders, e.g. `$1::integer`.
    pub fn cast(self) -> &'static str {
        match self {
            SqlType::Integer => "integer",
            SqlType::Text => "text",
            SqlType::Date => "date",
        }
    }

    pub fn ddl(self) -> &'static str {
        match self {
            SqlType::Integer => "INTEGER",
            SqlType::Text => "TEXT",
            SqlType::Date => "DATE",
        }
    }

    /// HTML input type for the row form.
    pub fn input_type(self) -> &'static str {
        match self {
            SqlType::Integer => "number",
            SqlType::Text => "text",
            SqlType::Date => "date",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ForeignKey {
    pub table: &'static str,
    pub column: &'static str,
}

#[derive(Clone, Debug)]
pub struct ColumnDescriptor {
    pub name: &'static str,
    pub sql_type: SqlType,
    pub nullable: bool,
    pub primary_key: bool,
    pub references: Option<ForeignKey>,
}

impl ColumnDescriptor {
    pub fn new(name: &'static str, sql_type: SqlType) -> Self {
        ColumnDescriptor {
            name,
            sql_type,
            nullable: true,
            primary_key: false,
            references: None,
        }
    }

    pub fn int(name: &'static str) -> Self {
        Self::new(name, SqlType::Integer)
    }

    pub fn text(name: &'static str) -> Self {
        Self::new(name, SqlType::Text)
    }

    pub fn date(name: &'static str) -> Self {
        Self::new(name, SqlType::Date)
    }

    /// Marks the column as part of the primary key (implies NOT NULL).
    pub fn key(mut self) -> Self {
        self.primary_key = true;
        self.nullable = false;
        self
    }

    pub fn required(mut self) -> Self {
        self.nullable = false;
        self
    }

    pub fn references(mut self, table: &'static str, column: &'static str) -> Self {
        self.references = Some(ForeignKey { table, column });
        self
    }
}

#[derive(Clone, Debug)]
pub struct TableDescriptor {
    pub name: &'static str,
    pub columns: Vec<ColumnDescriptor>,
}

impl TableDescriptor {
    pub fn new(name: &'static str, columns: Vec<ColumnDescriptor>) -> Self {
        TableDescriptor { name, columns }
    }

    /// Primary-key columns in declaration order.
    pub fn primary_key(&self) -> impl Iterator<Item = &ColumnDescriptor> {
        self.columns.iter().filter(|c| c.primary_key)
    }

    pub fn non_key_columns(&self) -> impl Iterator<Item = &ColumnDescriptor> {
        self.columns.iter().filter(|c| !c.primary_key)
    }
}

/// Registered tables, in navigation order.
#[derive(Clone, Debug)]
pub struct Registry {
    tables: Vec<TableDescriptor>,
    by_name: HashMap<&'static str, usize>,
}

impl Registry {
    /// Validates descriptors and builds the lookup index.
    pub fn new(tables: Vec<TableDescriptor>) -> Result<Self, ConfigError> {
        validate(&tables)?;
        let by_name = tables.iter().enumerate().map(|(i, t)| (t.name, i)).collect();
        Ok(Registry { tables, by_name })
    }

    pub fn get(&self, name: &str) -> Option<&TableDescriptor> {
        self.by_name.get(name).map(|&i| &self.tables[i])
    }

    /// Like [`Registry::get`], failing with [`AppError::UnknownTable`].
    pub fn table(&self, name: &str) -> Result<&TableDescriptor, AppError> {
        self.get(name).ok_or_else(|| AppError::UnknownTable(name.to_string()))
    }

    pub fn tables(&self) -> &[TableDescriptor] {
        &self.tables
    }

    /// The forensic case schema.
    pub fn forensic() -> Result<Self, ConfigError> {
        Self::new(forensic_tables())
    }
}

use ColumnDescriptor as Col;

fn forensic_tables() -> Vec<TableDescriptor> {
    vec![
        TableDescriptor::new(
            "Court",
            vec![Col::int("Court_ID").key(), Col::text("Court_Name"), Col::text("Location")],
        ),
        TableDescriptor::new(
            "Case_",
            vec![Col::int("Case_ID").key(), Col::text("Title"), Col::text("Description")],
        ),
        TableDescriptor::new(
            "Investigator",
            vec![
                Col::int("Investigator_ID").key(),
                Col::text("Name"),
                Col::text("INVESTIGATION_Rank"),
                Col::text("Contact"),
            ],
        ),
        TableDescriptor::new(
            "Lab",
            vec![Col::int("Lab_ID").key(), Col::text("Lab_Name"), Col::text("Location")],
        ),
        TableDescriptor::new(
            "Evidence",
            vec![
                Col::int("Evidence_ID").key(),
                Col::text("Evidence_Type"),
                Col::text("Description"),
                Col::int("Investigator_ID").references("Investigator", "Investigator_ID"),
                Col::int("Lab_ID").references("Lab", "Lab_ID"),
            ],
        ),
        TableDescriptor::new(
            "Evidence_Item",
            vec![
                Col::int("Item_ID").key(),
                Col::int("Evidence_ID").references("Evidence", "Evidence_ID"),
                Col::int("Quantity"),
                Col::text("Description"),
            ],
        ),
        TableDescriptor::new(
            "Report",
            vec![
                Col::int("Report_ID").key(),
                Col::text("Content"),
                Col::date("Date"),
                Col::int("Case_ID").references("Case_", "Case_ID"),
            ],
        ),
        TableDescriptor::new(
            "Suspect",
            vec![
                Col::int("Suspect_ID").key(),
                Col::text("Name"),
                Col::date("DOB"),
                Col::text("Street"),
                Col::text("City"),
                Col::text("State"),
                Col::text("Zip"),
                Col::int("Case_ID").references("Case_", "Case_ID"),
                Col::int("Accomplice_ID").references("Suspect", "Suspect_ID"),
            ],
        ),
        TableDescriptor::new(
            "Suspect_Alias",
            vec![
                Col::int("Suspect_ID").key().references("Suspect", "Suspect_ID"),
                Col::text("Alias").key(),
            ],
        ),
        TableDescriptor::new(
            "Test_Result",
            vec![
                Col::int("Result_ID").key(),
                Col::int("Evidence_ID").references("Evidence", "Evidence_ID"),
                Col::int("Lab_ID").references("Lab", "Lab_ID"),
                Col::text("Result"),
            ],
        ),
        TableDescriptor::new(
            "Trial",
            vec![
                Col::int("Case_ID").key().references("Case_", "Case_ID"),
                Col::int("Court_ID").key().references("Court", "Court_ID"),
                Col::int("Suspect_ID").key().references("Suspect", "Suspect_ID"),
                Col::int("Evidence_ID").key().references("Evidence", "Evidence_ID"),
            ],
        ),
        TableDescriptor::new(
            "Witness",
            vec![Col::int("Witness_ID").key(), Col::text("Name"), Col::text("Statement")],
        ),
        TableDescriptor::new(
            "Witnessed",
            vec![
                Col::int("Case_ID").key().references("Case_", "Case_ID"),
                Col::int("Witness_ID").key().references("Witness", "Witness_ID"),
            ],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key_names(table: &TableDescriptor) -> Vec<&'static str> {
        table.primary_key().map(|c| c.name).collect()
    }

    fn column<'a>(table: &'a TableDescriptor, name: &str) -> &'a ColumnDescriptor {
        table.columns.iter().find(|c| c.name == name).unwrap()
    }

    #[test]
    fn forensic_registry_is_valid() {
        let registry = Registry::forensic().unwrap();
        assert_eq!(registry.tables().len(), 13);
        assert_eq!(registry.tables()[0].name, "Court");
    }

    #[test]
    fn lookup_known_and_unknown_tables() {
        let registry = Registry::forensic().unwrap();
        let suspect = registry.get("Suspect").unwrap();
        assert_eq!(suspect.columns.len(), 9);
        assert_eq!(key_names(suspect), vec!["Suspect_ID"]);
        assert!(registry.get("users").is_none());
        assert!(matches!(registry.table("users"), Err(AppError::UnknownTable(name)) if name == "users"));
    }

    #[test]
    fn composite_keys_keep_declaration_order() {
        let registry = Registry::forensic().unwrap();
        let trial = registry.get("Trial").unwrap();
        assert_eq!(key_names(trial), vec!["Case_ID", "Court_ID", "Suspect_ID", "Evidence_ID"]);
        assert_eq!(trial.non_key_columns().count(), 0);
        let alias = registry.get("Suspect_Alias").unwrap();
        assert_eq!(key_names(alias), vec!["Suspect_ID", "Alias"]);
    }

    #[test]
    fn lookup_is_case_sensitive() {
        let registry = Registry::forensic().unwrap();
        assert!(registry.get("court").is_none());
    }

    #[test]
    fn column_types() {
        let registry = Registry::forensic().unwrap();
        let report = registry.get("Report").unwrap();
        assert_eq!(column(report, "Date").sql_type, SqlType::Date);
        assert_eq!(
            column(report, "Case_ID").references,
            Some(ForeignKey { table: "Case_", column: "Case_ID" })
        );
        assert!(column(report, "Report_ID").primary_key);
        assert!(!column(report, "Report_ID").nullable);
    }
}
