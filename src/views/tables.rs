use super::{cell_text, escape, layout, Chrome};
use crate::config::{ColumnDescriptor, TableDescriptor};
use crate::gateway::Row;
use std::fmt::Write;

pub struct TableView<'a> {
    pub table: &'a TableDescriptor,
    pub rows: &'a [Row],
    /// Show new/edit/delete controls.
    pub can_write: bool,
}

/// Which write the row form submits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormTarget {
    Create,
    Update,
}

impl FormTarget {
    fn action(self) -> &'static str {
        match self {
            FormTarget::Create => "create",
            FormTarget::Update => "update",
        }
    }
}

fn key_inputs(html: &mut String, table: &TableDescriptor, row: &Row) {
    for c in table.primary_key() {
        let _ = write!(
            html,
            r#"<input type="hidden" name="{}" value="{}"/>"#,
            escape(c.name),
            escape(&cell_text(row.get(c.name)))
        );
    }
}

pub fn table_page(chrome: &Chrome<'_>, view: &TableView<'_>) -> String {
    let table = view.table;
    let name = escape(table.name);
    let mut html = String::new();
    if view.can_write {
        let _ = write!(html, r#"<p><a class="button" href="/table/{name}/new">New row</a></p>"#);
    }
    html.push_str("<table><thead><tr>");
    for c in &table.columns {
        let marker = if c.primary_key { r#" <span class="badge">key</span>"# } else { "" };
        let _ = write!(html, "<th>{}{}</th>", escape(c.name), marker);
    }
    if view.can_write {
        html.push_str("<th></th>");
    }
    html.push_str("</tr></thead><tbody>");
    if view.rows.is_empty() {
        let span = table.columns.len() + usize::from(view.can_write);
        let _ = write!(html, r#"<tr><td colspan="{span}"><em>No rows</em></td></tr>"#);
    }
    for row in view.rows {
        html.push_str("<tr>");
        for c in &table.columns {
            let _ = write!(html, "<td>{}</td>", escape(&cell_text(row.get(c.name))));
        }
        if view.can_write {
            let _ = write!(html, r#"<td><form class="inline" method="get" action="/table/{name}/edit">"#);
            key_inputs(&mut html, table, row);
            let _ = write!(
                html,
                r#"<button type="submit">Edit</button></form> <form class="inline" method="post" action="/table/{name}/delete" onsubmit="return confirm('Delete this row?')">"#
            );
            key_inputs(&mut html, table, row);
            html.push_str(r#"<button class="danger" type="submit">Delete</button></form></td>"#);
        }
        html.push_str("</tr>");
    }
    html.push_str("</tbody></table>");
    layout(table.name, chrome, &html)
}

fn input(html: &mut String, column: &ColumnDescriptor, value: &str, locked: bool) {
    let _ = write!(
        html,
        r#"<label for="{id}">{id}{hint}</label><input id="{id}" name="{id}" type="{ty}" value="{value}"{req}{ro}/>"#,
        id = escape(column.name),
        hint = column
            .references
            .map(|fk| format!(" <small>→ {}.{}</small>", fk.table, fk.column))
            .unwrap_or_default(),
        ty = column.sql_type.input_type(),
        value = escape(value),
        req = if column.nullable { "" } else { " required" },
        ro = if locked { " readonly" } else { "" },
    );
}

/// Row form: empty for `Create`, prefilled from `row` for `Update` with key columns locked.
pub fn form_page(chrome: &Chrome<'_>, table: &TableDescriptor, target: FormTarget, row: Option<&Row>) -> String {
    let mut html = format!(
        r#"<div class="card"><form method="post" action="/table/{}/{}">"#,
        escape(table.name),
        target.action()
    );
    for c in &table.columns {
        let value = row.map(|r| cell_text(r.get(c.name))).unwrap_or_default();
        input(&mut html, c, &value, target == FormTarget::Update && c.primary_key);
    }
    let _ = write!(
        html,
        r#"<p><button type="submit">Save</button> <a href="/table/{}">Cancel</a></p></form></div>"#,
        escape(table.name)
    );
    let title = match target {
        FormTarget::Create => format!("New {}", table.name),
        FormTarget::Update => format!("Edit {}", table.name),
    };
    layout(&title, chrome, &html)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Registry;
    use serde_json::Value;

    fn chrome() -> Chrome<'static> {
        Chrome {
            user: None,
            flash: None,
            tables: Vec::new(),
        }
    }

    fn witnessed_row() -> Row {
        let mut row = Row::new();
        row.insert("Case_ID".into(), Value::from(3));
        row.insert("Witness_ID".into(), Value::from(9));
        row
    }

    #[test]
    fn admin_rows_carry_key_inputs() {
        let registry = Registry::forensic().unwrap();
        let table = registry.get("Witnessed").unwrap();
        let rows = vec![witnessed_row()];
        let html = table_page(
            &chrome(),
            &TableView {
                table,
                rows: &rows,
                can_write: true,
            },
        );
        assert!(html.contains(r#"action="/table/Witnessed/edit""#));
        assert!(html.contains(r#"action="/table/Witnessed/delete""#));
        assert!(html.contains(r#"<input type="hidden" name="Witness_ID" value="9"/>"#));
        assert!(html.contains("/table/Witnessed/new"));
    }

    #[test]
    fn readonly_list_has_no_controls() {
        let registry = Registry::forensic().unwrap();
        let table = registry.get("Witnessed").unwrap();
        let rows = vec![witnessed_row()];
        let html = table_page(
            &chrome(),
            &TableView {
                table,
                rows: &rows,
                can_write: false,
            },
        );
        assert!(html.contains("<td>3</td><td>9</td>"));
        assert!(!html.contains("/delete"));
        assert!(!html.contains("/new"));
    }

    #[test]
    fn edit_form_locks_key_columns() {
        let registry = Registry::forensic().unwrap();
        let court = registry.get("Court").unwrap();
        let mut row = Row::new();
        row.insert("Court_ID".into(), Value::from(1));
        row.insert("Court_Name".into(), Value::from("High \"Court\""));
        row.insert("Location".into(), Value::Null);
        let html = form_page(&chrome(), court, FormTarget::Update, Some(&row));
        assert!(html.contains(r#"action="/table/Court/update""#));
        assert!(html.contains(r#"name="Court_ID" type="number" value="1" required readonly/>"#));
        assert!(html.contains(r#"value="High &quot;Court&quot;""#));
        assert!(html.contains(r#"name="Location" type="text" value=""/>"#));
    }

    #[test]
    fn new_form_is_empty_and_editable() {
        let registry = Registry::forensic().unwrap();
        let report = registry.get("Report").unwrap();
        let html = form_page(&chrome(), report, FormTarget::Create, None);
        assert!(html.contains(r#"action="/table/Report/create""#));
        assert!(html.contains(r#"type="date""#));
        assert!(!html.contains("readonly/>"));
    }
}
