use super::{escape, layout, rows_table, Chrome};
use crate::gateway::Row;

/// Forms for the stored routines.
pub fn tools_page(chrome: &Chrome<'_>, today: &str) -> String {
    let body = format!(
        r#"<div class="card"><h2>Add case with report</h2><form method="post" action="/tools/add_case_with_report">
<label for="caseTitle">Case title</label><input id="caseTitle" name="caseTitle" required/>
<label for="caseDesc">Case description</label><textarea id="caseDesc" name="caseDesc"></textarea>
<label for="reportContent">Report content</label><textarea id="reportContent" name="reportContent"></textarea>
<label for="reportDate">Report date</label><input id="reportDate" name="reportDate" type="date" value="{today}"/>
<p><button type="submit">Add</button></p></form></div>
<div class="card"><h2>Age from date of birth</h2><form method="post" action="/tools/get_age">
<label for="dob">Date of birth</label><input id="dob" name="dob" type="date" required/>
<p><button type="submit">Compute</button></p></form></div>
<div class="card"><h2>Total evidence for a case</h2><form method="post" action="/tools/total_evidence">
<label for="case_id">Case ID</label><input id="case_id" name="case_id" type="number" required/>
<p><button type="submit">Count</button></p></form></div>
<div class="card"><h2>Suspect aliases</h2><p><a class="button" href="/tools/suspect_aliases">List aliases</a></p></div>"#,
        today = escape(today),
    );
    layout("Tools", chrome, &body)
}

pub fn evidence_log_page(chrome: &Chrome<'_>, rows: &[Row]) -> String {
    let columns = ["Log_ID", "Evidence_ID", "Action", "Log_Time", "Evidence_Type", "Description"];
    layout("Evidence log", chrome, &rows_table(&columns, rows))
}
