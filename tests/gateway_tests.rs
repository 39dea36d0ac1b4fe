//! Query gateway and stored routines against a real PostgreSQL database.

#![cfg(feature = "integration-tests")]

mod support;

use chrono::NaiveDate;
use forensic_console::procedures::{CaseIds, NewCase, Procedures};
use forensic_console::sql::SqlParam;
use forensic_console::{Fetch, QueryResult};
use serde_json::Value;
use sqlx::PgPool;
use support::setup;

#[sqlx::test]
async fn statement_kinds_return_the_expected_shape(pool: PgPool) {
    let state = setup(pool).await;
    let gw = &state.gateway;

    let inserted = gw
        .execute(
            r#"INSERT INTO "Lab" ("Lab_ID", "Lab_Name") VALUES ($1::integer, $2::text), ($3::integer, $4::text)"#,
            &[SqlParam::Int(1), "North".into(), SqlParam::Int(2), "South".into()],
            Fetch::None,
        )
        .await
        .unwrap();
    assert!(matches!(inserted, QueryResult::Count(2)));

    let counted = gw
        .execute(r#"SELECT "Lab_ID" FROM "Lab""#, &[], Fetch::None)
        .await
        .unwrap();
    assert_eq!(counted.count(), 2);

    let one = gw
        .fetch_one(r#"SELECT * FROM "Lab" ORDER BY "Lab_ID" DESC"#, &[])
        .await
        .unwrap()
        .unwrap();
    assert_eq!(one.keys().collect::<Vec<_>>(), vec!["Lab_ID", "Lab_Name", "Location"]);
    assert_eq!(one["Lab_Name"], Value::from("South"));
    assert_eq!(one["Location"], Value::Null);

    let none = gw
        .fetch_one(r#"SELECT * FROM "Lab" WHERE "Lab_ID" = $1::integer"#, &["9".into()])
        .await
        .unwrap();
    assert!(none.is_none());
}

#[sqlx::test]
async fn dates_and_nulls_map_to_json(pool: PgPool) {
    let state = setup(pool).await;
    let gw = &state.gateway;
    let dob = NaiveDate::from_ymd_opt(1985, 7, 14).unwrap();
    gw.execute(
        r#"INSERT INTO "Suspect" ("Suspect_ID", "DOB", "Accomplice_ID") VALUES ($1::integer, $2::date, $3::integer)"#,
        &[SqlParam::Int(1), SqlParam::from(dob), SqlParam::Null],
        Fetch::None,
    )
    .await
    .unwrap();
    let row = gw
        .fetch_one(r#"SELECT "DOB", "Accomplice_ID" FROM "Suspect""#, &[])
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row["DOB"], Value::from("1985-07-14"));
    assert_eq!(row["Accomplice_ID"], Value::Null);
}

#[sqlx::test]
async fn failed_statements_leave_no_partial_writes(pool: PgPool) {
    let state = setup(pool).await;
    let gw = &state.gateway;
    let err = gw
        .execute(
            r#"INSERT INTO "Court" ("Court_ID") VALUES (1), (1)"#,
            &[],
            Fetch::None,
        )
        .await
        .unwrap_err();
    assert!(err.flash_message().contains("duplicate key"));
    let rows = gw.fetch_all(r#"SELECT * FROM "Court""#, &[]).await.unwrap();
    assert!(rows.is_empty());
}

#[sqlx::test]
async fn procedure_calls_collect_result_rows(pool: PgPool) {
    let state = setup(pool).await;
    let gw = &state.gateway;

    let case = NewCase {
        title: Some("Fraud".into()),
        description: None,
        report_content: Some("Opened".into()),
        report_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
    };
    let first = Procedures::add_case_with_report(gw, &case).await.unwrap();
    assert_eq!(
        first,
        Some(CaseIds {
            case_id: Value::from(1),
            report_id: Value::from(1)
        })
    );

    let raw = gw
        .execute(
            r#"CALL "Add_Case_With_Report"('Theft', 'Shop', 'Filed', DATE '2024-01-16')"#,
            &[],
            Fetch::All,
        )
        .await
        .unwrap()
        .into_rows();
    assert_eq!(raw.len(), 1);
    assert_eq!(raw[0]["Case_ID"], Value::from(2));
    assert_eq!(raw[0]["Report_ID"], Value::from(2));

    let report = gw
        .fetch_one(r#"SELECT "Case_ID", "Date" FROM "Report" WHERE "Report_ID" = 1"#, &[])
        .await
        .unwrap()
        .unwrap();
    assert_eq!(report["Case_ID"], Value::from(1));
    assert_eq!(report["Date"], Value::from("2024-01-15"));
}

#[sqlx::test]
async fn scalar_functions_and_alias_listing(pool: PgPool) {
    let state = setup(pool).await;
    let gw = &state.gateway;
    sqlx::raw_sql(
        r#"
        INSERT INTO "Case_" ("Case_ID") VALUES (1);
        INSERT INTO "Court" ("Court_ID") VALUES (1);
        INSERT INTO "Suspect" ("Suspect_ID", "Name") VALUES (1, 'Ann'), (2, 'Bo');
        INSERT INTO "Suspect_Alias" VALUES (2, 'Zed'), (1, 'Fox');
        INSERT INTO "Evidence" ("Evidence_ID") VALUES (1), (2);
        INSERT INTO "Trial" VALUES (1, 1, 1, 1), (1, 1, 2, 2);
        "#,
    )
    .execute(state.pool())
    .await
    .unwrap();

    assert_eq!(Procedures::total_evidence(gw, 1).await.unwrap(), Value::from(2));
    assert_eq!(Procedures::total_evidence(gw, 7).await.unwrap(), Value::from(0));

    let age = Procedures::get_age(gw, NaiveDate::from_ymd_opt(2000, 1, 1).unwrap())
        .await
        .unwrap();
    assert!(age.as_i64().unwrap() >= 24);

    let aliases = Procedures::suspect_aliases(gw).await.unwrap();
    let names: Vec<(&str, &str)> = aliases
        .iter()
        .map(|r| (r["Name"].as_str().unwrap(), r["Alias"].as_str().unwrap()))
        .collect();
    assert_eq!(names, vec![("Ann", "Fox"), ("Bo", "Zed")]);
}
