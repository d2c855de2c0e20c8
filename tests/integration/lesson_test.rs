//! The CRM lesson run end to end against the bundled sample store.

use crm_joins::db::{DatabaseClient, Row, SqliteClient, Value};
use crm_joins::lesson::{run_step, run_steps, Lesson, StepReport, SAMPLE_CRM_SQL};
use crm_joins::query::QueryRunner;

async fn sample() -> SqliteClient {
    SqliteClient::open_seeded(SAMPLE_CRM_SQL)
        .await
        .expect("sample store should load")
}

async fn run(client: &SqliteClient, id: &str) -> StepReport {
    let lesson = Lesson::crm();
    let step = lesson.find(id).expect("step exists");
    run_step(&QueryRunner::new(client), step)
        .await
        .unwrap_or_else(|e| panic!("step {id} failed: {e}"))
}

fn sorted(mut rows: Vec<Row>) -> Vec<Row> {
    rows.sort_by_key(|row| format!("{row:?}"));
    rows
}

#[tokio::test]
async fn test_every_step_runs_and_is_rectangular() {
    let client = sample().await;
    let lesson = Lesson::crm();
    let steps = lesson.select::<&str>(&[]).unwrap();

    let reports = run_steps(&QueryRunner::new(&client), &steps).await.unwrap();

    assert_eq!(reports.len(), lesson.steps().len());
    for report in &reports {
        assert!(
            !report.result.columns.is_empty(),
            "{} has no labels",
            report.step.id
        );
        for row in &report.result.rows {
            assert_eq!(row.len(), report.result.columns.len(), "{}", report.step.id);
        }
    }

    client.close().await.unwrap();
}

#[tokio::test]
async fn test_preview_shows_orderdetails() {
    let client = sample().await;
    let report = run(&client, "preview-orderdetails").await;

    assert_eq!(
        report.result.column_names(),
        vec![
            "orderNumber",
            "productCode",
            "quantityOrdered",
            "priceEach"
        ]
    );
    assert_eq!(report.result.row_count, 8);

    client.close().await.unwrap();
}

#[tokio::test]
async fn test_inner_join_drops_unordered_products() {
    let client = sample().await;
    let report = run(&client, "inner-join-on").await;

    assert_eq!(report.result.row_count, 8);
    let code_index = report.result.column_index("productCode").unwrap();
    let codes = report.result.column_values(code_index);
    assert!(!codes.contains(&&Value::from("S12_1099")));

    client.close().await.unwrap();
}

#[tokio::test]
async fn test_using_has_one_fewer_column_than_on() {
    let client = sample().await;
    let on = run(&client, "inner-join-on").await.result;
    let using = run(&client, "inner-join-using").await.result;

    assert_eq!(on.columns.len(), using.columns.len() + 1);
    assert_eq!(on.row_count, using.row_count);

    let using_labels = using.column_names();
    assert_eq!(
        using_labels.iter().filter(|l| *l == "productCode").count(),
        1
    );

    client.close().await.unwrap();
}

#[tokio::test]
async fn test_aliased_steps_match_their_unaliased_forms() {
    let client = sample().await;
    let on = run(&client, "inner-join-on").await.result;
    let aliased = run(&client, "table-aliases").await.result;
    assert_eq!(on.column_names(), aliased.column_names());
    assert_eq!(sorted(on.rows), sorted(aliased.rows));

    let using = run(&client, "inner-join-using").await.result;
    let bare = run(&client, "aliases-without-as").await.result;
    assert_eq!(using.column_names(), bare.column_names());
    assert_eq!(sorted(using.rows), sorted(bare.rows));

    client.close().await.unwrap();
}

#[tokio::test]
async fn test_left_join_keeps_every_product() {
    let client = sample().await;
    let report = run(&client, "left-join").await;
    let result = &report.result;

    assert_eq!(result.row_count, 10);

    let order_number = result.column_index("orderNumber").unwrap();
    let unmatched: Vec<&Row> = result
        .rows
        .iter()
        .filter(|row| row[order_number].is_null())
        .collect();
    assert_eq!(unmatched.len(), 2);

    // NULL-extended rows sort last
    assert!(result.rows[8][order_number].is_null());
    assert!(result.rows[9][order_number].is_null());

    client.close().await.unwrap();
}

#[tokio::test]
async fn test_never_ordered_products() {
    let client = sample().await;
    let report = run(&client, "never-ordered").await;

    let codes: Vec<_> = report
        .result
        .rows
        .iter()
        .map(|row| row[0].to_display_string())
        .collect();
    assert_eq!(codes, vec!["S12_1099", "S700_2834"]);

    client.close().await.unwrap();
}

#[tokio::test]
async fn test_foreign_key_join_repeats_reps() {
    let client = sample().await;
    let report = run(&client, "foreign-key-join").await;
    let result = &report.result;

    assert_eq!(result.row_count, 5);

    let reps: Vec<i64> = result.rows.iter().filter_map(|row| row[0].as_int()).collect();
    assert_eq!(reps, vec![1165, 1165, 1370, 1370, 1501]);

    client.close().await.unwrap();
}

#[tokio::test]
async fn test_mismatched_keys_return_no_rows() {
    let client = sample().await;
    let report = run(&client, "mismatched-keys").await;

    assert!(report.result.is_empty());
    assert_eq!(
        report.result.column_names(),
        vec!["employeeNumber", "lastName", "customerNumber", "customerName"]
    );

    client.close().await.unwrap();
}

#[tokio::test]
async fn test_customers_with_reps_keeps_unassigned_customer() {
    let client = sample().await;
    let report = run(&client, "customers-with-reps").await;
    let result = &report.result;

    assert_eq!(result.row_count, 6);
    assert_eq!(
        result.column_names(),
        vec!["customerNumber", "customerName", "employeeNumber", "repLastName"]
    );

    let last = result.rows.last().unwrap();
    assert_eq!(last[0], Value::Int(125));
    assert!(last[2].is_null());
    assert!(last[3].is_null());

    client.close().await.unwrap();
}
