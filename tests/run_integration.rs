//! End-to-end run scenarios against wiremock doubles for both the SellUp
//! pricing endpoint and the Sheets API.

use sellup_tracker::catalog::Catalog;
use sellup_tracker::commands::RunCommand;
use sellup_tracker::config::Config;
use sellup_tracker::pacing::Pacer;
use sellup_tracker::sellup::client::SellupClient;
use sellup_tracker::sheets::client::SheetsSink;
use std::io::Write;
use wiremock::matchers::{body_string_contains, method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn write_catalog(ids: &[&str]) -> tempfile::NamedTempFile {
    let products: Vec<serde_json::Value> = ids
        .iter()
        .map(|id| {
            serde_json::json!({
                "goods_id": id,
                "product_name": format!("iPad Model {id}"),
                "referer": "https://sellup.com.sg/sell/ipad",
                "data": format!("{id}|55|901")
            })
        })
        .collect();

    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{}", serde_json::Value::Array(products)).unwrap();
    file
}

fn test_config() -> Config {
    Config {
        retry_delay_secs: 0,
        timeout_secs: 5,
        spreadsheet_id: "sheet-123".to_string(),
        worksheet: "Used Buyback Prices - iPad".to_string(),
        ..Config::default()
    }
}

fn token_ok(token: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(format!(r#"{{"errorCode":0,"data":{{"token":"{token}"}}}}"#))
}

fn token_err() -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(r#"{"errorCode":1,"data":null,"error":"date unavailable"}"#)
}

fn prices_ok(dealers: &[(&str, &str, f64)]) -> ResponseTemplate {
    let entries: Vec<String> = dealers
        .iter()
        .map(|(id, name, price)| {
            format!(
                r#"{{"dealerId":{id},"dealer":{{"name":"{name}"}},"skuPrice":{price},"totalPrice":{price}}}"#
            )
        })
        .collect();
    ResponseTemplate::new(200).set_body_string(format!(
        r#"{{"errorCode":0,"data":{{"dealerPrices":[{}]}}}}"#,
        entries.join(",")
    ))
}

async fn mount_sheets_ok(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path_regex(r"^/v4/spreadsheets/sheet-123/values/.*:clear$"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .mount(server)
        .await;

    Mock::given(method("PUT"))
        .and(path_regex(r"^/v4/spreadsheets/sheet-123/values/.*$"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .mount(server)
        .await;
}

fn make_sink(base_url: String) -> SheetsSink {
    SheetsSink::with_parts(
        base_url,
        "test-token".to_string(),
        "sheet-123".to_string(),
        "Used Buyback Prices - iPad".to_string(),
    )
    .unwrap()
}

#[tokio::test]
async fn mixed_success_failure_run_syncs_three_rows() {
    let sellup = MockServer::start().await;
    let sheets = MockServer::start().await;

    // Product A: token + 2 dealers, first try
    Mock::given(method("POST"))
        .and(path("/ajax.php"))
        .and(body_string_contains("action=Calculate"))
        .and(body_string_contains("goods_id=A"))
        .respond_with(token_ok("tok-a"))
        .mount(&sellup)
        .await;
    Mock::given(method("POST"))
        .and(path("/ajax.php"))
        .and(body_string_contains("action=onSite"))
        .and(body_string_contains("goods_id=A"))
        .respond_with(prices_ok(&[("1", "Dealer One", 100.0), ("2", "Dealer Two", 90.0)]))
        .mount(&sellup)
        .await;

    // Product B: token step always fails
    Mock::given(method("POST"))
        .and(path("/ajax.php"))
        .and(body_string_contains("action=Calculate"))
        .and(body_string_contains("goods_id=B"))
        .respond_with(token_err())
        .mount(&sellup)
        .await;

    // Product C: token fails once, then succeeds with 1 dealer
    Mock::given(method("POST"))
        .and(path("/ajax.php"))
        .and(body_string_contains("action=Calculate"))
        .and(body_string_contains("goods_id=C"))
        .respond_with(token_err())
        .up_to_n_times(1)
        .mount(&sellup)
        .await;
    Mock::given(method("POST"))
        .and(path("/ajax.php"))
        .and(body_string_contains("action=Calculate"))
        .and(body_string_contains("goods_id=C"))
        .respond_with(token_ok("tok-c"))
        .mount(&sellup)
        .await;
    Mock::given(method("POST"))
        .and(path("/ajax.php"))
        .and(body_string_contains("action=onSite"))
        .and(body_string_contains("goods_id=C"))
        .respond_with(prices_ok(&[("3", "Dealer Three", 80.0)]))
        .mount(&sellup)
        .await;

    mount_sheets_ok(&sheets).await;

    let config = test_config();
    let catalog_file = write_catalog(&["A", "B", "C"]);
    let catalog = Catalog::load(catalog_file.path()).unwrap();

    let client = SellupClient::with_base_url(&config, Some(sellup.uri())).unwrap();
    let sink = make_sink(sheets.uri());

    let cmd = RunCommand::new(config, false);
    let summary = cmd.execute_with(&client, &sink, &catalog, &Pacer::disabled()).await.unwrap();

    // Run completed despite product B exhausting its retries
    assert!(summary.contains("3 quote rows"));

    // Sheet got clear + header + one bulk data write
    let requests = sheets.received_requests().await.unwrap();
    assert_eq!(requests.len(), 3);
    assert!(requests[0].url.path().ends_with(":clear"));

    let data_body: serde_json::Value = serde_json::from_slice(&requests[2].body).unwrap();
    let values = data_body["values"].as_array().unwrap();
    assert_eq!(values.len(), 3);

    // Rows in product-processing order: A, A, C
    assert_eq!(values[0][0], "A");
    assert_eq!(values[1][0], "A");
    assert_eq!(values[2][0], "C");
    assert_eq!(values[2][3], "Dealer Three");
}

#[tokio::test]
async fn price_step_network_failure_skips_product() {
    let sellup = MockServer::start().await;
    let sheets = MockServer::start().await;

    // Token always succeeds
    Mock::given(method("POST"))
        .and(path("/ajax.php"))
        .and(body_string_contains("action=Calculate"))
        .respond_with(token_ok("tok-a"))
        .mount(&sellup)
        .await;

    // Price step answers with a server error every time
    Mock::given(method("POST"))
        .and(path("/ajax.php"))
        .and(body_string_contains("action=onSite"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&sellup)
        .await;

    mount_sheets_ok(&sheets).await;

    let config = test_config();
    let catalog_file = write_catalog(&["A"]);
    let catalog = Catalog::load(catalog_file.path()).unwrap();

    let client = SellupClient::with_base_url(&config, Some(sellup.uri())).unwrap();
    let sink = make_sink(sheets.uri());

    let cmd = RunCommand::new(config, false);
    let summary = cmd.execute_with(&client, &sink, &catalog, &Pacer::disabled()).await.unwrap();

    assert!(summary.contains("0 quote rows"));

    // Three full attempts: token + price each time
    let sellup_requests = sellup.received_requests().await.unwrap();
    let token_calls = sellup_requests
        .iter()
        .filter(|r| String::from_utf8_lossy(&r.body).contains("action=Calculate"))
        .count();
    let price_calls = sellup_requests
        .iter()
        .filter(|r| String::from_utf8_lossy(&r.body).contains("action=onSite"))
        .count();
    assert_eq!(token_calls, 3);
    assert_eq!(price_calls, 3);

    // Sheet still rewritten: clear + header, no data write
    let sheet_requests = sheets.received_requests().await.unwrap();
    assert_eq!(sheet_requests.len(), 2);
}

#[tokio::test]
async fn empty_catalog_writes_header_only() {
    let sheets = MockServer::start().await;
    mount_sheets_ok(&sheets).await;

    let config = test_config();
    let catalog_file = write_catalog(&[]);
    let catalog = Catalog::load(catalog_file.path()).unwrap();

    // No pricing server needed; nothing will be fetched
    let client = SellupClient::with_base_url(&config, Some("http://127.0.0.1:9".to_string())).unwrap();
    let sink = make_sink(sheets.uri());

    let cmd = RunCommand::new(config, false);
    cmd.execute_with(&client, &sink, &catalog, &Pacer::disabled()).await.unwrap();

    let requests = sheets.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);

    let header_body: serde_json::Value = serde_json::from_slice(&requests[1].body).unwrap();
    assert_eq!(
        header_body["values"][0],
        serde_json::json!([
            "goods_id",
            "product_name",
            "dealerId",
            "dealerName",
            "skuPrice",
            "totalPrice",
            "updated_at"
        ])
    );
}

#[tokio::test]
async fn sheets_clear_failure_aborts_run() {
    let sheets = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path_regex(r":clear$"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&sheets)
        .await;

    let config = test_config();
    let catalog_file = write_catalog(&[]);
    let catalog = Catalog::load(catalog_file.path()).unwrap();

    let client = SellupClient::with_base_url(&config, Some("http://127.0.0.1:9".to_string())).unwrap();
    let sink = make_sink(sheets.uri());

    let cmd = RunCommand::new(config, false);
    let result = cmd.execute_with(&client, &sink, &catalog, &Pacer::disabled()).await;

    assert!(result.is_err());
}
