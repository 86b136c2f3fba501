use crate::db::properties::create_property;
use crate::domain::{AppraisalResult, NewProperty};
use crate::geocode::GeoPoint;
use crate::router::handle;
use crate::state::App;
use crate::tests::utils::{body_bytes, body_string, get, test_app};
use chrono::NaiveDate;

fn seed(app: &App, address: &str, point: Option<GeoPoint>, day: u32) -> i64 {
    let result = AppraisalResult {
        price_listing: 300,
        renovation_estimate: 700,
        roi_estimate: 7.2,
        grade: "B".to_string(),
        bitter_advice: "要内見".to_string(),
        ..AppraisalResult::default()
    };
    let date = NaiveDate::from_ymd_opt(2025, 3, day).unwrap();
    let new = NewProperty::from_appraisal(address, point, &result, date);
    create_property(&app.db, &new, date.and_hms_opt(9, 0, 0).unwrap()).unwrap()
}

#[test]
fn empty_ledger_points_back_to_the_scout() {
    let (app, _) = test_app();

    let resp = handle(get("/ledger"), &app).unwrap();

    assert_eq!(resp.status(), 200);
    let body = body_string(resp);
    assert!(body.contains("まだ保存された物件はありません"));
    assert!(!body.contains("var markers"));
}

#[test]
fn properties_list_newest_first() {
    let (app, _) = test_app();
    seed(&app, "物件A", None, 1);
    seed(&app, "物件B", None, 2);

    let body = body_string(handle(get("/ledger"), &app).unwrap());

    let older = body.find("20250301_物件A").expect("older row should render");
    let newer = body.find("20250302_物件B").expect("newer row should render");
    assert!(newer < older);
    // Total column adds price and renovation.
    assert!(body.contains("1000万"));
}

#[test]
fn map_markers_skip_unmapped_properties() {
    let (app, _) = test_app();
    seed(&app, "物件A", Some(GeoPoint { lat: 35.70, lon: 135.10 }), 1);
    seed(&app, "物件B", None, 2);

    let body = body_string(handle(get("/ledger"), &app).unwrap());

    assert!(body.contains(r#""title":"20250301_物件A""#));
    assert!(!body.contains(r#""title":"20250302_物件B""#));
    // The unmapped row still appears in the table.
    assert!(body.contains("20250302_物件B"));
}

#[test]
fn export_downloads_a_dated_workbook() {
    let (app, _) = test_app();
    seed(&app, "物件A", Some(GeoPoint { lat: 35.70, lon: 135.10 }), 1);

    let resp = handle(get("/export"), &app).unwrap();

    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers().get("Content-Type").unwrap(),
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    );
    let disposition = resp
        .headers()
        .get("Content-Disposition")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.contains("properties_"));
    assert!(disposition.ends_with(".xlsx\""));

    // An XLSX file is a zip archive; check the magic instead of the content.
    let bytes = body_bytes(resp);
    assert_eq!(&bytes[..2], b"PK");
}

#[test]
fn export_of_an_empty_ledger_still_succeeds() {
    let (app, _) = test_app();

    let resp = handle(get("/export"), &app).unwrap();

    assert_eq!(resp.status(), 200);
    assert!(!body_bytes(resp).is_empty());
}
