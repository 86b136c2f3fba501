use crate::db::properties::get_property;
use crate::router::handle;
use crate::tests::utils::{
    body_string, default_geo, follow, get, location, post_form, post_upload, test_app,
    test_app_with, StubGeocode,
};

#[test]
fn scout_page_loads_with_the_address_form() {
    let (app, _) = test_app();

    let resp = handle(get("/"), &app).expect("scout page should render");

    assert_eq!(resp.status(), 200);
    let body = body_string(resp);
    assert!(body.contains("目利き (Scout)"));
    assert!(body.contains("/scout/address"));
    // No address entered yet, so neither the map nor the analyze button show.
    assert!(!body.contains("投資価値を分析"));
}

#[test]
fn exact_address_hit_recenters_the_map() {
    let (app, _) = test_app();

    let resp = handle(post_form("/scout/address", &[("address", "網野町網野123")]), &app).unwrap();
    assert_eq!(resp.status(), 303);
    assert_eq!(location(&resp), "/");

    let body = body_string(handle(follow(&resp), &app).unwrap());
    assert!(body.contains("座標を取得しました"));
    assert!(body.contains("35.70100"));
    assert!(body.contains("投資価値を分析"));
}

#[test]
fn lot_number_miss_warns_at_town_precision() {
    let (app, _) = test_app();

    let resp = handle(post_form("/scout/address", &[("address", "網野町網野999")]), &app).unwrap();

    let body = body_string(handle(follow(&resp), &app).unwrap());
    assert!(body.contains("番地が特定できなかった"));
    assert!(body.contains("35.69000"));
}

#[test]
fn unknown_address_falls_back_to_city_hall() {
    let (app, _) = test_app();

    let resp = handle(
        post_form("/scout/address", &[("address", "存在しない町9999")]),
        &app,
    )
    .unwrap();

    let body = body_string(handle(follow(&resp), &app).unwrap());
    assert!(body.contains("住所が特定できませんでした"));
    assert!(body.contains("35.62000"));
}

#[test]
fn blank_search_without_a_pin_asks_for_an_address() {
    let (app, _) = test_app();

    let resp = handle(post_form("/scout/address", &[("address", "")]), &app).unwrap();

    let body = body_string(handle(follow(&resp), &app).unwrap());
    assert!(body.contains("住所を入力してください。"));
}

#[test]
fn blank_search_with_a_pin_reverse_geocodes_it() {
    let (app, _) = test_app();

    handle(
        post_form("/scout/pin", &[("lat", "35.74"), ("lon", "135.08")]),
        &app,
    )
    .unwrap();
    let resp = handle(post_form("/scout/address", &[("address", "")]), &app).unwrap();

    let body = body_string(handle(follow(&resp), &app).unwrap());
    assert!(body.contains("京都府京丹後市網野町網野"));
    // The pin itself stays where it was placed.
    assert!(body.contains("35.74000"));
}

#[test]
fn pin_with_garbage_coordinates_is_a_bad_request() {
    let (app, _) = test_app();

    let err = handle(
        post_form("/scout/pin", &[("lat", "north"), ("lon", "135.08")]),
        &app,
    )
    .unwrap_err();

    assert!(matches!(err, crate::errors::ServerError::BadRequest(_)));
}

#[test]
fn analyze_renders_the_report() {
    let (app, model) = test_app();
    handle(post_form("/scout/address", &[("address", "網野町網野123")]), &app).unwrap();

    let resp = handle(post_form("/scout/analyze", &[]), &app).unwrap();
    assert_eq!(location(&resp), "/");

    let body = body_string(handle(follow(&resp), &app).unwrap());
    assert!(body.contains("投資分析レポート"));
    assert!(body.contains("rating-a"));
    assert!(body.contains("8.5%"));
    assert!(body.contains("改修費を甘く見るな"));
    assert!(body.contains("この物件を台帳に保存"));

    // The prompt carried the address; no evidence was staged.
    let request = model.last_request().expect("the model should be called");
    assert_eq!(request.blob_count(), 0);
}

#[test]
fn analyze_without_an_address_is_refused() {
    let (app, model) = test_app();

    let resp = handle(post_form("/scout/analyze", &[]), &app).unwrap();

    let body = body_string(handle(follow(&resp), &app).unwrap());
    assert!(body.contains("住所を入力してください。"));
    assert_eq!(model.request_count(), 0);
}

#[test]
fn analyze_failure_surfaces_the_model_error() {
    let (app, model) = test_app_with(default_geo(), vec![Err("quota exceeded".to_string())]);
    handle(post_form("/scout/address", &[("address", "網野町網野123")]), &app).unwrap();

    let resp = handle(post_form("/scout/analyze", &[]), &app).unwrap();

    let body = body_string(handle(follow(&resp), &app).unwrap());
    assert!(body.contains("解析エラー"));
    assert!(body.contains("quota exceeded"));
    // The whole retry budget was spent before giving up.
    assert_eq!(model.request_count(), 3);
}

#[test]
fn staged_evidence_rides_along_with_the_analysis() {
    let (app, model) = test_app();
    handle(post_form("/scout/address", &[("address", "網野町網野123")]), &app).unwrap();

    let resp = handle(
        post_upload("/scout/evidence", "現地写真.jpg", "image/jpeg", vec![0xAB; 2000]),
        &app,
    )
    .unwrap();
    assert_eq!(resp.status(), 200);

    let body = body_string(handle(get("/"), &app).unwrap());
    assert!(body.contains("現地写真.jpg"));

    handle(post_form("/scout/analyze", &[]), &app).unwrap();
    let request = model.last_request().unwrap();
    assert_eq!(request.blob_count(), 1);
}

#[test]
fn save_persists_the_property_and_opens_its_page() {
    let (app, _) = test_app();
    handle(post_form("/scout/address", &[("address", "網野町網野123")]), &app).unwrap();
    handle(
        post_upload("/scout/evidence", "genkan.jpg", "image/jpeg", vec![0xCD; 1500]),
        &app,
    )
    .unwrap();
    handle(post_form("/scout/analyze", &[]), &app).unwrap();

    let resp = handle(post_form("/scout/save", &[]), &app).unwrap();
    assert!(location(&resp).starts_with("/properties/1?notice="));

    let body = body_string(handle(follow(&resp), &app).unwrap());
    assert!(body.contains("物件を台帳に保存しました！"));
    assert!(body.contains("網野町網野123"));
    assert!(body.contains("genkan.jpg"));

    let stored = get_property(&app.db, 1).unwrap().unwrap();
    assert_eq!(stored.address, "網野町網野123");
    assert_eq!(stored.rating, "A");
    assert_eq!(stored.latitude, Some(35.701));
    assert_eq!(stored.memo, "改修費を甘く見るな");

    // Saving clears the workbench for the next property.
    let scout = body_string(handle(get("/"), &app).unwrap());
    assert!(!scout.contains("投資分析レポート"));
    assert!(!scout.contains("genkan.jpg"));
}

#[test]
fn save_without_a_report_is_refused() {
    let (app, _) = test_app();

    let resp = handle(post_form("/scout/save", &[]), &app).unwrap();

    let body = body_string(handle(follow(&resp), &app).unwrap());
    assert!(body.contains("先に投資価値を分析してください。"));
}

#[test]
fn save_of_an_unresolved_address_stores_null_coordinates() {
    let (app, _) = test_app();
    handle(
        post_form("/scout/address", &[("address", "存在しない町9999")]),
        &app,
    )
    .unwrap();
    handle(post_form("/scout/analyze", &[]), &app).unwrap();

    let resp = handle(post_form("/scout/save", &[]), &app).unwrap();

    let stored = get_property(&app.db, 1).unwrap().unwrap();
    assert_eq!(stored.latitude, None);
    assert_eq!(stored.longitude, None);

    let body = body_string(handle(follow(&resp), &app).unwrap());
    assert!(body.contains("座標が設定されていません"));
}

#[test]
fn save_re_resolves_a_pin_left_on_the_sentinel() {
    // The address was resolvable all along; the session just never moved off
    // the city hall point because it was entered before this geocoder knew it.
    let geo = StubGeocode::new(
        &[(
            "京都府 網野町網野123",
            crate::geocode::GeoPoint { lat: 35.701, lon: 135.058 },
        )],
        None,
    );
    let (app, _) = test_app_with(geo, vec![Ok(crate::tests::utils::appraisal_json())]);

    handle(
        post_form("/scout/pin", &[("lat", "35.62"), ("lon", "135.06")]),
        &app,
    )
    .unwrap();
    {
        let mut session = app.session.lock().unwrap();
        session.address = "網野町網野123".to_string();
    }
    handle(post_form("/scout/analyze", &[]), &app).unwrap();
    handle(post_form("/scout/save", &[]), &app).unwrap();

    let stored = get_property(&app.db, 1).unwrap().unwrap();
    assert_eq!(stored.latitude, Some(35.701));
    assert_eq!(stored.longitude, Some(135.058));
}

#[test]
fn reset_clears_the_workbench() {
    let (app, _) = test_app();
    handle(post_form("/scout/address", &[("address", "網野町網野123")]), &app).unwrap();
    handle(post_form("/scout/analyze", &[]), &app).unwrap();

    let resp = handle(post_form("/scout/reset", &[]), &app).unwrap();
    assert_eq!(location(&resp), "/");

    let body = body_string(handle(get("/"), &app).unwrap());
    assert!(!body.contains("投資分析レポート"));
    assert!(!body.contains("網野町網野123"));
}

#[test]
fn unknown_route_is_not_found() {
    let (app, _) = test_app();

    let err = handle(get("/no/such/page"), &app).unwrap_err();

    assert!(matches!(err, crate::errors::ServerError::NotFound));
}
