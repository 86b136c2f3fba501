use std::collections::HashMap;
use std::io::Read;
use std::sync::MutexGuard;

use astra::{Body, Request, ResponseBuilder};
use chrono::Local;
use tracing::warn;
use url::form_urlencoded;

use crate::appraisal::build_appraisal_request;
use crate::db::properties::{
    create_property, delete_property, get_property, list_properties, update_property_field,
};
use crate::domain::{NewProperty, PropertyField, PropertyStatus};
use crate::errors::ServerError;
use crate::evidence::EvidenceAttachment;
use crate::geocode::{GeoPoint, Precision};
use crate::responses::{file_response, html_response, redirect_response, ResultResp};
use crate::spreadsheets::export_properties_xlsx;
use crate::state::{App, ScoutSession};
use crate::templates;

pub fn handle(mut req: Request, app: &App) -> ResultResp {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let segments: Vec<&str> = path.trim_matches('/').split('/').collect();

    match (method.as_str(), segments.as_slice()) {
        ("GET", [""]) => scout_view(&req, app),
        ("POST", ["scout", "address"]) => scout_address(&mut req, app),
        ("POST", ["scout", "pin"]) => scout_pin(&mut req, app),
        ("POST", ["scout", "evidence"]) => scout_evidence(&mut req, app),
        ("POST", ["scout", "analyze"]) => scout_analyze(app),
        ("POST", ["scout", "save"]) => scout_save(app),
        ("POST", ["scout", "reset"]) => scout_reset(app),

        ("GET", ["ledger"]) => ledger_view(&req, app),
        ("GET", ["export"]) => export_ledger(app),

        ("GET", ["advisor"]) => advisor_view(&req, app),
        ("POST", ["advisor", "ask"]) => advisor_ask(&mut req, app),

        ("GET", ["properties", id]) => property_view(&req, app, parse_id(id)?),
        ("POST", ["properties", id, "status"]) => property_status(&mut req, app, parse_id(id)?),
        ("POST", ["properties", id, "memo"]) => property_memo(&mut req, app, parse_id(id)?),
        ("POST", ["properties", id, "coords"]) => property_coords(&mut req, app, parse_id(id)?),
        ("POST", ["properties", id, "regeocode"]) => property_regeocode(app, parse_id(id)?),
        ("GET", ["properties", id, "evidence"]) => property_evidence_get(&req, app, parse_id(id)?),
        ("POST", ["properties", id, "evidence"]) => {
            property_evidence_post(&mut req, app, parse_id(id)?)
        }
        ("POST", ["properties", id, "reanalyze"]) => property_reanalyze(app, parse_id(id)?),
        ("POST", ["properties", id, "delete"]) => property_delete(app, parse_id(id)?),

        _ => Err(ServerError::NotFound),
    }
}

// --- Scout ---

fn scout_view(req: &Request, app: &App) -> ResultResp {
    let query = parse_query(req);
    let session = lock_session(app)?;
    html_response(templates::pages::scout_page(
        &session,
        query.get("notice").map(String::as_str),
    ))
}

fn scout_address(req: &mut Request, app: &App) -> ResultResp {
    let form = parse_form(req)?;
    let address = form
        .get("address")
        .map(|a| a.trim().to_string())
        .unwrap_or_default();

    if address.is_empty() {
        return scout_address_from_pin(app);
    }

    let resolved = app.resolver.resolve(&address);
    let mut session = lock_session(app)?;
    session.enter_address(&address, resolved.point, resolved.precision);
    redirect_response("/")
}

/// A blank search with a placed pin means "what is the address here":
/// reverse-geocode the pin into the address field.
fn scout_address_from_pin(app: &App) -> ResultResp {
    let fallback = app.resolver.region().fallback;
    let pinned = {
        let session = lock_session(app)?;
        (session.map_center != fallback).then_some(session.map_center)
    };

    let Some(point) = pinned else {
        return notice_redirect("/", "住所を入力してください。");
    };

    match app.resolver.reverse(point) {
        Some(name) => {
            let mut session = lock_session(app)?;
            session.address = name;
            redirect_response("/")
        }
        None => notice_redirect("/", "この地点の住所が取得できませんでした。"),
    }
}

fn scout_pin(req: &mut Request, app: &App) -> ResultResp {
    let form = parse_form(req)?;
    let lat = parse_coord(form.get("lat"))?;
    let lon = parse_coord(form.get("lon"))?;

    let mut session = lock_session(app)?;
    session.place_pin(GeoPoint { lat, lon });
    redirect_response("/")
}

fn scout_evidence(req: &mut Request, app: &App) -> ResultResp {
    let attachment = read_attachment(req)?;
    let mut session = lock_session(app)?;
    session.stage_evidence(attachment);
    empty_ok()
}

fn scout_analyze(app: &App) -> ResultResp {
    // Snapshot the request under the lock, then talk to the model without it.
    let request = {
        let session = lock_session(app)?;
        if session.address.is_empty() {
            return notice_redirect("/", "住所を入力してください。");
        }
        build_appraisal_request(&session.address, &session.evidence, None)
    };

    match app.appraiser.submit(&request) {
        Ok(result) => {
            let mut session = lock_session(app)?;
            session.record_appraisal(result);
            redirect_response("/")
        }
        Err(e) => notice_redirect("/", &format!("解析エラー: {e}")),
    }
}

fn scout_save(app: &App) -> ResultResp {
    let mut session = lock_session(app)?;
    let result = match session.appraisal.as_ref() {
        Some(result) => result,
        None => return notice_redirect("/", "先に投資価値を分析してください。"),
    };

    // A pin still sitting on the City Hall sentinel is not a real location.
    // Re-resolve once at save time; if that still only yields the fallback,
    // store NULL coordinates so the record stays off the maps.
    let coords = if app.resolver.region().near_fallback(session.map_center) {
        let retried = app.resolver.resolve(&session.address);
        (retried.precision != Precision::CityFallback).then_some(retried.point)
    } else {
        Some(session.map_center)
    };

    let now = Local::now();
    let new_prop = NewProperty::from_appraisal(&session.address, coords, result, now.date_naive());
    let id = create_property(&app.db, &new_prop, now.naive_local())?;

    // The row exists either way; a failed evidence write is logged, not fatal.
    for attachment in &session.evidence {
        if let Err(e) = app.vault.store(id, attachment) {
            warn!("evidence persist failed for property {id}: {e}");
        }
    }

    session.clear_scout();
    notice_redirect(&format!("/properties/{id}"), "物件を台帳に保存しました！")
}

fn scout_reset(app: &App) -> ResultResp {
    let mut session = lock_session(app)?;
    session.clear_scout();
    redirect_response("/")
}

// --- Ledger ---

fn ledger_view(req: &Request, app: &App) -> ResultResp {
    let query = parse_query(req);
    let properties = list_properties(&app.db)?;
    html_response(templates::pages::ledger_page(
        &properties,
        query.get("notice").map(String::as_str),
    ))
}

fn export_ledger(app: &App) -> ResultResp {
    let properties = list_properties(&app.db)?;
    let filename = format!("properties_{}.xlsx", Local::now().format("%Y%m%d"));
    export_properties_xlsx(&properties, &filename)
}

// --- Advisor ---

fn advisor_view(req: &Request, app: &App) -> ResultResp {
    let query = parse_query(req);
    let session = lock_session(app)?;
    html_response(templates::pages::advisor_page(
        &session.chat,
        query.get("notice").map(String::as_str),
    ))
}

fn advisor_ask(req: &mut Request, app: &App) -> ResultResp {
    let form = parse_form(req)?;
    let question = form
        .get("question")
        .map(|q| q.trim().to_string())
        .unwrap_or_default();
    if question.is_empty() {
        return redirect_response("/advisor");
    }

    let portfolio = list_properties(&app.db)?;
    match app.advisor.ask(&portfolio, &question) {
        Ok(answer) => {
            let mut session = lock_session(app)?;
            session.push_chat(question, answer);
            redirect_response("/advisor")
        }
        Err(e) => notice_redirect("/advisor", &format!("エラーが発生しました: {e}")),
    }
}

// --- Property detail ---

fn property_view(req: &Request, app: &App, id: i64) -> ResultResp {
    let query = parse_query(req);
    let prop = get_property(&app.db, id)?.ok_or(ServerError::NotFound)?;
    let evidence = app.vault.list(id);
    let followup_count = lock_session(app)?.followup_count(id);

    html_response(templates::pages::detail_page(
        &prop,
        &evidence,
        followup_count,
        query.get("notice").map(String::as_str),
    ))
}

fn property_status(req: &mut Request, app: &App, id: i64) -> ResultResp {
    let form = parse_form(req)?;
    let status = PropertyStatus::parse(form.get("status").map(String::as_str).unwrap_or(""));
    update_property_field(&app.db, id, PropertyField::Status, &status.as_str())?;
    notice_redirect(&format!("/properties/{id}"), "ステータスを更新しました！")
}

fn property_memo(req: &mut Request, app: &App, id: i64) -> ResultResp {
    let form = parse_form(req)?;
    let memo = form.get("memo").cloned().unwrap_or_default();
    update_property_field(&app.db, id, PropertyField::Memo, &memo)?;
    notice_redirect(&format!("/properties/{id}"), "メモを保存しました！")
}

fn property_coords(req: &mut Request, app: &App, id: i64) -> ResultResp {
    let form = parse_form(req)?;
    let lat = parse_coord(form.get("lat"))?;
    let lon = parse_coord(form.get("lon"))?;

    update_property_field(&app.db, id, PropertyField::Latitude, &lat)?;
    update_property_field(&app.db, id, PropertyField::Longitude, &lon)?;
    notice_redirect(&format!("/properties/{id}"), "座標を更新しました！")
}

fn property_regeocode(app: &App, id: i64) -> ResultResp {
    let prop = get_property(&app.db, id)?.ok_or(ServerError::NotFound)?;

    let resolved = app.resolver.resolve(&prop.address);
    if resolved.precision == Precision::CityFallback {
        return notice_redirect(&format!("/properties/{id}"), "座標を取得できませんでした。");
    }

    update_property_field(&app.db, id, PropertyField::Latitude, &resolved.point.lat)?;
    update_property_field(&app.db, id, PropertyField::Longitude, &resolved.point.lon)?;

    let notice = match resolved.precision {
        Precision::Exact => "座標を更新しました！",
        _ => "座標を更新しました！ (精度: town - 地図で微調整してください)",
    };
    notice_redirect(&format!("/properties/{id}"), notice)
}

fn property_evidence_get(req: &Request, app: &App, id: i64) -> ResultResp {
    let name = parse_query(req)
        .remove("name")
        .ok_or(ServerError::NotFound)?;
    let (bytes, media_type) = app.vault.open(id, &name).ok_or(ServerError::NotFound)?;
    file_response(bytes, &media_type)
}

fn property_evidence_post(req: &mut Request, app: &App, id: i64) -> ResultResp {
    if get_property(&app.db, id)?.is_none() {
        return Err(ServerError::NotFound);
    }

    let attachment = read_attachment(req)?;
    app.vault.store(id, &attachment)?;

    // Also staged for the next re-appraisal of this property.
    let mut session = lock_session(app)?;
    session.stage_followup(id, attachment);
    empty_ok()
}

fn property_reanalyze(app: &App, id: i64) -> ResultResp {
    let prop = get_property(&app.db, id)?.ok_or(ServerError::NotFound)?;
    let prior = prop.appraisal();
    let staged = lock_session(app)?.take_followup(id);

    let request = build_appraisal_request(&prop.address, &staged, Some(&prior));

    match app.appraiser.submit(&request) {
        Ok(result) => {
            update_property_field(&app.db, id, PropertyField::Price, &result.price_listing)?;
            update_property_field(
                &app.db,
                id,
                PropertyField::RenovationCost,
                &result.renovation_estimate,
            )?;
            update_property_field(&app.db, id, PropertyField::Roi, &result.roi_estimate)?;
            update_property_field(&app.db, id, PropertyField::Rating, &result.grade)?;
            update_property_field(&app.db, id, PropertyField::DetailsJson, &result.to_json())?;
            update_property_field(&app.db, id, PropertyField::LegalRisks, &result.legal_risks)?;

            notice_redirect(
                &format!("/properties/{id}"),
                "再鑑定が完了しました！データが更新されました。",
            )
        }
        Err(e) => {
            // Put the staged files back so the next attempt can resend them.
            let mut session = lock_session(app)?;
            for attachment in staged {
                session.stage_followup(id, attachment);
            }
            notice_redirect(&format!("/properties/{id}"), &format!("再解析エラー: {e}"))
        }
    }
}

fn property_delete(app: &App, id: i64) -> ResultResp {
    delete_property(&app.db, id)?;
    notice_redirect("/ledger", "物件を削除しました")
}

// --- Request plumbing ---

fn parse_id(raw: &str) -> Result<i64, ServerError> {
    raw.parse().map_err(|_| ServerError::NotFound)
}

fn parse_query(req: &Request) -> HashMap<String, String> {
    match req.uri().query() {
        Some(q) => form_urlencoded::parse(q.as_bytes()).into_owned().collect(),
        None => HashMap::new(),
    }
}

fn parse_form(req: &mut Request) -> Result<HashMap<String, String>, ServerError> {
    let bytes = read_body(req)?;
    Ok(form_urlencoded::parse(&bytes).into_owned().collect())
}

fn read_body(req: &mut Request) -> Result<Vec<u8>, ServerError> {
    let mut bytes = Vec::new();
    req.body_mut()
        .reader()
        .read_to_end(&mut bytes)
        .map_err(|e| ServerError::BadRequest(format!("unreadable request body: {e}")))?;
    Ok(bytes)
}

/// Raw-body upload: file name from `?name=`, media type from the header.
fn read_attachment(req: &mut Request) -> Result<EvidenceAttachment, ServerError> {
    let name = parse_query(req)
        .remove("name")
        .filter(|n| !n.is_empty())
        .ok_or_else(|| ServerError::BadRequest("missing file name".to_string()))?;

    let content_type = req
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let bytes = read_body(req)?;
    Ok(EvidenceAttachment::from_upload(
        name,
        content_type.as_deref(),
        bytes,
    ))
}

fn parse_coord(raw: Option<&String>) -> Result<f64, ServerError> {
    raw.and_then(|v| v.trim().parse().ok())
        .ok_or_else(|| ServerError::BadRequest("coordinates must be numbers".to_string()))
}

fn lock_session(app: &App) -> Result<MutexGuard<'_, ScoutSession>, ServerError> {
    app.session.lock().map_err(|_| ServerError::InternalError)
}

fn notice_redirect(base: &str, notice: &str) -> ResultResp {
    let query: String = form_urlencoded::Serializer::new(String::new())
        .append_pair("notice", notice)
        .finish();
    redirect_response(&format!("{base}?{query}"))
}

fn empty_ok() -> ResultResp {
    let resp = ResponseBuilder::new()
        .status(200)
        .body(Body::empty())
        .map_err(|_| ServerError::InternalError)?;
    Ok(resp)
}
