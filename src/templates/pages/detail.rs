use crate::domain::{PropertyRecord, PropertyStatus};
use crate::templates::components::upload_script;
use crate::templates::desktop_layout;
use maud::{html, Markup, PreEscaped};
use url::form_urlencoded;

pub fn detail_page(
    prop: &PropertyRecord,
    evidence: &[String],
    followup_count: usize,
    notice: Option<&str>,
) -> Markup {
    let (map_lat, map_lon, has_coords) = match prop.point() {
        Some(point) if point.lat != 0.0 && point.lon != 0.0 => (point.lat, point.lon, true),
        _ => (35.62, 135.06, false),
    };

    desktop_layout(
        &format!("{} | Kyotango Property Platform", prop.title),
        notice,
        html! {
            p { a href="/ledger" { "⬅️ 物件一覧に戻る" } }
            h2 { (prop.title) }

            section style="display: flex; gap: 2rem; align-items: flex-start;" {
                form action=(format!("/properties/{}/status", prop.id)) method="post" {
                    label { "現在のステータス" }
                    br;
                    select name="status" {
                        @for status in PropertyStatus::ALL {
                            option value=(status.as_str()) selected[status == prop.status] {
                                (status.label())
                            }
                        }
                    }
                    button type="submit" style="margin-left: 8px;" { "💾 変更を保存" }
                }
                div class="metrics" {
                    div {
                        div class="metric-label" { "物件価格" }
                        div class="metric-value" { (prop.price) "万円" }
                    }
                    div {
                        div class="metric-label" { "リノベ概算" }
                        div class="metric-value" { (prop.renovation_cost) "万円" }
                    }
                    div {
                        div class="metric-label" { "表面利回り" }
                        div class="metric-value" { (format!("{:.1}%", prop.roi)) }
                    }
                }
            }

            hr;

            section {
                h4 { "📍 地図・位置情報修正" }
                @if !has_coords {
                    div class="banner banner-warn" {
                        "⚠️ 座標が設定されていません。手動で入力するか、住所から再取得してください。"
                    }
                }
                p { "🗺 地図をタップして、ピンを正しい建物の真上に移動させてください" }
                div id="map" {}
                (detail_map_script(map_lat, map_lon, has_coords, prop))

                form action=(format!("/properties/{}/coords", prop.id)) method="post"
                    style="display: flex; gap: 10px; align-items: center; margin-top: 10px;" {
                    label { "Latitude" }
                    input type="number" step="0.000001" id="fix-lat" name="lat"
                        value=(format!("{:.6}", prop.latitude.unwrap_or(0.0)));
                    label { "Longitude" }
                    input type="number" step="0.000001" id="fix-lon" name="lon"
                        value=(format!("{:.6}", prop.longitude.unwrap_or(0.0)));
                    button type="submit" { "座標更新" }
                }
                form action=(format!("/properties/{}/regeocode", prop.id)) method="post"
                    style="margin-top: 10px;" {
                    button type="submit" { "住所から座標を再取得 (京都府付与)" }
                }
            }

            hr;

            section {
                h4 { "🖼 物件アルバム" }
                @if evidence.is_empty() {
                    p { "資料はまだありません。" }
                } @else {
                    div class="album" {
                        @for name in evidence {
                            @if is_image(name) {
                                a href=(evidence_url(prop.id, name)) {
                                    img src=(evidence_url(prop.id, name)) alt=(name);
                                }
                            } @else {
                                a href=(evidence_url(prop.id, name)) { "🎧 " (name) }
                            }
                        }
                    }
                }

                h4 { "📸 追加資料・再鑑定" }
                input type="file" id="detail-files" multiple
                    accept=".png,.jpg,.jpeg,.gif,.webp,.mp3,.wav,.m4a,.pdf";
                button type="button"
                    onclick=(format!("uploadEvidence('detail-files', '/properties/{}/evidence')", prop.id)) {
                    "アップロード"
                }
                (upload_script())

                form action=(format!("/properties/{}/reanalyze", prop.id)) method="post"
                    style="margin-top: 10px;" {
                    button type="submit" { "🔄 追加資料を含めて再鑑定" }
                    @if followup_count > 0 {
                        span style="margin-left: 8px;" { (followup_count) "件の追加資料を送信します" }
                    }
                }
            }

            hr;

            section {
                h4 { "📝 分析・メモ" }
                div class="banner" { "💡 辛口アドバイス: " (prop.memo) }
                @if !prop.legal_risks.is_empty() {
                    div class="banner banner-warn" { "⚠️ 法的リスク: " (prop.legal_risks) }
                }

                form action=(format!("/properties/{}/memo", prop.id)) method="post" {
                    label { "追記メモ" }
                    br;
                    textarea name="memo" rows="4" style="width: 100%;" { (prop.memo) }
                    br;
                    button type="submit" style="margin-top: 6px;" { "メモを保存" }
                }
            }

            hr;

            section {
                details {
                    summary { "🗑️ 削除メニューを開く" }
                    div class="banner banner-err" { "この操作は取り消せません。本当に削除しますか？" }
                    form action=(format!("/properties/{}/delete", prop.id)) method="post"
                        onsubmit="return confirm('本当に削除しますか？')" {
                        button type="submit" { "物件を完全に削除する" }
                    }
                }
            }
        },
    )
}

fn is_image(name: &str) -> bool {
    let lower = name.to_lowercase();
    [".png", ".jpg", ".jpeg", ".gif", ".webp"]
        .iter()
        .any(|ext| lower.ends_with(ext))
}

fn evidence_url(property_id: i64, name: &str) -> String {
    let encoded: String = form_urlencoded::byte_serialize(name.as_bytes()).collect();
    format!("/properties/{property_id}/evidence?name={encoded}")
}

fn detail_map_script(lat: f64, lon: f64, has_coords: bool, prop: &PropertyRecord) -> Markup {
    let marker_color = if prop.status == PropertyStatus::Purchased {
        "red"
    } else {
        "blue"
    };
    let marker_line = if has_coords {
        format!(
            "var marker = L.circleMarker([{lat}, {lon}], {{radius: 9, color: '{marker_color}', fillColor: '{marker_color}', fillOpacity: 0.8}}).addTo(map);"
        )
    } else {
        "var marker = null;".to_string()
    };
    let script = format!(
        r#"
var map = L.map('map').setView([{lat}, {lon}], 18);
var sat = L.tileLayer('https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/{{z}}/{{y}}/{{x}}', {{attribution: 'Esri'}});
var osm = L.tileLayer('https://tile.openstreetmap.org/{{z}}/{{x}}/{{y}}.png', {{attribution: 'OpenStreetMap'}});
sat.addTo(map);
L.control.layers({{'衛星写真 (Satellite)': sat, '標準マップ (Standard)': osm}}).addTo(map);
{marker_line}
map.on('click', function (e) {{
    document.getElementById('fix-lat').value = e.latlng.lat.toFixed(6);
    document.getElementById('fix-lon').value = e.latlng.lng.toFixed(6);
    if (marker) {{ marker.setLatLng(e.latlng); }}
    else {{ marker = L.circleMarker(e.latlng, {{radius: 9, color: 'blue', fillColor: 'blue', fillOpacity: 0.8}}).addTo(map); }}
}});
"#
    );
    html! { script { (PreEscaped(script)) } }
}
