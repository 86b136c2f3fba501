use crate::domain::{PropertyRecord, PropertyStatus};
use crate::templates::desktop_layout;
use maud::{html, Markup, PreEscaped};
use serde_json::json;

pub fn ledger_page(properties: &[PropertyRecord], notice: Option<&str>) -> Markup {
    desktop_layout(
        "物件台帳 | Kyotango Property Platform",
        notice,
        html! {
            h2 { "📂 物件台帳 (Portfolio)" }

            @if properties.is_empty() {
                div class="banner" {
                    "まだ保存された物件はありません。「目利き」タブから物件を保存してください。"
                }
            } @else {
                section {
                    h4 { "🗺️ 全体マップ (戦略ビュー)" }
                    div id="map" {}
                    (portfolio_map_script(properties))
                }

                hr;

                section {
                    h4 { "📋 物件一覧" }
                    table {
                        thead {
                            tr {
                                th { "ID" }
                                th { "ステータス" }
                                th { "タイトル" }
                                th { "価格(万)" }
                                th { "リノベ(万)" }
                                th { "総額(万)" }
                                th { "利回り" }
                                th { "判定" }
                                th { "住所" }
                                th { }
                            }
                        }
                        tbody {
                            @for prop in properties {
                                tr {
                                    td { (prop.id) }
                                    td { (prop.status.label()) }
                                    td { (prop.title) }
                                    td { (prop.price) "万" }
                                    td { (prop.renovation_cost) "万" }
                                    td { (prop.price + prop.renovation_cost) "万" }
                                    td { (format!("{:.1}%", prop.roi)) }
                                    td { (prop.rating) }
                                    td { (prop.address) }
                                    td { a href=(format!("/properties/{}", prop.id)) { "詳細へ ➡️" } }
                                }
                            }
                        }
                    }
                }
            }
        },
    )
}

/// Marker colors follow the ledger legend: red = bought, blue = under
/// consideration, black = passed on, gray = not visited yet.
fn marker_color(status: PropertyStatus) -> &'static str {
    match status {
        PropertyStatus::Purchased => "red",
        PropertyStatus::Considering => "blue",
        PropertyStatus::Passed => "black",
        PropertyStatus::NotYetVisited => "gray",
    }
}

fn portfolio_map_script(properties: &[PropertyRecord]) -> Markup {
    let markers: Vec<serde_json::Value> = properties
        .iter()
        .filter_map(|prop| {
            let point = prop.point()?;
            if point.lat == 0.0 || point.lon == 0.0 {
                return None;
            }
            Some(json!({
                "id": prop.id,
                "lat": point.lat,
                "lon": point.lon,
                "color": marker_color(prop.status),
                "title": prop.title,
                "status": prop.status.label(),
                "price": prop.price,
                "roi": prop.roi,
            }))
        })
        .collect();

    // < keeps any "</script>" inside titles from closing the tag.
    let data = serde_json::to_string(&markers)
        .unwrap_or_else(|_| "[]".to_string())
        .replace('<', "\\u003c");

    let script = format!(
        r#"
var markers = {data};
var map = L.map('map').setView([35.62, 135.06], 10);
var sat = L.tileLayer('https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/{{z}}/{{y}}/{{x}}', {{attribution: 'Esri'}});
var strategic = L.tileLayer('https://basemaps.cartocdn.com/light_all/{{z}}/{{x}}/{{y}}.png', {{attribution: 'CARTO'}});
var osm = L.tileLayer('https://tile.openstreetmap.org/{{z}}/{{x}}/{{y}}.png', {{attribution: 'OpenStreetMap'}});
sat.addTo(map);
L.control.layers({{'衛星写真 (Satellite)': sat, '戦略マップ (Strategic)': strategic, '標準マップ (Standard)': osm}}).addTo(map);
markers.forEach(function (m) {{
    var marker = L.circleMarker([m.lat, m.lon], {{radius: 9, color: m.color, fillColor: m.color, fillOpacity: 0.8}});
    var popup = document.createElement('div');
    var title = document.createElement('b');
    title.textContent = m.title + ' (' + m.status + ')';
    popup.appendChild(title);
    popup.appendChild(document.createElement('br'));
    popup.appendChild(document.createTextNode('価格: ' + m.price + '万円 / 利回り: ' + m.roi + '%'));
    popup.appendChild(document.createElement('br'));
    var link = document.createElement('a');
    link.href = '/properties/' + m.id;
    link.textContent = '詳細を見る';
    popup.appendChild(link);
    marker.bindPopup(popup);
    marker.addTo(map);
}});
if (markers.length) {{
    map.fitBounds(markers.map(function (m) {{ return [m.lat, m.lon]; }}), {{maxZoom: 14}});
}}
"#
    );
    html! { script { (PreEscaped(script)) } }
}
