use crate::geocode::Precision;
use crate::state::ScoutSession;
use crate::templates::components::{grade_badge, metric, upload_script};
use crate::templates::desktop_layout;
use maud::{html, Markup, PreEscaped};

pub fn scout_page(session: &ScoutSession, notice: Option<&str>) -> Markup {
    desktop_layout(
        "目利き | Kyotango Property Platform",
        notice,
        html! {
            h2 { "🔍 目利き (Scout)" }

            section {
                h3 { "Step 1: 住所・エリア入力" }
                form action="/scout/address" method="post" style="display: flex; gap: 10px;" {
                    input type="text" name="address" value=(session.address)
                        placeholder="住所を入力してください（例：京丹後市網野町...）"
                        style="flex: 1;";
                    button type="submit" { "検索" }
                }
                (precision_banner(session))
            }

            @if !session.address.is_empty() {
                section {
                    h4 { "🗺️ 位置確認・修正" }
                    p { "地図をクリックすると、その位置にピンが移動し、座標が更新されます。" }
                    div id="map" {}
                    (scout_map_script(session))
                    form id="pin-form" action="/scout/pin" method="post" {
                        input type="hidden" id="pin-lat" name="lat" value="";
                        input type="hidden" id="pin-lon" name="lon" value="";
                    }
                    div class="banner" {
                        (format!("📍 現在選択中の座標: 緯度 {:.5}, 経度 {:.5}",
                            session.map_center.lat, session.map_center.lon))
                    }
                }

                hr;

                section {
                    h3 { "Step 2: 内見メモ・現場資料" }
                    p { (format!("📍 {} の内見を開始します。音声メモや現場写真を追加してください。", session.address)) }
                    input type="file" id="scout-files" multiple
                        accept=".png,.jpg,.jpeg,.gif,.webp,.mp3,.wav,.m4a,.pdf";
                    button type="button"
                        onclick="uploadEvidence('scout-files', '/scout/evidence')" { "アップロード" }
                    (upload_script())

                    @if !session.evidence.is_empty() {
                        ul {
                            @for item in &session.evidence {
                                li { (item.file_name) " (" (item.bytes.len() / 1024) "KB)" }
                            }
                        }
                    }
                }

                section {
                    form action="/scout/analyze" method="post" {
                        button type="submit" { "🧠 投資価値を分析" }
                    }
                }
            }

            @if let Some(res) = &session.appraisal {
                hr;
                section {
                    h3 { "📊 投資分析レポート" }
                    div class="metrics" {
                        div {
                            div class="metric-label" { "総合判定" }
                            (grade_badge(&res.grade))
                        }
                        (metric("表面利回り (ROI)", &format!("{:.1}%", res.roi_estimate)))
                        (metric("総投資額 (概算)", &format!("{}万円", res.total_investment)))
                        (metric("想定月商", &format!("{}万円", res.expected_revenue_monthly)))
                    }

                    div class="metrics" {
                        (metric("売出価格", &format!("{}万円", res.price_listing)))
                        (metric("リノベ費用", &format!("{}万円", res.renovation_estimate)))
                    }
                    @if !res.legal_risks.is_empty() {
                        div class="banner banner-warn" { "⚠️ 法的リスク: " (res.legal_risks) }
                    }
                    @if !res.features_summary.is_empty() {
                        p { "📝 " (res.features_summary) }
                    }
                    @if !res.pros.is_empty() {
                        p { strong { "👍 Pros: " } (res.pros) }
                    }
                    @if !res.cons.is_empty() {
                        p { strong { "👎 Cons: " } (res.cons) }
                    }

                    div class="result-box" {
                        h3 { "⚡️ 辛口アドバイス" }
                        p { (res.bitter_advice) }
                    }

                    div style="display: flex; gap: 10px; margin-top: 1rem;" {
                        form action="/scout/save" method="post" {
                            button type="submit" { "💾 この物件を台帳に保存" }
                        }
                        form action="/scout/reset" method="post" {
                            button type="submit" { "やり直す" }
                        }
                    }
                }
            }
        },
    )
}

fn precision_banner(session: &ScoutSession) -> Markup {
    html! {
        @match session.precision {
            Some(Precision::Exact) => {
                div class="banner banner-ok" {
                    (format!("📍 座標を取得しました: {:.5}, {:.5}",
                        session.map_center.lat, session.map_center.lon))
                }
            }
            Some(Precision::Town) => {
                div class="banner banner-warn" {
                    "⚠️ 番地が特定できなかったため、町名レベルのエリアを表示します。地図をタップして正確な位置を指定してください。"
                }
            }
            Some(Precision::CityFallback) => {
                div class="banner banner-err" {
                    "⚠️ 住所が特定できませんでした。京丹後市役所周辺を表示します。地図をタップして位置を指定してください。"
                }
            }
            None => {}
        }
    }
}

fn scout_map_script(session: &ScoutSession) -> Markup {
    let script = format!(
        r#"
var map = L.map('map').setView([{lat}, {lon}], 18);
var sat = L.tileLayer('https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/{{z}}/{{y}}/{{x}}', {{attribution: 'Esri'}});
var strategic = L.tileLayer('https://basemaps.cartocdn.com/light_all/{{z}}/{{x}}/{{y}}.png', {{attribution: 'CARTO'}});
var osm = L.tileLayer('https://tile.openstreetmap.org/{{z}}/{{x}}/{{y}}.png', {{attribution: 'OpenStreetMap'}});
sat.addTo(map);
L.control.layers({{'衛星写真 (Satellite)': sat, '戦略マップ (Strategic)': strategic, '標準マップ (Standard)': osm}}).addTo(map);
L.marker([{lat}, {lon}]).addTo(map).bindPopup('選択中の位置');
map.on('click', function (e) {{
    document.getElementById('pin-lat').value = e.latlng.lat;
    document.getElementById('pin-lon').value = e.latlng.lng;
    document.getElementById('pin-form').submit();
}});
"#,
        lat = session.map_center.lat,
        lon = session.map_center.lon,
    );
    html! { script { (PreEscaped(script)) } }
}
