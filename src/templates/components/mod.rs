use maud::{html, Markup, PreEscaped};

pub mod error;

pub use error::html_error_response;

/// Raw-body uploader shared by the scout and detail pages. The file name
/// travels in the query string and the payload is the request body, so the
/// server never has to parse multipart forms.
pub fn upload_script() -> Markup {
    html! {
        script {
            (PreEscaped(r#"
function uploadEvidence(inputId, url) {
    var input = document.getElementById(inputId);
    if (!input.files.length) { alert('ファイルを選択してください'); return; }
    var uploads = Array.from(input.files).map(function (file) {
        return fetch(url + '?name=' + encodeURIComponent(file.name), {
            method: 'POST',
            headers: {'Content-Type': file.type || 'application/octet-stream'},
            body: file
        });
    });
    Promise.all(uploads).then(function () { location.reload(); });
}
"#))
        }
    }
}

/// Flash message carried across a redirect in the `notice` query param.
pub fn notice_banner(notice: Option<&str>) -> Markup {
    html! {
        @if let Some(text) = notice {
            div class="banner banner-ok" { (text) }
        }
    }
}

pub fn grade_badge(rating: &str) -> Markup {
    let class = match rating {
        "S" => "rating-s",
        "A" => "rating-a",
        "C" => "rating-c",
        _ => "rating-b",
    };
    html! {
        div class=(class) {
            @if rating.is_empty() { "-" } @else { (rating) }
        }
    }
}

pub fn metric(label: &str, value: &str) -> Markup {
    html! {
        div class="metric" {
            div class="metric-label" { (label) }
            div class="metric-value" { (value) }
        }
    }
}
