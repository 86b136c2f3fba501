use crate::templates::components::notice_banner;
use maud::{html, Markup, PreEscaped, DOCTYPE};

// Japanese-modern palette: ecru paper, indigo ink, mincho type.
const STYLESHEET: &str = r#"
body {
    background-color: #F5F5DC;
    color: #1D263B;
    font-family: "Hiragino Mincho ProN", "Yu Mincho", serif;
    margin: 0;
}
h1, h2, h3, h4 { color: #1D263B; }
header {
    display: flex;
    align-items: center;
    justify-content: space-between;
    padding: 0.75rem 1.5rem;
    background-color: #E8E4D9;
    border-bottom: 1px solid #1D263B;
}
header h3 { margin: 0; }
nav ul { list-style: none; display: flex; gap: 1.5rem; margin: 0; padding: 0; }
nav a { color: #1D263B; text-decoration: none; font-weight: bold; }
nav a:hover { text-decoration: underline; }
main { max-width: 1080px; margin: 0 auto; padding: 1.5rem; }
button {
    background-color: #1D263B;
    color: #F5F5DC;
    border-radius: 4px;
    border: none;
    font-weight: bold;
    padding: 0.5rem 1.1rem;
    cursor: pointer;
    font-family: inherit;
}
button:hover { background-color: #2C3E50; color: #FFFFFF; }
input, textarea, select {
    background-color: #FFFFFF;
    color: #1D263B;
    border: 1px solid #1D263B;
    border-radius: 4px;
    padding: 0.45rem;
    font-family: inherit;
}
.result-box {
    border: 2px solid #1D263B;
    padding: 20px;
    margin-top: 20px;
    background-color: #FFFFFF;
    border-radius: 8px;
    box-shadow: 5px 5px 0px #1D263B;
}
.rating-s { color: #D4AF37; font-weight: bold; font-size: 2em; }
.rating-a { color: #1D263B; font-weight: bold; font-size: 2em; }
.rating-b { color: #555555; font-weight: bold; font-size: 2em; }
.rating-c { color: #888888; font-weight: bold; font-size: 2em; }
.metrics { display: flex; gap: 2.5rem; margin: 1rem 0; }
.metric-label { font-size: 0.9em; color: #555; }
.metric-value { font-size: 1.2em; font-weight: bold; color: #1D263B; }
.banner { border: 1px solid #1D263B; border-left-width: 6px; background-color: #FFFFFF;
          padding: 0.6rem 1rem; margin: 1rem 0; border-radius: 4px; }
.banner-ok { border-left-color: #2E7D32; }
.banner-warn { border-left-color: #D4AF37; }
.banner-err { border-left-color: #A4373A; }
table { border-collapse: collapse; width: 100%; background-color: #FFFFFF; }
th, td { border: 1px solid #1D263B; padding: 0.4rem 0.6rem; text-align: left; font-size: 0.95em; }
th { background-color: #E8E4D9; }
#map { height: 400px; border: 1px solid #1D263B; }
.album { display: grid; grid-template-columns: repeat(3, 1fr); gap: 0.75rem; }
.album img { width: 100%; border: 1px solid #1D263B; }
.chat-q, .chat-a { padding: 0.7rem 1rem; border-radius: 8px; margin: 0.6rem 0; }
.chat-q { background-color: #E8E4D9; border: 1px solid #1D263B; }
.chat-a { background-color: #FFFFFF; border: 1px solid #1D263B; white-space: pre-wrap; }
hr { border: none; border-top: 1px solid #1D263B; margin: 1.5rem 0; }
form.inline { display: inline; }
"#;

pub fn desktop_layout(title: &str, notice: Option<&str>, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="ja" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css";
                script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js" {}
                style { (PreEscaped(STYLESHEET)) }
            }
            body {
                header {
                    h3 { "🏠 Kyotango Property Platform" }
                    nav {
                        ul {
                            li { a href="/" { "目利き" } }
                            li { a href="/ledger" { "物件台帳" } }
                            li { a href="/advisor" { "経営会議" } }
                            li { a href="/export" { "Excel出力" } }
                        }
                    }
                }
                main {
                    (notice_banner(notice))
                    (content)
                }
            }
        }
    }
}
