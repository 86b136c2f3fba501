use crate::state::ChatExchange;
use crate::templates::desktop_layout;
use maud::{html, Markup};

pub fn advisor_page(chat: &[ChatExchange], notice: Option<&str>) -> Markup {
    desktop_layout(
        "経営会議 | Kyotango Property Platform",
        notice,
        html! {
            h2 { "💬 経営会議 (Consultant)" }
            div class="banner" {
                "あなたの物件ポートフォリオに基づき、AIコンサルタントがアドバイスします。"
            }

            @for exchange in chat {
                div class="chat-q" { "🙋 " (exchange.question) }
                div class="chat-a" { (exchange.answer) }
            }

            form action="/advisor/ask" method="post" style="margin-top: 1.5rem;" {
                textarea name="question" rows="3" style="width: 100%;"
                    placeholder="相談したいことを入力してください..." {}
                br;
                button type="submit" style="margin-top: 6px;" { "相談する" }
            }
        },
    )
}
