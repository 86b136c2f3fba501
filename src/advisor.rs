use std::sync::Arc;

use crate::appraisal::{AppraisalError, GenerativeBackend, ModelRequest};
use crate::domain::PropertyRecord;

const ADVISOR_PERSONA: &str = "あなたは京丹後で民泊事業を拡大する女性オーナーの専属コンサルタントです。

【ユーザーの現在の状況】
- 掃除担当：Aさん（網野エリア担当）、Bさん（丹後町エリア担当）
- 理念：数を追うより、地域の文化を守れる古民家を再生したい。
- 課題：これ以上エリアを広げると管理が回らなくなる恐れがある。";

const ADVISOR_INSTRUCTIONS: &str = "上記の情報を踏まえ、ユーザーの質問に対して具体的かつ論理的にアドバイスしてください。
特に、エリアごとの掃除担当の負荷や、ポートフォリオ全体のバランス（高利回り物件と文化財物件の比率など）を考慮してください。";

/// One-line-per-property digest fed to the consultant prompt.
pub fn portfolio_summary(records: &[PropertyRecord]) -> String {
    if records.is_empty() {
        return "物件データなし".to_string();
    }
    let mut summary = String::new();
    for record in records {
        let risks = if record.legal_risks.trim().is_empty() {
            "なし"
        } else {
            record.legal_risks.as_str()
        };
        summary.push_str(&format!(
            "- 【{}】{} (価格:{}万, 利回り:{}%, リスク:{})\n",
            record.status.label(),
            record.address,
            record.price,
            record.roi,
            risks,
        ));
    }
    summary
}

/// Portfolio-aware consultant chat. Each question is answered in a single
/// model call with the current ledger folded into the prompt, so there is
/// no conversation state to persist.
pub struct Advisor {
    backend: Arc<dyn GenerativeBackend>,
}

impl Advisor {
    pub fn new(backend: Arc<dyn GenerativeBackend>) -> Self {
        Advisor { backend }
    }

    pub fn ask(
        &self,
        portfolio: &[PropertyRecord],
        question: &str,
    ) -> Result<String, AppraisalError> {
        let prompt = format!(
            "{}\n\n【現在の物件ポートフォリオ】\n{}\n\n{}\n\nユーザーの質問: {}",
            ADVISOR_PERSONA,
            portfolio_summary(portfolio),
            ADVISOR_INSTRUCTIONS,
            question,
        );
        self.backend.generate(&ModelRequest::text_only(prompt))
    }
}
