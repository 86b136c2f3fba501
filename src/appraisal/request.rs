use crate::appraisal::{ModelRequest, RequestPart};
use crate::domain::appraisal::AppraisalResult;
use crate::evidence::EvidenceAttachment;

const ANALYST_PREAMBLE: &str = "あなたは不動産投資のプロフェッショナルです。\n以下の住所と資料から、京丹後市での古民家民泊事業としての投資価値を厳しく分析してください。";

const EVIDENCE_NOTE: &str = "【添付資料】\n(アップロードされた画像・音声メモ)";

const SCHEMA_INSTRUCTION: &str = r#"以下のJSON形式で結果を出力してください。数値は推測で構いませんが、厳しめに見積もってください。

{
  "price_listing": "売出価格（整数、単位：万円。不明なら0）",
  "renovation_estimate": "資料に基づく概算リノベ費用（整数、単位：万円。水回り交換なら+200万など厳しめに）",
  "total_investment": "物件価格 + リノベ費用（整数、単位：万円）",
  "expected_revenue_monthly": "エリアと物件スペックからの想定月商（整数、単位：万円）",
  "roi_estimate": "表面利回り（％、小数第1位まで。年商÷総投資額）",
  "legal_risks": "再建築不可、消防法適合の難易度、民泊新法/旅館業法の許可ハードルなど（文字列）",
  "grade": "総合判定(S/A/B/C)",
  "bitter_advice": "辛口アドバイス（文字列）",
  "pros": "買うべき理由（文字列）",
  "cons": "懸念点（文字列）",
  "features_summary": "物件の特徴要約（文字列）"
}"#;

/// Assembles the appraisal request: analyst preamble with the address,
/// one blob per substantial attachment in upload order, the previous
/// appraisal as update context when re-appraising, and the output-schema
/// instruction always closing the request.
pub fn build_appraisal_request(
    address: &str,
    evidence: &[EvidenceAttachment],
    prior: Option<&AppraisalResult>,
) -> ModelRequest {
    let mut parts = Vec::new();
    parts.push(RequestPart::Text(format!(
        "{ANALYST_PREAMBLE}\n\n【物件住所】\n{address}"
    )));

    let mut attached = 0;
    for item in evidence {
        if !item.is_substantial() {
            continue;
        }
        parts.push(RequestPart::Blob {
            media_type: item.media_type.essence_str().to_string(),
            bytes: item.bytes.clone(),
        });
        attached += 1;
    }

    let mut closing = String::new();
    if attached > 0 {
        closing.push_str(EVIDENCE_NOTE);
        closing.push_str("\n\n");
    }
    if let Some(prior) = prior {
        closing.push_str(&format!(
            "【現在の分析データ】\n{}\nこれをもとに、新しい情報で更新してください。\n\n",
            prior.to_json()
        ));
    }
    closing.push_str(SCHEMA_INSTRUCTION);
    parts.push(RequestPart::Text(closing));

    ModelRequest {
        parts,
        json_output: true,
    }
}
