use crate::domain::PropertyRecord;
use crate::errors::ServerError;
use crate::responses::{xlsx_response, ResultResp};
use rust_xlsxwriter::Workbook;

pub fn export_properties_xlsx(properties: &[PropertyRecord], filename: &str) -> ResultResp {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    let headers = [
        "ID",
        "ステータス",
        "タイトル",
        "住所",
        "価格(万円)",
        "リノベ費用(万円)",
        "利回り(%)",
        "判定",
        "緯度",
        "経度",
        "法的リスク",
        "登録日",
    ];
    for (col, header) in headers.iter().enumerate() {
        worksheet
            .write_string(0, col as u16, *header)
            .map_err(|e| ServerError::XlsxError(format!("Failed to write header: {}", e)))?;
    }

    for (i, prop) in properties.iter().enumerate() {
        let r = (i + 1) as u32;
        worksheet.write_number(r, 0, prop.id as f64)
            .map_err(|e| ServerError::XlsxError(format!("id: {}", e)))?;
        worksheet.write_string(r, 1, prop.status.label())
            .map_err(|e| ServerError::XlsxError(format!("status: {}", e)))?;
        worksheet.write_string(r, 2, &prop.title)
            .map_err(|e| ServerError::XlsxError(format!("title: {}", e)))?;
        worksheet.write_string(r, 3, &prop.address)
            .map_err(|e| ServerError::XlsxError(format!("address: {}", e)))?;
        worksheet.write_number(r, 4, prop.price as f64)
            .map_err(|e| ServerError::XlsxError(format!("price: {}", e)))?;
        worksheet.write_number(r, 5, prop.renovation_cost as f64)
            .map_err(|e| ServerError::XlsxError(format!("renovation_cost: {}", e)))?;
        worksheet.write_number(r, 6, prop.roi)
            .map_err(|e| ServerError::XlsxError(format!("roi: {}", e)))?;
        worksheet.write_string(r, 7, &prop.rating)
            .map_err(|e| ServerError::XlsxError(format!("rating: {}", e)))?;
        // Unmapped properties keep blank coordinate cells.
        if let Some(lat) = prop.latitude {
            worksheet.write_number(r, 8, lat)
                .map_err(|e| ServerError::XlsxError(format!("latitude: {}", e)))?;
        }
        if let Some(lon) = prop.longitude {
            worksheet.write_number(r, 9, lon)
                .map_err(|e| ServerError::XlsxError(format!("longitude: {}", e)))?;
        }
        worksheet.write_string(r, 10, &prop.legal_risks)
            .map_err(|e| ServerError::XlsxError(format!("legal_risks: {}", e)))?;
        worksheet.write_string(r, 11, prop.created_at.format("%Y-%m-%d %H:%M").to_string())
            .map_err(|e| ServerError::XlsxError(format!("created_at: {}", e)))?;
    }

    let buffer = workbook
        .save_to_buffer()
        .map_err(|e| ServerError::XlsxError(format!("Failed to save workbook: {}", e)))?;

    xlsx_response(buffer, filename)
}
