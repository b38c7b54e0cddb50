//! 欠费名单导出

use actix_web::HttpResponse;
use chrono::Utc;
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use tracing::error;

use crate::models::fees::reports::DefaulterRow;
use crate::models::{ApiResponse, ErrorCode};

const HEADERS: [&str; 11] = [
    "Admission No",
    "Student",
    "Class",
    "Guardian Phone",
    "Fee",
    "Assigned",
    "Paid",
    "Remaining",
    "Due Date",
    "Status",
    "Assignment ID",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Xlsx,
    Csv,
}

impl ExportFormat {
    /// 缺省为 xlsx
    pub fn parse(value: Option<&str>) -> Result<Self, String> {
        match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            None | Some("") | Some("xlsx") => Ok(Self::Xlsx),
            Some("csv") => Ok(Self::Csv),
            Some(other) => Err(format!("Unsupported export format: {other}")),
        }
    }

    fn content_type(&self) -> &'static str {
        match self {
            Self::Xlsx => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            Self::Csv => "text/csv; charset=utf-8",
        }
    }

    fn extension(&self) -> &'static str {
        match self {
            Self::Xlsx => "xlsx",
            Self::Csv => "csv",
        }
    }
}

fn row_values(row: &DefaulterRow) -> [String; 11] {
    [
        row.admission_no.clone(),
        row.student_name.clone(),
        row.class_name.clone().unwrap_or_default(),
        row.guardian_phone.clone().unwrap_or_default(),
        row.structure_name.clone(),
        format!("{:.2}", row.assigned_amount),
        format!("{:.2}", row.paid_amount),
        format!("{:.2}", row.remaining_amount),
        row.due_date.to_string(),
        row.status.to_string(),
        row.fee_assignment_id.to_string(),
    ]
}

pub(crate) fn render_csv(rows: &[DefaulterRow]) -> Result<Vec<u8>, String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(HEADERS).map_err(|e| e.to_string())?;
    for row in rows {
        writer
            .write_record(row_values(row))
            .map_err(|e| e.to_string())?;
    }
    writer.into_inner().map_err(|e| e.to_string())
}

pub(crate) fn render_xlsx(rows: &[DefaulterRow]) -> Result<Vec<u8>, String> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    let sheet = workbook
        .add_worksheet()
        .set_name("Defaulters")
        .map_err(|e| e.to_string())?;
    write_defaulters_sheet(sheet, &header_format, rows)?;

    workbook.save_to_buffer().map_err(|e| e.to_string())
}

fn write_defaulters_sheet(
    sheet: &mut Worksheet,
    header_format: &Format,
    rows: &[DefaulterRow],
) -> Result<(), String> {
    for (col, header) in HEADERS.iter().enumerate() {
        sheet
            .write_string_with_format(0, col as u16, *header, header_format)
            .map_err(|e| e.to_string())?;
    }

    for (i, row) in rows.iter().enumerate() {
        let r = (i + 1) as u32;
        sheet.write_string(r, 0, &row.admission_no).ok();
        sheet.write_string(r, 1, &row.student_name).ok();
        sheet
            .write_string(r, 2, row.class_name.as_deref().unwrap_or("-"))
            .ok();
        sheet
            .write_string(r, 3, row.guardian_phone.as_deref().unwrap_or("-"))
            .ok();
        sheet.write_string(r, 4, &row.structure_name).ok();
        // 金额写成数字，方便在表格里求和
        sheet.write_number(r, 5, row.assigned_amount).ok();
        sheet.write_number(r, 6, row.paid_amount).ok();
        sheet.write_number(r, 7, row.remaining_amount).ok();
        sheet.write_string(r, 8, row.due_date.to_string()).ok();
        sheet.write_string(r, 9, row.status.as_str()).ok();
        sheet
            .write_number(r, 10, row.fee_assignment_id as f64)
            .ok();
    }

    sheet.set_column_width(0, 14).ok();
    sheet.set_column_width(1, 24).ok();
    sheet.set_column_width(2, 14).ok();
    sheet.set_column_width(3, 16).ok();
    sheet.set_column_width(4, 20).ok();

    Ok(())
}

/// 生成下载响应；渲染失败时只记录日志
pub(crate) fn attachment(format: ExportFormat, rows: &[DefaulterRow]) -> HttpResponse {
    let rendered = match format {
        ExportFormat::Xlsx => render_xlsx(rows),
        ExportFormat::Csv => render_csv(rows),
    };

    match rendered {
        Ok(buffer) => {
            let timestamp = Utc::now().format("%Y%m%d_%H%M%S");
            let filename = format!("fee_defaulters_{timestamp}.{}", format.extension());
            HttpResponse::Ok()
                .content_type(format.content_type())
                .insert_header((
                    "Content-Disposition",
                    format!("attachment; filename=\"{filename}\""),
                ))
                .body(buffer)
        }
        Err(e) => {
            error!("生成欠费名单导出失败: {}", e);
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::ExportFailed,
                "Failed to generate export",
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fees::reports::defaulters::defaulters_report;
    use crate::services::fees::reports::tests::sample_data;

    #[test]
    fn test_parse_format() {
        assert_eq!(ExportFormat::parse(None), Ok(ExportFormat::Xlsx));
        assert_eq!(ExportFormat::parse(Some("CSV")), Ok(ExportFormat::Csv));
        assert!(ExportFormat::parse(Some("pdf")).is_err());
    }

    #[test]
    fn test_render_csv() {
        let report = defaulters_report(&sample_data(), None);
        let bytes = render_csv(&report.defaulters).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("Admission No,Student,Class"));
        assert!(lines[1].starts_with("ADM-2,Student 2,Grade 5 A,"));
        assert!(lines[1].contains(",800.00,"));
    }

    #[test]
    fn test_render_xlsx() {
        let report = defaulters_report(&sample_data(), None);
        let bytes = render_xlsx(&report.defaulters).unwrap();
        // xlsx 是 zip 包
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn test_attachment_headers() {
        let resp = attachment(ExportFormat::Csv, &[]);
        assert_eq!(resp.status(), actix_web::http::StatusCode::OK);
        let disposition = resp
            .headers()
            .get("Content-Disposition")
            .unwrap()
            .to_str()
            .unwrap();
        assert!(disposition.ends_with(".csv\""));
    }
}
