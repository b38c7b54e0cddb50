//! 学生批量导入（CSV / XLSX）
//!
//! 表头不区分大小写。必需列 `admission_no`、`full_name`、`gender`；
//! 可选列 `class`（班级名称，可带班组）、`father_name`、`date_of_birth`、
//! `guardian_name`、`guardian_phone`、`address`、`admission_date`、`status`。
//! 任一行校验失败则整批不写入。

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use calamine::{Data, Reader, Xlsx};
use chrono::NaiveDate;
use futures_util::StreamExt;
use std::collections::{HashMap, HashSet};
use std::io::Cursor;
use tracing::info;

use super::StudentService;
use super::stats::class_label;
use crate::models::academic::Class;
use crate::models::realtime::ChangeAction;
use crate::models::students::{
    CreateStudentRequest, ImportRowError, StudentImportParams, StudentImportResponse,
};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{
    bad_request, error_response, error_response_with, realtime::publish_change, tenant_scope,
};

const MAX_IMPORT_ROWS: usize = 1000;
const REQUIRED_COLUMNS: [&str; 3] = ["admission_no", "full_name", "gender"];

/// 一行原始数据：小写列名 → 单元格文本
#[derive(Debug, Clone)]
pub(crate) struct RawRow {
    pub row: usize,
    pub cells: HashMap<String, String>,
}

impl RawRow {
    fn get(&self, column: &str) -> Option<&str> {
        self.cells
            .get(column)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }
}

pub async fn import_students(
    service: &StudentService,
    params: StudentImportParams,
    mut payload: Multipart,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let scope = tenant_scope(request)?;
    let dry_run = params.dry_run.unwrap_or(false);

    let (file_bytes, file_name) = match read_file_from_multipart(&mut payload).await {
        Ok(result) => result,
        Err(e) => return Ok(bad_request(ErrorCode::FileUploadFailed, e)),
    };

    let parsed = if file_name.to_lowercase().ends_with(".xlsx") {
        parse_xlsx(&file_bytes)
    } else {
        parse_csv(&file_bytes)
    };
    let rows = match parsed {
        Ok(rows) => rows,
        Err(e) => return Ok(bad_request(ErrorCode::StudentImportFailed, e)),
    };

    if rows.is_empty() {
        return Ok(bad_request(
            ErrorCode::StudentImportFailed,
            "The file contains no data rows",
        ));
    }
    if rows.len() > MAX_IMPORT_ROWS {
        return Ok(bad_request(
            ErrorCode::StudentImportFailed,
            format!("At most {MAX_IMPORT_ROWS} rows can be imported at once"),
        ));
    }

    let storage = service.get_storage(request)?;
    let classes = match storage.list_all_classes(&scope).await {
        Ok(classes) => classes,
        Err(e) => return Ok(error_response(&e)),
    };
    let existing: HashSet<String> = match storage.list_all_students(&scope, None).await {
        Ok(students) => students.into_iter().map(|s| s.admission_no).collect(),
        Err(e) => return Ok(error_response(&e)),
    };

    let total_rows = rows.len();
    let (valid, errors) = validate_rows(rows, &classes, &existing);

    if dry_run || !errors.is_empty() {
        return Ok(HttpResponse::Ok().json(ApiResponse::success(
            StudentImportResponse {
                total_rows,
                imported: 0,
                dry_run,
                errors,
            },
            if dry_run {
                "Import validated"
            } else {
                "Import aborted: some rows are invalid"
            },
        )));
    }

    match storage.import_students(&scope, valid).await {
        Ok(created) => {
            info!(
                "Imported {} students into school {}",
                created.len(),
                scope.school_id
            );
            for student in &created {
                publish_change(
                    scope.organization_id,
                    Some(scope.school_id),
                    "students",
                    ChangeAction::Insert,
                    student.id,
                );
            }
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                StudentImportResponse {
                    total_rows,
                    imported: created.len(),
                    dry_run,
                    errors,
                },
                "Students imported successfully",
            )))
        }
        Err(e) => Ok(error_response_with(&e, ErrorCode::StudentImportFailed)),
    }
}

/// 校验所有行，返回可写入的请求与逐行错误
pub(crate) fn validate_rows(
    rows: Vec<RawRow>,
    classes: &[Class],
    existing_admission_nos: &HashSet<String>,
) -> (Vec<CreateStudentRequest>, Vec<ImportRowError>) {
    let class_ids: HashMap<String, i64> = classes
        .iter()
        .flat_map(|c| {
            [
                (class_label(c).to_lowercase(), c.id),
                (c.name.to_lowercase(), c.id),
            ]
        })
        .collect();

    let mut seen = HashSet::new();
    let mut valid = Vec::new();
    let mut errors = Vec::new();

    for row in rows {
        match build_request(&row, &class_ids) {
            Ok(req) if existing_admission_nos.contains(&req.admission_no) => {
                errors.push(ImportRowError {
                    row: row.row,
                    message: format!("Admission number '{}' already exists", req.admission_no),
                });
            }
            Ok(req) if !seen.insert(req.admission_no.clone()) => {
                errors.push(ImportRowError {
                    row: row.row,
                    message: format!(
                        "Admission number '{}' is duplicated in the file",
                        req.admission_no
                    ),
                });
            }
            Ok(req) => valid.push(req),
            Err(message) => errors.push(ImportRowError {
                row: row.row,
                message,
            }),
        }
    }

    (valid, errors)
}

fn parse_date(row: &RawRow, column: &str) -> Result<Option<NaiveDate>, String> {
    row.get(column)
        .map(|v| {
            NaiveDate::parse_from_str(v, "%Y-%m-%d")
                .map_err(|_| format!("Invalid {column}: expected YYYY-MM-DD"))
        })
        .transpose()
}

fn build_request(
    row: &RawRow,
    class_ids: &HashMap<String, i64>,
) -> Result<CreateStudentRequest, String> {
    let admission_no = row
        .get("admission_no")
        .ok_or("Admission number is required")?
        .to_string();
    let full_name = row.get("full_name").ok_or("Full name is required")?.to_string();
    let gender = row
        .get("gender")
        .ok_or("Gender is required")?
        .to_lowercase()
        .parse()?;
    let status = row
        .get("status")
        .map(|v| v.to_lowercase().parse())
        .transpose()?;
    let class_id = match row.get("class") {
        Some(name) => Some(
            *class_ids
                .get(&name.to_lowercase())
                .ok_or_else(|| format!("Unknown class '{name}'"))?,
        ),
        None => None,
    };

    Ok(CreateStudentRequest {
        class_id,
        admission_no,
        full_name,
        father_name: row.get("father_name").map(str::to_string),
        gender,
        date_of_birth: parse_date(row, "date_of_birth")?,
        guardian_name: row.get("guardian_name").map(str::to_string),
        guardian_phone: row.get("guardian_phone").map(str::to_string),
        address: row.get("address").map(str::to_string),
        admission_date: parse_date(row, "admission_date")?,
        status,
    })
}

async fn read_file_from_multipart(payload: &mut Multipart) -> Result<(Vec<u8>, String), String> {
    let mut file_bytes = Vec::new();
    let mut file_name = String::new();

    while let Some(item) = payload.next().await {
        let mut field = item.map_err(|e| format!("Failed to read multipart field: {e}"))?;

        if field.name() == Some("file") {
            if let Some(content_disposition) = field.content_disposition() {
                file_name = content_disposition
                    .get_filename()
                    .unwrap_or("students.csv")
                    .to_string();
            }

            while let Some(chunk) = field.next().await {
                let data = chunk.map_err(|e| format!("Failed to read file data: {e}"))?;
                file_bytes.extend_from_slice(&data);
            }
        }
    }

    if file_bytes.is_empty() {
        return Err("No file field found".to_string());
    }

    Ok((file_bytes, file_name))
}

fn check_headers(headers: &[String]) -> Result<(), String> {
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(format!("Missing required column: {column}"));
        }
    }
    Ok(())
}

fn normalize_header(header: &str) -> String {
    header.trim().to_lowercase().replace([' ', '-'], "_")
}

pub(crate) fn parse_csv(data: &[u8]) -> Result<Vec<RawRow>, String> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(Cursor::new(data));

    let headers: Vec<String> = rdr
        .headers()
        .map_err(|e| format!("Failed to read header: {e}"))?
        .iter()
        .map(normalize_header)
        .collect();
    check_headers(&headers)?;

    let mut rows = Vec::new();
    for (index, result) in rdr.records().enumerate() {
        // 第 1 行是表头
        let row = index + 2;
        let record = result.map_err(|e| format!("Failed to parse row {row}: {e}"))?;
        if record.iter().all(|v| v.trim().is_empty()) {
            continue;
        }
        let cells = headers
            .iter()
            .cloned()
            .zip(record.iter().map(str::to_string))
            .collect();
        rows.push(RawRow { row, cells });
    }

    Ok(rows)
}

/// Excel 日期序列号转 `YYYY-MM-DD`
fn excel_serial_to_date(serial: f64) -> Option<String> {
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    let date = epoch.checked_add_signed(chrono::Duration::days(serial.trunc() as i64))?;
    Some(date.format("%Y-%m-%d").to_string())
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::DateTime(dt) => excel_serial_to_date(dt.as_f64()).unwrap_or_default(),
        // 学号等数字列在 Excel 中常被存为浮点数
        Data::Float(f) if f.fract() == 0.0 => format!("{}", *f as i64),
        other => other.to_string(),
    }
}

pub(crate) fn parse_xlsx(data: &[u8]) -> Result<Vec<RawRow>, String> {
    let mut workbook: Xlsx<_> =
        Xlsx::new(Cursor::new(data)).map_err(|e| format!("Failed to open XLSX: {e}"))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or("The workbook has no sheets")?;
    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| format!("Failed to read sheet: {e}"))?;

    let mut rows_iter = range.rows();
    let headers: Vec<String> = rows_iter
        .next()
        .ok_or("The file is empty")?
        .iter()
        .map(|cell| normalize_header(&cell.to_string()))
        .collect();
    check_headers(&headers)?;

    let mut rows = Vec::new();
    for (index, cells) in rows_iter.enumerate() {
        let row = index + 2;
        let texts: Vec<String> = cells.iter().map(cell_text).collect();
        if texts.iter().all(|v| v.trim().is_empty()) {
            continue;
        }
        let cells = headers.iter().cloned().zip(texts).collect();
        rows.push(RawRow { row, cells });
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::students::{Gender, StudentStatus};
    use crate::services::students::stats::tests::class;

    const CSV: &str = "Admission No,Full Name,Gender,Class,Date of Birth,Status\n\
        A-1,Ali Khan,male,Grade 5 A,2014-03-02,\n\
        A-2,Sara Noor,Female,Grade 6,,active\n\
        ,,,,,\n\
        A-3,Bad Date,male,,02/03/2014,\n\
        A-1,Dup,male,,,\n\
        A-4,Unknown Class,other,Grade 9,,\n\
        A-9,Existing,male,,,\n";

    #[test]
    fn test_parse_csv_normalizes_headers_and_skips_blank_rows() {
        let rows = parse_csv(CSV.as_bytes()).unwrap();
        assert_eq!(rows.len(), 6);
        assert_eq!(rows[0].row, 2);
        assert_eq!(rows[0].get("admission_no"), Some("A-1"));
        assert_eq!(rows[0].get("date_of_birth"), Some("2014-03-02"));
        assert_eq!(rows[0].get("status"), None);
        // 空行跳过，但行号保持与文件一致
        assert_eq!(rows[2].row, 5);
    }

    #[test]
    fn test_parse_csv_missing_column() {
        let err = parse_csv(b"admission_no,full_name\nA-1,Ali\n").unwrap_err();
        assert!(err.contains("gender"));
    }

    #[test]
    fn test_validate_rows() {
        let rows = parse_csv(CSV.as_bytes()).unwrap();
        let classes = vec![class(10, "Grade 5", Some("A")), class(11, "Grade 6", None)];
        let existing: HashSet<String> = ["A-9".to_string()].into_iter().collect();

        let (valid, errors) = validate_rows(rows, &classes, &existing);

        assert_eq!(valid.len(), 2);
        assert_eq!(valid[0].class_id, Some(10));
        assert_eq!(valid[0].gender, Gender::Male);
        assert_eq!(
            valid[0].date_of_birth,
            NaiveDate::from_ymd_opt(2014, 3, 2)
        );
        assert_eq!(valid[1].class_id, Some(11));
        assert_eq!(valid[1].gender, Gender::Female);
        assert_eq!(valid[1].status, Some(StudentStatus::Active));

        let error_rows: Vec<usize> = errors.iter().map(|e| e.row).collect();
        assert_eq!(error_rows, vec![5, 6, 7, 8]);
        assert!(errors[0].message.contains("date_of_birth"));
        assert!(errors[1].message.contains("duplicated"));
        assert!(errors[2].message.contains("Unknown class"));
        assert!(errors[3].message.contains("already exists"));
    }

    #[test]
    fn test_excel_serial_to_date() {
        assert_eq!(excel_serial_to_date(45292.0).as_deref(), Some("2024-01-01"));
        assert_eq!(cell_text(&Data::Float(1001.0)), "1001");
        assert_eq!(cell_text(&Data::String("A-7".into())), "A-7");
    }
}
