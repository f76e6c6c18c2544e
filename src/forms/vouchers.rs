use std::collections::HashSet;
use std::io::{Read, Seek};

use actix_multipart::form::MultipartForm;
use actix_multipart::form::tempfile::TempFile;
use actix_multipart::form::text::Text;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::voucher::NewVoucher;

/// Maximum upload size accepted for voucher imports, in bytes.
pub const MAX_IMPORT_SIZE: usize = 10 * 1024 * 1024;

/// File extensions the import screen accepts.
const ACCEPTED_EXTENSIONS: [&str; 4] = ["csv", "xlsx", "xls", "zip"];

pub type VoucherFormResult<T> = Result<T, VoucherFormError>;

/// Errors raised while processing voucher imports.
#[derive(Debug, Error)]
pub enum VoucherFormError {
    #[error("no voucher codes supplied")]
    Empty,
    #[error("file exceeds the 10 MB import limit")]
    FileTooLarge,
    #[error("unsupported file type; use .csv, .xlsx, .xls or .zip")]
    UnsupportedFileType,
    #[error("only CSV files can be parsed; convert the file to .csv first")]
    UnparsedFormat,
    #[error("duplicate code in import: {0}")]
    DuplicateCode(String),
    #[error("missing required column: {0}")]
    MissingColumn(String),
    #[error("row {0} has an empty code")]
    EmptyCode(usize),
    #[error("failed to read upload: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// A manually keyed voucher row.
#[derive(Debug, Clone, Deserialize)]
pub struct ManualVoucherEntry {
    pub code: String,
    pub digital_product_id: i32,
}

/// Multipart payload for the voucher import screen. Operators either
/// upload a file or key codes in by hand; when both are present the file
/// wins and the manual rows are ignored.
#[derive(Debug, MultipartForm)]
pub struct ImportVouchersForm {
    #[multipart(limit = "10MB")]
    pub file: Option<TempFile>,
    /// Stock item the codes belong to; required for file imports without a
    /// `digital_product_id` column. Posted as a raw string so the blank
    /// "from file" option does not fail parsing.
    pub digital_product_id: Option<Text<String>>,
    /// Purchase order the codes arrived with, if tracked.
    pub purchase_order_id: Option<Text<String>>,
    /// Manual rows as a JSON array of `{code, digital_product_id}`.
    pub manual: Option<Text<String>>,
}

fn parse_id(field: &Option<Text<String>>) -> Option<i32> {
    field
        .as_deref()
        .and_then(|raw| raw.trim().parse::<i32>().ok())
}

impl ImportVouchersForm {
    /// Resolve the import into insert payloads for a hub.
    pub fn into_new_vouchers(mut self, hub_id: i32) -> VoucherFormResult<Vec<NewVoucher>> {
        let purchase_order_id = parse_id(&self.purchase_order_id);

        // Browsers submit an empty file part when nothing is selected.
        if let Some(file) = self.file.take().filter(|file| file.size > 0) {
            let default_product_id = parse_id(&self.digital_product_id);
            return parse_voucher_file(file, hub_id, default_product_id, purchase_order_id);
        }

        let manual = self
            .manual
            .as_deref()
            .map(|raw| serde_json::from_str::<Vec<ManualVoucherEntry>>(raw))
            .transpose()
            .map_err(|_| VoucherFormError::Empty)?
            .unwrap_or_default();

        build_manual_vouchers(manual, hub_id, purchase_order_id)
    }
}

fn parse_voucher_file(
    mut file: TempFile,
    hub_id: i32,
    default_product_id: Option<i32>,
    purchase_order_id: Option<i32>,
) -> VoucherFormResult<Vec<NewVoucher>> {
    if file.size > MAX_IMPORT_SIZE {
        return Err(VoucherFormError::FileTooLarge);
    }

    let extension = file
        .file_name
        .as_deref()
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    if !ACCEPTED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(VoucherFormError::UnsupportedFileType);
    }
    // Spreadsheet and archive uploads pass the extension check so the
    // screen can accept them, but parsing currently covers CSV only.
    if extension != "csv" {
        return Err(VoucherFormError::UnparsedFormat);
    }

    // The persisted upload leaves the cursor at EOF.
    file.file.rewind()?;
    let mut raw = String::new();
    file.file.read_to_string(&mut raw)?;
    parse_vouchers_csv(&raw, hub_id, default_product_id, purchase_order_id)
}

/// Parse CSV content into voucher payloads.
///
/// Required column: `code`. Optional column: `digital_product_id`, falling
/// back to `default_product_id` when absent. Duplicate codes abort the
/// import.
pub fn parse_vouchers_csv(
    content: &str,
    hub_id: i32,
    default_product_id: Option<i32>,
    purchase_order_id: Option<i32>,
) -> VoucherFormResult<Vec<NewVoucher>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers = reader.headers()?.clone();
    let code_idx = headers
        .iter()
        .position(|header| header == "code")
        .ok_or_else(|| VoucherFormError::MissingColumn("code".to_string()))?;
    let product_idx = headers
        .iter()
        .position(|header| header == "digital_product_id");

    let mut entries = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record?;
        let code = record.get(code_idx).unwrap_or_default().to_string();
        if code.is_empty() {
            return Err(VoucherFormError::EmptyCode(row + 1));
        }
        let digital_product_id = product_idx
            .and_then(|i| record.get(i))
            .and_then(|raw| raw.parse::<i32>().ok())
            .or(default_product_id)
            .ok_or_else(|| {
                VoucherFormError::MissingColumn("digital_product_id".to_string())
            })?;
        entries.push(ManualVoucherEntry {
            code,
            digital_product_id,
        });
    }

    build_manual_vouchers(entries, hub_id, purchase_order_id)
}

/// Turn manual rows into insert payloads, rejecting duplicates and blanks.
pub fn build_manual_vouchers(
    entries: Vec<ManualVoucherEntry>,
    hub_id: i32,
    purchase_order_id: Option<i32>,
) -> VoucherFormResult<Vec<NewVoucher>> {
    if entries.is_empty() {
        return Err(VoucherFormError::Empty);
    }

    let mut seen = HashSet::new();
    let mut vouchers = Vec::with_capacity(entries.len());
    for (row, entry) in entries.into_iter().enumerate() {
        let code = entry.code.trim().to_string();
        if code.is_empty() {
            return Err(VoucherFormError::EmptyCode(row + 1));
        }
        if !seen.insert((entry.digital_product_id, code.clone())) {
            return Err(VoucherFormError::DuplicateCode(code));
        }
        let mut voucher = NewVoucher::new(hub_id, entry.digital_product_id, code);
        if let Some(order_id) = purchase_order_id {
            voucher = voucher.from_purchase_order(order_id);
        }
        vouchers.push(voucher);
    }

    Ok(vouchers)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn upload(file_name: &str, content: &str) -> TempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        // Leave the cursor at EOF, like a freshly persisted upload.
        file.write_all(content.as_bytes()).expect("write upload");
        TempFile {
            size: content.len(),
            file_name: Some(file_name.to_string()),
            content_type: None,
            file,
        }
    }

    fn entry(code: &str, product: i32) -> ManualVoucherEntry {
        ManualVoucherEntry {
            code: code.to_string(),
            digital_product_id: product,
        }
    }

    #[test]
    fn manual_rows_become_vouchers() {
        let vouchers = build_manual_vouchers(
            vec![entry("AAA-111", 5), entry("BBB-222", 5)],
            1,
            Some(9),
        )
        .expect("manual rows should convert");

        assert_eq!(vouchers.len(), 2);
        assert_eq!(vouchers[0].hub_id, 1);
        assert_eq!(vouchers[0].digital_product_id, 5);
        assert_eq!(vouchers[0].purchase_order_id, Some(9));
        assert_eq!(vouchers[1].code, "BBB-222");
    }

    #[test]
    fn duplicate_codes_abort_the_import() {
        let err = build_manual_vouchers(
            vec![entry("SAME", 5), entry("SAME", 5)],
            1,
            None,
        )
        .expect_err("duplicate should fail");

        assert!(matches!(err, VoucherFormError::DuplicateCode(code) if code == "SAME"));
    }

    #[test]
    fn same_code_for_different_products_is_allowed() {
        let vouchers = build_manual_vouchers(
            vec![entry("SHARED", 5), entry("SHARED", 6)],
            1,
            None,
        )
        .expect("codes are scoped per stock item");

        assert_eq!(vouchers.len(), 2);
    }

    #[test]
    fn empty_import_is_rejected() {
        assert!(matches!(
            build_manual_vouchers(Vec::new(), 1, None),
            Err(VoucherFormError::Empty)
        ));
    }

    #[test]
    fn csv_requires_code_column() {
        let err = parse_vouchers_csv("value\nabc\n", 1, Some(5), None)
            .expect_err("missing code column");

        assert!(matches!(err, VoucherFormError::MissingColumn(col) if col == "code"));
    }

    #[test]
    fn csv_rows_use_default_product_when_column_absent() {
        let vouchers = parse_vouchers_csv("code\nAAA\nBBB\n", 1, Some(5), None)
            .expect("csv should parse");

        assert_eq!(vouchers.len(), 2);
        assert!(vouchers.iter().all(|v| v.digital_product_id == 5));
    }

    #[test]
    fn csv_product_column_overrides_default() {
        let vouchers = parse_vouchers_csv(
            "code,digital_product_id\nAAA,8\nBBB,9\n",
            1,
            Some(5),
            None,
        )
        .expect("csv should parse");

        assert_eq!(vouchers[0].digital_product_id, 8);
        assert_eq!(vouchers[1].digital_product_id, 9);
    }

    #[test]
    fn csv_blank_code_is_rejected_with_row_number() {
        let err = parse_vouchers_csv("code\nAAA\n\"\"\n", 1, Some(5), None)
            .expect_err("blank code should fail");

        assert!(matches!(err, VoucherFormError::EmptyCode(2)));
    }

    #[test]
    fn uploaded_csv_file_is_parsed() {
        let file = upload("codes.csv", "code\nAAA\nBBB\n");

        let vouchers = parse_voucher_file(file, 1, Some(5), None).expect("upload parses");

        assert_eq!(vouchers.len(), 2);
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let file = upload("codes.txt", "code\nAAA\n");

        assert!(matches!(
            parse_voucher_file(file, 1, Some(5), None),
            Err(VoucherFormError::UnsupportedFileType)
        ));
    }

    #[test]
    fn accepted_spreadsheet_extension_is_not_parsed_yet() {
        let file = upload("codes.xlsx", "not a spreadsheet");

        assert!(matches!(
            parse_voucher_file(file, 1, Some(5), None),
            Err(VoucherFormError::UnparsedFormat)
        ));
    }
}
