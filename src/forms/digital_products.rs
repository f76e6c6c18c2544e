use std::collections::{HashMap, HashSet};
use std::io::{Read, Seek};

use actix_multipart::form::MultipartForm;
use actix_multipart::form::tempfile::TempFile;
use actix_multipart::form::text::Text;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::digital_product::{DigitalProductStatus, NewDigitalProduct};

/// Maximum upload size accepted for stock imports, in bytes.
pub const MAX_IMPORT_SIZE: usize = 10 * 1024 * 1024;

const NAME_MAX_LEN: usize = 255;
const SKU_MAX_LEN: usize = 100;

pub type DigitalProductFormResult<T> = Result<T, DigitalProductFormError>;

/// Errors raised while processing stock entry forms and imports.
#[derive(Debug, Error)]
pub enum DigitalProductFormError {
    #[error("batch is empty")]
    EmptyBatch,
    #[error("entry {0} is invalid: {1}")]
    InvalidEntry(String, String),
    #[error("file exceeds the 10 MB import limit")]
    FileTooLarge,
    #[error("unsupported file type; use .csv")]
    UnsupportedFileType,
    #[error("missing required column: {0}")]
    MissingColumn(String),
    #[error("failed to read upload: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// Generate a fresh client-side entry identifier.
fn fresh_entry_id() -> String {
    format!(
        "product-{}-{:06x}",
        chrono::Utc::now().timestamp_millis(),
        rand::random::<u32>() & 0xff_ffff
    )
}

/// One row of the bulk stock entry form. All money fields are kept as raw
/// strings until validation so partial operator input never panics.
#[derive(Debug, Clone, Default)]
pub struct ProductEntry {
    pub id: String,
    pub supplier_id: Option<i32>,
    pub name: String,
    pub sku: String,
    pub brand: String,
    pub description: String,
    pub tags: String,
    pub cost_price: String,
    pub face_value: String,
    pub selling_price: String,
    pub regions: String,
    pub metadata: String,
    pub currency: String,
}

impl ProductEntry {
    fn fresh() -> Self {
        Self {
            id: fresh_entry_id(),
            ..Self::default()
        }
    }
}

/// Partial update applied to a single entry row.
#[derive(Debug, Default, Clone)]
pub struct ProductEntryPatch {
    pub supplier_id: Option<Option<i32>>,
    pub name: Option<String>,
    pub sku: Option<String>,
    pub brand: Option<String>,
    pub description: Option<String>,
    pub tags: Option<String>,
    pub cost_price: Option<String>,
    pub face_value: Option<String>,
    pub selling_price: Option<String>,
    pub regions: Option<String>,
    pub metadata: Option<String>,
    pub currency: Option<String>,
}

/// In-memory state of the bulk stock entry screen: a list of entry rows
/// plus the set of expanded accordion panels.
#[derive(Debug, Clone)]
pub struct BulkProductForm {
    pub entries: Vec<ProductEntry>,
    /// Ids of the entries whose accordion panel is open.
    pub expanded: HashSet<String>,
    /// Validation errors keyed by `<entry id>.<field>`.
    pub errors: HashMap<String, String>,
}

impl Default for BulkProductForm {
    fn default() -> Self {
        Self::new()
    }
}

impl BulkProductForm {
    /// Start with a single blank entry, expanded.
    pub fn new() -> Self {
        let entry = ProductEntry::fresh();
        let mut expanded = HashSet::new();
        expanded.insert(entry.id.clone());
        Self {
            entries: vec![entry],
            expanded,
            errors: HashMap::new(),
        }
    }

    /// Append a blank entry and expand it. Returns the new entry id.
    pub fn add_product(&mut self) -> String {
        let entry = ProductEntry::fresh();
        let id = entry.id.clone();
        self.expanded.insert(id.clone());
        self.entries.push(entry);
        id
    }

    /// Remove an entry row. Unlike condition rows the batch may shrink to
    /// zero here; submitting an empty batch is rejected at the service
    /// layer instead.
    pub fn remove_product(&mut self, id: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        self.expanded.remove(id);
        self.errors.retain(|key, _| !key.starts_with(&format!("{id}.")));
        self.entries.len() < before
    }

    /// Toggle the accordion panel for an entry.
    pub fn toggle_accordion(&mut self, id: &str) {
        if !self.expanded.remove(id) {
            self.expanded.insert(id.to_string());
        }
    }

    /// Merge a patch into the matching entry row. Returns whether a row
    /// matched.
    pub fn update_form(&mut self, id: &str, patch: ProductEntryPatch) -> bool {
        let Some(entry) = self.entries.iter_mut().find(|entry| entry.id == id) else {
            return false;
        };

        if let Some(supplier_id) = patch.supplier_id {
            entry.supplier_id = supplier_id;
        }
        if let Some(name) = patch.name {
            entry.name = name;
        }
        if let Some(sku) = patch.sku {
            entry.sku = sku;
        }
        if let Some(brand) = patch.brand {
            entry.brand = brand;
        }
        if let Some(description) = patch.description {
            entry.description = description;
        }
        if let Some(tags) = patch.tags {
            entry.tags = tags;
        }
        if let Some(cost_price) = patch.cost_price {
            entry.cost_price = cost_price;
        }
        if let Some(face_value) = patch.face_value {
            entry.face_value = face_value;
        }
        if let Some(selling_price) = patch.selling_price {
            entry.selling_price = selling_price;
        }
        if let Some(regions) = patch.regions {
            entry.regions = regions;
        }
        if let Some(metadata) = patch.metadata {
            entry.metadata = metadata;
        }
        if let Some(currency) = patch.currency {
            entry.currency = currency;
        }

        true
    }

    /// Set the supplier on every entry in the batch, leaving all other
    /// fields untouched.
    pub fn update_all_suppliers(&mut self, supplier_id: i32) {
        for entry in &mut self.entries {
            entry.supplier_id = Some(supplier_id);
        }
    }

    /// Validate one entry, recording errors under `<id>.<field>` keys.
    /// Returns whether the entry passed.
    pub fn validate_entry(&mut self, id: &str) -> bool {
        let Some(entry) = self.entries.iter().find(|entry| entry.id == id).cloned() else {
            return false;
        };

        let prefix = format!("{id}.");
        self.errors.retain(|key, _| !key.starts_with(&prefix));

        let mut ok = true;
        let mut fail = |errors: &mut HashMap<String, String>, field: &str, message: &str| {
            errors.insert(format!("{id}.{field}"), message.to_string());
        };

        let name = entry.name.trim();
        if name.is_empty() {
            fail(&mut self.errors, "name", "Name is required");
            ok = false;
        } else if name.len() > NAME_MAX_LEN {
            fail(&mut self.errors, "name", "Name is too long");
            ok = false;
        }

        let sku = entry.sku.trim();
        if sku.is_empty() {
            fail(&mut self.errors, "sku", "SKU is required");
            ok = false;
        } else if sku.len() > SKU_MAX_LEN {
            fail(&mut self.errors, "sku", "SKU is too long");
            ok = false;
        }

        if entry.supplier_id.is_none() {
            fail(&mut self.errors, "supplier_id", "Choose a supplier");
            ok = false;
        }

        match parse_money(&entry.cost_price) {
            Some(cents) if cents >= 0 => {}
            _ => {
                fail(
                    &mut self.errors,
                    "cost_price",
                    "Cost price must be a non-negative number",
                );
                ok = false;
            }
        }

        for (field, raw) in [("face_value", &entry.face_value), ("selling_price", &entry.selling_price)] {
            if !raw.trim().is_empty() && parse_money(raw).filter(|cents| *cents >= 0).is_none() {
                fail(&mut self.errors, field, "Must be a non-negative number");
                ok = false;
            }
        }

        let metadata = entry.metadata.trim();
        if !metadata.is_empty() && serde_json::from_str::<serde_json::Value>(metadata).is_err() {
            fail(&mut self.errors, "metadata", "Metadata must be valid JSON");
            ok = false;
        }

        ok
    }

    /// Validate every entry; `false` when any entry fails or the batch is
    /// empty.
    pub fn validate_all(&mut self) -> bool {
        if self.entries.is_empty() {
            return false;
        }
        let ids: Vec<String> = self.entries.iter().map(|entry| entry.id.clone()).collect();
        let mut ok = true;
        for id in ids {
            ok &= self.validate_entry(&id);
        }
        ok
    }

    /// Validate and convert the batch into insert payloads.
    pub fn into_new_products(
        mut self,
        hub_id: i32,
    ) -> DigitalProductFormResult<Vec<NewDigitalProduct>> {
        if self.entries.is_empty() {
            return Err(DigitalProductFormError::EmptyBatch);
        }
        if !self.validate_all() {
            let (key, message) = self
                .errors
                .iter()
                .min_by(|a, b| a.0.cmp(b.0))
                .map(|(k, v)| (k.clone(), v.clone()))
                .unwrap_or_default();
            return Err(DigitalProductFormError::InvalidEntry(key, message));
        }

        let mut payloads = Vec::with_capacity(self.entries.len());
        for entry in self.entries {
            // validate_all already proved these parse
            let supplier_id = entry.supplier_id.unwrap_or_default();
            let cost_price_cents = parse_money(&entry.cost_price).unwrap_or_default();
            let face_value_cents = parse_money(&entry.face_value).unwrap_or(cost_price_cents);
            let selling_price_cents = parse_money(&entry.selling_price).unwrap_or(face_value_cents);
            let currency = if entry.currency.trim().is_empty() {
                "USD".to_string()
            } else {
                entry.currency.trim().to_uppercase()
            };

            let mut payload = NewDigitalProduct::new(
                hub_id,
                supplier_id,
                entry.name.trim(),
                entry.sku.trim(),
                cost_price_cents,
                currency,
            )
            .with_prices(face_value_cents, selling_price_cents)
            .with_tags(split_list(&entry.tags))
            .with_regions(split_list(&entry.regions))
            .with_status(DigitalProductStatus::Active);

            if !entry.brand.trim().is_empty() {
                payload = payload.with_brand(entry.brand.trim());
            }
            if !entry.description.trim().is_empty() {
                payload = payload.with_description(entry.description.trim());
            }
            if let Ok(metadata) = serde_json::from_str(entry.metadata.trim()) {
                payload = payload.with_metadata(metadata);
            }

            payloads.push(payload);
        }

        Ok(payloads)
    }
}

/// Parse an operator-entered decimal amount into cents. Rejects anything
/// that is not a plain non-negative number.
fn parse_money(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let value: f64 = trimmed.parse().ok()?;
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    Some((value * 100.0).round() as i64)
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

/// Wire payload posted by the bulk entry screen. Rows arrive as parallel
/// repeated keys, one slot per entry.
#[derive(Debug, Deserialize)]
pub struct SaveBulkProductsForm {
    #[serde(default)]
    pub entry_id: Vec<String>,
    #[serde(default)]
    pub supplier_id: Vec<String>,
    #[serde(default)]
    pub name: Vec<String>,
    #[serde(default)]
    pub sku: Vec<String>,
    #[serde(default)]
    pub brand: Vec<String>,
    #[serde(default)]
    pub description: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub cost_price: Vec<String>,
    #[serde(default)]
    pub face_value: Vec<String>,
    #[serde(default)]
    pub selling_price: Vec<String>,
    #[serde(default)]
    pub regions: Vec<String>,
    #[serde(default)]
    pub metadata: Vec<String>,
    #[serde(default)]
    pub currency: Vec<String>,
}

impl SaveBulkProductsForm {
    /// Assemble the posted rows into a batch form. Missing slots in the
    /// shorter vectors default to empty fields.
    pub fn into_form(self) -> BulkProductForm {
        let mut entries = Vec::with_capacity(self.entry_id.len());
        let slot = |values: &[String], index: usize| {
            values.get(index).cloned().unwrap_or_default()
        };

        for (index, id) in self.entry_id.iter().enumerate() {
            let id = if id.trim().is_empty() {
                fresh_entry_id()
            } else {
                id.clone()
            };
            entries.push(ProductEntry {
                id,
                supplier_id: self
                    .supplier_id
                    .get(index)
                    .and_then(|raw| raw.trim().parse::<i32>().ok()),
                name: slot(&self.name, index),
                sku: slot(&self.sku, index),
                brand: slot(&self.brand, index),
                description: slot(&self.description, index),
                tags: slot(&self.tags, index),
                cost_price: slot(&self.cost_price, index),
                face_value: slot(&self.face_value, index),
                selling_price: slot(&self.selling_price, index),
                regions: slot(&self.regions, index),
                metadata: slot(&self.metadata, index),
                currency: slot(&self.currency, index),
            });
        }

        BulkProductForm {
            entries,
            expanded: HashSet::new(),
            errors: HashMap::new(),
        }
    }
}

/// Multipart payload for the CSV stock import.
#[derive(Debug, MultipartForm)]
pub struct UploadProductsForm {
    #[multipart(limit = "10MB")]
    pub csv: TempFile,
    /// Supplier assigned to rows without a `supplier_id` column. Posted as
    /// a raw string so the "from file" blank option does not fail parsing.
    pub supplier_id: Option<Text<String>>,
}

impl UploadProductsForm {
    /// Parse the uploaded CSV into insert payloads for a hub.
    ///
    /// Required columns: `name`, `sku`, `cost_price`. Optional columns:
    /// `supplier_id`, `brand`, `description`, `tags`, `face_value`,
    /// `selling_price`, `regions`, `currency`. Rows that fail validation
    /// abort the whole import.
    pub fn parse(mut self, hub_id: i32) -> DigitalProductFormResult<Vec<NewDigitalProduct>> {
        let default_supplier_id = self
            .supplier_id
            .as_deref()
            .and_then(|raw| raw.trim().parse::<i32>().ok());
        if self.csv.size > MAX_IMPORT_SIZE {
            return Err(DigitalProductFormError::FileTooLarge);
        }
        let is_csv = self
            .csv
            .file_name
            .as_deref()
            .map(|name| name.to_ascii_lowercase().ends_with(".csv"))
            .unwrap_or(false);
        if !is_csv {
            return Err(DigitalProductFormError::UnsupportedFileType);
        }

        // The persisted upload leaves the cursor at EOF.
        self.csv.file.rewind()?;
        let mut raw = String::new();
        self.csv.file.read_to_string(&mut raw)?;
        parse_products_csv(&raw, hub_id, default_supplier_id)
    }
}

/// Parse CSV content into insert payloads. Split out of the multipart
/// wrapper so tests can exercise it without a temp file.
pub fn parse_products_csv(
    content: &str,
    hub_id: i32,
    default_supplier_id: Option<i32>,
) -> DigitalProductFormResult<Vec<NewDigitalProduct>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers = reader.headers()?.clone();
    let column = |name: &str| headers.iter().position(|header| header == name);

    let name_idx = column("name").ok_or_else(|| {
        DigitalProductFormError::MissingColumn("name".to_string())
    })?;
    let sku_idx = column("sku").ok_or_else(|| {
        DigitalProductFormError::MissingColumn("sku".to_string())
    })?;
    let cost_idx = column("cost_price").ok_or_else(|| {
        DigitalProductFormError::MissingColumn("cost_price".to_string())
    })?;

    let supplier_idx = column("supplier_id");
    let brand_idx = column("brand");
    let description_idx = column("description");
    let tags_idx = column("tags");
    let face_idx = column("face_value");
    let selling_idx = column("selling_price");
    let regions_idx = column("regions");
    let currency_idx = column("currency");

    let mut form = BulkProductForm {
        entries: Vec::new(),
        expanded: HashSet::new(),
        errors: HashMap::new(),
    };

    for (index, record) in reader.records().enumerate() {
        let record = record?;
        let cell = |index: Option<usize>| {
            index
                .and_then(|i| record.get(i))
                .unwrap_or_default()
                .to_string()
        };

        form.entries.push(ProductEntry {
            // Entries are keyed by file row so validation errors point the
            // operator back at the CSV; row 1 is the header.
            id: format!("row-{}", index + 2),
            supplier_id: cell(supplier_idx)
                .trim()
                .parse::<i32>()
                .ok()
                .or(default_supplier_id),
            name: cell(Some(name_idx)),
            sku: cell(Some(sku_idx)),
            brand: cell(brand_idx),
            description: cell(description_idx),
            tags: cell(tags_idx),
            cost_price: cell(Some(cost_idx)),
            face_value: cell(face_idx),
            selling_price: cell(selling_idx),
            regions: cell(regions_idx),
            metadata: String::new(),
            currency: cell(currency_idx),
        });
    }

    form.into_new_products(hub_id)
}
