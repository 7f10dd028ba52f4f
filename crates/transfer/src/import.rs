//! Tabular import.
//!
//! Rows are independent: each one either creates an entity, updates one,
//! leaves one unchanged, or is recorded as failed. A failed row never stops
//! the batch; only infrastructure failures (unreadable input, store errors)
//! abort the call.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use shopforge_core::{Entity, FieldDef, FieldValue, Record};
use shopforge_infra::{EntityStore, TransferSettings};

use crate::error::TransferError;
use crate::mapping::{ColumnMapping, SearchCriteria};
use crate::profile::TransferProfile;
use crate::table;

/// One parsed record: column label → cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRow {
    /// 1-based line in the source (the header is line 1).
    pub line: u64,
    pub cells: BTreeMap<String, String>,
}

impl ImportRow {
    /// Decode a raw record against the header.
    ///
    /// Cells that are not valid UTF-8 are kept lossily; their labels are
    /// returned alongside so the caller can reject the row if it needs them.
    fn decode(
        headers: &csv::StringRecord,
        record: &csv::ByteRecord,
        line: u64,
    ) -> (Self, Vec<String>) {
        let mut cells = BTreeMap::new();
        let mut undecodable = Vec::new();
        for (label, raw) in headers.iter().zip(record.iter()) {
            if cells.contains_key(label) {
                continue;
            }
            let value = match std::str::from_utf8(raw) {
                Ok(value) => value.to_string(),
                Err(_) => {
                    undecodable.push(label.to_string());
                    String::from_utf8_lossy(raw).into_owned()
                }
            };
            cells.insert(label.to_string(), value);
        }
        (Self { line, cells }, undecodable)
    }

    pub fn get(&self, label: &str) -> Option<&str> {
        self.cells.get(label).map(String::as_str)
    }
}

/// Why a row was not applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// No entity matches the key and new entities are not allowed.
    NotFound,
    /// The row has no cell for a key field.
    MissingKey { field: String },
    /// A cell could not be coerced to, or was rejected by, its field.
    TypeMismatch { field: String, detail: String },
    /// A new entity would overwrite an existing one with the same identifier.
    DuplicateId,
}

impl FailureReason {
    pub fn code(&self) -> &'static str {
        match self {
            FailureReason::NotFound => "NOT_FOUND",
            FailureReason::MissingKey { .. } => "MISSING_KEY",
            FailureReason::TypeMismatch { .. } => "TYPE_MISMATCH",
            FailureReason::DuplicateId => "DUPLICATE_ID",
        }
    }
}

impl core::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            FailureReason::NotFound => write!(f, "{}: no entity matches the key", self.code()),
            FailureReason::MissingKey { field } => {
                write!(f, "{}: no value for key field '{field}'", self.code())
            }
            FailureReason::TypeMismatch { field, detail } => {
                write!(f, "{}: field '{field}': {detail}", self.code())
            }
            FailureReason::DuplicateId => {
                write!(f, "{}: identifier already belongs to another entity", self.code())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowFailure {
    pub row: ImportRow,
    pub reason: FailureReason,
}

/// Result of an import: counts plus every failed row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportOutcome {
    pub created: usize,
    pub updated: usize,
    /// Rows matching an entity that already held the row's values.
    pub unchanged: usize,
    pub failed: Vec<RowFailure>,
}

impl ImportOutcome {
    pub fn processed(&self) -> usize {
        self.created + self.updated + self.unchanged + self.failed.len()
    }
}

enum Applied {
    Created,
    Updated,
    Unchanged,
    Failed(FailureReason),
}

/// Mapped field resolved against the entity type.
struct MappedField<'a> {
    def: &'static FieldDef,
    label: &'a str,
    key: bool,
}

impl MappedField<'_> {
    fn coerce(&self, raw: &str) -> Result<FieldValue, FailureReason> {
        self.def
            .coerce(raw)
            .map_err(|e| FailureReason::TypeMismatch {
                field: self.def.name.to_string(),
                detail: e.to_string(),
            })
    }
}

fn resolve_fields<'a, R: Record>(
    search_criteria: &SearchCriteria,
    import_columns: &'a ColumnMapping,
) -> Result<Vec<MappedField<'a>>, TransferError> {
    if search_criteria.is_empty() {
        return Err(TransferError::config("search criteria must name at least one field"));
    }
    if let Some(unmapped) = search_criteria
        .iter()
        .find(|f| !import_columns.contains_field(f))
    {
        return Err(TransferError::config(format!(
            "search field '{unmapped}' has no import column"
        )));
    }

    import_columns
        .iter()
        .map(|column| {
            let def = R::field(&column.field).ok_or_else(|| {
                TransferError::config(format!(
                    "field '{}' is not imported by this entity",
                    column.field
                ))
            })?;
            Ok(MappedField {
                def,
                label: &column.label,
                key: search_criteria.contains(&column.field),
            })
        })
        .collect()
}

fn apply_row<S>(
    store: &S,
    row: &ImportRow,
    fields: &[MappedField<'_>],
    add_new: bool,
) -> Result<Applied, TransferError>
where
    S: EntityStore,
    S::Entity: Record,
{
    let keys: Vec<&MappedField<'_>> = fields.iter().filter(|f| f.key).collect();

    let mut key_cells = Vec::with_capacity(keys.len());
    for field in &keys {
        match row.get(field.label) {
            Some(raw) => key_cells.push((*field, raw)),
            None => {
                return Ok(Applied::Failed(FailureReason::MissingKey {
                    field: field.def.name.to_string(),
                }));
            }
        }
    }

    let mut key_values = Vec::with_capacity(key_cells.len());
    for (field, raw) in key_cells {
        match field.coerce(raw) {
            Ok(value) => key_values.push((field.def.name, value)),
            Err(reason) => return Ok(Applied::Failed(reason)),
        }
    }

    let matches_key = |entity: &S::Entity| {
        key_values
            .iter()
            .all(|(name, value)| entity.get(name).is_ok_and(|v| v == *value))
    };

    match store.find(&matches_key)? {
        Some(existing) => update(store, row, fields, existing),
        None if add_new => create(store, row, fields),
        None => Ok(Applied::Failed(FailureReason::NotFound)),
    }
}

/// Coerce every mapped field the row has a cell for.
fn coerce_present<'f>(
    row: &ImportRow,
    fields: impl Iterator<Item = &'f MappedField<'f>>,
) -> Result<Vec<(&'static str, FieldValue)>, FailureReason> {
    fields
        .filter_map(|field| {
            row.get(field.label)
                .map(|raw| field.coerce(raw).map(|v| (field.def.name, v)))
        })
        .collect()
}

fn rejected(field: &str, detail: impl ToString) -> Applied {
    Applied::Failed(FailureReason::TypeMismatch {
        field: field.to_string(),
        detail: detail.to_string(),
    })
}

fn update<S>(
    store: &S,
    row: &ImportRow,
    fields: &[MappedField<'_>],
    existing: S::Entity,
) -> Result<Applied, TransferError>
where
    S: EntityStore,
    S::Entity: Record,
{
    let values = match coerce_present(row, fields.iter().filter(|f| !f.key)) {
        Ok(values) => values,
        Err(reason) => return Ok(Applied::Failed(reason)),
    };

    let mut entity = existing.clone();
    let mut changed = false;
    for (name, value) in values {
        if entity.get(name)? == value {
            continue;
        }
        if let Err(e) = entity.set(name, value) {
            return Ok(rejected(name, e));
        }
        changed = true;
    }

    if !changed {
        return Ok(Applied::Unchanged);
    }
    if entity.id() != existing.id() {
        return Ok(rejected("id", "identifier of an existing entity cannot change"));
    }

    store.save(entity)?;
    Ok(Applied::Updated)
}

fn create<S>(
    store: &S,
    row: &ImportRow,
    fields: &[MappedField<'_>],
) -> Result<Applied, TransferError>
where
    S: EntityStore,
    S::Entity: Record,
{
    let values = match coerce_present(row, fields.iter()) {
        Ok(values) => values,
        Err(reason) => return Ok(Applied::Failed(reason)),
    };

    let mut entity = <S::Entity as Record>::blank();
    for (name, value) in values {
        if let Err(e) = entity.set(name, value) {
            return Ok(rejected(name, e));
        }
    }

    if store.get(entity.id())?.is_some() {
        return Ok(Applied::Failed(FailureReason::DuplicateId));
    }

    store.save(entity)?;
    Ok(Applied::Created)
}

/// Import every row of `source` into `store`.
///
/// Each row is matched to an existing entity by the values of the
/// `search_criteria` fields (composite equality). Matches get their non-key
/// mapped fields overwritten; unmatched rows create an entity when `add_new`
/// is set and fail with `NOT_FOUND` otherwise. Mapped columns absent from a
/// row leave the field untouched.
pub fn import_table<S, Rd>(
    source: &mut csv::Reader<Rd>,
    store: &S,
    add_new: bool,
    search_criteria: &SearchCriteria,
    import_columns: &ColumnMapping,
) -> Result<ImportOutcome, TransferError>
where
    S: EntityStore,
    S::Entity: Record,
    Rd: Read,
{
    let fields = resolve_fields::<S::Entity>(search_criteria, import_columns)?;
    let headers = source.headers()?.clone();

    let mut outcome = ImportOutcome::default();
    for (idx, record) in source.byte_records().enumerate() {
        let record = record?;
        let line = record
            .position()
            .map(|p| p.line())
            .unwrap_or(idx as u64 + 2);
        let (row, undecodable) = ImportRow::decode(&headers, &record, line);

        let applied = match fields
            .iter()
            .find(|f| undecodable.iter().any(|label| label == f.label))
        {
            Some(field) => rejected(field.def.name, "cell is not valid UTF-8"),
            None => apply_row(store, &row, &fields, add_new)?,
        };

        match applied {
            Applied::Created => outcome.created += 1,
            Applied::Updated => outcome.updated += 1,
            Applied::Unchanged => outcome.unchanged += 1,
            Applied::Failed(reason) => {
                tracing::debug!(line = row.line, reason = %reason, "import row failed");
                outcome.failed.push(RowFailure { row, reason });
            }
        }
    }

    tracing::info!(
        rows = outcome.processed(),
        created = outcome.created,
        updated = outcome.updated,
        unchanged = outcome.unchanged,
        failed = outcome.failed.len(),
        "import finished"
    );
    Ok(outcome)
}

/// Import a file using a transfer profile.
pub fn import_from_path<S>(
    path: impl AsRef<Path>,
    store: &S,
    profile: &TransferProfile,
    settings: &TransferSettings,
) -> Result<ImportOutcome, TransferError>
where
    S: EntityStore,
    S::Entity: Record,
{
    let file = File::open(path.as_ref())?;
    let mut source = table::reader(file, settings);
    import_table(
        &mut source,
        store,
        profile.add_new(settings),
        &profile.search_criteria,
        &profile.columns,
    )
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use shopforge_core::ProductId;
    use shopforge_infra::{InMemoryEntityStore, StoreError};
    use shopforge_products::Product;

    /// Product store that counts writes.
    #[derive(Default)]
    struct CountingStore {
        inner: InMemoryEntityStore<Product>,
        saves: AtomicUsize,
    }

    impl CountingStore {
        fn with(products: impl IntoIterator<Item = Product>) -> Self {
            Self {
                inner: InMemoryEntityStore::with_entities(products),
                saves: AtomicUsize::new(0),
            }
        }

        fn saves(&self) -> usize {
            self.saves.load(Ordering::SeqCst)
        }

        fn by_sku(&self, sku: &str) -> Option<Product> {
            self.inner.find(&|p: &Product| p.sku() == sku).unwrap()
        }
    }

    impl EntityStore for CountingStore {
        type Entity = Product;

        fn get(&self, id: &ProductId) -> Result<Option<Product>, StoreError> {
            self.inner.get(id)
        }

        fn find(&self, predicate: &dyn Fn(&Product) -> bool) -> Result<Option<Product>, StoreError> {
            self.inner.find(predicate)
        }

        fn filter(&self, predicate: &dyn Fn(&Product) -> bool) -> Result<Vec<Product>, StoreError> {
            self.inner.filter(predicate)
        }

        fn list(&self) -> Result<Vec<Product>, StoreError> {
            self.inner.list()
        }

        fn save(&self, entity: Product) -> Result<(), StoreError> {
            self.saves.fetch_add(1, Ordering::SeqCst);
            self.inner.save(entity)
        }

        fn delete(&self, id: &ProductId) -> Result<bool, StoreError> {
            self.inner.delete(id)
        }

        fn count(&self) -> Result<usize, StoreError> {
            self.inner.count()
        }
    }

    /// Store whose every call fails.
    struct DownStore;

    impl EntityStore for DownStore {
        type Entity = Product;

        fn get(&self, _: &ProductId) -> Result<Option<Product>, StoreError> {
            Err(StoreError::Unavailable("down".into()))
        }

        fn find(&self, _: &dyn Fn(&Product) -> bool) -> Result<Option<Product>, StoreError> {
            Err(StoreError::Unavailable("down".into()))
        }

        fn filter(&self, _: &dyn Fn(&Product) -> bool) -> Result<Vec<Product>, StoreError> {
            Err(StoreError::Unavailable("down".into()))
        }

        fn list(&self) -> Result<Vec<Product>, StoreError> {
            Err(StoreError::Unavailable("down".into()))
        }

        fn save(&self, _: Product) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("down".into()))
        }

        fn delete(&self, _: &ProductId) -> Result<bool, StoreError> {
            Err(StoreError::Unavailable("down".into()))
        }

        fn count(&self) -> Result<usize, StoreError> {
            Err(StoreError::Unavailable("down".into()))
        }
    }

    fn columns() -> ColumnMapping {
        ColumnMapping::new()
            .with("sku", "Code")
            .with("name", "Name")
            .with("price", "Price")
            .with("stock", "Stock")
    }

    fn by_sku() -> SearchCriteria {
        SearchCriteria::new(["sku"])
    }

    fn run(
        csv_text: &str,
        store: &CountingStore,
        add_new: bool,
        criteria: &SearchCriteria,
        columns: &ColumnMapping,
    ) -> Result<ImportOutcome, TransferError> {
        let mut source = table::reader(csv_text.as_bytes(), &TransferSettings::default());
        import_table(&mut source, store, add_new, criteria, columns)
    }

    fn shirt() -> Product {
        Product::new("SHIRT-1", "Shirt").unwrap().with_price(1500).with_stock(3)
    }

    #[test]
    fn unknown_key_without_add_new_is_not_found() {
        let store = CountingStore::with([shirt()]);
        let outcome = run(
            "Code;Name;Price;Stock\nHAT-1;Hat;900;1\n",
            &store,
            false,
            &by_sku(),
            &columns(),
        )
        .unwrap();

        assert_eq!(outcome.created, 0);
        assert_eq!(outcome.updated, 0);
        assert_eq!(outcome.failed.len(), 1);
        assert_eq!(outcome.failed[0].reason, FailureReason::NotFound);
        assert_eq!(outcome.failed[0].row.get("Code"), Some("HAT-1"));
        assert_eq!(outcome.failed[0].row.line, 2);
        assert_eq!(store.count().unwrap(), 1);
        assert_eq!(store.saves(), 0);
    }

    #[test]
    fn unknown_key_with_add_new_creates_one_entity() {
        let store = CountingStore::with([shirt()]);
        let outcome = run(
            "Code;Name;Price;Stock\nHAT-1;Hat;900;4\n",
            &store,
            true,
            &by_sku(),
            &columns(),
        )
        .unwrap();

        assert_eq!(outcome.created, 1);
        assert!(outcome.failed.is_empty());
        assert_eq!(store.count().unwrap(), 2);

        let hat = store.by_sku("HAT-1").unwrap();
        assert_eq!(hat.name(), "Hat");
        assert_eq!(hat.price(), Some(900));
        assert_eq!(hat.stock(), 4);
    }

    #[test]
    fn matching_row_updates_non_key_fields() {
        let store = CountingStore::with([shirt()]);
        let outcome = run(
            "Code;Name;Price;Stock\nSHIRT-1;Shirt XL;1700;3\n",
            &store,
            false,
            &by_sku(),
            &columns(),
        )
        .unwrap();

        assert_eq!(outcome.updated, 1);
        let updated = store.by_sku("SHIRT-1").unwrap();
        assert_eq!(updated.name(), "Shirt XL");
        assert_eq!(updated.price(), Some(1700));
        assert_eq!(store.count().unwrap(), 1);
        assert_eq!(store.saves(), 1);
    }

    fn shirt_id(store: &CountingStore) -> ProductId {
        store.by_sku("SHIRT-1").unwrap().id_typed()
    }

    #[test]
    fn identical_row_is_unchanged_and_not_saved() {
        let store = CountingStore::with([shirt()]);
        let outcome = run(
            "Code;Name;Price;Stock\nSHIRT-1;Shirt;1500;3\n",
            &store,
            true,
            &by_sku(),
            &columns(),
        )
        .unwrap();

        assert_eq!(outcome.unchanged, 1);
        assert_eq!(outcome.created + outcome.updated, 0);
        assert_eq!(store.saves(), 0);
    }

    #[test]
    fn missing_key_column_fails_every_row() {
        let store = CountingStore::with([shirt()]);
        let outcome = run(
            "Name;Price\nShirt;1\nHat;2\n",
            &store,
            true,
            &by_sku(),
            &columns(),
        )
        .unwrap();

        assert_eq!(outcome.failed.len(), 2);
        for failure in &outcome.failed {
            assert_eq!(
                failure.reason,
                FailureReason::MissingKey {
                    field: "sku".to_string()
                }
            );
        }
        assert_eq!(store.count().unwrap(), 1);

        // Every store call fails, so success means no lookup was attempted.
        let mut source = table::reader(
            "Name;Price\nShirt;1\nHat;2\n".as_bytes(),
            &TransferSettings::default(),
        );
        let outcome = import_table(&mut source, &DownStore, true, &by_sku(), &columns()).unwrap();
        assert_eq!(outcome.failed.len(), 2);
        assert!(outcome.failed.iter().all(|f| f.reason.code() == "MISSING_KEY"));
    }

    #[test]
    fn surrounding_whitespace_survives_default_settings() {
        let padded = Product::new(" TEE-1", " Shirt ").unwrap();
        let store = CountingStore::with([padded]);
        let outcome = run(
            "Code;Name\n TEE-1; Shirt \n",
            &store,
            true,
            &by_sku(),
            &columns(),
        )
        .unwrap();

        assert_eq!(outcome.unchanged, 1);
        assert_eq!(outcome.created + outcome.updated, 0);
        assert!(outcome.failed.is_empty());
        assert_eq!(store.by_sku(" TEE-1").unwrap().name(), " Shirt ");
    }

    #[test]
    fn trimming_applies_when_enabled() {
        let store = CountingStore::with([shirt()]);
        let settings = TransferSettings {
            trim: true,
            ..TransferSettings::default()
        };
        let mut source = table::reader("Code;Name\n SHIRT-1 ; Shirt XL \n".as_bytes(), &settings);
        let outcome = import_table(&mut source, &store, false, &by_sku(), &columns()).unwrap();

        assert_eq!(outcome.updated, 1);
        assert_eq!(store.by_sku("SHIRT-1").unwrap().name(), "Shirt XL");
    }

    #[test]
    fn short_row_is_missing_key() {
        let store = CountingStore::with([shirt()]);
        let outcome = run(
            "Name;Code\nShirt\n",
            &store,
            true,
            &by_sku(),
            &columns(),
        )
        .unwrap();
        assert_eq!(outcome.failed[0].reason.code(), "MISSING_KEY");
    }

    #[test]
    fn type_mismatch_leaves_entity_untouched_and_batch_continues() {
        let store = CountingStore::with([shirt()]);
        let outcome = run(
            "Code;Name;Price;Stock\nSHIRT-1;Renamed;cheap;3\nHAT-1;Hat;900;1\n",
            &store,
            true,
            &by_sku(),
            &columns(),
        )
        .unwrap();

        assert_eq!(outcome.failed.len(), 1);
        match &outcome.failed[0].reason {
            FailureReason::TypeMismatch { field, .. } => assert_eq!(field, "price"),
            other => panic!("Expected TypeMismatch, got {other:?}"),
        }
        let untouched = store.by_sku("SHIRT-1").unwrap();
        assert_eq!(untouched.name(), "Shirt");
        assert_eq!(untouched.price(), Some(1500));
        assert_eq!(outcome.created, 1);
    }

    #[test]
    fn rejected_value_is_type_mismatch() {
        let store = CountingStore::with([shirt()]);
        let outcome = run(
            "Code;Name;Price;Stock\nSHIRT-1; ;1500;3\n",
            &store,
            false,
            &by_sku(),
            &columns(),
        )
        .unwrap();
        assert_eq!(outcome.failed[0].reason.code(), "TYPE_MISMATCH");
        assert_eq!(store.by_sku("SHIRT-1").unwrap().name(), "Shirt");
    }

    #[test]
    fn composite_key_requires_all_fields_to_match() {
        let store = CountingStore::with([
            shirt().with_ean("111"),
            Product::new("SHIRT-1", "Shirt (old)").unwrap().with_ean("222"),
        ]);
        let mapping = columns().with("ean", "EAN");
        let criteria = SearchCriteria::new(["sku", "ean"]);

        let outcome = run(
            "Code;EAN;Name\nSHIRT-1;222;Shirt (archived)\nSHIRT-1;333;Ghost\n",
            &store,
            false,
            &criteria,
            &mapping,
        )
        .unwrap();

        assert_eq!(outcome.updated, 1);
        assert_eq!(outcome.failed[0].reason, FailureReason::NotFound);
        let names: Vec<String> = store
            .list()
            .unwrap()
            .iter()
            .map(|p| p.name().to_string())
            .collect();
        assert_eq!(names, vec!["Shirt", "Shirt (archived)"]);
    }

    #[test]
    fn absent_non_key_column_is_left_alone() {
        let store = CountingStore::with([shirt()]);
        let outcome = run("Code;Stock\nSHIRT-1;9\n", &store, false, &by_sku(), &columns()).unwrap();
        assert_eq!(outcome.updated, 1);
        let p = store.by_sku("SHIRT-1").unwrap();
        assert_eq!(p.stock(), 9);
        assert_eq!(p.price(), Some(1500));
        assert_eq!(p.name(), "Shirt");
    }

    #[test]
    fn changing_identifier_of_existing_entity_is_rejected() {
        let store = CountingStore::with([shirt()]);
        let mapping = columns().with("id", "ID");
        let text = format!("Code;ID\nSHIRT-1;{}\n", ProductId::new());
        let outcome = run(&text, &store, false, &by_sku(), &mapping).unwrap();
        match &outcome.failed[0].reason {
            FailureReason::TypeMismatch { field, .. } => assert_eq!(field, "id"),
            other => panic!("Expected TypeMismatch, got {other:?}"),
        }
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn creating_with_taken_identifier_is_duplicate() {
        let store = CountingStore::with([shirt()]);
        let mapping = columns().with("id", "ID");
        let text = format!("Code;Name;Stock;ID\nHAT-1;Hat;1;{}\n", shirt_id(&store));
        let outcome = run(&text, &store, true, &by_sku(), &mapping).unwrap();
        assert_eq!(outcome.failed[0].reason, FailureReason::DuplicateId);
        assert_eq!(store.by_sku("SHIRT-1").unwrap().name(), "Shirt");
    }

    #[test]
    fn configuration_errors_abort_before_reading_rows() {
        let store = CountingStore::with([shirt()]);
        let text = "Code\nSHIRT-1\n";

        let empty = run(text, &store, true, &SearchCriteria::default(), &columns());
        assert!(matches!(empty, Err(TransferError::Config(_))));

        let unmapped = run(text, &store, true, &SearchCriteria::new(["ean"]), &columns());
        assert!(matches!(unmapped, Err(TransferError::Config(_))));

        let unknown = run(text, &store, true, &by_sku(), &columns().with("colour", "Colour"));
        assert!(matches!(unknown, Err(TransferError::Config(_))));
    }

    #[test]
    fn store_failure_aborts_import() {
        let mut source = table::reader(
            "Code;Name\nSHIRT-1;Shirt\n".as_bytes(),
            &TransferSettings::default(),
        );
        let err = import_table(&mut source, &DownStore, true, &by_sku(), &columns()).unwrap_err();
        assert!(matches!(err, TransferError::Store(StoreError::Unavailable(_))));
    }

    #[test]
    fn undecodable_row_fails_alone() {
        let store = CountingStore::default();
        let bytes: &[u8] = b"Code;Name\nA-1;Alpha\nB-1;\xff\nC-1;Gamma\n";
        let mut source = table::reader(bytes, &TransferSettings::default());
        let outcome = import_table(&mut source, &store, true, &by_sku(), &columns()).unwrap();

        assert_eq!(outcome.created, 2);
        assert_eq!(outcome.failed.len(), 1);
        let failure = &outcome.failed[0];
        assert_eq!(failure.row.line, 3);
        assert_eq!(failure.row.get("Code"), Some("B-1"));
        match &failure.reason {
            FailureReason::TypeMismatch { field, .. } => assert_eq!(field, "name"),
            other => panic!("Expected TypeMismatch, got {other:?}"),
        }
        assert!(store.by_sku("B-1").is_none());
        assert!(store.by_sku("C-1").is_some());
    }

    #[test]
    fn undecodable_unmapped_cell_is_ignored() {
        let store = CountingStore::with([shirt()]);
        let bytes: &[u8] = b"Code;Notes;Stock\nSHIRT-1;\xff;7\n";
        let mut source = table::reader(bytes, &TransferSettings::default());
        let outcome = import_table(&mut source, &store, false, &by_sku(), &columns()).unwrap();

        assert_eq!(outcome.updated, 1);
        assert_eq!(store.by_sku("SHIRT-1").unwrap().stock(), 7);
    }

    #[test]
    fn undecodable_header_aborts_import() {
        let store = CountingStore::with([shirt()]);
        let bytes: &[u8] = b"Code;N\xffme\nSHIRT-1;Shirt\n";
        let mut source = table::reader(bytes, &TransferSettings::default());
        let err = import_table(&mut source, &store, true, &by_sku(), &columns()).unwrap_err();
        assert!(matches!(err, TransferError::Csv(_)));
        assert_eq!(store.saves(), 0);
    }

    #[test]
    fn outcome_counts_every_processed_row() {
        let store = CountingStore::with([shirt()]);
        let outcome = run(
            "Code;Name\nSHIRT-1;Shirt\nSHIRT-1;Shirt XL\nHAT-1;Hat\nCAP-1;\n",
            &store,
            true,
            &by_sku(),
            &columns(),
        )
        .unwrap();
        assert_eq!(
            (outcome.unchanged, outcome.updated, outcome.created, outcome.failed.len()),
            (1, 1, 1, 1)
        );
        assert_eq!(outcome.processed(), 4);
    }

    #[test]
    fn failure_reasons_display_their_code() {
        let reason = FailureReason::MissingKey {
            field: "sku".into(),
        };
        assert_eq!(reason.to_string(), "MISSING_KEY: no value for key field 'sku'");
    }
}
