use std::{
    fs::{self, File, OpenOptions},
    io::{Read, Seek, SeekFrom, Write},
    path::{Path, PathBuf},
};

use chrono::{NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, StringRecord, Trim, Writer, WriterBuilder};
use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::{
    core::utils::{ensure_dir, tmp_path},
    errors::{LedgerError, Result},
    ledger::{
        record::{parse_decimal, DATE_FORMAT, FALLBACK_CATEGORY},
        ExpenseRecord, Ledger,
    },
};

use super::{LedgerStore, LoadMode};

/// Column names, in the order they are written.
pub const CSV_HEADER: [&str; 4] = ["date", "category", "amount", "description"];

const TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Ledger persisted as a comma-separated file with a header row.
#[derive(Debug, Clone)]
pub struct CsvStorage {
    path: PathBuf,
    mode: LoadMode,
}

impl CsvStorage {
    pub fn new(path: impl Into<PathBuf>, mode: LoadMode) -> Self {
        Self {
            path: path.into(),
            mode,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn mode(&self) -> LoadMode {
        self.mode
    }
}

impl LedgerStore for CsvStorage {
    fn ensure_exists(&self) -> Result<()> {
        if self.path.exists() {
            return Ok(());
        }
        debug!(path = %self.path.display(), "creating empty ledger file");
        write_ledger_to_path(&Ledger::new(), &self.path)
    }

    fn load_all(&self) -> Result<Ledger> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "ledger file missing, treating as empty");
            return Ok(Ledger::new());
        }
        read_ledger_from_path(&self.path, self.mode)
    }

    /// Validates the file under the current mode, then writes only the new
    /// row. Rows that a lenient load skipped stay in the file untouched.
    fn append(&mut self, record: ExpenseRecord) -> Result<()> {
        self.ensure_exists()?;
        let existing = self.load_all()?;
        match read_column_map(&self.path)? {
            Some(columns) => append_row(&self.path, &columns, &record)?,
            None => write_ledger_to_path(&Ledger::from(vec![record]), &self.path)?,
        }
        debug!(
            path = %self.path.display(),
            records = existing.len() + 1,
            "appended expense"
        );
        Ok(())
    }
}

fn row_fields(record: &ExpenseRecord) -> [String; 4] {
    [
        record.date.format(DATE_FORMAT).to_string(),
        record.category.clone(),
        record.amount.to_string(),
        record.description.clone(),
    ]
}

/// Header layout of an existing file, or `None` when the file is empty.
fn read_column_map(path: &Path) -> Result<Option<ColumnMap>> {
    let mut reader = ReaderBuilder::new().trim(Trim::All).from_path(path)?;
    let headers = reader.headers()?;
    if headers.is_empty() {
        return Ok(None);
    }
    ColumnMap::from_headers(headers)
        .map(Some)
        .ok_or_else(|| LedgerError::MalformedStore {
            path: path.to_path_buf(),
            line: Some(1),
            reason: "unrecognised header".into(),
        })
}

/// Appends one row laid out in the file's own column order.
fn append_row(path: &Path, columns: &ColumnMap, record: &ExpenseRecord) -> Result<()> {
    let mut file = OpenOptions::new().read(true).append(true).open(path)?;
    if !ends_with_newline(&mut file)? {
        file.write_all(b"\n")?;
    }
    let [date, category, amount, description] = row_fields(record);
    let mut row = vec![String::new(); CSV_HEADER.len()];
    row[columns.date] = date;
    row[columns.category] = category;
    row[columns.amount] = amount;
    row[columns.description] = description;

    let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);
    writer.write_record(&row)?;
    writer.flush()?;
    Ok(())
}

fn ends_with_newline(file: &mut File) -> Result<bool> {
    let len = file.metadata()?.len();
    if len == 0 {
        return Ok(true);
    }
    file.seek(SeekFrom::Start(len - 1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}

/// Writes the ledger to `path`, staging to a temporary file and renaming it
/// into place so a failed write leaves the previous file intact.
pub fn write_ledger_to_path(ledger: &Ledger, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let tmp = tmp_path(path);
    {
        let mut writer = Writer::from_path(&tmp)?;
        writer.write_record(CSV_HEADER)?;
        for record in ledger {
            writer.write_record(row_fields(record))?;
        }
        writer.flush()?;
    }
    fs::rename(&tmp, path)?;
    Ok(())
}

/// Reads and validates a ledger file according to `mode`.
pub fn read_ledger_from_path(path: &Path, mode: LoadMode) -> Result<Ledger> {
    let file = File::open(path)?;
    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(file);

    let headers = reader.headers()?.clone();
    if headers.is_empty() {
        // Zero-byte file: nothing was ever written, not even the header.
        return Ok(Ledger::new());
    }
    let columns = ColumnMap::from_headers(&headers).ok_or_else(|| LedgerError::MalformedStore {
        path: path.to_path_buf(),
        line: Some(1),
        reason: format!(
            "expected columns `{}`, found `{}`",
            CSV_HEADER.join(","),
            headers.iter().collect::<Vec<_>>().join(",")
        ),
    })?;

    let mut ledger = Ledger::new();
    for row in reader.records() {
        let row = row?;
        let line = row.position().map(|pos| pos.line());
        match parse_row(&row, &columns, mode) {
            Ok(Some(record)) => ledger.push(record),
            Ok(None) => {}
            Err(reason) => {
                return Err(LedgerError::MalformedStore {
                    path: path.to_path_buf(),
                    line,
                    reason,
                })
            }
        }
    }
    debug!(path = %path.display(), records = ledger.len(), %mode, "loaded ledger");
    Ok(ledger)
}

/// Position of each schema column within the file's header.
#[derive(Debug)]
struct ColumnMap {
    date: usize,
    category: usize,
    amount: usize,
    description: usize,
}

impl ColumnMap {
    /// Header names are matched case-insensitively; any other column set is rejected.
    fn from_headers(headers: &StringRecord) -> Option<Self> {
        if headers.len() != CSV_HEADER.len() {
            return None;
        }
        let names: Vec<String> = headers
            .iter()
            .map(|name| name.trim().to_ascii_lowercase())
            .collect();
        let find = |wanted: &str| names.iter().position(|name| name == wanted);
        Some(Self {
            date: find("date")?,
            category: find("category")?,
            amount: find("amount")?,
            description: find("description")?,
        })
    }
}

fn parse_row(
    row: &StringRecord,
    columns: &ColumnMap,
    mode: LoadMode,
) -> std::result::Result<Option<ExpenseRecord>, String> {
    if mode == LoadMode::Strict && row.len() != CSV_HEADER.len() {
        return Err(format!(
            "expected {} fields, found {}",
            CSV_HEADER.len(),
            row.len()
        ));
    }
    let field = |idx: usize| row.get(idx).unwrap_or("");

    let raw_date = field(columns.date);
    let date = match parse_stored_date(raw_date, mode) {
        Some(date) => date,
        None if mode == LoadMode::Lenient => {
            warn!(date = raw_date, "skipping row with unparsable date");
            return Ok(None);
        }
        None => return Err(format!("invalid date `{raw_date}`")),
    };

    let raw_amount = field(columns.amount);
    let amount = match parse_decimal(raw_amount) {
        Some(amount) => amount,
        None if mode == LoadMode::Lenient => {
            warn!(amount = raw_amount, %date, "treating unparsable amount as zero");
            Decimal::ZERO
        }
        None => return Err(format!("invalid amount `{raw_amount}`")),
    };

    let category = match field(columns.category) {
        "" => FALLBACK_CATEGORY.to_string(),
        other => other.to_string(),
    };

    Ok(Some(ExpenseRecord {
        date,
        category,
        amount,
        description: field(columns.description).to_string(),
    }))
}

fn parse_stored_date(raw: &str, mode: LoadMode) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, DATE_FORMAT) {
        return Some(date);
    }
    if mode == LoadMode::Strict {
        return None;
    }
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|timestamp| timestamp.date())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use tempfile::TempDir;

    fn storage_with_temp_dir(mode: LoadMode) -> (CsvStorage, TempDir) {
        let temp = TempDir::new().expect("temp dir");
        let storage = CsvStorage::new(temp.path().join("expenses.csv"), mode);
        (storage, temp)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn ensure_exists_writes_header_once() {
        let (storage, _guard) = storage_with_temp_dir(LoadMode::Strict);
        storage.ensure_exists().expect("create");
        storage.ensure_exists().expect("idempotent");
        let contents = fs::read_to_string(storage.path()).unwrap();
        assert_eq!(contents, "date,category,amount,description\n");
    }

    #[test]
    fn missing_file_loads_empty_without_creating_it() {
        let (storage, _guard) = storage_with_temp_dir(LoadMode::Strict);
        let ledger = storage.load_all().expect("load");
        assert!(ledger.is_empty());
        assert!(!storage.path().exists());
    }

    #[test]
    fn append_round_trips_quoted_fields() {
        let (mut storage, _guard) = storage_with_temp_dir(LoadMode::Strict);
        let record = ExpenseRecord::new(
            date(2024, 1, 1),
            "food",
            dec!(12.50),
            "pizza, \"large\"",
        );
        storage.append(record.clone()).expect("append");
        let loaded = storage.load_all().expect("load");
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded.last(), Some(&record));
        assert!(!tmp_path(storage.path()).exists());
    }

    #[test]
    fn strict_load_rejects_bad_amount_with_line() {
        let (storage, _guard) = storage_with_temp_dir(LoadMode::Strict);
        fs::write(
            storage.path(),
            "date,category,amount,description\n2024-01-01,Food,10,\n2024-01-02,Food,abc,\n",
        )
        .unwrap();
        let err = storage.load_all().expect_err("bad amount must fail");
        match err {
            LedgerError::MalformedStore { line, reason, .. } => {
                assert_eq!(line, Some(3));
                assert!(reason.contains("abc"), "unexpected reason: {reason}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn lenient_load_coerces_and_skips() {
        let (storage, _guard) = storage_with_temp_dir(LoadMode::Lenient);
        fs::write(
            storage.path(),
            "date,category,amount,description\n\
             2024-01-01 00:00:00,,abc\n\
             not-a-date,Food,5,\n\
             2024-01-03,Rent,700,flat\n",
        )
        .unwrap();
        let ledger = storage.load_all().expect("lenient load");
        assert_eq!(ledger.len(), 2);
        let first = &ledger.records[0];
        assert_eq!(first.date, date(2024, 1, 1));
        assert_eq!(first.category, "Other");
        assert_eq!(first.amount, Decimal::ZERO);
        assert_eq!(first.description, "");
        assert_eq!(ledger.records[1].amount, dec!(700));
    }

    #[test]
    fn capitalised_headers_in_any_order_are_accepted() {
        let (storage, _guard) = storage_with_temp_dir(LoadMode::Strict);
        fs::write(
            storage.path(),
            "Category,Date,Amount,Description\nTravel,2024-03-05,40.25,bus\n",
        )
        .unwrap();
        let ledger = storage.load_all().expect("load");
        assert_eq!(ledger.records[0].category, "Travel");
        assert_eq!(ledger.records[0].date, date(2024, 3, 5));
        assert_eq!(ledger.records[0].amount, dec!(40.25));
    }

    #[test]
    fn wrong_columns_are_malformed() {
        let (storage, _guard) = storage_with_temp_dir(LoadMode::Lenient);
        fs::write(storage.path(), "when,what,how much\n2024-01-01,Food,3\n").unwrap();
        assert!(matches!(
            storage.load_all(),
            Err(LedgerError::MalformedStore { line: Some(1), .. })
        ));
    }

    #[test]
    fn append_does_not_touch_a_malformed_file() {
        let (mut storage, _guard) = storage_with_temp_dir(LoadMode::Strict);
        let original = "date,category,amount,description\n2024-01-01,Food,oops,\n";
        fs::write(storage.path(), original).unwrap();
        let record = ExpenseRecord::new(date(2024, 1, 2), "Food", dec!(1), "");
        assert!(storage.append(record).is_err());
        assert_eq!(fs::read_to_string(storage.path()).unwrap(), original);
    }

    #[test]
    fn lenient_append_keeps_rows_it_could_not_read() {
        let (mut storage, _guard) = storage_with_temp_dir(LoadMode::Lenient);
        fs::write(
            storage.path(),
            "date,category,amount,description\n01/02/2024,Rent,900,flat\n2024-01-03,Food,5,\n",
        )
        .unwrap();
        let record = ExpenseRecord::new(date(2024, 1, 4), "Food", dec!(1), "");
        storage.append(record.clone()).expect("append");

        let contents = fs::read_to_string(storage.path()).unwrap();
        assert_eq!(
            contents,
            "date,category,amount,description\n\
             01/02/2024,Rent,900,flat\n\
             2024-01-03,Food,5,\n\
             2024-01-04,Food,1,\n"
        );
        assert_eq!(storage.load_all().unwrap().last(), Some(&record));
    }

    #[test]
    fn append_follows_the_file_column_order() {
        let (mut storage, _guard) = storage_with_temp_dir(LoadMode::Strict);
        fs::write(
            storage.path(),
            "Category,Date,Amount,Description\nTravel,2024-03-05,40.25,bus",
        )
        .unwrap();
        let record = ExpenseRecord::new(date(2024, 3, 6), "Food", dec!(3), "tea");
        storage.append(record.clone()).expect("append");

        let contents = fs::read_to_string(storage.path()).unwrap();
        assert!(contents.ends_with("bus\nFood,2024-03-06,3,tea\n"), "{contents}");
        let ledger = storage.load_all().unwrap();
        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.last(), Some(&record));
    }

    #[test]
    fn append_to_zero_byte_file_writes_the_header() {
        let (mut storage, _guard) = storage_with_temp_dir(LoadMode::Strict);
        fs::write(storage.path(), "").unwrap();
        let record = ExpenseRecord::new(date(2024, 1, 1), "Food", dec!(2), "");
        storage.append(record).expect("append");
        assert_eq!(
            fs::read_to_string(storage.path()).unwrap(),
            "date,category,amount,description\n2024-01-01,Food,2,\n"
        );
    }

    #[test]
    fn zero_byte_file_is_an_empty_ledger() {
        let (storage, _guard) = storage_with_temp_dir(LoadMode::Strict);
        fs::write(storage.path(), "").unwrap();
        assert!(storage.load_all().unwrap().is_empty());
    }
}
