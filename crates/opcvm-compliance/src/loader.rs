//! Fund sheets to holdings.
//!
//! A portfolio workbook holds one sheet per fund. Each sheet starts with
//! header rows carrying the fund name and its net assets, followed by one
//! row per position with positional columns:
//!
//! | Col | Field |
//! |-----|-------|
//! | 0 | ISIN code |
//! | 1 | Security type |
//! | 2 | Description |
//! | 3 | Quantity |
//! | 4 | Unit cost price |
//! | 5 | Unit valuation |
//! | 6 | Global cost |
//! | 7 | Global valuation |
//! | 8 | Gain/loss |
//!
//! This module works on [`RawSheet`]s already read into memory; file
//! adapters are responsible for producing them.

use opcvm_core::{normalize_number, CellValue, FundInfo, Holding, NetAssetsMap, NumberQuality};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, info, warn};

/// Minimum number of columns a fund sheet must have.
pub const MIN_COLUMNS: usize = 9;

const COL_ISIN: usize = 0;
const COL_TYPE: usize = 1;
const COL_DESCRIPTION: usize = 2;
const COL_QUANTITY: usize = 3;
const COL_COST_PRICE: usize = 4;
const COL_GLOBAL_VALUATION: usize = 7;

static EMPTY_CELL: CellValue = CellValue::Empty;

/// A sheet read into memory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawSheet {
    /// Sheet name.
    pub name: String,
    /// Rows from the top-left corner of the sheet.
    pub rows: Vec<Vec<CellValue>>,
}

impl RawSheet {
    /// Creates an empty sheet.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rows: Vec::new(),
        }
    }

    /// Appends a row.
    #[must_use]
    pub fn with_row(mut self, row: Vec<CellValue>) -> Self {
        self.rows.push(row);
        self
    }

    /// Returns a cell, or an empty cell when out of range.
    #[must_use]
    pub fn cell(&self, row: usize, col: usize) -> &CellValue {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY_CELL)
    }

    /// Widest row length.
    #[must_use]
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }
}

/// Zero-based cell coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellRef {
    /// Row index.
    pub row: usize,
    /// Column index.
    pub col: usize,
}

impl CellRef {
    /// Creates a cell reference.
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Serde form of an optional header cell: a `{ row, col }` table, or the
/// string `"none"` to disable the lookup. TOML has no null, so absence
/// cannot mean "disabled" there.
mod header_cell {
    use super::CellRef;
    use serde::{de::Error, Deserialize, Deserializer, Serialize, Serializer};

    pub(super) const DISABLED: &str = "none";

    #[derive(Serialize, Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Cell(CellRef),
        Label(String),
    }

    pub(super) fn serialize<S: Serializer>(
        cell: &Option<CellRef>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match cell {
            Some(c) => Repr::Cell(*c),
            None => Repr::Label(DISABLED.to_string()),
        }
        .serialize(serializer)
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<CellRef>, D::Error> {
        match Option::<Repr>::deserialize(deserializer)? {
            None => Ok(None),
            Some(Repr::Cell(c)) => Ok(Some(c)),
            Some(Repr::Label(l)) if l.trim().eq_ignore_ascii_case(DISABLED) => Ok(None),
            Some(Repr::Label(l)) => Err(D::Error::custom(format!(
                "expected a {{ row, col }} cell or \"{DISABLED}\", found \"{l}\""
            ))),
        }
    }
}

/// Where fund identity and net assets are found.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetLayout {
    /// Rows preceding the first position row.
    pub header_rows: usize,

    /// Header cell holding the fund name (`A1` by default).
    #[serde(with = "header_cell")]
    pub fund_name_cell: Option<CellRef>,

    /// Header cell holding the net assets (`C1` by default). When disabled,
    /// net assets come only from [`Self::known_net_assets`].
    #[serde(with = "header_cell")]
    pub net_assets_cell: Option<CellRef>,

    /// Sheet name to fund id, consulted before the header cell.
    pub sheet_funds: BTreeMap<String, String>,

    /// Fund id to net assets, used when the header has none.
    pub known_net_assets: BTreeMap<String, f64>,
}

impl Default for SheetLayout {
    fn default() -> Self {
        Self {
            header_rows: 1,
            fund_name_cell: Some(CellRef::new(0, 0)),
            net_assets_cell: Some(CellRef::new(0, 2)),
            sheet_funds: BTreeMap::new(),
            known_net_assets: BTreeMap::new(),
        }
    }
}

impl SheetLayout {
    /// Creates the default layout.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of header rows.
    #[must_use]
    pub fn with_header_rows(mut self, rows: usize) -> Self {
        self.header_rows = rows;
        self
    }

    /// Sets or clears the fund-name header cell.
    #[must_use]
    pub fn with_fund_name_cell(mut self, cell: Option<CellRef>) -> Self {
        self.fund_name_cell = cell;
        self
    }

    /// Sets or clears the net-assets header cell.
    #[must_use]
    pub fn with_net_assets_cell(mut self, cell: Option<CellRef>) -> Self {
        self.net_assets_cell = cell;
        self
    }

    /// Maps a sheet name to a fund id.
    #[must_use]
    pub fn with_sheet_fund(mut self, sheet: impl Into<String>, fund_id: impl Into<String>) -> Self {
        self.sheet_funds.insert(sheet.into(), fund_id.into());
        self
    }

    /// Registers known net assets for a fund.
    #[must_use]
    pub fn with_known_net_assets(mut self, fund_id: impl Into<String>, net_assets: f64) -> Self {
        self.known_net_assets.insert(fund_id.into(), net_assets);
        self
    }

    fn fund_id(&self, sheet: &RawSheet) -> String {
        if let Some(id) = self.sheet_funds.get(&sheet.name) {
            return id.clone();
        }
        self.fund_name_cell
            .and_then(|c| sheet.cell(c.row, c.col).as_text())
            .unwrap_or_else(|| sheet.name.clone())
    }

    fn net_assets(&self, sheet: &RawSheet, fund_id: &str) -> Option<f64> {
        let from_header = self
            .net_assets_cell
            .map(|c| normalize_number(sheet.cell(c.row, c.col)).0)
            .filter(|v| *v > 0.0);

        from_header.or_else(|| {
            self.known_net_assets
                .get(fund_id)
                .copied()
                .filter(|v| v.is_finite() && *v > 0.0)
        })
    }
}

/// Why a sheet contributed nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Fewer than [`MIN_COLUMNS`] columns.
    TooFewColumns {
        /// Columns found.
        found: usize,
    },
    /// No row with a strictly positive global valuation.
    NoValidRows,
    /// Net assets missing from both the header and the known table.
    NoNetAssets {
        /// Fund id resolved for the sheet.
        fund_id: String,
    },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooFewColumns { found } => {
                write!(f, "{} columns found, at least {} required", found, MIN_COLUMNS)
            }
            Self::NoValidRows => write!(f, "no row with a positive valuation"),
            Self::NoNetAssets { fund_id } => write!(f, "no net assets for fund '{}'", fund_id),
        }
    }
}

/// A sheet excluded from the output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedSheet {
    /// Sheet name.
    pub sheet_name: String,
    /// Reason for exclusion.
    pub reason: SkipReason,
}

/// Holdings and fund information extracted from a workbook.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoadedPortfolio {
    /// All holdings, in sheet then row order. Every value is strictly positive.
    pub holdings: Vec<Holding>,

    /// Funds in sheet order; a repeated fund id keeps its first position
    /// and the net assets of the last sheet.
    pub funds: Vec<FundInfo>,

    /// Sheets that contributed nothing.
    pub skipped_sheets: Vec<SkippedSheet>,

    /// Valuation cells with content that could not be read as a number.
    pub degraded_cells: usize,
}

impl LoadedPortfolio {
    /// Net assets keyed by fund id.
    #[must_use]
    pub fn net_assets(&self) -> NetAssetsMap {
        self.funds
            .iter()
            .map(|f| (f.fund_id.clone(), f.net_assets))
            .collect()
    }

    /// Total valuation across all holdings.
    #[must_use]
    pub fn total_value(&self) -> f64 {
        self.holdings.iter().map(|h| h.value).sum()
    }

    fn register_fund(&mut self, fund: FundInfo) {
        match self.funds.iter_mut().find(|f| f.fund_id == fund.fund_id) {
            Some(existing) => {
                warn!(
                    fund = %fund.fund_id,
                    "Fund appears on several sheets; keeping the last net assets"
                );
                *existing = fund;
            }
            None => self.funds.push(fund),
        }
    }
}

struct SheetRows {
    holdings: Vec<Holding>,
    degraded: usize,
}

fn optional_number(cell: &CellValue) -> Option<f64> {
    if cell.is_blank() {
        None
    } else {
        Some(normalize_number(cell).0)
    }
}

fn extract_rows(sheet: &RawSheet, header_rows: usize, fund_id: &str) -> SheetRows {
    let mut holdings = Vec::new();
    let mut degraded = 0;

    for (offset, row) in sheet.rows.iter().enumerate().skip(header_rows) {
        if row.iter().all(CellValue::is_blank) {
            continue;
        }

        let (value, quality) = normalize_number(sheet.cell(offset, COL_GLOBAL_VALUATION));
        match quality {
            NumberQuality::Degraded => {
                degraded += 1;
                warn!(
                    sheet = %sheet.name,
                    row = offset + 1,
                    "Unreadable valuation replaced by zero"
                );
            }
            NumberQuality::Recovered => {
                debug!(sheet = %sheet.name, row = offset + 1, "Valuation read after cleanup");
            }
            NumberQuality::Clean | NumberQuality::Blank => {}
        }

        if value <= 0.0 {
            continue;
        }

        let mut holding = Holding::new(
            fund_id,
            sheet.cell(offset, COL_TYPE).as_text().unwrap_or_default(),
            sheet
                .cell(offset, COL_DESCRIPTION)
                .as_text()
                .unwrap_or_default(),
            value,
        );
        holding.isin = sheet.cell(offset, COL_ISIN).as_text();
        holding.quantity = optional_number(sheet.cell(offset, COL_QUANTITY));
        holding.cost_price = optional_number(sheet.cell(offset, COL_COST_PRICE));
        holdings.push(holding);
    }

    SheetRows { holdings, degraded }
}

/// Extracts holdings and fund net assets from fund sheets.
///
/// Each sheet is handled independently:
///
/// - fewer than [`MIN_COLUMNS`] columns, no positive valuation, or no
///   obtainable net assets: the sheet is skipped and recorded in
///   [`LoadedPortfolio::skipped_sheets`];
/// - blank rows are dropped, every valuation goes through the number
///   normalizer and rows valued at zero or less are discarded.
///
/// Returns `None` when no sheet contributes any holding.
#[must_use]
pub fn load_portfolio_from_sheets(
    sheets: &[RawSheet],
    layout: &SheetLayout,
) -> Option<LoadedPortfolio> {
    let mut portfolio = LoadedPortfolio::default();

    for sheet in sheets {
        let skip = |reason: SkipReason| {
            warn!(sheet = %sheet.name, %reason, "Skipping sheet");
            SkippedSheet {
                sheet_name: sheet.name.clone(),
                reason,
            }
        };

        let width = sheet.width();
        if width < MIN_COLUMNS {
            portfolio
                .skipped_sheets
                .push(skip(SkipReason::TooFewColumns { found: width }));
            continue;
        }

        let fund_id = layout.fund_id(sheet);
        let rows = extract_rows(sheet, layout.header_rows, &fund_id);
        portfolio.degraded_cells += rows.degraded;

        if rows.holdings.is_empty() {
            portfolio.skipped_sheets.push(skip(SkipReason::NoValidRows));
            continue;
        }

        let Some(net_assets) = layout.net_assets(sheet, &fund_id) else {
            portfolio
                .skipped_sheets
                .push(skip(SkipReason::NoNetAssets { fund_id }));
            continue;
        };

        debug!(
            sheet = %sheet.name,
            fund = %fund_id,
            net_assets,
            rows = rows.holdings.len(),
            "Loaded fund sheet"
        );

        portfolio.holdings.extend(rows.holdings);
        portfolio.register_fund(FundInfo::new(fund_id, net_assets).with_sheet_name(&sheet.name));
    }

    if portfolio.holdings.is_empty() {
        warn!(sheets = sheets.len(), "No valid data found in workbook");
        return None;
    }

    info!(
        funds = portfolio.funds.len(),
        holdings = portfolio.holdings.len(),
        skipped = portfolio.skipped_sheets.len(),
        degraded = portfolio.degraded_cells,
        "Portfolio loaded"
    );

    Some(portfolio)
}
