//! Workbook round trips through real `.xlsx` files.

use std::sync::Arc;

use approx::assert_relative_eq;
use calamine::{open_workbook_auto, Reader};
use opcvm_compliance::{run_compliance_check, ComplianceParams, IssuerTable, SheetLayout};
use opcvm_config::ExportConfig;
use opcvm_core::SOVEREIGN_ISSUER;
use opcvm_ext_file::*;
use rust_xlsxwriter::Workbook;
use tempfile::TempDir;

enum Val<'a> {
    Num(f64),
    Str(&'a str),
}

/// Writes one fund sheet: header row, then positions with the valuation in column H.
fn add_fund_sheet(
    workbook: &mut Workbook,
    name: &str,
    fund: &str,
    net_assets: Val<'_>,
    positions: &[(&str, &str, Val<'_>)],
) {
    let sheet = workbook.add_worksheet();
    sheet.set_name(name).unwrap();
    sheet.write_string(0, 0, fund).unwrap();
    match net_assets {
        Val::Num(n) => sheet.write_number(0, 2, n).unwrap(),
        Val::Str(s) => sheet.write_string(0, 2, s).unwrap(),
    };
    for (i, (kind, description, valuation)) in positions.iter().enumerate() {
        let row = i as u32 + 1;
        sheet.write_string(row, 0, "MA0000012445").unwrap();
        sheet.write_string(row, 1, *kind).unwrap();
        sheet.write_string(row, 2, *description).unwrap();
        sheet.write_number(row, 3, 10.0).unwrap();
        sheet.write_number(row, 4, 100.0).unwrap();
        sheet.write_number(row, 5, 110.0).unwrap();
        sheet.write_number(row, 6, 1_000.0).unwrap();
        match valuation {
            Val::Num(n) => sheet.write_number(row, 7, *n).unwrap(),
            Val::Str(s) => sheet.write_string(row, 7, *s).unwrap(),
        };
        sheet.write_number(row, 8, 100.0).unwrap();
    }
}

fn sample_workbook() -> Vec<u8> {
    let mut workbook = Workbook::new();
    add_fund_sheet(
        &mut workbook,
        "Actions",
        "CDG ACTIONS",
        Val::Str("1 000 000"),
        &[
            ("ACTION", "ATTIJARIWAFA BANK", Val::Num(200_000.0)),
            ("ACTION", "SOCIETE XYZ", Val::Str("90 000")),
            ("OBLIGATION", "BDT 5.2% 2030", Val::Num(500_000.0)),
            ("ACTION", "BROKEN", Val::Str("n/a")),
        ],
    );
    add_fund_sheet(
        &mut workbook,
        "Monetaire",
        "CDG CASH",
        Val::Num(0.0),
        &[("TCN", "CIH", Val::Num(10.0))],
    );
    let notes = workbook.add_worksheet();
    notes.set_name("Notes").unwrap();
    notes.write_string(0, 0, "free text").unwrap();

    workbook.save_to_buffer().unwrap()
}

#[test]
fn test_load_real_workbook() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("portfolio.xlsx");
    std::fs::write(&path, sample_workbook()).unwrap();

    let loaded = load_portfolio(&path, &SheetLayout::default()).unwrap();

    assert_eq!(loaded.funds.len(), 1);
    assert_eq!(loaded.funds[0].fund_id, "CDG ACTIONS");
    assert_relative_eq!(loaded.funds[0].net_assets, 1_000_000.0);
    assert_eq!(loaded.holdings.len(), 3);
    assert_eq!(loaded.degraded_cells, 1);
    assert_eq!(loaded.skipped_sheets.len(), 2);
    assert_eq!(loaded.holdings[0].isin.as_deref(), Some("MA0000012445"));
}

#[test]
fn test_known_net_assets_rescue_sheet() {
    let layout = SheetLayout::default().with_known_net_assets("CDG CASH", 50.0);
    let loaded = load_portfolio_from_bytes(sample_workbook(), &layout).unwrap();
    assert_eq!(loaded.funds.len(), 2);
    assert_eq!(loaded.funds[1].net_assets, 50.0);
}

#[test]
fn test_workbook_without_data() {
    let mut workbook = Workbook::new();
    workbook.add_worksheet().write_string(0, 0, "empty").unwrap();
    let bytes = workbook.save_to_buffer().unwrap();

    assert!(matches!(
        load_portfolio_from_bytes(bytes, &SheetLayout::default()),
        Err(FileError::NoValidData)
    ));
}

#[test]
fn test_offset_range_keeps_positions() {
    // Content starting at B2 must still be read as column B, row 2.
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.write_string(1, 1, "shifted").unwrap();
    let bytes = workbook.save_to_buffer().unwrap();

    let sheets = read_sheets(bytes).unwrap();
    assert_eq!(sheets[0].cell(1, 1).as_text().as_deref(), Some("shifted"));
    assert!(sheets[0].cell(0, 0).is_blank());
}

#[test]
fn test_export_round_trip() {
    let loaded = load_portfolio_from_bytes(sample_workbook(), &SheetLayout::default()).unwrap();
    let report = run_compliance_check(
        &loaded.holdings,
        &loaded.net_assets(),
        &IssuerTable::default(),
        &ComplianceParams::default(),
    );
    assert!(report.ratios.iter().any(|r| r.issuer_id == SOVEREIGN_ISSUER));
    assert_eq!(report.non_compliant().count(), 1);

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("report.xlsx");
    export_workbook(&report, &ExportConfig::default(), &path).unwrap();

    let mut exported = open_workbook_auto(&path).unwrap();
    assert_eq!(
        exported.sheet_names(),
        vec![RATIOS_SHEET, CONCENTRATION_SHEET, NON_COMPLIANT_SHEET, SUMMARY_SHEET]
    );

    let ratios = exported.worksheet_range(RATIOS_SHEET).unwrap();
    assert_eq!(ratios.height(), report.ratios.len() + 1);
    assert_eq!(
        ratios.get_value((0, 0)).map(ToString::to_string).as_deref(),
        Some("Fund")
    );
}

#[test]
fn test_export_options() {
    let loaded = load_portfolio_from_bytes(sample_workbook(), &SheetLayout::default()).unwrap();
    let params = ComplianceParams::default().with_ceiling_eligible_equity(0.25);
    let report = run_compliance_check(
        &loaded.holdings,
        &loaded.net_assets(),
        &IssuerTable::default(),
        &params,
    );
    assert_eq!(report.non_compliant().count(), 0);

    let options = ExportConfig {
        include_summary: false,
        include_non_compliant: true,
    };
    let bytes = export_workbook_to_buffer(&report, &options).unwrap();
    let sheets = read_sheets(bytes).unwrap();
    let names: Vec<&str> = sheets.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec![RATIOS_SHEET, CONCENTRATION_SHEET]);
}

#[test]
fn test_ratios_csv() {
    let loaded = load_portfolio_from_bytes(sample_workbook(), &SheetLayout::default()).unwrap();
    let report = run_compliance_check(
        &loaded.holdings,
        &loaded.net_assets(),
        &IssuerTable::default(),
        &ComplianceParams::default(),
    );

    let mut buf = Vec::new();
    write_ratios_csv(&report.ratios, &mut buf).unwrap();
    let text = String::from_utf8(buf).unwrap();
    assert_eq!(text.lines().count(), report.ratios.len() + 1);
    assert!(text.contains("CDG ACTIONS,ATW,private,200000,1000000,20,15,eligible equity,yes,1,no,"));
}

#[test]
fn test_cache_hit() {
    let cache = WorkbookCache::new();
    let layout = SheetLayout::default();
    let bytes = sample_workbook();

    let first = cache.get_or_load(bytes.clone(), &layout).unwrap();
    let second = cache.get_or_load(bytes.clone(), &layout).unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(cache.len(), 1);
    assert!(cache.contains(&bytes));

    let rescued = layout.clone().with_known_net_assets("CDG CASH", 5.0);
    let other = cache.get_or_load(bytes, &rescued).unwrap();
    assert!(!Arc::ptr_eq(&first, &other));
    assert_eq!(other.funds.len(), 2);
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_issuer_table_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("issuers.csv");
    std::fs::write(&path, "mot_cle,emetteur,type_emetteur\nSOCIETE XYZ,XYZ,prive\n").unwrap();

    let table = load_issuer_table(&path).unwrap();
    let loaded = load_portfolio_from_bytes(sample_workbook(), &SheetLayout::default()).unwrap();
    let report = run_compliance_check(
        &loaded.holdings,
        &loaded.net_assets(),
        &table,
        &ComplianceParams::default(),
    );

    let ids: Vec<&str> = report.ratios.iter().map(|r| r.issuer_id.as_str()).collect();
    // ATTIJARIWAFA is not in the custom table
    assert_eq!(ids, vec!["Needs review", SOVEREIGN_ISSUER, "XYZ"]);
}
