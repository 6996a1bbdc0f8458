use crate::error::{AnalyzerError, Result};
use crate::schema::{AnalysisResult, RatioStatus, Trend};
use chrono::Local;
use rust_xlsxwriter::{Format, Workbook, Worksheet};

/// Fixed download name for the exported workbook.
pub const EXPORT_FILE_NAME: &str = "financial-analysis.xlsx";

const SHEET_REPORT: &str = "Executive Report";
const SHEET_VARIANCE: &str = "Variance Analysis";
const SHEET_RATIOS: &str = "Financial Ratios";

const VARIANCE_HEADERS: [&str; 6] = [
    "รายการ",
    "แผนก",
    "จำนวนเงิน",
    "เปอร์เซ็นต์",
    "แนวโน้ม",
    "สาเหตุ",
];

const RATIO_HEADERS: [&str; 5] = ["อัตราส่วน", "ค่า", "หน่วย", "สถานะ", "คำอธิบาย"];

fn trend_label(trend: Trend) -> &'static str {
    match trend {
        Trend::Increase => "เพิ่มขึ้น",
        Trend::Decrease => "ลดลง",
    }
}

fn status_label(status: RatioStatus) -> &'static str {
    match status {
        RatioStatus::Good => "ดี",
        RatioStatus::Warning => "เฝ้าระวัง",
        RatioStatus::Critical => "วิกฤต",
    }
}

/// Builds the three-sheet export workbook from a validated result.
///
/// Sheet names and column sets are the observable contract; cell styling is
/// not. Returns the finished `.xlsx` bytes.
pub fn build_workbook(result: &AnalysisResult) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();

    write_report_sheet(workbook.add_worksheet(), result, &bold)?;
    write_variance_sheet(workbook.add_worksheet(), result, &bold)?;
    write_ratio_sheet(workbook.add_worksheet(), result, &bold)?;

    workbook
        .save_to_buffer()
        .map_err(|e| AnalyzerError::Export(e.to_string()))
}

fn write_report_sheet(
    sheet: &mut Worksheet,
    result: &AnalysisResult,
    bold: &Format,
) -> Result<()> {
    sheet
        .set_name(SHEET_REPORT)
        .map_err(|e| AnalyzerError::Export(e.to_string()))?;

    let mut row = 0u32;
    xlsx(sheet.write_string_with_format(row, 0, "รายงานการวิเคราะห์งบการเงิน", bold))?;
    row += 1;
    xlsx(sheet.write_string(
        row,
        0,
        format!("วันที่จัดทำ: {}", Local::now().format("%Y-%m-%d")),
    ))?;
    row += 2;

    xlsx(sheet.write_string_with_format(row, 0, "ภาพรวมการวิเคราะห์", bold))?;
    row += 1;
    xlsx(sheet.write_string(row, 0, &result.overall_analysis))?;
    row += 2;

    xlsx(sheet.write_string_with_format(row, 0, "รายงานฉบับเต็ม", bold))?;
    row += 1;
    for line in result.formal_report.lines() {
        xlsx(sheet.write_string(row, 0, line))?;
        row += 1;
    }

    Ok(())
}

fn write_variance_sheet(
    sheet: &mut Worksheet,
    result: &AnalysisResult,
    bold: &Format,
) -> Result<()> {
    sheet
        .set_name(SHEET_VARIANCE)
        .map_err(|e| AnalyzerError::Export(e.to_string()))?;

    for (col, header) in VARIANCE_HEADERS.iter().enumerate() {
        xlsx(sheet.write_string_with_format(0, col as u16, *header, bold))?;
    }

    for (i, change) in result.significant_changes.iter().enumerate() {
        let row = (i + 1) as u32;
        xlsx(sheet.write_string(row, 0, &change.item))?;
        xlsx(sheet.write_string(row, 1, change.department_or_general()))?;
        xlsx(sheet.write_number(row, 2, change.amount))?;
        xlsx(sheet.write_string(row, 3, &change.percentage))?;
        xlsx(sheet.write_string(row, 4, trend_label(change.trend)))?;
        xlsx(sheet.write_string(row, 5, &change.reason))?;
    }

    Ok(())
}

fn write_ratio_sheet(sheet: &mut Worksheet, result: &AnalysisResult, bold: &Format) -> Result<()> {
    sheet
        .set_name(SHEET_RATIOS)
        .map_err(|e| AnalyzerError::Export(e.to_string()))?;

    for (col, header) in RATIO_HEADERS.iter().enumerate() {
        xlsx(sheet.write_string_with_format(0, col as u16, *header, bold))?;
    }

    for (i, ratio) in result.ratios.iter().enumerate() {
        let row = (i + 1) as u32;
        xlsx(sheet.write_string(row, 0, &ratio.name))?;
        xlsx(sheet.write_number(row, 1, ratio.value))?;
        xlsx(sheet.write_string(row, 2, &ratio.unit))?;
        xlsx(sheet.write_string(row, 3, status_label(ratio.status)))?;
        xlsx(sheet.write_string(row, 4, &ratio.description))?;
    }

    Ok(())
}

fn xlsx<T>(result: std::result::Result<T, rust_xlsxwriter::XlsxError>) -> Result<()> {
    result
        .map(|_| ())
        .map_err(|e| AnalyzerError::Export(e.to_string()))
}
