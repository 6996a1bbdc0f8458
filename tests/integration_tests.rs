use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use calamine::{open_workbook_auto_from_rs, Reader};
use statement_analyzer::*;
use std::io::Cursor;

const MOCK_RESPONSE: &str = r###"{
    "overallAnalysis": "บริษัทมีผลประกอบการที่แข็งแรง สภาพคล่องอยู่ในเกณฑ์ดี",
    "formalReport": "## 1. บทสรุปผู้บริหาร\n**รายได้รวมเติบโต 12%**\n## 2. ผลการดำเนินงานรายแผนก\nฝ่ายขายทำกำไรสูงสุด\n## 3. สถานะทางการเงินและสภาพคล่อง\nกระแสเงินสดเพียงพอ\n## 4. แนวโน้มและการคาดการณ์\nคาดว่าจะเติบโตต่อเนื่อง\n## 5. ข้อเสนอแนะเชิงกลยุทธ์\nควบคุมต้นทุนขนส่ง",
    "ratios": [
        {"name": "Current Ratio", "value": 1.5, "unit": "เท่า", "status": "good", "description": "สภาพคล่องเพียงพอต่อภาระระยะสั้น"},
        {"name": "Net Profit Margin", "value": 8.2, "unit": "%", "status": "warning", "description": "กำไรสุทธิต่ำกว่าค่าเฉลี่ยอุตสาหกรรมเล็กน้อย"},
        {"name": "Debt to Equity", "value": 2.4, "unit": "เท่า", "status": "critical", "description": "ภาระหนี้สูงเมื่อเทียบกับทุน"}
    ],
    "departments": [
        {"name": "ฝ่ายขาย", "revenue": 2500000.0, "expense": 1800000.0, "profit": 700000.0, "liquidityComment": "หมุนเวียนดี"}
    ],
    "significantChanges": [
        {"item": "ค่าโฆษณาออนไลน์", "relatedDepartment": "การตลาด", "amount": 150000.0, "percentage": "+32%", "trend": "increase", "reason": "เปิดตัวสินค้าใหม่"},
        {"item": "ดอกเบี้ยรับ", "amount": -20000.0, "percentage": "-45%", "trend": "decrease", "reason": "เงินฝากลดลง"}
    ],
    "topHighItems": ["ยอดขายสินค้า A", "ยอดขายสินค้า B"],
    "topLowItems": ["ดอกเบี้ยรับ"]
}"###;

fn sample_workbook_bytes() -> Vec<u8> {
    use rust_xlsxwriter::Workbook;

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.write_string(0, 0, "บัญชี").unwrap();
    sheet.write_string(0, 1, "จำนวนเงิน").unwrap();
    sheet.write_string(1, 0, "รายได้จากการขาย").unwrap();
    sheet.write_number(1, 1, 2500000.0).unwrap();
    sheet.write_string(2, 0, "ค่าใช้จ่ายในการขาย").unwrap();
    sheet.write_number(2, 1, 1800000.0).unwrap();
    workbook.save_to_buffer().unwrap()
}

#[test]
fn test_workbook_ingestion_produces_csv_payload() {
    let bytes = sample_workbook_bytes();
    let uploaded = ingest_bytes("statement.xlsx", None, &bytes).unwrap();

    assert_eq!(uploaded.mime_type, "text/csv");
    let csv_text = String::from_utf8(BASE64.decode(&uploaded.payload).unwrap()).unwrap();
    assert!(csv_text.contains("รายได้จากการขาย"));
    assert!(csv_text.contains("2500000"));
}

#[test]
fn test_pdf_ingestion_round_trips_bytes() {
    let bytes = b"%PDF-1.7 minimal";
    let uploaded = ingest_bytes("statement.pdf", Some("application/pdf"), bytes).unwrap();
    assert_eq!(uploaded.mime_type, "application/pdf");
    assert_eq!(BASE64.decode(&uploaded.payload).unwrap(), bytes);
}

#[tokio::test(start_paused = true)]
async fn test_successful_pipeline_reaches_result_state() {
    let mut controller = AppController::new();
    let result = parse_analysis_response(MOCK_RESPONSE).unwrap();

    let state = controller.run_analysis(async { Ok(result) }).await;

    let AppState::Result(result) = state else {
        panic!("expected Result state, got {:?}", state);
    };
    assert_eq!(result.ratios.len(), 3);
    assert_eq!(result.ratios[0].value, 1.5);
    assert_eq!(result.ratios[0].status, RatioStatus::Good);
    assert_eq!(result.significant_changes[1].related_department, None);
    assert_eq!(
        result.significant_changes[1].department_or_general(),
        DEFAULT_DEPARTMENT
    );
}

#[tokio::test(start_paused = true)]
async fn test_fenced_model_output_still_reaches_result_state() {
    let fenced = format!("```json\n{}\n```", MOCK_RESPONSE);
    let mut controller = AppController::new();

    let state = controller
        .run_analysis(async move { parse_analysis_response(&fenced) })
        .await;
    assert!(matches!(state, AppState::Result(_)));
}

#[tokio::test(start_paused = true)]
async fn test_schema_violation_lands_in_error_never_result() {
    let bad = MOCK_RESPONSE.replace("\"increase\"", "\"sideways\"");
    let mut controller = AppController::new();

    let state = controller
        .run_analysis(async move { parse_analysis_response(&bad) })
        .await;

    assert!(matches!(state, AppState::Error(_)));

    // Reset is the only recovery path and must leave nothing behind.
    controller.dispatch(Event::Reset);
    assert_eq!(*controller.state(), AppState::Upload);
}

#[tokio::test(start_paused = true)]
async fn test_oversized_upload_fails_before_any_session_starts() {
    let mut controller = AppController::new();
    let client = GeminiClient::new("test-key");
    let oversized = vec![0u8; MAX_UPLOAD_BYTES + 1];

    let outcome = analyze_file(
        &mut controller,
        &client,
        "huge.pdf",
        Some("application/pdf"),
        &oversized,
    )
    .await;

    assert!(matches!(outcome, Err(AnalyzerError::FileTooLarge { .. })));
    // Ingestion failures alert the user and stay on the upload view.
    assert_eq!(*controller.state(), AppState::Upload);
}

#[test]
fn test_export_round_trip_preserves_contract_sheets() {
    let result = parse_analysis_response(MOCK_RESPONSE).unwrap();
    let bytes = build_workbook(&result).unwrap();

    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes)).unwrap();
    assert_eq!(
        workbook.sheet_names(),
        vec![
            "Executive Report".to_string(),
            "Variance Analysis".to_string(),
            "Financial Ratios".to_string()
        ]
    );

    let variance = workbook.worksheet_range("Variance Analysis").unwrap();
    // Header plus one row per significant change.
    assert_eq!(variance.rows().count(), 3);

    let ratios = workbook.worksheet_range("Financial Ratios").unwrap();
    assert_eq!(ratios.rows().count(), 4);
}

#[test]
fn test_from_env_requires_a_credential() {
    std::env::remove_var(API_KEY_ENV);
    assert!(matches!(
        GeminiClient::from_env(),
        Err(AnalyzerError::Configuration(_))
    ));

    std::env::set_var(API_KEY_ENV, "test-key");
    assert!(GeminiClient::from_env().is_ok());
    std::env::remove_var(API_KEY_ENV);
}
