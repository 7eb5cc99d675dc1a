#![expect(
    clippy::unwrap_used,
    clippy::panic,
    reason = "test code uses unwrap/panic for concise assertions"
)]

use solana_log_tree::{
    InvocationStatus, ParsedLogResult, ProgramSelector, STREAM_END_REASON, parse_basic,
    parse_logs_from_json,
};

const PROGRAM_A: &str = "9RX7oz3WN5VRTqekBBHBvEJFVMNRnrCmVy7S6B6S5oU7";
const PROGRAM_B: &str = "AbcdefGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL";
const SYSTEM_PROGRAM: &str = "11111111111111111111111111111111";
const ZETA_PROGRAM: &str = "ZETAxsqBRek56DhiGXrn75yj2NHU3aYUnxvHXpkf3aD";
const SLOW_PROGRAM: &str = "s1owa2k7P2kkLEenZPKuGddWMVpy8Pt2oMVeBdtSHM6";

fn load_fixture(filename: &str) -> String {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    let path = format!("{manifest_dir}/tests/fixtures/{filename}");
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("failed to read {path}: {e}"))
}

fn load_logs(filename: &str) -> Vec<String> {
    let data = load_fixture(filename);
    serde_json::from_str(&data).unwrap_or_else(|e| panic!("failed to parse {filename}: {e}"))
}

#[test]
fn reference_notification_end_to_end() {
    let payload = load_fixture("reference_notification.json");
    let selector = ProgramSelector::new(&[PROGRAM_A.to_string(), PROGRAM_B.to_string()]);
    let results = parse_logs_from_json(&payload, &selector).unwrap();

    assert_eq!(results.len(), 2);

    let first = &results[0];
    assert_eq!(first.program_id.as_deref(), Some(PROGRAM_A));
    assert_eq!(first.slot, Some(219_907_401));
    assert_eq!(
        first.signature.as_deref(),
        Some("pF5oPR8R4vJwU2KeQm8BAAGYcTiikZkpJAmP8TuuVztkL2K6wZhxVKy9t6jSCMSpMMD3VE6Qek1YL5JAFvuBLQw")
    );
    assert_eq!(first.transaction_error, None);

    let context = first.context.as_ref().unwrap();
    assert_eq!(context.status, InvocationStatus::Success);
    assert_eq!(context.depth, 1);
    assert_eq!(context.compute_used, Some(59_783));
    assert_eq!(context.compute_budget, Some(200_000));
    assert_eq!(context.logs.len(), 2);
    assert_eq!(context.children.len(), 1);
    assert_eq!(context.children[0].program_id, SYSTEM_PROGRAM);
    assert_eq!(context.children[0].depth, 2);
    assert_eq!(context.children[0].status, InvocationStatus::Success);

    let second = &results[1];
    assert_eq!(second.program_id.as_deref(), Some(PROGRAM_B));
    let context = second.context.as_ref().unwrap();
    assert_eq!(
        context.status,
        InvocationStatus::Failed("Program failed to complete".to_string())
    );
    assert!(context.children.is_empty());
    // The runtime's complete-failure line stays with the frame's logs.
    assert!(
        context
            .logs
            .iter()
            .any(|l| l.starts_with("Invoked an instruction with data that is too large"))
    );
}

#[test]
fn reference_notification_filter_single_program() {
    let payload = load_fixture("reference_notification.json");

    let only_b = ProgramSelector::new(&[PROGRAM_B.to_string()]);
    let results = parse_logs_from_json(&payload, &only_b).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].program_id.as_deref(), Some(PROGRAM_B));

    let wildcard = ProgramSelector::new_all_programs();
    let results = parse_logs_from_json(&payload, &wildcard).unwrap();
    assert_eq!(results.len(), 2);
}

#[test]
fn zeta_transaction_data_and_return() {
    let logs = load_logs("zeta_logs.json");
    let results = parse_basic(&logs, &ProgramSelector::new_all_programs());

    assert_eq!(results.len(), 1);
    let context = results[0].context.as_ref().unwrap();
    assert_eq!(context.program_id, ZETA_PROGRAM);
    assert_eq!(context.status, InvocationStatus::Success);
    assert_eq!(context.compute_used, Some(36_432));
    assert_eq!(context.compute_budget, Some(1_015_220));
    assert_eq!(context.return_data.as_deref(), Some("AQIDBA=="));
    // Two log messages and one data payload, in order.
    assert_eq!(context.logs.len(), 3);
    assert!(context.logs[2].starts_with("f8oPt8jABAy1K0GK"));
}

#[test]
fn truncated_stream_keeps_open_frame_and_trailing_lines() {
    let logs = load_logs("truncated_logs.json");
    let results = parse_basic(&logs, &ProgramSelector::new_all_programs());

    // ComputeBudget, first mint, then the unfinished second mint.
    assert_eq!(results.len(), 3);
    assert_eq!(
        results[0].program_id.as_deref(),
        Some("ComputeBudget111111111111111111111111111111")
    );

    let finished = results[1].context.as_ref().unwrap();
    assert_eq!(finished.program_id, SLOW_PROGRAM);
    assert_eq!(finished.status, InvocationStatus::Success);
    assert_eq!(finished.children.len(), 2);
    assert_eq!(finished.compute_used, Some(56_082));

    let unfinished = results[2].context.as_ref().unwrap();
    assert_eq!(unfinished.program_id, SLOW_PROGRAM);
    assert_eq!(
        unfinished.status,
        InvocationStatus::Failed(STREAM_END_REASON.to_string())
    );
    // Marker and post-marker lines stay with the open frame.
    assert_eq!(
        unfinished.logs,
        vec![
            "Instruction: Mint".to_string(),
            "Log truncated".to_string(),
            "Instruction: Mint".to_string(),
        ]
    );
}

#[test]
fn results_roundtrip_through_json() {
    let payload = load_fixture("reference_notification.json");
    let results =
        parse_logs_from_json(&payload, &ProgramSelector::new_all_programs()).unwrap();

    for result in &results {
        let json = result.to_json().unwrap();
        let back: ParsedLogResult = serde_json::from_str(&json).unwrap();
        assert_eq!(&back, result);
    }
}
