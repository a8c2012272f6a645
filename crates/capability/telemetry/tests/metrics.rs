use crm_telemetry::{
    metrics, new_run_id, record_corrupt_read, record_evaluation, record_scheme_applied,
};

#[test]
fn run_id_non_empty() {
    let first = new_run_id();
    let second = new_run_id();
    assert!(!first.is_empty());
    assert_ne!(first, second);
}

#[test]
fn counters_accumulate() {
    let before = metrics().snapshot();
    record_evaluation(10, 3);
    record_scheme_applied();
    record_corrupt_read();
    let after = metrics().snapshot();

    assert!(after.records_evaluated >= before.records_evaluated + 10);
    assert!(after.records_matched >= before.records_matched + 3);
    assert!(after.schemes_applied >= before.schemes_applied + 1);
    assert!(after.corrupt_reads >= before.corrupt_reads + 1);
}
