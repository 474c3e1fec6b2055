use predicates::prelude::*;

#[test]
fn evm_prints_reference_metrics() {
    let mut cmd = assert_cmd::cargo_bin_cmd!("sitecast");
    cmd.args([
        "evm",
        "--bac",
        "1000000",
        "--ac",
        "500000",
        "--percent-complete",
        "45",
        "--planned-percent",
        "50",
    ]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("PV | 500000.00"))
        .stdout(predicate::str::contains("EV | 450000.00"))
        .stdout(predicate::str::contains("SPI | 0.90"))
        .stdout(predicate::str::contains("CPI | 0.90"))
        .stdout(predicate::str::contains("EAC | 1111111.11"))
        .stdout(predicate::str::contains("VAC | -111111.11"));
}

#[test]
fn evm_rejects_out_of_range_progress() {
    let mut cmd = assert_cmd::cargo_bin_cmd!("sitecast");
    cmd.args([
        "evm",
        "--bac",
        "1000",
        "--ac",
        "10",
        "--percent-complete",
        "140",
        "--planned-percent",
        "50",
    ]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains(
            "Failed to compute earned value metrics: percent_complete must be within [0, 100], got 140",
        ));
}
