use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

#[test]
fn test_malformed_csv_handling() {
    let output_path = std::path::PathBuf::from("robustness_test.csv");
    let mut wtr = csv::Writer::from_path(&output_path).unwrap();
    wtr.write_record(["command", "account", "source", "destination", "amount", "currency"])
        .unwrap();

    wtr.write_record(["create", "", "", "", "1.00", "USD"]).unwrap();
    // Unknown command
    wtr.write_record(["withdraw", "1000000001", "", "", "1.00", "USD"])
        .unwrap();
    wtr.write_record(["create", "", "", "", "2.00", "USD"]).unwrap();
    wtr.write_record(["balance", "1000000002", "", "", "", ""])
        .unwrap();
    wtr.flush().unwrap();
    drop(wtr);

    let mut cmd = Command::new(cargo_bin!("txledger"));
    cmd.arg(&output_path);

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("Error reading command"))
        .stdout(predicate::str::contains("1,create,success,,1000000001"))
        .stdout(predicate::str::contains("3,create,success,,1000000002"))
        .stdout(predicate::str::contains("4,balance,success,,2.00 USD"));

    std::fs::remove_file(output_path).ok();
}

#[test]
fn test_invalid_parameters() {
    let output_path = std::path::PathBuf::from("invalid_parameters_test.csv");
    let mut wtr = csv::Writer::from_path(&output_path).unwrap();
    wtr.write_record(["command", "account", "source", "destination", "amount", "currency"])
        .unwrap();

    // Text in amount field
    wtr.write_record(["create", "", "", "", "not_a_number", "USD"])
        .unwrap();
    // Wrong precision for the currency
    wtr.write_record(["create", "", "", "", "1.5", "USD"]).unwrap();
    // Unsupported currency
    wtr.write_record(["create", "", "", "", "1.00", "GBP"]).unwrap();
    // Non-numeric account
    wtr.write_record(["balance", "abc", "", "", "", ""]).unwrap();
    // Missing source
    wtr.write_record(["transfer", "", "", "1000000001", "1.00", "USD"])
        .unwrap();
    // Zero amount
    wtr.write_record(["transfer", "", "1000000001", "1000000002", "0.00", "USD"])
        .unwrap();
    // Signed account number
    wtr.write_record(["balance", "+1000000001", "", "", "", ""]).unwrap();
    wtr.flush().unwrap();
    drop(wtr);

    let mut cmd = Command::new(cargo_bin!("txledger"));
    cmd.arg(&output_path);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "1,create,validation,balanceInvalid,Balance sum must be a decimal number",
        ))
        .stdout(predicate::str::contains(
            "2,create,validation,balanceInvalid,Balance sum must have 2 decimal places",
        ))
        .stdout(predicate::str::contains(
            "3,create,validation,balanceInvalid,Balance currency is not supported",
        ))
        .stdout(predicate::str::contains(
            "4,balance,validation,uidInvalid,Parameter 'uid' is invalid",
        ))
        .stdout(predicate::str::contains("5,transfer,validation,sourceNotProvided,"))
        .stdout(predicate::str::contains(
            "6,transfer,validation,amountInvalid,Amount to transfer must be positive",
        ))
        .stdout(predicate::str::contains(
            "7,balance,validation,uidInvalid,Parameter 'uid' is invalid",
        ));

    std::fs::remove_file(output_path).ok();
}
