use assert_cmd::Command;
use predicates::prelude::*;

const TOPIC: &str = "arn:aws:sns:us-west-2:123456789012:bucket-events";

fn cli() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_sns-policy-grant"));
    // Keep ambient AWS settings from leaking into argument handling.
    cmd.env_remove("AWS_REGION").env_remove("AWS_PROFILE");
    cmd
}

#[test]
fn help_lists_actions() {
    cli()
        .arg("--help")
        .assert()
        .code(0)
        .stdout(predicate::str::contains("BULK_GRANT"))
        .stdout(predicate::str::contains("--addressing"));
}

#[test]
fn version_exits_zero() {
    cli().arg("--version").assert().code(0);
}

#[test]
fn missing_arguments_exit_one() {
    cli()
        .args([TOPIC, "my-bucket"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("ACTION"));
}

#[test]
fn unknown_action_exits_one() {
    cli()
        .args([TOPIC, "my-bucket", "UPSERT"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn invalid_topic_arn_exits_one() {
    cli()
        .args([
            "arn:aws:sqs:us-west-2:123456789012:queue",
            "my-bucket",
            "GRANT",
        ])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("not a valid SNS topic ARN"));
}

#[test]
fn bulk_grant_with_account_addressing_exits_one() {
    cli()
        .args([
            TOPIC,
            "123456789012",
            "BULK_GRANT",
            "--addressing",
            "source-account",
        ])
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "BULK_GRANT is not supported with source-account addressing",
        ));
}

#[test]
fn delete_with_account_addressing_exits_one() {
    cli()
        .args([
            TOPIC,
            "123456789012",
            "delete",
            "--addressing",
            "source-account",
        ])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("DELETE is not supported"));
}

#[test]
fn malformed_account_id_exits_one() {
    cli()
        .args([
            TOPIC,
            "not-an-account",
            "GRANT",
            "--addressing",
            "source-account",
        ])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("not a valid AWS account id"));
}

#[test]
fn zero_bulk_count_exits_one() {
    cli()
        .args([TOPIC, "bucket", "BULK_GRANT", "--count", "0"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("at least 1"));
}

#[test]
fn oversized_bulk_count_exits_one() {
    cli()
        .args([TOPIC, "bucket", "BULK_GRANT", "--count", "100000"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("at most 5000"));
}
