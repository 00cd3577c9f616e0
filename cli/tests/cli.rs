use assert_cmd::Command;
use predicates::prelude::*;

fn calculadora() -> Command {
    let mut cmd = Command::cargo_bin("calculadora").unwrap();
    cmd.env("NO_COLOR", "1")
        .env("CALCULADORA_CONFIG", "/nonexistent/calculadora.toml")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn evaluates_arguments_in_order() {
    calculadora()
        .args(["2 + 3 * 4", "U ^ 2", "10 / 4"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("= 14\n")
                .and(predicate::str::contains("= 196\n"))
                .and(predicate::str::contains("= 2.5\n")),
        );
}

#[test]
fn reports_failed_expressions() {
    calculadora()
        .args(["5 / 0", "1 +"])
        .assert()
        .failure()
        .stderr(
            predicate::str::contains("cannot divide by zero")
                .and(predicate::str::contains("invalid expression"))
                .and(predicate::str::contains("2 of 2 expressions failed")),
        );
}

#[test]
fn menu_sum_then_exit() {
    calculadora()
        .arg("--no-clear")
        .write_stdin("1\n2\n3\n\n0\n")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("2 + 3 = 5")
                .and(predicate::str::contains("Thank you for using the calculator!")),
        );
}

#[test]
fn menu_retries_zero_divisor() {
    calculadora()
        .arg("--no-clear")
        .write_stdin("4\n9\n0\n2\n\n0\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("9 ÷ 2 = 4.5"))
        .stderr(predicate::str::contains("cannot divide by zero"));
}

#[test]
fn end_of_input_exits_gracefully() {
    calculadora()
        .arg("--no-clear")
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::contains("Program interrupted by the user!"));
}

#[test]
fn saves_history_to_directory() {
    let dir = tempfile::tempdir().unwrap();
    calculadora()
        .arg("--no-clear")
        .arg("--save-dir")
        .arg(dir.path())
        .write_stdin("9\n5\n\nG\nconta\n\n0\n")
        .assert()
        .success();
    let saved = std::fs::read_to_string(dir.path().join("conta.json")).unwrap();
    assert!(saved.contains("\"expression\": \"5!\""));
    assert!(saved.contains("\"kind\": \"Factorial\""));
}

#[test]
fn deeply_nested_argument_fails_cleanly() {
    let nested = format!("{}1{}", "(".repeat(20_000), ")".repeat(20_000));
    calculadora()
        .arg(nested)
        .assert()
        .code(1)
        .stderr(
            predicate::str::contains("invalid expression")
                .and(predicate::str::contains("1 of 1 expressions failed")),
        );
}

#[test]
fn menu_survives_deeply_nested_expression() {
    calculadora()
        .arg("--no-clear")
        .write_stdin(format!("E\n{}1\n\nE\n2 ^ 10\n\n0\n", "-".repeat(60_000)))
        .assert()
        .success()
        .stdout(
            predicate::str::contains("2 ^ 10 = 1024")
                .and(predicate::str::contains("Thank you for using the calculator!")),
        )
        .stderr(predicate::str::contains("invalid expression"));
}

#[test]
fn verbose_menu_logs_to_stderr() {
    calculadora()
        .args(["--no-clear", "-v"])
        .write_stdin("1\n2\n3\n\n0\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("2 + 3 = 5"))
        .stderr(predicate::str::contains("operation recorded"));
}
