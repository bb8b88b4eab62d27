use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn blackjack() -> Command {
    Command::cargo_bin("blackjack").expect("binary built")
}

#[test]
fn auto_session_stops_at_round_cap() {
    blackjack()
        .args(["--auto", "--seed", "7", "--rounds", "3", "--name", "Ada"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--==((Ada))==--"))
        .stdout(predicate::str::contains("Player: Ada, Credits Remaining:"))
        .stdout(predicate::str::contains("after 3 rounds"));
}

#[test]
fn seeded_sessions_replay_identically() {
    let run = || {
        blackjack()
            .args(["--auto", "--seed", "99", "--rounds", "10", "--name", "Ada"])
            .output()
            .expect("run blackjack")
            .stdout
    };
    assert_eq!(run(), run());
}

#[test]
fn interactive_round_reads_answers_from_stdin() {
    blackjack()
        .args(["--seed", "1", "--rounds", "1", "--name", "Ada"])
        .write_stdin("10\nn\nn\nn\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "What would you like to bet? (100 credits, default 5)",
        ))
        .stdout(predicate::str::contains("Dealer: "))
        .stdout(predicate::str::contains("(10 credits)"))
        .stdout(predicate::str::contains("Player: Ada, Credits Remaining:"));
}

#[test]
fn rejected_bets_are_asked_again() {
    blackjack()
        .args(["--seed", "1", "--rounds", "1", "--name", "Ada"])
        .write_stdin("500\n2\n10\nn\nn\nn\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Cannot bet more money than you have."))
        .stdout(predicate::str::contains(
            "Bet must be greater than the minimum bet.",
        ));
}

#[test]
fn closed_stdin_plays_minimum_bets_until_the_cap() {
    blackjack()
        .args(["--seed", "4", "--rounds", "2", "--name", "Ada"])
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::contains("Betting the minimum of 5 credits."))
        .stdout(predicate::str::contains("after 2 rounds"));
}

#[test]
fn json_mode_emits_one_record_per_round_and_a_summary() {
    let output = blackjack()
        .args(["--auto", "--json", "--seed", "3", "--rounds", "2"])
        .output()
        .expect("run blackjack");
    assert!(output.status.success());

    let text = String::from_utf8(output.stdout).expect("utf8");
    let records: Vec<serde_json::Value> = text
        .lines()
        .map(|line| serde_json::from_str(line).expect("json line"))
        .collect();
    assert_eq!(records.len(), 3);
    assert!(records[0].get("credits_after").is_some());
    assert_eq!(records[2]["rounds_played"], 2);
    assert_eq!(records[2]["starting_credits"], 100);
    assert_eq!(records[2]["final_credits"], records[1]["credits_after"]);
}

#[test]
fn json_mode_keeps_interactive_prompts_off_stdout() {
    let output = blackjack()
        .args(["--json", "--seed", "1", "--rounds", "1", "--name", "Ada"])
        .write_stdin("10\nn\nn\nn\n")
        .output()
        .expect("run blackjack");
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).expect("utf8");
    let records: Vec<serde_json::Value> = stdout
        .lines()
        .map(|line| serde_json::from_str(line).expect("every stdout line is json"))
        .collect();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["credits_before"], 100);
    assert_eq!(records[0]["hands"][0]["bet"], 10);
    assert_eq!(records[1]["rounds_played"], 1);

    let stderr = String::from_utf8(output.stderr).expect("utf8");
    assert!(stderr.contains("What would you like to bet? (100 credits, default 5)"));
    assert!(stderr.contains("Hit? (y/n)"));
}

#[test]
fn validate_only_accepts_a_config_file() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("table.yaml");
    fs::write(
        &path,
        r#"
player:
  name: "Ada"
  credits: 250
table:
  minimum_bet: 10
  jokers: true
"#,
    )
    .expect("write config");

    blackjack()
        .arg("--config")
        .arg(&path)
        .arg("--validate-only")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Configuration valid: 250 credits, minimum bet 10, jokers in play",
        ));
}

#[test]
fn invalid_config_is_reported() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("table.yaml");
    fs::write(&path, "table:\n  minimum_bet: 0\n").expect("write config");

    blackjack()
        .arg("--config")
        .arg(&path)
        .arg("--validate-only")
        .assert()
        .failure()
        .stderr(predicate::str::contains("table.minimum_bet"));
}

#[test]
fn log_file_receives_json_events() {
    let dir = tempdir().expect("temp dir");
    let log_path = dir.path().join("logs").join("table.jsonl");
    let config_path = dir.path().join("table.yaml");
    fs::write(
        &config_path,
        format!(
            "logging:\n  level: \"info\"\n  file: \"{}\"\n",
            log_path.display()
        ),
    )
    .expect("write config");

    blackjack()
        .arg("--config")
        .arg(&config_path)
        .args(["--auto", "--seed", "5", "--rounds", "2"])
        .env_remove("RUST_LOG")
        .assert()
        .success();

    let logs = fs::read_to_string(&log_path).expect("log file written");
    assert!(logs.contains("round settled"));
    assert!(logs.contains("session finished"));
}
