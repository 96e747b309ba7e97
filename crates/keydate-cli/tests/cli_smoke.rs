use assert_cmd::Command;
use serde_json::Value;
use std::fs;

fn keydate() -> Command {
    let exe = assert_cmd::cargo_bin!("keydate-cli");
    let mut cmd = Command::new(exe);
    cmd.env_remove("KEYDATE_LOCAL_OFFSET").env_remove("RUST_LOG");
    cmd
}

fn stdout_json(cmd: &mut Command) -> Vec<Value> {
    let output = cmd.assert().success().get_output().stdout.clone();
    let value: Value = serde_json::from_slice(&output).expect("stdout is JSON");
    value.as_array().expect("JSON array").clone()
}

#[test]
fn cli_reports_every_outcome_in_key_order() {
    let rows = stdout_json(keydate().args([
        "--local-offset",
        "0",
        "1533959781804",
        "(3)(7)20220131",
        "x-garbage",
        "garbage",
    ]));
    assert_eq!(rows.len(), 4);

    assert_eq!(rows[0]["key"], "1533959781804");
    assert_eq!(rows[0]["status"], "found");
    assert_eq!(rows[0]["source"], "direct_number");
    assert_eq!(rows[0]["epochMillis"], 1_533_959_781_804_i64);
    assert_eq!(rows[0]["iso"], "2018-08-11T03:56:21.804Z");
    assert!(rows[0]["label"].is_null());

    assert_eq!(rows[1]["source"], "prefixed_index");
    assert_eq!(rows[1]["epochMillis"], 20_220_131);

    assert_eq!(rows[2]["status"], "invalid");
    assert_eq!(rows[2]["source"], "dash_suffix");
    assert!(rows[2]["epochMillis"].is_null());

    assert_eq!(rows[3]["status"], "not_found");
    assert!(rows[3]["source"].is_null());
}

#[test]
fn cli_logs_one_warning_per_unlocatable_key() {
    let output = keydate()
        .args(["--local-offset", "0", "garbage", "2018-02-18", "A-[B"])
        .assert()
        .success()
        .get_output()
        .clone();
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(
        stderr.matches("unable to locate a date token").count(),
        2,
        "{stderr}"
    );
    assert!(stderr.contains("unterminated_bracket"), "{stderr}");
}

#[test]
fn cli_reads_keys_from_a_lines_file_and_formats_labels() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let path = tmp.path().join("keys.txt");
    fs::write(
        &path,
        "DATASET.SLOT->[2018-02-18 19:00:00]\r\n\nCOUNTRY.SLOT->[00 03,5]\n",
    )
    .expect("write keys");

    let rows = stdout_json(keydate().args([
        "--local-offset",
        "0",
        "--label",
        "YYYY-MM-DD HH:mm",
        "--lines",
        path.to_string_lossy().as_ref(),
    ]));
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["label"], "2018-02-18 19:00");
    assert_eq!(rows[0]["source"], "bracketed");
    assert_eq!(rows[1]["iso"], "2003-05-01T00:00:00.000Z");
}

#[test]
fn cli_reads_keys_from_stdin_by_default() {
    let rows = stdout_json(
        keydate()
            .args(["--local-offset", "0"])
            .write_stdin("2018-02-18\nNov 04 2019 15:15\n"),
    );
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["iso"], "2018-02-18T00:00:00.000Z");
    assert_eq!(rows[1]["iso"], "2019-11-04T15:15:00.000Z");
}

#[test]
fn local_offset_precedence_is_flag_then_env_then_config() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let config = tmp.path().join("keydate.json");
    fs::write(
        &config,
        r#"{ "localOffsetMinutes": 120, "labelFormat": "HH:mm Z" }"#,
    )
    .expect("write config");
    let config = config.to_string_lossy().to_string();
    let key = "DATASET.SLOT->[2018-02-18 19:00:00]";
    let utc_19h = 1_518_980_400_000_i64;

    let rows = stdout_json(keydate().args(["--config", config.as_str(), key]));
    assert_eq!(rows[0]["epochMillis"], utc_19h - 2 * 3_600_000);
    assert_eq!(rows[0]["label"], "19:00 +02:00");

    let rows = stdout_json(
        keydate()
            .env("KEYDATE_LOCAL_OFFSET", "60")
            .args(["--config", config.as_str(), key]),
    );
    assert_eq!(rows[0]["epochMillis"], utc_19h - 3_600_000);

    let rows = stdout_json(
        keydate()
            .env("KEYDATE_LOCAL_OFFSET", "60")
            .args(["--config", config.as_str(), "--local-offset", "-300", key]),
    );
    assert_eq!(rows[0]["epochMillis"], utc_19h + 5 * 3_600_000);
    assert_eq!(rows[0]["label"], "19:00 -05:00");
}

#[test]
fn cli_rejects_bad_usage_and_bad_config() {
    keydate().args(["--local-offset"]).assert().code(2);
    keydate().args(["--bogus", "k"]).assert().code(2);

    let tmp = tempfile::tempdir().expect("tempdir");
    let config = tmp.path().join("bad.json");
    fs::write(&config, r#"{ "timezone": "UTC" }"#).expect("write config");
    keydate()
        .args(["--config", config.to_string_lossy().as_ref(), "k"])
        .assert()
        .code(1);

    keydate()
        .args(["--local-offset", "100000", "k"])
        .assert()
        .code(1);

    keydate()
        .env("KEYDATE_LOCAL_OFFSET", "east")
        .args(["k"])
        .assert()
        .code(1);
}
