mod common;
use common::cli::{BtWorkspace, parse_json, run_bt, run_bt_as};
use std::fs;

#[test]
fn test_malformed_lines_are_skipped() {
    let workspace = BtWorkspace::with_accounts();
    fs::write(
        workspace.data_file(),
        "1,Login fails,500,NEW,HIGH,alice,\n2,Too,few,NEW,LOW\n",
    )
    .unwrap();

    let list = run_bt_as(&workspace, "dev", ["list", "--json"], "list");
    assert!(list.status.success(), "list failed: {}", list.stderr);
    let bugs = parse_json(&list);
    assert_eq!(bugs.as_array().unwrap().len(), 1);
    assert_eq!(bugs[0]["id"], 1);
}

#[test]
fn test_unknown_enum_text_loads_as_default() {
    let workspace = BtWorkspace::with_accounts();
    fs::write(
        workspace.data_file(),
        "5,Old bug,From v1,OPEN,URGENT,alice,\n",
    )
    .unwrap();

    let show = run_bt_as(&workspace, "dev", ["show", "5", "--json"], "show");
    let bug = parse_json(&show);
    assert_eq!(bug["status"], "NEW");
    assert_eq!(bug["priority"], "LOW");
    assert_eq!(bug["comments"], serde_json::json!([]));
}

#[test]
fn test_duplicate_ids_act_on_first() {
    let workspace = BtWorkspace::with_accounts();
    fs::write(
        workspace.data_file(),
        "1,First,a,NEW,LOW,x,\n1,Second,b,NEW,LOW,y,\n",
    )
    .unwrap();

    let status = run_bt_as(&workspace, "dev", ["status", "1", "closed"], "status");
    assert!(status.status.success(), "status failed: {}", status.stderr);

    let content = fs::read_to_string(workspace.data_file()).unwrap();
    assert_eq!(
        content,
        "1,First,a,CLOSED,LOW,x,\n1,Second,b,NEW,LOW,y,\n"
    );
}

#[test]
fn test_missing_bug_file_lists_empty() {
    let workspace = BtWorkspace::with_accounts();
    fs::remove_file(workspace.data_file()).unwrap();

    let list = run_bt_as(&workspace, "dev", ["list"], "list");
    assert!(list.status.success(), "list failed: {}", list.stderr);
    assert!(list.stdout.contains("No bugs found."));
}

#[test]
fn test_doctor_reports_skipped_lines() {
    let workspace = BtWorkspace::with_accounts();
    fs::write(
        workspace.data_file(),
        "1,Login fails,500,NEW,HIGH,alice,\nx,bad,id,NEW,LOW,bob,\n",
    )
    .unwrap();

    let doctor = run_bt(&workspace, ["doctor", "--json"], "doctor");
    assert!(doctor.status.success(), "doctor failed: {}", doctor.stderr);
    let report = parse_json(&doctor);
    assert_eq!(report["ok"], true);

    let checks = report["checks"].as_array().unwrap();
    let lines = checks
        .iter()
        .find(|check| check["name"] == "bugs.lines")
        .expect("bugs.lines check");
    assert_eq!(lines["status"], "warn");
    assert_eq!(lines["details"][0]["line"], 2);
}

#[test]
fn test_custom_data_file_from_config() {
    let workspace = BtWorkspace::with_accounts();
    fs::write(
        workspace.root.join(".bugtrack").join("config.yaml"),
        "data_file: tracker.txt\nusers_file: .bugtrack/users.json\n",
    )
    .unwrap();

    let create = run_bt_as(
        &workspace,
        "qa",
        ["create", "Moved", "-d", "x", "-a", "dev"],
        "create",
    );
    assert!(create.status.success(), "create failed: {}", create.stderr);
    let content = fs::read_to_string(workspace.root.join("tracker.txt")).unwrap();
    assert_eq!(content, "1,Moved,x,NEW,LOW,dev,\n");
}

#[test]
fn test_init_twice_fails_without_force() {
    let workspace = BtWorkspace::new();
    assert!(run_bt(&workspace, ["init"], "init").status.success());

    let again = run_bt(&workspace, ["init"], "init_again");
    assert!(!again.status.success());
    assert!(again.stderr.contains("Already initialized"));

    assert!(run_bt(&workspace, ["init", "--force"], "init_force").status.success());
}

#[test]
fn test_failed_write_is_an_error() {
    let workspace = BtWorkspace::with_accounts();
    let create = run_bt_as(
        &workspace,
        "qa",
        ["create", "Login fails", "-d", "500", "-a", "dev"],
        "create",
    );
    assert!(create.status.success(), "create failed: {}", create.stderr);
    let before = fs::read_to_string(workspace.data_file()).unwrap();

    // A non-empty directory where the temp file goes makes every save fail.
    let blocker = workspace.data_file().with_file_name("bugs.txt.tmp");
    fs::create_dir(&blocker).unwrap();
    fs::write(blocker.join("occupied"), "x").unwrap();

    for (args, label) in [
        (vec!["update", "1", "title", "New"], "update"),
        (vec!["status", "1", "closed"], "status"),
        (vec!["comment", "1", "seen"], "comment"),
        (vec!["delete", "1"], "delete"),
    ] {
        let out = run_bt_as(&workspace, "dev", &args, label);
        assert!(!out.status.success(), "{label} should fail");
        assert!(out.stderr.contains("could not write"), "{label}: {}", out.stderr);
        assert!(out.stdout.is_empty(), "{label} printed: {}", out.stdout);
    }

    assert_eq!(fs::read_to_string(workspace.data_file()).unwrap(), before);
}
