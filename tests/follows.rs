// Export-to-report scenarios and the command-line wrapper.
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use symtable_follows::{compare, extract_usernames, read_export, Account, LoadError, SymTable};

const EPOCH: u64 = 1_700_000_000;

/// Export listing `names`; the i-th entry is timestamped `EPOCH + i`.
fn export(names: &[&str]) -> String {
    let entries: Vec<String> = names
        .iter()
        .zip(EPOCH..)
        .map(|(n, ts)| {
            format!(
                r#"{{"title": "", "media_list_data": [], "string_list_data": [{{"href": "https://www.instagram.com/{n}", "value": "{n}", "timestamp": {ts}}}]}}"#
            )
        })
        .collect();
    format!("[{}]", entries.join(",\n"))
}

fn table(names: &[&str]) -> SymTable<Option<u64>> {
    let mut t = SymTable::new();
    extract_usernames(&export(names), &mut t);
    t
}

/// Scratch file unique to this test process.
fn scratch(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "symtable-follows-{}-{name}",
        std::process::id()
    ));
    fs::write(&path, contents).expect("write scratch file");
    path
}

#[test]
fn alice_and_dave_are_one_sided() {
    let following = table(&["alice", "bob", "carol"]);
    let followers = table(&["bob", "carol", "dave"]);
    let diff = compare(&following, &followers);
    let alice = Account {
        username: "alice".into(),
        timestamp: Some(EPOCH),
    };
    let dave = Account {
        username: "dave".into(),
        timestamp: Some(EPOCH + 2),
    };
    assert_eq!(diff.not_following_back, vec![alice]);
    assert_eq!(diff.not_followed_by_you, vec![dave]);
}

#[test]
fn entries_without_timestamps_still_compare() {
    let mut following = SymTable::new();
    let mut followers = SymTable::new();
    extract_usernames(r#"[{"value": "alice"}, {"value": "bob"}]"#, &mut following);
    extract_usernames(r#"[{"value": "bob", "timestamp": 5}]"#, &mut followers);

    let diff = compare(&following, &followers);
    assert_eq!(diff.not_following_back.len(), 1);
    assert_eq!(diff.not_following_back[0].timestamp, None);
    assert!(diff.not_followed_by_you.is_empty());
    assert_eq!(
        diff.to_string(),
        "People you follow but don't follow you back:\n\
         alice does not follow you back.\n\
         \n\
         People who follow you but you don't follow back:\n"
    );
}

#[test]
fn identical_sets_report_nothing() {
    let names = ["alice", "bob", "carol", "dave"];
    let diff = compare(&table(&names), &table(&names));
    assert!(diff.is_empty());
}

#[test]
fn large_exports_compare_across_growth() {
    let following: Vec<String> = (0..3000).map(|i| format!("f{i}")).collect();
    let followers: Vec<String> = (1000..4500).map(|i| format!("f{i}")).collect();
    let a = table(&following.iter().map(String::as_str).collect::<Vec<_>>());
    let b = table(&followers.iter().map(String::as_str).collect::<Vec<_>>());
    assert_eq!(a.len(), 3000);
    assert_eq!(b.len(), 3500);

    let diff = compare(&a, &b);
    assert_eq!(diff.not_following_back.len(), 1000);
    assert_eq!(diff.not_followed_by_you.len(), 1500);
    assert!(diff.not_following_back.iter().all(|n| !b.contains(&n.username)));
    assert!(diff.not_followed_by_you.iter().all(|n| !a.contains(&n.username)));
    assert!(diff.not_following_back.iter().all(|n| n.timestamp.is_some()));
}

#[test]
fn read_export_roundtrips_file_contents() {
    let text = export(&["zoë"]);
    let path = scratch("read.json", &text);
    assert_eq!(read_export(&path).unwrap(), text);
    fs::remove_file(path).ok();
}

#[test]
fn read_export_rejects_non_utf8() {
    let path = std::env::temp_dir().join(format!(
        "symtable-follows-{}-bad.json",
        std::process::id()
    ));
    fs::write(&path, [0xffu8, 0xfe, 0x00]).unwrap();
    assert!(matches!(read_export(&path), Err(LoadError::Utf8 { .. })));
    fs::remove_file(path).ok();
}

fn cli() -> Command {
    Command::new(env!("CARGO_BIN_EXE_symtable-follows"))
}

#[test]
fn cli_prints_report() {
    let following = scratch("cli-following.json", &export(&["alice", "bob", "carol"]));
    let followers = scratch("cli-followers.json", &export(&["bob", "carol", "dave"]));

    let out = cli().arg(&following).arg(&followers).output().unwrap();
    assert!(out.status.success());
    let stdout = String::from_utf8(out.stdout).unwrap();
    assert!(stdout.contains("alice does not follow you back. (since 1700000000)\n"));
    assert!(stdout.contains("dave is not followed by you. (since 1700000002)\n"));
    assert!(!stdout.contains("bob does not"));
    assert!(!stdout.contains("carol is not"));

    fs::remove_file(following).ok();
    fs::remove_file(followers).ok();
}

#[test]
fn cli_uses_default_filenames() {
    let dir = std::env::temp_dir().join(format!(
        "symtable-follows-{}-defaults",
        std::process::id()
    ));
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("following.json"), export(&["x"])).unwrap();
    fs::write(dir.join("followers.json"), export(&["y"])).unwrap();

    let out = cli().current_dir(&dir).output().unwrap();
    assert!(out.status.success());
    let stdout = String::from_utf8(out.stdout).unwrap();
    assert!(stdout.contains("x does not follow you back."));
    assert!(stdout.contains("y is not followed by you."));

    fs::remove_dir_all(dir).ok();
}

#[test]
fn cli_rejects_wrong_argument_count() {
    let out = cli().arg("only-one.json").output().unwrap();
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8(out.stderr).unwrap();
    assert!(stderr.contains("Usage:"));
}

#[test]
fn cli_fails_on_missing_file() {
    let present = scratch("cli-present.json", &export(&["a"]));
    let missing = std::env::temp_dir().join("symtable-follows-no-such-export.json");

    let out = cli().arg(&present).arg(&missing).output().unwrap();
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8(out.stderr).unwrap();
    assert!(stderr.contains("Error reading files."));

    fs::remove_file(present).ok();
}
