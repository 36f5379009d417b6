use smb_auth_sweep::wordlist::{parse_wordlist_str, Wordlist};
use std::fs;
use std::path::PathBuf;

fn temp_file(name: &str, content: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "smb-auth-sweep-{}-{name}",
        std::process::id()
    ));
    fs::write(&path, content).expect("write temp wordlist");
    path
}

#[test]
fn load_trims_and_preserves_order() {
    let path = temp_file("users.txt", "  admin\n\nguest \n  \nadmin\n");
    let list = Wordlist::load(&path, "usernames").expect("load ok");
    assert_eq!(list.as_slice(), &["admin", "guest", "admin"]);
    let _ = fs::remove_file(path);
}

#[test]
fn blank_only_file_is_rejected_with_its_path() {
    let path = temp_file("blank.txt", "\n   \n\t\n");
    let err = Wordlist::load(&path, "passwords").expect_err("must reject");
    let msg = err.to_string();
    assert!(msg.starts_with("No passwords were loaded from"));
    assert!(msg.contains(&path.display().to_string()));
    let _ = fs::remove_file(path);
}

#[test]
fn missing_file_errors() {
    let path = std::env::temp_dir().join("smb-auth-sweep-does-not-exist.txt");
    assert!(Wordlist::load(&path, "usernames").is_err());
}

#[test]
fn crlf_lines_are_trimmed() {
    assert_eq!(parse_wordlist_str("a\r\nb\r\n"), vec!["a", "b"]);
}
