//! Edge case and error handling tests for dirscope


use harness::{TestRepo, run_dirscope, run_json};
use std::fs;

// ============================================================================
// Symlink Edge Cases
// ============================================================================

#[test]
#[cfg(unix)]
fn test_symlink_to_file() {
    let repo = TestRepo::new();
    repo.add_file("target.rs", "fn target() {}");
    repo.add_symlink("target.rs", "link.rs");

    let (stdout, _stderr, success) = run_dirscope(repo.path(), &["--sizes"]);
    assert!(success, "dirscope should succeed with symlink");
    assert!(stdout.contains("target.rs"));
    assert!(stdout.contains("link.rs  14 B -> target.rs"), "{}", stdout);

    // Simple mode lists names only
    let (stdout, _stderr, _success) = run_dirscope(repo.path(), &[]);
    assert!(stdout.contains("link.rs\n"));
    assert!(!stdout.contains("->"));
}

#[test]
#[cfg(unix)]
fn test_symlink_to_directory() {
    let repo = TestRepo::new();
    repo.add_file("realdir/file.rs", "fn file() {}");
    repo.add_symlink("realdir", "linkdir");

    let json = run_json(repo.path(), &[]);
    let children = json["structure"]["linkdir"]["children"].as_object();
    assert!(
        children.is_none_or(|c| c.is_empty()),
        "links are not followed by default: {}",
        json
    );

    let json = run_json(repo.path(), &["--follow-symlinks"]);
    assert_eq!(
        json["structure"]["linkdir"]["children"]["file.rs"]["type"],
        "file"
    );
}

#[test]
#[cfg(unix)]
fn test_symlink_to_parent_no_infinite_loop() {
    let repo = TestRepo::new();
    repo.add_file("sub/file.rs", "");
    repo.add_symlink("..", "sub/parent");

    let (stdout, stderr, success) = run_dirscope(repo.path(), &["--follow-symlinks"]);
    assert!(success, "symlink loops must not hang or fail: {}", stderr);
    assert!(stdout.contains("file.rs"));
    assert!(stdout.contains("Warning: Could not read"), "{}", stdout);
}

#[test]
#[cfg(unix)]
fn test_broken_symlink() {
    let repo = TestRepo::new();
    repo.add_file("real.rs", "");
    repo.add_symlink("missing.rs", "dangling.rs");

    let (stdout, stderr, success) = run_dirscope(repo.path(), &[]);
    assert!(success, "{}", stderr);
    assert!(stdout.contains("real.rs"));
    assert!(stdout.contains("dangling.rs"));
}

// ============================================================================
// Permission Edge Cases
// ============================================================================

#[test]
#[cfg(unix)]
fn test_unreadable_directory() {
    use std::os::unix::fs::PermissionsExt;

    let repo = TestRepo::new();
    repo.add_file("readable/file.rs", "fn readable() {}");
    let unreadable = repo.add_dir("unreadable");
    fs::write(unreadable.join("secret.rs"), "").unwrap();

    fs::set_permissions(&unreadable, fs::Permissions::from_mode(0o000)).unwrap();
    // Privileged users can read it anyway
    let enforced = fs::read_dir(&unreadable).is_err();

    let json = run_json(repo.path(), &[]);

    fs::set_permissions(&unreadable, fs::Permissions::from_mode(0o755)).unwrap();

    assert_eq!(json["structure"]["readable"]["children"]["file.rs"]["type"], "file");
    assert_eq!(json["structure"]["unreadable"]["type"], "directory");
    if enforced {
        let warnings = json["warnings"].as_array().expect("a warning is recorded");
        assert!(
            warnings
                .iter()
                .any(|w| w.as_str().unwrap_or("").starts_with("Could not read")),
            "{:?}",
            warnings
        );
    }
}

#[test]
fn test_file_as_root() {
    let repo = TestRepo::new();
    repo.add_file("plain.txt", "");

    let (stdout, stderr, success) = run_dirscope(repo.path(), &["plain.txt"]);
    assert!(!success);
    assert!(stdout.is_empty());
    assert!(stderr.contains("is not a directory"), "{}", stderr);
}

// ============================================================================
// File Name Edge Cases
// ============================================================================

#[test]
fn test_filename_with_spaces() {
    let repo = TestRepo::new();
    repo.add_file("my file.rs", "");
    repo.add_file("dir with spaces/inner file.md", "");

    let (stdout, _stderr, success) = run_dirscope(repo.path(), &[]);
    assert!(success);
    assert!(stdout.contains("my file.rs"));
    assert!(stdout.contains("└── inner file.md"));
}

#[test]
fn test_filename_with_unicode() {
    let repo = TestRepo::new();
    repo.add_file("日本語.rs", "");
    repo.add_file("émojis/🦀.rs", "");

    let json = run_json(repo.path(), &[]);
    assert_eq!(json["structure"]["日本語.rs"]["type"], "file");
    assert_eq!(json["structure"]["émojis"]["children"]["🦀.rs"]["type"], "file");
}

#[test]
fn test_markdown_special_chars() {
    let repo = TestRepo::new();
    repo.add_file("my_dir/a*b.txt", "");

    let (stdout, _stderr, success) = run_dirscope(repo.path(), &["-f", "md"]);
    assert!(success);
    assert!(stdout.contains("- **my\\_dir/**"), "{}", stdout);
    assert!(stdout.contains("- `a*b.txt`"), "{}", stdout);
}

#[test]
fn test_empty_file_and_no_extension() {
    let repo = TestRepo::new();
    repo.add_file("Makefile", "");
    repo.add_file("IMAGE.PNG", "");

    let json = run_json(repo.path(), &["--stats", "--sizes"]);
    assert_eq!(json["structure"]["Makefile"]["size"], 0);
    assert_eq!(json["stats"]["byExtension"]["(no extension)"]["count"], 1);
    assert_eq!(json["stats"]["byExtension"][".PNG"]["count"], 1);
    assert_eq!(json["stats"]["byCategory"]["image"]["count"], 1);
    assert_eq!(json["stats"]["byCategory"]["other"]["count"], 1);
}

#[test]
fn test_empty_root() {
    let repo = TestRepo::new();

    let (stdout, _stderr, success) = run_dirscope(repo.path(), &[]);
    assert!(success);
    assert_eq!(stdout.lines().count(), 1, "only the root name: {}", stdout);

    let json = run_json(repo.path(), &["--stats"]);
    assert!(json["structure"].as_object().unwrap().is_empty());
    assert_eq!(json["stats"]["totalFiles"], 0);
}

// ============================================================================
// Ordering
// ============================================================================

#[test]
fn test_sorting_order() {
    let repo = TestRepo::new();
    repo.add_file("zebra.rs", "");
    repo.add_file("apple.rs", "");
    repo.add_file("Banana.rs", "");
    repo.add_file("zdir/inner.rs", "");
    repo.add_file("adir/inner.rs", "");

    let (stdout, _stderr, success) = run_dirscope(repo.path(), &[]);
    assert!(success);

    let order: Vec<&str> = stdout
        .lines()
        .filter_map(|l| l.strip_prefix("├── ").or_else(|| l.strip_prefix("└── ")))
        .collect();
    assert_eq!(order, vec!["adir", "zdir", "Banana.rs", "apple.rs", "zebra.rs"]);
}

#[test]
fn test_very_deep_nesting() {
    let repo = TestRepo::new();
    let deep = (0..30).map(|i| format!("d{}", i)).collect::<Vec<_>>().join("/");
    repo.add_file(&format!("{}/leaf.rs", deep), "");

    let (stdout, _stderr, success) = run_dirscope(repo.path(), &[]);
    assert!(success);
    assert!(stdout.contains("leaf.rs"));

    let (stdout, _stderr, success) = run_dirscope(repo.path(), &["-d", "5"]);
    assert!(success);
    let tree: Vec<&str> = stdout.lines().skip(1).collect();
    assert!(tree.iter().any(|l| l.ends_with("── d4")));
    assert!(tree.iter().all(|l| !l.ends_with("── d5")));
    assert!(!stdout.contains("leaf.rs"));
}

// ============================================================================
// Pattern Edge Cases
// ============================================================================

#[test]
fn test_malformed_gitignore() {
    let repo = TestRepo::new();
    repo.add_file("normal.rs", "");
    repo.add_file("debug.out", "");
    repo.add_file(".gitignore", "# comment\n*.out\nlogs\\\n");

    let json = run_json(repo.path(), &[]);
    assert!(json["structure"].get("normal.rs").is_some());
    assert!(json["structure"].get("debug.out").is_none(), "valid rules still apply");

    let errors = json["errors"].as_array().expect("malformed rule is reported");
    assert!(
        errors
            .iter()
            .any(|e| e.as_str().unwrap_or("").contains("'logs\\' in .gitignore")),
        "{:?}",
        errors
    );
}

#[test]
fn test_gitignore_negation() {
    let repo = TestRepo::new();
    repo.add_file(".gitignore", "*.tmp\n!keep.tmp\n");
    repo.add_file("drop.tmp", "");
    repo.add_file("keep.tmp", "");

    let (stdout, _stderr, success) = run_dirscope(repo.path(), &[]);
    assert!(success);
    assert!(stdout.contains("keep.tmp"));
    assert!(!stdout.contains("drop.tmp"));
}

#[test]
fn test_only_root_gitignore_applies() {
    let repo = TestRepo::new();
    repo.add_file(".gitignore", "*.log\n");
    repo.add_file("subdir/.gitignore", "*.tmp\n");
    repo.add_file("subdir/file.tmp", "");
    repo.add_file("subdir/app.log", "");

    let (stdout, _stderr, success) = run_dirscope(repo.path(), &["--no-default-patterns"]);
    assert!(success);
    assert!(stdout.contains("file.tmp"), "nested .gitignore is not read: {}", stdout);
    assert!(!stdout.contains("app.log"));
}

#[test]
fn test_invalid_include_pattern_falls_back() {
    let repo = TestRepo::new();
    repo.add_file("main.rs", "");

    let json = run_json(repo.path(), &["--include", "[bad"]);
    assert!(json["structure"].get("main.rs").is_some());
    assert!(json["errors"].as_array().is_some_and(|e| !e.is_empty()));
}

// ============================================================================
// Performance Regression Tests
// ============================================================================

#[test]
fn test_performance_1000_files() {
    use std::time::Instant;

    let repo = TestRepo::new();
    for i in 0..1000 {
        let file = format!("dir_{:02}/file_{:04}.rs", i / 100, i);
        repo.add_untracked(&file, "fn f() {}");
    }

    let start = Instant::now();
    let json = run_json(repo.path(), &["--stats"]);
    let elapsed = start.elapsed();

    assert_eq!(json["stats"]["totalFiles"], 1000);
    assert_eq!(json["stats"]["totalDirs"], 10);

    // Generous threshold to avoid flaky tests
    assert!(
        elapsed.as_secs() < 10,
        "processing 1000 files took too long: {:?}",
        elapsed
    );
}
