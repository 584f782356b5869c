use super::*;
use tempfile::tempdir;

fn setup(texts: &str) -> (tempfile::TempDir, GlobalArgs) {
    let temp_dir = tempdir().unwrap();
    fs::write(temp_dir.path().join("texts.yml"), texts).unwrap();
    let global = GlobalArgs {
        verbose: false,
        project_dir: temp_dir.path().to_path_buf(),
        config: None,
        database: Some(":memory:".to_string()),
    };
    (temp_dir, global)
}

fn args(write: bool) -> KeysArgs {
    KeysArgs {
        file: "texts.yml".into(),
        write,
    }
}

#[test]
fn test_dry_run_leaves_file_untouched() {
    let original = "text_welcome: Hello\n";
    let (temp_dir, global) = setup(original);
    execute(&args(false), &global).unwrap();
    assert_eq!(
        fs::read_to_string(temp_dir.path().join("texts.yml")).unwrap(),
        original
    );
}

#[test]
fn test_write_normalizes_keys() {
    let (temp_dir, global) = setup("text_welcome: Hello\ntext_catalog: Lessons\nfaq: Ask us\n");
    execute(&args(true), &global).unwrap();

    let texts = read_texts(&temp_dir.path().join("texts.yml")).unwrap();
    let keys: Vec<&str> = texts.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["catalog", "faq", "welcome"]);
    assert_eq!(texts["welcome"], "Hello");
}

#[test]
fn test_write_refused_on_conflict() {
    let original = "text_welcome: Hello\nwelcome: Hi there\n";
    let (temp_dir, global) = setup(original);

    let err = execute(&args(true), &global).unwrap_err();
    assert!(matches!(err.downcast_ref::<ExitCode>(), Some(ExitCode(1))));
    assert_eq!(
        fs::read_to_string(temp_dir.path().join("texts.yml")).unwrap(),
        original
    );
}

#[test]
fn test_non_mapping_file_is_an_error() {
    let (_temp_dir, global) = setup("- just\n- a list\n");
    assert!(execute(&args(false), &global).is_err());
}
