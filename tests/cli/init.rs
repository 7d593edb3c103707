use anyhow::{Context, Result};
use insta_cmd::assert_cmd_snapshot;
use serde_json::Value;

use crate::CliTest;

#[test]
fn test_init_creates_config() -> Result<()> {
    let test = CliTest::new()?;

    assert_cmd_snapshot!(test.init_command(), @r"
success: true
exit_code: 0
----- stdout -----
✓ Created .stachemig.json

----- stderr -----
");

    let content = test.read_file(".stachemig.json")?;
    let parsed: Value = serde_json::from_str(&content).context("Config should be valid JSON")?;
    assert_eq!(parsed["inventory"], "i18n_strings_inventory.json");
    assert_eq!(parsed["pilotSize"], 8);
    assert!(parsed["checkedAttributes"].as_array().is_some());
    assert_eq!(parsed["validationReportPath"], "I18N_VALIDATION_REPORT.md");
    Ok(())
}

#[test]
fn test_init_fails_if_exists() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(".stachemig.json", "{}")?;

    assert_cmd_snapshot!(test.init_command(), @r"
success: false
exit_code: 1
----- stdout -----
error: .stachemig.json already exists

----- stderr -----
");
    assert_eq!(test.read_file(".stachemig.json")?, "{}");
    Ok(())
}

#[test]
fn test_init_config_is_immediately_usable() -> Result<()> {
    let test = CliTest::new()?;
    test.run(&["init"])?;
    test.write_file("resources/views/a.mustache", "<b>Hola mundo</b>")?;

    let output = test.run(&["extract"])?;
    assert!(output.status.success());
    assert!(test.root().join("i18n_strings_inventory.json").exists());
    Ok(())
}

#[test]
fn test_invalid_config_is_fatal() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(".stachemig.json", r#"{ "ignores": ["[invalid"] }"#)?;

    let output = test.run(&["extract"])?;
    assert_eq!(output.status.code(), Some(2));
    Ok(())
}
