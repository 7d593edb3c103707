use anyhow::Result;
use insta_cmd::assert_cmd_snapshot;
use pretty_assertions::assert_eq;

use crate::{CliTest, stderr, stdout};

const SETTINGS: &str = r#"<h1>Configuración del Sistema</h1>
<input type="text" placeholder="Buscar por nombre">
<p>{{titulo}}</p>
"#;

const SETTINGS_MIGRATED: &str = r#"<h1>{{#__}}admin.configuración_del_sistema{{/__}}</h1>
<input type="text" placeholder="{{#__}}forms.buscar_por_nombre{{/__}}">
<p>{{titulo}}</p>
"#;

fn settings_project() -> Result<CliTest> {
    let test = CliTest::new()?;
    test.write_file("resources/views/admin/settings.mustache", SETTINGS)?;
    test.write_inventory(&[
        (
            "admin.configuración_del_sistema",
            "Configuración del Sistema",
            "resources/views/admin/settings.mustache",
        ),
        (
            "forms.buscar_por_nombre",
            "Buscar por nombre",
            "resources/views/admin/settings.mustache",
        ),
        ("admin.titulo", "titulo", "resources/views/admin/settings.mustache"),
    ])?;
    Ok(test)
}

#[test]
fn test_migrate_rewrites_backs_up_and_reports() -> Result<()> {
    let test = settings_project()?;
    let _settings = test.snapshot_settings().bind_to_scope();

    assert_cmd_snapshot!(test.migrate_command(), @r"
success: true
exit_code: 0
----- stdout -----
Migration summary
  Files processed:     1
  Files migrated:      1
  Files skipped:       0
  Files with errors:   0
  Total replacements:  2
✓ Validation passed
Backups saved to: backups/templates_[TIMESTAMP]
Report written to: TEMPLATE_MIGRATION_REPORT.md

----- stderr -----
");

    assert_eq!(
        test.read_file("resources/views/admin/settings.mustache")?,
        SETTINGS_MIGRATED
    );

    let backup = test
        .backup_dir()?
        .join("resources/views/admin/settings.mustache");
    assert_eq!(std::fs::read_to_string(backup)?, SETTINGS);

    let report = test.read_file("TEMPLATE_MIGRATION_REPORT.md")?;
    assert!(report.contains("- **Files Migrated:** 1"));
    assert!(report.contains("- **Total String Replacements:** 2"));
    Ok(())
}

#[test]
fn test_migrate_is_idempotent() -> Result<()> {
    let test = settings_project()?;

    test.run(&["migrate", "--no-report"])?;

    let mut cmd = test.migrate_command();
    cmd.arg("--no-report");

    assert_cmd_snapshot!(cmd, @r"
success: true
exit_code: 0
----- stdout -----
Migration summary
  Files processed:     1
  Files migrated:      0
  Files skipped:       1
  Files with errors:   0
  Total replacements:  0
✓ Validation passed

----- stderr -----
");
    assert_eq!(
        test.read_file("resources/views/admin/settings.mustache")?,
        SETTINGS_MIGRATED
    );
    Ok(())
}

#[test]
fn test_dry_run_leaves_files_untouched() -> Result<()> {
    let test = settings_project()?;

    let mut cmd = test.migrate_command();
    cmd.arg("--dry-run");

    assert_cmd_snapshot!(cmd, @r"
success: true
exit_code: 0
----- stdout -----
Migration summary (dry run)
  Files processed:     1
  Files migrated:      1
  Files skipped:       0
  Files with errors:   0
  Total replacements:  2
✓ Validation passed
Dry run: no files were modified

----- stderr -----
");
    assert_eq!(
        test.read_file("resources/views/admin/settings.mustache")?,
        SETTINGS
    );
    assert!(!test.root().join("backups").exists());
    assert!(!test.root().join("TEMPLATE_MIGRATION_REPORT.md").exists());
    Ok(())
}

#[test]
fn test_structural_errors_fail_the_run() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(
        "resources/views/modal.mustache",
        "{{#modal}}\n<button>Guardar</button>\n{{/dialog}}\n",
    )?;
    test.write_inventory(&[("forms.guardar", "Guardar", "resources/views/modal.mustache")])?;
    let _settings = test.snapshot_settings().bind_to_scope();

    let mut cmd = test.migrate_command();
    cmd.arg("--no-report");

    assert_cmd_snapshot!(cmd, @r"
success: false
exit_code: 1
----- stdout -----
error: Unclosed sections: modal  section-nesting
  --> resources/views/modal.mustache:1:1
  |
1 | {{#modal}}
  | ^

error: Mismatched tags: expected modal, got dialog  section-nesting
  --> resources/views/modal.mustache:3:1
  |
3 | {{/dialog}}
  | ^

✘ 2 problems (2 errors, 0 warnings)

Migration summary
  Files processed:     1
  Files migrated:      1
  Files skipped:       0
  Files with errors:   0
  Total replacements:  1
✘ Validation failed in 1 file
Backups saved to: backups/templates_[TIMESTAMP]

----- stderr -----
");
    assert_eq!(
        test.read_file("resources/views/modal.mustache")?,
        "{{#modal}}\n<button>{{#__}}forms.guardar{{/__}}</button>\n{{/dialog}}\n"
    );
    Ok(())
}

#[test]
fn test_named_files_only() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file("views/a.mustache", "<b>Guardar</b>")?;
    test.write_file("views/b.mustache", "<b>Guardar</b>")?;
    test.write_inventory(&[("forms.guardar", "Guardar", "views/a.mustache")])?;

    let output = test.run(&["migrate", "--no-report", "--files", "views/b.mustache"])?;

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(test.read_file("views/a.mustache")?, "<b>Guardar</b>");
    assert_eq!(
        test.read_file("views/b.mustache")?,
        "<b>{{#__}}forms.guardar{{/__}}</b>"
    );
    Ok(())
}

#[test]
fn test_missing_named_file_is_recorded_and_run_continues() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file("views/a.mustache", "<b>Guardar</b>")?;
    test.write_inventory(&[("forms.guardar", "Guardar", "views/a.mustache")])?;

    let output = test.run(&[
        "migrate",
        "--no-report",
        "--files",
        "views/missing.mustache",
        "views/a.mustache",
    ])?;

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(
        test.read_file("views/a.mustache")?,
        "<b>{{#__}}forms.guardar{{/__}}</b>"
    );
    let out = stdout(&output);
    assert!(out.contains("file-error"));
    assert!(out.contains("Files with errors:   1"));
    Ok(())
}

#[test]
fn test_pilot_takes_files_with_most_strings() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(".stachemig.json", r#"{ "pilotSize": 1 }"#)?;
    test.write_file("views/small.mustache", "<b>Uno</b>")?;
    test.write_file("views/big.mustache", "<b>Dos</b><i>Tres</i>")?;
    test.write_inventory(&[
        ("admin.uno", "Uno", "views/small.mustache"),
        ("admin.dos", "Dos", "views/big.mustache"),
        ("admin.tres", "Tres", "views/big.mustache"),
    ])?;

    let output = test.run(&["migrate", "--pilot", "--no-report"])?;

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(test.read_file("views/small.mustache")?, "<b>Uno</b>");
    assert_eq!(
        test.read_file("views/big.mustache")?,
        "<b>{{#__}}admin.dos{{/__}}</b><i>{{#__}}admin.tres{{/__}}</i>"
    );
    Ok(())
}

#[test]
fn test_malformed_inventory_aborts_before_touching_files() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file("views/a.mustache", "<b>Guardar</b>")?;
    test.write_file(crate::INVENTORY_FILE, "{ not json")?;

    let output = test.run(&["migrate"])?;

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("Failed to load inventory"));
    assert_eq!(test.read_file("views/a.mustache")?, "<b>Guardar</b>");
    assert!(!test.root().join("backups").exists());
    Ok(())
}
