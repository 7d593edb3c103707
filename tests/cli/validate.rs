use anyhow::Result;
use insta_cmd::assert_cmd_snapshot;

use crate::{CliTest, stdout};

const ADMIN_PHP: &str = "<?php\n\nreturn [\n    'guardar' => 'Save',\n];\n";

fn project() -> Result<CliTest> {
    let test = CliTest::new()?;
    test.write_file(
        "resources/views/admin/form.mustache",
        "{{#user}}<button>{{#__}}admin.guardar{{/__}}</button>{{/user}}\n",
    )?;
    test.write_inventory(&[(
        "admin.guardar",
        "Guardar",
        "resources/views/admin/form.mustache",
    )])?;
    test.write_file(".stachemig.json", r#"{ "categories": ["admin"] }"#)?;
    Ok(test)
}

#[test]
fn test_validate_clean_project() -> Result<()> {
    let test = project()?;
    test.write_file("resources/lang/en/admin.php", ADMIN_PHP)?;

    assert_cmd_snapshot!(test.validate_command(), @r"
success: true
exit_code: 0
----- stdout -----
✓ Checked 1 template against 1 key (locale 'en') - no errors found
Report written to: I18N_VALIDATION_REPORT.md

----- stderr -----
");

    let report = test.read_file("I18N_VALIDATION_REPORT.md")?;
    assert!(report.contains("### Overall Status: PASSED"));
    assert!(report.contains("- Total Translation Keys: 1\n"));
    assert!(report.contains("- Language Files Checked: 1\n"));
    Ok(())
}

#[test]
fn test_validate_reports_unknown_key_and_nesting() -> Result<()> {
    let test = project()?;
    test.write_file("resources/lang/en/admin.php", ADMIN_PHP)?;
    test.write_file(
        "resources/views/admin/form.mustache",
        "{{#user}}\n<b>{{#__}}borrar{{/__}}</b>\n",
    )?;

    let mut cmd = test.validate_command();
    cmd.arg("--no-report");

    assert_cmd_snapshot!(cmd, @r"
success: false
exit_code: 1
----- stdout -----
error: Unclosed sections: user  section-nesting
  --> resources/views/admin/form.mustache:1:1
  |
1 | {{#user}}
  | ^

error: Invalid i18n key format (missing category): borrar  malformed-key
  --> resources/views/admin/form.mustache:2:11
  |
2 | <b>{{#__}}borrar{{/__}}</b>
  |           ^

error: Unknown i18n key: borrar  unknown-key
  --> resources/views/admin/form.mustache:2:11
  |
2 | <b>{{#__}}borrar{{/__}}</b>
  |           ^
  = hint: re-run extraction or restore the template from its backup

✘ 3 problems (3 errors, 0 warnings)

✘ Checked 1 template against 1 key (locale 'en')

----- stderr -----
");
    assert!(!test.root().join("I18N_VALIDATION_REPORT.md").exists());
    Ok(())
}

#[test]
fn test_validate_reports_missing_translation() -> Result<()> {
    let test = project()?;
    test.write_file(
        "resources/lang/en/admin.php",
        "<?php\n\nreturn [\n    'borrar' => 'Delete',\n];\n",
    )?;

    assert_cmd_snapshot!(test.validate_command(), @r"
success: false
exit_code: 1
----- stdout -----
error: No 'en' translation for key: admin.guardar  missing-translation
  --> resources/views/admin/form.mustache

✘ 1 problems (1 error, 0 warnings)

✘ Checked 1 template against 1 key (locale 'en')
Report written to: I18N_VALIDATION_REPORT.md

----- stderr -----
");

    let report = test.read_file("I18N_VALIDATION_REPORT.md")?;
    assert!(report.contains("### Overall Status: FAILED"));
    assert!(report.contains("**Missing Keys:**\n- `admin.guardar`\n"));
    Ok(())
}

#[test]
fn test_validate_missing_language_file() -> Result<()> {
    let test = project()?;
    test.write_file("resources/lang/es/admin.php", ADMIN_PHP)?;

    let output = test.run(&["validate", "--locale", "es"])?;
    assert_eq!(output.status.code(), Some(0));

    let output = test.run(&["validate", "--locale", "fr"])?;
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("language directory not found"));
    Ok(())
}

#[test]
fn test_duplicate_slugs_are_warnings() -> Result<()> {
    let test = project()?;
    test.write_file(".stachemig.json", r#"{ "categories": ["admin", "forms"] }"#)?;
    test.write_file("resources/lang/en/admin.php", ADMIN_PHP)?;
    test.write_file("resources/lang/en/forms.php", ADMIN_PHP)?;

    assert_cmd_snapshot!(test.validate_command(), @r"
success: true
exit_code: 0
----- stdout -----
warning: Duplicate key across categories: guardar  duplicate-slug
  --> resources/lang/en
  = note: defined in: admin, forms

✘ 1 problems (0 errors, 1 warning)

✓ Checked 1 template against 1 key (locale 'en') - no errors found
Report written to: I18N_VALIDATION_REPORT.md

----- stderr -----
");

    let report = test.read_file("I18N_VALIDATION_REPORT.md")?;
    assert!(report.contains("- `guardar` in: admin, forms\n"));
    assert!(report.contains("- Language Files Checked: 2\n"));
    Ok(())
}

#[test]
fn test_missing_template_is_a_warning() -> Result<()> {
    let test = project()?;
    test.write_inventory(&[
        ("admin.guardar", "Guardar", "resources/views/admin/form.mustache"),
        ("admin.cancelar", "Cancelar", "resources/views/admin/gone.mustache"),
    ])?;
    test.write_file(
        "resources/lang/en/admin.php",
        "<?php\n\nreturn [\n    'cancelar' => 'Cancel',\n    'guardar' => 'Save',\n];\n",
    )?;

    assert_cmd_snapshot!(test.validate_command(), @r"
success: true
exit_code: 0
----- stdout -----
warning: Template file not found  missing-template
  --> resources/views/admin/gone.mustache
  = hint: re-run extraction to refresh the inventory

✘ 1 problems (0 errors, 1 warning)

✓ Checked 1 template against 2 keys (locale 'en') - no errors found
Report written to: I18N_VALIDATION_REPORT.md

----- stderr -----
");

    let report = test.read_file("I18N_VALIDATION_REPORT.md")?;
    assert!(report.contains(
        "## Warnings\n\n- Template file not found: resources/views/admin/gone.mustache\n"
    ));
    Ok(())
}

#[test]
fn test_validation_report_path_from_config() -> Result<()> {
    let test = project()?;
    test.write_file(
        ".stachemig.json",
        r#"{ "categories": ["admin"], "validationReportPath": "reports/i18n.md" }"#,
    )?;
    test.write_file("resources/lang/en/admin.php", ADMIN_PHP)?;

    let output = test.run(&["validate"])?;

    assert_eq!(output.status.code(), Some(0));
    assert!(stdout(&output).contains("Report written to: reports/i18n.md"));
    assert!(test.read_file("reports/i18n.md")?.starts_with("# i18n Validation Report"));
    assert!(!test.root().join("I18N_VALIDATION_REPORT.md").exists());
    Ok(())
}
