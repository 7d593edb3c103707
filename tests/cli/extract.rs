use anyhow::Result;
use insta_cmd::assert_cmd_snapshot;
use pretty_assertions::assert_eq;
use serde_json::Value;

use crate::{CliTest, INVENTORY_FILE};

#[test]
fn test_extract_writes_inventory() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(
        "resources/views/admin/settings.mustache",
        "<h1>Configuración del Sistema</h1>\n<input placeholder=\"Buscar por nombre\">\n<p>{{nombre}}</p>\n",
    )?;
    test.write_file("resources/views/home.mustache", "<b>Bienvenido</b><i>42</i>")?;

    assert_cmd_snapshot!(test.extract_command(), @r"
success: true
exit_code: 0
----- stdout -----
✓ Extracted 3 keys (3 occurrences) from 2 files into i18n_strings_inventory.json
  admin            2
  uncategorized    1

----- stderr -----
");

    let inventory: Value = serde_json::from_str(&test.read_file(INVENTORY_FILE)?)?;
    let keys = inventory["translation_keys"].as_object().unwrap();
    let mut names: Vec<&str> = keys.keys().map(String::as_str).collect();
    names.sort();
    assert_eq!(
        names,
        vec![
            "admin.buscar_por_nombre",
            "admin.configuración_del_sistema",
            "uncategorized.bienvenido",
        ]
    );
    assert_eq!(
        keys["admin.buscar_por_nombre"]["source_file"],
        "resources/views/admin/settings.mustache"
    );
    assert_eq!(keys["admin.buscar_por_nombre"]["source"], "placeholder");
    assert_eq!(inventory["metadata"]["total_files"], 2);
    Ok(())
}

#[test]
fn test_extract_then_migrate() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(
        "resources/views/admin/users.mustache",
        "<h2>Nombre de usuario</h2><span>Nombre</span>",
    )?;

    test.run(&["extract"])?;
    let output = test.run(&["migrate", "--no-report"])?;

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(
        test.read_file("resources/views/admin/users.mustache")?,
        "<h2>{{#__}}admin.nombre_de_usuario{{/__}}</h2><span>{{#__}}admin.nombre{{/__}}</span>"
    );
    Ok(())
}

#[test]
fn test_literal_shared_by_two_templates_migrates_both() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(".stachemig.json", r#"{ "templateRoots": ["views"] }"#)?;
    test.write_file("views/admin/a.mustache", "<h1>Guardar cambios</h1>")?;
    test.write_file("views/admin/b.mustache", "<p>Guardar cambios</p>")?;
    let _settings = test.snapshot_settings().bind_to_scope();

    assert_cmd_snapshot!(test.extract_command(), @r"
success: true
exit_code: 0
----- stdout -----
✓ Extracted 1 key (2 occurrences) from 2 files into i18n_strings_inventory.json
  admin            1

----- stderr -----
");

    let inventory: Value = serde_json::from_str(&test.read_file(INVENTORY_FILE)?)?;
    assert_eq!(
        inventory["translation_keys"]["admin.guardar_cambios"]["source_files"],
        serde_json::json!(["views/admin/a.mustache", "views/admin/b.mustache"])
    );

    assert_cmd_snapshot!(test.migrate_command(), @r"
success: true
exit_code: 0
----- stdout -----
Migration summary
  Files processed:     2
  Files migrated:      2
  Files skipped:       0
  Files with errors:   0
  Total replacements:  2
✓ Validation passed
Backups saved to: backups/templates_[TIMESTAMP]
Report written to: TEMPLATE_MIGRATION_REPORT.md

----- stderr -----
");

    assert_eq!(
        test.read_file("views/admin/a.mustache")?,
        "<h1>{{#__}}admin.guardar_cambios{{/__}}</h1>"
    );
    assert_eq!(
        test.read_file("views/admin/b.mustache")?,
        "<p>{{#__}}admin.guardar_cambios{{/__}}</p>"
    );
    Ok(())
}

#[test]
fn test_extract_custom_output_and_rules() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(
        ".stachemig.json",
        r#"{
            "templateRoots": ["views"],
            "categoryRules": [{ "pathContains": "billing", "category": "billing" }]
        }"#,
    )?;
    test.write_file("views/billing/invoice.mustache", "<td>Factura</td>")?;

    let output = test.run(&["extract", "--output", "out/inv.json"])?;
    assert_eq!(output.status.code(), Some(0));

    let inventory: Value = serde_json::from_str(&test.read_file("out/inv.json")?)?;
    assert!(inventory["translation_keys"]["billing.factura"].is_object());
    Ok(())
}
