use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use minijinja::{Environment, context};
use tracing::{debug, info};

use schemagen_core::{Column, FkAction, ForeignKey, Index, Model, Table};

use crate::error::GenerationError;
use crate::idents::{to_pascal_case, to_snake_ident};
use crate::report::GenerationReport;
use crate::types::rust_type;

/// Renders Rust source for a schema model.
///
/// The model is taken as given; run the namespace correction before
/// constructing the generator if the driver stack needs it.
pub struct SourceGenerator {
    model: Model,
    env: Environment<'static>,
}

struct ModuleEntry {
    module: String,
    file_stem: String,
    struct_name: String,
}

/// Names already claimed while laying out a package. Module and struct
/// names are tracked separately: distinct module names can still
/// collapse to the same PascalCase form.
struct UsedNames {
    modules: BTreeSet<String>,
    structs: BTreeSet<String>,
}

impl UsedNames {
    fn new() -> Self {
        let mut modules = BTreeSet::new();
        // The package index owns mod.rs, so no table may claim that stem.
        modules.insert("r#mod".to_string());
        Self {
            modules,
            structs: BTreeSet::new(),
        }
    }
}

impl SourceGenerator {
    pub fn new(model: Model) -> Self {
        let mut env = Environment::new();
        env.add_template("table", include_str!("templates/table.rs.jinja"))
            .expect("embedded table template loads");
        env.add_template("module", include_str!("templates/module.rs.jinja"))
            .expect("embedded module template loads");
        Self { model, env }
    }

    /// Write one module per table plus a `mod.rs` index under
    /// `<output_dir>/<package path>`, where dots in the package name map
    /// to nested directories.
    ///
    /// `driver_expr` is embedded into the file headers so generated code
    /// records which driver expression produced it.
    pub fn write_to_file(
        &self,
        driver_expr: &str,
        output_dir: &Path,
        package: &str,
    ) -> Result<GenerationReport, GenerationError> {
        let root = package_root(output_dir, package);
        fs::create_dir_all(&root)?;

        let mut report = GenerationReport {
            root: root.clone(),
            files: Vec::new(),
            tables: self.model.tables.len(),
            bytes_written: 0,
        };
        let mut modules: Vec<ModuleEntry> = Vec::new();
        let mut names = UsedNames::new();

        for table in &self.model.tables {
            let entry = module_entry(table, &mut names);
            let source = self.render_table(table, driver_expr, &entry.struct_name)?;
            let path = root.join(format!("{}.rs", entry.file_stem));
            report.bytes_written += source.len() as u64;
            fs::write(&path, source)?;
            debug!(table = %table.name, path = %path.display(), "table module written");
            report.files.push(path);
            modules.push(entry);
        }

        let source = self.render_module_index(&modules, driver_expr)?;
        let path = root.join("mod.rs");
        report.bytes_written += source.len() as u64;
        fs::write(&path, source)?;
        report.files.push(path);

        info!(
            tables = report.tables,
            files = report.files.len(),
            bytes = report.bytes_written,
            root = %root.display(),
            "source generation finished"
        );
        Ok(report)
    }

    fn render_table(
        &self,
        table: &Table,
        driver_expr: &str,
        struct_name: &str,
    ) -> Result<String, GenerationError> {
        let template = self
            .env
            .get_template("table")
            .map_err(|err| GenerationError::Template(err.to_string()))?;

        let columns: Vec<_> = table
            .columns
            .iter()
            .map(|column| {
                context! {
                    field => to_snake_ident(&column.name),
                    rust_type => rust_type(&column.column_type, column.is_nullable),
                }
            })
            .collect();
        let primary_key = table
            .primary_key
            .as_ref()
            .map(|pk| pk.columns.as_slice())
            .unwrap_or_default();

        let ctx = context! {
            driver_expr => driver_expr,
            struct_name => struct_name,
            qualified => table.name.to_string(),
            catalog_expr => option_expr(table.name.catalog.as_deref()),
            schema_expr => option_expr(table.name.schema.as_deref()),
            table_name => table.name.name.escape_default().to_string(),
            columns => columns,
            columns_literal => string_array_literal(&table.columns),
            primary_key_literal => string_array_literal(primary_key),
            foreign_key_lines => table
                .foreign_keys
                .iter()
                .map(foreign_key_line)
                .collect::<Vec<_>>(),
            index_lines => table.indices.iter().map(index_line).collect::<Vec<_>>(),
        };
        template.render(ctx).map_err(|err| GenerationError::Render {
            table: table.name.to_string(),
            message: err.to_string(),
        })
    }

    fn render_module_index(
        &self,
        modules: &[ModuleEntry],
        driver_expr: &str,
    ) -> Result<String, GenerationError> {
        let template = self
            .env
            .get_template("module")
            .map_err(|err| GenerationError::Template(err.to_string()))?;
        let entries: Vec<_> = modules
            .iter()
            .map(|entry| {
                context! {
                    module => entry.module,
                    struct_name => entry.struct_name,
                }
            })
            .collect();
        let ctx = context! {
            driver_expr => driver_expr,
            modules => entries,
        };
        template.render(ctx).map_err(|err| GenerationError::Render {
            table: "mod.rs".to_string(),
            message: err.to_string(),
        })
    }
}

/// Resolve the directory the package is written into. Empty segments are
/// dropped, so an empty package name writes straight into `output_dir`.
fn package_root(output_dir: &Path, package: &str) -> PathBuf {
    let mut root = output_dir.to_path_buf();
    for segment in package.split('.').filter(|segment| !segment.is_empty()) {
        root.push(segment);
    }
    root
}

/// Pick unique module and struct names for a table. Tables sharing a
/// name across schemas fall back to a schema-qualified module, then to
/// a counter. Struct names that repeat get a digit suffix; an
/// underscore there would break the PascalCase convention.
fn module_entry(table: &Table, names: &mut UsedNames) -> ModuleEntry {
    let mut candidate = to_snake_ident(&table.name.name);
    if !names.modules.insert(candidate.clone()) {
        if let Some(schema) = &table.name.schema {
            candidate = to_snake_ident(&format!("{schema} {}", table.name.name));
        }
        let stem = candidate
            .strip_prefix("r#")
            .unwrap_or(&candidate)
            .to_string();
        let mut counter = 2;
        while !names.modules.insert(candidate.clone()) {
            candidate = format!("{stem}_{counter}");
            counter += 1;
        }
    }
    let base = to_pascal_case(&candidate);
    let mut struct_name = base.clone();
    let mut counter = 2;
    while !names.structs.insert(struct_name.clone()) {
        struct_name = format!("{base}{counter}");
        counter += 1;
    }
    let file_stem = candidate
        .strip_prefix("r#")
        .unwrap_or(&candidate)
        .to_string();
    ModuleEntry {
        struct_name,
        module: candidate,
        file_stem,
    }
}

fn option_expr(value: Option<&str>) -> String {
    match value {
        Some(value) => format!("Some(\"{}\")", value.escape_default()),
        None => "None".to_string(),
    }
}

fn string_array_literal(columns: &[Column]) -> String {
    columns
        .iter()
        .map(|column| format!("\"{}\"", column.name.escape_default()))
        .collect::<Vec<_>>()
        .join(", ")
}

fn column_list(columns: &[Column]) -> String {
    columns
        .iter()
        .map(|column| column.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn fk_action_label(action: &FkAction) -> &'static str {
    match action {
        FkAction::NoAction => "no action",
        FkAction::Restrict => "restrict",
        FkAction::Cascade => "cascade",
        FkAction::SetNull => "set null",
        FkAction::SetDefault => "set default",
        FkAction::Unknown => "unknown",
    }
}

fn foreign_key_line(fk: &ForeignKey) -> String {
    format!(
        "{}: ({}) references {} ({}), on update {}, on delete {}",
        fk.name.as_deref().unwrap_or("<unnamed>"),
        column_list(&fk.referencing_columns),
        fk.referenced_table,
        column_list(&fk.referenced_columns),
        fk_action_label(&fk.on_update),
        fk_action_label(&fk.on_delete),
    )
}

fn index_line(index: &Index) -> String {
    let kind = if index.is_unique {
        "unique index"
    } else {
        "index"
    };
    format!("{kind} {} ({})", index.name, column_list(&index.columns))
}
