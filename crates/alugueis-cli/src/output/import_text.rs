use std::io;

use alugueis_client::format::capitalize;
use serde_json::Value;

use super::format::{
    Column, key_value_rows, notification_from_value, render_table_or_blocks, terminal_width,
    text_field,
};

pub fn render_template(data: &Value) -> io::Result<String> {
    let mut lines = Vec::new();
    if let Some(line) = data.get("notification").and_then(notification_from_value) {
        lines.push(line);
    }
    if let Some(saved_to) = data.get("saved_to").and_then(Value::as_str) {
        lines.push(format!("  Salvo em: {saved_to}"));
    }
    Ok(lines.join("\n"))
}

pub fn render_file_selection(data: &Value) -> io::Result<String> {
    let mut lines = Vec::new();
    if let Some(line) = data.get("notification").and_then(notification_from_value) {
        lines.push(line);
    }
    if let Some(file) = data.get("file") {
        lines.push(file_line(file));
    }
    Ok(lines.join("\n"))
}

pub fn render_preview(data: &Value) -> io::Result<String> {
    let table = data
        .get("table")
        .ok_or_else(|| io::Error::other("import preview output requires table"))?;
    let headers = string_list(table.get("headers"));
    let rows = table
        .get("rows")
        .and_then(Value::as_array)
        .map(|rows| rows.iter().map(|row| string_list(Some(row))).collect::<Vec<Vec<String>>>())
        .unwrap_or_default();

    let mut lines = vec!["Pré-visualização dos dados".to_string()];
    if let Some(file) = data.get("file") {
        lines.push(file_line(file));
    }
    lines.push(String::new());

    if headers.is_empty() {
        lines.push("  Nenhuma coluna encontrada no arquivo.".to_string());
        return Ok(lines.join("\n"));
    }

    let columns = headers
        .iter()
        .map(|name| Column::left(name.as_str()))
        .collect::<Vec<Column<'_>>>();
    lines.extend(render_table_or_blocks(&columns, &rows, terminal_width(), "Linha"));
    lines.push(String::new());

    let shown = table.get("shown").and_then(Value::as_i64).unwrap_or(rows.len() as i64);
    match table.get("total").and_then(Value::as_i64) {
        Some(total) => lines.push(format!("  Mostrando {shown} de {total} linha(s)")),
        None => lines.push(format!("  Mostrando {shown} linha(s)")),
    }
    Ok(lines.join("\n"))
}

pub fn render_run(data: &Value) -> io::Result<String> {
    let mut lines = Vec::new();
    if let Some(template) = data.get("template").filter(|template| template.is_object()) {
        lines.push(render_template(template)?);
    }
    if data.get("confirmed").and_then(Value::as_bool) == Some(false) {
        lines.push("Importação cancelada.".to_string());
        return Ok(lines.join("\n"));
    }

    if let Some(line) = data.get("notification").and_then(notification_from_value) {
        lines.push(line);
    }
    let kind = data.get("import_type").and_then(Value::as_str).unwrap_or("");
    lines.push(format!("Resultado da importação ({})", capitalize(kind)));

    let Some(summary) = data.get("summary").filter(|summary| summary.is_object()) else {
        return Ok(lines.join("\n"));
    };
    lines.extend(key_value_rows(
        &[
            ("Importados:", text_field(summary, "imported")),
            ("Erros:", text_field(summary, "error_count")),
            ("Avisos:", text_field(summary, "warning_count")),
        ],
        2,
    ));

    for (title, key) in [("Erros:", "errors"), ("Avisos:", "warnings")] {
        let items = string_list(summary.get(key));
        if items.is_empty() {
            continue;
        }
        lines.push(String::new());
        lines.push(title.to_string());
        lines.extend(items.iter().map(|item| format!("  - {item}")));
    }
    Ok(lines.join("\n"))
}

pub fn render_check(data: &Value) -> io::Result<String> {
    let ready = data
        .get("status")
        .and_then(|status| status.get("success"))
        .and_then(Value::as_bool)
        .unwrap_or(false);

    let mut lines = Vec::new();
    if ready {
        lines.push("Dependências de importação instaladas.".to_string());
    } else if let Some(line) = data.get("notification").and_then(notification_from_value) {
        lines.push(line);
    }
    if let Some(message) = data
        .get("status")
        .and_then(|status| status.get("message"))
        .and_then(Value::as_str)
    {
        lines.push(format!("  {message}"));
    }
    Ok(lines.join("\n"))
}

fn file_line(file: &Value) -> String {
    format!(
        "  Arquivo: {} ({})",
        text_field(file, "name"),
        text_field(file, "size_label")
    )
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .map(|item| match item {
                    Value::String(text) => text.clone(),
                    other => other.to_string(),
                })
                .collect()
        })
        .unwrap_or_default()
}
