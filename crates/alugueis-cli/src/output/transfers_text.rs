use std::io;

use alugueis_client::format::format_brl;
use chrono::{DateTime, NaiveDateTime};
use serde_json::Value;

use super::format::{
    Column, key_value_rows, notification_from_value, notification_lines, render_table_or_blocks,
    terminal_width, text_field,
};

const COLUMNS: [Column<'static>; 7] = [
    Column::right("ID"),
    Column::left("Origem"),
    Column::left("Destino"),
    Column::left("Mês"),
    Column::right("Valor"),
    Column::left("Status"),
    Column::left("Ações"),
];

pub fn render_transfer_list(data: &Value) -> io::Result<String> {
    let mut lines = notification_lines(data.get("notifications"));
    if !lines.is_empty() {
        lines.push(String::new());
    }
    lines.extend(render_view(data)?);
    Ok(lines.join("\n"))
}

pub fn render_transfer_mutation(data: &Value) -> io::Result<String> {
    let mut lines = Vec::new();
    if let Some(line) = data.get("notification").and_then(notification_from_value) {
        lines.push(line);
    }
    let view = data
        .get("view")
        .ok_or_else(|| io::Error::other("transfer mutation output requires view"))?;
    lines.extend(notification_lines(view.get("notifications")));

    if data.get("confirmed").and_then(Value::as_bool) == Some(false) {
        return Ok(lines.join("\n"));
    }
    let has_rows = view
        .get("rows")
        .and_then(Value::as_array)
        .is_some_and(|rows| !rows.is_empty());
    if has_rows {
        lines.push(String::new());
        lines.extend(render_view(view)?);
    }
    Ok(lines.join("\n"))
}

pub fn render_transfer_detail(data: &Value) -> io::Result<String> {
    let transfer = data
        .get("transfer")
        .ok_or_else(|| io::Error::other("transfer show output requires transfer"))?;
    let row = data
        .get("row")
        .ok_or_else(|| io::Error::other("transfer show output requires row"))?;

    let mut lines = vec![format!("Transferência #{}", text_field(transfer, "id")), String::new()];
    lines.extend(key_value_rows(
        &[
            ("Origem:", text_field(row, "origin")),
            ("Destino:", text_field(row, "destination")),
            ("Mês:", text_field(row, "month")),
            ("Valor:", text_field(row, "amount")),
            ("Status:", text_field(row, "status")),
            ("Descrição:", text_field(row, "description")),
            ("Confirmada em:", timestamp_field(transfer, "data_confirmacao")),
            ("Criada em:", timestamp_field(transfer, "created_at")),
            ("Atualizada em:", timestamp_field(transfer, "updated_at")),
        ],
        2,
    ));
    Ok(lines.join("\n"))
}

pub fn render_transfer_export(data: &Value) -> io::Result<String> {
    let mut lines = notification_lines(data.get("notifications"));
    lines.push(format!("  Arquivo: {}", text_field(data, "path")));
    Ok(lines.join("\n"))
}

fn render_view(view: &Value) -> io::Result<Vec<String>> {
    let rows = view
        .get("rows")
        .and_then(Value::as_array)
        .ok_or_else(|| io::Error::other("transfer list output requires rows"))?;

    let mut lines = Vec::new();
    if let Some(stats) = view.get("stats").filter(|stats| stats.is_object()) {
        lines.push("Resumo:".to_string());
        lines.extend(render_stats(stats));
        lines.push(String::new());
    }

    if rows.is_empty() {
        lines.push("Nenhuma transferência encontrada.".to_string());
        return Ok(lines);
    }

    let table_rows = rows.iter().map(table_row).collect::<Vec<Vec<String>>>();
    lines.push("Transferências:".to_string());
    lines.extend(render_table_or_blocks(
        &COLUMNS,
        &table_rows,
        terminal_width(),
        "Transferência",
    ));
    Ok(lines)
}

fn render_stats(stats: &Value) -> Vec<String> {
    let count = |key: &str| {
        stats
            .get(key)
            .and_then(Value::as_i64)
            .unwrap_or(0)
            .to_string()
    };
    let money = |key: &str| format_brl(stats.get(key).and_then(Value::as_f64).unwrap_or(0.0));
    key_value_rows(
        &[
            ("Total:", format!("{} ({})", count("total_transferencias"), money("valor_total"))),
            ("Confirmadas:", format!("{} ({})", count("total_confirmadas"), money("valor_confirmado"))),
            ("Pendentes:", format!("{} ({})", count("total_pendentes"), money("valor_pendente"))),
        ],
        2,
    )
}

fn table_row(row: &Value) -> Vec<String> {
    let actions = row
        .get("actions")
        .and_then(Value::as_array)
        .map(|actions| {
            actions
                .iter()
                .filter_map(Value::as_str)
                .map(action_label)
                .collect::<Vec<&str>>()
                .join(", ")
        })
        .unwrap_or_default();
    vec![
        format!("#{}", text_field(row, "id")),
        text_field(row, "origin"),
        text_field(row, "destination"),
        text_field(row, "month"),
        text_field(row, "amount"),
        text_field(row, "status"),
        if actions.is_empty() { "-".to_string() } else { actions },
    ]
}

fn action_label(action: &str) -> &str {
    match action {
        "edit" => "editar",
        "confirm" => "confirmar",
        "delete" => "excluir",
        other => other,
    }
}

/// Backend timestamps come as naive ISO or RFC 3339; shown as `dd/mm/yyyy HH:MM`.
fn timestamp_field(value: &Value, key: &str) -> String {
    let Some(raw) = value.get(key).and_then(Value::as_str) else {
        return "-".to_string();
    };
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return parsed.format("%d/%m/%Y %H:%M").to_string();
    }
    match NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        Ok(parsed) => parsed.format("%d/%m/%Y %H:%M").to_string(),
        Err(_) => raw.to_string(),
    }
}
