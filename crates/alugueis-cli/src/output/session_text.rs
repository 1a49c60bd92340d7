use std::io;

use serde_json::Value;

use super::format::{
    Column, key_value_rows, notification_from_value, notification_lines, render_table_or_blocks,
    terminal_width, text_field,
};

pub fn render_session(data: &Value) -> io::Result<String> {
    let mut lines = Vec::new();
    if let Some(line) = data.get("notification").and_then(notification_from_value) {
        lines.push(line);
    }

    if let Some(user) = data.get("user").filter(|user| user.is_object()) {
        lines.push(String::new());
        lines.extend(key_value_rows(
            &[
                ("Usuário:", text_field(user, "nome")),
                ("ID:", text_field(user, "id")),
            ],
            2,
        ));
    }

    if let Some(target) = data.get("redirect").and_then(Value::as_str) {
        lines.push(String::new());
        lines.push(format!("  Redirect: {target}"));
        lines.push("  Run `alugueis login --email <email>` to start a new session.".to_string());
    }

    Ok(lines.join("\n"))
}

pub fn render_users(data: &Value) -> io::Result<String> {
    let users = data
        .get("users")
        .and_then(Value::as_array)
        .ok_or_else(|| io::Error::other("users output requires users"))?;

    let mut lines = notification_lines(data.get("notifications"));
    if users.is_empty() {
        if lines.is_empty() {
            lines.push("Nenhum usuário cadastrado.".to_string());
        }
        return Ok(lines.join("\n"));
    }

    let rows = users
        .iter()
        .map(|user| vec![text_field(user, "id"), text_field(user, "nome")])
        .collect::<Vec<Vec<String>>>();
    lines.push("Usuários:".to_string());
    lines.extend(render_table_or_blocks(
        &[Column::right("ID"), Column::left("Nome")],
        &rows,
        terminal_width(),
        "Usuário",
    ));
    Ok(lines.join("\n"))
}
