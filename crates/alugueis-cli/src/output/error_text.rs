use alugueis_client::ClientError;

pub fn render_error(error: &ClientError) -> String {
    let mut lines = vec![
        "Não foi possível concluir a operação.".to_string(),
        String::new(),
        format!("  Error:    {}", error.code),
        format!("  Details:  {}", error.message),
    ];
    if let Some(target) = error.redirect() {
        lines.push(format!("  Redirect: {}", target.path()));
    }
    lines.push(String::new());
    lines.push("What to do next:".to_string());

    if error.recovery_steps.is_empty() {
        lines.push("  1. Retry the command.".to_string());
    } else {
        for (index, step) in error.recovery_steps.iter().enumerate() {
            lines.push(format!("  {}. {step}", index + 1));
        }
    }

    lines.join("\n")
}
