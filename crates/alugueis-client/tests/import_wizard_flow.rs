mod support;

use std::fs;

use alugueis_client::commands::import;
use alugueis_client::contracts::envelope::failure_from_error;
use alugueis_client::http::{Method, RequestBody};
use alugueis_client::import::{DirectorySink, FileCandidate, ImportKind, ImportWizard};
use alugueis_client::month::ReferenceMonth;
use serde_json::json;

use support::{FakeBackend, accept, bytes, decline, json, multipart_fields, open_page, temp_home};

const TEMPLATE_PATH: &str = "/api/importacao/template/proprietarios";
const PREVIEW_PATH: &str = "/api/importacao/preview";

#[test]
fn proprietarios_template_preview_and_import() {
    let backend = FakeBackend::new();
    backend.route(Method::Get, TEMPLATE_PATH, bytes(200, b"PK\x03\x04template"));
    backend.route(
        Method::Post,
        PREVIEW_PATH,
        json(
            200,
            json!({
                "colunas": ["nome", "cpf"],
                "preview": [
                    {"nome": "Ana Souza", "cpf": "111.222.333-44"},
                    {"nome": "Bruno Lima", "cpf": null}
                ],
                "total_linhas_preview": 2,
                "total_linhas": 2
            }),
        ),
    );
    backend.route(
        Method::Post,
        "/api/importacao/proprietarios",
        json(
            200,
            json!({"success": true, "importados": 2, "erros": [], "warnings": ["linha 3: cpf vazio"]}),
        ),
    );

    let home = temp_home("alugueis-import-flow");
    assert!(home.is_ok());
    let Ok((dir, home)) = home else { return };
    let Some(mut page) = open_page(&backend, &home) else { return };

    let downloads = dir.path().join("downloads");
    let template = import::template(&mut page, ImportKind::Proprietarios, Some(&downloads));
    assert!(template.is_ok());
    if let Ok(envelope) = template {
        assert_eq!(envelope.command, "import template");
        assert_eq!(
            envelope.data["notification"]["message"],
            "Template de proprietarios baixado com sucesso!"
        );
        assert_eq!(envelope.data["file_name"], "template_proprietarios.xlsx");
    }
    assert_eq!(backend.count(Method::Get, TEMPLATE_PATH), 1);
    assert_eq!(
        fs::read(downloads.join("template_proprietarios.xlsx")).ok(),
        Some(b"PK\x03\x04template".to_vec())
    );

    let csv_path = dir.path().join("dados.csv");
    let mut body = String::from("nome,cpf\n");
    while body.len() < 50 * 1024 {
        body.push_str("Ana Souza,111.222.333-44\n");
    }
    body.truncate(50 * 1024);
    assert!(fs::write(&csv_path, &body).is_ok());

    let preview = import::preview(&mut page, Some(&csv_path));
    assert!(preview.is_ok());
    if let Ok(envelope) = preview {
        assert_eq!(envelope.data["file"]["name"], "dados.csv");
        assert_eq!(envelope.data["file"]["size_label"], "50.00 KB");
        assert_eq!(envelope.data["table"]["headers"], json!(["nome", "cpf"]));
        assert_eq!(envelope.data["table"]["rows"][1], json!(["Bruno Lima", "-"]));
    }
    let sent = backend.last(Method::Post, PREVIEW_PATH);
    assert!(sent.is_some());
    if let Some(request) = sent {
        match request.body {
            RequestBody::Multipart { file, fields } => {
                assert_eq!(file.field, "file");
                assert_eq!(file.file_name, "dados.csv");
                assert_eq!(file.bytes.len(), 50 * 1024);
                assert!(fields.is_empty());
            }
            other => panic!("expected multipart body, got {other:?}"),
        }
    }

    let run = import::run(&mut page, None, None, None, &accept);
    assert!(run.is_ok());
    if let Ok(envelope) = run {
        assert_eq!(envelope.data["confirmed"], true);
        assert_eq!(envelope.data["summary"]["imported"], 2);
        assert_eq!(envelope.data["summary"]["warning_count"], 1);
        assert_eq!(
            envelope.data["notification"]["message"],
            "Importação concluída! 2 registro(s) importado(s)"
        );
    }
    assert_eq!(backend.count(Method::Post, "/api/importacao/proprietarios"), 1);
    assert_eq!(backend.count(Method::Get, TEMPLATE_PATH), 1);
}

#[test]
fn declined_import_uploads_nothing() {
    let backend = FakeBackend::new();
    let home = temp_home("alugueis-import-declined");
    assert!(home.is_ok());
    let Ok((dir, home)) = home else { return };
    let Some(mut page) = open_page(&backend, &home) else { return };

    let path = dir.path().join("imoveis.xlsx");
    assert!(fs::write(&path, b"PK\x03\x04").is_ok());

    let run = import::run(&mut page, Some(ImportKind::Imoveis), Some(&path), None, &decline);
    assert!(run.is_ok());
    if let Ok(envelope) = run {
        assert_eq!(envelope.data["confirmed"], false);
        assert!(envelope.data["outcome"].is_null());
        assert_eq!(envelope.data["template"]["file_name"], "template_imoveis.xlsx");
    }
    // Choosing the type fetched its template; the file itself never left.
    assert_eq!(backend.requests().len(), 1);
    assert_eq!(backend.count(Method::Get, "/api/importacao/template/imoveis"), 1);
    assert_eq!(backend.count(Method::Post, "/api/importacao/imoveis"), 0);
}

#[test]
fn participacoes_import_sends_reference_month_only_for_that_type() {
    let backend = FakeBackend::new();
    let outcome = json(200, json!({"success": true, "importados": 1}));
    backend.route(Method::Post, "/api/importacao/participacoes", outcome.clone());
    backend.route(Method::Post, "/api/importacao/alugueis", outcome);

    let home = temp_home("alugueis-import-month");
    assert!(home.is_ok());
    let Ok((dir, home)) = home else { return };
    let Some(mut page) = open_page(&backend, &home) else { return };

    let path = dir.path().join("participacoes.csv");
    assert!(fs::write(&path, "imovel,proprietario,percentual\n").is_ok());
    let month = "2025-11".parse::<ReferenceMonth>().ok();

    let run = import::run(&mut page, Some(ImportKind::Participacoes), Some(&path), month, &accept);
    assert!(run.is_ok());
    let sent = backend.last(Method::Post, "/api/importacao/participacoes");
    assert!(sent.is_some());
    if let Some(request) = sent {
        assert_eq!(
            multipart_fields(&request),
            vec![("mes_referencia".to_string(), "2025-11".to_string())]
        );
    }

    let run = import::run(&mut page, Some(ImportKind::Alugueis), None, month, &accept);
    assert!(run.is_ok());
    let sent = backend.last(Method::Post, "/api/importacao/alugueis");
    assert!(sent.is_some());
    if let Some(request) = sent {
        assert!(multipart_fields(&request).is_empty());
    }

    // Running again with the type already selected fetches no template.
    let again = import::run(&mut page, Some(ImportKind::Alugueis), None, month, &accept);
    assert!(again.is_ok());
    if let Ok(envelope) = again {
        assert!(envelope.data["template"].is_null());
    }
    assert_eq!(backend.count(Method::Get, "/api/importacao/template/participacoes"), 1);
    assert_eq!(backend.count(Method::Get, "/api/importacao/template/alugueis"), 1);
    assert_eq!(backend.count(Method::Post, "/api/importacao/alugueis"), 2);
}

#[test]
fn invalid_files_are_rejected_before_any_request() {
    let backend = FakeBackend::new();
    let home = temp_home("alugueis-import-reject");
    assert!(home.is_ok());
    let Ok((dir, home)) = home else { return };
    let Some(mut page) = open_page(&backend, &home) else { return };

    let pdf = dir.path().join("contrato.pdf");
    assert!(fs::write(&pdf, b"%PDF-1.7").is_ok());
    let rejected = import::preview(&mut page, Some(&pdf));
    assert!(rejected.is_err());
    if let Err(error) = rejected {
        assert_eq!(error.code, "validation_failed");
        assert_eq!(error.message, "Formato inválido. Use .xlsx, .xls ou .csv");
    }

    let big = dir.path().join("grande.xlsx");
    let file = fs::File::create(&big);
    assert!(file.is_ok());
    if let Ok(file) = file {
        assert!(file.set_len(10 * 1024 * 1024 + 1).is_ok());
    }
    let rejected = import::preview(&mut page, Some(&big));
    assert!(rejected.is_err());
    if let Err(error) = rejected {
        assert_eq!(error.message, "Arquivo muito grande. Máximo: 10MB");
    }

    let nothing = import::preview(&mut page, None);
    assert!(nothing.is_err());
    if let Err(error) = nothing {
        assert_eq!(error.message, "Nenhum arquivo selecionado");
    }

    let incomplete = import::run(&mut page, None, None, None, &accept);
    assert!(incomplete.is_err());
    if let Err(error) = incomplete {
        assert_eq!(error.message, "Selecione um arquivo e tipo de importação");
    }

    assert!(backend.requests().is_empty());
}

#[test]
fn template_failure_is_a_notification_but_lost_session_redirects() {
    let backend = FakeBackend::new();
    backend.route(
        Method::Get,
        "/api/importacao/template/imoveis",
        json(500, json!({"detail": "openpyxl ausente"})),
    );
    backend.route(
        Method::Get,
        "/api/importacao/template/alugueis",
        json(401, json!({"detail": "Token expirado"})),
    );

    let home = temp_home("alugueis-import-template-errors");
    assert!(home.is_ok());
    let Ok((dir, home)) = home else { return };
    let Some(mut page) = open_page(&backend, &home) else { return };

    let failed = import::template(&mut page, ImportKind::Imoveis, Some(dir.path()));
    assert!(failed.is_ok());
    if let Ok(envelope) = failed {
        assert_eq!(envelope.data["notification"]["level"], "error");
        assert_eq!(envelope.data["notification"]["message"], "Erro ao baixar template");
        assert!(envelope.data["saved_to"].is_null());
    }

    let expired = import::template(&mut page, ImportKind::Alugueis, Some(dir.path()));
    assert!(expired.is_err());
    if let Err(error) = expired {
        let failure = failure_from_error(&error);
        assert_eq!(failure.error.code, "unauthorized");
        assert_eq!(failure.error.message, "Token expirado");
        assert_eq!(failure.redirect.as_deref(), Some("/login"));
    }
}

#[test]
fn dependency_check_warns_when_server_is_missing_libraries() {
    let backend = FakeBackend::new();
    backend.route(
        Method::Get,
        "/api/importacao/check-dependencies",
        json(200, json!({"success": false, "message": "pandas não instalado"})),
    );

    let home = temp_home("alugueis-import-deps");
    assert!(home.is_ok());
    let Ok((_dir, home)) = home else { return };
    let Some(page) = open_page(&backend, &home) else { return };

    let checked = import::check(&page);
    assert!(checked.is_ok());
    if let Ok(envelope) = checked {
        assert_eq!(envelope.data["status"]["success"], false);
        assert_eq!(envelope.data["notification"]["level"], "warning");
        assert_eq!(
            envelope.data["notification"]["message"],
            "Aviso: Dependências de importação não instaladas completamente"
        );
    }
}

#[test]
fn wizard_state_follows_file_and_preview_lifecycle() {
    let backend = FakeBackend::new();
    backend.route(
        Method::Post,
        PREVIEW_PATH,
        json(
            200,
            json!({"colunas": ["endereco"], "preview": [{"endereco": "Rua A, 10"}],
                   "total_linhas_preview": 1}),
        ),
    );
    let home = temp_home("alugueis-import-state");
    assert!(home.is_ok());
    let Ok((_dir, home)) = home else { return };
    let Some(page) = open_page(&backend, &home) else { return };

    let mut wizard = ImportWizard::new();
    assert_eq!(wizard.kind(), None);
    let sink = DirectorySink::new(&home);
    let selected = wizard.select_kind(page.api(), ImportKind::Imoveis, &sink);
    assert!(selected.is_ok());
    assert_eq!(backend.count(Method::Get, "/api/importacao/template/imoveis"), 1);

    let accepted = wizard.accept_file(FileCandidate::from_bytes(
        "imoveis.CSV",
        b"endereco\nRua A, 10\n".to_vec(),
    ));
    assert!(accepted.is_ok());
    assert!(wizard.preview(page.api()).is_ok());
    assert!(wizard.last_preview().is_some());

    wizard.clear_file();
    assert!(wizard.file().is_none());
    assert!(wizard.last_preview().is_none());
    assert_eq!(wizard.kind(), Some(ImportKind::Imoveis));

    wizard.reset();
    assert_eq!(wizard.kind(), None);
    assert_eq!(backend.count(Method::Post, PREVIEW_PATH), 1);
}
