mod support;

use std::fs;
use std::sync::Arc;

use alugueis_client::commands::transfers::{self, TransferDraft, TransferPatch};
use alugueis_client::http::Method;
use alugueis_client::month::ReferenceMonth;
use alugueis_client::transfers::{PendingKind, StatusFilter, TransferFilters, TransferManager};
use serde_json::{Value, json};

use support::{FakeBackend, accept, decline, json, json_body, open_page, temp_home};

const USERS: &str = "/api/usuarios";
const LIST: &str = "/api/transferencias";
const STATS: &str = "/api/transferencias/estatisticas/resumo";

fn transfer(id: i64, confirmada: bool) -> Value {
    json!({
        "id": id,
        "origem_id": 1,
        "origem_nome": "Ana",
        "destino_id": 2,
        "destino_nome": "Bruno",
        "mes_referencia": "2025-11",
        "valor": 1500.0,
        "confirmada": confirmada,
        "descricao": "repasse"
    })
}

fn seeded_backend() -> Arc<FakeBackend> {
    let backend = FakeBackend::new();
    backend.route(
        Method::Get,
        USERS,
        json(200, json!({"usuarios": [{"id": 1, "nome": "Ana"}, {"id": 2, "nome": "Bruno"}]})),
    );
    backend.route(
        Method::Get,
        LIST,
        json(200, json!({"transferencias": [transfer(7, false), transfer(8, true)]})),
    );
    backend.route(
        Method::Get,
        STATS,
        json(
            200,
            json!({"total_transferencias": 2, "total_confirmadas": 1, "total_pendentes": 1,
                   "valor_total": 3000.0, "valor_confirmado": 1500.0, "valor_pendente": 1500.0}),
        ),
    );
    backend
}

fn november() -> Option<ReferenceMonth> {
    "2025-11".parse().ok()
}

#[test]
fn list_loads_users_transfers_and_statistics_with_filters() {
    let backend = seeded_backend();
    let home = temp_home("alugueis-transfer-list");
    assert!(home.is_ok());
    let Ok((_dir, home)) = home else { return };
    let Some(mut page) = open_page(&backend, &home) else { return };

    let filters = TransferFilters {
        mes_referencia: november(),
        origem_id: Some(1),
        destino_id: None,
        status: Some(StatusFilter::Pendente),
    };
    let listed = transfers::list(&mut page, filters);
    assert!(listed.is_ok());
    if let Ok(envelope) = listed {
        assert_eq!(envelope.command, "transfer list");
        assert_eq!(envelope.data["rows"][0]["status"], "Pendente");
        assert_eq!(envelope.data["rows"][0]["actions"], json!(["edit", "confirm", "delete"]));
        assert_eq!(envelope.data["rows"][1]["actions"], json!([]));
        assert_eq!(envelope.data["stats"]["valor_total"], 3000.0);
        assert_eq!(envelope.data["notifications"], json!([]));
    }
    assert_eq!(page.transfers.users().len(), 2);
    assert_eq!(page.transfers.options().filter_destination.len(), 2);

    let list_request = backend.last(Method::Get, LIST);
    assert!(list_request.is_some());
    if let Some(request) = list_request {
        assert_eq!(
            request.query,
            vec![
                ("mes_referencia".to_string(), "2025-11".to_string()),
                ("origem_id".to_string(), "1".to_string()),
                ("confirmada".to_string(), "false".to_string()),
            ]
        );
    }
    let stats_request = backend.last(Method::Get, STATS);
    assert!(stats_request.is_some());
    if let Some(request) = stats_request {
        assert_eq!(
            request.query,
            vec![("mes_referencia".to_string(), "2025-11".to_string())]
        );
    }
}

#[test]
fn filters_reload_list_and_stats_without_refetching_users() {
    let backend = seeded_backend();
    let home = temp_home("alugueis-transfer-filters");
    assert!(home.is_ok());
    let Ok((_dir, home)) = home else { return };
    let Some(mut page) = open_page(&backend, &home) else { return };

    assert!(transfers::list(&mut page, TransferFilters::default()).is_ok());
    let filtered = transfers::filter(
        &mut page,
        TransferFilters {
            destino_id: Some(2),
            status: Some(StatusFilter::Confirmada),
            ..TransferFilters::default()
        },
    );
    assert!(filtered.is_ok());
    if let Ok(envelope) = filtered {
        assert_eq!(envelope.data["filters"]["destino_id"], 2);
    }
    if let Some(request) = backend.last(Method::Get, LIST) {
        assert_eq!(
            request.query,
            vec![
                ("destino_id".to_string(), "2".to_string()),
                ("confirmada".to_string(), "true".to_string()),
            ]
        );
    }

    let cleared = transfers::clear_filters(&mut page);
    assert!(cleared.is_ok());
    assert!(page.transfers.filters().is_empty());
    if let Some(request) = backend.last(Method::Get, LIST) {
        assert!(request.query.is_empty());
    }
    if let Some(request) = backend.last(Method::Get, STATS) {
        assert!(request.query.is_empty());
    }

    assert_eq!(backend.count(Method::Get, USERS), 1);
    assert_eq!(backend.count(Method::Get, LIST), 3);
}

#[test]
fn failures_surface_per_panel() {
    let backend = FakeBackend::new();
    backend.route(Method::Get, USERS, json(500, json!({"detail": "db offline"})));
    backend.route(Method::Get, LIST, json(200, json!({"transferencias": []})));
    backend.route(Method::Get, STATS, json(500, json!({})));

    let home = temp_home("alugueis-transfer-panels");
    assert!(home.is_ok());
    let Ok((_dir, home)) = home else { return };
    let Some(mut page) = open_page(&backend, &home) else { return };

    let listed = transfers::list(&mut page, TransferFilters::default());
    assert!(listed.is_ok());
    if let Ok(envelope) = listed {
        assert_eq!(
            envelope.data["notifications"],
            json!([{"level": "error", "message": "Erro ao carregar usuários"}])
        );
        assert!(envelope.data["stats"].is_null());
        assert_eq!(envelope.data["transfers"], json!([]));
    }
}

#[test]
fn same_source_and_destination_never_reaches_the_server() {
    let backend = seeded_backend();
    let home = temp_home("alugueis-transfer-validation");
    assert!(home.is_ok());
    let Ok((_dir, home)) = home else { return };
    let Some(mut page) = open_page(&backend, &home) else { return };

    let created = transfers::create(
        &mut page,
        TransferDraft {
            origem_id: Some(3),
            destino_id: Some(3),
            mes_referencia: november(),
            valor: Some(100.0),
            ..TransferDraft::default()
        },
    );
    assert!(created.is_err());
    if let Err(error) = created {
        assert_eq!(error.code, "validation_failed");
        assert_eq!(error.message, "Origem e destino não podem ser iguais");
    }

    let zero = transfers::create(
        &mut page,
        TransferDraft {
            origem_id: Some(1),
            destino_id: Some(2),
            valor: Some(0.0),
            ..TransferDraft::default()
        },
    );
    assert!(zero.is_err());
    if let Err(error) = zero {
        assert_eq!(error.message, "Valor deve ser maior que zero");
    }

    assert!(page.transfers.editing().is_none());
    assert!(backend.requests().is_empty());
}

#[test]
fn create_posts_payload_then_reloads() {
    let backend = seeded_backend();
    backend.route(Method::Post, LIST, json(200, json!({"message": "ok", "id": 9})));
    let home = temp_home("alugueis-transfer-create");
    assert!(home.is_ok());
    let Ok((_dir, home)) = home else { return };
    let Some(mut page) = open_page(&backend, &home) else { return };

    let created = transfers::create(
        &mut page,
        TransferDraft {
            origem_id: Some(1),
            destino_id: Some(2),
            mes_referencia: november(),
            valor: Some(250.75),
            descricao: Some("condomínio".to_string()),
            confirmada: false,
        },
    );
    assert!(created.is_ok());
    if let Ok(envelope) = created {
        assert_eq!(
            envelope.data["notification"]["message"],
            "Transferência criada com sucesso"
        );
        assert_eq!(envelope.data["view"]["transfers"].as_array().map(Vec::len), Some(2));
    }

    let posted = backend.last(Method::Post, LIST);
    assert!(posted.is_some());
    if let Some(request) = posted {
        assert_eq!(
            json_body(&request),
            json!({
                "origem_id": 1,
                "destino_id": 2,
                "mes_referencia": "2025-11",
                "valor": 250.75,
                "descricao": "condomínio",
                "confirmada": false
            })
        );
    }
    assert_eq!(backend.count(Method::Get, LIST), 1);
    assert_eq!(backend.count(Method::Get, STATS), 1);
    assert!(page.transfers.editing().is_none());
}

#[test]
fn update_fetches_the_list_once_and_puts_the_merged_form() {
    let backend = seeded_backend();
    backend.route(Method::Put, "/api/transferencias/7", json(200, json!({"message": "ok"})));
    let home = temp_home("alugueis-transfer-update");
    assert!(home.is_ok());
    let Ok((_dir, home)) = home else { return };
    let Some(mut page) = open_page(&backend, &home) else { return };

    let updated = transfers::update(
        &mut page,
        7,
        TransferPatch {
            valor: Some(1800.0),
            ..TransferPatch::default()
        },
    );
    assert!(updated.is_ok());
    if let Ok(envelope) = updated {
        assert_eq!(
            envelope.data["notification"]["message"],
            "Transferência atualizada com sucesso"
        );
    }

    let put = backend.last(Method::Put, "/api/transferencias/7");
    assert!(put.is_some());
    if let Some(request) = put {
        let body = json_body(&request);
        assert_eq!(body["valor"], 1800.0);
        assert_eq!(body["origem_id"], 1);
        assert_eq!(body["descricao"], "repasse");
    }

    let missing = transfers::update(&mut page, 99, TransferPatch::default());
    assert!(missing.is_err());
    if let Err(error) = missing {
        assert_eq!(error.code, "not_found");
    }
}

#[test]
fn confirm_and_delete_require_explicit_confirmation() {
    let backend = seeded_backend();
    backend.route(
        Method::Post,
        "/api/transferencias/7/confirmar",
        json(200, json!({"message": "ok"})),
    );
    backend.route(
        Method::Delete,
        "/api/transferencias/7",
        json(400, json!({"detail": "Transferência já confirmada"})),
    );
    let home = temp_home("alugueis-transfer-confirm");
    assert!(home.is_ok());
    let Ok((_dir, home)) = home else { return };
    let Some(mut page) = open_page(&backend, &home) else { return };

    let declined = transfers::confirm(&mut page, 7, &decline);
    assert!(declined.is_ok());
    if let Ok(envelope) = declined {
        assert_eq!(envelope.data["confirmed"], false);
    }
    assert!(backend.requests().is_empty());
    assert!(page.transfers.pending().is_none());

    let prompts = std::sync::Mutex::new(Vec::new());
    let recording = |message: &str| {
        prompts
            .lock()
            .map(|mut seen| seen.push(message.to_string()))
            .is_ok()
    };
    let confirmed = transfers::confirm(&mut page, 7, &recording);
    assert!(confirmed.is_ok());
    if let Ok(envelope) = confirmed {
        assert_eq!(
            envelope.data["notification"]["message"],
            "Transferência confirmada com sucesso"
        );
    }
    assert_eq!(backend.count(Method::Post, "/api/transferencias/7/confirmar"), 1);
    assert_eq!(backend.count(Method::Get, LIST), 1);

    let deleted = transfers::delete(&mut page, 7, &recording);
    assert!(deleted.is_err());
    if let Err(error) = deleted {
        assert_eq!(error.code, "http_error");
        assert_eq!(error.message, "Transferência já confirmada");
    }
    assert!(page.transfers.pending().is_none());

    // The manager itself keeps a failed action pending until it is cancelled.
    let mut manager = TransferManager::new();
    manager.request_delete(7);
    assert!(manager.execute_pending(page.api()).is_err());
    assert!(matches!(
        manager.pending(),
        Some(action) if action.id == 7 && action.kind == PendingKind::Delete
    ));
    manager.cancel_pending();
    assert!(manager.pending().is_none());

    let seen = prompts.lock().map(|seen| seen.clone()).unwrap_or_default();
    assert_eq!(
        seen,
        vec![
            "Deseja realmente confirmar esta transferência? Esta ação não pode ser desfeita.",
            "Deseja realmente excluir esta transferência? Esta ação não pode ser desfeita.",
        ]
    );
}

#[test]
fn show_maps_missing_transfer_to_not_found() {
    let backend = seeded_backend();
    backend.route(Method::Get, "/api/transferencias/7", json(200, transfer(7, false)));
    let home = temp_home("alugueis-transfer-show");
    assert!(home.is_ok());
    let Ok((_dir, home)) = home else { return };
    let Some(page) = open_page(&backend, &home) else { return };

    let shown = transfers::show(&page, 7);
    assert!(shown.is_ok());
    if let Ok(envelope) = shown {
        assert_eq!(envelope.data["row"]["amount"], "R$ 1.500,00");
        assert_eq!(envelope.data["transfer"]["origem_nome"], "Ana");
    }

    let missing = transfers::show(&page, 404);
    assert!(missing.is_err());
    if let Err(error) = missing {
        assert_eq!(error.code, "not_found");
        assert_eq!(error.message, "Transferência não encontrada");
    }
}

#[test]
fn export_writes_the_filtered_list_as_csv() {
    let backend = seeded_backend();
    let home = temp_home("alugueis-transfer-export");
    assert!(home.is_ok());
    let Ok((dir, home)) = home else { return };
    let Some(mut page) = open_page(&backend, &home) else { return };

    let target = dir.path().join("transferencias.csv");
    let exported = transfers::export(&mut page, TransferFilters::default(), &target);
    assert!(exported.is_ok());
    if let Ok(envelope) = exported {
        assert_eq!(envelope.data["rows"], 2);
    }

    let written = fs::read_to_string(&target).unwrap_or_default();
    let lines = written.lines().collect::<Vec<&str>>();
    assert_eq!(lines.len(), 3);
    assert!(lines[1].starts_with("7,Ana,Bruno,2025-11,1500.00,Pendente"));
}

#[test]
fn lost_session_during_list_redirects_to_login() {
    let backend = seeded_backend();
    backend.route(Method::Get, LIST, json(401, json!({"detail": "Não autenticado"})));
    let home = temp_home("alugueis-transfer-401");
    assert!(home.is_ok());
    let Ok((_dir, home)) = home else { return };
    let Some(mut page) = open_page(&backend, &home) else { return };

    // The first queued response is consumed by this call.
    let first = transfers::list(&mut page, TransferFilters::default());
    assert!(first.is_ok());

    let listed = transfers::refresh(&mut page);
    assert!(listed.is_err());
    if let Err(error) = listed {
        assert!(error.is_unauthorized());
        assert_eq!(error.redirect().map(|target| target.path()), Some("/login"));
    }
}
