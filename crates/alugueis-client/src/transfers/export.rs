use std::fs::File;
use std::io::Write;
use std::path::Path;

use tracing::info;

use crate::contracts::types::Transfer;
use crate::{ClientError, ClientResult};

const HEADERS: [&str; 8] = [
    "id",
    "origem",
    "destino",
    "mes_referencia",
    "valor",
    "status",
    "descricao",
    "data_confirmacao",
];

/// Writes the transfer list as CSV and returns the number of data rows.
pub fn write_csv<W: Write>(writer: W, transfers: &[Transfer]) -> ClientResult<usize> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer
        .write_record(HEADERS)
        .map_err(|error| ClientError::internal_serialization(&error.to_string()))?;

    for transfer in transfers {
        let status = if transfer.confirmada { "Confirmada" } else { "Pendente" };
        csv_writer
            .write_record([
                transfer.id.to_string(),
                transfer.origem_nome.clone(),
                transfer.destino_nome.clone(),
                transfer.mes_referencia.clone(),
                format!("{:.2}", transfer.valor),
                status.to_string(),
                transfer.descricao.clone().unwrap_or_default(),
                transfer.data_confirmacao.clone().unwrap_or_default(),
            ])
            .map_err(|error| ClientError::internal_serialization(&error.to_string()))?;
    }

    csv_writer
        .flush()
        .map_err(|error| ClientError::internal_serialization(&error.to_string()))?;
    Ok(transfers.len())
}

pub fn export_to_path(path: &Path, transfers: &[Transfer]) -> ClientResult<usize> {
    let file = File::create(path).map_err(|error| ClientError::file_unwritable(path, &error.to_string()))?;
    let rows = write_csv(file, transfers)?;
    info!(path = %path.display(), rows, "transfers exported");
    Ok(rows)
}
