use crate::cli::{Commands, ImportCommand, TransferCommand};

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum OutputMode {
    Text,
    Json,
}

impl OutputMode {
    fn from_flag(json: bool) -> Self {
        if json { Self::Json } else { Self::Text }
    }
}

pub fn mode_for_command(command: &Commands) -> OutputMode {
    match command {
        Commands::Login { json, .. }
        | Commands::Logout { json }
        | Commands::Whoami { json }
        | Commands::Users { json } => OutputMode::from_flag(*json),
        Commands::Transfer { command } => match command {
            TransferCommand::List { json, .. }
            | TransferCommand::Show { json, .. }
            | TransferCommand::Create { json, .. }
            | TransferCommand::Update { json, .. }
            | TransferCommand::Confirm { json, .. }
            | TransferCommand::Delete { json, .. }
            | TransferCommand::Export { json, .. } => OutputMode::from_flag(*json),
        },
        Commands::Import { command } => match command {
            ImportCommand::Template { json, .. }
            | ImportCommand::Preview { json, .. }
            | ImportCommand::Run { json, .. }
            | ImportCommand::Check { json } => OutputMode::from_flag(*json),
        },
        Commands::Shell => OutputMode::Text,
    }
}
