use crate::ClientResult;
use crate::commands::Page;
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::UsersData;

pub fn run(page: &mut Page) -> ClientResult<SuccessEnvelope> {
    let notifications = page.transfers.load_users(&page.api)?;
    success(
        "users",
        UsersData {
            users: page.transfers.users().to_vec(),
            notifications,
        },
    )
}
