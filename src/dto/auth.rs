use serde::{Deserialize, Serialize};

use crate::entity::accounts::AccountType;

#[derive(Debug, Deserialize, Serialize)]
pub struct Claims {
    pub sub: String,
    pub account_type: AccountType,
    pub exp: usize,
}
