//! Paymob wire types.
//!
//! Paymob expects some numeric fields as strings and returns integer ids.
//! These structs pin the exact JSON shape of each call.

use serde::{Deserialize, Deserializer, Serialize};

use crate::ports::{BillingData, OrderItem};

#[derive(Debug, Serialize)]
pub struct AuthRequestBody<'a> {
    pub api_key: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct AuthResponseBody {
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct OrderRequestBody<'a> {
    pub auth_token: &'a str,
    /// `"true"` or `"false"`.
    pub delivery_needed: String,
    pub amount_cents: String,
    pub currency: &'a str,
    pub items: &'a [OrderItem],
}

#[derive(Debug, Deserialize)]
pub struct OrderResponseBody {
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,
    #[serde(default)]
    pub amount_cents: Option<i64>,
    #[serde(default)]
    pub currency: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PaymentKeyRequestBody<'a> {
    pub auth_token: &'a str,
    pub amount_cents: String,
    pub expiration: u32,
    pub order_id: &'a str,
    pub currency: &'a str,
    pub billing_data: &'a BillingData,
    pub integration_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct PaymentKeyResponseBody {
    pub token: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IdRepr {
    Number(i64),
    Text(String),
}

/// Accepts `123` or `"123"`.
fn id_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match IdRepr::deserialize(deserializer)? {
        IdRepr::Number(n) => n.to_string(),
        IdRepr::Text(s) => s,
    })
}
