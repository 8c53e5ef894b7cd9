// src/models/auth.rs

use serde::Deserialize;
use serde_json::Value;

// Claims do token de sessão fornecido pelo SDK embarcado.
// O id da loja já apareceu com três nomes diferentes em produção,
// então aceitamos todos e resolvemos em ordem de preferência.
#[derive(Debug, Deserialize)]
pub struct SessionClaims {
    #[serde(default, rename = "storeId")]
    store_id_camel: Option<Value>,

    #[serde(default, rename = "store_id")]
    store_id_snake: Option<Value>,

    #[serde(default)]
    iss: Option<Value>,
}

impl SessionClaims {
    /// storeId > store_id > iss. Números e strings valem igual.
    pub fn store_id(&self) -> Option<String> {
        [&self.store_id_camel, &self.store_id_snake, &self.iss]
            .into_iter()
            .filter_map(|v| v.as_ref())
            .find_map(value_as_id)
    }
}

// A API ora manda ids como número, ora como string.
fn value_as_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Contexto da sessão resolvido uma única vez e injetado nos serviços.
/// Nada de estado global: quem precisa do seller recebe isto por parâmetro.
#[derive(Debug, Clone)]
pub struct SellerContext {
    pub seller_id: String,
}
