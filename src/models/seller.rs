// src/models/seller.rs

use serde::{Deserialize, Serialize};
use serde_json::Value;

// O status canônico do seller, derivado do payload cru da API.
// A API muda de formato com frequência; este struct é o contrato estável
// que o resto do app consome. Nunca é persistido; vive só na sessão.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SellerStatus {
    pub status: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    pub needs_documents: bool,
    pub needs_card: bool,

    // Campos auxiliares de exibição (store_name, subscription_id etc.)
    // passam intactos, sem peso de decisão.
    #[serde(flatten)]
    pub extra: Value,
}

impl SellerStatus {
    /// O onboarding só está completo quando nada mais é exigido.
    pub fn requires_onboarding(&self) -> bool {
        self.needs_documents || self.needs_card
    }
}

// Corpo do POST /app/documents/{sellerId}/complete
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SellerDocumentsData {
    pub cpf_cnpj: String,
}
