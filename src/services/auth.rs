// src/services/auth.rs

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde_json::Value;

use crate::{
    common::error::AppError,
    models::auth::{SellerContext, SessionClaims},
    services::api_client::{envelope_data, ApiClient},
};

// URL externa de instalação do app (sem token de sessão; veja ApiClient)
const INSTALL_URL: &str = "https://assinaturas.appns.com.br/api/ns/install";

#[derive(Clone)]
pub struct AuthService {
    api: ApiClient,
}

impl AuthService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Decodifica o payload do token de sessão SEM validar assinatura.
    /// O token vem do SDK embarcado e quem o valida é o backend; aqui só
    /// precisamos do id da loja que está dentro dele.
    pub fn decode_session_claims(token: &str) -> Result<SessionClaims, AppError> {
        let payload = token.split('.').nth(1).ok_or(AppError::InvalidToken)?;
        let bytes = URL_SAFE_NO_PAD
            .decode(payload.trim_end_matches('='))
            .map_err(|_| AppError::InvalidToken)?;
        serde_json::from_slice(&bytes).map_err(|_| AppError::InvalidToken)
    }

    /// Resolve o contexto do seller a partir do token de sessão:
    /// claims -> store id -> GET /app/seller/store/{storeId} -> data.id
    pub async fn resolve_seller(&self, token: &str) -> Result<SellerContext, AppError> {
        let claims = Self::decode_session_claims(token)?;
        let store_id = claims.store_id().ok_or(AppError::InvalidToken)?;

        tracing::info!("Store ID: {}", store_id);

        let content = self.api.get(&format!("/app/seller/store/{}", store_id)).await?;
        let data = envelope_data(&content);

        // O id volta como número ou string, dependendo da versão da API
        let seller_id = match data.get("id") {
            Some(Value::String(s)) if !s.is_empty() => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => return Err(AppError::SellerNotFound),
        };

        Ok(SellerContext { seller_id })
    }

    /// Fluxo de instalação do app: chama o domínio externo com o código
    /// recebido na query string. Sem Bearer token.
    pub async fn install(&self, code: &str) -> Result<Value, AppError> {
        tracing::info!("Iniciando instalação com código: {}", code);
        self.api.get(&format!("{}?code={}", INSTALL_URL, code)).await
    }
}
