// src/services/status_service.rs

use std::sync::Arc;

use serde_json::Value;

use crate::{
    common::error::AppError,
    common::formatters::only_digits,
    common::notify::{Notification, Notifier},
    models::auth::SellerContext,
    models::seller::{SellerDocumentsData, SellerStatus},
    services::api_client::{envelope_data, ApiClient},
};

// Caminhos conhecidos onde a API já devolveu o CPF/CNPJ, em ordem de
// prioridade. O payload muda de formato entre versões; em vez de espalhar
// optional chaining pela UI, a lista fica explícita aqui.
const DOCUMENT_PATHS: &[&[&str]] = &[
    &["cpfCnpj"],
    &["userData", "cpfCnpj"],
    &["user", "userData", "cpfCnpj"],
];

fn lookup<'a>(raw: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let mut current = raw;
    for key in path {
        current = current.get(key)?;
    }
    Some(current)
}

/// Todos os candidatos a documento presentes no payload, já em dígitos,
/// na ordem de prioridade dos caminhos.
pub fn document_candidates(raw: &Value) -> Vec<String> {
    DOCUMENT_PATHS
        .iter()
        .filter_map(|path| lookup(raw, path))
        .filter_map(Value::as_str)
        .map(only_digits)
        .filter(|digits| !digits.is_empty())
        .collect()
}

fn is_usable_document(digits: &str) -> bool {
    digits.len() == 11 || digits.len() == 14
}

/// Deriva o status canônico a partir do payload cru da API.
///
/// Total sobre qualquer JSON: null, array, objeto pela metade: nada aqui
/// falha. Regras:
/// 1. needsDocuments explícito da API vence sempre;
/// 2. sem flag explícita, falta documento quando nenhum caminho conhecido
///    tem CPF (11) ou CNPJ (14), exceto com status "active", que encerra
///    o onboarding (contrato canônico; versões antigas divergiam aqui);
/// 3. status = app_status quando veio preenchido; senão "active" se a
///    assinatura está ativa; senão pending_documents/pending;
/// 4. cartão só é exigido com documentos resolvidos e status "pending*".
pub fn normalize(raw: &Value) -> SellerStatus {
    let explicit_needs_documents = raw.get("needsDocuments").and_then(Value::as_bool);

    let has_document = document_candidates(raw)
        .iter()
        .any(|digits| is_usable_document(digits));

    let app_status = raw
        .get("app_status")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty());

    let subscription_active = raw
        .get("subscription_status")
        .and_then(Value::as_str)
        .map(|s| s.eq_ignore_ascii_case("active"))
        .unwrap_or(false);

    // Sem flag explícita, decide pelo documento; "active" zera a pendência
    let mut needs_documents = explicit_needs_documents.unwrap_or(!has_document);

    let status = match app_status {
        Some(s) => s.to_string(),
        None if subscription_active => "active".to_string(),
        None if needs_documents => "pending_documents".to_string(),
        None => "pending".to_string(),
    };

    if explicit_needs_documents.is_none() && status == "active" {
        needs_documents = false;
    }

    let needs_card = !needs_documents && status.starts_with("pending");

    let message = raw
        .get("message")
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty())
        .map(str::to_string);

    // Campos auxiliares passam intactos; só removemos o que já consumimos
    // para não duplicar chave na serialização.
    let mut extra = raw.as_object().cloned().unwrap_or_default();
    for consumed in ["app_status", "needsDocuments", "message"] {
        extra.remove(consumed);
    }

    SellerStatus {
        status,
        message,
        needs_documents,
        needs_card,
        extra: Value::Object(extra),
    }
}

// Serviço de status/documentos do seller.
#[derive(Clone)]
pub struct StatusService {
    api: ApiClient,
    notifier: Arc<dyn Notifier>,
}

impl StatusService {
    pub fn new(api: ApiClient, notifier: Arc<dyn Notifier>) -> Self {
        Self { api, notifier }
    }

    /// Busca e normaliza o status do seller. Em caso de erro, notifica e
    /// devolve o erro; o chamador mantém o último status bom conhecido.
    pub async fn check_status(&self, seller: &SellerContext) -> Result<SellerStatus, AppError> {
        tracing::info!("🔍 Verificando status do seller: {}", seller.seller_id);

        let content = match self
            .api
            .get(&format!("/app/documents/{}/status", seller.seller_id))
            .await
        {
            Ok(content) => content,
            Err(error) => {
                self.notifier
                    .notify(Notification::danger(error.user_message(), "error-seller-status"));
                return Err(error);
            }
        };

        let status = normalize(envelope_data(&content));

        if status.requires_onboarding() {
            self.notifier.notify(
                Notification::danger(
                    format!(
                        "Status do seller: {}. É necessário completar documentos.",
                        status.status
                    ),
                    "seller-status-warning",
                )
                .with_duration(8000),
            );
        } else {
            tracing::info!("✅ Status do seller está ativo");
        }

        Ok(status)
    }

    /// Envia o CPF/CNPJ para completar os documentos e recarrega o status,
    /// para o gate reavaliar com dados frescos.
    pub async fn complete_documents(
        &self,
        seller: &SellerContext,
        data: &SellerDocumentsData,
    ) -> Result<SellerStatus, AppError> {
        tracing::info!("📝 Completando documentos do seller: {}", seller.seller_id);

        match self
            .api
            .post(&format!("/app/documents/{}/complete", seller.seller_id), data)
            .await
        {
            Ok(_) => {
                self.notifier.notify(Notification::success(
                    "Documentos do seller completados com sucesso!",
                    "seller-documents-completed",
                ));
                self.check_status(seller).await
            }
            Err(error) => {
                self.notifier
                    .notify(Notification::danger(error.user_message(), "error-seller-documents"));
                Err(error)
            }
        }
    }
}
