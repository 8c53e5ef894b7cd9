// src/common/error.rs

use std::collections::HashMap;
use thiserror::Error;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
// A taxonomia cobre os quatro casos que a UI precisa distinguir:
// transporte, resposta HTML (proxy quebrado), validação local e recusa de negócio.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Token de sessão inválido")]
    InvalidToken,

    #[error("Seller não encontrado para esta loja")]
    SellerNotFound,

    #[error("O servidor respondeu HTML em vez de JSON")]
    HtmlResponse,

    #[error("Formato de resposta inesperado")]
    UnexpectedFormat,

    // Recusa de negócio: o servidor respondeu success:false com uma mensagem
    #[error("Recusado pelo servidor: {0}")]
    Rejected(String),

    #[error("Erro de rede: {0}")]
    NetworkError(#[from] reqwest::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno")]
    InternalError(#[from] anyhow::Error),
}

impl AppError {
    /// Mensagem pronta para exibir ao usuário (o texto do toast).
    /// Erros de validação viram a primeira mensagem de campo; o restante
    /// segue o mesmo mapeamento que fazíamos na camada HTTP.
    pub fn user_message(&self) -> String {
        match self {
            AppError::ValidationError(errors) => field_messages(errors)
                .into_iter()
                .flat_map(|(_, msgs)| msgs)
                .next()
                .unwrap_or_else(|| "Um ou mais campos são inválidos.".to_string()),
            AppError::InvalidToken => "Token de autenticação inválido ou ausente.".to_string(),
            AppError::SellerNotFound => "SellerId não encontrado".to_string(),
            AppError::HtmlResponse => {
                "Erro de comunicação com o servidor. Verifique se a API está ativa.".to_string()
            }
            AppError::UnexpectedFormat => "Formato de dados inesperado".to_string(),
            AppError::Rejected(message) => message.clone(),
            AppError::NetworkError(_) => "Erro de comunicação com o servidor.".to_string(),
            AppError::InternalError(e) => {
                // O tracing guarda o detalhe; o usuário recebe o genérico.
                tracing::error!("Erro interno: {}", e);
                "Ocorreu um erro inesperado.".to_string()
            }
        }
    }

    /// Indica se o erro nasceu antes de qualquer chamada de rede.
    pub fn is_validation(&self) -> bool {
        matches!(self, AppError::ValidationError(_))
    }
}

/// Achata um `ValidationErrors` em campo -> mensagens, no mesmo formato
/// que devolvíamos no corpo `details` das respostas 400.
pub fn field_messages(errors: &validator::ValidationErrors) -> HashMap<String, Vec<String>> {
    let mut details = HashMap::new();
    for (field, field_errors) in errors.field_errors() {
        let messages: Vec<String> = field_errors
            .iter()
            .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
            .collect();
        details.insert(field.to_string(), messages);
    }
    details
}
