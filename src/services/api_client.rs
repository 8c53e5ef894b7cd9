// src/services/api_client.rs

use reqwest::{Client, RequestBuilder};
use serde::Serialize;
use serde_json::Value;

use crate::common::error::AppError;

// Domínio externo de instalação: chamadas para cá NÃO levam o token de sessão
const INSTALL_DOMAIN: &str = "assinaturas.appns.com.br";

// Um único cliente HTTP para toda a API de billing. Injeta o Bearer token
// do SDK embarcado em toda requisição, exceto nas chamadas de instalação.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    session_token: String,
}

impl ApiClient {
    pub fn new(http: Client, base_url: String, session_token: String) -> Self {
        Self { http, base_url, session_token }
    }

    pub async fn get(&self, path: &str) -> Result<Value, AppError> {
        let url = self.resolve_url(path);
        let request = self.authorize(self.http.get(&url), &url);
        let response = request.send().await?;
        Self::read_json(response).await
    }

    pub async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value, AppError> {
        let url = self.resolve_url(path);
        let request = self.authorize(self.http.post(&url), &url).json(body);
        let response = request.send().await?;
        Self::read_json(response).await
    }

    // Caminhos relativos caem na base configurada; URLs absolutas passam direto
    fn resolve_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else {
            format!("{}{}", self.base_url.trim_end_matches('/'), path)
        }
    }

    fn authorize(&self, request: RequestBuilder, url: &str) -> RequestBuilder {
        // Não modificar headers para chamadas externas de instalação
        if url.contains(INSTALL_DOMAIN) {
            return request;
        }
        request.bearer_auth(&self.session_token)
    }

    // Lê o corpo como texto antes de interpretar: proxy mal configurado
    // devolve HTML com status 200, e isso não pode passar como JSON.
    async fn read_json(response: reqwest::Response) -> Result<Value, AppError> {
        let status = response.status();
        let text = response.text().await?;

        if is_html_response(&text) {
            let preview: String = text.chars().take(100).collect();
            tracing::error!("API retornou HTML em vez de JSON: {}...", preview);
            return Err(AppError::HtmlResponse);
        }

        match serde_json::from_str::<Value>(&text) {
            Ok(body) => {
                if status.is_success() {
                    Ok(body)
                } else {
                    // 4xx/5xx com corpo JSON: repassa a mensagem do servidor
                    let message = server_message(&body)
                        .unwrap_or_else(|| format!("Erro HTTP {}", status.as_u16()));
                    Err(AppError::Rejected(message))
                }
            }
            Err(_) if status.is_success() => Err(AppError::UnexpectedFormat),
            Err(_) => Err(AppError::InternalError(anyhow::anyhow!(
                "HTTP {} sem corpo JSON",
                status.as_u16()
            ))),
        }
    }
}

/// Detecta resposta HTML no lugar de JSON (proxy/API fora do ar).
pub fn is_html_response(content: &str) -> bool {
    let trimmed = content.trim_start();
    trimmed.starts_with("<!DOCTYPE") || trimmed.starts_with("<html")
}

/// Campo `message` do corpo, quando o servidor mandou um.
pub fn server_message(body: &Value) -> Option<String> {
    body.get("message")
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}

/// A API ora embrulha em { success, data }, ora manda o conteúdo direto.
/// Aceitamos os dois formatos.
pub fn envelope_data(body: &Value) -> &Value {
    body.get("data").unwrap_or(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn html_detection_matches_doctype_and_html_tags() {
        assert!(is_html_response("<!DOCTYPE html><html>...</html>"));
        assert!(is_html_response("  <html lang=\"pt-BR\">"));
        assert!(!is_html_response("{\"success\":true}"));
        assert!(!is_html_response(""));
    }

    #[test]
    fn envelope_unwraps_data_but_tolerates_bare_content() {
        let wrapped = json!({ "success": true, "data": { "id": 1 } });
        assert_eq!(envelope_data(&wrapped), &json!({ "id": 1 }));

        let bare = json!({ "id": 2 });
        assert_eq!(envelope_data(&bare), &bare);
    }

    #[test]
    fn server_message_ignores_empty_and_missing() {
        assert_eq!(server_message(&json!({ "message": "sem saldo" })).as_deref(), Some("sem saldo"));
        assert_eq!(server_message(&json!({ "message": "" })), None);
        assert_eq!(server_message(&json!({})), None);
    }
}
