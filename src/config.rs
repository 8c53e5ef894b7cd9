// src/config.rs

use std::{env, sync::Arc, time::Duration};

use crate::{
    common::notify::{Notifier, TracingNotifier},
    services::{ApiClient, AuthService, StatusService, SubscriptionService},
};

#[derive(Clone)]
pub struct AppState {
    pub api: ApiClient,
    pub session_token: String,
    // Os serviços ficam no estado, montados uma vez só
    pub auth_service: AuthService,
    pub status_service: StatusService,
    pub subscription_service: SubscriptionService,
}

impl AppState {
    // A assinatura retorna um Result: se a configuração falhar, quem chama decide
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let api_base_url = env::var("API_BASE_URL").expect("API_BASE_URL deve ser definida");
        // Token de sessão emitido pelo SDK embarcado que hospeda o painel
        let session_token = env::var("SESSION_TOKEN").expect("SESSION_TOKEN deve ser definido");

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        tracing::info!("✅ Cliente HTTP configurado para {}", api_base_url);

        // --- Monta o gráfico de dependências ---
        let api = ApiClient::new(http, api_base_url, session_token.clone());
        let notifier: Arc<dyn Notifier> = Arc::new(TracingNotifier);

        let auth_service = AuthService::new(api.clone());
        let status_service = StatusService::new(api.clone(), notifier.clone());
        let subscription_service = SubscriptionService::new(api.clone(), notifier);

        Ok(Self {
            api,
            session_token,
            auth_service,
            status_service,
            subscription_service,
        })
    }
}
