//src/main.rs

use std::env;

use assinaturas_core::config::AppState;
use assinaturas_core::models::billing::BillingForm;
use assinaturas_core::services::onboarding_service::{
    prefill_billing_form, GateState, OnboardingGate,
};

#[tokio::main]
async fn main() {
    // Inicializa o logger
    tracing_subscriber::fmt().with_target(false).compact().init();

    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    // Modo instalação: com INSTALL_CODE definido, só executa a instalação e sai
    if let Ok(code) = env::var("INSTALL_CODE") {
        match app_state.auth_service.install(&code).await {
            Ok(_) => tracing::info!("✅ Instalação concluída com sucesso!"),
            Err(e) => {
                tracing::error!("🔥 Erro durante instalação: {}", e.user_message());
                std::process::exit(1);
            }
        }
        return;
    }

    // 1. Resolve o seller a partir do token de sessão
    let seller = match app_state
        .auth_service
        .resolve_seller(&app_state.session_token)
        .await
    {
        Ok(seller) => seller,
        Err(e) => {
            tracing::error!("🔥 {}", e.user_message());
            std::process::exit(1);
        }
    };

    tracing::info!("✅ Seller resolvido: {}", seller.seller_id);

    // 2. Busca o status e deriva o estado do gate de onboarding
    let status = match app_state.status_service.check_status(&seller).await {
        Ok(status) => status,
        Err(_) => std::process::exit(1),
    };

    let mut gate = OnboardingGate::new();
    gate.on_status(&status);

    match gate.state() {
        GateState::Hidden => {
            tracing::info!("✅ Onboarding completo, nenhum modal necessário");
        }
        GateState::VisibleLocked | GateState::VisibleDismissable => {
            tracing::warn!(
                "⚠️ Onboarding pendente (status: {}, documentos: {}, cartão: {})",
                status.status,
                status.needs_documents,
                status.needs_card
            );

            // 3. Pré-preenche o formulário de cobrança com o que a API já sabe
            let mut form = BillingForm::default();
            prefill_billing_form(&mut form, &status);
            tracing::info!(
                "Formulário pré-preenchido: nome='{}' email='{}' documento='{}'",
                form.name,
                form.email,
                form.cpf_cnpj
            );
        }
    }
}
