// src/services/onboarding_service.rs

use serde_json::Value;

use crate::{
    common::formatters::{format_cpf_cnpj, format_phone, format_postal_code},
    models::billing::BillingForm,
    models::seller::SellerStatus,
    services::status_service::document_candidates,
};

/// Estado do modal de onboarding. Máquina explícita, sem framework:
/// a camada de renderização só pergunta o estado e despacha eventos.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Hidden,
    VisibleLocked,
    VisibleDismissable,
}

#[derive(Debug)]
pub struct OnboardingGate {
    state: GateState,
}

impl Default for OnboardingGate {
    fn default() -> Self {
        Self::new()
    }
}

impl OnboardingGate {
    pub fn new() -> Self {
        Self { state: GateState::Hidden }
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    pub fn is_visible(&self) -> bool {
        self.state != GateState::Hidden
    }

    /// Reavalia o gate a cada status novo. Pendência abre (e tranca) o
    /// modal; sem pendência, um modal já aberto vira dispensável, mas um
    /// modal fechado não reabre à toa.
    pub fn on_status(&mut self, status: &SellerStatus) {
        if status.requires_onboarding() {
            self.state = GateState::VisibleLocked;
        } else if self.state != GateState::Hidden {
            self.state = GateState::VisibleDismissable;
        }
    }

    /// Fechar só funciona quando não há nada pendente. Enquanto trancado,
    /// dispensar é um no-op: o onboarding não se pula fechando o dialog.
    pub fn dismiss(&mut self) -> bool {
        if self.state == GateState::VisibleDismissable {
            self.state = GateState::Hidden;
            return true;
        }
        false
    }

    /// Submissão de assinatura bem-sucedida é a única saída do estado
    /// trancado.
    pub fn on_submission(&mut self, success: bool) {
        if success {
            self.state = GateState::Hidden;
        }
    }
}

// Caminhos candidatos para cada campo do formulário, em ordem de
// prioridade. Mesma tática do normalizador: a API já mandou esses dados
// em mais de um lugar.
const NAME_PATHS: &[&[&str]] = &[&["store_name"], &["userData", "name"], &["name"]];
const EMAIL_PATHS: &[&[&str]] = &[&["store_email"], &["userData", "email"], &["email"]];
const PHONE_PATHS: &[&[&str]] = &[&["phone"], &["userData", "phone"], &["user", "userData", "phone"]];
const POSTAL_PATHS: &[&[&str]] = &[&["postalCode"], &["userData", "postalCode"]];
const CITY_PATHS: &[&[&str]] = &[&["city"], &["userData", "city"]];

fn first_non_empty(extra: &Value, paths: &[&[&str]]) -> Option<String> {
    paths.iter().find_map(|path| {
        let mut current = extra;
        for key in *path {
            current = current.get(key)?;
        }
        current
            .as_str()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    })
}

fn fill_if_empty(field: &mut String, candidate: Option<String>) {
    if field.trim().is_empty() {
        if let Some(value) = candidate {
            *field = value;
        }
    }
}

/// Pré-preenche o formulário de cobrança na abertura do modal.
/// Só escreve em campo vazio: o que o usuário já digitou é sagrado.
pub fn prefill_billing_form(form: &mut BillingForm, status: &SellerStatus) {
    let extra = &status.extra;

    fill_if_empty(&mut form.name, first_non_empty(extra, NAME_PATHS));
    fill_if_empty(&mut form.email, first_non_empty(extra, EMAIL_PATHS));
    fill_if_empty(
        &mut form.cpf_cnpj,
        document_candidates(extra).first().map(|d| format_cpf_cnpj(d)),
    );
    fill_if_empty(
        &mut form.phone,
        first_non_empty(extra, PHONE_PATHS).map(|p| format_phone(&p)),
    );
    fill_if_empty(
        &mut form.postal_code,
        first_non_empty(extra, POSTAL_PATHS).map(|p| format_postal_code(&p)),
    );
    fill_if_empty(&mut form.city, first_non_empty(extra, CITY_PATHS));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::status_service::normalize;
    use serde_json::json;

    fn status_requiring_onboarding() -> SellerStatus {
        normalize(&json!({}))
    }

    fn status_active() -> SellerStatus {
        normalize(&json!({ "app_status": "active" }))
    }

    #[test]
    fn active_status_never_opens_the_gate() {
        let mut gate = OnboardingGate::new();
        gate.on_status(&status_active());
        assert_eq!(gate.state(), GateState::Hidden);
    }

    #[test]
    fn pending_documents_locks_the_gate() {
        let mut gate = OnboardingGate::new();
        gate.on_status(&status_requiring_onboarding());
        assert_eq!(gate.state(), GateState::VisibleLocked);
    }

    #[test]
    fn locked_gate_ignores_any_number_of_dismisses() {
        let mut gate = OnboardingGate::new();
        gate.on_status(&status_requiring_onboarding());

        for _ in 0..5 {
            assert!(!gate.dismiss());
            assert_eq!(gate.state(), GateState::VisibleLocked);
        }
    }

    #[test]
    fn failed_submission_keeps_the_paywall() {
        let mut gate = OnboardingGate::new();
        gate.on_status(&status_requiring_onboarding());
        gate.on_submission(false);
        assert_eq!(gate.state(), GateState::VisibleLocked);
    }

    #[test]
    fn successful_submission_is_the_only_way_out_of_locked() {
        let mut gate = OnboardingGate::new();
        gate.on_status(&status_requiring_onboarding());
        gate.on_submission(true);
        assert_eq!(gate.state(), GateState::Hidden);
    }

    #[test]
    fn resolved_status_makes_an_open_gate_dismissable() {
        let mut gate = OnboardingGate::new();
        gate.on_status(&status_requiring_onboarding());

        // Novo fetch: nada mais pendente
        gate.on_status(&status_active());
        assert_eq!(gate.state(), GateState::VisibleDismissable);

        assert!(gate.dismiss());
        assert_eq!(gate.state(), GateState::Hidden);

        // E fechado continua fechado no próximo fetch limpo
        gate.on_status(&status_active());
        assert_eq!(gate.state(), GateState::Hidden);
    }

    #[test]
    fn prefill_only_touches_empty_fields() {
        let status = normalize(&json!({
            "store_name": "Loja da Maria",
            "store_email": "maria@email.com",
            "userData": { "cpfCnpj": "12345678900", "phone": "11999998888" }
        }));

        let mut form = BillingForm { name: "Já digitado".to_string(), ..Default::default() };
        prefill_billing_form(&mut form, &status);

        assert_eq!(form.name, "Já digitado"); // não sobrescreve
        assert_eq!(form.email, "maria@email.com");
        assert_eq!(form.cpf_cnpj, "123.456.789-00");
        assert_eq!(form.phone, "(11) 99999-8888");
        assert_eq!(form.city, "");
    }

    #[test]
    fn prefill_first_non_empty_wins_across_paths() {
        let status = normalize(&json!({
            "store_email": "",
            "userData": { "email": "fallback@email.com" }
        }));

        let mut form = BillingForm::default();
        prefill_billing_form(&mut form, &status);
        assert_eq!(form.email, "fallback@email.com");
    }
}
