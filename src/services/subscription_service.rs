// src/services/subscription_service.rs

use std::sync::Arc;

use rust_decimal::Decimal;
use serde_json::Value;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::{
    common::error::AppError,
    common::formatters::{format_date_to_iso, only_digits, parse_currency},
    common::notify::{Notification, Notifier},
    models::auth::SellerContext,
    models::billing::{
        BillingForm, BillingInfo, CardForm, CreditCard, CreditCardHolderInfo, PlanData,
        SubmissionResult, SubscriptionPayload,
    },
    services::api_client::{server_message, ApiClient},
};

// Helper: um ValidationErrors de uma entrada só, com a mensagem que a UI exibe.
fn field_error(field: &'static str, code: &'static str, message: &'static str) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    errors.add(field.into(), error);
    errors
}

#[derive(Clone)]
pub struct SubscriptionService {
    api: ApiClient,
    notifier: Arc<dyn Notifier>,
}

impl SubscriptionService {
    pub fn new(api: ApiClient, notifier: Arc<dyn Notifier>) -> Self {
        Self { api, notifier }
    }

    /// Monta o payload da assinatura a partir dos formulários preenchidos.
    /// Aqui acontecem as conversões de exibição -> API: máscaras caem,
    /// data vira ISO, renda vira Decimal.
    pub fn assemble_payload(
        plan: PlanData,
        billing: &BillingForm,
        card: &CardForm,
    ) -> SubscriptionPayload {
        let cpf_cnpj = only_digits(&billing.cpf_cnpj);
        let phone = only_digits(&billing.phone);

        let expiry_digits = only_digits(&card.expiry);
        let (expiry_month, expiry_year) = if expiry_digits.len() == 4 {
            // MM/AA -> MM + 20AA (formato que a API espera)
            (expiry_digits[0..2].to_string(), format!("20{}", &expiry_digits[2..4]))
        } else {
            (String::new(), String::new())
        };

        let holder_info = CreditCardHolderInfo {
            name: Some(billing.name.trim().to_string()),
            email: Some(billing.email.trim().to_string()),
            cpf_cnpj: Some(cpf_cnpj.clone()),
            mobile_phone: Some(phone.clone()),
            postal_code: Some(only_digits(&billing.postal_code)).filter(|p| !p.is_empty()),
            city: Some(billing.city.trim().to_string()).filter(|c| !c.is_empty()),
            birth_date: format_date_to_iso(&billing.birth_date),
            income_value: parse_currency(&billing.income_value),
        };

        SubscriptionPayload {
            plan_data: plan,
            billing_info: BillingInfo {
                billing_type: "CREDIT_CARD".to_string(),
                name: billing.name.trim().to_string(),
                email: billing.email.trim().to_string(),
                cpf_cnpj,
                phone,
                remote_ip: None,
                credit_card: Some(CreditCard {
                    holder_name: card.holder_name.trim().to_string(),
                    number: only_digits(&card.number),
                    expiry_month,
                    expiry_year,
                    ccv: only_digits(&card.ccv),
                }),
                credit_card_token: None,
                credit_card_holder_info: Some(holder_info),
            },
        }
    }

    /// Validação que bloqueia a submissão antes de qualquer rede.
    /// Falha fechada: o primeiro problema já derruba, com o campo no erro.
    pub fn validate_payload(payload: &SubscriptionPayload) -> Result<(), AppError> {
        let plan = &payload.plan_data;
        let billing = &payload.billing_info;

        // Regras simples ficam no derive dos models
        plan.validate()?;
        if plan.value <= Decimal::ZERO {
            return Err(field_error("value", "range", "planData.value deve ser > 0").into());
        }

        if billing.billing_type != "CREDIT_CARD" {
            return Err(field_error(
                "billingType",
                "invalid",
                "billingInfo.billingType deve ser CREDIT_CARD",
            )
            .into());
        }

        billing.validate()?;

        let document = only_digits(&billing.cpf_cnpj);
        if document.len() != 11 && document.len() != 14 {
            return Err(field_error(
                "cpfCnpj",
                "length",
                "cpfCnpj deve ter 11 (CPF) ou 14 (CNPJ) dígitos",
            )
            .into());
        }

        let holder_info = billing.credit_card_holder_info.as_ref();

        // Para pessoa física (CPF), a data de nascimento é obrigatória
        if document.len() == 11
            && holder_info.and_then(|info| info.birth_date.as_deref()).is_none_or(str::is_empty)
        {
            return Err(field_error(
                "birthDate",
                "required",
                "Data de nascimento é obrigatória para CPF",
            )
            .into());
        }

        // Renda mensal declarada, exigida pela subconta de billing
        let income = holder_info.and_then(|info| info.income_value);
        if income.is_none_or(|v| v <= Decimal::ZERO) {
            return Err(field_error(
                "incomeValue",
                "range",
                "Valor da renda mensal deve ser maior que zero",
            )
            .into());
        }

        if only_digits(&billing.phone).len() < 8 {
            return Err(field_error("phone", "length", "billingInfo.phone inválido").into());
        }

        Self::validate_card_or_token(billing)?;

        Ok(())
    }

    // Exatamente um entre creditCard e creditCardToken.
    fn validate_card_or_token(billing: &BillingInfo) -> Result<(), AppError> {
        let has_token = billing
            .credit_card_token
            .as_deref()
            .map(|t| !t.trim().is_empty())
            .unwrap_or(false);

        match (&billing.credit_card, has_token) {
            (Some(_), true) | (None, false) => Err(field_error(
                "creditCard",
                "exclusive",
                "Envie creditCard ou creditCardToken",
            )
            .into()),
            (None, true) => Ok(()),
            (Some(card), false) => {
                let number = only_digits(&card.number);
                if !(12..=19).contains(&number.len())
                    || !crate::common::formatters::luhn_check(&number)
                {
                    return Err(
                        field_error("number", "luhn", "Número do cartão inválido").into()
                    );
                }
                if card.expiry_month.len() != 2
                    || !card.expiry_month.chars().all(|c| c.is_ascii_digit())
                {
                    return Err(
                        field_error("expiryMonth", "format", "expiryMonth deve ser MM").into()
                    );
                }
                if card.expiry_year.len() != 4
                    || !card.expiry_year.chars().all(|c| c.is_ascii_digit())
                {
                    return Err(
                        field_error("expiryYear", "format", "expiryYear deve ser YYYY").into()
                    );
                }
                let ccv = only_digits(&card.ccv);
                if !(3..=4).contains(&ccv.len()) {
                    return Err(field_error("ccv", "format", "ccv inválido").into());
                }
                Ok(())
            }
        }
    }

    /// Cria a assinatura do seller. A UI SEMPRE recebe um resultado
    /// resolvido: validação local, recusa do servidor e erro de rede viram
    /// `SubmissionResult` com notificação, nunca um panic ou erro solto.
    pub async fn create(
        &self,
        seller: &SellerContext,
        payload: &SubscriptionPayload,
    ) -> SubmissionResult {
        if let Err(error) = Self::validate_payload(payload) {
            let message = error.user_message();
            self.notifier.notify(
                Notification::danger(message.clone(), "validation-error").with_duration(8000),
            );
            return SubmissionResult::fail(message);
        }

        tracing::info!("💳 Criando assinatura do seller: {}", seller.seller_id);

        let response = self
            .api
            .post(
                &format!("/app/seller-subscriptions/seller/{}", seller.seller_id),
                payload,
            )
            .await;

        match response {
            Ok(content) => {
                if content.get("success").and_then(Value::as_bool) == Some(true) {
                    self.notifier.notify(Notification::success(
                        "Assinatura criada com sucesso!",
                        "seller-sub-created",
                    ));
                    SubmissionResult::ok(content.get("data").cloned())
                } else {
                    let message = server_message(&content)
                        .unwrap_or_else(|| "Falha ao criar assinatura".to_string());
                    self.notifier.notify(
                        Notification::danger(message.clone(), "seller-sub-fail")
                            .with_duration(8000),
                    );
                    SubmissionResult::fail(message)
                }
            }
            Err(error) => {
                let message = error.user_message();
                self.notifier.notify(
                    Notification::danger(message.clone(), "seller-sub-error").with_duration(8000),
                );
                SubmissionResult::fail(message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn plan() -> PlanData {
        PlanData {
            plan_name: "Plano Pro".to_string(),
            value: Decimal::new(4990, 2),
            cycle: "MONTHLY".to_string(),
        }
    }

    fn billing_form() -> BillingForm {
        BillingForm {
            name: "Maria da Silva".to_string(),
            email: "maria@email.com".to_string(),
            cpf_cnpj: "123.456.789-00".to_string(),
            phone: "(11) 99999-8888".to_string(),
            postal_code: "01310-930".to_string(),
            city: "São Paulo".to_string(),
            birth_date: "15/06/1990".to_string(),
            income_value: "3.500,00".to_string(),
        }
    }

    fn card_form() -> CardForm {
        CardForm {
            holder_name: "MARIA D SILVA".to_string(),
            number: "4539 1488 0343 6467".to_string(),
            expiry: "12/29".to_string(),
            ccv: "123".to_string(),
        }
    }

    fn valid_payload() -> SubscriptionPayload {
        SubscriptionService::assemble_payload(plan(), &billing_form(), &card_form())
    }

    #[test]
    fn assemble_strips_masks_and_converts_formats() {
        let payload = valid_payload();
        let billing = &payload.billing_info;

        assert_eq!(billing.cpf_cnpj, "12345678900");
        assert_eq!(billing.phone, "11999998888");

        let card = billing.credit_card.as_ref().unwrap();
        assert_eq!(card.number, "4539148803436467");
        assert_eq!(card.expiry_month, "12");
        assert_eq!(card.expiry_year, "2029");

        let info = billing.credit_card_holder_info.as_ref().unwrap();
        assert_eq!(info.birth_date.as_deref(), Some("1990-06-15"));
        assert_eq!(info.income_value, Some(Decimal::new(350000, 2)));
        assert_eq!(info.postal_code.as_deref(), Some("01310930"));
    }

    #[test]
    fn valid_payload_passes() {
        assert!(SubscriptionService::validate_payload(&valid_payload()).is_ok());
    }

    #[test]
    fn plan_value_must_be_positive() {
        let mut payload = valid_payload();
        payload.plan_data.value = Decimal::ZERO;
        assert!(SubscriptionService::validate_payload(&payload).is_err());
    }

    #[test]
    fn cpf_without_birth_date_is_rejected_before_any_network() {
        let mut payload = valid_payload();
        payload
            .billing_info
            .credit_card_holder_info
            .as_mut()
            .unwrap()
            .birth_date = None;

        let error = SubscriptionService::validate_payload(&payload).unwrap_err();
        assert!(error.is_validation());
        assert!(error.user_message().contains("nascimento"));
    }

    #[test]
    fn cnpj_does_not_require_birth_date() {
        let mut form = billing_form();
        form.cpf_cnpj = "12.345.678/0001-99".to_string();
        form.birth_date = String::new();

        let payload = SubscriptionService::assemble_payload(plan(), &form, &card_form());
        assert!(SubscriptionService::validate_payload(&payload).is_ok());
    }

    #[test]
    fn income_value_must_be_positive() {
        let mut form = billing_form();
        form.income_value = "0,00".to_string();
        let payload = SubscriptionService::assemble_payload(plan(), &form, &card_form());
        assert!(SubscriptionService::validate_payload(&payload).is_err());
    }

    #[test]
    fn document_must_have_11_or_14_digits() {
        let mut form = billing_form();
        form.cpf_cnpj = "123.456".to_string();
        let payload = SubscriptionService::assemble_payload(plan(), &form, &card_form());
        assert!(SubscriptionService::validate_payload(&payload).is_err());
    }

    #[test]
    fn luhn_failure_blocks_submission() {
        let mut form = card_form();
        form.number = "4539 1488 0343 6468".to_string();
        let payload = SubscriptionService::assemble_payload(plan(), &billing_form(), &form);

        let error = SubscriptionService::validate_payload(&payload).unwrap_err();
        assert!(error.user_message().contains("cartão"));
    }

    #[test]
    fn exactly_one_of_card_or_token() {
        // Nenhum dos dois
        let mut payload = valid_payload();
        payload.billing_info.credit_card = None;
        payload.billing_info.credit_card_token = None;
        assert!(SubscriptionService::validate_payload(&payload).is_err());

        // Os dois ao mesmo tempo
        let mut payload = valid_payload();
        payload.billing_info.credit_card_token = Some("tok_123".to_string());
        assert!(SubscriptionService::validate_payload(&payload).is_err());

        // Só o token
        let mut payload = valid_payload();
        payload.billing_info.credit_card = None;
        payload.billing_info.credit_card_token = Some("tok_123".to_string());
        assert!(SubscriptionService::validate_payload(&payload).is_ok());
    }

    #[test]
    fn phone_needs_at_least_8_digits() {
        let mut form = billing_form();
        form.phone = "119".to_string();
        let payload = SubscriptionService::assemble_payload(plan(), &form, &card_form());
        assert!(SubscriptionService::validate_payload(&payload).is_err());
    }

    #[tokio::test]
    async fn create_fails_closed_without_touching_the_network() {
        use crate::common::notify::test_support::RecordingNotifier;

        // Endereço inalcançável de propósito: a validação barra antes da rede
        let api = ApiClient::new(
            reqwest::Client::new(),
            "http://127.0.0.1:1".to_string(),
            "token".to_string(),
        );
        let notifier = Arc::new(RecordingNotifier::default());
        let service = SubscriptionService::new(api, notifier.clone());
        let seller = SellerContext { seller_id: "1".to_string() };

        let mut payload = valid_payload();
        payload
            .billing_info
            .credit_card_holder_info
            .as_mut()
            .unwrap()
            .birth_date = None;

        let result = service.create(&seller, &payload).await;

        assert!(!result.success);
        assert!(result.error.unwrap().contains("nascimento"));

        let emitted = notifier.emitted.lock().unwrap();
        assert_eq!(emitted.len(), 1);
        assert_eq!(emitted[0].id, "validation-error");
    }

    #[test]
    fn wire_format_matches_the_api_contract() {
        let payload = valid_payload();
        let json = serde_json::to_value(&payload).unwrap();

        // planData usa snake_case por dentro; o resto do payload, camelCase
        assert_eq!(json["planData"]["plan_name"], "Plano Pro");
        assert_eq!(json["billingInfo"]["billingType"], "CREDIT_CARD");
        assert_eq!(json["billingInfo"]["cpfCnpj"], "12345678900");
        assert_eq!(json["billingInfo"]["creditCard"]["expiryMonth"], "12");
        assert_eq!(
            json["billingInfo"]["creditCardHolderInfo"]["birthDate"],
            "1990-06-15"
        );
        // Token ausente não vai no JSON
        assert!(json["billingInfo"].get("creditCardToken").is_none());
    }
}
