// src/models/billing.rs

use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;
use validator::Validate;

// --- FORMULÁRIOS (o que o usuário digita) ---
// Os campos guardam o texto já mascarado; a conversão para o formato
// da API (só dígitos, data ISO, centavos -> Decimal) acontece na montagem
// do payload, nunca aqui.

#[derive(Debug, Clone, Default)]
pub struct BillingForm {
    pub name: String,
    pub email: String,
    pub cpf_cnpj: String,
    pub phone: String,
    pub postal_code: String,
    pub city: String,
    pub birth_date: String,   // DD/MM/AAAA
    pub income_value: String, // máscara de moeda
}

#[derive(Debug, Clone, Default)]
pub struct CardForm {
    pub holder_name: String,
    pub number: String, // mascarado em grupos de 4
    pub expiry: String, // MM/AA
    pub ccv: String,
}

// --- PAYLOAD DE ASSINATURA (o que vai para a API) ---

// Atenção: dentro de planData a API usa snake_case (plan_name),
// diferente do resto do payload. Herança do serviço de billing.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct PlanData {
    #[validate(length(min = 1, message = "planData.plan_name é obrigatório"))]
    pub plan_name: String,

    pub value: Decimal,

    #[validate(length(min = 1, message = "planData.cycle é obrigatório"))]
    pub cycle: String, // MONTHLY | ANNUAL
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditCard {
    pub holder_name: String,
    pub number: String,       // somente dígitos
    pub expiry_month: String, // MM
    pub expiry_year: String,  // YYYY
    pub ccv: String,          // 3-4 dígitos
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditCardHolderInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpf_cnpj: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile_phone: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,

    // Obrigatória quando o documento é CPF (pessoa física)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>, // YYYY-MM-DD

    // Renda mensal declarada, exigida pela subconta de billing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub income_value: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BillingInfo {
    pub billing_type: String, // sempre "CREDIT_CARD"

    #[validate(length(min = 1, message = "billingInfo.name e billingInfo.email são obrigatórios"))]
    pub name: String,

    #[validate(email(message = "billingInfo.email inválido"))]
    pub email: String,

    pub cpf_cnpj: String,
    pub phone: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_ip: Option<String>,

    // Exatamente um dos dois deve estar presente
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credit_card: Option<CreditCard>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub credit_card_token: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub credit_card_holder_info: Option<CreditCardHolderInfo>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionPayload {
    pub plan_data: PlanData,
    pub billing_info: BillingInfo,
}

// --- RESULTADO DA SUBMISSÃO ---
// A UI sempre recebe um objeto resolvido; erro nunca atravessa esta borda.

#[derive(Debug)]
pub struct SubmissionResult {
    pub success: bool,
    pub data: Option<Value>,
    pub error: Option<String>,
}

impl SubmissionResult {
    pub fn ok(data: Option<Value>) -> Self {
        Self { success: true, data, error: None }
    }

    pub fn fail(error: impl Into<String>) -> Self {
        Self { success: false, data: None, error: Some(error.into()) }
    }
}
