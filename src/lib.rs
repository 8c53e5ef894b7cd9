// src/lib.rs

// Núcleo do painel de assinaturas: normalização de status do seller,
// gate de onboarding, máscaras/validações do checkout e submissão da
// assinatura. Nenhum framework de UI aqui: quem renderiza consome isto.

pub mod common;
pub mod config;
pub mod models;
pub mod services;
