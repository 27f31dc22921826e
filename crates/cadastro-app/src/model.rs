// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::ids::*;

/// A registered company. `ativo` is strictly two-state; the store flips it
/// only on explicit user intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub id: CompanyId,
    pub razao_social: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nome_fantasia: Option<String>,
    pub cnpj: String,
    pub ativo: bool,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub created_at: Option<OffsetDateTime>,
}

/// A registered client. Always owned by exactly one company; `empresa_id`
/// is set at creation and never reassigned by this engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub id: ClientId,
    pub empresa_id: CompanyId,
    pub codigo: String,
    pub razao_social: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nome_fantasia: Option<String>,
    pub cnpj: String,
    pub ativo: bool,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub created_at: Option<OffsetDateTime>,
}

/// A company partner. Managed by the partner surface; this engine only
/// carries the owning-company reference and a display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partner {
    pub id: PartnerId,
    pub empresa_id: CompanyId,
    pub nome: String,
}

impl Company {
    pub fn display_name(&self) -> &str {
        self.nome_fantasia.as_deref().unwrap_or(&self.razao_social)
    }
}

impl Client {
    pub fn display_name(&self) -> &str {
        self.nome_fantasia.as_deref().unwrap_or(&self.razao_social)
    }
}
