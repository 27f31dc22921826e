// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, bail};

use crate::{Client, Company, CompanyId};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompanyFormInput {
    pub razao_social: String,
    pub nome_fantasia: String,
    pub cnpj: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClientFormInput {
    pub empresa_id: CompanyId,
    pub codigo: String,
    pub razao_social: String,
    pub nome_fantasia: String,
    pub cnpj: String,
}

impl CompanyFormInput {
    pub fn blank() -> Self {
        Self::default()
    }

    pub fn from_company(company: &Company) -> Self {
        Self {
            razao_social: company.razao_social.clone(),
            nome_fantasia: company.nome_fantasia.clone().unwrap_or_default(),
            cnpj: company.cnpj.clone(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.razao_social.trim().is_empty() {
            bail!("company razao social is required -- enter a legal name and retry");
        }
        if self.cnpj.trim().is_empty() {
            bail!("company cnpj is required -- enter a cnpj and retry");
        }
        Ok(())
    }

    pub fn trade_name(&self) -> Option<String> {
        let trimmed = self.nome_fantasia.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_owned())
    }
}

impl ClientFormInput {
    pub fn blank_for(empresa_id: CompanyId) -> Self {
        Self {
            empresa_id,
            ..Self::default()
        }
    }

    pub fn from_client(client: &Client) -> Self {
        Self {
            empresa_id: client.empresa_id.clone(),
            codigo: client.codigo.clone(),
            razao_social: client.razao_social.clone(),
            nome_fantasia: client.nome_fantasia.clone().unwrap_or_default(),
            cnpj: client.cnpj.clone(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.empresa_id.is_empty() {
            bail!("client company is required -- choose a company and retry");
        }
        if self.codigo.trim().is_empty() {
            bail!("client codigo is required -- enter a code and retry");
        }
        if self.razao_social.trim().is_empty() {
            bail!("client razao social is required -- enter a legal name and retry");
        }
        if self.cnpj.trim().is_empty() {
            bail!("client cnpj is required -- enter a cnpj and retry");
        }
        Ok(())
    }

    pub fn trade_name(&self) -> Option<String> {
        let trimmed = self.nome_fantasia.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_owned())
    }
}
