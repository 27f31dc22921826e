// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use cadastro_api::{CadastroStore, NewClient, NewCompany, StoreError, StoreResult};
use cadastro_app::{Client, ClientId, Company, CompanyId, Partner, PartnerId};
use std::sync::{Mutex, MutexGuard};
use time::{Duration, OffsetDateTime};

const COMPANY_STEMS: [&str; 4] = ["Aurora", "Horizonte", "Vetor", "Mirante"];
const COMPANY_SECTORS: [&str; 4] = ["Comercio", "Logistica", "Industria", "Servicos"];
const COMPANY_SUFFIXES: [&str; 4] = ["Ltda", "SA", "ME", "EPP"];

const CLIENT_STEMS: [&str; 8] = [
    "Ipe", "Jacaranda", "Cedro", "Araucaria", "Peroba", "Jatoba", "Imbuia", "Angico",
];

const PARTNER_NAMES: [&str; 8] = [
    "Ana Prado",
    "Bruno Leal",
    "Carla Nunes",
    "Diego Ramos",
    "Elisa Castro",
    "Fabio Telles",
    "Gilda Moura",
    "Heitor Paiva",
];

/// How many times each store operation has run, including calls that failed
/// through injected errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OpCounters {
    pub fetch_companies: usize,
    pub fetch_clients: usize,
    pub fetch_partners: usize,
    pub create_company: usize,
    pub update_company: usize,
    pub delete_company: usize,
    pub set_company_active: usize,
    pub create_client: usize,
    pub update_client: usize,
    pub delete_client: usize,
    pub set_client_active: usize,
}

#[derive(Debug, Default)]
struct Inner {
    companies: Vec<Company>,
    clients: Vec<Client>,
    partners: Vec<Partner>,
    next_id: u64,
    fail_next: Option<StoreError>,
    counters: OpCounters,
}

/// Deterministic in-memory stand-in for the remote store. Supports seeded
/// sample data, per-operation call counters, and single-shot failure
/// injection for controller tests.
#[derive(Debug, Default)]
pub struct SampleStore {
    inner: Mutex<Inner>,
}

impl SampleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store populated with a fixed roster: four companies (one inactive),
    /// two clients and two partners per company. Identical on every call.
    pub fn with_sample_data() -> Self {
        let store = Self::new();
        for (index, stem) in COMPANY_STEMS.iter().enumerate() {
            let razao = format!(
                "{stem} {} {}",
                COMPANY_SECTORS[index % COMPANY_SECTORS.len()],
                COMPANY_SUFFIXES[index % COMPANY_SUFFIXES.len()],
            );
            let company = store.seed_company(&razao, &sample_cnpj(index), index != 3);
            for slot in 0..2 {
                let client_index = index * 2 + slot;
                let stem = CLIENT_STEMS[client_index % CLIENT_STEMS.len()];
                store.seed_client(
                    &company,
                    &format!("CLI-{:03}", client_index + 1),
                    &format!("{stem} Distribuidora Ltda"),
                    slot == 0,
                );
                store.seed_partner(&company, PARTNER_NAMES[client_index % PARTNER_NAMES.len()]);
            }
        }
        store
    }

    pub fn seed_company(&self, razao_social: &str, cnpj: &str, ativo: bool) -> CompanyId {
        let mut inner = self.lock();
        let id = CompanyId::new(format!("c{}", next_id(&mut inner)));
        let created_at = sample_timestamp(inner.companies.len());
        inner.companies.push(Company {
            id: id.clone(),
            razao_social: razao_social.to_owned(),
            nome_fantasia: None,
            cnpj: cnpj.to_owned(),
            ativo,
            created_at: Some(created_at),
        });
        id
    }

    pub fn seed_client(
        &self,
        empresa: &CompanyId,
        codigo: &str,
        razao_social: &str,
        ativo: bool,
    ) -> ClientId {
        let mut inner = self.lock();
        let id = ClientId::new(format!("k{}", next_id(&mut inner)));
        let created_at = sample_timestamp(inner.clients.len());
        let cnpj = sample_cnpj(inner.clients.len() + 50);
        inner.clients.push(Client {
            id: id.clone(),
            empresa_id: empresa.clone(),
            codigo: codigo.to_owned(),
            razao_social: razao_social.to_owned(),
            nome_fantasia: None,
            cnpj,
            ativo,
            created_at: Some(created_at),
        });
        id
    }

    pub fn seed_partner(&self, empresa: &CompanyId, nome: &str) -> PartnerId {
        let mut inner = self.lock();
        let id = PartnerId::new(format!("p{}", next_id(&mut inner)));
        inner.partners.push(Partner {
            id: id.clone(),
            empresa_id: empresa.clone(),
            nome: nome.to_owned(),
        });
        id
    }

    /// The next store call, whatever it is, fails with `error`; the call
    /// after that behaves normally again.
    pub fn fail_next(&self, error: StoreError) {
        self.lock().fail_next = Some(error);
    }

    pub fn counters(&self) -> OpCounters {
        self.lock().counters
    }

    pub fn company_snapshot(&self, id: &CompanyId) -> Option<Company> {
        self.lock()
            .companies
            .iter()
            .find(|company| company.id == *id)
            .cloned()
    }

    pub fn client_snapshot(&self, id: &ClientId) -> Option<Client> {
        self.lock()
            .clients
            .iter()
            .find(|client| client.id == *id)
            .cloned()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

fn next_id(inner: &mut Inner) -> u64 {
    inner.next_id += 1;
    inner.next_id
}

fn take_injected(inner: &mut Inner) -> StoreResult<()> {
    match inner.fail_next.take() {
        Some(error) => Err(error),
        None => Ok(()),
    }
}

fn sample_cnpj(index: usize) -> String {
    format!("{:02}.345.678/0001-{:02}", 11 + index, 1 + index)
}

fn sample_timestamp(index: usize) -> OffsetDateTime {
    OffsetDateTime::UNIX_EPOCH + Duration::days(20_000 + index as i64)
}

impl CadastroStore for SampleStore {
    fn fetch_companies(&self) -> StoreResult<Vec<Company>> {
        let mut inner = self.lock();
        inner.counters.fetch_companies += 1;
        take_injected(&mut inner)?;
        Ok(inner.companies.clone())
    }

    fn fetch_clients(&self) -> StoreResult<Vec<Client>> {
        let mut inner = self.lock();
        inner.counters.fetch_clients += 1;
        take_injected(&mut inner)?;
        Ok(inner.clients.clone())
    }

    fn fetch_partners(&self, company: &CompanyId) -> StoreResult<Vec<Partner>> {
        let mut inner = self.lock();
        inner.counters.fetch_partners += 1;
        take_injected(&mut inner)?;
        if !inner.companies.iter().any(|entry| entry.id == *company) {
            return Err(StoreError::NotFound(format!("company {company}")));
        }
        Ok(inner
            .partners
            .iter()
            .filter(|partner| partner.empresa_id == *company)
            .cloned()
            .collect())
    }

    fn create_company(&self, draft: &NewCompany) -> StoreResult<Company> {
        let mut inner = self.lock();
        inner.counters.create_company += 1;
        take_injected(&mut inner)?;
        let id = CompanyId::new(format!("c{}", next_id(&mut inner)));
        let company = Company {
            id,
            razao_social: draft.razao_social.clone(),
            nome_fantasia: draft.nome_fantasia.clone(),
            cnpj: draft.cnpj.clone(),
            ativo: true,
            created_at: Some(sample_timestamp(inner.companies.len())),
        };
        inner.companies.push(company.clone());
        Ok(company)
    }

    fn update_company(&self, id: &CompanyId, draft: &NewCompany) -> StoreResult<Company> {
        let mut inner = self.lock();
        inner.counters.update_company += 1;
        take_injected(&mut inner)?;
        let company = inner
            .companies
            .iter_mut()
            .find(|company| company.id == *id)
            .ok_or_else(|| StoreError::NotFound(format!("company {id}")))?;
        company.razao_social = draft.razao_social.clone();
        company.nome_fantasia = draft.nome_fantasia.clone();
        company.cnpj = draft.cnpj.clone();
        Ok(company.clone())
    }

    fn delete_company(&self, id: &CompanyId) -> StoreResult<()> {
        let mut inner = self.lock();
        inner.counters.delete_company += 1;
        take_injected(&mut inner)?;
        if !inner.companies.iter().any(|company| company.id == *id) {
            return Err(StoreError::NotFound(format!("company {id}")));
        }
        inner.companies.retain(|company| company.id != *id);
        inner.clients.retain(|client| client.empresa_id != *id);
        inner.partners.retain(|partner| partner.empresa_id != *id);
        Ok(())
    }

    fn set_company_active(&self, id: &CompanyId, ativo: bool) -> StoreResult<()> {
        let mut inner = self.lock();
        inner.counters.set_company_active += 1;
        take_injected(&mut inner)?;
        let company = inner
            .companies
            .iter_mut()
            .find(|company| company.id == *id)
            .ok_or_else(|| StoreError::NotFound(format!("company {id}")))?;
        company.ativo = ativo;
        Ok(())
    }

    fn create_client(&self, draft: &NewClient) -> StoreResult<Client> {
        let mut inner = self.lock();
        inner.counters.create_client += 1;
        take_injected(&mut inner)?;
        if !inner
            .companies
            .iter()
            .any(|company| company.id == draft.empresa_id)
        {
            return Err(StoreError::Validation(format!(
                "company {} does not exist",
                draft.empresa_id
            )));
        }
        let id = ClientId::new(format!("k{}", next_id(&mut inner)));
        let client = Client {
            id,
            empresa_id: draft.empresa_id.clone(),
            codigo: draft.codigo.clone(),
            razao_social: draft.razao_social.clone(),
            nome_fantasia: draft.nome_fantasia.clone(),
            cnpj: draft.cnpj.clone(),
            ativo: true,
            created_at: Some(sample_timestamp(inner.clients.len())),
        };
        inner.clients.push(client.clone());
        Ok(client)
    }

    fn update_client(&self, id: &ClientId, draft: &NewClient) -> StoreResult<Client> {
        let mut inner = self.lock();
        inner.counters.update_client += 1;
        take_injected(&mut inner)?;
        let client = inner
            .clients
            .iter_mut()
            .find(|client| client.id == *id)
            .ok_or_else(|| StoreError::NotFound(format!("client {id}")))?;
        client.codigo = draft.codigo.clone();
        client.razao_social = draft.razao_social.clone();
        client.nome_fantasia = draft.nome_fantasia.clone();
        client.cnpj = draft.cnpj.clone();
        Ok(client.clone())
    }

    fn delete_client(&self, id: &ClientId) -> StoreResult<()> {
        let mut inner = self.lock();
        inner.counters.delete_client += 1;
        take_injected(&mut inner)?;
        if !inner.clients.iter().any(|client| client.id == *id) {
            return Err(StoreError::NotFound(format!("client {id}")));
        }
        inner.clients.retain(|client| client.id != *id);
        Ok(())
    }

    fn set_client_active(&self, id: &ClientId, ativo: bool) -> StoreResult<()> {
        let mut inner = self.lock();
        inner.counters.set_client_active += 1;
        take_injected(&mut inner)?;
        let client = inner
            .clients
            .iter_mut()
            .find(|client| client.id == *id)
            .ok_or_else(|| StoreError::NotFound(format!("client {id}")))?;
        client.ativo = ativo;
        Ok(())
    }
}
