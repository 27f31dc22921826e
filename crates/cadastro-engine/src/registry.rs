// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use cadastro_api::{CadastroStore, StoreResult};
use cadastro_app::{Client, ClientId, Company, CompanyId};
use std::thread;

/// Authoritative in-memory mirror of the external store. The two collections
/// are replaced wholesale on every successful load and never mutated in
/// place; every filtered view derives from the latest snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Registry {
    companies: Vec<Company>,
    clients: Vec<Client>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetches both collections as two concurrently in-flight requests and
    /// waits for both before touching either collection. On any failure the
    /// previous collections are retained; there is no partial replacement.
    pub fn load<S: CadastroStore + Sync>(&mut self, store: &S) -> StoreResult<()> {
        let (companies, clients) = thread::scope(|scope| {
            let companies = scope.spawn(|| store.fetch_companies());
            let clients = scope.spawn(|| store.fetch_clients());
            (
                companies.join().expect("company fetch thread panicked"),
                clients.join().expect("client fetch thread panicked"),
            )
        });

        let companies = companies?;
        let clients = clients?;
        log::debug!(
            "registry loaded {} companies, {} clients",
            companies.len(),
            clients.len()
        );
        self.companies = companies;
        self.clients = clients;
        Ok(())
    }

    pub fn companies(&self) -> &[Company] {
        &self.companies
    }

    pub fn clients(&self) -> &[Client] {
        &self.clients
    }

    pub fn company(&self, id: &CompanyId) -> Option<&Company> {
        self.companies.iter().find(|company| company.id == *id)
    }

    pub fn client(&self, id: &ClientId) -> Option<&Client> {
        self.clients.iter().find(|client| client.id == *id)
    }
}
