// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use cadastro_api::{CadastroStore, NewClient, NewCompany};
use cadastro_app::{
    Client, ClientFilter, ClientFormInput, ClientId, Company, CompanyFilter, CompanyFormInput,
    CompanyId, DeactivationFlow, Modal, Partner, PendingDelete, StatusFilter, Tab, ViewCommand,
    ViewState, visible_clients, visible_companies,
};

use crate::Registry;

/// Result of a company active-toggle: deactivation parks behind the
/// confirmation gate, activation goes straight through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    ConfirmationRequired,
    Activated,
}

/// Orchestrates every lifecycle operation against the external store. Each
/// successful mutation is followed by a registry refresh; a failed mutation
/// leaves the registry, the open modal, and any pending workflow untouched.
pub struct Session<'a, S> {
    store: &'a S,
    registry: Registry,
    view: ViewState,
    deactivation: DeactivationFlow,
    pending_delete: Option<PendingDelete>,
    company_filter: CompanyFilter,
    client_filter: ClientFilter,
    bootstrapped: bool,
}

impl<'a, S: CadastroStore + Sync> Session<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            registry: Registry::new(),
            view: ViewState::default(),
            deactivation: DeactivationFlow::default(),
            pending_delete: None,
            company_filter: CompanyFilter::default(),
            client_filter: ClientFilter::default(),
            bootstrapped: false,
        }
    }

    /// Loads the registry. On the first successful load the client filter's
    /// company scope defaults to the first company in load order; refreshes
    /// never touch the scope again.
    pub fn load(&mut self) -> Result<()> {
        self.registry.load(self.store).context("load registry")?;
        if !self.bootstrapped {
            self.bootstrapped = true;
            if self.client_filter.company.is_none()
                && let Some(first) = self.registry.companies().first()
            {
                self.client_filter.company = Some(first.id.clone());
            }
        }
        Ok(())
    }

    fn refresh(&mut self) -> Result<()> {
        self.load()
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn company_filter(&self) -> &CompanyFilter {
        &self.company_filter
    }

    pub fn client_filter(&self) -> &ClientFilter {
        &self.client_filter
    }

    pub fn deactivation_pending(&self) -> Option<&CompanyId> {
        self.deactivation.pending()
    }

    pub fn pending_delete(&self) -> Option<&PendingDelete> {
        self.pending_delete.as_ref()
    }

    pub fn switch_tab(&mut self, tab: Tab) {
        if self.view.open_modal == Some(Modal::DeactivateConfirm) {
            self.deactivation.resolve();
        }
        self.view.dispatch(ViewCommand::SwitchTab(tab));
    }

    pub fn set_company_search(&mut self, term: impl Into<String>) {
        self.company_filter.search = term.into();
    }

    pub fn set_company_status(&mut self, status: StatusFilter) {
        self.company_filter.status = status;
    }

    pub fn set_client_search(&mut self, term: impl Into<String>) {
        self.client_filter.search = term.into();
    }

    pub fn set_client_status(&mut self, status: StatusFilter) {
        self.client_filter.status = status;
    }

    pub fn set_client_company(&mut self, company: Option<CompanyId>) {
        self.client_filter.company = company;
    }

    pub fn visible_companies(&self) -> Vec<&Company> {
        visible_companies(self.registry.companies(), &self.company_filter)
    }

    pub fn visible_clients(&self) -> Vec<&Client> {
        visible_clients(self.registry.clients(), &self.client_filter)
    }

    pub fn open_company_editor(&mut self, id: Option<&CompanyId>) -> Result<()> {
        let selected = match id {
            Some(id) => {
                let company = self
                    .registry
                    .company(id)
                    .ok_or_else(|| anyhow!("unknown company {id} -- reload and retry"))?;
                Some(company.id.clone())
            }
            None => None,
        };
        self.view.dispatch(ViewCommand::OpenCompanyEditor(selected));
        Ok(())
    }

    pub fn open_client_editor(&mut self, id: Option<&ClientId>) -> Result<()> {
        let selected = match id {
            Some(id) => {
                let client = self
                    .registry
                    .client(id)
                    .ok_or_else(|| anyhow!("unknown client {id} -- reload and retry"))?;
                Some(client.id.clone())
            }
            None => None,
        };
        self.view.dispatch(ViewCommand::OpenClientEditor(selected));
        Ok(())
    }

    /// Fetches the partner list for the partner-management surface. The
    /// modal only opens once the fetch has succeeded, so the surface always
    /// receives a resolvable, currently-selected company.
    pub fn open_partners(&mut self, id: &CompanyId) -> Result<Vec<Partner>> {
        let company_id = self
            .registry
            .company(id)
            .ok_or_else(|| anyhow!("unknown company {id} -- reload and retry"))?
            .id
            .clone();
        let partners = self
            .store
            .fetch_partners(&company_id)
            .with_context(|| format!("fetch partners for company {company_id}"))?;
        self.view.dispatch(ViewCommand::OpenPartners(company_id));
        Ok(partners)
    }

    /// Closes whichever modal is open, clearing its selection. Dismissing
    /// the deactivate-confirm surface counts as a cancel: no store call.
    pub fn close_modal(&mut self) {
        if self.view.open_modal == Some(Modal::DeactivateConfirm) {
            self.deactivation.resolve();
        }
        self.view.dispatch(ViewCommand::CloseModal);
    }

    /// Creates or updates a company, decided by the current selection. On
    /// success the edit modal closes, the selection clears, and the registry
    /// refreshes; on failure all three stay as they were.
    pub fn save_company(&mut self, form: &CompanyFormInput) -> Result<Company> {
        form.validate()?;
        let draft = NewCompany {
            razao_social: form.razao_social.trim().to_owned(),
            nome_fantasia: form.trade_name(),
            cnpj: form.cnpj.trim().to_owned(),
        };
        let saved = match self.view.selected_company.clone() {
            Some(id) => self
                .store
                .update_company(&id, &draft)
                .with_context(|| format!("update company {id}"))?,
            None => self.store.create_company(&draft).context("create company")?,
        };
        self.view.dispatch(ViewCommand::CloseModal);
        self.refresh()?;
        Ok(saved)
    }

    /// Creates or updates a client. A new client's `empresa_id` must resolve
    /// in the registry, and an existing client can never move to another
    /// company.
    pub fn save_client(&mut self, form: &ClientFormInput) -> Result<Client> {
        form.validate()?;
        let draft = NewClient {
            empresa_id: form.empresa_id.clone(),
            codigo: form.codigo.trim().to_owned(),
            razao_social: form.razao_social.trim().to_owned(),
            nome_fantasia: form.trade_name(),
            cnpj: form.cnpj.trim().to_owned(),
        };
        let saved = match self.view.selected_client.clone() {
            Some(id) => {
                let existing = self
                    .registry
                    .client(&id)
                    .ok_or_else(|| anyhow!("unknown client {id} -- reload and retry"))?;
                if existing.empresa_id != draft.empresa_id {
                    bail!(
                        "client {id} belongs to company {} -- moving a client is not supported",
                        existing.empresa_id
                    );
                }
                self.store
                    .update_client(&id, &draft)
                    .with_context(|| format!("update client {id}"))?
            }
            None => {
                if self.registry.company(&draft.empresa_id).is_none() {
                    bail!(
                        "company {} does not exist -- reload and choose an existing company",
                        draft.empresa_id
                    );
                }
                self.store.create_client(&draft).context("create client")?
            }
        };
        self.view.dispatch(ViewCommand::CloseModal);
        self.refresh()?;
        Ok(saved)
    }

    pub fn request_company_delete(&mut self, id: &CompanyId) -> Result<()> {
        let company = self
            .registry
            .company(id)
            .ok_or_else(|| anyhow!("unknown company {id} -- reload and retry"))?;
        self.pending_delete = Some(PendingDelete::Company(company.id.clone()));
        Ok(())
    }

    pub fn request_client_delete(&mut self, id: &ClientId) -> Result<()> {
        let client = self
            .registry
            .client(id)
            .ok_or_else(|| anyhow!("unknown client {id} -- reload and retry"))?;
        self.pending_delete = Some(PendingDelete::Client(client.id.clone()));
        Ok(())
    }

    /// Executes the pending delete. The store's delete calls are reachable
    /// only through here, so a delete can never run without a prior request.
    pub fn confirm_delete(&mut self) -> Result<()> {
        let pending = self
            .pending_delete
            .clone()
            .ok_or_else(|| anyhow!("no delete pending -- request one first"))?;
        match &pending {
            PendingDelete::Company(id) => self
                .store
                .delete_company(id)
                .with_context(|| format!("delete company {id}"))?,
            PendingDelete::Client(id) => self
                .store
                .delete_client(id)
                .with_context(|| format!("delete client {id}"))?,
        }
        self.pending_delete = None;
        self.refresh()
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Active company -> parks a deactivation behind the confirmation gate.
    /// Inactive company -> reactivates immediately, no gate.
    pub fn toggle_company_active(&mut self, id: &CompanyId) -> Result<ToggleOutcome> {
        let (company_id, ativo) = {
            let company = self
                .registry
                .company(id)
                .ok_or_else(|| anyhow!("unknown company {id} -- reload and retry"))?;
            (company.id.clone(), company.ativo)
        };

        if ativo {
            self.deactivation.request(company_id.clone());
            self.view
                .dispatch(ViewCommand::OpenDeactivateConfirm(company_id));
            Ok(ToggleOutcome::ConfirmationRequired)
        } else {
            self.store
                .set_company_active(&company_id, true)
                .with_context(|| format!("activate company {company_id}"))?;
            self.refresh()?;
            Ok(ToggleOutcome::Activated)
        }
    }

    pub fn confirm_deactivation(&mut self) -> Result<()> {
        let id = self
            .deactivation
            .pending()
            .cloned()
            .ok_or_else(|| anyhow!("no deactivation pending -- request one first"))?;
        self.store
            .set_company_active(&id, false)
            .with_context(|| format!("deactivate company {id}"))?;
        self.deactivation.resolve();
        self.view.dispatch(ViewCommand::CloseModal);
        self.refresh()
    }

    pub fn cancel_deactivation(&mut self) {
        if self.deactivation.resolve().is_some() {
            self.view.dispatch(ViewCommand::CloseModal);
        }
    }

    /// Single-step: inverts the client's `ativo` flag, no confirmation.
    pub fn toggle_client_active(&mut self, id: &ClientId) -> Result<()> {
        let (client_id, next) = {
            let client = self
                .registry
                .client(id)
                .ok_or_else(|| anyhow!("unknown client {id} -- reload and retry"))?;
            (client.id.clone(), !client.ativo)
        };
        self.store
            .set_client_active(&client_id, next)
            .with_context(|| format!("toggle client {client_id}"))?;
        self.refresh()
    }
}
