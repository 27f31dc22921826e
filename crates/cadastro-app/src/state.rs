// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{ClientId, CompanyId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Empresas,
    Clientes,
}

impl Tab {
    pub const ALL: [Self; 2] = [Self::Empresas, Self::Clientes];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Empresas => "empresas",
            Self::Clientes => "clientes",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "empresas" => Some(Self::Empresas),
            "clientes" => Some(Self::Clientes),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modal {
    CompanyEdit,
    Partners,
    DeactivateConfirm,
    ClientEdit,
}

/// Selection and modal state for the registration surface. At most one
/// company and one client are selected at a time; opening an editor replaces
/// any prior selection, and closing a modal clears the selection it held.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ViewState {
    pub active_tab: Tab,
    pub open_modal: Option<Modal>,
    pub selected_company: Option<CompanyId>,
    pub selected_client: Option<ClientId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewCommand {
    SwitchTab(Tab),
    OpenCompanyEditor(Option<CompanyId>),
    OpenPartners(CompanyId),
    OpenDeactivateConfirm(CompanyId),
    OpenClientEditor(Option<ClientId>),
    CloseModal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    TabChanged(Tab),
    ModalOpened(Modal),
    ModalClosed(Modal),
    SelectionCleared,
}

impl ViewState {
    pub fn dispatch(&mut self, command: ViewCommand) -> Vec<ViewEvent> {
        match command {
            ViewCommand::SwitchTab(tab) => {
                let mut events = Vec::new();
                if let Some(event) = self.close_open_modal() {
                    events.push(event);
                    events.push(self.clear_selections());
                }
                if tab != self.active_tab {
                    self.active_tab = tab;
                    events.push(ViewEvent::TabChanged(tab));
                }
                events
            }
            ViewCommand::OpenCompanyEditor(company) => {
                self.selected_company = company;
                self.open(Modal::CompanyEdit)
            }
            ViewCommand::OpenPartners(company) => {
                self.selected_company = Some(company);
                self.open(Modal::Partners)
            }
            ViewCommand::OpenDeactivateConfirm(company) => {
                self.selected_company = Some(company);
                self.open(Modal::DeactivateConfirm)
            }
            ViewCommand::OpenClientEditor(client) => {
                self.selected_client = client;
                self.open(Modal::ClientEdit)
            }
            ViewCommand::CloseModal => {
                let mut events = Vec::new();
                if let Some(event) = self.close_open_modal() {
                    events.push(event);
                    events.push(self.clear_selections());
                }
                events
            }
        }
    }

    fn open(&mut self, modal: Modal) -> Vec<ViewEvent> {
        let mut events = Vec::new();
        if let Some(previous) = self.open_modal.replace(modal)
            && previous != modal
        {
            events.push(ViewEvent::ModalClosed(previous));
        }
        events.push(ViewEvent::ModalOpened(modal));
        events
    }

    fn close_open_modal(&mut self) -> Option<ViewEvent> {
        self.open_modal.take().map(ViewEvent::ModalClosed)
    }

    fn clear_selections(&mut self) -> ViewEvent {
        self.selected_company = None;
        self.selected_client = None;
        ViewEvent::SelectionCleared
    }
}

/// Company deactivation workflow. A deactivation request parks here until
/// the user confirms or cancels; the store must not be touched while the
/// flow is pending.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DeactivationFlow {
    #[default]
    Idle,
    Pending(CompanyId),
}

impl DeactivationFlow {
    pub fn request(&mut self, company: CompanyId) {
        *self = Self::Pending(company);
    }

    pub fn pending(&self) -> Option<&CompanyId> {
        match self {
            Self::Idle => None,
            Self::Pending(company) => Some(company),
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending(_))
    }

    /// Leaves the flow idle, returning the company that was pending.
    pub fn resolve(&mut self) -> Option<CompanyId> {
        match std::mem::take(self) {
            Self::Idle => None,
            Self::Pending(company) => Some(company),
        }
    }
}

/// A delete that has been requested but not yet confirmed. The store delete
/// call is reachable only through a confirmed instance of this state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingDelete {
    Company(CompanyId),
    Client(ClientId),
}
