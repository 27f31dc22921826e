// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};

use crate::{Client, Company, CompanyId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Inactive,
}

impl StatusFilter {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "all" => Some(Self::All),
            "active" => Some(Self::Active),
            "inactive" => Some(Self::Inactive),
            _ => None,
        }
    }

    pub const fn allows(self, ativo: bool) -> bool {
        match self {
            Self::All => true,
            Self::Active => ativo,
            Self::Inactive => !ativo,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompanyFilter {
    pub search: String,
    pub status: StatusFilter,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClientFilter {
    pub search: String,
    pub status: StatusFilter,
    /// `None` keeps clients of every company.
    pub company: Option<CompanyId>,
}

impl CompanyFilter {
    pub fn matches(&self, company: &Company) -> bool {
        self.matches_text(company) && self.status.allows(company.ativo)
    }

    fn matches_text(&self, company: &Company) -> bool {
        if self.search.is_empty() {
            return true;
        }
        let term = self.search.to_lowercase();
        company.razao_social.to_lowercase().contains(&term)
            || company
                .nome_fantasia
                .as_deref()
                .is_some_and(|name| name.to_lowercase().contains(&term))
            || company.cnpj.contains(&self.search)
    }
}

impl ClientFilter {
    pub fn matches(&self, client: &Client) -> bool {
        self.matches_company(client) && self.status.allows(client.ativo) && self.matches_text(client)
    }

    fn matches_company(&self, client: &Client) -> bool {
        match &self.company {
            Some(company) => client.empresa_id == *company,
            None => true,
        }
    }

    fn matches_text(&self, client: &Client) -> bool {
        if self.search.is_empty() {
            return true;
        }
        let term = self.search.to_lowercase();
        client.razao_social.to_lowercase().contains(&term)
            || client
                .nome_fantasia
                .as_deref()
                .is_some_and(|name| name.to_lowercase().contains(&term))
            || client.cnpj.contains(&self.search)
            || client.codigo.to_lowercase().contains(&term)
    }
}

/// Derives the visible company list from the backing collection. Pure; the
/// result is always a subset of `companies` in backing order.
pub fn visible_companies<'a>(companies: &'a [Company], filter: &CompanyFilter) -> Vec<&'a Company> {
    companies
        .iter()
        .filter(|company| filter.matches(company))
        .collect()
}

/// Derives the visible client list from the backing collection.
pub fn visible_clients<'a>(clients: &'a [Client], filter: &ClientFilter) -> Vec<&'a Client> {
    clients.iter().filter(|client| filter.matches(client)).collect()
}

#[cfg(test)]
mod tests {
    use super::{ClientFilter, CompanyFilter, StatusFilter, visible_clients, visible_companies};
    use crate::{Client, ClientId, Company, CompanyId};

    fn company(id: &str, razao: &str, fantasia: Option<&str>, cnpj: &str, ativo: bool) -> Company {
        Company {
            id: CompanyId::from(id),
            razao_social: razao.to_owned(),
            nome_fantasia: fantasia.map(str::to_owned),
            cnpj: cnpj.to_owned(),
            ativo,
            created_at: None,
        }
    }

    fn client(id: &str, empresa: &str, codigo: &str, razao: &str, ativo: bool) -> Client {
        Client {
            id: ClientId::from(id),
            empresa_id: CompanyId::from(empresa),
            codigo: codigo.to_owned(),
            razao_social: razao.to_owned(),
            nome_fantasia: None,
            cnpj: "22".to_owned(),
            ativo,
            created_at: None,
        }
    }

    fn sample_companies() -> Vec<Company> {
        vec![
            company("c1", "Acme Ltda", None, "11", true),
            company("c2", "Borda Comercio SA", Some("Borda"), "22.333", true),
            company("c3", "Cume Industria ME", None, "44", false),
        ]
    }

    #[test]
    fn status_filter_parse_and_as_str_round_trip() {
        for status in [StatusFilter::All, StatusFilter::Active, StatusFilter::Inactive] {
            assert_eq!(StatusFilter::parse(status.as_str()), Some(status));
        }
        assert_eq!(StatusFilter::parse("enabled"), None);
    }

    #[test]
    fn empty_search_matches_everything() {
        let companies = sample_companies();
        let filter = CompanyFilter::default();
        assert_eq!(visible_companies(&companies, &filter).len(), companies.len());
    }

    #[test]
    fn company_search_is_case_insensitive_on_names() {
        let companies = sample_companies();
        let filter = CompanyFilter {
            search: "ACME".to_owned(),
            status: StatusFilter::All,
        };
        let visible = visible_companies(&companies, &filter);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, CompanyId::from("c1"));
    }

    #[test]
    fn company_search_matches_trade_name() {
        let companies = sample_companies();
        let filter = CompanyFilter {
            search: "borda".to_owned(),
            status: StatusFilter::All,
        };
        assert_eq!(visible_companies(&companies, &filter).len(), 1);
    }

    #[test]
    fn company_cnpj_match_is_raw_substring() {
        let companies = sample_companies();
        let filter = CompanyFilter {
            search: "2.33".to_owned(),
            status: StatusFilter::All,
        };
        let visible = visible_companies(&companies, &filter);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, CompanyId::from("c2"));
    }

    #[test]
    fn status_partitions_are_disjoint_and_cover_all() {
        let companies = sample_companies();
        let base = |status| CompanyFilter {
            search: String::new(),
            status,
        };

        let all = visible_companies(&companies, &base(StatusFilter::All));
        let active = visible_companies(&companies, &base(StatusFilter::Active));
        let inactive = visible_companies(&companies, &base(StatusFilter::Inactive));

        assert_eq!(all.len(), active.len() + inactive.len());
        assert!(active.iter().all(|company| company.ativo));
        assert!(inactive.iter().all(|company| !company.ativo));
        assert!(active.iter().all(|company| !inactive.contains(company)));
    }

    #[test]
    fn filtering_is_deterministic_for_identical_inputs() {
        let companies = sample_companies();
        let filter = CompanyFilter {
            search: "a".to_owned(),
            status: StatusFilter::Active,
        };
        let first: Vec<_> = visible_companies(&companies, &filter)
            .into_iter()
            .map(|company| company.id.clone())
            .collect();
        let second: Vec<_> = visible_companies(&companies, &filter)
            .into_iter()
            .map(|company| company.id.clone())
            .collect();
        assert_eq!(first, second);
    }

    #[test]
    fn unmatched_search_yields_empty_set() {
        let companies = sample_companies();
        let filter = CompanyFilter {
            search: "zzz-no-such-company".to_owned(),
            status: StatusFilter::All,
        };
        assert!(visible_companies(&companies, &filter).is_empty());
    }

    #[test]
    fn client_company_scope_is_transitive_over_other_criteria() {
        let clients = vec![
            client("k1", "c1", "K1", "Foo", true),
            client("k2", "c2", "K2", "Foo", true),
            client("k3", "c1", "K3", "Foo", false),
        ];
        let filter = ClientFilter {
            search: "foo".to_owned(),
            status: StatusFilter::All,
            company: Some(CompanyId::from("c1")),
        };
        let visible = visible_clients(&clients, &filter);
        assert_eq!(visible.len(), 2);
        assert!(visible.iter().all(|entry| entry.empresa_id == CompanyId::from("c1")));
    }

    #[test]
    fn client_codigo_match_is_case_insensitive() {
        let clients = vec![client("k1", "c1", "K1", "Foo", true)];
        let filter = ClientFilter {
            search: "k1".to_owned(),
            status: StatusFilter::All,
            company: Some(CompanyId::from("c1")),
        };
        let visible = visible_clients(&clients, &filter);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, ClientId::from("k1"));
    }

    #[test]
    fn single_company_roster_filters_by_name_and_state() {
        let companies = vec![company("c1", "Acme Ltda", None, "11", true)];
        let clients = vec![client("k1", "c1", "K1", "Foo", true)];

        let by_name = CompanyFilter {
            search: "acme".to_owned(),
            status: StatusFilter::All,
        };
        let visible = visible_companies(&companies, &by_name);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, CompanyId::from("c1"));

        let inactive_everywhere = ClientFilter {
            search: String::new(),
            status: StatusFilter::Inactive,
            company: None,
        };
        assert!(visible_clients(&clients, &inactive_everywhere).is_empty());
    }
}
