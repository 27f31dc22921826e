// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use cadastro_api::StoreError;
use cadastro_app::{ClientFormInput, CompanyFormInput, CompanyId, Modal, StatusFilter};
use cadastro_engine::{Session, ToggleOutcome};
use cadastro_testkit::SampleStore;

fn loaded_session(store: &SampleStore) -> Result<Session<'_, SampleStore>> {
    let mut session = Session::new(store);
    session.load()?;
    Ok(session)
}

#[test]
fn initial_load_defaults_client_scope_to_first_company() -> Result<()> {
    let store = SampleStore::with_sample_data();
    let session = loaded_session(&store)?;

    let first = session.registry().companies()[0].id.clone();
    assert_eq!(session.client_filter().company, Some(first));
    Ok(())
}

#[test]
fn refresh_preserves_user_chosen_client_scope() -> Result<()> {
    let store = SampleStore::with_sample_data();
    let mut session = loaded_session(&store)?;

    session.set_client_company(None);
    session.load()?;
    assert_eq!(session.client_filter().company, None);
    Ok(())
}

#[test]
fn failed_load_retains_previous_collections() -> Result<()> {
    let store = SampleStore::with_sample_data();
    let mut session = loaded_session(&store)?;
    let companies_before = session.registry().companies().to_vec();

    store.fail_next(StoreError::Fetch("wire down".to_owned()));
    assert!(session.load().is_err());
    assert_eq!(session.registry().companies(), companies_before.as_slice());
    Ok(())
}

#[test]
fn deactivation_request_leaves_store_untouched_until_confirmed() -> Result<()> {
    let store = SampleStore::with_sample_data();
    let mut session = loaded_session(&store)?;
    let active = session.registry().companies()[0].id.clone();

    let outcome = session.toggle_company_active(&active)?;
    assert_eq!(outcome, ToggleOutcome::ConfirmationRequired);
    assert_eq!(session.view().open_modal, Some(Modal::DeactivateConfirm));
    assert_eq!(session.deactivation_pending(), Some(&active));
    assert_eq!(store.counters().set_company_active, 0);
    assert!(store.company_snapshot(&active).expect("company exists").ativo);

    session.confirm_deactivation()?;
    assert_eq!(store.counters().set_company_active, 1);
    assert!(!store.company_snapshot(&active).expect("company exists").ativo);
    assert!(session.deactivation_pending().is_none());
    assert!(session.view().open_modal.is_none());
    assert!(!session
        .registry()
        .company(&active)
        .expect("company in registry")
        .ativo);
    Ok(())
}

#[test]
fn cancelled_deactivation_never_calls_the_store() -> Result<()> {
    let store = SampleStore::with_sample_data();
    let mut session = loaded_session(&store)?;
    let active = session.registry().companies()[0].id.clone();

    session.toggle_company_active(&active)?;
    session.cancel_deactivation();

    assert_eq!(store.counters().set_company_active, 0);
    assert!(store.company_snapshot(&active).expect("company exists").ativo);
    assert!(session.deactivation_pending().is_none());
    assert!(session.view().open_modal.is_none());
    Ok(())
}

#[test]
fn dismissing_the_confirm_modal_counts_as_cancel() -> Result<()> {
    let store = SampleStore::with_sample_data();
    let mut session = loaded_session(&store)?;
    let active = session.registry().companies()[0].id.clone();

    session.toggle_company_active(&active)?;
    session.close_modal();

    assert_eq!(store.counters().set_company_active, 0);
    assert!(session.deactivation_pending().is_none());
    assert!(session.confirm_deactivation().is_err());
    assert_eq!(store.counters().set_company_active, 0);
    Ok(())
}

#[test]
fn reactivation_is_single_step_and_ungated() -> Result<()> {
    let store = SampleStore::with_sample_data();
    let mut session = loaded_session(&store)?;
    let inactive = session
        .registry()
        .companies()
        .iter()
        .find(|company| !company.ativo)
        .expect("sample data has an inactive company")
        .id
        .clone();

    let outcome = session.toggle_company_active(&inactive)?;
    assert_eq!(outcome, ToggleOutcome::Activated);
    assert_eq!(store.counters().set_company_active, 1);
    assert!(session.deactivation_pending().is_none());
    assert!(store.company_snapshot(&inactive).expect("company exists").ativo);
    Ok(())
}

#[test]
fn client_toggle_inverts_without_confirmation() -> Result<()> {
    let store = SampleStore::with_sample_data();
    let mut session = loaded_session(&store)?;
    let client = session.registry().clients()[0].clone();

    session.toggle_client_active(&client.id)?;
    assert_eq!(store.counters().set_client_active, 1);
    assert_eq!(
        store.client_snapshot(&client.id).expect("client exists").ativo,
        !client.ativo
    );
    Ok(())
}

#[test]
fn confirm_without_request_never_reaches_delete() -> Result<()> {
    let store = SampleStore::with_sample_data();
    let mut session = loaded_session(&store)?;

    assert!(session.confirm_delete().is_err());
    assert_eq!(store.counters().delete_company, 0);
    assert_eq!(store.counters().delete_client, 0);
    Ok(())
}

#[test]
fn cancelled_delete_request_never_reaches_the_store() -> Result<()> {
    let store = SampleStore::with_sample_data();
    let mut session = loaded_session(&store)?;
    let company = session.registry().companies()[0].id.clone();

    session.request_company_delete(&company)?;
    session.cancel_delete();
    assert!(session.confirm_delete().is_err());
    assert_eq!(store.counters().delete_company, 0);
    Ok(())
}

#[test]
fn confirmed_company_delete_refreshes_and_cascades() -> Result<()> {
    let store = SampleStore::with_sample_data();
    let mut session = loaded_session(&store)?;
    let company = session.registry().companies()[0].id.clone();

    session.request_company_delete(&company)?;
    session.confirm_delete()?;

    assert_eq!(store.counters().delete_company, 1);
    assert!(session.registry().company(&company).is_none());
    assert!(session
        .registry()
        .clients()
        .iter()
        .all(|client| client.empresa_id != company));
    Ok(())
}

#[test]
fn save_company_creates_closes_modal_and_refreshes() -> Result<()> {
    let store = SampleStore::with_sample_data();
    let mut session = loaded_session(&store)?;
    let before = session.registry().companies().len();

    session.open_company_editor(None)?;
    let saved = session.save_company(&CompanyFormInput {
        razao_social: "Quarzo Mineracao Ltda".to_owned(),
        nome_fantasia: "Quarzo".to_owned(),
        cnpj: "99.888.777/0001-66".to_owned(),
    })?;

    assert!(session.view().open_modal.is_none());
    assert!(session.view().selected_company.is_none());
    assert_eq!(session.registry().companies().len(), before + 1);
    assert!(session.registry().company(&saved.id).is_some());
    assert!(saved.ativo);
    Ok(())
}

#[test]
fn save_company_updates_the_selected_record() -> Result<()> {
    let store = SampleStore::with_sample_data();
    let mut session = loaded_session(&store)?;
    let target = session.registry().companies()[1].id.clone();

    session.open_company_editor(Some(&target))?;
    session.save_company(&CompanyFormInput {
        razao_social: "Horizonte Renomeada SA".to_owned(),
        nome_fantasia: String::new(),
        cnpj: "12.345.678/0001-02".to_owned(),
    })?;

    assert_eq!(store.counters().update_company, 1);
    assert_eq!(store.counters().create_company, 0);
    assert_eq!(
        session
            .registry()
            .company(&target)
            .expect("company in registry")
            .razao_social,
        "Horizonte Renomeada SA"
    );
    Ok(())
}

#[test]
fn invalid_company_form_never_dispatches() -> Result<()> {
    let store = SampleStore::with_sample_data();
    let mut session = loaded_session(&store)?;

    session.open_company_editor(None)?;
    let error = session
        .save_company(&CompanyFormInput::blank())
        .expect_err("blank form should fail");
    assert!(error.to_string().contains("razao social"));
    assert_eq!(store.counters().create_company, 0);
    assert_eq!(session.view().open_modal, Some(Modal::CompanyEdit));
    Ok(())
}

#[test]
fn failed_client_save_keeps_modal_open_and_registry_unchanged() -> Result<()> {
    let store = SampleStore::with_sample_data();
    let mut session = loaded_session(&store)?;
    let company = session.registry().companies()[0].id.clone();
    let clients_before = session.registry().clients().to_vec();
    let fetches_before = store.counters().fetch_clients;

    session.open_client_editor(None)?;
    store.fail_next(StoreError::Validation("cnpj already registered".to_owned()));

    let mut form = ClientFormInput::blank_for(company);
    form.codigo = "CLI-900".to_owned();
    form.razao_social = "Duplicada Ltda".to_owned();
    form.cnpj = "22".to_owned();
    assert!(session.save_client(&form).is_err());

    assert_eq!(session.view().open_modal, Some(Modal::ClientEdit));
    assert_eq!(session.registry().clients(), clients_before.as_slice());
    assert_eq!(store.counters().fetch_clients, fetches_before);
    Ok(())
}

#[test]
fn new_client_requires_a_resolvable_company() -> Result<()> {
    let store = SampleStore::with_sample_data();
    let mut session = loaded_session(&store)?;

    session.open_client_editor(None)?;
    let mut form = ClientFormInput::blank_for(CompanyId::from("ghost"));
    form.codigo = "CLI-901".to_owned();
    form.razao_social = "Orfa Ltda".to_owned();
    form.cnpj = "33".to_owned();

    assert!(session.save_client(&form).is_err());
    assert_eq!(store.counters().create_client, 0);
    Ok(())
}

#[test]
fn client_cannot_move_to_another_company() -> Result<()> {
    let store = SampleStore::with_sample_data();
    let mut session = loaded_session(&store)?;
    let client = session.registry().clients()[0].clone();
    let other_company = session
        .registry()
        .companies()
        .iter()
        .find(|company| company.id != client.empresa_id)
        .expect("sample data has several companies")
        .id
        .clone();

    session.open_client_editor(Some(&client.id))?;
    let mut form = ClientFormInput::from_client(&client);
    form.empresa_id = other_company;

    let error = session
        .save_client(&form)
        .expect_err("moving a client should fail");
    assert!(error.to_string().contains("moving a client is not supported"));
    assert_eq!(store.counters().update_client, 0);
    Ok(())
}

#[test]
fn open_partners_selects_company_and_returns_roster() -> Result<()> {
    let store = SampleStore::with_sample_data();
    let mut session = loaded_session(&store)?;
    let company = session.registry().companies()[0].id.clone();

    let partners = session.open_partners(&company)?;
    assert_eq!(partners.len(), 2);
    assert!(partners.iter().all(|partner| partner.empresa_id == company));
    assert_eq!(session.view().open_modal, Some(Modal::Partners));
    assert_eq!(session.view().selected_company, Some(company));

    session.close_modal();
    assert!(session.view().selected_company.is_none());
    Ok(())
}

#[test]
fn open_partners_rejects_unknown_company() -> Result<()> {
    let store = SampleStore::with_sample_data();
    let mut session = loaded_session(&store)?;

    assert!(session.open_partners(&CompanyId::from("ghost")).is_err());
    assert!(session.view().open_modal.is_none());
    Ok(())
}

#[test]
fn session_filters_follow_the_registry_snapshot() -> Result<()> {
    let store = SampleStore::new();
    let acme = store.seed_company("Acme Ltda", "11", true);
    store.seed_client(&acme, "K1", "Foo", true);

    let mut session = loaded_session(&store)?;
    session.set_company_search("acme");
    assert_eq!(session.visible_companies().len(), 1);

    session.set_client_company(None);
    session.set_client_status(StatusFilter::Inactive);
    assert!(session.visible_clients().is_empty());

    session.set_client_company(Some(acme.clone()));
    session.set_client_status(StatusFilter::All);
    session.set_client_search("K1");
    let visible = session.visible_clients();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].empresa_id, acme);
    Ok(())
}
