// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;

use anyhow::{Context, Result};
use cadastro_api::{CadastroStore, HttpStore};
use cadastro_app::{CompanyId, StatusFilter, Tab};
use cadastro_engine::Session;
use cadastro_testkit::SampleStore;
use config::Config;
use std::env;
use std::path::PathBuf;

fn main() {
    env_logger::init();
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `cadastro --print-example-config` to generate a template",
            options.config_path.display()
        )
    })?;

    let tab = options.tab.unwrap_or_else(|| config.default_tab());
    if options.demo {
        let store = SampleStore::with_sample_data();
        run_session(&store, &options, tab)
    } else {
        let store = HttpStore::new(&config.api_base_url(), config.api_timeout()?)
            .with_context(|| format!("connect to registration API at {}", config.api_base_url()))?;
        run_session(&store, &options, tab)
    }
}

fn run_session<S: CadastroStore + Sync>(store: &S, options: &CliOptions, tab: Tab) -> Result<()> {
    let mut session = Session::new(store);
    session.load()?;

    if options.check_only {
        log::info!(
            "store reachable: {} companies, {} clients",
            session.registry().companies().len(),
            session.registry().clients().len()
        );
        return Ok(());
    }

    session.switch_tab(tab);
    if let Some(term) = &options.search {
        session.set_company_search(term.clone());
        session.set_client_search(term.clone());
    }
    if let Some(status) = options.status {
        session.set_company_status(status);
        session.set_client_status(status);
    }
    if let Some(company) = &options.company {
        session.set_client_company(
            (company.as_str() != "all").then(|| CompanyId::from(company.as_str())),
        );
    }

    match tab {
        Tab::Empresas => print_companies(&session),
        Tab::Clientes => print_clients(&session),
    }
    Ok(())
}

fn print_companies<S: CadastroStore + Sync>(session: &Session<'_, S>) {
    let visible = session.visible_companies();
    println!(
        "empresas ({} of {})",
        visible.len(),
        session.registry().companies().len()
    );
    for company in visible {
        println!(
            "  {:<8} {:<36} {:<20} {}",
            company.id.as_str(),
            company.razao_social,
            company.cnpj,
            if company.ativo { "ativo" } else { "inativo" },
        );
    }
}

fn print_clients<S: CadastroStore + Sync>(session: &Session<'_, S>) {
    let visible = session.visible_clients();
    println!(
        "clientes ({} of {})",
        visible.len(),
        session.registry().clients().len()
    );
    for client in visible {
        println!(
            "  {:<8} {:<10} {:<8} {:<36} {}",
            client.id.as_str(),
            client.codigo,
            client.empresa_id.as_str(),
            client.razao_social,
            if client.ativo { "ativo" } else { "inativo" },
        );
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    print_config_path: bool,
    print_example: bool,
    check_only: bool,
    demo: bool,
    tab: Option<Tab>,
    search: Option<String>,
    status: Option<StatusFilter>,
    company: Option<String>,
    show_help: bool,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        print_config_path: false,
        print_example: false,
        check_only: false,
        demo: false,
        tab: None,
        search: None,
        status: None,
        company: None,
        show_help: false,
    };

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--check" => {
                options.check_only = true;
            }
            "--demo" => {
                options.demo = true;
            }
            "--tab" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--tab requires one of: empresas, clientes"))?;
                options.tab = Some(Tab::parse(value.as_ref()).ok_or_else(|| {
                    anyhow::anyhow!(
                        "unknown tab {:?}; use one of: empresas, clientes",
                        value.as_ref()
                    )
                })?);
            }
            "--search" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--search requires a term"))?;
                options.search = Some(value.as_ref().to_owned());
            }
            "--status" => {
                let value = iter.next().ok_or_else(|| {
                    anyhow::anyhow!("--status requires one of: all, active, inactive")
                })?;
                options.status = Some(StatusFilter::parse(value.as_ref()).ok_or_else(|| {
                    anyhow::anyhow!(
                        "unknown status {:?}; use one of: all, active, inactive",
                        value.as_ref()
                    )
                })?);
            }
            "--company" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--company requires a company id or `all`"))?;
                options.company = Some(value.as_ref().to_owned());
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            unknown => {
                return Err(anyhow::anyhow!(
                    "unknown argument {unknown:?}; run with --help to see supported options"
                ));
            }
        }
    }

    Ok(options)
}

fn print_help() {
    println!("cadastro");
    println!("  --config <path>          Use a specific config path");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-example-config   Print a config template");
    println!("  --check                  Validate config and store reachability");
    println!("  --demo                   Run against seeded in-memory sample data");
    println!("  --tab <name>             List empresas or clientes (default from config)");
    println!("  --search <term>          Filter listings by name, cnpj, or codigo");
    println!("  --status <state>         Filter by all, active, or inactive");
    println!("  --company <id|all>       Scope the clientes listing to one company");
    println!("  --help                   Show this help");
}
