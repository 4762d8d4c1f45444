//! `fetch` command

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use synnerdata_lib::SynnerdataClient;
use synnerdata_lib::auth::AccessToken;
use synnerdata_lib::auth::Session;
use synnerdata_lib::error::Error;
use synnerdata_lib::model::Resource;
use synnerdata_lib::model::Row;

use crate::config::CliConfig;
use crate::error::CliError;
use crate::output::print_success;

#[derive(Debug, Args)]
pub struct FetchArgs {
    /// Resource path, e.g. employees or cost-centers
    #[arg(long)]
    pub resource: Resource,

    /// Company whose rows are listed; defaults to the configured one
    #[arg(long)]
    pub company: Option<String>,

    /// Fetch a single record by id
    #[arg(long)]
    pub id: Option<String>,

    /// API base URL; defaults to the configured one
    #[arg(long)]
    pub api_url: Option<String>,

    /// Write rows to this file instead of stdout
    #[arg(long)]
    pub out: Option<PathBuf>,
}

pub async fn execute(args: &FetchArgs, config: &CliConfig) -> Result<(), CliError> {
    let client = client(args, config)?;
    let rows = fetch(&client, args, config).await?;
    let json = serde_json::to_string_pretty(&rows).map_err(Error::from)?;

    match &args.out {
        Some(path) => {
            std::fs::write(path, json).map_err(|source| CliError::Write {
                path: path.clone(),
                source,
            })?;
            print_success(&format!("{} rows written to {}", rows.len(), path.display()));
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn client(args: &FetchArgs, config: &CliConfig) -> Result<SynnerdataClient, CliError> {
    let url = args
        .api_url
        .as_ref()
        .or(config.api_url.as_ref())
        .ok_or(CliError::MissingSetting("api_url"))?;
    let token = config
        .token
        .as_ref()
        .ok_or(CliError::MissingSetting("token"))?;

    let session = Arc::new(Session::with_token(AccessToken::parse(token.as_str())));
    let client = SynnerdataClient::builder()
        .url(url.as_str())
        .token_provider(session)
        .build()
        .map_err(Error::from)?;
    Ok(client)
}

async fn fetch(
    client: &SynnerdataClient,
    args: &FetchArgs,
    config: &CliConfig,
) -> Result<Vec<Row>, CliError> {
    if let Some(id) = &args.id {
        return Ok(vec![client.get(&args.resource, id).await?]);
    }
    if !args.resource.is_company_scoped() {
        return Ok(client.list(&args.resource).await?);
    }

    let company = args
        .company
        .as_ref()
        .or(config.company_id.as_ref())
        .ok_or(CliError::MissingSetting("company_id"))?;
    log::debug!("listing {} for company {}", args.resource, company);
    Ok(client.list_by_company(&args.resource, company).await?)
}
