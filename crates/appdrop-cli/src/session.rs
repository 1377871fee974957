//! Session establishment: find the organization group and bind the
//! credentials to it for the rest of the run.

use anyhow::Result;
use appdrop_api_client::ApiClient;
use appdrop_core::{
    IngestError, IngestSettings, OrganizationGroup, OrganizationGroupRef, SessionContext,
};

use crate::prompt::Prompter;

/// Looks up the configured organization group and returns the session
/// context for it. Every failure here is fatal to the run.
pub async fn establish_session(
    settings: &IngestSettings,
    prompter: &mut dyn Prompter,
) -> Result<SessionContext> {
    let client = ApiClient::new(&settings.server_url, &settings.api_key, &settings.credentials)?;

    let groups = client
        .search_groups(&settings.organization_group)
        .await
        .map_err(|e| IngestError::Session(format!("organization group search failed: {}", e)))?;

    let group = select_group(&settings.organization_group, &groups, prompter)?;
    tracing::info!(
        group = %group.name,
        group_id = group.id,
        "Using organization group"
    );

    Ok(SessionContext::new(
        &settings.server_url,
        settings.api_key.clone(),
        &settings.credentials,
        group,
    ))
}

/// Picks one group out of the search results. A single match is taken as is;
/// several matches are listed and the operator answers with a number. An
/// empty answer or `q` cancels.
pub fn select_group(
    query: &str,
    groups: &[OrganizationGroup],
    prompter: &mut dyn Prompter,
) -> Result<OrganizationGroupRef> {
    match groups {
        [] => Err(IngestError::Session(format!(
            "no organization group matches {:?}",
            query
        ))
        .into()),
        [only] => Ok(OrganizationGroupRef::from(only)),
        _ => {
            println!("Several organization groups match {:?}:", query);
            for (index, group) in groups.iter().enumerate() {
                println!("  {:>2}. {}", index + 1, group.label());
            }

            let prompt = format!("Select a group [1-{}, q to cancel]: ", groups.len());
            loop {
                let answer = prompter.input(&prompt)?;
                let answer = answer.trim();
                if answer.is_empty() || answer.eq_ignore_ascii_case("q") {
                    return Err(IngestError::Session(
                        "organization group selection cancelled".to_string(),
                    )
                    .into());
                }

                match answer.parse::<usize>() {
                    Ok(n) if (1..=groups.len()).contains(&n) => {
                        return Ok(OrganizationGroupRef::from(&groups[n - 1]))
                    }
                    _ => println!("Please enter a number between 1 and {}", groups.len()),
                }
            }
        }
    }
}
