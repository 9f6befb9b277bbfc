//! Sequential pagination draining
//!
//! Pages are fetched one at a time: the server-reported total from each
//! response decides whether another request is issued, so requests are
//! never pipelined.

use psync_registry::{
    ConnectionQuery, PromptQuery, Registry, RemoteConnection, RemotePrompt, clamp_page_size,
};

use crate::error::Result;

pub(crate) async fn drain_prompts(
    registry: &dyn Registry,
    label: Option<String>,
    limit: u32,
) -> Result<Vec<RemotePrompt>> {
    let limit = clamp_page_size(limit);
    let mut items = Vec::new();
    let mut page = 1;
    loop {
        let result = registry
            .list_prompts(&PromptQuery {
                label: label.clone(),
                page,
                limit,
            })
            .await?;
        items.extend(result.items);
        if page >= result.total_pages {
            break;
        }
        page += 1;
    }
    Ok(items)
}

pub(crate) async fn drain_connections(
    registry: &dyn Registry,
    limit: u32,
) -> Result<Vec<RemoteConnection>> {
    let limit = clamp_page_size(limit);
    let mut items = Vec::new();
    let mut page = 1;
    loop {
        let result = registry
            .list_connections(&ConnectionQuery { page, limit })
            .await?;
        items.extend(result.items);
        if page >= result.total_pages {
            break;
        }
        page += 1;
    }
    Ok(items)
}
