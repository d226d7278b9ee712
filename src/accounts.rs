//! Walks the account → property → view hierarchy of the management API.

use serde::{Deserialize, Serialize};

use crate::api::ManagementApi;
use crate::error::Result;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct AccountTree {
    pub accounts: Vec<AccountNode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AccountNode {
    pub account_id: String,
    pub account_name: String,
    pub properties: Vec<PropertyNode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PropertyNode {
    pub property_id: String,
    pub property_name: String,
    pub views: Vec<ViewNode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ViewNode {
    pub view_id: String,
    pub view_name: String,
}

impl AccountTree {
    /// Every view id in the tree, in traversal order.
    pub fn view_ids(&self) -> Vec<&str> {
        self.accounts
            .iter()
            .flat_map(|account| &account.properties)
            .flat_map(|property| &property.views)
            .map(|view| view.view_id.as_str())
            .collect()
    }
}

/// Enumerate every account, its web properties and their views.
///
/// Issues one list call per account and one per property. The first failing
/// call aborts the walk.
pub async fn get_account_details<A>(api: &A) -> Result<AccountTree>
where
    A: ManagementApi + ?Sized,
{
    let mut tree = AccountTree::default();

    for account in api.list_accounts().await? {
        let mut properties = Vec::new();

        for property in api.list_web_properties(&account.id).await? {
            let views = api
                .list_profiles(&account.id, &property.id)
                .await?
                .into_iter()
                .map(|profile| ViewNode {
                    view_id: profile.id,
                    view_name: profile.name,
                })
                .collect();

            properties.push(PropertyNode {
                property_id: property.id,
                property_name: property.name,
                views,
            });
        }

        tracing::debug!(account_id = %account.id, properties = properties.len(), "Account walked");
        tree.accounts.push(AccountNode {
            account_id: account.id,
            account_name: account.name,
            properties,
        });
    }

    Ok(tree)
}
