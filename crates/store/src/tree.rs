//! Tree assembly.
//!
//! Composes repeated child listings into the nested press → assembly →
//! part shape callers render. Deliberately uncached: a model's tree is
//! tens of nodes, and correctness beats latency here.

use crate::error::StoreResult;
use crate::repos::NodeRepo;
use checkwright_core::ModelCode;
use serde::Serialize;
use uuid::Uuid;

/// A press (root) with its nested assemblies and parts.
#[derive(Debug, Clone, Serialize)]
pub struct PressTree {
    pub id: Uuid,
    pub name: String,
    pub assemblies: Vec<AssemblyTree>,
}

/// An assembly with its parts.
#[derive(Debug, Clone, Serialize)]
pub struct AssemblyTree {
    pub id: Uuid,
    pub name: String,
    pub parts: Vec<PartNode>,
}

/// A part leaf.
#[derive(Debug, Clone, Serialize)]
pub struct PartNode {
    pub id: Uuid,
    pub name: String,
}

/// Build the full nested tree for a model, sibling lists in stored order.
pub async fn build_tree<S>(store: &S, model: &ModelCode) -> StoreResult<Vec<PressTree>>
where
    S: NodeRepo + ?Sized,
{
    let mut presses = Vec::new();
    for press in store.list_presses(model).await? {
        let mut assemblies = Vec::new();
        for assembly in store.list_children(press.node_id, model).await? {
            let parts = store
                .list_children(assembly.node_id, model)
                .await?
                .into_iter()
                .map(|part| PartNode { id: part.node_id, name: part.node_name })
                .collect();
            assemblies.push(AssemblyTree {
                id: assembly.node_id,
                name: assembly.node_name,
                parts,
            });
        }
        presses.push(PressTree {
            id: press.node_id,
            name: press.node_name,
            assemblies,
        });
    }
    Ok(presses)
}
