use super::explorer::RelationshipChainExplorer;
use super::field::RelationshipNodeField;
use super::record_set::RecordSet;
use crate::access::RecordAccess;
use crate::store::RelationshipRecord;

/// Recovers the chains the endpoint nodes of a relationship currently expose through
/// their head pointers.
pub struct OwningNodeRelationshipChain<'a, A: ?Sized> {
    explorer: RelationshipChainExplorer<'a, A>,
    access: &'a A,
}

impl<'a, A: RecordAccess + ?Sized> OwningNodeRelationshipChain<'a, A> {
    /// Creates a resolver that walks with `explorer` and loads nodes from `access`.
    pub fn new(explorer: RelationshipChainExplorer<'a, A>, access: &'a A) -> Self {
        Self { explorer, access }
    }

    /// Union of the chains rooted at both endpoint nodes of `rel`.
    pub fn find_relationship_chains_that_this_record_should_belong_to(
        &self,
        rel: &RelationshipRecord,
    ) -> RecordSet<RelationshipRecord> {
        let mut chains = RecordSet::new();
        for endpoint in RelationshipNodeField::ALL {
            let node = self
                .access
                .node(endpoint.get(rel))
                .force_load()
                .into_record();
            chains.add_all(&self.explorer.follow_chain_from_node(node.id, node.next_rel));
        }
        chains
    }

    /// Returns true if `rel` is on a chain one of its endpoint nodes exposes.
    pub fn is_reachable_from_owners(&self, rel: &RelationshipRecord) -> bool {
        self.find_relationship_chains_that_this_record_should_belong_to(rel)
            .contains(rel.id)
    }
}
