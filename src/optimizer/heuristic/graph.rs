use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use petgraph::visit::Bfs;

use super::HepMatchOrder;
use crate::optimizer::core::{OptExpr, OptExprNode, OptExprNodeId};
use crate::optimizer::PlanRef;

/// HepNodeId is used in optimizer to identify a node.
pub type HepNodeId = NodeIndex<OptExprNodeId>;

#[derive(Clone, Debug)]
pub struct HepNode {
    id: HepNodeId,
    plan: PlanRef,
}

/// The plan tree held as a graph during optimization, so a rule's replacement
/// can be spliced in without rebuilding the untouched remainder.
#[derive(Debug)]
pub struct HepGraph {
    graph: StableDiGraph<HepNode, (), usize>,
    root: HepNodeId,
}

impl HepGraph {
    pub fn new(root: PlanRef) -> Self {
        let mut graph = Self {
            graph: StableDiGraph::<HepNode, (), usize>::default(),
            root: HepNodeId::default(),
        };
        let opt_expr = OptExpr::new_from_plan_ref(&root);
        graph.root = graph.add_opt_expr(opt_expr);
        graph
    }

    pub fn children_at(&self, id: HepNodeId) -> Vec<HepNodeId> {
        self.graph
            .neighbors_directed(id, petgraph::Direction::Outgoing)
            .collect::<Vec<_>>()
    }

    /// DFS visitor to add a Optimizer Expression in graph and reactify the graph edges.
    fn add_opt_expr(&mut self, opt_expr: OptExpr) -> HepNodeId {
        let root = opt_expr.root.clone();
        match root {
            // the optimizer expression contains existing graph node, so just return the node id.
            OptExprNode::OptExpr(id) => HepNodeId::new(id),
            // the optimizer expression is a new graph nodes
            OptExprNode::PlanRef(root) => {
                let root_hep_node = HepNode {
                    // fake id for now, will be updated after add_node
                    id: HepNodeId::default(),
                    plan: root,
                };
                let new_node_id = self.graph.add_node(root_hep_node);
                self.graph[new_node_id].id = new_node_id;

                // The rev() operation to reverse the children order in graph. Due to
                // neighbors_directed Outgoing returns nodes order is reversed.
                //
                // For example, if the node is join, when insert children order is [left, right],
                // then neighbors_directed Outgoing will return [right, left].
                //
                // So we should reverse order when insert to make sure the neighbors_directed
                // children order is [left, right].
                let children_ids = opt_expr
                    .children
                    .into_iter()
                    .rev()
                    .map(|p| self.add_opt_expr(p))
                    .collect::<Vec<_>>();

                for child_hep_id in children_ids {
                    self.graph.add_edge(new_node_id, child_hep_id, ());
                }

                new_node_id
            }
        }
    }

    /// Convert the graph to a plan tree, recursively process children and construct new plan.
    pub fn to_plan(&self) -> PlanRef {
        self.to_plan_start_from(self.root)
    }

    pub fn to_plan_start_from(&self, start: HepNodeId) -> PlanRef {
        let children = self
            .children_at(start)
            .iter()
            .map(|&id| self.to_plan_start_from(id))
            .collect::<Vec<_>>();
        self.graph[start].plan.clone_with_children(children)
    }

    pub fn to_opt_expr(&self, start: HepNodeId) -> OptExpr {
        let children = self
            .children_at(start)
            .iter()
            .map(|&id| self.to_opt_expr(id))
            .collect::<Vec<_>>();
        OptExpr::new(
            OptExprNode::PlanRef(self.graph[start].plan.clone()),
            children,
        )
    }

    /// Traverse the graph in BFS order.
    fn bfs(&self, start: HepNodeId) -> Vec<HepNodeId> {
        let mut ids = Vec::with_capacity(self.graph.node_count());
        let mut iter = Bfs::new(&self.graph, start);
        while let Some(node_id) = iter.next(&self.graph) {
            ids.push(node_id);
        }
        ids
    }

    /// Node ids in match order. BottomUp returns descendants before their
    /// ancestors, which is what implementation conversions rely on.
    pub fn nodes_iter(&self, order: HepMatchOrder) -> Box<dyn Iterator<Item = HepNodeId>> {
        let ids = self.bfs(self.root);
        match order {
            HepMatchOrder::TopDown => Box::new(ids.into_iter()),
            HepMatchOrder::BottomUp => Box::new(ids.into_iter().rev()),
        }
    }

    pub fn node_plan(&self, id: HepNodeId) -> &PlanRef {
        &self.graph[id].plan
    }

    pub fn replace_node(&mut self, old_node_id: HepNodeId, new_opt_expr: OptExpr) {
        // add new node and rectify edges with existing children nodes
        let new_node_id = self.add_opt_expr(new_opt_expr);

        // change replaced node's parents point to new child
        let parent_ids = self
            .graph
            .neighbors_directed(old_node_id, petgraph::Direction::Incoming)
            .collect::<Vec<_>>();
        for parent_id in parent_ids {
            self.graph.add_edge(parent_id, new_node_id, ());
        }
        // remove old node
        self.graph.remove_node(old_node_id);

        if self.root == old_node_id {
            self.root = new_node_id;
        }

        // remove unlink nodes from root
        let ids_in_plan_tree = self.bfs(self.root);
        if self.graph.node_count() != ids_in_plan_tree.len() {
            self.graph
                .retain_nodes(|_, id| ids_in_plan_tree.contains(&id));
        }
    }
}
