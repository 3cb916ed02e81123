use downcast_rs::Downcast;
use paste::paste;

use crate::for_all_plan_nodes;
use crate::optimizer::plan_node::*;

pub trait WithPlanNodeType {
    fn node_type(&self) -> PlanNodeType;
}

/// impl [`PlanNodeType`] fn for each node.
macro_rules! enum_plan_node_type {
    ($($node_name:ident),*) => {
        /// each enum value represent a PlanNode struct type, help us to dispatch and downcast
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub enum PlanNodeType {
            $($node_name),*
        }

        $(impl WithPlanNodeType for $node_name {
            fn node_type(&self) -> PlanNodeType {
                PlanNodeType::$node_name
            }
        })*
    };
}

for_all_plan_nodes! { enum_plan_node_type }

/// The trait is used by optimizer for rewriting plan nodes.
/// every plan node should implement this trait.
pub trait PlanTreeNode {
    /// Get the child plan nodes.
    fn children(&self) -> Vec<PlanRef>;

    /// Clone the node with new children for rewriting plan node.
    fn clone_with_children(&self, children: Vec<PlanRef>) -> PlanRef;
}

macro_rules! impl_dyn_eq {
    ($($node_name:ident),*) => {
        impl PartialEq for dyn PlanNode {
            fn eq(&self, other: &Self) -> bool {
                if self.as_any().type_id() != other.as_any().type_id() {
                    return false;
                }
                paste! {
                    match self.node_type() {
                        $(PlanNodeType::$node_name => {
                            self.[<as_ $node_name:snake>]() == other.[<as_ $node_name:snake>]()
                        })*
                    }
                }
            }
        }
    };
}

for_all_plan_nodes! { impl_dyn_eq }
